//! Application state
//!
//! One `Arc<AppState>` shared across handlers; services are injected here
//! rather than held in globals, so the cache and the rate limiter live
//! exactly as long as the process.

use sqlx::PgPool;
use std::sync::Arc;
use vitrine_core::Config;
use vitrine_db::MediaStore;
use vitrine_services::{MediaLifecycleService, ReconciliationService, SlideshowService};
use vitrine_storage::Storage;

pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub store: Arc<dyn MediaStore>,
    pub storage: Arc<dyn Storage>,
    pub lifecycle: MediaLifecycleService,
    pub reconcile: ReconciliationService,
    pub slideshow: SlideshowService,
}
