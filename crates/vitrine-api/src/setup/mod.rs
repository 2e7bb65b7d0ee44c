//! Application setup and initialization
//!
//! Initialization logic extracted from main.rs: database, storage, services,
//! routes, server.

pub mod database;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use vitrine_core::Config;
use vitrine_db::{MediaRepository, MediaStore};
use vitrine_services::{MediaLifecycleService, ReconciliationService, SlideshowService};
use vitrine_storage::create_storage;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let pool = database::setup_database(&config).await?;

    let storage = create_storage(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    let store: Arc<dyn MediaStore> = Arc::new(MediaRepository::new(pool.clone()));

    let lifecycle = MediaLifecycleService::new(
        store.clone(),
        storage.clone(),
        config.upload_root.clone(),
    );
    let reconcile = ReconciliationService::new(
        store.clone(),
        storage.clone(),
        config.upload_root.clone(),
    );
    let slideshow = SlideshowService::new(
        store.clone(),
        storage.clone(),
        config.base_url.clone(),
        Duration::from_secs(config.slideshow_cache_ttl_secs),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        pool,
        store,
        storage,
        lifecycle,
        reconcile,
        slideshow,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
