//! Slideshow feed
//!
//! Builds the public slide list: live records whose file is on the disk,
//! whose type is image or video, and whose extension is on the fixed
//! allow-list, newest first. The list is cached under the current-minute
//! key with a fixed TTL so display walls polling every minute share one
//! database pass.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use vitrine_core::classify::is_slideshow_extension;
use vitrine_core::{AppError, Slide};
use vitrine_db::MediaStore;
use vitrine_storage::Storage;

use crate::cache::TtlCache;

#[derive(Clone)]
pub struct SlideshowService {
    store: Arc<dyn MediaStore>,
    storage: Arc<dyn Storage>,
    base_url: String,
    cache: Arc<TtlCache<Vec<Slide>>>,
}

impl SlideshowService {
    pub fn new(
        store: Arc<dyn MediaStore>,
        storage: Arc<dyn Storage>,
        base_url: String,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            storage,
            base_url,
            cache: Arc::new(TtlCache::new(cache_ttl)),
        }
    }

    fn cache_key() -> String {
        Utc::now().format("%Y-%m-%d-%H-%M").to_string()
    }

    /// The current slide rotation, cached per minute.
    pub async fn slides(&self) -> Result<Vec<Slide>, AppError> {
        let key = Self::cache_key();
        if let Some(slides) = self.cache.get(&key).await {
            tracing::debug!(cache_key = %key, count = slides.len(), "Slideshow cache hit");
            return Ok(slides);
        }

        let slides = self.build_slides().await?;
        self.cache.put(key, slides.clone()).await;
        Ok(slides)
    }

    async fn build_slides(&self) -> Result<Vec<Slide>, AppError> {
        let rows = self.store.list_all().await?;
        let mut slides = Vec::new();

        for media in rows {
            if !media.is_slideshow_type() || !is_slideshow_extension(&media.extension) {
                continue;
            }
            // A row whose file has gone missing is silently skipped rather
            // than surfacing a broken slide on the wall.
            match self.storage.exists(&media.path).await {
                Ok(true) => slides.push(Slide::from_media(&media, &self.base_url)),
                Ok(false) => {
                    tracing::debug!(media_id = media.id, path = %media.path, "Skipping slide with missing file");
                }
                Err(e) => {
                    tracing::warn!(media_id = media.id, path = %media.path, error = %e, "Skipping slide, existence check failed");
                }
            }
        }

        tracing::info!(count = slides.len(), "Slideshow feed rebuilt");
        Ok(slides)
    }
}
