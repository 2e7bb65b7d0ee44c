//! Slide list fetching

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use vitrine_core::classify::is_slideshow_extension;
use vitrine_core::{MediaType, Slide};

/// Source of the slide rotation. The runtime only ever sees this trait, so
/// tests can drive the player with canned lists.
#[async_trait]
pub trait SlideFetcher: Send + Sync {
    async fn fetch_slides(&self) -> Result<Vec<Slide>>;
}

/// Fetches the rotation from the public slideshow endpoint.
pub struct HttpSlideFetcher {
    client: Client,
    endpoint: String,
}

impl HttpSlideFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/slideshow/media", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl SlideFetcher for HttpSlideFetcher {
    async fn fetch_slides(&self) -> Result<Vec<Slide>> {
        let slides: Vec<Slide> = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .context("Slide fetch request failed")?
            .error_for_status()
            .context("Slide fetch returned an error status")?
            .json()
            .await
            .context("Slide fetch returned invalid JSON")?;

        Ok(validate_slides(slides))
    }
}

/// Drop slides the player cannot render: missing url, unsupported type, or
/// extension off the allow-list. The server filters too; this guards against
/// a stale or misbehaving feed.
pub fn validate_slides(slides: Vec<Slide>) -> Vec<Slide> {
    slides
        .into_iter()
        .filter(|s| {
            !s.url.is_empty()
                && matches!(s.media_type, MediaType::Image | MediaType::Video)
                && is_slideshow_extension(&s.extension)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(id: i64, media_type: MediaType, extension: &str, url: &str) -> Slide {
        Slide {
            id,
            url: url.to_string(),
            media_type,
            extension: extension.to_string(),
            filename: format!("{}.{}", id, extension),
            mime_type: "application/octet-stream".to_string(),
            path: format!("uploads/{}.{}", id, extension),
        }
    }

    #[test]
    fn test_validate_drops_unrenderable_slides() {
        let slides = vec![
            slide(1, MediaType::Image, "jpg", "http://x/1.jpg"),
            slide(2, MediaType::Video, "mp4", "http://x/2.mp4"),
            slide(3, MediaType::Image, "jpg", ""),
            slide(4, MediaType::Document, "pdf", "http://x/4.pdf"),
            slide(5, MediaType::Image, "bmp", "http://x/5.bmp"),
        ];

        let kept = validate_slides(slides);
        let ids: Vec<i64> = kept.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
