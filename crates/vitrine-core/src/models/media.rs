use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Media type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
    Other,
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            "document" => Ok(MediaType::Document),
            "other" => Ok(MediaType::Other),
            _ => Err(anyhow::anyhow!("Invalid media type: {}", s)),
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
            MediaType::Audio => write!(f, "audio"),
            MediaType::Document => write!(f, "document"),
            MediaType::Other => write!(f, "other"),
        }
    }
}

/// One row of the `medias` table: an uploaded file and its derived metadata.
///
/// `path` is the storage-relative location on the named `disk`; `url` is the
/// stored public URL when one was recorded at creation time (S3/CDN setups),
/// otherwise it is derived via [`Media::full_url`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct Media {
    pub id: i64,
    pub uuid: Uuid,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub extension: String,
    pub size: i64,
    pub disk: String,
    pub path: String,
    pub url: Option<String>,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    pub media_type: MediaType,
    pub metadata: Option<JsonValue>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Media {
    /// Public URL: the stored `url` when present, otherwise derived from the
    /// disk's base URL as `{base_url}/storage/{path}`.
    pub fn full_url(&self, base_url: &str) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("{}/storage/{}", base_url.trim_end_matches('/'), self.path),
        }
    }

    /// Whether this media participates in the slideshow rotation
    /// (type gate only; file existence is checked separately).
    pub fn is_slideshow_type(&self) -> bool {
        matches!(self.media_type, MediaType::Image | MediaType::Video)
    }
}

/// Fields written together when a media record is created.
/// `id`, `created_at`, and `updated_at` are assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub uuid: Uuid,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub extension: String,
    pub size: i64,
    pub disk: String,
    pub path: String,
    pub url: Option<String>,
    pub media_type: MediaType,
    pub metadata: Option<JsonValue>,
    pub description: Option<String>,
}

/// One item of the public slideshow rotation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Slide {
    pub id: i64,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub extension: String,
    pub filename: String,
    pub mime_type: String,
    pub path: String,
}

impl Slide {
    /// Build a slide from an eligible media record.
    pub fn from_media(media: &Media, base_url: &str) -> Self {
        Slide {
            id: media.id,
            url: media.full_url(base_url),
            media_type: media.media_type,
            extension: media.extension.clone(),
            filename: media.filename.clone(),
            mime_type: media.mime_type.clone(),
            path: media.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_media() -> Media {
        Media {
            id: 1,
            uuid: Uuid::new_v4(),
            filename: "sample1.jpg".to_string(),
            original_name: "sample1.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            extension: "jpg".to_string(),
            size: 1024,
            disk: "public".to_string(),
            path: "sample-images/sample1.jpg".to_string(),
            url: None,
            media_type: MediaType::Image,
            metadata: None,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_full_url_derived_from_path() {
        let media = sample_media();
        assert_eq!(
            media.full_url("http://localhost:3000/"),
            "http://localhost:3000/storage/sample-images/sample1.jpg"
        );
    }

    #[test]
    fn test_full_url_prefers_stored_url() {
        let mut media = sample_media();
        media.url = Some("https://cdn.example.com/x.jpg".to_string());
        assert_eq!(
            media.full_url("http://localhost:3000"),
            "https://cdn.example.com/x.jpg"
        );
    }

    #[test]
    fn test_media_type_round_trip() {
        for (s, t) in [
            ("image", MediaType::Image),
            ("video", MediaType::Video),
            ("audio", MediaType::Audio),
            ("document", MediaType::Document),
            ("other", MediaType::Other),
        ] {
            assert_eq!(MediaType::from_str(s).unwrap(), t);
            assert_eq!(t.to_string(), s);
        }
        assert!(MediaType::from_str("slideshow").is_err());
    }

    #[test]
    fn test_serde_uses_type_key() {
        let media = sample_media();
        let json = serde_json::to_value(&media).unwrap();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("image"));
        assert!(json.get("media_type").is_none());
    }

    #[test]
    fn test_slide_from_media() {
        let media = sample_media();
        let slide = Slide::from_media(&media, "http://localhost:3000");
        assert_eq!(slide.id, media.id);
        assert_eq!(slide.extension, "jpg");
        assert_eq!(slide.mime_type, "image/jpeg");
        assert!(slide.url.ends_with("/storage/sample-images/sample1.jpg"));
    }
}
