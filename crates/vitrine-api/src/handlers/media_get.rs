//! Media query endpoint
//!
//! One route serves two shapes: a single record when `id` or `uuid` is
//! given, otherwise a paginated list with an optional type filter.

use crate::error::{ErrorResponse, HttpAppError};
use crate::responses::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;
use vitrine_core::{AppError, Media, MediaType, Pagination};

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
// Upper bound keeps `(page - 1) * limit` inside i64 and the page number
// inside u32 for the pagination envelope.
const MAX_PAGE: i64 = u32::MAX as i64;

#[derive(Debug, Deserialize, IntoParams)]
pub struct MediaQuery {
    /// Numeric id for a single lookup
    pub id: Option<i64>,
    /// Uuid for a single lookup (ignored when `id` is present)
    pub uuid: Option<Uuid>,
    /// Type filter for list mode (image, video, audio, document, other)
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    /// Page size, default 10, clamped to 1..=100
    pub limit: Option<i64>,
    /// 1-based page number, clamped to 1..=u32::MAX
    pub page: Option<i64>,
}

/// A media record as returned to the admin panel.
#[derive(Debug, Serialize)]
pub struct MediaItem {
    #[serde(flatten)]
    pub media: Media,
    pub full_url: String,
}

/// Single-lookup shape: the record plus its file's presence on disk.
#[derive(Debug, Serialize)]
pub struct MediaDetail {
    #[serde(flatten)]
    pub media: Media,
    pub full_url: String,
    pub file_exists: bool,
}

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).clamp(1, MAX_PAGE)
}

#[utoipa::path(
    get,
    path = "/media",
    tag = "media",
    params(MediaQuery),
    responses(
        (status = 200, description = "Media record or paginated list", body = serde_json::Value),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    )
)]
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MediaQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Single lookup mode
    if query.id.is_some() || query.uuid.is_some() {
        let media = match query.id {
            Some(id) => state.store.get(id).await?,
            None => state.store.get_by_uuid(query.uuid.unwrap()).await?,
        }
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

        let full_url = media.full_url(&state.config.base_url);
        let file_exists = state.lifecycle.file_exists(&media).await?;
        let detail = MediaDetail {
            media,
            full_url,
            file_exists,
        };

        return Ok(Json(json!(ApiResponse::ok("Media found", detail))));
    }

    // List mode
    let media_type = match &query.media_type {
        Some(raw) => Some(
            MediaType::from_str(raw)
                .map_err(|_| AppError::InvalidInput(format!("Invalid media type: {}", raw)))?,
        ),
        None => None,
    };

    let limit = clamp_limit(query.limit);
    let page = clamp_page(query.page);
    let offset = (page - 1) * limit;

    let (rows, total) = state.store.list(media_type, limit, offset).await?;
    let pagination = Pagination::new(page as u32, limit as u32, total, rows.len());
    let items: Vec<MediaItem> = rows
        .into_iter()
        .map(|media| {
            let full_url = media.full_url(&state.config.base_url);
            MediaItem { media, full_url }
        })
        .collect();

    Ok(Json(json!(ApiResponse::ok(
        "Media retrieved",
        json!({ "items": items, "pagination": pagination })
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clamping() {
        assert_eq!(clamp_limit(None), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(50)), 50);
        assert_eq!(clamp_limit(Some(1000)), 100);
    }

    #[test]
    fn test_page_floor() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_page(Some(7)), 7);
    }

    #[test]
    fn test_huge_page_keeps_offset_in_range() {
        let page = clamp_page(Some(i64::MAX));
        assert_eq!(page, MAX_PAGE);

        // The offset expression used by the handler must not overflow
        let offset = (page - 1) * clamp_limit(Some(i64::MAX));
        assert!(offset > 0);

        // The page number survives the u32 cast in the pagination envelope
        assert_eq!(page as u32 as i64, page);
    }
}
