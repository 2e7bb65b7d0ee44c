//! Media deletion: single (soft/hard) and bulk

use crate::error::{ErrorResponse, HttpAppError};
use crate::responses::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vitrine_core::AppError;
use vitrine_services::BulkDeleteOutcome;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

/// 422 body for a bulk delete where some ids failed. Carries one line per
/// failed id, which is why this does not go through `AppError`.
fn partial_failure_response(outcome: &BulkDeleteOutcome) -> ErrorResponse {
    let errors = outcome
        .failed
        .iter()
        .map(|(id, reason)| format!("{}: {}", id, reason))
        .collect();
    ErrorResponse {
        success: false,
        message: outcome.message(),
        code: "UNPROCESSABLE".to_string(),
        details: None,
        errors: Some(errors),
    }
}

#[utoipa::path(
    delete,
    path = "/media/{id}",
    tag = "media",
    params(("id" = i64, Path, description = "Media id")),
    responses(
        (status = 200, description = "Media deleted", body = serde_json::Value),
        (status = 404, description = "Media not found", body = ErrorResponse)
    )
)]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.lifecycle.delete(id, false).await? {
        return Err(AppError::NotFound("Media not found".to_string()).into());
    }
    Ok(Json(ApiResponse::message("Media deleted")))
}

#[utoipa::path(
    delete,
    path = "/media/{id}/force",
    tag = "media",
    params(("id" = i64, Path, description = "Media id")),
    responses(
        (status = 200, description = "Media permanently deleted", body = serde_json::Value),
        (status = 404, description = "Media not found", body = ErrorResponse)
    )
)]
pub async fn force_delete_media(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !state.lifecycle.delete(id, true).await? {
        return Err(AppError::NotFound("Media not found".to_string()).into());
    }
    Ok(Json(ApiResponse::message("Media permanently deleted")))
}

#[utoipa::path(
    post,
    path = "/media/bulk-delete",
    tag = "media",
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "All media deleted", body = serde_json::Value),
        (status = 400, description = "Empty id list", body = ErrorResponse),
        (status = 422, description = "Some deletions failed", body = ErrorResponse)
    )
)]
pub async fn bulk_delete_media(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BulkDeleteRequest>,
) -> Result<Response, HttpAppError> {
    if request.ids.is_empty() {
        return Err(AppError::InvalidInput("No media ids given".to_string()).into());
    }

    let outcome = state.lifecycle.bulk_delete(&request.ids).await?;

    if outcome.is_partial_failure() {
        let body = partial_failure_response(&outcome);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
    }

    Ok(Json(ApiResponse::message(outcome.message())).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_body_lists_failed_ids() {
        let outcome = BulkDeleteOutcome {
            deleted: vec![1, 2],
            failed: vec![(999, "Media not found".to_string())],
        };

        let body = partial_failure_response(&outcome);
        assert!(!body.success);
        assert_eq!(body.code, "UNPROCESSABLE");
        assert_eq!(body.message, "2 media deleted, 1 failed");
        assert_eq!(
            body.errors,
            Some(vec!["999: Media not found".to_string()])
        );
    }
}
