//! Media file replacement

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::media_upload::parse_upload_form;
use crate::responses::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use vitrine_core::AppError;

#[utoipa::path(
    put,
    path = "/media/{id}/file",
    tag = "media",
    params(("id" = i64, Path, description = "Media id")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File replaced", body = serde_json::Value),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    )
)]
pub async fn replace_media_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (file, _, _) = parse_upload_form(multipart).await?;

    if file.data.len() > state.config.max_upload_size_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds max {} bytes",
            file.data.len(),
            state.config.max_upload_size_bytes
        ))
        .into());
    }

    let media = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    let updated = state.lifecycle.replace(&media, file).await?;

    Ok(Json(ApiResponse::ok("Media file replaced", updated)))
}
