//! Media upload (multipart)

use crate::error::{ErrorResponse, HttpAppError};
use crate::responses::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::str::FromStr;
use std::sync::Arc;
use vitrine_core::{AppError, MediaType};
use vitrine_services::UploadedFile;

/// Parse the multipart form: required `file`, optional `type` and
/// `description` text fields. Unknown fields are ignored.
pub(crate) async fn parse_upload_form(
    mut multipart: Multipart,
) -> Result<(UploadedFile, Option<MediaType>, Option<String>), HttpAppError> {
    let mut file: Option<UploadedFile> = None;
    let mut media_type: Option<MediaType> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "file" => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::InvalidInput("File field has no filename".to_string()))?;
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?.to_vec();
                file = Some(UploadedFile {
                    original_name,
                    content_type,
                    data,
                });
            }
            "type" => {
                let text = field.text().await?;
                if !text.is_empty() {
                    media_type = Some(MediaType::from_str(&text).map_err(|_| {
                        AppError::InvalidInput(format!("Invalid media type: {}", text))
                    })?);
                }
            }
            "description" => {
                let text = field.text().await?;
                if !text.is_empty() {
                    description = Some(text);
                }
            }
            _ => {}
        }
    }

    let file =
        file.ok_or_else(|| AppError::InvalidInput("Missing file field in form".to_string()))?;

    Ok((file, media_type, description))
}

#[utoipa::path(
    post,
    path = "/media",
    tag = "media",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Media created", body = serde_json::Value),
        (status = 400, description = "Invalid upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (file, media_type, description) = parse_upload_form(multipart).await?;

    if file.data.len() > state.config.max_upload_size_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds max {} bytes",
            file.data.len(),
            state.config.max_upload_size_bytes
        ))
        .into());
    }

    let media = state.lifecycle.create(file, media_type, description).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Media uploaded", media)),
    ))
}
