//! Public slideshow feed
//!
//! Returns a bare JSON array, not the admin envelope: the player consumes
//! the list directly. Caching and eligibility filtering live in the service;
//! rate limiting and security headers are layered onto this route in setup.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use vitrine_core::Slide;

#[utoipa::path(
    get,
    path = "/slideshow/media",
    tag = "slideshow",
    responses(
        (status = 200, description = "Current slide rotation", body = [Slide]),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Feed unavailable", body = ErrorResponse)
    )
)]
pub async fn slideshow_media(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let slides = state.slideshow.slides().await?;
    Ok(Json(slides))
}
