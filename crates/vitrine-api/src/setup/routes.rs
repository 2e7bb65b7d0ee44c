//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::middleware::rate_limit::{rate_limit_middleware, RateLimiter};
use crate::middleware::security_headers::security_headers_middleware;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use vitrine_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit_per_minute));

    // Public slideshow feed carries its own per-IP rate limit
    let slideshow_routes = Router::new()
        .route("/slideshow/media", get(handlers::slideshow::slideshow_media))
        .layer(axum::middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let admin_routes = Router::new()
        .route("/media", get(handlers::media_get::get_media))
        .route("/media", post(handlers::media_upload::upload_media))
        .route(
            "/media/file-status",
            get(handlers::maintenance::file_status),
        )
        .route(
            "/media/cleanup-orphaned",
            post(handlers::maintenance::cleanup_orphaned),
        )
        .route(
            "/media/bulk-delete",
            post(handlers::media_delete::bulk_delete_media),
        )
        .route(
            "/media/{id}/file",
            put(handlers::media_replace::replace_media_file),
        )
        .route(
            "/media/{id}/force",
            delete(handlers::media_delete::force_delete_media),
        )
        .route("/media/{id}", delete(handlers::media_delete::delete_media));

    let app = Router::new()
        .merge(slideshow_routes)
        .merge(admin_routes)
        .route("/health", get(handlers::health::health))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(RequestBodyLimitLayer::new(
            // Multipart framing overhead on top of the file itself
            config.max_upload_size_bytes + 64 * 1024,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.is_empty() || config.cors_origins.contains(&"*".to_string())
    {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins in production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
    };
    Ok(cors)
}
