//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vitrine_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vitrine API",
        version = "0.1.0",
        description = "Media management API: admin CRUD over uploaded media, reconciliation scans, and a public cached slideshow feed."
    ),
    paths(
        handlers::media_get::get_media,
        handlers::media_upload::upload_media,
        handlers::media_replace::replace_media_file,
        handlers::media_delete::delete_media,
        handlers::media_delete::force_delete_media,
        handlers::media_delete::bulk_delete_media,
        handlers::maintenance::file_status,
        handlers::maintenance::cleanup_orphaned,
        handlers::slideshow::slideshow_media,
        handlers::health::health,
    ),
    components(schemas(
        models::media::Media,
        models::media::MediaType,
        models::media::Slide,
        models::pagination::Pagination,
        error::ErrorResponse,
        handlers::media_delete::BulkDeleteRequest,
    )),
    tags(
        (name = "media", description = "Admin media management"),
        (name = "maintenance", description = "Reconciliation scans"),
        (name = "slideshow", description = "Public slideshow feed"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
