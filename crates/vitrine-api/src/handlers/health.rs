use axum::Json;
use serde_json::{json, Value as JsonValue};

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = serde_json::Value))
)]
pub async fn health() -> Json<JsonValue> {
    Json(json!({ "status": "ok" }))
}
