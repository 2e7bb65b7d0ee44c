//! Maintenance endpoints mirroring the offline CLI scans

use crate::error::{ErrorResponse, HttpAppError};
use crate::responses::ApiResponse;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/media/file-status",
    tag = "maintenance",
    responses(
        (status = 200, description = "File status report", body = serde_json::Value),
        (status = 500, description = "Scan failed", body = ErrorResponse)
    )
)]
pub async fn file_status(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state.reconcile.scan_missing().await?;

    let missing: Vec<_> = report
        .missing
        .iter()
        .map(|m| json!({ "id": m.id, "uuid": m.uuid, "path": m.path }))
        .collect();

    Ok(Json(json!(ApiResponse::ok(
        "File status scanned",
        json!({
            "total": report.total(),
            "existing": report.existing.len(),
            "missing": report.missing.len(),
            "missing_items": missing,
        })
    ))))
}

#[utoipa::path(
    post,
    path = "/media/cleanup-orphaned",
    tag = "maintenance",
    responses(
        (status = 200, description = "Orphaned files removed", body = serde_json::Value),
        (status = 500, description = "Cleanup failed", body = ErrorResponse)
    )
)]
pub async fn cleanup_orphaned(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let report = state.reconcile.scan_orphans().await?;
    let freed_bytes = report.total_bytes();
    let deleted_files: Vec<String> = report.orphans.iter().map(|o| o.path.clone()).collect();

    let (deleted, failed) = state.reconcile.delete_orphans(&report).await?;

    Ok(Json(json!(ApiResponse::ok(
        format!("{} orphaned files deleted", deleted),
        json!({
            "scanned_files": report.scanned_files,
            "orphans_found": report.orphans.len(),
            "deleted": deleted,
            "failed": failed,
            "freed_bytes": freed_bytes,
            "deleted_files": deleted_files,
        })
    ))))
}
