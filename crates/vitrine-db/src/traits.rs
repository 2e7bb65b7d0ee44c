//! Repository trait for the `medias` table
//!
//! Services depend on this trait rather than on a concrete repository so they
//! can be unit tested with an in-memory store.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;
use vitrine_core::{AppError, Media, MediaType, NewMedia};

/// Fields rewritten together when a media record's file is replaced.
/// `uuid`, `disk`, and `description` are untouched by a replace.
#[derive(Debug, Clone)]
pub struct MediaFileUpdate {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub extension: String,
    pub size: i64,
    pub path: String,
    pub url: Option<String>,
    pub media_type: MediaType,
    pub metadata: Option<JsonValue>,
}

/// Data access for media records.
///
/// All read methods exclude soft-deleted rows. `hard_delete` removes the row
/// regardless of its soft-delete state.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Insert a new media record, returning the stored row.
    async fn insert(&self, media: NewMedia) -> Result<Media, AppError>;

    /// Fetch a media record by numeric id.
    async fn get(&self, id: i64) -> Result<Option<Media>, AppError>;

    /// Fetch a media record by uuid.
    async fn get_by_uuid(&self, uuid: Uuid) -> Result<Option<Media>, AppError>;

    /// List a page of media records, newest first, optionally filtered by
    /// type. Returns the page and the total count matching the filter.
    async fn list(
        &self,
        media_type: Option<MediaType>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Media>, u64), AppError>;

    /// List every media record, newest first. Used by the slideshow filter
    /// and the reconciliation scans.
    async fn list_all(&self) -> Result<Vec<Media>, AppError>;

    /// Rewrite the file columns of an existing record. Returns the updated
    /// row, or `None` when the record does not exist.
    async fn update_file(
        &self,
        id: i64,
        update: MediaFileUpdate,
    ) -> Result<Option<Media>, AppError>;

    /// Soft-delete a record by setting `deleted_at`. Returns whether a live
    /// row was affected.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Permanently remove a record. Returns whether a row was deleted.
    async fn hard_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Storage paths referenced by live records, for the orphaned-file scan.
    async fn referenced_paths(&self) -> Result<Vec<String>, AppError>;
}
