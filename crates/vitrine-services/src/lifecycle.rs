//! Media lifecycle service
//!
//! Owns the create/replace/delete flows that touch both the `medias` table
//! and the storage disk. File writes happen before the row insert so a
//! failed insert can clean up after itself; file deletes are best-effort
//! and never block the row delete.

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use vitrine_core::classify::{extension_of, media_type_from_mime, mime_type_from_extension};
use vitrine_core::{AppError, ErrorMetadata, Media, MediaType, NewMedia};
use vitrine_db::{MediaFileUpdate, MediaStore};
use vitrine_storage::Storage;

use crate::metadata::image_metadata;

/// A file received from a client, before any record exists for it.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    /// Content type as claimed by the client; used only when the extension
    /// table has no mapping.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Per-id result of a bulk delete.
#[derive(Debug, Clone, Default)]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<i64>,
    pub failed: Vec<(i64, String)>,
}

impl BulkDeleteOutcome {
    pub fn is_partial_failure(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn message(&self) -> String {
        if self.failed.is_empty() {
            format!("{} media deleted", self.deleted.len())
        } else {
            format!(
                "{} media deleted, {} failed",
                self.deleted.len(),
                self.failed.len()
            )
        }
    }
}

#[derive(Clone)]
pub struct MediaLifecycleService {
    store: Arc<dyn MediaStore>,
    storage: Arc<dyn Storage>,
    /// Directory (relative to the disk root) new uploads are written to.
    upload_root: String,
}

impl MediaLifecycleService {
    pub fn new(store: Arc<dyn MediaStore>, storage: Arc<dyn Storage>, upload_root: String) -> Self {
        Self {
            store,
            storage,
            upload_root,
        }
    }

    fn validate(upload: &UploadedFile) -> Result<String, AppError> {
        if upload.data.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
        }
        let extension = extension_of(&upload.original_name);
        if extension.is_empty() {
            return Err(AppError::InvalidInput(
                "Uploaded filename must have an extension".to_string(),
            ));
        }
        Ok(extension)
    }

    fn resolve_mime(upload: &UploadedFile, extension: &str) -> String {
        let mapped = mime_type_from_extension(extension);
        if mapped == "application/octet-stream" {
            if let Some(claimed) = &upload.content_type {
                if !claimed.is_empty() {
                    return claimed.clone();
                }
            }
        }
        mapped.to_string()
    }

    /// Width/height for images, size-only metadata for everything else.
    /// Decode failures are logged and fall back to size-only.
    fn extract_metadata(
        media_type: MediaType,
        data: &[u8],
        original_name: &str,
    ) -> serde_json::Value {
        if media_type == MediaType::Image {
            match image_metadata(data) {
                Some(meta) => return meta,
                None => {
                    tracing::debug!(
                        original_name = %original_name,
                        "Image metadata extraction failed, storing size only"
                    );
                }
            }
        }
        json!({ "file_size": data.len() })
    }

    /// Store an uploaded file and create its media record.
    pub async fn create(
        &self,
        upload: UploadedFile,
        media_type: Option<MediaType>,
        description: Option<String>,
    ) -> Result<Media, AppError> {
        let extension = Self::validate(&upload)?;
        let mime_type = Self::resolve_mime(&upload, &extension);
        let media_type = match media_type {
            Some(t) if t != MediaType::Other => t,
            _ => media_type_from_mime(&mime_type),
        };

        let uuid = Uuid::new_v4();
        let filename = format!("{}.{}", uuid, extension);
        let path = format!("{}/{}", self.upload_root, filename);
        let size = upload.data.len() as i64;
        let metadata = Self::extract_metadata(media_type, &upload.data, &upload.original_name);

        let url = self
            .storage
            .put(&path, upload.data, &mime_type)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let new_media = NewMedia {
            uuid,
            filename,
            original_name: upload.original_name,
            mime_type,
            extension,
            size,
            disk: self.storage.disk_name().to_string(),
            path: path.clone(),
            url: Some(url),
            media_type,
            metadata: Some(metadata),
            description,
        };

        match self.store.insert(new_media).await {
            Ok(media) => {
                tracing::info!(
                    media_id = media.id,
                    media_uuid = %media.uuid,
                    path = %media.path,
                    size_bytes = media.size,
                    "Media created"
                );
                Ok(media)
            }
            Err(e) => {
                // The row never existed, so the file must not linger.
                if let Err(cleanup_err) = self.storage.delete(&path).await {
                    tracing::warn!(
                        path = %path,
                        error = %cleanup_err,
                        "Failed to clean up file after insert failure"
                    );
                }
                Err(e)
            }
        }
    }

    /// Replace the stored file of an existing record, recomputing every
    /// derived field. The old file is removed best-effort.
    pub async fn replace(&self, media: &Media, upload: UploadedFile) -> Result<Media, AppError> {
        let extension = Self::validate(&upload)?;
        let mime_type = Self::resolve_mime(&upload, &extension);
        let media_type = media_type_from_mime(&mime_type);

        let filename = format!("{}.{}", media.uuid, extension);
        let path = format!("{}/{}", self.upload_root, filename);
        let size = upload.data.len() as i64;
        let metadata = Self::extract_metadata(media_type, &upload.data, &upload.original_name);

        if media.path != path {
            if let Err(e) = self.storage.delete(&media.path).await {
                tracing::warn!(
                    media_id = media.id,
                    path = %media.path,
                    error = %e,
                    "Failed to delete previous file during replace"
                );
            }
        }

        let url = self
            .storage
            .put(&path, upload.data, &mime_type)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let update = MediaFileUpdate {
            filename,
            original_name: upload.original_name,
            mime_type,
            extension,
            size,
            path,
            url: Some(url),
            media_type,
            metadata: Some(metadata),
        };

        let updated = self
            .store
            .update_file(media.id, update)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Media {} not found", media.id)))?;

        tracing::info!(
            media_id = updated.id,
            path = %updated.path,
            "Media file replaced"
        );

        Ok(updated)
    }

    /// Delete a media record. `hard` removes the row outright; otherwise the
    /// row is soft-deleted. Either way the stored file is removed
    /// best-effort first.
    ///
    /// Returns whether a live row was deleted.
    pub async fn delete(&self, id: i64, hard: bool) -> Result<bool, AppError> {
        let media = match self.store.get(id).await? {
            Some(m) => m,
            None => return Ok(false),
        };

        if let Err(e) = self.storage.delete(&media.path).await {
            tracing::warn!(
                media_id = id,
                path = %media.path,
                error = %e,
                "Failed to delete file, removing record anyway"
            );
        }

        let deleted = if hard {
            self.store.hard_delete(id).await?
        } else {
            self.store.soft_delete(id).await?
        };

        if deleted {
            tracing::info!(media_id = id, hard = hard, "Media deleted");
        }

        Ok(deleted)
    }

    /// Delete several records, collecting per-id outcomes instead of
    /// stopping on the first failure.
    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<BulkDeleteOutcome, AppError> {
        let mut outcome = BulkDeleteOutcome::default();

        for &id in ids {
            match self.delete(id, false).await {
                Ok(true) => outcome.deleted.push(id),
                Ok(false) => outcome
                    .failed
                    .push((id, format!("Media {} not found", id))),
                Err(e) => {
                    tracing::error!(media_id = id, error = %e, "Bulk delete item failed");
                    outcome.failed.push((id, e.client_message()));
                }
            }
        }

        Ok(outcome)
    }

    /// Whether the record's file is present on the disk.
    pub async fn file_exists(&self, media: &Media) -> Result<bool, AppError> {
        self.storage
            .exists(&media.path)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockMediaStore, MockStorage};

    fn service() -> (MediaLifecycleService, MockMediaStore, MockStorage) {
        let store = MockMediaStore::new();
        let storage = MockStorage::new();
        let service = MediaLifecycleService::new(
            Arc::new(store.clone()),
            Arc::new(storage.clone()),
            "uploads".to_string(),
        );
        (service, store, storage)
    }

    fn upload(name: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            content_type: None,
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_create_stores_file_and_row() {
        let (service, _store, _storage) = service();

        let media = service
            .create(upload("photo.JPG", b"fake jpeg"), None, None)
            .await
            .unwrap();

        assert_eq!(media.extension, "jpg");
        assert_eq!(media.mime_type, "image/jpeg");
        assert_eq!(media.media_type, MediaType::Image);
        assert_eq!(media.original_name, "photo.JPG");
        assert_eq!(media.path, format!("uploads/{}.jpg", media.uuid));
        assert_eq!(media.size, 9);
        assert!(service.file_exists(&media).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_and_extensionless() {
        let (service, _, _) = service();

        let err = service.create(upload("a.jpg", b""), None, None).await;
        assert!(matches!(err, Err(AppError::InvalidInput(_))));

        let err = service.create(upload("noext", b"data"), None, None).await;
        assert!(matches!(err, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_extension_falls_back_to_other() {
        let (service, _, _) = service();

        let media = service
            .create(upload("blob.xyz", b"data"), None, None)
            .await
            .unwrap();

        assert_eq!(media.mime_type, "application/octet-stream");
        assert_eq!(media.media_type, MediaType::Other);
        assert_eq!(
            media.metadata.unwrap()["file_size"].as_u64(),
            Some(4)
        );
    }

    #[tokio::test]
    async fn test_create_uses_claimed_content_type_when_unmapped() {
        let (service, _, _) = service();

        let mut up = upload("data.xyz", b"data");
        up.content_type = Some("application/x-custom".to_string());
        let media = service.create(up, None, None).await.unwrap();

        assert_eq!(media.mime_type, "application/x-custom");
    }

    #[tokio::test]
    async fn test_delete_removes_file_then_row() {
        let (service, store, storage) = service();

        let media = service
            .create(upload("clip.mp4", b"bytes"), None, None)
            .await
            .unwrap();
        let path = media.path.clone();

        assert!(service.delete(media.id, false).await.unwrap());
        assert!(!storage.exists(&path).await.unwrap());
        assert!(store.get(media.id).await.unwrap().is_none());
        // Soft delete keeps the row
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn test_hard_delete_removes_row_entirely() {
        let (service, store, _) = service();

        let media = service
            .create(upload("clip.mp4", b"bytes"), None, None)
            .await
            .unwrap();

        assert!(service.delete(media.id, true).await.unwrap());
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_id_returns_false() {
        let (service, _, _) = service();
        assert!(!service.delete(999, false).await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_swaps_file_and_derived_fields() {
        let (service, _, storage) = service();

        let media = service
            .create(upload("pic.png", b"png bytes"), None, None)
            .await
            .unwrap();
        let old_path = media.path.clone();

        let updated = service
            .replace(&media, upload("movie.mp4", b"mp4 bytes!"))
            .await
            .unwrap();

        assert_eq!(updated.id, media.id);
        assert_eq!(updated.uuid, media.uuid);
        assert_eq!(updated.extension, "mp4");
        assert_eq!(updated.mime_type, "video/mp4");
        assert_eq!(updated.media_type, MediaType::Video);
        assert_eq!(updated.size, 10);
        assert_eq!(updated.path, format!("uploads/{}.mp4", media.uuid));
        assert!(!storage.exists(&old_path).await.unwrap());
        assert!(storage.exists(&updated.path).await.unwrap());
    }

    #[tokio::test]
    async fn test_bulk_delete_partial_failure() {
        let (service, _, _) = service();

        let a = service
            .create(upload("a.jpg", b"a"), None, None)
            .await
            .unwrap();
        let b = service
            .create(upload("b.jpg", b"b"), None, None)
            .await
            .unwrap();

        let outcome = service.bulk_delete(&[a.id, b.id, 999]).await.unwrap();

        assert_eq!(outcome.deleted, vec![a.id, b.id]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, 999);
        assert!(outcome.is_partial_failure());
        assert_eq!(outcome.message(), "2 media deleted, 1 failed");
    }
}
