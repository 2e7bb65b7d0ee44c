//! Reconciliation scans
//!
//! Two drift directions between the `medias` table and the disk:
//! rows whose file is gone (missing files), and files no live row
//! references (orphans). Scans only report; the delete methods act on a
//! report the caller has seen.

use std::collections::HashSet;
use std::sync::Arc;
use vitrine_core::{AppError, Media};
use vitrine_db::MediaStore;
use vitrine_storage::Storage;

/// Result of the missing-file scan.
#[derive(Debug, Clone, Default)]
pub struct FileStatusReport {
    pub existing: Vec<Media>,
    pub missing: Vec<Media>,
}

impl FileStatusReport {
    pub fn total(&self) -> usize {
        self.existing.len() + self.missing.len()
    }
}

/// A file on the disk with no live record referencing it.
#[derive(Debug, Clone)]
pub struct OrphanFile {
    pub path: String,
    pub size: u64,
}

/// Result of the orphaned-file scan.
#[derive(Debug, Clone, Default)]
pub struct OrphanReport {
    pub orphans: Vec<OrphanFile>,
    pub scanned_files: usize,
}

impl OrphanReport {
    pub fn total_bytes(&self) -> u64 {
        self.orphans.iter().map(|o| o.size).sum()
    }
}

#[derive(Clone)]
pub struct ReconciliationService {
    store: Arc<dyn MediaStore>,
    storage: Arc<dyn Storage>,
    upload_root: String,
}

impl ReconciliationService {
    pub fn new(store: Arc<dyn MediaStore>, storage: Arc<dyn Storage>, upload_root: String) -> Self {
        Self {
            store,
            storage,
            upload_root,
        }
    }

    /// Partition every live record by whether its file is on the disk.
    pub async fn scan_missing(&self) -> Result<FileStatusReport, AppError> {
        let rows = self.store.list_all().await?;
        let mut report = FileStatusReport::default();

        for media in rows {
            let exists = self
                .storage
                .exists(&media.path)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
            if exists {
                report.existing.push(media);
            } else {
                report.missing.push(media);
            }
        }

        tracing::info!(
            existing = report.existing.len(),
            missing = report.missing.len(),
            "Missing-file scan complete"
        );

        Ok(report)
    }

    /// Soft-delete the rows a scan found without files. There is no file to
    /// remove, so this is a row-only delete.
    pub async fn delete_missing(&self, report: &FileStatusReport) -> Result<usize, AppError> {
        let mut deleted = 0;
        for media in &report.missing {
            if self.store.soft_delete(media.id).await? {
                deleted += 1;
                tracing::info!(media_id = media.id, path = %media.path, "Deleted record with missing file");
            }
        }
        Ok(deleted)
    }

    /// Find files under the upload root that no live record references.
    ///
    /// Membership is exact string equality on `path`; one pass over the
    /// table and one over the directory listing.
    pub async fn scan_orphans(&self) -> Result<OrphanReport, AppError> {
        let referenced: HashSet<String> = self.store.referenced_paths().await?.into_iter().collect();

        let files = self
            .storage
            .list_all(&self.upload_root)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let mut report = OrphanReport {
            scanned_files: files.len(),
            ..Default::default()
        };

        for path in files {
            if referenced.contains(&path) {
                continue;
            }
            let size = self.storage.size(&path).await.unwrap_or(0);
            report.orphans.push(OrphanFile { path, size });
        }

        tracing::info!(
            scanned = report.scanned_files,
            orphans = report.orphans.len(),
            orphan_bytes = report.total_bytes(),
            "Orphaned-file scan complete"
        );

        Ok(report)
    }

    /// Delete the files an orphan scan reported. Returns (deleted, failed).
    pub async fn delete_orphans(&self, report: &OrphanReport) -> Result<(usize, usize), AppError> {
        let mut deleted = 0;
        let mut failed = 0;

        for orphan in &report.orphans {
            match self.storage.delete(&orphan.path).await {
                Ok(()) => {
                    deleted += 1;
                    tracing::info!(path = %orphan.path, "Deleted orphaned file");
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(path = %orphan.path, error = %e, "Failed to delete orphaned file");
                }
            }
        }

        Ok((deleted, failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{MediaLifecycleService, UploadedFile};
    use crate::test_helpers::{MockMediaStore, MockStorage};

    fn services() -> (
        ReconciliationService,
        MediaLifecycleService,
        MockMediaStore,
        MockStorage,
    ) {
        let store = MockMediaStore::new();
        let storage = MockStorage::new();
        let reconcile = ReconciliationService::new(
            Arc::new(store.clone()),
            Arc::new(storage.clone()),
            "uploads".to_string(),
        );
        let lifecycle = MediaLifecycleService::new(
            Arc::new(store.clone()),
            Arc::new(storage.clone()),
            "uploads".to_string(),
        );
        (reconcile, lifecycle, store, storage)
    }

    fn upload(name: &str) -> UploadedFile {
        UploadedFile {
            original_name: name.to_string(),
            content_type: None,
            data: b"data".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_scan_missing_partitions_rows() {
        let (reconcile, lifecycle, _, storage) = services();

        let kept = lifecycle.create(upload("kept.jpg"), None, None).await.unwrap();
        let lost = lifecycle.create(upload("lost.jpg"), None, None).await.unwrap();
        storage.delete(&lost.path).await.unwrap();

        let report = reconcile.scan_missing().await.unwrap();
        assert_eq!(report.total(), 2);
        assert_eq!(report.existing.len(), 1);
        assert_eq!(report.existing[0].id, kept.id);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].id, lost.id);
    }

    #[tokio::test]
    async fn test_delete_missing_soft_deletes_rows() {
        let (reconcile, lifecycle, store, storage) = services();

        let lost = lifecycle.create(upload("lost.jpg"), None, None).await.unwrap();
        storage.delete(&lost.path).await.unwrap();

        let report = reconcile.scan_missing().await.unwrap();
        let deleted = reconcile.delete_missing(&report).await.unwrap();

        assert_eq!(deleted, 1);
        assert!(store.get(lost.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_orphan_scan_reports_only_unreferenced_files() {
        let (reconcile, lifecycle, _, storage) = services();

        lifecycle.create(upload("ref.jpg"), None, None).await.unwrap();
        storage.add_file("uploads/stray.jpg", b"stray bytes".to_vec());

        let report = reconcile.scan_orphans().await.unwrap();
        assert_eq!(report.scanned_files, 2);
        assert_eq!(report.orphans.len(), 1);
        assert_eq!(report.orphans[0].path, "uploads/stray.jpg");
        assert_eq!(report.orphans[0].size, 11);
        assert_eq!(report.total_bytes(), 11);
    }

    #[tokio::test]
    async fn test_delete_orphans_removes_files() {
        let (reconcile, lifecycle, _, storage) = services();

        let kept = lifecycle.create(upload("ref.jpg"), None, None).await.unwrap();
        storage.add_file("uploads/stray.jpg", b"x".to_vec());

        let report = reconcile.scan_orphans().await.unwrap();
        let (deleted, failed) = reconcile.delete_orphans(&report).await.unwrap();

        assert_eq!((deleted, failed), (1, 0));
        assert!(!storage.exists("uploads/stray.jpg").await.unwrap());
        assert!(storage.exists(&kept.path).await.unwrap());

        // A second scan finds nothing
        let report = reconcile.scan_orphans().await.unwrap();
        assert!(report.orphans.is_empty());
    }

    #[tokio::test]
    async fn test_soft_deleted_rows_do_not_protect_files() {
        let (reconcile, lifecycle, store, storage) = services();

        let media = lifecycle.create(upload("old.jpg"), None, None).await.unwrap();
        // Soft delete via the store directly, leaving the file in place
        store.soft_delete(media.id).await.unwrap();
        storage.add_file(&media.path, b"data".to_vec());

        let report = reconcile.scan_orphans().await.unwrap();
        assert_eq!(report.orphans.len(), 1);
        assert_eq!(report.orphans[0].path, media.path);
    }
}
