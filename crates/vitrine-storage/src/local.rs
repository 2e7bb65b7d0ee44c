use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    disk: String,
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `disk` - Logical disk name (e.g. "public")
    /// * `base_path` - Root directory for file storage (e.g. "./storage/app/public")
    /// * `base_url` - Base URL files are served from (e.g. "http://localhost:3000")
    pub async fn new(
        disk: impl Into<String>,
        base_path: impl Into<PathBuf>,
        base_url: String,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            disk: disk.into(),
            base_path,
            base_url,
        })
    }

    /// Convert a relative storage path to a filesystem path with security validation.
    ///
    /// Rejects path traversal sequences that could escape the base storage directory.
    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        if path.is_empty()
            || path.starts_with('/')
            || path.split('/').any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidPath(format!(
                "Storage path contains invalid segments: {}",
                path
            )));
        }
        Ok(self.base_path.join(path))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, path: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        let fs_path = self.resolve(path)?;
        let size = data.len();

        self.ensure_parent_dir(&fs_path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&fs_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create file {}: {}",
                fs_path.display(),
                e
            ))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", fs_path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", fs_path.display(), e))
        })?;

        tracing::info!(
            path = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(self.url(path))
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let fs_path = self.resolve(path)?;
        Ok(fs::try_exists(&fs_path).await.unwrap_or(false))
    }

    async fn size(&self, path: &str) -> StorageResult<u64> {
        let fs_path = self.resolve(path)?;
        let meta = fs::metadata(&fs_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(path.to_string())
            } else {
                StorageError::BackendError(e.to_string())
            }
        })?;
        Ok(meta.len())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/storage/{}",
            self.base_url.trim_end_matches('/'),
            path
        )
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let fs_path = self.resolve(path)?;

        if !fs::try_exists(&fs_path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&fs_path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                fs_path.display(),
                e
            ))
        })?;

        tracing::info!(path = %path, "Local storage delete successful");

        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> StorageResult<String> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;

        if !fs::try_exists(&from_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(from.to_string()));
        }

        self.ensure_parent_dir(&to_path).await?;

        fs::copy(&from_path, &to_path).await.map_err(|e| {
            StorageError::BackendError(format!("Failed to copy {} to {}: {}", from, to, e))
        })?;

        tracing::info!(from = %from, to = %to, "Local storage copy successful");

        Ok(self.url(to))
    }

    async fn rename(&self, from: &str, to: &str) -> StorageResult<String> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;

        if !fs::try_exists(&from_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(from.to_string()));
        }

        self.ensure_parent_dir(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            StorageError::BackendError(format!("Failed to move {} to {}: {}", from, to, e))
        })?;

        tracing::info!(from = %from, to = %to, "Local storage move successful");

        Ok(self.url(to))
    }

    async fn list_all(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let root = self.resolve(prefix)?;

        if !fs::try_exists(&root).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut pending = vec![root];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await.map_err(|e| {
                StorageError::BackendError(format!(
                    "Failed to read directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?
            {
                let entry_path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StorageError::BackendError(e.to_string()))?;

                if file_type.is_dir() {
                    pending.push(entry_path);
                } else if file_type.is_file() {
                    let relative = entry_path
                        .strip_prefix(&self.base_path)
                        .map_err(|e| StorageError::BackendError(e.to_string()))?;
                    files.push(relative.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn disk_name(&self) -> &str {
        &self.disk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn test_storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new("public", dir.path(), "http://localhost:3000".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_then_exists_and_size() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let data = b"test data".to_vec();
        let url = storage
            .put("uploads/test.txt", data.clone(), "text/plain")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/storage/uploads/test.txt");
        assert!(storage.exists("uploads/test.txt").await.unwrap());
        assert_eq!(storage.size("uploads/test.txt").await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let result = storage.exists("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        assert!(storage.delete("uploads/nonexistent.txt").await.is_ok());

        storage
            .put("uploads/gone.txt", b"x".to_vec(), "text/plain")
            .await
            .unwrap();
        storage.delete("uploads/gone.txt").await.unwrap();
        assert!(!storage.exists("uploads/gone.txt").await.unwrap());
        assert!(storage.delete("uploads/gone.txt").await.is_ok());
    }

    #[tokio::test]
    async fn test_copy_and_rename() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        storage
            .put("uploads/a.txt", b"original".to_vec(), "text/plain")
            .await
            .unwrap();

        storage.copy("uploads/a.txt", "uploads/b.txt").await.unwrap();
        assert!(storage.exists("uploads/a.txt").await.unwrap());
        assert!(storage.exists("uploads/b.txt").await.unwrap());

        storage
            .rename("uploads/b.txt", "uploads/sub/c.txt")
            .await
            .unwrap();
        assert!(!storage.exists("uploads/b.txt").await.unwrap());
        assert!(storage.exists("uploads/sub/c.txt").await.unwrap());

        let missing = storage.copy("uploads/missing.txt", "uploads/d.txt").await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_all_recursive() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        storage
            .put("uploads/one.jpg", b"1".to_vec(), "image/jpeg")
            .await
            .unwrap();
        storage
            .put("uploads/nested/two.png", b"2".to_vec(), "image/png")
            .await
            .unwrap();
        storage
            .put("elsewhere/three.txt", b"3".to_vec(), "text/plain")
            .await
            .unwrap();

        let files = storage.list_all("uploads").await.unwrap();
        assert_eq!(files, vec!["uploads/nested/two.png", "uploads/one.jpg"]);
    }

    #[tokio::test]
    async fn test_list_all_missing_prefix_is_empty() {
        let dir = tempdir().unwrap();
        let storage = test_storage(&dir).await;

        let files = storage.list_all("uploads").await.unwrap();
        assert!(files.is_empty());
    }
}
