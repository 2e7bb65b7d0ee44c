//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// A named logical disk holding uploaded files. The media lifecycle and the
/// reconciliation scans work against this trait so they stay decoupled from
/// the physical backend.
///
/// **Path format:** relative, `/`-separated, no `..` segments and no leading
/// slash. Uploads live under the configured upload root (e.g.
/// `uploads/{uuid}.{ext}`).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a file at `path`, creating parent directories as needed.
    /// Returns the public URL of the stored file.
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Check if a file exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Size in bytes of the file at `path`.
    async fn size(&self, path: &str) -> StorageResult<u64>;

    /// Public URL for the file at `path` (no existence check).
    fn url(&self, path: &str) -> String;

    /// Delete the file at `path`. Deleting a missing file succeeds.
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// Copy a file from one path to another. Returns the destination URL.
    async fn copy(&self, from: &str, to: &str) -> StorageResult<String>;

    /// Move a file from one path to another. Returns the destination URL.
    async fn rename(&self, from: &str, to: &str) -> StorageResult<String>;

    /// List all files under `prefix`, recursively, as relative paths.
    /// A missing prefix directory yields an empty list.
    async fn list_all(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Logical disk name (e.g. "public"), recorded on media rows.
    fn disk_name(&self) -> &str;
}
