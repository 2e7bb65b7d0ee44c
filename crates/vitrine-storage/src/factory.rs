//! Storage factory

use crate::local::LocalStorage;
use crate::traits::{Storage, StorageError, StorageResult};
use std::sync::Arc;
use vitrine_core::Config;

/// Build the storage backend selected by configuration.
///
/// Only the local "public" disk is supported today; the factory exists so
/// callers depend on `Arc<dyn Storage>` rather than a concrete backend.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.disk.as_str() {
        "public" | "local" => {
            let storage = LocalStorage::new(
                config.disk.clone(),
                config.storage_path.clone(),
                config.base_url.clone(),
            )
            .await?;
            Ok(Arc::new(storage))
        }
        other => Err(StorageError::ConfigError(format!(
            "Unknown storage disk: {}",
            other
        ))),
    }
}
