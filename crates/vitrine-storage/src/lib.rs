//! Vitrine Storage Library
//!
//! Storage abstraction and backends. Files are addressed by relative path
//! strings (e.g. `uploads/{uuid}.jpg`); paths must not contain `..` or a
//! leading `/`. The `Storage` trait covers everything the media lifecycle
//! and the reconciliation scans need: write, existence, size, public URL,
//! delete, copy, rename, and recursive listing.

pub mod factory;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
