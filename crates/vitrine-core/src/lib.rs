//! Vitrine Core Library
//!
//! This crate provides core domain models, error types, configuration, and the
//! MIME/type classification tables shared across all Vitrine components.

pub mod classify;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::media::{Media, MediaType, NewMedia, Slide};
pub use models::pagination::Pagination;
