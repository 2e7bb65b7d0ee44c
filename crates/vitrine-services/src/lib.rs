//! Vitrine Services Layer
//!
//! This crate is the **business service layer**: the media lifecycle
//! (create/replace/delete), the reconciliation scans that keep the `medias`
//! table and the storage disk in agreement, and the slideshow feed with its
//! fixed-TTL cache. Keep orchestration here; keep thin HTTP handling in
//! vitrine-api.

pub mod cache;
pub mod lifecycle;
pub mod metadata;
pub mod reconcile;
pub mod slideshow;
pub mod test_helpers;

pub use cache::TtlCache;
pub use lifecycle::{BulkDeleteOutcome, MediaLifecycleService, UploadedFile};
pub use reconcile::{FileStatusReport, OrphanFile, OrphanReport, ReconciliationService};
pub use slideshow::SlideshowService;
