//! Vitrine Database Library
//!
//! Repositories for the data access layer. The admin panel, the public
//! endpoints, and the maintenance CLI all go through [`MediaStore`], so
//! services can be tested against an in-memory implementation.

pub mod media;
pub mod traits;
pub mod transaction;

pub use media::MediaRepository;
pub use traits::{MediaFileUpdate, MediaStore};
pub use transaction::with_transaction;
