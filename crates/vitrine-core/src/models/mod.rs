pub mod media;
pub mod pagination;

pub use media::{Media, MediaType, NewMedia, Slide};
pub use pagination::Pagination;
