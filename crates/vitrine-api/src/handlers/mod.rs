pub mod health;
pub mod maintenance;
pub mod media_delete;
pub mod media_get;
pub mod media_replace;
pub mod media_upload;
pub mod slideshow;
