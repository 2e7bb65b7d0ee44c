//! MIME and media-type classification tables.
//!
//! Pure lookup functions: extension to MIME type, MIME type to [`MediaType`],
//! and the fixed extension allow-lists used by the query endpoint and the
//! slideshow filter. Unknown inputs fall back to `application/octet-stream`
//! and [`MediaType::Other`].

use crate::models::media::MediaType;

/// Extensions the slideshow endpoint and player accept.
pub const SLIDESHOW_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "mp4", "webm"];

/// Image extensions recognized by extension-based classification.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Video extensions recognized by extension-based classification.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "avi", "mov", "mkv"];

/// Map a file extension (without dot, any case) to a MIME type.
pub fn mime_type_from_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

/// MIME types classified as documents (beyond the `image/`, `video/`, `audio/` prefixes).
const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/plain",
];

/// Classify a MIME type into a [`MediaType`]. Fallback is `Other`.
pub fn media_type_from_mime(mime_type: &str) -> MediaType {
    if mime_type.starts_with("image/") {
        MediaType::Image
    } else if mime_type.starts_with("video/") {
        MediaType::Video
    } else if mime_type.starts_with("audio/") {
        MediaType::Audio
    } else if DOCUMENT_MIME_TYPES.contains(&mime_type) {
        MediaType::Document
    } else {
        MediaType::Other
    }
}

/// Classify a file extension into a [`MediaType`] via its MIME type.
pub fn media_type_from_extension(extension: &str) -> MediaType {
    media_type_from_mime(mime_type_from_extension(extension))
}

/// Lowercased extension of a relative path, empty string when absent.
pub fn extension_of(path: &str) -> String {
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Final path segment (the file name).
pub fn filename_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether the extension is allowed in the slideshow rotation.
pub fn is_slideshow_extension(extension: &str) -> bool {
    SLIDESHOW_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type_from_extension("jpg"), "image/jpeg");
        assert_eq!(mime_type_from_extension("JPEG"), "image/jpeg");
        assert_eq!(mime_type_from_extension("mp4"), "video/mp4");
        assert_eq!(mime_type_from_extension("pdf"), "application/pdf");
        assert_eq!(mime_type_from_extension("xyz"), "application/octet-stream");
    }

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(media_type_from_mime("image/png"), MediaType::Image);
        assert_eq!(media_type_from_mime("video/webm"), MediaType::Video);
        assert_eq!(media_type_from_mime("audio/ogg"), MediaType::Audio);
        assert_eq!(media_type_from_mime("application/pdf"), MediaType::Document);
        assert_eq!(media_type_from_mime("text/plain"), MediaType::Document);
        assert_eq!(
            media_type_from_mime("application/x-tar"),
            MediaType::Other
        );
    }

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(media_type_from_extension("webp"), MediaType::Image);
        assert_eq!(media_type_from_extension("mkv"), MediaType::Video);
        assert_eq!(media_type_from_extension("docx"), MediaType::Document);
        assert_eq!(media_type_from_extension("bin"), MediaType::Other);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("uploads/sample1.JPG"), "jpg");
        assert_eq!(extension_of("uploads/archive.tar.gz"), "gz");
        assert_eq!(extension_of("uploads/noext"), "");
        assert_eq!(extension_of("sample-images/sample1.jpg"), "jpg");
    }

    #[test]
    fn test_filename_of() {
        assert_eq!(filename_of("uploads/a/b/pic.png"), "pic.png");
        assert_eq!(filename_of("pic.png"), "pic.png");
    }

    #[test]
    fn test_slideshow_allow_list() {
        for ext in ["jpg", "jpeg", "png", "gif", "webp", "mp4", "webm"] {
            assert!(is_slideshow_extension(ext), "{} should be allowed", ext);
        }
        for ext in ["bmp", "avi", "mov", "mkv", "svg", "pdf", ""] {
            assert!(!is_slideshow_extension(ext), "{} should be rejected", ext);
        }
    }
}
