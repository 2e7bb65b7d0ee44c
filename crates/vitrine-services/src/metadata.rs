//! Media metadata extraction

use image::{GenericImageView, ImageReader};
use serde_json::{json, Value as JsonValue};
use std::io::Cursor;

/// Decode an image and report width, height, and aspect ratio.
///
/// Returns `None` when the bytes do not decode as a supported image; callers
/// treat that as non-fatal and fall back to size-only metadata.
pub fn image_metadata(data: &[u8]) -> Option<JsonValue> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    let img = reader.decode().ok()?;
    let (width, height) = img.dimensions();

    let aspect_ratio = if height > 0 {
        Some(width as f64 / height as f64)
    } else {
        None
    };

    Some(json!({
        "width": width,
        "height": height,
        "aspect_ratio": aspect_ratio,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut cursor = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_image_metadata_dimensions() {
        let meta = image_metadata(&png_bytes(4, 2)).unwrap();
        assert_eq!(meta["width"], 4);
        assert_eq!(meta["height"], 2);
        assert_eq!(meta["aspect_ratio"], 2.0);
    }

    #[test]
    fn test_non_image_yields_none() {
        assert!(image_metadata(b"not an image").is_none());
    }
}
