//! Image-upload processing for the privileged-process bridge.
//!
//! Accepts a base64 payload plus mime type, decodes it, produces a
//! 200×200 cover-cropped thumbnail, and returns both original and
//! thumbnail as `data:` URLs so the UI process never touches the
//! filesystem.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{ImageFormat, imageops::FilterType};
use serde::Serialize;

use crate::error::BridgeError;

/// Thumbnail edge length in pixels.
const THUMBNAIL_SIZE: u32 = 200;

/// Result of processing an uploaded image.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedImage {
    /// Original image as a `data:` URL.
    pub original: String,
    /// Cover-cropped thumbnail as a `data:` URL.
    pub thumbnail: String,
    /// Generated filename (random, with the proper extension).
    pub filename: String,
    /// File extension derived from the mime type.
    pub ext: String,
}

/// Decodes, thumbnails, and re-encodes an uploaded image.
///
/// # Errors
///
/// Returns [`BridgeError::UnsupportedType`] for mime types outside
/// jpeg/png/webp and [`BridgeError::InvalidImage`] when the payload is
/// not valid base64 or not a decodable image.
pub fn process_upload(base64_data: &str, mime: &str) -> Result<UploadedImage, BridgeError> {
    let format = format_for_mime(mime)?;
    let ext = mime.split('/').nth(1).unwrap_or("png").to_string();

    let bytes = BASE64
        .decode(base64_data)
        .map_err(|e| BridgeError::InvalidImage(e.to_string()))?;
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| BridgeError::InvalidImage(e.to_string()))?;

    let thumbnail = decoded.resize_to_fill(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);
    let mut thumbnail_bytes = Cursor::new(Vec::new());
    thumbnail
        .write_to(&mut thumbnail_bytes, format)
        .map_err(|e| BridgeError::InvalidImage(e.to_string()))?;

    let thumbnail_b64 = BASE64.encode(thumbnail_bytes.into_inner());

    Ok(UploadedImage {
        original: format!("data:{mime};base64,{base64_data}"),
        thumbnail: format!("data:{mime};base64,{thumbnail_b64}"),
        filename: format!("{}.{ext}", uuid::Uuid::new_v4()),
        ext,
    })
}

/// Maps a mime type onto the encoder format.
fn format_for_mime(mime: &str) -> Result<ImageFormat, BridgeError> {
    match mime {
        "image/jpeg" | "image/jpg" => Ok(ImageFormat::Jpeg),
        "image/png" => Ok(ImageFormat::Png),
        "image/webp" => Ok(ImageFormat::WebP),
        other => Err(BridgeError::UnsupportedType(other.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn sample_png_base64(width: u32, height: u32) -> String {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([200, 120, 40]),
        ));
        let mut bytes = Cursor::new(Vec::new());
        let Ok(()) = img.write_to(&mut bytes, ImageFormat::Png) else {
            panic!("test image must encode");
        };
        BASE64.encode(bytes.into_inner())
    }

    #[test]
    fn produces_cover_cropped_thumbnail() {
        let payload = sample_png_base64(400, 300);
        let Ok(upload) = process_upload(&payload, "image/png") else {
            panic!("upload must process");
        };

        assert!(upload.original.starts_with("data:image/png;base64,"));
        assert!(upload.thumbnail.starts_with("data:image/png;base64,"));
        assert_eq!(upload.ext, "png");
        assert!(upload.filename.ends_with(".png"));

        let Some(b64) = upload.thumbnail.split(',').nth(1) else {
            panic!("thumbnail data url must contain payload");
        };
        let Ok(bytes) = BASE64.decode(b64) else {
            panic!("thumbnail payload must be base64");
        };
        let Ok(thumb) = image::load_from_memory(&bytes) else {
            panic!("thumbnail must decode");
        };
        assert_eq!(thumb.width(), THUMBNAIL_SIZE);
        assert_eq!(thumb.height(), THUMBNAIL_SIZE);
    }

    #[test]
    fn rejects_unsupported_mime_type() {
        let payload = sample_png_base64(10, 10);
        assert!(matches!(
            process_upload(&payload, "image/tiff"),
            Err(BridgeError::UnsupportedType(_))
        ));
    }

    #[test]
    fn rejects_garbage_payload() {
        assert!(matches!(
            process_upload("not-base64!!!", "image/png"),
            Err(BridgeError::InvalidImage(_))
        ));
        let bogus = BASE64.encode(b"plain text, not an image");
        assert!(matches!(
            process_upload(&bogus, "image/png"),
            Err(BridgeError::InvalidImage(_))
        ));
    }
}
