//! Image encoding: `DynamicImage` → JPEG [`RasterImage`].
//!
//! The same bytes go to the OCR engine and back to the client as a data URI,
//! so there is one encoding per page. JPEG has no alpha channel; the bitmap
//! is flattened to RGB first.

use crate::output::RasterImage;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

pub const JPEG_MIME: &str = "image/jpeg";

/// Encode a rasterised page as JPEG at `quality` (1–100).
pub fn encode_page(img: &DynamicImage, quality: u8) -> Result<RasterImage, image::ImageError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(&rgb)?;

    debug!(
        "Encoded {}x{} page → {} bytes JPEG (q={})",
        rgb.width(),
        rgb.height(),
        buf.len(),
        quality
    );

    Ok(RasterImage {
        bytes: buf,
        mime_type: JPEG_MIME,
        width: rgb.width(),
        height: rgb.height(),
    })
}
