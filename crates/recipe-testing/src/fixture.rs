//! Sample upload payloads.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};

/// Encode a solid `width` x `height` RGB image in the given format.
///
/// Panics if the encoder for `format` is not compiled in.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format)
        .unwrap_or_else(|e| panic!("failed to encode {format:?} fixture: {e}"));
    buf.into_inner()
}

/// A 10x10 JPEG.
pub fn sample_jpeg() -> Vec<u8> {
    image_bytes(10, 10, ImageFormat::Jpeg)
}

/// A 10x10 PNG.
pub fn sample_png() -> Vec<u8> {
    image_bytes(10, 10, ImageFormat::Png)
}
