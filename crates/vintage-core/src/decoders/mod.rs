//! Image decoders for the supported source formats.
//!
//! Every decoder produces a [`PixelBuffer`] in B, G, R, A order. Grayscale
//! sources are replicated into all three color channels, missing alpha is
//! filled with 255, and 16-bit samples keep their high byte.

mod png;
mod tiff;


use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::error::{Result, VintageError};

/// File extensions the loader understands.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

/// Decode an image from a file path.
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| VintageError::Decode(format!("no file extension: {}", path.display())))?;

    match extension.as_str() {
        "png" => png::decode_png(path),
        "tif" | "tiff" => tiff::decode_tiff(path),
        _ => Err(VintageError::Decode(format!(
            "unsupported file format: {}",
            extension
        ))),
    }
}

/// Pack interleaved 8-bit samples (gray, gray+alpha, RGB, or RGBA) into BGRA.
pub(crate) fn pack_bgra(
    width: u32,
    height: u32,
    samples: &[u8],
    channels: usize,
) -> Result<PixelBuffer> {
    if !(1..=4).contains(&channels) {
        return Err(VintageError::Decode(format!(
            "unsupported channel count: {}",
            channels
        )));
    }
    let pixels = width as usize * height as usize;
    if samples.len() != pixels * channels {
        return Err(VintageError::Decode(format!(
            "sample buffer size mismatch: expected {}, got {}",
            pixels * channels,
            samples.len()
        )));
    }

    let mut data = Vec::with_capacity(pixels * 4);
    for px in samples.chunks_exact(channels) {
        let (r, g, b, a) = match channels {
            1 => (px[0], px[0], px[0], 255),
            2 => (px[0], px[0], px[0], px[1]),
            3 => (px[0], px[1], px[2], 255),
            _ => (px[0], px[1], px[2], px[3]),
        };
        data.extend_from_slice(&[b, g, r, a]);
    }

    PixelBuffer::from_bgra(width, height, data)
}
