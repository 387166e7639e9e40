//! Image exporters.
//!
//! Write a [`PixelBuffer`] to disk as 8-bit RGBA PNG or TIFF.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::{Result, VintageError};

/// Reorder BGRA bytes to RGBA.
pub fn to_rgba(buffer: &PixelBuffer) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(buffer.as_bytes().len());
    for px in buffer.as_bytes().chunks_exact(CHANNELS) {
        rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    rgba
}

/// Export, choosing the format from the file extension (`png`, `tif`, `tiff`).
pub fn export_image<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => export_png(buffer, path),
        "tif" | "tiff" => export_tiff(buffer, path),
        other => Err(VintageError::Encode(format!(
            "unsupported export format: '{}'",
            other
        ))),
    }
}

/// Export to 8-bit RGBA PNG.
pub fn export_png<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| VintageError::Encode(format!("failed to write PNG header: {}", e)))?;
    writer
        .write_image_data(&to_rgba(buffer))
        .map_err(|e| VintageError::Encode(format!("failed to write PNG data: {}", e)))?;
    writer
        .finish()
        .map_err(|e| VintageError::Encode(format!("failed to finish PNG: {}", e)))?;
    Ok(())
}

/// Export to 8-bit RGBA TIFF.
pub fn export_tiff<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut encoder = tiff::encoder::TiffEncoder::new(BufWriter::new(file))
        .map_err(|e| VintageError::Encode(format!("failed to create TIFF encoder: {}", e)))?;
    encoder
        .write_image::<tiff::encoder::colortype::RGBA8>(
            buffer.width(),
            buffer.height(),
            &to_rgba(buffer),
        )
        .map_err(|e| VintageError::Encode(format!("failed to write TIFF image: {}", e)))?;
    Ok(())
}
