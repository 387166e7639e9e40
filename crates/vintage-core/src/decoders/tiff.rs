//! TIFF image decoder

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;

use super::pack_bgra;
use crate::buffer::PixelBuffer;
use crate::error::{Result, VintageError};

/// Decode a TIFF file
pub(crate) fn decode_tiff(path: &Path) -> Result<PixelBuffer> {
    let file = File::open(path)
        .map_err(|e| VintageError::Decode(format!("failed to open TIFF file: {}", e)))?;

    // Allow large scans (up to 1GB uncompressed)
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024;
    limits.ifd_value_size = 1024 * 1024 * 1024;
    limits.intermediate_buffer_size = 1024 * 1024 * 1024;

    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| VintageError::Decode(format!("failed to create TIFF decoder: {}", e)))?
        .with_limits(limits);

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| VintageError::Decode(format!("failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| VintageError::Decode(format!("failed to get TIFF color type: {}", e)))?;

    let channels = match color_type {
        ColorType::Gray(_) => 1,
        ColorType::GrayA(_) => 2,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => {
            return Err(VintageError::Decode(format!(
                "unsupported TIFF color type: {:?}",
                other
            )));
        }
    };

    let image_data = decoder
        .read_image()
        .map_err(|e| VintageError::Decode(format!("failed to read TIFF image data: {}", e)))?;

    match image_data {
        DecodingResult::U8(buf) => pack_bgra(width, height, &buf, channels),
        DecodingResult::U16(buf) => {
            let high: Vec<u8> = buf.iter().map(|&v| (v >> 8) as u8).collect();
            pack_bgra(width, height, &high, channels)
        }
        _ => Err(VintageError::Decode(
            "only 8- and 16-bit unsigned TIFF samples are supported".to_string(),
        )),
    }
}
