//! PNG image decoder

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::pack_bgra;
use crate::buffer::PixelBuffer;
use crate::error::{Result, VintageError};

/// Decode a PNG file
pub(crate) fn decode_png(path: &Path) -> Result<PixelBuffer> {
    let file = File::open(path)
        .map_err(|e| VintageError::Decode(format!("failed to open PNG file: {}", e)))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| VintageError::Decode(format!("failed to read PNG info: {}", e)))?;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| VintageError::Decode("failed to determine PNG buffer size".to_string()))?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| VintageError::Decode(format!("failed to read PNG frame: {}", e)))?;

    let bytes = &buf[..frame_info.buffer_size()];
    let (width, height) = (frame_info.width, frame_info.height);

    let channels = match frame_info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(VintageError::Decode(
                "indexed PNG not supported".to_string(),
            ));
        }
    };

    match frame_info.bit_depth {
        png::BitDepth::Eight => pack_bgra(width, height, bytes, channels),
        // Big-endian samples: keep the high byte of each pair.
        png::BitDepth::Sixteen => {
            let high: Vec<u8> = bytes.chunks_exact(2).map(|pair| pair[0]).collect();
            pack_bgra(width, height, &high, channels)
        }
        depth => Err(VintageError::Decode(format!(
            "unsupported PNG bit depth: {:?}",
            depth
        ))),
    }
}
