//! Flat BGRA pixel storage.
//!
//! A [`PixelBuffer`] is a tightly packed `width * height * 4` byte array with
//! channel order B, G, R, A and no padding between rows. The processing
//! backends read one buffer and hand back a freshly allocated one.

use crate::error::{Result, VintageError};

/// Bytes per pixel (B, G, R, A).
pub const CHANNELS: usize = 4;

/// Owned 8-bit BGRA raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer.
    ///
    /// Fails with [`VintageError::InvalidArgument`] if `width * height * 4`
    /// overflows `usize` and with [`VintageError::ResourceFailure`] if the
    /// bytes cannot be allocated.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = byte_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            VintageError::ResourceFailure(format!(
                "could not allocate {} byte buffer for {}x{}: {}",
                len, width, height, e
            ))
        })?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing BGRA bytes. The length must be exactly `width * height * 4`.
    pub fn from_bgra(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(VintageError::invalid(format!(
                "BGRA buffer size mismatch for {}x{}: expected {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Allocate a zeroed buffer of the same shape as `self`, reporting
    /// allocation failure instead of aborting.
    pub(crate) fn try_allocate_like(&self) -> Result<Self> {
        Self::new(self.width, self.height)
    }

    /// Deterministic diagonal gradient used when no source image is available.
    pub fn gradient(width: u32, height: u32) -> Result<Self> {
        let mut buffer = Self::new(width, height)?;
        let w = width.max(1) as usize;
        let h = height.max(1) as usize;
        for (i, px) in buffer.data.chunks_exact_mut(CHANNELS).enumerate() {
            let x = i % w;
            let y = i / w;
            px[0] = ((x * 255) / w) as u8;
            px[1] = ((y * 255) / h) as u8;
            px[2] = (((x + y) * 255) / (w + h)) as u8;
            px[3] = 255;
        }
        Ok(buffer)
    }

    /// Nearest-neighbour resample to a new size.
    pub fn resized(&self, width: u32, height: u32) -> Result<Self> {
        let mut out = Self::new(width, height)?;
        if self.is_empty() {
            return Ok(out);
        }
        let src_w = self.width as usize;
        let src_h = self.height as usize;
        let dst_w = width as usize;
        let dst_h = height as usize;

        for (dy, row) in out.data.chunks_exact_mut(dst_w.max(1) * CHANNELS).enumerate() {
            let sy = (dy * src_h) / dst_h;
            for (dx, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
                let sx = (dx * src_w) / dst_w;
                let offset = (sy * src_w + sx) * CHANNELS;
                px.copy_from_slice(&self.data[offset..offset + CHANNELS]);
            }
        }
        Ok(out)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes (`width * 4`, never padded).
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    /// True for zero-area buffers, which the backends reject.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// BGRA bytes of the pixel at flat index `index`.
    pub fn pixel(&self, index: usize) -> [u8; 4] {
        let offset = index * CHANNELS;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[offset..offset + CHANNELS]);
        px
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

fn byte_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| {
            VintageError::invalid(format!("image dimensions {}x{} overflow", width, height))
        })
}
