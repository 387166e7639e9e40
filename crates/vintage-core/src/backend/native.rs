//! Native kernel behind a C ABI.
//!
//! [`vintage_process_range`] is the precompiled routine: it receives raw base
//! addresses already advanced to the worker's range, the pixel count, the
//! intensity, and the worker index, and touches only `[0, pixel_count * 4)`
//! from each base. It carries its own copy of the grain generator and sepia
//! loop, evaluated in the same order as the managed kernel.
//!
//! The only unsafe code in the crate lives here: the slice reconstruction at
//! the top of the kernel and the single call in [`process_range`].

use std::slice;

use crate::buffer::CHANNELS;
use crate::error::{Result, VintageError};
use crate::noise::{LCG_A, LCG_C, NOISE_MASK, NOISE_OFFSET, SEED_BASE};
use crate::sepia::{SEPIA_B, SEPIA_G, SEPIA_R};

/// Range processed.
pub const STATUS_OK: i32 = 0;
/// Input or output pointer was null.
pub const STATUS_NULL_POINTER: i32 = -1;
/// Negative pixel count or worker index.
pub const STATUS_BAD_ARGUMENT: i32 = -2;
/// Intensity outside `[0, 1]` or not a number.
pub const STATUS_BAD_INTENSITY: i32 = -3;

/// Process `pixel_count` BGRA pixels from `input` into `output`.
///
/// Returns [`STATUS_OK`] or one of the negative status codes; nothing is
/// written when a status other than `STATUS_OK` is returned.
///
/// # Safety
/// `input` must be valid for reads and `output` valid for writes of
/// `pixel_count * 4` bytes, and the two regions must not overlap.
#[no_mangle]
pub unsafe extern "C" fn vintage_process_range(
    input: *const u8,
    output: *mut u8,
    pixel_count: i32,
    intensity: f32,
    worker_index: i32,
) -> i32 {
    if input.is_null() || output.is_null() {
        return STATUS_NULL_POINTER;
    }
    if pixel_count < 0 || worker_index < 0 {
        return STATUS_BAD_ARGUMENT;
    }
    if !(0.0..=1.0).contains(&intensity) {
        return STATUS_BAD_INTENSITY;
    }

    let len = pixel_count as usize * CHANNELS;
    let src = unsafe { slice::from_raw_parts(input, len) };
    let dst = unsafe { slice::from_raw_parts_mut(output, len) };

    let mut seed = (worker_index as u64).wrapping_mul(SEED_BASE);
    let keep = 1.0 - intensity;

    for (s, d) in src.chunks_exact(CHANNELS).zip(dst.chunks_exact_mut(CHANNELS)) {
        seed = seed.wrapping_mul(LCG_A).wrapping_add(LCG_C);
        let sample = ((seed >> 16) as u32 & 0xFFFF & NOISE_MASK) as i32 - NOISE_OFFSET;
        let grain = (sample as f32 * intensity) as i32 as f32;

        let b = s[0] as f32;
        let g = s[1] as f32;
        let r = s[2] as f32;

        let tr = r * SEPIA_R[0] + g * SEPIA_R[1] + b * SEPIA_R[2];
        let tg = r * SEPIA_G[0] + g * SEPIA_G[1] + b * SEPIA_G[2];
        let tb = r * SEPIA_B[0] + g * SEPIA_B[1] + b * SEPIA_B[2];

        d[0] = ((tb * intensity + b * keep) + grain).clamp(0.0, 255.0) as u8;
        d[1] = ((tg * intensity + g * keep) + grain).clamp(0.0, 255.0) as u8;
        d[2] = ((tr * intensity + r * keep) + grain).clamp(0.0, 255.0) as u8;
        d[3] = 255;
    }

    STATUS_OK
}

/// Safe entry: checks the slices and hands their base pointers to the kernel.
pub(super) fn process_range(
    input: &[u8],
    output: &mut [u8],
    intensity: f32,
    worker_index: usize,
) -> Result<()> {
    if input.len() != output.len() || input.len() % CHANNELS != 0 {
        return Err(VintageError::worker(
            worker_index,
            format!(
                "range length mismatch: input {} bytes, output {} bytes",
                input.len(),
                output.len()
            ),
        ));
    }
    let pixel_count = i32::try_from(input.len() / CHANNELS).map_err(|_| {
        VintageError::worker(
            worker_index,
            format!(
                "{} pixels exceed the native kernel limit",
                input.len() / CHANNELS
            ),
        )
    })?;
    let native_index = i32::try_from(worker_index).map_err(|_| {
        VintageError::worker(worker_index, "worker index exceeds the native kernel limit")
    })?;

    // SAFETY: `input` and `output` each span exactly `pixel_count * 4` bytes,
    // and a shared and an exclusive borrow can never overlap.
    let status = unsafe {
        vintage_process_range(
            input.as_ptr(),
            output.as_mut_ptr(),
            pixel_count,
            intensity,
            native_index,
        )
    };

    match status {
        STATUS_OK => Ok(()),
        code => Err(VintageError::worker(
            worker_index,
            format!("native kernel returned status {}", code),
        )),
    }
}
