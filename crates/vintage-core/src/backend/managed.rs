//! Managed kernel: a safe loop over the worker's slices.

use crate::buffer::CHANNELS;
use crate::error::{Result, VintageError};
use crate::noise::NoiseGenerator;
use crate::sepia;

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

    let mut noise = NoiseGenerator::new(worker_index);
    for (src, dst) in input
        .chunks_exact(CHANNELS)
        .zip(output.chunks_exact_mut(CHANNELS))
    {
        let px = sepia::apply_pixel(src[0], src[1], src[2], intensity, noise.next_sample());
        dst.copy_from_slice(&px);
    }
    Ok(())
}
