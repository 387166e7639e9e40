//! Per-pixel sepia mix with grain.
//!
//! All arithmetic is single-precision and evaluated left to right; the native
//! kernel mirrors the same operation order so both backends agree bit for bit.

/// Sepia matrix rows, each as (r, g, b) weights.
pub const SEPIA_R: [f32; 3] = [0.393, 0.769, 0.189];
pub const SEPIA_G: [f32; 3] = [0.349, 0.686, 0.168];
pub const SEPIA_B: [f32; 3] = [0.272, 0.534, 0.131];

/// Clamp to `[0, 255]` and truncate toward zero.
#[inline]
pub fn clamp_byte(value: f32) -> u8 {
    value.max(0.0).min(255.0) as u8
}

/// Blend the sepia tone of `(b, g, r)` with the original by `intensity`, add
/// `noise` scaled by `intensity`, and return opaque BGRA.
#[inline]
pub fn apply_pixel(b: u8, g: u8, r: u8, intensity: f32, noise: i32) -> [u8; 4] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);

    let tr = rf * SEPIA_R[0] + gf * SEPIA_R[1] + bf * SEPIA_R[2];
    let tg = rf * SEPIA_G[0] + gf * SEPIA_G[1] + bf * SEPIA_G[2];
    let tb = rf * SEPIA_B[0] + gf * SEPIA_B[1] + bf * SEPIA_B[2];

    let keep = 1.0 - intensity;
    let mix_r = tr * intensity + rf * keep;
    let mix_g = tg * intensity + gf * keep;
    let mix_b = tb * intensity + bf * keep;

    // `as i32` truncates toward zero
    let grain = (noise as f32 * intensity) as i32 as f32;

    [
        clamp_byte(mix_b + grain),
        clamp_byte(mix_g + grain),
        clamp_byte(mix_r + grain),
        255,
    ]
}
