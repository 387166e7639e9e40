use std::path::PathBuf;

use vintage_core::config::VintageConfig;
use vintage_core::decoders::decode_image;
use vintage_core::verify_parity;

/// Run both backends on an image and fail if their outputs differ.
pub fn cmd_parity(
    input: PathBuf,
    threads: Option<usize>,
    intensity: Option<f32>,
    config: &VintageConfig,
) -> Result<(), String> {
    let threads = threads.unwrap_or_else(|| config.defaults.worker_count());
    let intensity = intensity.unwrap_or(config.defaults.intensity);

    let image = decode_image(&input)
        .map_err(|e| format!("Failed to load {}: {}", input.display(), e))?;
    let report = verify_parity(&image, threads, intensity)
        .map_err(|e| format!("Parity check failed: {}", e))?;

    if let Some(offset) = report.first_difference {
        return Err(format!(
            "Backends differ in {} of {} bytes (first at byte {}, pixel {})",
            report.differing_bytes,
            report.byte_count,
            offset,
            offset / 4
        ));
    }

    println!(
        "Backends identical: {} bytes, {} threads, {:.0}% intensity",
        report.byte_count,
        report.worker_count,
        intensity * 100.0
    );
    Ok(())
}
