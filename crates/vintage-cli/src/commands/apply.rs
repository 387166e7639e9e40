use std::path::PathBuf;
use std::time::Instant;

use log::debug;
use vintage_cli::{determine_output_path, format_run_line};
use vintage_core::config::VintageConfig;
use vintage_core::decoders::decode_image;
use vintage_core::exporters::export_image;
use vintage_core::{process, Backend};

/// Apply the vintage effect to a single image and save it as PNG.
pub fn cmd_apply(
    input: PathBuf,
    out: Option<PathBuf>,
    threads: Option<usize>,
    intensity: Option<f32>,
    backend: Option<Backend>,
    config: &VintageConfig,
) -> Result<(), String> {
    let threads = threads.unwrap_or_else(|| config.defaults.worker_count());
    let intensity = intensity.unwrap_or(config.defaults.intensity);
    let backend = backend.unwrap_or(config.defaults.backend);

    let image = decode_image(&input)
        .map_err(|e| format!("Failed to load {}: {}", input.display(), e))?;
    debug!(
        "Loaded {} ({}x{})",
        input.display(),
        image.width(),
        image.height()
    );

    let start = Instant::now();
    let output = process(&image, threads, intensity, backend)
        .map_err(|e| format!("Processing failed: {}", e))?;
    let elapsed_ms = start.elapsed().as_millis();

    let output_path = determine_output_path(&input, &out)?;
    export_image(&output, &output_path)
        .map_err(|e| format!("Failed to save {}: {}", output_path.display(), e))?;

    println!("{}", format_run_line(backend, threads, intensity, elapsed_ms));
    println!("Saved: {}", output_path.display());
    Ok(())
}
