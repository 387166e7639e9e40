use std::path::PathBuf;

use vintage_cli::{
    largest_size, parse_sizes, parse_thread_list, ConsoleRecorder, ConsoleReporter,
};
use vintage_core::benchmark::Tee;
use vintage_core::config::VintageConfig;
use vintage_core::decoders::decode_image;
use vintage_core::{run_benchmark, CsvRecorder, PixelBuffer};

/// Run the native vs managed benchmark matrix.
///
/// Without `input` a synthetic gradient at the largest planned size is used.
pub fn cmd_benchmark(
    input: Option<PathBuf>,
    csv: Option<PathBuf>,
    intensity: Option<f32>,
    sizes: Option<String>,
    thread_counts: Option<String>,
    config: &VintageConfig,
) -> Result<(), String> {
    let mut plan = config.benchmark_plan();
    if let Some(sizes) = sizes {
        plan.sizes = parse_sizes(&sizes)?;
    }
    if let Some(thread_counts) = thread_counts {
        plan.thread_counts = parse_thread_list(&thread_counts)?;
    }
    if let Some(intensity) = intensity {
        plan.intensity = intensity;
    }

    let source = match &input {
        Some(path) => decode_image(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?,
        None => {
            let size = largest_size(&plan.sizes).ok_or("No benchmark sizes configured")?;
            PixelBuffer::gradient(size.width, size.height)
                .map_err(|e| format!("Failed to create {} test image: {}", size, e))?
        }
    };

    println!(
        "Benchmarking {} sizes x {} thread counts at {:.0}% intensity",
        plan.sizes.len(),
        plan.thread_counts.len(),
        plan.intensity * 100.0
    );
    println!();

    let reporter = ConsoleReporter;
    let mut console = ConsoleRecorder::stdout();

    let comparisons = match &csv {
        Some(path) => {
            let mut csv_recorder = CsvRecorder::create(path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
            let mut tee = Tee {
                first: &mut csv_recorder,
                second: &mut console,
            };
            run_benchmark(&source, &plan, &reporter, &mut tee)
        }
        None => run_benchmark(&source, &plan, &reporter, &mut console),
    }
    .map_err(|e| format!("Benchmark failed: {}", e))?;

    println!("Benchmark complete: {} comparisons", comparisons.len());
    if let Some(path) = csv {
        println!("Results saved to: {}", path.display());
    }
    Ok(())
}
