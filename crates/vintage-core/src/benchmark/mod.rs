//! Benchmark harness comparing the native and managed backends.
//!
//! For every (size, worker count) pair the harness scales the source image
//! to the target size, times five calls of each backend, records one
//! [`BenchmarkSample`] per backend, and then emits a [`Comparison`]. Calls are
//! issued strictly one after another so timings are uncontended.

mod record;
pub mod stats;

pub use record::{CsvRecorder, Tee};

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use log::{info, warn};
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::backend::{process_on, worker_pool, Backend};
use crate::buffer::PixelBuffer;
use crate::error::{Result, VintageError};

/// Timed runs per (size, worker count, backend) combination.
pub const REPETITIONS: usize = 5;

/// Receives progress updates. Fire-and-forget.
pub trait StatusReporter {
    fn report(&self, message: &str, percent: u8);
}

impl<F: Fn(&str, u8)> StatusReporter for F {
    fn report(&self, message: &str, percent: u8) {
        self(message, percent)
    }
}

/// Receives finished samples and pairwise comparisons.
pub trait ResultRecorder {
    fn record(&mut self, sample: &BenchmarkSample) -> Result<()>;

    fn compare(&mut self, _comparison: &Comparison) -> Result<()> {
        Ok(())
    }
}

/// Image dimensions in the benchmark matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ImageSize {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `1920x1080`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("Invalid size '{}': expected WIDTHxHEIGHT", s))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| format!("Invalid width in '{}'", s))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| format!("Invalid height in '{}'", s))?;
        if width == 0 || height == 0 {
            return Err(format!("Size '{}' must be at least 1x1", s));
        }
        Ok(Self { width, height })
    }
}

/// The matrix of sizes and worker counts to run.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkPlan {
    pub sizes: Vec<ImageSize>,
    pub thread_counts: Vec<usize>,
    pub intensity: f32,
}

impl BenchmarkPlan {
    /// Number of sample sets (one per size, worker count, and backend).
    pub fn total_runs(&self) -> usize {
        self.sizes.len() * self.thread_counts.len() * Backend::ALL.len()
    }
}

impl Default for BenchmarkPlan {
    fn default() -> Self {
        Self {
            sizes: vec![
                ImageSize::new(800, 600),
                ImageSize::new(1920, 1080),
                ImageSize::new(3840, 2160),
            ],
            thread_counts: vec![1, 2, 4, 8, 16, 32, 64],
            intensity: 0.5,
        }
    }
}

/// Five timings of one backend on one (size, worker count) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSample {
    pub image_size: ImageSize,
    pub backend: Backend,
    pub thread_count: usize,
    pub intensity: f32,
    pub timings_ms: [f64; REPETITIONS],
    pub mean_ms: f64,
    pub std_dev_ms: f64,
}

impl BenchmarkSample {
    pub fn new(
        image_size: ImageSize,
        backend: Backend,
        thread_count: usize,
        intensity: f32,
        timings_ms: [f64; REPETITIONS],
    ) -> Self {
        let mean_ms = stats::mean(&timings_ms);
        let std_dev_ms = stats::population_std_dev(&timings_ms, mean_ms);
        Self {
            image_size,
            backend,
            thread_count,
            intensity,
            timings_ms,
            mean_ms,
            std_dev_ms,
        }
    }

    pub fn csv_header() -> &'static str {
        "ImageSize,Implementation,ThreadCount,Intensity,Time1,Time2,Time3,Time4,Time5,Average,StdDev"
    }

    /// One CSV record; the five timings share a column, separated by `;`.
    pub fn to_csv_line(&self) -> String {
        let timings = self
            .timings_ms
            .iter()
            .map(|t| format!("{:.3}", t))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{},{},{},{:.2},{},{:.2},{:.2}",
            self.image_size,
            self.backend.tag(),
            self.thread_count,
            self.intensity,
            timings,
            self.mean_ms,
            self.std_dev_ms
        )
    }
}

/// Native vs managed result for one (size, worker count) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub native: BenchmarkSample,
    pub managed: BenchmarkSample,
}

impl Comparison {
    /// `managed_mean / native_mean`, or `None` if the native mean is zero.
    pub fn speedup(&self) -> Option<f64> {
        (self.native.mean_ms > 0.0).then(|| self.managed.mean_ms / self.native.mean_ms)
    }

    pub fn summary(&self) -> String {
        let speedup = self
            .speedup()
            .map(|s| format!("{:.2}x", s))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "Resolution: {}, Threads: {}\n\
             native avg: {:.2}ms\n\
             managed avg: {:.2}ms\n\
             Speedup: {}",
            self.native.image_size,
            self.native.thread_count,
            self.native.mean_ms,
            self.managed.mean_ms,
            speedup
        )
    }
}

/// Run the full matrix over `source`, scaled to each planned size.
///
/// Returns the comparisons in matrix order. Stops at the first failure and
/// reports `"Error"` at 0% before returning it.
pub fn run_benchmark(
    source: &PixelBuffer,
    plan: &BenchmarkPlan,
    reporter: &dyn StatusReporter,
    recorder: &mut dyn ResultRecorder,
) -> Result<Vec<Comparison>> {
    match run_matrix(source, plan, reporter, recorder) {
        Ok(comparisons) => {
            reporter.report("Completed", 100);
            Ok(comparisons)
        }
        Err(e) => {
            warn!("benchmark aborted: {}", e);
            reporter.report("Error", 0);
            Err(e)
        }
    }
}

fn run_matrix(
    source: &PixelBuffer,
    plan: &BenchmarkPlan,
    reporter: &dyn StatusReporter,
    recorder: &mut dyn ResultRecorder,
) -> Result<Vec<Comparison>> {
    if source.is_empty() {
        return Err(VintageError::invalid("benchmark source image is empty"));
    }

    let total = plan.total_runs();
    let mut current = 0;
    let mut comparisons = Vec::with_capacity(plan.sizes.len() * plan.thread_counts.len());

    for &size in &plan.sizes {
        let image = source.resized(size.width, size.height)?;

        for &threads in &plan.thread_counts {
            let percent = if total == 0 { 100 } else { current * 100 / total };
            reporter.report(
                &format!("Processing {}, threads: {}", size, threads),
                percent as u8,
            );

            // Built outside the timed region and shared by both backends.
            let pool = worker_pool(threads)?;

            let native = measure(
                &pool,
                &image,
                size,
                threads,
                plan.intensity,
                Backend::Native,
            )?;
            recorder.record(&native)?;
            current += 1;

            let managed = measure(
                &pool,
                &image,
                size,
                threads,
                plan.intensity,
                Backend::Managed,
            )?;
            recorder.record(&managed)?;
            current += 1;

            let comparison = Comparison { native, managed };
            recorder.compare(&comparison)?;
            comparisons.push(comparison);
        }
    }

    Ok(comparisons)
}

fn measure(
    pool: &ThreadPool,
    image: &PixelBuffer,
    size: ImageSize,
    threads: usize,
    intensity: f32,
    backend: Backend,
) -> Result<BenchmarkSample> {
    let mut timings_ms = [0.0; REPETITIONS];
    for slot in timings_ms.iter_mut() {
        let start = Instant::now();
        let output = process_on(pool, image, threads, intensity, backend)?;
        let elapsed = start.elapsed();
        // Release the previous output before the next timed run starts.
        drop(output);
        *slot = elapsed.as_secs_f64() * 1000.0;
    }

    let sample = BenchmarkSample::new(size, backend, threads, intensity, timings_ms);
    info!(
        "{} {} threads={} mean={:.2}ms sd={:.2}ms",
        size, backend, threads, sample.mean_ms, sample.std_dev_ms
    );
    Ok(sample)
}
