//! Default values and sanitization for the configuration sections.

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::benchmark::{BenchmarkPlan, ImageSize};

/// Upper bound for the automatically chosen worker count.
pub const MAX_AUTO_WORKERS: usize = 64;

/// Worker count used when none is configured: available parallelism, capped.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_AUTO_WORKERS)
}

/// Defaults for a single effect application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingDefaults {
    /// Effect strength in `[0, 1]`.
    pub intensity: f32,
    /// Worker count; `None` picks [`default_worker_count`].
    pub threads: Option<usize>,
    pub backend: Backend,
}

impl Default for ProcessingDefaults {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            threads: None,
            backend: Backend::Native,
        }
    }
}

impl ProcessingDefaults {
    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(default_worker_count)
    }

    pub(crate) fn sanitize(&mut self) {
        self.intensity = sanitize_intensity(self.intensity, 0.5);
        self.threads = self.threads.map(|t| t.max(1));
    }
}

/// Benchmark matrix settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    pub sizes: Vec<ImageSize>,
    pub thread_counts: Vec<usize>,
    /// Falls back to `defaults.intensity` when absent.
    pub intensity: Option<f32>,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        let plan = BenchmarkPlan::default();
        Self {
            sizes: plan.sizes,
            thread_counts: plan.thread_counts,
            intensity: None,
        }
    }
}

impl BenchmarkSettings {
    pub(crate) fn sanitize(&mut self) {
        let fallback = BenchmarkSettings::default();

        self.sizes.retain(|s| s.width > 0 && s.height > 0);
        if self.sizes.is_empty() {
            self.sizes = fallback.sizes;
        }

        self.thread_counts.retain(|&t| t > 0);
        if self.thread_counts.is_empty() {
            self.thread_counts = fallback.thread_counts;
        }

        self.intensity = self.intensity.map(|i| sanitize_intensity(i, 0.5));
    }
}

fn sanitize_intensity(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}
