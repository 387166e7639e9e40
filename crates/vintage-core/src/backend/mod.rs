//! Processing backends.
//!
//! [`process`] validates the request, allocates the output, plans the
//! partition, and runs one worker per non-empty assignment on a dedicated
//! rayon pool. Each worker gets a shared view of its input range and an
//! exclusive, statically disjoint slice of the output; no locking is
//! involved. The call returns only after every worker has finished.
//!
//! Two kernels implement the per-range work:
//! - [`Backend::Native`]: a C-ABI routine handed raw base pointers.
//! - [`Backend::Managed`]: a plain Rust loop over the slices.
//!
//! Both produce byte-identical output for identical inputs.

mod managed;
mod native;

#[cfg(test)]
mod tests;

pub use native::{
    vintage_process_range, STATUS_BAD_ARGUMENT, STATUS_BAD_INTENSITY, STATUS_NULL_POINTER,
    STATUS_OK,
};

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use log::{debug, trace};
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::error::{Result, VintageError};
use crate::partition::{self, PartitionPlan, WorkerAssignment};

/// Which kernel processes each worker's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Precompiled C-ABI kernel called through raw pointers.
    #[default]
    Native,
    /// Safe Rust loop.
    Managed,
}

impl Backend {
    /// Both backends, in the order the benchmark runs them.
    pub const ALL: [Backend; 2] = [Backend::Native, Backend::Managed];

    /// Implementation tag used in benchmark records.
    pub fn tag(self) -> &'static str {
        match self {
            Backend::Native => "native",
            Backend::Managed => "managed",
        }
    }

    /// Shorthand for [`process`] with this backend.
    pub fn process(
        self,
        input: &PixelBuffer,
        worker_count: usize,
        intensity: f32,
    ) -> Result<PixelBuffer> {
        process(input, worker_count, intensity, self)
    }

    fn process_range(
        self,
        input: &[u8],
        output: &mut [u8],
        intensity: f32,
        worker_index: usize,
    ) -> Result<()> {
        match self {
            Backend::Native => native::process_range(input, output, intensity, worker_index),
            Backend::Managed => managed::process_range(input, output, intensity, worker_index),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" | "asm" => Ok(Backend::Native),
            "managed" | "rust" | "cs" => Ok(Backend::Managed),
            other => Err(format!(
                "Unknown backend '{}'. Valid options: native, managed",
                other
            )),
        }
    }
}

/// Apply the vintage effect to `input` using `worker_count` workers.
///
/// Returns a newly allocated buffer of the same dimensions. Fails with
/// [`VintageError::InvalidArgument`] for an empty image, zero workers, or an
/// intensity outside `[0, 1]`; with [`VintageError::ResourceFailure`] if the
/// output or worker pool cannot be allocated; and with
/// [`VintageError::ProcessingFailure`] if any worker fails. On failure the
/// partially written output is dropped.
pub fn process(
    input: &PixelBuffer,
    worker_count: usize,
    intensity: f32,
    backend: Backend,
) -> Result<PixelBuffer> {
    validate(input, worker_count, intensity)?;
    let plan = partition::plan(input.pixel_count(), worker_count);
    let pool = worker_pool(plan.active_count())?;
    run_planned(&pool, &plan, input, intensity, backend)
}

/// Same as [`process`], but runs the workers on `pool` instead of building a
/// pool for the call.
///
/// `pool` must have at least one thread per non-empty assignment, which
/// [`worker_pool`]`(worker_count)` always satisfies.
pub fn process_on(
    pool: &ThreadPool,
    input: &PixelBuffer,
    worker_count: usize,
    intensity: f32,
    backend: Backend,
) -> Result<PixelBuffer> {
    validate(input, worker_count, intensity)?;
    let plan = partition::plan(input.pixel_count(), worker_count);
    if pool.current_num_threads() < plan.active_count() {
        return Err(VintageError::invalid(format!(
            "worker pool has {} threads but {} workers are active",
            pool.current_num_threads(),
            plan.active_count()
        )));
    }
    run_planned(pool, &plan, input, intensity, backend)
}

/// Build a dedicated pool with one thread per worker.
pub fn worker_pool(worker_count: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count.max(1))
        .thread_name(|i| format!("vintage-worker-{}", i))
        .build()
        .map_err(|e| {
            VintageError::ResourceFailure(format!("failed to build worker pool: {}", e))
        })
}

fn run_planned(
    pool: &ThreadPool,
    plan: &PartitionPlan,
    input: &PixelBuffer,
    intensity: f32,
    backend: Backend,
) -> Result<PixelBuffer> {
    let mut output = input.try_allocate_like()?;
    debug!(
        "{} backend: {}x{} image, {} workers ({} active), intensity {:.2}",
        backend,
        input.width(),
        input.height(),
        plan.worker_count(),
        plan.active_count(),
        intensity
    );

    run_workers(
        pool,
        plan,
        input.as_bytes(),
        output.as_bytes_mut(),
        intensity,
        |src, dst, intensity, worker_index| {
            backend.process_range(src, dst, intensity, worker_index)
        },
    )?;

    Ok(output)
}

fn validate(input: &PixelBuffer, worker_count: usize, intensity: f32) -> Result<()> {
    if input.is_empty() {
        return Err(VintageError::invalid(format!(
            "input image is empty ({}x{})",
            input.width(),
            input.height()
        )));
    }
    if worker_count == 0 {
        return Err(VintageError::invalid("worker count must be at least 1"));
    }
    if !(0.0..=1.0).contains(&intensity) {
        return Err(VintageError::invalid(format!(
            "intensity must be within [0, 1], got {}",
            intensity
        )));
    }
    Ok(())
}

/// Run `kernel` once per active assignment and join.
///
/// Every worker runs to completion even if another one fails; afterwards the
/// failure with the lowest worker index is returned.
fn run_workers<K>(
    pool: &ThreadPool,
    plan: &PartitionPlan,
    input: &[u8],
    output: &mut [u8],
    intensity: f32,
    kernel: K,
) -> Result<()>
where
    K: Fn(&[u8], &mut [u8], f32, usize) -> Result<()> + Sync,
{
    let active: Vec<WorkerAssignment> = plan.active().copied().collect();
    if active.is_empty() {
        return Ok(());
    }

    let outputs = split_disjoint(output, &active);
    let mut results: Vec<Result<()>> = active.iter().map(|_| Ok(())).collect();
    let kernel = &kernel;

    pool.scope(|scope| {
        for ((assignment, dst), slot) in active.iter().zip(outputs).zip(results.iter_mut()) {
            let src = &input[assignment.bytes(CHANNELS)];
            scope.spawn(move |_| {
                let worker_index = assignment.worker_index;
                trace!(
                    "worker {} processing pixels {:?}",
                    worker_index,
                    assignment.pixels()
                );
                *slot = panic::catch_unwind(AssertUnwindSafe(|| {
                    kernel(src, dst, intensity, worker_index)
                }))
                .unwrap_or_else(|payload| {
                    Err(VintageError::worker(worker_index, panic_message(&*payload)))
                });
            });
        }
    });

    results.into_iter().find_map(|r| r.err()).map_or(Ok(()), Err)
}

/// Carve `output` into one exclusive slice per assignment.
///
/// Assignments must be ordered and non-overlapping, which the planner guarantees.
fn split_disjoint<'a>(output: &'a mut [u8], active: &[WorkerAssignment]) -> Vec<&'a mut [u8]> {
    let mut rest = output;
    let mut consumed = 0;
    let mut slices = Vec::with_capacity(active.len());
    for assignment in active {
        let range = assignment.bytes(CHANNELS);
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(range.start - consumed);
        let (head, tail) = tail.split_at_mut(range.len());
        slices.push(head);
        rest = tail;
        consumed = range.end;
    }
    slices
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {}", s)
    } else {
        "worker panicked".to_string()
    }
}

/// Byte-level comparison of the two backends on the same input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityReport {
    pub worker_count: usize,
    pub byte_count: usize,
    pub differing_bytes: usize,
    pub first_difference: Option<usize>,
}

impl ParityReport {
    pub fn is_identical(&self) -> bool {
        self.differing_bytes == 0
    }
}

/// Run both backends on `input` and compare their outputs byte for byte.
pub fn verify_parity(
    input: &PixelBuffer,
    worker_count: usize,
    intensity: f32,
) -> Result<ParityReport> {
    let native = process(input, worker_count, intensity, Backend::Native)?;
    let managed = process(input, worker_count, intensity, Backend::Managed)?;

    let mut differing_bytes = 0;
    let mut first_difference = None;
    for (offset, (a, b)) in native
        .as_bytes()
        .iter()
        .zip(managed.as_bytes())
        .enumerate()
    {
        if a != b {
            differing_bytes += 1;
            first_difference.get_or_insert(offset);
        }
    }

    Ok(ParityReport {
        worker_count,
        byte_count: native.as_bytes().len(),
        differing_bytes,
        first_difference,
    })
}
