//! Partition planning: split a flat pixel range into per-worker runs.
//!
//! Every worker but the last gets `total / workers` pixels and the last one
//! absorbs the remainder. When there are more workers than pixels, the first
//! `total` workers get one pixel each and the rest get nothing. Empty
//! assignments keep their index (it seeds the noise generator) but are never run.

use std::ops::Range;

/// One worker's contiguous run of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerAssignment {
    pub worker_index: usize,
    pub pixel_start: usize,
    pub pixel_count: usize,
}

impl WorkerAssignment {
    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }

    /// Pixel index range covered by this worker.
    pub fn pixels(&self) -> Range<usize> {
        self.pixel_start..self.pixel_start + self.pixel_count
    }

    /// Byte range covered by this worker in a buffer with `channels` bytes per pixel.
    pub fn bytes(&self, channels: usize) -> Range<usize> {
        self.pixel_start * channels..(self.pixel_start + self.pixel_count) * channels
    }
}

/// Ordered, disjoint assignments that cover `0..total_pixels` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    total_pixels: usize,
    assignments: Vec<WorkerAssignment>,
}

impl PartitionPlan {
    pub fn total_pixels(&self) -> usize {
        self.total_pixels
    }

    pub fn worker_count(&self) -> usize {
        self.assignments.len()
    }

    /// All assignments, including empty ones, in worker-index order.
    pub fn assignments(&self) -> &[WorkerAssignment] {
        &self.assignments
    }

    /// Assignments that actually get a worker.
    pub fn active(&self) -> impl Iterator<Item = &WorkerAssignment> + '_ {
        self.assignments.iter().filter(|a| !a.is_empty())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

/// Plan how `total_pixels` are split across `worker_count` workers.
///
/// A `worker_count` of zero is treated as one worker.
pub fn plan(total_pixels: usize, worker_count: usize) -> PartitionPlan {
    let worker_count = worker_count.max(1);
    let base = match total_pixels / worker_count {
        0 => 1,
        n => n,
    };
    let last = worker_count - 1;

    let assignments = (0..worker_count)
        .map(|worker_index| {
            let pixel_start = worker_index.saturating_mul(base).min(total_pixels);
            let pixel_count = if worker_index == last {
                total_pixels - pixel_start
            } else {
                base.min(total_pixels - pixel_start)
            };
            WorkerAssignment {
                worker_index,
                pixel_start,
                pixel_count,
            }
        })
        .collect();

    PartitionPlan {
        total_pixels,
        assignments,
    }
}
