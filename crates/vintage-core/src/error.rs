//! Error types shared by every stage of the vintage pipeline.

use thiserror::Error;

/// Errors surfaced by processing, benchmarking, and image I/O.
#[derive(Debug, Error)]
pub enum VintageError {
    /// Rejected before any worker was spawned (empty image, zero workers, bad intensity).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A worker failed while processing its assigned range.
    #[error("processing failed in worker {worker_index}: {reason}")]
    ProcessingFailure { worker_index: usize, reason: String },

    /// The output buffer or worker pool could not be allocated.
    #[error("resource allocation failed: {0}")]
    ResourceFailure(String),

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VintageError>;

impl VintageError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        VintageError::InvalidArgument(message.into())
    }

    pub(crate) fn worker(worker_index: usize, reason: impl Into<String>) -> Self {
        VintageError::ProcessingFailure {
            worker_index,
            reason: reason.into(),
        }
    }
}
