//! Vintage Core Library
//!
//! Sepia-and-grain "vintage" effect over 8-bit BGRA rasters, split across a
//! caller-chosen number of workers. Two interchangeable backends (a native
//! C-ABI kernel and a managed Rust loop) produce byte-identical output.

pub mod backend;
pub mod benchmark;
pub mod buffer;
pub mod config;
pub mod decoders;
pub mod error;
pub mod exporters;
pub mod noise;
pub mod partition;
pub mod sepia;

// Re-export commonly used types
pub use backend::{process, process_on, verify_parity, worker_pool, Backend, ParityReport};
pub use benchmark::{
    run_benchmark, BenchmarkPlan, BenchmarkSample, Comparison, CsvRecorder, ResultRecorder,
    StatusReporter,
};
pub use buffer::PixelBuffer;
pub use error::{Result, VintageError};
pub use noise::NoiseGenerator;
pub use partition::{plan, PartitionPlan, WorkerAssignment};
