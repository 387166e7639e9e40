//! Shared utilities for vintage-cli
//!
//! Argument parsers, output path handling, and the console implementations
//! of the benchmark reporting hooks.

pub mod parsers;
pub mod processing;
pub mod reporters;

// Re-export commonly used items at the crate root for convenience
pub use parsers::{parse_intensity, parse_sizes, parse_thread_list};
pub use processing::{determine_output_path, format_run_line, largest_size};
pub use reporters::{ConsoleRecorder, ConsoleReporter};
