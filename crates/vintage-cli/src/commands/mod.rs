//! Command implementations for the vintage CLI.

mod apply;
mod benchmark;
mod init;
mod parity;

// Re-export all command functions
pub use apply::cmd_apply;
pub use benchmark::cmd_benchmark;
pub use init::cmd_init;
pub use parity::cmd_parity;
