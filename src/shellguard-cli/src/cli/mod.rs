//! CLI argument parsing and command dispatch.
//!
//! - `args` - command-line argument structures
//! - `handlers` - subcommand dispatch

pub mod args;
pub mod handlers;

// Re-export main types
pub use args::{Cli, Commands, LogLevel};
pub use handlers::dispatch_command;
