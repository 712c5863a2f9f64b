//! Sandboxed command execution.

mod runner;
mod script;

pub use runner::{ExecRequest, execute};
pub use script::Interpreter;

use std::time::Duration;

/// Default hard timeout for command execution.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum output size to capture per stream.
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024; // 1MB
