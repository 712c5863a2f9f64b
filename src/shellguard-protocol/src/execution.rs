//! Execution result and status types.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Exit code reported when the real one is unavailable (spawn failure,
/// timeout, killed by signal).
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Outcome of running a command in the sandboxed interpreter.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExecutionResult {
    /// True when the process exited zero with nothing on stderr.
    pub success: bool,
    /// Captured stdout (possibly truncated).
    pub stdout: String,
    /// Captured stderr, or a synthesized error message.
    pub stderr: String,
    /// Process exit code; [`FAILURE_EXIT_CODE`] when unavailable.
    pub exit_code: i32,
    /// Wall-clock execution time.
    pub elapsed: Duration,
}

impl ExecutionResult {
    /// Failed result carrying an error message, for faults that occur before
    /// or instead of a normal exit.
    pub fn failure(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
            exit_code: FAILURE_EXIT_CODE,
            elapsed,
        }
    }

    /// The text a history record should carry: stdout on success, the error
    /// channel otherwise.
    pub fn output_for_record(&self) -> &str {
        if self.success {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// How far a command made it through the pipeline.
///
/// The integer codes returned by [`ExecutionStatus::code`] are what the
/// history store persists; they are stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Denied by policy, never reached the interpreter.
    #[default]
    NotExecuted,
    /// Executed and reported success.
    Success,
    /// Executed and failed (non-zero exit, stderr output, or timeout).
    Failed,
    /// Operator declined the confirmation prompt.
    Cancelled,
}

impl ExecutionStatus {
    /// Stable integer code used by the history store.
    pub fn code(self) -> i64 {
        match self {
            ExecutionStatus::NotExecuted => 0,
            ExecutionStatus::Success => 1,
            ExecutionStatus::Failed => 2,
            ExecutionStatus::Cancelled => 3,
        }
    }

    /// Inverse of [`ExecutionStatus::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ExecutionStatus::NotExecuted),
            1 => Some(ExecutionStatus::Success),
            2 => Some(ExecutionStatus::Failed),
            3 => Some(ExecutionStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::NotExecuted => write!(f, "not executed"),
            ExecutionStatus::Success => write!(f, "success"),
            ExecutionStatus::Failed => write!(f, "failed"),
            ExecutionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes_round_trip() {
        for status in [
            ExecutionStatus::NotExecuted,
            ExecutionStatus::Success,
            ExecutionStatus::Failed,
            ExecutionStatus::Cancelled,
        ] {
            assert_eq!(ExecutionStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ExecutionStatus::from_code(42), None);
    }

    #[test]
    fn test_failure_result_shape() {
        let result = ExecutionResult::failure("failed to spawn", Duration::from_millis(5));
        assert!(!result.success);
        assert_eq!(result.exit_code, FAILURE_EXIT_CODE);
        assert!(result.stdout.is_empty());
        assert_eq!(result.stderr, "failed to spawn");
    }

    #[test]
    fn test_output_for_record_picks_error_channel_on_failure() {
        let ok = ExecutionResult {
            success: true,
            stdout: "fine".into(),
            stderr: String::new(),
            exit_code: 0,
            elapsed: Duration::from_secs(1),
        };
        let bad = ExecutionResult::failure("boom", Duration::from_secs(1));
        assert_eq!(ok.output_for_record(), "fine");
        assert_eq!(bad.output_for_record(), "boom");
    }
}
