//! Shared data model for the shellguard pipeline.
//!
//! Plain serde-serializable values exchanged between the safety engine, the
//! sandboxed executor, the history store, and front-ends. No I/O happens in
//! this crate.

pub mod command;
pub mod execution;
pub mod risk;
pub mod verdict;

// Re-exports
pub use command::GeneratedCommand;
pub use execution::{ExecutionResult, ExecutionStatus, FAILURE_EXIT_CODE};
pub use risk::{
    CommandType, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD, RiskLevel, SecurityLevel,
};
pub use verdict::SafetyVerdict;
