//! Shellguard engine - risk scoring, policy evaluation, and sandboxed
//! execution.
//!
//! This crate contains the decision-making core of the pipeline:
//! - Weighted risk scoring and command classification over pattern tables
//! - Security-level policy evaluation producing a `SafetyVerdict`
//! - Sandboxed execution of approved commands in a child interpreter
//! - Configuration loading
//!
//! History persistence lives in `shellguard-storage`; front-ends sit above
//! both.

pub mod config;
pub mod error;
pub mod exec;
pub mod safety;

pub use config::{Config, ExecutionConfig, HistoryConfig, SafetyConfig};
pub use error::{EngineError, Result};
pub use exec::{DEFAULT_TIMEOUT, ExecRequest, Interpreter, MAX_OUTPUT_SIZE, execute};
pub use safety::{PatternTables, RiskBreakdown, SafetyPolicy};
