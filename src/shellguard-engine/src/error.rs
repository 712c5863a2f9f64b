//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the engine crate.
///
/// The execution subsystem deliberately does not use this type: every
/// execution failure is folded into a failed `ExecutionResult` so callers
/// see one shape regardless of what went wrong.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
