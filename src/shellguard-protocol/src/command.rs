//! Generated command value type.

use serde::{Deserialize, Serialize};

use crate::risk::{CommandType, RiskLevel};
use crate::verdict::SafetyVerdict;

/// A shell command produced by the upstream generator.
///
/// Values are never mutated in place: re-evaluating a command (for example
/// when replaying it from history) produces a new value via
/// [`GeneratedCommand::rescored`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeneratedCommand {
    /// Raw command text, exactly as produced upstream.
    pub text: String,
    /// Optional human-readable description of what the command does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Risk level from the most recent evaluation.
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Classification from the most recent evaluation.
    #[serde(default)]
    pub command_type: CommandType,
    /// Composite risk score from the most recent evaluation.
    #[serde(default)]
    pub risk_score: f64,
}

impl GeneratedCommand {
    /// Create a not-yet-assessed command.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: None,
            risk_level: RiskLevel::default(),
            command_type: CommandType::default(),
            risk_score: 0.0,
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Return a copy carrying the assessment from `verdict`.
    pub fn rescored(&self, verdict: &SafetyVerdict) -> Self {
        Self {
            text: self.text.clone(),
            description: self.description.clone(),
            risk_level: verdict.risk_level,
            command_type: verdict.command_type,
            risk_score: verdict.risk_score,
        }
    }
}
