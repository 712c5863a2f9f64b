//! Safety verdict produced by policy evaluation.

use serde::{Deserialize, Serialize};

use crate::risk::{CommandType, RiskLevel};

/// Outcome of evaluating a command against the active security policy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SafetyVerdict {
    /// Whether the command may proceed to execution.
    pub allowed: bool,
    /// Risk level, computed from the score or forced by a blacklist hit.
    pub risk_level: RiskLevel,
    /// Composite risk score in `[0, 100]`.
    pub risk_score: f64,
    /// Command classification.
    pub command_type: CommandType,
    /// Denial reason; present exactly when `allowed` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Advisory warnings; never affect `allowed`.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Whether the caller must obtain explicit consent before executing.
    #[serde(default)]
    pub requires_confirmation: bool,
}

impl SafetyVerdict {
    /// Verdict that allows the command.
    pub fn allow(risk_level: RiskLevel, risk_score: f64, command_type: CommandType) -> Self {
        Self {
            allowed: true,
            risk_level,
            risk_score,
            command_type,
            reason: None,
            warnings: Vec::new(),
            requires_confirmation: false,
        }
    }

    /// Verdict that denies the command with a reason.
    pub fn deny(
        reason: impl Into<String>,
        risk_level: RiskLevel,
        risk_score: f64,
        command_type: CommandType,
    ) -> Self {
        Self {
            allowed: false,
            risk_level,
            risk_score,
            command_type,
            reason: Some(reason.into()),
            warnings: Vec::new(),
            requires_confirmation: false,
        }
    }

    /// Require explicit confirmation before execution.
    pub fn with_confirmation(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    /// Append an advisory warning.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// True when the command was denied.
    pub fn is_denied(&self) -> bool {
        !self.allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_denied_always_carries_reason() {
        let verdict = SafetyVerdict::deny(
            "command is blacklisted",
            RiskLevel::High,
            0.0,
            CommandType::Dangerous,
        );
        assert!(verdict.is_denied());
        assert!(verdict.reason.is_some());
    }

    #[test]
    fn test_allowed_carries_no_reason() {
        let verdict = SafetyVerdict::allow(RiskLevel::Low, 8.0, CommandType::Query);
        assert!(verdict.allowed);
        assert!(verdict.reason.is_none());
        assert!(!verdict.requires_confirmation);
    }

    #[test]
    fn test_warnings_do_not_flip_allowed() {
        let verdict = SafetyVerdict::allow(RiskLevel::Medium, 45.0, CommandType::FileOperation)
            .with_confirmation()
            .with_warning("-Force suppresses confirmation prompts");
        assert!(verdict.allowed);
        assert!(verdict.requires_confirmation);
        assert_eq!(verdict.warnings.len(), 1);
    }
}
