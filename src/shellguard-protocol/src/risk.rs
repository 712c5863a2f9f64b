//! Risk and security classification enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Composite scores at or above this value are [`RiskLevel::High`].
pub const HIGH_RISK_THRESHOLD: f64 = 70.0;
/// Composite scores at or above this value (and below the high threshold)
/// are [`RiskLevel::Medium`].
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

/// Risk level assigned to a command.
///
/// The integer codes returned by [`RiskLevel::code`] are what the history
/// store persists; they are stable across releases.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Routine operation, executes without ceremony.
    #[default]
    Low,
    /// Mutating operation, may require confirmation depending on policy.
    Medium,
    /// Destructive or system-level operation.
    High,
}

impl RiskLevel {
    /// Map a composite risk score onto a level using the fixed thresholds.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Stable integer code used by the history store.
    pub fn code(self) -> i64 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }

    /// Inverse of [`RiskLevel::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(RiskLevel::Low),
            1 => Some(RiskLevel::Medium),
            2 => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

/// Broad classification of what a command touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// Read-only query.
    #[default]
    Query,
    /// File or item manipulation.
    FileOperation,
    /// Service, process, or registry manipulation.
    SystemConfig,
    /// Network-facing operation.
    NetworkOperation,
    /// Blacklisted operation; never produced by classification, only by
    /// policy denial.
    Dangerous,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandType::Query => write!(f, "query"),
            CommandType::FileOperation => write!(f, "file operation"),
            CommandType::SystemConfig => write!(f, "system config"),
            CommandType::NetworkOperation => write!(f, "network operation"),
            CommandType::Dangerous => write!(f, "dangerous"),
        }
    }
}

/// Operator-selected strictness of the safety policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    /// Only low-risk read-only queries are allowed.
    Strict,
    /// High risk denied, medium risk requires confirmation.
    #[default]
    Standard,
    /// Only extreme risk denied, anything above low requires confirmation.
    Relaxed,
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityLevel::Strict => write!(f, "strict"),
            SecurityLevel::Standard => write!(f, "standard"),
            SecurityLevel::Relaxed => write!(f, "relaxed"),
        }
    }
}

impl FromStr for SecurityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SecurityLevel::Strict),
            "standard" => Ok(SecurityLevel::Standard),
            "relaxed" => Ok(SecurityLevel::Relaxed),
            other => Err(format!("unknown security level: {other}")),
        }
    }
}
