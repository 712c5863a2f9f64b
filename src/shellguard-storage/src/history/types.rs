//! Record types for the command history store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shellguard_protocol::{ExecutionStatus, RiskLevel};

/// A persisted history entry as read back from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Rowid assigned by the database.
    pub id: i64,
    /// When the entry was appended, in UTC.
    pub timestamp: DateTime<Utc>,
    /// The natural-language request that produced the command.
    pub user_input: String,
    /// The generated command, after redaction.
    pub command: String,
    /// Outcome of the execution attempt, if any.
    pub status: ExecutionStatus,
    /// Captured output, when the command was executed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Risk level assessed at append time.
    pub risk_level: RiskLevel,
}

/// A history entry about to be appended. The store assigns the id and
/// timestamp and redacts the command text.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryRecord {
    pub user_input: String,
    pub command: String,
    pub status: ExecutionStatus,
    pub output: Option<String>,
    pub risk_level: RiskLevel,
}

impl NewHistoryRecord {
    pub fn new(
        user_input: impl Into<String>,
        command: impl Into<String>,
        status: ExecutionStatus,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            user_input: user_input.into(),
            command: command.into(),
            status,
            output: None,
            risk_level,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }
}
