//! Security policy evaluation.

use shellguard_protocol::{CommandType, RiskLevel, SafetyVerdict, SecurityLevel};
use tracing::debug;

use super::patterns::PatternTables;
use super::score::{classify_command, contains_ignore_case, score_command};

/// Reason attached to empty-command denials.
pub const EMPTY_COMMAND_REASON: &str = "empty command";

/// Relaxed mode denies only when the composite score reaches this value.
const RELAXED_DENY_SCORE: f64 = 80.0;

/// Evaluates commands against a security level, a blacklist, and the scoring
/// tables.
///
/// Evaluation is pure: no I/O, no clock, and the same inputs always produce
/// the same verdict.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    level: SecurityLevel,
    custom_blacklist: Vec<String>,
    /// Reserved for future allow-listing; not consulted by denial logic.
    #[allow(dead_code)]
    custom_whitelist: Vec<String>,
    tables: PatternTables,
}

impl SafetyPolicy {
    /// Policy with built-in tables and no custom lists.
    pub fn new(level: SecurityLevel) -> Self {
        Self {
            level,
            custom_blacklist: Vec::new(),
            custom_whitelist: Vec::new(),
            tables: PatternTables::builtin(),
        }
    }

    /// Extra denied substrings, matched case-insensitively.
    pub fn with_blacklist(mut self, entries: Vec<String>) -> Self {
        self.custom_blacklist = entries;
        self
    }

    /// Reserved allow-list entries; carried but not consulted.
    pub fn with_whitelist(mut self, entries: Vec<String>) -> Self {
        self.custom_whitelist = entries;
        self
    }

    /// Substitute the pattern tables.
    pub fn with_tables(mut self, tables: PatternTables) -> Self {
        self.tables = tables;
        self
    }

    /// Active security level.
    pub fn level(&self) -> SecurityLevel {
        self.level
    }

    /// Evaluate a command.
    ///
    /// Order is fixed: empty check, blacklist, scoring, level policy,
    /// warnings. Warnings are attached to every verdict that reaches the
    /// scoring stage, including policy denials.
    pub fn evaluate(&self, text: &str) -> SafetyVerdict {
        if text.trim().is_empty() {
            return SafetyVerdict::deny(
                EMPTY_COMMAND_REASON,
                RiskLevel::Low,
                0.0,
                CommandType::Query,
            );
        }

        if let Some(entry) = self.blacklist_match(text) {
            debug!(entry, "command denied by blacklist");
            return SafetyVerdict::deny(
                format!("blacklisted operation: {entry}"),
                RiskLevel::High,
                0.0,
                CommandType::Dangerous,
            );
        }

        let breakdown = score_command(&self.tables, text);
        let command_type = classify_command(&self.tables, text);
        let risk_level = RiskLevel::from_score(breakdown.composite);
        debug!(
            score = breakdown.composite,
            level = %risk_level,
            kind = %command_type,
            "command scored"
        );

        let score = breakdown.composite;
        let mut verdict = match self.level {
            SecurityLevel::Strict => {
                if command_type != CommandType::Query {
                    SafetyVerdict::deny(
                        "only read-only queries are allowed at the strict security level",
                        risk_level,
                        score,
                        command_type,
                    )
                } else if risk_level != RiskLevel::Low {
                    SafetyVerdict::deny(
                        "only low-risk commands are allowed at the strict security level",
                        risk_level,
                        score,
                        command_type,
                    )
                } else {
                    SafetyVerdict::allow(risk_level, score, command_type)
                }
            }
            SecurityLevel::Standard => match risk_level {
                RiskLevel::High => SafetyVerdict::deny(
                    "risk too high for the standard security level",
                    risk_level,
                    score,
                    command_type,
                ),
                RiskLevel::Medium => {
                    SafetyVerdict::allow(risk_level, score, command_type).with_confirmation()
                }
                RiskLevel::Low => SafetyVerdict::allow(risk_level, score, command_type),
            },
            SecurityLevel::Relaxed => {
                if risk_level == RiskLevel::High && score >= RELAXED_DENY_SCORE {
                    SafetyVerdict::deny(
                        "command is too dangerous even for the relaxed security level",
                        risk_level,
                        score,
                        command_type,
                    )
                } else if risk_level >= RiskLevel::Medium {
                    SafetyVerdict::allow(risk_level, score, command_type).with_confirmation()
                } else {
                    SafetyVerdict::allow(risk_level, score, command_type)
                }
            }
        };

        self.add_warnings(text, &mut verdict);
        verdict
    }

    /// First blacklist entry (built-in, then custom) contained in the text.
    fn blacklist_match(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.tables
            .blacklist
            .iter()
            .chain(self.custom_blacklist.iter())
            .find(|entry| {
                let entry = entry.trim();
                !entry.is_empty() && lower.contains(&entry.to_lowercase())
            })
            .map(String::as_str)
    }

    fn add_warnings(&self, text: &str, verdict: &mut SafetyVerdict) {
        if contains_ignore_case(text, "-Force") {
            verdict
                .warnings
                .push("-Force suppresses confirmation prompts".to_string());
        }
        if contains_ignore_case(text, "-Recurse") {
            verdict
                .warnings
                .push("-Recurse descends into all child items".to_string());
        }
        if text.contains('*') {
            verdict
                .warnings
                .push("wildcard may match more items than intended".to_string());
        }
        for path in &self.tables.system_paths {
            if contains_ignore_case(text, path) {
                verdict
                    .warnings
                    .push(format!("command touches system location {path}"));
                break;
            }
        }
    }
}
