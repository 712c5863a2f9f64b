//! Weighted risk scoring and command classification.
//!
//! Each command gets four component scores (verb, path, parameters, scope),
//! combined into a weighted composite in `[0, 100]`. The weights and the
//! component values are behavioral contract: changing them changes which
//! commands the policy lets through.

use once_cell::sync::Lazy;
use regex::Regex;
use shellguard_protocol::CommandType;

use super::patterns::PatternTables;

/// Component weights. Must sum to 1.0.
const VERB_WEIGHT: f64 = 0.4;
const PATH_WEIGHT: f64 = 0.3;
const PARAM_WEIGHT: f64 = 0.2;
const SCOPE_WEIGHT: f64 = 0.1;

/// Score for a verb not present in any table.
const UNKNOWN_VERB_RISK: f64 = 40.0;

/// Leading cmdlet token at the start of a command.
static CMDLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w-]+").expect("Invalid cmdlet regex"));

/// Absolute drive-letter path, uppercase drive letters only.
static DRIVE_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]:\\").expect("Invalid drive path regex"));

/// Per-component sub-scores and the weighted composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBreakdown {
    pub verb: f64,
    pub path: f64,
    pub params: f64,
    pub scope: f64,
    /// `verb*0.4 + path*0.3 + params*0.2 + scope*0.1`, clamped to 100.
    pub composite: f64,
}

/// Score a command against the given tables.
pub fn score_command(tables: &PatternTables, text: &str) -> RiskBreakdown {
    let cmdlet = extract_cmdlet(text);
    let verb = verb_risk(tables, cmdlet);
    let path = path_risk(tables, text);
    let params = parameter_risk(tables, text);
    let scope = scope_risk(text);
    let composite = (verb * VERB_WEIGHT
        + path * PATH_WEIGHT
        + params * PARAM_WEIGHT
        + scope * SCOPE_WEIGHT)
        .min(100.0);

    RiskBreakdown {
        verb,
        path,
        params,
        scope,
        composite,
    }
}

/// Classify a command by its cmdlet token.
///
/// Read-only verbs win outright; otherwise the token's noun decides, and
/// anything unrecognized counts as a file operation.
pub fn classify_command(tables: &PatternTables, text: &str) -> CommandType {
    let Some(cmdlet) = extract_cmdlet(text) else {
        return CommandType::FileOperation;
    };

    if tables.readonly_verbs.iter().any(|v| verb_matches(cmdlet, v)) {
        return CommandType::Query;
    }

    let lower = cmdlet.to_lowercase();
    if lower.contains("file") || lower.contains("item") || lower.contains("content") {
        CommandType::FileOperation
    } else if lower.contains("service") || lower.contains("process") || lower.contains("registry") {
        CommandType::SystemConfig
    } else if lower.contains("net") || lower.contains("web") {
        CommandType::NetworkOperation
    } else {
        CommandType::FileOperation
    }
}

/// Leading cmdlet token of the command, if any.
pub(crate) fn extract_cmdlet(text: &str) -> Option<&str> {
    CMDLET_RE.find(text.trim()).map(|m| m.as_str())
}

/// Case-insensitive substring check.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether `cmdlet` starts with `verb-` (case-insensitive). A bare verb with
/// no dash never matches; it falls through to the unknown-verb score.
fn verb_matches(cmdlet: &str, verb: &str) -> bool {
    let prefix = format!("{}-", verb.to_lowercase());
    cmdlet.to_lowercase().starts_with(&prefix)
}

fn verb_risk(tables: &PatternTables, cmdlet: Option<&str>) -> f64 {
    let Some(cmdlet) = cmdlet else {
        return UNKNOWN_VERB_RISK;
    };

    if tables
        .destructive_verbs
        .iter()
        .any(|v| verb_matches(cmdlet, v))
    {
        return 100.0;
    }
    if tables.mutating_verbs.iter().any(|v| verb_matches(cmdlet, v)) {
        return 50.0;
    }
    if tables.readonly_verbs.iter().any(|v| verb_matches(cmdlet, v)) {
        return 10.0;
    }
    UNKNOWN_VERB_RISK
}

fn path_risk(tables: &PatternTables, text: &str) -> f64 {
    if tables
        .system_paths
        .iter()
        .any(|p| contains_ignore_case(text, p))
    {
        return 100.0;
    }
    if contains_ignore_case(text, "$env:USERPROFILE") || text.contains("~\\") {
        return 50.0;
    }
    if DRIVE_PATH_RE.is_match(text) {
        return 30.0;
    }
    10.0
}

fn parameter_risk(tables: &PatternTables, text: &str) -> f64 {
    let mut risk: f64 = 0.0;
    for flag in &tables.dangerous_flags {
        if contains_ignore_case(text, flag) {
            risk += 30.0;
        }
    }
    risk.min(100.0)
}

/// First match wins: a wildcard outranks an explicit `-Recurse`.
fn scope_risk(text: &str) -> f64 {
    if text.contains('*') {
        return 80.0;
    }
    if contains_ignore_case(text, "-Recurse") {
        return 90.0;
    }
    if text.contains('|') {
        return 40.0;
    }
    10.0
}
