//! Command risk scoring and policy evaluation.
//!
//! Pure functions over immutable pattern tables; no I/O happens here.

mod patterns;
mod policy;
mod score;

pub use patterns::{
    BUILTIN_BLACKLIST, DANGEROUS_FLAGS, DESTRUCTIVE_VERBS, MUTATING_VERBS, PatternTables,
    READONLY_VERBS, SYSTEM_PATHS,
};
pub use policy::{EMPTY_COMMAND_REASON, SafetyPolicy};
pub use score::{RiskBreakdown, classify_command, score_command};
