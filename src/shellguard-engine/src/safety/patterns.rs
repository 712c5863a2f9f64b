//! Pattern tables for risk scoring and policy evaluation.

/// Verbs that destroy, disable, or erase things.
pub const DESTRUCTIVE_VERBS: &[&str] = &[
    "Remove",
    "Delete",
    "Clear",
    "Format",
    "Stop",
    "Disable",
    "Uninstall",
];

/// Verbs that create or mutate state without being outright destructive.
pub const MUTATING_VERBS: &[&str] = &[
    "Set", "New", "Move", "Rename", "Copy", "Start", "Enable", "Install",
];

/// Read-only verbs.
pub const READONLY_VERBS: &[&str] = &[
    "Get", "Show", "Test", "Measure", "Find", "Search", "Read", "Select",
];

/// Locations whose mention marks a command as touching the system itself.
pub const SYSTEM_PATHS: &[&str] = &[
    "C:\\Windows",
    "C:\\Program Files",
    "C:\\Program Files (x86)",
    "$env:SystemRoot",
    "$env:ProgramFiles",
    "HKLM:",
    "HKCU:\\Software\\Microsoft\\Windows",
];

/// Flags that widen blast radius or suppress confirmation prompts.
pub const DANGEROUS_FLAGS: &[&str] = &["-Force", "-Recurse", "-Confirm:$false", "-WhatIf:$false"];

/// Operations denied under every security level.
pub const BUILTIN_BLACKLIST: &[&str] = &[
    // Disk destruction
    "Format-Volume",
    "diskpart",
    "Clear-Disk",
    "Initialize-Disk",
    "Remove-Partition",
    // Machine-level state
    "Clear-RecycleBin",
    "Stop-Computer",
    "Restart-Computer",
    "Set-ExecutionPolicy",
];

/// Immutable pattern tables driving scoring and classification.
///
/// Built once (normally from the constants above) and passed by reference
/// into the scoring functions, so tests can substitute alternative tables.
#[derive(Debug, Clone)]
pub struct PatternTables {
    /// Verbs scoring 100.
    pub destructive_verbs: Vec<String>,
    /// Verbs scoring 50.
    pub mutating_verbs: Vec<String>,
    /// Verbs scoring 10; also drive `CommandType::Query` classification.
    pub readonly_verbs: Vec<String>,
    /// Locations scoring 100 on the path axis.
    pub system_paths: Vec<String>,
    /// Flags adding 30 each on the parameter axis.
    pub dangerous_flags: Vec<String>,
    /// Substrings denied outright.
    pub blacklist: Vec<String>,
}

impl PatternTables {
    /// Tables built from the built-in constants.
    pub fn builtin() -> Self {
        Self {
            destructive_verbs: owned(DESTRUCTIVE_VERBS),
            mutating_verbs: owned(MUTATING_VERBS),
            readonly_verbs: owned(READONLY_VERBS),
            system_paths: owned(SYSTEM_PATHS),
            dangerous_flags: owned(DANGEROUS_FLAGS),
            blacklist: owned(BUILTIN_BLACKLIST),
        }
    }
}

impl Default for PatternTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
