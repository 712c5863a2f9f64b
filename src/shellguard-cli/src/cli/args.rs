//! CLI argument structures and parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shellguard_protocol::SecurityLevel;

use crate::check_cmd::CheckCli;
use crate::history_cmd::HistoryCli;
use crate::run_cmd::RunCli;

/// Log verbosity level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Shellguard CLI - safety gate for generated shell commands.
#[derive(Parser)]
#[command(name = "shellguard")]
#[command(author, version)]
#[command(
    about = "Check, run, and audit generated shell commands",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output (same as --log-level debug)
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Set log verbosity level
    #[arg(
        long = "log-level",
        short = 'L',
        value_enum,
        default_value = "warn",
        global = true
    )]
    pub log_level: LogLevel,

    /// Path to the config file (defaults to the OS config directory)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a command against the safety policy without running it
    #[command(visible_alias = "c", display_order = 1)]
    Check(CheckCli),

    /// Evaluate a command, then execute it in the sandboxed interpreter
    #[command(visible_alias = "r", display_order = 2)]
    Run(RunCli),

    /// Inspect and manage the command history
    #[command(visible_alias = "h", display_order = 3)]
    History(HistoryCli),
}

/// Value parser for `--level` overrides.
pub(crate) fn parse_security_level(s: &str) -> Result<SecurityLevel, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_filter_strings() {
        assert_eq!(LogLevel::Error.as_filter_str(), "error");
        assert_eq!(LogLevel::Warn.as_filter_str(), "warn");
        assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
    }

    #[test]
    fn test_default_log_level_is_warn() {
        let cli = Cli::parse_from(["shellguard", "check", "Get-Date"]);
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["shellguard", "check", "Get-Date", "-v", "-L", "debug"]);
        assert!(cli.verbose);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_config_override_path() {
        let cli = Cli::parse_from(["shellguard", "--config", "/tmp/sg.toml", "check", "Get-Date"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/sg.toml")));
    }

    #[test]
    fn test_parse_security_level_values() {
        assert_eq!(parse_security_level("strict"), Ok(SecurityLevel::Strict));
        assert_eq!(parse_security_level("RELAXED"), Ok(SecurityLevel::Relaxed));
        assert!(parse_security_level("paranoid").is_err());
    }
}
