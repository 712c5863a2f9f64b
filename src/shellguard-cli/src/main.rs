//! Shellguard CLI - main entry point.
//!
//! Front-end for the safety pipeline:
//! - `check` evaluates a command without running it
//! - `run` evaluates, confirms, executes, and records
//! - `history` inspects and manages the audit trail
//!
//! Argument parsing and dispatch live in `cli/`; each subcommand has its
//! own `*_cmd.rs` module.

use anyhow::Result;
use clap::Parser;

use shellguard_cli::cli::{Cli, LogLevel, dispatch_command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout belongs to the command being run.
    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        cli.log_level
    };
    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.as_filter_str().to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    dispatch_command(cli).await
}
