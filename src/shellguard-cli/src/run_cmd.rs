//! Run command - the full evaluate, confirm, execute, record pipeline.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use shellguard_engine::{Config, execute};
use shellguard_protocol::{ExecutionStatus, GeneratedCommand, SecurityLevel};
use shellguard_storage::{HistoryStore, NewHistoryRecord};

use crate::cli::args::parse_security_level;

/// Run CLI command.
#[derive(Debug, Parser)]
pub struct RunCli {
    /// Command text to evaluate and execute
    #[arg(required = true, value_name = "COMMAND")]
    pub command: String,

    /// Natural-language request to record alongside the command
    #[arg(long = "request", short = 'r', value_name = "TEXT")]
    pub request: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,

    /// Override the execution timeout in seconds
    #[arg(long = "timeout", short = 't', value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Security level override (strict, standard, relaxed)
    #[arg(long = "level", short = 'l', value_name = "LEVEL", value_parser = parse_security_level)]
    pub level: Option<SecurityLevel>,
}

impl RunCli {
    /// Run the run command.
    pub async fn run(self, mut config: Config) -> Result<()> {
        if let Some(level) = self.level {
            config.safety.security_level = level;
        }
        if let Some(secs) = self.timeout {
            config.execution.timeout_secs = secs;
        }

        let store = crate::open_history_store(&config)?;
        let mut command = GeneratedCommand::new(&self.command);
        if let Some(request) = &self.request {
            command = command.with_description(request);
        }
        run_pipeline(&config, &store, &command, self.yes).await
    }
}

/// Evaluate `command`, confirm when required, execute it, and record the
/// outcome. Shared with `history rerun`; the exit code mirrors the result.
pub(crate) async fn run_pipeline(
    config: &Config,
    store: &HistoryStore,
    command: &GeneratedCommand,
    yes: bool,
) -> Result<()> {
    let policy = config.safety_policy();
    let verdict = policy.evaluate(&command.text);
    let assessed = command.rescored(&verdict);

    for warning in &verdict.warnings {
        eprintln!("warning: {warning}");
    }

    if verdict.is_denied() {
        let reason = verdict.reason.as_deref().unwrap_or("denied by policy");
        record(
            store,
            &assessed,
            ExecutionStatus::NotExecuted,
            Some(reason.to_string()),
        );
        eprintln!("Denied: {reason}");
        std::process::exit(1);
    }

    if verdict.requires_confirmation && !yes {
        let accepted = crate::confirm(&format!(
            "Execute '{}' ({} risk)?",
            assessed.text, assessed.risk_level
        ))?;
        if !accepted {
            record(store, &assessed, ExecutionStatus::Cancelled, None);
            println!("Cancelled.");
            return Ok(());
        }
    }

    let result = execute(config.exec_request(&assessed.text)).await;

    if !result.stdout.is_empty() {
        print!("{}", result.stdout);
        let _ = std::io::stdout().flush();
    }
    if !result.stderr.is_empty() {
        eprint!("{}", result.stderr);
    }

    let status = if result.success {
        ExecutionStatus::Success
    } else {
        ExecutionStatus::Failed
    };
    record(
        store,
        &assessed,
        status,
        Some(result.output_for_record().to_string()),
    );

    if result.success {
        Ok(())
    } else {
        std::process::exit(result.exit_code.max(1));
    }
}

/// Append a history entry; storage failures are logged, not fatal.
fn record(
    store: &HistoryStore,
    command: &GeneratedCommand,
    status: ExecutionStatus,
    output: Option<String>,
) {
    let mut entry = NewHistoryRecord::new(
        command.description.clone().unwrap_or_default(),
        command.text.clone(),
        status,
        command.risk_level,
    );
    if let Some(output) = output {
        entry = entry.with_output(output);
    }
    if let Err(e) = store.append(&entry) {
        warn!(error = %e, "failed to record history entry");
    }
}
