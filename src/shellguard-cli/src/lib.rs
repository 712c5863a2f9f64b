//! Shellguard CLI library module.
//!
//! Shared CLI functionality:
//! - `cli/` - argument parsing and command dispatch
//! - `check_cmd` - policy evaluation without execution
//! - `run_cmd` - the full evaluate, confirm, execute, record pipeline
//! - `history_cmd` - audit trail inspection and management

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::warn;

use shellguard_engine::Config;
use shellguard_storage::HistoryStore;

pub mod check_cmd;
pub mod cli;
pub mod history_cmd;
pub mod run_cmd;

/// Open the history store and run the startup retention sweep.
///
/// A failed sweep is logged and ignored; the command itself still runs.
pub fn open_history_store(config: &Config) -> Result<HistoryStore> {
    let store = HistoryStore::open_default()?;
    if config.history.auto_cleanup {
        let cutoff = Utc::now() - Duration::days(i64::from(config.history.retention_days));
        if let Err(e) = store.delete_older_than(cutoff) {
            warn!(error = %e, "history retention sweep failed");
        }
    }
    Ok(store)
}

/// Prompt for a yes/no answer on stdin. Anything but `y` declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
