//! History commands - list, search, delete, clear, export, rerun.

use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use shellguard_engine::Config;
use shellguard_protocol::GeneratedCommand;
use shellguard_storage::{HistoryQuery, HistoryRecord, HistoryStore, SEARCH_LIMIT};

use crate::run_cmd::run_pipeline;

/// History CLI command.
#[derive(Debug, Parser)]
pub struct HistoryCli {
    #[command(subcommand)]
    pub action: HistoryAction,
}

/// History subcommands.
#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// List recent entries, newest first
    List(ListArgs),
    /// Search entries by keyword, optionally bounded by date
    Search(SearchArgs),
    /// Delete a single entry
    Delete(DeleteArgs),
    /// Delete every entry
    Clear(ClearArgs),
    /// Export the newest entries as JSON
    Export(ExportArgs),
    /// Re-evaluate a stored command and run it again
    Rerun(RerunArgs),
}

/// Arguments for history list.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Maximum number of entries to show
    #[arg(long, short = 'n', value_name = "N")]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for history search.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Substring to match against the request or the command
    #[arg(required = true, value_name = "KEYWORD")]
    pub keyword: String,

    /// Only entries on or after this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE", value_parser = parse_from_date)]
    pub from: Option<DateTime<Utc>>,

    /// Only entries on or before this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE", value_parser = parse_to_date)]
    pub to: Option<DateTime<Utc>>,

    /// Maximum number of entries to show
    #[arg(long, short = 'n', value_name = "N", default_value_t = SEARCH_LIMIT)]
    pub limit: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for history delete.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Id of the entry to delete
    #[arg(required = true, value_name = "ID")]
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for history clear.
#[derive(Debug, Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for history export.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for history rerun.
#[derive(Debug, Args)]
pub struct RerunArgs {
    /// Id of the entry to run again
    #[arg(required = true, value_name = "ID")]
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl HistoryCli {
    /// Run the history command.
    pub async fn run(self, config: Config) -> Result<()> {
        let store = crate::open_history_store(&config)?;
        match self.action {
            HistoryAction::List(args) => run_list(&store, args),
            HistoryAction::Search(args) => run_search(&store, args),
            HistoryAction::Delete(args) => run_delete(&store, args),
            HistoryAction::Clear(args) => run_clear(&store, args),
            HistoryAction::Export(args) => run_export(&store, args),
            HistoryAction::Rerun(args) => run_rerun(&config, &store, args).await,
        }
    }
}

fn run_list(store: &HistoryStore, args: ListArgs) -> Result<()> {
    let mut query = HistoryQuery::new();
    if let Some(limit) = args.limit {
        query = query.with_limit(limit);
    }
    let records = store.query(&query)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_records(&records);
    }
    Ok(())
}

fn run_search(store: &HistoryStore, args: SearchArgs) -> Result<()> {
    let mut query = HistoryQuery::new()
        .with_keyword(args.keyword)
        .with_limit(args.limit);
    if let Some(from) = args.from {
        query = query.with_from(from);
    }
    if let Some(to) = args.to {
        query = query.with_to(to);
    }
    let records = store.query(&query)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_records(&records);
    }
    Ok(())
}

fn run_delete(store: &HistoryStore, args: DeleteArgs) -> Result<()> {
    if !args.yes && !crate::confirm(&format!("Delete history entry {}?", args.id))? {
        println!("Cancelled.");
        return Ok(());
    }

    if store.delete(args.id)? {
        println!("Deleted entry {}.", args.id);
        Ok(())
    } else {
        bail!("no history entry with id {}", args.id);
    }
}

fn run_clear(store: &HistoryStore, args: ClearArgs) -> Result<()> {
    if !args.yes && !crate::confirm("Delete all history entries?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = store.clear()?;
    println!("Removed {removed} entries.");
    Ok(())
}

fn run_export(store: &HistoryStore, args: ExportArgs) -> Result<()> {
    let json = store.export_json()?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)?;
            println!("Exported history to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn run_rerun(config: &Config, store: &HistoryStore, args: RerunArgs) -> Result<()> {
    let Some(record) = store.get(args.id)? else {
        bail!("no history entry with id {}", args.id);
    };

    println!("Re-running: {}", record.command);
    let mut command = GeneratedCommand::new(&record.command);
    if !record.user_input.is_empty() {
        command = command.with_description(&record.user_input);
    }
    // Scored from scratch; the stored risk level is not trusted.
    run_pipeline(config, store, &command, args.yes).await
}

fn print_records(records: &[HistoryRecord]) {
    if records.is_empty() {
        println!("No history entries.");
        return;
    }
    for record in records {
        println!(
            "{:>5}  {}  {:<6}  {:<12}  {}",
            record.id,
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            record.risk_level.to_string(),
            record.status.to_string(),
            record.command
        );
        if !record.user_input.is_empty() {
            println!("       request: {}", record.user_input);
        }
    }
}

/// Lower bound: date-only values mean the start of that day, UTC.
pub(crate) fn parse_from_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    parse_naive_date(s).and_then(|date| {
        date.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("invalid date: {s}"))
    })
}

/// Upper bound: date-only values cover the whole day, UTC.
pub(crate) fn parse_to_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    parse_naive_date(s).and_then(|date| {
        date.and_hms_micro_opt(23, 59, 59, 999_999)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("invalid date: {s}"))
    })
}

fn parse_naive_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date: {s} (expected YYYY-MM-DD or RFC 3339)"))
}
