//! SQLite-backed command history.
//!
//! The store keeps only a path and opens a fresh connection per operation,
//! so clones can be handed to concurrent tasks without shared state.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use shellguard_protocol::{ExecutionStatus, RiskLevel};
use tracing::info;

use crate::error::Result;
use crate::history::query::HistoryQuery;
use crate::history::types::{HistoryRecord, NewHistoryRecord};
use crate::redact::redact_sensitive;

/// Entries returned when a query does not set its own limit.
pub const DEFAULT_QUERY_LIMIT: usize = 50;
/// Default cap on filtered searches.
pub const SEARCH_LIMIT: usize = 100;
/// Newest entries included in a JSON export.
pub const EXPORT_LIMIT: usize = 1000;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS command_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    user_input TEXT NOT NULL,
    generated_command TEXT NOT NULL,
    status INTEGER NOT NULL,
    execution_result TEXT,
    risk_level INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_history_timestamp
    ON command_history (timestamp DESC);
";

const RECORD_COLUMNS: &str =
    "id, timestamp, user_input, generated_command, status, execution_result, risk_level";

/// Handle to the history database.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    db_path: PathBuf,
}

impl HistoryStore {
    /// Open (creating if necessary) the history database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self { db_path };
        let conn = store.connect()?;
        conn.execute_batch(SCHEMA)?;
        Ok(store)
    }

    /// Open the database at the platform default location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::paths::history_db_path()?)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(conn)
    }

    /// Append a record, stamping the current time and redacting secrets
    /// from the command text. Returns the assigned id.
    pub fn append(&self, record: &NewHistoryRecord) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO command_history
                 (timestamp, user_input, generated_command, status, execution_result, risk_level)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                format_timestamp(Utc::now()),
                record.user_input,
                redact_sensitive(&record.command),
                record.status.code(),
                record.output,
                record.risk_level.code(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch records matching every populated filter, newest first.
    pub fn query(&self, query: &HistoryQuery) -> Result<Vec<HistoryRecord>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(keyword) = &query.keyword {
            clauses.push("(user_input LIKE ? OR generated_command LIKE ?)");
            let pattern = format!("%{keyword}%");
            args.push(Box::new(pattern.clone()));
            args.push(Box::new(pattern));
        }
        if let Some(from) = query.from {
            clauses.push("timestamp >= ?");
            args.push(Box::new(format_timestamp(from)));
        }
        if let Some(to) = query.to {
            clauses.push("timestamp <= ?");
            args.push(Box::new(format_timestamp(to)));
        }

        let mut sql = format!("SELECT {RECORD_COLUMNS} FROM command_history");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        // Id breaks ties between entries stamped in the same microsecond.
        sql.push_str(" ORDER BY timestamp DESC, id DESC LIMIT ?");
        args.push(Box::new(query.limit.unwrap_or(DEFAULT_QUERY_LIMIT) as i64));

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(args.iter().map(|arg| arg.as_ref())),
            row_to_record,
        )?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Fetch a single record by id.
    pub fn get(&self, id: i64) -> Result<Option<HistoryRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM command_history WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Delete a single record. Returns whether a row was removed.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM command_history WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Delete every record stamped before `cutoff`. Returns the count removed.
    pub fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let conn = self.connect()?;
        let removed = conn.execute(
            "DELETE FROM command_history WHERE timestamp < ?1",
            params![format_timestamp(cutoff)],
        )?;
        if removed > 0 {
            info!(removed, "expired history entries removed");
        }
        Ok(removed)
    }

    /// Delete every record. Returns the count removed.
    pub fn clear(&self) -> Result<usize> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM command_history", [])?;
        Ok(removed)
    }

    /// Serialize the newest [`EXPORT_LIMIT`] records as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String> {
        let records = self.query(&HistoryQuery::new().with_limit(EXPORT_LIMIT))?;
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

/// RFC 3339 with microseconds and a trailing `Z`, so lexicographic order
/// in SQL matches chronological order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryRecord> {
    let raw_timestamp: String = row.get(1)?;
    let status_code: i64 = row.get(4)?;
    let risk_code: i64 = row.get(6)?;
    Ok(HistoryRecord {
        id: row.get(0)?,
        timestamp: parse_timestamp(&raw_timestamp, 1)?,
        user_input: row.get(2)?,
        command: row.get(3)?,
        // Unknown codes collapse to the default rather than failing the query.
        status: ExecutionStatus::from_code(status_code).unwrap_or_default(),
        output: row.get(5)?,
        risk_level: RiskLevel::from_code(risk_code).unwrap_or_default(),
    })
}
