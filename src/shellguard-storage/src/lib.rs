//! Shellguard storage - the audit trail of every pipeline traversal.
//!
//! A single SQLite table records each command that entered the pipeline,
//! whether it ran or not: denials, operator cancellations, and executions
//! all land here. Secret flag values are redacted before anything touches
//! disk, and a retention sweep trims old records at startup.

pub mod error;
pub mod history;
pub mod paths;
pub mod redact;

// Re-export main types at crate root
pub use error::{Result, StorageError};
pub use history::{
    DEFAULT_QUERY_LIMIT, EXPORT_LIMIT, HistoryQuery, HistoryRecord, HistoryStore, NewHistoryRecord,
    SEARCH_LIMIT,
};
pub use paths::{data_dir, history_db_path};
pub use redact::redact_sensitive;
