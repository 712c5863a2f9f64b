//! Command history persistence.

mod query;
mod store;
#[cfg(test)]
mod tests;
mod types;

pub use query::HistoryQuery;
pub use store::{DEFAULT_QUERY_LIMIT, EXPORT_LIMIT, HistoryStore, SEARCH_LIMIT};
pub use types::{HistoryRecord, NewHistoryRecord};
