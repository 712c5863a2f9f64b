//! Filter builder for history lookups.

use chrono::{DateTime, Utc};

/// Filters applied to a history lookup. All populated fields must match
/// at once; an empty query returns the most recent entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryQuery {
    /// Substring matched against the user input or the stored command.
    pub keyword: Option<String>,
    /// Only entries at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only entries at or before this instant.
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
