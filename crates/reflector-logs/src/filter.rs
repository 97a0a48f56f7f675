//! Entry filtering.
//!
//! [`LogFilter`] is the single predicate applied before pagination. Every
//! criterion is optional; the ones present are combined with AND.

use crate::types::LogEntry;

/// Filter criteria for log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Exact, case-sensitive source name.
    pub source: Option<String>,
    /// Message substring, stored lowercased for case-insensitive matching.
    pub search: Option<String>,
}

impl LogFilter {
    /// Creates an empty filter that matches every entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from optional source and search criteria.
    #[must_use]
    pub fn build(source: Option<&str>, search: Option<&str>) -> Self {
        let filter = Self::new();
        let filter = match source {
            Some(source) => filter.with_source(source),
            None => filter,
        };
        match search {
            Some(search) => filter.with_search(search),
            None => filter,
        }
    }

    /// Keeps only entries from this source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Keeps only entries whose message contains `text`, ignoring case.
    #[must_use]
    pub fn with_search(mut self, text: impl AsRef<str>) -> Self {
        self.search = Some(text.as_ref().to_lowercase());
        self
    }

    /// Returns true if no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.source.is_none() && self.search.is_none()
    }

    /// Checks if an entry passes every criterion.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(ref source) = self.source {
            if entry.source != *source {
                return false;
            }
        }

        if let Some(ref search) = self.search {
            if !entry.message.to_lowercase().contains(search.as_str()) {
                return false;
            }
        }

        true
    }
}
