//! Core types for the query engine.
//!
//! This module provides:
//! - [`LogEntry`] — One parsed log record
//! - [`LogFile`] / [`LogFileId`] — Addressable log storage units
//! - [`QueryKind`] — The four endpoint kinds
//! - [`LogPage`] / [`QueryResult`] — Successful query payloads
//! - [`QueryResponse`] — The uniform success/failure envelope

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, QueryError, Result};

/// Format of a historical log identifier.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A structured log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the entry was recorded (host wall clock).
    pub timestamp: NaiveDateTime,
    /// Subsystem or device that produced the entry.
    pub source: String,
    /// Free-form text, possibly spanning several lines.
    pub message: String,
}

impl LogEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(
        timestamp: NaiveDateTime,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            source: source.into(),
            message: message.into(),
        }
    }

    /// Appends a continuation line to the message.
    pub fn push_continuation(&mut self, line: &str) {
        self.message.push('\n');
        self.message.push_str(line);
    }
}

/// Identifies a log file: the live log or one day's historical copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogFileId {
    /// The actively appended log.
    Live,
    /// The rotated log for a past calendar day.
    Dated(NaiveDate),
}

impl fmt::Display for LogFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Dated(date) => write!(f, "{}", date.format(DATE_FORMAT)),
        }
    }
}

/// A resolved log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Which log this is.
    pub id: LogFileId,
    /// Where it lives in storage.
    pub path: PathBuf,
}

impl LogFile {
    /// Creates a new log file reference.
    #[must_use]
    pub fn new(id: LogFileId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }
}

/// The kind of query being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// Latest entries of the live log.
    Log,
    /// Latest entries of one historical log.
    History,
    /// Distinct source names in the live log.
    Sources,
    /// Dates that have a historical log.
    Dates,
}

impl QueryKind {
    /// All kinds, in endpoint order.
    pub const ALL: [Self; 4] = [Self::Log, Self::Sources, Self::History, Self::Dates];

    /// Returns the endpoint name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::History => "history",
            Self::Sources => "sources",
            Self::Dates => "dates",
        }
    }

    /// Returns true for kinds that return a page of entries.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        matches!(self, Self::Log | Self::History)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| QueryError::invalid(format!("unknown query kind: {s}")))
    }
}

/// One page of entries, newest first.
///
/// Serializes as the bare entry array; the totals travel out of band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LogPage {
    /// Entries in the window, newest first.
    pub entries: Vec<LogEntry>,
    /// Number of entries that passed the filter, before windowing.
    #[serde(skip)]
    pub total_filtered: usize,
    /// Whether older matching entries exist beyond this page.
    #[serde(skip)]
    pub has_more: bool,
}

impl LogPage {
    /// Number of entries on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the page holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Successful query payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// Page of entries (`log`, `history`).
    Entries(LogPage),
    /// Sorted distinct source names (`sources`).
    Sources(Vec<String>),
    /// Dates with a historical log, newest first (`dates`).
    Dates(Vec<String>),
}

impl QueryResult {
    /// Returns the page if this is an entries result.
    #[must_use]
    pub const fn as_page(&self) -> Option<&LogPage> {
        match self {
            Self::Entries(page) => Some(page),
            Self::Sources(_) | Self::Dates(_) => None,
        }
    }

    /// Returns the string list for `sources` and `dates` results.
    #[must_use]
    pub fn as_names(&self) -> Option<&[String]> {
        match self {
            Self::Entries(_) => None,
            Self::Sources(names) | Self::Dates(names) => Some(names),
        }
    }
}

/// Error half of the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Error category.
    pub error: ErrorKind,
    /// Human-readable explanation.
    pub message: String,
}

impl From<&QueryError> for ErrorBody {
    fn from(err: &QueryError) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Uniform envelope: a full result or an error, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    /// The query succeeded.
    Success(QueryResult),
    /// The query failed; no partial result is carried.
    Failure(ErrorBody),
}

impl QueryResponse {
    /// Returns true for a success envelope.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<QueryResult>> for QueryResponse {
    fn from(result: Result<QueryResult>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(ErrorBody::from(&err)),
        }
    }
}
