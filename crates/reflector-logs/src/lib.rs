//! # reflector-logs
//!
//! Query engine over an append-only event log and its dated historical copies.
//!
//! This crate provides:
//!
//! - [`QueryEngine`] — Validates, dispatches and answers the four query kinds
//! - [`EntryParser`] / [`LineFormat`] — Raw lines to [`LogEntry`], with continuation folding
//! - [`LogSourceResolver`] — Request kind and date to [`LogFile`]s
//! - [`LogFilter`] — Source equality and case-insensitive search
//! - [`paginate`] — Offset-from-latest, newest-first paging
//! - [`source_index`] / [`date_index`] — Distinct sources and available dates
//! - [`LogStorage`] — Read-only storage seam, with [`FsStorage`] for the local disk
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use reflector_logs::{EngineConfig, LogPaths, QueryEngine, QueryKind};
//!
//! let config = EngineConfig::new(LogPaths::new("/srv/Logs/Events.txt", "/srv/Logs"));
//! let engine = QueryEngine::new(config).expect("valid config");
//!
//! let params = HashMap::from([
//!     ("lines".to_string(), "100".to_string()),
//!     ("source".to_string(), "Z-Wave".to_string()),
//! ]);
//! let response = engine.handle(QueryKind::Log, &params);
//! println!("{}", serde_json::to_string(&response).unwrap_or_default());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod index;
pub mod paginate;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod storage;
pub mod types;

// Re-export main types
pub use config::{EngineConfig, LogPaths, QueryLimits, DEFAULT_LINES, MAX_LINES};
pub use engine::QueryEngine;
pub use error::{ErrorKind, QueryError, Result};
pub use filter::LogFilter;
pub use index::{date_index, source_index};
pub use paginate::paginate;
pub use parser::{EntryParser, LineFormat, ParsedLine, TabDelimitedFormat};
pub use request::{parse_date, QueryRequest};
pub use resolver::LogSourceResolver;
pub use storage::{FsStorage, LogStorage};
pub use types::{
    ErrorBody, LogEntry, LogFile, LogFileId, LogPage, QueryKind, QueryResponse, QueryResult,
};
