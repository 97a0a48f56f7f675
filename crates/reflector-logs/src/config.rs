//! Engine configuration: where the logs live and how much a query may read.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Default page size when `lines` is absent.
pub const DEFAULT_LINES: usize = 500;

/// Upper bound for `lines`; larger requests are clamped.
pub const MAX_LINES: usize = 5000;

/// Default per-file read limit: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Default suffix of historical log file names (`2026-02-15 Events.txt`).
pub const DEFAULT_HISTORY_SUFFIX: &str = " Events.txt";

/// Locations of the live log and the historical log directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogPaths {
    /// The actively appended log file.
    pub live_log: PathBuf,
    /// Directory holding one file per past day.
    pub history_dir: PathBuf,
    /// File name suffix following the `YYYY-MM-DD` prefix.
    pub history_suffix: String,
}

impl Default for LogPaths {
    fn default() -> Self {
        Self {
            live_log: PathBuf::from("Logs/Events.txt"),
            history_dir: PathBuf::from("Logs"),
            history_suffix: DEFAULT_HISTORY_SUFFIX.to_string(),
        }
    }
}

impl LogPaths {
    /// Creates paths for the given live log and history directory.
    #[must_use]
    pub fn new(live_log: impl Into<PathBuf>, history_dir: impl Into<PathBuf>) -> Self {
        Self {
            live_log: live_log.into(),
            history_dir: history_dir.into(),
            ..Self::default()
        }
    }

    /// Sets the historical file name suffix.
    #[must_use]
    pub fn with_history_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.history_suffix = suffix.into();
        self
    }
}

/// Bounds applied to every paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    /// Page size used when the request omits `lines`.
    pub default_lines: usize,
    /// Largest page size; bigger requests are clamped to it.
    pub max_lines: usize,
    /// Largest file the engine will read, in bytes.
    pub max_file_size: u64,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_lines: DEFAULT_LINES,
            max_lines: MAX_LINES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl QueryLimits {
    /// Sets the default page size.
    #[must_use]
    pub const fn with_default_lines(mut self, lines: usize) -> Self {
        self.default_lines = lines;
        self
    }

    /// Sets the maximum page size.
    #[must_use]
    pub const fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines = lines;
        self
    }

    /// Sets the per-file read limit.
    #[must_use]
    pub const fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log locations.
    pub paths: LogPaths,
    /// Query bounds.
    pub limits: QueryLimits,
}

impl EngineConfig {
    /// Creates a configuration for the given locations with default limits.
    #[must_use]
    pub fn new(paths: LogPaths) -> Self {
        Self {
            paths,
            limits: QueryLimits::default(),
        }
    }

    /// Sets the query limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is zero or the default page size exceeds the maximum.
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.max_lines == 0 {
            return Err(QueryError::invalid("max_lines must be at least 1"));
        }
        if limits.default_lines == 0 || limits.default_lines > limits.max_lines {
            return Err(QueryError::invalid(format!(
                "default_lines must be between 1 and {}",
                limits.max_lines
            )));
        }
        if limits.max_file_size == 0 {
            return Err(QueryError::invalid("max_file_size must be at least 1"));
        }
        if self.paths.history_suffix.contains(['/', '\\']) {
            return Err(QueryError::invalid(
                "history_suffix must not contain path separators",
            ));
        }
        Ok(())
    }
}
