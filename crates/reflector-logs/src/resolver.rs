//! Mapping from a request to the log files it reads.
//!
//! Historical logs are named `<YYYY-MM-DD><suffix>` inside the history
//! directory; both the encoding and the decoding of that convention live here.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::config::LogPaths;
use crate::error::{QueryError, Result};
use crate::request::is_date_shaped;
use crate::storage::LogStorage;
use crate::types::{LogFile, LogFileId, QueryKind, DATE_FORMAT};

/// Resolves request kinds to log files.
#[derive(Clone)]
pub struct LogSourceResolver {
    paths: LogPaths,
    storage: Arc<dyn LogStorage>,
}

impl std::fmt::Debug for LogSourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSourceResolver")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl LogSourceResolver {
    /// Creates a resolver over the given locations.
    #[must_use]
    pub fn new(paths: LogPaths, storage: Arc<dyn LogStorage>) -> Self {
        Self { paths, storage }
    }

    /// Returns the files to read for a request, oldest contribution first.
    ///
    /// `dates` reads no file contents and resolves to an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] when `history` has no date,
    /// [`QueryError::NotFound`] when no file exists for that date, and
    /// [`QueryError::IoFailure`] when its existence cannot be checked.
    pub fn resolve(&self, kind: QueryKind, date: Option<NaiveDate>) -> Result<Vec<LogFile>> {
        match kind {
            QueryKind::Log | QueryKind::Sources => Ok(vec![self.live()]),
            QueryKind::History => {
                let date = date.ok_or_else(|| {
                    QueryError::invalid("missing 'date' parameter (YYYY-MM-DD)")
                })?;
                let file = self.dated(date);
                if !self.storage.is_file(&file.path)? {
                    debug!(path = %file.path.display(), "no historical log for date");
                    return Err(QueryError::NotFound(format!(
                        "no log file for {}",
                        date.format(DATE_FORMAT)
                    )));
                }
                Ok(vec![file])
            }
            QueryKind::Dates => Ok(Vec::new()),
        }
    }

    /// The live log file.
    #[must_use]
    pub fn live(&self) -> LogFile {
        LogFile::new(LogFileId::Live, self.paths.live_log.clone())
    }

    /// The historical log file for `date`, whether or not it exists.
    #[must_use]
    pub fn dated(&self, date: NaiveDate) -> LogFile {
        LogFile::new(LogFileId::Dated(date), self.history_path(date))
    }

    /// Path of the historical log for `date`.
    #[must_use]
    pub fn history_path(&self, date: NaiveDate) -> PathBuf {
        self.paths.history_dir.join(format!(
            "{}{}",
            date.format(DATE_FORMAT),
            self.paths.history_suffix
        ))
    }

    /// Extracts the date from a historical log file name.
    ///
    /// Returns `None` for any name that does not follow the convention or
    /// whose date does not exist on the calendar.
    #[must_use]
    pub fn date_from_file_name(&self, name: &str) -> Option<NaiveDate> {
        let date_part = name.strip_suffix(self.paths.history_suffix.as_str())?;
        if !is_date_shaped(date_part) {
            return None;
        }
        NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
    }
}
