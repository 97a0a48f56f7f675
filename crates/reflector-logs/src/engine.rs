//! The query engine.
//!
//! [`QueryEngine`] validates a request, resolves the files it needs, and
//! runs parse → filter → paginate, or one of the index builders. It keeps no
//! state between requests: every call re-reads the files, so a page always
//! reflects the log as it was when the file was opened.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{QueryError, Result};
use crate::index::{date_index, source_index};
use crate::paginate::paginate;
use crate::parser::{decode, EntryParser, LineFormat, TabDelimitedFormat};
use crate::request::QueryRequest;
use crate::resolver::LogSourceResolver;
use crate::storage::{FsStorage, LogStorage};
use crate::types::{LogEntry, LogFile, LogPage, QueryKind, QueryResponse, QueryResult};

/// Answers `log`, `history`, `sources` and `dates` queries.
///
/// The engine is `Send + Sync` and holds no mutable state, so one instance
/// can serve concurrent requests behind an `Arc`.
pub struct QueryEngine<F = TabDelimitedFormat> {
    config: EngineConfig,
    resolver: LogSourceResolver,
    storage: Arc<dyn LogStorage>,
    parser: EntryParser<F>,
}

impl<F> std::fmt::Debug for QueryEngine<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryEngine<TabDelimitedFormat> {
    /// Creates an engine over the local file system.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_storage(config, Arc::new(FsStorage::new()))
    }

    /// Creates an engine over custom storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_storage(config: EngineConfig, storage: Arc<dyn LogStorage>) -> Result<Self> {
        Self::with_parser(config, storage, EntryParser::new())
    }
}

impl<F: LineFormat> QueryEngine<F> {
    /// Creates an engine with a custom line grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_parser(
        config: EngineConfig,
        storage: Arc<dyn LogStorage>,
        parser: EntryParser<F>,
    ) -> Result<Self> {
        config.validate()?;
        let resolver = LogSourceResolver::new(config.paths.clone(), Arc::clone(&storage));
        Ok(Self {
            config,
            resolver,
            storage,
            parser,
        })
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates a flat parameter map into a request.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] for malformed parameters.
    pub fn request(&self, kind: QueryKind, params: &HashMap<String, String>) -> Result<QueryRequest> {
        QueryRequest::from_params(kind, params, &self.config.limits)
    }

    /// Validates and runs a query, wrapping the outcome in the response envelope.
    pub fn handle(&self, kind: QueryKind, params: &HashMap<String, String>) -> QueryResponse {
        let result = self
            .request(kind, params)
            .and_then(|request| self.execute(&request));
        if let Err(ref err) = result {
            debug!(kind = %kind, error = %err, "query failed");
        }
        QueryResponse::from(result)
    }

    /// Runs a validated query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] for a zero page size,
    /// [`QueryError::NotFound`] for a missing log, and
    /// [`QueryError::FileTooLarge`] / [`QueryError::IoFailure`] when a file cannot be read.
    pub fn execute(&self, request: &QueryRequest) -> Result<QueryResult> {
        debug!(
            kind = %request.kind,
            lines = request.lines,
            offset = request.offset,
            source = ?request.source,
            search = ?request.search,
            "executing query"
        );

        match request.kind {
            QueryKind::Log | QueryKind::History => {
                if request.lines == 0 {
                    return Err(QueryError::invalid("lines must be at least 1"));
                }
                let files = self.resolver.resolve(request.kind, request.date)?;
                self.read_page(&files, request).map(QueryResult::Entries)
            }
            QueryKind::Sources => self.sources().map(QueryResult::Sources),
            QueryKind::Dates => self.dates().map(QueryResult::Dates),
        }
    }

    /// Distinct source names in the live log, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the live log cannot be read.
    pub fn sources(&self) -> Result<Vec<String>> {
        let files = self.resolver.resolve(QueryKind::Sources, None)?;
        let texts = self.read_texts(&files)?;
        Ok(source_index(self.scan_all(&files, &texts)))
    }

    /// Dates that have a historical log, newest first.
    ///
    /// A missing history directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the history directory exists but cannot be listed.
    pub fn dates(&self) -> Result<Vec<String>> {
        let dir = &self.config.paths.history_dir;
        let names = match self.storage.list_directory(dir) {
            Ok(names) => names,
            Err(QueryError::NotFound(_)) => {
                warn!(path = %dir.display(), "history directory not found");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        Ok(date_index(names, |name| self.resolver.date_from_file_name(name)))
    }

    fn read_page(&self, files: &[LogFile], request: &QueryRequest) -> Result<LogPage> {
        let texts = self.read_texts(files)?;
        let filter = request.filter();
        let lines = request.lines.min(self.config.limits.max_lines);
        let page = paginate(
            self.scan_all(files, &texts),
            |entry| filter.matches(entry),
            request.offset,
            lines,
        );
        debug!(
            returned = page.len(),
            total_filtered = page.total_filtered,
            has_more = page.has_more,
            "page built"
        );
        Ok(page)
    }

    /// Reads every file up front so a failure leaves no partial result.
    fn read_texts(&self, files: &[LogFile]) -> Result<Vec<String>> {
        files.iter().map(|file| self.read_text(file)).collect()
    }

    fn read_text(&self, file: &LogFile) -> Result<String> {
        let bytes = self
            .storage
            .read_to_end(&file.path, self.config.limits.max_file_size)
            .inspect_err(|err| {
                if let QueryError::FileTooLarge { size, limit, .. } = err {
                    warn!(path = %file.path.display(), size, limit, "log file exceeds read limit");
                }
            })?;
        let (text, fallback) = decode(bytes);
        if fallback {
            warn!(path = %file.path.display(), "log file is not valid UTF-8; decoded as Latin-1");
        }
        Ok(text)
    }

    fn scan_all<'a>(
        &'a self,
        files: &'a [LogFile],
        texts: &'a [String],
    ) -> impl Iterator<Item = LogEntry> + 'a {
        files
            .iter()
            .zip(texts)
            .flat_map(move |(file, text)| self.scan(file, text))
    }

    /// Parses one file's text, reporting unparseable leading lines once exhausted.
    fn scan<'a>(&'a self, file: &'a LogFile, text: &'a str) -> impl Iterator<Item = LogEntry> + 'a {
        let mut entries = self.parser.entries(text);
        let mut parsed = 0usize;
        let mut finished = false;
        std::iter::from_fn(move || {
            if finished {
                return None;
            }
            if let Some(entry) = entries.next() {
                parsed += 1;
                return Some(entry);
            }
            finished = true;
            let unparsed = entries.unparsed_leading();
            if unparsed > 0 && parsed == 0 {
                warn!(
                    path = %file.path.display(),
                    file = %file.id,
                    unparsed,
                    "no line matched the expected log format"
                );
            } else if unparsed > 0 {
                debug!(
                    path = %file.path.display(),
                    file = %file.id,
                    unparsed,
                    "skipped lines before the first entry"
                );
            }
            None
        })
    }
}
