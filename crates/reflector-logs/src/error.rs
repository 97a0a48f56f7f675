//! Error types for the query engine.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors that can end a query.
///
/// Malformed log lines never show up here: the parser skips them locally.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A request parameter is missing, malformed, or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested log file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The log file exceeds the configured read limit.
    #[error("log file {} is {size} bytes, limit is {limit} bytes", path.display())]
    FileTooLarge {
        /// File that was refused.
        path: PathBuf,
        /// Bytes seen before giving up (at least `limit + 1`).
        size: u64,
        /// Configured maximum.
        limit: u64,
    },

    /// Storage could not be read for a reason other than absence.
    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Machine-readable error category, as carried in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`QueryError::InvalidArgument`].
    InvalidArgument,
    /// See [`QueryError::NotFound`].
    NotFound,
    /// See [`QueryError::FileTooLarge`].
    FileTooLarge,
    /// See [`QueryError::IoFailure`].
    IoFailure,
}

impl ErrorKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::FileTooLarge => "file_too_large",
            Self::IoFailure => "io_failure",
        }
    }
}

impl QueryError {
    /// Builds an [`QueryError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Classifies an I/O error on `path`, keeping absence distinct from other failures.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::IoFailure { path, source }
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::IoFailure { .. } => ErrorKind::IoFailure,
        }
    }

    /// Returns true if the underlying storage refused access.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::IoFailure { source, .. } if source.kind() == io::ErrorKind::PermissionDenied)
    }
}
