//! Storage access for log files.
//!
//! This module provides the [`LogStorage`] trait, the only way the engine
//! touches files, and [`FsStorage`], its `std::fs` implementation. Keeping
//! the seam narrow lets tests run the engine over synthetic file sets.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::error::{QueryError, Result};

/// Read-only access to log files.
///
/// Implementors must report absence as [`QueryError::NotFound`] and every
/// other failure as [`QueryError::IoFailure`].
pub trait LogStorage: Send + Sync {
    /// Opens a file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable.
    fn open_for_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    /// Lists the file names in a directory, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing or unreadable.
    fn list_directory(&self, path: &Path) -> Result<Vec<String>>;

    /// Returns true if `path` exists and is a regular file.
    ///
    /// Absence is `Ok(false)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::IoFailure`] if the metadata cannot be read.
    fn is_file(&self, path: &Path) -> Result<bool>;

    /// Reads a whole file, refusing anything larger than `limit` bytes.
    ///
    /// The read is a snapshot: bytes appended after the handle reaches the
    /// end of the file are not seen.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::FileTooLarge`] past the limit, or the open/read error.
    fn read_to_end(&self, path: &Path, limit: u64) -> Result<Vec<u8>> {
        let reader = self.open_for_read(path)?;
        let mut bytes = Vec::new();
        reader
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| QueryError::from_io(path, e))?;

        let size = bytes.len() as u64;
        if size > limit {
            return Err(QueryError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit,
            });
        }
        Ok(bytes)
    }
}

/// Log storage backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    /// Creates a new file system storage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogStorage for FsStorage {
    fn open_for_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = File::open(path).map_err(|e| QueryError::from_io(path, e))?;
        Ok(Box::new(file))
    }

    fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|e| QueryError::from_io(path, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| QueryError::from_io(path, e))?;
            // Names that are not valid UTF-8 cannot carry a date.
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn is_file(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(QueryError::from_io(path, e)),
        }
    }
}
