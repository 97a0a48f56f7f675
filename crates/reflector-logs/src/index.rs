//! Auxiliary indexes derived from the log files.
//!
//! This module provides:
//! - [`source_index`] — Distinct source names, sorted
//! - [`date_index`] — Available historical dates, newest first
//!
//! Both are rebuilt from scratch per request; nothing is cached.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::types::{LogEntry, DATE_FORMAT};

/// Collects the distinct, non-empty `source` values of `entries`.
///
/// The result is sorted in case-sensitive lexical order.
pub fn source_index<I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = LogEntry>,
{
    entries
        .into_iter()
        .map(|entry| entry.source)
        .filter(|source| !source.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Extracts the dates of historical logs from directory entries.
///
/// `date_of` maps a file name to its date, or `None` for names that are not
/// historical logs. Duplicates collapse; the result is newest first.
pub fn date_index<I, S, F>(names: I, date_of: F) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> Option<NaiveDate>,
{
    names
        .into_iter()
        .filter_map(|name| date_of(name.as_ref()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .map(|date| date.format(DATE_FORMAT).to_string())
        .collect()
}
