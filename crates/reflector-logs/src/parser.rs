//! Log line parsing.
//!
//! This module provides:
//! - [`LineFormat`] — The pluggable line grammar
//! - [`TabDelimitedFormat`] — The host's `timestamp<TAB>source<TAB>message` grammar
//! - [`EntryParser`] — Folds continuation lines into the previous entry
//! - [`decode`] — UTF-8 decoding with a Latin-1 fallback

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::LogEntry;

/// Timestamp layout of the tab-delimited format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

static TAB_DELIMITED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d+)\t+(\S.*?)\t+(.*)$")
        .unwrap_or_else(|_| unreachable!())
});

/// Grammar for one raw log line.
///
/// Returns `None` when the line does not start a new entry. The caller
/// decides whether such a line continues the previous entry.
pub trait LineFormat: Send + Sync {
    /// Parses a line that starts a new entry.
    fn parse_line(&self, line: &str) -> Option<LogEntry>;
}

/// The host format: `YYYY-MM-DD HH:MM:SS.fff`, tab(s), source, tab(s), message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabDelimitedFormat;

impl LineFormat for TabDelimitedFormat {
    fn parse_line(&self, line: &str) -> Option<LogEntry> {
        let caps = TAB_DELIMITED_LINE.captures(line)?;
        // The shape alone admits impossible instants such as month 13.
        let timestamp = NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()?;
        Some(LogEntry::new(timestamp, &caps[2], &caps[3]))
    }
}

/// Classification of one raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// The line starts a new entry.
    Entry(LogEntry),
    /// Empty or whitespace only.
    Blank,
    /// No entry-start marker; continues the previous entry if there is one.
    Continuation(&'a str),
}

/// Turns raw text into entries, one [`LineFormat`] at a time.
#[derive(Debug, Clone, Default)]
pub struct EntryParser<F = TabDelimitedFormat> {
    format: F,
}

impl EntryParser<TabDelimitedFormat> {
    /// Creates a parser for the host format.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            format: TabDelimitedFormat,
        }
    }
}

impl<F: LineFormat> EntryParser<F> {
    /// Creates a parser with a custom grammar.
    #[must_use]
    pub const fn with_format(format: F) -> Self {
        Self { format }
    }

    /// Classifies a single line.
    pub fn classify<'a>(&self, line: &'a str) -> ParsedLine<'a> {
        if line.trim().is_empty() {
            return ParsedLine::Blank;
        }
        match self.format.parse_line(line) {
            Some(entry) => ParsedLine::Entry(entry),
            None => ParsedLine::Continuation(line),
        }
    }

    /// Iterates the entries of `text` in file order.
    ///
    /// Continuation lines are appended to the preceding entry's message.
    /// Lines before the first entry are dropped and counted, see
    /// [`Entries::unparsed_leading`].
    pub fn entries<'a>(&'a self, text: &'a str) -> Entries<'a, F> {
        Entries {
            parser: self,
            lines: text.lines(),
            pending: None,
            unparsed_leading: 0,
        }
    }
}

/// Iterator over the entries of one file's text, oldest first.
pub struct Entries<'a, F> {
    parser: &'a EntryParser<F>,
    lines: std::str::Lines<'a>,
    pending: Option<LogEntry>,
    unparsed_leading: usize,
}

impl<F> Entries<'_, F> {
    /// Number of non-blank lines seen before the first entry.
    #[must_use]
    pub const fn unparsed_leading(&self) -> usize {
        self.unparsed_leading
    }
}

impl<F: LineFormat> Iterator for Entries<'_, F> {
    type Item = LogEntry;

    fn next(&mut self) -> Option<LogEntry> {
        for line in self.lines.by_ref() {
            match self.parser.classify(line) {
                ParsedLine::Entry(entry) => {
                    if let Some(done) = self.pending.replace(entry) {
                        return Some(done);
                    }
                }
                ParsedLine::Continuation(raw) => match self.pending.as_mut() {
                    Some(entry) => entry.push_continuation(raw),
                    None => self.unparsed_leading += 1,
                },
                ParsedLine::Blank => {}
            }
        }
        self.pending.take()
    }
}

/// Decodes file bytes as UTF-8, falling back to Latin-1.
///
/// Returns the text and whether the fallback was used.
#[must_use]
pub fn decode(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(err) => {
            let text = err.into_bytes().into_iter().map(char::from).collect();
            (text, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(text: &str) -> Vec<LogEntry> {
        EntryParser::new().entries(text).collect()
    }

    // ===========================================
    // TabDelimitedFormat Tests
    // ===========================================

    #[test]
    fn parses_well_formed_line() {
        let entry = TabDelimitedFormat
            .parse_line("2026-02-15 10:01:02.345\tZ-Wave\treceived \"Hall Motion\" on")
            .expect("entry");
        assert_eq!(entry.source, "Z-Wave");
        assert_eq!(entry.message, "received \"Hall Motion\" on");
        assert_eq!(
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            "2026-02-15 10:01:02.345"
        );
    }

    #[test]
    fn accepts_repeated_tabs_and_spaced_source() {
        let entry = TabDelimitedFormat
            .parse_line("2026-02-15 10:01:02.3\t\tTimer Plugin\t\tfired")
            .expect("entry");
        assert_eq!(entry.source, "Timer Plugin");
        assert_eq!(entry.message, "fired");
    }

    #[test]
    fn keeps_tabs_inside_message() {
        let entry = TabDelimitedFormat
            .parse_line("2026-02-15 10:01:02.345\tScript\ta\tb")
            .expect("entry");
        assert_eq!(entry.source, "Script");
        assert_eq!(entry.message, "a\tb");
    }

    #[test]
    fn rejects_lines_without_marker() {
        let format = TabDelimitedFormat;
        assert!(format.parse_line("  File \"x.py\", line 3").is_none());
        assert!(format.parse_line("2026-02-15 10:01:02\tZ-Wave\tno millis").is_none());
        assert!(format.parse_line("2026-02-15 10:01:02.345 Z-Wave no tabs").is_none());
        assert!(format.parse_line("2026-13-15 10:01:02.345\tZ-Wave\tbad month").is_none());
    }

    // ===========================================
    // EntryParser Tests
    // ===========================================

    #[test]
    fn preserves_file_order() {
        let text = "2026-02-15 10:00:00.000\tA\tfirst\n\
                    2026-02-15 10:00:01.000\tB\tsecond\n\
                    2026-02-15 10:00:02.000\tC\tthird\n";
        let messages: Vec<String> = parse_all(text).into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn folds_continuation_lines() {
        let text = "2026-02-15 10:00:00.000\tScript\tError in script:\n\
                    Traceback (most recent call last):\n\
                    \x20 File \"x.py\", line 3\n\
                    2026-02-15 10:00:01.000\tZ-Wave\tok\n";
        let entries = parse_all(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].message,
            "Error in script:\nTraceback (most recent call last):\n  File \"x.py\", line 3"
        );
        assert_eq!(entries[1].message, "ok");
    }

    #[test]
    fn skips_blank_lines_and_crlf() {
        let text = "\r\n2026-02-15 10:00:00.000\tA\tone\r\n\r\n   \n2026-02-15 10:00:01.000\tB\ttwo\r\n";
        let entries = parse_all(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "one");
        assert_eq!(entries[1].message, "two");
    }

    #[test]
    fn counts_leading_garbage() {
        let parser = EntryParser::new();
        let text = "garbage\nmore garbage\n2026-02-15 10:00:00.000\tA\tone\ntrailing detail\n";
        let mut entries = parser.entries(text);
        let collected: Vec<LogEntry> = entries.by_ref().collect();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].message, "one\ntrailing detail");
        assert_eq!(entries.unparsed_leading(), 2);
    }

    #[test]
    fn bad_line_does_not_hide_neighbours() {
        let text = "2026-02-15 10:00:00.000\tA\tbefore\n\
                    2026-99-99 99:99:99.999\tX\tbroken\n\
                    2026-02-15 10:00:02.000\tB\tafter\n";
        let entries = parse_all(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source, "A");
        assert_eq!(entries[1].source, "B");
    }

    #[test]
    fn empty_text_has_no_entries() {
        assert!(parse_all("").is_empty());
        assert!(parse_all("\n\n").is_empty());
    }

    struct PipeFormat;

    impl LineFormat for PipeFormat {
        fn parse_line(&self, line: &str) -> Option<LogEntry> {
            let mut parts = line.splitn(3, '|');
            let timestamp = NaiveDateTime::parse_from_str(parts.next()?, "%Y-%m-%dT%H:%M:%S").ok()?;
            Some(LogEntry::new(timestamp, parts.next()?, parts.next()?))
        }
    }

    #[test]
    fn custom_format_plugs_in() {
        let parser = EntryParser::with_format(PipeFormat);
        let entries: Vec<LogEntry> = parser
            .entries("2026-02-15T10:00:00|Hub|hello\nworld\n")
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source, "Hub");
        assert_eq!(entries[0].message, "hello\nworld");
    }

    // ===========================================
    // decode Tests
    // ===========================================

    #[test]
    fn decode_utf8() {
        let (text, fallback) = decode("Küche".as_bytes().to_vec());
        assert_eq!(text, "Küche");
        assert!(!fallback);
    }

    #[test]
    fn decode_latin1_fallback() {
        let (text, fallback) = decode(vec![b'K', 0xFC, b'c', b'h', b'e']);
        assert_eq!(text, "Küche");
        assert!(fallback);
    }
}
