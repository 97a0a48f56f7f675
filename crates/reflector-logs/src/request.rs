//! Request validation.
//!
//! The transport hands over a flat `name → value` map; [`QueryRequest::from_params`]
//! turns it into a validated request before any file is touched.

use std::collections::HashMap;
use std::num::IntErrorKind;

use chrono::NaiveDate;

use crate::config::QueryLimits;
use crate::error::{QueryError, Result};
use crate::filter::LogFilter;
use crate::types::{QueryKind, DATE_FORMAT};

/// A validated query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// What is being asked.
    pub kind: QueryKind,
    /// Page size, already clamped to the configured maximum.
    pub lines: usize,
    /// Number of newest matching entries to skip.
    pub offset: usize,
    /// Exact source name to keep.
    pub source: Option<String>,
    /// Case-insensitive message substring to keep.
    pub search: Option<String>,
    /// Day of the historical log (`history` only).
    pub date: Option<NaiveDate>,
}

impl QueryRequest {
    /// Creates a request for the live log with default paging.
    #[must_use]
    pub fn log(limits: &QueryLimits) -> Self {
        Self::with_kind(QueryKind::Log, limits)
    }

    fn with_kind(kind: QueryKind, limits: &QueryLimits) -> Self {
        Self {
            kind,
            lines: limits.default_lines.min(limits.max_lines),
            offset: 0,
            source: None,
            search: None,
            date: None,
        }
    }

    /// Sets the page size, clamped to `limits.max_lines`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] if `lines` is zero.
    pub fn with_lines(mut self, lines: usize, limits: &QueryLimits) -> Result<Self> {
        if lines == 0 {
            return Err(QueryError::invalid("lines must be at least 1"));
        }
        self.lines = lines.min(limits.max_lines);
        Ok(self)
    }

    /// Sets the offset from the newest matching entry.
    #[must_use]
    pub const fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the source filter.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the search filter.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Validates a flat parameter map for the given kind.
    ///
    /// Parameters that do not apply to `kind` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidArgument`] for non-integer or out-of-range
    /// `lines`/`offset`, and for a missing or malformed `date` on `history`.
    pub fn from_params(
        kind: QueryKind,
        params: &HashMap<String, String>,
        limits: &QueryLimits,
    ) -> Result<Self> {
        let mut request = Self::with_kind(kind, limits);
        if !kind.is_paged() {
            return Ok(request);
        }

        if let Some(raw) = param(params, "lines") {
            let lines = parse_integer("lines", raw)?;
            if lines <= 0 {
                return Err(QueryError::invalid(format!(
                    "lines must be at least 1, got {lines}"
                )));
            }
            request.lines = usize::try_from(lines)
                .unwrap_or(usize::MAX)
                .min(limits.max_lines);
        }

        if let Some(raw) = param(params, "offset") {
            let offset = parse_integer("offset", raw)?;
            if offset < 0 {
                return Err(QueryError::invalid(format!(
                    "offset must be >= 0, got {offset}"
                )));
            }
            request.offset = usize::try_from(offset).unwrap_or(usize::MAX);
        }

        request.source = param(params, "source").map(str::to_string);
        request.search = param(params, "search").map(str::to_string);

        if kind == QueryKind::History {
            let raw = param(params, "date")
                .ok_or_else(|| QueryError::invalid("missing 'date' parameter (YYYY-MM-DD)"))?;
            request.date = Some(parse_date(raw)?);
        }

        Ok(request)
    }

    /// Builds the filter for this request.
    #[must_use]
    pub fn filter(&self) -> LogFilter {
        LogFilter::build(self.source.as_deref(), self.search.as_deref())
    }
}

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`QueryError::InvalidArgument`] if the shape is wrong or the date does not exist.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    if !is_date_shaped(raw) {
        return Err(QueryError::invalid(format!(
            "invalid date '{raw}', expected YYYY-MM-DD"
        )));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| QueryError::invalid(format!("invalid calendar date: {raw}")))
}

/// Returns true if `s` looks like `DDDD-DD-DD`.
pub(crate) fn is_date_shaped(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Looks up a parameter, treating blank values as absent.
fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Parses a decimal integer, saturating values outside the `i64` range.
fn parse_integer(name: &str, raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(QueryError::invalid(format!(
                "{name} must be an integer, got '{raw}'"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    const SATURATED: usize = i64::MAX as usize;

    fn limits() -> QueryLimits {
        QueryLimits::default()
    }

    #[test]
    fn defaults_when_params_absent() {
        let request =
            QueryRequest::from_params(QueryKind::Log, &HashMap::new(), &limits()).expect("valid");
        assert_eq!(request.lines, 500);
        assert_eq!(request.offset, 0);
        assert_eq!(request.source, None);
        assert_eq!(request.search, None);
        assert_eq!(request.date, None);
    }

    #[test]
    fn configured_default_lines() {
        let limits = QueryLimits::default().with_default_lines(42);
        let request =
            QueryRequest::from_params(QueryKind::Log, &HashMap::new(), &limits).expect("valid");
        assert_eq!(request.lines, 42);
    }

    #[test]
    fn parses_all_paged_params() {
        let request = QueryRequest::from_params(
            QueryKind::Log,
            &params(&[
                ("lines", "100"),
                ("offset", "200"),
                ("source", " Z-Wave "),
                ("search", "Motion"),
            ]),
            &limits(),
        )
        .expect("valid");

        assert_eq!(request.lines, 100);
        assert_eq!(request.offset, 200);
        assert_eq!(request.source.as_deref(), Some("Z-Wave"));
        assert_eq!(request.search.as_deref(), Some("Motion"));
    }

    #[test]
    fn lines_above_max_are_clamped() {
        let request = QueryRequest::from_params(
            QueryKind::Log,
            &params(&[("lines", "999999")]),
            &limits(),
        )
        .expect("valid");
        assert_eq!(request.lines, 5000);
    }

    #[test_case("lines", "99999999999999999999", 5000, 0 ; "lines beyond i64 clamp")]
    #[test_case("offset", "99999999999999999999", 500, SATURATED ; "offset beyond i64 saturates")]
    #[test_case("lines", "9223372036854775807", 5000, 0 ; "lines at i64 max clamp")]
    fn oversized_integers_are_accepted(name: &str, value: &str, lines: usize, offset: usize) {
        let request = QueryRequest::from_params(QueryKind::Log, &params(&[(name, value)]), &limits())
            .expect("valid");
        assert_eq!(request.lines, lines);
        assert_eq!(request.offset, offset);
    }

    #[test_case("lines", "0" ; "zero lines")]
    #[test_case("lines", "-5" ; "negative lines")]
    #[test_case("lines", "ten" ; "non numeric lines")]
    #[test_case("offset", "-1" ; "negative offset")]
    #[test_case("offset", "1.5" ; "fractional offset")]
    #[test_case("lines", "-99999999999999999999" ; "hugely negative lines")]
    #[test_case("offset", "-99999999999999999999" ; "hugely negative offset")]
    fn rejects_bad_paging(name: &str, value: &str) {
        let result = QueryRequest::from_params(QueryKind::Log, &params(&[(name, value)]), &limits());
        assert!(matches!(result, Err(QueryError::InvalidArgument(_))));
    }

    #[test]
    fn blank_filters_are_absent() {
        let request = QueryRequest::from_params(
            QueryKind::Log,
            &params(&[("source", "  "), ("search", ""), ("lines", "")]),
            &limits(),
        )
        .expect("valid");
        assert_eq!(request.source, None);
        assert_eq!(request.search, None);
        assert_eq!(request.lines, 500);
    }

    #[test]
    fn history_requires_date() {
        let result = QueryRequest::from_params(QueryKind::History, &HashMap::new(), &limits());
        assert!(matches!(result, Err(QueryError::InvalidArgument(_))));

        let request = QueryRequest::from_params(
            QueryKind::History,
            &params(&[("date", "2026-02-15")]),
            &limits(),
        )
        .expect("valid");
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 2, 15));
    }

    #[test]
    fn index_kinds_ignore_paging_params() {
        let request = QueryRequest::from_params(
            QueryKind::Sources,
            &params(&[("lines", "-3"), ("date", "garbage")]),
            &limits(),
        )
        .expect("valid");
        assert_eq!(request.kind, QueryKind::Sources);
    }

    #[test_case("2026-2-15" ; "unpadded month")]
    #[test_case("2026/02/15" ; "slashes")]
    #[test_case("2026-02-30" ; "no such day")]
    #[test_case("2026-13-01" ; "no such month")]
    #[test_case("../etc/pass" ; "path traversal")]
    #[test_case("2026-02-15x" ; "trailing garbage")]
    fn parse_date_rejects(raw: &str) {
        assert!(matches!(parse_date(raw), Err(QueryError::InvalidArgument(_))));
    }

    #[test]
    fn parse_date_accepts_leap_day() {
        assert_eq!(parse_date("2024-02-29").ok(), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn builder_methods() {
        let limits = limits();
        let request = QueryRequest::log(&limits)
            .with_lines(10_000, &limits)
            .expect("valid")
            .with_offset(3)
            .with_source("Insteon")
            .with_search("on");
        assert_eq!(request.lines, 5000);
        assert_eq!(request.offset, 3);
        assert!(QueryRequest::log(&limits).with_lines(0, &limits).is_err());
    }
}
