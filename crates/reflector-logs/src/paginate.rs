//! Offset-from-latest pagination.
//!
//! Pages are anchored at the newest entry: `offset` skips the most recent
//! matching entries and `limit` bounds the page. Filtering happens before
//! windowing, so `offset` and `limit` count matching entries only.

use std::collections::VecDeque;

use crate::types::{LogEntry, LogPage};

/// Returns one page of `entries` (oldest first), newest first.
///
/// The page holds filtered positions `[total - offset - limit, total - offset)`
/// clipped to `[0, total)`, reversed. An empty window is a valid, empty page.
///
/// Only the newest `offset + limit` matching entries are retained while
/// scanning, so memory is bounded by the request rather than the file.
pub fn paginate<I, P>(entries: I, mut predicate: P, offset: usize, limit: usize) -> LogPage
where
    I: IntoIterator<Item = LogEntry>,
    P: FnMut(&LogEntry) -> bool,
{
    let keep = offset.saturating_add(limit);
    let mut tail: VecDeque<LogEntry> = VecDeque::new();
    let mut total_filtered = 0usize;

    for entry in entries {
        if !predicate(&entry) {
            continue;
        }
        total_filtered += 1;
        if keep == 0 {
            continue;
        }
        if tail.len() == keep {
            tail.pop_front();
        }
        tail.push_back(entry);
    }

    let window_end = tail.len() - offset.min(tail.len());
    let window_start = window_end.saturating_sub(limit);
    let entries: Vec<LogEntry> = tail.drain(window_start..window_end).rev().collect();

    let has_more = total_filtered
        .saturating_sub(offset)
        .saturating_sub(entries.len())
        > 0;

    LogPage {
        entries,
        total_filtered,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("timestamp")
    }

    /// Entries `0..n` oldest first; message is the index, source alternates.
    fn make_entries(n: usize) -> Vec<LogEntry> {
        (0..n)
            .map(|i| {
                let source = if i % 3 == 0 { "Z-Wave" } else { "Insteon" };
                LogEntry::new(base() + Duration::seconds(i as i64), source, i.to_string())
            })
            .collect()
    }

    fn indices(page: &LogPage) -> Vec<usize> {
        page.entries
            .iter()
            .filter_map(|e| e.message.parse().ok())
            .collect()
    }

    #[test]
    fn newest_first_without_offset() {
        let page = paginate(make_entries(10), |_| true, 0, 3);
        assert_eq!(indices(&page), vec![9, 8, 7]);
        assert_eq!(page.total_filtered, 10);
        assert!(page.has_more);
    }

    #[test]
    fn six_hundred_entries_offset_two_hundred() {
        let page = paginate(make_entries(600), |_| true, 200, 100);
        assert_eq!(page.len(), 100);
        // Ranks 201..=300 most recent are indices 399 down to 300.
        assert_eq!(indices(&page), (300..400).rev().collect::<Vec<_>>());
        assert!(page.has_more);
    }

    #[test]
    fn offset_beyond_total_is_empty() {
        let page = paginate(make_entries(5), |_| true, 10, 3);
        assert!(page.is_empty());
        assert_eq!(page.total_filtered, 5);
        assert!(!page.has_more);
    }

    #[test]
    fn partial_last_page() {
        let page = paginate(make_entries(5), |_| true, 3, 10);
        assert_eq!(indices(&page), vec![1, 0]);
        assert!(!page.has_more);
    }

    #[test]
    fn offset_counts_filtered_entries_only() {
        let page = paginate(make_entries(30), |e| e.source == "Z-Wave", 2, 3);
        // Z-Wave indices: 0, 3, ..., 27. Skip 27 and 24.
        assert_eq!(indices(&page), vec![21, 18, 15]);
        assert_eq!(page.total_filtered, 10);
        assert!(page.has_more);
    }

    #[test]
    fn zero_limit_yields_empty_page_but_counts() {
        let page = paginate(make_entries(4), |_| true, 0, 0);
        assert!(page.is_empty());
        assert_eq!(page.total_filtered, 4);
        assert!(page.has_more);
    }

    #[test]
    fn empty_input() {
        let page = paginate(Vec::new(), |_| true, 0, 500);
        assert!(page.is_empty());
        assert_eq!(page.total_filtered, 0);
        assert!(!page.has_more);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let entries = make_entries(50);
        let first = paginate(entries.clone(), |_| true, 7, 11);
        let second = paginate(entries, |_| true, 7, 11);
        assert_eq!(first, second);
    }

    #[test]
    fn growing_log_shifts_offset_window() {
        let before = paginate(make_entries(20), |_| true, 0, 5);
        let after = paginate(make_entries(25), |_| true, 5, 5);
        assert_eq!(indices(&before), indices(&after));
    }

    proptest! {
        #[test]
        fn page_length_matches_formula(
            total in 0usize..200,
            offset in 0usize..250,
            limit in 1usize..120,
        ) {
            let page = paginate(make_entries(total), |_| true, offset, limit);
            let expected = limit.min(total.saturating_sub(offset));
            prop_assert_eq!(page.len(), expected);
            prop_assert_eq!(page.total_filtered, total);
        }

        #[test]
        fn pages_are_newest_first(
            total in 0usize..200,
            offset in 0usize..250,
            limit in 1usize..120,
        ) {
            let page = paginate(make_entries(total), |_| true, offset, limit);
            for pair in page.entries.windows(2) {
                prop_assert!(pair[0].timestamp >= pair[1].timestamp);
            }
        }

        #[test]
        fn consecutive_pages_tile_without_gaps(
            total in 0usize..150,
            limit in 1usize..40,
        ) {
            let mut seen = Vec::new();
            let mut offset = 0;
            loop {
                let page = paginate(make_entries(total), |_| true, offset, limit);
                seen.extend(indices(&page));
                if !page.has_more {
                    break;
                }
                offset += limit;
            }
            prop_assert_eq!(seen, (0..total).rev().collect::<Vec<_>>());
        }
    }
}
