//! "Select the first N rows" across pages.
//!
//! The walk always restarts at page 1 and goes up in page order. Cached
//! pages are scanned in place; the first uncached page stops the walk
//! with `Step::NeedPage` so whoever drives it can fetch and resume. The
//! async driver (`select_first_n`) and the TUI's tick-driven driver both
//! sit on top of `SelectRun`.

use std::num::IntErrorKind;

use thiserror::Error;
use tracing::{debug, info};

use crate::api_client::{FetchError, RecordSource};
use crate::session::Session;

/// Parses the popover text into a positive row count. Counts too large
/// for `usize` saturate; the walk stops at the last page anyway.
pub fn parse_count(input: &str) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(usize::MAX),
        Err(_) => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Page must be fetched and stored before the walk can continue.
    NeedPage(u64),
    /// Target met or pages exhausted; carries the selected count.
    Done(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectRun {
    target: usize,
    next_page: u64,
}

impl SelectRun {
    pub fn new(target: usize) -> Self {
        Self { target, next_page: 1 }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Page the walk is currently on (the one it waits for after `NeedPage`).
    pub fn current_page(&self) -> u64 {
        self.next_page
    }

    pub fn advance(&mut self, session: &mut Session) -> Step {
        let mut running = session.selection.count();

        loop {
            if running >= self.target {
                return Step::Done(running);
            }
            // Unknown total: page 1 is still allowed so the walk can learn it.
            let last_page = match session.total_records {
                Some(_) => session.page_count(),
                None => 1,
            };
            if self.next_page > last_page {
                return Step::Done(running);
            }

            let Some(rows) = session.cache.get(self.next_page) else {
                return Step::NeedPage(self.next_page);
            };

            for art in rows {
                if running >= self.target {
                    break;
                }
                if !session.selection.is_selected(art.id) {
                    session.selection.toggle(art.id, true);
                    running += 1;
                }
            }
            debug!(page = self.next_page, running, goal = self.target, "page scanned");
            self.next_page += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOutcome {
    pub selected: usize,
    pub fetched_pages: Vec<u64>,
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("not a positive row count: {0:?}")]
    InvalidCount(String),
    #[error("fetching page {page} failed after selecting {selected} rows: {source}")]
    Fetch {
        page: u64,
        selected: usize,
        #[source]
        source: FetchError,
    },
}

/// Marks at least `input` rows selected, fetching pages through `source`
/// as the walk reaches them. A failed fetch stops the walk; rows selected
/// before it stay selected.
pub async fn select_first_n<S>(
    session: &mut Session,
    source: &S,
    input: &str,
) -> Result<SelectOutcome, SelectError>
where
    S: RecordSource + ?Sized,
{
    let target =
        parse_count(input).ok_or_else(|| SelectError::InvalidCount(input.to_string()))?;

    let mut run = SelectRun::new(target);
    let mut fetched_pages = Vec::new();

    loop {
        match run.advance(session) {
            Step::Done(selected) => {
                info!(goal = target, selected, fetched = fetched_pages.len(), "select-n finished");
                return Ok(SelectOutcome { selected, fetched_pages });
            }
            Step::NeedPage(page) => {
                if let Err(err) = session.fetch_page(source, page).await {
                    return Err(SelectError::Fetch {
                        page,
                        selected: session.selection.count(),
                        source: err,
                    });
                }
                fetched_pages.push(page);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::FetchedPage;
    use crate::artwork::Artwork;

    fn rows(ids: std::ops::Range<u64>) -> Vec<Artwork> {
        ids.map(|id| Artwork {
            id,
            title: String::new(),
            place_of_origin: None,
            artist_display: None,
            inscriptions: None,
            date_start: None,
            date_end: None,
        })
        .collect()
    }

    #[test]
    fn parse_count_rejects_junk() {
        for bad in ["0", "-5", "abc", "", "  ", "2.5"] {
            assert_eq!(parse_count(bad), None, "{bad:?}");
        }
        assert_eq!(parse_count(" 20 "), Some(20));
    }

    #[test]
    fn parse_count_saturates_huge_counts() {
        assert_eq!(parse_count("99999999999999999999999"), Some(usize::MAX));
        assert_eq!(parse_count("-99999999999999999999999"), None);
    }

    #[test]
    fn run_stops_at_first_uncached_page() {
        let mut s = Session::new(12);
        s.store_page(1, FetchedPage { records: rows(1..13), total: 30 });

        let mut run = SelectRun::new(20);
        assert_eq!(run.advance(&mut s), Step::NeedPage(2));
        assert_eq!(s.selection.count(), 12);

        s.store_page(2, FetchedPage { records: rows(13..25), total: 30 });
        assert_eq!(run.advance(&mut s), Step::Done(20));
        assert!(s.selection.is_selected(20));
        assert!(!s.selection.is_selected(21));
    }

    #[test]
    fn unknown_total_asks_for_first_page() {
        let mut s = Session::new(12);
        let mut run = SelectRun::new(3);
        assert_eq!(run.advance(&mut s), Step::NeedPage(1));
    }

    #[test]
    fn exhausted_pages_finish_short() {
        let mut s = Session::new(4);
        s.store_page(1, FetchedPage { records: rows(1..5), total: 6 });
        s.store_page(2, FetchedPage { records: rows(5..7), total: 6 });

        let mut run = SelectRun::new(50);
        assert_eq!(run.advance(&mut s), Step::Done(6));
    }
}
