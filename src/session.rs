// src/session.rs
use tracing::{debug, warn};

use crate::api_client::{FetchError, FetchedPage, RecordSource};
use crate::artwork::Artwork;
use crate::page_cache::PageCache;
use crate::selection::{HeaderCheck, SelectionSet};

pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// Everything the table and the selector mutate during one session.
/// Passed explicitly to the fetch/selection routines; nothing here is global.
#[derive(Debug, Clone)]
pub struct Session {
    pub page_size: u64,
    pub total_records: Option<u64>,
    pub cache: PageCache,
    pub selection: SelectionSet,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Session {
    pub fn new(page_size: u64) -> Self {
        Self {
            page_size: page_size.max(1),
            total_records: None,
            cache: PageCache::new(),
            selection: SelectionSet::new(),
        }
    }

    /// Zero-based offset of the first record on a 1-based page.
    pub fn offset_for(&self, page: u64) -> u64 {
        page.saturating_sub(1) * self.page_size
    }

    /// ceil(total / page_size); 0 while the total is unknown.
    pub fn page_count(&self) -> u64 {
        self.total_records
            .map(|t| t.div_ceil(self.page_size))
            .unwrap_or(0)
    }

    pub fn store_page(&mut self, page: u64, fetched: FetchedPage) {
        self.total_records = Some(fetched.total);
        self.cache.put(page, fetched.records);
    }

    /// Cached rows of `page`, or nothing while it has not been fetched.
    pub fn visible_rows(&self, page: u64) -> &[Artwork] {
        self.cache.get(page).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn visible_ids(&self, page: u64) -> Vec<u64> {
        self.visible_rows(page).iter().map(|a| a.id).collect()
    }

    pub fn header_state(&self, page: u64) -> HeaderCheck {
        self.selection.header_state(&self.visible_ids(page))
    }

    pub fn toggle_page(&mut self, page: u64) {
        let ids = self.visible_ids(page);
        self.selection.toggle_all(&ids);
    }

    /// Selected records across every cached page, in page order.
    pub fn selected_records(&self) -> Vec<&Artwork> {
        self.cache
            .iter()
            .flat_map(|(_, rows)| rows.iter())
            .filter(|a| self.selection.is_selected(a.id))
            .collect()
    }

    /// One fetch for `page`; the cache is only written on success.
    pub async fn fetch_page<S>(&mut self, source: &S, page: u64) -> Result<(), FetchError>
    where
        S: RecordSource + ?Sized,
    {
        let offset = self.offset_for(page);
        match source.fetch(offset).await {
            Ok(fetched) => {
                debug!(page, rows = fetched.records.len(), total = fetched.total, "page cached");
                self.store_page(page, fetched);
                Ok(())
            }
            Err(err) => {
                warn!(page, offset, error = %err, "page fetch failed");
                Err(err)
            }
        }
    }
}
