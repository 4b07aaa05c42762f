// src/page_cache.rs
use std::collections::BTreeMap;

use crate::artwork::Artwork;

/// Records returned by one fetch, in source order.
pub type Page = Vec<Artwork>;

/// Session-long page store keyed by 1-based page number.
///
/// Pages may arrive out of order and are never evicted. A second `put` for
/// the same number replaces the first (the source is read-only, so both
/// writes carry the same content).
#[derive(Debug, Default, Clone)]
pub struct PageCache {
    pages: BTreeMap<u64, Page>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, page: u64) -> Option<&Page> {
        self.pages.get(&page)
    }

    pub fn put(&mut self, page: u64, records: Page) {
        self.pages.insert(page, records);
    }

    pub fn contains(&self, page: u64) -> bool {
        self.pages.contains_key(&page)
    }

    pub fn page_numbers(&self) -> Vec<u64> {
        self.pages.keys().copied().collect()
    }

    /// Cached pages in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Page)> + '_ {
        self.pages.iter().map(|(n, p)| (*n, p))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
