//! Selection state shared by every page of the table.

use std::collections::HashMap;

/// Tri-state of the header checkbox, derived from the visible page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderCheck {
    Checked,
    Indeterminate,
    Unchecked,
}

impl HeaderCheck {
    pub fn glyph(self) -> &'static str {
        match self {
            HeaderCheck::Checked => "[x]",
            HeaderCheck::Indeterminate => "[-]",
            HeaderCheck::Unchecked => "[ ]",
        }
    }
}

/// id → selected. An id is only present once something set it; absent
/// means not selected. Entries are never removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    entries: HashMap<u64, bool>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: u64, selected: bool) {
        self.entries.insert(id, selected);
    }

    pub fn set_many<I>(&mut self, ids: I, selected: bool)
    where
        I: IntoIterator<Item = u64>,
    {
        for id in ids {
            self.entries.insert(id, selected);
        }
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.entries.get(&id).copied().unwrap_or(false)
    }

    pub fn contains_entry(&self, id: u64) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of ids currently mapped to true.
    pub fn count(&self) -> usize {
        self.entries.values().filter(|v| **v).count()
    }

    pub fn selected_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .entries
            .iter()
            .filter_map(|(id, on)| on.then_some(*id))
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn header_state(&self, ids: &[u64]) -> HeaderCheck {
        let on = ids.iter().filter(|id| self.is_selected(**id)).count();
        if ids.is_empty() || on == 0 {
            HeaderCheck::Unchecked
        } else if on == ids.len() {
            HeaderCheck::Checked
        } else {
            HeaderCheck::Indeterminate
        }
    }

    /// Header checkbox click: a fully checked page is cleared, anything else
    /// becomes fully checked.
    pub fn toggle_all(&mut self, ids: &[u64]) {
        let select = self.header_state(ids) != HeaderCheck::Checked;
        self.set_many(ids.iter().copied(), select);
    }
}
