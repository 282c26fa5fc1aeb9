use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectAllMode {
    #[default]
    None,
    /// Every item on the current page
    Page,
    /// Every item matching the current filter, across all pages
    All,
}

/// Per-item selection plus a tri-state select-all mode.
///
/// `All` is mutually exclusive with an explicit key set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionStore {
    keys: BTreeSet<String>,
    mode: SelectAllMode,
}

/// Saved selection for rollback
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    keys: BTreeSet<String>,
    mode: SelectAllMode,
}

impl SelectionStore {
    pub fn mode(&self) -> SelectAllMode {
        self.mode
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.mode == SelectAllMode::All || self.keys.contains(key)
    }

    pub fn has_selection(&self) -> bool {
        self.mode == SelectAllMode::All || !self.keys.is_empty()
    }

    /// Explicitly selected keys, in stable order
    pub fn keys(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }

    pub fn explicit_count(&self) -> usize {
        self.keys.len()
    }

    /// Selected count given the filter's total
    pub fn count(&self, total: u64) -> u64 {
        match self.mode {
            SelectAllMode::All => total,
            _ => self.keys.len() as u64,
        }
    }

    pub fn toggle(&mut self, key: &str) {
        // Leaving "all" mode narrows back to just this toggle
        if self.mode == SelectAllMode::All {
            self.keys.clear();
        }
        self.mode = SelectAllMode::None;
        if !self.keys.remove(key) {
            self.keys.insert(key.to_string());
        }
    }

    pub fn select(&mut self, key: &str) {
        if self.mode != SelectAllMode::All {
            self.keys.insert(key.to_string());
        }
    }

    /// Drop one key. "All" mode is kept: it is defined by the filter, and
    /// an item leaving the filter leaves the selection with it.
    pub fn deselect(&mut self, key: &str) {
        if self.keys.remove(key) && self.mode == SelectAllMode::Page {
            self.mode = SelectAllMode::None;
        }
    }

    pub fn select_page(&mut self, page_keys: &[String]) {
        self.keys = page_keys.iter().cloned().collect();
        self.mode = SelectAllMode::Page;
    }

    pub fn select_all(&mut self) {
        self.keys.clear();
        self.mode = SelectAllMode::All;
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.mode = SelectAllMode::None;
    }

    /// Drop keys that are no longer on the page (after a reload)
    pub fn retain_page(&mut self, page_keys: &[String]) {
        if self.mode == SelectAllMode::All {
            return;
        }
        self.keys.retain(|k| page_keys.contains(k));
        if self.mode == SelectAllMode::Page && self.keys.len() != page_keys.len() {
            self.mode = SelectAllMode::None;
        }
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            keys: self.keys.clone(),
            mode: self.mode,
        }
    }

    pub fn restore(&mut self, snapshot: SelectionSnapshot) {
        self.keys = snapshot.keys;
        self.mode = snapshot.mode;
    }
}
