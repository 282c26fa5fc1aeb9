/// Filter query state.
///
/// `input` is what the user is typing; `committed` is what the current page
/// was fetched with. They differ while a debounce is pending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStore {
    pub input: String,
    committed: String,
    /// Set while the query bar has keyboard focus
    pub editing: bool,
}

impl QueryStore {
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_dirty(&self) -> bool {
        self.input != self.committed
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Make the typed query the active one; returns true if it changed
    pub fn commit(&mut self) -> bool {
        let changed = self.input.trim() != self.committed;
        self.committed = self.input.trim().to_string();
        changed
    }

    /// Replace both input and committed query (view switch, navigation)
    pub fn set(&mut self, query: &str) {
        self.input = query.to_string();
        self.committed = query.to_string();
    }

    /// Abandon edits and go back to the committed query
    pub fn revert(&mut self) {
        self.input = self.committed.clone();
        self.editing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_trims_and_reports_change() {
        let mut q = QueryStore::default();
        q.input = " is:unread ".into();
        assert!(q.is_dirty());
        assert!(q.commit());
        assert_eq!(q.committed(), "is:unread");
        q.input = "is:unread".into();
        assert!(!q.commit());
    }

    #[test]
    fn revert_discards_input() {
        let mut q = QueryStore::default();
        q.set("in:inbox");
        q.push_char('x');
        q.revert();
        assert_eq!(q.input, "in:inbox");
    }
}
