/// Focus to apply once the next page's data arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingFocus {
    First,
    Last,
}

/// Single optional focus index into the current page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyboardStore {
    focus: Option<usize>,
    pending: Option<PendingFocus>,
}

impl KeyboardStore {
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    pub fn set_focus(&mut self, index: Option<usize>) {
        self.focus = index;
    }

    pub fn pending(&self) -> Option<PendingFocus> {
        self.pending
    }

    pub fn set_pending(&mut self, pending: PendingFocus) {
        self.pending = Some(pending);
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Resolve a pending focus action against the freshly loaded page,
    /// otherwise clamp the current focus into range.
    pub fn on_page_loaded(&mut self, len: usize) {
        if len == 0 {
            self.focus = None;
            self.pending = None;
            return;
        }
        self.focus = match self.pending.take() {
            Some(PendingFocus::First) => Some(0),
            Some(PendingFocus::Last) => Some(len - 1),
            None => self.focus.map(|i| i.min(len - 1)),
        };
    }

    pub fn clamp(&mut self, len: usize) {
        self.focus = match self.focus {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
    }

    pub fn reset(&mut self) {
        self.focus = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_resolves_on_load() {
        let mut k = KeyboardStore::default();
        k.set_pending(PendingFocus::Last);
        k.on_page_loaded(4);
        assert_eq!(k.focus(), Some(3));
        assert_eq!(k.pending(), None);
    }

    #[test]
    fn load_clamps_existing_focus() {
        let mut k = KeyboardStore::default();
        k.set_focus(Some(9));
        k.on_page_loaded(3);
        assert_eq!(k.focus(), Some(2));
        k.on_page_loaded(0);
        assert_eq!(k.focus(), None);
    }
}
