use crate::api::{ApiError, Backend};
use crate::session::Session;
use crate::store::PendingFocus;

impl Session {
    /// Focus the next item; at the end of the page, go to the next page and
    /// focus its first item once it loads
    pub fn focus_next(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        let len = self.notifications.len();
        match self.keyboard.focus() {
            _ if len == 0 => {}
            None => self.keyboard.set_focus(Some(0)),
            Some(i) if i + 1 < len => self.keyboard.set_focus(Some(i + 1)),
            Some(_) => {
                if self.pagination.has_next() {
                    let page = self.pagination.page + 1;
                    self.cross_to(page, PendingFocus::First, backend)?;
                }
            }
        }
        self.follow_focus();
        Ok(())
    }

    pub fn focus_previous(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        let len = self.notifications.len();
        match self.keyboard.focus() {
            _ if len == 0 => {}
            None => self.keyboard.set_focus(Some(0)),
            Some(i) if i > 0 => self.keyboard.set_focus(Some(i - 1)),
            Some(_) => {
                if self.pagination.has_previous() {
                    let page = self.pagination.page - 1;
                    self.cross_to(page, PendingFocus::Last, backend)?;
                }
            }
        }
        self.follow_focus();
        Ok(())
    }

    /// First item of the first page
    pub fn focus_first(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        if self.pagination.page != 1 {
            self.cross_to(1, PendingFocus::First, backend)?;
        } else if !self.notifications.is_empty() {
            self.keyboard.set_focus(Some(0));
        }
        self.follow_focus();
        Ok(())
    }

    /// Last item of the last page
    pub fn focus_last(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        let last_page = self.pagination.total_pages();
        if self.pagination.page != last_page {
            self.cross_to(last_page, PendingFocus::Last, backend)?;
        } else if !self.notifications.is_empty() {
            self.keyboard.set_focus(Some(self.notifications.len() - 1));
        }
        self.follow_focus();
        Ok(())
    }

    /// Page change that resolves `pending` once the new page arrives
    fn cross_to(
        &mut self,
        page: u32,
        pending: PendingFocus,
        backend: &dyn Backend,
    ) -> Result<(), ApiError> {
        self.keyboard.set_pending(pending);
        self.go_to_page(page, backend)
            .inspect_err(|_| self.keyboard.clear_pending())
    }

    /// In split mode an open detail pane tracks focus
    fn follow_focus(&mut self) {
        if !self.detail.is_open() || !self.ui.is_split() {
            return;
        }
        if let Some(key) = self.focused_key() {
            if self.detail.open_key() != Some(key.as_str()) {
                self.open_detail(&key);
            }
        }
    }

    pub fn toggle_focused_selection(&mut self) {
        if let Some(key) = self.focused_key() {
            self.selection.toggle(&key);
        }
    }
}
