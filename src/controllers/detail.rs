use std::time::Instant;

use crate::api::{Action, ApiError, Backend};
use crate::session::Session;

use super::ActionOptions;

impl Session {
    /// Open `key` in the detail pane and move focus onto it
    pub fn open_detail(&mut self, key: &str) {
        let Some(notification) = self.notifications.get(key) else {
            return;
        };
        let key = notification.key();
        if let Some(index) = self.notifications.index_of(&key) {
            self.keyboard.set_focus(Some(index));
        }
        self.detail.open(key.clone());
        self.schedule_read_mark(&key);
        self.sync_route();
    }

    pub fn open_focused(&mut self) {
        if let Some(key) = self.focused_key() {
            if self.detail.open_key() != Some(key.as_str()) {
                self.open_detail(&key);
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
        self.read_mark.cancel();
        self.sync_route();
    }

    /// Move the detail pane to the next notification, crossing pages
    pub fn detail_next(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        self.focus_next(backend)?;
        self.open_focused();
        Ok(())
    }

    pub fn detail_previous(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        self.focus_previous(backend)?;
        self.open_focused();
        Ok(())
    }

    /// Start the mark-read-on-open timer if `key` is unread
    pub(crate) fn schedule_read_mark(&mut self, key: &str) {
        if !self.settings.mark_read_on_open {
            return;
        }
        match self.notifications.get(key) {
            Some(n) if !n.is_read => self.read_mark.schedule(n.key(), Instant::now()),
            _ => self.read_mark.cancel(),
        }
    }

    /// Mark the open notification read once it has been open long enough.
    /// Skipped if the pane has moved on.
    pub fn process_read_mark(&mut self, now: Instant, backend: &dyn Backend) {
        let Some(key) = self.read_mark.take_due(now) else {
            return;
        };
        if self.detail.open_key() != Some(key.as_str()) {
            return;
        }
        if self.notifications.get(&key).is_some_and(|n| n.is_read) {
            return;
        }
        let opts = ActionOptions {
            quiet: true,
            ..Default::default()
        };
        // Failures are already logged and toasted
        let _ = self.perform_action_with(&key, Action::MarkRead, opts, backend);
    }
}
