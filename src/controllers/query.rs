use std::time::Instant;

use crate::api::{ApiError, Backend};
use crate::debounce::Channel;
use crate::session::Session;
use crate::store::PendingFocus;

impl Session {
    pub fn begin_query_edit(&mut self) {
        self.query.editing = true;
    }

    /// Typing reschedules the live search
    pub fn query_input(&mut self, c: char, now: Instant) {
        self.query.push_char(c);
        self.debounce.schedule(Channel::Search, now);
    }

    pub fn query_backspace(&mut self, now: Instant) {
        self.query.pop_char();
        self.debounce.schedule(Channel::Search, now);
    }

    /// Enter in the query bar: search now
    pub fn submit_query(&mut self, now: Instant, backend: &dyn Backend) -> Result<(), ApiError> {
        self.debounce.cancel(Channel::Search);
        self.query.editing = false;
        self.commit_query(now, backend)
    }

    /// Esc in the query bar: drop edits
    pub fn cancel_query_edit(&mut self) {
        self.debounce.cancel(Channel::Search);
        self.query.revert();
    }

    pub fn clear_query(&mut self, now: Instant, backend: &dyn Backend) -> Result<(), ApiError> {
        self.query.input.clear();
        self.submit_query(now, backend)
    }

    /// Make the typed query active and reload from page 1 if it changed.
    /// The route catches up on the `Query` channel.
    fn commit_query(&mut self, now: Instant, backend: &dyn Backend) -> Result<(), ApiError> {
        if !self.query.commit() {
            return Ok(());
        }
        tracing::debug!(query = %self.query.committed(), "Query changed");
        self.pagination.set_page(1);
        self.selection.clear();
        self.keyboard.reset();
        self.keyboard.set_pending(PendingFocus::First);
        self.debounce.schedule(Channel::Query, now);
        self.load_page(backend)
    }

    /// Fire due debounce timers
    pub fn process_debounce(&mut self, now: Instant, backend: &dyn Backend) {
        for channel in self.debounce.take_due(now) {
            match channel {
                Channel::Search => {
                    // Failures are already toasted
                    let _ = self.commit_query(now, backend);
                }
                Channel::Query => self.sync_route(),
            }
        }
    }
}
