use std::time::Instant;

use crate::api::{ActionType, Backend};
use crate::session::Session;
use crate::store::{RecentActionNotification, UndoMetadata, UndoOutcome, UndoableAction};

impl Session {
    /// Push a completed action onto the undo history and show its toast.
    /// Returns the new entry's id.
    pub(crate) fn record_undo(
        &mut self,
        action_type: ActionType,
        notifications: Vec<RecentActionNotification>,
        metadata: Option<UndoMetadata>,
    ) -> String {
        let action = UndoableAction::new(action_type, notifications, metadata);
        let id = action.id.clone();
        let description = action.description.clone();
        for cancelled in self.undo.push(action, Instant::now()) {
            self.toasts.dismiss_undo(&cancelled);
        }
        self.toasts
            .undo(description, &id, self.undo.toast_duration());
        id
    }

    /// Undo the action whose toast is showing
    pub fn undo_active(&mut self, backend: &dyn Backend) -> UndoOutcome {
        let Some(id) = self.undo.active().map(|a| a.id.clone()) else {
            self.toasts.info("Nothing to undo");
            return UndoOutcome::Missing;
        };
        self.run_undo(&id, backend)
    }

    /// Undo any entry still in history
    pub fn undo_from_history(&mut self, id: &str, backend: &dyn Backend) -> UndoOutcome {
        self.run_undo(id, backend)
    }

    fn run_undo(&mut self, id: &str, backend: &dyn Backend) -> UndoOutcome {
        let outcome = self.undo.undo(id, backend);
        match &outcome {
            UndoOutcome::Undone(action) => {
                self.toasts.dismiss_undo(id);
                self.toasts.success(format!("Undid: {}", action.description));
                if let Err(e) = self.reload(backend) {
                    tracing::warn!(error = %e, "Refresh after undo failed");
                }
                self.refresh_view_counts(backend);
            }
            UndoOutcome::Evicted { message } => {
                self.toasts.dismiss_undo(id);
                self.toasts.error(message.clone());
            }
            UndoOutcome::Retained { message } => self.toasts.error(message.clone()),
            UndoOutcome::Missing => {}
        }
        outcome
    }

    pub fn clear_undo_history(&mut self) {
        if let Some(id) = self.undo.dismiss_active() {
            self.toasts.dismiss_undo(&id);
        }
        self.undo.clear();
    }

    /// Expire the undo window and stale toasts
    pub fn tick(&mut self, now: Instant) {
        if let Some(id) = self.undo.tick(now) {
            tracing::debug!(%id, "Undo window expired, kept in history");
            self.toasts.dismiss_undo(&id);
        }
        self.toasts.tick(now);
    }
}
