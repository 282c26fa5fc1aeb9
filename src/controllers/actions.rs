use crate::api::{Action, ApiError, Backend, Notification, NotificationPage};
use crate::session::Session;
use crate::store::{PendingFocus, RecentActionNotification, SelectionSnapshot, UndoMetadata};

/// Per-call switches for a single-notification action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOptions {
    /// Close the detail pane afterwards when in single-pane mode
    pub close_detail: bool,
    /// No undo entry and no toast (automatic mark-read on open)
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// The notification left the current view
    pub removed: bool,
    /// Focus target computed at removal time
    pub next_focus: Option<usize>,
    pub undo_id: Option<String>,
}

/// State captured before an optimistic removal
struct Rollback {
    removed: Notification,
    index: usize,
    total: u64,
    page: u32,
    page_data: NotificationPage,
    selection: SelectionSnapshot,
    detail: Option<String>,
    focus: Option<usize>,
}

/// Index to focus after removing the item at `index` from a page of `len`
/// items. The following item slides up into the slot; removing the last
/// item moves to the one before it. `None` if the page becomes empty.
pub fn next_focus_after_removal(index: usize, len: usize) -> Option<usize> {
    if len <= 1 {
        None
    } else if index < len - 1 {
        Some(index)
    } else {
        Some(len - 2)
    }
}

impl Session {
    pub fn perform_action(
        &mut self,
        key: &str,
        action: Action,
        backend: &dyn Backend,
    ) -> Result<ActionOutcome, ApiError> {
        self.perform_action_with(key, action, ActionOptions::default(), backend)
    }

    /// Apply `action` to one notification.
    ///
    /// Works from the freshest stored copy, never a caller's snapshot. If the
    /// notification's hints say the action drops it from the current view,
    /// it is removed optimistically and everything is rolled back on failure.
    /// Otherwise the backend's returned object replaces the stored one.
    pub fn perform_action_with(
        &mut self,
        key: &str,
        action: Action,
        opts: ActionOptions,
        backend: &dyn Backend,
    ) -> Result<ActionOutcome, ApiError> {
        let Some(current) = self.notifications.get(key).cloned() else {
            let e = ApiError::not_found(format!("Notification {} is not loaded", key));
            self.toasts.error(e.user_message());
            return Err(e);
        };

        let result = if current.dismissed_on(action.slug()) {
            self.perform_dismissive(&current, &action, opts, backend)
        } else {
            self.perform_in_place(&current, &action, opts, backend)
        };

        match &result {
            Ok(outcome) => tracing::info!(
                key = %current.key(),
                action = action.slug(),
                removed = outcome.removed,
                "Applied action"
            ),
            Err(e) => {
                tracing::warn!(key = %current.key(), action = action.slug(), error = %e, "Action failed");
                self.toasts.error(e.user_message());
            }
        }
        result
    }

    fn perform_dismissive(
        &mut self,
        current: &Notification,
        action: &Action,
        opts: ActionOptions,
        backend: &dyn Backend,
    ) -> Result<ActionOutcome, ApiError> {
        let key = current.key();
        let Some(index) = self.notifications.index_of(&key) else {
            // Not on this page, nothing to remove optimistically
            return self.perform_in_place(current, action, opts, backend);
        };
        let len = self.notifications.len();
        let rollback = Rollback {
            removed: current.clone(),
            index,
            total: self.pagination.total,
            page: self.pagination.page,
            page_data: self.notifications.page().clone(),
            selection: self.selection.snapshot(),
            detail: self.detail.open_key().map(str::to_string),
            focus: self.keyboard.focus(),
        };

        self.notifications.remove_notification(&key);
        self.pagination.decrement_total();
        self.selection.deselect(&key);

        let next_focus = next_focus_after_removal(index, len);
        let mut focus = match self.keyboard.focus() {
            _ if self.notifications.is_empty() => None,
            Some(f) if f == index => next_focus,
            Some(f) if f > index => Some(f - 1),
            other => other,
        };

        if self.detail.is_open_on(current) {
            self.read_mark.cancel();
            let next_key = next_focus
                .and_then(|i| self.notifications.item_at(i))
                .map(|n| n.key());
            match next_key {
                Some(next) if self.ui.is_split() => {
                    // Focus follows the detail pane
                    focus = next_focus;
                    self.detail.open(next.clone());
                    self.schedule_read_mark(&next);
                }
                _ => self.detail.close(),
            }
            self.sync_route();
        }
        self.keyboard.set_focus(focus);
        tracing::debug!(%key, index, ?focus, ?next_focus, "Optimistically removed");

        match self.finish_dismissive(current, action, opts, focus, backend) {
            Ok(undo_id) => Ok(ActionOutcome {
                removed: true,
                next_focus,
                undo_id,
            }),
            Err(e) => {
                self.rollback(rollback);
                Err(e)
            }
        }
    }

    fn finish_dismissive(
        &mut self,
        current: &Notification,
        action: &Action,
        opts: ActionOptions,
        focus: Option<usize>,
        backend: &dyn Backend,
    ) -> Result<Option<String>, ApiError> {
        let response = backend.apply_action(&current.key(), action)?;
        let undo_id = self.record_action_undo(current, response.as_ref(), action, opts);

        let stepped_back = self.notifications.is_empty() && self.pagination.page > 1;
        if stepped_back {
            self.keyboard.set_pending(PendingFocus::Last);
            self.pagination.set_page(self.pagination.page - 1);
            self.sync_route();
        }
        self.reload(backend)?;
        self.refresh_view_counts(backend);

        // The refreshed page may be shorter than the optimistic one
        if !stepped_back {
            self.keyboard.set_focus(focus);
            self.keyboard.clamp(self.notifications.len());
        }
        Ok(undo_id)
    }

    fn rollback(&mut self, rb: Rollback) {
        tracing::warn!(key = %rb.removed.key(), "Rolling back optimistic removal");
        if self.pagination.page != rb.page {
            self.pagination.set_page(rb.page);
            self.notifications.set_page_data(rb.page_data);
        } else {
            self.notifications.restore_at(rb.index, rb.removed);
        }
        self.notifications.set_total(rb.total);
        self.pagination.set_total(rb.total);
        self.selection.restore(rb.selection);
        self.detail.set(rb.detail);
        self.keyboard.set_focus(rb.focus);
        self.keyboard.clear_pending();
        self.sync_route();
    }

    fn perform_in_place(
        &mut self,
        current: &Notification,
        action: &Action,
        opts: ActionOptions,
        backend: &dyn Backend,
    ) -> Result<ActionOutcome, ApiError> {
        let key = current.key();
        let response = backend.apply_action(&key, action)?;
        // Snooze has no body; reuse the pre-call object
        let updated = response.clone().unwrap_or_else(|| {
            let mut n = current.clone();
            action.apply_locally(&mut n);
            n
        });

        if matches!(action, Action::MarkUnread) {
            // An explicit unread must win over the anti-regression rule
            self.notifications.force_update(updated);
            if self.read_mark.pending_key() == Some(key.as_str()) {
                self.read_mark.cancel();
            }
        } else {
            self.notifications.update_notification(updated);
        }

        if opts.close_detail && !self.ui.is_split() && self.detail.is_open_on(current) {
            self.detail.close();
            self.read_mark.cancel();
            self.sync_route();
        }
        if matches!(action, Action::AssignTagByName { .. }) {
            // The name may have created a tag
            self.refresh_tags_quietly(backend);
        }
        self.refresh_view_counts(backend);

        let undo_id = self.record_action_undo(current, response.as_ref(), action, opts);
        Ok(ActionOutcome {
            removed: false,
            next_focus: None,
            undo_id,
        })
    }

    fn record_action_undo(
        &mut self,
        before: &Notification,
        after: Option<&Notification>,
        action: &Action,
        opts: ActionOptions,
    ) -> Option<String> {
        if opts.quiet {
            return None;
        }
        let Some(action_type) = action.action_type() else {
            self.toasts
                .success(format!("Moved \"{}\" to inbox", before.subject_title));
            return None;
        };
        let metadata = self.undo_metadata(Some(before), after, action);
        Some(self.record_undo(
            action_type,
            vec![RecentActionNotification::from(before)],
            metadata,
        ))
    }

    /// Parameters the inverse call will need. `before` is the pre-call
    /// object, `after` the backend's response if it sent one.
    pub(crate) fn undo_metadata(
        &self,
        before: Option<&Notification>,
        after: Option<&Notification>,
        action: &Action,
    ) -> Option<UndoMetadata> {
        match action {
            Action::Snooze { until } => Some(UndoMetadata {
                snoozed_until: Some(*until),
                ..Default::default()
            }),
            Action::Unsnooze => before.and_then(|n| n.snoozed_until).map(|t| UndoMetadata {
                snoozed_until: Some(t),
                ..Default::default()
            }),
            Action::AssignTag { tag_id } | Action::RemoveTag { tag_id } => Some(UndoMetadata {
                tag_id: Some(tag_id.clone()),
                tag_name: self.tags.find(tag_id).map(|t| t.name.clone()),
                ..Default::default()
            }),
            Action::AssignTagByName { name } => {
                let tag = after
                    .and_then(|n| n.tags.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
                    .or_else(|| self.tags.find_by_name(name));
                Some(UndoMetadata {
                    tag_id: tag.map(|t| t.id.clone()),
                    tag_name: Some(name.clone()),
                    ..Default::default()
                })
            }
            _ => None,
        }
    }
}
