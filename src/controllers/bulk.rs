use crate::api::{Action, ApiError, Backend, BulkTarget, Notification, TagDraft};
use crate::session::Session;
use crate::store::{Dialog, RecentActionNotification, SelectAllMode};

/// Where a bulk action was triggered. Each site has its own confirmation
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmSite {
    Toolbar,
    Shortcut,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BulkOutcome {
    /// A confirmation dialog is open; nothing was sent
    NeedsConfirmation { count: Option<u64> },
    Done {
        affected: u64,
        undo_id: Option<String>,
    },
}

impl Session {
    /// Explicit selected keys, or the whole filter in select-all mode
    pub fn bulk_target(&self) -> Option<BulkTarget> {
        match self.selection.mode() {
            SelectAllMode::All => Some(BulkTarget::Query(self.effective_query())),
            _ if self.selection.explicit_count() > 0 => {
                Some(BulkTarget::Keys(self.selection.keys()))
            }
            _ => None,
        }
    }

    pub fn confirm_threshold(&self, site: ConfirmSite) -> usize {
        match site {
            ConfirmSite::Toolbar => self.settings.bulk_confirm_threshold,
            ConfirmSite::Shortcut => self.settings.shortcut_confirm_threshold,
        }
    }

    pub fn select_page(&mut self) {
        let keys = self.notifications.page_keys();
        self.selection.select_page(&keys);
    }

    pub fn select_all_matching(&mut self) {
        self.selection.select_all();
    }

    /// Run `action` on the selection, or open a confirmation dialog first.
    ///
    /// Query-mode targets always ask, since they can't be undone. Explicit
    /// selections ask above the threshold for `site`.
    pub fn request_bulk(
        &mut self,
        action: Action,
        site: ConfirmSite,
        backend: &dyn Backend,
    ) -> Result<BulkOutcome, ApiError> {
        let Some(target) = self.bulk_target() else {
            return Err(self.report(ApiError::Validation("No notifications selected".into())));
        };
        let (count, needs_confirmation) = match &target {
            BulkTarget::Query(_) => (Some(self.pagination.total), true),
            BulkTarget::Keys(keys) => (
                Some(keys.len() as u64),
                keys.len() > self.confirm_threshold(site),
            ),
        };
        if needs_confirmation {
            tracing::debug!(action = action.slug(), ?count, "Bulk action needs confirmation");
            self.ui.open_dialog(Dialog::ConfirmBulk { action, count });
            return Ok(BulkOutcome::NeedsConfirmation { count });
        }
        self.execute_bulk(action, backend)
    }

    /// Run the bulk action held by an open confirmation dialog
    pub fn confirm_bulk(&mut self, backend: &dyn Backend) -> Result<BulkOutcome, ApiError> {
        match self.ui.close_dialog() {
            Some(Dialog::ConfirmBulk { action, .. }) => self.execute_bulk(action, backend),
            other => {
                self.ui.dialog = other;
                Err(ApiError::Validation("No bulk action to confirm".into()))
            }
        }
    }

    /// Send `action` for the current bulk target without asking
    pub fn execute_bulk(&mut self, action: Action, backend: &dyn Backend) -> Result<BulkOutcome, ApiError> {
        let Some(target) = self.bulk_target() else {
            return Err(self.report(ApiError::Validation("No notifications selected".into())));
        };
        let action = self.resolve_bulk_action(action, backend)?;

        let representative: Option<Notification> = match &target {
            // First selected item in page order
            BulkTarget::Keys(keys) => self
                .notifications
                .items()
                .iter()
                .find(|n| keys.contains(&n.key()))
                .cloned(),
            BulkTarget::Query(_) => self.notifications.items().first().cloned(),
        };
        let dismissive = representative
            .as_ref()
            .is_some_and(|n| n.dismissed_on(action.slug()));
        let recent: Vec<RecentActionNotification> = match &target {
            BulkTarget::Keys(keys) => keys
                .iter()
                .map(|k| match self.notifications.get(k) {
                    Some(n) => RecentActionNotification::from(n),
                    None => RecentActionNotification {
                        key: k.clone(),
                        title: String::new(),
                        repo: String::new(),
                    },
                })
                .collect(),
            BulkTarget::Query(_) => Vec::new(),
        };
        let metadata = self.undo_metadata(representative.as_ref(), None, &action);

        let affected = match backend.apply_bulk(&target, &action) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(action = action.slug(), error = %e, "Bulk action failed");
                return Err(self.report(e));
            }
        };
        tracing::info!(action = action.slug(), affected, query = target.is_query(), "Applied bulk action");

        self.refresh_view_counts(backend);
        self.sync_route();
        let reloaded = self
            .reload(backend)
            .and_then(|_| self.step_back_if_empty(backend));
        if dismissive {
            self.selection.clear();
        }

        let undo_id = match (&target, action.action_type()) {
            (BulkTarget::Keys(_), Some(action_type)) => {
                Some(self.record_undo(action_type, recent, metadata))
            }
            _ => {
                self.toasts
                    .success(format!("Updated {} notifications", affected));
                None
            }
        };
        if let Err(e) = reloaded {
            // The action itself went through
            self.report(e);
        }
        Ok(BulkOutcome::Done { affected, undo_id })
    }

    /// Bulk endpoints take tag ids only; resolve a name, creating the tag
    /// if it doesn't exist yet
    fn resolve_bulk_action(&mut self, action: Action, backend: &dyn Backend) -> Result<Action, ApiError> {
        let name = match action {
            Action::AssignTagByName { name } => name,
            other => return Ok(other),
        };
        if let Some(tag) = self.tags.find_by_name(&name) {
            return Ok(Action::AssignTag {
                tag_id: tag.id.clone(),
            });
        }
        let draft = TagDraft {
            name,
            ..Default::default()
        };
        let tag = self.create_tag(draft, backend)?;
        Ok(Action::AssignTag { tag_id: tag.id })
    }
}
