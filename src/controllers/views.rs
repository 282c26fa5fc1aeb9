use crate::api::{ApiError, Backend, View, ViewDraft, ViewPatch};
use crate::route::Route;
use crate::session::Session;
use crate::store::{Dialog, INBOX_SLUG, PendingFocus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteViewOutcome {
    Deleted,
    /// Rules reference the view; deleting needs a confirmed, forced retry
    NeedsConfirmation { linked_rule_count: u32 },
}

impl Session {
    /// Initial load: sidebar data, then the first page of the default view.
    /// Failing to load views, tags or rules leaves the built-ins in place.
    pub fn start(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        match self.refresh_views(backend) {
            Ok(()) => self.select_default_view(),
            Err(e) => tracing::warn!(error = %e, "Could not load views"),
        }
        if let Err(e) = self.refresh_tags(backend) {
            tracing::warn!(error = %e, "Could not load tags");
        }
        if let Err(e) = self.refresh_rules(backend) {
            tracing::debug!(error = %e, "Could not load rules");
        }
        self.load_page(backend)
    }

    /// Make the default view (an explicit saved default, else the inbox)
    /// active. Does nothing once a route has been applied.
    pub fn select_default_view(&mut self) {
        if self.history.len() > 1 || self.current_route() != Route::new(INBOX_SLUG) {
            return;
        }
        let slug = self.views.default_view().slug.clone();
        if slug != self.views.selected_slug() && self.views.select(&slug) {
            tracing::debug!(%slug, "Starting on default view");
            self.sync_route();
        }
    }

    pub fn refresh_views(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        let views = backend.fetch_views()?;
        self.views.set_views(views);
        Ok(())
    }

    /// Refresh sidebar unread counts; failures are only logged
    pub fn refresh_view_counts(&mut self, backend: &dyn Backend) {
        if let Err(e) = self.refresh_views(backend) {
            tracing::warn!(error = %e, "Failed to refresh view counts");
        }
    }

    /// Switch to the view `slug`, resetting filter, page and selection
    pub fn select_view(&mut self, slug: &str, backend: &dyn Backend) -> Result<(), ApiError> {
        if !self.views.select(slug) {
            let e = ApiError::Validation(format!("Unknown view \"{}\"", slug));
            self.toasts.error(e.user_message());
            return Err(e);
        }
        tracing::debug!(%slug, "Selected view");
        self.query.set("");
        self.pagination.set_page(1);
        self.selection.clear();
        self.detail.close();
        self.read_mark.cancel();
        self.keyboard.reset();
        self.keyboard.set_pending(PendingFocus::First);
        self.ui.dropdown = None;
        self.push_route();
        self.load_page(backend)
    }

    pub fn create_view(&mut self, draft: ViewDraft, backend: &dyn Backend) -> Result<View, ApiError> {
        if draft.name.trim().is_empty() {
            return Err(self.report(ApiError::Validation("View name is required".into())));
        }
        match backend.create_view(&draft) {
            Ok(view) => {
                tracing::info!(id = %view.id, name = %view.name, "Created view");
                self.toasts.success(format!("Created view \"{}\"", view.name));
                self.views.upsert(view.clone());
                Ok(view)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    pub fn update_view(
        &mut self,
        id: &str,
        patch: ViewPatch,
        backend: &dyn Backend,
    ) -> Result<View, ApiError> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(self.report(ApiError::Validation("View name is required".into())));
        }
        match backend.update_view(id, &patch) {
            Ok(view) => {
                let query_changed = patch.query.is_some() && self.views.selected().id == view.id;
                self.views.upsert(view.clone());
                self.toasts.success(format!("Updated view \"{}\"", view.name));
                if query_changed {
                    self.pagination.set_page(1);
                    self.load_page(backend)?;
                }
                Ok(view)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Delete a saved view. A 409 carrying a linked rule count opens a
    /// confirmation dialog instead of failing.
    pub fn delete_view(
        &mut self,
        id: &str,
        force: bool,
        backend: &dyn Backend,
    ) -> Result<DeleteViewOutcome, ApiError> {
        match backend.delete_view(id, force) {
            Ok(()) => {
                let was_selected = self.views.selected().id == id;
                if let Some(view) = self.views.remove(id) {
                    tracing::info!(%id, force, "Deleted view");
                    self.toasts.success(format!("Deleted view \"{}\"", view.name));
                }
                if was_selected {
                    let slug = self.views.default_view().slug.clone();
                    self.select_view(&slug, backend)?;
                }
                Ok(DeleteViewOutcome::Deleted)
            }
            Err(e) if e.is_conflict() && !force => {
                let linked_rule_count = e.linked_rule_count().unwrap_or(0);
                let name = self
                    .views
                    .find_by_id(id)
                    .map(|v| v.name.clone())
                    .unwrap_or_default();
                self.ui.open_dialog(Dialog::ConfirmDeleteView {
                    view_id: id.to_string(),
                    name,
                    linked_rule_count,
                });
                Ok(DeleteViewOutcome::NeedsConfirmation { linked_rule_count })
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Run the forced delete held by an open confirmation dialog
    pub fn confirm_delete_view(&mut self, backend: &dyn Backend) -> Result<DeleteViewOutcome, ApiError> {
        match self.ui.close_dialog() {
            Some(Dialog::ConfirmDeleteView { view_id, .. }) => self.delete_view(&view_id, true, backend),
            other => {
                self.ui.dialog = other;
                Err(ApiError::Validation("No view deletion to confirm".into()))
            }
        }
    }

    pub fn reorder_views(&mut self, ids: Vec<String>, backend: &dyn Backend) -> Result<(), ApiError> {
        match backend.reorder_views(&ids) {
            Ok(views) => {
                self.views.set_views(views);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Move a saved view up (negative) or down (positive) in the sidebar
    pub fn move_view(&mut self, id: &str, delta: isize, backend: &dyn Backend) -> Result<(), ApiError> {
        let mut ids = self.views.custom_ids();
        let Some(from) = ids.iter().position(|v| v == id) else {
            return Ok(());
        };
        let to = (from as isize + delta).clamp(0, ids.len() as isize - 1) as usize;
        if to == from {
            return Ok(());
        }
        let moved = ids.remove(from);
        ids.insert(to, moved);
        self.reorder_views(ids, backend)
    }

    /// Log and toast an error at the controller boundary, handing it back
    pub(crate) fn report(&mut self, e: ApiError) -> ApiError {
        tracing::warn!(error = %e, "Request failed");
        self.toasts.error(e.user_message());
        e
    }
}
