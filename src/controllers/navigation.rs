use crate::api::{ApiError, Backend};
use crate::route::Route;
use crate::session::Session;

impl Session {
    /// Make state match `route`: view, filter, page and open detail.
    ///
    /// Unknown view slugs are rejected before anything changes.
    pub fn apply_route(&mut self, route: &Route, backend: &dyn Backend) -> Result<(), ApiError> {
        if !self.views.select(&route.view) {
            let e = ApiError::Validation(format!("Unknown view \"{}\"", route.view));
            self.toasts.error(e.user_message());
            return Err(e);
        }
        self.query.set(route.query.as_deref().unwrap_or(""));
        self.pagination.set_page(route.page);
        self.selection.clear();
        self.read_mark.cancel();
        self.detail.set(route.detail.clone());
        self.load_page(backend)?;

        if let Some(key) = route.detail.clone() {
            if let Some(index) = self.notifications.index_of(&key) {
                self.keyboard.set_focus(Some(index));
            }
            self.schedule_read_mark(&key);
        }
        Ok(())
    }

    /// Go to the previous history entry. Returns false at the start of
    /// history.
    pub fn back(&mut self, backend: &dyn Backend) -> Result<bool, ApiError> {
        let Some(route) = self.history.back() else {
            return Ok(false);
        };
        self.apply_route(&route, backend)?;
        Ok(true)
    }

    /// Handle a server `navigate` event
    pub fn navigate_to_url(&mut self, url: &str, backend: &dyn Backend) -> Result<(), ApiError> {
        let Some(route) = Route::parse(url) else {
            tracing::warn!(%url, "Ignoring navigate event for unknown path");
            return Ok(());
        };
        tracing::info!(url = %route.to_url(), "Navigating from server event");
        self.apply_route(&route, backend)?;
        self.push_route();
        Ok(())
    }
}
