use crate::api::{ApiError, Backend, NotificationPage, PageRequest};
use crate::session::Session;

impl Session {
    /// Fetch the current page for the current view and filter
    pub fn load_page(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        self.reload(backend).inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to load notifications");
            self.toasts.error(e.user_message());
        })
    }

    /// `load_page` without the error toast, for controllers that report at
    /// their own boundary
    pub(crate) fn reload(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        let req = PageRequest {
            page: self.pagination.page,
            page_size: self.pagination.page_size,
            query: self.effective_query(),
        };
        tracing::debug!(page = req.page, query = %req.query, "Loading page");
        let page = backend.fetch_notifications(&req)?;
        self.apply_page(page);
        Ok(())
    }

    pub(crate) fn apply_page(&mut self, page: NotificationPage) {
        self.pagination.set_total(page.total);
        self.notifications.set_page_data(page);
        let keys = self.notifications.page_keys();
        self.selection.retain_page(&keys);
        self.keyboard.on_page_loaded(keys.len());
    }

    /// Authoritative reload: current page plus sidebar counts
    pub fn refresh(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        self.load_page(backend)?;
        self.refresh_view_counts(backend);
        Ok(())
    }

    /// Navigate to `page` (clamped to the valid range), creating a history
    /// entry. A failed load stays on the current page.
    pub fn go_to_page(&mut self, page: u32, backend: &dyn Backend) -> Result<(), ApiError> {
        let page = page.clamp(1, self.pagination.total_pages());
        if page == self.pagination.page {
            return Ok(());
        }
        let previous = self.pagination.page;
        self.pagination.set_page(page);
        if let Err(e) = self.load_page(backend) {
            self.pagination.set_page(previous);
            return Err(e);
        }
        self.selection.clear();
        self.push_route();
        Ok(())
    }

    pub fn next_page(&mut self, backend: &dyn Backend) -> Result<bool, ApiError> {
        if !self.pagination.has_next() {
            return Ok(false);
        }
        self.go_to_page(self.pagination.page + 1, backend)?;
        Ok(true)
    }

    pub fn previous_page(&mut self, backend: &dyn Backend) -> Result<bool, ApiError> {
        if !self.pagination.has_previous() {
            return Ok(false);
        }
        self.go_to_page(self.pagination.page - 1, backend)?;
        Ok(true)
    }

    /// Step back one page if the current page emptied out and isn't the
    /// first. Returns true if it moved.
    pub(crate) fn step_back_if_empty(&mut self, backend: &dyn Backend) -> Result<bool, ApiError> {
        if !self.notifications.is_empty() || self.pagination.page <= 1 {
            return Ok(false);
        }
        tracing::debug!(page = self.pagination.page, "Page emptied, stepping back");
        self.pagination.set_page(self.pagination.page - 1);
        self.sync_route();
        self.reload(backend)?;
        Ok(true)
    }
}

