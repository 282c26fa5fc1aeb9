use crate::api::{ApiError, Backend, Tag, TagDraft};
use crate::session::Session;

impl Session {
    pub fn refresh_tags(&mut self, backend: &dyn Backend) -> Result<(), ApiError> {
        let tags = backend.fetch_tags()?;
        self.tags.set_tags(tags);
        Ok(())
    }

    pub(crate) fn refresh_tags_quietly(&mut self, backend: &dyn Backend) {
        if let Err(e) = self.refresh_tags(backend) {
            tracing::warn!(error = %e, "Failed to refresh tags");
        }
    }

    pub fn create_tag(&mut self, draft: TagDraft, backend: &dyn Backend) -> Result<Tag, ApiError> {
        if draft.name.trim().is_empty() {
            return Err(self.report(ApiError::Validation("Tag name is required".into())));
        }
        match backend.create_tag(&draft) {
            Ok(tag) => {
                tracing::info!(id = %tag.id, name = %tag.name, "Created tag");
                self.tags.upsert(tag.clone());
                Ok(tag)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    pub fn update_tag(
        &mut self,
        id: &str,
        draft: TagDraft,
        backend: &dyn Backend,
    ) -> Result<Tag, ApiError> {
        if draft.name.trim().is_empty() {
            return Err(self.report(ApiError::Validation("Tag name is required".into())));
        }
        match backend.update_tag(id, &draft) {
            Ok(tag) => {
                self.tags.upsert(tag.clone());
                Ok(tag)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Delete a tag and reload, since notifications on the page may carry it
    pub fn delete_tag(&mut self, id: &str, backend: &dyn Backend) -> Result<(), ApiError> {
        if let Err(e) = backend.delete_tag(id) {
            return Err(self.report(e));
        }
        if let Some(tag) = self.tags.remove(id) {
            tracing::info!(%id, name = %tag.name, "Deleted tag");
            self.toasts.success(format!("Deleted tag \"{}\"", tag.name));
        }
        self.load_page(backend)
    }

    /// Apply a new order locally right away, then persist it. The server's
    /// order wins on failure.
    pub fn reorder_tags(&mut self, ids: Vec<String>, backend: &dyn Backend) -> Result<(), ApiError> {
        self.tags.reorder(&ids);
        match backend.reorder_tags(&ids) {
            Ok(tags) => {
                self.tags.set_tags(tags);
                Ok(())
            }
            Err(e) => {
                self.refresh_tags_quietly(backend);
                Err(self.report(e))
            }
        }
    }

    pub fn move_tag(&mut self, id: &str, delta: isize, backend: &dyn Backend) -> Result<(), ApiError> {
        let mut ids = self.tags.ids();
        let Some(from) = ids.iter().position(|t| t == id) else {
            return Ok(());
        };
        let to = (from as isize + delta).clamp(0, ids.len() as isize - 1) as usize;
        if to == from {
            return Ok(());
        }
        let moved = ids.remove(from);
        ids.insert(to, moved);
        self.reorder_tags(ids, backend)
    }
}
