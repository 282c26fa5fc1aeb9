use crate::api::Tag;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagStore {
    tags: Vec<Tag>,
}

impl TagStore {
    pub fn set_tags(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn find(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn upsert(&mut self, tag: Tag) {
        match self.tags.iter_mut().find(|t| t.id == tag.id) {
            Some(slot) => *slot = tag,
            None => self.tags.push(tag),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Tag> {
        let idx = self.tags.iter().position(|t| t.id == id)?;
        Some(self.tags.remove(idx))
    }

    /// Reorder locally to match `ids`; unknown ids are ignored and
    /// unlisted tags keep their relative order at the end.
    pub fn reorder(&mut self, ids: &[String]) {
        self.tags.sort_by_key(|t| {
            ids.iter()
                .position(|id| *id == t.id)
                .unwrap_or(usize::MAX)
        });
    }

    pub fn ids(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.id.clone()).collect()
    }
}
