use crate::api::View;

/// Built-in pseudo-views: (slug, name, icon, query).
/// Synthesized client-side, never persisted.
const BUILTIN_VIEWS: [(&str, &str, &str, &str); 5] = [
    ("inbox", "Inbox", "inbox", "in:inbox"),
    ("starred", "Starred", "star", "is:starred"),
    ("snoozed", "Snoozed", "clock", "in:snoozed"),
    ("archive", "Archive", "archive", "in:archive"),
    ("everything", "Everything", "infinity", "in:anywhere"),
];

pub const INBOX_SLUG: &str = "inbox";

pub fn is_builtin(slug: &str) -> bool {
    BUILTIN_VIEWS.iter().any(|(s, ..)| *s == slug)
}

fn builtin(slug: &str, name: &str, icon: &str, query: &str) -> View {
    View {
        id: slug.to_string(),
        slug: slug.to_string(),
        name: name.to_string(),
        query: query.to_string(),
        icon: Some(icon.to_string()),
        system_view: true,
        ..Default::default()
    }
}

/// Server-defined saved views plus the built-ins, and which one is selected
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStore {
    builtins: Vec<View>,
    custom: Vec<View>,
    selected: String,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self {
            builtins: BUILTIN_VIEWS
                .iter()
                .map(|(slug, name, icon, query)| builtin(slug, name, icon, query))
                .collect(),
            custom: Vec::new(),
            selected: INBOX_SLUG.to_string(),
        }
    }
}

impl ViewStore {
    /// Replace views with a server response.
    ///
    /// System views in the response only contribute unread counts to the
    /// matching built-in.
    pub fn set_views(&mut self, views: Vec<View>) {
        let mut custom = Vec::new();
        for view in views {
            if view.system_view || is_builtin(&view.slug) {
                if let Some(b) = self.builtins.iter_mut().find(|b| b.slug == view.slug) {
                    b.unread_count = view.unread_count;
                }
            } else {
                custom.push(view);
            }
        }
        custom.sort_by_key(|v| v.display_order);
        self.custom = custom;
    }

    pub fn builtins(&self) -> &[View] {
        &self.builtins
    }

    pub fn custom(&self) -> &[View] {
        &self.custom
    }

    /// Built-ins first, then saved views in display order
    pub fn all(&self) -> impl Iterator<Item = &View> {
        self.builtins.iter().chain(self.custom.iter())
    }

    pub fn find(&self, slug: &str) -> Option<&View> {
        self.all().find(|v| v.slug == slug)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&View> {
        self.custom.iter().find(|v| v.id == id)
    }

    /// The explicit default saved view if there is one, else the inbox
    pub fn default_view(&self) -> &View {
        self.custom
            .iter()
            .find(|v| v.is_default)
            .unwrap_or(&self.builtins[0])
    }

    pub fn selected_slug(&self) -> &str {
        &self.selected
    }

    pub fn selected(&self) -> &View {
        self.find(&self.selected)
            .unwrap_or_else(|| self.default_view())
    }

    pub fn select(&mut self, slug: &str) -> bool {
        if self.find(slug).is_some() {
            self.selected = slug.to_string();
            true
        } else {
            false
        }
    }

    pub fn upsert(&mut self, view: View) {
        if view.is_default {
            for v in &mut self.custom {
                v.is_default = false;
            }
        }
        match self.custom.iter_mut().find(|v| v.id == view.id) {
            Some(slot) => *slot = view,
            None => self.custom.push(view),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<View> {
        let idx = self.custom.iter().position(|v| v.id == id)?;
        let removed = self.custom.remove(idx);
        if removed.slug == self.selected {
            self.selected = self.default_view().slug.clone();
        }
        Some(removed)
    }

    pub fn custom_ids(&self) -> Vec<String> {
        self.custom.iter().map(|v| v.id.clone()).collect()
    }
}
