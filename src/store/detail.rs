use crate::api::Notification;

use super::NotificationStore;

/// Which single notification is open in the detail pane.
///
/// Only the key is held; index and object are derived from the normalized
/// store on every read, so the pane never shows a stale copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailStore {
    open_key: Option<String>,
}

impl DetailStore {
    pub fn open_key(&self) -> Option<&str> {
        self.open_key.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open_key.is_some()
    }

    pub fn is_open_on(&self, notification: &Notification) -> bool {
        self.open_key
            .as_deref()
            .is_some_and(|k| notification.matches_key(k))
    }

    pub fn open(&mut self, key: String) {
        self.open_key = Some(key);
    }

    pub fn close(&mut self) {
        self.open_key = None;
    }

    pub fn set(&mut self, key: Option<String>) {
        self.open_key = key;
    }

    pub fn index(&self, store: &NotificationStore) -> Option<usize> {
        self.open_key.as_deref().and_then(|k| store.index_of(k))
    }

    pub fn notification<'a>(&self, store: &'a NotificationStore) -> Option<&'a Notification> {
        self.open_key.as_deref().and_then(|k| store.get(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NotificationPage;

    #[test]
    fn derives_from_store() {
        let mut store = NotificationStore::new();
        store.set_page_data(NotificationPage {
            items: vec![
                Notification {
                    id: 1,
                    github_id: "a".into(),
                    ..Default::default()
                },
                Notification {
                    id: 2,
                    github_id: "b".into(),
                    subject_title: "second".into(),
                    ..Default::default()
                },
            ],
            total: 2,
            page: 1,
            page_size: 10,
        });
        let mut detail = DetailStore::default();
        detail.open("b".into());
        assert_eq!(detail.index(&store), Some(1));
        assert_eq!(detail.notification(&store).unwrap().subject_title, "second");
    }
}
