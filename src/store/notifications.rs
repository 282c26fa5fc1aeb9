use std::collections::HashMap;

use crate::api::{Notification, NotificationPage};

/// Normalized notification store: one map by key, plus the current page view.
///
/// All mutation of notification data goes through here.
#[derive(Debug, Default)]
pub struct NotificationStore {
    by_key: HashMap<String, Notification>,
    page: NotificationPage,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert every item of `page` and make it the current page view
    pub fn set_page_data(&mut self, page: NotificationPage) {
        for n in &page.items {
            self.by_key.insert(n.key(), n.clone());
        }
        self.page = page;
    }

    pub fn page(&self) -> &NotificationPage {
        &self.page
    }

    pub fn items(&self) -> &[Notification] {
        &self.page.items
    }

    pub fn len(&self) -> usize {
        self.page.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.items.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.page.total
    }

    pub fn set_total(&mut self, total: u64) {
        self.page.total = total;
    }

    pub fn get(&self, key: &str) -> Option<&Notification> {
        self.by_key
            .get(key)
            .or_else(|| self.by_key.values().find(|n| n.matches_key(key)))
    }

    pub fn item_at(&self, index: usize) -> Option<&Notification> {
        self.page.items.get(index)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.page.items.iter().position(|n| n.matches_key(key))
    }

    pub fn page_keys(&self) -> Vec<String> {
        self.page.items.iter().map(|n| n.key()).collect()
    }

    /// Upsert `updated` and reconcile it into the page view.
    ///
    /// A stored `isRead = true` is never regressed to unread by an update;
    /// a slow unread snapshot must not clobber a newer read state.
    /// Returns the value actually stored.
    pub fn update_notification(&mut self, mut updated: Notification) -> Notification {
        let key = updated.key();
        if let Some(existing) = self.by_key.get(&key) {
            if existing.is_read && !updated.is_read {
                updated.is_read = true;
            }
        }
        if let Some(slot) = self.page.items.iter_mut().find(|n| n.matches_key(&key)) {
            *slot = updated.clone();
        }
        self.by_key.insert(key, updated.clone());
        updated
    }

    /// Store an explicit unread state, bypassing the anti-regression rule.
    ///
    /// Only for confirmed user-initiated mark-unread responses.
    pub fn force_update(&mut self, updated: Notification) {
        let key = updated.key();
        if let Some(slot) = self.page.items.iter_mut().find(|n| n.matches_key(&key)) {
            *slot = updated.clone();
        }
        self.by_key.insert(key, updated);
    }

    /// Remove a notification from the map and the page view.
    ///
    /// Matches page items by key or by underlying id. Decrements `total`
    /// (floored at 0) when an item left the page. Returns the removed object
    /// for rollback.
    pub fn remove_notification(&mut self, key: &str) -> Option<Notification> {
        let from_map = match self.by_key.remove(key) {
            Some(n) => Some(n),
            None => {
                let alt = self
                    .by_key
                    .iter()
                    .find(|(_, n)| n.matches_key(key))
                    .map(|(k, _)| k.clone());
                alt.and_then(|k| self.by_key.remove(&k))
            }
        };

        let from_page = self
            .page
            .items
            .iter()
            .position(|n| n.matches_key(key))
            .map(|i| self.page.items.remove(i));

        if from_page.is_some() {
            self.page.total = self.page.total.saturating_sub(1);
        }

        from_page.or(from_map)
    }

    /// Reverse a removal.
    ///
    /// Updates in place if the item is somehow back on the page already,
    /// otherwise appends it and increments `total`. Order is corrected by the
    /// next refresh.
    pub fn restore_notification(&mut self, notification: Notification) {
        let key = notification.key();
        self.by_key.insert(key.clone(), notification.clone());
        if let Some(slot) = self.page.items.iter_mut().find(|n| n.matches_key(&key)) {
            *slot = notification;
        } else {
            self.page.items.push(notification);
            self.page.total += 1;
        }
    }

    /// Put an item back at its original page index
    pub fn restore_at(&mut self, index: usize, notification: Notification) {
        let key = notification.key();
        if self.index_of(&key).is_some() {
            self.restore_notification(notification);
            return;
        }
        self.by_key.insert(key, notification.clone());
        let index = index.min(self.page.items.len());
        self.page.items.insert(index, notification);
        self.page.total += 1;
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
        self.page = NotificationPage::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notif(id: i64, read: bool) -> Notification {
        Notification {
            id,
            github_id: format!("gh{}", id),
            is_read: read,
            ..Default::default()
        }
    }

    fn page(items: Vec<Notification>) -> NotificationPage {
        NotificationPage {
            total: items.len() as u64,
            items,
            page: 1,
            page_size: 50,
        }
    }

    #[test]
    fn set_page_data_upserts_and_replaces_page() {
        let mut store = NotificationStore::new();
        store.set_page_data(page(vec![notif(1, false), notif(2, false)]));
        store.set_page_data(page(vec![notif(3, false)]));
        assert_eq!(store.len(), 1);
        assert!(store.get("gh1").is_some());
        assert!(store.get("gh3").is_some());
    }

    #[test]
    fn update_never_regresses_read_state() {
        let mut store = NotificationStore::new();
        store.set_page_data(page(vec![notif(1, true)]));
        let stored = store.update_notification(notif(1, false));
        assert!(stored.is_read);
        assert!(store.get("gh1").unwrap().is_read);
        assert!(store.items()[0].is_read);
    }

    #[test]
    fn remove_matches_internal_id_and_floors_total() {
        let mut store = NotificationStore::new();
        store.set_page_data(page(vec![notif(1, false)]));
        store.set_total(0);
        let removed = store.remove_notification("1").unwrap();
        assert_eq!(removed.id, 1);
        assert!(store.is_empty());
        assert_eq!(store.total(), 0);
    }

    #[test]
    fn restore_appends_and_increments() {
        let mut store = NotificationStore::new();
        store.set_page_data(page(vec![notif(1, false), notif(2, false)]));
        let removed = store.remove_notification("gh1").unwrap();
        assert_eq!(store.total(), 1);
        store.restore_notification(removed);
        assert_eq!(store.total(), 2);
        assert_eq!(store.page_keys(), vec!["gh2", "gh1"]);
    }

    #[test]
    fn restore_in_place_when_already_present() {
        let mut store = NotificationStore::new();
        store.set_page_data(page(vec![notif(1, false)]));
        let mut copy = notif(1, false);
        copy.starred = true;
        store.restore_notification(copy);
        assert_eq!(store.len(), 1);
        assert_eq!(store.total(), 1);
        assert!(store.items()[0].starred);
    }
}
