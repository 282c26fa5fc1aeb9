use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Action, ActionType, ApiError, Backend, BulkTarget, Notification};

use super::ui_state::save_json;

const HISTORY_VERSION: u32 = 1;

/// Snapshot of a notification an action touched, enough to label it later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActionNotification {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub repo: String,
}

impl From<&Notification> for RecentActionNotification {
    fn from(n: &Notification) -> Self {
        Self {
            key: n.key(),
            title: n.subject_title.clone(),
            repo: n.repo_name().to_string(),
        }
    }
}

/// Inverse-operation parameters that can't be derived from the action type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UndoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
}

/// A reversible action. Only type, keys and metadata are stored; the inverse
/// call is rebuilt from them whenever it is needed, so a reloaded entry
/// undoes exactly like a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoableAction {
    pub id: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub description: String,
    pub notifications: Vec<RecentActionNotification>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<UndoMetadata>,
}

impl UndoableAction {
    pub fn new(
        action_type: ActionType,
        notifications: Vec<RecentActionNotification>,
        metadata: Option<UndoMetadata>,
    ) -> Self {
        let description = match notifications.as_slice() {
            [single] => format!("{} \"{}\"", action_type.past_tense(), single.title),
            many => format!("{} {} notifications", action_type.past_tense(), many.len()),
        };
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            action_type,
            description,
            notifications,
            timestamp: Utc::now(),
            metadata,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.notifications.iter().map(|n| n.key.clone()).collect()
    }

    fn key_set(&self) -> BTreeSet<&str> {
        self.notifications.iter().map(|n| n.key.as_str()).collect()
    }

    /// True if `other` exactly reverses this action on the same notifications
    pub fn is_cancelled_by(&self, other: &UndoableAction) -> bool {
        self.action_type == other.action_type.inverse() && self.key_set() == other.key_set()
    }

    fn metadata(&self) -> Option<&UndoMetadata> {
        self.metadata.as_ref()
    }

    /// The backend call that reverses this action
    pub fn inverse_action(&self) -> Result<Action, ApiError> {
        let tag_id = || {
            self.metadata()
                .and_then(|m| m.tag_id.clone())
                .ok_or(ApiError::MissingMetadata {
                    action: if self.action_type == ActionType::AssignTag {
                        "assignTag"
                    } else {
                        "removeTag"
                    },
                    field: "tagId",
                })
        };
        Ok(match self.action_type {
            ActionType::MarkRead => Action::MarkUnread,
            ActionType::MarkUnread => Action::MarkRead,
            ActionType::Archive => Action::Unarchive,
            ActionType::Unarchive => Action::Archive,
            ActionType::Mute => Action::Unmute,
            ActionType::Unmute => Action::Mute,
            ActionType::Snooze => Action::Unsnooze,
            ActionType::Unsnooze => {
                let until = self.metadata().and_then(|m| m.snoozed_until).ok_or(
                    ApiError::MissingMetadata {
                        action: "unsnooze",
                        field: "snoozedUntil",
                    },
                )?;
                Action::Snooze { until }
            }
            ActionType::Star => Action::Unstar,
            ActionType::Unstar => Action::Star,
            ActionType::AssignTag => Action::RemoveTag { tag_id: tag_id()? },
            ActionType::RemoveTag => Action::AssignTag { tag_id: tag_id()? },
        })
    }

    /// Execute the inverse: the bulk endpoint for several keys, the single
    /// endpoint for one.
    pub fn perform_undo(&self, backend: &dyn Backend) -> Result<(), ApiError> {
        let action = self.inverse_action()?;
        let keys = self.keys();
        match keys.as_slice() {
            [] => Err(ApiError::Validation("Nothing to undo".into())),
            [key] => backend.apply_action(key, &action).map(|_| ()),
            _ => backend.apply_bulk(&BulkTarget::Keys(keys), &action).map(|_| ()),
        }
    }
}

/// Result of an undo attempt
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// Inverse ran; the entry left history
    Undone(UndoableAction),
    /// Permanent failure; the entry left history
    Evicted { message: String },
    /// Transient failure; the entry stays for retry
    Retained { message: String },
    /// No entry with that id
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveUndo {
    id: String,
    expires_at: Instant,
}

#[derive(Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    actions: Vec<UndoableAction>,
}

/// Capped undo history with one active (toast-visible) entry.
///
/// Every mutation is written through to disk immediately.
#[derive(Debug)]
pub struct UndoStore {
    /// Newest first
    history: Vec<UndoableAction>,
    active: Option<ActiveUndo>,
    limit: usize,
    toast_duration: Duration,
    path: Option<PathBuf>,
}

impl UndoStore {
    pub fn new(limit: usize, toast_duration: Duration) -> Self {
        Self {
            history: Vec::new(),
            active: None,
            limit: limit.max(1),
            toast_duration,
            path: None,
        }
    }

    /// Load persisted history from `path`; missing or unreadable files start empty
    pub fn load(path: &Path, limit: usize, toast_duration: Duration) -> Self {
        let mut store = Self::new(limit, toast_duration);
        store.path = Some(path.to_path_buf());
        store.history = load_history(path);
        store.history.truncate(store.limit);
        store
    }

    pub fn history(&self) -> &[UndoableAction] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn toast_duration(&self) -> Duration {
        self.toast_duration
    }

    pub fn get(&self, id: &str) -> Option<&UndoableAction> {
        self.history.iter().find(|a| a.id == id)
    }

    pub fn active(&self) -> Option<&UndoableAction> {
        self.active.as_ref().and_then(|a| self.get(&a.id))
    }

    /// Record a new action and make it active.
    ///
    /// Any entry that this action exactly reverses is removed first, so
    /// toggling back and forth leaves only the latest action. Returns the
    /// ids of the cancelled entries.
    pub fn push(&mut self, action: UndoableAction, now: Instant) -> Vec<String> {
        let cancelled: Vec<String> = self
            .history
            .iter()
            .filter(|existing| existing.is_cancelled_by(&action))
            .map(|existing| existing.id.clone())
            .collect();
        if !cancelled.is_empty() {
            self.history.retain(|a| !cancelled.contains(&a.id));
            tracing::debug!(?cancelled, "Undo entries cancelled by inverse action");
        }

        self.active = Some(ActiveUndo {
            id: action.id.clone(),
            expires_at: now + self.toast_duration,
        });
        self.history.insert(0, action);
        self.history.truncate(self.limit);
        self.persist();
        cancelled
    }

    /// Expire the active entry once its toast window is over. It stays in
    /// history. Returns the expired id.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        match &self.active {
            Some(active) if active.expires_at <= now => self.active.take().map(|a| a.id),
            _ => None,
        }
    }

    /// Resolve the active toast without touching history
    pub fn dismiss_active(&mut self) -> Option<String> {
        self.active.take().map(|a| a.id)
    }

    pub fn remove(&mut self, id: &str) -> Option<UndoableAction> {
        let idx = self.history.iter().position(|a| a.id == id)?;
        let removed = self.history.remove(idx);
        if self.active.as_ref().is_some_and(|a| a.id == id) {
            self.active = None;
        }
        self.persist();
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.active = None;
        self.persist();
    }

    /// Run the inverse of entry `id` and classify the result.
    ///
    /// Not-found and permission errors are permanent and evict the entry.
    /// Everything else, including missing metadata, keeps it for retry.
    pub fn undo(&mut self, id: &str, backend: &dyn Backend) -> UndoOutcome {
        let Some(action) = self.get(id).cloned() else {
            return UndoOutcome::Missing;
        };
        match action.perform_undo(backend) {
            Ok(()) => {
                self.remove(id);
                tracing::info!(action = ?action.action_type, keys = action.notifications.len(), "Undid action");
                UndoOutcome::Undone(action)
            }
            Err(e) if e.is_not_found() => {
                self.remove(id);
                let message = if action.action_type.is_tag_action() {
                    "Can't undo: tag no longer exists"
                } else {
                    "Can't undo: notification no longer exists"
                };
                tracing::warn!(error = %e, "Undo target gone, dropping from history");
                UndoOutcome::Evicted {
                    message: message.to_string(),
                }
            }
            Err(e) if e.is_forbidden() => {
                self.remove(id);
                tracing::warn!(error = %e, "Undo forbidden, dropping from history");
                UndoOutcome::Evicted {
                    message: "Can't undo: permission denied".to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Undo failed, keeping for retry");
                let message = match &e {
                    ApiError::MissingMetadata { .. } | ApiError::Validation(_) => {
                        format!("Couldn't undo: {}", e)
                    }
                    _ => "Couldn't undo, check your connection and try again".to_string(),
                };
                UndoOutcome::Retained { message }
            }
        }
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let file = HistoryFile {
            version: HISTORY_VERSION,
            actions: self.history.clone(),
        };
        if let Err(e) = save_json(path, &file) {
            tracing::error!(path = ?path, error = %e, "Failed to persist undo history");
        }
    }
}

fn load_history(path: &Path) -> Vec<UndoableAction> {
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    match serde_json::from_str::<HistoryFile>(&content) {
        Ok(file) if file.version == HISTORY_VERSION => file.actions,
        Ok(file) => {
            tracing::warn!(version = file.version, "Discarding undo history from another version");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Discarding unreadable undo history");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(action_type: ActionType, keys: &[&str]) -> UndoableAction {
        UndoableAction::new(
            action_type,
            keys.iter()
                .map(|k| RecentActionNotification {
                    key: k.to_string(),
                    title: format!("title {}", k),
                    repo: String::new(),
                })
                .collect(),
            None,
        )
    }

    fn store() -> UndoStore {
        UndoStore::new(20, Duration::from_secs(5))
    }

    #[test]
    fn inverse_push_cancels_previous_entry() {
        let mut undo = store();
        let now = Instant::now();
        undo.push(entry(ActionType::Archive, &["x"]), now);
        let star = entry(ActionType::Star, &["n"]);
        let star_id = star.id.clone();
        undo.push(star, now);

        let unstar = entry(ActionType::Unstar, &["n"]);
        let unstar_id = unstar.id.clone();
        let cancelled = undo.push(unstar, now);

        assert_eq!(cancelled, vec![star_id]);
        assert_eq!(undo.len(), 2);
        assert_eq!(undo.active().unwrap().id, unstar_id);
    }

    #[test]
    fn cancellation_needs_identical_key_set() {
        let mut undo = store();
        let now = Instant::now();
        undo.push(entry(ActionType::Star, &["a", "b"]), now);
        undo.push(entry(ActionType::Unstar, &["a"]), now);
        assert_eq!(undo.len(), 2);
        undo.push(entry(ActionType::Unstar, &["b", "a"]), now);
        assert_eq!(undo.len(), 2);
        assert!(
            undo.history()
                .iter()
                .all(|a| a.action_type == ActionType::Unstar)
        );
    }

    #[test]
    fn history_is_capped_oldest_first() {
        let mut undo = store();
        let now = Instant::now();
        let first = entry(ActionType::Archive, &["k0"]);
        let first_id = first.id.clone();
        undo.push(first, now);
        for i in 1..21 {
            undo.push(entry(ActionType::Archive, &[&format!("k{}", i)]), now);
        }
        assert_eq!(undo.len(), 20);
        assert!(undo.get(&first_id).is_none());
    }

    #[test]
    fn tick_moves_active_into_history_only() {
        let mut undo = store();
        let now = Instant::now();
        undo.push(entry(ActionType::Mute, &["m"]), now);
        assert_eq!(undo.tick(now + Duration::from_secs(1)), None);
        assert!(undo.tick(now + Duration::from_secs(6)).is_some());
        assert!(undo.active().is_none());
        assert_eq!(undo.len(), 1);
    }

    #[test]
    fn missing_metadata_fails_fast() {
        let unsnooze = entry(ActionType::Unsnooze, &["s"]);
        assert!(matches!(
            unsnooze.inverse_action(),
            Err(ApiError::MissingMetadata {
                field: "snoozedUntil",
                ..
            })
        ));
        let tag = entry(ActionType::AssignTag, &["s"]);
        assert!(tag.inverse_action().is_err());
    }

    #[test]
    fn history_reloads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("undo-history.json");
        let mut undo = UndoStore::load(&path, 20, Duration::from_secs(5));
        let mut tagged = entry(ActionType::AssignTag, &["t"]);
        tagged.metadata = Some(UndoMetadata {
            tag_id: Some("tag-1".into()),
            ..Default::default()
        });
        undo.push(tagged.clone(), Instant::now());

        let reloaded = UndoStore::load(&path, 20, Duration::from_secs(5));
        assert_eq!(reloaded.history(), &[tagged]);
        assert!(reloaded.active().is_none());
        assert_eq!(
            reloaded.history()[0].inverse_action(),
            Ok(Action::RemoveTag {
                tag_id: "tag-1".into()
            })
        );
    }

    #[test]
    fn description_counts_bulk() {
        assert_eq!(
            entry(ActionType::Archive, &["a", "b", "c"]).description,
            "Archived 3 notifications"
        );
        assert_eq!(
            entry(ActionType::Star, &["a"]).description,
            "Starred \"title a\""
        );
    }
}
