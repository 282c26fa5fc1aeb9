use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<i64>,
}

/// Which actions would drop a notification out of the view it was fetched for.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActionHints {
    #[serde(default)]
    pub dismissed_on: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub github_id: String,
    #[serde(default)]
    pub repository_id: i64,
    #[serde(default)]
    pub subject_type: String,
    #[serde(default)]
    pub subject_title: String,
    #[serde(default, rename = "subjectURL", skip_serializing_if = "Option::is_none")]
    pub subject_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub muted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snoozed_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub filtered: bool,
    #[serde(default, rename = "githubURL", skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_sort_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_hints: Option<ActionHints>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub view_ids: Vec<String>,
}

impl Notification {
    /// Store key: the GitHub id when present, the internal id otherwise.
    pub fn key(&self) -> String {
        if self.github_id.is_empty() {
            self.id.to_string()
        } else {
            self.github_id.clone()
        }
    }

    /// True if `key` names this notification by either of its ids
    pub fn matches_key(&self, key: &str) -> bool {
        self.key() == key || self.id.to_string() == key
    }

    pub fn dismissed_on(&self, hint: &str) -> bool {
        self.action_hints
            .as_ref()
            .is_some_and(|h| h.dismissed_on.iter().any(|a| a == hint))
    }

    pub fn is_snoozed(&self) -> bool {
        self.snoozed_until.is_some_and(|t| t > Utc::now())
    }

    pub fn repo_name(&self) -> &str {
        self.repository
            .as_ref()
            .map(|r| r.full_name.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    #[serde(rename = "notifications", default)]
    pub items: Vec<Notification>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

/// Parameters for a page fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub system_view: bool,
    #[serde(default)]
    pub unread_count: i64,
    #[serde(default)]
    pub display_order: i32,
}

/// Body for creating a view
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViewDraft {
    pub name: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Partial update for a view; `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ViewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TagDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Undoable action types. Each has exactly one inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    MarkRead,
    MarkUnread,
    Archive,
    Unarchive,
    Mute,
    Unmute,
    Snooze,
    Unsnooze,
    Star,
    Unstar,
    AssignTag,
    RemoveTag,
}

impl ActionType {
    pub fn inverse(self) -> ActionType {
        match self {
            ActionType::MarkRead => ActionType::MarkUnread,
            ActionType::MarkUnread => ActionType::MarkRead,
            ActionType::Archive => ActionType::Unarchive,
            ActionType::Unarchive => ActionType::Archive,
            ActionType::Mute => ActionType::Unmute,
            ActionType::Unmute => ActionType::Mute,
            ActionType::Snooze => ActionType::Unsnooze,
            ActionType::Unsnooze => ActionType::Snooze,
            ActionType::Star => ActionType::Unstar,
            ActionType::Unstar => ActionType::Star,
            ActionType::AssignTag => ActionType::RemoveTag,
            ActionType::RemoveTag => ActionType::AssignTag,
        }
    }

    /// Past-tense label used in toasts and history
    pub fn past_tense(self) -> &'static str {
        match self {
            ActionType::MarkRead => "Marked read",
            ActionType::MarkUnread => "Marked unread",
            ActionType::Archive => "Archived",
            ActionType::Unarchive => "Unarchived",
            ActionType::Mute => "Muted",
            ActionType::Unmute => "Unmuted",
            ActionType::Snooze => "Snoozed",
            ActionType::Unsnooze => "Unsnoozed",
            ActionType::Star => "Starred",
            ActionType::Unstar => "Unstarred",
            ActionType::AssignTag => "Tagged",
            ActionType::RemoveTag => "Untagged",
        }
    }

    pub fn is_tag_action(self) -> bool {
        matches!(self, ActionType::AssignTag | ActionType::RemoveTag)
    }
}

/// A mutation the backend can apply to one notification or to a bulk target.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    MarkRead,
    MarkUnread,
    Archive,
    Unarchive,
    Mute,
    Unmute,
    Snooze { until: DateTime<Utc> },
    Unsnooze,
    Star,
    Unstar,
    Unfilter,
    AssignTag { tag_id: String },
    AssignTagByName { name: String },
    RemoveTag { tag_id: String },
}

impl Action {
    /// Endpoint segment, also the name used in `actionHints.dismissedOn`
    pub fn slug(&self) -> &'static str {
        match self {
            Action::MarkRead => "mark-read",
            Action::MarkUnread => "mark-unread",
            Action::Archive => "archive",
            Action::Unarchive => "unarchive",
            Action::Mute => "mute",
            Action::Unmute => "unmute",
            Action::Snooze { .. } => "snooze",
            Action::Unsnooze => "unsnooze",
            Action::Star => "star",
            Action::Unstar => "unstar",
            Action::Unfilter => "unfilter",
            Action::AssignTag { .. } | Action::AssignTagByName { .. } => "assign-tag",
            Action::RemoveTag { .. } => "remove-tag",
        }
    }

    /// Undo type for this action; `None` for actions with no inverse.
    pub fn action_type(&self) -> Option<ActionType> {
        Some(match self {
            Action::MarkRead => ActionType::MarkRead,
            Action::MarkUnread => ActionType::MarkUnread,
            Action::Archive => ActionType::Archive,
            Action::Unarchive => ActionType::Unarchive,
            Action::Mute => ActionType::Mute,
            Action::Unmute => ActionType::Unmute,
            Action::Snooze { .. } => ActionType::Snooze,
            Action::Unsnooze => ActionType::Unsnooze,
            Action::Star => ActionType::Star,
            Action::Unstar => ActionType::Unstar,
            Action::Unfilter => return None,
            Action::AssignTag { .. } | Action::AssignTagByName { .. } => ActionType::AssignTag,
            Action::RemoveTag { .. } => ActionType::RemoveTag,
        })
    }

    /// Apply the action's effect locally, used when the endpoint returns no body.
    pub fn apply_locally(&self, n: &mut Notification) {
        match self {
            Action::MarkRead => n.is_read = true,
            Action::MarkUnread => n.is_read = false,
            Action::Archive => n.archived = true,
            Action::Unarchive => n.archived = false,
            Action::Mute => n.muted = true,
            Action::Unmute => n.muted = false,
            Action::Snooze { until } => n.snoozed_until = Some(*until),
            Action::Unsnooze => n.snoozed_until = None,
            Action::Star => n.starred = true,
            Action::Unstar => n.starred = false,
            Action::Unfilter => n.filtered = false,
            Action::RemoveTag { tag_id } => n.tags.retain(|t| &t.id != tag_id),
            Action::AssignTag { .. } | Action::AssignTagByName { .. } => {}
        }
    }
}

/// Target of a bulk operation: explicit keys, or everything matching a query.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkTarget {
    Keys(Vec<String>),
    Query(String),
}

impl BulkTarget {
    pub fn is_query(&self) -> bool {
        matches!(self, BulkTarget::Query(_))
    }
}
