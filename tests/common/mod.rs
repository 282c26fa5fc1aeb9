//! Shared test fixtures: an in-memory backend and session builders.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::{DateTime, Duration, TimeZone, Utc};
use triagetui::api::{
    Action, ActionHints, ApiError, Backend, BulkTarget, Notification, NotificationPage,
    PageRequest, Repository, Rule, RuleDraft, Tag, TagDraft, View, ViewDraft, ViewPatch,
};
use triagetui::session::{Session, Settings};

/// Backend state that tests can inspect and tweak between calls
#[derive(Debug, Default)]
pub struct FakeState {
    pub notifications: Vec<Notification>,
    pub views: Vec<View>,
    pub tags: Vec<Tag>,
    pub rules: Vec<Rule>,
    /// Every request, e.g. `action:archive:gh-1` or `bulk:star:2`
    pub calls: Vec<String>,
    /// Errors returned by the next mutating requests, in order
    pub failures: VecDeque<ApiError>,
    /// Error returned by every page fetch while set
    pub fetch_failure: Option<ApiError>,
    /// Keys archived by "another client" right after the next successful
    /// single action, so the following fetch comes back shorter
    pub archived_elsewhere: Vec<String>,
    next_id: u32,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub state: RefCell<FakeState>,
}

pub fn at(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap() + Duration::hours(hours)
}

/// Unread inbox notification keyed `gh-{n}`, newest first by `n`
pub fn notification(n: i64) -> Notification {
    Notification {
        id: n,
        github_id: format!("gh-{}", n),
        subject_type: "PullRequest".to_string(),
        subject_title: format!("Notification {}", n),
        repository: Some(Repository {
            id: 1,
            full_name: "octo/repo".to_string(),
        }),
        effective_sort_date: Some(at(-n)),
        ..Default::default()
    }
}

pub fn key(n: i64) -> String {
    format!("gh-{}", n)
}

fn matches(query: &str, n: &Notification) -> bool {
    query.split_whitespace().all(|term| match term {
        "in:inbox" => !n.archived && !n.is_snoozed() && !n.filtered && !n.muted,
        "in:archive" => n.archived,
        "in:snoozed" => n.is_snoozed(),
        "in:anywhere" => true,
        "is:starred" => n.starred,
        "is:unread" => !n.is_read,
        "is:read" => n.is_read,
        text => n.subject_title.to_lowercase().contains(&text.to_lowercase()),
    })
}

/// Actions that drop a notification out of the view `query` selects
fn dismissed_on(query: &str) -> Vec<String> {
    let mut hints = Vec::new();
    if query.contains("in:inbox") {
        hints.extend(["archive", "mute", "snooze"]);
    }
    if query.contains("in:archive") {
        hints.push("unarchive");
    }
    if query.contains("in:snoozed") {
        hints.push("unsnooze");
    }
    if query.contains("is:starred") {
        hints.push("unstar");
    }
    if query.contains("is:unread") {
        hints.push("mark-read");
    }
    hints.into_iter().map(String::from).collect()
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend holding notifications `1..=count`
    pub fn with_notifications(count: i64) -> Self {
        let backend = Self::new();
        backend.state.borrow_mut().notifications = (1..=count).map(notification).collect();
        backend
    }

    pub fn fail_next(&self, error: ApiError) {
        self.state.borrow_mut().failures.push_back(error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn stored(&self, key: &str) -> Option<Notification> {
        self.state
            .borrow()
            .notifications
            .iter()
            .find(|n| n.key() == key)
            .cloned()
    }

    pub fn add_tag(&self, id: &str, name: &str) {
        self.state.borrow_mut().tags.push(Tag {
            id: id.to_string(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            ..Default::default()
        });
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        format!("{}{}", prefix, state.next_id)
    }

    fn apply(state: &mut FakeState, n: &mut Notification, action: &Action) -> Result<(), ApiError> {
        match action {
            Action::AssignTag { tag_id } => {
                let tag = state
                    .tags
                    .iter()
                    .find(|t| &t.id == tag_id)
                    .cloned()
                    .ok_or_else(|| ApiError::not_found("tag not found"))?;
                if !n.tags.iter().any(|t| t.id == tag.id) {
                    n.tags.push(tag);
                }
            }
            Action::AssignTagByName { name } => {
                let tag = match state.tags.iter().find(|t| t.name.eq_ignore_ascii_case(name)) {
                    Some(tag) => tag.clone(),
                    None => {
                        state.next_id += 1;
                        let tag = Tag {
                            id: format!("tag-{}", state.next_id),
                            name: name.clone(),
                            slug: name.to_lowercase(),
                            ..Default::default()
                        };
                        state.tags.push(tag.clone());
                        tag
                    }
                };
                if !n.tags.iter().any(|t| t.id == tag.id) {
                    n.tags.push(tag);
                }
            }
            other => other.apply_locally(n),
        }
        Ok(())
    }
}

impl Backend for FakeBackend {
    fn fetch_notifications(&self, req: &PageRequest) -> Result<NotificationPage, ApiError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(format!("fetch:{}:{}", req.page, req.query));
        if let Some(e) = state.fetch_failure.clone() {
            return Err(e);
        }
        let hints = dismissed_on(&req.query);
        let matching: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| matches(&req.query, n))
            .cloned()
            .collect();
        let size = req.page_size.max(1) as usize;
        let start = (req.page.max(1) as usize - 1) * size;
        let items = matching
            .iter()
            .skip(start)
            .take(size)
            .cloned()
            .map(|mut n| {
                n.action_hints = Some(ActionHints {
                    dismissed_on: hints.clone(),
                });
                n
            })
            .collect();
        Ok(NotificationPage {
            items,
            total: matching.len() as u64,
            page: req.page,
            page_size: req.page_size,
        })
    }

    fn apply_action(&self, key: &str, action: &Action) -> Result<Option<Notification>, ApiError> {
        self.record(format!("action:{}:{}", action.slug(), key))?;
        let mut state = self.state.borrow_mut();
        let index = state
            .notifications
            .iter()
            .position(|n| n.matches_key(key))
            .ok_or_else(|| ApiError::not_found("notification not found"))?;
        let mut n = state.notifications[index].clone();
        Self::apply(&mut state, &mut n, action)?;
        state.notifications[index] = n.clone();
        let elsewhere = std::mem::take(&mut state.archived_elsewhere);
        for other in state.notifications.iter_mut() {
            if elsewhere.iter().any(|k| other.matches_key(k)) {
                other.archived = true;
            }
        }
        match action {
            Action::Snooze { .. } => Ok(None),
            _ => Ok(Some(n)),
        }
    }

    fn apply_bulk(&self, target: &BulkTarget, action: &Action) -> Result<u64, ApiError> {
        let label = match target {
            BulkTarget::Keys(keys) => keys.len().to_string(),
            BulkTarget::Query(query) => format!("query={}", query),
        };
        self.record(format!("bulk:{}:{}", action.slug(), label))?;
        let mut state = self.state.borrow_mut();
        let indexes: Vec<usize> = state
            .notifications
            .iter()
            .enumerate()
            .filter(|(_, n)| match target {
                BulkTarget::Keys(keys) => keys.iter().any(|k| n.matches_key(k)),
                BulkTarget::Query(query) => matches(query, n),
            })
            .map(|(i, _)| i)
            .collect();
        if indexes.is_empty() {
            return Err(ApiError::not_found("no matching notifications"));
        }
        for &i in &indexes {
            let mut n = state.notifications[i].clone();
            Self::apply(&mut state, &mut n, action)?;
            state.notifications[i] = n;
        }
        Ok(indexes.len() as u64)
    }

    fn fetch_views(&self) -> Result<Vec<View>, ApiError> {
        Ok(self.state.borrow().views.clone())
    }

    fn create_view(&self, draft: &ViewDraft) -> Result<View, ApiError> {
        self.record(format!("create-view:{}", draft.name))?;
        let view = View {
            id: self.next_id("view-"),
            slug: draft.name.to_lowercase().replace(' ', "-"),
            name: draft.name.clone(),
            query: draft.query.clone(),
            ..Default::default()
        };
        self.state.borrow_mut().views.push(view.clone());
        Ok(view)
    }

    fn update_view(&self, id: &str, patch: &ViewPatch) -> Result<View, ApiError> {
        self.record(format!("update-view:{}", id))?;
        let mut state = self.state.borrow_mut();
        let view = state
            .views
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| ApiError::not_found("view not found"))?;
        if let Some(name) = &patch.name {
            view.name = name.clone();
        }
        if let Some(query) = &patch.query {
            view.query = query.clone();
        }
        Ok(view.clone())
    }

    fn delete_view(&self, id: &str, force: bool) -> Result<(), ApiError> {
        self.record(format!("delete-view:{}:{}", id, force))?;
        let mut state = self.state.borrow_mut();
        let linked = state
            .rules
            .iter()
            .filter(|r| r.view_id.as_deref() == Some(id))
            .count() as u32;
        if linked > 0 && !force {
            return Err(ApiError::Status {
                status_code: 409,
                message: "view has linked rules".to_string(),
                linked_rule_count: Some(linked),
            });
        }
        state.rules.retain(|r| r.view_id.as_deref() != Some(id));
        state.views.retain(|v| v.id != id);
        Ok(())
    }

    fn reorder_views(&self, ids: &[String]) -> Result<Vec<View>, ApiError> {
        self.record(format!("reorder-views:{}", ids.join(",")))?;
        let mut state = self.state.borrow_mut();
        for view in state.views.iter_mut() {
            if let Some(pos) = ids.iter().position(|id| *id == view.id) {
                view.display_order = pos as i32;
            }
        }
        state.views.sort_by_key(|v| v.display_order);
        Ok(state.views.clone())
    }

    fn fetch_tags(&self) -> Result<Vec<Tag>, ApiError> {
        Ok(self.state.borrow().tags.clone())
    }

    fn create_tag(&self, draft: &TagDraft) -> Result<Tag, ApiError> {
        self.record(format!("create-tag:{}", draft.name))?;
        let tag = Tag {
            id: self.next_id("tag-"),
            name: draft.name.clone(),
            slug: draft.name.to_lowercase(),
            ..Default::default()
        };
        self.state.borrow_mut().tags.push(tag.clone());
        Ok(tag)
    }

    fn update_tag(&self, id: &str, draft: &TagDraft) -> Result<Tag, ApiError> {
        self.record(format!("update-tag:{}", id))?;
        let mut state = self.state.borrow_mut();
        let tag = state
            .tags
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiError::not_found("tag not found"))?;
        tag.name = draft.name.clone();
        Ok(tag.clone())
    }

    fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete-tag:{}", id))?;
        let mut state = self.state.borrow_mut();
        state.tags.retain(|t| t.id != id);
        for n in state.notifications.iter_mut() {
            n.tags.retain(|t| t.id != id);
        }
        Ok(())
    }

    fn reorder_tags(&self, ids: &[String]) -> Result<Vec<Tag>, ApiError> {
        self.record(format!("reorder-tags:{}", ids.join(",")))?;
        let mut state = self.state.borrow_mut();
        state
            .tags
            .sort_by_key(|t| ids.iter().position(|id| *id == t.id).unwrap_or(usize::MAX));
        Ok(state.tags.clone())
    }

    fn fetch_rules(&self) -> Result<Vec<Rule>, ApiError> {
        Ok(self.state.borrow().rules.clone())
    }

    fn create_rule(&self, draft: &RuleDraft) -> Result<Rule, ApiError> {
        self.record(format!("create-rule:{}", draft.name))?;
        let rule = Rule {
            id: self.next_id("rule-"),
            name: draft.name.clone(),
            query: draft.query.clone().unwrap_or_default(),
            view_id: draft.view_id.clone(),
            actions: draft.actions.clone(),
            enabled: draft.enabled.unwrap_or(true),
            ..Default::default()
        };
        self.state.borrow_mut().rules.push(rule.clone());
        Ok(rule)
    }

    fn update_rule(&self, id: &str, draft: &RuleDraft) -> Result<Rule, ApiError> {
        self.record(format!("update-rule:{}", id))?;
        let mut state = self.state.borrow_mut();
        let rule = state
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::not_found("rule not found"))?;
        rule.name = draft.name.clone();
        rule.actions = draft.actions.clone();
        Ok(rule.clone())
    }

    fn delete_rule(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete-rule:{}", id))?;
        self.state.borrow_mut().rules.retain(|r| r.id != id);
        Ok(())
    }
}

/// Settings for tests: small pages, no mark-read delay surprises
pub fn settings(page_size: u32) -> Settings {
    Settings {
        page_size,
        ..Settings::default()
    }
}

/// In-memory session on the inbox with the first page loaded
pub fn loaded_session(backend: &FakeBackend, page_size: u32) -> Session {
    let mut session = Session::new(settings(page_size));
    session.load_page(backend).unwrap();
    session
}

/// Action-type calls only, ignoring fetches
pub fn mutations(backend: &FakeBackend) -> Vec<String> {
    backend
        .calls()
        .into_iter()
        .filter(|c| !c.starts_with("fetch:"))
        .collect()
}
