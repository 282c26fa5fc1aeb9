use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::error::ApiError;
use super::rules::{Rule, RuleDraft};
use super::types::{
    Action, BulkTarget, Notification, NotificationPage, PageRequest, Tag, TagDraft, View,
    ViewDraft, ViewPatch,
};

/// Everything the client layer needs from the server.
///
/// Controllers only ever see `&dyn Backend`, so tests can swap in an
/// in-memory implementation.
pub trait Backend {
    fn fetch_notifications(&self, req: &PageRequest) -> Result<NotificationPage, ApiError>;

    /// Apply `action` to one notification. `Ok(None)` means the endpoint
    /// returned no body (snooze).
    fn apply_action(&self, key: &str, action: &Action) -> Result<Option<Notification>, ApiError>;

    /// Returns the number of affected notifications
    fn apply_bulk(&self, target: &BulkTarget, action: &Action) -> Result<u64, ApiError>;

    fn fetch_views(&self) -> Result<Vec<View>, ApiError>;
    fn create_view(&self, draft: &ViewDraft) -> Result<View, ApiError>;
    fn update_view(&self, id: &str, patch: &ViewPatch) -> Result<View, ApiError>;
    fn delete_view(&self, id: &str, force: bool) -> Result<(), ApiError>;
    fn reorder_views(&self, ids: &[String]) -> Result<Vec<View>, ApiError>;

    fn fetch_tags(&self) -> Result<Vec<Tag>, ApiError>;
    fn create_tag(&self, draft: &TagDraft) -> Result<Tag, ApiError>;
    fn update_tag(&self, id: &str, draft: &TagDraft) -> Result<Tag, ApiError>;
    fn delete_tag(&self, id: &str) -> Result<(), ApiError>;
    fn reorder_tags(&self, ids: &[String]) -> Result<Vec<Tag>, ApiError>;

    fn fetch_rules(&self) -> Result<Vec<Rule>, ApiError>;
    fn create_rule(&self, draft: &RuleDraft) -> Result<Rule, ApiError>;
    fn update_rule(&self, id: &str, draft: &RuleDraft) -> Result<Rule, ApiError>;
    fn delete_rule(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(rename = "linkedRuleCount")]
    linked_rule_count: Option<u32>,
}

#[derive(Deserialize)]
struct NotificationEnvelope {
    notification: Notification,
}

#[derive(Deserialize)]
struct CountEnvelope {
    count: u64,
}

#[derive(Deserialize)]
struct ViewsEnvelope {
    views: Vec<View>,
}

#[derive(Deserialize)]
struct ViewEnvelope {
    view: View,
}

#[derive(Deserialize)]
struct TagsEnvelope {
    tags: Vec<Tag>,
}

#[derive(Deserialize)]
struct TagEnvelope {
    tag: Tag,
}

#[derive(Deserialize)]
struct RulesEnvelope {
    rules: Vec<Rule>,
}

#[derive(Deserialize)]
struct RuleEnvelope {
    rule: Rule,
}

/// Blocking HTTP implementation of [`Backend`]
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn notification_url(&self, key: &str, suffix: &str) -> String {
        self.url(&format!(
            "/notifications/{}{}",
            urlencoding::encode(key),
            suffix
        ))
    }
}

fn map_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(code, response) => {
            let body: Option<ErrorBody> = response.into_json().ok();
            let (message, linked_rule_count) = match body {
                Some(b) if !b.error.is_empty() => (b.error, b.linked_rule_count),
                Some(b) => (format!("request failed with status {}", code), b.linked_rule_count),
                None => (format!("request failed with status {}", code), None),
            };
            ApiError::Status {
                status_code: code,
                message,
                linked_rule_count,
            }
        }
        ureq::Error::Transport(t) => ApiError::Transport(t.to_string()),
    }
}

fn read_json<T: DeserializeOwned>(
    result: Result<ureq::Response, ureq::Error>,
) -> Result<T, ApiError> {
    let response = result.map_err(map_error)?;
    response
        .into_json::<T>()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn read_empty(result: Result<ureq::Response, ureq::Error>) -> Result<(), ApiError> {
    result.map(|_| ()).map_err(map_error)
}

/// JSON body for a bulk request: ids xor query, plus per-action parameters
fn bulk_body(target: &BulkTarget, action: &Action) -> serde_json::Value {
    let mut body = match target {
        BulkTarget::Keys(keys) => json!({ "githubIDs": keys }),
        BulkTarget::Query(query) => json!({ "query": query }),
    };
    match action {
        Action::Snooze { until } => {
            body["snoozedUntil"] = json!(until.to_rfc3339());
        }
        Action::AssignTag { tag_id } | Action::RemoveTag { tag_id } => {
            body["tagId"] = json!(tag_id);
        }
        _ => {}
    }
    body
}

impl Backend for HttpBackend {
    fn fetch_notifications(&self, req: &PageRequest) -> Result<NotificationPage, ApiError> {
        let page = req.page.to_string();
        let page_size = req.page_size.to_string();
        read_json(
            self.agent
                .get(&self.url("/notifications"))
                .query("query", &req.query)
                .query("page", &page)
                .query("pageSize", &page_size)
                .call(),
        )
    }

    fn apply_action(&self, key: &str, action: &Action) -> Result<Option<Notification>, ApiError> {
        let result = match action {
            Action::Snooze { until } => {
                let url = self.notification_url(key, "/snooze");
                read_empty(
                    self.agent
                        .post(&url)
                        .send_json(json!({ "snoozedUntil": until.to_rfc3339() })),
                )?;
                return Ok(None);
            }
            Action::AssignTag { tag_id } => self
                .agent
                .post(&self.notification_url(key, "/tags"))
                .send_json(json!({ "tagId": tag_id })),
            Action::AssignTagByName { name } => self
                .agent
                .post(&self.notification_url(key, "/tags-by-name"))
                .send_json(json!({ "tagName": name })),
            Action::RemoveTag { tag_id } => self
                .agent
                .delete(&self.notification_url(
                    key,
                    &format!("/tags/{}", urlencoding::encode(tag_id)),
                ))
                .call(),
            other => self
                .agent
                .post(&self.notification_url(key, &format!("/{}", other.slug())))
                .call(),
        };
        let envelope: NotificationEnvelope = read_json(result)?;
        Ok(Some(envelope.notification))
    }

    fn apply_bulk(&self, target: &BulkTarget, action: &Action) -> Result<u64, ApiError> {
        if let Action::AssignTagByName { .. } = action {
            return Err(ApiError::Validation(
                "Bulk tagging needs a tag id".to_string(),
            ));
        }
        let url = self.url(&format!("/notifications/bulk/{}", action.slug()));
        let envelope: CountEnvelope =
            read_json(self.agent.post(&url).send_json(bulk_body(target, action)))?;
        Ok(envelope.count)
    }

    fn fetch_views(&self) -> Result<Vec<View>, ApiError> {
        let envelope: ViewsEnvelope = read_json(self.agent.get(&self.url("/views")).call())?;
        Ok(envelope.views)
    }

    fn create_view(&self, draft: &ViewDraft) -> Result<View, ApiError> {
        let envelope: ViewEnvelope =
            read_json(self.agent.post(&self.url("/views")).send_json(draft))?;
        Ok(envelope.view)
    }

    fn update_view(&self, id: &str, patch: &ViewPatch) -> Result<View, ApiError> {
        let url = self.url(&format!("/views/{}", urlencoding::encode(id)));
        let envelope: ViewEnvelope = read_json(self.agent.put(&url).send_json(patch))?;
        Ok(envelope.view)
    }

    fn delete_view(&self, id: &str, force: bool) -> Result<(), ApiError> {
        let url = self.url(&format!("/views/{}", urlencoding::encode(id)));
        let mut request = self.agent.delete(&url);
        if force {
            request = request.query("force", "true");
        }
        read_empty(request.call())
    }

    fn reorder_views(&self, ids: &[String]) -> Result<Vec<View>, ApiError> {
        let envelope: ViewsEnvelope = read_json(
            self.agent
                .post(&self.url("/views/reorder"))
                .send_json(json!({ "viewIDs": ids })),
        )?;
        Ok(envelope.views)
    }

    fn fetch_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let envelope: TagsEnvelope = read_json(self.agent.get(&self.url("/tags")).call())?;
        Ok(envelope.tags)
    }

    fn create_tag(&self, draft: &TagDraft) -> Result<Tag, ApiError> {
        let envelope: TagEnvelope =
            read_json(self.agent.post(&self.url("/tags")).send_json(draft))?;
        Ok(envelope.tag)
    }

    fn update_tag(&self, id: &str, draft: &TagDraft) -> Result<Tag, ApiError> {
        let url = self.url(&format!("/tags/{}", urlencoding::encode(id)));
        let envelope: TagEnvelope = read_json(self.agent.put(&url).send_json(draft))?;
        Ok(envelope.tag)
    }

    fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/tags/{}", urlencoding::encode(id)));
        read_empty(self.agent.delete(&url).call())
    }

    fn reorder_tags(&self, ids: &[String]) -> Result<Vec<Tag>, ApiError> {
        let envelope: TagsEnvelope = read_json(
            self.agent
                .post(&self.url("/tags/reorder"))
                .send_json(json!({ "tagIDs": ids })),
        )?;
        Ok(envelope.tags)
    }

    fn fetch_rules(&self) -> Result<Vec<Rule>, ApiError> {
        let envelope: RulesEnvelope = read_json(self.agent.get(&self.url("/rules")).call())?;
        Ok(envelope.rules)
    }

    fn create_rule(&self, draft: &RuleDraft) -> Result<Rule, ApiError> {
        draft.validate()?;
        let envelope: RuleEnvelope =
            read_json(self.agent.post(&self.url("/rules")).send_json(draft))?;
        Ok(envelope.rule)
    }

    fn update_rule(&self, id: &str, draft: &RuleDraft) -> Result<Rule, ApiError> {
        draft.validate()?;
        let url = self.url(&format!("/rules/{}", urlencoding::encode(id)));
        let envelope: RuleEnvelope = read_json(self.agent.put(&url).send_json(draft))?;
        Ok(envelope.rule)
    }

    fn delete_rule(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/rules/{}", urlencoding::encode(id)));
        read_empty(self.agent.delete(&url).call())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn bulk_body_uses_ids_or_query() {
        let by_keys = bulk_body(&BulkTarget::Keys(vec!["a".into()]), &Action::Archive);
        assert_eq!(by_keys, json!({ "githubIDs": ["a"] }));

        let by_query = bulk_body(
            &BulkTarget::Query("in:inbox".into()),
            &Action::RemoveTag {
                tag_id: "t1".into(),
            },
        );
        assert_eq!(by_query, json!({ "query": "in:inbox", "tagId": "t1" }));
    }

    #[test]
    fn bulk_snooze_carries_timestamp() {
        let until = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let body = bulk_body(&BulkTarget::Keys(vec!["a".into()]), &Action::Snooze { until });
        assert_eq!(body["snoozedUntil"], json!("2026-01-02T03:04:05+00:00"));
    }
}
