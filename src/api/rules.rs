use serde::{Deserialize, Serialize};

use super::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleActions {
    #[serde(default)]
    pub skip_inbox: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mark_read: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub star: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub archive: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mute: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assign_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_tags: Vec<String>,
}

impl RuleActions {
    pub fn is_empty(&self) -> bool {
        !self.skip_inbox
            && !self.mark_read
            && !self.star
            && !self.archive
            && !self.mute
            && self.assign_tags.is_empty()
            && self.remove_tags.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub view_id: Option<String>,
    #[serde(default)]
    pub actions: RuleActions,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub display_order: i32,
}

/// Body for creating or replacing a rule
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    pub actions: RuleActions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub apply_to_existing: bool,
}

impl RuleDraft {
    /// Checks run before the draft is sent anywhere
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("Rule name is required".into()));
        }
        let has_query = self.query.as_deref().is_some_and(|q| !q.trim().is_empty());
        let has_view = self.view_id.as_deref().is_some_and(|v| !v.is_empty());
        match (has_query, has_view) {
            (true, true) => Err(ApiError::Validation(
                "A rule can match a query or a view, not both".into(),
            )),
            (false, false) => Err(ApiError::Validation(
                "A rule needs either a query or a view".into(),
            )),
            _ if self.actions.is_empty() => Err(ApiError::Validation(
                "A rule needs at least one action".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RuleDraft {
        RuleDraft {
            name: "bots".into(),
            query: Some("author:dependabot".into()),
            actions: RuleActions {
                archive: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn accepts_query_rule() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_name() {
        let mut d = draft();
        d.name = "  ".into();
        assert!(matches!(d.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn query_and_view_are_exclusive() {
        let mut d = draft();
        d.view_id = Some("v1".into());
        assert!(d.validate().is_err());
        d.query = None;
        assert_eq!(d.validate(), Ok(()));
        d.view_id = None;
        assert!(d.validate().is_err());
    }

    #[test]
    fn requires_an_action() {
        let mut d = draft();
        d.actions = RuleActions::default();
        assert!(d.validate().is_err());
    }
}
