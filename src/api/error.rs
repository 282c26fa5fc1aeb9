use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Non-2xx response from the backend
    #[error("{message} (HTTP {status_code})")]
    Status {
        status_code: u16,
        message: String,
        linked_rule_count: Option<u32>,
    },
    /// Connection refused, timeout, reset
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Rejected locally before any request was made
    #[error("{0}")]
    Validation(String),
    /// An undo entry lacks the data needed to build its inverse
    #[error("cannot undo {action}: missing {field}")]
    MissingMetadata {
        action: &'static str,
        field: &'static str,
    },
}

impl ApiError {
    pub fn status(status_code: u16, message: impl Into<String>) -> Self {
        ApiError::Status {
            status_code,
            message: message.into(),
            linked_rule_count: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::status(404, message)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status_code() == Some(403)
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }

    pub fn linked_rule_count(&self) -> Option<u32> {
        match self {
            ApiError::Status {
                linked_rule_count, ..
            } => *linked_rule_count,
            _ => None,
        }
    }

    /// Message suitable for a toast
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(_) => "Network error, check your connection".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert!(ApiError::not_found("gone").is_not_found());
        assert!(ApiError::status(403, "nope").is_forbidden());
        assert!(!ApiError::Transport("reset".into()).is_not_found());
        let conflict = ApiError::Status {
            status_code: 409,
            message: "linked rules".into(),
            linked_rule_count: Some(2),
        };
        assert!(conflict.is_conflict());
        assert_eq!(conflict.linked_rule_count(), Some(2));
    }
}
