use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
    /// Present on undo toasts
    pub undo_action_id: Option<String>,
}

/// Transient messages shown in the status bar
#[derive(Debug)]
pub struct ToastStore {
    toasts: Vec<Toast>,
    ttl: Duration,
}

impl ToastStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            ttl,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message.into(), ToastKind::Info, None, self.ttl);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message.into(), ToastKind::Success, None, self.ttl);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message.into(), ToastKind::Error, None, self.ttl);
    }

    /// Undo toasts replace any previous undo toast
    pub fn undo(&mut self, message: impl Into<String>, action_id: &str, ttl: Duration) {
        self.toasts.retain(|t| t.undo_action_id.is_none());
        self.push(
            message.into(),
            ToastKind::Success,
            Some(action_id.to_string()),
            ttl,
        );
    }

    fn push(&mut self, message: String, kind: ToastKind, undo: Option<String>, ttl: Duration) {
        self.toasts.push(Toast {
            message,
            kind,
            expires_at: Instant::now() + ttl,
            undo_action_id: undo,
        });
    }

    pub fn dismiss_undo(&mut self, action_id: &str) {
        self.toasts
            .retain(|t| t.undo_action_id.as_deref() != Some(action_id));
    }

    /// Drop expired toasts
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    /// Most recent toast, the one the status bar shows
    pub fn current(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn all(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_expires_old_toasts() {
        let mut toasts = ToastStore::new(Duration::from_millis(10));
        toasts.error("boom");
        toasts.tick(Instant::now() + Duration::from_secs(1));
        assert!(toasts.current().is_none());
    }

    #[test]
    fn only_one_undo_toast() {
        let mut toasts = ToastStore::new(Duration::from_secs(5));
        toasts.undo("Archived", "a1", Duration::from_secs(5));
        toasts.undo("Starred", "a2", Duration::from_secs(5));
        let undo: Vec<_> = toasts
            .all()
            .iter()
            .filter_map(|t| t.undo_action_id.as_deref())
            .collect();
        assert_eq!(undo, vec!["a2"]);
    }
}
