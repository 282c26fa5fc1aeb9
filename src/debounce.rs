use std::time::{Duration, Instant};

/// Debounce channels. Each has one shared timer; scheduling again cancels
/// the previous deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Live search while typing in the query bar
    Search,
    /// Syncing the committed query into the route
    Query,
}

#[derive(Debug)]
pub struct Debouncer {
    search_delay: Duration,
    query_delay: Duration,
    search: Option<Instant>,
    query: Option<Instant>,
}

impl Debouncer {
    pub fn new(search_delay: Duration, query_delay: Duration) -> Self {
        Self {
            search_delay,
            query_delay,
            search: None,
            query: None,
        }
    }

    fn slot(&mut self, channel: Channel) -> &mut Option<Instant> {
        match channel {
            Channel::Search => &mut self.search,
            Channel::Query => &mut self.query,
        }
    }

    /// Cancel any pending deadline on `channel` and start a fresh one
    pub fn schedule(&mut self, channel: Channel, now: Instant) {
        let delay = match channel {
            Channel::Search => self.search_delay,
            Channel::Query => self.query_delay,
        };
        *self.slot(channel) = Some(now + delay);
    }

    pub fn cancel(&mut self, channel: Channel) {
        *self.slot(channel) = None;
    }

    pub fn is_pending(&self, channel: Channel) -> bool {
        match channel {
            Channel::Search => self.search.is_some(),
            Channel::Query => self.query.is_some(),
        }
    }

    /// Channels whose deadline has passed. Each fires once.
    pub fn take_due(&mut self, now: Instant) -> Vec<Channel> {
        let mut due = Vec::new();
        for channel in [Channel::Search, Channel::Query] {
            let slot = self.slot(channel);
            if slot.is_some_and(|deadline| deadline <= now) {
                *slot = None;
                due.push(channel);
            }
        }
        due
    }
}

/// Mark a notification read once it has stayed open for `delay`
#[derive(Debug)]
pub struct ReadMarkTimer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl ReadMarkTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `key` to be marked read after the delay
    pub fn schedule(&mut self, key: String, now: Instant) {
        self.pending = Some((key, now));
    }

    pub fn pending_key(&self) -> Option<&str> {
        self.pending.as_ref().map(|(key, _)| key.as_str())
    }

    /// Returns the key if the delay has elapsed
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, opened_at)) if now.duration_since(*opened_at) >= self.delay => {
                self.pending.take().map(|(key, _)| key)
            }
            _ => None,
        }
    }

    /// Cancel (e.g., when navigating away quickly)
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reschedule_pushes_deadline_back() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(250), Duration::from_millis(500));
        debounce.schedule(Channel::Search, start);
        debounce.schedule(Channel::Search, start + Duration::from_millis(200));
        assert!(debounce.take_due(start + Duration::from_millis(300)).is_empty());
        assert_eq!(
            debounce.take_due(start + Duration::from_millis(450)),
            vec![Channel::Search]
        );
        assert!(!debounce.is_pending(Channel::Search));
    }

    #[test]
    fn channels_are_independent() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(100), Duration::from_millis(100));
        debounce.schedule(Channel::Search, start);
        debounce.schedule(Channel::Query, start);
        debounce.cancel(Channel::Search);
        assert_eq!(
            debounce.take_due(start + Duration::from_secs(1)),
            vec![Channel::Query]
        );
    }

    #[test]
    fn read_mark_fires_after_delay() {
        let start = Instant::now();
        let mut timer = ReadMarkTimer::new(Duration::from_millis(750));
        timer.schedule("42".into(), start);
        assert_eq!(timer.take_due(start + Duration::from_millis(700)), None);
        assert_eq!(
            timer.take_due(start + Duration::from_millis(750)).as_deref(),
            Some("42")
        );
        assert_eq!(timer.pending_key(), None);
    }
}
