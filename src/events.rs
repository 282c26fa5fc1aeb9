//! Reconnecting client for the server's navigation event stream.
//!
//! A background thread holds the SSE connection and forwards events over a
//! channel; the UI thread drains it on every tick. Reconnects back off
//! exponentially up to a cap and give up after a fixed number of attempts
//! until a connection check is requested (terminal focus regained).

use std::io::{BufRead, BufReader};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::config::StreamConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Connected,
    Navigate { url: String },
    Ping,
    /// Connection lost; retrying after `retry_in`
    Disconnected { attempt: u32, retry_in: Duration },
    /// Reconnect attempts exhausted
    GaveUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    CheckConnection,
    Shutdown,
}

/// One dispatched SSE frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Line-oriented SSE parser. Fields accumulate until a blank line.
#[derive(Debug, Default)]
pub struct SseParser {
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn feed_line(&mut self, line: &str) -> Option<SseFrame> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            if self.event.is_none() && self.data.is_empty() {
                return None;
            }
            return Some(SseFrame {
                event: self.event.take().unwrap_or_else(|| "message".to_string()),
                data: std::mem::take(&mut self.data).join("\n"),
            });
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }
}

#[derive(Deserialize)]
struct NavigatePayload {
    url: String,
}

/// Map a frame to an event; unknown event names are dropped
pub fn frame_to_event(frame: &SseFrame) -> Option<StreamEvent> {
    match frame.event.as_str() {
        "connected" => Some(StreamEvent::Connected),
        "ping" => Some(StreamEvent::Ping),
        "navigate" => match serde_json::from_str::<NavigatePayload>(&frame.data) {
            Ok(payload) => Some(StreamEvent::Navigate { url: payload.url }),
            Err(e) => {
                tracing::warn!(error = %e, data = %frame.data, "Malformed navigate event");
                None
            }
        },
        _ => None,
    }
}

/// Delay before reconnect `attempt` (0-based): `base * 2^attempt`, capped
pub fn backoff_delay(attempt: u32, base: Duration, cap: Duration) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.checked_mul(factor).unwrap_or(cap).min(cap)
}

pub struct EventStream {
    control: Sender<Control>,
    events: Receiver<StreamEvent>,
}

impl EventStream {
    /// Start streaming from `{base_url}/api/navigation-events`
    pub fn spawn(base_url: &str, config: StreamConfig) -> Self {
        let url = format!("{}/api/navigation-events", base_url.trim_end_matches('/'));
        let (control_tx, control_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        thread::spawn(move || run(url, config, control_rx, event_tx));
        Self {
            control: control_tx,
            events: event_rx,
        }
    }

    /// Everything received since the last call
    pub fn drain(&self) -> Vec<StreamEvent> {
        self.events.try_iter().collect()
    }

    /// Reconnect now if disconnected, resetting the attempt budget
    pub fn check_connection(&self) {
        let _ = self.control.send(Control::CheckConnection);
    }

    pub fn shutdown(&self) {
        let _ = self.control.send(Control::Shutdown);
    }
}

fn run(url: String, config: StreamConfig, control: Receiver<Control>, events: Sender<StreamEvent>) {
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(10))
        // No bytes for this long means the pings stopped
        .timeout_read(Duration::from_secs(config.ping_timeout_secs))
        .build();
    let base = Duration::from_millis(config.reconnect_base_ms);
    let cap = Duration::from_millis(config.reconnect_max_ms);
    let mut attempt: u32 = 0;

    loop {
        tracing::debug!(%url, attempt, "Connecting to event stream");
        match agent.get(&url).set("Accept", "text/event-stream").call() {
            Ok(response) => {
                attempt = 0;
                let mut parser = SseParser::default();
                for line in BufReader::new(response.into_reader()).lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            tracing::warn!(error = %e, "Event stream read failed");
                            break;
                        }
                    };
                    if let Some(event) = parser.feed_line(&line).as_ref().and_then(frame_to_event) {
                        if events.send(event).is_err() {
                            return;
                        }
                    }
                    if let Ok(Control::Shutdown) | Err(TryRecvError::Disconnected) = control.try_recv() {
                        return;
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "Event stream connect failed"),
        }

        attempt += 1;
        if attempt > config.max_reconnect_attempts {
            tracing::warn!(attempts = attempt - 1, "Giving up on event stream");
            if events.send(StreamEvent::GaveUp).is_err() {
                return;
            }
            // Park until asked to check again
            match control.recv() {
                Ok(Control::CheckConnection) => {
                    attempt = 0;
                    continue;
                }
                _ => return,
            }
        }

        let retry_in = backoff_delay(attempt - 1, base, cap);
        if events
            .send(StreamEvent::Disconnected { attempt, retry_in })
            .is_err()
        {
            return;
        }
        match control.recv_timeout(retry_in) {
            Ok(Control::CheckConnection) => attempt = 0,
            Ok(Control::Shutdown) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(lines: &[&str]) -> Vec<SseFrame> {
        let mut parser = SseParser::default();
        lines.iter().filter_map(|l| parser.feed_line(l)).collect()
    }

    #[test]
    fn parses_named_events() {
        let frames = parse_all(&[
            "event: connected",
            "data: {}",
            "",
            ": keep-alive comment",
            "event: navigate",
            "data: {\"url\":\"http://localhost/views/inbox?id=5\"}",
            "",
        ]);
        assert_eq!(frames.len(), 2);
        assert_eq!(frame_to_event(&frames[0]), Some(StreamEvent::Connected));
        assert_eq!(
            frame_to_event(&frames[1]),
            Some(StreamEvent::Navigate {
                url: "http://localhost/views/inbox?id=5".into()
            })
        );
    }

    #[test]
    fn joins_multiline_data_and_strips_cr() {
        let frames = parse_all(&["event: ping\r", "data: a\r", "data: b", "\r"]);
        assert_eq!(
            frames,
            vec![SseFrame {
                event: "ping".into(),
                data: "a\nb".into()
            }]
        );
    }

    #[test]
    fn blank_lines_alone_dispatch_nothing() {
        assert!(parse_all(&["", "", ""]).is_empty());
    }

    #[test]
    fn malformed_navigate_is_dropped() {
        let frame = SseFrame {
            event: "navigate".into(),
            data: "not json".into(),
        };
        assert_eq!(frame_to_event(&frame), None);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let base = Duration::from_secs(1);
        let cap = Duration::from_secs(30);
        assert_eq!(backoff_delay(0, base, cap), Duration::from_secs(1));
        assert_eq!(backoff_delay(3, base, cap), Duration::from_secs(8));
        assert_eq!(backoff_delay(5, base, cap), cap);
        assert_eq!(backoff_delay(40, base, cap), cap);
    }
}
