use ratatui::widgets::ListState;
use std::sync::Arc;
use std::time::Instant;

use triagetui::api::{Backend, Notification};
use triagetui::config::Config;
use triagetui::events::{EventStream, StreamEvent};
use triagetui::session::Session;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Normal,
    /// Typing in the query bar
    Query,
    /// Typing into a dialog's text field
    Input(InputKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    /// Hours to snooze for
    Snooze { bulk: bool },
    /// Tag name to assign or remove
    Tag { bulk: bool, remove: bool },
    /// Name for a new saved view built from the current filter
    NewView,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pane {
    Sidebar,
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamStatus {
    Off,
    Connecting,
    Live,
    Retrying,
    Down,
}

pub struct App {
    pub config: Arc<Config>,
    pub session: Session,
    pub backend: Box<dyn Backend>,
    pub stream: Option<EventStream>,
    pub stream_status: StreamStatus,
    pub mode: Mode,
    /// Text field contents for `Mode::Input`
    pub input: String,
    pub list_state: ListState,
    pub detail_scroll: u16,
    pub focused_pane: Pane,
    pub sidebar_cursor: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Arc<Config>,
        session: Session,
        backend: Box<dyn Backend>,
        stream: Option<EventStream>,
    ) -> Self {
        let stream_status = if stream.is_some() {
            StreamStatus::Connecting
        } else {
            StreamStatus::Off
        };
        Self {
            config,
            session,
            backend,
            stream,
            stream_status,
            mode: Mode::Normal,
            input: String::new(),
            list_state: ListState::default(),
            detail_scroll: 0,
            focused_pane: Pane::List,
            sidebar_cursor: 0,
            should_quit: false,
        }
    }

    /// Initial load: views, tags and the first page
    pub fn start(&mut self) {
        // Load errors are already toasted
        let _ = self.session.start(self.backend.as_ref());
        self.sync_list_state();
    }

    /// Work done on every loop iteration: timers, toasts, stream events
    pub fn tick(&mut self, now: Instant) {
        let backend = self.backend.as_ref();
        self.session.tick(now);
        self.session.process_debounce(now, backend);
        self.session.process_read_mark(now, backend);

        let events = self
            .stream
            .as_ref()
            .map(|s| s.drain())
            .unwrap_or_default();
        for event in events {
            self.handle_stream_event(event);
        }
        self.sync_list_state();
    }

    fn handle_stream_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Connected => {
                tracing::info!("Event stream connected");
                self.stream_status = StreamStatus::Live;
            }
            StreamEvent::Ping => self.stream_status = StreamStatus::Live,
            StreamEvent::Navigate { url } => {
                let _ = self.session.navigate_to_url(&url, self.backend.as_ref());
                self.focused_pane = if self.session.detail.is_open() {
                    Pane::Detail
                } else {
                    Pane::List
                };
            }
            StreamEvent::Disconnected { attempt, retry_in } => {
                tracing::debug!(attempt, ?retry_in, "Event stream retrying");
                self.stream_status = StreamStatus::Retrying;
            }
            StreamEvent::GaveUp => self.stream_status = StreamStatus::Down,
        }
    }

    /// Terminal focus regained, the stand-in for a page becoming visible
    pub fn on_focus_gained(&mut self) {
        if let Some(stream) = &self.stream {
            if matches!(self.stream_status, StreamStatus::Retrying | StreamStatus::Down) {
                self.stream_status = StreamStatus::Connecting;
            }
            stream.check_connection();
        }
    }

    pub fn quit(&mut self) {
        if let Some(stream) = &self.stream {
            stream.shutdown();
        }
        self.should_quit = true;
    }

    /// Mirror keyboard focus into the list widget
    pub fn sync_list_state(&mut self) {
        self.list_state.select(self.session.keyboard.focus());
    }

    pub fn focused(&self) -> Option<&Notification> {
        self.session
            .keyboard
            .focus()
            .and_then(|i| self.session.notifications.item_at(i))
    }

    /// Target for single-notification keys: the open detail, else focus
    pub fn target_key(&self) -> Option<String> {
        self.session
            .detail
            .open_key()
            .map(str::to_string)
            .or_else(|| self.session.focused_key())
    }

    pub fn open_input(&mut self, kind: InputKind) {
        self.input.clear();
        self.mode = Mode::Input(kind);
    }

    pub fn close_input(&mut self) {
        self.input.clear();
        self.mode = Mode::Normal;
        self.session.ui.close_dialog();
    }

    /// Views in sidebar order
    pub fn sidebar_slugs(&self) -> Vec<String> {
        self.session.views.all().map(|v| v.slug.clone()).collect()
    }

    pub fn sidebar_move(&mut self, delta: isize) {
        let len = self.sidebar_slugs().len();
        if len == 0 {
            return;
        }
        self.sidebar_cursor = (self.sidebar_cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }
}
