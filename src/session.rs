use std::path::Path;
use std::time::Duration;

use crate::api::Rule;
use crate::config::Config;
use crate::debounce::{Debouncer, ReadMarkTimer};
use crate::route::{Route, RouteHistory};
use crate::store::{
    DetailStore, KeyboardStore, LayoutPrefs, NotificationStore, PaginationStore, QueryStore,
    SelectionStore, TagStore, ToastStore, UiStateStore, UndoStore, ViewStore,
};

pub const UNDO_HISTORY_FILE: &str = "undo-history.json";
pub const UI_STATE_FILE: &str = "ui-state.json";

/// Tunables the controllers read. Built from [`Config`] in the app, or
/// directly in tests.
#[derive(Debug, Clone)]
pub struct Settings {
    pub page_size: u32,
    pub bulk_confirm_threshold: usize,
    pub shortcut_confirm_threshold: usize,
    pub undo_history_limit: usize,
    pub undo_toast: Duration,
    pub toast: Duration,
    pub mark_read_delay: Duration,
    pub mark_read_on_open: bool,
    pub search_debounce: Duration,
    pub query_debounce: Duration,
    /// Layout used when nothing is persisted yet
    pub layout: LayoutPrefs,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        let b = &config.behavior;
        Self {
            page_size: b.page_size,
            bulk_confirm_threshold: b.bulk_confirm_threshold,
            shortcut_confirm_threshold: b.shortcut_confirm_threshold,
            undo_history_limit: b.undo_history_limit,
            undo_toast: Duration::from_secs(b.undo_toast_secs),
            toast: Duration::from_secs(b.toast_secs),
            mark_read_delay: Duration::from_millis(b.mark_read_delay_ms),
            mark_read_on_open: b.mark_read_on_open,
            search_debounce: Duration::from_millis(b.search_debounce_ms),
            query_debounce: Duration::from_millis(b.query_debounce_ms),
            layout: LayoutPrefs {
                split_pane_width: config.layout.split_pane_width,
                split_mode: config.layout.split_pane,
                sidebar_collapsed: false,
            },
        }
    }
}

/// The store graph for one app session.
///
/// Constructed once and passed by `&mut` to every controller; there is no
/// global state. Controllers live in `crate::controllers` as `impl Session`
/// blocks.
#[derive(Debug)]
pub struct Session {
    pub settings: Settings,
    pub notifications: NotificationStore,
    pub pagination: PaginationStore,
    pub selection: SelectionStore,
    pub keyboard: KeyboardStore,
    pub detail: DetailStore,
    pub query: QueryStore,
    pub views: ViewStore,
    pub tags: TagStore,
    pub rules: Vec<Rule>,
    pub ui: UiStateStore,
    pub undo: UndoStore,
    pub toasts: ToastStore,
    pub history: RouteHistory,
    pub debounce: Debouncer,
    pub read_mark: ReadMarkTimer,
}

impl Session {
    /// In-memory session; nothing is persisted
    pub fn new(settings: Settings) -> Self {
        let ui = UiStateStore::new(settings.layout.clone());
        let undo = UndoStore::new(settings.undo_history_limit, settings.undo_toast);
        Self::assemble(settings, ui, undo)
    }

    /// Session whose undo history and layout live under `state_dir`
    pub fn open(settings: Settings, state_dir: &Path) -> Self {
        let ui = UiStateStore::load(&state_dir.join(UI_STATE_FILE), settings.layout.clone());
        let undo = UndoStore::load(
            &state_dir.join(UNDO_HISTORY_FILE),
            settings.undo_history_limit,
            settings.undo_toast,
        );
        tracing::debug!(entries = undo.len(), "Loaded undo history");
        Self::assemble(settings, ui, undo)
    }

    fn assemble(settings: Settings, ui: UiStateStore, undo: UndoStore) -> Self {
        let mut session = Self {
            notifications: NotificationStore::new(),
            pagination: PaginationStore::new(settings.page_size),
            selection: SelectionStore::default(),
            keyboard: KeyboardStore::default(),
            detail: DetailStore::default(),
            query: QueryStore::default(),
            views: ViewStore::default(),
            tags: TagStore::default(),
            rules: Vec::new(),
            ui,
            undo,
            toasts: ToastStore::new(settings.toast),
            history: RouteHistory::default(),
            debounce: Debouncer::new(settings.search_debounce, settings.query_debounce),
            read_mark: ReadMarkTimer::new(settings.mark_read_delay),
            settings,
        };
        let route = session.current_route();
        session.history.push(route);
        session
    }

    /// Query sent to the backend: the view's query combined with the user's
    /// filter
    pub fn effective_query(&self) -> String {
        let view = self.views.selected().query.trim();
        let user = self.query.committed().trim();
        match (view.is_empty(), user.is_empty()) {
            (_, true) => view.to_string(),
            (true, false) => user.to_string(),
            (false, false) => format!("{} {}", view, user),
        }
    }

    pub fn current_route(&self) -> Route {
        let query = self.query.committed();
        Route {
            view: self.views.selected_slug().to_string(),
            query: (!query.is_empty()).then(|| query.to_string()),
            page: self.pagination.page,
            detail: self.detail.open_key().map(str::to_string),
        }
    }

    /// Rewrite the current history entry to match state
    pub fn sync_route(&mut self) {
        let route = self.current_route();
        self.history.replace(route);
    }

    /// Record a navigation as a new history entry
    pub fn push_route(&mut self) {
        let route = self.current_route();
        self.history.push(route);
    }

    /// Key of the focused notification, if any
    pub fn focused_key(&self) -> Option<String> {
        self.keyboard
            .focus()
            .and_then(|i| self.notifications.item_at(i))
            .map(|n| n.key())
    }
}
