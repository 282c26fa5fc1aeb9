mod app;
mod ui;

use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io;
use std::process::Command;
use std::sync::Arc;
use std::time::{Duration, Instant};

use app::{App, InputKind, Mode, Pane};
use triagetui::api::{Action, HttpBackend, Notification, ViewDraft};
use triagetui::config::Config;
use triagetui::controllers::{ActionOptions, ConfirmSite};
use triagetui::events::EventStream;
use triagetui::session::{Session, Settings};
use triagetui::store::Dialog;
use ui::{
    render_dialog, render_input, render_notification_detail, render_notifications,
    render_sidebar, render_status,
};

fn main() -> Result<()> {
    let (config, config_problem) = Config::load();
    let config = Arc::new(config);
    let state_dir = config.state_dir();
    let log_path = triagetui::logging::init(&state_dir)?;
    if let Some(problem) = config_problem {
        tracing::warn!(path = ?Config::path(), "{}", problem);
    }

    let backend = HttpBackend::new(&config.server.base_url, config.timeout());
    let stream = config
        .stream
        .enabled
        .then(|| EventStream::spawn(backend.base_url(), config.stream.clone()));
    let session = Session::open(Settings::from(config.as_ref()), &state_dir);
    let mut app = App::new(config, session, Box::new(backend), stream);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableFocusChange)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, log = ?log_path, "Exited with error");
    }
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(app, f))?;

        // Debounce timers, read marks, toasts and stream events
        app.tick(Instant::now());

        // Poll with timeout so timers fire without input
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => handle_key(app, key),
            Event::FocusGained => app.on_focus_gained(),
            _ => {}
        }
        app.sync_list_state();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match app.mode {
        Mode::Query => handle_query_key(app, key),
        Mode::Input(kind) => handle_input_key(app, kind, key),
        Mode::Normal if app.session.ui.dialog.is_some() => handle_dialog_key(app, key),
        Mode::Normal if app.focused_pane == Pane::Sidebar => handle_sidebar_key(app, key),
        Mode::Normal => handle_normal_key(app, key),
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let backend = app.backend.as_ref();
    let session = &mut app.session;
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if ctrl => app.quit(),
        KeyCode::Char('r') if ctrl => {
            let _ = session.refresh(backend);
        }
        KeyCode::Char('a') if ctrl => session.select_all_matching(),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            let _ = session.focus_next(backend);
            app.detail_scroll = 0;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let _ = session.focus_previous(backend);
            app.detail_scroll = 0;
        }
        KeyCode::Char('g') | KeyCode::Home => {
            let _ = session.focus_first(backend);
        }
        KeyCode::Char('G') | KeyCode::End => {
            let _ = session.focus_last(backend);
        }
        KeyCode::Char(']') | KeyCode::PageDown => {
            let _ = session.next_page(backend);
        }
        KeyCode::Char('[') | KeyCode::PageUp => {
            let _ = session.previous_page(backend);
        }
        KeyCode::Backspace => {
            let _ = session.back(backend);
        }
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
            if app.focused_pane == Pane::Detail {
                app.detail_scroll = app.detail_scroll.saturating_add(1);
            } else {
                session.open_focused();
                app.detail_scroll = 0;
                if session.detail.is_open() {
                    app.focused_pane = Pane::Detail;
                }
            }
        }
        KeyCode::Char('h') | KeyCode::Left => {
            if app.focused_pane == Pane::Detail {
                app.focused_pane = Pane::List;
                if !session.ui.is_split() {
                    session.close_detail();
                }
            } else if !session.ui.prefs().sidebar_collapsed {
                app.focused_pane = Pane::Sidebar;
            }
        }
        KeyCode::Esc => {
            if session.selection.has_selection() {
                session.selection.clear();
            } else if session.detail.is_open() {
                session.close_detail();
                app.focused_pane = Pane::List;
            }
        }
        KeyCode::Char('J') if app.focused_pane == Pane::Detail => {
            let _ = session.detail_next(backend);
            app.detail_scroll = 0;
        }
        KeyCode::Char('K') if app.focused_pane == Pane::Detail => {
            let _ = session.detail_previous(backend);
            app.detail_scroll = 0;
        }

        // Single-notification actions
        KeyCode::Char('e') => act(app, |n| toggle(n.archived, Action::Unarchive, Action::Archive), false),
        KeyCode::Char('m') => act(app, |n| toggle(n.muted, Action::Unmute, Action::Mute), false),
        KeyCode::Char('s') => act(app, |n| toggle(n.starred, Action::Unstar, Action::Star), false),
        KeyCode::Char('r') => act(app, |n| toggle(n.is_read, Action::MarkUnread, Action::MarkRead), true),
        KeyCode::Char('f') => act(app, |_| Action::Unfilter, false),
        KeyCode::Char('z') => {
            if let Some(key) = app.target_key() {
                if app.session.notifications.get(&key).is_some_and(|n| n.snoozed_until.is_some()) {
                    let _ = app.session.perform_action(&key, Action::Unsnooze, app.backend.as_ref());
                } else {
                    app.session.ui.open_dialog(Dialog::Snooze { bulk: false });
                    app.open_input(InputKind::Snooze { bulk: false });
                }
            }
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            let remove = key.code == KeyCode::Char('T');
            let bulk = session.selection.has_selection();
            session.ui.open_dialog(Dialog::TagPicker { bulk, remove });
            app.open_input(InputKind::Tag { bulk, remove });
        }
        KeyCode::Char('o') => {
            if let Some(url) = app.focused().and_then(|n| n.github_url.clone()) {
                let _ = Command::new("xdg-open").arg(&url).spawn();
            }
        }

        // Selection and bulk actions
        KeyCode::Char('x') | KeyCode::Char(' ') => session.toggle_focused_selection(),
        KeyCode::Char('A') => session.select_page(),
        KeyCode::Char('E') => bulk(app, Action::Archive),
        KeyCode::Char('M') => bulk(app, Action::Mute),
        KeyCode::Char('S') => bulk(app, Action::Star),
        KeyCode::Char('R') => bulk(app, Action::MarkRead),
        KeyCode::Char('U') => bulk(app, Action::MarkUnread),
        KeyCode::Char('Z') => {
            session.ui.open_dialog(Dialog::Snooze { bulk: true });
            app.open_input(InputKind::Snooze { bulk: true });
        }

        // Undo
        KeyCode::Char('u') => {
            let _ = session.undo_active(backend);
        }
        KeyCode::Char('H') => session.ui.open_dialog(Dialog::UndoHistory { cursor: 0 }),

        // Query
        KeyCode::Char('/') => {
            session.begin_query_edit();
            app.mode = Mode::Query;
        }
        KeyCode::Char('C') => {
            let _ = session.clear_query(Instant::now(), backend);
        }

        // Layout
        KeyCode::Char('w') => session.ui.toggle_split_mode(),
        KeyCode::Char('b') => {
            session.ui.toggle_sidebar();
            if session.ui.prefs().sidebar_collapsed && app.focused_pane == Pane::Sidebar {
                app.focused_pane = Pane::List;
            }
        }
        KeyCode::Char('<') => session.ui.resize_split(-5),
        KeyCode::Char('>') => session.ui.resize_split(5),
        _ => {}
    }
}

fn toggle(on: bool, off_action: Action, on_action: Action) -> Action {
    if on { off_action } else { on_action }
}

/// Run a single-notification action on the open or focused notification
fn act(app: &mut App, choose: impl FnOnce(&Notification) -> Action, close_detail: bool) {
    let Some(key) = app.target_key() else {
        return;
    };
    let Some(action) = app.session.notifications.get(&key).map(choose) else {
        return;
    };
    let opts = ActionOptions {
        close_detail,
        ..Default::default()
    };
    let _ = app
        .session
        .perform_action_with(&key, action, opts, app.backend.as_ref());
    if !app.session.detail.is_open() && app.focused_pane == Pane::Detail {
        app.focused_pane = Pane::List;
    }
}

/// Bulk action from a keyboard shortcut
fn bulk(app: &mut App, action: Action) {
    let _ = app
        .session
        .request_bulk(action, ConfirmSite::Shortcut, app.backend.as_ref());
}

fn handle_query_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Enter => {
            let _ = app.session.submit_query(now, app.backend.as_ref());
            app.mode = Mode::Normal;
        }
        KeyCode::Esc => {
            app.session.cancel_query_edit();
            app.mode = Mode::Normal;
        }
        KeyCode::Backspace => app.session.query_backspace(now),
        KeyCode::Char(c) => app.session.query_input(c, now),
        _ => {}
    }
}

fn handle_input_key(app: &mut App, kind: InputKind, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_input(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Enter => {
            let input = app.input.trim().to_string();
            app.close_input();
            if !input.is_empty() {
                submit_input(app, kind, &input);
            }
        }
        _ => {}
    }
}

fn submit_input(app: &mut App, kind: InputKind, input: &str) {
    let backend = app.backend.as_ref();
    let session = &mut app.session;
    match kind {
        InputKind::Snooze { bulk } => {
            let Some(until) = parse_snooze(input, Utc::now()) else {
                session.toasts.error(format!("Can't snooze for \"{}\"", input));
                return;
            };
            let action = Action::Snooze { until };
            if bulk {
                let _ = session.request_bulk(action, ConfirmSite::Toolbar, backend);
            } else if let Some(key) = app_target(session) {
                let _ = session.perform_action(&key, action, backend);
            }
        }
        InputKind::Tag { bulk, remove } => {
            let action = if remove {
                match session.tags.find_by_name(input) {
                    Some(tag) => Action::RemoveTag {
                        tag_id: tag.id.clone(),
                    },
                    None => {
                        session.toasts.error(format!("No tag named \"{}\"", input));
                        return;
                    }
                }
            } else {
                Action::AssignTagByName {
                    name: input.to_string(),
                }
            };
            if bulk {
                let _ = session.request_bulk(action, ConfirmSite::Toolbar, backend);
            } else if let Some(key) = app_target(session) {
                let _ = session.perform_action(&key, action, backend);
            }
        }
        InputKind::NewView => {
            let draft = ViewDraft {
                name: input.to_string(),
                query: session.effective_query(),
                ..Default::default()
            };
            if let Ok(view) = session.create_view(draft, backend) {
                let _ = session.select_view(&view.slug, backend);
            }
        }
    }
}

fn app_target(session: &Session) -> Option<String> {
    session
        .detail
        .open_key()
        .map(str::to_string)
        .or_else(|| session.focused_key())
}

/// "3" or "3h" hours, "2d" days, "30m" minutes
fn parse_snooze(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let input = input.trim().to_lowercase();
    let (number, unit) = match input.char_indices().last()? {
        (i, c) if c.is_ascii_alphabetic() => (&input[..i], c),
        _ => (input.as_str(), 'h'),
    };
    let n: i64 = number.trim().parse().ok().filter(|n| *n > 0)?;
    let delta = match unit {
        'm' => chrono::Duration::minutes(n),
        'h' => chrono::Duration::hours(n),
        'd' => chrono::Duration::days(n),
        'w' => chrono::Duration::weeks(n),
        _ => return None,
    };
    Some(now + delta)
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    let backend = app.backend.as_ref();
    let session = &mut app.session;
    match session.ui.dialog.clone() {
        Some(Dialog::ConfirmBulk { .. }) => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let _ = session.confirm_bulk(backend);
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                session.ui.close_dialog();
            }
            _ => {}
        },
        Some(Dialog::ConfirmDeleteView { .. }) => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let _ = session.confirm_delete_view(backend);
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                session.ui.close_dialog();
            }
            _ => {}
        },
        Some(Dialog::UndoHistory { cursor }) => {
            let len = session.undo.len();
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    let cursor = (cursor + 1).min(len.saturating_sub(1));
                    session.ui.dialog = Some(Dialog::UndoHistory { cursor });
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    let cursor = cursor.saturating_sub(1);
                    session.ui.dialog = Some(Dialog::UndoHistory { cursor });
                }
                KeyCode::Enter => {
                    if let Some(id) = session.undo.history().get(cursor).map(|a| a.id.clone()) {
                        session.undo_from_history(&id, backend);
                        let cursor = cursor.min(session.undo.len().saturating_sub(1));
                        session.ui.dialog = Some(Dialog::UndoHistory { cursor });
                    }
                }
                KeyCode::Char('C') => session.clear_undo_history(),
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('H') => {
                    session.ui.close_dialog();
                }
                _ => {}
            }
        }
        // Snooze and tag pickers are driven by Mode::Input
        Some(Dialog::Snooze { .. }) | Some(Dialog::TagPicker { .. }) | None => {
            session.ui.close_dialog();
        }
    }
}

fn handle_sidebar_key(app: &mut App, key: KeyEvent) {
    let slugs = app.sidebar_slugs();
    let cursor_slug = slugs.get(app.sidebar_cursor).cloned();
    let cursor_view_id = cursor_slug
        .as_deref()
        .and_then(|s| app.session.views.find(s))
        .filter(|v| !v.system_view)
        .map(|v| v.id.clone());
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.sidebar_move(1),
        KeyCode::Char('k') | KeyCode::Up => app.sidebar_move(-1),
        KeyCode::Enter => {
            if let Some(slug) = cursor_slug {
                let _ = app.session.select_view(&slug, app.backend.as_ref());
                app.focused_pane = Pane::List;
            }
        }
        KeyCode::Char('N') => app.open_input(InputKind::NewView),
        KeyCode::Char('D') => {
            if let Some(id) = cursor_view_id {
                let _ = app.session.delete_view(&id, false, app.backend.as_ref());
                app.sidebar_move(0);
            }
        }
        KeyCode::Char('J') | KeyCode::Char('K') => {
            if let Some(id) = cursor_view_id {
                let delta = if key.code == KeyCode::Char('J') { 1 } else { -1 };
                if app.session.move_view(&id, delta, app.backend.as_ref()).is_ok() {
                    app.sidebar_move(delta);
                }
            }
        }
        KeyCode::Esc | KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            app.focused_pane = Pane::List;
        }
        _ => {}
    }
}

fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let config = app.config.clone();
    let theme = &config.theme;

    // Main area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let prefs = app.session.ui.prefs().clone();
    let mut main = chunks[0];
    if !prefs.sidebar_collapsed {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(20)])
            .split(main);
        render_sidebar(
            f,
            columns[0],
            &app.session.views,
            &app.session.tags,
            app.sidebar_cursor,
            app.focused_pane == Pane::Sidebar,
            theme,
        );
        main = columns[1];
    }

    let detail = app.session.detail.notification(&app.session.notifications).cloned();
    match detail {
        Some(n) if prefs.split_mode => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(prefs.split_pane_width),
                    Constraint::Percentage(100 - prefs.split_pane_width),
                ])
                .split(main);
            render_notifications(f, panes[0], app, theme, &config.layout);
            render_notification_detail(
                f,
                panes[1],
                &n,
                app.detail_scroll,
                app.focused_pane == Pane::Detail,
                theme,
            );
        }
        Some(n) => render_notification_detail(
            f,
            main,
            &n,
            app.detail_scroll,
            app.focused_pane == Pane::Detail,
            theme,
        ),
        None => render_notifications(f, main, app, theme, &config.layout),
    }

    if let Some(dialog) = &app.session.ui.dialog {
        render_dialog(f, area, dialog, &app.session, theme);
    }
    if let Mode::Input(kind) = app.mode {
        render_input(f, area, kind, &app.input, theme);
    }
    render_status(f, chunks[1], app, theme);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_snooze_durations() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_snooze("3", now), Some(now + chrono::Duration::hours(3)));
        assert_eq!(parse_snooze("2d", now), Some(now + chrono::Duration::days(2)));
        assert_eq!(parse_snooze("30m", now), Some(now + chrono::Duration::minutes(30)));
        assert_eq!(parse_snooze("soon", now), None);
        assert_eq!(parse_snooze("0h", now), None);
    }
}
