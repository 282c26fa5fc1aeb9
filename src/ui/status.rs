use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Mode, Pane, StreamStatus};
use triagetui::config::ThemeConfig;
use triagetui::store::{SelectAllMode, ToastKind};

/// Bottom bar: key hints or query input, then toast, selection, page and
/// stream state
pub fn render_status(f: &mut Frame, area: Rect, app: &App, theme: &ThemeConfig) {
    let key_style = Style::default().fg(theme.primary());
    let text_style = Style::default().fg(theme.fg_muted());
    let sep = || Span::styled("  │  ", Style::default().fg(theme.border()));

    let hints: &[(&str, &str)] = match (app.mode, app.focused_pane) {
        (Mode::Query, _) => &[],
        (Mode::Input(_), _) => &[("Enter", "confirm"), ("Esc", "cancel")],
        (Mode::Normal, Pane::Sidebar) => &[
            ("j/k", "nav"),
            ("Enter", "open"),
            ("N", "new"),
            ("D", "delete"),
            ("J/K", "move"),
            ("l", "list"),
        ],
        (Mode::Normal, _) => &[
            ("j/k", "nav"),
            ("Enter", "open"),
            ("e", "archive"),
            ("s", "star"),
            ("r", "read"),
            ("z", "snooze"),
            ("x", "select"),
            ("u", "undo"),
            ("/", "filter"),
            ("q", "quit"),
        ],
    };

    let session = &app.session;
    let mut spans = Vec::new();
    if app.mode == Mode::Query {
        spans.push(Span::styled("/", key_style));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            session.query.input.clone(),
            Style::default().fg(theme.fg()),
        ));
        spans.push(Span::styled("_", key_style));
    } else {
        for (key, label) in hints {
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::styled(format!(" {}  ", label), text_style));
        }
        if !session.query.committed().is_empty() {
            spans.push(sep());
            spans.push(Span::styled(
                format!("filter: {}", session.query.committed()),
                Style::default().fg(theme.secondary()),
            ));
        }
    }

    if let Some(toast) = session.toasts.current() {
        let color = match toast.kind {
            ToastKind::Info => theme.info(),
            ToastKind::Success => theme.success(),
            ToastKind::Error => theme.error(),
        };
        spans.push(sep());
        spans.push(Span::styled(toast.message.clone(), Style::default().fg(color)));
        if toast.undo_action_id.is_some() {
            spans.push(Span::styled(" (u to undo)", text_style));
        }
    }

    if session.selection.has_selection() {
        let label = match session.selection.mode() {
            SelectAllMode::All => format!("all {} selected", session.pagination.total),
            _ => format!("{} selected", session.selection.explicit_count()),
        };
        spans.push(sep());
        spans.push(Span::styled(label, Style::default().fg(theme.primary())));
    }

    spans.push(sep());
    spans.push(Span::styled(session.pagination.summary(), text_style));

    let (stream_label, stream_color) = match app.stream_status {
        StreamStatus::Off => ("", theme.fg_muted()),
        StreamStatus::Connecting => ("connecting", theme.fg_muted()),
        StreamStatus::Live => ("live", theme.success()),
        StreamStatus::Retrying => ("reconnecting", theme.warning()),
        StreamStatus::Down => ("offline", theme.error()),
    };
    if !stream_label.is_empty() {
        spans.push(sep());
        spans.push(Span::styled(stream_label, Style::default().fg(stream_color)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_panel()));
    f.render_widget(paragraph, area);
}
