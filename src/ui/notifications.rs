use chrono::{DateTime, Local, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use super::Pane;
use crate::app::{App, Pane as FocusPane};
use triagetui::api::Notification;
use triagetui::config::{LayoutConfig, ThemeConfig};

pub fn render_notifications(
    f: &mut Frame,
    area: Rect,
    app: &mut App,
    theme: &ThemeConfig,
    layout: &LayoutConfig,
) {
    let session = &app.session;

    // Available width: area minus borders (2) minus highlight symbol (2)
    let avail_width = area.width.saturating_sub(4) as usize;
    // Markers: selection, unread, star, plus spacing
    let marker_width = 4;
    let date_width = layout.date_width;
    let repo_width = layout
        .repo_width
        .min(avail_width.saturating_sub(date_width + marker_width) / 3);
    let title_width = avail_width.saturating_sub(date_width + repo_width + marker_width + 2);

    let items: Vec<ListItem> = session
        .notifications
        .items()
        .iter()
        .map(|n| {
            let selected = session.selection.is_selected(&n.key());
            ListItem::new(notification_line(
                n,
                selected,
                repo_width,
                title_width,
                date_width,
                theme,
            ))
        })
        .collect();

    let view = session.views.selected();
    let mut pane = Pane::new(format!(" {} ", view.name), app.focused_pane == FocusPane::List, theme);
    if session.pagination.total > 0 {
        pane = pane.badge(session.pagination.summary());
    }
    let block = pane.block();
    if items.is_empty() {
        let empty = List::new([ListItem::new(Span::styled(
            "  Nothing here",
            Style::default().fg(theme.fg_muted()),
        ))])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.selected_bg())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn notification_line(
    n: &Notification,
    selected: bool,
    repo_width: usize,
    title_width: usize,
    date_width: usize,
    theme: &ThemeConfig,
) -> Line<'static> {
    let fg = if n.is_read { theme.fg_muted() } else { theme.fg() };
    let mut title_style = Style::default().fg(fg);
    if !n.is_read {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let date = n
        .effective_sort_date
        .map(|d| format_date(d, Utc::now()))
        .unwrap_or_default();

    let mut spans = vec![
        Span::styled(
            if selected { "■" } else { " " },
            Style::default().fg(theme.primary()),
        ),
        Span::styled(
            if n.is_read { " " } else { "●" },
            Style::default().fg(theme.unread()),
        ),
        Span::styled(
            if n.starred { "★" } else { " " },
            Style::default().fg(theme.starred()),
        ),
        Span::raw(" "),
        Span::styled(
            truncate(n.repo_name(), repo_width),
            Style::default().fg(theme.secondary()),
        ),
        Span::raw(" "),
        Span::styled(truncate(&title_text(n), title_width), title_style),
        Span::raw(" "),
        Span::styled(
            truncate(&date, date_width),
            Style::default().fg(theme.fg_muted()),
        ),
    ];
    for tag in &n.tags {
        spans.push(Span::styled(
            format!(" #{}", tag.name),
            Style::default().fg(theme.tag()),
        ));
    }
    Line::from(spans)
}

/// "#123 Fix the thing" when the subject has a number
fn title_text(n: &Notification) -> String {
    match n.subject_number {
        Some(number) => format!("#{} {}", number, n.subject_title),
        None => n.subject_title.clone(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if max < 4 {
        return s.chars().take(max).collect();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        format!("{:width$}", s, width = max)
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

/// Time of day for today, "Feb 02" within the year, "2024-02-02" otherwise
pub fn format_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let local = date.with_timezone(&Local);
    let today = now.with_timezone(&Local);
    if local.date_naive() == today.date_naive() {
        local.format("%H:%M").to_string()
    } else if local.format("%Y").to_string() == today.format("%Y").to_string() {
        local.format("%b %d").to_string()
    } else {
        local.format("%Y-%m-%d").to_string()
    }
}
