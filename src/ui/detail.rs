use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::Pane;
use triagetui::api::Notification;
use triagetui::config::ThemeConfig;

/// Field lines for the detail pane
fn detail_lines(n: &Notification, theme: &ThemeConfig) -> Vec<Line<'static>> {
    let label = Style::default().fg(theme.fg_muted());
    let value = Style::default().fg(theme.fg());
    let url_style = Style::default()
        .fg(theme.info())
        .add_modifier(Modifier::UNDERLINED);

    let field = |name: &str, text: String| {
        Line::from(vec![
            Span::styled(format!("{:<10}", name), label),
            Span::styled(text, value),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            n.subject_title.clone(),
            Style::default()
                .fg(theme.fg())
                .add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        field("Repo", n.repo_name().to_string()),
        field("Type", n.subject_type.clone()),
    ];
    if let Some(number) = n.subject_number {
        lines.push(field("Number", format!("#{}", number)));
    }
    if let Some(state) = &n.subject_state {
        lines.push(field("State", state.clone()));
    }
    if let Some(author) = &n.author_login {
        lines.push(field("Author", author.clone()));
    }
    if let Some(reason) = &n.reason {
        lines.push(field("Reason", reason.replace('_', " ")));
    }
    if let Some(date) = n.effective_sort_date {
        let local = date.with_timezone(&Local);
        lines.push(field("Updated", local.format("%Y-%m-%d %H:%M").to_string()));
    }
    if let Some(until) = n.snoozed_until {
        let local = until.with_timezone(&Local);
        lines.push(field("Snoozed", local.format("%Y-%m-%d %H:%M").to_string()));
    }

    let mut flags = Vec::new();
    if !n.is_read {
        flags.push(Span::styled("unread ", Style::default().fg(theme.unread())));
    }
    if n.starred {
        flags.push(Span::styled("starred ", Style::default().fg(theme.starred())));
    }
    if n.archived {
        flags.push(Span::styled("archived ", label));
    }
    if n.muted {
        flags.push(Span::styled("muted ", label));
    }
    if n.filtered {
        flags.push(Span::styled("filtered ", Style::default().fg(theme.warning())));
    }
    if !flags.is_empty() {
        let mut spans = vec![Span::styled(format!("{:<10}", "Flags"), label)];
        spans.extend(flags);
        lines.push(Line::from(spans));
    }

    if !n.tags.is_empty() {
        let mut spans = vec![Span::styled(format!("{:<10}", "Tags"), label)];
        for tag in &n.tags {
            spans.push(Span::styled(
                format!("#{} ", tag.name),
                Style::default().fg(theme.tag()),
            ));
        }
        lines.push(Line::from(spans));
    }

    if let Some(url) = &n.github_url {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(url.clone(), url_style)));
    }
    lines
}

pub fn render_notification_detail(
    f: &mut Frame,
    area: Rect,
    notification: &Notification,
    scroll: u16,
    focused: bool,
    theme: &ThemeConfig,
) {
    let paragraph = Paragraph::new(detail_lines(notification, theme))
        .block(
            Pane::new(" Detail ", focused, theme)
                .badge(notification.subject_type.clone())
                .block(),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    f.render_widget(paragraph, area);
}
