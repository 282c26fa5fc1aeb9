use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};

use super::{Pane, truncate};
use triagetui::config::ThemeConfig;
use triagetui::store::{TagStore, ViewStore};

/// Views (built-in then saved) with unread counts, followed by tags
pub fn render_sidebar(
    f: &mut Frame,
    area: Rect,
    views: &ViewStore,
    tags: &TagStore,
    cursor: usize,
    focused: bool,
    theme: &ThemeConfig,
) {
    let name_width = area.width.saturating_sub(10) as usize;
    let selected = views.selected_slug();

    let mut items: Vec<ListItem> = views
        .all()
        .map(|view| {
            let mut style = Style::default().fg(theme.fg());
            if view.slug == selected {
                style = style.fg(theme.primary()).add_modifier(Modifier::BOLD);
            }
            let count = if view.unread_count > 0 {
                view.unread_count.to_string()
            } else {
                String::new()
            };
            ListItem::new(Line::from(vec![
                Span::styled(truncate(&view.name, name_width), style),
                Span::styled(format!("{:>5}", count), Style::default().fg(theme.unread())),
            ]))
        })
        .collect();

    if !tags.tags().is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "Tags",
            Style::default().fg(theme.fg_muted()),
        ))));
        for tag in tags.tags() {
            let count = tag
                .unread_count
                .filter(|c| *c > 0)
                .map(|c| c.to_string())
                .unwrap_or_default();
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    truncate(&format!("#{}", tag.name), name_width),
                    Style::default().fg(theme.tag()),
                ),
                Span::styled(format!("{:>5}", count), Style::default().fg(theme.fg_muted())),
            ])));
        }
    }

    let mut state = ListState::default();
    if focused {
        state.select(Some(cursor));
    }
    let list = List::new(items)
        .block(Pane::new(" Views ", focused, theme).block())
        .highlight_style(Style::default().bg(theme.selected_bg()));

    f.render_stateful_widget(list, area, &mut state);
}
