use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use super::{Modal, Tone, centered};
use crate::app::InputKind;
use triagetui::config::ThemeConfig;
use triagetui::session::Session;
use triagetui::store::{Dialog, SelectAllMode};

pub fn render_dialog(f: &mut Frame, area: Rect, dialog: &Dialog, session: &Session, theme: &ThemeConfig) {
    let text = Style::default().fg(theme.fg());
    let muted = Style::default().fg(theme.fg_muted());
    let key = Style::default().fg(theme.primary());

    let (title, lines, height) = match dialog {
        Dialog::ConfirmBulk { action, count } => {
            let target = match count {
                Some(count) => format!("{} notifications", count),
                None => "the selected notifications".to_string(),
            };
            let lines = vec![
                Line::from(Span::styled(format!("Apply {} to {}?", action.slug(), target), text)),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("y", key),
                    Span::styled(" yes  ", muted),
                    Span::styled("n", key),
                    Span::styled(" no", muted),
                ]),
            ];
            (" Confirm ", lines, 7)
        }
        Dialog::ConfirmDeleteView {
            name,
            linked_rule_count,
            ..
        } => {
            let lines = vec![
                Line::from(Span::styled(format!("Delete view \"{}\"?", name), text)),
                Line::from(Span::styled(
                    format!("{} rule(s) use it and will be removed too.", linked_rule_count),
                    Style::default().fg(theme.warning()),
                )),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("y", key),
                    Span::styled(" delete  ", muted),
                    Span::styled("n", key),
                    Span::styled(" keep", muted),
                ]),
            ];
            (" Delete view ", lines, 8)
        }
        Dialog::UndoHistory { cursor } => {
            let mut lines: Vec<Line> = session
                .undo
                .history()
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let when = entry.timestamp.with_timezone(&Local).format("%H:%M");
                    let style = if i == *cursor {
                        Style::default()
                            .fg(theme.fg())
                            .bg(theme.selected_bg())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        text
                    };
                    Line::from(vec![
                        Span::styled(format!("{} ", when), muted),
                        Span::styled(entry.description.clone(), style),
                    ])
                })
                .collect();
            if lines.is_empty() {
                lines.push(Line::from(Span::styled("Nothing to undo", muted)));
            }
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled("Enter", key),
                Span::styled(" undo  ", muted),
                Span::styled("C", key),
                Span::styled(" clear  ", muted),
                Span::styled("Esc", key),
                Span::styled(" close", muted),
            ]));
            let height = lines.len() as u16 + 2;
            (" Undo history ", lines, height)
        }
        // Text-field dialogs are drawn by render_input
        Dialog::Snooze { .. } | Dialog::TagPicker { .. } => return,
    };

    let tone = match dialog {
        Dialog::ConfirmDeleteView { .. } => Tone::Danger,
        Dialog::ConfirmBulk { .. } if session.selection.mode() == SelectAllMode::All => Tone::Danger,
        _ => Tone::Normal,
    };
    let modal = Modal::new(title, theme).tone(tone);
    let modal_area = centered(area, 60, height);
    f.render_widget(Clear, modal_area);
    let paragraph = Paragraph::new(lines)
        .block(modal.block())
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, modal_area);
}

pub fn render_input(f: &mut Frame, area: Rect, kind: InputKind, input: &str, theme: &ThemeConfig) {
    let (title, prompt) = match kind {
        InputKind::Snooze { .. } => (" Snooze ", "For how long? (3h, 2d, 1w)"),
        InputKind::Tag { remove: false, .. } => (" Tag ", "Tag name (created if new)"),
        InputKind::Tag { remove: true, .. } => (" Remove tag ", "Tag name"),
        InputKind::NewView => (" New view ", "Name for a view of the current filter"),
    };

    let modal = Modal::new(title, theme);
    let modal_area = centered(area, 50, 5);
    f.render_widget(Clear, modal_area);
    let lines = vec![
        Line::from(Span::styled(prompt, Style::default().fg(theme.fg_muted()))),
        Line::from(vec![
            Span::styled(input.to_string(), Style::default().fg(theme.fg())),
            Span::styled("_", Style::default().fg(theme.primary())),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).block(modal.block()), modal_area);
}
