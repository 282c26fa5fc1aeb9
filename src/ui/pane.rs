use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders},
};

use triagetui::config::ThemeConfig;

/// Bordered list/detail/sidebar frame. The border lights up on focus and an
/// optional badge (page summary, unread count) sits at the top right.
pub struct Pane<'a> {
    title: String,
    badge: Option<String>,
    focused: bool,
    theme: &'a ThemeConfig,
}

impl<'a> Pane<'a> {
    pub fn new(title: impl Into<String>, focused: bool, theme: &'a ThemeConfig) -> Self {
        Self {
            title: title.into(),
            badge: None,
            focused,
            theme,
        }
    }

    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        let badge = badge.into();
        self.badge = (!badge.trim().is_empty()).then_some(badge);
        self
    }

    pub fn block(self) -> Block<'a> {
        let theme = self.theme;
        let edge = if self.focused {
            theme.border_active()
        } else {
            theme.border()
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(edge))
            .title(Line::styled(self.title, Style::default().fg(theme.primary())))
            .style(Style::default().bg(theme.bg()));
        if let Some(badge) = self.badge {
            block = block.title_top(
                Line::styled(format!(" {} ", badge.trim()), Style::default().fg(theme.fg_muted()))
                    .right_aligned(),
            );
        }
        block
    }
}

/// How loudly a dialog frames itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    /// Irreversible confirmations (query-wide bulk, view deletion)
    Danger,
}

/// Centered dialog frame drawn over the list
pub struct Modal<'a> {
    title: String,
    tone: Tone,
    theme: &'a ThemeConfig,
}

impl<'a> Modal<'a> {
    pub fn new(title: impl Into<String>, theme: &'a ThemeConfig) -> Self {
        Self {
            title: title.into(),
            tone: Tone::Normal,
            theme,
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn block(self) -> Block<'a> {
        let edge: Color = match self.tone {
            Tone::Normal => self.theme.border_active(),
            Tone::Danger => self.theme.error(),
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(edge))
            .title(Line::styled(self.title, Style::default().fg(edge)))
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(self.theme.bg_panel()))
    }
}

/// `width` x `height` box centered in `area`, keeping a two-cell margin
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(4));
    let h = height.min(area.height.saturating_sub(4));
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}
