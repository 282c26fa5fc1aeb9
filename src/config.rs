use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where undo history, layout state and the log file live
    pub state_dir: String,
    pub server: ServerConfig,
    pub behavior: BehaviorConfig,
    pub stream: StreamConfig,
    pub layout: LayoutConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Backend root, without the `/api` suffix
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub page_size: u32,
    /// Explicit selections above this size ask before a toolbar bulk action
    pub bulk_confirm_threshold: usize,
    /// Same, for bulk actions triggered from a keyboard shortcut
    pub shortcut_confirm_threshold: usize,
    pub undo_history_limit: usize,
    pub undo_toast_secs: u64,
    pub toast_secs: u64,
    /// Delay before a notification opened in the detail pane is marked read
    pub mark_read_delay_ms: u64,
    pub mark_read_on_open: bool,
    pub search_debounce_ms: u64,
    pub query_debounce_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub enabled: bool,
    pub reconnect_base_ms: u64,
    pub reconnect_max_ms: u64,
    pub max_reconnect_attempts: u32,
    /// Reconnect if no ping arrives within this window
    pub ping_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Open the detail pane beside the list on first run
    pub split_pane: bool,
    /// List width percentage in split mode on first run
    pub split_pane_width: u16,
    /// Repository column width in characters
    pub repo_width: usize,
    /// Date column width in characters
    pub date_width: usize,
}

/// Semantic theme configuration using Capstan Cloud colors as defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    // Base colors
    pub bg: String,
    pub bg_panel: String,
    pub fg: String,
    pub fg_muted: String,

    // Border colors
    pub border: String,
    pub border_active: String,

    // Accent colors
    pub primary: String,
    pub secondary: String,

    // Semantic colors
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,

    // UI-specific mappings
    pub selected_bg: String,
    pub unread: String,
    pub starred: String,
    pub tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .map(|p| p.join("triagetui").to_string_lossy().into_owned())
                .unwrap_or_else(|| "~/.local/state/triagetui".to_string()),
            server: ServerConfig::default(),
            behavior: BehaviorConfig::default(),
            stream: StreamConfig::default(),
            layout: LayoutConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8808".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            bulk_confirm_threshold: 50,
            shortcut_confirm_threshold: 30,
            undo_history_limit: 20,
            undo_toast_secs: 5,
            toast_secs: 4,
            mark_read_delay_ms: 750,
            mark_read_on_open: true,
            search_debounce_ms: 250,
            query_debounce_ms: 500,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reconnect_base_ms: 1000,
            reconnect_max_ms: 30_000,
            max_reconnect_attempts: 10,
            ping_timeout_secs: 60,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            split_pane: true,
            split_pane_width: 45,
            repo_width: 22,
            date_width: 10,
        }
    }
}

/// Capstan Cloud theme - warm earth tones with gold accents
impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            bg: "#1a1917".to_string(),
            bg_panel: "#262422".to_string(),
            fg: "#f7f7f5".to_string(),
            fg_muted: "#8c8985".to_string(),

            border: "#524f4c".to_string(),
            border_active: "#d4a366".to_string(), // primary

            primary: "#d4a366".to_string(),
            secondary: "#8fa5ae".to_string(), // blue

            success: "#52c41a".to_string(),
            warning: "#faad14".to_string(),
            error: "#ff4d4f".to_string(),
            info: "#88c0d0".to_string(), // cyan

            selected_bg: "#393634".to_string(),
            unread: "#d4a366".to_string(), // primary (gold)
            starred: "#faad14".to_string(),
            tag: "#b48ead".to_string(), // magenta
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("triagetui/config.toml"))
            .unwrap_or_else(|| PathBuf::from("~/.config/triagetui/config.toml"))
    }

    /// Load from the default location; unreadable or invalid files fall back
    /// to defaults. Problems are returned so they can be logged once logging
    /// is up.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> (Self, Option<String>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(format!("Config parse error: {}", e))),
            },
            Err(e) => (Self::default(), Some(format!("Config read error: {}", e))),
        }
    }

    pub fn state_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.state_dir).into_owned())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.server.timeout_secs)
    }
}

impl ThemeConfig {
    pub fn bg(&self) -> ratatui::style::Color {
        parse_color(&self.bg)
    }
    pub fn bg_panel(&self) -> ratatui::style::Color {
        parse_color(&self.bg_panel)
    }
    pub fn fg(&self) -> ratatui::style::Color {
        parse_color(&self.fg)
    }
    pub fn fg_muted(&self) -> ratatui::style::Color {
        parse_color(&self.fg_muted)
    }
    pub fn border(&self) -> ratatui::style::Color {
        parse_color(&self.border)
    }
    pub fn border_active(&self) -> ratatui::style::Color {
        parse_color(&self.border_active)
    }
    pub fn primary(&self) -> ratatui::style::Color {
        parse_color(&self.primary)
    }
    pub fn secondary(&self) -> ratatui::style::Color {
        parse_color(&self.secondary)
    }
    pub fn success(&self) -> ratatui::style::Color {
        parse_color(&self.success)
    }
    pub fn warning(&self) -> ratatui::style::Color {
        parse_color(&self.warning)
    }
    pub fn error(&self) -> ratatui::style::Color {
        parse_color(&self.error)
    }
    pub fn info(&self) -> ratatui::style::Color {
        parse_color(&self.info)
    }
    pub fn selected_bg(&self) -> ratatui::style::Color {
        parse_color(&self.selected_bg)
    }
    pub fn unread(&self) -> ratatui::style::Color {
        parse_color(&self.unread)
    }
    pub fn starred(&self) -> ratatui::style::Color {
        parse_color(&self.starred)
    }
    pub fn tag(&self) -> ratatui::style::Color {
        parse_color(&self.tag)
    }
}

/// Parse color string to ratatui Color
pub fn parse_color(s: &str) -> ratatui::style::Color {
    use ratatui::style::Color;

    // Try hex first (#RRGGBB)
    if s.starts_with('#') && s.len() == 7 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&s[1..3], 16),
            u8::from_str_radix(&s[3..5], 16),
            u8::from_str_radix(&s[5..7], 16),
        ) {
            return Color::Rgb(r, g, b);
        }
    }

    match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[behavior]\nshortcut_confirm_threshold = 10\n[server]\nbase_url = \"http://triage:9000\"\n",
        )
        .unwrap();
        let (config, problem) = Config::load_from(&path);
        assert!(problem.is_none());
        assert_eq!(config.behavior.shortcut_confirm_threshold, 10);
        assert_eq!(config.behavior.bulk_confirm_threshold, 50);
        assert_eq!(config.server.base_url, "http://triage:9000");
        assert_eq!(config.stream.ping_timeout_secs, 60);
    }

    #[test]
    fn invalid_file_reports_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "behavior = 3").unwrap();
        let (config, problem) = Config::load_from(&path);
        assert!(problem.unwrap().starts_with("Config parse error"));
        assert_eq!(config.behavior.page_size, 50);
    }

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#ff0010"), Color::Rgb(255, 0, 16));
        assert_eq!(parse_color("Cyan"), Color::Cyan);
        assert_eq!(parse_color("nonsense"), Color::White);
    }
}
