use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::Action;

const MIN_SPLIT_WIDTH: u16 = 20;
const MAX_SPLIT_WIDTH: u16 = 80;

/// Layout preferences that survive restarts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutPrefs {
    /// List pane width percentage in split mode
    pub split_pane_width: u16,
    /// Detail opens beside the list (true) or replaces it (false)
    pub split_mode: bool,
    pub sidebar_collapsed: bool,
}

impl Default for LayoutPrefs {
    fn default() -> Self {
        Self {
            split_pane_width: 45,
            split_mode: true,
            sidebar_collapsed: false,
        }
    }
}

impl LayoutPrefs {
    /// Force the split width into its allowed range
    pub fn clamped(mut self) -> Self {
        self.split_pane_width = self
            .split_pane_width
            .clamp(MIN_SPLIT_WIDTH, MAX_SPLIT_WIDTH);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Views,
    Tags,
}

/// Modal dialogs. Confirmation dialogs carry what to run on "yes".
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    ConfirmBulk {
        action: Action,
        count: Option<u64>,
    },
    ConfirmDeleteView {
        view_id: String,
        name: String,
        linked_rule_count: u32,
    },
    Snooze {
        bulk: bool,
    },
    TagPicker {
        bulk: bool,
        remove: bool,
    },
    UndoHistory {
        cursor: usize,
    },
}

#[derive(Debug, Default)]
pub struct UiStateStore {
    prefs: LayoutPrefs,
    path: Option<PathBuf>,
    pub dropdown: Option<Dropdown>,
    pub dialog: Option<Dialog>,
}

impl UiStateStore {
    /// In-memory only, nothing persisted
    pub fn new(prefs: LayoutPrefs) -> Self {
        Self {
            prefs: prefs.clamped(),
            ..Default::default()
        }
    }

    /// Load preferences from `path`, falling back to `defaults` if the file is
    /// missing or unreadable
    pub fn load(path: &Path, defaults: LayoutPrefs) -> Self {
        let prefs = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(prefs) => prefs,
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "Ignoring malformed ui state");
                    defaults
                }
            },
            Err(_) => defaults,
        };
        Self {
            prefs: prefs.clamped(),
            path: Some(path.to_path_buf()),
            ..Default::default()
        }
    }

    pub fn prefs(&self) -> &LayoutPrefs {
        &self.prefs
    }

    pub fn is_split(&self) -> bool {
        self.prefs.split_mode
    }

    pub fn toggle_split_mode(&mut self) {
        self.prefs.split_mode = !self.prefs.split_mode;
        self.persist();
    }

    pub fn toggle_sidebar(&mut self) {
        self.prefs.sidebar_collapsed = !self.prefs.sidebar_collapsed;
        self.persist();
    }

    pub fn resize_split(&mut self, delta: i16) {
        let width = (self.prefs.split_pane_width as i16 + delta)
            .clamp(MIN_SPLIT_WIDTH as i16, MAX_SPLIT_WIDTH as i16);
        self.prefs.split_pane_width = width as u16;
        self.persist();
    }

    pub fn open_dialog(&mut self, dialog: Dialog) {
        self.dropdown = None;
        self.dialog = Some(dialog);
    }

    pub fn close_dialog(&mut self) -> Option<Dialog> {
        self.dialog.take()
    }

    pub fn toggle_dropdown(&mut self, dropdown: Dropdown) {
        self.dropdown = if self.dropdown == Some(dropdown) {
            None
        } else {
            Some(dropdown)
        };
    }

    fn persist(&self) {
        if let Some(path) = &self.path {
            if let Err(e) = save_json(path, &self.prefs) {
                tracing::error!(path = ?path, error = %e, "Failed to save ui state");
            }
        }
    }
}

/// Write `value` as JSON, creating parent directories. The file is
/// replaced in one rename so a crash never leaves half a document.
pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut temp_file, value)?;
    temp_file.flush()?;
    temp_file.persist(path)?;
    Ok(())
}
