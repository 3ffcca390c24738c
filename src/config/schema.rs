use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/lectern/config.toml` or `~/.config/lectern/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `LECTERN__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub progress: ProgressSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions treated as video (case-insensitive, with or without dot).
    pub extensions: Vec<String>,
    /// Whether to descend into subdirectories of a selected folder.
    pub recursive: bool,
    /// Optional cap on directory recursion depth (only used when `recursive`).
    pub max_depth: Option<usize>,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                ".mp4".into(),
                ".mov".into(),
                ".avi".into(),
                ".mkv".into(),
                ".webm".into(),
                ".m4v".into(),
            ],
            recursive: false,
            max_depth: None,
            include_hidden: false,
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the player reports its position (milliseconds).
    pub tick_ms: u64,
    /// Move on to the next lecture once the current one ends.
    pub auto_advance: bool,
    /// Pause between the end of a lecture and the auto-advance (milliseconds).
    pub auto_advance_delay_ms: u64,
    /// Playback rates cycled through with `<` / `>`.
    pub rates: Vec<f64>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            auto_advance: true,
            auto_advance_delay_ms: 2000,
            rates: vec![0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// Minimum time between progress writes during playback (milliseconds).
    pub save_interval_ms: u64,
    /// Where persisted state lives. Defaults to `$XDG_DATA_HOME/lectern/storage.json`.
    pub storage_path: Option<PathBuf>,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            save_interval_ms: 1000,
            storage_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { seek_seconds: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// How long transient notices (e.g. playback errors) stay visible (milliseconds).
    pub notice_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ pick up where you left off ~ ".to_string(),
            notice_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log directory. Defaults to `$XDG_STATE_HOME/lectern/logs`.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
