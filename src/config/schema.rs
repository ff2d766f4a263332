use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/skinamp/config.toml` or `~/.config/skinamp/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SKINAMP__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub skin: SkinSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to include hidden files (dotfiles).
    pub include_hidden: bool,
    /// Folder loaded when none is given on the command line.
    pub default_dir: Option<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "m4a".into()],
            include_hidden: false,
            default_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether repeat-current-track starts enabled.
    pub loop_enabled: bool,
    /// Start playing the first track right after a folder is loaded.
    pub autoplay: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            loop_enabled: false,
            autoplay: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SkinSettings {
    /// Panel width in reference pixels.
    pub width_px: u16,
    /// Panel height in reference pixels.
    pub height_px: u16,
    /// How many reference pixels one terminal column stands for.
    pub cell_width_px: u16,
    /// How many reference pixels one terminal row stands for.
    pub cell_height_px: u16,
    /// Optional background image (png, jpeg, tiff or heic).
    pub background: Option<PathBuf>,
    /// Whether the panel starts pinned on top.
    pub always_on_top: bool,
}

impl Default for SkinSettings {
    fn default() -> Self {
        Self {
            width_px: 230,
            height_px: 400,
            cell_width_px: 10,
            cell_height_px: 20,
            background: None,
            always_on_top: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"info"` or `"skinamp=debug"`.
    pub filter: String,
    /// Log file; defaults to the XDG state directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}
