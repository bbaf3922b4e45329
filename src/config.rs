//! Configuration management for Cosmic MdEdit
//!
//! The configuration is an explicit value: it is loaded once at start-up,
//! handed to the components that need it, and written back when settings
//! change and when the application quits. It is persisted as JSON in the
//! user's configuration directory.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier following reverse-DNS convention
pub const APP_ID: &str = "com.cosmic.MdEdit";

/// Window title prefix
pub const APP_TITLE: &str = "Markdown Editor";

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: u32 = 1400;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: u32 = 900;

/// Minimum window width in pixels
pub const MIN_WINDOW_WIDTH: u32 = 400;

/// Minimum window height in pixels
pub const MIN_WINDOW_HEIGHT: u32 = 300;

/// Quiet period before the preview is regenerated
pub const PREVIEW_DEBOUNCE_MS: u64 = 300;

/// How long transient status messages stay visible
pub const STATUS_MESSAGE_MS: u64 = 3000;

/// Default prefix for pasted image filenames
pub const DEFAULT_NAME_PREFIX: &str = "demo_";

/// Bounds and step for the editor/preview split
pub const MIN_SPLIT_RATIO: f32 = 0.2;
pub const MAX_SPLIT_RATIO: f32 = 0.8;
pub const SPLIT_STEP: f32 = 0.05;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pasted image settings
    pub images: ImageConfig,

    /// Window and theme settings
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the user config directory, or defaults if
    /// no file has been written yet
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Save configuration to the user config directory
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.ui.split_ratio = clamp_split(config.ui.split_ratio);

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the cache directory path (browser preview pages)
    pub fn cache_dir() -> ConfigResult<PathBuf> {
        dirs::cache_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    fn config_file() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }
}

/// Pasted image configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Folder pasted images are written to; asked for on first paste
    pub save_folder: Option<PathBuf>,

    /// Prepended to every pasted image filename
    pub name_prefix: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            save_folder: None,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Dark theme for the chrome and the preview
    pub night_mode: bool,

    /// Last window size (width, height)
    pub window_size: (u32, u32),

    /// Fraction of the width given to the editor pane
    pub split_ratio: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            night_mode: false,
            window_size: (DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            split_ratio: 0.5,
        }
    }
}

impl UiConfig {
    /// Move the split by `steps` increments; positive grows the editor
    pub fn nudge_split(&mut self, steps: i32) {
        self.split_ratio = clamp_split(self.split_ratio + steps as f32 * SPLIT_STEP);
    }

    /// Split expressed as two integer portions for layout
    pub fn split_portions(&self) -> (u16, u16) {
        let editor = (self.split_ratio * 100.0).round() as u16;
        (editor, 100 - editor)
    }
}

fn clamp_split(ratio: f32) -> f32 {
    if ratio.is_nan() {
        return 0.5;
    }
    ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
}
