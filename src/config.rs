//! Configuration management.
//!
//! Settings live in a TOML file at an XDG-compliant path
//! (`<config dir>/portfolio-tui/config.toml`). Every key is optional; a missing
//! or empty file yields the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::carousel::{CarouselLayout, ScrollSettings};
use crate::ui::theme::Theme;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PORTFOLIO_CONFIG";

const DEFAULT_NUDGE_INCREMENT: u32 = 44;
const DEFAULT_CARD_WIDTH: u32 = 42;
const DEFAULT_CARD_GAP: u32 = 2;
const DEFAULT_SCROLL_DURATION_MS: u64 = 300;
const DEFAULT_CONTROLS_MIN_WIDTH: u16 = 80;
const DEFAULT_TICK_RATE_MS: u64 = 100;
const DEFAULT_FRAME_RATE_MS: u64 = 16;

/// Errors that can occur during config operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Unable to determine config directory")]
    ConfigDirNotFound,

    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Configuration structure for persistent settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Initial colour theme
    pub theme: Option<Theme>,

    /// Columns travelled by one carousel nudge
    pub nudge_increment: Option<u32>,

    /// Width of one experience card in columns
    pub card_width: Option<u32>,

    /// Columns between two cards
    pub card_gap: Option<u32>,

    /// Length of an eased carousel scroll
    pub scroll_duration_ms: Option<u64>,

    /// Whether nudges are eased
    pub smooth_scroll: Option<bool>,

    /// Whether free scrolling settles on card boundaries
    pub snap: Option<bool>,

    /// Narrowest carousel width that still shows the arrow controls
    pub controls_min_width: Option<u16>,

    /// Event poll interval while idle
    pub tick_rate_ms: Option<u64>,

    /// Event poll interval while something animates
    pub frame_rate_ms: Option<u64>,

    /// TOML content file replacing the built-in page
    pub content: Option<String>,
}

impl Config {
    pub fn theme(&self) -> Theme {
        self.theme.unwrap_or_default()
    }

    pub fn carousel_layout(&self) -> CarouselLayout {
        CarouselLayout::new(
            self.card_width.unwrap_or(DEFAULT_CARD_WIDTH),
            self.card_gap.unwrap_or(DEFAULT_CARD_GAP),
            self.nudge_increment.unwrap_or(DEFAULT_NUDGE_INCREMENT),
        )
    }

    pub fn scroll_settings(&self) -> ScrollSettings {
        ScrollSettings {
            smooth: self.smooth_scroll.unwrap_or(true),
            duration: Duration::from_millis(
                self.scroll_duration_ms.unwrap_or(DEFAULT_SCROLL_DURATION_MS),
            ),
            snap: self.snap.unwrap_or(true),
            ..ScrollSettings::default()
        }
    }

    pub fn controls_min_width(&self) -> u16 {
        self.controls_min_width.unwrap_or(DEFAULT_CONTROLS_MIN_WIDTH)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.unwrap_or(DEFAULT_TICK_RATE_MS))
    }

    pub fn frame_rate(&self) -> Duration {
        Duration::from_millis(self.frame_rate_ms.unwrap_or(DEFAULT_FRAME_RATE_MS))
    }

    /// Copy with every default filled in, for display.
    pub fn resolved(&self) -> Config {
        let layout = self.carousel_layout();
        let scroll = self.scroll_settings();
        Config {
            theme: Some(self.theme()),
            nudge_increment: Some(layout.nudge),
            card_width: Some(layout.card_width),
            card_gap: Some(layout.gap),
            scroll_duration_ms: Some(scroll.duration.as_millis() as u64),
            smooth_scroll: Some(scroll.smooth),
            snap: Some(scroll.snap),
            controls_min_width: Some(self.controls_min_width()),
            tick_rate_ms: Some(self.tick_rate().as_millis() as u64),
            frame_rate_ms: Some(self.frame_rate().as_millis() as u64),
            content: self.content.clone(),
        }
    }

    /// Reject values the carousel cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.card_width == Some(0) {
            return Err(ConfigError::Invalid("card_width must be at least 1".into()));
        }
        if self.nudge_increment == Some(0) {
            return Err(ConfigError::Invalid(
                "nudge_increment must be at least 1".into(),
            ));
        }
        if self.frame_rate_ms == Some(0) || self.tick_rate_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "tick_rate_ms and frame_rate_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Get the path to the config file: explicit override → `PORTFOLIO_CONFIG` → XDG dir
pub fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(config_dir.join("portfolio-tui").join("config.toml"))
}

/// Load configuration from the resolved path
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = config_file_path(explicit)?;
    load_config_from(&config_path)
}

/// Load configuration from a specific file
#[instrument(level = "debug")]
pub fn load_config_from(config_path: &Path) -> Result<Config, ConfigError> {
    if !config_path.exists() {
        debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)?;

    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    debug!(path = %config_path.display(), "Loaded config file");
    Ok(config)
}
