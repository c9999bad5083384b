//! Configuration management for cadframe
//!
//! This module handles loading and managing application configuration
//! from various sources including config files and environment variables.

use crate::renderer::Color;
use crate::utils::error::{CadFrameError, IntoFrameError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that keeps the binary out of the UI event loop
pub const HEADLESS_ENV: &str = "CADFRAME_HEADLESS";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window configuration
    pub window: WindowConfig,

    /// Custom title bar and toolbar layout
    pub chrome: ChromeConfig,

    /// 3D viewer and modelling settings
    pub viewer: ViewerConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Initial screen position
    pub x: i32,
    pub y: i32,

    /// Initial window size
    pub width: i32,
    pub height: i32,

    /// Smallest size a border resize may produce
    pub min_width: i32,
    pub min_height: i32,

    /// Thickness of the invisible resize border (in pixels)
    pub border_width: i32,
}

/// Layout of the custom title bar and toolbar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    pub titlebar_height: i32,

    /// Edge length of the square minimize/maximize/close buttons
    pub control_size: i32,

    pub margin_left: i32,
    pub margin_right: i32,
    pub spacing: i32,

    pub toolbar_height: i32,
    pub toolbar_margin: i32,
    pub tool_button_width: i32,
    pub tool_button_height: i32,

    /// Two title bar presses closer than this form a double-click
    pub double_click_ms: u64,
    pub double_click_distance: f64,
}

/// 3D viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Background gradient (hex)
    pub background_top: String,
    pub background_bottom: String,

    pub face_color: String,
    pub highlight_color: String,
    pub edge_color: String,

    /// Edge length of the initial cube
    pub cube_size: f64,

    /// Extrusion distance and its keyboard step
    pub extrude_distance: f64,
    pub extrude_step: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "cadframe".to_string(),
            x: 300,
            y: 300,
            width: 900,
            height: 700,
            min_width: 400,
            min_height: 300,
            border_width: 4,
        }
    }
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            titlebar_height: 38,
            control_size: 28,
            margin_left: 12,
            margin_right: 8,
            spacing: 8,
            toolbar_height: 52,
            toolbar_margin: 10,
            tool_button_width: 120,
            tool_button_height: 32,
            double_click_ms: 400,
            double_click_distance: 4.0,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background_top: "#22262e".to_string(),
            background_bottom: "#15171c".to_string(),
            face_color: "#8a93a6".to_string(),
            highlight_color: "#e5c07b".to_string(),
            edge_color: "#00ffff".to_string(),
            cube_size: 50.0,
            extrude_distance: 20.0,
            extrude_step: 5.0,
            min_distance: -1000.0,
            max_distance: 1000.0,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/cadframe/config.toml on Linux)
    /// 3. User config file (~/.config/cadframe/config.toml on Linux)
    /// 4. Environment variables (CADFRAME_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(system_path) = Self::system_config_path() {
            if system_path.exists() {
                config = Self::from_file(&system_path)?;
            }
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config = Self::from_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Read a single TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).config_err("Failed to read config file")?;
        toml::from_str(&contents).config_err("Failed to parse config file")
    }

    /// Save configuration to the given path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).config_err("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).config_err("Failed to serialize config")?;
        std::fs::write(path, toml).config_err("Failed to write config file")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(width) = std::env::var("CADFRAME_WINDOW_WIDTH") {
            self.window.width = width
                .parse()
                .map_err(|_| CadFrameError::Config("Invalid CADFRAME_WINDOW_WIDTH".to_string()))?;
        }

        if let Ok(height) = std::env::var("CADFRAME_WINDOW_HEIGHT") {
            self.window.height = height
                .parse()
                .map_err(|_| CadFrameError::Config("Invalid CADFRAME_WINDOW_HEIGHT".to_string()))?;
        }

        if let Ok(border) = std::env::var("CADFRAME_BORDER_WIDTH") {
            self.window.border_width = border
                .parse()
                .map_err(|_| CadFrameError::Config("Invalid CADFRAME_BORDER_WIDTH".to_string()))?;
        }

        if let Ok(distance) = std::env::var("CADFRAME_EXTRUDE_DISTANCE") {
            self.viewer.extrude_distance = distance.parse().map_err(|_| {
                CadFrameError::Config("Invalid CADFRAME_EXTRUDE_DISTANCE".to_string())
            })?;
        }

        if let Ok(log_level) = std::env::var("CADFRAME_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let w = &self.window;
        if w.width <= 0 || w.height <= 0 || w.min_width <= 0 || w.min_height <= 0 {
            return Err(CadFrameError::Config("Window dimensions must be positive".to_string()));
        }

        if w.width < w.min_width || w.height < w.min_height {
            return Err(CadFrameError::Config(format!(
                "Initial size {}x{} is below the minimum {}x{}",
                w.width, w.height, w.min_width, w.min_height
            )));
        }

        if w.border_width < 0 {
            return Err(CadFrameError::Config("Border width must not be negative".to_string()));
        }

        let c = &self.chrome;
        if c.titlebar_height <= 0 || c.control_size <= 0 || c.toolbar_height < 0 {
            return Err(CadFrameError::Config("Chrome sizes must be positive".to_string()));
        }

        // The resize band must not reach into the control buttons, or a
        // press under a resize cursor would click a button instead
        let button_top = ((c.titlebar_height - c.control_size) as f64 / 2.0).max(0.0);
        if w.border_width as f64 >= button_top || w.border_width > c.margin_right {
            return Err(CadFrameError::Config(format!(
                "Border width {} overlaps the title bar buttons (top gap {}, right margin {})",
                w.border_width, button_top, c.margin_right
            )));
        }

        let v = &self.viewer;
        for hex in [
            &v.background_top,
            &v.background_bottom,
            &v.face_color,
            &v.highlight_color,
            &v.edge_color,
        ] {
            Color::from_hex(hex)
                .map_err(|e| CadFrameError::Config(format!("Bad color '{}': {}", hex, e)))?;
        }

        if v.cube_size <= 0.0 {
            return Err(CadFrameError::Config("Cube size must be positive".to_string()));
        }

        if v.min_distance > v.max_distance
            || !(v.min_distance..=v.max_distance).contains(&v.extrude_distance)
        {
            return Err(CadFrameError::Config(format!(
                "Extrude distance {} must lie within {}..={}",
                v.extrude_distance, v.min_distance, v.max_distance
            )));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(CadFrameError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/cadframe/config.toml"));

        #[cfg(target_os = "windows")]
        return std::env::var("PROGRAMDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("cadframe").join("config.toml"));

        #[cfg(target_os = "macos")]
        return Some(PathBuf::from("/Library/Application Support/cadframe/config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cadframe").join("config.toml"))
    }
}
