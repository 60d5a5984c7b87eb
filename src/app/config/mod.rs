// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language and theme mode
//! - `[display]` - Display surface size, filtering and fallback window
//! - `[decoder]` - Decode worker pool sizing and startup behavior
//! - `[tools]` - Mouse button bindings and tool parameters
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `DICOM_LENS_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use dicom_lens::app::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (config, warning) = config::load();
//! if let Some(warning) = warning {
//!     eprintln!("{}", warning);
//! }
//!
//! // Write the defaults on first run so users have a file to edit
//! config::create_if_missing(&config).expect("Failed to write config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::dicom::worker_pool::{default_max_workers, PoolConfig};
use crate::error::{Error, Result};
use crate::tools::magnify::MagnifyConfig;
use crate::tools::zoom::ZoomConfig;
use crate::tools::{MouseButtonBinding, ToolBindings};
use crate::ui::theming::ThemeMode;
use crate::viewport::VoiWindow;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// Why a settings file could not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigWarning {
    /// Localization key of the user-facing message.
    pub key: &'static str,
    /// The underlying error, for logs.
    pub detail: String,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.detail)
    }
}

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "zh-TW").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(
        default = "default_theme_mode",
        deserialize_with = "deserialize_theme_mode"
    )]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Display surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    /// Side of the square display surface in logical pixels.
    #[serde(
        default = "default_surface_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub surface_size: Option<f32>,

    /// Nearest-neighbour filtering when zoomed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_replication: Option<bool>,

    /// Window center used when an image has none.
    #[serde(
        default = "default_window_center",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_window_center: Option<f32>,

    /// Window width used when an image has none.
    #[serde(
        default = "default_window_width",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_window_width: Option<f32>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            surface_size: default_surface_size(),
            pixel_replication: Some(false),
            default_window_center: default_window_center(),
            default_window_width: default_window_width(),
        }
    }
}

impl DisplayConfig {
    /// Surface side clamped to the supported range.
    #[must_use]
    pub fn surface_size(&self) -> f32 {
        self.surface_size
            .filter(|size| size.is_finite())
            .unwrap_or(DEFAULT_SURFACE_SIZE)
            .clamp(MIN_SURFACE_SIZE, MAX_SURFACE_SIZE)
    }

    /// Window used when an image provides none.
    #[must_use]
    pub fn fallback_window(&self) -> VoiWindow {
        VoiWindow::new(
            self.default_window_center.unwrap_or(DEFAULT_WINDOW_CENTER),
            self.default_window_width.unwrap_or(DEFAULT_WINDOW_WIDTH),
        )
    }
}

/// Decode worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecoderConfig {
    /// Maximum concurrent decodes. Defaults to the hardware thread count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<usize>,

    /// Start workers only when a load needs them.
    #[serde(
        default = "default_start_workers_on_demand",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_workers_on_demand: Option<bool>,

    /// Prepare the codec registry while the pool is initialized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialize_codecs_on_startup: Option<bool>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_workers: None,
            start_workers_on_demand: default_start_workers_on_demand(),
            initialize_codecs_on_startup: Some(false),
        }
    }
}

impl DecoderConfig {
    #[must_use]
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            max_workers: self.max_workers.unwrap_or_else(default_max_workers).max(1),
            start_workers_on_demand: self.start_workers_on_demand.unwrap_or(true),
            initialize_codecs_on_startup: self.initialize_codecs_on_startup.unwrap_or(false),
        }
    }
}

/// Interaction tool settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_button: Option<MouseButtonBinding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_button: Option<MouseButtonBinding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnify_button: Option<MouseButtonBinding>,

    #[serde(
        default = "default_zoom_min_scale",
        skip_serializing_if = "Option::is_none"
    )]
    pub zoom_min_scale: Option<f32>,

    #[serde(
        default = "default_zoom_max_scale",
        skip_serializing_if = "Option::is_none"
    )]
    pub zoom_max_scale: Option<f32>,

    /// Dragging up zooms in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_invert: Option<bool>,

    /// Side of the magnifier lens in logical pixels.
    #[serde(
        default = "default_magnify_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub magnify_size: Option<f32>,

    #[serde(
        default = "default_magnification_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub magnification_level: Option<f32>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            zoom_button: Some(MouseButtonBinding::Left),
            pan_button: Some(MouseButtonBinding::Right),
            magnify_button: Some(MouseButtonBinding::Middle),
            zoom_min_scale: default_zoom_min_scale(),
            zoom_max_scale: default_zoom_max_scale(),
            zoom_invert: Some(false),
            magnify_size: default_magnify_size(),
            magnification_level: default_magnification_level(),
        }
    }
}

impl ToolsConfig {
    #[must_use]
    pub fn bindings(&self) -> ToolBindings {
        let defaults = ToolBindings::default();
        ToolBindings {
            zoom: self.zoom_button.map_or(defaults.zoom, Into::into),
            pan: self.pan_button.map_or(defaults.pan, Into::into),
            magnify: self.magnify_button.map_or(defaults.magnify, Into::into),
        }
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomConfig {
        ZoomConfig {
            min_scale: self.zoom_min_scale.unwrap_or(DEFAULT_MIN_SCALE),
            max_scale: self.zoom_max_scale.unwrap_or(DEFAULT_MAX_SCALE),
            invert: self.zoom_invert.unwrap_or(false),
        }
        .sanitized()
    }

    #[must_use]
    pub fn magnify(&self) -> MagnifyConfig {
        MagnifyConfig {
            magnify_size: self.magnify_size.unwrap_or(DEFAULT_MAGNIFY_SIZE),
            magnification_level: self
                .magnification_level
                .unwrap_or(DEFAULT_MAGNIFICATION_LEVEL),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Display surface settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Decode worker pool settings.
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Interaction tool settings.
    #[serde(default)]
    pub tools: ToolsConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_theme_mode() -> ThemeMode {
    ThemeMode::System
}

fn default_surface_size() -> Option<f32> {
    Some(DEFAULT_SURFACE_SIZE)
}

fn default_window_center() -> Option<f32> {
    Some(DEFAULT_WINDOW_CENTER)
}

fn default_window_width() -> Option<f32> {
    Some(DEFAULT_WINDOW_WIDTH)
}

fn default_start_workers_on_demand() -> Option<bool> {
    Some(true)
}

fn default_zoom_min_scale() -> Option<f32> {
    Some(DEFAULT_MIN_SCALE)
}

fn default_zoom_max_scale() -> Option<f32> {
    Some(DEFAULT_MAX_SCALE)
}

fn default_magnify_size() -> Option<f32> {
    Some(DEFAULT_MAGNIFY_SIZE)
}

fn default_magnification_level() -> Option<f32> {
    Some(DEFAULT_MAGNIFICATION_LEVEL)
}

fn deserialize_theme_mode<'de, D>(deserializer: D) -> std::result::Result<ThemeMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    match raw.to_lowercase().as_str() {
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        "system" => Ok(ThemeMode::System),
        other => Err(D::Error::custom(format!("invalid theme_mode: {}", other))),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning explaining what went wrong.
pub fn load() -> (Config, Option<ConfigWarning>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<ConfigWarning>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    let warning = ConfigWarning {
                        key: "warning-config-load-error",
                        detail: format!("{}: {}", path.display(), err),
                    };
                    return (Config::default(), Some(warning));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Writes `config` to the default path unless a settings file exists.
///
/// Returns whether a file was written.
pub fn create_if_missing(config: &Config) -> Result<bool> {
    create_if_missing_with_override(config, None)
}

/// Writes `config` into a custom directory unless a settings file exists.
pub fn create_if_missing_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<bool> {
    let Some(path) = get_config_path_with_override(base_dir) else {
        return Ok(false);
    };
    if path.exists() {
        return Ok(false);
    }
    save_to_path(config, &path)?;
    debug!("Wrote default settings to {}", path.display());
    Ok(true)
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
