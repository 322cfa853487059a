//! Remote configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

use mcm_core::gesture::{DEFAULT_CLICK_SUPPRESS, DEFAULT_DIAL_THRESHOLD, DEFAULT_SENSITIVITY};
use mcm_core::page::DEFAULT_SWIPE_THRESHOLD;
use mcm_core::DialSettings;
use mcm_link::Backoff;
use mcm_link::reconnect::{BACKOFF_CAP, BACKOFF_FACTOR, BACKOFF_FLOOR};

use crate::surface::SurfaceSettings;

/// Environment variable that overrides `connection.origin`.
pub const ORIGIN_ENV: &str = "MCM_ORIGIN";

/// Remote configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Controller connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,
    /// Gesture tuning
    #[serde(default)]
    pub gestures: GestureConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { log_level: default_log_level(), json: false }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Controller connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    /// Origin serving the controller's web surface
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_backoff_floor_ms")]
    pub backoff_floor_ms: u64,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            backoff_floor_ms: default_backoff_floor_ms(),
            backoff_factor: default_backoff_factor(),
            backoff_cap_ms: default_backoff_cap_ms(),
        }
    }
}

impl ConnectionConfig {
    /// Reconnect backoff described by this section.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.backoff_floor_ms),
            self.backoff_factor,
            Duration::from_millis(self.backoff_cap_ms),
        )
    }
}

fn default_origin() -> String {
    "http://127.0.0.1:8080".to_string()
}

#[allow(clippy::cast_possible_truncation)]
fn default_backoff_floor_ms() -> u64 {
    BACKOFF_FLOOR.as_millis() as u64
}

fn default_backoff_factor() -> f64 {
    BACKOFF_FACTOR
}

#[allow(clippy::cast_possible_truncation)]
fn default_backoff_cap_ms() -> u64 {
    BACKOFF_CAP.as_millis() as u64
}

/// Gesture tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GestureConfig {
    /// Volume change per pixel of knob drag
    #[serde(default = "default_volume_sensitivity")]
    pub volume_sensitivity: f32,
    /// Pixels of dial travel per tick
    #[serde(default = "default_dial_threshold")]
    pub dial_threshold_px: f32,
    /// How long a finished dial drag suppresses the trailing click. Must
    /// exceed the platform's delay between pointer-up and the synthesized click.
    #[serde(default = "default_click_suppress_ms")]
    pub click_suppress_ms: u64,
    /// Horizontal travel that counts as a page swipe
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold_px: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            volume_sensitivity: default_volume_sensitivity(),
            dial_threshold_px: default_dial_threshold(),
            click_suppress_ms: default_click_suppress_ms(),
            swipe_threshold_px: default_swipe_threshold(),
        }
    }
}

impl GestureConfig {
    /// Surface tunables described by this section.
    #[must_use]
    pub fn surface_settings(&self) -> SurfaceSettings {
        SurfaceSettings {
            volume_sensitivity: self.volume_sensitivity,
            dial: DialSettings {
                threshold: self.dial_threshold_px,
                click_suppress: Duration::from_millis(self.click_suppress_ms),
            },
            swipe_threshold: self.swipe_threshold_px,
        }
    }
}

fn default_volume_sensitivity() -> f32 {
    DEFAULT_SENSITIVITY
}

fn default_dial_threshold() -> f32 {
    DEFAULT_DIAL_THRESHOLD
}

#[allow(clippy::cast_possible_truncation)]
fn default_click_suppress_ms() -> u64 {
    DEFAULT_CLICK_SUPPRESS.as_millis() as u64
}

fn default_swipe_threshold() -> f32 {
    DEFAULT_SWIPE_THRESHOLD
}

impl Config {
    /// Reject values that would stall or break the link or the gestures.
    ///
    /// # Errors
    /// Returns an error naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let connection = &self.connection;
        ensure!(connection.backoff_floor_ms > 0, "connection.backoff_floor_ms must be positive");
        ensure!(connection.backoff_cap_ms > 0, "connection.backoff_cap_ms must be positive");
        ensure!(
            connection.backoff_factor.is_finite() && connection.backoff_factor > 0.0,
            "connection.backoff_factor must be a positive finite number, got {}",
            connection.backoff_factor
        );

        let gestures = &self.gestures;
        for (key, value) in [
            ("gestures.volume_sensitivity", gestures.volume_sensitivity),
            ("gestures.dial_threshold_px", gestures.dial_threshold_px),
            ("gestures.swipe_threshold_px", gestures.swipe_threshold_px),
        ] {
            ensure!(
                value.is_finite() && value > 0.0,
                "{key} must be a positive finite number, got {value}"
            );
        }
        Ok(())
    }

    /// Replace the origin if an override is given.
    #[must_use]
    pub fn with_origin_override(mut self, origin: Option<String>) -> Self {
        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            info!(%origin, "Using origin from environment");
            self.connection.origin = origin;
        }
        self
    }
}

/// Load configuration from the default path, then apply the environment.
///
/// # Errors
/// Returns an error if the config directory cannot be determined or the file
/// exists but cannot be read or parsed.
pub fn load_config() -> Result<Config> {
    let config = load_config_from(&config_path()?)?;
    Ok(config.with_origin_override(std::env::var(ORIGIN_ENV).ok()))
}

/// Load configuration from `path`, or defaults if it does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path:?}"))?;
        config.validate().with_context(|| format!("Invalid config file: {path:?}"))?;
        Ok(config)
    } else {
        info!(?path, "Config file not found, using defaults");
        Ok(Config::default())
    }
}

/// Get the configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "mcm", "MonitorControllerMax")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("remote.toml"))
}
