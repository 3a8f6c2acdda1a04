// SPDX-License-Identifier: MPL-2.0
//! Controller configuration, loaded from and saved to a `player.toml` file.
//!
//! The configuration is immutable once handed to the controller. It is
//! organized into sections:
//! - `[seek]` - Hold-seek step, acceleration and throttling
//! - `[gesture]` - Scrub and tap thresholds
//! - `[controls]` - Auto-hide delay
//! - `[feedback]` - Overlay lifetimes
//! - `[recovery]` - Reload delays and retry policy
//! - `[capture]` - Frame capture polling
//! - `[playback]` - Rate presets
//!
//! Every field has a default, so partial files are valid.
//!
//! # Examples
//!
//! ```no_run
//! use lecture_player::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (config, warning) = config::load();
//! if let Some(message) = warning {
//!     eprintln!("{message}");
//! }
//! assert!(config.seek.max_multiplier >= 1);
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "player.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Hold-seek settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeekConfig {
    /// Seek step at 1x, also used by single keyboard seeks (seconds).
    pub base_step_secs: f64,
    /// Hold duration before the multiplier starts growing (milliseconds).
    pub accel_threshold_ms: u64,
    /// Multiplier ceiling.
    pub max_multiplier: u32,
    /// Step interval at 1x (milliseconds).
    pub base_interval_ms: u64,
    /// Step interval floor (milliseconds).
    pub min_interval_ms: u64,
    /// Overlay linger after release (milliseconds).
    pub feedback_linger_ms: u64,
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self {
            base_step_secs: DEFAULT_BASE_SEEK_STEP_SECS,
            accel_threshold_ms: DEFAULT_ACCEL_THRESHOLD_MS,
            max_multiplier: DEFAULT_MAX_SEEK_MULTIPLIER,
            base_interval_ms: DEFAULT_BASE_STEP_INTERVAL_MS,
            min_interval_ms: DEFAULT_MIN_STEP_INTERVAL_MS,
            feedback_linger_ms: DEFAULT_HOLD_FEEDBACK_LINGER_MS,
        }
    }
}

impl SeekConfig {
    #[must_use]
    pub fn accel_threshold(&self) -> Duration {
        Duration::from_millis(self.accel_threshold_ms)
    }

    #[must_use]
    pub fn feedback_linger(&self) -> Duration {
        Duration::from_millis(self.feedback_linger_ms)
    }

    /// Multiplier ceiling clamped to the supported range.
    #[must_use]
    pub fn multiplier_ceiling(&self) -> u32 {
        self.max_multiplier
            .clamp(MIN_MAX_SEEK_MULTIPLIER, MAX_MAX_SEEK_MULTIPLIER)
    }
}

/// Pointer/touch gesture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub scrub_threshold_px: f64,
    pub scrub_sensitivity: f64,
    pub scrub_range_cap_secs: f64,
    pub double_tap_window_ms: u64,
    pub double_tap_slop_px: f64,
    pub double_tap_seek_secs: f64,
    pub scrub_feedback_linger_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            scrub_threshold_px: DEFAULT_SCRUB_THRESHOLD_PX,
            scrub_sensitivity: DEFAULT_SCRUB_SENSITIVITY,
            scrub_range_cap_secs: DEFAULT_SCRUB_RANGE_CAP_SECS,
            double_tap_window_ms: DEFAULT_DOUBLE_TAP_WINDOW_MS,
            double_tap_slop_px: DEFAULT_DOUBLE_TAP_SLOP_PX,
            double_tap_seek_secs: DEFAULT_DOUBLE_TAP_SEEK_SECS,
            scrub_feedback_linger_ms: DEFAULT_SCRUB_FEEDBACK_LINGER_MS,
        }
    }
}

impl GestureConfig {
    #[must_use]
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    #[must_use]
    pub fn scrub_feedback_linger(&self) -> Duration {
        Duration::from_millis(self.scrub_feedback_linger_ms)
    }
}

/// Control-visibility settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControlsConfig {
    /// Auto-hide delay in fullscreen (milliseconds).
    pub hide_delay_ms: u64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: DEFAULT_CONTROLS_HIDE_DELAY_MS,
        }
    }
}

impl ControlsConfig {
    /// Hide delay clamped to the supported range.
    #[must_use]
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(
            self.hide_delay_ms
                .clamp(MIN_CONTROLS_HIDE_DELAY_MS, MAX_CONTROLS_HIDE_DELAY_MS),
        )
    }
}

/// Feedback overlay lifetimes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    pub seek_ms: u64,
    pub seek_gesture_suppress_ms: u64,
    pub volume_ms: u64,
    pub screenshot_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            seek_ms: DEFAULT_SEEK_FEEDBACK_MS,
            seek_gesture_suppress_ms: DEFAULT_SEEK_GESTURE_SUPPRESS_MS,
            volume_ms: DEFAULT_VOLUME_FEEDBACK_MS,
            screenshot_ms: DEFAULT_SCREENSHOT_FEEDBACK_MS,
        }
    }
}

/// Recovery and reload settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Delay after the page becomes visible before reloading (milliseconds).
    pub visibility_settle_ms: u64,
    /// Delay before an error-triggered reload while visible (milliseconds).
    pub error_reload_delay_ms: u64,
    /// Load attempts before giving up.
    pub max_load_attempts: u32,
    /// Backoff base (milliseconds); attempt `n` waits `base * 2^n`.
    pub backoff_base_ms: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            visibility_settle_ms: DEFAULT_VISIBILITY_SETTLE_MS,
            error_reload_delay_ms: DEFAULT_ERROR_RELOAD_DELAY_MS,
            max_load_attempts: DEFAULT_MAX_LOAD_ATTEMPTS,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        }
    }
}

/// Frame capture settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub retry_interval_ms: u64,
    pub fallback_after_ms: u64,
    pub blank_threshold: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: DEFAULT_CAPTURE_RETRY_MS,
            fallback_after_ms: DEFAULT_CAPTURE_FALLBACK_MS,
            blank_threshold: DEFAULT_CAPTURE_BLANK_THRESHOLD,
        }
    }
}

/// Playback rate and volume settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Rates offered in the rate menu.
    pub rates: Vec<f64>,
    /// Volume change per arrow key press.
    pub volume_step: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            rates: DEFAULT_PLAYBACK_RATES.to_vec(),
            volume_step: VOLUME_STEP,
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Immutable controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlayerConfig {
    #[serde(default)]
    pub seek: SeekConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

// =============================================================================
// Load / Save
// =============================================================================

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional warning). If loading fails, returns
/// the default config with a warning explaining what went wrong.
pub fn load() -> (PlayerConfig, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (PlayerConfig, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "falling back to default config");
                    return (
                        PlayerConfig::default(),
                        Some(format!("failed to load {}: {err}", path.display())),
                    );
                }
            }
        }
    }
    (PlayerConfig::default(), None)
}

/// Loads configuration from a specific path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_from_path(path: &Path) -> Result<PlayerConfig> {
    let content = fs::read_to_string(path)?;
    let config: PlayerConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Saves configuration to a specific path, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_to_path(config: &PlayerConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let mut config = PlayerConfig::default();
        config.seek.max_multiplier = 4;
        config.controls.hide_delay_ms = 5000;
        config.playback.rates = vec![1.0, 2.0];

        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("player.toml");

        save_to_path(&config, &path).expect("failed to save config");
        let loaded = load_from_path(&path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("player.toml");
        fs::write(&path, "[seek]\nmax_multiplier = 3\n").expect("write");

        let loaded = load_from_path(&path).expect("load");
        assert_eq!(loaded.seek.max_multiplier, 3);
        assert_eq!(loaded.seek.accel_threshold_ms, DEFAULT_ACCEL_THRESHOLD_MS);
        assert_eq!(loaded.recovery, RecoveryConfig::default());
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("player.toml");
        fs::write(&path, "not = valid = toml").expect("write");

        let result = load_from_path(&path);
        assert!(matches!(result, Err(Error::TomlDe(_))));
    }

    #[test]
    fn load_with_override_warns_and_defaults_on_bad_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[seek\n").expect("write");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, PlayerConfig::default());
        assert!(warning.is_some());
    }

    #[test]
    fn load_with_override_missing_file_is_silent_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, PlayerConfig::default());
        assert!(warning.is_none());
    }

    #[test]
    fn hide_delay_is_clamped() {
        let controls = ControlsConfig { hide_delay_ms: 10 };
        assert_eq!(
            controls.hide_delay(),
            Duration::from_millis(MIN_CONTROLS_HIDE_DELAY_MS)
        );
    }

    #[test]
    fn multiplier_ceiling_is_clamped() {
        let seek = SeekConfig {
            max_multiplier: 0,
            ..SeekConfig::default()
        };
        assert_eq!(seek.multiplier_ceiling(), MIN_MAX_SEEK_MULTIPLIER);
    }
}
