// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all controller configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the controller. Constants are organized by category.
//!
//! # Categories
//!
//! - **Seek**: Hold-seek stepping and acceleration
//! - **Gesture**: Scrub thresholds and tap windows
//! - **Controls**: Auto-hide delay
//! - **Feedback**: Overlay lifetimes
//! - **Recovery**: Reload delays and retry policy
//! - **Capture**: Frame capture polling
//! - **Playback**: Volume and rate presets

// ==========================================================================
// Seek Defaults
// ==========================================================================

/// Base seek step in seconds (single keyboard seek and hold-seek step at 1x).
pub const DEFAULT_BASE_SEEK_STEP_SECS: f64 = 5.0;

/// Hold duration before acceleration kicks in (milliseconds).
pub const DEFAULT_ACCEL_THRESHOLD_MS: u64 = 1000;

/// Maximum hold-seek speed multiplier.
pub const DEFAULT_MAX_SEEK_MULTIPLIER: u32 = 6;

/// Minimum allowed multiplier ceiling.
pub const MIN_MAX_SEEK_MULTIPLIER: u32 = 1;

/// Maximum allowed multiplier ceiling.
pub const MAX_MAX_SEEK_MULTIPLIER: u32 = 32;

/// Interval between hold-seek steps at 1x (milliseconds).
pub const DEFAULT_BASE_STEP_INTERVAL_MS: u64 = 300;

/// Floor for the hold-seek step interval (milliseconds).
pub const DEFAULT_MIN_STEP_INTERVAL_MS: u64 = 100;

/// How long the hold-seek overlay stays after release (milliseconds).
pub const DEFAULT_HOLD_FEEDBACK_LINGER_MS: u64 = 600;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Horizontal displacement that promotes a touch to a scrub (pixels).
pub const DEFAULT_SCRUB_THRESHOLD_PX: f64 = 15.0;

/// Scrub sensitivity: the container width is multiplied by this factor.
pub const DEFAULT_SCRUB_SENSITIVITY: f64 = 2.0;

/// Cap on the time range a full-width scrub can cover (seconds).
pub const DEFAULT_SCRUB_RANGE_CAP_SECS: f64 = 600.0;

/// Window in which a second tap counts as a double-tap (milliseconds).
pub const DEFAULT_DOUBLE_TAP_WINDOW_MS: u64 = 300;

/// Maximum distance between the two taps of a double-tap (pixels).
pub const DEFAULT_DOUBLE_TAP_SLOP_PX: f64 = 40.0;

/// Seek offset applied by a double-tap in a side zone (seconds).
pub const DEFAULT_DOUBLE_TAP_SEEK_SECS: f64 = 10.0;

/// How long the scrub bubble stays after release (milliseconds).
pub const DEFAULT_SCRUB_FEEDBACK_LINGER_MS: u64 = 400;

// ==========================================================================
// Controls Defaults
// ==========================================================================

/// Auto-hide delay for fullscreen controls (milliseconds).
pub const DEFAULT_CONTROLS_HIDE_DELAY_MS: u64 = 3500;

/// Minimum auto-hide delay (milliseconds).
pub const MIN_CONTROLS_HIDE_DELAY_MS: u64 = 1000;

/// Maximum auto-hide delay (milliseconds).
pub const MAX_CONTROLS_HIDE_DELAY_MS: u64 = 30_000;

// ==========================================================================
// Feedback Defaults
// ==========================================================================

/// Lifetime of the single-seek overlay (milliseconds).
pub const DEFAULT_SEEK_FEEDBACK_MS: u64 = 800;

/// How long a single seek suppresses control toggles (milliseconds).
pub const DEFAULT_SEEK_GESTURE_SUPPRESS_MS: u64 = 500;

/// Lifetime of the volume overlay (milliseconds).
pub const DEFAULT_VOLUME_FEEDBACK_MS: u64 = 1200;

/// Lifetime of the screenshot overlay (milliseconds).
pub const DEFAULT_SCREENSHOT_FEEDBACK_MS: u64 = 2000;

// ==========================================================================
// Recovery Defaults
// ==========================================================================

/// Delay after the page becomes visible before reloading (milliseconds).
pub const DEFAULT_VISIBILITY_SETTLE_MS: u64 = 100;

/// Delay before an error-triggered reload while visible (milliseconds).
pub const DEFAULT_ERROR_RELOAD_DELAY_MS: u64 = 500;

/// Number of load attempts before giving up.
pub const DEFAULT_MAX_LOAD_ATTEMPTS: u32 = 3;

/// Minimum number of load attempts.
pub const MIN_MAX_LOAD_ATTEMPTS: u32 = 1;

/// Maximum number of load attempts.
pub const MAX_MAX_LOAD_ATTEMPTS: u32 = 10;

/// Backoff base: attempt `n` waits `base * 2^n` (milliseconds).
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

// ==========================================================================
// Capture Defaults
// ==========================================================================

/// Delay between frame grab attempts (milliseconds).
pub const DEFAULT_CAPTURE_RETRY_MS: u64 = 100;

/// Time after which a blank frame is accepted (milliseconds).
pub const DEFAULT_CAPTURE_FALLBACK_MS: u64 = 1000;

/// A pixel channel above this value marks a frame as non-blank.
pub const DEFAULT_CAPTURE_BLANK_THRESHOLD: u8 = 10;

/// Placeholder frame size used when the engine produced nothing.
pub const CAPTURE_PLACEHOLDER_WIDTH: u32 = 1280;

/// Placeholder frame height.
pub const CAPTURE_PLACEHOLDER_HEIGHT: u32 = 720;

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Volume adjustment step per key press (5%).
pub const VOLUME_STEP: f64 = 0.05;

/// Default playback rate.
pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

/// Playback rate presets offered in the rate menu.
pub const DEFAULT_PLAYBACK_RATES: &[f64] = &[0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Cadence of the frame loop driven by the session runner (milliseconds).
pub const FRAME_INTERVAL_MS: u64 = 16;
