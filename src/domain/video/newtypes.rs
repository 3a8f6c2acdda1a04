// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for playback values,
//! ensuring they are always within valid ranges.

// =============================================================================
// Volume
// =============================================================================

/// Volume bounds (0.0 to 1.0, where 1.0 = 100%).
pub mod volume_bounds {
    /// Minimum volume level.
    pub const MIN: f64 = 0.0;
    /// Maximum volume level.
    pub const MAX: f64 = 1.0;
    /// Default volume level.
    pub const DEFAULT: f64 = 1.0;
}

/// Volume level, guaranteed to be within valid range (0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f64);

impl Volume {
    /// Creates a new volume level, clamping to valid range. NaN maps to silence.
    #[must_use]
    pub fn new(volume: f64) -> Self {
        if volume.is_nan() {
            return Self(volume_bounds::MIN);
        }
        Self(volume.clamp(volume_bounds::MIN, volume_bounds::MAX))
    }

    /// Returns the volume value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns true if the level is zero.
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 <= volume_bounds::MIN
    }

    /// Adds `delta` (may be negative), clamping to the valid range.
    #[must_use]
    pub fn adjusted(self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(volume_bounds::DEFAULT)
    }
}

// =============================================================================
// PlaybackRate
// =============================================================================

/// Playback rate bounds (0.1x to 8.0x).
pub mod rate_bounds {
    /// Minimum playback rate.
    pub const MIN: f64 = 0.1;
    /// Maximum playback rate.
    pub const MAX: f64 = 8.0;
    /// Default playback rate (1.0 = normal speed).
    pub const DEFAULT: f64 = 1.0;
}

/// Playback rate, guaranteed to be within valid range (0.1x - 8.0x).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRate(f64);

impl PlaybackRate {
    /// Creates a new playback rate, clamping to valid range.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        if rate.is_nan() {
            return Self::default();
        }
        Self(rate.clamp(rate_bounds::MIN, rate_bounds::MAX))
    }

    /// Returns the rate value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Picks the preset nearest to this rate, or self when there are no presets.
    #[must_use]
    pub fn nearest_preset(self, presets: &[f64]) -> Self {
        presets
            .iter()
            .copied()
            .min_by(|a, b| (a - self.0).abs().total_cmp(&(b - self.0).abs()))
            .map_or(self, Self::new)
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(rate_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================
