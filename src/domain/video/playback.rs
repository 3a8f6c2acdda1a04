// SPDX-License-Identifier: MPL-2.0
//! Playback clock and seek direction.

use serde::{Deserialize, Serialize};

/// Direction of a seek gesture or hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeekDirection {
    Forward,
    Backward,
}

impl SeekDirection {
    /// Sign applied to seek offsets.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Clamps a time to `[0, duration]`. NaN maps to zero.
#[must_use]
pub fn clamp_time(time_secs: f64, duration_secs: f64) -> f64 {
    if time_secs.is_nan() {
        return 0.0;
    }
    time_secs.max(0.0).min(duration_secs.max(0.0))
}

/// Current position, duration and buffered end, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlaybackClock {
    pub current_time: f64,
    pub duration: f64,
    pub buffered_end: f64,
}

impl PlaybackClock {
    /// Returns true once the engine has reported a usable duration.
    #[must_use]
    pub fn has_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    /// Moves the position, clamped to the duration. Returns the applied time.
    pub fn set_position(&mut self, time_secs: f64) -> f64 {
        self.current_time = clamp_time(time_secs, self.duration);
        self.current_time
    }

    /// Records a new duration reported by the engine.
    ///
    /// Non-finite durations (live streams, unknown) are stored as zero.
    pub fn set_duration(&mut self, duration_secs: f64) {
        self.duration = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };
        self.current_time = clamp_time(self.current_time, self.duration);
    }

    /// Records a new buffered end, never below the current position.
    pub fn set_buffered_end(&mut self, buffered_end_secs: f64) {
        self.buffered_end = buffered_end_secs.max(self.current_time);
    }
}
