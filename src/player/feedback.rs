// SPDX-License-Identifier: MPL-2.0
//! Transient feedback overlays.
//!
//! Each overlay is an independent [`Flash`]: a payload while visible plus its
//! own expiry slot. Overlays never share a timer, so clearing one cannot
//! cancel another.

use super::timer::TimerSlot;
use crate::domain::video::SeekDirection;
use serde::Serialize;
use std::time::{Duration, Instant};

/// A payload that is visible until cleared or until its expiry fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Flash<T> {
    payload: Option<T>,
    expiry: TimerSlot,
}

impl<T> Default for Flash<T> {
    fn default() -> Self {
        Self {
            payload: None,
            expiry: TimerSlot::default(),
        }
    }
}

impl<T> Flash<T> {
    /// Shows `payload` for `lifetime`, restarting the expiry.
    pub fn show_for(&mut self, payload: T, now: Instant, lifetime: Duration) {
        self.payload = Some(payload);
        self.expiry.arm(now, lifetime);
    }

    /// Shows `payload` until explicitly cleared or lingered.
    pub fn show(&mut self, payload: T) {
        self.payload = Some(payload);
        self.expiry.cancel();
    }

    /// Keeps the current payload visible for `linger`, then clears it.
    pub fn linger(&mut self, now: Instant, linger: Duration) {
        if self.payload.is_some() {
            self.expiry.arm(now, linger);
        }
    }

    pub fn clear(&mut self) {
        self.payload = None;
        self.expiry.cancel();
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.payload.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.expiry.deadline()
    }

    /// Clears the payload if its expiry is due. Returns true when it cleared.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if self.expiry.fire_if_due(now) {
            self.payload = None;
            true
        } else {
            false
        }
    }
}

/// Overlay for a single discrete seek (arrow key tap or double-tap zone).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeekFeedback {
    pub direction: SeekDirection,
    /// Seconds moved, signed.
    pub offset_secs: f64,
    /// Position after the seek.
    pub time: f64,
}

/// Overlay shown while a horizontal scrub is previewing a position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrubFeedback {
    pub time: f64,
    /// Preview minus the position at pointer-down.
    pub delta_secs: f64,
}

/// Overlay shown during a hold-seek.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousSeekFeedback {
    pub direction: SeekDirection,
    pub target_time: f64,
    pub multiplier: u32,
}

/// Overlay shown after a volume change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeFeedback {
    pub level: f64,
    pub muted: bool,
}

/// All overlays of the player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackFlags {
    pub scrub: Flash<ScrubFeedback>,
    pub continuous_seek: Flash<ContinuousSeekFeedback>,
    pub single_seek: Flash<SeekFeedback>,
    pub volume: Flash<VolumeFeedback>,
    pub screenshot: Flash<()>,
}

impl FeedbackFlags {
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        super::timer::earliest([
            self.scrub.deadline(),
            self.continuous_seek.deadline(),
            self.single_seek.deadline(),
            self.volume.deadline(),
            self.screenshot.deadline(),
        ])
    }

    /// Expires every overlay whose deadline has passed.
    pub fn fire_due(&mut self, now: Instant) {
        self.scrub.fire_if_due(now);
        self.continuous_seek.fire_if_due(now);
        self.single_seek.fire_if_due(now);
        self.volume.fire_if_due(now);
        self.screenshot.fire_if_due(now);
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}
