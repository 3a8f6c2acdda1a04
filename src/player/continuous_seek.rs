// SPDX-License-Identifier: MPL-2.0
//! Press-and-hold seeking with acceleration.
//!
//! While a direction is held, every frame tick may apply one step of
//! `base_step * multiplier`. The multiplier grows with hold time and the
//! minimum spacing between steps shrinks with it, so long holds cover ground
//! quickly without flooding the engine with seeks.

use super::feedback::ContinuousSeekFeedback;
use super::time_format::{seek_multiplier, step_interval};
use super::timer::FrameLoop;
use crate::config::SeekConfig;
use crate::domain::video::{clamp_time, PlaybackClock, SeekDirection};
use std::time::Instant;

/// An in-progress hold. Its presence is the "hold active" flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekSession {
    pub direction: SeekDirection,
    pub started_at: Instant,
    pub target_time: f64,
    pub multiplier: u32,
    pub last_step_at: Instant,
}

/// Result of a hold-start request.
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// A session was created; the overlay should show this payload.
    Started(ContinuousSeekFeedback),
    /// A session already exists; nothing changed.
    AlreadyActive,
    /// Duration is zero or unknown; nothing to seek in.
    NoDuration,
}

/// Hold-seek engine: one optional session plus its frame loop.
#[derive(Debug, Clone)]
pub struct ContinuousSeek {
    config: SeekConfig,
    session: Option<SeekSession>,
    frames: FrameLoop,
}

impl ContinuousSeek {
    #[must_use]
    pub fn new(config: SeekConfig) -> Self {
        Self {
            config,
            session: None,
            frames: FrameLoop::default(),
        }
    }

    /// Starts a hold in `direction` from the clock's current position.
    pub fn start(
        &mut self,
        direction: SeekDirection,
        now: Instant,
        clock: &PlaybackClock,
    ) -> StartOutcome {
        if self.session.is_some() {
            return StartOutcome::AlreadyActive;
        }
        if !clock.has_duration() {
            return StartOutcome::NoDuration;
        }

        let session = SeekSession {
            direction,
            started_at: now,
            target_time: clock.current_time,
            multiplier: 1,
            last_step_at: now,
        };
        self.session = Some(session);
        self.frames.start();
        StartOutcome::Started(Self::feedback_for(&session))
    }

    /// Advances the hold on a frame tick.
    ///
    /// Returns the new overlay payload when a step was applied; the caller
    /// writes `target_time` to the engine and the clock.
    pub fn on_frame(&mut self, now: Instant, duration: f64) -> Option<ContinuousSeekFeedback> {
        let session = self.session.as_mut()?;

        let held = now.saturating_duration_since(session.started_at);
        session.multiplier = session.multiplier.max(seek_multiplier(held, &self.config));

        let since_last = now.saturating_duration_since(session.last_step_at);
        if since_last < step_interval(session.multiplier, &self.config) {
            return None;
        }

        let offset = self.config.base_step_secs
            * f64::from(session.multiplier)
            * session.direction.sign();
        session.target_time = clamp_time(session.target_time + offset, duration);
        session.last_step_at = now;
        Some(Self::feedback_for(session))
    }

    /// Ends the hold and stops the frame loop. Returns the ended session.
    ///
    /// Releasing with no active session is a no-op.
    pub fn release(&mut self) -> Option<SeekSession> {
        self.frames.stop();
        self.session.take()
    }

    #[must_use]
    pub fn session(&self) -> Option<&SeekSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn wants_frames(&self) -> bool {
        self.frames.is_running()
    }

    fn feedback_for(session: &SeekSession) -> ContinuousSeekFeedback {
        ContinuousSeekFeedback {
            direction: session.direction,
            target_time: session.target_time,
            multiplier: session.multiplier,
        }
    }
}
