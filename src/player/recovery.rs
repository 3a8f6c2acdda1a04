// SPDX-License-Identifier: MPL-2.0
//! Recovery after page backgrounding and transient engine errors.
//!
//! Browsers suspend network and decode work for hidden tabs, which surfaces as
//! a small set of engine error codes. Those mark a reload as pending; the
//! reload is issued once the page is visible again (after a short settle
//! delay), or shortly after the error when the page is already visible. Every
//! other error is fatal.
//!
//! Each reload gets a [`LoadTicket`]. Only the latest ticket's completion is
//! applied; completions of older loads are dropped.

use super::retry::LoadOutcome;
use super::timer::TimerSlot;
use crate::config::RecoveryConfig;
use crate::domain::error::{EngineError, ErrorClass};
use std::time::{Duration, Instant};

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

/// A reload the host should start now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReloadRequest {
    pub ticket: LoadTicket,
    /// Position to seek back to once loaded.
    pub resume_at: Option<f64>,
}

/// How the controller should react to an engine error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorResponse {
    /// A reload is pending (scheduled now, or deferred until visible).
    ReloadPending,
    /// Expected interruption, or already terminal.
    Ignored,
    /// Terminal playback error.
    Fatal(EngineError),
}

/// What to do when a load completes.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResolution {
    /// Loaded; seek back to the position if any.
    Resume(Option<f64>),
    /// Completion of a load that is no longer current.
    Stale,
    /// Superseded by a newer load.
    Superseded,
    Fatal(EngineError),
}

/// Visibility-driven recovery state.
#[derive(Debug, Clone)]
pub struct Recovery {
    settle_delay: Duration,
    error_reload_delay: Duration,
    page_visible: bool,
    pending_reload: bool,
    /// Position recorded when the page was hidden or the error arrived.
    saved_position: f64,
    reload_timer: TimerSlot,
    next_ticket: u64,
    in_flight: Option<(LoadTicket, Option<f64>)>,
    fatal: Option<EngineError>,
}

impl Recovery {
    #[must_use]
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            settle_delay: Duration::from_millis(config.visibility_settle_ms),
            error_reload_delay: Duration::from_millis(config.error_reload_delay_ms),
            page_visible: true,
            pending_reload: false,
            saved_position: 0.0,
            reload_timer: TimerSlot::default(),
            next_ticket: 0,
            in_flight: None,
            fatal: None,
        }
    }

    /// Records the page being hidden. Returns true if playback should pause.
    pub fn page_hidden(&mut self, is_playing: bool, current_time: f64) -> bool {
        self.page_visible = false;
        self.saved_position = current_time;
        self.reload_timer.cancel();
        is_playing
    }

    /// Records the page becoming visible; arms the settle delay if a reload
    /// is pending.
    pub fn page_visible(&mut self, now: Instant) {
        self.page_visible = true;
        if self.pending_reload && self.fatal.is_none() {
            self.reload_timer.arm(now, self.settle_delay);
        }
    }

    /// Classifies an engine error.
    pub fn on_error(&mut self, error: EngineError, now: Instant, current_time: f64) -> ErrorResponse {
        if self.fatal.is_some() {
            return ErrorResponse::Ignored;
        }
        match error.class() {
            ErrorClass::Interrupted => ErrorResponse::Ignored,
            ErrorClass::BackgroundSuspension => {
                tracing::info!(code = error.code, visible = self.page_visible, "load suspended, reload pending");
                self.pending_reload = true;
                if current_time > 0.0 {
                    self.saved_position = current_time;
                }
                if self.page_visible {
                    self.reload_timer.arm(now, self.error_reload_delay);
                }
                ErrorResponse::ReloadPending
            }
            ErrorClass::Fatal => {
                tracing::error!(%error, "fatal playback error");
                self.fail(error.clone());
                ErrorResponse::Fatal(error)
            }
        }
    }

    /// Issues the pending reload when its delay has elapsed.
    ///
    /// The resume position is the engine's current time, or the saved
    /// position when the engine has lost it.
    pub fn fire_if_due(&mut self, now: Instant, engine_time: f64) -> Option<ReloadRequest> {
        if !self.reload_timer.fire_if_due(now) || !self.pending_reload {
            return None;
        }
        self.pending_reload = false;
        let position = if engine_time > 0.0 {
            engine_time
        } else {
            self.saved_position
        };
        let resume_at = (position > 0.0).then_some(position);
        Some(self.begin_load(resume_at))
    }

    /// Allocates a ticket for a new load, superseding any load in flight.
    pub fn begin_load(&mut self, resume_at: Option<f64>) -> ReloadRequest {
        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        self.in_flight = Some((ticket, resume_at));
        ReloadRequest { ticket, resume_at }
    }

    /// Starts a fresh source: clears terminal and pending state.
    pub fn reset_for_source(&mut self) -> ReloadRequest {
        self.fatal = None;
        self.pending_reload = false;
        self.saved_position = 0.0;
        self.reload_timer.cancel();
        self.begin_load(None)
    }

    /// Applies the outcome of the load identified by `ticket`.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> LoadResolution {
        let Some((current, resume_at)) = self.in_flight else {
            return LoadResolution::Stale;
        };
        if current != ticket {
            tracing::debug!(?ticket, ?current, "dropping stale load completion");
            return LoadResolution::Stale;
        }
        match outcome {
            LoadOutcome::Loaded => {
                self.in_flight = None;
                LoadResolution::Resume(resume_at)
            }
            LoadOutcome::Superseded => LoadResolution::Superseded,
            LoadOutcome::Failed(error) => {
                self.in_flight = None;
                tracing::error!(%error, "reload exhausted its retries");
                self.fail(error.clone());
                LoadResolution::Fatal(error)
            }
        }
    }

    /// Cancels pending timers and forgets the in-flight load.
    pub fn teardown(&mut self) {
        self.reload_timer.cancel();
        self.pending_reload = false;
        self.in_flight = None;
    }

    #[must_use]
    pub fn is_page_visible(&self) -> bool {
        self.page_visible
    }

    #[must_use]
    pub fn is_reload_pending(&self) -> bool {
        self.pending_reload
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<LoadTicket> {
        self.in_flight.map(|(ticket, _)| ticket)
    }

    #[must_use]
    pub fn fatal(&self) -> Option<&EngineError> {
        self.fatal.as_ref()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.reload_timer.deadline()
    }

    fn fail(&mut self, error: EngineError) {
        self.fatal = Some(error);
        self.pending_reload = false;
        self.reload_timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::codes;
    use crate::test_utils::TestClock;

    fn recovery() -> Recovery {
        Recovery::new(&RecoveryConfig::default())
    }

    fn suspension() -> EngineError {
        EngineError::new(codes::VIDEO_ERROR, "decode suspended")
    }

    #[test]
    fn hiding_while_playing_requests_pause() {
        let mut state = recovery();
        assert!(state.page_hidden(true, 42.0));
        assert!(!state.page_hidden(false, 42.0));
        assert!(!state.is_page_visible());
    }

    #[test]
    fn hidden_error_waits_for_visibility_and_settle() {
        let clock = TestClock::new();
        let mut state = recovery();
        state.page_hidden(true, 42.0);

        assert_eq!(
            state.on_error(suspension(), clock.at(0), 0.0),
            ErrorResponse::ReloadPending
        );
        assert_eq!(state.deadline(), None);

        state.page_visible(clock.at(5_000));
        assert!(state.fire_if_due(clock.at(5_099), 0.0).is_none());
        let request = state.fire_if_due(clock.at(5_100), 0.0).expect("reload due");

        assert_eq!(request.resume_at, Some(42.0));
        assert!(!state.is_reload_pending());
        assert_eq!(state.in_flight(), Some(request.ticket));
    }

    #[test]
    fn engine_time_wins_over_saved_position() {
        let clock = TestClock::new();
        let mut state = recovery();
        state.page_hidden(true, 42.0);
        state.on_error(suspension(), clock.at(0), 0.0);
        state.page_visible(clock.at(1_000));

        let request = state.fire_if_due(clock.at(1_100), 43.5).expect("reload due");
        assert_eq!(request.resume_at, Some(43.5));
    }

    #[test]
    fn visible_error_reloads_after_short_delay() {
        let clock = TestClock::new();
        let mut state = recovery();

        state.on_error(suspension(), clock.at(0), 12.0);
        assert_eq!(state.deadline(), Some(clock.at(500)));
        let request = state.fire_if_due(clock.at(500), 0.0).expect("reload due");
        assert_eq!(request.resume_at, Some(12.0));
    }

    #[test]
    fn visibility_without_pending_reload_does_nothing() {
        let clock = TestClock::new();
        let mut state = recovery();
        state.page_hidden(true, 10.0);
        state.page_visible(clock.at(0));
        assert_eq!(state.deadline(), None);
    }

    #[test]
    fn zero_position_resumes_from_start() {
        let clock = TestClock::new();
        let mut state = recovery();
        state.on_error(suspension(), clock.at(0), 0.0);
        let request = state.fire_if_due(clock.at(500), 0.0).expect("reload due");
        assert_eq!(request.resume_at, None);
    }

    #[test]
    fn unknown_code_is_fatal_and_terminal() {
        let clock = TestClock::new();
        let mut state = recovery();
        let error = EngineError::new(6007, "license request failed");

        assert_eq!(
            state.on_error(error.clone(), clock.at(0), 3.0),
            ErrorResponse::Fatal(error)
        );
        assert_eq!(state.on_error(suspension(), clock.at(10), 3.0), ErrorResponse::Ignored);
        assert!(state.fatal().is_some());
        assert_eq!(state.deadline(), None);
    }

    #[test]
    fn interruption_is_ignored() {
        let clock = TestClock::new();
        let mut state = recovery();
        assert_eq!(
            state.on_error(EngineError::interrupted(), clock.at(0), 3.0),
            ErrorResponse::Ignored
        );
        assert!(!state.is_reload_pending());
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut state = recovery();
        let first = state.begin_load(Some(10.0));
        let second = state.begin_load(Some(20.0));

        assert_eq!(
            state.finish_load(first.ticket, LoadOutcome::Loaded),
            LoadResolution::Stale
        );
        assert_eq!(
            state.finish_load(second.ticket, LoadOutcome::Loaded),
            LoadResolution::Resume(Some(20.0))
        );
    }

    #[test]
    fn exhausted_reload_is_fatal() {
        let mut state = recovery();
        let request = state.begin_load(None);
        let error = EngineError::new(codes::HTTP_ERROR, "gone");

        assert_eq!(
            state.finish_load(request.ticket, LoadOutcome::Failed(error.clone())),
            LoadResolution::Fatal(error)
        );
        assert!(state.fatal().is_some());
    }

    #[test]
    fn new_source_clears_fatal_state() {
        let clock = TestClock::new();
        let mut state = recovery();
        state.on_error(EngineError::new(1, "boom"), clock.at(0), 0.0);
        state.reset_for_source();
        assert!(state.fatal().is_none());
    }
}
