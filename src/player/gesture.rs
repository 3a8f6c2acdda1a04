// SPDX-License-Identifier: MPL-2.0
//! Pointer and touch gesture disambiguation.
//!
//! A pointer-down starts a gesture of undetermined kind. Horizontal travel
//! past the scrub threshold promotes it to a scrub, which previews a position
//! until release commits it. Taps are resolved from clicks: two clicks close
//! in time and space form a double-tap whose horizontal zone decides the
//! action, while a lone click only resolves as a single tap once the
//! double-tap window has closed.

use super::timer::TimerSlot;
use crate::config::GestureConfig;
use crate::domain::video::{clamp_time, SeekDirection};
use std::time::Instant;

/// Kind of the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Not yet classified; may still end up as a tap.
    Undetermined,
    Scrub,
}

/// A gesture between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveGesture {
    pub kind: GestureKind,
    pub start_x: f64,
    pub start_time: f64,
    pub preview: Option<f64>,
}

/// Horizontal third of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZone {
    Left,
    Center,
    Right,
}

impl TapZone {
    /// Zone of `x` within a player `width` pixels wide.
    #[must_use]
    pub fn from_position(x: f64, width: f64) -> Self {
        if width <= 0.0 || !x.is_finite() {
            return Self::Center;
        }
        let third = width / 3.0;
        if x < third {
            Self::Left
        } else if x > width - third {
            Self::Right
        } else {
            Self::Center
        }
    }
}

/// Player geometry and timeline needed to interpret pointer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureContext {
    pub current_time: f64,
    pub duration: f64,
    pub width: f64,
}

/// Input to the disambiguator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    PointerDown { x: f64, contacts: usize },
    PointerMove { x: f64, contacts: usize },
    PointerUp { now: Instant },
    Click { x: f64, y: f64, now: Instant },
}

/// What the controller should do in response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    None,
    /// A single-contact gesture began.
    TouchStarted,
    /// The scrub preview moved.
    ScrubPreview { time: f64, delta_secs: f64 },
    /// A scrub ended; seek the engine to `time`.
    ScrubCommitted { time: f64 },
    /// A non-scrub gesture ended.
    TouchEnded,
    /// The touch linger elapsed; touch no longer holds controls open.
    TouchSettled,
    /// Double-tap in a side zone.
    ZoneSeek { direction: SeekDirection },
    /// Double-tap in the center zone.
    TogglePlayback,
    /// A click with no second click inside the window.
    SingleTap,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingTap {
    x: f64,
    y: f64,
    at: Instant,
}

/// Gesture disambiguator state.
#[derive(Debug, Clone)]
pub struct State {
    config: GestureConfig,
    active: Option<ActiveGesture>,
    did_scrub: bool,
    touching: bool,
    touch_release: TimerSlot,
    pending_tap: Option<PendingTap>,
    tap_timer: TimerSlot,
}

impl State {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            active: None,
            did_scrub: false,
            touching: false,
            touch_release: TimerSlot::default(),
            pending_tap: None,
            tap_timer: TimerSlot::default(),
        }
    }

    pub fn handle(&mut self, message: Message, ctx: &GestureContext) -> Effect {
        match message {
            Message::PointerDown { x, contacts } => self.pointer_down(x, contacts, ctx),
            Message::PointerMove { x, contacts } => self.pointer_move(x, contacts, ctx),
            Message::PointerUp { now } => self.pointer_up(now),
            Message::Click { x, y, now } => self.click(x, y, now, ctx),
        }
    }

    fn pointer_down(&mut self, x: f64, contacts: usize, ctx: &GestureContext) -> Effect {
        if contacts != 1 || ctx.duration <= 0.0 || !ctx.duration.is_finite() {
            return Effect::None;
        }
        self.active = Some(ActiveGesture {
            kind: GestureKind::Undetermined,
            start_x: x,
            start_time: ctx.current_time,
            preview: None,
        });
        self.did_scrub = false;
        self.touching = true;
        self.touch_release.cancel();
        Effect::TouchStarted
    }

    fn pointer_move(&mut self, x: f64, contacts: usize, ctx: &GestureContext) -> Effect {
        if contacts != 1 {
            return Effect::None;
        }
        let Some(gesture) = self.active.as_mut() else {
            return Effect::None;
        };

        let delta_x = x - gesture.start_x;
        if gesture.kind == GestureKind::Undetermined && delta_x.abs() > self.config.scrub_threshold_px
        {
            gesture.kind = GestureKind::Scrub;
        }
        if gesture.kind != GestureKind::Scrub {
            return Effect::None;
        }

        let time = scrub_preview_time(gesture.start_time, delta_x, ctx, &self.config);
        gesture.preview = Some(time);
        Effect::ScrubPreview {
            time,
            delta_secs: time - gesture.start_time,
        }
    }

    fn pointer_up(&mut self, now: Instant) -> Effect {
        let Some(gesture) = self.active.take() else {
            return Effect::None;
        };
        self.touch_release
            .arm(now, self.config.scrub_feedback_linger());

        match (gesture.kind, gesture.preview) {
            (GestureKind::Scrub, Some(time)) => {
                self.did_scrub = true;
                Effect::ScrubCommitted { time }
            }
            _ => Effect::TouchEnded,
        }
    }

    fn click(&mut self, x: f64, y: f64, now: Instant, ctx: &GestureContext) -> Effect {
        if self.did_scrub {
            self.did_scrub = false;
            return Effect::None;
        }

        let window = self.config.double_tap_window();
        let slop = self.config.double_tap_slop_px;
        let is_double = self.pending_tap.is_some_and(|first| {
            now.saturating_duration_since(first.at) < window
                && (x - first.x).abs() <= slop
                && (y - first.y).abs() <= slop
        });

        if is_double {
            self.pending_tap = None;
            self.tap_timer.cancel();
            return match TapZone::from_position(x, ctx.width) {
                TapZone::Left => Effect::ZoneSeek {
                    direction: SeekDirection::Backward,
                },
                TapZone::Right => Effect::ZoneSeek {
                    direction: SeekDirection::Forward,
                },
                TapZone::Center => Effect::TogglePlayback,
            };
        }

        self.pending_tap = Some(PendingTap { x, y, at: now });
        self.tap_timer.arm(now, window);
        Effect::None
    }

    /// Resolves timers that are due: deferred single taps and touch release.
    pub fn fire_due(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.tap_timer.fire_if_due(now) && self.pending_tap.take().is_some() {
            effects.push(Effect::SingleTap);
        }
        if self.touch_release.fire_if_due(now) {
            self.touching = false;
            effects.push(Effect::TouchSettled);
        }
        effects
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        super::timer::earliest([self.tap_timer.deadline(), self.touch_release.deadline()])
    }

    /// Drops any gesture in progress without committing it.
    pub fn cancel(&mut self) {
        self.active = None;
        self.did_scrub = false;
        self.touching = false;
        self.touch_release.cancel();
        self.pending_tap = None;
        self.tap_timer.cancel();
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveGesture> {
        self.active.as_ref()
    }

    /// True while a scrub preview is being dragged.
    #[must_use]
    pub fn is_scrubbing(&self) -> bool {
        self.active
            .is_some_and(|gesture| gesture.kind == GestureKind::Scrub)
    }

    /// True from pointer-down until the release linger elapses.
    #[must_use]
    pub fn is_touching(&self) -> bool {
        self.touching
    }

    #[must_use]
    pub fn did_scrub(&self) -> bool {
        self.did_scrub
    }
}

/// Preview position for a horizontal drag of `delta_x` pixels.
///
/// A full sweep of `width * sensitivity` pixels covers the whole timeline, or
/// the range cap for long videos.
#[must_use]
pub fn scrub_preview_time(
    start_time: f64,
    delta_x: f64,
    ctx: &GestureContext,
    config: &GestureConfig,
) -> f64 {
    let span = ctx.width * config.scrub_sensitivity;
    if span <= 0.0 {
        return clamp_time(start_time, ctx.duration);
    }
    let range = ctx.duration.min(config.scrub_range_cap_secs);
    clamp_time(start_time + (delta_x / span) * range, ctx.duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, TestClock};

    fn ctx(current_time: f64, duration: f64) -> GestureContext {
        GestureContext {
            current_time,
            duration,
            width: 900.0,
        }
    }

    fn down(state: &mut State, x: f64, c: &GestureContext) -> Effect {
        state.handle(Message::PointerDown { x, contacts: 1 }, c)
    }

    fn click(state: &mut State, x: f64, clock: &TestClock, ms: u64, c: &GestureContext) -> Effect {
        state.handle(
            Message::Click {
                x,
                y: 100.0,
                now: clock.at(ms),
            },
            c,
        )
    }

    #[test]
    fn zones_split_into_thirds() {
        assert_eq!(TapZone::from_position(100.0, 900.0), TapZone::Left);
        assert_eq!(TapZone::from_position(450.0, 900.0), TapZone::Center);
        assert_eq!(TapZone::from_position(800.0, 900.0), TapZone::Right);
    }

    #[test]
    fn small_move_stays_undetermined() {
        let clock = TestClock::new();
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());
        assert_eq!(down(&mut state, 300.0, &c), Effect::TouchStarted);

        let effect = state.handle(
            Message::PointerMove {
                x: 314.0,
                contacts: 1,
            },
            &c,
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(state.active().map(|g| g.kind), Some(GestureKind::Undetermined));
        assert_eq!(state.handle(Message::PointerUp { now: clock.at(50) }, &c), Effect::TouchEnded);
    }

    #[test]
    fn scrub_preview_follows_drag_and_commits() {
        let clock = TestClock::new();
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());
        down(&mut state, 300.0, &c);

        // 450 px of a 1800 px span over a 120 s range = 30 s
        let effect = state.handle(
            Message::PointerMove {
                x: 750.0,
                contacts: 1,
            },
            &c,
        );
        match effect {
            Effect::ScrubPreview { time, delta_secs } => {
                assert_abs_diff_eq!(time, 80.0);
                assert_abs_diff_eq!(delta_secs, 30.0);
            }
            other => panic!("expected preview, got {other:?}"),
        }
        assert!(state.is_scrubbing());

        let effect = state.handle(Message::PointerUp { now: clock.at(300) }, &c);
        assert_eq!(effect, Effect::ScrubCommitted { time: 80.0 });
        assert!(state.did_scrub());
        assert!(!state.is_scrubbing());
    }

    #[test]
    fn scrub_preview_is_clamped() {
        let c = ctx(5.0, 120.0);
        let config = GestureConfig::default();
        assert_abs_diff_eq!(scrub_preview_time(5.0, -900.0, &c, &config), 0.0);
        assert_abs_diff_eq!(scrub_preview_time(5.0, 5_000.0, &c, &config), 120.0);
    }

    #[test]
    fn scrub_range_is_capped_for_long_videos() {
        let c = ctx(0.0, 7_200.0);
        let config = GestureConfig::default();
        // full span covers the 600 s cap, not the whole two hours
        assert_abs_diff_eq!(scrub_preview_time(0.0, 1_800.0, &c, &config), 600.0);
    }

    #[test]
    fn click_after_scrub_is_swallowed_once() {
        let clock = TestClock::new();
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());
        down(&mut state, 300.0, &c);
        state.handle(
            Message::PointerMove {
                x: 400.0,
                contacts: 1,
            },
            &c,
        );
        state.handle(Message::PointerUp { now: clock.at(100) }, &c);

        assert_eq!(click(&mut state, 400.0, &clock, 110, &c), Effect::None);
        assert!(!state.did_scrub());
        assert!(state.fire_due(clock.at(1_000)).iter().all(|e| *e != Effect::SingleTap));

        click(&mut state, 400.0, &clock, 2_000, &c);
        assert!(state.fire_due(clock.at(2_300)).contains(&Effect::SingleTap));
    }

    #[test]
    fn multi_touch_is_ignored() {
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());
        let effect = state.handle(
            Message::PointerDown {
                x: 10.0,
                contacts: 2,
            },
            &c,
        );
        assert_eq!(effect, Effect::None);
        assert!(state.active().is_none());
        assert!(!state.is_touching());
    }

    #[test]
    fn down_without_duration_is_ignored() {
        let mut state = State::new(GestureConfig::default());
        assert_eq!(down(&mut state, 10.0, &ctx(0.0, 0.0)), Effect::None);
    }

    #[test]
    fn double_tap_left_seeks_backward_without_single_tap() {
        let clock = TestClock::new();
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());

        assert_eq!(click(&mut state, 100.0, &clock, 0, &c), Effect::None);
        assert_eq!(
            click(&mut state, 105.0, &clock, 200, &c),
            Effect::ZoneSeek {
                direction: SeekDirection::Backward
            }
        );
        assert!(state.fire_due(clock.at(1_000)).is_empty());
    }

    #[test]
    fn double_tap_center_toggles_playback() {
        let clock = TestClock::new();
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());
        click(&mut state, 450.0, &clock, 0, &c);
        assert_eq!(click(&mut state, 450.0, &clock, 150, &c), Effect::TogglePlayback);
    }

    #[test]
    fn slow_second_tap_is_two_single_taps() {
        let clock = TestClock::new();
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());
        click(&mut state, 800.0, &clock, 0, &c);
        assert_eq!(state.fire_due(clock.at(300)), vec![Effect::SingleTap]);
        assert_eq!(click(&mut state, 800.0, &clock, 350, &c), Effect::None);
        assert_eq!(state.fire_due(clock.at(650)), vec![Effect::SingleTap]);
    }

    #[test]
    fn distant_second_tap_is_not_a_double_tap() {
        let clock = TestClock::new();
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());
        click(&mut state, 100.0, &clock, 0, &c);
        assert_eq!(click(&mut state, 800.0, &clock, 100, &c), Effect::None);
    }

    #[test]
    fn touch_settles_after_linger() {
        let clock = TestClock::new();
        let c = ctx(50.0, 120.0);
        let mut state = State::new(GestureConfig::default());
        down(&mut state, 300.0, &c);
        state.handle(Message::PointerUp { now: clock.at(100) }, &c);
        assert!(state.is_touching());

        assert!(state.fire_due(clock.at(499)).is_empty());
        assert_eq!(state.fire_due(clock.at(500)), vec![Effect::TouchSettled]);
        assert!(!state.is_touching());
    }
}
