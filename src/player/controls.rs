// SPDX-License-Identifier: MPL-2.0
//! Auto-hiding player controls.
//!
//! Controls hide after a period of inactivity, but only while nothing vetoes
//! it. Each veto is a [`SuppressionReason`]; while any reason holds no hide
//! timer is pending. There is exactly one hide slot, so re-arming always
//! replaces the previous deadline.

use super::timer::TimerSlot;
use crate::config::ControlsConfig;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// A condition that keeps controls from auto-hiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionReason {
    /// A finger is on the player (or just lifted).
    Touch,
    /// The quality or rate menu is open.
    MenuOpen,
    /// A seek, scrub or hold gesture is in progress.
    SeekGesture,
    /// Playback is paused or not started.
    NotPlaying,
    /// The player is not fullscreen; controls are always shown.
    NotFullscreen,
}

impl SuppressionReason {
    fn bit(self) -> u8 {
        match self {
            Self::Touch => 1,
            Self::MenuOpen => 1 << 1,
            Self::SeekGesture => 1 << 2,
            Self::NotPlaying => 1 << 3,
            Self::NotFullscreen => 1 << 4,
        }
    }
}

/// Set of active suppression reasons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Suppression(u8);

impl Suppression {
    #[must_use]
    pub fn contains(self, reason: SuppressionReason) -> bool {
        self.0 & reason.bit() != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn set(&mut self, reason: SuppressionReason, active: bool) {
        if active {
            self.0 |= reason.bit();
        } else {
            self.0 &= !reason.bit();
        }
    }
}

/// Settings menus that can be open over the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Menu {
    Quality,
    Rate,
}

/// Visibility scheduler state.
#[derive(Debug, Clone)]
pub struct ControlsVisibility {
    shown: bool,
    suppression: Suppression,
    hide_timer: TimerSlot,
    hide_delay: Duration,
    open_menu: Option<Menu>,
}

impl ControlsVisibility {
    /// Starts shown, paused and windowed.
    #[must_use]
    pub fn new(config: &ControlsConfig) -> Self {
        let mut suppression = Suppression::default();
        suppression.set(SuppressionReason::NotPlaying, true);
        suppression.set(SuppressionReason::NotFullscreen, true);
        Self {
            shown: true,
            suppression,
            hide_timer: TimerSlot::default(),
            hide_delay: config.hide_delay(),
            open_menu: None,
        }
    }

    /// Updates one suppression reason and re-evaluates the hide timer.
    pub fn set_reason(&mut self, reason: SuppressionReason, active: bool, now: Instant) {
        if self.suppression.contains(reason) == active {
            return;
        }
        self.suppression.set(reason, active);
        if reason == SuppressionReason::NotFullscreen && active {
            self.shown = true;
        }
        self.reschedule(now);
    }

    /// Shows the controls and restarts the inactivity countdown.
    pub fn show(&mut self, now: Instant) {
        self.shown = true;
        self.reschedule(now);
    }

    /// Restarts the inactivity countdown if the controls are on screen.
    /// Hidden controls stay hidden.
    pub fn rearm(&mut self, now: Instant) {
        self.reschedule(now);
    }

    /// Flips visibility. Outside fullscreen the controls stay shown.
    pub fn toggle(&mut self, now: Instant) {
        if self.shown {
            self.hide();
        } else {
            self.show(now);
        }
    }

    /// Opens a menu, closing any other. An open menu vetoes auto-hide.
    pub fn open_menu(&mut self, menu: Menu, now: Instant) {
        self.open_menu = Some(menu);
        self.shown = true;
        self.set_reason(SuppressionReason::MenuOpen, true, now);
    }

    pub fn close_menus(&mut self, now: Instant) {
        self.open_menu = None;
        self.set_reason(SuppressionReason::MenuOpen, false, now);
    }

    /// Hides the controls when the hide timer is due. Returns true if hidden.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if !self.hide_timer.fire_if_due(now) {
            return false;
        }
        self.hide();
        true
    }

    /// Cancels the pending hide without changing visibility.
    pub fn cancel(&mut self) {
        self.hide_timer.cancel();
    }

    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    #[must_use]
    pub fn open(&self) -> Option<Menu> {
        self.open_menu
    }

    #[must_use]
    pub fn suppression(&self) -> Suppression {
        self.suppression
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.hide_timer.deadline()
    }

    fn hide(&mut self) {
        self.hide_timer.cancel();
        if self.suppression.contains(SuppressionReason::NotFullscreen) {
            return;
        }
        self.shown = false;
        self.open_menu = None;
        self.suppression.set(SuppressionReason::MenuOpen, false);
    }

    fn reschedule(&mut self, now: Instant) {
        if self.shown && self.suppression.is_empty() {
            self.hide_timer.arm(now, self.hide_delay);
        } else {
            self.hide_timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestClock;

    /// Fullscreen and playing: nothing vetoes auto-hide.
    fn playing_fullscreen(clock: &TestClock) -> ControlsVisibility {
        let mut controls = ControlsVisibility::new(&ControlsConfig::default());
        controls.set_reason(SuppressionReason::NotFullscreen, false, clock.at(0));
        controls.set_reason(SuppressionReason::NotPlaying, false, clock.at(0));
        controls
    }

    #[test]
    fn windowed_controls_never_arm() {
        let clock = TestClock::new();
        let mut controls = ControlsVisibility::new(&ControlsConfig::default());
        controls.set_reason(SuppressionReason::NotPlaying, false, clock.at(0));
        controls.show(clock.at(0));

        assert_eq!(controls.deadline(), None);
        controls.toggle(clock.at(10));
        assert!(controls.is_shown());
    }

    #[test]
    fn hides_after_delay_when_unsuppressed() {
        let clock = TestClock::new();
        let mut controls = playing_fullscreen(&clock);

        assert_eq!(controls.deadline(), Some(clock.at(3_500)));
        assert!(!controls.fire_if_due(clock.at(3_499)));
        assert!(controls.fire_if_due(clock.at(3_500)));
        assert!(!controls.is_shown());
    }

    #[test]
    fn suppression_cancels_and_clearing_rearms() {
        let clock = TestClock::new();
        let mut controls = playing_fullscreen(&clock);

        controls.set_reason(SuppressionReason::Touch, true, clock.at(1_000));
        assert_eq!(controls.deadline(), None);
        assert!(!controls.fire_if_due(clock.at(10_000)));
        assert!(controls.is_shown());

        controls.set_reason(SuppressionReason::Touch, false, clock.at(10_000));
        assert_eq!(controls.deadline(), Some(clock.at(13_500)));
    }

    #[test]
    fn interaction_replaces_pending_timer() {
        let clock = TestClock::new();
        let mut controls = playing_fullscreen(&clock);
        controls.show(clock.at(2_000));

        assert!(!controls.fire_if_due(clock.at(3_500)));
        assert!(controls.fire_if_due(clock.at(5_500)));
    }

    #[test]
    fn rearm_restarts_countdown_but_never_reveals() {
        let clock = TestClock::new();
        let mut controls = playing_fullscreen(&clock);
        controls.rearm(clock.at(2_000));
        assert_eq!(controls.deadline(), Some(clock.at(5_500)));

        assert!(controls.fire_if_due(clock.at(5_500)));
        controls.rearm(clock.at(6_000));
        assert!(!controls.is_shown());
        assert_eq!(controls.deadline(), None);
    }

    #[test]
    fn leaving_fullscreen_forces_shown() {
        let clock = TestClock::new();
        let mut controls = playing_fullscreen(&clock);
        controls.fire_if_due(clock.at(3_500));
        assert!(!controls.is_shown());

        controls.set_reason(SuppressionReason::NotFullscreen, true, clock.at(4_000));
        assert!(controls.is_shown());
        assert_eq!(controls.deadline(), None);
    }

    #[test]
    fn open_menu_blocks_hide_and_closing_rearms() {
        let clock = TestClock::new();
        let mut controls = playing_fullscreen(&clock);
        controls.open_menu(Menu::Quality, clock.at(1_000));
        assert_eq!(controls.deadline(), None);
        assert_eq!(controls.open(), Some(Menu::Quality));

        controls.close_menus(clock.at(2_000));
        assert_eq!(controls.open(), None);
        assert_eq!(controls.deadline(), Some(clock.at(5_500)));
    }

    #[test]
    fn clearing_reasons_while_hidden_does_not_arm() {
        let clock = TestClock::new();
        let mut controls = playing_fullscreen(&clock);
        controls.toggle(clock.at(100));
        assert!(!controls.is_shown());

        controls.set_reason(SuppressionReason::SeekGesture, true, clock.at(200));
        controls.set_reason(SuppressionReason::SeekGesture, false, clock.at(300));
        assert_eq!(controls.deadline(), None);
    }
}
