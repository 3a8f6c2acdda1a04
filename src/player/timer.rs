// SPDX-License-Identifier: MPL-2.0
//! Single-occupancy timer and frame-loop handles.
//!
//! Each logical timer of the controller is one [`TimerSlot`]. Arming a slot
//! replaces whatever was pending, so at most one instance of a given timer can
//! ever fire. The host owns the real waiting: it asks the controller for the
//! earliest deadline and calls back once that instant has passed.

use std::time::{Duration, Instant};

/// A timer slot holding at most one pending deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Instant>,
}

impl TimerSlot {
    /// Arms the slot to fire `delay` after `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Clears the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true (and disarms) if the deadline has been reached.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Handle for a per-frame callback loop.
///
/// Running means the host should deliver frame ticks. Stopping is idempotent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameLoop {
    running: bool,
}

impl FrameLoop {
    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Earliest of a set of optional deadlines.
#[must_use]
pub fn earliest<I>(deadlines: I) -> Option<Instant>
where
    I: IntoIterator<Item = Option<Instant>>,
{
    deadlines.into_iter().flatten().min()
}
