// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for unit tests.
//!
//! Playback times, volumes and rates are `f64`; compare them with the `approx`
//! macros re-exported here rather than `assert_eq!`.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use std::time::{Duration, Instant};

/// Default epsilon for f64 comparisons of seconds and levels.
pub const F64_EPSILON: f64 = 1e-10;

/// A fixed starting instant plus a helper to offset it in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct TestClock {
    pub origin: Instant,
}

impl TestClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// The origin advanced by `ms` milliseconds.
    #[must_use]
    pub fn at(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}
