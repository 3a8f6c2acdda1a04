// SPDX-License-Identifier: MPL-2.0
//! Time formatting and hold-seek rate math.

use crate::config::SeekConfig;
use std::time::Duration;

/// Formats seconds as `MM:SS`, rounding to the nearest second.
///
/// Minutes are not wrapped into hours. NaN and infinities render as `00:00`;
/// negative values clamp to zero.
#[must_use]
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() {
        return "00:00".to_string();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = secs.max(0.0).round() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Formats a seek label.
///
/// Offsets render as a signed whole number of seconds (`+10s`, `-5s`);
/// absolute times fall through to [`format_time`].
#[must_use]
pub fn format_seek_time(secs: f64, is_offset: bool) -> String {
    if !is_offset {
        return format_time(secs);
    }
    if !secs.is_finite() {
        return "+0s".to_string();
    }
    #[allow(clippy::cast_possible_truncation)]
    let rounded = secs.round() as i64;
    if rounded >= 0 {
        format!("+{rounded}s")
    } else {
        format!("{rounded}s")
    }
}

/// Multiplier for a hold that has lasted `held`.
///
/// `1` until the acceleration threshold, then one more per full second held,
/// capped at the configured ceiling.
#[must_use]
pub fn seek_multiplier(held: Duration, config: &SeekConfig) -> u32 {
    let threshold = config.accel_threshold();
    let ceiling = config.multiplier_ceiling();
    if held < threshold {
        return 1;
    }
    let extra_secs = (held - threshold).as_secs();
    let extra = u32::try_from(extra_secs).unwrap_or(u32::MAX);
    extra.saturating_add(1).min(ceiling)
}

/// Minimum time between two applied hold-seek steps at `multiplier`.
#[must_use]
pub fn step_interval(multiplier: u32, config: &SeekConfig) -> Duration {
    let base = Duration::from_millis(config.base_interval_ms);
    let floor = Duration::from_millis(config.min_interval_ms);
    (base / multiplier.max(1)).max(floor)
}

/// File name for a captured frame at `secs`, e.g. `screenshot-01-05.png`.
#[must_use]
pub fn capture_file_name(prefix: &str, secs: f64) -> String {
    format!("{prefix}-{}.png", format_time(secs).replace(':', "-"))
}
