// SPDX-License-Identifier: MPL-2.0
//! Declarative view of the player for the rendering layer.

use super::arbiter::LoadingState;
use super::controls::Menu;
use super::feedback::{ContinuousSeekFeedback, ScrubFeedback, SeekFeedback, VolumeFeedback};
use super::quality::QualityOption;
use super::time_format::format_time;
use crate::domain::video::TrackId;
use serde::Serialize;

/// Everything the host needs to render one frame of UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub buffered_end: f64,
    /// Scrub preview while dragging, otherwise the current time.
    pub display_time: f64,
    pub loading_state: LoadingState,
    pub controls_shown: bool,
    pub open_menu: Option<Menu>,
    pub seek_feedback: Option<SeekFeedback>,
    pub scrub_feedback: Option<ScrubFeedback>,
    pub continuous_seek_feedback: Option<ContinuousSeekFeedback>,
    pub volume_feedback: Option<VolumeFeedback>,
    pub screenshot_active: bool,
    pub available_qualities: Vec<QualityOption>,
    /// `None` means automatic quality.
    pub selected_quality: Option<TrackId>,
    pub playback_rate: f64,
    pub volume: f64,
    pub muted: bool,
    pub fullscreen: bool,
    pub fatal_error: Option<String>,
}

impl PlayerSnapshot {
    /// Time label as shown next to the progress bar, e.g. `01:05 / 10:00`.
    #[must_use]
    pub fn time_label(&self) -> String {
        format!("{} / {}", format_time(self.display_time), format_time(self.duration))
    }

    /// Played fraction of the timeline in percent.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (self.display_time / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    /// Buffered fraction of the timeline in percent.
    #[must_use]
    pub fn buffered_percent(&self) -> f64 {
        if self.duration > 0.0 {
            (self.buffered_end / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}
