// SPDX-License-Identifier: MPL-2.0
//! Quality and playback-rate menus.

use crate::domain::video::{PlaybackRate, TrackId, VariantTrack};
use serde::{Deserialize, Serialize};

/// One entry of the quality menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityOption {
    pub id: TrackId,
    pub height: u32,
    pub bandwidth: u64,
    pub label: String,
}

/// Quality choice. `Auto` hands control back to adaptive bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualitySelection {
    Auto,
    Track(TrackId),
}

/// Video variants sorted by height, tallest first, then by bandwidth.
/// Audio-only variants are dropped. Variants sharing a height are all kept so
/// the active track is always listed.
#[must_use]
pub fn available_qualities(tracks: &[VariantTrack]) -> Vec<QualityOption> {
    let mut options: Vec<QualityOption> = tracks
        .iter()
        .filter_map(|track| {
            track.height.map(|height| QualityOption {
                id: track.id,
                height,
                bandwidth: track.bandwidth,
                label: track.label(),
            })
        })
        .collect();
    options.sort_by(|a, b| {
        b.height
            .cmp(&a.height)
            .then_with(|| b.bandwidth.cmp(&a.bandwidth))
    });
    options
}

/// The selected track, or `None` while adaptive bitrate is on.
#[must_use]
pub fn selected_quality(tracks: &[VariantTrack], abr_enabled: bool) -> Option<TrackId> {
    if abr_enabled {
        return None;
    }
    tracks.iter().find(|track| track.active).map(|track| track.id)
}

/// Snaps a requested rate to the closest configured preset.
#[must_use]
pub fn snap_rate(requested: f64, presets: &[f64]) -> PlaybackRate {
    PlaybackRate::new(requested).nearest_preset(presets)
}
