// SPDX-License-Identifier: MPL-2.0
//! Decode-engine port definition.
//!
//! The controller never decodes media itself. It drives an adaptive streaming
//! engine through [`DecodeEngine`], receives its notifications as
//! [`EngineEvent`]s, and (re)loads sources through a [`SourceLoader`].
//!
//! # Design Notes
//!
//! - Engine commands are synchronous and infallible from the controller's
//!   point of view; failures surface later as [`EngineEvent::Error`]
//! - Loading is the only asynchronous operation and lives on its own trait so
//!   a load can be in flight while the controller keeps handling input
//! - Uses domain types only ([`SourceDescriptor`], [`VariantTrack`],
//!   [`RawFrame`], [`EngineError`])

use crate::domain::error::EngineError;
use crate::domain::video::{RawFrame, SourceDescriptor, TrackId, VariantTrack};
use futures_util::future::BoxFuture;

// =============================================================================
// DecodeEngine Trait
// =============================================================================

/// Port for commanding the decode engine.
///
/// Implementations wrap a media element plus an adaptive streaming player.
/// Commands take effect asynchronously on the engine side; the resulting state
/// changes are reported back through [`EngineEvent`]s.
pub trait DecodeEngine {
    fn play(&mut self);

    fn pause(&mut self);

    /// Moves the playhead to `time_secs`.
    fn seek(&mut self, time_secs: f64);

    /// Current playhead position in seconds.
    fn current_time(&self) -> f64;

    fn set_volume(&mut self, level: f64);

    fn set_muted(&mut self, muted: bool);

    fn set_playback_rate(&mut self, rate: f64);

    /// Variant tracks of the loaded manifest, in engine order.
    fn variant_tracks(&self) -> Vec<VariantTrack>;

    /// Whether adaptive bitrate switching is on.
    fn is_abr_enabled(&self) -> bool;

    fn set_abr_enabled(&mut self, enabled: bool);

    /// Pins playback to `track`. Callers disable ABR separately.
    fn select_variant(&mut self, track: TrackId);

    /// Grabs the frame currently displayed, if the engine has one.
    ///
    /// Protected or not-yet-decoded content may yield `None` or a black frame.
    fn grab_frame(&mut self) -> Option<RawFrame>;
}

// =============================================================================
// SourceLoader Trait
// =============================================================================

/// Port for loading a source into the engine.
///
/// Loading is the only asynchronous engine operation. Starting a new load
/// interrupts any load in progress; the interrupted load resolves with an
/// error whose class is [`ErrorClass::Interrupted`](crate::domain::error::ErrorClass::Interrupted).
pub trait SourceLoader {
    /// Loads `source`, resolving once the manifest is parsed and playable.
    ///
    /// # Errors
    ///
    /// Resolves to an [`EngineError`] when the manifest or license request
    /// fails, or when a newer load interrupted this one.
    fn load(&self, source: &SourceDescriptor) -> BoxFuture<'static, Result<(), EngineError>>;
}

// =============================================================================
// Engine Events
// =============================================================================

/// Notifications from the engine to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Playing,
    Paused,
    /// Periodic playhead update.
    TimeUpdate { time_secs: f64 },
    DurationChanged { duration_secs: f64 },
    /// Buffered range end moved.
    Progress { buffered_end_secs: f64 },
    /// The engine started seeking.
    Seeking,
    /// The engine finished seeking.
    Seeked,
    /// Buffering started (`true`) or ended (`false`).
    Buffering(bool),
    RateChanged { rate: f64 },
    VolumeChanged { level: f64, muted: bool },
    /// The variant track list or the active track changed.
    TracksChanged,
    Error(EngineError),
}
