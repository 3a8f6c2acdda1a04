// SPDX-License-Identifier: MPL-2.0
//! Video playback domain types.
//!
//! This module contains playback value objects that are independent of any
//! host or engine concerns.

pub mod frame;
pub mod newtypes;
pub mod playback;
pub mod source;

pub use frame::RawFrame;
pub use newtypes::{PlaybackRate, Volume};
pub use playback::{clamp_time, PlaybackClock, SeekDirection};
pub use source::{DrmConfig, SourceDescriptor, TrackId, VariantTrack};
