// SPDX-License-Identifier: MPL-2.0
//! Domain layer - core playback types.
//!
//! This module contains pure domain types, value objects, and business rules.
//! Apart from serde derives it depends only on `std`.
//!
//! # Modules
//!
//! - [`error`]: Engine error reports ([`EngineError`](error::EngineError),
//!   [`ErrorClass`](error::ErrorClass))
//! - [`video`]: Playback types ([`PlaybackClock`](video::PlaybackClock),
//!   [`Volume`](video::Volume), [`PlaybackRate`](video::PlaybackRate),
//!   [`SourceDescriptor`](video::SourceDescriptor))

pub mod error;
pub mod video;
