// SPDX-License-Identifier: MPL-2.0
//! Adaptive playback controller for lecture videos.
//!
//! The controller sits between a decode engine and the UI. It turns pointer,
//! keyboard and visibility input into engine commands, keeps the overlays
//! (seek feedback, controls, loading indicator) consistent, and recovers from
//! background-tab suspension by reloading and seeking back.

pub mod arbiter;
pub mod capture;
pub mod continuous_seek;
mod controller;
pub mod controls;
pub mod feedback;
pub mod gesture;
pub mod keyboard;
pub mod quality;
pub mod recovery;
pub mod retry;
pub mod session;
mod snapshot;
pub mod time_format;
pub mod timer;

pub use arbiter::LoadingState;
pub use capture::{CaptureQuality, CapturedFrame};
pub use controller::{Command, Controller, Effect, Message};
pub use controls::Menu;
pub use keyboard::Key;
pub use quality::{QualityOption, QualitySelection};
pub use recovery::LoadTicket;
pub use retry::{load_with_retry, LoadOutcome, RetryPolicy};
pub use session::SessionEvent;
pub use snapshot::PlayerSnapshot;

use crate::application::port::DecodeEngine;
use crate::config::PlayerConfig;

/// Creates a controller over `engine` with the given configuration.
pub fn create_controller<E: DecodeEngine>(config: PlayerConfig, engine: E) -> Controller<E> {
    Controller::new(config, engine)
}
