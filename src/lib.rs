// SPDX-License-Identifier: MPL-2.0
//! `lecture_player` is the adaptive playback controller of a lecture video
//! player.
//!
//! It sits between a decode engine and the UI: it disambiguates touch and
//! pointer gestures, accelerates press-and-hold seeking, decides which loading
//! indicator to show, schedules control auto-hide, and recovers from
//! background-tab suspension by reloading and seeking back.
//!
//! The controller is a synchronous, time-injected state machine
//! ([`player::Controller`]); [`player::session`] drives it on tokio.

#![doc(html_root_url = "https://docs.rs/lecture_player/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod player;
pub mod scenario;

#[cfg(test)]
pub(crate) mod test_utils;
