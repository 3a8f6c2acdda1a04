// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! Infrastructure adapters implement these traits. They use only domain
//! types, so the controller is independent of any concrete engine.
//!
//! # Available Ports
//!
//! - [`engine`]: Decode engine commands, notifications and source loading

pub mod engine;

pub use engine::{DecodeEngine, EngineEvent, SourceLoader};
