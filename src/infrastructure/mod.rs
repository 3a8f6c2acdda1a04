// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`simulated`]: In-memory engine and loader (implement [`DecodeEngine`]
//!   and [`SourceLoader`]) used by the scenario runner and tests
//!
//! [`DecodeEngine`]: crate::application::port::DecodeEngine
//! [`SourceLoader`]: crate::application::port::SourceLoader

pub mod simulated;

pub use simulated::{EngineCommand, LoadRequest, SimulatedEngine, SimulatedLoader};
