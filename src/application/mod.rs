// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports the controller is written against.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The player controller uses only the ports, never an adapter

pub mod port;
