// SPDX-License-Identifier: MPL-2.0
//! Decode-engine error reports and their classification.
//!
//! The engine reports errors as a numeric code plus a message. Codes are
//! mapped onto [`ErrorClass`] through one exhaustive match so that the
//! recovery path never dispatches on raw numbers.

use std::fmt;

/// Numeric error codes reported by the decode engine.
pub mod codes {
    /// A network request failed (seen when a suspended tab drops its sockets).
    pub const HTTP_ERROR: u32 = 1003;
    /// The media element reported a decode error (seen after tab suspension).
    pub const VIDEO_ERROR: u32 = 3016;
    /// A load was interrupted by a newer load request.
    pub const LOAD_INTERRUPTED: u32 = 7000;
}

/// How the controller reacts to an engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Load interrupted by background suspension; reload and seek back.
    BackgroundSuspension,
    /// A load superseded by a newer load; expected and silent.
    Interrupted,
    /// Anything else; terminal until the source is reloaded manually.
    Fatal,
}

impl ErrorClass {
    /// Classifies a raw engine error code.
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            codes::HTTP_ERROR | codes::VIDEO_ERROR => Self::BackgroundSuspension,
            codes::LOAD_INTERRUPTED => Self::Interrupted,
            _ => Self::Fatal,
        }
    }
}

/// An error reported by the decode engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub code: u32,
    pub message: String,
}

impl EngineError {
    #[must_use]
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A load interrupted by a newer load request.
    #[must_use]
    pub fn interrupted() -> Self {
        Self::new(codes::LOAD_INTERRUPTED, "load interrupted by a newer request")
    }

    #[must_use]
    pub fn class(&self) -> ErrorClass {
        ErrorClass::from_code(self.code)
    }

    #[must_use]
    pub fn is_interruption(&self) -> bool {
        self.class() == ErrorClass::Interrupted
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Code: {})", self.message, self.code)
    }
}

impl std::error::Error for EngineError {}
