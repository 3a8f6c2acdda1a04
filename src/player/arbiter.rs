// SPDX-License-Identifier: MPL-2.0
//! Picks the one loading indicator to show.
//!
//! Several activities can be in flight at once (the engine may report
//! buffering while a scrub preview is up). Only one indicator is rendered, in
//! this priority order:
//!
//! 1. scrubbing
//! 2. continuous seeking
//! 3. single-seek feedback, which suppresses the generic spinner entirely
//! 4. engine seeking
//! 5. engine buffering

use serde::Serialize;

/// The loading indicator currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadingState {
    #[default]
    None,
    Buffering,
    Seeking,
    Scrubbing,
    ContinuousSeeking,
}

/// Activity flags the arbiter chooses from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArbiterInputs {
    pub buffering: bool,
    pub seeking: bool,
    pub scrubbing: bool,
    pub continuous_seeking: bool,
    pub single_seek_feedback: bool,
}

/// Resolves the indicator for the given activity flags.
#[must_use]
pub fn resolve(inputs: ArbiterInputs) -> LoadingState {
    if inputs.scrubbing {
        LoadingState::Scrubbing
    } else if inputs.continuous_seeking {
        LoadingState::ContinuousSeeking
    } else if inputs.single_seek_feedback {
        LoadingState::None
    } else if inputs.seeking {
        LoadingState::Seeking
    } else if inputs.buffering {
        LoadingState::Buffering
    } else {
        LoadingState::None
    }
}
