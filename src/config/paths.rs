// SPDX-License-Identifier: MPL-2.0
//! Config directory resolution.
//!
//! # Resolution Order
//!
//! 1. **Explicit override** - parameter to [`config_dir_with_override`] (tests, CLI)
//! 2. **Environment variable** `LECTURE_PLAYER_CONFIG_DIR`
//! 3. **Platform default** - via `dirs` crate, with the app name appended

use std::path::PathBuf;

/// Application name used for directory naming.
const APP_NAME: &str = "LecturePlayer";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "LECTURE_PLAYER_CONFIG_DIR";

/// Returns the config directory, honoring the override order above.
///
/// Returns `None` if no directory can be determined (rare edge case).
#[must_use]
pub fn config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_DIR) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}
