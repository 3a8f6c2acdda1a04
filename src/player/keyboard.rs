// SPDX-License-Identifier: MPL-2.0
//! Keyboard shortcuts.
//!
//! | Key | Action |
//! |-----|--------|
//! | Space | Play / pause |
//! | F | Toggle fullscreen |
//! | M | Toggle mute |
//! | S | Capture frame |
//! | ← / → | Seek 5 s, then hold-seek while held |
//! | ↑ / ↓ | Volume up / down |
//!
//! Shortcuts only apply while the pointer is over the player or it is
//! fullscreen, and never while a text field has focus. Auto-repeat is
//! collapsed: a key acts once per physical press.

use crate::domain::video::SeekDirection;
use std::collections::HashSet;

/// A key as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Character(char),
    Other(String),
}

impl Key {
    /// Parses a DOM-style key name (`" "`, `"ArrowLeft"`, `"f"`).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            " " | "Space" | "Spacebar" => Self::Space,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Other(name.to_string()),
                }
            }
        }
    }
}

/// Where keyboard focus and the pointer are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    pub pointer_over_player: bool,
    pub fullscreen: bool,
    pub text_input_focused: bool,
}

impl KeyContext {
    #[must_use]
    pub fn accepts_shortcuts(&self) -> bool {
        (self.pointer_over_player || self.fullscreen) && !self.text_input_focused
    }
}

/// A resolved shortcut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    TogglePlayPause,
    ToggleFullscreen,
    ToggleMute,
    CaptureFrame,
    /// Single seek step, then start holding in that direction.
    SeekAndHold(SeekDirection),
    /// Arrow released.
    ReleaseHold,
    /// Volume step up (`+1.0`) or down (`-1.0`).
    Volume(f64),
}

/// Keys currently held, for auto-repeat suppression.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    pressed: HashSet<Key>,
}

impl Keyboard {
    /// Handles a key press. Repeats of a held key resolve to nothing.
    pub fn key_down(&mut self, key: Key, ctx: KeyContext) -> Option<KeyAction> {
        if !ctx.accepts_shortcuts() {
            return None;
        }
        if !self.pressed.insert(key.clone()) {
            return None;
        }

        match key {
            Key::Space => Some(KeyAction::TogglePlayPause),
            Key::ArrowRight => Some(KeyAction::SeekAndHold(SeekDirection::Forward)),
            Key::ArrowLeft => Some(KeyAction::SeekAndHold(SeekDirection::Backward)),
            Key::ArrowUp => Some(KeyAction::Volume(1.0)),
            Key::ArrowDown => Some(KeyAction::Volume(-1.0)),
            Key::Character(c) => match c.to_ascii_lowercase() {
                ' ' => Some(KeyAction::TogglePlayPause),
                'f' => Some(KeyAction::ToggleFullscreen),
                'm' => Some(KeyAction::ToggleMute),
                's' => Some(KeyAction::CaptureFrame),
                _ => None,
            },
            Key::Other(_) => None,
        }
    }

    /// Handles a key release. Releasing an arrow always ends a hold.
    pub fn key_up(&mut self, key: &Key) -> Option<KeyAction> {
        self.pressed.remove(key);
        match key {
            Key::ArrowLeft | Key::ArrowRight => Some(KeyAction::ReleaseHold),
            _ => None,
        }
    }

    /// Forgets held keys, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.pressed.clear();
    }
}
