//! Logical keys and key-name mapping

use serde::{Deserialize, Serialize};

/// Keys the shooter reacts to. Everything else is dropped at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    /// Toggles pause; not a held flag
    Pause,
}

impl Key {
    /// Map a DOM-style key name (`KeyboardEvent.key`) to a logical key
    pub fn from_name(name: &str) -> Option<Self> {
        if name == " " {
            return Some(Key::Fire);
        }
        match name.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Key::Up),
            "s" | "arrowdown" => Some(Key::Down),
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            "space" | "spacebar" => Some(Key::Fire),
            "escape" | "esc" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// A discrete press or release forwarded by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Pressed(Key),
    Released(Key),
}

impl InputEvent {
    /// Build from a key name; unknown keys yield `None`
    pub fn from_name(name: &str, pressed: bool) -> Option<Self> {
        Key::from_name(name).map(|key| {
            if pressed {
                InputEvent::Pressed(key)
            } else {
                InputEvent::Released(key)
            }
        })
    }
}
