//! Input events for widgets.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Key released
    KeyUp {
        /// Key released
        key: Key,
    },
    /// Text input received
    TextInput {
        /// Input text
        text: String,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
}

/// Keyboard key identifiers.
///
/// Variant names follow the short form; the DOM `KeyboardEvent.code` names
/// of the arrow keys are accepted as serde aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Space key
    Space,
    /// Delete key
    Delete,
    /// Home key
    Home,
    /// End key
    End,
    /// Up arrow
    #[serde(alias = "ArrowUp")]
    Up,
    /// Down arrow
    #[serde(alias = "ArrowDown")]
    Down,
    /// Left arrow
    #[serde(alias = "ArrowLeft")]
    Left,
    /// Right arrow
    #[serde(alias = "ArrowRight")]
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_deserializes_dom_alias() {
        let key: Key = serde_json::from_str("\"ArrowDown\"").unwrap();
        assert_eq!(key, Key::Down);
        let key: Key = serde_json::from_str("\"Escape\"").unwrap();
        assert_eq!(key, Key::Escape);
    }
}
