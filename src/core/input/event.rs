//=========================================================================
// Input Event Types
//
// Engine-level representation of keyboard input.
//
// Abstracts platform-specific key events (e.g. Winit) into a small,
// portable format the input system maps to game actions.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputSystem (held-key filtering)
//         ↓
//    ActionEvent (Jump, Duck, Start, ...)
// ```
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced, so
/// `KeyW` is the same key on QWERTY and AZERTY layouts. Only keys the game
/// can bind are listed; everything else arrives as `Unidentified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Difficulty shortcuts.
    Digit1, Digit2, Digit3,

    //--- Alphabetic Keys --------------------------------------------------

    KeyP, KeyR, KeyS, KeyW,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,

    /// `-` key (volume down).
    Minus,

    /// `=` key (volume up).
    Equal,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level key transition from the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

impl InputEvent {
    pub fn key(&self) -> KeyCode {
        match *self {
            Self::KeyDown(key) | Self::KeyUp(key) => key,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, Self::KeyDown(_))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn key_accessor_returns_payload() {
        assert_eq!(InputEvent::KeyDown(KeyCode::Space).key(), KeyCode::Space);
        assert_eq!(InputEvent::KeyUp(KeyCode::KeyS).key(), KeyCode::KeyS);
    }

    #[test]
    fn press_and_release_differ() {
        assert!(InputEvent::KeyDown(KeyCode::Space).is_press());
        assert!(!InputEvent::KeyUp(KeyCode::Space).is_press());
        assert_ne!(InputEvent::KeyDown(KeyCode::Space), InputEvent::KeyUp(KeyCode::Space));
    }

    #[test]
    fn events_are_hashable() {
        let mut set = HashSet::new();
        set.insert(InputEvent::KeyDown(KeyCode::ArrowUp));
        set.insert(InputEvent::KeyDown(KeyCode::ArrowUp));
        set.insert(InputEvent::KeyUp(KeyCode::ArrowUp));
        assert_eq!(set.len(), 2);
    }
}
