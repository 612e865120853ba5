//=========================================================================
// Actions
//=========================================================================
//
// Game-level commands produced from key input.
//
// Gameplay actions (Jump, Duck) act on the running simulation. The rest
// stand in for the presentation controls (start button, pause button,
// difficulty picker, volume slider) on a keyboard-only surface.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::KeyCode;
use crate::core::game::Difficulty;

//=== Action ==============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    /// Held: ducking starts on press and ends on release.
    Duck,
    Start,
    TogglePause,
    Restart,
    VolumeUp,
    VolumeDown,
    Select(Difficulty),
}

//=== ActionEvent =========================================================

/// An action edge: the bound key went down or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    Pressed(Action),
    Released(Action),
}

//=== Default Bindings ====================================================

/// Key layout shipped with the game.
///
/// Jump: Space / Up / W. Duck: Down / S. Enter starts, P or Escape
/// toggles pause, R restarts, `=`/`-` change volume, 1/2/3 pick the
/// difficulty.
pub const DEFAULT_BINDINGS: &[(KeyCode, Action)] = &[
    (KeyCode::Space, Action::Jump),
    (KeyCode::ArrowUp, Action::Jump),
    (KeyCode::KeyW, Action::Jump),
    (KeyCode::ArrowDown, Action::Duck),
    (KeyCode::KeyS, Action::Duck),
    (KeyCode::Enter, Action::Start),
    (KeyCode::KeyP, Action::TogglePause),
    (KeyCode::Escape, Action::TogglePause),
    (KeyCode::KeyR, Action::Restart),
    (KeyCode::Equal, Action::VolumeUp),
    (KeyCode::Minus, Action::VolumeDown),
    (KeyCode::Digit1, Action::Select(Difficulty::Easy)),
    (KeyCode::Digit2, Action::Select(Difficulty::Normal)),
    (KeyCode::Digit3, Action::Select(Difficulty::Hard)),
];

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_key_bound_once() {
        let keys: HashSet<_> = DEFAULT_BINDINGS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), DEFAULT_BINDINGS.len());
    }

    #[test]
    fn jump_and_duck_keys() {
        let bound = |action| {
            DEFAULT_BINDINGS
                .iter()
                .filter(|(_, a)| *a == action)
                .map(|(k, _)| *k)
                .collect::<HashSet<_>>()
        };

        assert_eq!(
            bound(Action::Jump),
            HashSet::from([KeyCode::Space, KeyCode::ArrowUp, KeyCode::KeyW])
        );
        assert_eq!(bound(Action::Duck), HashSet::from([KeyCode::ArrowDown, KeyCode::KeyS]));
    }

    #[test]
    fn unidentified_is_never_bound() {
        assert!(DEFAULT_BINDINGS.iter().all(|(k, _)| *k != KeyCode::Unidentified));
    }
}
