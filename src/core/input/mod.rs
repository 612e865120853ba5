//=========================================================================
// Input System
//
// Turns batches of key transitions into action edges.
//
// Responsibilities:
// - Track which keys are held so OS auto-repeat does not re-fire actions
// - Map keys to actions through the `ActionMapper`
// - Report press/release edges in arrival order
//
// Notes:
// Owned by the frame driver. Unbound keys are still tracked as held but
// produce no actions.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod action;
mod action_mapper;
pub mod event;

//=== Public API ==========================================================

pub use action::{Action, ActionEvent, DEFAULT_BINDINGS};
pub use event::{InputEvent, KeyCode};

//=== Standard Library Imports ============================================

use std::collections::HashSet;

//=== External Crates =====================================================

use log::trace;

//=== Internal Imports ====================================================

use action_mapper::ActionMapper;

//=== InputSystem =========================================================

pub struct InputSystem {
    mapper: ActionMapper,
    held: HashSet<KeyCode>,
}

impl InputSystem {
    //--- Construction -----------------------------------------------------

    /// Creates an input system with the default key layout.
    pub fn new() -> Self {
        Self {
            mapper: ActionMapper::with_defaults(),
            held: HashSet::with_capacity(16),
        }
    }

    //--- process() --------------------------------------------------------
    //
    // Consumes one batch of events and returns the resulting action edges.
    // A KeyDown for a key already held (auto-repeat) and a KeyUp for a key
    // not held are both dropped.
    //
    pub fn process(&mut self, events: &[InputEvent]) -> Vec<ActionEvent> {
        let mut actions = Vec::with_capacity(events.len());

        for event in events {
            let key = event.key();
            let edge = match event {
                InputEvent::KeyDown(_) => self.held.insert(key),
                InputEvent::KeyUp(_) => self.held.remove(&key),
            };
            if !edge {
                trace!(target: "input", "Ignored repeat {:?}", event);
                continue;
            }

            if let Some(action) = self.mapper.map_key(key) {
                actions.push(if event.is_press() {
                    ActionEvent::Pressed(action)
                } else {
                    ActionEvent::Released(action)
                });
            }
        }

        actions
    }

    //--- Query Methods ----------------------------------------------------

    /// Returns `true` if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Forgets every held key (e.g. after the window loses focus).
    pub fn release_all(&mut self) -> Vec<ActionEvent> {
        let held: Vec<_> = self.held.drain().collect();
        held.into_iter()
            .filter_map(|key| self.mapper.map_key(key))
            .map(ActionEvent::Released)
            .collect()
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
