//=========================================================================
// Action Mapper
//=========================================================================
//
// Maps keys to game actions.
//
// Architecture:
//   KeyCode → HashMap → Action
//
// Several keys may share one action; a key maps to at most one action.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{
    action::{Action, DEFAULT_BINDINGS},
    event::KeyCode,
};

//=== ActionMapper ========================================================

/// Key → action lookup table.
pub(crate) struct ActionMapper {
    key_bindings: HashMap<KeyCode, Action>,
}

impl ActionMapper {
    /// Creates a mapper with no bindings.
    pub(crate) fn new() -> Self {
        Self {
            key_bindings: HashMap::new(),
        }
    }

    /// Creates a mapper with the shipped key layout.
    pub(crate) fn with_defaults() -> Self {
        let mut mapper = Self::new();
        for &(key, action) in DEFAULT_BINDINGS {
            mapper.bind_key(key, action);
        }
        mapper
    }

    //--- Binding ----------------------------------------------------------

    /// Binds a key to an action, replacing any previous binding of that key.
    fn bind_key(&mut self, key: KeyCode, action: Action) {
        if let Some(previous) = self.key_bindings.insert(key, action) {
            if previous != action {
                debug!(target: "input", "{:?} rebound: {:?} -> {:?}", key, previous, action);
            }
        }
    }

    //--- Mapping ----------------------------------------------------------

    pub(crate) fn map_key(&self, key: KeyCode) -> Option<Action> {
        self.key_bindings.get(&key).copied()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
