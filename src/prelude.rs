//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use vote_dash::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::platform::PlatformError;

// Driver
pub use crate::core::{Command, Controls, FrameClock, FrameControl, Runner};

// Simulation
pub use crate::core::config::GameConfig;
pub use crate::core::game::{Difficulty, GameEvent, GameLoop, Phase, TickResult};

// Input
pub use crate::core::input::{Action, ActionEvent, InputEvent, KeyCode};

// Presentation seams
pub use crate::core::audio::{AudioSink, Cue};
pub use crate::core::render::{Screen, Snapshot, Surface};
