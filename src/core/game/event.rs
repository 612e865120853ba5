//=========================================================================
// Game Events
//=========================================================================
//
// Side effects the simulation asks the outside world to perform.
//
// Events are queued during lifecycle calls and `tick`, then drained by
// the driver once per frame and routed to the mixer and the surface.
//
//=========================================================================

use super::Phase;
use crate::core::audio::AudioCommand;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged(Phase),
    ScoreChanged(u32),
    Audio(AudioCommand),
    /// The run ended in a collision.
    GameOver { player_name: String, score: u32 },
}
