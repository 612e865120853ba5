//=========================================================================
// Game Configuration
//=========================================================================
//
// Tunable constants for the runner simulation.
//
// All distances are in pixels, all times in milliseconds. Velocities and
// gravity are expressed per reference frame (16ms); the loop scales them
// by `delta / REFERENCE_FRAME_MS` so play speed is frame-rate independent.
//
//=========================================================================

/// Length of the reference frame that physics constants are tuned for.
pub const REFERENCE_FRAME_MS: f64 = 16.0;

/// Player name used when the configured name is blank.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Master volume applied before any slider input.
pub const DEFAULT_VOLUME: f32 = 0.5;

//=== GameConfig ==========================================================

/// Simulation tunables.
///
/// `Default` reproduces the shipped game; tests and the engine builder
/// override individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Width of the visible play area. Obstacles spawn at this x.
    pub play_width: f64,

    //--- Player -----------------------------------------------------------
    /// Fixed left edge of the player.
    pub player_left: f64,
    pub player_width: f64,
    pub standing_height: f64,
    pub ducking_height: f64,

    /// Upward velocity applied by a jump.
    pub launch_velocity: f64,
    /// Per-frame velocity change (negative pulls down).
    pub gravity: f64,
    /// Time after releasing duck during which flying obstacles still miss.
    pub duck_grace_ms: f64,

    //--- Difficulty -------------------------------------------------------
    pub max_speed: f64,
    pub min_spawn_interval_ms: f64,

    //--- Collision --------------------------------------------------------
    /// Forgiveness margin on the top edge of ground obstacles.
    pub ground_tolerance: f64,

    /// Fixed RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_width: 800.0,
            player_left: 50.0,
            player_width: 44.0,
            standing_height: 80.0,
            ducking_height: 40.0,
            launch_velocity: 14.0,
            gravity: -0.5,
            duck_grace_ms: 140.0,
            max_speed: 18.0,
            min_spawn_interval_ms: 700.0,
            ground_tolerance: 6.0,
            seed: None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
