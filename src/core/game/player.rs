//=========================================================================
// Player
//=========================================================================
//
// Vertical kinematics and posture of the runner.
//
// The player never moves horizontally. Jumping integrates a simple
// ballistic arc; ducking shrinks the collision box and, for a short
// window after release, keeps shielding against flying obstacles.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::collision::Rect;
use crate::core::config::GameConfig;

//=== Constants ===========================================================

const GROUND_Y: f64 = 0.0;

//=== Posture =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Posture {
    #[default]
    Standing,
    Ducking,
}

//=== Player ==============================================================

/// Runner state. `y` is the height of the player's lower edge above ground.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Player {
    pub(crate) y: f64,
    pub(crate) velocity: f64,
    pub(crate) posture: Posture,
    pub(crate) jumping: bool,
    /// Simulation time of the most recent duck release.
    pub(crate) duck_released_at: Option<f64>,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Queries ----------------------------------------------------------

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_ducking(&self) -> bool {
        self.posture == Posture::Ducking
    }

    /// Collision height for the current posture.
    pub fn height(&self, config: &GameConfig) -> f64 {
        match self.posture {
            Posture::Standing => config.standing_height,
            Posture::Ducking => config.ducking_height,
        }
    }

    /// True while ducking, or within the grace window after a release.
    pub fn shielded_from_flyers(&self, now_ms: f64, grace_ms: f64) -> bool {
        self.is_ducking()
            || self
                .duck_released_at
                .is_some_and(|released| now_ms - released <= grace_ms)
    }

    pub fn rect(&self, config: &GameConfig) -> Rect {
        Rect::from_origin(
            config.player_left,
            self.y,
            config.player_width,
            self.height(config),
        )
    }

    //--- Actions ----------------------------------------------------------

    /// Launches a jump. Returns `false` if already airborne.
    pub(crate) fn jump(&mut self, launch_velocity: f64) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.velocity = launch_velocity;
        true
    }

    /// Enters the ducking posture. Returns `false` if already ducking.
    pub(crate) fn duck_start(&mut self) -> bool {
        if self.is_ducking() {
            return false;
        }
        self.posture = Posture::Ducking;
        true
    }

    /// Stands back up and opens the grace window. Returns `false` if not ducking.
    pub(crate) fn duck_end(&mut self, now_ms: f64) -> bool {
        if !self.is_ducking() {
            return false;
        }
        self.posture = Posture::Standing;
        self.duck_released_at = Some(now_ms);
        true
    }

    //--- Integration ------------------------------------------------------

    /// Advances the jump arc by `frame_scale` reference frames.
    ///
    /// Position is integrated before velocity. Reaching the ground lands
    /// the player: position clamps to ground, velocity and the airborne
    /// flag clear.
    pub(crate) fn integrate(&mut self, frame_scale: f64, gravity: f64) {
        self.y += self.velocity * frame_scale;
        self.velocity += gravity * frame_scale;

        if self.y <= GROUND_Y {
            self.y = GROUND_Y;
            self.velocity = 0.0;
            self.jumping = false;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
