//=========================================================================
// Obstacles
//=========================================================================
//
// Obstacle shapes, per-frame motion, and the random spawner.
//
// Shapes:
//   tree      42 x 60   ground
//   tower     34 x 90   ground
//   building  56 x 72   ground
//   bird      96 x 82   flying, base offset 90, oscillates +-20
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f64::consts::TAU;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

//=== Internal Dependencies ===============================================

use super::collision::Rect;

//=== Constants ===========================================================

const FLYING_BASE_OFFSET: f64 = 90.0;
const FLYING_AMPLITUDE: f64 = 20.0;
const FLYING_FREQUENCY: f64 = 3.0;
const OSCILLATION_RATE: f64 = 0.02;

const FLYING_CHANCE_BASE: f64 = 0.22;
const FLYING_CHANCE_CAP: f64 = 0.6;

/// Score at which oscillation runs at double rate (and the flying chance
/// has grown by one full unit before capping).
const SCORE_SCALE: f64 = 200.0;

//=== Kinds ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroundShape {
    Tree,
    Tower,
    Building,
}

impl GroundShape {
    pub const ALL: [GroundShape; 3] = [Self::Tree, Self::Tower, Self::Building];

    /// `(width, height)` in pixels.
    pub const fn size(self) -> (f64, f64) {
        match self {
            Self::Tree => (42.0, 60.0),
            Self::Tower => (34.0, 90.0),
            Self::Building => (56.0, 72.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Ground(GroundShape),
    Flying,
}

impl ObstacleKind {
    pub const fn size(self) -> (f64, f64) {
        match self {
            Self::Ground(shape) => shape.size(),
            Self::Flying => (96.0, 82.0),
        }
    }

    pub const fn base_offset(self) -> f64 {
        match self {
            Self::Ground(_) => 0.0,
            Self::Flying => FLYING_BASE_OFFSET,
        }
    }

    /// Sprite the renderer draws for this kind.
    pub const fn sprite(self) -> &'static str {
        match self {
            Self::Ground(GroundShape::Tree) => "tree",
            Self::Ground(GroundShape::Tower) => "tower",
            Self::Ground(GroundShape::Building) => "building",
            Self::Flying => "bird",
        }
    }
}

//=== Obstacle ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    id: u64,
    kind: ObstacleKind,
    pub(crate) x: f64,
    width: f64,
    height: f64,
    base_offset: f64,
    offset: f64,
    phase: f64,
}

impl Obstacle {
    pub fn new(id: u64, kind: ObstacleKind, x: f64, phase: f64) -> Self {
        let (width, height) = kind.size();
        let base_offset = kind.base_offset();
        let mut obstacle = Self {
            id,
            kind,
            x,
            width,
            height,
            base_offset,
            offset: base_offset,
            phase,
        };
        obstacle.recompute_offset();
        obstacle
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn is_flying(&self) -> bool {
        self.kind == ObstacleKind::Flying
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Current height of the obstacle's lower edge above ground.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin(self.x, self.offset, self.width, self.height)
    }

    /// True once the right edge has passed the left edge of the play area.
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    //--- Motion -----------------------------------------------------------

    /// Moves the obstacle one step of `frame_scale` reference frames.
    ///
    /// Flying obstacles oscillate faster as the score grows.
    pub(crate) fn advance(&mut self, frame_scale: f64, speed: f64, score: u32) {
        if self.is_flying() {
            self.phase += OSCILLATION_RATE * frame_scale * (1.0 + f64::from(score) / SCORE_SCALE);
            self.recompute_offset();
        }
        self.x -= speed * frame_scale;
    }

    fn recompute_offset(&mut self) {
        if self.is_flying() {
            self.offset =
                self.base_offset + (self.phase * FLYING_FREQUENCY).sin() * FLYING_AMPLITUDE;
        }
    }
}

//=== Spawner =============================================================

/// Probability that the next obstacle flies, given the current score.
pub fn flying_chance(score: u32) -> f64 {
    (FLYING_CHANCE_BASE + f64::from(score) / SCORE_SCALE).min(FLYING_CHANCE_CAP)
}

/// Creates obstacles at the right edge of the play area.
pub struct Spawner {
    rng: StdRng,
    next_id: u64,
}

impl Spawner {
    /// Creates a spawner. A seed makes the obstacle sequence reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng, next_id: 0 }
    }

    /// Rolls a new obstacle at `x` for the given score.
    pub(crate) fn spawn(&mut self, score: u32, x: f64) -> Obstacle {
        let id = self.next_id;
        self.next_id += 1;

        let obstacle = if self.rng.random::<f64>() < flying_chance(score) {
            let phase = self.rng.random_range(0.0..TAU);
            Obstacle::new(id, ObstacleKind::Flying, x, phase)
        } else {
            let shape = GroundShape::ALL[self.rng.random_range(0..GroundShape::ALL.len())];
            Obstacle::new(id, ObstacleKind::Ground(shape), x, 0.0)
        };

        debug!(
            target: "game",
            "Spawned obstacle #{} ({}) at x={}",
            obstacle.id,
            obstacle.kind.sprite(),
            x
        );
        obstacle
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
