//=========================================================================
// Game Loop
//=========================================================================
//
// The runner simulation: one `GameLoop` per session, stepped by the
// driver through `tick(delta_ms)`.
//
// Phases:
// ```text
//   Idle ──start──> Running ──collision──> Ended
//                    │   ▲                   │
//              pause │   │ resume            │ restart
//                    ▼   │                   ▼
//                    Paused                 Idle
// ```
//
// Frame order (running only, k = delta / 16):
//   1. spawn timer += delta, spawn at the right edge when due
//   2. integrate the jump arc
//   3. for each obstacle, newest first:
//        oscillate + move left
//        off-screen  -> remove, score a point, rescale difficulty
//        collision   -> end the run, stop processing this frame
//
// The loop never touches a display or speaker; it queues `GameEvent`s
// and exposes a `Snapshot` for the driver to forward.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod collision;
pub mod difficulty;
mod event;
pub mod obstacle;
pub mod player;
mod run_state;

//=== Public API ==========================================================

pub use difficulty::{Difficulty, DifficultyProfile, UnknownDifficulty};
pub use event::GameEvent;
pub use obstacle::{GroundShape, Obstacle, ObstacleKind};
pub use player::{Player, Posture};
pub use run_state::RunState;

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::audio::{AudioCommand, Cue};
use crate::core::config::{GameConfig, DEFAULT_PLAYER_NAME, REFERENCE_FRAME_MS};
use crate::core::render::{EntityView, Snapshot};
use obstacle::Spawner;

//=== Constants ===========================================================

/// Every this many points the bonus cue plays.
const BONUS_EVERY: u32 = 50;

const PLAYER_SPRITE: &str = "runner";

//=== Phase ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Pre-game; nothing simulates.
    #[default]
    Idle,
    Running,
    Paused,
    /// Collision happened; state is frozen until restart.
    Ended,
}

impl Phase {
    /// Running or paused: the frame loop must keep being scheduled.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }
}

//=== TickResult ==========================================================

/// Outcome of one `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// The simulation advanced.
    Advanced,
    /// Paused; nothing changed.
    Paused,
    /// A collision ended the run during this tick.
    Collided,
    /// No run in progress (idle or already ended).
    Inactive,
}

impl TickResult {
    pub fn keeps_running(self) -> bool {
        matches!(self, Self::Advanced | Self::Paused)
    }
}

//=== GameLoop ============================================================

/// Owns all state of one game session.
pub struct GameLoop {
    config: GameConfig,
    phase: Phase,
    difficulty: Difficulty,
    player_name: String,
    pub(crate) player: Player,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) state: RunState,
    spawner: Spawner,
    events: Vec<GameEvent>,
}

impl GameLoop {
    //--- Construction -----------------------------------------------------

    pub fn new(config: GameConfig) -> Self {
        let spawner = Spawner::new(config.seed);
        let difficulty = Difficulty::default();
        Self {
            config,
            phase: Phase::Idle,
            difficulty,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            player: Player::new(),
            obstacles: Vec::new(),
            state: RunState::new(difficulty.profile()),
            spawner,
            events: Vec::new(),
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Takes every event queued since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Copies entity geometry for rendering.
    pub fn snapshot(&self) -> Snapshot {
        let player = EntityView {
            left: self.config.player_left.round() as i32,
            bottom: self.player.y.round().max(0.0) as i32,
            width: self.config.player_width.round() as i32,
            height: self.player.height(&self.config).round() as i32,
            sprite: PLAYER_SPRITE,
        };

        let obstacles = self
            .obstacles
            .iter()
            .map(|o| {
                let view = EntityView {
                    left: o.x().round() as i32,
                    bottom: o.offset().round() as i32,
                    width: o.width().round() as i32,
                    height: o.height().round() as i32,
                    sprite: o.kind().sprite(),
                };
                (o.id(), view)
            })
            .collect();

        Snapshot { player, obstacles }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Begins a fresh run. Ignored while a run is live.
    ///
    /// A blank name becomes `Player`; any other name is kept as typed.
    pub fn start(&mut self, difficulty: Difficulty, player_name: &str) -> bool {
        if self.phase.is_live() {
            warn!(target: "game", "Start ignored: run already in progress ({:?})", self.phase);
            return false;
        }

        self.player_name = if player_name.trim().is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            player_name.to_string()
        };

        self.difficulty = difficulty;
        self.state = RunState::new(difficulty.profile());
        self.player = Player::new();
        self.obstacles.clear();

        info!(
            target: "game",
            "Run started: player={}, difficulty={}, speed={}, spawn={}ms",
            self.player_name,
            difficulty,
            self.state.speed,
            self.state.spawn_interval_ms
        );

        self.set_phase(Phase::Running);
        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::Audio(AudioCommand::Play(Cue::Background)));
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.set_phase(Phase::Paused);
        self.events.push(GameEvent::Audio(AudioCommand::Pause(Cue::Background)));
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.set_phase(Phase::Running);
        self.events.push(GameEvent::Audio(AudioCommand::Resume(Cue::Background)));
        true
    }

    /// Pauses a running game or resumes a paused one. No-op otherwise.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => {
                debug!(target: "game", "Pause toggle ignored in {:?}", self.phase);
                false
            }
        }
    }

    /// Returns to the pre-game screen and stops the music.
    pub fn restart(&mut self) {
        info!(target: "game", "Restart requested from {:?}", self.phase);
        self.events.push(GameEvent::Audio(AudioCommand::Pause(Cue::Background)));
        self.set_phase(Phase::Idle);
    }

    //--- Player Actions ---------------------------------------------------

    /// Jumps if running and grounded.
    pub fn jump(&mut self) -> bool {
        if self.phase != Phase::Running || !self.player.jump(self.config.launch_velocity) {
            return false;
        }
        trace!(target: "game", "Jump");
        self.events.push(GameEvent::Audio(AudioCommand::Play(Cue::Jump)));
        true
    }

    pub fn duck_start(&mut self) -> bool {
        self.phase == Phase::Running && self.player.duck_start()
    }

    /// Releases a duck. Allowed while paused so a key released during a
    /// pause does not leave the player stuck low.
    pub fn duck_end(&mut self) -> bool {
        self.phase.is_live() && self.player.duck_end(self.state.elapsed_ms)
    }

    //--- Simulation -------------------------------------------------------

    /// Advances the simulation by `delta_ms`.
    ///
    /// Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, delta_ms: f64) -> TickResult {
        match self.phase {
            Phase::Running => {}
            Phase::Paused => return TickResult::Paused,
            Phase::Idle | Phase::Ended => return TickResult::Inactive,
        }

        let delta = if delta_ms.is_finite() { delta_ms.max(0.0) } else { 0.0 };
        let frame_scale = delta / REFERENCE_FRAME_MS;
        self.state.elapsed_ms += delta;

        //--- 1. Spawning --------------------------------------------------
        if self.state.spawn_due(delta) {
            let obstacle = self.spawner.spawn(self.state.score, self.config.play_width);
            self.obstacles.push(obstacle);
        }

        //--- 2. Player physics --------------------------------------------
        self.player.integrate(frame_scale, self.config.gravity);

        let player_rect = self.player.rect(&self.config);
        let shielded = self
            .player
            .shielded_from_flyers(self.state.elapsed_ms, self.config.duck_grace_ms);

        //--- 3. Obstacles, newest first -----------------------------------
        for i in (0..self.obstacles.len()).rev() {
            let score = self.state.score;
            let obstacle = &mut self.obstacles[i];
            obstacle.advance(frame_scale, self.state.speed, score);

            if obstacle.is_off_screen() {
                let removed = self.obstacles.remove(i);
                trace!(target: "game", "Obstacle #{} cleared", removed.id());
                self.award_point();
                continue;
            }

            if collision::player_hits(
                &player_rect,
                &self.obstacles[i],
                shielded,
                self.config.ground_tolerance,
            ) {
                let sprite = self.obstacles[i].kind().sprite();
                self.end(sprite);
                return TickResult::Collided;
            }
        }

        TickResult::Advanced
    }

    //--- Internal Helpers -------------------------------------------------

    fn award_point(&mut self) {
        let score = self.state.add_point(&self.config);
        debug!(
            target: "game",
            "Score {} (speed {:.1}, spawn {}ms)",
            score,
            self.state.speed,
            self.state.spawn_interval_ms
        );

        self.events.push(GameEvent::ScoreChanged(score));
        self.events.push(GameEvent::Audio(AudioCommand::Play(Cue::Point)));
        if score % BONUS_EVERY == 0 {
            self.events.push(GameEvent::Audio(AudioCommand::Play(Cue::Bonus)));
        }
    }

    fn end(&mut self, hit: &str) {
        info!(
            target: "game",
            "Run over: {} hit a {} with {} votes",
            self.player_name,
            hit,
            self.state.score
        );
        self.set_phase(Phase::Ended);
        self.events.push(GameEvent::Audio(AudioCommand::Play(Cue::GameOver)));
        self.events.push(GameEvent::GameOver {
            player_name: self.player_name.clone(),
            score: self.state.score,
        });
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(target: "game", "Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
