//=========================================================================
// Core Runner
//
// Drives the game loop once per display frame.
//
// Responsibilities:
// - Receive control commands from the presentation layer via a channel
// - Map key input to actions and apply them to the `GameLoop`
// - Turn frame timestamps into deltas and tick the simulation
// - Flush game events to the audio mixer and the surface
// - Tell the platform whether another frame should be scheduled
//
// Notes:
// Everything runs on the platform thread. The channel is the only seam
// between the window callbacks and the simulation: controls enqueue
// commands at any time, the runner drains them at the start of each frame
// (or when polled while no run is live).
//
//=========================================================================

//=== Module Declarations =================================================

pub mod audio;
pub mod config;
pub mod game;
pub mod input;
pub mod render;

//=== External Crates =====================================================

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, info, trace, warn};

//=== Internal Modules ====================================================

use audio::{AudioSink, Mixer};
use config::{GameConfig, DEFAULT_PLAYER_NAME};
use game::{Difficulty, GameEvent, GameLoop, Phase, TickResult};
use input::{Action, ActionEvent, InputEvent, InputSystem};
use render::{final_score_text, pause_label, score_text, Screen, Surface};

//=== Constants ===========================================================

/// Volume change per VolumeUp / VolumeDown key press.
const VOLUME_STEP: f32 = 0.1;

//=== Command =============================================================
//
// Requests queued by the presentation layer for the runner.
//
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// One frame's worth of key transitions.
    Inputs(Vec<InputEvent>),
    Start,
    TogglePause,
    Restart,
    SetVolume(f32),
    SelectDifficulty(Difficulty),
    SetPlayerName(String),
}

//=== Controls ============================================================
//
// Cloneable handle the presentation layer uses to reach the runner.
// Sends never block: a full or disconnected queue is logged and the
// command dropped.
//
#[derive(Debug, Clone)]
pub struct Controls {
    sender: Sender<Command>,
}

impl Controls {
    pub fn start(&self) {
        self.send(Command::Start);
    }

    pub fn toggle_pause(&self) {
        self.send(Command::TogglePause);
    }

    pub fn restart(&self) {
        self.send(Command::Restart);
    }

    /// Sets the shared master volume (clamped to `0.0..=1.0` on apply).
    pub fn set_volume(&self, volume: f32) {
        self.send(Command::SetVolume(volume));
    }

    /// Picks the difficulty used by the next `start`.
    pub fn select_difficulty(&self, difficulty: Difficulty) {
        self.send(Command::SelectDifficulty(difficulty));
    }

    pub fn set_player_name(&self, name: impl Into<String>) {
        self.send(Command::SetPlayerName(name.into()));
    }

    pub fn send_inputs(&self, events: Vec<InputEvent>) {
        if !events.is_empty() {
            self.send(Command::Inputs(events));
        }
    }

    fn send(&self, command: Command) {
        match self.sender.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(command)) => {
                warn!(target: "runner", "Command queue full, dropped {:?}", command);
            }
            Err(TrySendError::Disconnected(command)) => {
                warn!(target: "runner", "Runner gone, dropped {:?}", command);
            }
        }
    }
}

//=== FrameClock ==========================================================
//
// Converts frame timestamps (ms) into deltas. The first timestamp after
// construction or `reset` only sets the anchor and yields 0.
//
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    anchor: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, timestamp_ms: f64) -> f64 {
        let delta = match self.anchor {
            Some(previous) => timestamp_ms - previous,
            None => 0.0,
        };
        self.anchor = Some(timestamp_ms);
        delta
    }

    pub fn reset(&mut self) {
        self.anchor = None;
    }
}

//=== FrameControl ========================================================

/// Whether the platform should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Rearm,
    Halt,
}

//=== Runner ==============================================================

/// Owns the simulation and its collaborators for one window.
pub struct Runner<V: Surface, A: AudioSink> {
    game: GameLoop,
    input: InputSystem,
    mixer: Mixer<A>,
    surface: V,
    commands: Receiver<Command>,
    controls: Controls,
    clock: FrameClock,
    difficulty: Difficulty,
    player_name: String,
}

impl<V: Surface, A: AudioSink> Runner<V, A> {
    //--- Construction -----------------------------------------------------
    //
    // Creates the runner and its bounded command queue, then puts the
    // surface on the start screen.
    //
    pub fn new(config: GameConfig, surface: V, sink: A, channel_capacity: usize) -> Self {
        let (sender, commands) = crossbeam_channel::bounded(channel_capacity);
        let mut runner = Self {
            game: GameLoop::new(config),
            input: InputSystem::new(),
            mixer: Mixer::new(sink),
            surface,
            commands,
            controls: Controls { sender },
            clock: FrameClock::new(),
            difficulty: Difficulty::default(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        };

        runner.surface.show_screen(Screen::Start);
        runner.surface.show_score(&score_text(0));
        runner.surface.set_pause_label(pause_label(false));
        runner.surface.sync_volume(runner.mixer.master());
        runner
    }

    //--- Accessors --------------------------------------------------------

    /// Returns a new handle onto this runner's command queue.
    pub fn controls(&self) -> Controls {
        self.controls.clone()
    }

    pub fn game(&self) -> &GameLoop {
        &self.game
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut V {
        &mut self.surface
    }

    pub fn mixer(&self) -> &Mixer<A> {
        &self.mixer
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Running or paused.
    pub fn is_live(&self) -> bool {
        self.game.phase().is_live()
    }

    //--- Direct Controls --------------------------------------------------

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        debug!(target: "runner", "Difficulty selected: {}", difficulty);
        self.difficulty = difficulty;
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    /// Applies a master volume and mirrors it on every slider.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let applied = self.mixer.set_master(volume);
        self.surface.sync_volume(applied);
        applied
    }

    /// Releases every held key, e.g. when the window loses focus.
    pub fn release_keys(&mut self) {
        for action in self.input.release_all() {
            self.handle_action(action);
        }
        self.flush_events();
    }

    //--- pump() -----------------------------------------------------------
    //
    // Drains every queued command and flushes the resulting game events.
    // Safe to call while no run is live; returns `Rearm` when a run is live
    // afterwards so a halted platform knows to start scheduling frames.
    //
    pub fn pump(&mut self) -> FrameControl {
        while let Ok(command) = self.commands.try_recv() {
            self.handle_command(command);
        }
        self.flush_events();
        self.frame_control()
    }

    //--- frame() ----------------------------------------------------------
    //
    // One display frame:
    //  1. Apply queued commands
    //  2. Tick the simulation by the time since the previous frame
    //  3. Forward events to audio and the surface
    //  4. Draw the snapshot
    //
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameControl {
        self.pump();

        let delta = self.clock.advance(timestamp_ms);
        let result = self.game.tick(delta);
        trace!(target: "runner", "Frame dt={:.2}ms -> {:?}", delta, result);

        self.flush_events();

        if result != TickResult::Inactive {
            self.surface.draw(&self.game.snapshot());
        }

        self.frame_control()
    }

    //--- Internal Helpers -------------------------------------------------

    fn frame_control(&self) -> FrameControl {
        if self.is_live() {
            FrameControl::Rearm
        } else {
            FrameControl::Halt
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Inputs(events) => {
                for action in self.input.process(&events) {
                    self.handle_action(action);
                }
            }
            Command::Start => self.start_run(),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.restart(),
            Command::SetVolume(volume) => {
                self.set_volume(volume);
            }
            Command::SelectDifficulty(difficulty) => self.select_difficulty(difficulty),
            Command::SetPlayerName(name) => self.set_player_name(name),
        }
    }

    fn handle_action(&mut self, event: ActionEvent) {
        match event {
            ActionEvent::Pressed(action) => match action {
                Action::Jump => {
                    self.game.jump();
                }
                Action::Duck => {
                    self.game.duck_start();
                }
                Action::Start => self.start_run(),
                Action::TogglePause => self.toggle_pause(),
                Action::Restart => self.restart(),
                Action::VolumeUp => {
                    self.set_volume(self.mixer.master() + VOLUME_STEP);
                }
                Action::VolumeDown => {
                    self.set_volume(self.mixer.master() - VOLUME_STEP);
                }
                Action::Select(difficulty) => self.select_difficulty(difficulty),
            },
            ActionEvent::Released(Action::Duck) => {
                self.game.duck_end();
            }
            ActionEvent::Released(_) => {}
        }
    }

    fn start_run(&mut self) {
        if self.game.start(self.difficulty, &self.player_name) {
            self.clock.reset();
            self.surface.show_screen(Screen::Playing);
            self.surface.set_pause_label(pause_label(false));
        }
    }

    fn toggle_pause(&mut self) {
        if self.game.toggle_pause() {
            let paused = self.game.phase() == Phase::Paused;
            self.surface.set_pause_label(pause_label(paused));
        }
    }

    fn restart(&mut self) {
        self.game.restart();
        self.clock.reset();
        self.surface.show_screen(Screen::Start);
    }

    fn flush_events(&mut self) {
        let events: Vec<GameEvent> = self.game.drain_events().collect();
        for event in events {
            match event {
                GameEvent::Audio(command) => self.mixer.apply(command),
                GameEvent::ScoreChanged(score) => self.surface.show_score(&score_text(score)),
                GameEvent::GameOver { player_name, score } => {
                    info!(target: "runner", "Game over: {} with {} votes", player_name, score);
                    self.surface.show_final_score(&final_score_text(&player_name, score));
                    self.surface.show_screen(Screen::GameOver);
                }
                GameEvent::PhaseChanged(phase) => {
                    debug!(target: "runner", "Phase now {:?}", phase);
                }
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::audio::tests::{Played, RecordingAudio};
    use crate::core::audio::Cue;
    use crate::core::game::{GroundShape, Obstacle, ObstacleKind};
    use crate::core::input::KeyCode;
    use crate::core::render::tests::RecordingSurface;

    //--- Test Helpers -----------------------------------------------------

    type TestRunner = Runner<RecordingSurface, RecordingAudio>;

    fn runner() -> TestRunner {
        let config = GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        };
        Runner::new(config, RecordingSurface::default(), RecordingAudio::default(), 64)
    }

    fn started() -> TestRunner {
        let mut runner = runner();
        runner.controls().start();
        runner.frame(1000.0);
        runner
    }

    fn press(key: KeyCode) -> Vec<InputEvent> {
        vec![InputEvent::KeyDown(key)]
    }

    fn release(key: KeyCode) -> Vec<InputEvent> {
        vec![InputEvent::KeyUp(key)]
    }

    /// Puts a tree right on top of the player.
    fn collide(runner: &mut TestRunner) {
        runner.game.state.spawn_timer_ms = -1.0e12;
        let tree = Obstacle::new(9, ObstacleKind::Ground(GroundShape::Tree), 70.0, 0.0);
        runner.game.obstacles.push(tree);
    }

    //=====================================================================
    // FrameClock
    //=====================================================================

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(5000.0), 0.0);
        assert_eq!(clock.advance(5016.0), 16.0);
        assert_eq!(clock.advance(5049.0), 33.0);
    }

    #[test]
    fn reset_reanchors() {
        let mut clock = FrameClock::new();
        clock.advance(10.0);
        clock.reset();
        assert_eq!(clock.advance(900.0), 0.0);
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    #[test]
    fn new_runner_shows_start_screen() {
        let runner = runner();
        assert_eq!(runner.surface().screen(), Some(Screen::Start));
        assert_eq!(runner.surface().score.as_deref(), Some("Votes: 0"));
        assert_eq!(runner.surface().volume, Some(0.5));
        assert!(!runner.is_live());
    }

    #[test]
    fn idle_frames_halt() {
        let mut runner = runner();
        assert_eq!(runner.frame(0.0), FrameControl::Halt);
        assert!(runner.surface().frames.is_empty());
    }

    #[test]
    fn start_command_begins_run_and_music() {
        let mut runner = runner();
        runner.controls().start();
        assert_eq!(runner.pump(), FrameControl::Rearm);

        assert_eq!(runner.game().phase(), Phase::Running);
        assert_eq!(runner.surface().screen(), Some(Screen::Playing));
        assert_eq!(runner.mixer().sink().plays_of(Cue::Background), 1);
    }

    #[test]
    fn first_frame_after_start_does_not_move() {
        let mut runner = runner();
        runner.controls().start();
        runner.frame(123_456.0);

        assert_eq!(runner.game().state().elapsed_ms(), 0.0);
        assert_eq!(runner.surface().frames.len(), 1);

        runner.frame(123_472.0);
        assert_eq!(runner.game().state().elapsed_ms(), 16.0);
    }

    #[test]
    fn start_uses_selected_difficulty_and_name() {
        let mut runner = runner();
        let controls = runner.controls();
        controls.select_difficulty(Difficulty::Hard);
        controls.set_player_name("Ada");
        controls.start();
        runner.pump();

        assert_eq!(runner.game().difficulty(), Difficulty::Hard);
        assert_eq!(runner.game().player_name(), "Ada");
    }

    #[test]
    fn collision_halts_and_shows_final_score() {
        let mut runner = started();
        collide(&mut runner);

        assert_eq!(runner.frame(1016.0), FrameControl::Halt);
        assert_eq!(runner.surface().screen(), Some(Screen::GameOver));
        assert_eq!(runner.surface().final_score.as_deref(), Some("Player, your votes: 0"));
        assert_eq!(runner.mixer().sink().plays_of(Cue::GameOver), 1);
    }

    #[test]
    fn restart_returns_to_start_screen() {
        let mut runner = started();
        collide(&mut runner);
        runner.frame(1016.0);

        runner.controls().restart();
        assert_eq!(runner.pump(), FrameControl::Halt);
        assert_eq!(runner.surface().screen(), Some(Screen::Start));
        assert_eq!(runner.mixer().sink().log.last(), Some(&Played::Pause(Cue::Background)));
    }

    //=====================================================================
    // Pause
    //=====================================================================

    #[test]
    fn paused_run_keeps_frames_armed() {
        let mut runner = started();
        runner.controls().toggle_pause();

        assert_eq!(runner.frame(1016.0), FrameControl::Rearm);
        assert_eq!(runner.game().phase(), Phase::Paused);
        assert_eq!(runner.surface().pause_label.as_deref(), Some("Resume"));

        let elapsed = runner.game().state().elapsed_ms();
        runner.frame(5000.0);
        assert_eq!(runner.game().state().elapsed_ms(), elapsed);
    }

    #[test]
    fn resume_uses_only_the_last_frame_delta() {
        let mut runner = started();
        runner.controls().toggle_pause();
        runner.frame(1016.0);
        runner.frame(9000.0);

        runner.controls().toggle_pause();
        runner.frame(9016.0);
        assert_eq!(runner.surface().pause_label.as_deref(), Some("Pause"));
        assert_eq!(runner.game().state().elapsed_ms(), 16.0);
    }

    //=====================================================================
    // Input
    //=====================================================================

    #[test]
    fn jump_key_launches_player() {
        let mut runner = started();
        runner.controls().send_inputs(press(KeyCode::Space));
        runner.frame(1016.0);

        assert!(runner.game().player().is_jumping());
        assert!(runner.game().player().y() > 0.0);
        assert_eq!(runner.mixer().sink().plays_of(Cue::Jump), 1);
    }

    #[test]
    fn held_duck_key_ducks_until_release() {
        let mut runner = started();
        let controls = runner.controls();

        controls.send_inputs(press(KeyCode::ArrowDown));
        controls.send_inputs(press(KeyCode::ArrowDown));
        runner.frame(1016.0);
        assert!(runner.game().player().is_ducking());

        controls.send_inputs(release(KeyCode::ArrowDown));
        runner.frame(1032.0);
        assert!(!runner.game().player().is_ducking());
    }

    #[test]
    fn releasing_keys_stands_player_up() {
        let mut runner = started();
        runner.controls().send_inputs(press(KeyCode::KeyS));
        runner.pump();
        assert!(runner.game().player().is_ducking());

        runner.release_keys();
        assert!(!runner.game().player().is_ducking());
    }

    #[test]
    fn enter_key_starts_and_digit_selects() {
        let mut runner = runner();
        let controls = runner.controls();
        controls.send_inputs(press(KeyCode::Digit1));
        controls.send_inputs(press(KeyCode::Enter));
        runner.pump();

        assert_eq!(runner.game().phase(), Phase::Running);
        assert_eq!(runner.game().difficulty(), Difficulty::Easy);
    }

    #[test]
    fn empty_input_batches_are_not_queued() {
        let runner = runner();
        runner.controls().send_inputs(Vec::new());
        assert!(runner.commands.is_empty());
    }

    //=====================================================================
    // Volume
    //=====================================================================

    #[test]
    fn volume_is_clamped_and_synced() {
        let mut runner = runner();
        runner.controls().set_volume(3.0);
        runner.pump();
        assert_eq!(runner.mixer().master(), 1.0);
        assert_eq!(runner.surface().volume, Some(1.0));
    }

    #[test]
    fn volume_keys_step_master() {
        let mut runner = runner();
        runner.set_volume(0.0);
        let controls = runner.controls();
        controls.send_inputs(press(KeyCode::Minus));
        runner.pump();
        assert_eq!(runner.mixer().master(), 0.0);

        controls.send_inputs(press(KeyCode::Equal));
        runner.pump();
        assert!((runner.mixer().master() - 0.1).abs() < 1e-6);
    }

    //=====================================================================
    // Controls
    //=====================================================================

    #[test]
    fn full_queue_drops_without_blocking() {
        let config = GameConfig::default();
        let runner: TestRunner =
            Runner::new(config, RecordingSurface::default(), RecordingAudio::default(), 1);
        let controls = runner.controls();
        controls.start();
        controls.restart();
        assert_eq!(runner.commands.len(), 1);
    }

    #[test]
    fn disconnected_controls_are_harmless() {
        let controls = runner().controls();
        controls.start();
        controls.set_volume(0.2);
    }
}
