//=========================================================================
// Vote Dash Engine
//
// Main entry point: configures the game and hands it to the platform.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Event Loop]
//         │                          │
//         ├─ with_difficulty()       ├─ controls()
//         ├─ with_player_name()      └─ runs platform
//         ├─ with_volume()              blocks until the window closes
//         ├─ with_seed()
//         ├─ with_play_width()
//         └─ with_channel_capacity()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::config::{GameConfig, DEFAULT_PLAYER_NAME, DEFAULT_VOLUME};
use crate::core::game::Difficulty;
use crate::core::{Controls, Runner};
use crate::platform::{Platform, PlatformError, ToneAudio, WindowSurface, WINDOW_HEIGHT};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Difficulty**: normal
/// - **Player name**: `Player`
/// - **Volume**: 0.5
/// - **Seed**: none (seeded from the OS)
/// - **Play width**: 800px
/// - **Channel capacity**: 128 commands
///
/// # Examples
///
/// ```no_run
/// use vote_dash::EngineBuilder;
/// use vote_dash::core::game::Difficulty;
///
/// let engine = EngineBuilder::new()
///     .with_difficulty(Difficulty::Hard)
///     .with_player_name("Ada")
///     .with_volume(0.8)
///     .build();
///
/// engine.run()?;
/// # Ok::<(), vote_dash::PlatformError>(())
/// ```
pub struct EngineBuilder {
    config: GameConfig,
    difficulty: Difficulty,
    player_name: String,
    volume: f32,
    channel_capacity: usize,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            difficulty: Difficulty::default(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            volume: DEFAULT_VOLUME,
            channel_capacity: 128,
        }
    }

    /// Preselects the difficulty of the first run.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the name shown on the game-over screen. A blank name falls
    /// back to `Player` when the run starts.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    /// Sets the initial master volume.
    ///
    /// # Panics
    ///
    /// Panics if `volume` is outside `0.0..=1.0`.
    pub fn with_volume(mut self, volume: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&volume),
            "Volume must be within 0.0..=1.0, got {}",
            volume
        );
        self.volume = volume;
        self
    }

    /// Fixes the obstacle RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Sets the play-area width; obstacles spawn at this x.
    ///
    /// # Panics
    ///
    /// Panics if `width` is not a positive finite number.
    pub fn with_play_width(mut self, width: f64) -> Self {
        assert!(
            width.is_finite() && width > 0.0,
            "Play width must be positive, got {}",
            width
        );
        self.config.play_width = width;
        self
    }

    /// Sets the capacity of the command queue between controls and runner.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Builds the engine instance.
    ///
    /// Creates the runner with a window surface (the window itself is
    /// created once the event loop starts) and opens the audio output.
    /// Without an output device the game runs silently.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (difficulty: {}, width: {}, seed: {:?}, channel: {})",
            self.difficulty, self.config.play_width, self.config.seed, self.channel_capacity
        );

        let surface = WindowSurface::new(self.config.play_width.round() as u32, WINDOW_HEIGHT);
        let mut runner = Runner::new(self.config, surface, ToneAudio::open(), self.channel_capacity);
        runner.select_difficulty(self.difficulty);
        runner.set_player_name(self.player_name);
        runner.set_volume(self.volume);

        Engine { runner }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Vote Dash runtime.
///
/// Create via [`EngineBuilder`] with `EngineBuilder::new().build()`.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (Winit event loop)
///         ├─► Window + framebuffer surface
///         ├─► ToneAudio (cpal output stream)
///         └─► Runner ─► GameLoop, InputSystem, Mixer
///
/// Communication: crossbeam channel (Command)
/// ```
pub struct Engine {
    runner: Runner<WindowSurface, ToneAudio>,
}

impl Engine {
    /// Returns a handle for driving the game from outside the window,
    /// e.g. another thread acting as a control panel.
    pub fn controls(&self) -> Controls {
        self.runner.controls()
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until it is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting engine runtime");

        let platform = Platform::new(self.runner);
        let result = platform.run();

        info!("Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
