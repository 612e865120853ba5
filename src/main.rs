//=========================================================================
// Vote Dash — Binary Entry Point
//
// Parses the command line, installs the logger and runs the engine.
//
// Usage:
//   vote-dash --name Ada --difficulty hard --volume 0.8
//   RUST_LOG=debug vote-dash --seed 42
//
//=========================================================================

use clap::Parser;
use env_logger::Env;

use vote_dash::core::game::Difficulty;
use vote_dash::{EngineBuilder, PlatformError};

//=== Cli =================================================================

#[derive(Parser)]
#[command(name = "vote-dash")]
#[command(about = "Endless runner: jump the ground obstacles, duck the birds")]
struct Cli {
    /// Name shown on the game-over screen
    #[arg(long, default_value = "Player")]
    name: String,

    /// Starting difficulty: easy, normal or hard (1/2/3 in game)
    #[arg(long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// Master volume between 0 and 1
    #[arg(long, default_value_t = 0.5, value_parser = parse_volume)]
    volume: f32,

    /// Obstacle RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Play-area width in pixels
    #[arg(long, default_value_t = 800.0, value_parser = parse_width)]
    width: f64,
}

fn parse_volume(value: &str) -> Result<f32, String> {
    let volume: f32 = value.parse().map_err(|e| format!("{}", e))?;
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(format!("volume must be between 0 and 1, got {}", volume))
    }
}

fn parse_width(value: &str) -> Result<f64, String> {
    let width: f64 = value.parse().map_err(|e| format!("{}", e))?;
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(format!("width must be positive, got {}", width))
    }
}

//=== main ================================================================

fn main() -> Result<(), PlatformError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut builder = EngineBuilder::new()
        .with_difficulty(cli.difficulty)
        .with_player_name(cli.name)
        .with_volume(cli.volume)
        .with_play_width(cli.width);

    if let Some(seed) = cli.seed {
        builder = builder.with_seed(seed);
    }

    builder.build().run()
}
