//=========================================================================
// Difficulty
//=========================================================================
//
// Difficulty presets and score-driven scaling.
//
// Scaling:
//   speed          = min(max,  base + floor(score / 6) * 0.4)
//   spawn_interval = max(min,  base - floor(score / 8) * 80)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;

use log::warn;

//=== Constants ===========================================================

const SPEED_STEP_POINTS: u32 = 6;
const SPEED_STEP: f64 = 0.4;
const SPAWN_STEP_POINTS: u32 = 8;
const SPAWN_STEP_MS: f64 = 80.0;

//=== Difficulty ==========================================================

/// Difficulty selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Base values a run starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub base_speed: f64,
    pub base_spawn_interval_ms: f64,
}

impl Difficulty {
    /// Returns the base speed and spawn interval for this preset.
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                base_speed: 4.0,
                base_spawn_interval_ms: 2000.0,
            },
            Self::Normal => DifficultyProfile {
                base_speed: 5.2,
                base_spawn_interval_ms: 1500.0,
            },
            Self::Hard => DifficultyProfile {
                base_speed: 6.5,
                base_spawn_interval_ms: 1200.0,
            },
        }
    }

    /// Reads a selector value, falling back to `Normal` for anything unknown.
    pub fn from_selector(value: &str) -> Self {
        value.parse().unwrap_or_else(|err| {
            warn!(target: "game", "{}, using normal", err);
            Self::Normal
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//--- Parsing -------------------------------------------------------------

/// Returned when a difficulty name is not one of `easy`, `normal`, `hard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDifficulty(pub String);

impl fmt::Display for UnknownDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty '{}' (expected easy, normal or hard)", self.0)
    }
}

impl std::error::Error for UnknownDifficulty {}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

//=== Scaling =============================================================

/// Obstacle speed for the given score, capped at `max_speed`.
pub fn speed_for_score(profile: &DifficultyProfile, score: u32, max_speed: f64) -> f64 {
    let steps = f64::from(score / SPEED_STEP_POINTS);
    (profile.base_speed + steps * SPEED_STEP).min(max_speed)
}

/// Spawn interval for the given score, floored at `min_interval_ms`.
pub fn spawn_interval_for_score(
    profile: &DifficultyProfile,
    score: u32,
    min_interval_ms: f64,
) -> f64 {
    let steps = f64::from(score / SPAWN_STEP_POINTS);
    (profile.base_spawn_interval_ms - steps * SPAWN_STEP_MS).max(min_interval_ms)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_SPEED: f64 = 18.0;
    const MIN_INTERVAL: f64 = 700.0;

    //=== Presets =========================================================

    #[test]
    fn hard_profile_values() {
        let profile = Difficulty::Hard.profile();
        assert_eq!(profile.base_speed, 6.5);
        assert_eq!(profile.base_spawn_interval_ms, 1200.0);
    }

    #[test]
    fn easy_and_normal_profile_values() {
        assert_eq!(Difficulty::Easy.profile().base_speed, 4.0);
        assert_eq!(Difficulty::Easy.profile().base_spawn_interval_ms, 2000.0);
        assert_eq!(Difficulty::Normal.profile().base_speed, 5.2);
        assert_eq!(Difficulty::Normal.profile().base_spawn_interval_ms, 1500.0);
    }

    #[test]
    fn default_is_normal() {
        assert_eq!(Difficulty::default(), Difficulty::Normal);
    }

    //=== Parsing =========================================================

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("easy".parse(), Ok(Difficulty::Easy));
        assert_eq!(" HARD ".parse(), Ok(Difficulty::Hard));
        assert_eq!("Normal".parse(), Ok(Difficulty::Normal));
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        let err = "nightmare".parse::<Difficulty>().unwrap_err();
        assert_eq!(err, UnknownDifficulty("nightmare".to_string()));
        assert!(err.to_string().contains("nightmare"));
    }

    #[test]
    fn selector_falls_back_to_normal() {
        assert_eq!(Difficulty::from_selector("nightmare"), Difficulty::Normal);
        assert_eq!(Difficulty::from_selector(""), Difficulty::Normal);
        assert_eq!(Difficulty::from_selector("hard"), Difficulty::Hard);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(difficulty.to_string().parse(), Ok(difficulty));
        }
    }

    //=== Scaling =========================================================

    #[test]
    fn speed_steps_every_six_points() {
        let profile = Difficulty::Hard.profile();
        let before = speed_for_score(&profile, 53, MAX_SPEED);
        let after = speed_for_score(&profile, 54, MAX_SPEED);
        assert!((after - before - 0.4).abs() < 1e-9);
    }

    #[test]
    fn speed_between_48_and_54_gains_one_step() {
        let profile = Difficulty::Normal.profile();
        let at_48 = speed_for_score(&profile, 48, MAX_SPEED);
        let at_54 = speed_for_score(&profile, 54, MAX_SPEED);
        assert!((at_54 - at_48 - 0.4).abs() < 1e-9);
    }

    #[test]
    fn speed_is_monotonic_and_capped() {
        let profile = Difficulty::Hard.profile();
        let mut previous = speed_for_score(&profile, 0, MAX_SPEED);
        for score in 1..1000 {
            let speed = speed_for_score(&profile, score, MAX_SPEED);
            assert!(speed >= previous, "speed dropped at score {}", score);
            assert!(speed <= MAX_SPEED);
            previous = speed;
        }
        assert_eq!(previous, MAX_SPEED);
    }

    #[test]
    fn spawn_interval_is_monotonic_and_floored() {
        let profile = Difficulty::Easy.profile();
        let mut previous = spawn_interval_for_score(&profile, 0, MIN_INTERVAL);
        assert_eq!(previous, 2000.0);
        for score in 1..1000 {
            let interval = spawn_interval_for_score(&profile, score, MIN_INTERVAL);
            assert!(interval <= previous, "interval grew at score {}", score);
            assert!(interval >= MIN_INTERVAL);
            previous = interval;
        }
        assert_eq!(previous, MIN_INTERVAL);
    }

    #[test]
    fn spawn_interval_steps_every_eight_points() {
        let profile = Difficulty::Normal.profile();
        assert_eq!(spawn_interval_for_score(&profile, 7, MIN_INTERVAL), 1500.0);
        assert_eq!(spawn_interval_for_score(&profile, 8, MIN_INTERVAL), 1420.0);
    }
}
