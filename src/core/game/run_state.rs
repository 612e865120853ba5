//=========================================================================
// Run State
//=========================================================================
//
// Per-run counters: score, current difficulty values, and timers.
// Created fresh by every `start`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::difficulty::{spawn_interval_for_score, speed_for_score, DifficultyProfile};
use crate::core::config::GameConfig;

//=== RunState ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub(crate) profile: DifficultyProfile,
    pub(crate) score: u32,
    pub(crate) speed: f64,
    pub(crate) spawn_interval_ms: f64,
    /// Time accumulated since the last spawn.
    pub(crate) spawn_timer_ms: f64,
    /// Simulated time since the run started (paused frames excluded).
    pub(crate) elapsed_ms: f64,
}

impl RunState {
    pub fn new(profile: DifficultyProfile) -> Self {
        Self {
            profile,
            score: 0,
            speed: profile.base_speed,
            spawn_interval_ms: profile.base_spawn_interval_ms,
            spawn_timer_ms: 0.0,
            elapsed_ms: 0.0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.spawn_interval_ms
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Adds one point and rescales difficulty. Returns the new score.
    pub(crate) fn add_point(&mut self, config: &GameConfig) -> u32 {
        self.score += 1;
        self.speed = speed_for_score(&self.profile, self.score, config.max_speed);
        self.spawn_interval_ms =
            spawn_interval_for_score(&self.profile, self.score, config.min_spawn_interval_ms);
        self.score
    }

    /// Accumulates `delta_ms` on the spawn timer. Returns `true` (and
    /// resets the timer) when the spawn interval has been reached.
    pub(crate) fn spawn_due(&mut self, delta_ms: f64) -> bool {
        self.spawn_timer_ms += delta_ms;
        if self.spawn_timer_ms >= self.spawn_interval_ms {
            self.spawn_timer_ms = 0.0;
            true
        } else {
            false
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::difficulty::Difficulty;

    #[test]
    fn fresh_state_uses_profile() {
        let state = RunState::new(Difficulty::Hard.profile());
        assert_eq!(state.score(), 0);
        assert_eq!(state.speed(), 6.5);
        assert_eq!(state.spawn_interval_ms(), 1200.0);
        assert_eq!(state.elapsed_ms(), 0.0);
    }

    #[test]
    fn add_point_rescales() {
        let config = GameConfig::default();
        let mut state = RunState::new(Difficulty::Normal.profile());
        for _ in 0..8 {
            state.add_point(&config);
        }
        assert_eq!(state.score(), 8);
        assert!((state.speed() - 5.6).abs() < 1e-9);
        assert_eq!(state.spawn_interval_ms(), 1420.0);
    }

    #[test]
    fn spawn_timer_fires_and_resets() {
        let mut state = RunState::new(Difficulty::Hard.profile());
        assert!(!state.spawn_due(600.0));
        assert!(!state.spawn_due(599.0));
        assert!(state.spawn_due(1.0));
        assert_eq!(state.spawn_timer_ms, 0.0);
        assert!(!state.spawn_due(16.0));
    }
}
