//=========================================================================
// Render Bridge
//=========================================================================
//
// Decouples the simulation from whatever displays it.
//
// Flow:
//   GameLoop::snapshot() ──> Snapshot ──> Surface::draw()
//   GameEvent (score, game over, phase) ──> Surface text/screen hooks
//
// A `Snapshot` is a plain copy of entity geometry in whole pixels, so a
// surface never touches simulation state.
//
//=========================================================================

//=== EntityView ==========================================================

/// Position and size of one drawable entity, rounded to whole pixels.
///
/// `bottom` is measured up from the ground line, like CSS `bottom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityView {
    pub left: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
    /// Background image name.
    pub sprite: &'static str,
}

//=== Snapshot ============================================================

/// Everything a surface needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub player: EntityView,
    /// Obstacles keyed by id, in spawn order.
    pub obstacles: Vec<(u64, EntityView)>,
}

//=== Screen ==============================================================

/// Top-level screen the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Pre-game screen with name, difficulty and volume inputs.
    Start,
    Playing,
    GameOver,
}

//=== Surface =============================================================

/// Presentation layer the driver writes to.
///
/// Only `draw`, `show_score`, `show_final_score` and `show_screen` are
/// required. The remaining hooks default to no-ops so a surface without a
/// pause button or volume sliders still works.
pub trait Surface {
    fn draw(&mut self, snapshot: &Snapshot);

    /// Score counter text, e.g. `Votes: 12`.
    fn show_score(&mut self, text: &str);

    /// Game-over panel text, e.g. `Ada, your votes: 12`.
    fn show_final_score(&mut self, text: &str);

    fn show_screen(&mut self, screen: Screen);

    /// Pause button label (`Pause` or `Resume`).
    fn set_pause_label(&mut self, _label: &str) {}

    /// Keeps every volume slider showing the shared master volume.
    fn sync_volume(&mut self, _volume: f32) {}
}

//=== Text ================================================================

pub fn score_text(score: u32) -> String {
    format!("Votes: {}", score)
}

pub fn final_score_text(player_name: &str, score: u32) -> String {
    format!("{}, your votes: {}", player_name, score)
}

pub fn pause_label(paused: bool) -> &'static str {
    if paused {
        "Resume"
    } else {
        "Pause"
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    //--- Test Surface -----------------------------------------------------

    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) frames: Vec<Snapshot>,
        pub(crate) score: Option<String>,
        pub(crate) final_score: Option<String>,
        pub(crate) screens: Vec<Screen>,
        pub(crate) pause_label: Option<String>,
        pub(crate) volume: Option<f32>,
    }

    impl RecordingSurface {
        pub(crate) fn screen(&self) -> Option<Screen> {
            self.screens.last().copied()
        }
    }

    impl Surface for RecordingSurface {
        fn draw(&mut self, snapshot: &Snapshot) {
            self.frames.push(snapshot.clone());
        }

        fn show_score(&mut self, text: &str) {
            self.score = Some(text.to_string());
        }

        fn show_final_score(&mut self, text: &str) {
            self.final_score = Some(text.to_string());
        }

        fn show_screen(&mut self, screen: Screen) {
            self.screens.push(screen);
        }

        fn set_pause_label(&mut self, label: &str) {
            self.pause_label = Some(label.to_string());
        }

        fn sync_volume(&mut self, volume: f32) {
            self.volume = Some(volume);
        }
    }

    /// Surface implementing only the required hooks.
    struct MinimalSurface;

    impl Surface for MinimalSurface {
        fn draw(&mut self, _snapshot: &Snapshot) {}
        fn show_score(&mut self, _text: &str) {}
        fn show_final_score(&mut self, _text: &str) {}
        fn show_screen(&mut self, _screen: Screen) {}
    }

    //=== Text ============================================================

    #[test]
    fn score_text_format() {
        assert_eq!(score_text(0), "Votes: 0");
        assert_eq!(score_text(51), "Votes: 51");
    }

    #[test]
    fn final_score_text_format() {
        assert_eq!(final_score_text("Ada", 12), "Ada, your votes: 12");
    }

    #[test]
    fn pause_label_reflects_state() {
        assert_eq!(pause_label(false), "Pause");
        assert_eq!(pause_label(true), "Resume");
    }

    //=== Surface =========================================================

    #[test]
    fn optional_hooks_are_tolerated() {
        let mut surface = MinimalSurface;
        surface.set_pause_label("Resume");
        surface.sync_volume(0.3);
    }
}
