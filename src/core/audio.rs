//=========================================================================
// Audio
//=========================================================================
//
// Sound cues, master volume, and the playback seam.
//
// Architecture:
//   GameLoop ──AudioCommand──> Mixer ──(cue, volume)──> AudioSink
//
// The mixer owns the single master volume that every volume slider
// drives. Each cue plays at `master * gain(cue)`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::config::DEFAULT_VOLUME;

//=== Cue =================================================================

/// The five sounds the game can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Looping background track.
    Background,
    Jump,
    Point,
    GameOver,
    /// Played on every 50th point.
    Bonus,
}

impl Cue {
    pub const ALL: [Cue; 5] = [
        Self::Background,
        Self::Jump,
        Self::Point,
        Self::GameOver,
        Self::Bonus,
    ];

    /// Per-cue multiplier applied on top of the master volume.
    pub const fn gain(self) -> f32 {
        match self {
            Self::Background => 1.0,
            Self::Jump => 0.9,
            Self::Point => 0.8,
            Self::GameOver => 1.0,
            Self::Bonus => 0.9,
        }
    }

    /// Whether the cue restarts when it reaches its end.
    pub const fn is_looping(self) -> bool {
        matches!(self, Self::Background)
    }
}

//=== AudioCommand ========================================================

/// Playback request emitted by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    /// Rewind to time zero and play.
    Play(Cue),
    /// Pause without rewinding.
    Pause(Cue),
    /// Continue from the paused position.
    Resume(Cue),
}

//=== AudioSink ===========================================================

/// Playback backend.
///
/// Implementations own the actual sound handles. Volumes passed in are
/// already mixed and lie in `0.0..=1.0`.
pub trait AudioSink {
    /// Plays `cue` from the start at `volume`.
    fn play(&mut self, cue: Cue, volume: f32);

    fn pause(&mut self, cue: Cue);

    fn resume(&mut self, cue: Cue, volume: f32);

    /// Updates the volume of a cue that may currently be playing.
    fn set_volume(&mut self, _cue: Cue, _volume: f32) {}
}

//=== Mixer ===============================================================

/// Applies the master volume and forwards commands to a sink.
pub struct Mixer<S: AudioSink> {
    master: f32,
    sink: S,
}

impl<S: AudioSink> Mixer<S> {
    /// Creates a mixer at the default master volume.
    pub fn new(sink: S) -> Self {
        let mut mixer = Self { master: DEFAULT_VOLUME, sink };
        mixer.push_volumes();
        mixer
    }

    pub fn master(&self) -> f32 {
        self.master
    }

    /// Mixed volume for a cue at the current master level.
    pub fn volume_of(&self, cue: Cue) -> f32 {
        self.master * cue.gain()
    }

    /// Sets the master volume, clamped to `0.0..=1.0`, and returns the
    /// value actually applied. Non-finite input is ignored.
    pub fn set_master(&mut self, volume: f32) -> f32 {
        if !volume.is_finite() {
            debug!(target: "audio", "Ignoring non-finite volume {}", volume);
            return self.master;
        }
        self.master = volume.clamp(0.0, 1.0);
        self.push_volumes();
        self.master
    }

    pub fn apply(&mut self, command: AudioCommand) {
        match command {
            AudioCommand::Play(cue) => {
                let volume = self.volume_of(cue);
                self.sink.play(cue, volume);
            }
            AudioCommand::Pause(cue) => self.sink.pause(cue),
            AudioCommand::Resume(cue) => {
                let volume = self.volume_of(cue);
                self.sink.resume(cue, volume);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    fn push_volumes(&mut self) {
        for cue in Cue::ALL {
            let volume = self.volume_of(cue);
            self.sink.set_volume(cue, volume);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
