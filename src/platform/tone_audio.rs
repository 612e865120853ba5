//=========================================================================
// Tone Audio
//
// Audio sink that synthesizes each cue as a short square-wave melody and
// plays it through the default output device.
//
// Architecture:
// ```text
//   Mixer ──play/pause/resume──> ToneAudio ──lock──> ToneBank
//                                                       ↑
//   cpal output callback (audio thread) ──render()──────┘
// ```
//
// The bank is shared behind a mutex with the output callback. When no
// device is available the bank still tracks playback state, but nothing
// is rendered.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

//=== External Crates =====================================================

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use log::{debug, info, trace, warn};

//=== Internal Imports ====================================================

use crate::core::audio::{AudioSink, Cue};

//=== Constants ===========================================================

pub(crate) const SAMPLE_RATE: u32 = 44_100;
const CHANNELS: u16 = 2;

/// Peak level of one voice at full volume.
const AMPLITUDE: f32 = 0.2;

/// Fade-out at the end of every note, in milliseconds.
const RELEASE_MS: u32 = 5;

//=== Melodies ============================================================

/// One note of a cue; `hz == 0.0` is a rest.
#[derive(Debug, Clone, Copy)]
struct Note {
    hz: f32,
    ms: u32,
}

const fn note(hz: f32, ms: u32) -> Note {
    Note { hz, ms }
}

const BACKGROUND: &[Note] = &[
    note(262.0, 220),
    note(330.0, 220),
    note(392.0, 220),
    note(330.0, 220),
    note(294.0, 220),
    note(349.0, 220),
    note(440.0, 220),
    note(0.0, 220),
];
const JUMP: &[Note] = &[note(660.0, 50), note(880.0, 70)];
const POINT: &[Note] = &[note(1320.0, 60)];
const GAME_OVER: &[Note] = &[note(440.0, 160), note(330.0, 160), note(220.0, 320)];
const BONUS: &[Note] = &[note(880.0, 90), note(1109.0, 90), note(1319.0, 180)];

fn melody(cue: Cue) -> &'static [Note] {
    match cue {
        Cue::Background => BACKGROUND,
        Cue::Jump => JUMP,
        Cue::Point => POINT,
        Cue::GameOver => GAME_OVER,
        Cue::Bonus => BONUS,
    }
}

fn samples_for(ms: u32, sample_rate: u32) -> usize {
    (u64::from(ms) * u64::from(sample_rate) / 1000) as usize
}

//=== ToneBank ============================================================

#[derive(Debug, Clone, Copy)]
struct Voice {
    /// Sample offset into the cue's melody.
    position: usize,
    volume: f32,
    playing: bool,
    paused: bool,
}

impl Voice {
    const fn silent(volume: f32) -> Self {
        Self {
            position: 0,
            volume,
            playing: false,
            paused: false,
        }
    }
}

/// Playback state of every cue, rendered sample by sample.
pub(crate) struct ToneBank {
    sample_rate: u32,
    voices: HashMap<Cue, Voice>,
}

impl ToneBank {
    pub(crate) fn new(sample_rate: u32) -> Self {
        let voices = Cue::ALL.into_iter().map(|cue| (cue, Voice::silent(0.0))).collect();
        Self { sample_rate, voices }
    }

    //--- Playback ---------------------------------------------------------

    /// Restarts `cue` from its first sample.
    pub(crate) fn play(&mut self, cue: Cue, volume: f32) {
        let voice = self.voice(cue);
        *voice = Voice {
            position: 0,
            volume,
            playing: true,
            paused: false,
        };
    }

    pub(crate) fn pause(&mut self, cue: Cue) {
        let voice = self.voice(cue);
        if voice.playing {
            voice.paused = true;
        }
    }

    /// Continues a paused cue; a cue that is not playing starts over.
    pub(crate) fn resume(&mut self, cue: Cue, volume: f32) {
        let voice = self.voice(cue);
        if voice.playing {
            voice.paused = false;
            voice.volume = volume;
        } else {
            self.play(cue, volume);
        }
    }

    pub(crate) fn set_volume(&mut self, cue: Cue, volume: f32) {
        self.voice(cue).volume = volume;
    }

    /// Whether `cue` is currently producing samples.
    #[cfg(test)]
    pub(crate) fn is_sounding(&self, cue: Cue) -> bool {
        self.voices.get(&cue).is_some_and(|v| v.playing && !v.paused)
    }

    //--- render() ---------------------------------------------------------
    //
    // Fills an interleaved buffer with `channels` samples per frame. Every
    // channel carries the same mono mix. One-shot cues stop at the end of
    // their melody; looping cues wrap to the start.
    //
    pub(crate) fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let sample = self.next_sample();
            frame.fill(sample);
        }
    }

    fn next_sample(&mut self) -> f32 {
        let sample_rate = self.sample_rate;
        let mut mix = 0.0_f32;

        for (&cue, voice) in self.voices.iter_mut() {
            if !voice.playing || voice.paused {
                continue;
            }

            let notes = melody(cue);
            let length: usize = notes.iter().map(|n| samples_for(n.ms, sample_rate)).sum();
            if voice.position >= length {
                if cue.is_looping() && length > 0 {
                    voice.position = 0;
                } else {
                    voice.playing = false;
                    trace!(target: "audio", "{:?} finished", cue);
                    continue;
                }
            }

            mix += tone_at(notes, voice.position, sample_rate) * voice.volume * AMPLITUDE;
            voice.position += 1;
        }

        mix.clamp(-1.0, 1.0)
    }

    fn voice(&mut self, cue: Cue) -> &mut Voice {
        self.voices.entry(cue).or_insert(Voice::silent(0.0))
    }
}

/// Square wave of the note under `position`, faded over its last few ms.
fn tone_at(notes: &[Note], position: usize, sample_rate: u32) -> f32 {
    let release = samples_for(RELEASE_MS, sample_rate).max(1);
    let mut start = 0;

    for note in notes {
        let length = samples_for(note.ms, sample_rate);
        if position < start + length {
            if note.hz <= 0.0 {
                return 0.0;
            }
            let t = (position - start) as f32 / sample_rate as f32;
            let wave = if (t * note.hz).fract() < 0.5 { 1.0 } else { -1.0 };
            let remaining = start + length - position;
            let envelope = (remaining as f32 / release as f32).min(1.0);
            return wave * envelope;
        }
        start += length;
    }

    0.0
}

//=== AudioOpenError ======================================================

/// Reasons the output stream could not be opened.
#[derive(Debug)]
pub(crate) enum AudioOpenError {
    NoDevice,
    Build(cpal::BuildStreamError),
    Play(cpal::PlayStreamError),
}

impl std::fmt::Display for AudioOpenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDevice => write!(f, "no default output device"),
            Self::Build(e) => write!(f, "output stream creation failed: {}", e),
            Self::Play(e) => write!(f, "output stream failed to start: {}", e),
        }
    }
}

impl std::error::Error for AudioOpenError {}

//=== ToneAudio ===========================================================

/// Sink backed by a [`ToneBank`] and, when available, a live output stream.
pub(crate) struct ToneAudio {
    bank: Arc<Mutex<ToneBank>>,

    /// Kept alive for as long as the sink exists.
    _stream: Option<Stream>,
}

impl ToneAudio {
    /// Opens the default output device, falling back to silence.
    pub(crate) fn open() -> Self {
        let bank = Arc::new(Mutex::new(ToneBank::new(SAMPLE_RATE)));
        let stream = match open_stream(Arc::clone(&bank)) {
            Ok(stream) => {
                info!(target: "audio", "Audio output opened ({} Hz, {} channels)", SAMPLE_RATE, CHANNELS);
                Some(stream)
            }
            Err(e) => {
                warn!(target: "audio", "Audio disabled: {}", e);
                None
            }
        };
        Self { bank, _stream: stream }
    }

    /// Sink with no output stream.
    #[cfg(test)]
    pub(crate) fn silent() -> Self {
        Self {
            bank: Arc::new(Mutex::new(ToneBank::new(SAMPLE_RATE))),
            _stream: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_sounding(&self, cue: Cue) -> bool {
        self.with_bank(|bank| bank.is_sounding(cue))
    }

    fn with_bank<R>(&self, f: impl FnOnce(&mut ToneBank) -> R) -> R {
        let mut bank = self.bank.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut bank)
    }
}

impl AudioSink for ToneAudio {
    fn play(&mut self, cue: Cue, volume: f32) {
        debug!(target: "audio", "play {:?} @ {:.2}", cue, volume);
        self.with_bank(|bank| bank.play(cue, volume));
    }

    fn pause(&mut self, cue: Cue) {
        debug!(target: "audio", "pause {:?}", cue);
        self.with_bank(|bank| bank.pause(cue));
    }

    fn resume(&mut self, cue: Cue, volume: f32) {
        debug!(target: "audio", "resume {:?} @ {:.2}", cue, volume);
        self.with_bank(|bank| bank.resume(cue, volume));
    }

    fn set_volume(&mut self, cue: Cue, volume: f32) {
        trace!(target: "audio", "volume {:?} -> {:.2}", cue, volume);
        self.with_bank(|bank| bank.set_volume(cue, volume));
    }
}

fn open_stream(bank: Arc<Mutex<ToneBank>>) -> Result<Stream, AudioOpenError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioOpenError::NoDevice)?;

    let config = StreamConfig {
        channels: CHANNELS,
        sample_rate: SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    };

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut bank = bank.lock().unwrap_or_else(PoisonError::into_inner);
                bank.render(data, usize::from(CHANNELS));
            },
            |err| warn!(target: "audio", "Audio stream error: {}", err),
            None,
        )
        .map_err(AudioOpenError::Build)?;

    stream.play().map_err(AudioOpenError::Play)?;
    Ok(stream)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    /// Renders `ms` of mono audio and returns the peak level.
    fn peak(bank: &mut ToneBank, ms: u32) -> f32 {
        let mut out = vec![0.0; samples_for(ms, SAMPLE_RATE)];
        bank.render(&mut out, 1);
        out.iter().fold(0.0_f32, |peak, s| peak.max(s.abs()))
    }

    fn melody_ms(cue: Cue) -> u32 {
        melody(cue).iter().map(|n| n.ms).sum()
    }

    //=====================================================================
    // ToneBank Tests
    //=====================================================================

    #[test]
    fn idle_bank_renders_silence() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        assert_eq!(peak(&mut bank, 50), 0.0);
    }

    #[test]
    fn played_cue_produces_sound_scaled_by_volume() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        bank.play(Cue::Point, 0.5);
        let level = peak(&mut bank, 30);
        assert!((level - 0.5 * AMPLITUDE).abs() < 1e-6, "peak was {}", level);
    }

    #[test]
    fn one_shot_cue_stops_after_its_melody() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        bank.play(Cue::Jump, 1.0);
        peak(&mut bank, melody_ms(Cue::Jump) + 10);

        assert!(!bank.is_sounding(Cue::Jump));
        assert_eq!(peak(&mut bank, 50), 0.0);
    }

    #[test]
    fn background_loops() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        bank.play(Cue::Background, 1.0);
        peak(&mut bank, melody_ms(Cue::Background) * 2 + 100);

        assert!(bank.is_sounding(Cue::Background));
        assert!(peak(&mut bank, 100) > 0.0);
    }

    #[test]
    fn pause_silences_and_resume_continues() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        bank.play(Cue::Background, 1.0);
        peak(&mut bank, 100);
        let position = bank.voices[&Cue::Background].position;

        bank.pause(Cue::Background);
        assert_eq!(peak(&mut bank, 100), 0.0);
        assert_eq!(bank.voices[&Cue::Background].position, position);

        bank.resume(Cue::Background, 0.7);
        assert!(bank.is_sounding(Cue::Background));
        assert_eq!(bank.voices[&Cue::Background].position, position);
        assert!(peak(&mut bank, 50) > 0.0);
    }

    #[test]
    fn resume_of_stopped_cue_starts_over() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        bank.resume(Cue::Background, 1.0);
        assert!(bank.is_sounding(Cue::Background));
        assert_eq!(bank.voices[&Cue::Background].position, 0);
    }

    #[test]
    fn zero_volume_is_silent() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        bank.play(Cue::Background, 1.0);
        bank.set_volume(Cue::Background, 0.0);
        assert_eq!(peak(&mut bank, 50), 0.0);
        assert!(bank.is_sounding(Cue::Background));
    }

    #[test]
    fn stereo_frames_share_the_mix() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        bank.play(Cue::Point, 1.0);
        let mut out = vec![0.0; 64];
        bank.render(&mut out, 2);

        for frame in out.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(out.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn mix_is_clamped() {
        let mut bank = ToneBank::new(SAMPLE_RATE);
        for cue in Cue::ALL {
            bank.play(cue, 10.0);
        }
        assert!(peak(&mut bank, 20) <= 1.0);
    }

    //=====================================================================
    // ToneAudio Tests
    //=====================================================================

    #[test]
    fn sink_drives_the_bank() {
        let mut audio = ToneAudio::silent();
        audio.play(Cue::Background, 0.5);
        assert!(audio.is_sounding(Cue::Background));

        audio.pause(Cue::Background);
        assert!(!audio.is_sounding(Cue::Background));

        audio.resume(Cue::Background, 0.5);
        assert!(audio.is_sounding(Cue::Background));
    }
}
