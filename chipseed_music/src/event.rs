// Output data model: note and drum events, tracks, and the assembled
// composition.
//
// Pitched events (melody, bass, harmony) are timed in seconds so the renderer
// can play them without knowing the tempo. Drum events stay in beats, since
// drum patterns are edited on a beat grid downstream. Every note carries its
// layer voice (timbre + envelope) directly.
//
// Everything here is plain serde data; nothing is mutated after assembly.

use crate::style::LayerVoice;
use serde::{Deserialize, Serialize};

pub const BEATS_PER_BAR: u32 = 4;

/// Round and clamp a computed velocity into MIDI range 1-127.
pub fn clamp_velocity(v: f64) -> u8 {
    if v.is_nan() {
        return 1;
    }
    v.round().clamp(1.0, 127.0) as u8
}

/// Clamp a computed pitch into MIDI range 0-127.
pub fn clamp_pitch(p: i32) -> u8 {
    p.clamp(0, 127) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// MIDI pitch, 0-127.
    pub pitch: u8,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds, always > 0.
    pub duration: f64,
    /// MIDI velocity, 1-127.
    pub velocity: u8,
    pub voice: LayerVoice,
}

impl NoteEvent {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrumKind {
    Kick,
    Snare,
    Hihat,
    Crash,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrumEvent {
    pub kind: DrumKind,
    /// Absolute start in beats from the top of the piece.
    pub start_beat: f64,
    pub beats: f64,
    pub velocity: u8,
}

/// Descriptive processing the renderer should apply to a whole track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackEffect {
    HighPass { cutoff_hz: f32, resonance: f32 },
    Vibrato { rate_hz: f32, depth: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteTrack {
    pub name: String,
    /// Relative mix level (1.0 = unity).
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<TrackEffect>,
    pub events: Vec<NoteEvent>,
}

impl NoteTrack {
    pub fn new(name: &str, events: Vec<NoteEvent>) -> Self {
        NoteTrack {
            name: name.to_string(),
            volume: 1.0,
            effects: Vec::new(),
            events,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrumTrack {
    pub name: String,
    pub volume: f64,
    pub events: Vec<DrumEvent>,
}

/// Structural facts about a generated piece, for display and re-generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureInfo {
    pub total_bars: u32,
    pub intro_bars: u32,
    pub main_bars: u32,
    pub variant: String,
    pub scale_root: u8,
    pub scale_mode: String,
    pub progression: Vec<u8>,
    pub quiet_bars: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub name: String,
    pub tempo_bpm: u16,
    pub structure: StructureInfo,
    pub melody: NoteTrack,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bass: Option<NoteTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harmony: Option<NoteTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drums: Option<DrumTrack>,
}

impl Composition {
    pub fn total_beats(&self) -> f64 {
        (self.structure.total_bars * BEATS_PER_BAR) as f64
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_beats() * 60.0 / self.tempo_bpm as f64
    }

    /// Number of tracks present, melody included (1-4).
    pub fn track_count(&self) -> usize {
        1 + self.bass.is_some() as usize
            + self.harmony.is_some() as usize
            + self.drums.is_some() as usize
    }

    /// Pitched tracks in display order.
    pub fn note_tracks(&self) -> impl Iterator<Item = &NoteTrack> {
        std::iter::once(&self.melody)
            .chain(self.bass.as_ref())
            .chain(self.harmony.as_ref())
    }
}
