// Scales, chord progressions, and scale-degree lookups.
//
// A `ScaleSpec` is a root MIDI pitch plus an ordered semitone-offset table
// covering one octave and the octave note (eight entries for the built-in
// scales). Scale-degree indices are 0-based; progression templates use
// 1-based degrees the way chord symbols are written (1 = tonic, 5 =
// dominant). Every index is clamped into the offset table before lookup.
//
// Each style owns small catalogs of both; `profile.rs` wires them up and
// `compose.rs` draws one of each per generation.

use serde::Serialize;

pub const MAJOR: &[u8] = &[0, 2, 4, 5, 7, 9, 11, 12];
pub const MINOR: &[u8] = &[0, 2, 3, 5, 7, 8, 10, 12];
/// Minor-flavoured scale with a flat second, used by suspense.
pub const JAPANESE_LIKE: &[u8] = &[0, 1, 5, 7, 10, 12, 13, 17];

/// A concrete scale: root pitch, mode name, and offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScaleSpec {
    pub root: u8,
    pub mode: &'static str,
    pub offsets: &'static [u8],
}

impl ScaleSpec {
    pub const fn major(root: u8) -> Self {
        ScaleSpec {
            root,
            mode: "major",
            offsets: MAJOR,
        }
    }

    pub const fn minor(root: u8) -> Self {
        ScaleSpec {
            root,
            mode: "minor",
            offsets: MINOR,
        }
    }

    pub const fn japanese_like(root: u8) -> Self {
        ScaleSpec {
            root,
            mode: "japanese_like",
            offsets: JAPANESE_LIKE,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Clamp a (possibly negative or oversized) degree index into the table.
    pub fn clamp_index(&self, index: i32) -> usize {
        let max = self.offsets.len().saturating_sub(1) as i32;
        index.clamp(0, max) as usize
    }

    /// Absolute pitch of a degree, transposed by `octave_shift` semitones.
    /// The index is clamped first.
    pub fn pitch(&self, index: i32, octave_shift: i32) -> i32 {
        let idx = self.clamp_index(index);
        let offset = self.offsets.get(idx).copied().unwrap_or(0);
        self.root as i32 + octave_shift + offset as i32
    }

    /// Pitch of the tonic (degree 0).
    pub fn tonic(&self) -> i32 {
        self.pitch(0, 0)
    }
}

/// 0-based chord-root degree for a 1-based progression value.
pub fn chord_root_degree(degree: u8) -> usize {
    (degree as usize + 6) % 7
}

/// Repeat or truncate `template` so there is exactly one degree per bar.
pub fn expand_progression(template: &[u8], bars: usize) -> Vec<u8> {
    template.iter().copied().cycle().take(bars).collect()
}
