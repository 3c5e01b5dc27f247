// Motif palettes and per-bar motif selection.
//
// A motif is a short run of (relative scale degree, duration in beats) steps.
// The relative degree is added to the bar's chord root on weak beats; strong
// beats pick a chord tone instead, so a motif mostly contributes rhythm and
// contour. Each style has its own palette, most of whose motifs fill exactly
// one 4-beat bar.
//
// Selection reuses the previous bar's palette slot (by index) with 40%
// probability; the first bar always draws fresh.

use chipseed_prng::SeedRng;

/// Probability that a bar repeats the previous bar's motif slot.
pub const REUSE_CHANCE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotifStep {
    pub rel: i8,
    pub beats: f64,
}

const fn s(rel: i8, beats: f64) -> MotifStep {
    MotifStep { rel, beats }
}

/// One melodic/rhythmic fragment.
pub type Motif = &'static [MotifStep];

pub const CLASSIC: &[Motif] = &[
    &[s(0, 1.0), s(2, 1.0), s(4, 2.0)],
    &[s(4, 1.0), s(2, 1.0), s(0, 2.0)],
    &[s(0, 0.5), s(4, 0.5), s(5, 1.0), s(4, 1.0), s(2, 1.0)],
    &[s(0, 0.5), s(1, 0.5), s(0, 0.5), s(1, 0.5), s(2, 2.0)],
    &[s(0, 0.5), s(2, 0.5), s(4, 0.5), s(2, 0.5), s(0, 2.0)],
    &[s(0, 1.0), s(4, 1.0), s(0, 2.0)],
    &[s(2, 0.5), s(4, 0.5), s(5, 0.5), s(4, 0.5), s(2, 0.5), s(0, 1.5)],
    &[s(0, 0.5), s(0, 0.5), s(2, 0.5), s(2, 0.5), s(4, 2.0)],
    &[s(4, 0.5), s(5, 0.5), s(4, 0.5), s(2, 0.5), s(0, 2.0)],
    &[s(0, 1.0), s(1, 0.5), s(2, 0.5), s(4, 2.0)],
];

pub const LOFI: &[Motif] = &[
    &[s(0, 1.5), s(2, 1.0), s(4, 1.5)],
    &[s(0, 2.0), s(2, 2.0)],
    &[s(4, 1.0), s(2, 1.5), s(0, 1.5)],
    &[s(0, 1.0), s(1, 1.0), s(2, 2.0)],
    &[s(0, 2.0), s(4, 2.0)],
    &[s(2, 1.0), s(4, 1.0), s(5, 1.0), s(4, 1.0)],
    &[s(0, 1.0), s(2, 1.5), s(0, 1.5)],
    &[s(4, 1.0), s(2, 1.0), s(1, 1.0), s(0, 1.0)],
    &[s(0, 1.5), s(4, 1.0), s(2, 1.5)],
];

pub const BATTLE: &[Motif] = &[
    &[s(0, 0.5), s(0, 0.5), s(2, 1.0), s(0, 2.0)],
    &[s(0, 0.5), s(4, 0.5), s(0, 0.5), s(4, 0.5), s(2, 2.0)],
    &[s(0, 1.0), s(2, 1.0), s(4, 2.0)],
    &[s(0, 0.5), s(2, 0.5), s(0, 0.5), s(2, 0.5), s(4, 2.0)],
    &[s(4, 0.5), s(0, 0.5), s(4, 0.5), s(0, 0.5), s(2, 2.0)],
    &[s(0, 0.5), s(4, 0.5), s(2, 0.5), s(0, 0.5), s(4, 2.0)],
    &[s(0, 1.0), s(4, 1.0), s(0, 2.0)],
    &[s(2, 0.5), s(4, 0.5), s(2, 0.5), s(0, 0.5), s(2, 2.0)],
];

pub const SUSPENSE: &[Motif] = &[
    &[
        s(0, 0.5),
        s(1, 0.5),
        s(0, 0.5),
        s(-1, 0.5),
        s(0, 0.5),
        s(1, 0.5),
        s(0, 0.5),
        s(-1, 0.5),
    ],
    &[s(0, 0.5), s(2, 0.5), s(1, 0.5), s(0, 0.5), s(0, 1.0), s(2, 1.0)],
    &[s(2, 1.0), s(0, 0.5), s(1, 0.5), s(0, 1.0), s(-2, 1.0)],
    &[s(0, 0.5), s(1, 0.5), s(2, 0.5), s(1, 0.5), s(0, 2.0)],
    &[s(2, 0.5), s(0, 1.0), s(-1, 0.5), s(0, 2.0)],
    &[s(0, 1.0), s(1, 0.5), s(0, 2.5)],
    &[s(2, 0.5), s(1, 0.5), s(0, 0.5), s(-1, 0.5), s(0, 2.0)],
    &[s(0, 0.5), s(1, 0.5), s(0, 0.5), s(-1, 0.5), s(0, 2.0)],
];

pub const CALM: &[Motif] = &[
    &[s(0, 2.0), s(2, 2.0)],
    &[s(0, 1.0), s(1, 1.0), s(2, 2.0)],
    &[s(2, 2.0), s(0, 2.0)],
    &[s(0, 1.0), s(2, 1.0), s(4, 2.0)],
    &[s(0, 2.0), s(4, 2.0)],
    &[s(2, 1.0), s(4, 1.0), s(5, 1.0), s(4, 1.0)],
    &[s(0, 1.5), s(2, 1.0), s(0, 1.5)],
    &[s(4, 1.0), s(2, 1.0), s(1, 1.0), s(0, 1.0)],
    &[s(0, 1.0), s(1, 1.0), s(2, 1.0), s(4, 1.0)],
];

pub const ROCK: &[Motif] = &[
    &[s(0, 1.0), s(4, 1.0), s(0, 2.0)],
    &[s(0, 0.5), s(0, 0.5), s(2, 1.0), s(0, 2.0)],
    &[s(0, 1.0), s(2, 1.0), s(4, 2.0)],
    &[s(0, 1.0), s(1, 1.0), s(2, 2.0)],
    &[s(0, 0.5), s(4, 0.5), s(0, 0.5), s(4, 0.5), s(0, 2.0)],
    &[s(4, 1.0), s(0, 1.0), s(4, 2.0)],
    &[s(0, 1.0), s(2, 0.5), s(4, 0.5), s(2, 2.0)],
    &[s(0, 0.5), s(2, 0.5), s(0, 0.5), s(2, 0.5), s(4, 2.0)],
];

pub const WORKSHOP: &[Motif] = &[
    &[s(0, 2.0), s(2, 2.0)],
    &[s(0, 1.0), s(2, 1.0), s(4, 2.0)],
    &[s(0, 2.0), s(4, 2.0)],
    &[s(2, 1.0), s(4, 1.0), s(2, 2.0)],
    &[s(0, 1.0), s(1, 1.0), s(2, 2.0)],
    &[s(0, 1.5), s(2, 1.0), s(0, 1.5)],
    &[s(4, 1.0), s(2, 1.0), s(0, 2.0)],
    &[s(0, 1.0), s(4, 1.0), s(0, 2.0)],
];

pub const DANCE: &[Motif] = &[
    &[s(0, 1.0), s(2, 1.0), s(4, 2.0)],
    &[s(0, 0.5), s(0, 0.5), s(2, 1.0), s(0, 2.0)],
    &[s(0, 1.0), s(4, 1.0), s(2, 1.0), s(0, 1.0)],
    &[s(0, 1.0), s(1, 1.0), s(2, 2.0)],
    &[s(4, 1.0), s(2, 1.0), s(0, 2.0)],
];

/// Picks one palette slot per bar, remembering the previous slot.
#[derive(Debug, Default)]
pub struct MotifSelector {
    previous: Option<usize>,
}

impl MotifSelector {
    pub fn new() -> Self {
        MotifSelector::default()
    }

    /// Palette index for the next bar. `None` only for an empty palette.
    pub fn next(&mut self, rng: &mut SeedRng, palette_len: usize) -> Option<usize> {
        let index = match self.previous {
            Some(prev) if prev < palette_len && rng.random_bool(REUSE_CHANCE) => prev,
            _ => rng.choose_index(palette_len)?,
        };
        self.previous = Some(index);
        Some(index)
    }
}

/// Steps of `motif` laid end to end across one bar of `bar_beats`.
///
/// A motif shorter than the bar repeats; the step crossing the bar line is
/// cut at it. Returns (beat offset, duration) pairs alongside each step.
pub fn fit_to_bar(motif: Motif, bar_beats: f64) -> Vec<(f64, f64, MotifStep)> {
    const EPS: f64 = 1e-9;
    let mut out = Vec::new();
    if motif.iter().all(|st| st.beats <= 0.0) {
        return out;
    }
    let mut cursor = 0.0;
    for step in motif.iter().cycle() {
        if cursor >= bar_beats - EPS {
            break;
        }
        if step.beats <= 0.0 {
            continue;
        }
        let beats = step.beats.min(bar_beats - cursor);
        out.push((cursor, beats, *step));
        cursor += step.beats;
    }
    out
}
