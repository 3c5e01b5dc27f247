// Per-style generation strategy table.
//
// A `StyleProfile` bundles every style- and variant-dependent knob the
// generators read: catalogs (scales, progressions, motifs), melody shaping
// (rests, tension degrees, jitter, leap smoothing, velocity, articulation),
// the quiet-bar rule, bass/harmony/drum rules, and mix levels. Generators
// only ever look at a profile; adding a style means adding one builder
// function here plus its entries in `style.rs` and `catalog.rs`.
//
// `StyleProfile::build` takes an already-resolved variant id (see
// `catalog::resolve_variant`); any id it doesn't recognize gets the style's
// base tuning.

use crate::error::GenerationError;
use crate::event::{DrumKind, TrackEffect};
use crate::motif::{self, Motif};
use crate::scale::ScaleSpec;
use crate::structure::PhraseRole;
use crate::style::Style;

// ---------------------------------------------------------------------------
// Melody rules
// ---------------------------------------------------------------------------

/// Strong-beat bias toward non-triadic degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TensionRule {
    pub chance: f64,
    pub degrees: &'static [i32],
}

/// If a new pitch lands more than `max` semitones from the previous one, it
/// is pulled to previous ± `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeapRule {
    pub max: i32,
    pub step: i32,
}

pub const WIDE_LEAP: LeapRule = LeapRule { max: 12, step: 7 };
pub const GENTLE_LEAP: LeapRule = LeapRule { max: 7, step: 5 };

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyVelocity {
    pub scale: f64,
    /// Half-width of a whole-number jitter added after scaling; 0 disables it.
    pub jitter: f64,
    /// Lower bound applied after jitter; 0 disables it.
    pub floor: f64,
}

impl MelodyVelocity {
    const fn scaled(scale: f64) -> Self {
        MelodyVelocity {
            scale,
            jitter: 0.0,
            floor: 0.0,
        }
    }
}

/// How one rhythmic slot is sounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Articulation {
    /// One note for the whole slot.
    Single,
    /// Two re-triggered halves, the second slightly louder. The first half
    /// is gated short.
    Halves,
    /// Three uneven re-triggers with the middle one accented.
    Triplet,
}

/// Sixteenth-note runs that replace the motif in variation phrases.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoloRules {
    /// Chance a weak sixteenth moves by one degree rather than two.
    pub step_chance: f64,
    pub strong_velocity: f64,
    pub weak_velocity: f64,
    pub velocity_floor: f64,
}

pub const ROCK_SOLO: SoloRules = SoloRules {
    step_chance: 0.6,
    strong_velocity: 100.0,
    weak_velocity: 85.0,
    velocity_floor: 70.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyRules {
    pub rest_chance: f64,
    pub tension: Option<TensionRule>,
    /// Chance of a ±1 degree nudge on weak beats.
    pub jitter_chance: f64,
    pub leaps: &'static [LeapRule],
    pub velocity: MelodyVelocity,
    pub articulation: Articulation,
    pub solo: Option<SoloRules>,
}

const BASE_MELODY: MelodyRules = MelodyRules {
    rest_chance: 0.25,
    tension: None,
    jitter_chance: 0.0,
    leaps: &[WIDE_LEAP],
    velocity: MelodyVelocity::scaled(1.0),
    articulation: Articulation::Single,
    solo: None,
};

// ---------------------------------------------------------------------------
// Bass rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BassHit {
    pub beat: f64,
    pub beats: f64,
    pub velocity: u8,
}

const fn bh(beat: f64, beats: f64, velocity: u8) -> BassHit {
    BassHit {
        beat,
        beats,
        velocity,
    }
}

const SUSTAINED: &[BassHit] = &[bh(0.0, 4.0, 100)];
const SPLIT: &[BassHit] = &[bh(0.0, 2.0, 100), bh(2.0, 2.0, 100)];

/// Per-bar rhythm selection for the bass line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BassPattern {
    Fixed(&'static [BassHit]),
    /// Even bars use `even`, odd bars `odd`.
    Alternating {
        even: &'static [BassHit],
        odd: &'static [BassHit],
    },
    /// Per bar: `hit` with probability `chance`, else `otherwise`.
    Chance {
        chance: f64,
        hit: &'static [BassHit],
        otherwise: &'static [BassHit],
    },
}

/// Which scale degree the bass plays in a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BassPitch {
    ChordRoot,
    /// Alternate between two fixed degrees by bar parity.
    Alternating(usize, usize),
}

/// Sounding length as a fraction of the slot, never shorter than
/// `min_beats` and never longer than the slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    pub ratio: f64,
    pub min_beats: f64,
}

pub const FULL_GATE: Gate = Gate {
    ratio: 1.0,
    min_beats: 0.0,
};

impl Gate {
    pub fn apply(&self, slot_beats: f64) -> f64 {
        (slot_beats * self.ratio).max(self.min_beats).min(slot_beats)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BassRules {
    pub pattern: BassPattern,
    pub pitch: BassPitch,
    pub gate: Gate,
    pub octave_shift: i32,
}

// ---------------------------------------------------------------------------
// Harmony rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordShape {
    /// Root, third, fifth above the chord root.
    Triad,
    /// Root, fifth and octave; duplicate degrees are dropped.
    Power,
    /// One of the given degree templates, offset by the chord root.
    Tension(&'static [[usize; 3]]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonyRules {
    pub shape: ChordShape,
    /// (beat, beats) slots within a bar.
    pub rhythm: &'static [(f64, f64)],
    pub velocity: u8,
    pub quiet_velocity: u8,
    pub octave_shift: i32,
}

const FIRST_HALF: &[(f64, f64)] = &[(0.0, 2.0)];

const BASE_HARMONY: HarmonyRules = HarmonyRules {
    shape: ChordShape::Triad,
    rhythm: FIRST_HALF,
    velocity: 80,
    quiet_velocity: 50,
    octave_shift: -12,
};

// ---------------------------------------------------------------------------
// Drum rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumHit {
    pub kind: DrumKind,
    pub beat: f64,
    pub beats: f64,
    pub velocity: f64,
    /// Probability the hit sounds; 1.0 means always (no draw).
    pub chance: f64,
}

const fn dh(kind: DrumKind, beat: f64, beats: f64, velocity: f64) -> DrumHit {
    DrumHit {
        kind,
        beat,
        beats,
        velocity,
        chance: 1.0,
    }
}

const fn maybe(kind: DrumKind, beat: f64, velocity: f64, chance: f64) -> DrumHit {
    DrumHit {
        kind,
        beat,
        beats: 0.25,
        velocity,
        chance,
    }
}

use crate::event::DrumKind::{Hihat, Kick, Snare};

const CLASSIC_DRUMS: &[DrumHit] = &[
    dh(Kick, 0.0, 0.25, 100.0),
    dh(Snare, 1.0, 0.25, 100.0),
    dh(Kick, 2.0, 0.25, 100.0),
    dh(Snare, 3.0, 0.25, 100.0),
];

const LOFI_DRUMS: &[DrumHit] = &[
    maybe(Kick, 0.0, 70.0, 0.8),
    maybe(Kick, 2.0, 65.0, 0.6),
    maybe(Snare, 2.0, 60.0, 0.3),
];

const BATTLE_HATS: [DrumHit; 8] = [
    dh(Hihat, 0.0, 0.25, 80.0),
    dh(Hihat, 0.5, 0.25, 80.0),
    dh(Hihat, 1.0, 0.25, 80.0),
    dh(Hihat, 1.5, 0.25, 80.0),
    dh(Hihat, 2.0, 0.25, 80.0),
    dh(Hihat, 2.5, 0.25, 80.0),
    dh(Hihat, 3.0, 0.25, 80.0),
    dh(Hihat, 3.5, 0.25, 80.0),
];

const BATTLE_DRUMS: &[DrumHit] = &[
    dh(Kick, 0.0, 0.25, 125.0),
    dh(Snare, 1.0, 0.25, 120.0),
    dh(Kick, 2.0, 0.25, 125.0),
    dh(Snare, 3.0, 0.25, 120.0),
    BATTLE_HATS[0],
    BATTLE_HATS[1],
    BATTLE_HATS[2],
    BATTLE_HATS[3],
    BATTLE_HATS[4],
    BATTLE_HATS[5],
    BATTLE_HATS[6],
    BATTLE_HATS[7],
];

const BATTLE_DRUMS_HEAVY: &[DrumHit] = &[
    dh(Kick, 0.0, 0.25, 125.0),
    dh(Kick, 1.0, 0.25, 125.0),
    dh(Snare, 1.0, 0.25, 120.0),
    dh(Kick, 2.0, 0.25, 125.0),
    dh(Kick, 3.0, 0.25, 125.0),
    dh(Snare, 3.0, 0.25, 120.0),
    BATTLE_HATS[0],
    BATTLE_HATS[1],
    BATTLE_HATS[2],
    BATTLE_HATS[3],
    BATTLE_HATS[4],
    BATTLE_HATS[5],
    BATTLE_HATS[6],
    BATTLE_HATS[7],
];

const CALM_DRUMS: &[DrumHit] = &[maybe(Kick, 0.0, 50.0, 0.3)];

const ROCK_DRUMS: &[DrumHit] = &[
    dh(Kick, 0.0, 0.25, 120.0),
    dh(Snare, 1.0, 0.25, 115.0),
    dh(Kick, 2.0, 0.25, 120.0),
    dh(Snare, 3.0, 0.25, 115.0),
];

const DANCE_DRUMS: &[DrumHit] = &[
    dh(Kick, 0.0, 0.4, 155.0),
    dh(Hihat, 0.5, 0.25, 70.0),
    dh(Snare, 1.0, 0.4, 150.0),
    dh(Hihat, 1.5, 0.25, 70.0),
    dh(Kick, 2.0, 0.4, 155.0),
    dh(Hihat, 2.5, 0.25, 70.0),
    dh(Snare, 3.0, 0.4, 150.0),
    dh(Hihat, 3.5, 0.25, 70.0),
];

const WORKSHOP_DRUMS: &[DrumHit] = &[
    dh(Kick, 0.0, 0.3, 100.0),
    dh(Hihat, 0.5, 0.25, 60.0),
    dh(Kick, 1.0, 0.3, 100.0),
    dh(Snare, 1.0, 0.3, 95.0),
    dh(Hihat, 1.5, 0.25, 60.0),
    dh(Kick, 2.0, 0.3, 100.0),
    dh(Hihat, 2.5, 0.25, 60.0),
    dh(Kick, 3.0, 0.3, 100.0),
    dh(Snare, 3.0, 0.3, 95.0),
    dh(Hihat, 3.5, 0.25, 60.0),
];

/// Rock solo bars: straight eighth kicks, off-beat snare and sixteenth hats.
const fn rock_solo_bar() -> [DrumHit; 27] {
    let mut hits = [dh(Hihat, 0.0, 0.25, 80.0); 27];
    let mut i = 0;
    while i < 16 {
        hits[i] = dh(Hihat, i as f64 * 0.25, 0.25, 80.0);
        i += 1;
    }
    let mut k = 0;
    while k < 8 {
        let velocity = if k % 2 == 0 { 125.0 } else { 115.0 };
        hits[16 + k] = dh(Kick, k as f64 * 0.5, 0.25, velocity);
        k += 1;
    }
    hits[24] = dh(Snare, 1.0, 0.25, 120.0);
    hits[25] = dh(Snare, 2.5, 0.25, 120.0);
    hits[26] = dh(Snare, 3.0, 0.25, 120.0);
    hits
}

const ROCK_SOLO_DRUMS: &[DrumHit] = &rock_solo_bar();

const ROCK_DRIVE_DRUMS: &[DrumHit] = &[
    dh(Kick, 0.0, 0.25, 120.0),
    dh(Kick, 1.0, 0.25, 120.0),
    dh(Snare, 1.0, 0.25, 115.0),
    dh(Kick, 2.0, 0.25, 120.0),
    dh(Kick, 3.0, 0.25, 120.0),
    dh(Snare, 3.0, 0.25, 115.0),
];

const ROCK_PHRASE_DRUMS: &[(PhraseRole, &[DrumHit])] = &[
    (PhraseRole::Development, ROCK_DRIVE_DRUMS),
    (PhraseRole::Variation, ROCK_SOLO_DRUMS),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumRules {
    pub template: &'static [DrumHit],
    /// Replacement templates for bars in phrases with the given role.
    pub phrase_templates: &'static [(PhraseRole, &'static [DrumHit])],
    /// Chance of a crash on the downbeat of every 4-bar phrase after the intro.
    pub crash_chance: Option<f64>,
}

impl DrumRules {
    /// Template for a bar whose phrase has `role`.
    pub fn template_for(&self, role: Option<PhraseRole>) -> &'static [DrumHit] {
        role
            .and_then(|role| self.phrase_templates.iter().find(|(r, _)| *r == role))
            .map_or(self.template, |&(_, hits)| hits)
    }
}

// ---------------------------------------------------------------------------
// Mix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixLevels {
    pub melody: f64,
    pub bass: f64,
    pub harmony: f64,
    /// Added to the drum base volume, then clamped to the drum range.
    pub drum_boost: f64,
}

const fn mix(melody: f64, bass: f64, harmony: f64, drum_boost: f64) -> MixLevels {
    MixLevels {
        melody,
        bass,
        harmony,
        drum_boost,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumVolume {
    pub base: f64,
    pub max: f64,
}

const BATTLE_DRUM_VOLUME: DrumVolume = DrumVolume {
    base: 1.0,
    max: 1.2,
};

// ---------------------------------------------------------------------------
// Intro entry
// ---------------------------------------------------------------------------

/// When melody and harmony come in during the intro. Drums always follow the
/// two-phase intro in `drums.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroEntry {
    /// Every layer plays from bar 0.
    Immediate,
    /// With an intro of two or more bars, the first two bars have no melody.
    DrumsFirst,
    /// Drums alone for up to two bars, then harmony, then melody one bar
    /// later. The melody may enter after the intro has ended.
    DrumsHarmonyMelody,
}

impl IntroEntry {
    pub fn melody_start(self, intro_bars: usize) -> usize {
        match self {
            IntroEntry::Immediate => 0,
            IntroEntry::DrumsFirst if intro_bars >= 2 => 2,
            IntroEntry::DrumsFirst => 0,
            IntroEntry::DrumsHarmonyMelody => match intro_bars {
                0 => 0,
                1 => 1,
                n => n.min(2) + 1,
            },
        }
    }

    pub fn harmony_start(self, intro_bars: usize) -> usize {
        match self {
            IntroEntry::DrumsHarmonyMelody if intro_bars >= 2 => 2,
            _ => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StyleProfile {
    pub style: Style,
    pub variant: &'static str,
    pub scales: &'static [ScaleSpec],
    pub progressions: &'static [&'static [u8]],
    pub motifs: &'static [Motif],
    pub melody: MelodyRules,
    pub melody_effects: &'static [TrackEffect],
    /// Chance that bars 1 and 3 of each group of four go quiet. `None` for
    /// styles without quiet bars.
    pub quiet_chance: Option<f64>,
    pub intro_entry: IntroEntry,
    pub bass: BassRules,
    pub harmony: HarmonyRules,
    pub drums: DrumRules,
    pub mix: MixLevels,
    /// Base and cap for the boosted drum volume. `None` leaves the drum
    /// track at its default volume and ignores `mix.drum_boost`.
    pub drum_volume: Option<DrumVolume>,
}

impl StyleProfile {
    /// Profile for `style` with an already-resolved variant id.
    pub fn build(style: Style, variant: &'static str) -> StyleProfile {
        match style {
            Style::Classic8Bit => classic(variant),
            Style::Lofi => lofi(variant),
            Style::Battle => battle(variant),
            Style::Suspense => suspense(variant),
            Style::Calm => calm(variant),
            Style::Rock => rock(variant),
            Style::Dance => dance(variant),
            Style::Workshop => workshop(variant),
        }
    }

    /// Check the catalogs a generation run will index into.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let style = self.style;
        if self.scales.is_empty() {
            return Err(GenerationError::EmptyScaleCatalog { style });
        }
        if let Some(scale) = self.scales.iter().find(|s| s.is_empty()) {
            return Err(GenerationError::EmptyScaleOffsets {
                style,
                root: scale.root,
            });
        }
        if self.progressions.is_empty() {
            return Err(GenerationError::EmptyProgressionCatalog { style });
        }
        for template in self.progressions {
            if template.is_empty() {
                return Err(GenerationError::EmptyProgression { style });
            }
            if let Some(&degree) = template.iter().find(|&&d| !(1..=7).contains(&d)) {
                return Err(GenerationError::DegreeOutOfRange { style, degree });
            }
        }
        if self.motifs.is_empty() {
            return Err(GenerationError::EmptyMotifPalette { style });
        }
        for motif in self.motifs {
            if let Some(step) = motif.iter().find(|st| st.beats <= 0.0 || st.beats.is_nan()) {
                return Err(GenerationError::NonPositiveMotifStep {
                    style,
                    beats: step.beats,
                });
            }
        }
        Ok(())
    }

    /// Drum track volume after the mix boost, if this style adjusts it.
    pub fn drum_track_volume(&self) -> Option<f64> {
        self.drum_volume.map(|v| (v.base + self.mix.drum_boost).clamp(0.2, v.max))
    }
}

// ---------------------------------------------------------------------------
// Per-style builders
// ---------------------------------------------------------------------------

fn classic(variant: &'static str) -> StyleProfile {
    const SCALES: &[ScaleSpec] = &[ScaleSpec::major(60), ScaleSpec::minor(57)];
    const PROGRESSIONS: &[&[u8]] = &[
        &[1, 5, 6, 4],
        &[1, 4, 5, 1],
        &[1, 6, 4, 5],
        &[1, 5, 1, 4],
        &[1, 4, 1, 5],
    ];
    const HEAVY: &[BassHit] = &[
        bh(0.0, 0.5, 110),
        bh(1.0, 0.5, 100),
        bh(2.0, 0.5, 110),
        bh(3.0, 0.5, 100),
    ];
    let (pattern, mix_levels) = match variant {
        "classic_8bit_bass_heavy" => (BassPattern::Fixed(HEAVY), mix(0.9, 1.0, 0.7, 0.0)),
        "classic_8bit_bass_simple" => (BassPattern::Fixed(SPLIT), mix(1.0, 0.7, 0.7, 0.0)),
        _ => (
            BassPattern::Alternating {
                even: SPLIT,
                odd: SUSTAINED,
            },
            mix(1.0, 0.8, 0.7, 0.0),
        ),
    };
    StyleProfile {
        style: Style::Classic8Bit,
        variant,
        scales: SCALES,
        progressions: PROGRESSIONS,
        motifs: motif::CLASSIC,
        melody: BASE_MELODY,
        melody_effects: &[],
        quiet_chance: None,
        intro_entry: IntroEntry::Immediate,
        bass: BassRules {
            pattern,
            pitch: BassPitch::ChordRoot,
            gate: FULL_GATE,
            octave_shift: -12,
        },
        harmony: BASE_HARMONY,
        drums: DrumRules {
            template: CLASSIC_DRUMS,
            phrase_templates: &[],
            crash_chance: Some(0.25),
        },
        mix: mix_levels,
        drum_volume: None,
    }
}

fn lofi(variant: &'static str) -> StyleProfile {
    const SCALES: &[ScaleSpec] = &[ScaleSpec::major(57), ScaleSpec::minor(55)];
    const PROGRESSIONS: &[&[u8]] = &[
        &[1, 6, 4, 5],
        &[1, 4, 1, 5],
        &[1, 6, 2, 5],
        &[1, 3, 6, 4],
        &[1, 4, 6, 5],
    ];
    let (pattern, mix_levels) = match variant {
        "lofi_slower" => (BassPattern::Fixed(SUSTAINED), mix(0.85, 0.7, 0.6, -0.15)),
        "lofi_warm" => (BassPattern::Fixed(SPLIT), mix(0.9, 0.8, 0.7, -0.1)),
        _ => (
            BassPattern::Chance {
                chance: 0.3,
                hit: SUSTAINED,
                otherwise: SPLIT,
            },
            mix(0.9, 0.75, 0.65, -0.1),
        ),
    };
    StyleProfile {
        style: Style::Lofi,
        variant,
        scales: SCALES,
        progressions: PROGRESSIONS,
        motifs: motif::LOFI,
        melody: MelodyRules {
            rest_chance: 0.3,
            ..BASE_MELODY
        },
        melody_effects: &[],
        quiet_chance: None,
        intro_entry: IntroEntry::Immediate,
        bass: BassRules {
            pattern,
            pitch: BassPitch::ChordRoot,
            gate: FULL_GATE,
            octave_shift: -12,
        },
        harmony: BASE_HARMONY,
        drums: DrumRules {
            template: LOFI_DRUMS,
            phrase_templates: &[],
            crash_chance: None,
        },
        mix: mix_levels,
        drum_volume: None,
    }
}

fn battle(variant: &'static str) -> StyleProfile {
    const SCALES: &[ScaleSpec] = &[
        ScaleSpec::minor(60),
        ScaleSpec::minor(62),
        ScaleSpec::minor(59),
    ];
    const PROGRESSIONS: &[&[u8]] = &[
        &[6, 4, 1, 5],
        &[1, 5, 6, 5],
        &[1, 4, 6, 5],
        &[6, 1, 4, 5],
        &[1, 6, 4, 5],
    ];
    const DRIVE: &[BassHit] = &[
        bh(0.0, 0.5, 120),
        bh(1.0, 0.5, 120),
        bh(2.0, 0.5, 120),
        bh(3.0, 0.5, 120),
    ];
    const LIGHT: &[BassHit] = &[bh(0.0, 0.5, 110), bh(2.0, 0.5, 110)];
    const POUND: &[BassHit] = &[
        bh(0.0, 0.5, 125),
        bh(1.0, 0.5, 120),
        bh(2.0, 0.5, 125),
        bh(3.0, 0.5, 120),
    ];
    let (velocity_scale, bass, template, mix_levels) = match variant {
        "battle_melody" => (1.35, LIGHT, BATTLE_DRUMS, mix(1.0, 0.8, 0.7, -0.2)),
        "battle_drums" => (1.1, POUND, BATTLE_DRUMS_HEAVY, mix(0.8, 0.9, 0.7, 0.2)),
        _ => (1.2, DRIVE, BATTLE_DRUMS, mix(0.95, 0.85, 0.7, 0.0)),
    };
    StyleProfile {
        style: Style::Battle,
        variant,
        scales: SCALES,
        progressions: PROGRESSIONS,
        motifs: motif::BATTLE,
        melody: MelodyRules {
            velocity: MelodyVelocity::scaled(velocity_scale),
            articulation: Articulation::Halves,
            ..BASE_MELODY
        },
        melody_effects: &[],
        quiet_chance: None,
        intro_entry: IntroEntry::Immediate,
        bass: BassRules {
            pattern: BassPattern::Fixed(bass),
            pitch: BassPitch::ChordRoot,
            gate: Gate {
                ratio: 0.7,
                min_beats: 0.25,
            },
            octave_shift: -12,
        },
        harmony: BASE_HARMONY,
        drums: DrumRules {
            template,
            phrase_templates: &[],
            crash_chance: Some(0.5),
        },
        mix: mix_levels,
        drum_volume: Some(BATTLE_DRUM_VOLUME),
    }
}

fn suspense(variant: &'static str) -> StyleProfile {
    const SCALES: &[ScaleSpec] = &[ScaleSpec::japanese_like(62), ScaleSpec::japanese_like(64)];
    const PROGRESSIONS: &[&[u8]] = &[
        &[6, 2, 5, 1],
        &[1, 2, 6, 5],
        &[1, 6, 2, 5],
        &[6, 1, 2, 5],
        &[2, 6, 1, 5],
    ];
    const TENSION_CHORDS: &[[usize; 3]] = &[[0, 1, 4], [0, 3, 6], [1, 4, 6]];
    const EFFECTS: &[TrackEffect] = &[
        TrackEffect::HighPass {
            cutoff_hz: 600.0,
            resonance: 1.2,
        },
        TrackEffect::Vibrato {
            rate_hz: 6.0,
            depth: 0.4,
        },
    ];
    const PAIR: &[BassHit] = &[bh(0.0, 1.0, 100), bh(2.0, 1.0, 100)];
    const PAIR_FADING: &[BassHit] = &[bh(0.0, 1.0, 100), bh(2.0, 1.0, 95)];
    const LONE: &[BassHit] = &[bh(0.0, 1.0, 90)];

    let (rest_chance, quiet_chance, pattern, mix_levels) = match variant {
        "suspense_dense" => (0.12, 0.12, BassPattern::Fixed(PAIR), mix(1.0, 0.75, 0.5, 0.1)),
        "suspense_sparse" => (
            0.45,
            0.75,
            BassPattern::Chance {
                chance: 0.5,
                hit: LONE,
                otherwise: &[],
            },
            mix(1.0, 0.5, 0.35, -0.15),
        ),
        _ => (
            0.25,
            0.40,
            BassPattern::Chance {
                chance: 0.3,
                hit: PAIR_FADING,
                otherwise: PAIR,
            },
            mix(1.0, 0.65, 0.45, 0.0),
        ),
    };
    StyleProfile {
        style: Style::Suspense,
        variant,
        scales: SCALES,
        progressions: PROGRESSIONS,
        motifs: motif::SUSPENSE,
        melody: MelodyRules {
            rest_chance,
            tension: Some(TensionRule {
                chance: 0.6,
                degrees: &[1, 5, 6],
            }),
            jitter_chance: 0.25,
            leaps: &[WIDE_LEAP],
            velocity: MelodyVelocity {
                scale: 1.15,
                jitter: 10.0,
                floor: 55.0,
            },
            articulation: Articulation::Triplet,
            solo: None,
        },
        melody_effects: EFFECTS,
        quiet_chance: Some(quiet_chance),
        intro_entry: IntroEntry::Immediate,
        bass: BassRules {
            pattern,
            pitch: BassPitch::Alternating(0, 3),
            gate: Gate {
                ratio: 0.7,
                min_beats: 0.5,
            },
            octave_shift: -12,
        },
        harmony: HarmonyRules {
            shape: ChordShape::Tension(TENSION_CHORDS),
            velocity: 55,
            ..BASE_HARMONY
        },
        drums: DrumRules {
            template: CLASSIC_DRUMS,
            phrase_templates: &[],
            crash_chance: None,
        },
        mix: mix_levels,
        drum_volume: Some(DrumVolume {
            base: 0.6,
            max: 1.2,
        }),
    }
}

fn calm(variant: &'static str) -> StyleProfile {
    const SCALES: &[ScaleSpec] = &[ScaleSpec::major(60), ScaleSpec::major(65)];
    const PROGRESSIONS: &[&[u8]] = &[
        &[1, 4, 1, 5],
        &[1, 4, 5, 1],
        &[1, 6, 4, 5],
        &[1, 3, 6, 4],
        &[1, 4, 6, 5],
    ];
    const OPEN: &[BassHit] = &[bh(0.0, 2.0, 100), bh(2.0, 2.0, 95)];
    let pattern = match variant {
        "calm_brighter" => BassPattern::Chance {
            chance: 0.3,
            hit: OPEN,
            otherwise: SUSTAINED,
        },
        _ => BassPattern::Fixed(SUSTAINED),
    };
    StyleProfile {
        style: Style::Calm,
        variant,
        scales: SCALES,
        progressions: PROGRESSIONS,
        motifs: motif::CALM,
        melody: MelodyRules {
            rest_chance: 0.15,
            leaps: &[WIDE_LEAP, GENTLE_LEAP],
            velocity: MelodyVelocity::scaled(0.8),
            ..BASE_MELODY
        },
        melody_effects: &[],
        quiet_chance: None,
        intro_entry: IntroEntry::Immediate,
        bass: BassRules {
            pattern,
            pitch: BassPitch::ChordRoot,
            gate: FULL_GATE,
            octave_shift: -12,
        },
        harmony: HarmonyRules {
            velocity: 70,
            ..BASE_HARMONY
        },
        drums: DrumRules {
            template: CALM_DRUMS,
            phrase_templates: &[],
            crash_chance: None,
        },
        // Same balance for every calm variant.
        mix: mix(0.9, 0.8, 0.6, -0.1),
        drum_volume: None,
    }
}

fn rock(variant: &'static str) -> StyleProfile {
    const SCALES: &[ScaleSpec] = &[
        ScaleSpec::minor(64),
        ScaleSpec::minor(57),
        ScaleSpec::minor(62),
        ScaleSpec::minor(60),
    ];
    const PROGRESSIONS: &[&[u8]] = &[&[1, 4, 5, 1], &[1, 5, 6, 4], &[6, 4, 1, 5], &[1, 4, 6, 5]];
    const CHUG: &[BassHit] = &[
        bh(0.0, 1.0, 110),
        bh(1.0, 1.0, 105),
        bh(2.0, 1.0, 110),
        bh(3.0, 1.0, 105),
    ];
    let (pattern, mix_levels) = match variant {
        "rock_heavier" => (BassPattern::Fixed(CHUG), mix(0.8, 1.1, 0.7, 0.35)),
        _ => (
            BassPattern::Chance {
                chance: 0.3,
                hit: SUSTAINED,
                otherwise: SPLIT,
            },
            mix(0.85, 1.0, 0.75, 0.3),
        ),
    };
    StyleProfile {
        style: Style::Rock,
        variant,
        scales: SCALES,
        progressions: PROGRESSIONS,
        motifs: motif::ROCK,
        melody: MelodyRules {
            velocity: MelodyVelocity::scaled(1.1),
            solo: Some(ROCK_SOLO),
            ..BASE_MELODY
        },
        melody_effects: &[],
        quiet_chance: None,
        intro_entry: IntroEntry::DrumsFirst,
        bass: BassRules {
            pattern,
            pitch: BassPitch::ChordRoot,
            gate: FULL_GATE,
            octave_shift: -12,
        },
        harmony: HarmonyRules {
            shape: ChordShape::Power,
            velocity: 90,
            ..BASE_HARMONY
        },
        drums: DrumRules {
            template: ROCK_DRUMS,
            phrase_templates: ROCK_PHRASE_DRUMS,
            crash_chance: Some(0.75),
        },
        mix: mix_levels,
        drum_volume: Some(DrumVolume {
            base: 1.1,
            max: 1.5,
        }),
    }
}

fn dance(variant: &'static str) -> StyleProfile {
    const SCALES: &[ScaleSpec] = &[
        ScaleSpec::major(60),
        ScaleSpec::major(65),
        ScaleSpec::major(67),
        ScaleSpec::major(62),
    ];
    const PROGRESSIONS: &[&[u8]] = &[&[1, 5, 6, 4], &[1, 4, 5, 1], &[1, 6, 4, 5], &[6, 4, 1, 5]];
    const PUMP: &[BassHit] = &[
        bh(0.0, 0.5, 110),
        bh(1.0, 0.5, 100),
        bh(2.0, 0.5, 110),
        bh(3.0, 0.5, 100),
    ];
    const HALF: &[BassHit] = &[bh(0.0, 1.0, 110), bh(2.0, 1.0, 110)];
    const STABS: &[(f64, f64)] = &[(0.0, 1.0), (1.0, 1.0)];
    let mix_levels = match variant {
        "dance_drums_focus" => mix(0.65, 0.9, 0.5, 0.6),
        _ => mix(0.75, 0.95, 0.6, 0.5),
    };
    StyleProfile {
        style: Style::Dance,
        variant,
        scales: SCALES,
        progressions: PROGRESSIONS,
        motifs: motif::DANCE,
        melody: BASE_MELODY,
        melody_effects: &[],
        quiet_chance: None,
        intro_entry: IntroEntry::DrumsHarmonyMelody,
        bass: BassRules {
            pattern: BassPattern::Chance {
                chance: 0.7,
                hit: PUMP,
                otherwise: HALF,
            },
            pitch: BassPitch::ChordRoot,
            gate: FULL_GATE,
            octave_shift: -12,
        },
        harmony: HarmonyRules {
            rhythm: STABS,
            velocity: 60,
            ..BASE_HARMONY
        },
        drums: DrumRules {
            template: DANCE_DRUMS,
            phrase_templates: &[],
            crash_chance: Some(0.5),
        },
        mix: mix_levels,
        drum_volume: Some(DrumVolume {
            base: 1.2,
            max: 1.8,
        }),
    }
}

fn workshop(variant: &'static str) -> StyleProfile {
    const SCALES: &[ScaleSpec] = &[
        ScaleSpec::major(60),
        ScaleSpec::major(65),
        ScaleSpec::minor(57),
    ];
    const PROGRESSIONS: &[&[u8]] = &[&[1, 4, 5, 1], &[1, 6, 4, 5], &[1, 4, 1, 5], &[1, 5, 1, 4]];
    const PULSE: &[BassHit] = &[
        bh(0.0, 0.5, 100),
        bh(1.0, 0.5, 95),
        bh(2.0, 0.5, 100),
        bh(3.0, 0.5, 95),
    ];
    StyleProfile {
        style: Style::Workshop,
        variant,
        scales: SCALES,
        progressions: PROGRESSIONS,
        motifs: motif::WORKSHOP,
        melody: BASE_MELODY,
        melody_effects: &[],
        quiet_chance: None,
        intro_entry: IntroEntry::Immediate,
        bass: BassRules {
            pattern: BassPattern::Fixed(PULSE),
            pitch: BassPitch::ChordRoot,
            gate: FULL_GATE,
            octave_shift: -12,
        },
        harmony: BASE_HARMONY,
        drums: DrumRules {
            template: WORKSHOP_DRUMS,
            phrase_templates: &[],
            crash_chance: Some(0.25),
        },
        mix: mix(0.8, 0.85, 0.65, 0.1),
        drum_volume: Some(DrumVolume {
            base: 0.95,
            max: 1.3,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::style_variants;

    #[test]
    fn every_registered_profile_validates() {
        for style in Style::ALL {
            for variant in style_variants(style) {
                let profile = StyleProfile::build(style, variant.id);
                assert_eq!(profile.style, style);
                assert_eq!(profile.validate(), Ok(()), "{style}/{}", variant.id);
            }
        }
    }

    #[test]
    fn validation_reports_broken_catalogs() {
        let mut profile = StyleProfile::build(Style::Rock, "default");
        profile.motifs = &[];
        assert_eq!(
            profile.validate(),
            Err(GenerationError::EmptyMotifPalette { style: Style::Rock })
        );

        let mut profile = StyleProfile::build(Style::Calm, "default");
        profile.progressions = &[&[1, 8, 4]];
        assert_eq!(
            profile.validate(),
            Err(GenerationError::DegreeOutOfRange {
                style: Style::Calm,
                degree: 8
            })
        );

        let mut profile = StyleProfile::build(Style::Dance, "default");
        profile.scales = &[];
        assert!(matches!(
            profile.validate(),
            Err(GenerationError::EmptyScaleCatalog { .. })
        ));
    }

    #[test]
    fn only_suspense_has_quiet_bars() {
        for style in Style::ALL {
            let profile = StyleProfile::build(style, style_variants(style)[0].id);
            assert_eq!(profile.quiet_chance.is_some(), style == Style::Suspense);
        }
        let dense = StyleProfile::build(Style::Suspense, "suspense_dense");
        let sparse = StyleProfile::build(Style::Suspense, "suspense_sparse");
        assert_eq!(dense.quiet_chance, Some(0.12));
        assert_eq!(sparse.quiet_chance, Some(0.75));
    }

    #[test]
    fn drum_volume_is_clamped() {
        // Dance drums-focus: 1.2 + 0.6 = 1.8, exactly the cap.
        let p = StyleProfile::build(Style::Dance, "dance_drums_focus");
        assert!((p.drum_track_volume().unwrap() - 1.8).abs() < 1e-12);
        // Battle drums: 1.0 + 0.2 = 1.2, the cap.
        let p = StyleProfile::build(Style::Battle, "battle_drums");
        assert!((p.drum_track_volume().unwrap() - 1.2).abs() < 1e-12);
        // Suspense sparse: 0.6 - 0.15 = 0.45.
        let p = StyleProfile::build(Style::Suspense, "suspense_sparse");
        assert!((p.drum_track_volume().unwrap() - 0.45).abs() < 1e-12);
        // Rock heavier: 1.1 + 0.35 = 1.45 < 1.5.
        let p = StyleProfile::build(Style::Rock, "rock_heavier");
        assert!((p.drum_track_volume().unwrap() - 1.45).abs() < 1e-12);
    }

    #[test]
    fn quiet_drum_styles_keep_default_volume() {
        for style in [Style::Classic8Bit, Style::Lofi, Style::Calm] {
            for variant in style_variants(style) {
                let p = StyleProfile::build(style, variant.id);
                assert_eq!(p.drum_track_volume(), None, "{style}/{}", variant.id);
            }
        }
    }

    #[test]
    fn gate_respects_minimum_and_slot() {
        let g = Gate {
            ratio: 0.7,
            min_beats: 0.5,
        };
        assert!((g.apply(1.0) - 0.7).abs() < 1e-12);
        assert!((g.apply(0.4) - 0.4).abs() < 1e-12, "never longer than the slot");
        assert!((FULL_GATE.apply(4.0) - 4.0).abs() < 1e-12);
    }
}
