// Read-only style metadata and the variant catalog.
//
// Editors read this before requesting a generation: the default tempo, a mood
// tag, a one-line description, and the named variants a style offers. None of
// it changes generation except `default_bpm` (the composition tempo) and the
// resolved variant id, which `profile.rs` uses to pick variant-specific
// tuning.
//
// A style with no declared variants exposes a single implicit "default".

use crate::style::Style;
use serde::Serialize;

/// Descriptive data for one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleMeta {
    pub default_bpm: u16,
    pub mood: &'static str,
    pub description: &'static str,
}

/// A named behavioral variant of a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const IMPLICIT_DEFAULT: [VariantInfo; 1] = [VariantInfo {
    id: "default",
    name: "Default",
    description: "",
}];

const CLASSIC_VARIANTS: [VariantInfo; 3] = [
    VariantInfo {
        id: "default",
        name: "Default",
        description: "Square lead over triangle bass, plain 4/4 backbeat.",
    },
    VariantInfo {
        id: "classic_8bit_bass_heavy",
        name: "Bass heavy",
        description: "Bass hits on every beat for a stronger pulse.",
    },
    VariantInfo {
        id: "classic_8bit_bass_simple",
        name: "Simple bass",
        description: "Bass only on the strong beats so the lead stands out.",
    },
];

const LOFI_VARIANTS: [VariantInfo; 3] = [
    VariantInfo {
        id: "default",
        name: "Default",
        description: "Soft and connected, suited to background listening.",
    },
    VariantInfo {
        id: "lofi_slower",
        name: "Slower",
        description: "Whole-bar bass notes and a hazier feel.",
    },
    VariantInfo {
        id: "lofi_warm",
        name: "Warm",
        description: "Two-note bass per bar and a warmer balance.",
    },
];

const BATTLE_VARIANTS: [VariantInfo; 3] = [
    VariantInfo {
        id: "battle_default",
        name: "Default",
        description: "Lead and drums both push forward.",
    },
    VariantInfo {
        id: "battle_melody",
        name: "Melody forward",
        description: "Louder, sharper lead; bass and drums pulled back slightly.",
    },
    VariantInfo {
        id: "battle_drums",
        name: "Drums forward",
        description: "Denser kicks and bass, lead sits further back.",
    },
];

const SUSPENSE_VARIANTS: [VariantInfo; 3] = [
    VariantInfo {
        id: "suspense_default",
        name: "Default",
        description: "Balanced phrases and silences, dark and restrained.",
    },
    VariantInfo {
        id: "suspense_dense",
        name: "Denser",
        description: "Fewer rests and quiet bars for sustained pressure.",
    },
    VariantInfo {
        id: "suspense_sparse",
        name: "Sparser",
        description: "More rests and quiet bars, thin bass, faint drums.",
    },
];

const CALM_VARIANTS: [VariantInfo; 3] = [
    VariantInfo {
        id: "default",
        name: "Default",
        description: "Long notes and stepwise motion.",
    },
    VariantInfo {
        id: "calm_slower",
        name: "Slower",
        description: "Whole-bar bass and an airier feel.",
    },
    VariantInfo {
        id: "calm_brighter",
        name: "Brighter",
        description: "Occasional two-note bass bars for more movement.",
    },
];

const ROCK_VARIANTS: [VariantInfo; 2] = [
    VariantInfo {
        id: "default",
        name: "Default",
        description: "Drum-driven, sustained bass, power chords.",
    },
    VariantInfo {
        id: "rock_heavier",
        name: "Heavier",
        description: "Bass on every beat and louder drums.",
    },
];

const DANCE_VARIANTS: [VariantInfo; 2] = [
    VariantInfo {
        id: "default",
        name: "Default",
        description: "Four-on-the-floor drums up front, lead and pads lowered.",
    },
    VariantInfo {
        id: "dance_drums_focus",
        name: "Drums focus",
        description: "Drums pushed even further forward for pure groove.",
    },
];

/// Metadata for `style`.
pub fn style_meta(style: Style) -> StyleMeta {
    match style {
        Style::Classic8Bit => StyleMeta {
            default_bpm: 120,
            mood: "retro / 8-bit game",
            description: "Square-wave lead over triangle bass, mostly C major or A minor, \
                          medium-fast tempo.",
        },
        Style::Lofi => StyleMeta {
            default_bpm: 80,
            mood: "relaxed / gentle / background",
            description: "Mid-low register, slow tempo, soft timbres and light drums.",
        },
        Style::Battle => StyleMeta {
            default_bpm: 170,
            mood: "tense / combat / high energy",
            description: "Fast tempo, short repeated lead figures, dense drums and a \
                          driving bass.",
        },
        Style::Suspense => StyleMeta {
            default_bpm: 125,
            mood: "dark / uneasy / suspense",
            description: "Japanese-flavoured minor scale, trembling triplet lead, weak \
                          drums and frequent silences.",
        },
        Style::Calm => StyleMeta {
            default_bpm: 90,
            mood: "soothing / bright / gentle",
            description: "Major keys, stable I-IV-V-I style harmony, long soft notes \
                          and simple drums.",
        },
        Style::Rock => StyleMeta {
            default_bpm: 150,
            mood: "intense / heavy / rock",
            description: "Minor keys, simple repeated riffs, sawtooth timbres and \
                          dominant drums.",
        },
        Style::Dance => StyleMeta {
            default_bpm: 130,
            mood: "groovy / house",
            description: "Major keys, catchy repeated lead, pumping bass and a \
                          kick-snare pattern twice per bar with off-beat hats.",
        },
        Style::Workshop => StyleMeta {
            default_bpm: 108,
            mood: "calm / focused / technical",
            description: "Ambient techno: steady kick on every beat, unobtrusive lead, \
                          soft triangle pads.",
        },
    }
}

/// Variants declared for `style`; the first entry is its default.
pub fn style_variants(style: Style) -> &'static [VariantInfo] {
    match style {
        Style::Classic8Bit => &CLASSIC_VARIANTS,
        Style::Lofi => &LOFI_VARIANTS,
        Style::Battle => &BATTLE_VARIANTS,
        Style::Suspense => &SUSPENSE_VARIANTS,
        Style::Calm => &CALM_VARIANTS,
        Style::Rock => &ROCK_VARIANTS,
        Style::Dance => &DANCE_VARIANTS,
        Style::Workshop => &IMPLICIT_DEFAULT,
    }
}

/// Resolve a requested variant id to one the style declares.
///
/// Absent or unrecognized ids resolve to the style's first (default)
/// variant, so `"default"` on battle becomes `"battle_default"`.
pub fn resolve_variant(style: Style, requested: Option<&str>) -> &'static str {
    let variants = style_variants(style);
    let fallback = variants.first().map_or("default", |v| v.id);
    match requested {
        Some(id) => match variants.iter().find(|v| v.id == id) {
            Some(v) => v.id,
            None => {
                if id != "default" && !id.is_empty() {
                    tracing::debug!(%style, requested = id, "unknown variant, using {fallback}");
                }
                fallback
            }
        },
        None => fallback,
    }
}
