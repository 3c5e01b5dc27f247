// Style identifiers, timbre/envelope parameters, and runtime overrides.
//
// A `Style` is a named compositional preset. Each style registers one
// `StyleParams` value describing how its layers should sound: a waveform
// (timbre id), a duty/shape value, and an ADSR envelope for melody, bass and
// harmony, plus a global drum-velocity scale. The generator never changes
// *which* notes are played based on these values, only how they are voiced
// (and, through `drum_velocity_scale`, how hard drums hit).
//
// Runtime overrides live in `StyleOverrides`, an explicit value the caller
// owns and passes into `compose::generate`. An override replaces the whole
// `StyleParams` for its style; there is no per-field merging. Overrides can be
// loaded from / saved to JSON keyed by style id.
//
// See also: `catalog.rs` for read-only style metadata and variants,
// `profile.rs` for the per-style generation strategy table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// The closed set of generation styles.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Style {
    /// Classic 8-bit console game music.
    #[default]
    #[serde(rename = "classic_8bit")]
    Classic8Bit,
    #[serde(rename = "lofi")]
    Lofi,
    #[serde(rename = "battle")]
    Battle,
    #[serde(rename = "suspense")]
    Suspense,
    #[serde(rename = "calm")]
    Calm,
    #[serde(rename = "rock")]
    Rock,
    #[serde(rename = "dance")]
    Dance,
    /// Ambient-techno focus music.
    #[serde(rename = "workshop")]
    Workshop,
}

impl Style {
    pub const ALL: [Style; 8] = [
        Style::Classic8Bit,
        Style::Lofi,
        Style::Battle,
        Style::Suspense,
        Style::Calm,
        Style::Rock,
        Style::Dance,
        Style::Workshop,
    ];

    /// Stable text id, identical to the serde representation.
    pub fn id(self) -> &'static str {
        match self {
            Style::Classic8Bit => "classic_8bit",
            Style::Lofi => "lofi",
            Style::Battle => "battle",
            Style::Suspense => "suspense",
            Style::Calm => "calm",
            Style::Rock => "rock",
            Style::Dance => "dance",
            Style::Workshop => "workshop",
        }
    }

    /// Parse a style id (case-insensitive). Returns `None` for unknown ids.
    pub fn from_id(id: &str) -> Option<Style> {
        let id = id.trim().to_ascii_lowercase();
        Style::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Parse a style id, falling back to `Classic8Bit` for unknown ids.
    pub fn from_id_or_default(id: &str) -> Style {
        Style::from_id(id).unwrap_or_else(|| {
            tracing::debug!(requested = id, "unknown style id, using classic_8bit");
            Style::Classic8Bit
        })
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Oscillator shape used by the downstream renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Square,
    Triangle,
    Sawtooth,
    Sine,
}

/// Attack/decay/release in seconds, sustain as a level in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adsr {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Adsr {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Adsr {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Short attack, high sustain; keeps fast leads from collapsing into pops.
    pub const SOFT_LEAD: Adsr = Adsr::new(0.001, 0.05, 0.8, 0.1);
    pub const SOFT: Adsr = Adsr::new(0.01, 0.15, 0.8, 0.25);
    pub const PLUCK: Adsr = Adsr::new(0.001, 0.08, 0.3, 0.1);
    pub const PAD: Adsr = Adsr::new(0.02, 0.2, 0.8, 0.4);
}

/// Timbre + shape + envelope for one pitched layer. Copied onto every note
/// event so the renderer needs no registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerVoice {
    pub waveform: Waveform,
    /// Pulse duty cycle (square) or generic shape parameter, in (0, 1).
    pub duty: f32,
    pub adsr: Adsr,
}

impl LayerVoice {
    pub const fn new(waveform: Waveform, duty: f32, adsr: Adsr) -> Self {
        LayerVoice {
            waveform,
            duty,
            adsr,
        }
    }
}

/// Per-style sound parameters for every layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleParams {
    pub melody: LayerVoice,
    pub bass: LayerVoice,
    pub harmony: LayerVoice,
    /// Multiplier applied to every drum template velocity.
    pub drum_velocity_scale: f32,
}

impl StyleParams {
    /// The built-in parameters registered for `style`.
    pub fn registered(style: Style) -> StyleParams {
        use Waveform::*;
        match style {
            Style::Classic8Bit => StyleParams {
                melody: LayerVoice::new(Square, 0.5, Adsr::SOFT_LEAD),
                bass: LayerVoice::new(Triangle, 0.5, Adsr::SOFT),
                harmony: LayerVoice::new(Square, 0.25, Adsr::SOFT),
                drum_velocity_scale: 1.0,
            },
            Style::Lofi => StyleParams {
                melody: LayerVoice::new(Square, 0.35, Adsr::SOFT),
                bass: LayerVoice::new(Triangle, 0.5, Adsr::PAD),
                harmony: LayerVoice::new(Triangle, 0.5, Adsr::PAD),
                drum_velocity_scale: 0.8,
            },
            Style::Battle => StyleParams {
                melody: LayerVoice::new(Square, 0.25, Adsr::SOFT_LEAD),
                bass: LayerVoice::new(Square, 0.5, Adsr::PLUCK),
                harmony: LayerVoice::new(Sawtooth, 0.5, Adsr::SOFT),
                drum_velocity_scale: 1.0,
            },
            Style::Suspense => StyleParams {
                melody: LayerVoice::new(Sawtooth, 0.2, Adsr::new(0.005, 0.18, 0.4, 0.2)),
                bass: LayerVoice::new(Square, 0.5, Adsr::new(0.005, 0.2, 0.5, 0.25)),
                harmony: LayerVoice::new(Sawtooth, 0.5, Adsr::PAD),
                // Drums sit in the background.
                drum_velocity_scale: 0.8,
            },
            Style::Calm => StyleParams {
                melody: LayerVoice::new(Triangle, 0.4, Adsr::new(0.01, 0.15, 0.85, 0.35)),
                bass: LayerVoice::new(Triangle, 0.5, Adsr::PAD),
                harmony: LayerVoice::new(Sine, 0.5, Adsr::PAD),
                drum_velocity_scale: 0.7,
            },
            Style::Rock => StyleParams {
                melody: LayerVoice::new(Sawtooth, 0.5, Adsr::new(0.001, 0.1, 0.7, 0.15)),
                bass: LayerVoice::new(Square, 0.5, Adsr::PLUCK),
                harmony: LayerVoice::new(Sawtooth, 0.5, Adsr::new(0.005, 0.12, 0.75, 0.2)),
                drum_velocity_scale: 1.3,
            },
            Style::Dance => StyleParams {
                melody: LayerVoice::new(Square, 0.5, Adsr::new(0.002, 0.08, 0.75, 0.12)),
                bass: LayerVoice::new(Square, 0.5, Adsr::new(0.001, 0.05, 0.9, 0.1)),
                harmony: LayerVoice::new(Square, 0.4, Adsr::new(0.01, 0.1, 0.7, 0.2)),
                drum_velocity_scale: 1.2,
            },
            Style::Workshop => StyleParams {
                melody: LayerVoice::new(Square, 0.45, Adsr::new(0.01, 0.1, 0.8, 0.2)),
                bass: LayerVoice::new(Square, 0.5, Adsr::new(0.005, 0.08, 0.85, 0.15)),
                harmony: LayerVoice::new(Triangle, 0.5, Adsr::new(0.02, 0.15, 0.75, 0.3)),
                drum_velocity_scale: 1.0,
            },
        }
    }
}

/// Caller-owned replacement table for `StyleParams`.
///
/// Pass the same overrides to reproduce a generation exactly: the output is a
/// function of (seed, request, overrides). An empty table means every style
/// uses its registered parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleOverrides {
    params: BTreeMap<Style, StyleParams>,
}

impl StyleOverrides {
    pub fn new() -> Self {
        StyleOverrides::default()
    }

    /// Replace the parameters for `style` wholesale.
    pub fn set(&mut self, style: Style, params: StyleParams) {
        self.params.insert(style, params);
    }

    /// Remove the override for one style, returning it if present.
    pub fn clear(&mut self, style: Style) -> Option<StyleParams> {
        self.params.remove(&style)
    }

    /// Remove every override.
    pub fn clear_all(&mut self) {
        self.params.clear();
    }

    pub fn get(&self, style: Style) -> Option<&StyleParams> {
        self.params.get(&style)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Effective parameters: the override if one is set, else the registered
    /// defaults.
    pub fn params_for(&self, style: Style) -> StyleParams {
        match self.params.get(&style) {
            Some(p) => *p,
            None => StyleParams::registered(style),
        }
    }

    /// Load overrides from a JSON object keyed by style id.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let overrides: StyleOverrides = serde_json::from_str(&data)?;
        Ok(overrides)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_ids_roundtrip() {
        for style in Style::ALL {
            assert_eq!(Style::from_id(style.id()), Some(style));
        }
        assert_eq!(Style::from_id("  ROCK "), Some(Style::Rock));
        assert_eq!(Style::from_id("polka"), None);
        assert_eq!(Style::from_id_or_default("polka"), Style::Classic8Bit);
    }

    #[test]
    fn serde_uses_style_ids() {
        let json = serde_json::to_string(&Style::Classic8Bit).unwrap();
        assert_eq!(json, "\"classic_8bit\"");
    }

    #[test]
    fn override_replaces_whole_params() {
        let mut overrides = StyleOverrides::new();
        let mut custom = StyleParams::registered(Style::Lofi);
        custom.melody.waveform = Waveform::Sine;
        custom.drum_velocity_scale = 0.1;
        overrides.set(Style::Classic8Bit, custom);

        let effective = overrides.params_for(Style::Classic8Bit);
        assert_eq!(effective, custom);
        // Fields not touched in `custom` come from Lofi, not Classic8Bit:
        // there is no per-field merging.
        assert_eq!(effective.bass.adsr, Adsr::PAD);
        // Other styles are unaffected.
        assert_eq!(
            overrides.params_for(Style::Rock),
            StyleParams::registered(Style::Rock)
        );
    }

    #[test]
    fn clear_single_and_all() {
        let mut overrides = StyleOverrides::new();
        let p = StyleParams::registered(Style::Calm);
        overrides.set(Style::Rock, p);
        overrides.set(Style::Dance, p);

        assert_eq!(overrides.clear(Style::Rock), Some(p));
        assert_eq!(overrides.clear(Style::Rock), None);
        assert!(overrides.get(Style::Dance).is_some());

        overrides.clear_all();
        assert!(overrides.is_empty());
        assert_eq!(
            overrides.params_for(Style::Dance),
            StyleParams::registered(Style::Dance)
        );
    }

    #[test]
    fn overrides_json_roundtrip() {
        let mut overrides = StyleOverrides::new();
        overrides.set(Style::Suspense, StyleParams::registered(Style::Battle));
        let json = overrides.to_json().unwrap();
        assert!(json.contains("\"suspense\""), "keyed by style id: {json}");
        let restored = StyleOverrides::from_json(&json).unwrap();
        assert_eq!(restored, overrides);
    }
}
