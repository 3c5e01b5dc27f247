// Composition assembly: the public entry point that runs one generation.
//
// `generate` resolves the style variant, builds the style profile, seeds the
// RNG from the normalized seed string, and then consumes randomness in a
// fixed order: scale, progression, quiet bars, melody, bass, harmony, drums.
// Disabled layers are skipped entirely (they draw nothing). The finished
// tracks are balanced by `mix.rs` and wrapped in a `Composition` tagged with
// the style's default tempo and structural metadata.
//
// The output is a pure function of (request, overrides). Nothing here keeps
// state between calls, so independent generations can run in parallel.

use crate::bass::generate_bass;
use crate::catalog::{resolve_variant, style_meta};
use crate::drums::generate_drums;
use crate::error::GenerationError;
use crate::event::{Composition, DrumTrack, NoteEvent, NoteTrack, StructureInfo};
use crate::harmony::generate_harmony;
use crate::melody::generate_melody;
use crate::mix::apply_mix;
use crate::profile::StyleProfile;
use crate::scale::ScaleSpec;
use crate::structure::{BarPlan, plan_bars};
use crate::style::{Style, StyleOverrides};
use chipseed_prng::SeedRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A generation seed. Numbers and strings with the same decimal form are
/// the same seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seed {
    Number(i64),
    Text(String),
}

impl Seed {
    /// The string every seed is reduced to before hashing.
    pub fn normalized(&self) -> String {
        match self {
            Seed::Number(n) => n.to_string(),
            Seed::Text(s) => s.clone(),
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Number(0)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())
    }
}

impl From<i64> for Seed {
    fn from(n: i64) -> Self {
        Seed::Number(n)
    }
}

impl From<i32> for Seed {
    fn from(n: i32) -> Self {
        Seed::Number(n as i64)
    }
}

impl From<u32> for Seed {
    fn from(n: u32) -> Self {
        Seed::Number(n as i64)
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::Text(s.to_string())
    }
}

impl From<String> for Seed {
    fn from(s: String) -> Self {
        Seed::Text(s)
    }
}

/// Which optional layers to generate. The melody is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerToggles {
    pub bass: bool,
    pub harmony: bool,
    pub drums: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        LayerToggles {
            bass: true,
            harmony: true,
            drums: true,
        }
    }
}

/// Everything a generation depends on besides style overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    pub seed: Seed,
    pub style: Style,
    /// Style-scoped variant id; absent or unknown ids use the style default.
    pub variant: Option<String>,
    /// Requested bar count, clamped to [4, 64].
    pub bars: u32,
    /// Fraction of the piece used as intro, clamped to [0, 0.5].
    pub intro_ratio: f64,
    pub layers: LayerToggles,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        GenerationRequest {
            seed: Seed::default(),
            style: Style::default(),
            variant: None,
            bars: 16,
            intro_ratio: 0.0,
            layers: LayerToggles::default(),
        }
    }
}

impl GenerationRequest {
    pub fn new(seed: impl Into<Seed>, style: Style) -> Self {
        GenerationRequest {
            seed: seed.into(),
            style,
            ..GenerationRequest::default()
        }
    }
}

/// Read-only inputs shared by every layer generator.
#[derive(Debug, Clone, Copy)]
pub struct LayerContext<'a> {
    pub profile: &'a StyleProfile,
    pub scale: &'a ScaleSpec,
    pub plan: &'a BarPlan,
    /// Seconds per beat at the composition tempo.
    pub beat_sec: f64,
}

impl<'a> LayerContext<'a> {
    pub fn new(
        profile: &'a StyleProfile,
        scale: &'a ScaleSpec,
        plan: &'a BarPlan,
        tempo_bpm: u16,
    ) -> Self {
        LayerContext {
            profile,
            scale,
            plan,
            beat_sec: 60.0 / tempo_bpm.max(1) as f64,
        }
    }
}

/// Generate a composition.
///
/// Fails only if the style's profile is broken (an empty catalog or
/// out-of-range template data); bad numeric inputs are clamped and unknown
/// variants fall back to the style default.
pub fn generate(
    request: &GenerationRequest,
    overrides: &StyleOverrides,
) -> Result<Composition, GenerationError> {
    let variant = resolve_variant(request.style, request.variant.as_deref());
    let profile = StyleProfile::build(request.style, variant);
    generate_with_profile(request, overrides, &profile)
}

/// Generate with an explicit profile instead of the registered one.
pub fn generate_with_profile(
    request: &GenerationRequest,
    overrides: &StyleOverrides,
    profile: &StyleProfile,
) -> Result<Composition, GenerationError> {
    profile.validate()?;
    let style = profile.style;
    let seed = request.seed.normalized();
    let mut rng = SeedRng::from_seed_str(&seed);

    let scale = *rng
        .choose(profile.scales)
        .ok_or(GenerationError::EmptyScaleCatalog { style })?;
    let progression = *rng
        .choose(profile.progressions)
        .ok_or(GenerationError::EmptyProgressionCatalog { style })?;
    tracing::debug!(
        %style,
        variant = profile.variant,
        %seed,
        root = scale.root,
        mode = scale.mode,
        ?progression,
        "drew scale and progression"
    );

    let plan = plan_bars(
        &mut rng,
        request.bars,
        request.intro_ratio,
        progression,
        profile.quiet_chance,
    );
    let meta = style_meta(style);
    let ctx = LayerContext::new(profile, &scale, &plan, meta.default_bpm);
    let params = overrides.params_for(style);

    let mut melody = NoteTrack::new("melody", generate_melody(&mut rng, &ctx, params.melody)?);
    melody.effects = profile.melody_effects.to_vec();

    let mut bass = if request.layers.bass {
        non_empty("bass", generate_bass(&mut rng, &ctx, params.bass))
    } else {
        None
    };
    let mut harmony = if request.layers.harmony {
        non_empty("harmony", generate_harmony(&mut rng, &ctx, params.harmony))
    } else {
        None
    };
    let mut drums = if request.layers.drums {
        let events = generate_drums(&mut rng, &ctx, params.drum_velocity_scale as f64);
        (!events.is_empty()).then(|| DrumTrack {
            name: "drums".to_string(),
            volume: 1.0,
            events,
        })
    } else {
        None
    };

    apply_mix(
        profile,
        &mut melody,
        bass.as_mut(),
        harmony.as_mut(),
        drums.as_mut(),
    );

    tracing::debug!(
        melody = melody.events.len(),
        bass = bass.as_ref().map_or(0, |t| t.events.len()),
        harmony = harmony.as_ref().map_or(0, |t| t.events.len()),
        drums = drums.as_ref().map_or(0, |t| t.events.len()),
        "generated tracks"
    );

    let structure = StructureInfo {
        total_bars: plan.total_bars as u32,
        intro_bars: plan.intro_bars as u32,
        main_bars: plan.main_bars() as u32,
        variant: profile.variant.to_string(),
        scale_root: scale.root,
        scale_mode: scale.mode.to_string(),
        progression: progression.to_vec(),
        quiet_bars: plan.quiet_indices(),
    };

    Ok(Composition {
        name: format!("{style} #{seed}"),
        tempo_bpm: meta.default_bpm,
        structure,
        melody,
        bass,
        harmony,
        drums,
    })
}

fn non_empty(name: &str, events: Vec<NoteEvent>) -> Option<NoteTrack> {
    (!events.is_empty()).then(|| NoteTrack::new(name, events))
}
