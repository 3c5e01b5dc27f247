// chipseed music generator
//
// Deterministic, seed-driven generation of short multi-track chiptune
// compositions (melody, bass, harmony, drums) to seed an interactive music
// editor. The same seed, style, variant, structural parameters and style
// overrides always produce the same composition, event for event.
//
// Architecture:
// - style.rs: Style ids, per-layer timbre/envelope parameters, and the
//   caller-owned `StyleOverrides` table
// - catalog.rs: Read-only style metadata (tempo, mood, description) and
//   named variants
// - profile.rs: Per-style/variant strategy table read by every generator
// - scale.rs: Scales, progression templates, degree-to-pitch lookup
// - structure.rs: Bar count, intro length, per-bar chords, quiet bars
// - motif.rs: Motif palettes and per-bar motif selection
// - melody.rs: The lead-line engine (rests, chord tones, leap smoothing,
//   articulation, cadence)
// - bass.rs, harmony.rs, drums.rs: Accompaniment generators
// - mix.rs: Per-style track volume balancing
// - compose.rs: Request types and the `generate` entry point
// - event.rs: Output events, tracks and `Composition`
// - error.rs: `GenerationError` for broken style profiles
//
// All randomness comes from `chipseed_prng::SeedRng`, seeded from the
// normalized seed string.

pub mod bass;
pub mod catalog;
pub mod compose;
pub mod drums;
pub mod error;
pub mod event;
pub mod harmony;
pub mod melody;
pub mod mix;
pub mod motif;
pub mod profile;
pub mod scale;
pub mod structure;
pub mod style;

pub use compose::{GenerationRequest, LayerToggles, Seed, generate};
pub use error::GenerationError;
pub use event::Composition;
pub use style::{Style, StyleOverrides, StyleParams};
