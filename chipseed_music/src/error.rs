// Generation errors.
//
// Out-of-range numeric inputs are clamped and unknown style/variant ids fall
// back to defaults, so neither shows up here. The only failures are broken
// style profiles: a catalog with nothing in it, or data that could index
// outside a scale. Those are programming errors in the profile table and are
// reported rather than papered over, since a silent substitute would change
// the output for a given seed.

use crate::style::Style;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("style {style} has no scales registered")]
    EmptyScaleCatalog { style: Style },

    #[error("style {style} registers a scale with no offsets (root {root})")]
    EmptyScaleOffsets { style: Style, root: u8 },

    #[error("style {style} has no chord progressions registered")]
    EmptyProgressionCatalog { style: Style },

    #[error("style {style} has an empty chord progression template")]
    EmptyProgression { style: Style },

    #[error("style {style} has a progression degree {degree} outside 1..=7")]
    DegreeOutOfRange { style: Style, degree: u8 },

    #[error("style {style} has no motifs registered")]
    EmptyMotifPalette { style: Style },

    #[error("style {style} has a motif step with non-positive duration {beats}")]
    NonPositiveMotifStep { style: Style, beats: f64 },
}
