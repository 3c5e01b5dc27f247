// Mix balancing: per-style/variant track volumes.
//
// Pitched tracks get a relative level multiplier. Styles with a drum volume
// entry set the drum track to their base volume plus an additive boost,
// clamped to [0.2, max]; the rest leave the drum track at its default.
// Events are never touched, only track volumes.

use crate::event::{DrumTrack, NoteTrack};
use crate::profile::StyleProfile;

pub fn apply_mix(
    profile: &StyleProfile,
    melody: &mut NoteTrack,
    bass: Option<&mut NoteTrack>,
    harmony: Option<&mut NoteTrack>,
    drums: Option<&mut DrumTrack>,
) {
    let levels = &profile.mix;
    melody.volume *= levels.melody;
    if let Some(track) = bass {
        track.volume *= levels.bass;
    }
    if let Some(track) = harmony {
        track.volume *= levels.harmony;
    }
    if let (Some(track), Some(volume)) = (drums, profile.drum_track_volume()) {
        track.volume = volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;

    #[test]
    fn levels_follow_variant() {
        let profile = StyleProfile::build(Style::Classic8Bit, "classic_8bit_bass_heavy");
        let mut melody = NoteTrack::new("melody", Vec::new());
        let mut bass = NoteTrack::new("bass", Vec::new());
        let mut drums = DrumTrack {
            name: "drums".into(),
            volume: 1.0,
            events: Vec::new(),
        };
        apply_mix(&profile, &mut melody, Some(&mut bass), None, Some(&mut drums));
        assert!((melody.volume - 0.9).abs() < 1e-12);
        assert!((bass.volume - 1.0).abs() < 1e-12);
        assert!((drums.volume - 1.0).abs() < 1e-12);
    }

    #[test]
    fn calm_variants_share_one_balance() {
        let a = StyleProfile::build(Style::Calm, "calm_slower").mix;
        let b = StyleProfile::build(Style::Calm, "calm_brighter").mix;
        let c = StyleProfile::build(Style::Calm, "default").mix;
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn lofi_drums_keep_default_volume() {
        let profile = StyleProfile::build(Style::Lofi, "lofi_slower");
        let mut melody = NoteTrack::new("melody", Vec::new());
        let mut drums = DrumTrack {
            name: "drums".into(),
            volume: 1.0,
            events: Vec::new(),
        };
        apply_mix(&profile, &mut melody, None, None, Some(&mut drums));
        // drum_boost is -0.15 here but lofi never adjusts its drums.
        assert!((drums.volume - 1.0).abs() < 1e-12);
        assert!((melody.volume - 0.85).abs() < 1e-12);
    }

    #[test]
    fn suspense_drums_take_boosted_base() {
        let profile = StyleProfile::build(Style::Suspense, "suspense_dense");
        let mut melody = NoteTrack::new("melody", Vec::new());
        let mut drums = DrumTrack {
            name: "drums".into(),
            volume: 1.0,
            events: Vec::new(),
        };
        apply_mix(&profile, &mut melody, None, None, Some(&mut drums));
        let expected = (0.6 + profile.mix.drum_boost).clamp(0.2, 1.2);
        assert!((drums.volume - expected).abs() < 1e-12);
        assert!(drums.volume < 1.0);
    }
}
