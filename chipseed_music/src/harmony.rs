// Harmony: block chords below the melody.
//
// Each bar sounds one chord (or a couple of short stabs, depending on the
// style's rhythm) built on the bar's chord root. Chord shapes are triads,
// power chords, or one of a few fixed "tension" templates. A quiet bar keeps
// a single soft tone for the whole bar rather than going silent.
//
// The chord's degrees are chosen before the quiet check so that quiet bars
// consume the same randomness as normal ones. Bars before the style's
// harmony entry (see `IntroEntry`) are skipped without drawing.

use crate::compose::LayerContext;
use crate::event::{NoteEvent, clamp_pitch};
use crate::profile::ChordShape;
use crate::style::LayerVoice;
use chipseed_prng::SeedRng;

/// Scale-degree indices of the chord on `root`, wrapped into a scale of
/// `len` entries. Duplicates are dropped, order is kept.
pub fn chord_degrees(rng: &mut SeedRng, shape: ChordShape, root: usize, len: usize) -> Vec<usize> {
    let len = len.max(1);
    let raw: [usize; 3] = match shape {
        ChordShape::Triad => [root, root + 2, root + 4],
        ChordShape::Power => [root, root + 4, root + 7],
        ChordShape::Tension(templates) => {
            let t = rng.choose(templates).copied().unwrap_or([0, 2, 4]);
            [t[0] + root, t[1] + root, t[2] + root]
        }
    };
    let mut degrees = Vec::with_capacity(3);
    for d in raw.map(|d| d % len) {
        if !degrees.contains(&d) {
            degrees.push(d);
        }
    }
    degrees
}

pub fn generate_harmony(
    rng: &mut SeedRng,
    ctx: &LayerContext<'_>,
    voice: LayerVoice,
) -> Vec<NoteEvent> {
    let rules = &ctx.profile.harmony;
    let plan = ctx.plan;
    let scale = ctx.scale;
    let mut events = Vec::new();
    let entry = ctx.profile.intro_entry.harmony_start(plan.intro_bars);

    for bar in entry..plan.total_bars {
        let degrees = chord_degrees(rng, rules.shape, plan.chord_root(bar), scale.len());
        let bar_start = bar as f64 * 4.0;
        let pitch_of = |d: usize| clamp_pitch(scale.pitch(d as i32, rules.octave_shift));

        if plan.is_quiet(bar) {
            // One long soft tone instead of a chord.
            if let Some(&d) = degrees.first() {
                events.push(NoteEvent {
                    pitch: pitch_of(d),
                    start: bar_start * ctx.beat_sec,
                    duration: 4.0 * ctx.beat_sec,
                    velocity: rules.quiet_velocity.clamp(1, 127),
                    voice,
                });
            }
            continue;
        }

        for &(beat, beats) in rules.rhythm {
            for &d in &degrees {
                events.push(NoteEvent {
                    pitch: pitch_of(d),
                    start: (bar_start + beat) * ctx.beat_sec,
                    duration: beats * ctx.beat_sec,
                    velocity: rules.velocity.clamp(1, 127),
                    voice,
                });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StyleProfile;
    use crate::structure::BarPlan;
    use crate::style::{Style, StyleParams};

    #[test]
    fn triad_and_power_shapes() {
        let mut rng = SeedRng::new(0);
        assert_eq!(chord_degrees(&mut rng, ChordShape::Triad, 0, 8), vec![0, 2, 4]);
        assert_eq!(chord_degrees(&mut rng, ChordShape::Triad, 5, 8), vec![5, 7, 1]);
        assert_eq!(chord_degrees(&mut rng, ChordShape::Power, 1, 8), vec![1, 5, 0]);
        // In a 7-entry scale the "octave" wraps onto the root and is dropped.
        assert_eq!(chord_degrees(&mut rng, ChordShape::Power, 0, 7), vec![0, 4]);
    }

    #[test]
    fn tension_templates_offset_by_root() {
        const TEMPLATES: &[[usize; 3]] = &[[1, 4, 6]];
        let mut rng = SeedRng::new(0);
        assert_eq!(
            chord_degrees(&mut rng, ChordShape::Tension(TEMPLATES), 3, 8),
            vec![4, 7, 1]
        );
    }

    #[test]
    fn chords_share_start_and_groups_do_not_overlap() {
        let profile = StyleProfile::build(Style::Dance, "default");
        let scale = profile.scales[0];
        let plan = BarPlan {
            total_bars: 4,
            intro_bars: 0,
            degrees: vec![1, 5, 6, 4],
            quiet: vec![false; 4],
        };
        let ctx = LayerContext::new(&profile, &scale, &plan, 130);
        let voice = StyleParams::registered(Style::Dance).harmony;
        let events = generate_harmony(&mut SeedRng::new(1), &ctx, voice);

        // Two stabs of three notes per bar.
        assert_eq!(events.len(), 4 * 2 * 3);
        for group in events.chunks(3) {
            assert!(group.iter().all(|e| e.start == group[0].start));
            assert!(group.iter().all(|e| e.velocity == 60));
        }
        for pair in events.chunks(3).collect::<Vec<_>>().windows(2) {
            assert!(pair[0][0].end() <= pair[1][0].start + 1e-9);
        }
        // Transposed down an octave.
        assert!(events.iter().all(|e| (e.pitch as i32) < scale.root as i32 + 12));
    }

    #[test]
    fn quiet_bar_keeps_one_soft_tone() {
        let profile = StyleProfile::build(Style::Suspense, "suspense_default");
        let scale = profile.scales[0];
        let plan = BarPlan {
            total_bars: 2,
            intro_bars: 0,
            degrees: vec![1, 5],
            quiet: vec![false, true],
        };
        let ctx = LayerContext::new(&profile, &scale, &plan, 125);
        let voice = StyleParams::registered(Style::Suspense).harmony;
        let events = generate_harmony(&mut SeedRng::new(2), &ctx, voice);

        assert_eq!(events.len(), 3 + 1);
        let quiet = events[3];
        assert_eq!(quiet.velocity, 50);
        assert!((quiet.duration - 4.0 * ctx.beat_sec).abs() < 1e-12);
        assert!(events[..3].iter().all(|e| e.velocity == 55));
    }

    #[test]
    fn dance_harmony_waits_for_the_drums() {
        let profile = StyleProfile::build(Style::Dance, "default");
        let scale = profile.scales[0];
        let plan = BarPlan {
            total_bars: 8,
            intro_bars: 3,
            degrees: vec![1; 8],
            quiet: vec![false; 8],
        };
        let ctx = LayerContext::new(&profile, &scale, &plan, 130);
        let voice = StyleParams::registered(Style::Dance).harmony;
        let events = generate_harmony(&mut SeedRng::new(3), &ctx, voice);
        let first = events.first().unwrap();
        assert!((first.start - 8.0 * ctx.beat_sec).abs() < 1e-12, "enters on bar 2");
        assert_eq!(events.len(), 6 * 2 * 3);
    }
}
