// Bass line: the bar's root (or a fixed degree pair) an octave down, in a
// per-style rhythm. Quiet bars have no bass at all.

use crate::compose::LayerContext;
use crate::event::{NoteEvent, clamp_pitch};
use crate::profile::{BassHit, BassPattern, BassPitch};
use crate::style::LayerVoice;
use chipseed_prng::SeedRng;

pub fn generate_bass(rng: &mut SeedRng, ctx: &LayerContext<'_>, voice: LayerVoice) -> Vec<NoteEvent> {
    let rules = &ctx.profile.bass;
    let plan = ctx.plan;
    let mut events = Vec::new();

    for bar in 0..plan.total_bars {
        if plan.is_quiet(bar) {
            continue;
        }
        let hits = bar_hits(rng, rules.pattern, bar);
        let degree = match rules.pitch {
            BassPitch::ChordRoot => plan.chord_root(bar),
            BassPitch::Alternating(even, odd) => {
                if bar % 2 == 0 {
                    even
                } else {
                    odd
                }
            }
        };
        let pitch = clamp_pitch(ctx.scale.pitch(degree as i32, rules.octave_shift));
        let bar_start = bar as f64 * 4.0;

        for hit in hits {
            events.push(NoteEvent {
                pitch,
                start: (bar_start + hit.beat) * ctx.beat_sec,
                duration: rules.gate.apply(hit.beats) * ctx.beat_sec,
                velocity: hit.velocity.clamp(1, 127),
                voice,
            });
        }
    }
    events
}

fn bar_hits(rng: &mut SeedRng, pattern: BassPattern, bar: usize) -> &'static [BassHit] {
    match pattern {
        BassPattern::Fixed(hits) => hits,
        BassPattern::Alternating { even, odd } => {
            if bar % 2 == 0 {
                even
            } else {
                odd
            }
        }
        BassPattern::Chance {
            chance,
            hit,
            otherwise,
        } => {
            if rng.random_bool(chance) {
                hit
            } else {
                otherwise
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StyleProfile;
    use crate::structure::BarPlan;
    use crate::style::{Style, StyleParams};

    fn plan(degrees: Vec<u8>, quiet: Vec<bool>) -> BarPlan {
        BarPlan {
            total_bars: degrees.len(),
            intro_bars: 0,
            degrees,
            quiet,
        }
    }

    #[test]
    fn classic_alternates_split_and_sustained() {
        let profile = StyleProfile::build(Style::Classic8Bit, "default");
        let scale = profile.scales[0];
        let plan = plan(vec![1, 5, 6, 4], vec![false; 4]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 120);
        let voice = StyleParams::registered(Style::Classic8Bit).bass;
        let events = generate_bass(&mut SeedRng::new(0), &ctx, voice);

        // Bars 0 and 2 split into two half notes, bars 1 and 3 hold a whole note.
        assert_eq!(events.len(), 2 + 1 + 2 + 1);
        assert_eq!(events[0].pitch, 48, "C major root an octave down");
        assert_eq!(events[2].pitch, 55, "degree 5 is G");
        assert!((events[2].duration - 2.0).abs() < 1e-12, "whole bar at 120 BPM");
    }

    #[test]
    fn quiet_bars_are_silent_and_gate_shortens_notes() {
        let profile = StyleProfile::build(Style::Suspense, "suspense_dense");
        let scale = profile.scales[0];
        let plan = plan(vec![1, 1, 1, 1], vec![false, true, false, true]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 125);
        let voice = StyleParams::registered(Style::Suspense).bass;
        let events = generate_bass(&mut SeedRng::new(0), &ctx, voice);

        let bar_sec = 4.0 * ctx.beat_sec;
        assert!(events.iter().all(|e| {
            let bar = (e.start / bar_sec + 1e-9).floor() as usize;
            bar == 0 || bar == 2
        }));
        for e in &events {
            assert!((e.duration - 0.7 * ctx.beat_sec).abs() < 1e-12);
        }
    }

    #[test]
    fn suspense_alternates_degrees_by_parity() {
        let profile = StyleProfile::build(Style::Suspense, "suspense_dense");
        let scale = profile.scales[0];
        let plan = plan(vec![6, 6], vec![false; 2]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 125);
        let voice = StyleParams::registered(Style::Suspense).bass;
        let events = generate_bass(&mut SeedRng::new(0), &ctx, voice);
        assert_eq!(events[0].pitch as i32, scale.pitch(0, -12));
        assert_eq!(events[2].pitch as i32, scale.pitch(3, -12));
    }

    #[test]
    fn bass_is_monophonic_for_every_style() {
        for style in Style::ALL {
            let profile = StyleProfile::build(style, crate::catalog::style_variants(style)[0].id);
            let scale = profile.scales[0];
            let plan = plan(vec![1, 4, 5, 1, 6, 2, 5, 1], vec![false; 8]);
            let ctx = LayerContext::new(&profile, &scale, &plan, 100);
            let voice = StyleParams::registered(style).bass;
            let events = generate_bass(&mut SeedRng::new(17), &ctx, voice);
            for pair in events.windows(2) {
                assert!(pair[0].end() <= pair[1].start + 1e-9, "{style} bass overlaps");
            }
        }
    }
}
