// Drum pattern generation.
//
// Main-section bars play the style's one-bar template (or the template its
// phrase role selects), with optional hits rolled per bar and a crash rolled
// on the downbeat of every 4-bar phrase.
// Intro bars get a two-phase treatment: silence for the first half of the
// intro, then one soft kick per bar. Quiet bars are silent.
//
// Template velocities are multiplied by the style's drum-velocity scale
// (which overrides can change) and clamped to MIDI range. Events are sorted
// by start beat; hits of one kind never overlap.

use crate::compose::LayerContext;
use crate::event::{DrumEvent, DrumKind, clamp_velocity};
use chipseed_prng::SeedRng;

const INTRO_KICK_VELOCITY: f64 = 70.0;
const CRASH_VELOCITY: f64 = 105.0;

pub fn generate_drums(
    rng: &mut SeedRng,
    ctx: &LayerContext<'_>,
    velocity_scale: f64,
) -> Vec<DrumEvent> {
    let rules = &ctx.profile.drums;
    let plan = ctx.plan;
    let intro = plan.intro_bars;
    let intro_silent = (intro / 2).max(1);
    let mut events = Vec::new();

    for bar in 0..plan.total_bars {
        let bar_start = bar as f64 * 4.0;

        if plan.is_intro(bar) {
            if bar >= intro_silent {
                events.push(DrumEvent {
                    kind: DrumKind::Kick,
                    start_beat: bar_start,
                    beats: 0.25,
                    velocity: clamp_velocity(INTRO_KICK_VELOCITY * velocity_scale),
                });
            }
            continue;
        }
        if plan.is_quiet(bar) {
            continue;
        }

        let crash_chance = match rules.crash_chance {
            Some(chance) if (bar - intro) % 4 == 0 => chance,
            _ => 0.0,
        };
        if crash_chance > 0.0 && rng.random_bool(crash_chance) {
            events.push(DrumEvent {
                kind: DrumKind::Crash,
                start_beat: bar_start,
                beats: 0.5,
                velocity: clamp_velocity(CRASH_VELOCITY * velocity_scale),
            });
        }

        for hit in rules.template_for(plan.phrase_role(bar)) {
            if hit.chance < 1.0 && !rng.random_bool(hit.chance) {
                continue;
            }
            events.push(DrumEvent {
                kind: hit.kind,
                start_beat: bar_start + hit.beat,
                beats: hit.beats,
                velocity: clamp_velocity(hit.velocity * velocity_scale),
            });
        }
    }

    events.sort_by(|a, b| a.start_beat.total_cmp(&b.start_beat));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::StyleProfile;
    use crate::structure::BarPlan;
    use crate::style::Style;

    fn plan(total: usize, intro: usize, quiet: Vec<bool>) -> BarPlan {
        BarPlan {
            total_bars: total,
            intro_bars: intro,
            degrees: vec![1; total],
            quiet,
        }
    }

    #[test]
    fn intro_is_silent_then_single_kicks() {
        let profile = StyleProfile::build(Style::Rock, "default");
        let scale = profile.scales[0];
        let plan = plan(12, 4, vec![false; 12]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 150);
        let events = generate_drums(&mut SeedRng::new(4), &ctx, 1.3);

        let in_bar = |bar: usize| {
            events
                .iter()
                .filter(|e| e.start_beat >= bar as f64 * 4.0 && e.start_beat < (bar + 1) as f64 * 4.0)
                .collect::<Vec<_>>()
        };
        assert!(in_bar(0).is_empty());
        assert!(in_bar(1).is_empty());
        for bar in [2, 3] {
            let hits = in_bar(bar);
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].kind, DrumKind::Kick);
            assert_eq!(hits[0].velocity, 91, "70 * 1.3");
        }
        assert!(in_bar(4).len() >= 4, "main section plays the template");
    }

    #[test]
    fn one_bar_intro_is_fully_silent() {
        let profile = StyleProfile::build(Style::Classic8Bit, "default");
        let scale = profile.scales[0];
        let plan = plan(4, 1, vec![false; 4]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 120);
        let events = generate_drums(&mut SeedRng::new(0), &ctx, 1.0);
        assert!(events.iter().all(|e| e.start_beat >= 4.0));
    }

    #[test]
    fn quiet_bars_are_silent() {
        let profile = StyleProfile::build(Style::Suspense, "suspense_default");
        let scale = profile.scales[0];
        let plan = plan(4, 0, vec![false, true, false, true]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 125);
        let events = generate_drums(&mut SeedRng::new(0), &ctx, 0.8);
        assert_eq!(events.len(), 8);
        assert!(
            events
                .iter()
                .all(|e| e.start_beat < 4.0 || (8.0..12.0).contains(&e.start_beat))
        );
    }

    #[test]
    fn velocities_scale_and_clamp() {
        let profile = StyleProfile::build(Style::Dance, "default");
        let scale = profile.scales[0];
        let plan = plan(4, 0, vec![false; 4]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 130);
        let events = generate_drums(&mut SeedRng::new(0), &ctx, 1.2);
        let kick = events.iter().find(|e| e.kind == DrumKind::Kick).unwrap();
        assert_eq!(kick.velocity, 127, "155 * 1.2 clamps");
        let hat = events.iter().find(|e| e.kind == DrumKind::Hihat).unwrap();
        assert_eq!(hat.velocity, 84);
    }

    #[test]
    fn crash_only_on_phrase_downbeats() {
        let profile = StyleProfile::build(Style::Rock, "rock_heavier");
        let scale = profile.scales[0];
        let plan = plan(64, 2, vec![false; 64]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 150);
        let events = generate_drums(&mut SeedRng::new(9), &ctx, 1.0);
        let crashes: Vec<_> = events.iter().filter(|e| e.kind == DrumKind::Crash).collect();
        assert!(!crashes.is_empty());
        for c in crashes {
            let bar = (c.start_beat / 4.0) as usize;
            assert_eq!((bar - 2) % 4, 0, "crash in bar {bar}");
            assert_eq!(c.start_beat, bar as f64 * 4.0);
        }
    }

    #[test]
    fn rock_phrases_change_density() {
        let profile = StyleProfile::build(Style::Rock, "default");
        let scale = profile.scales[0];
        // 16 main bars: statement, development, variation, resolution.
        let plan = plan(16, 0, vec![false; 16]);
        let ctx = LayerContext::new(&profile, &scale, &plan, 150);
        let events = generate_drums(&mut SeedRng::new(2), &ctx, 1.0);
        let count = |bar: usize, kind: DrumKind| {
            events
                .iter()
                .filter(|e| e.kind == kind && (e.start_beat / 4.0) as usize == bar)
                .count()
        };
        assert_eq!(count(1, DrumKind::Kick), 2);
        assert_eq!(count(5, DrumKind::Kick), 4, "development drives every beat");
        assert_eq!(count(9, DrumKind::Kick), 8);
        assert_eq!(count(9, DrumKind::Snare), 3);
        assert_eq!(count(9, DrumKind::Hihat), 16, "solo bars ride sixteenths");
        assert_eq!(count(13, DrumKind::Hihat), 0);
        assert_eq!(count(13, DrumKind::Kick), 2);
    }

    #[test]
    fn kinds_never_overlap() {
        for style in Style::ALL {
            let profile = StyleProfile::build(style, crate::catalog::style_variants(style)[0].id);
            let scale = profile.scales[0];
            let plan = plan(20, 2, vec![false; 20]);
            let ctx = LayerContext::new(&profile, &scale, &plan, 120);
            let events = generate_drums(&mut SeedRng::new(21), &ctx, 1.0);
            for kind in [DrumKind::Kick, DrumKind::Snare, DrumKind::Hihat, DrumKind::Crash] {
                let of_kind: Vec<_> = events.iter().filter(|e| e.kind == kind).collect();
                for pair in of_kind.windows(2) {
                    assert!(
                        pair[0].start_beat + pair[0].beats <= pair[1].start_beat + 1e-9,
                        "{style} {kind:?} overlap at beat {}",
                        pair[1].start_beat
                    );
                }
            }
        }
    }
}
