// Melody generation: the lead line, bar by bar and step by step.
//
// For each bar the engine picks a motif (see `motif.rs`), lays its steps
// across the bar, and turns every step into a pitch:
//
// - Strong beats (beat 0 and beat 2) pick a chord tone above the bar root,
//   or with some styles a "tense" non-triadic degree.
// - Weak beats follow the motif's relative degree, optionally jittered by
//   one step. Weak beats in the first half of the bar may rest instead.
// - In the last quarter of the piece every degree is lifted by two steps.
// - The resolved pitch is smoothed against the previous note (leap rules),
//   clamped to the register [root - 5, root + 14], and nudged one step if it
//   would be the third identical pitch in a row.
//
// Velocity follows a 4-bar phrase arc, scaled per style and softened in the
// intro. Articulation may split one slot into re-triggered sub-notes that
// together fill the slot. After the last bar the final note is pulled to the
// tonic (if more than two semitones away) and stretched to the end of the
// piece.
//
// Styles with solo rules replace the motif in variation phrases with a
// sixteenth-note run: chord tones on each beat, one- or two-degree steps in
// between. Styles with a delayed intro entry leave the first bars to the
// drums; skipped bars and solo bars draw no motif.
//
// Randomness is consumed in a fixed order per step: rest, degree (tension
// or jitter), repetition nudge, velocity. Changing that order changes every
// seeded output.

use crate::compose::LayerContext;
use crate::error::GenerationError;
use crate::event::{NoteEvent, clamp_pitch, clamp_velocity};
use crate::motif::{MotifSelector, MotifStep, fit_to_bar};
use crate::profile::{Articulation, LeapRule, MelodyRules, MelodyVelocity, SoloRules};
use crate::scale::ScaleSpec;
use crate::structure::PhraseRole;
use crate::style::LayerVoice;
use chipseed_prng::SeedRng;

const BAR_BEATS: f64 = 4.0;
const CHORD_TONES: [i32; 3] = [0, 2, 4];
const INTRO_SOFTEN: f64 = 0.65;
const REGISTER_BELOW: i32 = 5;
const REGISTER_ABOVE: i32 = 14;
const CADENCE_TOLERANCE: i32 = 2;
const EPS: f64 = 1e-9;
const SOLO_STEP: f64 = 0.25;

pub fn generate_melody(
    rng: &mut SeedRng,
    ctx: &LayerContext<'_>,
    voice: LayerVoice,
) -> Result<Vec<NoteEvent>, GenerationError> {
    let profile = ctx.profile;
    let rules = &profile.melody;
    let scale = ctx.scale;
    let plan = ctx.plan;
    let register = (
        scale.root as i32 - REGISTER_BELOW,
        scale.root as i32 + REGISTER_ABOVE,
    );

    let mut selector = MotifSelector::new();
    let mut events: Vec<NoteEvent> = Vec::new();
    let empty_palette = || GenerationError::EmptyMotifPalette {
        style: profile.style,
    };

    let entry = profile.intro_entry.melody_start(plan.intro_bars);
    for bar in entry..plan.total_bars {
        let root = plan.chord_root(bar) as i32;
        // Lift the melodic center for the final quarter.
        let shift = if bar * 4 >= plan.total_bars * 3 { 2 } else { 0 };
        let in_variation = plan.phrase_role(bar) == Some(PhraseRole::Variation);
        if let Some(solo) = rules.solo.filter(|_| in_variation) {
            play_solo(rng, &mut events, &solo, ctx, voice, bar, root + shift);
            continue;
        }
        let slot = selector
            .next(rng, profile.motifs.len())
            .ok_or_else(empty_palette)?;
        let motif = *profile.motifs.get(slot).ok_or_else(empty_palette)?;
        tracing::trace!(bar, motif = slot, "melody motif");

        let intensity = phrase_intensity(bar);
        let intro = plan.is_intro(bar);

        for (cursor, beats, step) in fit_to_bar(motif, BAR_BEATS) {
            let strong = is_strong_beat(cursor);
            if !strong && cursor < BAR_BEATS / 2.0 && rng.next_f64() < rules.rest_chance {
                continue;
            }

            let degree = shift
                + if strong {
                    strong_degree(rng, rules, root)
                } else {
                    weak_degree(rng, rules, root, step)
                };

            let index = scale.clamp_index(degree);
            let mut pitch = scale.pitch(index as i32, 0);
            if let Some(last) = events.last() {
                pitch = smooth_leap(pitch, last.pitch as i32, rules.leaps);
            }
            pitch = pitch.clamp(register.0, register.1);
            pitch = break_repetition(rng, scale, &events, index, pitch, register);

            let velocity = melody_velocity(rng, &rules.velocity, strong, intensity, intro);
            let start_beat = (bar as f64) * BAR_BEATS + cursor;
            articulate(
                &mut events,
                rules.articulation,
                Slot {
                    pitch: clamp_pitch(pitch),
                    start_beat,
                    beats,
                    velocity,
                },
                ctx.beat_sec,
                voice,
            );
        }
    }

    apply_cadence(&mut events, scale.tonic(), plan.total_beats() * ctx.beat_sec);
    Ok(events)
}

/// 4-bar phrase arc: 0.7 and 0.775 for the first two bars of each phrase,
/// then 1.0 and 0.95.
pub fn phrase_intensity(bar: usize) -> f64 {
    let progress = (bar % 4) as f64 / 4.0;
    if progress < 0.5 {
        0.7 + 0.3 * progress
    } else {
        1.0 - 0.2 * (progress - 0.5)
    }
}

fn is_strong_beat(cursor: f64) -> bool {
    cursor.abs() < EPS || (cursor - 2.0).abs() < EPS
}

fn strong_degree(rng: &mut SeedRng, rules: &MelodyRules, root: i32) -> i32 {
    let pool: &[i32] = match rules.tension {
        Some(tension) if rng.random_bool(tension.chance) => tension.degrees,
        _ => &CHORD_TONES,
    };
    root + rng.choose(pool).copied().unwrap_or(0)
}

fn weak_degree(rng: &mut SeedRng, rules: &MelodyRules, root: i32, step: MotifStep) -> i32 {
    let mut degree = root + step.rel as i32;
    if rules.jitter_chance > 0.0 && rng.random_bool(rules.jitter_chance) {
        degree += if rng.random_bool(0.5) { 1 } else { -1 };
    }
    degree
}

/// Pull an oversized leap back toward `last`. Rules apply in order.
pub fn smooth_leap(pitch: i32, last: i32, rules: &[LeapRule]) -> i32 {
    let mut pitch = pitch;
    for rule in rules {
        let delta = pitch - last;
        if delta.abs() > rule.max {
            pitch = last + rule.step * delta.signum();
        }
    }
    pitch
}

fn repeats_twice(events: &[NoteEvent], pitch: i32) -> bool {
    match events {
        [.., a, b] => a.pitch as i32 == pitch && b.pitch as i32 == pitch,
        _ => false,
    }
}

/// If `pitch` would be the third identical pitch in a row, move `index` one
/// random step and resolve again inside `register`. Draws only when nudging.
fn break_repetition(
    rng: &mut SeedRng,
    scale: &ScaleSpec,
    events: &[NoteEvent],
    index: usize,
    pitch: i32,
    register: (i32, i32),
) -> i32 {
    if !repeats_twice(events, pitch) {
        return pitch;
    }
    let nudge = if rng.next_f64() < 0.5 { 1 } else { -1 };
    let index = scale.clamp_index(index as i32 + nudge);
    scale.pitch(index as i32, 0).clamp(register.0, register.1)
}

fn melody_velocity(
    rng: &mut SeedRng,
    shape: &MelodyVelocity,
    strong: bool,
    intensity: f64,
    intro: bool,
) -> f64 {
    let base = if strong {
        100.0 + 20.0 * intensity
    } else {
        80.0 + 15.0 * intensity * rng.next_f64()
    };
    let mut v = base * shape.scale;
    if shape.jitter > 0.0 {
        v += rng.range_f64(-shape.jitter, shape.jitter).trunc();
    }
    if shape.floor > 0.0 {
        v = v.max(shape.floor);
    }
    if intro {
        v *= INTRO_SOFTEN;
    }
    v
}

/// Sixteen sixteenths filling `bar`. `center` is the shifted chord root.
fn play_solo(
    rng: &mut SeedRng,
    events: &mut Vec<NoteEvent>,
    solo: &SoloRules,
    ctx: &LayerContext<'_>,
    voice: LayerVoice,
    bar: usize,
    center: i32,
) {
    let scale = ctx.scale;
    let low = scale.root as i32 - REGISTER_BELOW;
    let high = scale.root as i32 + REGISTER_ABOVE;
    let mut last = scale.clamp_index(center) as i32;
    let notes = (BAR_BEATS / SOLO_STEP) as usize;

    for i in 0..notes {
        let on_beat = i % 4 == 0;
        let degree = if on_beat {
            center + rng.choose(&CHORD_TONES).copied().unwrap_or(0)
        } else {
            let reach = if rng.random_bool(solo.step_chance) { 1 } else { 2 };
            last + if rng.random_bool(0.5) { reach } else { -reach }
        };
        last = scale.clamp_index(degree) as i32;
        let pitch = scale.pitch(last, 0).clamp(low, high);

        let velocity = if on_beat {
            solo.strong_velocity + rng.range_f64(-10.0, 15.0).trunc()
        } else {
            solo.weak_velocity + rng.range_f64(-10.0, 10.0).trunc()
        };
        let start_beat = bar as f64 * BAR_BEATS + i as f64 * SOLO_STEP;
        events.push(NoteEvent {
            pitch: clamp_pitch(pitch),
            start: start_beat * ctx.beat_sec,
            duration: SOLO_STEP * ctx.beat_sec,
            velocity: clamp_velocity(velocity.max(solo.velocity_floor)),
            voice,
        });
    }
}

/// One rhythmic slot before articulation.
struct Slot {
    pitch: u8,
    start_beat: f64,
    beats: f64,
    velocity: f64,
}

fn articulate(
    out: &mut Vec<NoteEvent>,
    articulation: Articulation,
    slot: Slot,
    beat_sec: f64,
    voice: LayerVoice,
) {
    let mut push = |offset: f64, beats: f64, velocity: f64| {
        out.push(NoteEvent {
            pitch: slot.pitch,
            start: (slot.start_beat + offset) * beat_sec,
            duration: beats * beat_sec,
            velocity: clamp_velocity(velocity),
            voice,
        });
    };

    match articulation {
        // The first half is gated short (staccato) and leaves a gap of at
        // most half its sub-slot; the second half sounds to the slot end.
        Articulation::Halves if slot.beats >= 0.5 => {
            let sub = slot.beats / 2.0;
            let gate = (sub * 0.5).max(0.25).min(sub);
            push(0.0, gate, slot.velocity);
            push(sub, sub, slot.velocity + 5.0);
        }
        Articulation::Triplet if slot.beats >= 0.5 => {
            let sub = slot.beats / 3.0;
            let outer = (slot.velocity * 0.9).max(50.0);
            push(0.0, sub * 0.75, outer);
            push(sub, sub * 0.8, slot.velocity * 1.05);
            push(2.0 * sub, sub, outer);
        }
        _ => push(0.0, slot.beats, slot.velocity),
    }
}

/// Resolve the last note to the tonic and hold it to `end_sec`.
fn apply_cadence(events: &mut [NoteEvent], tonic: i32, end_sec: f64) {
    let Some(last) = events.last_mut() else {
        return;
    };
    if (last.pitch as i32 - tonic).abs() > CADENCE_TOLERANCE {
        last.pitch = clamp_pitch(tonic);
    }
    last.duration = end_sec - last.start;
}
