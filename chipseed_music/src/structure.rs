// Structural planning: bar count, intro length, per-bar chord degrees, and
// quiet-bar flags.
//
// The plan is computed once per generation, after the scale and progression
// have been drawn, and then read by every layer generator. Bars are always
// four beats long. Requested bar counts and intro ratios are clamped rather
// than rejected.
//
// Quiet bars exist only for styles whose profile sets a quiet chance. They
// fall on the second and fourth bar of each 4-bar group (index % 4 of 1 or
// 3), intro bars included. The melody ignores them; bass, harmony and drums
// thin out or go silent.
//
// The main section is split into 4-bar phrases; a trailing remainder shorter
// than a phrase joins the last one. Each phrase gets a role from its position
// (question/answer for two phrases, statement/development/variation/
// resolution otherwise). Styles use roles to swap drum templates and to turn
// variation phrases into solos.

use crate::scale::{chord_root_degree, expand_progression};
use chipseed_prng::SeedRng;

pub const MIN_BARS: u32 = 4;
pub const MAX_BARS: u32 = 64;
pub const MAX_INTRO_RATIO: f64 = 0.5;
pub const PHRASE_BARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseRole {
    Statement,
    Question,
    Answer,
    Development,
    Variation,
    Resolution,
}

/// Role of phrase `phrase` out of `total_phrases`.
pub fn phrase_role(phrase: usize, total_phrases: usize) -> PhraseRole {
    const CYCLE: [PhraseRole; 4] = [
        PhraseRole::Statement,
        PhraseRole::Development,
        PhraseRole::Variation,
        PhraseRole::Resolution,
    ];
    match total_phrases {
        0 | 1 => PhraseRole::Statement,
        2 if phrase == 0 => PhraseRole::Question,
        2 => PhraseRole::Answer,
        3 => CYCLE[phrase.min(2)],
        _ => CYCLE[phrase % 4],
    }
}

/// Per-bar plan shared by all layer generators.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPlan {
    pub total_bars: usize,
    pub intro_bars: usize,
    /// 1-based progression degree per bar.
    pub degrees: Vec<u8>,
    pub quiet: Vec<bool>,
}

impl BarPlan {
    pub fn main_bars(&self) -> usize {
        self.total_bars - self.intro_bars
    }

    /// 0-based scale degree of the bar's chord root.
    pub fn chord_root(&self, bar: usize) -> usize {
        self.degrees.get(bar).map_or(0, |&d| chord_root_degree(d))
    }

    pub fn is_quiet(&self, bar: usize) -> bool {
        self.quiet.get(bar).copied().unwrap_or(false)
    }

    pub fn is_intro(&self, bar: usize) -> bool {
        bar < self.intro_bars
    }

    /// Number of main-section phrases; at least one.
    pub fn phrase_count(&self) -> usize {
        (self.main_bars() / PHRASE_BARS).max(1)
    }

    /// Role of the phrase containing `bar`, or `None` for intro bars.
    pub fn phrase_role(&self, bar: usize) -> Option<PhraseRole> {
        if bar < self.intro_bars || bar >= self.total_bars {
            return None;
        }
        let count = self.phrase_count();
        let phrase = ((bar - self.intro_bars) / PHRASE_BARS).min(count - 1);
        Some(phrase_role(phrase, count))
    }

    pub fn quiet_indices(&self) -> Vec<u32> {
        self.quiet
            .iter()
            .enumerate()
            .filter(|(_, q)| **q)
            .map(|(i, _)| i as u32)
            .collect()
    }

    pub fn total_beats(&self) -> f64 {
        (self.total_bars * 4) as f64
    }
}

pub fn clamp_bars(requested: u32) -> usize {
    requested.clamp(MIN_BARS, MAX_BARS) as usize
}

/// Intro length for an (already clamped) bar count.
///
/// Non-positive or NaN ratios give no intro. Otherwise the intro is at least
/// one bar and at most half the piece.
pub fn intro_bars(total_bars: usize, ratio: f64) -> usize {
    let ratio = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, MAX_INTRO_RATIO)
    };
    if ratio <= 0.0 || total_bars < MIN_BARS as usize {
        return 0;
    }
    let intro = ((total_bars as f64 * ratio).floor() as usize).max(1);
    intro.min(total_bars / 2)
}

/// Flag quiet bars. Draws one value per candidate bar, and nothing at all
/// when `chance` is `None`.
pub fn quiet_bars(rng: &mut SeedRng, total_bars: usize, chance: Option<f64>) -> Vec<bool> {
    let mut quiet = vec![false; total_bars];
    let Some(chance) = chance else {
        return quiet;
    };
    for (bar, flag) in quiet.iter_mut().enumerate() {
        if bar % 4 == 1 || bar % 4 == 3 {
            *flag = rng.random_bool(chance);
        }
    }
    quiet
}

/// Build the full bar plan for one generation.
pub fn plan_bars(
    rng: &mut SeedRng,
    requested_bars: u32,
    intro_ratio: f64,
    progression: &[u8],
    quiet_chance: Option<f64>,
) -> BarPlan {
    let total_bars = clamp_bars(requested_bars);
    let intro = intro_bars(total_bars, intro_ratio);
    let degrees = expand_progression(progression, total_bars);
    let quiet = quiet_bars(rng, total_bars, quiet_chance);
    tracing::debug!(
        total_bars,
        intro_bars = intro,
        quiet = quiet.iter().filter(|q| **q).count(),
        "planned bars"
    );
    BarPlan {
        total_bars,
        intro_bars: intro,
        degrees,
        quiet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_count_is_clamped() {
        assert_eq!(clamp_bars(0), 4);
        assert_eq!(clamp_bars(2), 4);
        assert_eq!(clamp_bars(17), 17);
        assert_eq!(clamp_bars(1000), 64);
    }

    #[test]
    fn intro_length_rules() {
        assert_eq!(intro_bars(8, 0.25), 2);
        assert_eq!(intro_bars(8, 0.0), 0);
        assert_eq!(intro_bars(8, -1.0), 0);
        assert_eq!(intro_bars(8, f64::NAN), 0);
        // Small ratios still give one bar.
        assert_eq!(intro_bars(4, 0.01), 1);
        // Ratios above 0.5 are clamped to half the piece.
        assert_eq!(intro_bars(10, 0.9), 5);
        assert_eq!(intro_bars(5, 0.5), 2);
    }

    #[test]
    fn quiet_bars_only_on_odd_positions() {
        let mut rng = SeedRng::new(3);
        let quiet = quiet_bars(&mut rng, 64, Some(1.0));
        for (bar, q) in quiet.iter().enumerate() {
            assert_eq!(*q, bar % 2 == 1, "bar {bar}");
        }
        let none = quiet_bars(&mut rng, 64, None);
        assert!(none.iter().all(|q| !q));
    }

    #[test]
    fn no_quiet_chance_draws_nothing() {
        let mut a = SeedRng::new(11);
        let mut b = SeedRng::new(11);
        quiet_bars(&mut a, 16, None);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn phrase_roles_by_count() {
        use PhraseRole::*;
        assert_eq!(phrase_role(0, 1), Statement);
        assert_eq!(phrase_role(0, 2), Question);
        assert_eq!(phrase_role(1, 2), Answer);
        assert_eq!(phrase_role(2, 3), Variation);
        assert_eq!(phrase_role(3, 4), Resolution);
        assert_eq!(phrase_role(5, 6), Development);
    }

    #[test]
    fn phrases_follow_the_intro() {
        let plan = BarPlan {
            total_bars: 16,
            intro_bars: 2,
            degrees: vec![1; 16],
            quiet: vec![false; 16],
        };
        // 14 main bars: three phrases, the last one six bars long.
        assert_eq!(plan.phrase_count(), 3);
        assert_eq!(plan.phrase_role(1), None);
        assert_eq!(plan.phrase_role(2), Some(PhraseRole::Statement));
        assert_eq!(plan.phrase_role(6), Some(PhraseRole::Development));
        assert_eq!(plan.phrase_role(10), Some(PhraseRole::Variation));
        assert_eq!(plan.phrase_role(15), Some(PhraseRole::Variation));
        assert_eq!(plan.phrase_role(16), None);
    }

    #[test]
    fn plan_expands_progression_per_bar() {
        let mut rng = SeedRng::new(5);
        let plan = plan_bars(&mut rng, 6, 0.25, &[1, 5, 6, 4], None);
        assert_eq!(plan.total_bars, 6);
        assert_eq!(plan.intro_bars, 1);
        assert_eq!(plan.main_bars(), 5);
        assert_eq!(plan.degrees, vec![1, 5, 6, 4, 1, 5]);
        assert_eq!(plan.chord_root(1), 4);
        assert!(plan.is_intro(0));
        assert!(!plan.is_intro(1));
        assert!(plan.quiet_indices().is_empty());
    }
}
