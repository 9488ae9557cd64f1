//! How far a potential is from good rolls, in cubes.

use super::ranker::IMPROVEMENT_EPS;
use crate::cubes::{pity_threshold, tier_up_rate};
use crate::items::PotentialKind;
use crate::tiers::{remaining_rolls, tier_up_within, PityState, PotentialTier};
use serde::Serialize;

/// Tier-ups further away than this earn no bonus
const TIER_UP_BONUS_HORIZON: f64 = 200.0;

/// One cube outcome, as DPS% over the potential's baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRoll {
    pub gain_pct: f64,
    pub probability: f64,
}

/// What one cube can do to a potential.
#[derive(Debug, Clone)]
pub struct RollProfile<'a> {
    /// Outcomes of the next cube, weights summing to 1
    pub rolls: &'a [ScoredRoll],
    pub current_gain_pct: f64,
    /// Best roll at the current tier
    pub best_at_tier_pct: f64,
    /// Best roll at the tier above, if there is one
    pub best_at_next_pct: Option<f64>,
}

impl RollProfile<'_> {
    fn p_at_least(&self, target: f64) -> f64 {
        self.rolls
            .iter()
            .filter(|r| r.gain_pct >= target)
            .map(|r| r.probability)
            .sum()
    }

    fn p_better(&self) -> f64 {
        self.rolls
            .iter()
            .filter(|r| r.gain_pct - self.current_gain_pct > IMPROVEMENT_EPS)
            .map(|r| r.probability)
            .sum()
    }

    /// Expected cubes until a roll reaches `fraction` of the best at this
    /// tier. Zero when the current lines already do.
    pub fn cubes_to_fraction_of_best(&self, fraction: f64) -> f64 {
        let target = self.best_at_tier_pct * fraction;
        if self.current_gain_pct >= target {
            return 0.0;
        }
        let p = self.p_at_least(target);
        if p > 0.0 {
            1.0 / p
        } else {
            f64::INFINITY
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CubeMetrics {
    /// DPS% the current lines add over an empty potential
    pub current_gain_pct: f64,
    pub best_at_tier_pct: f64,
    pub cubes_to_50pct_best: f64,
    pub cubes_to_70pct_best: f64,
    pub cubes_to_85pct_best: f64,
    pub p_improve_10_cubes: f64,
    pub p_improve_50_cubes: f64,
    pub pity_counter: u32,
    pub pity_threshold: u32,
    /// Infinite at the top tier
    pub cubes_to_tier_up: f64,
    /// Best-roll gain from moving up a tier
    pub tier_up_gain_pct: f64,
    /// Tier-up gain per cube spent reaching it, times 10
    pub tier_up_bonus: f64,
}

/// Summarize `profile` for a potential of `kind` at `tier` whose pity
/// counter stands at `counter`.
///
/// Improvement odds over several cubes treat the pity cap as a bound on the
/// wait, the same way the ranker prices a cube.
pub fn cube_metrics(
    profile: &RollProfile<'_>,
    kind: PotentialKind,
    tier: PotentialTier,
    counter: u32,
) -> CubeMetrics {
    let threshold = pity_threshold(kind, tier);
    let residual = PityState::new(counter).residual(threshold);
    let p_better = profile.p_better();
    let p_within = |cubes: u32| {
        if p_better > 0.0 {
            tier_up_within(p_better, residual, cubes)
        } else {
            0.0
        }
    };

    let (cubes_to_tier_up, tier_up_gain_pct) = match profile.best_at_next_pct {
        Some(next) => (
            remaining_rolls(tier_up_rate(tier), threshold, counter),
            (next - profile.best_at_tier_pct).max(0.0),
        ),
        None => (f64::INFINITY, 0.0),
    };
    let tier_up_bonus = if cubes_to_tier_up > 0.0 && cubes_to_tier_up < TIER_UP_BONUS_HORIZON {
        tier_up_gain_pct / cubes_to_tier_up * 10.0
    } else {
        0.0
    };

    CubeMetrics {
        current_gain_pct: profile.current_gain_pct,
        best_at_tier_pct: profile.best_at_tier_pct,
        cubes_to_50pct_best: profile.cubes_to_fraction_of_best(0.50),
        cubes_to_70pct_best: profile.cubes_to_fraction_of_best(0.70),
        cubes_to_85pct_best: profile.cubes_to_fraction_of_best(0.85),
        p_improve_10_cubes: p_within(10),
        p_improve_50_cubes: p_within(50),
        pity_counter: counter,
        pity_threshold: threshold,
        cubes_to_tier_up,
        tier_up_gain_pct,
        tier_up_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rolls() -> Vec<ScoredRoll> {
        vec![
            ScoredRoll {
                gain_pct: 0.0,
                probability: 0.5,
            },
            ScoredRoll {
                gain_pct: 4.0,
                probability: 0.3,
            },
            ScoredRoll {
                gain_pct: 10.0,
                probability: 0.2,
            },
        ]
    }

    #[test]
    fn test_cubes_to_fraction_of_best() {
        let rolls = rolls();
        let profile = RollProfile {
            rolls: &rolls,
            current_gain_pct: 0.0,
            best_at_tier_pct: 10.0,
            best_at_next_pct: None,
        };
        // 50% of best is 5: only the 10 roll, p = 0.2
        assert!((profile.cubes_to_fraction_of_best(0.5) - 5.0).abs() < 1e-12);
        // 30% of best is 3: the 4 and 10 rolls, p = 0.5
        assert!((profile.cubes_to_fraction_of_best(0.3) - 2.0).abs() < 1e-12);

        let there = RollProfile {
            current_gain_pct: 9.0,
            ..profile
        };
        assert_eq!(there.cubes_to_fraction_of_best(0.85), 0.0);
    }

    #[test]
    fn test_improvement_odds_use_pity() {
        let rolls = rolls();
        let profile = RollProfile {
            rolls: &rolls,
            current_gain_pct: 4.0,
            best_at_tier_pct: 10.0,
            best_at_next_pct: None,
        };
        let m = cube_metrics(&profile, PotentialKind::Regular, PotentialTier::Mystic, 0);
        // Only the 10 roll beats 4
        assert!((m.p_improve_10_cubes - (1.0 - 0.8_f64.powi(10))).abs() < 1e-12);
        assert!(m.p_improve_50_cubes > m.p_improve_10_cubes);
        assert!(m.cubes_to_tier_up.is_infinite());
        assert_eq!(m.tier_up_bonus, 0.0);

        // Pity 5 short of the cap guarantees an improvement within 10
        let threshold = pity_threshold(PotentialKind::Regular, PotentialTier::Rare);
        let m = cube_metrics(
            &profile,
            PotentialKind::Regular,
            PotentialTier::Rare,
            threshold - 5,
        );
        assert_eq!(m.p_improve_10_cubes, 1.0);
        assert_eq!(m.pity_counter, threshold - 5);
    }

    #[test]
    fn test_tier_up_bonus() {
        let rolls = rolls();
        let profile = RollProfile {
            rolls: &rolls,
            current_gain_pct: 0.0,
            best_at_tier_pct: 10.0,
            best_at_next_pct: Some(16.0),
        };
        let m = cube_metrics(&profile, PotentialKind::Regular, PotentialTier::Normal, 0);
        assert_eq!(m.tier_up_gain_pct, 6.0);
        assert!(m.cubes_to_tier_up < TIER_UP_BONUS_HORIZON);
        assert!((m.tier_up_bonus - 6.0 / m.cubes_to_tier_up * 10.0).abs() < 1e-12);

        // Legendary to Mystic is too far off to count
        let m = cube_metrics(&profile, PotentialKind::Regular, PotentialTier::Legendary, 0);
        assert!(m.cubes_to_tier_up > TIER_UP_BONUS_HORIZON);
        assert_eq!(m.tier_up_bonus, 0.0);
    }

    #[test]
    fn test_nothing_better_never_improves() {
        let rolls = rolls();
        let profile = RollProfile {
            rolls: &rolls,
            current_gain_pct: 10.0,
            best_at_tier_pct: 10.0,
            best_at_next_pct: None,
        };
        let m = cube_metrics(&profile, PotentialKind::Bonus, PotentialTier::Epic, 149);
        assert_eq!(m.p_improve_10_cubes, 0.0);
        assert_eq!(m.cubes_to_85pct_best, 0.0);
    }
}
