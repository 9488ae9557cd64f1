//! Hero power line odds and value ranges.

use super::types::{HeroPowerLevel, HeroTier};
use crate::cubes::{push_option, LineOption};
use crate::items::PotentialLine;
use crate::stats::StatKind;

use StatKind::*;

const MYSTIC_STATS: [(StatKind, f64); 10] = [
    (DamagePct, 0.20),
    (BossDamage, 0.20),
    (DefPen, 0.15),
    (MaxDamageMult, 0.15),
    (CritDamage, 0.10),
    (MinDamageMult, 0.05),
    (MainStatFlat, 0.05),
    (CritRate, 0.05),
    (AttackPct, 0.03),
    (NormalDamage, 0.02),
];

const LEGENDARY_STATS: [(StatKind, f64); 10] = [
    (DamagePct, 0.18),
    (BossDamage, 0.18),
    (DefPen, 0.12),
    (MaxDamageMult, 0.12),
    (CritDamage, 0.08),
    (MinDamageMult, 0.08),
    (MainStatFlat, 0.08),
    (CritRate, 0.06),
    (AttackPct, 0.05),
    (NormalDamage, 0.05),
];

const DEFAULT_STATS: [(StatKind, f64); 12] = [
    (DamagePct, 0.10),
    (BossDamage, 0.08),
    (DefPen, 0.06),
    (MaxDamageMult, 0.08),
    (CritDamage, 0.05),
    (MinDamageMult, 0.10),
    (MainStatFlat, 0.12),
    (CritRate, 0.08),
    (AttackPct, 0.08),
    (NormalDamage, 0.10),
    (Defense, 0.08),
    (MaxHp, 0.07),
];

pub fn stat_probabilities(tier: HeroTier) -> &'static [(StatKind, f64)] {
    match tier {
        HeroTier::Mystic => &MYSTIC_STATS,
        HeroTier::Legendary => &LEGENDARY_STATS,
        _ => &DEFAULT_STATS,
    }
}

/// Inclusive value range of `kind` at `tier`, if that line exists there.
pub fn value_range(tier: HeroTier, kind: StatKind) -> Option<(f64, f64)> {
    // damage-like, def pen, crit damage, flat main, crit rate, attack %
    #[rustfmt::skip]
    let (dmg, pen, cd, main, cr, atk) = match tier {
        HeroTier::Mystic => ((28.0, 40.0), (14.0, 20.0), (20.0, 30.0), (1500.0, 2500.0), (8.0, 12.0), (12.0, 18.0)),
        HeroTier::Legendary => ((18.0, 25.0), (10.0, 14.0), (14.0, 20.0), (800.0, 1200.0), (5.0, 8.0), (8.0, 12.0)),
        HeroTier::Unique => ((12.0, 18.0), (6.0, 10.0), (10.0, 14.0), (400.0, 700.0), (3.0, 5.0), (5.0, 8.0)),
        HeroTier::Epic => ((8.0, 12.0), (4.0, 6.0), (6.0, 10.0), (200.0, 300.0), (2.0, 3.0), (3.0, 5.0)),
        HeroTier::Rare => ((4.0, 8.0), (2.0, 4.0), (3.0, 6.0), (100.0, 150.0), (1.0, 2.0), (2.0, 3.0)),
        HeroTier::Common => ((1.0, 4.0), (1.0, 2.0), (1.0, 3.0), (40.0, 60.0), (0.5, 1.0), (1.0, 2.0)),
    };
    match kind {
        DamagePct | BossDamage | NormalDamage | MaxDamageMult | MinDamageMult => Some(dmg),
        DefPen => Some(pen),
        CritDamage => Some(cd),
        MainStatFlat => Some(main),
        CritRate => Some(cr),
        AttackPct => Some(atk),
        Defense => match tier {
            HeroTier::Epic => Some((100.0, 200.0)),
            HeroTier::Rare => Some((50.0, 100.0)),
            HeroTier::Common => Some((20.0, 50.0)),
            _ => None,
        },
        MaxHp => match tier {
            HeroTier::Epic => Some((500.0, 1000.0)),
            HeroTier::Rare => Some((200.0, 500.0)),
            HeroTier::Common => Some((100.0, 200.0)),
            _ => None,
        },
        _ => None,
    }
}

/// `points` evenly spaced values across `[min, max]`; the midpoint when
/// only one point is asked for.
pub fn value_grid(min: f64, max: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![(min + max) / 2.0],
        n => (0..n)
            .map(|i| min + (max - min) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Distribution of one rerolled line, with each value range discretized
/// into `grid_points` equally likely values. Lines without a range at the
/// rolled tier count as dead.
pub fn line_distribution(level: &HeroPowerLevel, grid_points: usize) -> Vec<LineOption> {
    let mut options = Vec::new();
    for (tier, tier_prob) in level.tier_rates() {
        for &(kind, stat_prob) in stat_probabilities(tier) {
            let joint = tier_prob * stat_prob;
            let values = value_range(tier, kind)
                .map(|(lo, hi)| value_grid(lo, hi, grid_points))
                .unwrap_or_default();
            if values.is_empty() {
                push_option(&mut options, None, joint);
                continue;
            }
            let each = joint / values.len() as f64;
            for value in values {
                push_option(&mut options, Some(PotentialLine { kind, value }), each);
            }
        }
    }
    options
}
