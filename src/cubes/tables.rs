//! Potential cube rates, pity thresholds and stat pools.
//!
//! Pools list one character class's view: that class's main stat lines are
//! kept, the other three classes' main stat lines only contribute weight
//! (`off_class_weight`) and roll as dead lines.

use crate::config::CurrencyRates;
use crate::items::{EquipmentSlot, PotentialKind, PotentialLine};
use crate::stats::StatKind;
use crate::tiers::{PoolEntry, PotentialTier, TierStep, TierTrack, PITY_NONE};

/// Lines on every potential
pub const LINES_PER_POTENTIAL: usize = 3;

/// Chance that a current-tier line rolls the slot's special stat
pub const SPECIAL_POTENTIAL_RATE: f64 = 0.01;

/// Classes whose main stat lines are dead weight for any one character
const OFF_CLASSES: f64 = 3.0;

const MAIN_PCT_WEIGHT: f64 = 0.045;
const MAIN_FLAT_WEIGHT: f64 = 0.0925;

pub fn tier_up_rate(tier: PotentialTier) -> f64 {
    match tier {
        PotentialTier::Normal => 0.06,
        PotentialTier::Rare => 0.03333,
        PotentialTier::Epic => 0.006,
        PotentialTier::Unique => 0.0021,
        PotentialTier::Legendary => 0.0014,
        PotentialTier::Mystic => 0.0,
    }
}

pub fn pity_threshold(kind: PotentialKind, tier: PotentialTier) -> u32 {
    match (kind, tier) {
        (_, PotentialTier::Mystic) => PITY_NONE,
        (PotentialKind::Regular, PotentialTier::Normal) => 33,
        (PotentialKind::Regular, PotentialTier::Rare) => 60,
        (PotentialKind::Regular, PotentialTier::Epic) => 150,
        (PotentialKind::Regular, PotentialTier::Unique) => 333,
        (PotentialKind::Regular, PotentialTier::Legendary) => 714,
        (PotentialKind::Bonus, PotentialTier::Normal) => 45,
        (PotentialKind::Bonus, PotentialTier::Rare) => 85,
        (PotentialKind::Bonus, PotentialTier::Epic) => 150,
        (PotentialKind::Bonus, PotentialTier::Unique) => 417,
        (PotentialKind::Bonus, PotentialTier::Legendary) => 714,
    }
}

/// Chance that line `line` (1-based) rolls from the current tier rather than
/// the tier below.
pub fn yellow_rate(line: usize) -> f64 {
    match line {
        2 => 0.24,
        3 => 0.08,
        _ => 1.0,
    }
}

fn entry(kind: StatKind, value: f64, probability: f64) -> PoolEntry {
    PoolEntry {
        kind,
        value,
        probability,
    }
}

/// Line values at each tier, in pool order.
struct TierValues {
    main_pct: f64,
    main_flat: Option<f64>,
    defense: f64,
    hp: Option<f64>,
    mp: Option<f64>,
    crit_rate: Option<f64>,
    attack_speed: Option<f64>,
    damage: Option<f64>,
    min_max: Option<f64>,
    skill_cd: Option<f64>,
}

fn tier_values(tier: PotentialTier) -> TierValues {
    match tier {
        PotentialTier::Normal => TierValues {
            main_pct: 3.0,
            main_flat: None,
            defense: 3.0,
            hp: None,
            mp: None,
            crit_rate: None,
            attack_speed: None,
            damage: None,
            min_max: None,
            skill_cd: None,
        },
        PotentialTier::Rare => TierValues {
            main_pct: 4.5,
            main_flat: None,
            defense: 4.5,
            hp: None,
            mp: None,
            crit_rate: Some(4.5),
            attack_speed: Some(3.5),
            damage: Some(8.0),
            min_max: Some(6.0),
            skill_cd: None,
        },
        PotentialTier::Epic => TierValues {
            main_pct: 6.0,
            main_flat: Some(200.0),
            defense: 6.0,
            hp: Some(12.0),
            mp: Some(6.0),
            crit_rate: Some(6.0),
            attack_speed: Some(4.0),
            damage: Some(12.0),
            min_max: Some(8.0),
            skill_cd: None,
        },
        PotentialTier::Unique => TierValues {
            main_pct: 9.0,
            main_flat: Some(400.0),
            defense: 9.0,
            hp: Some(15.0),
            mp: Some(9.0),
            crit_rate: Some(9.0),
            attack_speed: Some(5.0),
            damage: Some(18.0),
            min_max: Some(10.0),
            skill_cd: Some(1.0),
        },
        PotentialTier::Legendary => TierValues {
            main_pct: 12.0,
            main_flat: Some(600.0),
            defense: 12.0,
            hp: Some(20.0),
            mp: Some(12.0),
            crit_rate: Some(12.0),
            attack_speed: Some(7.0),
            damage: Some(25.0),
            min_max: Some(15.0),
            skill_cd: Some(1.5),
        },
        PotentialTier::Mystic => TierValues {
            main_pct: 15.0,
            main_flat: Some(1000.0),
            defense: 15.0,
            hp: Some(25.0),
            mp: Some(15.0),
            crit_rate: Some(15.0),
            attack_speed: Some(10.0),
            damage: Some(35.0),
            min_max: Some(25.0),
            skill_cd: Some(2.0),
        },
    }
}

/// Lines that can roll at `tier` for this character, with raw probabilities.
pub fn potential_pool(tier: PotentialTier) -> Vec<PoolEntry> {
    let v = tier_values(tier);
    let mut pool = vec![entry(StatKind::MainStatPct, v.main_pct, MAIN_PCT_WEIGHT)];
    if let Some(flat) = v.main_flat {
        pool.push(entry(StatKind::MainStatFlat, flat, MAIN_FLAT_WEIGHT));
    }
    pool.push(entry(StatKind::Defense, v.defense, 0.09));
    if let Some(hp) = v.hp {
        pool.push(entry(StatKind::MaxHp, hp, 0.09));
    }
    if let Some(mp) = v.mp {
        pool.push(entry(StatKind::MaxMp, mp, 0.09));
    }
    if let Some(cr) = v.crit_rate {
        pool.push(entry(StatKind::CritRate, cr, 0.025));
    }
    if let Some(atk_spd) = v.attack_speed {
        pool.push(entry(StatKind::AttackSpeed, atk_spd, 0.025));
    }
    if let Some(dmg) = v.damage {
        pool.push(entry(StatKind::DamagePct, dmg, 0.04));
    }
    if let Some(range) = v.min_max {
        pool.push(entry(StatKind::MinDamageMult, range, 0.04));
        pool.push(entry(StatKind::MaxDamageMult, range, 0.04));
    }
    if let Some(cd) = v.skill_cd {
        pool.push(entry(StatKind::SkillCooldown, cd, 0.01));
    }
    pool
}

/// Weight of the other classes' main stat lines at `tier`.
pub fn off_class_weight(tier: PotentialTier) -> f64 {
    let flat = if tier_values(tier).main_flat.is_some() {
        MAIN_FLAT_WEIGHT
    } else {
        0.0
    };
    OFF_CLASSES * (MAIN_PCT_WEIGHT + flat)
}

/// Normalizer for weighted selection from `potential_pool(tier)`.
pub fn pool_total_weight(tier: PotentialTier) -> f64 {
    potential_pool(tier).iter().map(|e| e.probability).sum::<f64>() + off_class_weight(tier)
}

/// The slot's special line at `tier`, if that slot has one at that tier.
pub fn special_potential(slot: EquipmentSlot, tier: PotentialTier) -> Option<PotentialLine> {
    use PotentialTier::*;
    let (kind, values): (StatKind, [Option<f64>; 4]) = match slot {
        EquipmentSlot::Hat => {
            (StatKind::SkillCooldown, [Some(0.5), Some(1.0), Some(1.5), Some(2.0)])
        }
        EquipmentSlot::Gloves => (StatKind::CritDamage, [None, Some(20.0), Some(30.0), Some(50.0)]),
        EquipmentSlot::Shoulder => (StatKind::DefPen, [None, Some(8.0), Some(12.0), Some(20.0)]),
        EquipmentSlot::Ring | EquipmentSlot::Necklace => {
            (StatKind::AllSkills, [Some(5.0), Some(8.0), Some(12.0), Some(16.0)])
        }
        EquipmentSlot::Cape | EquipmentSlot::Bottom => {
            (StatKind::FinalDamage, [Some(3.0), Some(5.0), Some(8.0), Some(12.0)])
        }
        EquipmentSlot::Belt => {
            (StatKind::BuffDuration, [Some(5.0), Some(8.0), Some(12.0), Some(20.0)])
        }
        EquipmentSlot::Face => {
            (StatKind::MainStatPerLevel, [Some(3.0), Some(5.0), Some(8.0), Some(12.0)])
        }
        EquipmentSlot::Top => (StatKind::BaTargets, [None, Some(1.0), Some(2.0), Some(3.0)]),
        EquipmentSlot::Shoes => return None,
    };
    let value = match tier {
        Epic => values[0],
        Unique => values[1],
        Legendary => values[2],
        Mystic => values[3],
        Normal | Rare => None,
    }?;
    Some(PotentialLine { kind, value })
}

impl PotentialKind {
    pub fn cube_price(self, rates: &CurrencyRates) -> f64 {
        match self {
            PotentialKind::Regular => rates.regular_cube_diamonds,
            PotentialKind::Bonus => rates.bonus_cube_diamonds,
        }
    }

    /// Tier progression for this cube type. Bonus potentials share the
    /// regular rates and only differ in pity.
    pub fn track(self) -> TierTrack {
        TierTrack {
            name: format!("{} cube", self.name()),
            steps: PotentialTier::ALL
                .into_iter()
                .map(|tier| TierStep {
                    tier,
                    tier_up_rate: tier_up_rate(tier),
                    pity_threshold: pity_threshold(self, tier),
                })
                .collect(),
        }
    }
}

/// Expected diamonds to cube a potential from `from` up to `to`.
pub fn expected_cost_for_tier_range(
    kind: PotentialKind,
    from: PotentialTier,
    to: PotentialTier,
    rates: &CurrencyRates,
) -> f64 {
    kind.track().expected_rolls_for_tier_range(from, to) * kind.cube_price(rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_weights_match_game_totals() {
        // Rare: 4 x 4.5% main, 9% def, 2.5% + 2.5% + 4% + 4% + 4%
        assert!((pool_total_weight(PotentialTier::Rare) - 0.44).abs() < 1e-9);
        // Normal: 4 x 4.5% main, 9% def
        assert!((pool_total_weight(PotentialTier::Normal) - 0.27).abs() < 1e-9);
    }

    #[test]
    fn test_special_lines() {
        let gloves = special_potential(EquipmentSlot::Gloves, PotentialTier::Legendary).unwrap();
        assert_eq!(gloves.kind, StatKind::CritDamage);
        assert_eq!(gloves.value, 30.0);
        assert!(special_potential(EquipmentSlot::Gloves, PotentialTier::Epic).is_none());
        assert!(special_potential(EquipmentSlot::Shoes, PotentialTier::Mystic).is_none());
        assert_eq!(
            special_potential(EquipmentSlot::Hat, PotentialTier::Epic).map(|l| l.value),
            Some(0.5)
        );
    }

    #[test]
    fn test_track_shape() {
        let track = PotentialKind::Bonus.track();
        assert_eq!(track.steps.len(), 6);
        assert_eq!(track.top_tier(), Some(PotentialTier::Mystic));
        assert_eq!(track.step(PotentialTier::Rare).unwrap().pity_threshold, 85);
        assert_eq!(track.step(PotentialTier::Mystic).unwrap().tier_up_rate, 0.0);
    }

    #[test]
    fn test_rare_to_epic_cost() {
        let rates = CurrencyRates::default();
        let cost = expected_cost_for_tier_range(
            PotentialKind::Regular,
            PotentialTier::Rare,
            PotentialTier::Epic,
            &rates,
        );
        assert!((cost / 600.0 - 26.0).abs() < 0.1);
        assert_eq!(
            expected_cost_for_tier_range(
                PotentialKind::Regular,
                PotentialTier::Epic,
                PotentialTier::Epic,
                &rates
            ),
            0.0
        );
    }
}
