//! Ranks every upgrade axis by expected DPS gain per 1000 diamonds.
//!
//! Each axis is measured the same way: strip the axis from the snapshot to
//! get a baseline, put each possible outcome back in its place, and compare
//! against the current DPS. Only outcomes that beat the current state count
//! toward the gain, and the cost is the expected spend until one of those
//! outcomes lands.

use super::cache::DpsCache;
use super::candidate::{efficiency, ActionId, UpgradeCandidate};
use super::cube_metrics::{cube_metrics, RollProfile, ScoredRoll};
use crate::artifacts::{awakening_cost_diamonds, OwnedArtifact};
use crate::combat::{CombatMode, CombatScenario};
use crate::config::AppConfig;
use crate::cubes::{
    lines_distribution, pity_threshold, roll_distribution, tier_up_rate, RolledLines,
};
use crate::dps::DpsModel;
use crate::hero_power::{line_distribution, HeroPowerState};
use crate::items::{EquippedItem, PotentialKind};
use crate::player::PlayerSnapshot;
use crate::starforce::{analyze_all_strategies, stage_range, MAX_STARS};
use crate::stats::{StatSnapshot, StatSource};
use crate::tiers::{expected_rolls_with_pity, PityState, PotentialTier, PITY_NONE};
use std::cmp::Ordering;
use std::ops::Range;

/// Relative DPS change below which an outcome counts as no change
pub(super) const IMPROVEMENT_EPS: f64 = 1e-9;

/// A replacement for one axis's sources and its probability.
#[derive(Debug, Clone)]
pub(super) struct Outcome {
    pub sources: Vec<StatSource>,
    pub probability: f64,
}

#[derive(Debug, Clone)]
pub(super) struct AxisEvaluation {
    pub baseline: f64,
    pub current: f64,
    /// DPS% the axis adds now over its zeroed state
    pub current_gain_pct: f64,
    pub p_better: f64,
    /// Mean gain over better outcomes
    pub expected_gain_pct: f64,
    /// Change against the current DPS for each outcome, in outcome order
    pub deltas: Vec<f64>,
    pub unreliable: bool,
}

impl AxisEvaluation {
    /// Largest gain among the outcomes in `range`, never below zero.
    pub fn best_gain_pct(&self, range: Range<usize>) -> f64 {
        self.deltas[range].iter().copied().fold(0.0_f64, f64::max)
    }
}

/// Score `outcomes` as replacements for everything under `origin`.
///
/// The baseline is the snapshot with the axis reset to `zeroed`: nothing for
/// potentials, hero power and artifacts, the unstarred base stats for
/// starforce. Outcomes are applied in place of the axis and compared with
/// the current DPS; percentages are relative to the baseline.
pub(super) fn evaluate_axis<M: DpsModel>(
    cache: &mut DpsCache<'_, M>,
    snapshot: &StatSnapshot,
    origin: &str,
    zeroed: &[StatSource],
    outcomes: &[Outcome],
) -> AxisEvaluation {
    let rest = snapshot.without_origin(origin);
    let baseline = cache.total(&snapshot.with_replaced(origin, zeroed));
    let current = cache.total(snapshot);
    let unreliable = baseline <= 0.0;
    if unreliable {
        tracing::warn!(origin, baseline, "baseline DPS is not positive, gains are unreliable");
    }
    let denom = baseline.max(1.0);

    let deltas: Vec<f64> = outcomes
        .iter()
        .map(|outcome| {
            let mut candidate = rest.clone();
            candidate.sources.extend_from_slice(&outcome.sources);
            (cache.total(&candidate) - current) / denom * 100.0
        })
        .collect();

    let mut p_better = 0.0;
    let mut weighted = 0.0;
    for (outcome, &delta) in outcomes.iter().zip(&deltas) {
        if delta > IMPROVEMENT_EPS {
            p_better += outcome.probability;
            weighted += outcome.probability * delta;
        }
    }

    AxisEvaluation {
        baseline,
        current,
        current_gain_pct: (current - baseline) / denom * 100.0,
        p_better,
        expected_gain_pct: if p_better > 0.0 { weighted / p_better } else { 0.0 },
        deltas,
        unreliable,
    }
}

fn candidate(
    action: ActionId,
    eval: &AxisEvaluation,
    best_gain_pct: f64,
    cost: f64,
    p_improve: f64,
) -> UpgradeCandidate {
    UpgradeCandidate {
        efficiency: efficiency(eval.expected_gain_pct, cost),
        action,
        expected_cost_diamonds: cost,
        expected_dps_gain_pct: eval.expected_gain_pct,
        best_case_gain_pct: best_gain_pct,
        p_improve,
        baseline_dps: eval.baseline,
        current_dps: eval.current,
        unreliable: eval.unreliable,
        cube_metrics: None,
    }
}

fn roll_outcomes(
    item: &EquippedItem,
    kind: PotentialKind,
    rolls: Vec<RolledLines>,
    weight: f64,
) -> impl Iterator<Item = Outcome> + '_ {
    rolls.into_iter().map(move |roll| Outcome {
        sources: item.potential_sources(kind, &roll.lines),
        probability: roll.probability * weight,
    })
}

/// Chance that the next cube lands on the tier above. A pity counter one
/// short of the threshold makes the tier-up certain.
fn tier_up_weight(tier: PotentialTier, residual: u32) -> f64 {
    match tier.next() {
        None => 0.0,
        Some(_) if residual <= 1 => 1.0,
        Some(_) => tier_up_rate(tier),
    }
}

fn cube_candidate<M: DpsModel>(
    cache: &mut DpsCache<'_, M>,
    snapshot: &StatSnapshot,
    item: &EquippedItem,
    kind: PotentialKind,
    config: &AppConfig,
) -> UpgradeCandidate {
    let potential = item.potential(kind);
    let tier = potential.tier;
    let action = ActionId::Cube {
        slot: item.slot,
        potential: kind,
    };
    let residual = PityState::new(potential.pity).residual(pity_threshold(kind, tier));

    // A cube rolls lines at the current tier unless it tiers up first.
    let q = tier_up_weight(tier, residual);
    let current_rolls = roll_distribution(item.slot, tier, &config.optimizer);
    let mut outcomes: Vec<Outcome> = roll_outcomes(item, kind, current_rolls, 1.0 - q).collect();
    let at_tier = 0..outcomes.len();
    if let Some(next) = tier.next() {
        let next_rolls = roll_distribution(item.slot, next, &config.optimizer);
        outcomes.extend(roll_outcomes(item, kind, next_rolls, q));
    }
    let at_next = at_tier.end..outcomes.len();

    let eval = evaluate_axis(cache, snapshot, &action.origin(), &[], &outcomes);
    let best_at_tier = eval.best_gain_pct(at_tier);
    let best = if at_next.is_empty() {
        best_at_tier
    } else {
        eval.best_gain_pct(at_next.clone())
    };

    let rolls = expected_rolls_with_pity(eval.p_better, residual);
    let cost = rolls * kind.cube_price(&config.currency);

    // Metrics are scored against the potential's baseline, not the current lines
    let scored: Vec<ScoredRoll> = outcomes
        .iter()
        .zip(&eval.deltas)
        .map(|(o, delta)| ScoredRoll {
            gain_pct: delta + eval.current_gain_pct,
            probability: o.probability,
        })
        .collect();
    let profile = RollProfile {
        rolls: &scored,
        current_gain_pct: eval.current_gain_pct,
        best_at_tier_pct: eval.current_gain_pct + best_at_tier,
        best_at_next_pct: (!at_next.is_empty())
            .then(|| eval.current_gain_pct + eval.best_gain_pct(at_next)),
    };

    let mut c = candidate(action, &eval, best, cost, eval.p_better);
    c.cube_metrics = Some(cube_metrics(&profile, kind, tier, potential.pity));
    c
}

fn starforce_candidate<M: DpsModel>(
    cache: &mut DpsCache<'_, M>,
    snapshot: &StatSnapshot,
    item: &EquippedItem,
    config: &AppConfig,
) -> Option<UpgradeCandidate> {
    if item.stars >= MAX_STARS {
        return None;
    }
    let stages = match stage_range(item.stars, item.stars + 1) {
        Ok(stages) => stages,
        Err(e) => {
            tracing::debug!(slot = item.slot.name(), error = %e, "skipping starforce axis");
            return None;
        }
    };
    let action = ActionId::Starforce {
        slot: item.slot,
        from: item.stars,
    };
    let outcome = [Outcome {
        sources: item.starforce_sources(item.stars + 1),
        probability: 1.0,
    }];
    let unstarred = item.starforce_sources(0);
    let eval = evaluate_axis(cache, snapshot, &action.origin(), &unstarred, &outcome);

    let analysis = analyze_all_strategies(stages, &config.currency, &config.solver);
    let best = analysis.best_projection();
    let p_improve = if eval.p_better > 0.0 {
        stages[0].protected(analysis.best).success
    } else {
        0.0
    };
    Some(candidate(
        action,
        &eval,
        eval.best_gain_pct(0..1),
        best.expected_total_cost,
        p_improve,
    ))
}

/// Every way one hero power line at `origin` can roll.
pub(super) fn hero_line_outcomes(rolls: &[RolledLines], origin: &str) -> Vec<Outcome> {
    rolls
        .iter()
        .map(|roll| Outcome {
            sources: roll
                .lines
                .iter()
                .map(|l| StatSource::new(origin, l.kind, l.value))
                .collect(),
            probability: roll.probability,
        })
        .collect()
}

/// Single-line reroll distribution at the player's hero power level.
pub(super) fn hero_line_rolls(state: &HeroPowerState, config: &AppConfig) -> Vec<RolledLines> {
    let dist = line_distribution(&state.level, config.optimizer.value_grid_points);
    lines_distribution(&[dist], &config.optimizer)
}

fn hero_power_candidates<M: DpsModel>(
    cache: &mut DpsCache<'_, M>,
    snapshot: &StatSnapshot,
    state: &HeroPowerState,
    config: &AppConfig,
) -> Vec<UpgradeCandidate> {
    let rolls = hero_line_rolls(state, config);
    let per_reroll = state.reroll_cost_diamonds(&config.currency);

    state
        .lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.locked)
        .map(|(i, _)| {
            let origin = HeroPowerState::line_origin(i);
            let outcomes = hero_line_outcomes(&rolls, &origin);
            let action = ActionId::HeroPower { line: i + 1 };
            let eval = evaluate_axis(cache, snapshot, &origin, &[], &outcomes);
            let cost = expected_rolls_with_pity(eval.p_better, PITY_NONE) * per_reroll;
            let best = eval.best_gain_pct(0..outcomes.len());
            candidate(action, &eval, best, cost, eval.p_better)
        })
        .collect()
}

fn awaken_candidate<M: DpsModel>(
    cache: &mut DpsCache<'_, M>,
    snapshot: &StatSnapshot,
    artifact: &OwnedArtifact,
    mode: CombatMode,
    config: &AppConfig,
) -> Option<UpgradeCandidate> {
    let cost = awakening_cost_diamonds(artifact, &config.currency, &config.artifacts)?;
    let action = ActionId::Awaken {
        artifact: artifact.name.clone(),
        from: artifact.stars,
    };
    let outcome = [Outcome {
        sources: artifact.sources_at(artifact.stars + 1, mode),
        probability: 1.0,
    }];
    let eval = evaluate_axis(cache, snapshot, &artifact.origin(), &[], &outcome);
    Some(candidate(action, &eval, eval.best_gain_pct(0..1), cost, eval.p_better))
}

/// Efficiency descending, then absolute expected gain descending, then name.
pub fn compare_candidates(a: &UpgradeCandidate, b: &UpgradeCandidate) -> Ordering {
    b.efficiency
        .total_cmp(&a.efficiency)
        .then_with(|| b.expected_dps_gain_pct.total_cmp(&a.expected_dps_gain_pct))
        .then_with(|| a.action.sort_name().cmp(&b.action.sort_name()))
        .then_with(|| a.action.cmp(&b.action))
}

pub fn sort_candidates(candidates: &mut [UpgradeCandidate]) {
    candidates.sort_by(compare_candidates);
}

/// Rank every upgrade axis of `player` with the configured DPS model.
pub fn rank_candidates(
    player: &PlayerSnapshot,
    mode: CombatMode,
    config: &AppConfig,
) -> Vec<UpgradeCandidate> {
    rank_with_model(player, &mode.scenario(), &config.dps, config)
}

pub fn rank_with_model<M: DpsModel>(
    player: &PlayerSnapshot,
    scenario: &CombatScenario,
    model: &M,
    config: &AppConfig,
) -> Vec<UpgradeCandidate> {
    let snapshot = player.stat_snapshot(scenario.mode);
    let mut cache = DpsCache::new(model, *scenario);
    let mut candidates = Vec::new();

    for item in &player.equipment {
        for kind in [PotentialKind::Regular, PotentialKind::Bonus] {
            candidates.push(cube_candidate(&mut cache, &snapshot, item, kind, config));
        }
        candidates.extend(starforce_candidate(&mut cache, &snapshot, item, config));
    }
    candidates.extend(hero_power_candidates(
        &mut cache,
        &snapshot,
        &player.hero_power,
        config,
    ));
    for artifact in &player.artifacts {
        candidates.extend(awaken_candidate(
            &mut cache,
            &snapshot,
            artifact,
            scenario.mode,
            config,
        ));
    }

    sort_candidates(&mut candidates);
    tracing::debug!(
        candidates = candidates.len(),
        evaluations = cache.len(),
        cache_hits = cache.hits(),
        mode = scenario.mode.name(),
        "ranked upgrades"
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dps::StandardDpsModel;
    use crate::items::EquipmentSlot;
    use crate::stats::StatKind;

    fn cand(slot: EquipmentSlot, eff: f64, gain: f64) -> UpgradeCandidate {
        UpgradeCandidate {
            action: ActionId::Starforce { slot, from: 10 },
            expected_cost_diamonds: 1000.0,
            expected_dps_gain_pct: gain,
            efficiency: eff,
            best_case_gain_pct: gain,
            p_improve: 1.0,
            baseline_dps: 1.0,
            current_dps: 1.0,
            unreliable: false,
            cube_metrics: None,
        }
    }

    #[test]
    fn test_tie_breaks() {
        let mut list = vec![
            cand(EquipmentSlot::Ring, 0.0, 0.0),
            cand(EquipmentSlot::Belt, 0.0, 0.0),
            cand(EquipmentSlot::Hat, 0.0, 1.0),
            cand(EquipmentSlot::Cape, 2.0, 0.5),
        ];
        sort_candidates(&mut list);
        let order: Vec<_> = list.iter().map(|c| c.action.sort_name()).collect();
        assert_eq!(order, vec!["cape", "hat", "belt", "ring"]);
    }

    #[test]
    fn test_empty_player_is_flagged_not_fatal() {
        let mut player = PlayerSnapshot::new("empty");
        player.equipment.push(EquippedItem::new(EquipmentSlot::Hat));
        let ranked = rank_candidates(&player, CombatMode::Stage, &AppConfig::default());
        assert!(!ranked.is_empty());
        assert!(ranked.iter().all(|c| c.unreliable));
        assert!(ranked.iter().all(|c| c.efficiency.is_finite()));
    }

    fn attack_player(name: &str, attack: f64) -> PlayerSnapshot {
        let mut player = PlayerSnapshot::new(name);
        player.base_stats.push(crate::items::BaseStat {
            kind: StatKind::AttackFlat,
            value: attack,
        });
        player
    }

    #[test]
    fn test_starforce_gain_matches_amplification() {
        let mut player = attack_player("sf", 1000.0);
        let mut item = EquippedItem::new(EquipmentSlot::Gloves);
        item.stars = 4;
        item.main_stats.push(crate::items::BaseStat {
            kind: StatKind::AttackFlat,
            value: 100.0,
        });
        player.equipment.push(item.clone());

        let ranked = rank_candidates(&player, CombatMode::Boss, &AppConfig::default());
        let sf = ranked
            .iter()
            .find(|c| matches!(c.action, ActionId::Starforce { .. }))
            .unwrap();
        // 4 stars: x1.4 main, 5 stars: x1.6, and DPS is linear in attack.
        // Unstarred attack 1100, current 1140, next 1160: +20 / 1100
        let expected = 20.0 / 1100.0 * 100.0;
        assert!((sf.expected_dps_gain_pct - expected).abs() < 1e-6, "{}", sf.expected_dps_gain_pct);
        assert_eq!(sf.p_improve, 0.8);

        // The baseline keeps the gloves, only without their stars
        item.stars = 0;
        let mut unstarred = attack_player("sf", 1000.0);
        unstarred.equipment.push(item);
        let at_zero = StandardDpsModel::new().total(
            &unstarred.stat_snapshot(CombatMode::Boss),
            &CombatMode::Boss.scenario(),
        );
        assert!((sf.baseline_dps - at_zero).abs() < 1e-9 * at_zero);
        assert!(sf.baseline_dps < sf.current_dps);
        assert!(!sf.unreliable);
    }

    #[test]
    fn test_pity_one_short_rolls_only_next_tier() {
        let config = AppConfig::default();
        let mut player = attack_player("pity", 1000.0);
        let mut item = EquippedItem::new(EquipmentSlot::Hat);
        item.regular.tier = PotentialTier::Rare;
        item.regular.pity = pity_threshold(PotentialKind::Regular, PotentialTier::Rare) - 1;
        player.equipment.push(item.clone());

        let is_regular_cube = |c: &&UpgradeCandidate| {
            c.action
                == ActionId::Cube {
                    slot: EquipmentSlot::Hat,
                    potential: PotentialKind::Regular,
                }
        };
        let ranked = rank_candidates(&player, CombatMode::Stage, &config);
        let cube = ranked.iter().find(is_regular_cube).unwrap();

        // The same axis scored against Epic rolls alone
        let model = StandardDpsModel::new();
        let mut cache = DpsCache::new(&model, CombatMode::Stage.scenario());
        let snapshot = player.stat_snapshot(CombatMode::Stage);
        let epic = roll_distribution(EquipmentSlot::Hat, PotentialTier::Epic, &config.optimizer);
        let outcomes: Vec<Outcome> =
            roll_outcomes(&item, PotentialKind::Regular, epic, 1.0).collect();
        let origin = item.potential_origin(PotentialKind::Regular);
        let epic_only = evaluate_axis(&mut cache, &snapshot, &origin, &[], &outcomes);

        assert!(epic_only.p_better > 0.0);
        assert!((cube.p_improve - epic_only.p_better).abs() < 1e-9);
        assert!((cube.expected_dps_gain_pct - epic_only.expected_gain_pct).abs() < 1e-9);
        assert!((cube.expected_cost_diamonds - config.currency.regular_cube_diamonds).abs() < 1e-9);

        // Without pity the next cube mixes both tiers at the natural rate
        player.equipment[0].regular.pity = 0;
        let ranked = rank_candidates(&player, CombatMode::Stage, &config);
        let fresh = ranked.iter().find(is_regular_cube).unwrap();
        let rare = roll_distribution(EquipmentSlot::Hat, PotentialTier::Rare, &config.optimizer);
        let outcomes: Vec<Outcome> =
            roll_outcomes(&item, PotentialKind::Regular, rare, 1.0).collect();
        let rare_only = evaluate_axis(&mut cache, &snapshot, &origin, &[], &outcomes);
        let q = tier_up_rate(PotentialTier::Rare);
        let mixed = (1.0 - q) * rare_only.p_better + q * epic_only.p_better;
        assert!((fresh.p_improve - mixed).abs() < 1e-9);
    }

    #[test]
    fn test_tier_up_weight() {
        assert_eq!(tier_up_weight(PotentialTier::Epic, 1), 1.0);
        assert_eq!(tier_up_weight(PotentialTier::Epic, 2), tier_up_rate(PotentialTier::Epic));
        assert_eq!(tier_up_weight(PotentialTier::Mystic, 1), 0.0);
    }
}
