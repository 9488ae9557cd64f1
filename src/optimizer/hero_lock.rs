//! Which hero power lines to lock before rerolling the rest.
//!
//! Every lock raises the price of each later reroll. Lines are visited best
//! first, and a line is rerolled only while its expected gain per 1000
//! medals, at the price it would be rerolled at, beats a threshold that
//! shrinks as that price grows. Everything else gets locked.

use super::cache::DpsCache;
use super::ranker::{evaluate_axis, hero_line_outcomes, hero_line_rolls};
use crate::combat::{CombatMode, CombatScenario};
use crate::config::AppConfig;
use crate::dps::DpsModel;
use crate::hero_power::HeroPowerState;
use crate::player::PlayerSnapshot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDecision {
    Lock,
    Reroll,
}

impl LineDecision {
    pub fn name(self) -> &'static str {
        match self {
            LineDecision::Lock => "lock",
            LineDecision::Reroll => "reroll",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineAdvice {
    /// 1-based
    pub line: usize,
    pub decision: LineDecision,
    /// DPS% the line adds now
    pub value_pct: f64,
    pub p_better: f64,
    /// `p_better` times the mean gain when a reroll is better
    pub gain_per_reroll_pct: f64,
    /// Price with the lines ahead of this one locked
    pub medals_per_reroll: u32,
    /// DPS% per 1000 medals
    pub efficiency: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockPlan {
    /// Best line first
    pub lines: Vec<LineAdvice>,
    pub medals_per_reroll: u32,
    pub diamonds_per_reroll: f64,
    /// Rerolls to improve each rerolled line once
    pub expected_rerolls: f64,
    pub expected_cost_diamonds: f64,
    /// Summed over the rerolled lines
    pub gain_per_reroll_pct: f64,
}

impl LockPlan {
    /// 1-based line numbers with `decision`, best line first.
    pub fn lines_to(&self, decision: LineDecision) -> Vec<usize> {
        self.lines
            .iter()
            .filter(|l| l.decision == decision)
            .map(|l| l.line)
            .collect()
    }
}

/// DPS% per 1000 medals.
pub fn per_thousand_medals(gain_pct: f64, medals: u32) -> f64 {
    if medals == 0 {
        return if gain_pct > 0.0 { f64::INFINITY } else { 0.0 };
    }
    gain_pct / medals as f64 * 1000.0
}

/// Reroll threshold at `medals` per reroll; `base_threshold` applies at the
/// unlocked price.
pub fn lock_threshold(base_threshold: f64, base_medals: u32, medals: u32) -> f64 {
    if medals == 0 {
        return base_threshold;
    }
    base_threshold * base_medals as f64 / medals as f64
}

/// Plan hero power locks with the configured DPS model.
pub fn plan_hero_locks(player: &PlayerSnapshot, mode: CombatMode, config: &AppConfig) -> LockPlan {
    plan_hero_locks_with_model(player, &mode.scenario(), &config.dps, config)
}

pub fn plan_hero_locks_with_model<M: DpsModel>(
    player: &PlayerSnapshot,
    scenario: &CombatScenario,
    model: &M,
    config: &AppConfig,
) -> LockPlan {
    let state = &player.hero_power;
    let level = &state.level;
    let snapshot = player.stat_snapshot(scenario.mode);
    let mut cache = DpsCache::new(model, *scenario);
    let rolls = hero_line_rolls(state, config);

    // (index, value, p_better, gain per reroll)
    let mut scored: Vec<(usize, f64, f64, f64)> = (0..state.lines.len())
        .map(|i| {
            let origin = HeroPowerState::line_origin(i);
            let outcomes = hero_line_outcomes(&rolls, &origin);
            let eval = evaluate_axis(&mut cache, &snapshot, &origin, &[], &outcomes);
            (
                i,
                eval.current_gain_pct,
                eval.p_better,
                eval.p_better * eval.expected_gain_pct,
            )
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut locked = 0;
    let mut lines = Vec::with_capacity(scored.len());
    for (i, value_pct, p_better, gain) in scored {
        let medals = level.reroll_cost_medals(locked);
        let efficiency = per_thousand_medals(gain, medals);
        let threshold =
            lock_threshold(config.optimizer.hero_lock_threshold, level.base_cost, medals);
        let decision = if efficiency > threshold {
            LineDecision::Reroll
        } else {
            locked += 1;
            LineDecision::Lock
        };
        lines.push(LineAdvice {
            line: i + 1,
            decision,
            value_pct,
            p_better,
            gain_per_reroll_pct: gain,
            medals_per_reroll: medals,
            efficiency,
            threshold,
        });
    }

    let medals_per_reroll = level.reroll_cost_medals(locked);
    let diamonds_per_reroll = medals_per_reroll as f64 * config.currency.medal_to_diamond;
    let rerolled: Vec<&LineAdvice> = lines
        .iter()
        .filter(|l| l.decision == LineDecision::Reroll)
        .collect();
    let p_any = 1.0 - rerolled.iter().map(|l| 1.0 - l.p_better).product::<f64>();
    let expected_rerolls = if rerolled.is_empty() {
        0.0
    } else if p_any > 0.0 {
        rerolled.len() as f64 / p_any
    } else {
        f64::INFINITY
    };
    let gain_per_reroll_pct = rerolled.iter().map(|l| l.gain_per_reroll_pct).sum();

    tracing::debug!(
        locked,
        rerolled = rerolled.len(),
        expected_rerolls,
        "planned hero power locks"
    );

    LockPlan {
        medals_per_reroll,
        diamonds_per_reroll,
        expected_rerolls,
        expected_cost_diamonds: expected_rerolls * diamonds_per_reroll,
        gain_per_reroll_pct,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero_power::{HeroLine, HeroTier};
    use crate::items::BaseStat;
    use crate::stats::StatKind;

    fn line(kind: StatKind, value: f64, tier: HeroTier) -> HeroLine {
        HeroLine {
            kind,
            value,
            tier,
            locked: false,
        }
    }

    #[test]
    fn test_threshold_shrinks_as_locks_add_up() {
        assert_eq!(lock_threshold(0.05, 89, 89), 0.05);
        assert!((lock_threshold(0.05, 89, 175) - 0.05 * 89.0 / 175.0).abs() < 1e-12);
        assert_eq!(per_thousand_medals(0.5, 100), 5.0);
        assert!(per_thousand_medals(0.5, 0).is_infinite());
        assert_eq!(per_thousand_medals(0.0, 0), 0.0);
    }

    #[test]
    fn test_unbeatable_line_is_locked_first() {
        let mut player = PlayerSnapshot::new("locks");
        player.base_stats.push(BaseStat {
            kind: StatKind::AttackFlat,
            value: 1000.0,
        });
        player.hero_power.lines = vec![
            line(StatKind::MaxHp, 0.0, HeroTier::Common),
            line(StatKind::DamagePct, 10_000.0, HeroTier::Mystic),
        ];
        let config = AppConfig::default();
        let plan = plan_hero_locks(&player, CombatMode::Boss, &config);

        let best = &plan.lines[0];
        assert_eq!(best.line, 2);
        assert_eq!(best.decision, LineDecision::Lock);
        assert_eq!(best.p_better, 0.0);
        assert_eq!(best.medals_per_reroll, 89);

        let weak = &plan.lines[1];
        assert_eq!(weak.line, 1);
        assert_eq!(weak.decision, LineDecision::Reroll);
        assert_eq!(weak.medals_per_reroll, 89 + crate::hero_power::MEDALS_PER_LOCK);
        assert!(weak.efficiency > weak.threshold);
        assert!(weak.threshold < best.threshold);

        assert_eq!(plan.lines_to(LineDecision::Lock), vec![2]);
        assert_eq!(plan.lines_to(LineDecision::Reroll), vec![1]);
        assert_eq!(plan.medals_per_reroll, weak.medals_per_reroll);
        assert!((plan.expected_rerolls - 1.0 / weak.p_better).abs() < 1e-9);
        let per_reroll = plan.medals_per_reroll as f64 * config.currency.medal_to_diamond;
        assert!((plan.expected_cost_diamonds - plan.expected_rerolls * per_reroll).abs() < 1e-6);
    }

    #[test]
    fn test_no_lines_no_plan() {
        let player = PlayerSnapshot::new("none");
        let plan = plan_hero_locks(&player, CombatMode::Stage, &AppConfig::default());
        assert!(plan.lines.is_empty());
        assert_eq!(plan.expected_rerolls, 0.0);
        assert_eq!(plan.expected_cost_diamonds, 0.0);
    }
}
