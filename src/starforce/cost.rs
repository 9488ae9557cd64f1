//! Expected total cost of a starforce climb, including destructions.
//!
//! One "run" ends either at the target or in destruction. A destroyed item
//! pays the fee, drops back to the reset star and has to climb back to the
//! start before the next run, so the total is the per-run cost amortized over
//! `1 / P(success)` runs.

use super::markov::{solve, MarkovSolution};
use super::types::{
    EnhancementStage, ProtectionStrategy, StrategyPlan, DESTRUCTION_RESET_STAR, MAX_STARS,
    STARFORCE_TABLE,
};
use crate::config::{CurrencyRates, SolverParams};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct CostProjection {
    pub start: u8,
    pub target: u8,
    pub expected_total_cost: f64,
    /// Attempt costs of a single run from the start
    pub expected_enhance_cost: f64,
    pub expected_attempts: f64,
    pub p_success: f64,
    pub p_destroy: f64,
    /// Expected number of destructions before the target is reached
    pub expected_destructions: f64,
    /// Portion of the total paid for destruction fees and rebuilds
    pub destruction_fee_expected: f64,
    /// Cost of climbing from the reset star back to the start
    pub rebuild_cost: f64,
}

impl CostProjection {
    pub fn is_reachable(&self) -> bool {
        self.expected_total_cost.is_finite()
    }
}

/// Project the cost of one plan over `stages`.
pub fn project_cost(
    stages: &[EnhancementStage],
    plan: &StrategyPlan,
    rates: &CurrencyRates,
    params: &SolverParams,
) -> CostProjection {
    let solution = solve(stages, plan, rates, params);
    let rebuild_cost = if params.include_rebuild {
        rebuild_cost(solution.start, rates, params)
    } else {
        0.0
    };
    projection_from(&solution, rebuild_cost, rates)
}

fn projection_from(
    solution: &MarkovSolution,
    rebuild_cost: f64,
    rates: &CurrencyRates,
) -> CostProjection {
    let start = solution.start_value();
    let p_success = start.success_probability;
    let p_destroy = (1.0 - p_success).max(0.0);
    let penalty = rates.destruction_fee_diamonds() + rebuild_cost;

    let (expected_total_cost, expected_destructions, destruction_fee_expected) = if p_success > 0.0
    {
        (
            (start.expected_cost + p_destroy * penalty) / p_success,
            p_destroy / p_success,
            p_destroy * penalty / p_success,
        )
    } else {
        (f64::INFINITY, f64::INFINITY, f64::INFINITY)
    };

    CostProjection {
        start: solution.start,
        target: solution.target,
        expected_total_cost,
        expected_enhance_cost: start.expected_cost,
        expected_attempts: start.expected_attempts,
        p_success,
        p_destroy,
        expected_destructions,
        destruction_fee_expected,
        rebuild_cost,
    }
}

/// Expected cost to climb from the reset star back to `start` with the best
/// uniform strategy. Zero at or below the reset star.
pub fn rebuild_cost(start: u8, rates: &CurrencyRates, params: &SolverParams) -> f64 {
    if start <= DESTRUCTION_RESET_STAR || start > MAX_STARS {
        return 0.0;
    }
    let stages = &STARFORCE_TABLE[DESTRUCTION_RESET_STAR as usize..start as usize];
    analyze_all_strategies(stages, rates, params).best_projection().expected_total_cost
}

/// All four uniform strategies for one range.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAnalysis {
    pub projections: BTreeMap<ProtectionStrategy, CostProjection>,
    pub best: ProtectionStrategy,
    /// How much cheaper the best strategy is than buying no protection
    pub savings_pct: f64,
}

impl StrategyAnalysis {
    pub fn best_projection(&self) -> &CostProjection {
        &self.projections[&self.best]
    }

    pub fn projection(&self, strategy: ProtectionStrategy) -> &CostProjection {
        &self.projections[&strategy]
    }
}

pub fn analyze_all_strategies(
    stages: &[EnhancementStage],
    rates: &CurrencyRates,
    params: &SolverParams,
) -> StrategyAnalysis {
    let rebuild = match stages.first() {
        Some(first) if params.include_rebuild => rebuild_cost(first.stage, rates, params),
        _ => 0.0,
    };

    let mut projections = BTreeMap::new();
    let mut best = ProtectionStrategy::None;
    let mut best_cost = f64::INFINITY;
    for strategy in ProtectionStrategy::ALL {
        let solution = solve(stages, &strategy.into(), rates, params);
        let projection = projection_from(&solution, rebuild, rates);
        if projection.expected_total_cost < best_cost {
            best_cost = projection.expected_total_cost;
            best = strategy;
        }
        projections.insert(strategy, projection);
    }

    let none_cost = projections[&ProtectionStrategy::None].expected_total_cost;
    let savings_pct = if !none_cost.is_finite() {
        if best_cost.is_finite() {
            100.0
        } else {
            0.0
        }
    } else if none_cost > 0.0 {
        (none_cost - best_cost) / none_cost * 100.0
    } else {
        0.0
    };

    StrategyAnalysis {
        projections,
        best,
        savings_pct,
    }
}

/// Best protection per stage from the reset star up to 25, with the
/// cumulative cost and survival probability of reaching each star from the
/// reset star.
#[derive(Debug, Clone, Serialize)]
pub struct OptimalStrategyTable {
    pub strategies: BTreeMap<u8, ProtectionStrategy>,
    pub cost_to: BTreeMap<u8, f64>,
    pub prob_to: BTreeMap<u8, f64>,
}

impl OptimalStrategyTable {
    pub fn plan(&self) -> StrategyPlan {
        StrategyPlan::PerStage(self.strategies.clone())
    }
}

/// Greedy stage-by-stage search: earlier stages keep their chosen strategy
/// while each new final stage tries all four.
pub fn optimal_strategy_table(
    rates: &CurrencyRates,
    params: &SolverParams,
) -> OptimalStrategyTable {
    let base = DESTRUCTION_RESET_STAR;
    let mut strategies: BTreeMap<u8, ProtectionStrategy> = BTreeMap::new();
    let mut cost_to = BTreeMap::from([(base, 0.0)]);
    let mut prob_to = BTreeMap::from([(base, 1.0)]);

    for target in (base + 1)..=MAX_STARS {
        let stages = &STARFORCE_TABLE[base as usize..target as usize];
        let last = target - 1;

        let mut best = ProtectionStrategy::None;
        let mut best_cost = f64::INFINITY;
        for strategy in ProtectionStrategy::ALL {
            let mut trial = strategies.clone();
            trial.insert(last, strategy);
            let solution = solve(stages, &StrategyPlan::PerStage(trial), rates, params);
            let cost = projection_from(&solution, 0.0, rates).expected_total_cost;
            if cost < best_cost {
                best_cost = cost;
                best = strategy;
            }
        }
        strategies.insert(last, best);

        let solution = solve(stages, &StrategyPlan::PerStage(strategies.clone()), rates, params);
        let projection = projection_from(&solution, 0.0, rates);
        cost_to.insert(target, projection.expected_total_cost);
        prob_to.insert(target, projection.p_success);
    }

    OptimalStrategyTable {
        strategies,
        cost_to,
        prob_to,
    }
}
