//! Value iteration over the starforce chain.
//!
//! From each stage an attempt either succeeds (s+1), decreases (s-1, floored
//! at the start of the range), is destroyed (absorbing failure) or keeps the
//! item where it is. Decreases make the chain recursive, so the expected
//! values are found by repeated backward sweeps until they stop moving.

use super::types::{EnhancementStage, StrategyPlan};
use crate::config::{CurrencyRates, SolverParams};
use serde::Serialize;
use std::collections::BTreeMap;

/// Expected values from one stage to the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageValue {
    pub expected_attempts: f64,
    /// Probability of reaching the target before being destroyed
    pub success_probability: f64,
    /// Expected diamonds spent on attempts before reaching the target or
    /// being destroyed
    pub expected_cost: f64,
}

impl StageValue {
    pub const TARGET: StageValue = StageValue {
        expected_attempts: 0.0,
        success_probability: 1.0,
        expected_cost: 0.0,
    };

    pub const UNREACHABLE: StageValue = StageValue {
        expected_attempts: f64::INFINITY,
        success_probability: 0.0,
        expected_cost: f64::INFINITY,
    };
}

/// Solution for one (start, target, plan) query. Not reusable for any other
/// plan or range.
#[derive(Debug, Clone, Serialize)]
pub struct MarkovSolution {
    pub start: u8,
    pub target: u8,
    pub values: BTreeMap<u8, StageValue>,
    pub iterations: u32,
    pub converged: bool,
}

impl MarkovSolution {
    pub fn get(&self, stage: u8) -> Option<StageValue> {
        self.values.get(&stage).copied()
    }

    /// Values at the start stage. An empty range is already at its target;
    /// a range that could not be solved is unreachable.
    pub fn start_value(&self) -> StageValue {
        match self.get(self.start) {
            Some(value) => value,
            None if self.converged => StageValue::TARGET,
            None => StageValue::UNREACHABLE,
        }
    }

    fn empty(start: u8, converged: bool) -> Self {
        MarkovSolution {
            start,
            target: start,
            values: BTreeMap::new(),
            iterations: 0,
            converged,
        }
    }
}

fn delta(a: f64, b: f64) -> f64 {
    if a == b {
        0.0
    } else {
        (a - b).abs()
    }
}

/// Solve the chain over a contiguous slice of stages. The range starts at
/// `stages[0].stage` and the target is one past the last stage.
pub fn solve(
    stages: &[EnhancementStage],
    plan: &StrategyPlan,
    rates: &CurrencyRates,
    params: &SolverParams,
) -> MarkovSolution {
    let Some(first) = stages.first() else {
        return MarkovSolution::empty(0, true);
    };
    let start = first.stage;
    let n = stages.len();
    let Ok(target) = u8::try_from(usize::from(start) + n) else {
        tracing::warn!(start, stages = n, "stage range runs past the last star, nothing solved");
        return MarkovSolution::empty(start, false);
    };

    // Index n is the target
    let mut attempts = vec![0.0; n + 1];
    let mut success = vec![1.0; n + 1];
    let mut cost = vec![0.0; n + 1];
    for (i, row) in stages.iter().enumerate() {
        let p = row.success_rate;
        if p > 0.0 {
            attempts[i] = 1.0 / p;
            cost[i] = row.attempt_cost(rates) / p;
        } else {
            attempts[i] = f64::INFINITY;
            cost[i] = f64::INFINITY;
        }
        success[i] = 0.9;
    }

    let mut iterations = 0;
    let mut converged = false;
    for iteration in 1..=params.max_iterations {
        iterations = iteration;
        let mut max_change: f64 = 0.0;

        for i in (0..n).rev() {
            let row = &stages[i];
            let r = row.protected(plan.strategy_at(row.stage));
            let attempt_cost = row.attempt_cost(rates) * r.cost_multiplier;
            let dec = i.saturating_sub(1);
            let denom = r.success + r.decrease + r.destroy;

            let (e, ps, c) = if denom > 0.0 {
                (
                    (1.0 + r.success * attempts[i + 1] + r.decrease * attempts[dec]) / denom,
                    (r.success * success[i + 1] + r.decrease * success[dec]) / denom,
                    (attempt_cost + r.success * cost[i + 1] + r.decrease * cost[dec]) / denom,
                )
            } else {
                (f64::INFINITY, 0.0, f64::INFINITY)
            };

            max_change = max_change
                .max(delta(e, attempts[i]))
                .max(delta(ps, success[i]))
                .max(delta(c, cost[i]));
            attempts[i] = e;
            success[i] = ps;
            cost[i] = c;
        }

        if max_change < params.convergence_eps {
            converged = true;
            break;
        }
    }

    if converged {
        tracing::debug!(start, target, iterations, "markov chain converged");
    } else {
        tracing::warn!(start, target, iterations, "markov chain hit iteration cap");
    }

    let values = (start..=target)
        .enumerate()
        .map(|(i, stage)| {
            (
                stage,
                StageValue {
                    expected_attempts: attempts[i],
                    success_probability: success[i],
                    expected_cost: cost[i],
                },
            )
        })
        .collect();

    MarkovSolution {
        start,
        target,
        values,
        iterations,
        converged,
    }
}
