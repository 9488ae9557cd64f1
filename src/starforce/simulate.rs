//! Monte Carlo enhancement runs, used to cross-check the Markov projection.

use super::cost::rebuild_cost;
use super::types::{EnhancementStage, StrategyPlan};
use crate::config::{CurrencyRates, SolverParams};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Safety bound on attempts within a single climb
pub const MAX_ATTEMPTS_PER_RUN: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct ClimbConfig {
    pub runs: u32,
    pub seed: u64,
    pub plan: StrategyPlan,
}

/// Outcome of one simulated climb from start to target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbRun {
    pub cost: f64,
    pub attempts: u64,
    pub destructions: u32,
    pub reached_target: bool,
}

#[derive(Debug, Clone)]
pub struct ClimbReport {
    pub num_runs: u32,
    pub runs_completed: u32,
    pub avg_cost: f64,
    pub avg_attempts: f64,
    pub avg_destructions: f64,
    pub min_cost: f64,
    pub max_cost: f64,
    pub median_cost: f64,
}

impl ClimbReport {
    pub fn from_runs(runs: &[ClimbRun]) -> Self {
        let num_runs = runs.len() as u32;
        let n = (num_runs as f64).max(1.0);
        let runs_completed = runs.iter().filter(|r| r.reached_target).count() as u32;
        let avg_cost = runs.iter().map(|r| r.cost).sum::<f64>() / n;
        let avg_attempts = runs.iter().map(|r| r.attempts as f64).sum::<f64>() / n;
        let avg_destructions = runs.iter().map(|r| r.destructions as f64).sum::<f64>() / n;

        let mut costs: Vec<f64> = runs.iter().map(|r| r.cost).collect();
        costs.sort_by(|a, b| a.total_cmp(b));
        let min_cost = costs.first().copied().unwrap_or(0.0);
        let max_cost = costs.last().copied().unwrap_or(0.0);
        let median_cost = costs.get(costs.len() / 2).copied().unwrap_or(0.0);

        Self {
            num_runs,
            runs_completed,
            avg_cost,
            avg_attempts,
            avg_destructions,
            min_cost,
            max_cost,
            median_cost,
        }
    }

    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                  STARFORCE SIMULATION\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} reached target\n\n",
            self.num_runs, self.runs_completed
        ));

        report.push_str("── COST ─────────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Cost:          {:.0} diamonds\n", self.avg_cost));
        report.push_str(&format!("  Median Cost:       {:.0} diamonds\n", self.median_cost));
        report.push_str(&format!(
            "  Range:             {:.0} - {:.0} diamonds\n\n",
            self.min_cost, self.max_cost
        ));

        report.push_str("── ATTEMPTS ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Attempts:      {:.1}\n", self.avg_attempts));
        report.push_str(&format!("  Avg Destructions:  {:.2}\n", self.avg_destructions));
        report
    }
}

/// Simulate one climb. A destroyed item pays the fee plus the expected
/// rebuild cost and resumes at the start of the range.
pub fn simulate_climb<R: Rng>(
    stages: &[EnhancementStage],
    plan: &StrategyPlan,
    rates: &CurrencyRates,
    rebuild: f64,
    rng: &mut R,
) -> ClimbRun {
    let mut run = ClimbRun {
        cost: 0.0,
        attempts: 0,
        destructions: 0,
        reached_target: stages.is_empty(),
    };
    let penalty = rates.destruction_fee_diamonds() + rebuild;

    let mut idx = 0usize;
    while idx < stages.len() {
        if run.attempts >= MAX_ATTEMPTS_PER_RUN {
            return run;
        }
        let row = &stages[idx];
        let r = row.protected(plan.strategy_at(row.stage));
        run.attempts += 1;
        run.cost += row.attempt_cost(rates) * r.cost_multiplier;

        let roll = rng.gen::<f64>();
        if roll < r.success {
            idx += 1;
        } else if roll < r.success + r.decrease {
            idx = idx.saturating_sub(1);
        } else if roll < r.success + r.decrease + r.destroy {
            run.destructions += 1;
            run.cost += penalty;
            idx = 0;
        }
    }
    run.reached_target = true;
    run
}

/// Run `config.runs` seeded climbs over `stages`.
pub fn run_climbs(
    stages: &[EnhancementStage],
    config: &ClimbConfig,
    rates: &CurrencyRates,
    params: &SolverParams,
) -> ClimbReport {
    let rebuild = match stages.first() {
        Some(first) if params.include_rebuild => rebuild_cost(first.stage, rates, params),
        _ => 0.0,
    };

    let mut runs = Vec::with_capacity(config.runs as usize);
    for run_idx in 0..config.runs {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed + run_idx as u64);
        runs.push(simulate_climb(stages, &config.plan, rates, rebuild, &mut rng));
    }
    ClimbReport::from_runs(&runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::starforce::types::{stage_range, ProtectionStrategy};

    #[test]
    fn test_guaranteed_stages_cost_exactly() {
        let stages = stage_range(0, 2).unwrap();
        let rates = CurrencyRates::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let run = simulate_climb(stages, &ProtectionStrategy::None.into(), &rates, 0.0, &mut rng);
        assert!(run.reached_target);
        assert_eq!(run.attempts, 2);
        let expected = stages.iter().map(|s| s.attempt_cost(&rates)).sum::<f64>();
        assert!((run.cost - expected).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_report() {
        let stages = stage_range(15, 18).unwrap();
        let config = ClimbConfig {
            runs: 50,
            seed: 99,
            plan: ProtectionStrategy::None.into(),
        };
        let rates = CurrencyRates::default();
        let params = SolverParams::default();
        let a = run_climbs(stages, &config, &rates, &params);
        let b = run_climbs(stages, &config, &rates, &params);
        assert_eq!(a.avg_cost, b.avg_cost);
        assert_eq!(a.avg_attempts, b.avg_attempts);
    }
}
