use super::candidate::UpgradeCandidate;
use serde::Serialize;

/// Upgrades chosen greedily for a diamond budget.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetPlan {
    pub budget: f64,
    pub picks: Vec<UpgradeCandidate>,
    pub total_cost: f64,
    /// Sum of expected gains; an approximation since axes interact
    pub total_gain_pct: f64,
    pub remaining: f64,
}

/// Walk `ranked` in order and take every actionable candidate that still
/// fits. A candidate that does not fit is skipped, not a stop: a cheaper one
/// further down may still fit.
pub fn plan_within_budget(ranked: &[UpgradeCandidate], budget: f64) -> BudgetPlan {
    let mut remaining = budget.max(0.0);
    let mut picks = Vec::new();

    for candidate in ranked.iter().filter(|c| c.is_actionable()) {
        if candidate.expected_cost_diamonds <= remaining {
            remaining -= candidate.expected_cost_diamonds;
            picks.push(candidate.clone());
        }
    }

    BudgetPlan {
        budget,
        total_cost: picks.iter().map(|c| c.expected_cost_diamonds).sum(),
        total_gain_pct: picks.iter().map(|c| c.expected_dps_gain_pct).sum(),
        picks,
        remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::candidate::ActionId;

    fn cand(line: usize, cost: f64, gain: f64) -> UpgradeCandidate {
        UpgradeCandidate {
            action: ActionId::HeroPower { line },
            expected_cost_diamonds: cost,
            expected_dps_gain_pct: gain,
            efficiency: crate::optimizer::efficiency(gain, cost),
            best_case_gain_pct: gain,
            p_improve: 0.5,
            baseline_dps: 100.0,
            current_dps: 100.0,
            unreliable: false,
            cube_metrics: None,
        }
    }

    #[test]
    fn test_skips_what_does_not_fit() {
        let ranked = vec![cand(1, 500.0, 2.0), cand(2, 5000.0, 5.0), cand(3, 300.0, 0.5)];
        let plan = plan_within_budget(&ranked, 1000.0);
        assert_eq!(plan.picks.len(), 2);
        assert_eq!(plan.total_cost, 800.0);
        assert_eq!(plan.remaining, 200.0);
        assert!((plan.total_gain_pct - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_ignores_non_actionable() {
        let ranked = vec![cand(1, f64::INFINITY, 2.0), cand(2, 10.0, 0.0)];
        let plan = plan_within_budget(&ranked, 1e12);
        assert!(plan.picks.is_empty());
        assert_eq!(plan.remaining, 1e12);
    }
}
