//! Starforce chain tests: Markov solver, cost projection, Monte Carlo.

use gearcalc::config::{CurrencyRates, SolverParams};
use gearcalc::starforce::{
    analyze_all_strategies, optimal_strategy_table, project_cost, rebuild_cost, run_climbs, solve,
    stage_range, ClimbConfig, EnhancementStage, ProtectionStrategy, StrategyPlan,
    DESTRUCTION_RESET_STAR, MAX_STARS, STARFORCE_TABLE,
};
use proptest::prelude::*;

fn custom_stage(
    stage: u8,
    success: f64,
    maintain: f64,
    decrease: f64,
    destroy: f64,
) -> EnhancementStage {
    EnhancementStage {
        stage,
        success_rate: success,
        maintain_rate: maintain,
        decrease_rate: decrease,
        destroy_rate: destroy,
        meso: 100_000,
        stones: 10,
        main_amp_after: 0.0,
        sub_amp_after: 0.0,
    }
}

fn no_rebuild() -> SolverParams {
    SolverParams {
        include_rebuild: false,
        ..SolverParams::default()
    }
}

// =========================================================================
// Markov solver
// =========================================================================

#[test]
fn test_single_stage_with_destroy() {
    let stages = [custom_stage(16, 0.40, 0.59, 0.0, 0.01)];
    let sol = solve(
        &stages,
        &ProtectionStrategy::None.into(),
        &CurrencyRates::default(),
        &SolverParams::default(),
    );
    let v = sol.start_value();
    assert!(sol.converged);
    assert!((v.expected_attempts - 1.0 / 0.41).abs() < 1e-6);
    assert!((v.success_probability - 0.40 / 0.41).abs() < 1e-6);
}

#[test]
fn test_decrease_floors_at_range_start() {
    // Star 13 can decrease, but the range starts there, so a decrease is a stay.
    let stages = stage_range(13, 14).unwrap();
    let sol = solve(
        stages,
        &ProtectionStrategy::None.into(),
        &CurrencyRates::default(),
        &SolverParams::default(),
    );
    let v = sol.start_value();
    assert!((v.expected_attempts - 1.0 / 0.32).abs() < 1e-6);
    assert!((v.success_probability - 1.0).abs() < 1e-9);
}

#[test]
fn test_guaranteed_stages_cost_their_attempts() {
    let rates = CurrencyRates::default();
    let stages = stage_range(0, 2).unwrap();
    let projection = project_cost(stages, &ProtectionStrategy::None.into(), &rates, &no_rebuild());
    let expected: f64 = stages.iter().map(|s| s.attempt_cost(&rates)).sum();
    assert!((projection.expected_total_cost - expected).abs() < 1e-6);
    assert_eq!(projection.p_success, 1.0);
    assert_eq!(projection.expected_destructions, 0.0);
}

#[test]
fn test_zero_success_rate_is_unreachable() {
    let stages = [custom_stage(16, 0.0, 0.9, 0.0, 0.1)];
    let projection = project_cost(
        &stages,
        &ProtectionStrategy::None.into(),
        &CurrencyRates::default(),
        &no_rebuild(),
    );
    assert!(!projection.is_reachable());
}

#[test]
fn test_invalid_range_is_error() {
    assert!(stage_range(20, 20).is_err());
    assert!(stage_range(20, 26).is_err());
}

// =========================================================================
// Protection strategies
// =========================================================================

#[test]
fn test_destroy_protection_raises_success_probability() {
    let rates = CurrencyRates::default();
    let stages = stage_range(15, 20).unwrap();
    let analysis = analyze_all_strategies(stages, &rates, &SolverParams::default());
    let none = analysis.projection(ProtectionStrategy::None);
    let destroy = analysis.projection(ProtectionStrategy::DestroyProtect);
    let both = analysis.projection(ProtectionStrategy::Both);
    assert!(destroy.p_success > none.p_success);
    assert!(both.p_success >= destroy.p_success - 1e-12);
    assert!(analysis.best_projection().expected_total_cost <= none.expected_total_cost);
    assert!(analysis.savings_pct >= 0.0);
}

#[test]
fn test_no_destroy_protection_on_last_stages() {
    let row = STARFORCE_TABLE[23];
    let protected = row.protected(ProtectionStrategy::DestroyProtect);
    assert_eq!(protected.destroy, row.destroy_rate);
    assert_eq!(protected.cost_multiplier, 1.0);
}

#[test]
fn test_protecting_zero_rate_is_free() {
    let row = STARFORCE_TABLE[15]; // no decrease at 15
    let protected = row.protected(ProtectionStrategy::DecreaseProtect);
    assert_eq!(protected.cost_multiplier, 1.0);
}

#[test]
fn test_rebuild_only_above_reset_star() {
    let rates = CurrencyRates::default();
    let params = SolverParams::default();
    assert_eq!(rebuild_cost(DESTRUCTION_RESET_STAR, &rates, &params), 0.0);
    assert!(rebuild_cost(17, &rates, &params) > 0.0);
    assert!(rebuild_cost(18, &rates, &params) > rebuild_cost(17, &rates, &params));
}

#[test]
fn test_optimal_table_covers_every_stage() {
    let table = optimal_strategy_table(&CurrencyRates::default(), &SolverParams::default());
    assert_eq!(table.strategies.len(), 13);
    let costs: Vec<f64> = table.cost_to.values().copied().collect();
    assert!(costs.windows(2).all(|w| w[1] >= w[0]));
}

// =========================================================================
// Monte Carlo agrees with the projection
// =========================================================================

#[test]
fn test_simulation_matches_projection() {
    let rates = CurrencyRates::default();
    let params = SolverParams::default();
    let stages = stage_range(15, 18).unwrap();
    let plan = StrategyPlan::Uniform(ProtectionStrategy::None);

    let projected = project_cost(stages, &plan, &rates, &params).expected_total_cost;
    let config = ClimbConfig {
        runs: 20_000,
        seed: 42,
        plan,
    };
    let simulated = run_climbs(stages, &config, &rates, &params);

    assert_eq!(simulated.runs_completed, 20_000);
    let deviation = (simulated.avg_cost - projected).abs() / projected;
    assert!(deviation < 0.05, "simulated {} vs projected {}", simulated.avg_cost, projected);
}

// =========================================================================
// Properties
// =========================================================================

proptest! {
    #[test]
    fn prop_protection_never_lowers_success_at_any_stage(
        start in DESTRUCTION_RESET_STAR..MAX_STARS,
        len in 1u8..=13,
    ) {
        let target = (start + len).min(MAX_STARS);
        let stages = stage_range(start, target).unwrap();
        let rates = CurrencyRates::default();
        let params = SolverParams::default();
        let none = solve(stages, &ProtectionStrategy::None.into(), &rates, &params);

        for strategy in [
            ProtectionStrategy::DecreaseProtect,
            ProtectionStrategy::DestroyProtect,
            ProtectionStrategy::Both,
        ] {
            let protected = solve(stages, &strategy.into(), &rates, &params);
            for stage in start..=target {
                let p = protected.get(stage).unwrap().success_probability;
                let base = none.get(stage).unwrap().success_probability;
                prop_assert!(
                    p >= base - 1e-8,
                    "{} at {}: {} < {}",
                    strategy.name(),
                    stage,
                    p,
                    base
                );
            }
        }
    }
}
