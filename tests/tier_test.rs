//! Pity-truncated tier-up tests.

use gearcalc::config::CurrencyRates;
use gearcalc::cubes::expected_cost_for_tier_range;
use gearcalc::items::PotentialKind;
use gearcalc::tiers::{
    expected_rolls_with_pity, remaining_rolls, tier_up_within, PityState, PotentialTier, PITY_NONE,
};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// =========================================================================
// Closed form
// =========================================================================

#[test]
fn test_rare_to_epic_with_pity() {
    let rolls = expected_rolls_with_pity(0.03333, 60);
    assert!((rolls - 26.0).abs() < 0.2, "got {rolls}");
    assert!(rolls < 1.0 / 0.03333);
}

#[test]
fn test_rate_edges() {
    assert_eq!(expected_rolls_with_pity(0.0, 60), 60.0);
    assert_eq!(expected_rolls_with_pity(1.0, 60), 1.0);
    assert_eq!(expected_rolls_with_pity(0.5, 1), 1.0);
}

#[test]
fn test_remaining_rolls_uses_residual_pity() {
    let fresh = remaining_rolls(0.03333, 60, 0);
    let deep = remaining_rolls(0.03333, 60, 50);
    assert!(deep < fresh);
    assert!((deep - expected_rolls_with_pity(0.03333, 10)).abs() < 1e-12);
    // Counter at or past the threshold still needs one roll
    assert_eq!(remaining_rolls(0.03333, 60, 75), 1.0);
}

#[test]
fn test_tier_up_within_hits_certainty_at_pity() {
    assert_eq!(tier_up_within(0.01, 60, 60), 1.0);
    assert!(tier_up_within(0.01, 60, 10) < 0.1);
}

#[test]
fn test_top_tier_has_no_cost_above_itself() {
    let rates = CurrencyRates::default();
    let cost = expected_cost_for_tier_range(
        PotentialKind::Regular,
        PotentialTier::Mystic,
        PotentialTier::Mystic,
        &rates,
    );
    assert_eq!(cost, 0.0);
}

#[test]
fn test_bonus_climb_costs_more_than_regular() {
    let rates = CurrencyRates::default();
    let regular = expected_cost_for_tier_range(
        PotentialKind::Regular,
        PotentialTier::Rare,
        PotentialTier::Legendary,
        &rates,
    );
    let bonus = expected_cost_for_tier_range(
        PotentialKind::Bonus,
        PotentialTier::Rare,
        PotentialTier::Legendary,
        &rates,
    );
    assert!(regular.is_finite() && regular > 0.0);
    assert!(bonus > regular);
}

// =========================================================================
// PityState agrees with the formula
// =========================================================================

#[test]
fn test_simulated_pity_matches_formula() {
    let rate = 0.02;
    let threshold = 40;
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut state = PityState::default();

    let tier_ups = 20_000;
    let mut rolls = 0u64;
    for _ in 0..tier_ups {
        loop {
            rolls += 1;
            if state.record_roll(rng.gen::<f64>() < rate, threshold) {
                break;
            }
        }
        assert_eq!(state.counter, 0);
    }

    let mean = rolls as f64 / tier_ups as f64;
    let expected = expected_rolls_with_pity(rate, threshold);
    assert!((mean - expected).abs() / expected < 0.02, "mean {mean} vs {expected}");
}

#[test]
fn test_counter_never_reaches_threshold() {
    let mut state = PityState::new(0);
    for _ in 0..100 {
        state.record_roll(false, 10);
        assert!(state.counter < 10);
    }
}

// =========================================================================
// Properties
// =========================================================================

proptest! {
    #[test]
    fn prop_pity_is_below_naive_mean(rate in 0.001f64..0.999, pity in 1u32..2000) {
        let e = expected_rolls_with_pity(rate, pity);
        prop_assert!(e <= 1.0 / rate + 1e-9);
        prop_assert!(e >= 1.0 - 1e-12);
        prop_assert!(e <= pity as f64 + 1e-9);
    }

    #[test]
    fn prop_finite_pity_is_strictly_cheaper(rate in 0.001f64..0.3, pity in 1u32..50) {
        prop_assert!(expected_rolls_with_pity(rate, pity) < 1.0 / rate);
    }

    #[test]
    fn prop_pity_monotone_in_cap(rate in 0.001f64..0.5, pity in 1u32..1000) {
        prop_assert!(
            expected_rolls_with_pity(rate, pity + 1) >= expected_rolls_with_pity(rate, pity)
        );
    }

    #[test]
    fn prop_no_pity_approaches_naive(rate in 0.01f64..0.9) {
        let e = expected_rolls_with_pity(rate, PITY_NONE);
        prop_assert!((e - 1.0 / rate).abs() < 1e-6);
    }
}
