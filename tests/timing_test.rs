//! Trigger counting and uptime tests.

use gearcalc::timing::{buff_uptime, casts_per_second, effective_uptime_bonus, triggers};
use proptest::prelude::*;

// =========================================================================
// Worked scenarios
// =========================================================================

#[test]
fn test_long_cooldown_two_full_triggers() {
    assert!((triggers(40.0, 2.5, 60.0) - 2.0).abs() < 1e-12);
}

#[test]
fn test_clipped_final_trigger_counts_fraction() {
    assert!((triggers(10.0, 5.0, 32.0) - 3.4).abs() < 1e-12);
}

#[test]
fn test_degenerate_inputs_are_zero() {
    assert_eq!(triggers(10.0, 0.0, 60.0), 0.0);
    assert_eq!(triggers(10.0, 5.0, 0.0), 0.0);
    assert_eq!(buff_uptime(10.0, -1.0, 60.0), 0.0);
}

#[test]
fn test_spammable_buff_always_up() {
    assert!((buff_uptime(3.0, 5.0, 60.0) - 1.0).abs() < 1e-12);
    assert!((triggers(0.0, 5.0, 60.0) - 12.0).abs() < 1e-12);
}

#[test]
fn test_one_shot_ability() {
    assert_eq!(triggers(f64::INFINITY, 10.0, 60.0), 1.0);
    assert!((buff_uptime(f64::INFINITY, 10.0, 60.0) - 10.0 / 60.0).abs() < 1e-12);
}

#[test]
fn test_steady_state_uptime() {
    assert!((buff_uptime(40.0, 10.0, f64::INFINITY) - 0.25).abs() < 1e-12);
    assert_eq!(triggers(40.0, 10.0, f64::INFINITY), f64::INFINITY);
}

#[test]
fn test_uptime_scales_bonus() {
    // 2 triggers of 2.5s in 60s
    let expected = 30.0 * 5.0 / 60.0;
    assert!((effective_uptime_bonus(30.0, 40.0, 2.5, 60.0) - expected).abs() < 1e-12);
}

#[test]
fn test_attack_speed_raises_cast_rate() {
    assert!(casts_per_second(1.0, 50.0) > casts_per_second(1.0, 0.0));
}

// =========================================================================
// Properties
// =========================================================================

proptest! {
    #[test]
    fn prop_uptime_in_unit_interval(
        cooldown in 0.0f64..500.0,
        duration in 0.01f64..100.0,
        fight in 0.01f64..1000.0,
    ) {
        let u = buff_uptime(cooldown, duration, fight);
        prop_assert!((0.0..=1.0).contains(&u));
    }

    #[test]
    fn prop_triggers_bounded_by_cooldown_count(
        cooldown in 0.5f64..200.0,
        duration in 0.1f64..50.0,
        fight in 1.0f64..600.0,
    ) {
        let t = triggers(cooldown, duration, fight);
        prop_assert!(t >= 0.0);
        if cooldown > duration {
            prop_assert!(t <= (fight / cooldown).ceil() + 1.0);
        }
    }

    #[test]
    fn prop_active_time_fits_in_fight_plus_one_buff(
        duration in 0.01f64..60.0,
        extra in 0.0f64..200.0,
        fight in 0.01f64..1000.0,
    ) {
        let cooldown = duration + extra;
        let t = triggers(cooldown, duration, fight);
        prop_assert!(t * duration <= fight + duration + 1e-9 * fight.max(1.0));
    }
}
