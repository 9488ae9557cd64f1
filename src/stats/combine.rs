//! Named stat combination rules.
//!
//! Values are percentages throughout (12.0 means 12%). Each stacking rule is
//! its own function so the call site always shows which rule applies.

use super::types::Stacking;

/// Hard cap for total attack speed.
pub const ATTACK_SPEED_CAP: f64 = 150.0;

pub fn stack_additive(sources: &[f64]) -> f64 {
    sources.iter().sum()
}

/// Final damage sources multiply: (1 + a)(1 + b)... - 1.
pub fn stack_final_damage(sources: &[f64]) -> f64 {
    let product: f64 = sources.iter().map(|v| 1.0 + v / 100.0).product();
    (product - 1.0) * 100.0
}

/// Penetration sources each ignore a share of what the previous ones left:
/// 1 - (1 - a)(1 - b)..., capped at 100%.
pub fn stack_penetration(sources: &[f64]) -> f64 {
    let remaining: f64 = sources
        .iter()
        .map(|v| 1.0 - (v / 100.0).clamp(0.0, 1.0))
        .product();
    ((1.0 - remaining) * 100.0).min(100.0)
}

/// Attack speed approaches the cap with diminishing returns. Each source
/// closes `value / cap` of the remaining gap; larger sources apply first.
pub fn stack_attack_speed(sources: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = sources.iter().copied().filter(|v| *v > 0.0).collect();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut current = 0.0;
    for value in sorted {
        let gain = (ATTACK_SPEED_CAP - current) * (value / ATTACK_SPEED_CAP);
        current += gain;
    }
    current.min(ATTACK_SPEED_CAP)
}

/// Combine with the rule for `stacking`.
pub fn stack(stacking: Stacking, sources: &[f64]) -> f64 {
    match stacking {
        Stacking::Additive => stack_additive(sources),
        Stacking::Multiplicative => stack_final_damage(sources),
        Stacking::Penetration => stack_penetration(sources),
        Stacking::Diminishing => stack_attack_speed(sources),
    }
}
