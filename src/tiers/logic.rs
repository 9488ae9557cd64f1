use super::types::{PityState, PotentialTier, TierTrack};

/// Expected rolls until a tier-up when one is guaranteed on roll `pity`.
///
/// Truncated geometric mean: (1 - (1 - rate)^pity) / rate. Always below the
/// uncapped 1 / rate, and approaches it as the cap grows.
pub fn expected_rolls_with_pity(rate: f64, pity: u32) -> f64 {
    if rate <= 0.0 {
        return pity as f64;
    }
    if rate >= 1.0 {
        return 1.0;
    }
    (1.0 - (1.0 - rate).powf(pity as f64)) / rate
}

/// Expected rolls left when `counter` rolls have already gone by without a
/// tier-up.
pub fn remaining_rolls(rate: f64, pity: u32, counter: u32) -> f64 {
    expected_rolls_with_pity(rate, PityState::new(counter).residual(pity))
}

/// Probability that at least one tier-up happens within `rolls` rolls.
pub fn tier_up_within(rate: f64, pity: u32, rolls: u32) -> f64 {
    if rolls >= pity {
        return 1.0;
    }
    1.0 - (1.0 - rate.clamp(0.0, 1.0)).powf(rolls as f64)
}

impl TierTrack {
    /// Sum of expected rolls over every transition from `from` up to `to`.
    /// Zero when `to` is not above `from`; infinite when a transition on the
    /// way is missing from the track.
    pub fn expected_rolls_for_tier_range(&self, from: PotentialTier, to: PotentialTier) -> f64 {
        self.expected_rolls_from_state(from, PityState::default(), to)
    }

    /// Same as `expected_rolls_for_tier_range`, with the first transition
    /// shortened by the pity already accumulated at `from`.
    pub fn expected_rolls_from_state(
        &self,
        from: PotentialTier,
        pity: PityState,
        to: PotentialTier,
    ) -> f64 {
        let mut total = 0.0;
        let mut tier = from;
        let mut first = true;
        while tier < to {
            let Some(step) = self.step(tier) else {
                return f64::INFINITY;
            };
            total += if first {
                remaining_rolls(step.tier_up_rate, step.pity_threshold, pity.counter)
            } else {
                expected_rolls_with_pity(step.tier_up_rate, step.pity_threshold)
            };
            first = false;
            match tier.next() {
                Some(next) => tier = next,
                None => break,
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pity_below_naive() {
        let e = expected_rolls_with_pity(0.03333, 60);
        assert!(e < 1.0 / 0.03333);
        assert!((e - 26.0).abs() < 0.1, "got {e}");
    }

    #[test]
    fn test_edge_rates() {
        assert_eq!(expected_rolls_with_pity(0.0, 60), 60.0);
        assert_eq!(expected_rolls_with_pity(-0.5, 60), 60.0);
        assert_eq!(expected_rolls_with_pity(1.0, 60), 1.0);
        assert_eq!(expected_rolls_with_pity(1.5, 60), 1.0);
    }

    #[test]
    fn test_pity_of_one_is_one_roll() {
        assert!((expected_rolls_with_pity(0.2, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_remaining_rolls_shrinks_with_counter() {
        let fresh = remaining_rolls(0.006, 150, 0);
        let halfway = remaining_rolls(0.006, 150, 75);
        let at_cap = remaining_rolls(0.006, 150, 149);
        assert!(halfway < fresh);
        assert!((at_cap - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tier_up_within() {
        assert_eq!(tier_up_within(0.01, 10, 10), 1.0);
        assert!((tier_up_within(0.5, 100, 1) - 0.5).abs() < 1e-12);
    }
}
