//! Chest odds and the duplicates each awakening consumes.

use super::types::{ArtifactTier, OwnedArtifact, MAX_AWAKENING};
use crate::config::{ArtifactConfig, CurrencyRates};
use crate::tiers::expected_rolls_with_pity;

/// Chance that a chest yields any artifact of `tier`.
pub fn chest_tier_rate(tier: ArtifactTier) -> f64 {
    match tier {
        ArtifactTier::Epic => 0.895,
        ArtifactTier::Unique => 0.095,
        ArtifactTier::Legendary => 0.01,
    }
}

/// Distinct artifacts sharing a tier's drop rate.
pub fn artifacts_in_tier(tier: ArtifactTier) -> u32 {
    match tier {
        ArtifactTier::Epic => 4,
        ArtifactTier::Unique => 7,
        ArtifactTier::Legendary => 14,
    }
}

/// Chance that one chest yields one specific artifact of `tier`.
pub fn drop_rate(tier: ArtifactTier) -> f64 {
    chest_tier_rate(tier) / artifacts_in_tier(tier) as f64
}

/// Duplicates needed to awaken from `target - 1` to `target` stars.
pub fn dupes_for_star(tier: ArtifactTier, target: u8) -> Option<u32> {
    let table: [u32; 5] = match tier {
        ArtifactTier::Epic => [5, 7, 12, 16, 20],
        ArtifactTier::Unique => [2, 4, 6, 10, 15],
        ArtifactTier::Legendary => [1, 2, 3, 4, 5],
    };
    match target {
        1..=MAX_AWAKENING => Some(table[(target - 1) as usize]),
        _ => None,
    }
}

/// Expected chests per copy of one specific artifact. A chest pity, when
/// set, guarantees a legendary after that many chests without one.
pub fn chests_per_copy(tier: ArtifactTier, config: &ArtifactConfig) -> f64 {
    let share = artifacts_in_tier(tier) as f64;
    match (tier, config.chest_pity) {
        (ArtifactTier::Legendary, Some(pity)) => {
            expected_rolls_with_pity(chest_tier_rate(tier), pity) * share
        }
        _ => 1.0 / drop_rate(tier),
    }
}

/// Expected chests to awaken `artifact` by one star, counting the
/// duplicates already held. `None` when it is already maxed.
pub fn expected_chests_for_next_star(
    artifact: &OwnedArtifact,
    config: &ArtifactConfig,
) -> Option<f64> {
    if artifact.is_maxed() {
        return None;
    }
    let needed = dupes_for_star(artifact.tier, artifact.stars + 1)?;
    let remaining = needed.saturating_sub(artifact.dupes);
    Some(remaining as f64 * chests_per_copy(artifact.tier, config))
}

pub fn awakening_cost_diamonds(
    artifact: &OwnedArtifact,
    rates: &CurrencyRates,
    config: &ArtifactConfig,
) -> Option<f64> {
    expected_chests_for_next_star(artifact, config).map(|c| c * rates.artifact_chest_diamonds)
}
