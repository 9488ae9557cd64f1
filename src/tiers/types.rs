use crate::error::GearError;
use crate::stats::StatKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Threshold used where no pity exists.
pub const PITY_NONE: u32 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotentialTier {
    Normal,
    Rare,
    Epic,
    Unique,
    Legendary,
    Mystic,
}

impl PotentialTier {
    pub const ALL: [PotentialTier; 6] = [
        PotentialTier::Normal,
        PotentialTier::Rare,
        PotentialTier::Epic,
        PotentialTier::Unique,
        PotentialTier::Legendary,
        PotentialTier::Mystic,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<PotentialTier> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<PotentialTier> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn name(self) -> &'static str {
        match self {
            PotentialTier::Normal => "normal",
            PotentialTier::Rare => "rare",
            PotentialTier::Epic => "epic",
            PotentialTier::Unique => "unique",
            PotentialTier::Legendary => "legendary",
            PotentialTier::Mystic => "mystic",
        }
    }
}

impl FromStr for PotentialTier {
    type Err = GearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == key)
            .ok_or_else(|| GearError::UnknownTier(s.to_string()))
    }
}

/// One weighted outcome in a tier's roll pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub kind: StatKind,
    pub value: f64,
    pub probability: f64,
}

/// Rates for leaving one tier of a track.
#[derive(Debug, Clone, PartialEq)]
pub struct TierStep {
    pub tier: PotentialTier,
    pub tier_up_rate: f64,
    /// Consecutive rolls without a tier-up after which one is guaranteed
    pub pity_threshold: u32,
}

/// Ordered one-way tier progression with pity.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTrack {
    pub name: String,
    pub steps: Vec<TierStep>,
}

impl TierTrack {
    pub fn step(&self, tier: PotentialTier) -> Option<&TierStep> {
        self.steps.iter().find(|s| s.tier == tier)
    }

    pub fn top_tier(&self) -> Option<PotentialTier> {
        self.steps.last().map(|s| s.tier)
    }
}

/// Rolls since the last tier-up on one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityState {
    pub counter: u32,
}

impl PityState {
    pub fn new(counter: u32) -> Self {
        Self { counter }
    }

    /// Record one roll. Returns true when the roll tiers up, either naturally
    /// or because the threshold was reached; the counter resets on tier-up.
    pub fn record_roll(&mut self, natural_tier_up: bool, threshold: u32) -> bool {
        self.counter += 1;
        if natural_tier_up || self.counter >= threshold {
            self.counter = 0;
            return true;
        }
        false
    }

    /// Rolls left until pity is guaranteed to fire, at least 1.
    pub fn residual(&self, threshold: u32) -> u32 {
        threshold.saturating_sub(self.counter).max(1)
    }
}
