use crate::config::CurrencyRates;
use crate::error::GearError;
use crate::stats::{StatKind, StatSource};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Medals added to the reroll price for every locked line
pub const MEDALS_PER_LOCK: u32 = 43;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroTier {
    Common,
    Rare,
    Epic,
    Unique,
    Legendary,
    Mystic,
}

impl HeroTier {
    pub const ALL: [HeroTier; 6] = [
        HeroTier::Common,
        HeroTier::Rare,
        HeroTier::Epic,
        HeroTier::Unique,
        HeroTier::Legendary,
        HeroTier::Mystic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HeroTier::Common => "common",
            HeroTier::Rare => "rare",
            HeroTier::Epic => "epic",
            HeroTier::Unique => "unique",
            HeroTier::Legendary => "legendary",
            HeroTier::Mystic => "mystic",
        }
    }
}

impl FromStr for HeroTier {
    type Err = GearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == key)
            .ok_or_else(|| GearError::UnknownTier(s.to_string()))
    }
}

/// Tier odds and base price at one hero power level. Rates are percentages
/// as shown in game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroPowerLevel {
    pub level: u32,
    pub mystic_rate: f64,
    pub legendary_rate: f64,
    pub unique_rate: f64,
    pub epic_rate: f64,
    pub rare_rate: f64,
    pub common_rate: f64,
    /// Medals per reroll with nothing locked
    pub base_cost: u32,
}

impl Default for HeroPowerLevel {
    fn default() -> Self {
        Self {
            level: 15,
            mystic_rate: 0.14,
            legendary_rate: 1.63,
            unique_rate: 3.3,
            epic_rate: 37.93,
            rare_rate: 32.0,
            common_rate: 25.0,
            base_cost: 89,
        }
    }
}

impl HeroPowerLevel {
    /// Tier odds as fractions, normalized to sum to 1.
    pub fn tier_rates(&self) -> Vec<(HeroTier, f64)> {
        let raw = [
            (HeroTier::Mystic, self.mystic_rate),
            (HeroTier::Legendary, self.legendary_rate),
            (HeroTier::Unique, self.unique_rate),
            (HeroTier::Epic, self.epic_rate),
            (HeroTier::Rare, self.rare_rate),
            (HeroTier::Common, self.common_rate),
        ];
        let total: f64 = raw.iter().map(|(_, r)| r.max(0.0)).sum();
        if total <= 0.0 {
            return Vec::new();
        }
        raw.into_iter()
            .map(|(tier, rate)| (tier, rate.max(0.0) / total))
            .collect()
    }

    pub fn reroll_cost_medals(&self, locked_lines: usize) -> u32 {
        self.base_cost + locked_lines as u32 * MEDALS_PER_LOCK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroLine {
    pub kind: StatKind,
    pub value: f64,
    pub tier: HeroTier,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroPowerState {
    #[serde(default)]
    pub level: HeroPowerLevel,
    #[serde(default)]
    pub lines: Vec<HeroLine>,
}

impl HeroPowerState {
    pub fn locked_count(&self) -> usize {
        self.lines.iter().filter(|l| l.locked).count()
    }

    /// Diamonds per reroll with the current locks.
    pub fn reroll_cost_diamonds(&self, rates: &CurrencyRates) -> f64 {
        self.level.reroll_cost_medals(self.locked_count()) as f64 * rates.medal_to_diamond
    }

    pub fn line_origin(index: usize) -> String {
        format!("hero_power.{}", index + 1)
    }

    pub fn stat_sources(&self) -> Vec<StatSource> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| StatSource::new(Self::line_origin(i), line.kind, line.value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reroll_cost_scales_with_locks() {
        let level = HeroPowerLevel::default();
        assert_eq!(level.reroll_cost_medals(0), 89);
        assert_eq!(level.reroll_cost_medals(2), 175);
    }

    #[test]
    fn test_default_rates_sum_to_one() {
        let total: f64 = HeroPowerLevel::default().tier_rates().iter().map(|(_, r)| r).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_state_cost_in_diamonds() {
        let mut state = HeroPowerState::default();
        state.lines.push(HeroLine {
            kind: StatKind::BossDamage,
            value: 30.0,
            tier: HeroTier::Mystic,
            locked: true,
        });
        assert_eq!(state.reroll_cost_diamonds(&CurrencyRates::default()), 1320.0);
        assert_eq!(state.stat_sources()[0].origin, "hero_power.1");
    }
}
