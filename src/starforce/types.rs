use crate::config::CurrencyRates;
use crate::error::{GearError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub const MAX_STARS: u8 = 25;
/// Destroyed items come back at this star level
pub const DESTRUCTION_RESET_STAR: u8 = 12;
/// Stages where destroy protection cannot be bought (stars 23, 24, 25)
pub const NO_DESTROY_PROTECTION: [u8; 3] = [22, 23, 24];

/// One attempt from `stage` to `stage + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementStage {
    pub stage: u8,
    pub success_rate: f64,
    pub maintain_rate: f64,
    pub decrease_rate: f64,
    pub destroy_rate: f64,
    pub meso: u64,
    pub stones: u32,
    /// Main stat amplification once this attempt succeeds
    pub main_amp_after: f64,
    /// Sub stat amplification once this attempt succeeds
    pub sub_amp_after: f64,
}

#[allow(clippy::too_many_arguments)]
const fn stage(
    stage: u8,
    success_rate: f64,
    maintain_rate: f64,
    decrease_rate: f64,
    destroy_rate: f64,
    main_amp_after: f64,
    sub_amp_after: f64,
    stones: u32,
    meso: u64,
) -> EnhancementStage {
    EnhancementStage {
        stage,
        success_rate,
        maintain_rate,
        decrease_rate,
        destroy_rate,
        meso,
        stones,
        main_amp_after,
        sub_amp_after,
    }
}

#[rustfmt::skip]
pub const STARFORCE_TABLE: [EnhancementStage; 25] = [
    stage(0,  1.00,  0.00, 0.00, 0.000,  0.10, 0.00,  1,  30_000),
    stage(1,  1.00,  0.00, 0.00, 0.000,  0.20, 0.00,  1,  30_000),
    stage(2,  0.90,  0.10, 0.00, 0.000,  0.30, 0.00,  2,  40_000),
    stage(3,  0.85,  0.15, 0.00, 0.000,  0.40, 0.00,  3,  50_000),
    stage(4,  0.80,  0.20, 0.00, 0.000,  0.60, 0.10,  4,  60_000),
    stage(5,  0.70,  0.30, 0.00, 0.000,  0.75, 0.10,  5,  70_000),
    stage(6,  0.65,  0.35, 0.00, 0.000,  0.90, 0.10,  6,  90_000),
    stage(7,  0.60,  0.40, 0.00, 0.000,  1.05, 0.10,  7, 110_000),
    stage(8,  0.55,  0.45, 0.00, 0.000,  1.20, 0.10,  8, 130_000),
    stage(9,  0.50,  0.50, 0.00, 0.000,  1.50, 0.25,  9, 150_000),
    stage(10, 0.35,  0.65, 0.00, 0.000,  1.75, 0.25, 10, 170_000),
    stage(11, 0.34,  0.66, 0.00, 0.000,  2.00, 0.25, 11, 190_000),
    stage(12, 0.33,  0.67, 0.00, 0.000,  2.25, 0.25, 12, 210_000),
    stage(13, 0.32,  0.56, 0.12, 0.000,  2.50, 0.25, 13, 230_000),
    stage(14, 0.31,  0.57, 0.12, 0.000,  3.00, 0.50, 14, 250_000),
    stage(15, 0.30,  0.67, 0.00, 0.030,  3.50, 0.60, 15, 270_000),
    stage(16, 0.275, 0.53, 0.15, 0.045,  4.00, 0.70, 16, 300_000),
    stage(17, 0.25,  0.54, 0.15, 0.060,  4.50, 0.80, 17, 330_000),
    stage(18, 0.225, 0.55, 0.15, 0.075,  5.00, 0.90, 18, 360_000),
    stage(19, 0.20,  0.56, 0.15, 0.090,  6.00, 1.00, 19, 390_000),
    stage(20, 0.14,  0.75, 0.00, 0.110,  7.00, 1.10, 20, 420_000),
    stage(21, 0.10,  0.70, 0.10, 0.100,  9.00, 1.30, 25, 470_000),
    stage(22, 0.08,  0.72, 0.10, 0.100, 12.00, 1.60, 30, 520_000),
    stage(23, 0.06,  0.74, 0.10, 0.100, 15.00, 2.00, 35, 570_000),
    stage(24, 0.04,  0.76, 0.10, 0.100, 20.00, 2.50, 40, 620_000),
];

impl EnhancementStage {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("success_rate", self.success_rate),
            ("maintain_rate", self.maintain_rate),
            ("decrease_rate", self.decrease_rate),
            ("destroy_rate", self.destroy_rate),
        ];
        for (field, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(GearError::InvalidRate {
                    stage: self.stage,
                    field,
                    value,
                });
            }
        }
        let total = self.success_rate + self.maintain_rate + self.decrease_rate + self.destroy_rate;
        if (total - 1.0).abs() > 1e-6 {
            return Err(GearError::InvalidRate {
                stage: self.stage,
                field: "rate_sum",
                value: total,
            });
        }
        Ok(())
    }

    /// Diamond cost of one unprotected attempt.
    pub fn attempt_cost(&self, rates: &CurrencyRates) -> f64 {
        rates.diamonds(self.meso as f64, self.stones as f64)
    }

    /// Rates and cost multiplier after applying `strategy`.
    pub fn protected(&self, strategy: ProtectionStrategy) -> ProtectedRates {
        let destroy_allowed =
            strategy.protects_destroy() && !NO_DESTROY_PROTECTION.contains(&self.stage);

        let decrease = if strategy.protects_decrease() {
            0.0
        } else {
            self.decrease_rate
        };
        let destroy = if destroy_allowed {
            self.destroy_rate * 0.5
        } else {
            self.destroy_rate
        };

        // Protection against a 0% outcome is free
        let mut cost_multiplier = 1.0;
        if strategy.protects_decrease() && self.decrease_rate > 0.0 {
            cost_multiplier += 1.0;
        }
        if destroy_allowed && self.destroy_rate > 0.0 {
            cost_multiplier += 1.0;
        }

        ProtectedRates {
            success: self.success_rate,
            decrease,
            destroy,
            cost_multiplier,
        }
    }
}

/// Per-attempt rates once a protection strategy is applied. Whatever is taken
/// out of decrease or destroy folds into maintain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtectedRates {
    pub success: f64,
    pub decrease: f64,
    pub destroy: f64,
    pub cost_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionStrategy {
    None,
    DecreaseProtect,
    DestroyProtect,
    Both,
}

impl ProtectionStrategy {
    pub const ALL: [ProtectionStrategy; 4] = [
        ProtectionStrategy::None,
        ProtectionStrategy::DecreaseProtect,
        ProtectionStrategy::DestroyProtect,
        ProtectionStrategy::Both,
    ];

    pub fn protects_decrease(self) -> bool {
        matches!(self, ProtectionStrategy::DecreaseProtect | ProtectionStrategy::Both)
    }

    pub fn protects_destroy(self) -> bool {
        matches!(self, ProtectionStrategy::DestroyProtect | ProtectionStrategy::Both)
    }

    pub fn name(self) -> &'static str {
        match self {
            ProtectionStrategy::None => "none",
            ProtectionStrategy::DecreaseProtect => "decrease",
            ProtectionStrategy::DestroyProtect => "destroy",
            ProtectionStrategy::Both => "both",
        }
    }
}

impl FromStr for ProtectionStrategy {
    type Err = GearError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ProtectionStrategy::None),
            "decrease" | "decrease_protect" => Ok(ProtectionStrategy::DecreaseProtect),
            "destroy" | "destroy_protect" => Ok(ProtectionStrategy::DestroyProtect),
            "both" => Ok(ProtectionStrategy::Both),
            _ => Err(GearError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Which protection to buy at each stage of a range.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyPlan {
    Uniform(ProtectionStrategy),
    PerStage(BTreeMap<u8, ProtectionStrategy>),
}

impl StrategyPlan {
    pub fn strategy_at(&self, stage: u8) -> ProtectionStrategy {
        match self {
            StrategyPlan::Uniform(s) => *s,
            StrategyPlan::PerStage(map) => {
                map.get(&stage).copied().unwrap_or(ProtectionStrategy::None)
            }
        }
    }
}

impl From<ProtectionStrategy> for StrategyPlan {
    fn from(strategy: ProtectionStrategy) -> Self {
        StrategyPlan::Uniform(strategy)
    }
}

/// Stages `start..target` of the built-in table.
pub fn stage_range(start: u8, target: u8) -> Result<&'static [EnhancementStage]> {
    if start >= target || target > MAX_STARS {
        return Err(GearError::InvalidStageRange { start, target });
    }
    Ok(&STARFORCE_TABLE[start as usize..target as usize])
}

/// Stat multiplier of an item sitting at `stars` for main and sub stats.
pub fn amplification(stars: u8) -> (f64, f64) {
    if stars == 0 {
        return (1.0, 1.0);
    }
    let idx = (stars.min(MAX_STARS) - 1) as usize;
    let row = &STARFORCE_TABLE[idx];
    (1.0 + row.main_amp_after, 1.0 + row.sub_amp_after)
}
