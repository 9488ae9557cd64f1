use super::cube_metrics::CubeMetrics;
use crate::items::{EquipmentSlot, PotentialKind};
use serde::Serialize;
use std::fmt;

/// One upgrade axis the player can spend currency on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "axis", rename_all = "snake_case")]
pub enum ActionId {
    Cube {
        slot: EquipmentSlot,
        potential: PotentialKind,
    },
    Starforce {
        slot: EquipmentSlot,
        from: u8,
    },
    /// Reroll of one unlocked line, 1-based
    HeroPower { line: usize },
    Awaken {
        artifact: String,
        from: u8,
    },
}

impl ActionId {
    /// Stat source origin this action replaces.
    pub fn origin(&self) -> String {
        match self {
            ActionId::Cube { slot, potential } => format!("{}.{}", slot.name(), potential.name()),
            ActionId::Starforce { slot, .. } => format!("{}.starforce", slot.name()),
            ActionId::HeroPower { line } => format!("hero_power.{line}"),
            ActionId::Awaken { artifact, .. } => format!("artifact.{}", artifact.replace('.', "_")),
        }
    }

    /// Name used to order otherwise tied candidates.
    pub fn sort_name(&self) -> String {
        match self {
            ActionId::Cube { slot, .. } | ActionId::Starforce { slot, .. } => {
                slot.name().to_string()
            }
            ActionId::HeroPower { line } => format!("hero_power.{line}"),
            ActionId::Awaken { artifact, .. } => artifact.clone(),
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionId::Cube { slot, potential } => {
                write!(f, "Cube {} {} potential", slot.name(), potential.name())
            }
            ActionId::Starforce { slot, from } => {
                write!(f, "Starforce {} {}->{}", slot.name(), from, from + 1)
            }
            ActionId::HeroPower { line } => write!(f, "Reroll hero power line {line}"),
            ActionId::Awaken { artifact, from } => {
                write!(f, "Awaken {artifact} {}->{}", from, from + 1)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpgradeCandidate {
    pub action: ActionId,
    pub expected_cost_diamonds: f64,
    /// Mean DPS gain over outcomes better than the current state, in percent
    /// of the baseline
    pub expected_dps_gain_pct: f64,
    /// DPS% per 1000 diamonds
    pub efficiency: f64,
    /// Gain from the best outcome at the next tier
    pub best_case_gain_pct: f64,
    /// Chance that a single roll or attempt improves on the current state
    pub p_improve: f64,
    pub baseline_dps: f64,
    pub current_dps: f64,
    /// Baseline DPS was zero or negative, so percentages are not meaningful
    pub unreliable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cube_metrics: Option<CubeMetrics>,
}

impl UpgradeCandidate {
    pub fn is_actionable(&self) -> bool {
        self.expected_cost_diamonds.is_finite() && self.expected_dps_gain_pct > 0.0
    }
}

/// `gain_pct / (cost / 1000)`; zero when the cost is unbounded.
pub fn efficiency(gain_pct: f64, cost_diamonds: f64) -> f64 {
    if !cost_diamonds.is_finite() || !gain_pct.is_finite() {
        return 0.0;
    }
    gain_pct / (cost_diamonds.max(1.0) / 1000.0)
}
