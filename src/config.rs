//! Application configuration, persisted to ~/.gearcalc/config.toml
//!
//! Every field has a default, so a missing file or a file that sets only a
//! few keys is valid.

use crate::dps::StandardDpsModel;
use crate::error::{GearError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Exchange rates that bring every resource onto the diamond scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyRates {
    pub meso_to_diamond: f64,
    pub scroll_diamond_cost: f64,
    pub destruction_fee_meso: f64,
    pub regular_cube_diamonds: f64,
    pub bonus_cube_diamonds: f64,
    pub artifact_chest_diamonds: f64,
    pub medal_to_diamond: f64,
}

impl Default for CurrencyRates {
    fn default() -> Self {
        Self {
            meso_to_diamond: 0.004, // 1,500,000 meso = 6,000 diamonds
            scroll_diamond_cost: 500.0,
            destruction_fee_meso: 1_000_000.0,
            regular_cube_diamonds: 600.0,
            bonus_cube_diamonds: 1200.0,
            artifact_chest_diamonds: 1500.0,
            medal_to_diamond: 10.0,
        }
    }
}

impl CurrencyRates {
    pub fn diamonds(&self, meso: f64, scrolls: f64) -> f64 {
        meso * self.meso_to_diamond + scrolls * self.scroll_diamond_cost
    }

    pub fn destruction_fee_diamonds(&self) -> f64 {
        self.destruction_fee_meso * self.meso_to_diamond
    }
}

/// Markov solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    pub convergence_eps: f64,
    pub max_iterations: u32,
    /// Charge the climb from the reset star back to the start on destruction
    pub include_rebuild: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            convergence_eps: 1e-10,
            max_iterations: 1000,
            include_rebuild: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Outcome spaces up to this size are enumerated exactly
    pub max_exhaustive_outcomes: usize,
    /// Sample count when an outcome space is too large to enumerate
    pub monte_carlo_samples: u32,
    pub seed: u64,
    /// Points per hero power value range
    pub value_grid_points: usize,
    /// DPS% per 1000 medals a hero power reroll must beat at the base price.
    /// Scaled down as locks raise the price.
    pub hero_lock_threshold: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_exhaustive_outcomes: 20_000,
            monte_carlo_samples: 4_000,
            seed: 42,
            value_grid_points: 5,
            hero_lock_threshold: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Guaranteed legendary after this many chests without one (None = no pity)
    pub chest_pity: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub currency: CurrencyRates,
    pub solver: SolverParams,
    pub optimizer: OptimizerConfig,
    pub artifacts: ArtifactConfig,
    pub dps: StandardDpsModel,
}

pub fn config_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(GearError::NoHomeDir)?;
    Ok(home_dir.join(".gearcalc"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Ok(p) => p,
                Err(_) => return Ok(Self::default()),
            },
        };
        match fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Self::from_toml_str(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            "[currency]\nscroll_diamond_cost = 350.0\n\n[solver]\nmax_iterations = 50\n",
        )
        .unwrap();
        assert_eq!(cfg.currency.scroll_diamond_cost, 350.0);
        assert_eq!(cfg.currency.meso_to_diamond, 0.004);
        assert_eq!(cfg.solver.max_iterations, 50);
        assert_eq!(cfg.solver.convergence_eps, 1e-10);
        assert_eq!(cfg.optimizer.seed, 42);
    }

    #[test]
    fn test_destruction_fee_in_diamonds() {
        let rates = CurrencyRates::default();
        assert!((rates.destruction_fee_diamonds() - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(AppConfig::from_toml_str("[currency\n").is_err());
    }
}
