//! Gearcalc - DPS and upgrade-cost calculator for an idle RPG
//!
//! Estimates damage from a player's stat sources, prices every upgrade
//! system (potential cubes, starforce, hero power, artifacts) in diamonds
//! and ranks the upgrades by DPS gained per diamond spent.

pub mod artifacts;
pub mod build_info;
pub mod combat;
pub mod config;
pub mod cubes;
pub mod dps;
pub mod error;
pub mod hero_power;
pub mod items;
pub mod optimizer;
pub mod player;
pub mod starforce;
pub mod stats;
pub mod tiers;
pub mod timing;

pub use error::{GearError, Result};
