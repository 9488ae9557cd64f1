//! Error type for boundary failures.
//!
//! Core arithmetic never fails; unreachable targets come back as infinite
//! costs. Errors only arise when parsing user input, reading files or
//! validating game-data tables.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GearError {
    #[error("unknown stat name: {0}")]
    UnknownStat(String),

    #[error("unknown combat mode: {0}")]
    UnknownCombatMode(String),

    #[error("unknown equipment slot: {0}")]
    UnknownSlot(String),

    #[error("unknown tier: {0}")]
    UnknownTier(String),

    #[error("unknown protection strategy: {0}")]
    UnknownStrategy(String),

    #[error("invalid stage range: {start}..{target}")]
    InvalidStageRange { start: u8, target: u8 },

    #[error("invalid rate {value} for {field} at stage {stage}")]
    InvalidRate {
        stage: u8,
        field: &'static str,
        value: f64,
    },

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, GearError>;
