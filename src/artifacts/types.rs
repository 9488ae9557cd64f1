use crate::combat::CombatMode;
use crate::error::GearError;
use crate::stats::{StatKind, StatSource};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Highest awakening level
pub const MAX_AWAKENING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactTier {
    Epic,
    Unique,
    Legendary,
}

impl ArtifactTier {
    pub const ALL: [ArtifactTier; 3] = [
        ArtifactTier::Epic,
        ArtifactTier::Unique,
        ArtifactTier::Legendary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArtifactTier::Epic => "epic",
            ArtifactTier::Unique => "unique",
            ArtifactTier::Legendary => "legendary",
        }
    }
}

impl FromStr for ArtifactTier {
    type Err = GearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == key)
            .ok_or_else(|| GearError::UnknownTier(s.to_string()))
    }
}

/// A stat bonus that grows with awakening: `base + per_star * stars`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtifactEffect {
    pub kind: StatKind,
    pub base: f64,
    #[serde(default)]
    pub per_star: f64,
}

impl ArtifactEffect {
    pub fn value_at(&self, stars: u8) -> f64 {
        self.base + self.per_star * stars as f64
    }
}

/// Effect that only applies while the artifact is equipped, on a timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub effect: ArtifactEffect,
    pub cooldown: f64,
    pub duration: f64,
    /// Only active in this combat mode when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<CombatMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedArtifact {
    pub name: String,
    pub tier: ArtifactTier,
    #[serde(default)]
    pub stars: u8,
    /// Duplicates already held toward the next star
    #[serde(default)]
    pub dupes: u32,
    #[serde(default)]
    pub equipped: bool,
    /// Always-on bonus granted just by owning the artifact
    pub inventory: ArtifactEffect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<ActiveEffect>,
}

impl OwnedArtifact {
    pub fn origin(&self) -> String {
        format!("artifact.{}", self.name.replace('.', "_"))
    }

    pub fn is_maxed(&self) -> bool {
        self.stars >= MAX_AWAKENING
    }

    /// Sources this artifact contributes at `stars` in `mode`.
    pub fn sources_at(&self, stars: u8, mode: CombatMode) -> Vec<StatSource> {
        let origin = self.origin();
        let mut sources = vec![StatSource::new(
            format!("{origin}.inventory"),
            self.inventory.kind,
            self.inventory.value_at(stars),
        )];
        let applies =
            |a: &ActiveEffect| self.equipped && (a.mode.is_none() || a.mode == Some(mode));
        if let Some(active) = self.active.filter(applies) {
            sources.push(
                StatSource::new(
                    format!("{origin}.active"),
                    active.effect.kind,
                    active.effect.value_at(stars),
                )
                .with_window(active.cooldown, active.duration),
            );
        }
        sources
    }

    pub fn stat_sources(&self, mode: CombatMode) -> Vec<StatSource> {
        self.sources_at(self.stars, mode)
    }
}
