use crate::error::GearError;
use crate::starforce::amplification;
use crate::stats::{StatKind, StatSource};
use crate::tiers::PotentialTier;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Hat,
    Top,
    Bottom,
    Gloves,
    Shoes,
    Belt,
    Shoulder,
    Cape,
    Ring,
    Necklace,
    Face,
}

impl EquipmentSlot {
    pub const ALL: [EquipmentSlot; 11] = [
        EquipmentSlot::Hat,
        EquipmentSlot::Top,
        EquipmentSlot::Bottom,
        EquipmentSlot::Gloves,
        EquipmentSlot::Shoes,
        EquipmentSlot::Belt,
        EquipmentSlot::Shoulder,
        EquipmentSlot::Cape,
        EquipmentSlot::Ring,
        EquipmentSlot::Necklace,
        EquipmentSlot::Face,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EquipmentSlot::Hat => "hat",
            EquipmentSlot::Top => "top",
            EquipmentSlot::Bottom => "bottom",
            EquipmentSlot::Gloves => "gloves",
            EquipmentSlot::Shoes => "shoes",
            EquipmentSlot::Belt => "belt",
            EquipmentSlot::Shoulder => "shoulder",
            EquipmentSlot::Cape => "cape",
            EquipmentSlot::Ring => "ring",
            EquipmentSlot::Necklace => "necklace",
            EquipmentSlot::Face => "face",
        }
    }
}

impl FromStr for EquipmentSlot {
    type Err = GearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|slot| slot.name() == key)
            .ok_or_else(|| GearError::UnknownSlot(s.to_string()))
    }
}

/// Regular and bonus potentials roll from separate cubes with separate pity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotentialKind {
    Regular,
    Bonus,
}

impl PotentialKind {
    pub fn name(self) -> &'static str {
        match self {
            PotentialKind::Regular => "regular",
            PotentialKind::Bonus => "bonus",
        }
    }
}

/// A flat stat on the item itself, scaled by starforce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStat {
    pub kind: StatKind,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PotentialLine {
    pub kind: StatKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Potential {
    pub tier: PotentialTier,
    #[serde(default)]
    pub lines: Vec<PotentialLine>,
    /// Cubes used since the last tier-up
    #[serde(default)]
    pub pity: u32,
}

impl Default for Potential {
    fn default() -> Self {
        Self::new()
    }
}

impl Potential {
    pub fn new() -> Self {
        Self {
            tier: PotentialTier::Rare,
            lines: Vec::new(),
            pity: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub slot: EquipmentSlot,
    #[serde(default)]
    pub stars: u8,
    #[serde(default)]
    pub main_stats: Vec<BaseStat>,
    #[serde(default)]
    pub sub_stats: Vec<BaseStat>,
    #[serde(default)]
    pub regular: Potential,
    #[serde(default)]
    pub bonus: Potential,
}

impl EquippedItem {
    pub fn new(slot: EquipmentSlot) -> Self {
        Self {
            slot,
            stars: 0,
            main_stats: Vec::new(),
            sub_stats: Vec::new(),
            regular: Potential::new(),
            bonus: Potential::new(),
        }
    }

    pub fn potential(&self, kind: PotentialKind) -> &Potential {
        match kind {
            PotentialKind::Regular => &self.regular,
            PotentialKind::Bonus => &self.bonus,
        }
    }

    pub fn starforce_origin(&self) -> String {
        format!("{}.starforce", self.slot.name())
    }

    pub fn potential_origin(&self, kind: PotentialKind) -> String {
        format!("{}.{}", self.slot.name(), kind.name())
    }

    /// Base stats amplified as they would be at `stars`.
    pub fn starforce_sources(&self, stars: u8) -> Vec<StatSource> {
        let (main_mult, sub_mult) = amplification(stars);
        let origin = self.starforce_origin();
        self.main_stats
            .iter()
            .map(|s| StatSource::new(origin.clone(), s.kind, s.value * main_mult))
            .chain(
                self.sub_stats
                    .iter()
                    .map(|s| StatSource::new(origin.clone(), s.kind, s.value * sub_mult)),
            )
            .collect()
    }

    pub fn potential_sources(
        &self,
        kind: PotentialKind,
        lines: &[PotentialLine],
    ) -> Vec<StatSource> {
        let origin = self.potential_origin(kind);
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| StatSource::new(format!("{origin}.{}", i + 1), line.kind, line.value))
            .collect()
    }

    pub fn stat_sources(&self) -> Vec<StatSource> {
        let mut sources = self.starforce_sources(self.stars);
        sources.extend(self.potential_sources(PotentialKind::Regular, &self.regular.lines));
        sources.extend(self.potential_sources(PotentialKind::Bonus, &self.bonus.lines));
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_roundtrip_names() {
        for slot in EquipmentSlot::ALL {
            assert_eq!(slot.name().parse::<EquipmentSlot>().ok(), Some(slot));
        }
        assert!("weapon".parse::<EquipmentSlot>().is_err());
    }

    #[test]
    fn test_starforce_sources_amplified() {
        let mut item = EquippedItem::new(EquipmentSlot::Hat);
        item.main_stats.push(BaseStat {
            kind: StatKind::AttackFlat,
            value: 100.0,
        });
        item.sub_stats.push(BaseStat {
            kind: StatKind::MainStatFlat,
            value: 50.0,
        });
        let sources = item.starforce_sources(10);
        assert_eq!(sources.len(), 2);
        assert!((sources[0].value - 250.0).abs() < 1e-9);
        assert!((sources[1].value - 62.5).abs() < 1e-9);
        assert!(sources.iter().all(|s| s.origin == "hat.starforce"));
    }

    #[test]
    fn test_potential_origins_numbered() {
        let item = EquippedItem::new(EquipmentSlot::Gloves);
        let lines = [
            PotentialLine {
                kind: StatKind::CritDamage,
                value: 30.0,
            },
            PotentialLine {
                kind: StatKind::DamagePct,
                value: 25.0,
            },
        ];
        let sources = item.potential_sources(PotentialKind::Bonus, &lines);
        assert_eq!(sources[0].origin, "gloves.bonus.1");
        assert_eq!(sources[1].origin, "gloves.bonus.2");
    }
}
