use crate::artifacts::{ActiveEffect, ArtifactEffect, ArtifactTier, OwnedArtifact};
use crate::combat::CombatMode;
use crate::hero_power::{HeroLine, HeroPowerState, HeroTier};
use crate::items::{BaseStat, EquipmentSlot, EquippedItem, Potential, PotentialLine};
use crate::stats::{StatKind, StatSnapshot, StatSource};
use crate::tiers::PotentialTier;
use serde::{Deserialize, Serialize};

/// A skill or passive buff that is only up part of the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedBuff {
    pub name: String,
    pub kind: StatKind,
    pub value: f64,
    pub cooldown: f64,
    pub duration: f64,
}

/// Everything the calculator needs to know about one character. Read-only
/// input to the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    /// Unix timestamp of the last save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<i64>,
    /// Stats from sources the calculator does not model (skills, guild,
    /// companions, weapon), entered as totals
    #[serde(default)]
    pub base_stats: Vec<BaseStat>,
    #[serde(default)]
    pub buffs: Vec<TimedBuff>,
    #[serde(default)]
    pub equipment: Vec<EquippedItem>,
    #[serde(default)]
    pub artifacts: Vec<OwnedArtifact>,
    #[serde(default)]
    pub hero_power: HeroPowerState,
}

impl PlayerSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            saved_at: None,
            base_stats: Vec::new(),
            buffs: Vec::new(),
            equipment: Vec::new(),
            artifacts: Vec::new(),
            hero_power: HeroPowerState::default(),
        }
    }

    pub fn item(&self, slot: EquipmentSlot) -> Option<&EquippedItem> {
        self.equipment.iter().find(|i| i.slot == slot)
    }

    /// Flatten the player into tagged stat sources for `mode`.
    pub fn stat_snapshot(&self, mode: CombatMode) -> StatSnapshot {
        let mut snapshot = StatSnapshot::new();
        for stat in &self.base_stats {
            snapshot.add("base", stat.kind, stat.value);
        }
        for buff in &self.buffs {
            snapshot.push(
                StatSource::new(format!("buff.{}", buff.name), buff.kind, buff.value)
                    .with_window(buff.cooldown, buff.duration),
            );
        }
        for item in &self.equipment {
            snapshot.sources.extend(item.stat_sources());
        }
        for artifact in &self.artifacts {
            snapshot.sources.extend(artifact.stat_sources(mode));
        }
        snapshot.sources.extend(self.hero_power.stat_sources());
        snapshot
    }

    /// A mid-game character used by `init-player` as a starting template.
    pub fn sample() -> Self {
        let mut player = Self::new("sample");
        player.base_stats = vec![
            base(StatKind::AttackFlat, 4000.0),
            base(StatKind::MainStatFlat, 6000.0),
            base(StatKind::MainStatPct, 20.0),
            base(StatKind::SecondaryStatFlat, 1500.0),
            base(StatKind::DamagePct, 60.0),
            base(StatKind::BossDamage, 30.0),
            base(StatKind::NormalDamage, 15.0),
            base(StatKind::CritRate, 45.0),
            base(StatKind::CritDamage, 80.0),
            base(StatKind::DefPen, 15.0),
            base(StatKind::AttackSpeed, 25.0),
            base(StatKind::FinalDamage, 8.0),
        ];
        player.buffs = vec![TimedBuff {
            name: "war_cry".to_string(),
            kind: StatKind::DamagePct,
            value: 30.0,
            cooldown: 40.0,
            duration: 15.0,
        }];

        player.equipment = EquipmentSlot::ALL
            .into_iter()
            .enumerate()
            .map(|(i, slot)| sample_item(slot, i))
            .collect();

        player.artifacts = vec![
            OwnedArtifact {
                name: "pigs_ribbon".to_string(),
                tier: ArtifactTier::Epic,
                stars: 3,
                dupes: 4,
                equipped: false,
                inventory: effect(StatKind::AttackFlat, 60.0, 30.0),
                active: None,
            },
            OwnedArtifact {
                name: "hexagon_necklace".to_string(),
                tier: ArtifactTier::Unique,
                stars: 1,
                dupes: 1,
                equipped: true,
                inventory: effect(StatKind::MainStatFlat, 150.0, 75.0),
                active: Some(ActiveEffect {
                    effect: effect(StatKind::DamagePct, 12.0, 3.0),
                    cooldown: 30.0,
                    duration: 12.0,
                    mode: None,
                }),
            },
            OwnedArtifact {
                name: "chalice".to_string(),
                tier: ArtifactTier::Legendary,
                stars: 0,
                dupes: 0,
                equipped: true,
                inventory: effect(StatKind::BossDamage, 4.0, 2.0),
                active: Some(ActiveEffect {
                    effect: effect(StatKind::FinalDamage, 10.0, 2.0),
                    cooldown: 60.0,
                    duration: 20.0,
                    mode: Some(CombatMode::WorldBoss),
                }),
            },
        ];

        player.hero_power = HeroPowerState {
            level: Default::default(),
            lines: vec![
                hero(StatKind::BossDamage, 21.0, HeroTier::Legendary, true),
                hero(StatKind::DamagePct, 14.0, HeroTier::Unique, true),
                hero(StatKind::CritDamage, 7.0, HeroTier::Epic, false),
                hero(StatKind::MinDamageMult, 5.0, HeroTier::Rare, false),
                hero(StatKind::MaxHp, 300.0, HeroTier::Rare, false),
                hero(StatKind::AttackPct, 1.5, HeroTier::Common, false),
            ],
        };
        player
    }
}

fn base(kind: StatKind, value: f64) -> BaseStat {
    BaseStat { kind, value }
}

fn line(kind: StatKind, value: f64) -> PotentialLine {
    PotentialLine { kind, value }
}

fn effect(kind: StatKind, base: f64, per_star: f64) -> ArtifactEffect {
    ArtifactEffect {
        kind,
        base,
        per_star,
    }
}

fn hero(kind: StatKind, value: f64, tier: HeroTier, locked: bool) -> HeroLine {
    HeroLine {
        kind,
        value,
        tier,
        locked,
    }
}

fn sample_item(slot: EquipmentSlot, index: usize) -> EquippedItem {
    let mut item = EquippedItem::new(slot);
    item.stars = [15, 12, 10, 16, 10, 12, 15, 13, 11, 12, 14][index % 11];
    item.main_stats = vec![base(StatKind::AttackFlat, 120.0 + 10.0 * index as f64)];
    item.sub_stats = vec![base(StatKind::MainStatFlat, 60.0)];
    item.regular = Potential {
        tier: if index % 3 == 0 {
            PotentialTier::Legendary
        } else {
            PotentialTier::Unique
        },
        lines: vec![
            line(StatKind::DamagePct, 18.0),
            line(StatKind::CritRate, 6.0),
            line(StatKind::Defense, 9.0),
        ],
        pity: (index as u32 * 17) % 150,
    };
    item.bonus = Potential {
        tier: PotentialTier::Epic,
        lines: vec![
            line(StatKind::MainStatPct, 6.0),
            line(StatKind::MaxHp, 6.0),
            line(StatKind::MinDamageMult, 6.0),
        ],
        pity: (index as u32 * 7) % 60,
    };
    item
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_has_every_slot() {
        let player = PlayerSnapshot::sample();
        for slot in EquipmentSlot::ALL {
            assert!(player.item(slot).is_some(), "{slot:?}");
        }
    }

    #[test]
    fn test_snapshot_tags_origins() {
        let player = PlayerSnapshot::sample();
        let snap = player.stat_snapshot(CombatMode::Stage);
        assert!(!snap.sources_from("hat.regular").is_empty());
        assert_eq!(snap.sources_from("hero_power").len(), 6);
        assert_eq!(snap.sources_from("buff.war_cry").len(), 1);
        // World boss only active effect
        assert!(snap.sources_from("artifact.chalice.active").is_empty());
        let wb = player.stat_snapshot(CombatMode::WorldBoss);
        assert_eq!(wb.sources_from("artifact.chalice.active").len(), 1);
    }
}
