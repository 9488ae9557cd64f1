//! Stat name normalization.
//!
//! Hand-entered player files spell the same stat many ways ("dmg%",
//! "damage", "damage_percent"). Names are folded to lowercase, separators are
//! unified, and the result is matched against a fixed alias list. This runs
//! only when input is read; calculation code works with `StatKind`.

use super::types::StatKind;
use crate::error::GearError;
use std::str::FromStr;

const ALIASES: &[(&str, StatKind)] = &[
    ("main_stat", StatKind::MainStatFlat),
    ("main_stat_flat", StatKind::MainStatFlat),
    ("dex_flat", StatKind::MainStatFlat),
    ("flat_dex", StatKind::MainStatFlat),
    ("main_stat_pct", StatKind::MainStatPct),
    ("main_stat_percent", StatKind::MainStatPct),
    ("main_stat%", StatKind::MainStatPct),
    ("dex_pct", StatKind::MainStatPct),
    ("dex_percent", StatKind::MainStatPct),
    ("dex%", StatKind::MainStatPct),
    ("secondary_stat", StatKind::SecondaryStatFlat),
    ("secondary_stat_flat", StatKind::SecondaryStatFlat),
    ("str_flat", StatKind::SecondaryStatFlat),
    ("attack", StatKind::AttackFlat),
    ("attack_flat", StatKind::AttackFlat),
    ("atk", StatKind::AttackFlat),
    ("attack_pct", StatKind::AttackPct),
    ("attack_percent", StatKind::AttackPct),
    ("atk%", StatKind::AttackPct),
    ("damage", StatKind::DamagePct),
    ("damage_pct", StatKind::DamagePct),
    ("damage_percent", StatKind::DamagePct),
    ("dmg", StatKind::DamagePct),
    ("dmg%", StatKind::DamagePct),
    ("damage%", StatKind::DamagePct),
    ("boss_damage", StatKind::BossDamage),
    ("boss_dmg", StatKind::BossDamage),
    ("boss%", StatKind::BossDamage),
    ("normal_damage", StatKind::NormalDamage),
    ("normal_dmg", StatKind::NormalDamage),
    ("damage_amp", StatKind::DamageAmp),
    ("damage_amplification", StatKind::DamageAmp),
    ("final_damage", StatKind::FinalDamage),
    ("final_dmg", StatKind::FinalDamage),
    ("fd", StatKind::FinalDamage),
    ("def_pen", StatKind::DefPen),
    ("defense_pen", StatKind::DefPen),
    ("defense_penetration", StatKind::DefPen),
    ("ied", StatKind::DefPen),
    ("crit_rate", StatKind::CritRate),
    ("critical_rate", StatKind::CritRate),
    ("cr", StatKind::CritRate),
    ("crit_damage", StatKind::CritDamage),
    ("crit_dmg", StatKind::CritDamage),
    ("critical_damage", StatKind::CritDamage),
    ("cd", StatKind::CritDamage),
    ("min_dmg_mult", StatKind::MinDamageMult),
    ("min_damage", StatKind::MinDamageMult),
    ("min_damage_mult", StatKind::MinDamageMult),
    ("max_dmg_mult", StatKind::MaxDamageMult),
    ("max_damage", StatKind::MaxDamageMult),
    ("max_damage_mult", StatKind::MaxDamageMult),
    ("attack_speed", StatKind::AttackSpeed),
    ("atk_spd", StatKind::AttackSpeed),
    ("skill_cd", StatKind::SkillCooldown),
    ("skill_cooldown", StatKind::SkillCooldown),
    ("cooldown_reduction", StatKind::SkillCooldown),
    ("all_skills", StatKind::AllSkills),
    ("all_skill_level", StatKind::AllSkills),
    ("buff_duration", StatKind::BuffDuration),
    ("ba_targets", StatKind::BaTargets),
    ("basic_attack_targets", StatKind::BaTargets),
    ("main_stat_per_level", StatKind::MainStatPerLevel),
    ("stat_per_level", StatKind::MainStatPerLevel),
    ("defense", StatKind::Defense),
    ("def", StatKind::Defense),
    ("max_hp", StatKind::MaxHp),
    ("hp", StatKind::MaxHp),
    ("max_mp", StatKind::MaxMp),
    ("mp", StatKind::MaxMp),
];

/// Lowercase, trim, and collapse spaces and dashes into underscores.
pub fn normalize_stat_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

pub fn parse_stat_kind(raw: &str) -> Result<StatKind, GearError> {
    let key = normalize_stat_name(raw);
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| GearError::UnknownStat(raw.to_string()))
}

impl FromStr for StatKind {
    type Err = GearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_stat_kind(s)
    }
}

impl TryFrom<String> for StatKind {
    type Error = GearError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_stat_kind(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_canonical_name_parses_to_itself() {
        for kind in StatKind::ALL {
            assert_eq!(parse_stat_kind(kind.canonical_name()).ok(), Some(kind));
        }
    }

    #[test]
    fn test_damage_aliases() {
        for raw in ["damage", "dmg%", "Damage Percent", "damage_pct", " DMG "] {
            assert_eq!(parse_stat_kind(raw).ok(), Some(StatKind::DamagePct), "{raw}");
        }
    }

    #[test]
    fn test_unknown_alias_is_error() {
        assert!(matches!(
            parse_stat_kind("luck_of_the_draw"),
            Err(GearError::UnknownStat(_))
        ));
    }
}
