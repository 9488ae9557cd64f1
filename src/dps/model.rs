use crate::combat::CombatScenario;
use crate::stats::{
    stack_additive, stack_attack_speed, stack_final_damage, stack_penetration, StatKind,
    StatSnapshot,
};
use crate::timing::{casts_per_second, effective_uptime_bonus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BASE_MIN_DMG: f64 = 60.0;
pub const BASE_MAX_DMG: f64 = 100.0;
pub const BASE_CRIT_DMG: f64 = 30.0;

/// Damage estimate with the multipliers that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DpsBreakdown {
    pub total: f64,
    pub attack: f64,
    pub stat_mult: f64,
    pub damage_mult: f64,
    pub amp_mult: f64,
    pub fd_mult: f64,
    pub crit_mult: f64,
    pub def_mult: f64,
    pub range_mult: f64,
    pub speed_mult: f64,
    /// Effective defense penetration after stacking, in percent
    pub def_pen: f64,
    /// Effective attack speed after diminishing returns, in percent
    pub attack_speed: f64,
}

/// Pure function from stats and scenario to DPS.
///
/// Implementations must be deterministic and side-effect free: the ranker
/// calls them many times with synthetic snapshots.
pub trait DpsModel {
    fn calculate(&self, snapshot: &StatSnapshot, scenario: &CombatScenario) -> DpsBreakdown;

    fn total(&self, snapshot: &StatSnapshot, scenario: &CombatScenario) -> f64 {
        self.calculate(snapshot, scenario).total
    }
}

/// The master damage formula:
/// attack x stat x damage x amp x final damage x crit x defense x range x speed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardDpsModel {
    pub character_level: u32,
    /// Final damage granted per level of +All Skills
    pub fd_per_all_skill: f64,
    /// Final damage granted per extra basic attack target
    pub fd_per_ba_target: f64,
}

impl Default for StandardDpsModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardDpsModel {
    pub fn new() -> Self {
        Self {
            character_level: 100,
            fd_per_all_skill: 0.4,
            fd_per_ba_target: 3.0,
        }
    }

    pub fn with_level(character_level: u32) -> Self {
        Self {
            character_level,
            ..Self::new()
        }
    }

    /// Collect per-kind values, scaling windowed sources by their uptime.
    fn gather(
        &self,
        snapshot: &StatSnapshot,
        scenario: &CombatScenario,
    ) -> BTreeMap<StatKind, Vec<f64>> {
        let cd_reduction = stack_additive(&values(snapshot, StatKind::SkillCooldown));
        let duration_bonus = stack_additive(&values(snapshot, StatKind::BuffDuration));

        let mut gathered: BTreeMap<StatKind, Vec<f64>> = BTreeMap::new();
        for source in &snapshot.sources {
            let value = match source.window {
                Some(window) => {
                    let cooldown = (window.cooldown - cd_reduction).max(0.0);
                    let duration = window.duration * (1.0 + duration_bonus / 100.0);
                    let fight = scenario.fight_duration;
                    effective_uptime_bonus(source.value, cooldown, duration, fight)
                }
                None => source.value,
            };
            gathered.entry(source.kind).or_default().push(value);
        }
        gathered
    }
}

fn slice_of(gathered: &BTreeMap<StatKind, Vec<f64>>, kind: StatKind) -> &[f64] {
    gathered.get(&kind).map_or(&[], |v| v.as_slice())
}

fn values(snapshot: &StatSnapshot, kind: StatKind) -> Vec<f64> {
    snapshot.values_of(kind).map(|s| s.value).collect()
}

impl DpsModel for StandardDpsModel {
    fn calculate(&self, snapshot: &StatSnapshot, scenario: &CombatScenario) -> DpsBreakdown {
        let gathered = self.gather(snapshot, scenario);
        let get = |kind: StatKind| slice_of(&gathered, kind);
        let sum = |kind: StatKind| stack_additive(slice_of(&gathered, kind));

        let per_level = sum(StatKind::MainStatPerLevel) * self.character_level as f64;
        let main_flat = sum(StatKind::MainStatFlat) + per_level;
        let total_main = main_flat * (1.0 + sum(StatKind::MainStatPct) / 100.0);
        let stat_pct = total_main * 0.01 + sum(StatKind::SecondaryStatFlat) * 0.0025;
        let stat_mult = 1.0 + stat_pct / 100.0;

        let attack = sum(StatKind::AttackFlat).max(0.0) * (1.0 + sum(StatKind::AttackPct) / 100.0);

        let damage_pct = sum(StatKind::DamagePct);
        let vs_mobs = 1.0 + (damage_pct + sum(StatKind::NormalDamage)) / 100.0;
        let vs_boss = 1.0 + (damage_pct + sum(StatKind::BossDamage)) / 100.0;
        let damage_mult = scenario.mob_weight * vs_mobs + scenario.boss_weight * vs_boss;

        let amp_mult = 1.0 + sum(StatKind::DamageAmp) / 100.0;

        let mut fd_sources = get(StatKind::FinalDamage).to_vec();
        let all_skills = sum(StatKind::AllSkills);
        if all_skills > 0.0 {
            fd_sources.push(all_skills * self.fd_per_all_skill);
        }
        let ba_targets = sum(StatKind::BaTargets);
        if ba_targets > 0.0 {
            fd_sources.push(ba_targets * self.fd_per_ba_target);
        }
        let fd_mult = 1.0 + stack_final_damage(&fd_sources) / 100.0;

        let crit_rate = (sum(StatKind::CritRate) / 100.0).clamp(0.0, 1.0);
        let crit_mult = 1.0 + crit_rate * (BASE_CRIT_DMG + sum(StatKind::CritDamage)) / 100.0;

        let def_pen = stack_penetration(get(StatKind::DefPen));
        let def_mult = 1.0 / (1.0 + scenario.enemy_defense * (1.0 - def_pen / 100.0));

        let final_min = BASE_MIN_DMG + sum(StatKind::MinDamageMult);
        let final_max = BASE_MAX_DMG + sum(StatKind::MaxDamageMult);
        let range_mult = (final_min + final_max) / 2.0 / 100.0;

        let attack_speed = stack_attack_speed(get(StatKind::AttackSpeed));
        let speed_mult = casts_per_second(1.0, attack_speed);

        let total = attack
            * stat_mult
            * damage_mult
            * amp_mult
            * fd_mult
            * crit_mult
            * def_mult
            * range_mult
            * speed_mult;

        DpsBreakdown {
            total,
            attack,
            stat_mult,
            damage_mult,
            amp_mult,
            fd_mult,
            crit_mult,
            def_mult,
            range_mult,
            speed_mult,
            def_pen,
            attack_speed,
        }
    }
}
