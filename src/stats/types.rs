use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Every stat the calculator understands. Each kind has exactly one
/// canonical name; aliases are resolved once when input is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatKind {
    MainStatFlat,
    MainStatPct,
    SecondaryStatFlat,
    AttackFlat,
    AttackPct,
    DamagePct,
    BossDamage,
    NormalDamage,
    DamageAmp,
    FinalDamage,
    DefPen,
    CritRate,
    CritDamage,
    MinDamageMult,
    MaxDamageMult,
    AttackSpeed,
    SkillCooldown,
    AllSkills,
    BuffDuration,
    BaTargets,
    MainStatPerLevel,
    Defense,
    MaxHp,
    MaxMp,
}

/// How multiple sources of the same stat combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stacking {
    /// Sources sum together
    Additive,
    /// (1 + a)(1 + b)... - 1
    Multiplicative,
    /// 1 - (1 - a)(1 - b)...
    Penetration,
    /// Diminishing returns toward a hard cap
    Diminishing,
}

impl StatKind {
    pub const ALL: [StatKind; 24] = [
        StatKind::MainStatFlat,
        StatKind::MainStatPct,
        StatKind::SecondaryStatFlat,
        StatKind::AttackFlat,
        StatKind::AttackPct,
        StatKind::DamagePct,
        StatKind::BossDamage,
        StatKind::NormalDamage,
        StatKind::DamageAmp,
        StatKind::FinalDamage,
        StatKind::DefPen,
        StatKind::CritRate,
        StatKind::CritDamage,
        StatKind::MinDamageMult,
        StatKind::MaxDamageMult,
        StatKind::AttackSpeed,
        StatKind::SkillCooldown,
        StatKind::AllSkills,
        StatKind::BuffDuration,
        StatKind::BaTargets,
        StatKind::MainStatPerLevel,
        StatKind::Defense,
        StatKind::MaxHp,
        StatKind::MaxMp,
    ];

    pub fn canonical_name(self) -> &'static str {
        match self {
            StatKind::MainStatFlat => "main_stat_flat",
            StatKind::MainStatPct => "main_stat_pct",
            StatKind::SecondaryStatFlat => "secondary_stat_flat",
            StatKind::AttackFlat => "attack_flat",
            StatKind::AttackPct => "attack_pct",
            StatKind::DamagePct => "damage_pct",
            StatKind::BossDamage => "boss_damage",
            StatKind::NormalDamage => "normal_damage",
            StatKind::DamageAmp => "damage_amp",
            StatKind::FinalDamage => "final_damage",
            StatKind::DefPen => "def_pen",
            StatKind::CritRate => "crit_rate",
            StatKind::CritDamage => "crit_damage",
            StatKind::MinDamageMult => "min_dmg_mult",
            StatKind::MaxDamageMult => "max_dmg_mult",
            StatKind::AttackSpeed => "attack_speed",
            StatKind::SkillCooldown => "skill_cd",
            StatKind::AllSkills => "all_skills",
            StatKind::BuffDuration => "buff_duration",
            StatKind::BaTargets => "ba_targets",
            StatKind::MainStatPerLevel => "main_stat_per_level",
            StatKind::Defense => "defense",
            StatKind::MaxHp => "max_hp",
            StatKind::MaxMp => "max_mp",
        }
    }

    pub fn stacking(self) -> Stacking {
        match self {
            StatKind::FinalDamage => Stacking::Multiplicative,
            StatKind::DefPen => Stacking::Penetration,
            StatKind::AttackSpeed => Stacking::Diminishing,
            _ => Stacking::Additive,
        }
    }

    /// Defensive stats roll on potentials but never change damage output.
    pub fn affects_dps(self) -> bool {
        !matches!(self, StatKind::Defense | StatKind::MaxHp | StatKind::MaxMp)
    }
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl From<StatKind> for String {
    fn from(kind: StatKind) -> Self {
        kind.canonical_name().to_string()
    }
}

/// Periodic activation window for a conditional stat source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuffWindow {
    pub cooldown: f64,
    pub duration: f64,
}

/// One contribution to a stat, tagged with where it came from.
///
/// Origins are dotted paths such as `hat.potential.1` or `hero_power.3`, so an
/// upgrade axis can be removed or replaced without touching anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSource {
    pub origin: String,
    pub kind: StatKind,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<BuffWindow>,
}

impl StatSource {
    pub fn new(origin: impl Into<String>, kind: StatKind, value: f64) -> Self {
        Self {
            origin: origin.into(),
            kind,
            value,
            window: None,
        }
    }

    pub fn with_window(mut self, cooldown: f64, duration: f64) -> Self {
        self.window = Some(BuffWindow { cooldown, duration });
        self
    }
}

/// A full set of stat sources fed to the DPS model. Cheap to clone and
/// perturb; the ranker builds many variants of one player's snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub sources: Vec<StatSource>,
}

impl StatSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: StatSource) {
        self.sources.push(source);
    }

    pub fn add(&mut self, origin: impl Into<String>, kind: StatKind, value: f64) {
        self.sources.push(StatSource::new(origin, kind, value));
    }

    /// Sources of one kind, in insertion order.
    pub fn values_of(&self, kind: StatKind) -> impl Iterator<Item = &StatSource> {
        self.sources.iter().filter(move |s| s.kind == kind)
    }

    /// Copy of this snapshot without any source whose origin equals `prefix`
    /// or starts with `prefix.`.
    pub fn without_origin(&self, prefix: &str) -> StatSnapshot {
        StatSnapshot {
            sources: self
                .sources
                .iter()
                .filter(|s| !origin_matches(&s.origin, prefix))
                .cloned()
                .collect(),
        }
    }

    /// Copy with the `prefix` axis replaced by `replacement` sources.
    pub fn with_replaced(&self, prefix: &str, replacement: &[StatSource]) -> StatSnapshot {
        let mut next = self.without_origin(prefix);
        next.sources.extend_from_slice(replacement);
        next
    }

    pub fn sources_from(&self, prefix: &str) -> Vec<StatSource> {
        self.sources
            .iter()
            .filter(|s| origin_matches(&s.origin, prefix))
            .cloned()
            .collect()
    }

    /// Order-independent content hash, used as a memo key.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut entries: Vec<(StatKind, u64, Option<(u64, u64)>)> = self
            .sources
            .iter()
            .filter(|s| s.value != 0.0)
            .map(|s| {
                (
                    s.kind,
                    s.value.to_bits(),
                    s.window.map(|w| (w.cooldown.to_bits(), w.duration.to_bits())),
                )
            })
            .collect();
        entries.sort();

        let mut hasher = Sha256::new();
        for (kind, value, window) in entries {
            hasher.update(kind.canonical_name().as_bytes());
            hasher.update(value.to_le_bytes());
            if let Some((cd, dur)) = window {
                hasher.update(cd.to_le_bytes());
                hasher.update(dur.to_le_bytes());
            }
            hasher.update([0u8]);
        }
        hasher.finalize().into()
    }
}

fn origin_matches(origin: &str, prefix: &str) -> bool {
    origin == prefix
        || (origin.len() > prefix.len()
            && origin.starts_with(prefix)
            && origin.as_bytes()[prefix.len()] == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_origin_matches_whole_segments() {
        let mut snap = StatSnapshot::new();
        snap.add("hat.potential.1", StatKind::DamagePct, 10.0);
        snap.add("hat.potential.2", StatKind::CritRate, 5.0);
        snap.add("hatband", StatKind::DamagePct, 3.0);
        snap.add("hat", StatKind::AttackFlat, 100.0);

        let stripped = snap.without_origin("hat");
        assert_eq!(stripped.sources.len(), 1);
        assert_eq!(stripped.sources[0].origin, "hatband");

        let one_line = snap.without_origin("hat.potential.1");
        assert_eq!(one_line.sources.len(), 3);
    }

    #[test]
    fn test_fingerprint_ignores_order_and_origin() {
        let mut a = StatSnapshot::new();
        a.add("x", StatKind::DamagePct, 10.0);
        a.add("y", StatKind::CritRate, 5.0);
        let mut b = StatSnapshot::new();
        b.add("z", StatKind::CritRate, 5.0);
        b.add("w", StatKind::DamagePct, 10.0);
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.add("w", StatKind::DamagePct, 1.0);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_stacking_rules() {
        assert_eq!(StatKind::FinalDamage.stacking(), Stacking::Multiplicative);
        assert_eq!(StatKind::DefPen.stacking(), Stacking::Penetration);
        assert_eq!(StatKind::AttackSpeed.stacking(), Stacking::Diminishing);
        assert_eq!(StatKind::DamagePct.stacking(), Stacking::Additive);
        assert!(!StatKind::MaxHp.affects_dps());
    }
}
