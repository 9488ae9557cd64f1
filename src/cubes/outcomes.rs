//! Probability distributions over the lines a single cube can produce.
//!
//! Lines that cannot change damage (defense, HP, MP, other classes' main
//! stats) collapse into one dead outcome, and rolls are merged by their
//! sorted line contents, which keeps the outcome space small enough to
//! enumerate for most slots.

use super::tables::{
    off_class_weight, pool_total_weight, potential_pool, special_potential, yellow_rate,
    LINES_PER_POTENTIAL, SPECIAL_POTENTIAL_RATE,
};
use crate::config::OptimizerConfig;
use crate::items::{EquipmentSlot, PotentialLine};
use crate::stats::StatKind;
use crate::tiers::PotentialTier;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// One possible result for a single line. `None` is a line with no effect
/// on damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOption {
    pub line: Option<PotentialLine>,
    pub probability: f64,
}

/// A set of rolled lines with its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct RolledLines {
    pub lines: Vec<PotentialLine>,
    pub probability: f64,
}

/// Add `probability` to the option for `line`, merging equal lines and
/// collapsing lines that cannot change damage into the dead option.
pub fn push_option(options: &mut Vec<LineOption>, line: Option<PotentialLine>, probability: f64) {
    if probability <= 0.0 {
        return;
    }
    let line = line.filter(|l| l.kind.affects_dps());
    match options.iter_mut().find(|o| o.line == line) {
        Some(existing) => existing.probability += probability,
        None => options.push(LineOption { line, probability }),
    }
}

fn push_pool(options: &mut Vec<LineOption>, tier: PotentialTier, weight: f64) {
    let total = pool_total_weight(tier);
    if total <= 0.0 {
        return;
    }
    for entry in potential_pool(tier) {
        let line = PotentialLine {
            kind: entry.kind,
            value: entry.value,
        };
        push_option(options, Some(line), weight * entry.probability / total);
    }
    push_option(options, None, weight * off_class_weight(tier) / total);
}

/// Distribution of line `line` (1-based) on a potential at `tier`.
///
/// A yellow line rolls from `tier` and may hit the slot special; a grey line
/// rolls from the tier below (or `tier` itself at the bottom).
pub fn line_distribution(slot: EquipmentSlot, tier: PotentialTier, line: usize) -> Vec<LineOption> {
    let yellow = yellow_rate(line);
    let grey_tier = tier.prev().unwrap_or(tier);
    let mut options = Vec::new();

    match special_potential(slot, tier) {
        Some(special) => {
            push_option(&mut options, Some(special), yellow * SPECIAL_POTENTIAL_RATE);
            push_pool(&mut options, tier, yellow * (1.0 - SPECIAL_POTENTIAL_RATE));
        }
        None => push_pool(&mut options, tier, yellow),
    }
    push_pool(&mut options, grey_tier, 1.0 - yellow);
    options
}

pub fn potential_distributions(slot: EquipmentSlot, tier: PotentialTier) -> Vec<Vec<LineOption>> {
    (1..=LINES_PER_POTENTIAL)
        .map(|line| line_distribution(slot, tier, line))
        .collect()
}

/// Number of raw line combinations before merging.
pub fn outcome_space_size(dists: &[Vec<LineOption>]) -> usize {
    dists.iter().fold(1usize, |acc, d| acc.saturating_mul(d.len()))
}

type RollKey = Vec<(StatKind, u64)>;

fn roll_key(lines: &[PotentialLine]) -> RollKey {
    let mut key: RollKey = lines.iter().map(|l| (l.kind, l.value.to_bits())).collect();
    key.sort();
    key
}

fn merge_rolls(rolls: impl IntoIterator<Item = RolledLines>) -> Vec<RolledLines> {
    let mut merged: BTreeMap<RollKey, RolledLines> = BTreeMap::new();
    for roll in rolls {
        merged
            .entry(roll_key(&roll.lines))
            .and_modify(|r| r.probability += roll.probability)
            .or_insert(roll);
    }
    merged.into_values().collect()
}

/// Every combination of line options, merged by content.
pub fn enumerate_rolls(dists: &[Vec<LineOption>]) -> Vec<RolledLines> {
    let mut partial = vec![RolledLines {
        lines: Vec::new(),
        probability: 1.0,
    }];
    for dist in dists {
        let mut next = Vec::with_capacity(partial.len() * dist.len());
        for roll in &partial {
            for option in dist {
                let mut lines = roll.lines.clone();
                lines.extend(option.line);
                next.push(RolledLines {
                    lines,
                    probability: roll.probability * option.probability,
                });
            }
        }
        partial = merge_rolls(next);
    }
    partial
}

fn pick<R: Rng>(dist: &[LineOption], rng: &mut R) -> Option<PotentialLine> {
    let total: f64 = dist.iter().map(|o| o.probability).sum();
    let roll = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for option in dist {
        cumulative += option.probability;
        if roll < cumulative {
            return option.line;
        }
    }
    dist.last().and_then(|o| o.line)
}

/// `samples` independent rolls, each weighted `1 / samples`.
pub fn sample_rolls<R: Rng>(
    dists: &[Vec<LineOption>],
    samples: u32,
    rng: &mut R,
) -> Vec<RolledLines> {
    let weight = 1.0 / samples.max(1) as f64;
    merge_rolls((0..samples).map(|_| RolledLines {
        lines: dists.iter().filter_map(|d| pick(d, rng)).collect(),
        probability: weight,
    }))
}

/// Joint distribution of independent lines, exact when the raw space is at
/// most `max_exhaustive_outcomes` and sampled with the configured seed
/// otherwise.
pub fn lines_distribution(dists: &[Vec<LineOption>], config: &OptimizerConfig) -> Vec<RolledLines> {
    let size = outcome_space_size(dists);
    if size <= config.max_exhaustive_outcomes {
        return enumerate_rolls(dists);
    }
    tracing::debug!(
        size,
        samples = config.monte_carlo_samples,
        "outcome space too large, sampling"
    );
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    sample_rolls(dists, config.monte_carlo_samples, &mut rng)
}

/// Distribution of one cube's result on a potential at `tier`.
pub fn roll_distribution(
    slot: EquipmentSlot,
    tier: PotentialTier,
    config: &OptimizerConfig,
) -> Vec<RolledLines> {
    lines_distribution(&potential_distributions(slot, tier), config)
}
