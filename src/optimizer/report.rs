//! Printable ranking report.

use super::budget::BudgetPlan;
use super::candidate::UpgradeCandidate;
use super::hero_lock::LockPlan;
use crate::combat::CombatMode;
use crate::error::Result;
use chrono::{TimeZone, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    /// Unix seconds
    pub generated_at: i64,
    pub player: String,
    pub mode: CombatMode,
    pub current_dps: f64,
    pub candidates: Vec<UpgradeCandidate>,
    pub budget: Option<BudgetPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_locks: Option<LockPlan>,
}

fn format_cubes(cubes: f64) -> String {
    if cubes.is_finite() {
        format!("{:.0}", cubes)
    } else {
        "-".to_string()
    }
}

fn format_cost(cost: f64) -> String {
    if !cost.is_finite() {
        "never".to_string()
    } else if cost >= 1_000_000.0 {
        format!("{:.2}M", cost / 1_000_000.0)
    } else if cost >= 10_000.0 {
        format!("{:.1}k", cost / 1000.0)
    } else {
        format!("{:.0}", cost)
    }
}

impl RankingReport {
    pub fn new(
        player: impl Into<String>,
        mode: CombatMode,
        candidates: Vec<UpgradeCandidate>,
        budget: Option<BudgetPlan>,
    ) -> Self {
        let current_dps = candidates.first().map_or(0.0, |c| c.current_dps);
        Self {
            generated_at: Utc::now().timestamp(),
            player: player.into(),
            mode,
            current_dps,
            candidates,
            budget,
            hero_locks: None,
        }
    }

    pub fn with_hero_locks(mut self, plan: LockPlan) -> Self {
        self.hero_locks = Some(plan);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Text table of the top `limit` candidates.
    pub fn to_text(&self, limit: usize) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    UPGRADE RANKING\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        let generated = Utc
            .timestamp_opt(self.generated_at, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_default();
        report.push_str(&format!("  Player:   {}\n", self.player));
        report.push_str(&format!("  Mode:     {}\n", self.mode.display_name()));
        report.push_str(&format!("  DPS:      {:.0}\n", self.current_dps));
        report.push_str(&format!("  Computed: {}\n\n", generated));

        if self.candidates.iter().any(|c| c.unreliable) {
            report.push_str("  ! Some baselines are zero; percentages may be meaningless\n\n");
        }

        report.push_str("── CANDIDATES ───────────────────────────────────────────────────\n");
        report.push_str("   #  Action                               Gain%   Cost      Eff    P(up)\n");
        report.push_str("  ──  ───────────────────────────────────  ──────  ────────  ─────  ─────\n");
        for (i, c) in self.candidates.iter().take(limit).enumerate() {
            report.push_str(&format!(
                "  {:2}  {:<35}  {:6.2}  {:>8}  {:5.2}  {:4.0}%\n",
                i + 1,
                c.action.to_string(),
                c.expected_dps_gain_pct,
                format_cost(c.expected_cost_diamonds),
                c.efficiency,
                c.p_improve * 100.0
            ));
        }
        report.push('\n');

        let cubes: Vec<_> = self
            .candidates
            .iter()
            .take(limit)
            .filter_map(|c| c.cube_metrics.as_ref().map(|m| (c, m)))
            .collect();
        if !cubes.is_empty() {
            report.push_str("── CUBE OUTLOOK ─────────────────────────────────────────────────\n");
            report.push_str("  Action                               50%   70%   85%  P(10)  P(50)  Tier-up\n");
            for (c, m) in cubes {
                report.push_str(&format!(
                    "  {:<35} {:>5} {:>5} {:>5}  {:4.0}%  {:4.0}%  {:>7}\n",
                    c.action.to_string(),
                    format_cubes(m.cubes_to_50pct_best),
                    format_cubes(m.cubes_to_70pct_best),
                    format_cubes(m.cubes_to_85pct_best),
                    m.p_improve_10_cubes * 100.0,
                    m.p_improve_50_cubes * 100.0,
                    format_cubes(m.cubes_to_tier_up)
                ));
            }
            report.push('\n');
        }

        if let Some(plan) = self.hero_locks.as_ref().filter(|p| !p.lines.is_empty()) {
            report.push_str("── HERO POWER LOCKS ─────────────────────────────────────────────\n");
            for advice in &plan.lines {
                report.push_str(&format!(
                    "  Line {}  {:<6}  value {:6.2}%  P(better) {:4.0}%  {:>4} medals\n",
                    advice.line,
                    advice.decision.name(),
                    advice.value_pct,
                    advice.p_better * 100.0,
                    advice.medals_per_reroll
                ));
            }
            report.push_str(&format!(
                "  Rerolls:    {:.1} at {} medals  ({})\n\n",
                plan.expected_rerolls,
                plan.medals_per_reroll,
                format_cost(plan.expected_cost_diamonds)
            ));
        }

        if let Some(plan) = &self.budget {
            report.push_str("── BUDGET PLAN ──────────────────────────────────────────────────\n");
            report.push_str(&format!("  Budget:     {}\n", format_cost(plan.budget)));
            for pick in &plan.picks {
                report.push_str(&format!(
                    "  - {:<35} {:>8}  +{:.2}%\n",
                    pick.action.to_string(),
                    format_cost(pick.expected_cost_diamonds),
                    pick.expected_dps_gain_pct
                ));
            }
            report.push_str(&format!(
                "  Spent:      {}  Left: {}\n",
                format_cost(plan.total_cost),
                format_cost(plan.remaining)
            ));
            report.push_str(&format!("  Est. gain:  +{:.2}%\n\n", plan.total_gain_pct));
        }

        report
    }
}
