use anyhow::{anyhow, bail, Context};
use gearcalc::build_info;
use gearcalc::combat::CombatMode;
use gearcalc::config::AppConfig;
use gearcalc::cubes::expected_cost_for_tier_range;
use gearcalc::dps::DpsModel;
use gearcalc::items::PotentialKind;
use gearcalc::optimizer::{plan_hero_locks, plan_within_budget, rank_candidates, RankingReport};
use gearcalc::player::{load_player, player_save_path, save_player, PlayerSnapshot};
use gearcalc::starforce::{analyze_all_strategies, optimal_strategy_table, stage_range};
use gearcalc::tiers::{remaining_rolls, tier_up_within, PotentialTier, PITY_NONE};
use gearcalc::timing::{buff_uptime, triggers};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Gearcalc - DPS and upgrade cost calculator\n\
\n\
Usage: gearcalc [--config FILE] <command> [options]\n\
\n\
Commands:\n\
\x20 rank        Rank upgrades by DPS gained per 1000 diamonds, with cube\n\
\x20             odds and a hero power lock plan\n\
\x20             --player FILE  --mode stage|boss|world_boss  --budget N  --top N  --json\n\
\x20 dps         Show the DPS breakdown per combat mode\n\
\x20             --player FILE  --mode MODE\n\
\x20 starforce   Expected cost of a starforce climb under each protection strategy\n\
\x20             --from N  --to N  | --table\n\
\x20 cube        Expected diamonds to tier up a potential\n\
\x20             --kind regular|bonus  --from TIER  --to TIER\n\
\x20 pity        Expected rolls to a tier-up with a pity cap\n\
\x20             --rate R  --pity N  --counter C  --within N\n\
\x20 triggers    Activations and uptime of a cooldown buff\n\
\x20             --cooldown S  --duration S  --fight S\n\
\x20 init-player Write a sample player file to edit\n\
\x20             --output FILE  --force\n\
\x20 --version   Show version information\n\
\x20 --help      Show this help message";

/// Flags following the subcommand, in the order given.
struct Flags {
    args: Vec<String>,
}

impl Flags {
    fn value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    fn has(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    fn parse<T>(&self, flag: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.value(flag) {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e| anyhow!("{flag} {raw}: {e}")),
            None => Ok(None),
        }
    }

    fn require<T>(&self, flag: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.parse(flag)?.ok_or_else(|| anyhow!("missing {flag}"))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let mut config_path = None;
    if let Some(i) = args.iter().position(|a| a == "--config") {
        if i + 1 >= args.len() {
            bail!("--config requires a path");
        }
        config_path = Some(PathBuf::from(args.remove(i + 1)));
        args.remove(i);
    }

    let Some(command) = args.first().cloned() else {
        println!("{USAGE}");
        return Ok(());
    };
    let flags = Flags {
        args: args[1..].to_vec(),
    };

    match command.as_str() {
        "--version" | "-v" => {
            println!(
                "gearcalc {} ({} {})",
                env!("CARGO_PKG_VERSION"),
                build_info::BUILD_DATE,
                build_info::BUILD_COMMIT
            );
            Ok(())
        }
        "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        "init-player" => init_player(&flags),
        "pity" => pity(&flags),
        "triggers" => trigger_count(&flags),
        other => {
            let config = AppConfig::load(config_path.as_deref()).context("loading config")?;
            match other {
                "rank" => rank(&flags, &config),
                "dps" => dps(&flags, &config),
                "starforce" => starforce(&flags, &config),
                "cube" => cube(&flags, &config),
                _ => bail!("unknown command: {other}\nRun 'gearcalc --help' for usage."),
            }
        }
    }
}

fn player_from(flags: &Flags) -> anyhow::Result<PlayerSnapshot> {
    let path = match flags.value("--player") {
        Some(p) => PathBuf::from(p),
        None => player_save_path()?,
    };
    load_player(&path).with_context(|| format!("reading player file {}", path.display()))
}

fn rank(flags: &Flags, config: &AppConfig) -> anyhow::Result<()> {
    let player = player_from(flags)?;
    let mode: CombatMode = flags.parse("--mode")?.unwrap_or(CombatMode::Stage);
    let top: usize = flags.parse("--top")?.unwrap_or(15);

    tracing::info!(player = %player.name, mode = mode.name(), "ranking upgrades");
    let candidates = rank_candidates(&player, mode, config);
    let budget = flags
        .parse::<f64>("--budget")?
        .map(|b| plan_within_budget(&candidates, b));
    let mut report = RankingReport::new(player.name.clone(), mode, candidates, budget);
    if !player.hero_power.lines.is_empty() {
        report = report.with_hero_locks(plan_hero_locks(&player, mode, config));
    }

    if flags.has("--json") {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text(top));
    }
    Ok(())
}

fn dps(flags: &Flags, config: &AppConfig) -> anyhow::Result<()> {
    let player = player_from(flags)?;
    let modes: Vec<CombatMode> = match flags.parse::<CombatMode>("--mode")? {
        Some(mode) => vec![mode],
        None => CombatMode::ALL.to_vec(),
    };
    println!("Player: {}", player.name);
    println!();
    println!(
        "  {:<11} {:>14} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Mode", "DPS", "Stat", "Dmg", "FD", "Crit", "Def"
    );
    for mode in modes {
        let snapshot = player.stat_snapshot(mode);
        let b = config.dps.calculate(&snapshot, &mode.scenario());
        println!(
            "  {:<11} {:>14.0} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {:>8.3}",
            mode.display_name(),
            b.total,
            b.stat_mult,
            b.damage_mult,
            b.fd_mult,
            b.crit_mult,
            b.def_mult
        );
    }
    Ok(())
}

fn starforce(flags: &Flags, config: &AppConfig) -> anyhow::Result<()> {
    if flags.has("--table") {
        let table = optimal_strategy_table(&config.currency, &config.solver);
        println!("  Stage  Strategy   Cost to reach    P(survive)");
        for (stage, strategy) in &table.strategies {
            let target = stage + 1;
            println!(
                "  {:>2}->{:<2} {:<10} {:>14.0}    {:>6.2}%",
                stage,
                target,
                strategy.name(),
                table.cost_to.get(&target).copied().unwrap_or(f64::INFINITY),
                table.prob_to.get(&target).copied().unwrap_or(0.0) * 100.0
            );
        }
        return Ok(());
    }

    let from: u8 = flags.require("--from")?;
    let to: u8 = flags.require("--to")?;
    let stages = stage_range(from, to)?;
    let analysis = analyze_all_strategies(stages, &config.currency, &config.solver);

    println!("Starforce {from} -> {to}");
    println!();
    println!("  Strategy   Total cost     P(success)  Destructions  Attempts");
    for (strategy, p) in &analysis.projections {
        let marker = if *strategy == analysis.best { "*" } else { " " };
        println!(
            "{} {:<10} {:>12.0}   {:>8.2}%   {:>10.3}   {:>8.1}",
            marker,
            strategy.name(),
            p.expected_total_cost,
            p.p_success * 100.0,
            p.expected_destructions,
            p.expected_attempts
        );
    }
    println!();
    println!(
        "Best: {} ({:.1}% cheaper than no protection)",
        analysis.best.name(),
        analysis.savings_pct
    );
    Ok(())
}

fn cube(flags: &Flags, config: &AppConfig) -> anyhow::Result<()> {
    let kind = match flags.value("--kind").unwrap_or("regular") {
        "regular" => PotentialKind::Regular,
        "bonus" => PotentialKind::Bonus,
        other => bail!("unknown potential kind: {other}"),
    };
    let from: PotentialTier = flags.require("--from")?;
    let to: PotentialTier = flags.require("--to")?;
    let cost = expected_cost_for_tier_range(kind, from, to, &config.currency);
    let cubes = cost / kind.cube_price(&config.currency);
    println!(
        "{} {} -> {}: {:.1} cubes, {:.0} diamonds",
        kind.name(),
        from.name(),
        to.name(),
        cubes,
        cost
    );
    Ok(())
}

fn pity(flags: &Flags) -> anyhow::Result<()> {
    let rate: f64 = flags.require("--rate")?;
    let cap: u32 = flags.parse("--pity")?.unwrap_or(PITY_NONE);
    let counter: u32 = flags.parse("--counter")?.unwrap_or(0);
    println!("Expected rolls:   {:.2}", remaining_rolls(rate, cap, counter));
    if rate > 0.0 {
        println!("Without pity:     {:.2}", 1.0 / rate);
    }
    if let Some(within) = flags.parse::<u32>("--within")? {
        let left = cap.saturating_sub(counter).max(1);
        println!(
            "P(within {within}):   {:.2}%",
            tier_up_within(rate, left, within) * 100.0
        );
    }
    Ok(())
}

fn trigger_count(flags: &Flags) -> anyhow::Result<()> {
    let cooldown: f64 = flags.require("--cooldown")?;
    let duration: f64 = flags.require("--duration")?;
    let fight: f64 = flags.parse("--fight")?.unwrap_or(60.0);
    println!("Triggers: {:.3}", triggers(cooldown, duration, fight));
    println!("Uptime:   {:.2}%", buff_uptime(cooldown, duration, fight) * 100.0);
    Ok(())
}

fn init_player(flags: &Flags) -> anyhow::Result<()> {
    let path = match flags.value("--output") {
        Some(p) => PathBuf::from(p),
        None => player_save_path()?,
    };
    if path.exists() && !flags.has("--force") {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    save_player(&PlayerSnapshot::sample(), &path)?;
    tracing::info!(path = %path.display(), "wrote sample player");
    Ok(())
}
