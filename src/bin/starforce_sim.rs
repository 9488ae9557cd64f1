//! Starforce Monte Carlo simulator
//!
//! Plays out seeded enhancement climbs and prints them next to the Markov
//! projection for the same range and strategy.
//!
//! Usage:
//!   cargo run --bin starforce_sim -- [OPTIONS]
//!
//! Options:
//!   --from N        Starting star (default: 15)
//!   --to N          Target star (default: 20)
//!   --runs N        Number of climbs (default: 10000)
//!   --seed N        RNG seed (default: 42)
//!   --strategy S    none | decrease | destroy | both | optimal (default: none)
//!   --config FILE   Config file with currency rates
//!   --quiet         Only the final summary line

use gearcalc::config::AppConfig;
use gearcalc::starforce::{
    optimal_strategy_table, project_cost, run_climbs, stage_range, ClimbConfig, ProtectionStrategy,
    StrategyPlan,
};
use std::path::PathBuf;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimArgs {
    from: u8,
    to: u8,
    runs: u32,
    seed: u64,
    strategy: Option<ProtectionStrategy>,
    config: Option<PathBuf>,
    quiet: bool,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            from: 15,
            to: 20,
            runs: 10_000,
            seed: 42,
            strategy: Some(ProtectionStrategy::None),
            config: None,
            quiet: false,
        }
    }
}

fn next_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> anyhow::Result<T> {
    args.get(i)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))
}

fn parse_args() -> anyhow::Result<SimArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimArgs::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--from" => {
                i += 1;
                config.from = next_value(&args, i, "--from")?;
            }
            "--to" => {
                i += 1;
                config.to = next_value(&args, i, "--to")?;
            }
            "--runs" => {
                i += 1;
                config.runs = next_value(&args, i, "--runs")?;
            }
            "--seed" => {
                i += 1;
                config.seed = next_value(&args, i, "--seed")?;
            }
            "--strategy" => {
                i += 1;
                let raw: String = next_value(&args, i, "--strategy")?;
                config.strategy = if raw == "optimal" {
                    None
                } else {
                    Some(raw.parse()?)
                };
            }
            "--config" => {
                i += 1;
                config.config = Some(PathBuf::from(next_value::<String>(&args, i, "--config")?));
            }
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    Ok(config)
}

fn print_usage() {
    eprintln!(
        "Starforce Monte Carlo Simulator\n\
         \n\
         Usage: starforce_sim [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --from N        Starting star (default: 15)\n\
         \x20 --to N          Target star (default: 20)\n\
         \x20 --runs N        Number of climbs (default: 10000)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --strategy S    none | decrease | destroy | both | optimal\n\
         \x20 --config FILE   Config file with currency rates\n\
         \x20 --quiet         Only final summary line\n\
         \x20 --help, -h      Show this help"
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let app = AppConfig::load(args.config.as_deref())?;
    let stages = stage_range(args.from, args.to)?;

    let (plan, label) = match args.strategy {
        Some(s) => (StrategyPlan::from(s), s.name()),
        None => (
            optimal_strategy_table(&app.currency, &app.solver).plan(),
            "optimal",
        ),
    };

    let climb = ClimbConfig {
        runs: args.runs,
        seed: args.seed,
        plan: plan.clone(),
    };
    let report = run_climbs(stages, &climb, &app.currency, &app.solver);
    let projection = project_cost(stages, &plan, &app.currency, &app.solver);

    let deviation = if projection.expected_total_cost > 0.0 {
        (report.avg_cost - projection.expected_total_cost) / projection.expected_total_cost * 100.0
    } else {
        0.0
    };

    if args.quiet {
        println!(
            "{}->{} {}: simulated {:.0}, projected {:.0} ({:+.1}%)",
            args.from, args.to, label, report.avg_cost, projection.expected_total_cost, deviation
        );
        return Ok(());
    }

    println!("Configuration:");
    println!("  Range:          {} -> {}", args.from, args.to);
    println!("  Strategy:       {}", label);
    println!("  Runs:           {}", args.runs);
    println!("  Seed:           {}", args.seed);
    println!();
    print!("{}", report.to_text());
    println!();
    println!("── MARKOV PROJECTION ────────────────────────────────────────────");
    println!("  Expected Cost:     {:.0} diamonds", projection.expected_total_cost);
    println!("  P(success/run):    {:.2}%", projection.p_success * 100.0);
    println!("  Destructions:      {:.3}", projection.expected_destructions);
    println!("  Deviation:         {:+.2}%", deviation);
    Ok(())
}
