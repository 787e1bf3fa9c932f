//! roulette-sim — Roulette betting-system simulator
//!
//! Entry point. Loads configuration, applies command-line overrides,
//! initialises structured logging, then runs either a single simulation
//! (optionally configured interactively) or a Monte-Carlo batch.

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::info;

use roulette_sim::batch;
use roulette_sim::config::AppConfig;
use roulette_sim::engine::SimulationRunner;
use roulette_sim::input;
use roulette_sim::prompt::{AutoContinue, ConfirmationPrompt, StdinPrompt};
use roulette_sim::report;
use roulette_sim::storage;
use roulette_sim::types::Pocket;
use roulette_sim::wheel::{ScriptedSpinner, Spinner, Wheel};

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulate roulette betting systems")]
struct Args {
    /// Configuration file; missing file means built-in defaults.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Ask for every setting on stdin.
    #[arg(short, long)]
    interactive: bool,

    #[arg(long)]
    balance: Option<Decimal>,

    /// european or american
    #[arg(long)]
    wheel: Option<String>,

    /// single, split, corner, line, dozen or even-chance
    #[arg(long)]
    bet: Option<String>,

    #[arg(short, long)]
    strategy: Option<String>,

    #[arg(long)]
    wager: Option<Decimal>,

    #[arg(long)]
    spins: Option<u32>,

    /// Ask to continue after each win; `--prompt-after-win false` turns off
    /// a config-file `true`.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    prompt_after_win: Option<bool>,

    #[arg(long)]
    seed: Option<u64>,

    /// Replay fixed outcomes instead of spinning, e.g. "5,5,0,17".
    #[arg(long, value_delimiter = ',', conflicts_with = "batch")]
    outcomes: Vec<String>,

    /// Run this many independent simulations and print a summary.
    #[arg(long)]
    batch: Option<usize>,

    /// Write the JSON report to this path.
    #[arg(long)]
    report: Option<String>,

    #[arg(long)]
    no_chart: bool,
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let args = Args::parse();
    init_logging();

    let mut cfg = AppConfig::load_or_default(&args.config)?;
    apply_overrides(&mut cfg, &args);

    let run_config = if args.interactive {
        let stdin = std::io::stdin();
        input::collect_run_config(stdin.lock(), std::io::stdout(), &cfg.strategy)
            .context("Interactive setup failed")?
    } else {
        cfg.to_run_config().context("Invalid simulation settings")?
    };

    if let Some(runs) = args.batch {
        let seed = cfg.simulation.seed.unwrap_or_else(rand::random);
        let summary = batch::run_batch(&run_config, runs, seed)?;
        println!("{summary}");
        return Ok(());
    }

    let mut spinner: Box<dyn Spinner> = if !args.outcomes.is_empty() {
        let pockets = args
            .outcomes
            .iter()
            .map(|s| s.parse::<Pocket>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --outcomes value")?;
        Box::new(ScriptedSpinner::new(run_config.wheel_type, pockets))
    } else if let Some(seed) = cfg.simulation.seed {
        info!(seed, "Using seeded wheel");
        Box::new(Wheel::seeded(run_config.wheel_type, seed))
    } else {
        Box::new(Wheel::new(run_config.wheel_type))
    };

    let mut prompt: Box<dyn ConfirmationPrompt> = if run_config.prompt_after_win {
        Box::new(StdinPrompt::stdio())
    } else {
        Box::new(AutoContinue)
    };

    let runner = SimulationRunner::new(run_config)?;
    let result = runner.run(spinner.as_mut(), prompt.as_mut());
    if let Some(reason) = result.halt_reason.as_error() {
        info!(reason = %reason, spins = result.total_spins, "Run ended early");
    }

    println!("\n{}", report::render_text(&result));
    if !args.no_chart {
        println!(
            "{}",
            report::render_chart(&result, cfg.output.chart_width, cfg.output.chart_height)
        );
    }

    if let Some(path) = cfg.output.report_path.as_deref() {
        storage::save_report(&result, Some(path))?;
    }

    Ok(())
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(cfg: &mut AppConfig, args: &Args) {
    let sim = &mut cfg.simulation;
    if let Some(balance) = args.balance {
        sim.initial_balance = balance;
    }
    if let Some(wheel) = &args.wheel {
        sim.wheel = wheel.clone();
    }
    if let Some(bet) = &args.bet {
        sim.bet_type = bet.clone();
    }
    if let Some(strategy) = &args.strategy {
        sim.strategy = strategy.clone();
    }
    if let Some(wager) = args.wager {
        sim.initial_wager = wager;
    }
    if let Some(spins) = args.spins {
        sim.spins = spins;
    }
    if let Some(prompt) = args.prompt_after_win {
        sim.prompt_after_win = prompt;
    }
    if args.seed.is_some() {
        sim.seed = args.seed;
    }
    if args.report.is_some() {
        cfg.output.report_path = args.report.clone();
    }
}

/// Initialise the tracing subscriber. Logs go to stderr so they never
/// interleave with prompts and results on stdout.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("roulette_sim=info"));

    let json_logging = std::env::var("ROULETTE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    }
}
