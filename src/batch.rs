//! Monte-Carlo batch mode.
//!
//! Runs many independent simulations of the same configuration in parallel
//! and summarises how the bankrolls ended up. Each run gets its own seeded
//! wheel, ledger and strategy state, so a batch is reproducible from its
//! base seed regardless of thread scheduling.

use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use tracing::info;

use crate::config::RunConfig;
use crate::engine::{SimulationRunner, WinStreak};
use crate::prompt::AutoContinue;
use crate::report::SimulationReport;
use crate::types::{SimError, StrategyKind};
use crate::wheel::Wheel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub strategy: StrategyKind,
    pub runs: usize,
    /// Runs halted for insufficient funds.
    pub busted: usize,
    /// Runs that finished above their initial balance.
    pub profitable: usize,
    pub initial_balance: Decimal,
    pub mean_final_balance: Decimal,
    pub median_final_balance: Decimal,
    pub min_final_balance: Decimal,
    pub max_final_balance: Decimal,
    pub mean_spins: Decimal,
    pub longest_win_streak: WinStreak,
}

/// Play `runs` simulations; run `i` spins a wheel seeded with
/// `base_seed + i`. Prompting is always off.
pub fn run_batch(config: &RunConfig, runs: usize, base_seed: u64) -> Result<BatchSummary, SimError> {
    if runs == 0 {
        return Err(SimError::InvalidConfig("Batch needs at least one run".into()));
    }
    let mut config = config.clone();
    config.prompt_after_win = false;
    let runner = SimulationRunner::new(config)?;

    info!(
        runs,
        base_seed,
        strategy = %runner.config().strategy.kind,
        "Starting batch"
    );

    let reports: Vec<SimulationReport> = (0..runs)
        .into_par_iter()
        .map(|i| {
            let mut wheel = Wheel::seeded(runner.config().wheel_type, base_seed.wrapping_add(i as u64));
            runner.run(&mut wheel, &mut AutoContinue)
        })
        .collect();

    let summary = summarise(runner.config(), &reports);
    info!(
        runs = summary.runs,
        busted = summary.busted,
        profitable = summary.profitable,
        mean_final = %summary.mean_final_balance,
        "Batch complete"
    );
    Ok(summary)
}

fn summarise(config: &RunConfig, reports: &[SimulationReport]) -> BatchSummary {
    let runs = reports.len();
    let count = Decimal::from(runs.max(1));

    let mut finals: Vec<Decimal> = reports.iter().map(|r| r.final_balance).collect();
    finals.sort();
    let median = match runs {
        0 => Decimal::ZERO,
        n if n % 2 == 1 => finals[n / 2],
        n => finals[n / 2 - 1] + (finals[n / 2] - finals[n / 2 - 1]) / dec!(2),
    };

    let total_spins: u64 = reports.iter().map(|r| u64::from(r.total_spins)).sum();
    let longest_win_streak = reports
        .iter()
        .map(|r| r.longest_win_streak)
        .max_by(|a, b| a.length.cmp(&b.length).then(a.amount_won.cmp(&b.amount_won)))
        .unwrap_or_default();

    BatchSummary {
        strategy: config.strategy.kind,
        runs,
        busted: reports.iter().filter(|r| r.is_bust()).count(),
        profitable: reports.iter().filter(|r| r.is_profitable()).count(),
        initial_balance: config.initial_balance,
        // Divide before summing so balances near the top of the range stay in range.
        mean_final_balance: finals.iter().map(|f| *f / count).sum::<Decimal>().round_dp(2),
        median_final_balance: median,
        min_final_balance: finals.first().copied().unwrap_or_default(),
        max_final_balance: finals.last().copied().unwrap_or_default(),
        mean_spins: (Decimal::from(total_spins) / count).round_dp(2),
        longest_win_streak,
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Batch Results ({}) ---", self.strategy)?;
        writeln!(f, "Runs: {}", self.runs)?;
        writeln!(f, "Initial Balance: ${:.2}", self.initial_balance)?;
        writeln!(f, "Busted: {}", self.busted)?;
        writeln!(f, "Profitable: {}", self.profitable)?;
        writeln!(f, "Mean Final Balance: ${:.2}", self.mean_final_balance)?;
        writeln!(f, "Median Final Balance: ${:.2}", self.median_final_balance)?;
        writeln!(
            f,
            "Final Balance Range: ${:.2} to ${:.2}",
            self.min_final_balance, self.max_final_balance
        )?;
        writeln!(f, "Mean Spins Played: {:.2}", self.mean_spins)?;
        write!(
            f,
            "Longest Winning Streak: {} (${:.2})",
            self.longest_win_streak.length, self.longest_win_streak.amount_won
        )
    }
}
