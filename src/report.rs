//! Simulation report and its text renderings.
//!
//! `SimulationReport` is produced exactly once per run, whether the run
//! completed or halted early. It serialises to JSON for export
//! (see `storage`) and renders as the plain results block and an ASCII
//! balance chart for the terminal.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use uuid::Uuid;

use crate::config::RunConfig;
use crate::engine::ledger::{RoundRecord, RunState, WinStreak};
use crate::types::{BetType, HaltReason, StrategyKind, WheelType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub strategy: StrategyKind,
    pub wheel_type: WheelType,
    pub bet_type: BetType,
    pub base_wager: Decimal,
    pub initial_balance: Decimal,
    pub final_balance: Decimal,
    pub total_spins: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub net_profit_loss: Decimal,
    pub total_wagered: Decimal,
    pub total_returned: Decimal,
    pub longest_win_streak: WinStreak,
    pub halt_reason: HaltReason,
    /// Times the strategy returned to its starting position.
    pub strategy_cycles: u32,
    /// Initial balance followed by the bankroll after each round.
    pub balance_history: Vec<Decimal>,
    pub rounds: Vec<RoundRecord>,
}

impl SimulationReport {
    pub fn from_run(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        config: &RunConfig,
        ledger: RunState,
        halt_reason: HaltReason,
        strategy_cycles: u32,
    ) -> Self {
        let net_profit_loss = ledger.net_profit();
        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            strategy: config.strategy.kind,
            wheel_type: config.wheel_type,
            bet_type: config.bet.bet_type(),
            base_wager: config.strategy.base_wager,
            initial_balance: ledger.initial_balance,
            final_balance: ledger.bankroll,
            total_spins: ledger.spins_completed,
            total_wins: ledger.total_wins,
            total_losses: ledger.total_losses,
            net_profit_loss,
            total_wagered: ledger.total_wagered,
            total_returned: ledger.total_returned,
            longest_win_streak: ledger.longest_win_streak,
            halt_reason,
            strategy_cycles,
            balance_history: ledger.balance_history,
            rounds: ledger.rounds,
        }
    }

    pub fn is_bust(&self) -> bool {
        matches!(self.halt_reason, HaltReason::InsufficientFunds { .. })
    }

    pub fn is_profitable(&self) -> bool {
        self.net_profit_loss > Decimal::ZERO
    }
}

/// The results block printed after a run.
pub fn render_text(report: &SimulationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Simulation Results ---");
    let _ = writeln!(out, "Betting System: {}", report.strategy);
    let _ = writeln!(out, "Wheel Type: {}", report.wheel_type);
    let _ = writeln!(out, "Bet Type (coverage): {}", report.bet_type);
    let _ = writeln!(out, "Initial Balance: ${:.2}", report.initial_balance);
    let _ = writeln!(out, "Final Balance: ${:.2}", report.final_balance);
    let _ = writeln!(out, "Total Spins: {}", report.total_spins);
    let _ = writeln!(out, "Total Wins: {}", report.total_wins);
    let _ = writeln!(out, "Total Losses: {}", report.total_losses);
    let _ = writeln!(out, "Net Profit/Loss: ${:.2}", report.net_profit_loss);
    let _ = writeln!(out, "Longest Winning Streak: {}", report.longest_win_streak.length);
    let _ = writeln!(
        out,
        "Amount Won in Longest Winning Streak: ${:.2}",
        report.longest_win_streak.amount_won
    );
    let _ = writeln!(out, "Stopped: {}", report.halt_reason);
    out
}

/// ASCII chart of the balance over time plus a wins/losses bar section.
///
/// The history is sampled down to `width` columns; `height` rows span the
/// lowest to highest balance. The initial-balance level is drawn as `-`
/// wherever no data point covers it.
pub fn render_chart(report: &SimulationReport, width: usize, height: usize) -> String {
    let width = width.max(2);
    let height = height.max(2);
    let mut out = String::new();
    let _ = writeln!(out, "Balance Over Time");

    let history = &report.balance_history;
    if history.is_empty() {
        let _ = writeln!(out, "(no data)");
        return out;
    }

    let points = sample(history, width);
    let min = points.iter().copied().fold(report.initial_balance, Decimal::min);
    let max = points.iter().copied().fold(report.initial_balance, Decimal::max);
    let top = height - 1;
    let row_of = |value: Decimal| -> usize {
        if max == min {
            return top / 2;
        }
        ((value - min) / (max - min) * Decimal::from(top))
            .round()
            .to_usize()
            .unwrap_or(0)
            .min(top)
    };

    let baseline = row_of(report.initial_balance);
    let mut grid = vec![vec![' '; points.len()]; height];
    for (col, value) in points.iter().enumerate() {
        grid[row_of(*value)][col] = '*';
    }
    for cell in grid[baseline].iter_mut() {
        if *cell == ' ' {
            *cell = '-';
        }
    }

    let label_width = format!("{max:.2}").len().max(format!("{min:.2}").len());
    for (idx, row) in grid.iter().enumerate().rev() {
        let label = if idx == top {
            format!("{max:.2}")
        } else if idx == 0 {
            format!("{min:.2}")
        } else if idx == baseline {
            format!("{:.2}", report.initial_balance)
        } else {
            String::new()
        };
        let line: String = row.iter().collect();
        let _ = writeln!(out, "{label:>label_width$} |{line}");
    }
    let _ = writeln!(out, "{:>label_width$} +{}", "", "-".repeat(points.len()));
    let _ = writeln!(
        out,
        "{:>label_width$}  spins 0..{}",
        "",
        history.len().saturating_sub(1)
    );

    let _ = writeln!(out, "\nWins vs Losses");
    let most = report.total_wins.max(report.total_losses).max(1) as usize;
    let bar = |count: u32| "#".repeat(count as usize * width / most);
    let _ = writeln!(out, "Wins   |{} {}", bar(report.total_wins), report.total_wins);
    let _ = writeln!(out, "Losses |{} {}", bar(report.total_losses), report.total_losses);
    out
}

/// Pick at most `width` evenly spaced points, always keeping both ends.
fn sample(history: &[Decimal], width: usize) -> Vec<Decimal> {
    if history.len() <= width {
        return history.to_vec();
    }
    let last = history.len() - 1;
    (0..width).map(|i| history[i * last / (width - 1)]).collect()
}
