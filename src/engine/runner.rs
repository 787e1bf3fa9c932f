//! Simulation runner.
//!
//! Drives the round loop: spin → resolve → settle → next wager → optional
//! confirmation, until the spin budget is used up or the run halts.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ledger::RunState;
use crate::bet::BetEvaluator;
use crate::config::RunConfig;
use crate::prompt::{ConfirmationPrompt, PromptStatus};
use crate::report::SimulationReport;
use crate::strategy::{StrategyEngine, WagerDecision};
use crate::types::{HaltReason, SimError};
use crate::wheel::Spinner;

pub struct SimulationRunner {
    config: RunConfig,
}

impl SimulationRunner {
    /// Validates the configuration; an invalid one never starts.
    pub fn new(config: RunConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Play the run to completion or halt. Always produces a report.
    pub fn run(&self, spinner: &mut dyn Spinner, prompt: &mut dyn ConfirmationPrompt) -> SimulationReport {
        let cfg = &self.config;
        let started_at = Utc::now();
        let run_id = Uuid::new_v4();

        if spinner.wheel_type() != cfg.wheel_type {
            warn!(
                configured = %cfg.wheel_type,
                spinner = %spinner.wheel_type(),
                "Spinner wheel differs from configured wheel"
            );
        }

        info!(
            %run_id,
            strategy = %cfg.strategy.kind,
            wheel = %cfg.wheel_type,
            bet = %cfg.bet.bet_type(),
            hit_probability = %cfg.bet.hit_probability(cfg.wheel_type).round_dp(4),
            balance = %cfg.initial_balance,
            wager = %cfg.strategy.base_wager,
            spins = cfg.spin_count,
            "Simulation starting"
        );

        let mut ledger = RunState::new(cfg.initial_balance, cfg.spin_count);
        let mut engine = StrategyEngine::new(&cfg.strategy, cfg.bet.payout());
        let mut decision = engine.opening_wager(ledger.bankroll);

        let halt = loop {
            if ledger.spins_remaining == 0 {
                break HaltReason::Completed;
            }

            let wager = match decision {
                WagerDecision::Place(wager) => wager,
                WagerDecision::InsufficientFunds { required, available } => {
                    warn!(
                        spin = ledger.spins_completed + 1,
                        required = %required,
                        available = %available,
                        "Insufficient balance to continue"
                    );
                    break HaltReason::InsufficientFunds { required, available };
                }
            };

            let spin = ledger.spins_completed + 1;
            let bankroll = ledger.bankroll;
            let outcome = spinner.spin();
            let resolution = BetEvaluator::resolve(&cfg.bet, &outcome);
            let Some(record) = ledger.record_round(wager, outcome, resolution) else {
                warn!(
                    spin,
                    wager = %wager,
                    bankroll = %bankroll,
                    outcome = %outcome,
                    "Settlement exceeds representable money, halting"
                );
                break HaltReason::BankrollOverflow { spin };
            };
            debug!(
                spin = record.spin,
                wager = %record.wager,
                outcome = %record.outcome,
                won = record.won,
                net = %record.net,
                bankroll = %record.bankroll_after,
                "Round settled"
            );

            decision = engine.next(wager, resolution.won, ledger.bankroll);

            if cfg.prompt_after_win && resolution.won {
                let status = PromptStatus {
                    spin: ledger.spins_completed,
                    bankroll: ledger.bankroll,
                    wins: ledger.total_wins,
                    losses: ledger.total_losses,
                    net: ledger.net_profit(),
                    strategy: engine.state().to_string(),
                };
                if !prompt.confirm_continue(&status) {
                    info!(spin = ledger.spins_completed, "Player chose to stop after a win");
                    break HaltReason::UserStopped;
                }
            }
        };

        info!(
            %run_id,
            spins = ledger.spins_completed,
            wins = ledger.total_wins,
            losses = ledger.total_losses,
            final_balance = %ledger.bankroll,
            net = %ledger.net_profit(),
            halt = %halt,
            "Simulation finished"
        );

        SimulationReport::from_run(run_id, started_at, cfg, ledger, halt, engine.cycles_completed())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
