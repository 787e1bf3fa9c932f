//! Strategy engine — wager progression and bankroll guard.
//!
//! `StrategyEngine` owns the selected system's state, applies one
//! transition per round and clamps the result against the bankroll. When
//! the bankroll cannot cover the minimum wager it signals
//! `InsufficientFunds` instead of a stake; the runner treats that as
//! terminal.

pub mod systems;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::types::{SimError, StrategyKind};
use systems::StrategyState;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parameters for building a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyParams {
    pub kind: StrategyKind,
    /// Base wager / betting unit.
    pub base_wager: Decimal,
    /// Smallest stake the engine will place. Defaults to the base wager.
    pub min_wager: Decimal,
    /// Labouchere starting line, in units of the base wager.
    pub labouchere_sequence: Vec<Decimal>,
    /// Oscar's Grind profit target per cycle, in units.
    pub oscar_target_units: Decimal,
    /// Paroli wins in a row before the profit is banked.
    pub paroli_target_wins: u32,
}

impl StrategyParams {
    pub fn new(kind: StrategyKind, base_wager: Decimal) -> Self {
        Self {
            kind,
            base_wager,
            min_wager: base_wager,
            labouchere_sequence: vec![dec!(1), dec!(2), dec!(3), dec!(4)],
            oscar_target_units: Decimal::ONE,
            paroli_target_wins: 3,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.base_wager <= Decimal::ZERO {
            return Err(SimError::InvalidConfig(format!(
                "Initial wager must be greater than 0, got {}",
                self.base_wager
            )));
        }
        if self.min_wager <= Decimal::ZERO {
            return Err(SimError::InvalidConfig(format!(
                "Minimum wager must be greater than 0, got {}",
                self.min_wager
            )));
        }
        match self.kind {
            StrategyKind::Labouchere => {
                if self.labouchere_sequence.is_empty() {
                    return Err(SimError::InvalidConfig(
                        "Labouchere sequence cannot be empty".into(),
                    ));
                }
                if self.labouchere_sequence.iter().any(|u| *u <= Decimal::ZERO) {
                    return Err(SimError::InvalidConfig(
                        "Labouchere sequence entries must be positive".into(),
                    ));
                }
            }
            StrategyKind::OscarsGrind if self.oscar_target_units <= Decimal::ZERO => {
                return Err(SimError::InvalidConfig(
                    "Oscar's Grind profit target must be positive".into(),
                ));
            }
            StrategyKind::Paroli if self.paroli_target_wins == 0 => {
                return Err(SimError::InvalidConfig(
                    "Paroli target must be at least one win".into(),
                ));
            }
            _ => {}
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// What the engine wants to do next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WagerDecision {
    /// Place this stake (already clamped to the bankroll).
    Place(Decimal),
    /// Bankroll below the minimum wager; the run must halt.
    InsufficientFunds { required: Decimal, available: Decimal },
}

pub struct StrategyEngine {
    state: StrategyState,
    min_wager: Decimal,
    multiplier: Decimal,
    cycles_completed: u32,
}

impl StrategyEngine {
    /// `payout_multiplier` is the net payout of the bet being played.
    pub fn new(params: &StrategyParams, payout_multiplier: Decimal) -> Self {
        Self {
            state: StrategyState::from_params(params),
            min_wager: params.min_wager,
            multiplier: payout_multiplier,
            cycles_completed: 0,
        }
    }

    /// Stake for the first round.
    pub fn opening_wager(&self, bankroll: Decimal) -> WagerDecision {
        self.place(self.state.wager(), bankroll)
    }

    /// Advance after a round and decide the next stake.
    pub fn next(&mut self, previous_wager: Decimal, won: bool, bankroll: Decimal) -> WagerDecision {
        let transition = self.state.advance(won, previous_wager, self.multiplier);
        if transition.cycle_reset {
            self.cycles_completed += 1;
            info!(
                strategy = %self.state.kind(),
                cycles = self.cycles_completed,
                "Strategy cycle complete, back to base wager"
            );
        }
        debug!(
            won,
            previous = %previous_wager,
            nominal = %transition.wager,
            bankroll = %bankroll,
            "Strategy transition"
        );
        self.place(transition.wager, bankroll)
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    fn place(&self, nominal: Decimal, bankroll: Decimal) -> WagerDecision {
        if bankroll < self.min_wager {
            return WagerDecision::InsufficientFunds {
                required: self.min_wager,
                available: bankroll,
            };
        }
        WagerDecision::Place(nominal.min(bankroll))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
