//! Per-system progression rules.
//!
//! Each betting system is one variant of `StrategyState`. `advance` applies
//! the system's win/loss transition and returns the nominal next wager;
//! clamping against the bankroll happens in `StrategyEngine`.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::fmt;

use super::StrategyParams;
use crate::types::StrategyKind;

/// Unit multipliers for the 1-3-2-6 cycle.
pub const ONE_THREE_TWO_SIX: [u32; 4] = [1, 3, 2, 6];

/// Outcome of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Nominal wager for the next round, before clamping.
    pub wager: Decimal,
    /// The system completed a cycle and returned to its starting position.
    pub cycle_reset: bool,
}

/// Strategy-internal state, one variant per system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyState {
    Martingale {
        current: Decimal,
        base: Decimal,
    },
    ReverseMartingale {
        current: Decimal,
        base: Decimal,
    },
    Fibonacci {
        index: usize,
        unit: Decimal,
    },
    DAlembert {
        current: Decimal,
        unit: Decimal,
    },
    Labouchere {
        sequence: Vec<Decimal>,
        initial: Vec<Decimal>,
    },
    Paroli {
        current: Decimal,
        base: Decimal,
        consecutive_wins: u32,
        target_wins: u32,
    },
    OscarsGrind {
        current: Decimal,
        unit: Decimal,
        target: Decimal,
        cycle_profit: Decimal,
    },
    OneThreeTwoSix {
        index: usize,
        unit: Decimal,
    },
    Flat {
        wager: Decimal,
    },
    Thirds {
        wager: Decimal,
    },
}

impl StrategyState {
    /// Initial sub-state for the configured system.
    pub fn from_params(params: &StrategyParams) -> Self {
        let base = params.base_wager;
        match params.kind {
            StrategyKind::Martingale => StrategyState::Martingale { current: base, base },
            StrategyKind::ReverseMartingale => {
                StrategyState::ReverseMartingale { current: base, base }
            }
            StrategyKind::Fibonacci => StrategyState::Fibonacci { index: 0, unit: base },
            StrategyKind::DAlembert => StrategyState::DAlembert { current: base, unit: base },
            StrategyKind::Labouchere => {
                let initial: Vec<Decimal> =
                    params.labouchere_sequence.iter().map(|u| *u * base).collect();
                StrategyState::Labouchere {
                    sequence: initial.clone(),
                    initial,
                }
            }
            StrategyKind::Paroli => StrategyState::Paroli {
                current: base,
                base,
                consecutive_wins: 0,
                target_wins: params.paroli_target_wins,
            },
            StrategyKind::OscarsGrind => StrategyState::OscarsGrind {
                current: base,
                unit: base,
                target: params.oscar_target_units * base,
                cycle_profit: Decimal::ZERO,
            },
            StrategyKind::OneThreeTwoSix => StrategyState::OneThreeTwoSix { index: 0, unit: base },
            StrategyKind::Flat => StrategyState::Flat { wager: base },
            StrategyKind::Thirds => StrategyState::Thirds { wager: base },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyState::Martingale { .. } => StrategyKind::Martingale,
            StrategyState::ReverseMartingale { .. } => StrategyKind::ReverseMartingale,
            StrategyState::Fibonacci { .. } => StrategyKind::Fibonacci,
            StrategyState::DAlembert { .. } => StrategyKind::DAlembert,
            StrategyState::Labouchere { .. } => StrategyKind::Labouchere,
            StrategyState::Paroli { .. } => StrategyKind::Paroli,
            StrategyState::OscarsGrind { .. } => StrategyKind::OscarsGrind,
            StrategyState::OneThreeTwoSix { .. } => StrategyKind::OneThreeTwoSix,
            StrategyState::Flat { .. } => StrategyKind::Flat,
            StrategyState::Thirds { .. } => StrategyKind::Thirds,
        }
    }

    /// Nominal wager implied by the current state.
    pub fn wager(&self) -> Decimal {
        match self {
            StrategyState::Martingale { current, .. }
            | StrategyState::ReverseMartingale { current, .. }
            | StrategyState::DAlembert { current, .. }
            | StrategyState::Paroli { current, .. }
            | StrategyState::OscarsGrind { current, .. } => *current,
            StrategyState::Fibonacci { index, unit } => fib(*index).saturating_mul(*unit),
            StrategyState::Labouchere { sequence, .. } => labouchere_wager(sequence),
            StrategyState::OneThreeTwoSix { index, unit } => {
                Decimal::from(ONE_THREE_TWO_SIX[*index]) * *unit
            }
            StrategyState::Flat { wager } | StrategyState::Thirds { wager } => *wager,
        }
    }

    /// Apply one round. `stake` is what was actually placed (possibly
    /// clamped), `multiplier` the bet's net payout per unit.
    pub fn advance(&mut self, won: bool, stake: Decimal, multiplier: Decimal) -> Transition {
        let mut cycle_reset = false;
        match self {
            StrategyState::Martingale { current, base } => {
                if won {
                    *current = *base;
                    cycle_reset = true;
                } else {
                    *current = current.saturating_mul(dec!(2));
                }
            }
            StrategyState::ReverseMartingale { current, base } => {
                if won {
                    *current = current.saturating_mul(dec!(2));
                } else {
                    *current = *base;
                    cycle_reset = true;
                }
            }
            StrategyState::Fibonacci { index, .. } => {
                if won {
                    *index = index.saturating_sub(2);
                    cycle_reset = *index == 0;
                } else {
                    *index += 1;
                }
            }
            StrategyState::DAlembert { current, unit } => {
                if won {
                    *current = (*current - *unit).max(*unit);
                } else {
                    *current = current.saturating_add(*unit);
                }
            }
            StrategyState::Labouchere { sequence, initial } => {
                if won {
                    if !sequence.is_empty() {
                        sequence.remove(0);
                    }
                    sequence.pop();
                    if sequence.is_empty() {
                        *sequence = initial.clone();
                        cycle_reset = true;
                    }
                } else {
                    sequence.push(stake);
                }
            }
            StrategyState::Paroli {
                current,
                base,
                consecutive_wins,
                target_wins,
            } => {
                if won {
                    *consecutive_wins += 1;
                    if *consecutive_wins >= *target_wins {
                        *current = *base;
                        *consecutive_wins = 0;
                        cycle_reset = true;
                    } else {
                        *current = current.saturating_mul(dec!(2));
                    }
                } else {
                    *current = *base;
                    *consecutive_wins = 0;
                }
            }
            StrategyState::OscarsGrind {
                current,
                unit,
                target,
                cycle_profit,
            } => {
                if won {
                    *cycle_profit = cycle_profit.saturating_add(stake.saturating_mul(multiplier));
                    if *cycle_profit >= *target {
                        *cycle_profit = Decimal::ZERO;
                        *current = *unit;
                        cycle_reset = true;
                    } else {
                        // Never stake more than a win needs to close the cycle.
                        let needed = (target.saturating_sub(*cycle_profit) / multiplier)
                            .round_dp_with_strategy(2, RoundingStrategy::AwayFromZero);
                        *current = current.saturating_add(*unit).min(needed);
                    }
                } else {
                    *cycle_profit = cycle_profit.saturating_sub(stake);
                }
            }
            StrategyState::OneThreeTwoSix { index, .. } => {
                if won {
                    *index += 1;
                    if *index >= ONE_THREE_TWO_SIX.len() {
                        *index = 0;
                        cycle_reset = true;
                    }
                } else {
                    *index = 0;
                }
            }
            StrategyState::Flat { .. } | StrategyState::Thirds { .. } => {}
        }

        Transition {
            wager: self.wager(),
            cycle_reset,
        }
    }
}

impl fmt::Display for StrategyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyState::Labouchere { sequence, .. } => {
                let items: Vec<String> = sequence.iter().map(|d| format!("{:.2}", d)).collect();
                write!(f, "Labouchere sequence [{}]", items.join(", "))
            }
            StrategyState::OneThreeTwoSix { index, .. } => write!(
                f,
                "1-3-2-6 step {} of {}, bet ${:.2}",
                index + 1,
                ONE_THREE_TWO_SIX.len(),
                self.wager()
            ),
            StrategyState::OscarsGrind {
                cycle_profit, target, ..
            } => write!(
                f,
                "Oscar's Grind cycle profit ${:.2} of ${:.2}, bet ${:.2}",
                cycle_profit,
                target,
                self.wager()
            ),
            StrategyState::Fibonacci { index, .. } => {
                write!(f, "Fibonacci step {}, bet ${:.2}", index + 1, self.wager())
            }
            StrategyState::Paroli {
                consecutive_wins,
                target_wins,
                ..
            } => write!(
                f,
                "Paroli {}/{} wins, bet ${:.2}",
                consecutive_wins,
                target_wins,
                self.wager()
            ),
            other => write!(f, "{} bet ${:.2}", other.kind(), other.wager()),
        }
    }
}

/// Fibonacci number with `fib(0) = fib(1) = 1`, saturating at `Decimal::MAX`.
pub fn fib(index: usize) -> Decimal {
    let (mut a, mut b) = (Decimal::ONE, Decimal::ONE);
    for _ in 0..index {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

fn labouchere_wager(sequence: &[Decimal]) -> Decimal {
    match sequence {
        [] => Decimal::ZERO,
        [only] => *only,
        [first, .., last] => first.saturating_add(*last),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
