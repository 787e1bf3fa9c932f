//! Bet coverage and resolution.
//!
//! A `BetSpec` fixes which pockets a wager covers for the whole run; only
//! the stake changes between rounds. Resolution is a membership test, so
//! the house edge comes entirely from the zeros on the wheel.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{BetType, EvenChance, Outcome, Pocket, SimError, WheelType, MAX_NUMBER};

/// Net profit per unit staked on a winning bet.
pub fn payout_multiplier(bet_type: BetType) -> Decimal {
    match bet_type {
        BetType::Single => dec!(35),
        BetType::Split => dec!(17),
        BetType::Corner => dec!(8),
        BetType::Line => dec!(5),
        BetType::Dozen => dec!(2),
        BetType::EvenChance => Decimal::ONE,
    }
}

// ---------------------------------------------------------------------------
// Bet specification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetSpec {
    bet_type: BetType,
    covered: BTreeSet<Pocket>,
    payout: Decimal,
}

impl BetSpec {
    /// Build a bet over explicit pockets. The pocket count must match the
    /// bet type, and dozen / even-chance coverage may not include a zero.
    pub fn new(bet_type: BetType, pockets: impl IntoIterator<Item = Pocket>) -> Result<Self, SimError> {
        let covered: BTreeSet<Pocket> = pockets.into_iter().collect();
        if covered.len() != bet_type.coverage_size() {
            return Err(SimError::InvalidConfig(format!(
                "A {bet_type} bet covers {} numbers, got {}",
                bet_type.coverage_size(),
                covered.len()
            )));
        }
        if matches!(bet_type, BetType::Dozen | BetType::EvenChance)
            && covered.iter().any(Pocket::is_zero)
        {
            return Err(SimError::InvalidConfig(format!(
                "A {bet_type} bet cannot cover 0 or 00"
            )));
        }
        Ok(Self {
            bet_type,
            covered,
            payout: payout_multiplier(bet_type),
        })
    }

    /// Default table position for each bet type: single on 0, split 0-1,
    /// corner 0-1-2-3, line 0-5, first dozen, and low (1-18).
    pub fn standard(bet_type: BetType) -> Self {
        let covered: BTreeSet<Pocket> = match bet_type {
            BetType::Single => [Pocket::Zero].into_iter().collect(),
            BetType::Split => [Pocket::Zero, Pocket::Number(1)].into_iter().collect(),
            BetType::Corner => std::iter::once(Pocket::Zero)
                .chain((1..=3).map(Pocket::Number))
                .collect(),
            BetType::Line => std::iter::once(Pocket::Zero)
                .chain((1..=5).map(Pocket::Number))
                .collect(),
            BetType::Dozen => (1..=12).map(Pocket::Number).collect(),
            BetType::EvenChance => (1..=18).map(Pocket::Number).collect(),
        };
        Self {
            bet_type,
            covered,
            payout: payout_multiplier(bet_type),
        }
    }

    /// Red, black, odd, even, low or high.
    pub fn even_chance(selection: EvenChance) -> Self {
        Self {
            bet_type: BetType::EvenChance,
            covered: (1..=MAX_NUMBER)
                .filter(|n| selection.contains(*n))
                .map(Pocket::Number)
                .collect(),
            payout: payout_multiplier(BetType::EvenChance),
        }
    }

    /// One of the three dozens, numbered 1 to 3.
    pub fn dozen(which: u8) -> Result<Self, SimError> {
        if !(1..=3).contains(&which) {
            return Err(SimError::InvalidConfig(format!(
                "Dozen must be 1, 2 or 3, got {which}"
            )));
        }
        let start = (which - 1) * 12 + 1;
        Self::new(BetType::Dozen, (start..start + 12).map(Pocket::Number))
    }

    pub fn bet_type(&self) -> BetType {
        self.bet_type
    }

    pub fn payout(&self) -> Decimal {
        self.payout
    }

    pub fn covered(&self) -> &BTreeSet<Pocket> {
        &self.covered
    }

    pub fn covers(&self, pocket: Pocket) -> bool {
        self.covered.contains(&pocket)
    }

    /// Every covered pocket must exist on the chosen wheel.
    pub fn validate_for(&self, wheel: WheelType) -> Result<(), SimError> {
        match self.covered.iter().find(|p| !wheel.has_pocket(**p)) {
            Some(p) => Err(SimError::InvalidConfig(format!(
                "Pocket {p} does not exist on a {wheel} wheel"
            ))),
            None => Ok(()),
        }
    }

    /// Probability of winning a single spin on the given wheel.
    pub fn hit_probability(&self, wheel: WheelType) -> Decimal {
        let hits = self.covered.iter().filter(|p| wheel.has_pocket(**p)).count();
        Decimal::from(hits) / Decimal::from(wheel.pocket_count())
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Result of resolving one bet against one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub won: bool,
    pub multiplier: Decimal,
}

impl Resolution {
    /// Net change to the bankroll for a given stake, `None` if it does not
    /// fit in a `Decimal`.
    pub fn net(&self, stake: Decimal) -> Option<Decimal> {
        if self.won {
            stake.checked_mul(self.multiplier)
        } else {
            Some(-stake)
        }
    }

    /// Amount handed back across the table (stake plus winnings, or nothing).
    pub fn returned(&self, stake: Decimal) -> Option<Decimal> {
        if self.won {
            stake.checked_mul(self.multiplier.checked_add(Decimal::ONE)?)
        } else {
            Some(Decimal::ZERO)
        }
    }
}

pub struct BetEvaluator;

impl BetEvaluator {
    pub fn resolve(bet: &BetSpec, outcome: &Outcome) -> Resolution {
        Resolution {
            won: bet.covers(outcome.pocket),
            multiplier: bet.payout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
