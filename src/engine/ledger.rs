//! Run ledger — bankroll, counters, streaks and balance history.
//!
//! `RunState` is owned by the runner for the duration of one run and
//! mutated exactly once per round via `record_round`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bet::Resolution;
use crate::types::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakKind {
    Win,
    Loss,
}

/// The streak in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: StreakKind,
    pub length: u32,
    /// Net amount won (win streak) or lost (loss streak) so far.
    pub amount: Decimal,
}

/// Best win streak of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WinStreak {
    pub length: u32,
    pub amount_won: Decimal,
}

/// One completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub spin: u32,
    pub wager: Decimal,
    pub outcome: Outcome,
    pub won: bool,
    pub net: Decimal,
    pub bankroll_after: Decimal,
}

#[derive(Debug, Clone)]
pub struct RunState {
    pub bankroll: Decimal,
    pub initial_balance: Decimal,
    pub spins_remaining: u32,
    pub spins_completed: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_wagered: Decimal,
    pub total_returned: Decimal,
    pub current_streak: Option<Streak>,
    pub longest_win_streak: WinStreak,
    /// Initial balance followed by the bankroll after each round.
    pub balance_history: Vec<Decimal>,
    pub rounds: Vec<RoundRecord>,
}

impl RunState {
    pub fn new(initial_balance: Decimal, spins: u32) -> Self {
        Self {
            bankroll: initial_balance,
            initial_balance,
            spins_remaining: spins,
            spins_completed: 0,
            total_wins: 0,
            total_losses: 0,
            total_wagered: Decimal::ZERO,
            total_returned: Decimal::ZERO,
            current_streak: None,
            longest_win_streak: WinStreak::default(),
            balance_history: vec![initial_balance],
            rounds: Vec::new(),
        }
    }

    /// Settle one round and update every counter.
    ///
    /// Returns `None`, leaving the state untouched, when the settlement
    /// would exceed the range of `Decimal`.
    pub fn record_round(&mut self, wager: Decimal, outcome: Outcome, resolution: Resolution) -> Option<&RoundRecord> {
        let net = resolution.net(wager)?;
        let bankroll = self.bankroll.checked_add(net)?;
        let total_wagered = self.total_wagered.checked_add(wager)?;
        let total_returned = self.total_returned.checked_add(resolution.returned(wager)?)?;
        let streak = self.next_streak(resolution.won, net.abs())?;

        self.bankroll = bankroll;
        self.total_wagered = total_wagered;
        self.total_returned = total_returned;
        self.spins_completed += 1;
        self.spins_remaining = self.spins_remaining.saturating_sub(1);

        if resolution.won {
            self.total_wins += 1;
        } else {
            self.total_losses += 1;
        }
        self.current_streak = Some(streak);
        if streak.kind == StreakKind::Win {
            let best = &mut self.longest_win_streak;
            if streak.length > best.length
                || (streak.length == best.length && streak.amount > best.amount_won)
            {
                *best = WinStreak {
                    length: streak.length,
                    amount_won: streak.amount,
                };
            }
        }

        self.balance_history.push(self.bankroll);
        self.rounds.push(RoundRecord {
            spin: self.spins_completed,
            wager,
            outcome,
            won: resolution.won,
            net,
            bankroll_after: self.bankroll,
        });
        self.rounds.last()
    }

    fn next_streak(&self, won: bool, amount: Decimal) -> Option<Streak> {
        let kind = if won { StreakKind::Win } else { StreakKind::Loss };
        let streak = match self.current_streak {
            Some(s) if s.kind == kind => Streak {
                kind,
                length: s.length + 1,
                amount: s.amount.checked_add(amount)?,
            },
            _ => Streak {
                kind,
                length: 1,
                amount,
            },
        };
        Some(streak)
    }

    pub fn net_profit(&self) -> Decimal {
        self.bankroll - self.initial_balance
    }
}
