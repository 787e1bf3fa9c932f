//! Core engine: the per-run ledger and the spin → settle → next-wager loop.

pub mod ledger;
pub mod runner;

pub use ledger::{RoundRecord, RunState, WinStreak};
pub use runner::SimulationRunner;
