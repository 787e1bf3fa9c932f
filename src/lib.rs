//! roulette-sim — Roulette betting-system simulator
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod types;
pub mod wheel;
pub mod bet;
pub mod strategy;
pub mod engine;
pub mod prompt;
pub mod config;
pub mod input;
pub mod report;
pub mod storage;
pub mod batch;
