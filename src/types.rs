//! Shared types for the roulette simulator.
//!
//! Wheel pockets, colors, bet and strategy identifiers, halt reasons and
//! the domain error type. Every other module depends on these, so they
//! carry no behaviour beyond classification and parsing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Red pockets on both wheel layouts.
pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

/// Highest numbered pocket on either wheel.
pub const MAX_NUMBER: u8 = 36;

// ---------------------------------------------------------------------------
// Wheel
// ---------------------------------------------------------------------------

/// Wheel layout. European has a single zero, American adds the double zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WheelType {
    European,
    American,
}

impl WheelType {
    pub const ALL: &'static [WheelType] = &[WheelType::European, WheelType::American];

    /// Number of pockets on the wheel.
    pub fn pocket_count(&self) -> usize {
        match self {
            WheelType::European => 37,
            WheelType::American => 38,
        }
    }

    /// All pockets in table order (zeros first, then 1–36).
    pub fn pockets(&self) -> Vec<Pocket> {
        let mut pockets = vec![Pocket::Zero];
        if *self == WheelType::American {
            pockets.push(Pocket::DoubleZero);
        }
        pockets.extend((1..=MAX_NUMBER).map(Pocket::Number));
        pockets
    }

    /// Whether a pocket exists on this wheel.
    pub fn has_pocket(&self, pocket: Pocket) -> bool {
        match pocket {
            Pocket::Zero => true,
            Pocket::DoubleZero => *self == WheelType::American,
            Pocket::Number(n) => (1..=MAX_NUMBER).contains(&n),
        }
    }
}

impl fmt::Display for WheelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelType::European => write!(f, "European"),
            WheelType::American => write!(f, "American"),
        }
    }
}

impl FromStr for WheelType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "european" | "eu" | "single-zero" => Ok(WheelType::European),
            "american" | "us" | "double-zero" => Ok(WheelType::American),
            _ => Err(SimError::InvalidConfig(format!("Unknown wheel type: {s}"))),
        }
    }
}

/// A single pocket on the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pocket {
    Zero,
    DoubleZero,
    Number(u8),
}

impl Pocket {
    pub fn color(&self) -> Color {
        match self {
            Pocket::Zero | Pocket::DoubleZero => Color::Green,
            Pocket::Number(n) if RED_NUMBERS.contains(n) => Color::Red,
            Pocket::Number(_) => Color::Black,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Pocket::Zero | Pocket::DoubleZero)
    }
}

impl fmt::Display for Pocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pocket::Zero => write!(f, "0"),
            Pocket::DoubleZero => write!(f, "00"),
            Pocket::Number(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for Pocket {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Pocket::Zero),
            "00" => Ok(Pocket::DoubleZero),
            other => match other.parse::<u8>() {
                Ok(n) if (1..=MAX_NUMBER).contains(&n) => Ok(Pocket::Number(n)),
                _ => Err(SimError::InvalidConfig(format!("Not a roulette pocket: {s}"))),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
    Green,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
            Color::Green => write!(f, "green"),
        }
    }
}

/// Result of one spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub pocket: Pocket,
    pub color: Color,
}

impl Outcome {
    pub fn new(pocket: Pocket) -> Self {
        Self {
            pocket,
            color: pocket.color(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pocket, self.color)
    }
}

// ---------------------------------------------------------------------------
// Bets
// ---------------------------------------------------------------------------

/// Table coverage of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetType {
    Single,
    Split,
    Corner,
    Line,
    Dozen,
    EvenChance,
}

impl BetType {
    pub const ALL: &'static [BetType] = &[
        BetType::Single,
        BetType::Split,
        BetType::Corner,
        BetType::Line,
        BetType::Dozen,
        BetType::EvenChance,
    ];

    /// How many pockets a bet of this type covers.
    pub fn coverage_size(&self) -> usize {
        match self {
            BetType::Single => 1,
            BetType::Split => 2,
            BetType::Corner => 4,
            BetType::Line => 6,
            BetType::Dozen => 12,
            BetType::EvenChance => 18,
        }
    }

    /// Menu description used by the input collector.
    pub fn description(&self) -> &'static str {
        match self {
            BetType::Single => "Bet on a single number (pays 35:1)",
            BetType::Split => "Bet on 2 numbers (pays 17:1)",
            BetType::Corner => "Bet on 4 numbers (pays 8:1)",
            BetType::Line => "Bet on 6 numbers (pays 5:1)",
            BetType::Dozen => "Bet on 12 numbers (pays 2:1)",
            BetType::EvenChance => "Bet on 18 numbers (pays 1:1)",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetType::Single => write!(f, "single"),
            BetType::Split => write!(f, "split"),
            BetType::Corner => write!(f, "corner"),
            BetType::Line => write!(f, "line"),
            BetType::Dozen => write!(f, "dozen"),
            BetType::EvenChance => write!(f, "even-chance"),
        }
    }
}

impl FromStr for BetType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "single" | "straight" => Ok(BetType::Single),
            "split" => Ok(BetType::Split),
            "corner" | "square" => Ok(BetType::Corner),
            "line" | "sixline" => Ok(BetType::Line),
            "dozen" => Ok(BetType::Dozen),
            "evenchance" | "even" => Ok(BetType::EvenChance),
            _ => Err(SimError::InvalidConfig(format!("Unknown bet type: {s}"))),
        }
    }
}

/// The six even-money propositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvenChance {
    Red,
    Black,
    Odd,
    Even,
    Low,
    High,
}

impl EvenChance {
    pub fn contains(&self, number: u8) -> bool {
        match self {
            EvenChance::Red => RED_NUMBERS.contains(&number),
            EvenChance::Black => !RED_NUMBERS.contains(&number),
            EvenChance::Odd => number % 2 == 1,
            EvenChance::Even => number % 2 == 0,
            EvenChance::Low => number <= 18,
            EvenChance::High => number >= 19,
        }
    }
}

impl FromStr for EvenChance {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "red" => Ok(EvenChance::Red),
            "black" => Ok(EvenChance::Black),
            "odd" => Ok(EvenChance::Odd),
            "even" => Ok(EvenChance::Even),
            "low" | "118" => Ok(EvenChance::Low),
            "high" | "1936" => Ok(EvenChance::High),
            _ => Err(SimError::InvalidConfig(format!("Unknown even-chance bet: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Betting system identifier, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Martingale,
    ReverseMartingale,
    Thirds,
    Fibonacci,
    DAlembert,
    Labouchere,
    Paroli,
    OscarsGrind,
    OneThreeTwoSix,
    Flat,
}

impl StrategyKind {
    /// Menu order.
    pub const ALL: &'static [StrategyKind] = &[
        StrategyKind::Martingale,
        StrategyKind::ReverseMartingale,
        StrategyKind::Thirds,
        StrategyKind::Fibonacci,
        StrategyKind::DAlembert,
        StrategyKind::Labouchere,
        StrategyKind::Paroli,
        StrategyKind::OscarsGrind,
        StrategyKind::OneThreeTwoSix,
        StrategyKind::Flat,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::Martingale => "Double your bet after every loss to recover previous losses.",
            StrategyKind::ReverseMartingale => "Double your bet after every win to maximize streaks.",
            StrategyKind::Thirds => "Bet a flat amount on one third of the table.",
            StrategyKind::Fibonacci => "Follow the Fibonacci sequence for bet sizing.",
            StrategyKind::DAlembert => "Increase your bet by one unit after a loss and decrease by one after a win.",
            StrategyKind::Labouchere => "Use a sequence of numbers to determine bet amounts, adjusting after wins and losses.",
            StrategyKind::Paroli => "Double your bet after every win, banking the profit after three in a row.",
            StrategyKind::OscarsGrind => "Aim for small, steady profits by increasing your bet after wins.",
            StrategyKind::OneThreeTwoSix => "Follow a specific betting sequence to maximize profits during winning streaks.",
            StrategyKind::Flat => "Bet the same amount on every spin without changing your bet size.",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Martingale => "Martingale",
            StrategyKind::ReverseMartingale => "Reverse Martingale",
            StrategyKind::Thirds => "Thirds",
            StrategyKind::Fibonacci => "Fibonacci",
            StrategyKind::DAlembert => "D'Alembert",
            StrategyKind::Labouchere => "Labouchere",
            StrategyKind::Paroli => "Paroli",
            StrategyKind::OscarsGrind => "Oscar's Grind",
            StrategyKind::OneThreeTwoSix => "1-3-2-6",
            StrategyKind::Flat => "Flat Betting",
        };
        write!(f, "{name}")
    }
}

/// Case- and punctuation-insensitive: "Oscar's Grind", "oscars-grind" and
/// "OSCARSGRIND" all parse.
impl FromStr for StrategyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "martingale" => Ok(StrategyKind::Martingale),
            "reversemartingale" | "antimartingale" => Ok(StrategyKind::ReverseMartingale),
            "thirds" => Ok(StrategyKind::Thirds),
            "fibonacci" => Ok(StrategyKind::Fibonacci),
            "dalembert" => Ok(StrategyKind::DAlembert),
            "labouchere" | "cancellation" => Ok(StrategyKind::Labouchere),
            "paroli" => Ok(StrategyKind::Paroli),
            "oscarsgrind" | "oscargrind" => Ok(StrategyKind::OscarsGrind),
            "1326" => Ok(StrategyKind::OneThreeTwoSix),
            "flat" | "flatbetting" => Ok(StrategyKind::Flat),
            _ => Err(SimError::InvalidConfig(format!("Unknown betting system: {s}"))),
        }
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ---------------------------------------------------------------------------
// Halting
// ---------------------------------------------------------------------------

/// Why a run stopped. Every variant still yields a complete report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// All requested spins were played.
    Completed,
    /// The bankroll could not cover the minimum wager.
    InsufficientFunds { required: Decimal, available: Decimal },
    /// The confirmation prompt answered "no" after a win.
    UserStopped,
    /// Settling this spin would exceed the range of exact money.
    BankrollOverflow { spin: u32 },
}

impl HaltReason {
    /// The error equivalent of an early halt, `None` for a completed run.
    pub fn as_error(&self) -> Option<SimError> {
        match self {
            HaltReason::Completed => None,
            HaltReason::InsufficientFunds { required, available } => {
                Some(SimError::InsufficientFunds {
                    required: *required,
                    available: *available,
                })
            }
            HaltReason::UserStopped => Some(SimError::UserStopped),
            HaltReason::BankrollOverflow { spin } => Some(SimError::BankrollOverflow { spin: *spin }),
        }
    }
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Completed => write!(f, "completed"),
            HaltReason::InsufficientFunds { required, available } => write!(
                f,
                "insufficient funds (need ${required:.2}, have ${available:.2})"
            ),
            HaltReason::UserStopped => write!(f, "stopped by user"),
            HaltReason::BankrollOverflow { spin } => {
                write!(f, "bankroll overflow (spin {spin} could not be settled)")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the simulator.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient funds: need ${required:.2}, have ${available:.2}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Simulation stopped by user")]
    UserStopped,

    #[error("Bankroll overflow settling spin {spin}")]
    BankrollOverflow { spin: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
