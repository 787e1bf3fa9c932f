//! Interactive run setup.
//!
//! Walks the player through every `RunConfig` field on a line-oriented
//! reader/writer pair, re-asking until each answer is valid. Generic over
//! `BufRead`/`Write` so tests drive it with in-memory buffers.

use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::debug;

use crate::bet::BetSpec;
use crate::config::{RunConfig, StrategyConfig, MAX_SPINS};
use crate::types::{BetType, SimError, StrategyKind, WheelType};

/// Ask for a full run configuration. `defaults` supplies the strategy
/// parameters the player is not asked about (min wager, Paroli target).
pub fn collect_run_config<R: BufRead, W: Write>(
    input: R,
    output: W,
    defaults: &StrategyConfig,
) -> Result<RunConfig, SimError> {
    let mut c = Collector { input, output };
    writeln!(c.output, "Welcome to the Roulette Simulator!\n")?;

    let initial_balance = c.ask("Enter your initial balance (e.g., 1000): $", positive_amount(
        "Initial balance must be greater than 0.",
    ))?;

    writeln!(c.output, "\nChoose the type of roulette wheel:")?;
    for (idx, wheel) in WheelType::ALL.iter().enumerate() {
        writeln!(c.output, "{}. {wheel}", idx + 1)?;
    }
    let wheel_type = *c.choose("Enter the number corresponding to your choice: ", WheelType::ALL)?;

    writeln!(c.output, "\nChoose your Bet Type (coverage on the table):")?;
    for (idx, bet_type) in BetType::ALL.iter().enumerate() {
        writeln!(c.output, "{}. {bet_type} -> {}", idx + 1, bet_type.description())?;
    }
    let bet_type = *c.choose(
        "Enter the number corresponding to your bet coverage choice: ",
        BetType::ALL,
    )?;

    writeln!(c.output, "\nChoose a betting system:")?;
    for (idx, kind) in StrategyKind::ALL.iter().enumerate() {
        writeln!(c.output, "{}. {kind}: {}", idx + 1, kind.description())?;
    }
    let kind = *c.choose("Enter the number corresponding to your choice: ", StrategyKind::ALL)?;

    writeln!(c.output, "\nConfigure your {kind} Betting System:")?;
    let mut params = defaults.params(kind, Decimal::ONE);
    let mut bet = BetSpec::standard(bet_type);
    match kind {
        StrategyKind::Labouchere => {
            params.labouchere_sequence = c.ask(
                "Enter your desired sequence of numbers (e.g., 1,2,3): ",
                parse_sequence,
            )?;
        }
        StrategyKind::OscarsGrind => {
            params.oscar_target_units = c.ask(
                "Enter your grind goal in betting units (profit target per cycle, e.g., 1): ",
                positive_amount("Grind goal must be greater than 0."),
            )?;
        }
        StrategyKind::Thirds => {
            let section: u8 = c.ask("Which third of the table do you want to cover? (1, 2 or 3): ", |s| {
                match s.parse::<u8>() {
                    Ok(n) if (1..=3).contains(&n) => Ok(n),
                    _ => Err("Please enter 1, 2 or 3.".to_string()),
                }
            })?;
            bet = BetSpec::dozen(section)?;
        }
        _ => {}
    }

    let wager_prompt = match kind {
        StrategyKind::Flat | StrategyKind::Thirds => "Enter your fixed bet amount (e.g., 10): $",
        StrategyKind::Fibonacci
        | StrategyKind::Labouchere
        | StrategyKind::OscarsGrind
        | StrategyKind::OneThreeTwoSix => "Enter your base bet amount (e.g., 10): $",
        _ => "Enter your initial bet amount (e.g., 10): $",
    };
    let wager = c.ask(wager_prompt, positive_amount("Bet amount must be greater than 0."))?;
    params.base_wager = wager;
    params.min_wager = defaults.min_wager.unwrap_or(wager);

    let spin_count = c.ask("\nEnter the number of spins to simulate (e.g., 100): ", |s| {
        match s.parse::<u32>() {
            Ok(n) if (1..=MAX_SPINS).contains(&n) => Ok(n),
            Ok(_) => Err(format!("Number of spins must be between 1 and {MAX_SPINS}.")),
            Err(_) => Err("Please enter a valid integer.".to_string()),
        }
    })?;

    let prompt_after_win = c.ask("\nDo you want to be prompted after every win? (yes/no): ", |s| {
        match s.to_lowercase().as_str() {
            "yes" | "y" => Ok(true),
            "no" | "n" => Ok(false),
            _ => Err("Invalid choice. Please enter 'yes' or 'no'.".to_string()),
        }
    })?;

    let config = RunConfig {
        initial_balance,
        wheel_type,
        bet,
        strategy: params,
        spin_count,
        prompt_after_win,
    };
    config.validate()?;
    debug!(strategy = %kind, wheel = %wheel_type, spins = spin_count, "Run configured interactively");
    Ok(config)
}

struct Collector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Collector<R, W> {
    /// Prompt until `parse` accepts the trimmed line. End of input is an error.
    fn ask<T>(&mut self, prompt: &str, parse: impl Fn(&str) -> Result<T, String>) -> Result<T, SimError> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(SimError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input ended before the run was configured",
                )));
            }
            match parse(line.trim()) {
                Ok(value) => return Ok(value),
                Err(msg) => writeln!(self.output, "{msg}")?,
            }
        }
    }

    /// Numbered menu choice, 1-based.
    fn choose<'a, T>(&mut self, prompt: &str, options: &'a [T]) -> Result<&'a T, SimError> {
        let count = options.len();
        let idx = self.ask(prompt, |s| match s.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
            Ok(_) => Err(format!("Please enter a number between 1 and {count}.")),
            Err(_) => Err("Please enter a valid number.".to_string()),
        })?;
        Ok(&options[idx])
    }
}

fn positive_amount(err: &'static str) -> impl Fn(&str) -> Result<Decimal, String> {
    move |s| match Decimal::from_str(s) {
        Ok(v) if v > Decimal::ZERO => Ok(v),
        Ok(_) => Err(err.to_string()),
        Err(_) => Err("Please enter a valid number.".to_string()),
    }
}

fn parse_sequence(s: &str) -> Result<Vec<Decimal>, String> {
    let invalid = || "Invalid input. Please enter a valid sequence of positive numbers.".to_string();
    let seq = s
        .split(',')
        .map(|part| Decimal::from_str(part.trim()).map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    if seq.is_empty() || seq.iter().any(|v| *v <= Decimal::ZERO) {
        return Err(invalid());
    }
    Ok(seq)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pocket;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn collect(script: &str) -> (Result<RunConfig, SimError>, String) {
        let mut out = Vec::new();
        let result = collect_run_config(Cursor::new(script.as_bytes()), &mut out, &StrategyConfig::default());
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_martingale_session() {
        // balance, European, single, Martingale, wager, spins, prompt
        let (cfg, out) = collect("1000\n1\n1\n1\n10\n5\nno\n");
        let cfg = cfg.unwrap();
        assert_eq!(cfg.initial_balance, dec!(1000));
        assert_eq!(cfg.wheel_type, WheelType::European);
        assert_eq!(cfg.bet.bet_type(), BetType::Single);
        assert_eq!(cfg.strategy.kind, StrategyKind::Martingale);
        assert_eq!(cfg.strategy.base_wager, dec!(10));
        assert_eq!(cfg.strategy.min_wager, dec!(10));
        assert_eq!(cfg.spin_count, 5);
        assert!(!cfg.prompt_after_win);
        assert!(out.contains("Welcome to the Roulette Simulator!"));
        assert!(out.contains("2. American"));
    }

    #[test]
    fn test_invalid_entries_are_reasked() {
        let (cfg, out) = collect("abc\n-5\n500\n9\n2\n6\n10\n2.5\n0\n2000\n50\nmaybe\ny\n");
        let cfg = cfg.unwrap();
        assert_eq!(cfg.initial_balance, dec!(500));
        assert_eq!(cfg.wheel_type, WheelType::American);
        assert_eq!(cfg.bet.bet_type(), BetType::EvenChance);
        assert_eq!(cfg.strategy.kind, StrategyKind::Flat);
        assert_eq!(cfg.strategy.base_wager, dec!(2.5));
        assert_eq!(cfg.spin_count, 50);
        assert!(cfg.prompt_after_win);
        assert!(out.contains("Please enter a valid number."));
        assert!(out.contains("Initial balance must be greater than 0."));
        assert!(out.contains("Please enter a number between 1 and 2."));
        assert!(out.contains("Number of spins must be between 1 and 1000."));
        assert!(out.contains("Invalid choice. Please enter 'yes' or 'no'."));
    }

    #[test]
    fn test_labouchere_sequence() {
        // Labouchere is menu entry 6
        let (cfg, _) = collect("1000\n1\n6\n6\n1, x\n2,2,2\n5\n10\nno\n");
        let cfg = cfg.unwrap();
        assert_eq!(cfg.strategy.kind, StrategyKind::Labouchere);
        assert_eq!(cfg.strategy.labouchere_sequence, vec![dec!(2), dec!(2), dec!(2)]);
        assert_eq!(cfg.strategy.base_wager, dec!(5));
    }

    #[test]
    fn test_oscars_grind_target() {
        let (cfg, out) = collect("1000\n1\n6\n8\n3\n10\n20\nno\n");
        let cfg = cfg.unwrap();
        assert_eq!(cfg.strategy.kind, StrategyKind::OscarsGrind);
        assert_eq!(cfg.strategy.oscar_target_units, dec!(3));
        assert!(out.contains("Enter your base bet amount"));
    }

    #[test]
    fn test_thirds_covers_chosen_dozen() {
        let (cfg, _) = collect("1000\n1\n1\n3\n3\n10\n20\nno\n");
        let cfg = cfg.unwrap();
        assert_eq!(cfg.strategy.kind, StrategyKind::Thirds);
        assert_eq!(cfg.bet.bet_type(), BetType::Dozen);
        assert!(cfg.bet.covers(Pocket::Number(25)));
        assert!(cfg.bet.covers(Pocket::Number(36)));
        assert!(!cfg.bet.covers(Pocket::Number(24)));
    }

    #[test]
    fn test_eof_is_an_error() {
        let (cfg, _) = collect("1000\n1\n");
        assert!(matches!(cfg, Err(SimError::Io(_))));
    }
}
