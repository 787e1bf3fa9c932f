//! Configuration loading from TOML.
//!
//! Reads `config.toml` into strongly-typed structs. Every section and field
//! has a default, so a partial file (or none at all) still yields a usable
//! configuration. `AppConfig::to_run_config` turns the loosely-typed file
//! values into a validated `RunConfig`.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::bet::BetSpec;
use crate::strategy::StrategyParams;
use crate::types::{BetType, EvenChance, Pocket, SimError, StrategyKind, WheelType};

/// Upper bound on spins per run.
pub const MAX_SPINS: u32 = 1000;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub strategy: StrategyConfig,
    pub bet: BetConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_balance: Decimal,
    pub wheel: String,
    pub bet_type: String,
    pub strategy: String,
    pub initial_wager: Decimal,
    pub spins: u32,
    pub prompt_after_win: bool,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_balance: dec!(1000),
            wheel: "european".into(),
            bet_type: "even-chance".into(),
            strategy: "martingale".into(),
            initial_wager: dec!(10),
            spins: 100,
            prompt_after_win: false,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StrategyConfig {
    /// Smallest stake placed before the run halts. Defaults to the base wager.
    pub min_wager: Option<Decimal>,
    /// Labouchere starting line in units of the base wager.
    pub labouchere_sequence: Vec<Decimal>,
    pub oscar_target_units: Decimal,
    pub paroli_target_wins: u32,
    /// Dozen covered by the Thirds system (1, 2 or 3).
    pub thirds_section: u8,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            min_wager: None,
            labouchere_sequence: vec![dec!(1), dec!(2), dec!(3), dec!(4)],
            oscar_target_units: Decimal::ONE,
            paroli_target_wins: 3,
            thirds_section: 2,
        }
    }
}

impl StrategyConfig {
    /// Strategy parameters for `kind` with this section's overrides applied.
    pub fn params(&self, kind: StrategyKind, base_wager: Decimal) -> StrategyParams {
        let mut params = StrategyParams::new(kind, base_wager);
        if let Some(min) = self.min_wager {
            params.min_wager = min;
        }
        params.labouchere_sequence = self.labouchere_sequence.clone();
        params.oscar_target_units = self.oscar_target_units;
        params.paroli_target_wins = self.paroli_target_wins;
        params
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BetConfig {
    /// Explicit covered pockets, e.g. `["0", "00"]` for a split.
    pub numbers: Option<Vec<String>>,
    /// red, black, odd, even, low or high.
    pub even_chance: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub chart_width: usize,
    pub chart_height: usize,
    /// Write the JSON report here when set.
    pub report_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chart_width: 60,
            chart_height: 15,
            report_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        debug!(path, "Configuration loaded");
        Ok(config)
    }

    /// Like `load`, but a missing file yields the built-in defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Resolve the file's values into a validated run configuration.
    pub fn to_run_config(&self) -> Result<RunConfig, SimError> {
        let sim = &self.simulation;
        let wheel_type: WheelType = sim.wheel.parse()?;
        let kind: StrategyKind = sim.strategy.parse()?;
        let bet_type: BetType = sim.bet_type.parse()?;

        let bet = if kind == StrategyKind::Thirds {
            BetSpec::dozen(self.strategy.thirds_section)?
        } else {
            self.bet.resolve(bet_type)?
        };

        let config = RunConfig {
            initial_balance: sim.initial_balance,
            wheel_type,
            bet,
            strategy: self.strategy.params(kind, sim.initial_wager),
            spin_count: sim.spins,
            prompt_after_win: sim.prompt_after_win,
        };
        config.validate()?;
        Ok(config)
    }
}

impl BetConfig {
    fn resolve(&self, bet_type: BetType) -> Result<BetSpec, SimError> {
        if let (BetType::EvenChance, Some(selection)) = (bet_type, &self.even_chance) {
            let selection: EvenChance = selection.parse()?;
            return Ok(BetSpec::even_chance(selection));
        }
        match &self.numbers {
            Some(numbers) => {
                let pockets = numbers
                    .iter()
                    .map(|n| n.parse::<Pocket>())
                    .collect::<Result<Vec<_>, _>>()?;
                BetSpec::new(bet_type, pockets)
            }
            None => Ok(BetSpec::standard(bet_type)),
        }
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything one simulation run needs. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub initial_balance: Decimal,
    pub wheel_type: WheelType,
    pub bet: BetSpec,
    pub strategy: StrategyParams,
    pub spin_count: u32,
    pub prompt_after_win: bool,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.initial_balance <= Decimal::ZERO {
            return Err(SimError::InvalidConfig(format!(
                "Initial balance must be greater than 0, got {}",
                self.initial_balance
            )));
        }
        if !(1..=MAX_SPINS).contains(&self.spin_count) {
            return Err(SimError::InvalidConfig(format!(
                "Number of spins must be between 1 and {MAX_SPINS}, got {}",
                self.spin_count
            )));
        }
        self.bet.validate_for(self.wheel_type)?;
        self.strategy.validate()?;
        if self.strategy.kind == StrategyKind::Thirds && self.bet.bet_type() != BetType::Dozen {
            return Err(SimError::InvalidConfig(
                "Thirds betting covers one dozen of the table".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> AppConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AppConfig::default().to_run_config().unwrap();
        assert_eq!(cfg.initial_balance, dec!(1000));
        assert_eq!(cfg.wheel_type, WheelType::European);
        assert_eq!(cfg.strategy.kind, StrategyKind::Martingale);
        assert_eq!(cfg.strategy.min_wager, dec!(10));
        assert_eq!(cfg.spin_count, 100);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg = parse(
            r#"
            [simulation]
            initial_balance = 250.50
            wheel = "american"
            strategy = "labouchere"
            initial_wager = 5

            [strategy]
            labouchere_sequence = [1, 1, 2]
            "#,
        );
        assert_eq!(cfg.output.chart_width, 60);
        let run = cfg.to_run_config().unwrap();
        assert_eq!(run.initial_balance, dec!(250.50));
        assert_eq!(run.wheel_type, WheelType::American);
        assert_eq!(run.strategy.kind, StrategyKind::Labouchere);
        assert_eq!(run.strategy.labouchere_sequence, vec![dec!(1), dec!(1), dec!(2)]);
        assert_eq!(run.strategy.paroli_target_wins, 3);
    }

    #[test]
    fn test_thirds_forces_dozen() {
        let cfg = parse(
            r#"
            [simulation]
            strategy = "thirds"
            bet_type = "single"
            "#,
        );
        let run = cfg.to_run_config().unwrap();
        assert_eq!(run.bet.bet_type(), BetType::Dozen);
        assert!(run.bet.covers(Pocket::Number(13)));
        assert!(run.bet.covers(Pocket::Number(24)));
        assert!(!run.bet.covers(Pocket::Number(12)));
    }

    #[test]
    fn test_even_chance_selection() {
        let cfg = parse(
            r#"
            [simulation]
            bet_type = "even-chance"
            [bet]
            even_chance = "red"
            "#,
        );
        let run = cfg.to_run_config().unwrap();
        assert!(run.bet.covers(Pocket::Number(1)));
        assert!(!run.bet.covers(Pocket::Number(2)));
    }

    #[test]
    fn test_explicit_numbers() {
        let cfg = parse(
            r#"
            [simulation]
            wheel = "american"
            bet_type = "split"
            [bet]
            numbers = ["0", "00"]
            "#,
        );
        let run = cfg.to_run_config().unwrap();
        assert!(run.bet.covers(Pocket::DoubleZero));

        // 00 does not exist on a European wheel
        let mut european = cfg.clone();
        european.simulation.wheel = "european".into();
        assert!(european.to_run_config().is_err());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut cfg = AppConfig::default();
        cfg.simulation.spins = 0;
        assert!(matches!(cfg.to_run_config(), Err(SimError::InvalidConfig(_))));
        cfg.simulation.spins = MAX_SPINS + 1;
        assert!(cfg.to_run_config().is_err());
        cfg.simulation.spins = MAX_SPINS;
        assert!(cfg.to_run_config().is_ok());

        cfg.simulation.initial_balance = dec!(-1);
        assert!(cfg.to_run_config().is_err());

        let mut cfg = AppConfig::default();
        cfg.simulation.initial_wager = Decimal::ZERO;
        assert!(cfg.to_run_config().is_err());

        let mut cfg = AppConfig::default();
        cfg.simulation.strategy = "roulette-wizard".into();
        assert!(cfg.to_run_config().is_err());
    }

    #[test]
    fn test_min_wager_override() {
        let cfg = parse(
            r#"
            [strategy]
            min_wager = 1
            "#,
        );
        let run = cfg.to_run_config().unwrap();
        assert_eq!(run.strategy.min_wager, dec!(1));
        assert_eq!(run.strategy.base_wager, dec!(10));
    }

    #[test]
    fn test_load_missing_file() {
        let path = "/tmp/roulette_sim_missing_config_8731.toml";
        assert!(AppConfig::load(path).is_err());
        let cfg = AppConfig::load_or_default(path).unwrap();
        assert_eq!(cfg.simulation.spins, 100);
    }

    #[test]
    fn test_load_malformed_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("roulette_sim_bad_config_{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[simulation\nspins = ").unwrap();
        let path = path.to_string_lossy().to_string();
        assert!(AppConfig::load_or_default(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}
