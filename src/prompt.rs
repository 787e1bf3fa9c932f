//! "Continue after a win?" confirmation.
//!
//! The runner blocks on a `ConfirmationPrompt` after each winning round
//! when prompting is enabled. A "no" halts the run with `UserStopped`.

use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Snapshot shown to the player before asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptStatus {
    pub spin: u32,
    pub bankroll: Decimal,
    pub wins: u32,
    pub losses: u32,
    pub net: Decimal,
    /// Human-readable strategy state, e.g. the Labouchere line.
    pub strategy: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationPrompt {
    /// `true` to keep playing, `false` to stop.
    fn confirm_continue(&mut self, status: &PromptStatus) -> bool;
}

/// Never asks; always continues.
pub struct AutoContinue;

impl ConfirmationPrompt for AutoContinue {
    fn confirm_continue(&mut self, _status: &PromptStatus) -> bool {
        true
    }
}

/// Line-oriented prompt over any reader/writer pair.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl StdinPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, status: &PromptStatus) -> io::Result<bool> {
        writeln!(self.output, "\n--- Current Status ---")?;
        writeln!(self.output, "Spin Number: {}", status.spin)?;
        writeln!(self.output, "Current Balance: ${:.2}", status.bankroll)?;
        writeln!(self.output, "Total Wins: {}", status.wins)?;
        writeln!(self.output, "Total Losses: {}", status.losses)?;
        writeln!(self.output, "Strategy: {}", status.strategy)?;
        writeln!(self.output, "Net Profit/Loss: ${:.2}", status.net)?;
        writeln!(self.output, "----------------------")?;

        loop {
            write!(self.output, "You won! Do you want to continue gambling? (yes/no): ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(false);
            }
            match line.trim().to_lowercase().as_str() {
                "yes" | "y" => return Ok(true),
                "no" | "n" => return Ok(false),
                _ => writeln!(self.output, "Invalid input. Please enter 'yes' or 'no'.")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ConfirmationPrompt for StdinPrompt<R, W> {
    /// End of input or an I/O failure counts as "no".
    fn confirm_continue(&mut self, status: &PromptStatus) -> bool {
        match self.ask(status) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Prompt failed, stopping the run");
                false
            }
        }
    }
}
