//! Roulette wheel.
//!
//! `Spinner` abstracts the source of outcomes so a run can be driven by a
//! real RNG-backed wheel or by a fixed script of pockets.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::types::{Outcome, Pocket, WheelType};

/// Source of spin outcomes.
pub trait Spinner {
    /// Produce the next outcome. Each call is independent of the last.
    fn spin(&mut self) -> Outcome;

    /// Layout this spinner draws from.
    fn wheel_type(&self) -> WheelType;
}

/// Uniform random wheel.
pub struct Wheel<R: Rng = StdRng> {
    wheel_type: WheelType,
    pockets: Vec<Pocket>,
    rng: R,
}

impl Wheel<StdRng> {
    /// Wheel seeded from OS entropy.
    pub fn new(wheel_type: WheelType) -> Self {
        Self::with_rng(wheel_type, StdRng::from_entropy())
    }

    /// Reproducible wheel.
    pub fn seeded(wheel_type: WheelType, seed: u64) -> Self {
        Self::with_rng(wheel_type, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Wheel<R> {
    pub fn with_rng(wheel_type: WheelType, rng: R) -> Self {
        Self {
            wheel_type,
            pockets: wheel_type.pockets(),
            rng,
        }
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }
}

impl<R: Rng> Spinner for Wheel<R> {
    fn spin(&mut self) -> Outcome {
        let idx = self.rng.gen_range(0..self.pockets.len());
        Outcome::new(self.pockets[idx])
    }

    fn wheel_type(&self) -> WheelType {
        self.wheel_type
    }
}

/// Replays a fixed list of pockets, wrapping around when exhausted.
pub struct ScriptedSpinner {
    wheel_type: WheelType,
    script: VecDeque<Pocket>,
}

impl ScriptedSpinner {
    /// An empty script falls back to spinning zero forever.
    pub fn new(wheel_type: WheelType, pockets: impl IntoIterator<Item = Pocket>) -> Self {
        let mut script: VecDeque<Pocket> = pockets.into_iter().collect();
        if script.is_empty() {
            script.push_back(Pocket::Zero);
        }
        Self { wheel_type, script }
    }
}

impl Spinner for ScriptedSpinner {
    fn spin(&mut self) -> Outcome {
        let pocket = self.script.pop_front().unwrap_or(Pocket::Zero);
        self.script.push_back(pocket);
        Outcome::new(pocket)
    }

    fn wheel_type(&self) -> WheelType {
        self.wheel_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seeded_wheel_is_reproducible() {
        let mut a = Wheel::seeded(WheelType::European, 7);
        let mut b = Wheel::seeded(WheelType::European, 7);
        let run_a: Vec<_> = (0..50).map(|_| a.spin()).collect();
        let run_b: Vec<_> = (0..50).map(|_| b.spin()).collect();
        assert_eq!(run_a, run_b);
    }

    #[test]
    fn test_european_never_spins_double_zero() {
        let mut wheel = Wheel::seeded(WheelType::European, 1);
        assert!((0..2000).all(|_| wheel.spin().pocket != Pocket::DoubleZero));
    }

    #[test]
    fn test_american_reaches_every_pocket() {
        let mut wheel = Wheel::seeded(WheelType::American, 99);
        let seen: HashSet<Pocket> = (0..5000).map(|_| wheel.spin().pocket).collect();
        assert_eq!(seen.len(), wheel.pockets().len());
        assert!(seen.contains(&Pocket::DoubleZero));
    }

    #[test]
    fn test_outcome_color_matches_pocket() {
        let mut wheel = Wheel::seeded(WheelType::American, 3);
        for _ in 0..200 {
            let outcome = wheel.spin();
            assert_eq!(outcome.color, outcome.pocket.color());
        }
    }

    #[test]
    fn test_scripted_spinner_wraps() {
        let mut spinner = ScriptedSpinner::new(
            WheelType::European,
            [Pocket::Number(5), Pocket::Zero],
        );
        let pockets: Vec<_> = (0..5).map(|_| spinner.spin().pocket).collect();
        assert_eq!(
            pockets,
            vec![Pocket::Number(5), Pocket::Zero, Pocket::Number(5), Pocket::Zero, Pocket::Number(5)]
        );
    }

    #[test]
    fn test_scripted_spinner_empty_script() {
        let mut spinner = ScriptedSpinner::new(WheelType::American, Vec::new());
        assert_eq!(spinner.spin().pocket, Pocket::Zero);
        assert_eq!(spinner.wheel_type(), WheelType::American);
    }
}
