//! Injectable randomness for dice rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait DiceRng {
    /// A face in `1..=sides`. Callers guarantee `sides >= 1`.
    fn roll(&mut self, sides: i64) -> i64;
}

/// Default source: `StdRng` seeded from the OS.
pub struct StdDiceRng(StdRng);

impl StdDiceRng {
    pub fn new() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Reproducible sequence, for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for StdDiceRng {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRng for StdDiceRng {
    fn roll(&mut self, sides: i64) -> i64 {
        if sides <= 1 {
            return 1;
        }
        self.0.gen_range(1..=sides)
    }
}

pub struct Capabilities {
    pub rng: Box<dyn DiceRng>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            rng: Box::new(StdDiceRng::new()),
        }
    }
}
