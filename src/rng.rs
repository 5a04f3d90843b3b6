use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::model::Face;

/// Source of dice for ROLL. Must hand back exactly `count` faces in 1-6;
/// the reducer treats anything else as an integration bug.
pub trait DiceRoller {
    fn roll(&mut self, count: usize) -> Vec<Face>;
}

impl<F> DiceRoller for F
where
    F: FnMut(usize) -> Vec<Face>,
{
    fn roll(&mut self, count: usize) -> Vec<Face> { self(count) }
}

/// Reproducible roller: the same seed replays the same game.
#[derive(Debug, Clone)]
pub struct SeededRoller {
    seed: u64,
    rng: StdRng,
}

impl SeededRoller {
    pub fn from_seed(seed: u64) -> Self {
        SeededRoller { seed, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn seed(&self) -> u64 { self.seed }
}

impl DiceRoller for SeededRoller {
    fn roll(&mut self, count: usize) -> Vec<Face> {
        (0..count).map(|_| self.rng.gen_range(1..=6)).collect()
    }
}
