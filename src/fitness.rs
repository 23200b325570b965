//! Coverage-based fitness evaluation.

use crate::program::Program;
use crate::world::World;
use crate::{Evaluator, HEIGHT, WIDTH};
use log::warn;
use rand::Rng;
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scores a program by mean room coverage over independent trials.
///
/// Each trial places the agent at a uniformly random interior cell and runs
/// the program for a fixed number of steps; the score is the arithmetic mean
/// of per-trial coverage. Every call recomputes from scratch; this is the
/// dominant cost of the GA.
///
/// Trials are mutually independent, so with the `parallel` feature they run
/// on the rayon pool. Per-trial RNGs are derived from seeds drawn serially
/// from the caller's RNG, so parallel and serial evaluation produce the same
/// result for the same RNG state.
#[derive(Clone, Copy, Debug)]
pub struct CoverageEvaluator {
    pub trials: usize,
    pub steps: usize,
}

impl CoverageEvaluator {
    pub fn new(trials: usize, steps: usize) -> Self {
        Self { trials, steps }
    }
}

fn run_trial(program: &Program, seed: u64, steps: usize) -> f32 {
    let mut rng = Pcg64::seed_from_u64(seed);
    let row = rng.random_range(1..HEIGHT - 1);
    let col = rng.random_range(1..WIDTH - 1);
    let mut world = World::new(row, col, program);
    match world.run(steps) {
        Ok(()) => world.coverage(),
        Err(e) => {
            // Only malformed programs land here; score them zero rather
            // than crediting partial coverage.
            warn!("trial from ({row}, {col}) aborted: {e}");
            0.0
        }
    }
}

impl Evaluator for CoverageEvaluator {
    fn evaluate<R: Rng>(&self, program: &Program, rng: &mut R) -> f32 {
        if self.trials == 0 {
            return 0.0;
        }
        let seeds: Vec<u64> = (0..self.trials).map(|_| rng.random()).collect();

        #[cfg(feature = "parallel")]
        let total: f32 = seeds
            .into_par_iter()
            .map(|seed| run_trial(program, seed, self.steps))
            .sum();

        #[cfg(not(feature = "parallel"))]
        let total: f32 = seeds
            .into_iter()
            .map(|seed| run_trial(program, seed, self.steps))
            .sum();

        total / self.trials as f32
    }
}
