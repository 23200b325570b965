//! The generational engine: elitist truncation selection over Picobot
//! programs.

use crate::fitness::CoverageEvaluator;
use crate::program::Program;
use crate::{Evaluator, Reporter};
use log::debug;
use rand::Rng;
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Trials per fitness evaluation.
pub const EVAL_TRIALS: usize = 42;
/// Steps per trial when scoring the seed population.
pub const SEED_STEPS: usize = 1000;
/// Steps per trial when scoring offspring. The asymmetry against
/// [`SEED_STEPS`] is deliberate and reproduced from the reference runs.
pub const OFFSPRING_STEPS: usize = 1111;

/// Compare two f32 values, treating NaN as less than all other values.
/// This ensures NaN fitness individuals sort to the end (lowest priority).
fn cmp_f32_nan_last(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// A scored member of the population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub fitness: f32,
    pub program: Program,
}

/// Generational GA with elitist truncation selection.
///
/// Each step keeps the top `pop_size / 10 + 1` individuals as the breeding
/// pool, then refills the population with offspring: two parents drawn
/// uniformly with replacement from the pool, single-cut crossover, a 1/3
/// chance of one point mutation, then evaluation. The population is kept
/// sorted by fitness descending; the sort is stable, so equal-fitness
/// individuals keep their insertion order.
#[derive(Clone, Serialize, Deserialize)]
pub struct TruncationGa {
    population: Vec<Individual>,
    pop_size: usize,
    rng: Pcg64,
}

impl TruncationGa {
    /// An engine with an empty population; call [`seed`](Self::seed) before
    /// stepping.
    ///
    /// # Panics
    ///
    /// Panics if `pop_size` is 0.
    pub fn new(pop_size: usize, seed: u64) -> Self {
        assert!(pop_size > 0, "pop_size must be greater than 0");
        Self {
            population: Vec::with_capacity(pop_size),
            pop_size,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    /// Fills the population with scored random programs, replacing any
    /// previous population.
    pub fn seed<E: Evaluator>(&mut self, evaluator: &E) {
        self.population.clear();
        for _ in 0..self.pop_size {
            let program = Program::random(&mut self.rng);
            let fitness = evaluator.evaluate(&program, &mut self.rng);
            self.population.push(Individual { fitness, program });
        }
        self.sort_population();
    }

    /// One generation: truncate to the breeding pool, breed back up to
    /// `pop_size`, re-sort.
    pub fn step<E: Evaluator>(&mut self, evaluator: &E) {
        if self.population.is_empty() {
            return;
        }

        let pool = (self.pop_size / 10 + 1).min(self.population.len());
        self.population.truncate(pool);
        debug!(
            "breeding from pool of {pool}, best fitness {}",
            self.population[0].fitness
        );

        while self.population.len() < self.pop_size {
            let a = self.rng.random_range(0..pool);
            let b = self.rng.random_range(0..pool);
            let mut child = self.population[a]
                .program
                .crossover(&self.population[b].program, &mut self.rng);
            if self.rng.random_range(0..3) == 0 {
                child.mutate(&mut self.rng);
            }
            let fitness = evaluator.evaluate(&child, &mut self.rng);
            self.population.push(Individual {
                fitness,
                program: child,
            });
        }

        self.sort_population();
    }

    fn sort_population(&mut self) {
        // Stable sort: equal-fitness individuals keep insertion order.
        self.population
            .sort_by(|a, b| cmp_f32_nan_last(b.fitness, a.fitness));
    }

    /// The population, sorted by fitness descending.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// The top-ranked individual, if the population has been seeded.
    pub fn best(&self) -> Option<&Individual> {
        self.population.first()
    }

    pub fn into_best(mut self) -> Option<Individual> {
        if self.population.is_empty() {
            None
        } else {
            Some(self.population.swap_remove(0))
        }
    }

    /// Mean fitness of the current population (0.0 when empty).
    pub fn average_fitness(&self) -> f32 {
        if self.population.is_empty() {
            return 0.0;
        }
        self.population.iter().map(|i| i.fitness).sum::<f32>() / self.population.len() as f32
    }
}

/// Prints the per-generation progress lines.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn generation(&mut self, index: usize, average: f32, best: f32) {
        println!("Generation {index}");
        println!("   Average fitness: {average}");
        println!("   Best fitness: {best}");
        println!();
    }
}

/// Runs the full GA with the reference evaluation budgets: seed scoring at
/// ([`EVAL_TRIALS`], [`SEED_STEPS`]), offspring scoring at
/// ([`EVAL_TRIALS`], [`OFFSPRING_STEPS`]). Reports each generation's
/// statistics before breeding and returns the final best program.
pub fn evolve<R: Reporter>(
    pop_size: usize,
    num_gens: usize,
    seed: u64,
    reporter: &mut R,
) -> Program {
    evolve_with(
        pop_size,
        num_gens,
        seed,
        &CoverageEvaluator::new(EVAL_TRIALS, SEED_STEPS),
        &CoverageEvaluator::new(EVAL_TRIALS, OFFSPRING_STEPS),
        reporter,
    )
}

/// [`evolve`] with explicit evaluators, for experiments and cheap tests.
pub fn evolve_with<E, F, R>(
    pop_size: usize,
    num_gens: usize,
    seed: u64,
    seed_evaluator: &E,
    offspring_evaluator: &F,
    reporter: &mut R,
) -> Program
where
    E: Evaluator,
    F: Evaluator,
    R: Reporter,
{
    let mut ga = TruncationGa::new(pop_size, seed);
    ga.seed(seed_evaluator);

    for generation in 0..num_gens {
        let best = ga.best().map(|i| i.fitness).unwrap_or(0.0);
        reporter.generation(generation, ga.average_fitness(), best);
        ga.step(offspring_evaluator);
    }

    ga.into_best()
        .map(|i| i.program)
        .expect("population is non-empty for pop_size > 0")
}
