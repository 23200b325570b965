//! Genetic-algorithm search over Picobot rule programs.
//!
//! A [`Program`](program::Program) is a lookup table mapping (internal state,
//! sensed wall pattern) to (move, next state). A [`World`](world::World) runs
//! a program in a bordered 25x25 room, and a
//! [`CoverageEvaluator`](fitness::CoverageEvaluator) scores a program by the
//! fraction of the room it visits, averaged over randomized starting
//! positions. [`TruncationGa`](ga::TruncationGa) evolves a population of
//! programs with elitist truncation selection, single-cut crossover along the
//! state axis, and probabilistic single-rule mutation.
//!
//! ```rust
//! use picobot_genetics::program::Program;
//! use picobot_genetics::world::World;
//! use rand::prelude::SeedableRng;
//! use rand_pcg::Pcg64;
//!
//! let mut rng = Pcg64::seed_from_u64(42);
//! let program = Program::random(&mut rng);
//! let mut world = World::new(12, 12, &program);
//! world.run(500).unwrap();
//! assert!(world.coverage() > 0.0);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod fitness;
pub mod ga;
pub mod program;
pub mod world;

/// Room height in cells, border included.
pub const HEIGHT: usize = 25;
/// Room width in cells, border included.
pub const WIDTH: usize = 25;
/// Number of internal agent states.
pub const NUM_STATES: usize = 5;

/// One of the four single-cell moves.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Move {
    North,
    East,
    West,
    South,
}

impl Move {
    /// All moves, in the N, E, W, S order the pattern encoding uses.
    pub const ALL: [Move; 4] = [Move::North, Move::East, Move::West, Move::South];

    /// Single-letter form used in program listings.
    pub fn letter(self) -> char {
        match self {
            Move::North => 'N',
            Move::East => 'E',
            Move::West => 'W',
            Move::South => 'S',
        }
    }

    /// (row, col) delta of the move. North decrements the row, South
    /// increments it, East increments the column, West decrements it.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Move::North => (-1, 0),
            Move::East => (0, 1),
            Move::West => (0, -1),
            Move::South => (1, 0),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Wall adjacency in the four directions.
///
/// The text form is a 4-character pattern in N, E, W, S position order:
/// the direction letter where a wall is present, `x` where open. In a
/// rectangular room with a solid single-cell border exactly nine patterns
/// are reachable; see [`Surroundings::CANONICAL`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Surroundings {
    pub north: bool,
    pub east: bool,
    pub west: bool,
    pub south: bool,
}

impl Surroundings {
    /// The nine reachable wall patterns, in lexicographic pattern order.
    ///
    /// Program table slots and the canonical listing both follow this order.
    pub const CANONICAL: [Surroundings; 9] = [
        Surroundings::new(true, true, false, false),   // NExx
        Surroundings::new(true, false, true, false),   // NxWx
        Surroundings::new(true, false, false, false),  // Nxxx
        Surroundings::new(false, true, false, true),   // xExS
        Surroundings::new(false, true, false, false),  // xExx
        Surroundings::new(false, false, true, true),   // xxWS
        Surroundings::new(false, false, true, false),  // xxWx
        Surroundings::new(false, false, false, true),  // xxxS
        Surroundings::new(false, false, false, false), // xxxx
    ];

    pub const fn new(north: bool, east: bool, west: bool, south: bool) -> Self {
        Self {
            north,
            east,
            west,
            south,
        }
    }

    /// Whether a wall blocks the given move.
    pub fn blocks(&self, step: Move) -> bool {
        match step {
            Move::North => self.north,
            Move::East => self.east,
            Move::West => self.west,
            Move::South => self.south,
        }
    }

    /// Position of this pattern in [`Surroundings::CANONICAL`], or `None`
    /// for patterns unreachable in a solid-border rectangular room.
    pub fn index(&self) -> Option<usize> {
        Self::CANONICAL.iter().position(|s| s == self)
    }
}

impl fmt::Display for Surroundings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (wall, letter) in [
            (self.north, 'N'),
            (self.east, 'E'),
            (self.west, 'W'),
            (self.south, 'S'),
        ] {
            write!(f, "{}", if wall { letter } else { 'x' })?;
        }
        Ok(())
    }
}

/// The right-hand side of a table entry: where to step and which state to
/// adopt afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Rule {
    pub step: Move,
    pub next_state: usize,
}

/// Simulation failures. Both indicate a malformed program: the engine only
/// ever produces complete programs whose moves respect the wall pattern.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("no rule for state {state} with surroundings {surroundings}")]
    MissingRule {
        state: usize,
        surroundings: Surroundings,
    },
    #[error("move {direction} from ({row}, {col}) hits a wall")]
    WallCollision {
        row: usize,
        col: usize,
        direction: Move,
    },
}

/// Scores a program. The RNG drives trial start positions, letting callers
/// seed runs for reproducibility.
pub trait Evaluator: Send + Sync {
    fn evaluate<R: Rng>(&self, program: &program::Program, rng: &mut R) -> f32;
}

/// Sink for per-generation statistics.
pub trait Reporter {
    fn generation(&mut self, index: usize, average: f32, best: f32);
}
