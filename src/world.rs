//! The room simulator: a bordered rectangular room and one agent.

use crate::program::Program;
use crate::{HEIGHT, SimError, Surroundings, WIDTH};
use std::fmt;

/// A single simulation trial: the room, the agent, and the program driving
/// it.
///
/// The room is a fixed HEIGHT x WIDTH grid whose border cells are walls;
/// the agent starts in state 0 at an interior cell and moves one cell per
/// step under the borrowed program's rules. Cells the agent departs from are
/// flagged visited.
pub struct World<'a> {
    row: usize,
    col: usize,
    state: usize,
    visited: Vec<bool>,
    program: &'a Program,
}

impl<'a> World<'a> {
    /// Places the agent at an interior cell in state 0 with nothing visited
    /// yet.
    ///
    /// # Panics
    ///
    /// Panics if (row, col) is a wall or outside the room.
    pub fn new(row: usize, col: usize, program: &'a Program) -> Self {
        assert!(
            !Self::is_wall(row, col),
            "start ({row}, {col}) must be an interior cell"
        );
        Self {
            row,
            col,
            state: 0,
            visited: vec![false; HEIGHT * WIDTH],
            program,
        }
    }

    fn is_wall(row: usize, col: usize) -> bool {
        row == 0 || row == HEIGHT - 1 || col == 0 || col == WIDTH - 1
    }

    /// Agent (row, col).
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Agent internal state.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Number of cells flagged visited.
    pub fn visited_cells(&self) -> usize {
        self.visited.iter().filter(|&&v| v).count()
    }

    /// Wall adjacency at the agent's current cell.
    pub fn surroundings(&self) -> Surroundings {
        Surroundings::new(
            Self::is_wall(self.row - 1, self.col),
            Self::is_wall(self.row, self.col + 1),
            Self::is_wall(self.row, self.col - 1),
            Self::is_wall(self.row + 1, self.col),
        )
    }

    /// Applies one rule: look up the move for (state, sensed pattern), flag
    /// the current cell visited, step one cell, adopt the rule's next state.
    ///
    /// The current cell is flagged before the move is attempted, so a
    /// colliding step still records where the agent stood. A move into a
    /// wall fails with [`SimError::WallCollision`] and leaves position and
    /// state unchanged; only a malformed program can trigger it.
    pub fn step(&mut self) -> Result<(), SimError> {
        let rule = self.program.rule(self.state, self.surroundings())?;
        self.visited[self.row * WIDTH + self.col] = true;
        let (dr, dc) = rule.step.offset();
        let row = self.row.wrapping_add_signed(dr);
        let col = self.col.wrapping_add_signed(dc);
        if Self::is_wall(row, col) {
            return Err(SimError::WallCollision {
                row: self.row,
                col: self.col,
                direction: rule.step,
            });
        }
        self.row = row;
        self.col = col;
        self.state = rule.next_state;
        Ok(())
    }

    /// Applies exactly `steps` rules. No early termination, no cycle
    /// detection.
    pub fn run(&mut self, steps: usize) -> Result<(), SimError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Fraction of cells flagged visited, out of the full HEIGHT x WIDTH
    /// grid including the border. The border can never be visited, so the
    /// attainable maximum is below 1.0; the fixed denominator keeps scores
    /// comparable across runs.
    pub fn coverage(&self) -> f32 {
        self.visited_cells() as f32 / (HEIGHT * WIDTH) as f32
    }
}

/// Room rendering: `+` wall, `o` visited, `P` the agent, space for
/// unvisited free cells. One newline-terminated line per row.
impl fmt::Display for World<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let ch = if (row, col) == (self.row, self.col) {
                    'P'
                } else if Self::is_wall(row, col) {
                    '+'
                } else if self.visited[row * WIDTH + col] {
                    'o'
                } else {
                    ' '
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
