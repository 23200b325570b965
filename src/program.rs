//! The rule-table genotype.

use crate::{Move, NUM_STATES, Rule, SimError, Surroundings};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Table slots per state: one per canonical wall pattern.
pub const PATTERNS: usize = Surroundings::CANONICAL.len();
/// Total table slots in a complete program.
pub const TABLE_SIZE: usize = NUM_STATES * PATTERNS;

/// A Picobot program: a table of rules indexed by (state, wall pattern).
///
/// The table is fixed-size with one slot per (state, canonical pattern)
/// pair, `state * 9 + pattern_index`. Slots hold `Option<Rule>` so a program
/// can be partial while it is being assembled; a complete program has all
/// 45 slots populated. Patterns follow the lexicographic order of
/// [`Surroundings::CANONICAL`], so iterating the table in slot order yields
/// the canonical sorted listing.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Program {
    rules: Vec<Option<Rule>>,
}

impl Program {
    /// An empty program with no rules set.
    pub fn new() -> Self {
        Self {
            rules: vec![None; TABLE_SIZE],
        }
    }

    /// A complete random program. Each slot's move is drawn uniformly from
    /// the directions its pattern leaves open, and each next state is
    /// uniform over all states, so every generated rule is legal.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut program = Self::new();
        for state in 0..NUM_STATES {
            for (pattern_index, surroundings) in Surroundings::CANONICAL.iter().enumerate() {
                let open: Vec<Move> = Move::ALL
                    .into_iter()
                    .filter(|&m| !surroundings.blocks(m))
                    .collect();
                // Every canonical pattern has at most two walls.
                let step = open[rng.random_range(0..open.len())];
                program.rules[state * PATTERNS + pattern_index] = Some(Rule {
                    step,
                    next_state: rng.random_range(0..NUM_STATES),
                });
            }
        }
        program
    }

    fn slot(state: usize, surroundings: Surroundings) -> Option<usize> {
        if state >= NUM_STATES {
            return None;
        }
        surroundings.index().map(|p| state * PATTERNS + p)
    }

    /// Looks up the rule for a (state, surroundings) pair.
    ///
    /// Fails with [`SimError::MissingRule`] if the slot was never set or the
    /// pair is outside the table. Callers are expected to run complete
    /// programs; there is no fallback rule.
    pub fn rule(&self, state: usize, surroundings: Surroundings) -> Result<Rule, SimError> {
        Self::slot(state, surroundings)
            .and_then(|slot| self.rules[slot])
            .ok_or(SimError::MissingRule {
                state,
                surroundings,
            })
    }

    /// Sets one rule directly. Legality against the pattern is not checked
    /// here; an illegal move surfaces as a `WallCollision` at simulation
    /// time. Returns `false` if the (state, pattern) pair is outside the
    /// table.
    pub fn set_rule(&mut self, state: usize, surroundings: Surroundings, rule: Rule) -> bool {
        match Self::slot(state, surroundings) {
            Some(slot) => {
                self.rules[slot] = Some(rule);
                true
            }
            None => false,
        }
    }

    /// Clears one rule, leaving the program partial.
    pub fn clear_rule(&mut self, state: usize, surroundings: Surroundings) {
        if let Some(slot) = Self::slot(state, surroundings) {
            self.rules[slot] = None;
        }
    }

    /// Number of populated rules.
    pub fn len(&self) -> usize {
        self.rules.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.iter().all(|r| r.is_none())
    }

    /// Whether all 45 slots are populated.
    pub fn is_complete(&self) -> bool {
        self.rules.iter().all(|r| r.is_some())
    }

    /// Rewrites one populated rule chosen uniformly at random: the move is
    /// redrawn from the directions the pattern leaves open excluding the
    /// current move, and the next state is redrawn uniformly.
    ///
    /// Returns `false` without touching anything when there is nothing to
    /// mutate: the table is empty, or the chosen rule has no alternative
    /// open direction. The latter cannot happen for a complete program,
    /// since every canonical pattern leaves at least two directions open.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) -> bool {
        let populated: Vec<usize> = (0..TABLE_SIZE)
            .filter(|&slot| self.rules[slot].is_some())
            .collect();
        if populated.is_empty() {
            return false;
        }
        let slot = populated[rng.random_range(0..populated.len())];
        let Some(current) = self.rules[slot] else {
            return false;
        };
        let surroundings = Surroundings::CANONICAL[slot % PATTERNS];
        let alternatives: Vec<Move> = Move::ALL
            .into_iter()
            .filter(|&m| !surroundings.blocks(m) && m != current.step)
            .collect();
        if alternatives.is_empty() {
            return false;
        }
        self.rules[slot] = Some(Rule {
            step: alternatives[rng.random_range(0..alternatives.len())],
            next_state: rng.random_range(0..NUM_STATES),
        });
        true
    }

    /// Single-cut crossover along the state axis.
    ///
    /// The cut point is uniform in `{1, 2, 3, 4}`: offspring rules for
    /// states below the cut come from `self`, the rest from `other`. There
    /// is no gene-level mixing within a state.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        let cut = rng.random_range(1..NUM_STATES) * PATTERNS;
        let mut rules = Vec::with_capacity(TABLE_SIZE);
        rules.extend_from_slice(&self.rules[..cut]);
        rules.extend_from_slice(&other.rules[cut..]);
        Self { rules }
    }

    /// Iterates populated rules in canonical (state, pattern) order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Surroundings, Rule)> + '_ {
        self.rules.iter().enumerate().filter_map(|(slot, rule)| {
            rule.map(|r| {
                (
                    slot / PATTERNS,
                    Surroundings::CANONICAL[slot % PATTERNS],
                    r,
                )
            })
        })
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// The canonical listing: one populated rule per line in (state ascending,
/// pattern lexicographic) order, formatted
/// `{state} {pattern} -> {move} {next_state}`. This is the interchange form
/// the external Picobot visualizer consumes.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, surroundings, rule) in self.iter() {
            writeln!(
                f,
                "{} {} -> {} {}",
                state, surroundings, rule.step, rule.next_state
            )?;
        }
        Ok(())
    }
}
