//! Reaction Solver
//!
//! Gauss-Jordan reduction of the 3×4 augmented equilibrium matrix to reduced
//! row-echelon form in exact rational arithmetic. With full rank the
//! coefficient block becomes the identity and the right-hand column holds the
//! reactions in column order.

use log::debug;
use num::rational::BigRational;
use num::{One, Zero};
use serde::{Deserialize, Serialize};

use super::equilibrium::{EquilibriumSystem, ReactionKind, ReactionSlot};
use crate::errors::{BeamError, BeamResult};
use crate::exact;
use crate::loads::Axis;

/// A solved support reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Which unknown this is
    pub kind: ReactionKind,
    /// Where it acts
    pub location: f64,
    /// Solved value, nearest float
    pub value: f64,
    /// Solved value, exact
    #[serde(with = "crate::exact::serde_ratio")]
    pub exact: BigRational,
}

impl Reaction {
    fn new(slot: ReactionSlot, exact: BigRational) -> Self {
        Reaction {
            kind: slot.kind,
            location: slot.location,
            value: exact::to_f64(&exact),
            exact,
        }
    }

    /// True when the reaction is exactly zero
    pub fn is_zero(&self) -> bool {
        self.exact.is_zero()
    }
}

/// Solved reactions in column order: horizontal first, then the two
/// vertical (or vertical + moment) unknowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionSolution {
    pub reactions: Vec<Reaction>,
}

impl ReactionSolution {
    /// Look up a reaction by kind
    pub fn get(&self, kind: ReactionKind) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.kind == kind)
    }

    /// Float value of a reaction by kind
    pub fn value(&self, kind: ReactionKind) -> Option<f64> {
        self.get(kind).map(|r| r.value)
    }

    /// Reactions acting along `axis`
    pub fn along(&self, axis: Axis) -> impl Iterator<Item = &Reaction> + '_ {
        self.reactions.iter().filter(move |r| r.kind.axis() == Some(axis))
    }

    /// The moment reaction, present only for cantilevers
    pub fn moment(&self) -> Option<&Reaction> {
        self.get(ReactionKind::FixedMoment)
    }

    /// Exact values in column order
    pub fn exact_values(&self) -> [BigRational; 3] {
        let mut values: [BigRational; 3] = [exact::zero(), exact::zero(), exact::zero()];
        for (slot, reaction) in values.iter_mut().zip(self.reactions.iter()) {
            *slot = reaction.exact.clone();
        }
        values
    }
}

/// Reduce `matrix` in place to RREF and return the rank of its 3×3 coefficient block.
pub fn reduce_to_rref(matrix: &mut [[BigRational; 4]; 3]) -> usize {
    let mut pivot_row = 0;
    for col in 0..3 {
        if pivot_row == 3 {
            break;
        }
        let Some(found) = (pivot_row..3).find(|&r| !matrix[r][col].is_zero()) else {
            continue;
        };
        matrix.swap(pivot_row, found);

        let pivot = matrix[pivot_row][col].clone();
        for value in matrix[pivot_row].iter_mut() {
            *value = &*value / &pivot;
        }

        for r in 0..3 {
            if r == pivot_row || matrix[r][col].is_zero() {
                continue;
            }
            let factor = matrix[r][col].clone();
            for c in 0..4 {
                let delta = &factor * &matrix[pivot_row][c];
                matrix[r][c] -= delta;
            }
        }
        pivot_row += 1;
    }
    pivot_row
}

/// Solve the equilibrium system.
///
/// # Errors
///
/// `SingularSystem` when the coefficient block has rank below 3.
pub fn solve(system: &EquilibriumSystem) -> BeamResult<ReactionSolution> {
    let mut reduced = system.matrix.clone();
    let rank = reduce_to_rref(&mut reduced);
    if rank < 3 {
        return Err(BeamError::SingularSystem { rank });
    }
    debug_assert!((0..3).all(|i| reduced[i][i].is_one()));

    let reactions: Vec<Reaction> = system
        .slots
        .iter()
        .zip(reduced.iter())
        .map(|(slot, row)| Reaction::new(*slot, row[3].clone()))
        .collect();

    for reaction in &reactions {
        debug!("{} at x = {}: {}", reaction.kind, reaction.location, reaction.exact);
    }

    Ok(ReactionSolution { reactions })
}
