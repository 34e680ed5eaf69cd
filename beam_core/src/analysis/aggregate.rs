//! Reaction/Force Aggregator
//!
//! Merges the user's applied loads with the solved reactions into the
//! per-axis series the internal force evaluator sums over. Applied loads and
//! reactions are kept in separate fields so consumers can tell them apart
//! without relying on list position.

use log::debug;
use serde::{Deserialize, Serialize};

use super::equilibrium::ReactionKind;
use super::solver::ReactionSolution;
use crate::beam::BeamProblem;
use crate::loads::{Axis, PointLoad, PointMoment};

/// Applied loads and solved reactions of one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSeries<T> {
    /// User-supplied loads, in input order
    pub applied: Vec<T>,
    /// Reactions expressed as loads at their support positions
    pub reactions: Vec<T>,
}

impl<T> Default for ForceSeries<T> {
    fn default() -> Self {
        ForceSeries {
            applied: Vec::new(),
            reactions: Vec::new(),
        }
    }
}

impl<T> ForceSeries<T> {
    /// Applied loads followed by reactions
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.applied.iter().chain(self.reactions.iter())
    }

    pub fn len(&self) -> usize {
        self.applied.len() + self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> ForceSeries<T> {
    /// Flattened copy with reactions last
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

/// Every concentrated action on the beam, reactions included
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalForceSeries {
    pub horizontal: ForceSeries<PointLoad>,
    pub vertical: ForceSeries<PointLoad>,
    pub moments: ForceSeries<PointMoment>,
}

impl TotalForceSeries {
    /// Series for one force axis
    pub fn along(&self, axis: Axis) -> &ForceSeries<PointLoad> {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    /// Every location where a concentrated action sits
    pub fn locations(&self) -> impl Iterator<Item = f64> + '_ {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .map(|load| load.location)
            .chain(self.moments.iter().map(|moment| moment.location))
    }
}

/// Combine applied loads with the solved reactions.
pub fn aggregate(problem: &BeamProblem, solution: &ReactionSolution) -> TotalForceSeries {
    let mut totals = TotalForceSeries {
        horizontal: ForceSeries {
            applied: problem.loads_along(Axis::Horizontal).cloned().collect(),
            reactions: Vec::new(),
        },
        vertical: ForceSeries {
            applied: problem.loads_along(Axis::Vertical).cloned().collect(),
            reactions: Vec::new(),
        },
        moments: ForceSeries {
            applied: problem.moments.clone(),
            reactions: Vec::new(),
        },
    };

    for reaction in &solution.reactions {
        match reaction.kind.axis() {
            Some(Axis::Horizontal) => totals
                .horizontal
                .reactions
                .push(PointLoad::horizontal(reaction.location, reaction.value)),
            Some(Axis::Vertical) => totals
                .vertical
                .reactions
                .push(PointLoad::vertical(reaction.location, reaction.value)),
            None => {
                debug_assert_eq!(reaction.kind, ReactionKind::FixedMoment);
                totals
                    .moments
                    .reactions
                    .push(PointMoment::new(reaction.location, reaction.value));
            }
        }
    }

    debug!(
        "Aggregated {} horizontal, {} vertical, {} moment actions",
        totals.horizontal.len(),
        totals.vertical.len(),
        totals.moments.len()
    );

    totals
}
