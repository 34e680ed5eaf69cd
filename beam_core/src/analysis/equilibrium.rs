//! Equilibrium System Builder
//!
//! Assembles ΣFx = 0, ΣFy = 0 and ΣM(origin) = 0 into a 3×4 augmented matrix
//! over exact rationals. Columns 0..3 hold the unknown reactions, column 3 the
//! right-hand side.
//!
//! ## Unknown layout
//!
//! | Configuration    | col 0          | col 1            | col 2            |
//! |------------------|----------------|------------------|------------------|
//! | Simply supported | pin Ax @ 0     | pin Ay @ 0       | roller By @ L    |
//! | Overhanging      | pin x @ pin    | roller y @ roller| pin y @ pin      |
//! | Cantilever       | fixed x        | fixed y          | fixed moment     |
//!
//! ## Rows
//!
//! ```text
//! ΣFx:  Rx                         = −Σ Hᵢ
//! ΣFy:  R₁ + R₂                    = −Σ Vᵢ + Σ ∫w
//! ΣM:   x₁R₁ + x₂R₂ (+ M_R)        = −Σ Mᵢ − Σ Vᵢxᵢ + Σ ∫x·w
//! ```
//!
//! Distributed intensity is downward-positive, hence the `+ ∫w` terms.

use std::fmt;

use num::rational::BigRational;
use num::{One, Zero};
use serde::{Deserialize, Serialize};

use super::integrator::{self, Quadrature};
use crate::beam::{BeamProblem, SupportConfiguration};
use crate::errors::{BeamError, BeamResult};
use crate::exact;
use crate::loads::Axis;

/// Named reaction unknowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// Horizontal force at the pin
    PinHorizontal,
    /// Vertical force at the pin
    PinVertical,
    /// Vertical force at the roller
    RollerVertical,
    /// Horizontal force at the fixed support
    FixedHorizontal,
    /// Vertical force at the fixed support
    FixedVertical,
    /// Moment at the fixed support, counter-clockwise positive
    FixedMoment,
}

impl ReactionKind {
    /// Axis the reaction acts along; `None` for the moment reaction
    pub fn axis(&self) -> Option<Axis> {
        match self {
            ReactionKind::PinHorizontal | ReactionKind::FixedHorizontal => Some(Axis::Horizontal),
            ReactionKind::PinVertical | ReactionKind::RollerVertical | ReactionKind::FixedVertical => {
                Some(Axis::Vertical)
            }
            ReactionKind::FixedMoment => None,
        }
    }

    /// Get display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ReactionKind::PinHorizontal => "Pin horizontal",
            ReactionKind::PinVertical => "Pin vertical",
            ReactionKind::RollerVertical => "Roller vertical",
            ReactionKind::FixedHorizontal => "Fixed horizontal",
            ReactionKind::FixedVertical => "Fixed vertical",
            ReactionKind::FixedMoment => "Fixed moment",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One unknown: what it is and where it acts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionSlot {
    pub kind: ReactionKind,
    pub location: f64,
}

/// Unknown-reaction layout for a support configuration, in column order.
pub fn reaction_slots(problem: &BeamProblem) -> [ReactionSlot; 3] {
    let beam = &problem.beam;
    let slot = |kind, location| ReactionSlot { kind, location };
    match beam.supports {
        SupportConfiguration::SimplySupported => [
            slot(ReactionKind::PinHorizontal, 0.0),
            slot(ReactionKind::PinVertical, 0.0),
            slot(ReactionKind::RollerVertical, beam.length),
        ],
        SupportConfiguration::Overhanging { roller, pin } => [
            slot(ReactionKind::PinHorizontal, pin),
            slot(ReactionKind::RollerVertical, roller),
            slot(ReactionKind::PinVertical, pin),
        ],
        SupportConfiguration::Cantilever { .. } => {
            let at = beam.fixed_position();
            [
                slot(ReactionKind::FixedHorizontal, at),
                slot(ReactionKind::FixedVertical, at),
                slot(ReactionKind::FixedMoment, at),
            ]
        }
    }
}

/// Augmented 3×4 equilibrium system plus the unknown each column stands for
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumSystem {
    /// Rows ΣFx, ΣFy, ΣM; last column is the right-hand side
    pub matrix: [[BigRational; 4]; 3],
    /// Column meaning for columns 0..3
    pub slots: [ReactionSlot; 3],
}

impl EquilibriumSystem {
    /// Evaluate `A·r − b` for candidate reaction values, one entry per row.
    ///
    /// All zero exactly when `values` satisfy equilibrium.
    pub fn residuals(&self, values: &[BigRational; 3]) -> [BigRational; 3] {
        let mut out: [BigRational; 3] = [exact::zero(), exact::zero(), exact::zero()];
        for (row, residual) in self.matrix.iter().zip(out.iter_mut()) {
            let mut lhs = BigRational::zero();
            for (coefficient, value) in row.iter().take(3).zip(values.iter()) {
                lhs += coefficient * value;
            }
            *residual = lhs - &row[3];
        }
        out
    }

    /// Floating-point copy of the matrix for display
    pub fn to_f64(&self) -> [[f64; 4]; 3] {
        let mut out = [[0.0; 4]; 3];
        for (src, dst) in self.matrix.iter().zip(out.iter_mut()) {
            for (value, cell) in src.iter().zip(dst.iter_mut()) {
                *cell = exact::to_f64(value);
            }
        }
        out
    }
}

/// Build the equilibrium system for a validated problem.
///
/// # Errors
///
/// - `IndeterminateConfiguration` when two vertical supports coincide
/// - `Integration` when a distributed load cannot be integrated (attributed to its index)
/// - `Validation` when a magnitude is not finite
pub fn build_system(problem: &BeamProblem, quadrature: &Quadrature) -> BeamResult<EquilibriumSystem> {
    let slots = reaction_slots(problem);

    if let SupportConfiguration::Overhanging { roller, pin } = problem.beam.supports {
        if roller == pin {
            return Err(BeamError::indeterminate(format!(
                "roller and pin both at x = {}; the two vertical reactions share a lever arm",
                roller
            )));
        }
    }

    let mut horizontal_sum = BigRational::zero();
    for load in problem.loads_along(Axis::Horizontal) {
        horizontal_sum += exact::lift("point_loads.magnitude", load.magnitude)?;
    }

    let mut vertical_sum = BigRational::zero();
    let mut vertical_moment = BigRational::zero();
    for load in problem.loads_along(Axis::Vertical) {
        let magnitude = exact::lift("point_loads.magnitude", load.magnitude)?;
        let location = exact::lift("point_loads.location", load.location)?;
        vertical_moment += &magnitude * location;
        vertical_sum += magnitude;
    }

    let mut applied_moments = BigRational::zero();
    for moment in &problem.moments {
        applied_moments += exact::lift("moments.magnitude", moment.magnitude)?;
    }

    let mut distributed_force = BigRational::zero();
    let mut distributed_moment = BigRational::zero();
    for (i, load) in problem.distributed_loads.iter().enumerate() {
        distributed_force += integrator::definite_integral_exact(&load.function, load.start, load.end, quadrature)
            .map_err(|e| e.for_load(i))?;
        distributed_moment += integrator::first_moment_exact(&load.function, load.start, load.end, quadrature)
            .map_err(|e| e.for_load(i))?;
    }

    let one = BigRational::one;
    let zero = BigRational::zero;

    let row_fx = [one(), zero(), zero(), -horizontal_sum];
    let rhs_fy = -vertical_sum + distributed_force;
    let rhs_m = -applied_moments - vertical_moment + distributed_moment;

    let (row_fy, row_m) = match problem.beam.supports {
        SupportConfiguration::Cantilever { .. } => {
            // Both forces act at the fixed point; the moment unknown enters ΣM with unit weight.
            let arm = exact::lift("beam.length", slots[1].location)?;
            ([zero(), one(), zero(), rhs_fy], [zero(), arm, one(), rhs_m])
        }
        _ => {
            let first = exact::lift("beam.supports", slots[1].location)?;
            let second = exact::lift("beam.supports", slots[2].location)?;
            ([zero(), one(), one(), rhs_fy], [zero(), first, second, rhs_m])
        }
    };

    Ok(EquilibriumSystem {
        matrix: [row_fx, row_fy, row_m],
        slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::{Beam, FixedEnd};
    use crate::loads::{DistributedLoad, PointLoad, PointMoment};

    fn int(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    #[test]
    fn test_simply_supported_rows() {
        let problem = BeamProblem::new("S", Beam::simply_supported(10.0))
            .with_point_load(PointLoad::vertical(5.0, -100.0))
            .with_point_load(PointLoad::horizontal(2.0, 30.0));
        let system = build_system(&problem, &Quadrature::default()).unwrap();

        assert_eq!(system.matrix[0], [int(1), int(0), int(0), int(-30)]);
        assert_eq!(system.matrix[1], [int(0), int(1), int(1), int(100)]);
        // −(−100·5) = 500
        assert_eq!(system.matrix[2], [int(0), int(0), int(10), int(500)]);
        assert_eq!(system.slots[2].kind, ReactionKind::RollerVertical);
    }

    #[test]
    fn test_distributed_and_moment_terms() {
        let problem = BeamProblem::new("O", Beam::overhanging(6.0, 0.0, 6.0))
            .with_distributed_load(DistributedLoad::uniform(0.0, 6.0, 10.0))
            .with_moment(PointMoment::new(3.0, 12.0));
        let system = build_system(&problem, &Quadrature::default()).unwrap();

        assert_eq!(system.matrix[1][3], int(60));
        // −12 + ∫10x dx over [0, 6] = −12 + 180
        assert_eq!(system.matrix[2], [int(0), int(0), int(6), int(168)]);
        assert_eq!(system.slots[1].kind, ReactionKind::RollerVertical);
        assert_eq!(system.slots[2].kind, ReactionKind::PinVertical);
    }

    #[test]
    fn test_cantilever_carries_moment_unknown() {
        let problem = BeamProblem::new("C", Beam::cantilever(4.0, FixedEnd::Right))
            .with_point_load(PointLoad::vertical(0.0, -50.0));
        let system = build_system(&problem, &Quadrature::default()).unwrap();

        assert_eq!(system.matrix[1], [int(0), int(1), int(0), int(50)]);
        assert_eq!(system.matrix[2], [int(0), int(4), int(1), int(0)]);
        assert!(system.slots.iter().all(|s| s.location == 4.0));
    }

    #[test]
    fn test_coincident_supports_are_indeterminate() {
        let problem = BeamProblem::new("D", Beam::overhanging(6.0, 3.0, 3.0))
            .with_point_load(PointLoad::vertical(1.0, -10.0));
        let err = build_system(&problem, &Quadrature::default()).unwrap_err();
        assert_eq!(err.error_code(), "INDETERMINATE_CONFIGURATION");
    }

    #[test]
    fn test_residuals() {
        let problem = BeamProblem::new("S", Beam::simply_supported(10.0))
            .with_point_load(PointLoad::vertical(5.0, -100.0));
        let system = build_system(&problem, &Quadrature::default()).unwrap();

        let good = system.residuals(&[int(0), int(50), int(50)]);
        assert!(good.iter().all(|r| r.is_zero()));

        let bad = system.residuals(&[int(0), int(40), int(50)]);
        assert_eq!(bad[1], int(-10));
    }
}
