//! Internal Force Evaluator
//!
//! Axial force, shear and bending moment at any section `x ∈ [0, L]`, summed
//! from the left over the aggregated force series and the distributed loads.
//!
//! Conventions at a concentrated action sitting exactly at `x`:
//!
//! - axial and shear include it (`location <= x`), so both are right-continuous
//!   step functions
//! - the direct moment excludes it (`location < x`); its lever arm is zero
//!   anyway, and a couple has not yet acted
//!
//! Evaluation is stateless; every query recomputes from the stored series.

use super::aggregate::TotalForceSeries;
use super::integrator::{self, Quadrature};
use crate::errors::{BeamError, BeamResult};
use crate::loads::DistributedLoad;

/// A sampled curve, `(x, value)` pairs in increasing `x`
pub type Samples = Vec<(f64, f64)>;

/// Piecewise internal force functions for one solved beam
#[derive(Debug, Clone, PartialEq)]
pub struct InternalForces {
    length: f64,
    totals: TotalForceSeries,
    distributed: Vec<DistributedLoad>,
    resultants: Vec<f64>,
    quadrature: Quadrature,
}

impl InternalForces {
    /// Prepare the evaluator, integrating every distributed load once.
    ///
    /// # Errors
    ///
    /// `Integration` (carrying the load index) when a resultant cannot be computed.
    pub fn new(
        length: f64,
        totals: TotalForceSeries,
        distributed: Vec<DistributedLoad>,
        quadrature: Quadrature,
    ) -> BeamResult<Self> {
        let resultants = distributed
            .iter()
            .enumerate()
            .map(|(i, load)| load.resultant(&quadrature).map_err(|e| e.for_load(i)))
            .collect::<BeamResult<Vec<f64>>>()?;

        Ok(InternalForces {
            length,
            totals,
            distributed,
            resultants,
            quadrature,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// The force series this evaluator sums over
    pub fn totals(&self) -> &TotalForceSeries {
        &self.totals
    }

    /// Total force of each distributed load, in input order
    pub fn resultants(&self) -> &[f64] {
        &self.resultants
    }

    /// Axial force at `x`, tension positive
    pub fn axial_at(&self, x: f64) -> f64 {
        self.totals
            .horizontal
            .iter()
            .filter(|load| load.location <= x)
            .map(|load| -load.magnitude)
            .sum()
    }

    /// Shear force at `x`: upward forces to the left minus distributed load carried so far.
    pub fn shear_at(&self, x: f64) -> BeamResult<f64> {
        let mut shear: f64 = self
            .totals
            .vertical
            .iter()
            .filter(|load| load.location <= x)
            .map(|load| load.magnitude)
            .sum();

        for (i, (load, total)) in self.distributed.iter().zip(&self.resultants).enumerate() {
            let carried = if x <= load.start {
                0.0
            } else if x >= load.end {
                *total
            } else {
                integrator::partial_integral(&load.function, load.start, load.end, x, &self.quadrature)
                    .map_err(|e| e.for_load(i))?
            };
            shear -= carried;
        }
        Ok(shear)
    }

    /// Bending moment at `x` by direct summation, sagging positive.
    pub fn moment_at(&self, x: f64) -> BeamResult<f64> {
        let forces: f64 = self
            .totals
            .vertical
            .iter()
            .filter(|load| load.location < x)
            .map(|load| load.magnitude * (x - load.location))
            .sum();
        let couples: f64 = self
            .totals
            .moments
            .iter()
            .filter(|moment| moment.location < x)
            .map(|moment| moment.magnitude)
            .sum();

        let mut moment = forces - couples;
        for (i, load) in self.distributed.iter().enumerate() {
            moment += load.moment_at(x, &self.quadrature).map_err(|e| e.for_load(i))?;
        }
        Ok(moment)
    }

    /// Net distributed intensity at `x`, downward positive
    pub fn intensity_at(&self, x: f64) -> BeamResult<f64> {
        let mut total = 0.0;
        for (i, load) in self.distributed.iter().enumerate() {
            if !load.covers(x) {
                continue;
            }
            let value = load.function.value_at(x);
            if !value.is_finite() {
                return Err(BeamError::integration(format!("intensity is not finite at x = {}", x)).for_load(i));
            }
            total += value;
        }
        Ok(total)
    }

    /// Bending moment over a uniform grid of `samples` points.
    ///
    /// Integrates the shear with the trapezoid rule from `x = 0`, then applies
    /// each couple as a step from the first grid point at or past its location.
    pub fn moment_grid(&self, samples: usize) -> BeamResult<Samples> {
        let samples = samples.max(2);
        let step = self.length / (samples - 1) as f64;
        let xs: Vec<f64> = (0..samples)
            .map(|i| if i + 1 == samples { self.length } else { step * i as f64 })
            .collect();

        let mut shear = Vec::with_capacity(samples);
        for &x in &xs {
            shear.push(self.shear_at(x)?);
        }

        let mut moment = vec![0.0; samples];
        for i in 1..samples {
            let dx = xs[i] - xs[i - 1];
            moment[i] = moment[i - 1] + 0.5 * (shear[i] + shear[i - 1]) * dx;
        }

        for couple in self.totals.moments.iter() {
            let first = xs.partition_point(|&x| x < couple.location);
            for value in &mut moment[first..] {
                *value -= couple.magnitude;
            }
        }

        Ok(xs.into_iter().zip(moment).collect())
    }

    /// Sorted positions where a diagram may jump or kink, including both ends
    pub fn discontinuities(&self) -> Vec<f64> {
        let mut points: Vec<f64> = vec![0.0, self.length];
        points.extend(self.totals.locations());
        for load in &self.distributed {
            points.push(load.start);
            points.push(load.end);
        }
        points.sort_by(|a, b| a.total_cmp(b));
        points.dedup();
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::aggregate;
    use crate::analysis::equilibrium::build_system;
    use crate::analysis::solver::solve;
    use crate::beam::{Beam, BeamProblem};
    use crate::loads::{LoadFunction, PointLoad, PointMoment};

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn forces(problem: &BeamProblem) -> InternalForces {
        let q = Quadrature::default();
        let solution = solve(&build_system(problem, &q).unwrap()).unwrap();
        let totals = aggregate(problem, &solution);
        InternalForces::new(problem.beam.length, totals, problem.distributed_loads.clone(), q).unwrap()
    }

    #[test]
    fn test_central_point_load() {
        let f = forces(
            &BeamProblem::new("S1", Beam::simply_supported(10.0))
                .with_point_load(PointLoad::vertical(5.0, -100.0)),
        );

        assert!(approx_eq(f.shear_at(4.999).unwrap(), 50.0, EPSILON));
        // Load at x is already included
        assert!(approx_eq(f.shear_at(5.0).unwrap(), -50.0, EPSILON));
        assert!(approx_eq(f.moment_at(5.0).unwrap(), 250.0, EPSILON));
        assert!(approx_eq(f.moment_at(0.0).unwrap(), 0.0, EPSILON));
        assert!(approx_eq(f.moment_at(10.0).unwrap(), 0.0, EPSILON));
    }

    #[test]
    fn test_uniform_load_parabola() {
        let f = forces(
            &BeamProblem::new("U", Beam::simply_supported(6.0))
                .with_distributed_load(DistributedLoad::uniform(0.0, 6.0, 10.0)),
        );

        assert!(approx_eq(f.shear_at(3.0).unwrap(), 0.0, EPSILON));
        assert!(approx_eq(f.shear_at(1.0).unwrap(), 20.0, EPSILON));
        // 30·3 − 10·3²/2
        assert!(approx_eq(f.moment_at(3.0).unwrap(), 45.0, EPSILON));
        assert!(approx_eq(f.intensity_at(2.0).unwrap(), 10.0, EPSILON));
        assert_eq!(f.resultants(), &[60.0]);
    }

    #[test]
    fn test_axial_steps() {
        let f = forces(
            &BeamProblem::new("A", Beam::simply_supported(10.0))
                .with_point_load(PointLoad::horizontal(3.0, 20.0)),
        );

        assert!(approx_eq(f.axial_at(1.0), 20.0, EPSILON));
        assert!(approx_eq(f.axial_at(3.0), 0.0, EPSILON));
        assert!(approx_eq(f.axial_at(8.0), 0.0, EPSILON));
    }

    #[test]
    fn test_point_moment_step() {
        let f = forces(
            &BeamProblem::new("M", Beam::simply_supported(10.0)).with_moment(PointMoment::new(4.0, 20.0)),
        );

        assert!(approx_eq(f.shear_at(7.0).unwrap(), 2.0, EPSILON));
        assert!(approx_eq(f.moment_at(3.0).unwrap(), 6.0, EPSILON));
        assert!(approx_eq(f.moment_at(5.0).unwrap(), -10.0, EPSILON));

        let grid = f.moment_grid(1001).unwrap();
        // The roller reaction at x = L enters the last trapezoid only halfway.
        for (x, m) in grid.iter().filter(|(x, _)| (x - 4.0).abs() > 1e-6 && *x < 10.0) {
            assert!(approx_eq(*m, f.moment_at(*x).unwrap(), 1e-6), "x = {}", x);
        }
    }

    #[test]
    fn test_grid_matches_direct_moment() {
        let f = forces(
            &BeamProblem::new("G", Beam::simply_supported(10.0))
                .with_point_load(PointLoad::vertical(5.0, -100.0))
                .with_distributed_load(DistributedLoad::uniform(2.0, 8.0, 5.0)),
        );

        let grid = f.moment_grid(5000).unwrap();
        assert_eq!(grid.len(), 5000);
        assert_eq!(grid.last().unwrap().0, 10.0);
        // One grid interval straddles the 100 jump in shear: error ≤ 100·dx/2
        for (x, m) in grid.iter().filter(|(x, _)| *x < 10.0) {
            assert!(approx_eq(*m, f.moment_at(*x).unwrap(), 0.15), "x = {}", x);
        }
    }

    #[test]
    fn test_numeric_load_agrees_with_polynomial() {
        let shape = |x: f64| 2.0 + 0.5 * x;
        let closed = forces(
            &BeamProblem::new("P", Beam::simply_supported(8.0))
                .with_distributed_load(DistributedLoad::new(1.0, 7.0, LoadFunction::linear(2.0, 0.5))),
        );
        let numeric = forces(
            &BeamProblem::new("N", Beam::simply_supported(8.0))
                .with_distributed_load(DistributedLoad::new(1.0, 7.0, LoadFunction::numeric("2 + x/2", shape))),
        );

        for x in [0.5, 2.5, 4.0, 6.9, 7.5] {
            assert!(approx_eq(closed.shear_at(x).unwrap(), numeric.shear_at(x).unwrap(), 1e-7));
            assert!(approx_eq(closed.moment_at(x).unwrap(), numeric.moment_at(x).unwrap(), 1e-7));
        }
    }

    #[test]
    fn test_discontinuities() {
        let f = forces(
            &BeamProblem::new("D", Beam::overhanging(10.0, 2.0, 8.0))
                .with_point_load(PointLoad::vertical(5.0, -10.0))
                .with_distributed_load(DistributedLoad::uniform(1.0, 3.0, 4.0)),
        );
        assert_eq!(f.discontinuities(), vec![0.0, 1.0, 2.0, 3.0, 5.0, 8.0, 10.0]);
    }
}
