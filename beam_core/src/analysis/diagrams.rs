//! Sampled diagrams for plotting
//!
//! Axial, shear and load diagrams sample the evaluator on a uniform grid plus
//! points either side of every discontinuity, so steps render as steps. The
//! moment diagram comes from the trapezoidal grid.

use serde::{Deserialize, Serialize};

use super::evaluator::{InternalForces, Samples};
use crate::errors::BeamResult;

/// Largest absolute value on a diagram, sign preserved
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub position: f64,
    pub value: f64,
}

/// One sampled curve and its peak
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    /// `(x, value)` pairs in increasing `x`
    pub points: Samples,
    pub peak: Peak,
}

impl Diagram {
    /// Wrap samples, locating the peak
    pub fn from_points(points: Samples) -> Self {
        let mut peak = Peak::default();
        for &(position, value) in &points {
            if value.abs() > peak.value.abs() {
                peak = Peak { position, value };
            }
        }
        Diagram { points, peak }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample whose position is closest to `x`
    pub fn nearest(&self, x: f64) -> Option<(f64, f64)> {
        self.points
            .iter()
            .copied()
            .min_by(|a, b| (a.0 - x).abs().total_cmp(&(b.0 - x).abs()))
    }
}

/// All four diagrams of one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagrams {
    pub axial: Diagram,
    pub shear: Diagram,
    pub moment: Diagram,
    /// Distributed intensity, downward positive
    pub load: Diagram,
}

/// Uniform positions plus offsets around each critical point.
pub fn sample_positions(length: f64, samples: usize, critical: &[f64]) -> Vec<f64> {
    let samples = samples.max(2);
    let mut positions: Vec<f64> = (0..samples)
        .map(|i| length * i as f64 / (samples - 1) as f64)
        .collect();

    // Small offset for discontinuities
    let epsilon = length * 1e-4;
    for &pos in critical {
        positions.push(pos);
        if pos - epsilon > 0.0 {
            positions.push(pos - epsilon);
        }
        if pos + epsilon < length {
            positions.push(pos + epsilon);
        }
    }

    positions.sort_by(|a, b| a.total_cmp(b));
    positions.dedup_by(|a, b| (*a - *b).abs() < epsilon / 2.0);
    positions
}

/// Sample every diagram for a solved beam.
pub fn build(forces: &InternalForces, diagram_samples: usize, moment_samples: usize) -> BeamResult<Diagrams> {
    let positions = sample_positions(forces.length(), diagram_samples, &forces.discontinuities());

    let mut axial = Vec::with_capacity(positions.len());
    let mut shear = Vec::with_capacity(positions.len());
    let mut load = Vec::with_capacity(positions.len());
    for &x in &positions {
        axial.push((x, forces.axial_at(x)));
        shear.push((x, forces.shear_at(x)?));
        load.push((x, forces.intensity_at(x)?));
    }

    Ok(Diagrams {
        axial: Diagram::from_points(axial),
        shear: Diagram::from_points(shear),
        moment: Diagram::from_points(forces.moment_grid(moment_samples)?),
        load: Diagram::from_points(load),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::aggregate::aggregate;
    use crate::analysis::equilibrium::build_system;
    use crate::analysis::integrator::Quadrature;
    use crate::analysis::solver::solve;
    use crate::beam::{Beam, BeamProblem};
    use crate::loads::{DistributedLoad, PointLoad};

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_sample_positions_bracket_critical_points() {
        let positions = sample_positions(10.0, 11, &[0.0, 3.3, 10.0]);
        assert_eq!(positions.first(), Some(&0.0));
        assert_eq!(positions.last(), Some(&10.0));
        assert!(positions.contains(&3.3));
        assert!(positions.iter().any(|&x| x < 3.3 && x > 3.29));
        assert!(positions.iter().any(|&x| x > 3.3 && x < 3.31));
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_peak_keeps_sign() {
        let diagram = Diagram::from_points(vec![(0.0, 1.0), (1.0, -4.0), (2.0, 3.0)]);
        assert_eq!(diagram.peak, Peak { position: 1.0, value: -4.0 });
        assert_eq!(diagram.nearest(1.2), Some((1.0, -4.0)));
    }

    #[test]
    fn test_build_diagrams() {
        let problem = BeamProblem::new("S", Beam::simply_supported(10.0))
            .with_point_load(PointLoad::vertical(5.0, -100.0))
            .with_distributed_load(DistributedLoad::uniform(0.0, 2.0, 10.0));
        let q = Quadrature::default();
        let solution = solve(&build_system(&problem, &q).unwrap()).unwrap();
        let forces = InternalForces::new(10.0, aggregate(&problem, &solution), problem.distributed_loads.clone(), q)
            .unwrap();

        let diagrams = build(&forces, 101, 2001).unwrap();
        assert_eq!(diagrams.moment.len(), 2001);
        assert!(diagrams.shear.len() > 101);
        assert!(diagrams.axial.points.iter().all(|&(_, v)| v == 0.0));

        // Ay = 50 + 20·9/10 = 68; the load side peak is 68 at x = 0
        assert!(approx_eq(diagrams.shear.peak.value, 68.0, 1e-9));
        assert_eq!(diagrams.load.peak.value, 10.0);
        assert!(diagrams.load.nearest(6.0).map(|(_, v)| v == 0.0).unwrap_or(false));

        // M(5) = 68·5 − 20·4 = 260, less up to 100·dx/2 where the grid steps over the load
        assert!(approx_eq(diagrams.moment.peak.value, 260.0, 0.5));
        assert!(approx_eq(diagrams.moment.peak.position, 5.0, 0.01));
    }
}
