//! # Beam Analysis Pipeline
//!
//! One analysis is a linear pipeline over a validated [`BeamProblem`]:
//!
//! ```text
//! validate → equilibrium::build_system → solver::solve → aggregate::aggregate → evaluator
//! ```
//!
//! [`analyze`] runs it and returns a [`BeamAnalysis`] that answers axial,
//! shear and moment queries at any section and samples full diagrams.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::analysis::{analyze, ReactionKind};
//! use beam_core::beam::{Beam, BeamProblem};
//! use beam_core::loads::PointLoad;
//! use beam_core::settings::AnalysisSettings;
//!
//! let problem = BeamProblem::new("B-1", Beam::simply_supported(10.0))
//!     .with_point_load(PointLoad::vertical(5.0, -100.0));
//!
//! let analysis = analyze(&problem, &AnalysisSettings::default()).unwrap();
//! assert_eq!(analysis.reaction(ReactionKind::RollerVertical), Some(50.0));
//! assert!((analysis.moment_at(5.0).unwrap() - 250.0).abs() < 1e-9);
//! ```

pub mod aggregate;
pub mod diagrams;
pub mod equilibrium;
pub mod evaluator;
pub mod integrator;
pub mod solver;

use log::{debug, warn};
use num::rational::BigRational;
use num::Zero;
use serde::{Deserialize, Serialize};

pub use aggregate::{ForceSeries, TotalForceSeries};
pub use diagrams::{Diagram, Diagrams, Peak};
pub use equilibrium::{EquilibriumSystem, ReactionKind, ReactionSlot};
pub use evaluator::InternalForces;
pub use integrator::Quadrature;
pub use solver::{Reaction, ReactionSolution};

use crate::beam::BeamProblem;
use crate::errors::BeamResult;
use crate::settings::AnalysisSettings;

/// A solved beam
#[derive(Debug, Clone)]
pub struct BeamAnalysis {
    problem: BeamProblem,
    settings: AnalysisSettings,
    system: EquilibriumSystem,
    solution: ReactionSolution,
    forces: InternalForces,
}

/// Solve a beam problem.
///
/// # Errors
///
/// - `Validation` for malformed input or settings
/// - `IndeterminateConfiguration` / `SingularSystem` when the supports cannot
///   carry the loads determinately
/// - `Integration` when a distributed load cannot be integrated
pub fn analyze(problem: &BeamProblem, settings: &AnalysisSettings) -> BeamResult<BeamAnalysis> {
    settings.validate()?;
    problem.validate()?;
    let settings = settings.normalized();
    let quadrature = settings.quadrature();

    if problem.has_numeric_loads() {
        warn!(
            "'{}': numeric load functions integrate by adaptive quadrature (tolerance {:e})",
            problem.label, quadrature.tolerance
        );
    }

    let system = equilibrium::build_system(problem, &quadrature)?;
    debug!("'{}': equilibrium system {:?}", problem.label, system.to_f64());

    let solution = solver::solve(&system)?;
    let totals = aggregate::aggregate(problem, &solution);
    let forces = InternalForces::new(
        problem.beam.length,
        totals,
        problem.distributed_loads.clone(),
        quadrature,
    )?;
    debug!("'{}': analysis complete", problem.label);

    Ok(BeamAnalysis {
        problem: problem.clone(),
        settings,
        system,
        solution,
        forces,
    })
}

impl BeamAnalysis {
    pub fn problem(&self) -> &BeamProblem {
        &self.problem
    }

    /// Settings actually used, after clamping
    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn system(&self) -> &EquilibriumSystem {
        &self.system
    }

    pub fn solution(&self) -> &ReactionSolution {
        &self.solution
    }

    /// Applied loads and reactions per axis
    pub fn totals(&self) -> &TotalForceSeries {
        self.forces.totals()
    }

    /// Float value of one reaction
    pub fn reaction(&self, kind: ReactionKind) -> Option<f64> {
        self.solution.value(kind)
    }

    pub fn axial_at(&self, x: f64) -> f64 {
        self.forces.axial_at(x)
    }

    pub fn shear_at(&self, x: f64) -> BeamResult<f64> {
        self.forces.shear_at(x)
    }

    /// Direct-summation bending moment at `x`
    pub fn moment_at(&self, x: f64) -> BeamResult<f64> {
        self.forces.moment_at(x)
    }

    /// Exact ΣFx, ΣFy, ΣM evaluated at the solved reactions
    pub fn equilibrium_residuals(&self) -> [BigRational; 3] {
        self.system.residuals(&self.solution.exact_values())
    }

    /// True when every residual is exactly zero
    pub fn is_balanced(&self) -> bool {
        self.equilibrium_residuals().iter().all(|r| r.is_zero())
    }

    /// Sample axial, shear, moment and load diagrams
    pub fn diagrams(&self) -> BeamResult<Diagrams> {
        diagrams::build(
            &self.forces,
            self.settings.diagram_samples,
            self.settings.moment_grid_samples,
        )
    }

    /// Reactions plus diagram peaks, ready for reporting or JSON
    pub fn summary(&self) -> BeamResult<AnalysisSummary> {
        let diagrams = self.diagrams()?;
        Ok(AnalysisSummary {
            label: self.problem.label.clone(),
            configuration: self.problem.beam.supports.display_name().to_string(),
            length: self.problem.beam.length,
            reactions: self.solution.reactions.clone(),
            balanced: self.is_balanced(),
            axial_peak: diagrams.axial.peak,
            shear_peak: diagrams.shear.peak,
            moment_peak: diagrams.moment.peak,
            load_peak: diagrams.load.peak,
        })
    }
}

/// Headline results of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub label: String,
    /// Support configuration name
    pub configuration: String,
    pub length: f64,
    pub reactions: Vec<Reaction>,
    /// Equilibrium holds exactly at the solved reactions
    pub balanced: bool,
    pub axial_peak: Peak,
    pub shear_peak: Peak,
    pub moment_peak: Peak,
    pub load_peak: Peak,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::{Beam, FixedEnd};
    use crate::loads::{DistributedLoad, LoadFunction, PointLoad, PointMoment};

    #[test]
    fn test_pipeline_balances() {
        let problem = BeamProblem::new("O", Beam::overhanging(9.0, 1.5, 7.0))
            .with_point_load(PointLoad::vertical(9.0, -12.5))
            .with_point_load(PointLoad::horizontal(4.0, 3.0))
            .with_moment(PointMoment::new(2.0, -7.25))
            .with_distributed_load(DistributedLoad::new(0.0, 9.0, LoadFunction::polynomial(vec![1.0, 0.1, 0.01])));
        let analysis = analyze(&problem, &AnalysisSettings::default()).unwrap();
        assert!(analysis.is_balanced());
    }

    #[test]
    fn test_summary() {
        let problem = BeamProblem::new("C-1", Beam::cantilever(4.0, FixedEnd::Left))
            .with_point_load(PointLoad::vertical(4.0, -50.0));
        let summary = analyze(&problem, &AnalysisSettings::default())
            .unwrap()
            .summary()
            .unwrap();

        assert_eq!(summary.configuration, "Cantilever");
        assert_eq!(summary.reactions.len(), 3);
        assert!(summary.balanced);
        assert!((summary.moment_peak.value + 200.0).abs() < 1e-9);
        assert!((summary.shear_peak.value - 50.0).abs() < 1e-9);

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"fixed_moment\""));
    }

    #[test]
    fn test_invalid_input_stops_pipeline() {
        let problem = BeamProblem::new("bad", Beam::simply_supported(5.0))
            .with_point_load(PointLoad::vertical(6.0, -1.0));
        let err = analyze(&problem, &AnalysisSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION");
    }
}
