//! # Analysis Settings
//!
//! Sampling density for diagrams and limits for adaptive quadrature. Stored
//! in the study file's `settings` block; every field falls back to its default
//! when omitted.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::integrator::Quadrature;
use crate::errors::{BeamError, BeamResult};

/// Fewest grid points allowed for the trapezoidal moment diagram
pub const MIN_MOMENT_GRID_SAMPLES: usize = 1000;
/// Most grid points allowed for the trapezoidal moment diagram
pub const MAX_MOMENT_GRID_SAMPLES: usize = 20_000;
/// Fewest uniform points for axial, shear and load diagrams
pub const MIN_DIAGRAM_SAMPLES: usize = 11;

/// Tunables for one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Grid size for the moment diagram
    pub moment_grid_samples: usize,

    /// Uniform grid size for axial, shear and load diagrams
    pub diagram_samples: usize,

    /// Absolute error target for adaptive quadrature
    pub quadrature_tolerance: f64,

    /// Maximum bisection depth for adaptive quadrature
    pub quadrature_max_depth: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            moment_grid_samples: 5000,
            diagram_samples: 1000,
            quadrature_tolerance: 1e-10,
            quadrature_max_depth: 48,
        }
    }
}

impl AnalysisSettings {
    /// Reject quadrature limits that cannot work
    pub fn validate(&self) -> BeamResult<()> {
        if !self.quadrature_tolerance.is_finite() || self.quadrature_tolerance <= 0.0 {
            return Err(BeamError::validation(
                "settings.quadrature_tolerance",
                self.quadrature_tolerance.to_string(),
                "Tolerance must be a positive number",
            ));
        }
        if self.quadrature_max_depth == 0 {
            return Err(BeamError::validation(
                "settings.quadrature_max_depth",
                "0",
                "Depth must be at least 1",
            ));
        }
        Ok(())
    }

    /// Copy with sample counts pulled into their allowed ranges.
    pub fn normalized(&self) -> AnalysisSettings {
        let mut settings = *self;

        let moment = self
            .moment_grid_samples
            .clamp(MIN_MOMENT_GRID_SAMPLES, MAX_MOMENT_GRID_SAMPLES);
        if moment != self.moment_grid_samples {
            warn!(
                "moment_grid_samples {} outside [{}, {}]; using {}",
                self.moment_grid_samples, MIN_MOMENT_GRID_SAMPLES, MAX_MOMENT_GRID_SAMPLES, moment
            );
            settings.moment_grid_samples = moment;
        }

        if self.diagram_samples < MIN_DIAGRAM_SAMPLES {
            warn!(
                "diagram_samples {} below minimum; using {}",
                self.diagram_samples, MIN_DIAGRAM_SAMPLES
            );
            settings.diagram_samples = MIN_DIAGRAM_SAMPLES;
        }

        settings
    }

    /// Quadrature limits derived from these settings
    pub fn quadrature(&self) -> Quadrature {
        Quadrature {
            tolerance: self.quadrature_tolerance,
            max_depth: self.quadrature_max_depth,
            ..Quadrature::default()
        }
    }
}
