//! Distributed loads
//!
//! A [`DistributedLoad`] acts over `[start, end]` with intensity given by its
//! [`LoadFunction`]. Positive intensity pushes the beam down.

use serde::{Deserialize, Serialize};

use super::function::LoadFunction;
use super::{validate_location, validate_finite};
use crate::analysis::integrator::{self, Quadrature};
use crate::errors::{BeamError, BeamResult};

/// A force-per-length load over a sub-interval of the beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    /// Start of the loaded interval
    pub start: f64,
    /// End of the loaded interval
    pub end: f64,
    /// Intensity shape, evaluated in beam coordinates
    pub function: LoadFunction,
}

impl DistributedLoad {
    /// Create a distributed load over `[start, end]`
    pub fn new(start: f64, end: f64, function: LoadFunction) -> Self {
        DistributedLoad {
            start,
            end,
            function,
        }
    }

    /// Uniform load of `intensity` over `[start, end]`
    pub fn uniform(start: f64, end: f64, intensity: f64) -> Self {
        DistributedLoad::new(start, end, LoadFunction::constant(intensity))
    }

    /// Loaded length
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// True when `x` lies inside the loaded interval (inclusive)
    pub fn covers(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }

    /// Check the interval against a beam of `length` and sample the function.
    ///
    /// A sample at the interval midpoint catches shapes that cannot be
    /// evaluated at all; integration reports anything subtler later.
    pub fn validate(&self, length: f64, field: &str) -> BeamResult<()> {
        validate_location(self.start, length, &format!("{}.start", field))?;
        validate_location(self.end, length, &format!("{}.end", field))?;
        if self.start >= self.end {
            return Err(BeamError::validation(
                format!("{}.end", field),
                self.end.to_string(),
                format!("End must be greater than start ({})", self.start),
            ));
        }
        match &self.function {
            LoadFunction::Constant { value } => validate_finite(*value, &format!("{}.function", field))?,
            LoadFunction::Polynomial { coefficients } => {
                for (i, c) in coefficients.iter().enumerate() {
                    validate_finite(*c, &format!("{}.function.coefficients[{}]", field, i))?;
                }
            }
            LoadFunction::Expression(expr) => expr.validate(&format!("{}.function", field))?,
            _ => {}
        }
        let midpoint = 0.5 * (self.start + self.end);
        let sample = self.function.value_at(midpoint);
        if !sample.is_finite() {
            return Err(BeamError::validation(
                format!("{}.function", field),
                self.function.describe(),
                format!("Function is not finite at x = {}", midpoint),
            ));
        }
        Ok(())
    }

    /// Total force of the load, ∫ w dx over `[start, end]`
    pub fn resultant(&self, quadrature: &Quadrature) -> BeamResult<f64> {
        integrator::definite_integral(&self.function, self.start, self.end, quadrature)
    }

    /// ∫ x·w dx over `[start, end]`, the load's moment about the origin
    pub fn first_moment(&self, quadrature: &Quadrature) -> BeamResult<f64> {
        integrator::first_moment(&self.function, self.start, self.end, quadrature)
    }

    /// Portion of the resultant acting at or left of `x`.
    ///
    /// Zero before `start`, partial inside the interval, full past `end`.
    pub fn resultant_up_to(&self, x: f64, quadrature: &Quadrature) -> BeamResult<f64> {
        if x <= self.start {
            Ok(0.0)
        } else if x >= self.end {
            self.resultant(quadrature)
        } else {
            integrator::partial_integral(&self.function, self.start, self.end, x, quadrature)
        }
    }

    /// Bending moment this load induces at section `x`, taken from the left.
    ///
    /// Equals `-∫ (x - s)·w(s) ds` over the loaded part left of `x`.
    pub fn moment_at(&self, x: f64, quadrature: &Quadrature) -> BeamResult<f64> {
        if x <= self.start {
            return Ok(0.0);
        }
        let upper = x.min(self.end);
        let force = integrator::definite_integral(&self.function, self.start, upper, quadrature)?;
        let first = integrator::first_moment(&self.function, self.start, upper, quadrature)?;
        Ok(-(x * force - first))
    }
}
