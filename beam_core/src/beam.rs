//! # Beam and Problem Definition
//!
//! A [`Beam`] is a length plus one of three statically determinate
//! [`SupportConfiguration`]s. A [`BeamProblem`] bundles a beam with every
//! load acting on it and is the unit of work the analysis pipeline consumes.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::beam::{Beam, BeamProblem};
//! use beam_core::loads::PointLoad;
//!
//! let problem = BeamProblem::new("B-1", Beam::simply_supported(10.0))
//!     .with_point_load(PointLoad::vertical(5.0, -100.0));
//!
//! assert!(problem.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{BeamError, BeamResult};
use crate::loads::{validate_location, Axis, DistributedLoad, PointLoad, PointMoment};

/// Which end of a cantilever is built in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedEnd {
    /// Fixed at x = 0
    #[default]
    Left,
    /// Fixed at x = L
    Right,
}

/// Support arrangement of a single-span beam.
///
/// Each variant yields exactly three unknown reactions, matching the three
/// planar equilibrium equations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SupportConfiguration {
    /// Pin at x = 0, roller at x = L
    SimplySupported,

    /// Roller and pin anywhere on the beam, in either order
    Overhanging {
        /// Roller position
        roller: f64,
        /// Pin position
        pin: f64,
    },

    /// Fixed support at one end, free at the other
    Cantilever {
        #[serde(default)]
        fixed_end: FixedEnd,
    },
}

impl SupportConfiguration {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportConfiguration::SimplySupported => "Simply Supported",
            SupportConfiguration::Overhanging { .. } => "Overhanging",
            SupportConfiguration::Cantilever { .. } => "Cantilever",
        }
    }
}

/// A straight beam with its supports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// Beam length, strictly positive
    pub length: f64,
    /// Support arrangement
    pub supports: SupportConfiguration,
}

impl Beam {
    /// Create a beam, validating length and support positions
    pub fn new(length: f64, supports: SupportConfiguration) -> BeamResult<Self> {
        let beam = Beam { length, supports };
        beam.validate()?;
        Ok(beam)
    }

    /// Pin at 0, roller at `length`
    pub fn simply_supported(length: f64) -> Self {
        Beam {
            length,
            supports: SupportConfiguration::SimplySupported,
        }
    }

    /// Roller and pin at arbitrary positions
    pub fn overhanging(length: f64, roller: f64, pin: f64) -> Self {
        Beam {
            length,
            supports: SupportConfiguration::Overhanging { roller, pin },
        }
    }

    /// Fixed at one end
    pub fn cantilever(length: f64, fixed_end: FixedEnd) -> Self {
        Beam {
            length,
            supports: SupportConfiguration::Cantilever { fixed_end },
        }
    }

    /// Position of the pin (or fixed support), where the horizontal reaction acts
    pub fn horizontal_support(&self) -> f64 {
        match self.supports {
            SupportConfiguration::SimplySupported => 0.0,
            SupportConfiguration::Overhanging { pin, .. } => pin,
            SupportConfiguration::Cantilever { .. } => self.fixed_position(),
        }
    }

    /// Position of the built-in end. Only meaningful for cantilevers.
    pub fn fixed_position(&self) -> f64 {
        match self.supports {
            SupportConfiguration::Cantilever {
                fixed_end: FixedEnd::Right,
            } => self.length,
            _ => 0.0,
        }
    }

    /// Positions of every physical support
    pub fn support_positions(&self) -> Vec<f64> {
        match self.supports {
            SupportConfiguration::SimplySupported => vec![0.0, self.length],
            SupportConfiguration::Overhanging { roller, pin } => vec![roller, pin],
            SupportConfiguration::Cantilever { .. } => vec![self.fixed_position()],
        }
    }

    /// Validate length and support positions
    pub fn validate(&self) -> BeamResult<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(BeamError::validation(
                "beam.length",
                self.length.to_string(),
                "Beam length must be positive",
            ));
        }
        if let SupportConfiguration::Overhanging { roller, pin } = self.supports {
            validate_location(roller, self.length, "beam.supports.roller")?;
            validate_location(pin, self.length, "beam.supports.pin")?;
        }
        Ok(())
    }
}

/// A beam together with every load applied to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamProblem {
    /// User-provided label (e.g., "B-1")
    #[serde(default)]
    pub label: String,

    /// Geometry and supports
    pub beam: Beam,

    /// Concentrated forces, horizontal and vertical, in input order
    #[serde(default)]
    pub point_loads: Vec<PointLoad>,

    /// Concentrated couples
    #[serde(default)]
    pub moments: Vec<PointMoment>,

    /// Distributed loads
    #[serde(default)]
    pub distributed_loads: Vec<DistributedLoad>,
}

impl BeamProblem {
    /// Create a problem with no loads
    pub fn new(label: impl Into<String>, beam: Beam) -> Self {
        BeamProblem {
            label: label.into(),
            beam,
            point_loads: Vec::new(),
            moments: Vec::new(),
            distributed_loads: Vec::new(),
        }
    }

    /// Builder: add a point force
    pub fn with_point_load(mut self, load: PointLoad) -> Self {
        self.point_loads.push(load);
        self
    }

    /// Builder: add a point moment
    pub fn with_moment(mut self, moment: PointMoment) -> Self {
        self.moments.push(moment);
        self
    }

    /// Builder: add a distributed load
    pub fn with_distributed_load(mut self, load: DistributedLoad) -> Self {
        self.distributed_loads.push(load);
        self
    }

    /// Applied forces along one axis, in input order
    pub fn loads_along(&self, axis: Axis) -> impl Iterator<Item = &PointLoad> + '_ {
        self.point_loads.iter().filter(move |load| load.axis == axis)
    }

    /// True if any distributed load needs numeric quadrature
    pub fn has_numeric_loads(&self) -> bool {
        self.distributed_loads
            .iter()
            .any(|load| load.function.needs_quadrature())
    }

    /// Validate the beam and every load against it
    pub fn validate(&self) -> BeamResult<()> {
        self.beam.validate()?;
        let length = self.beam.length;

        for (i, load) in self.point_loads.iter().enumerate() {
            load.validate(length, &format!("point_loads[{}]", i))?;
        }
        for (i, moment) in self.moments.iter().enumerate() {
            moment.validate(length, &format!("moments[{}]", i))?;
        }
        for (i, load) in self.distributed_loads.iter().enumerate() {
            load.validate(length, &format!("distributed_loads[{}]", i))?;
        }
        Ok(())
    }
}
