//! Applied loads
//!
//! Value types describing what acts on the beam:
//!
//! - [`PointLoad`] - concentrated force along one [`Axis`]
//! - [`PointMoment`] - concentrated couple
//! - [`DistributedLoad`] - force per unit length over a sub-interval, shaped by a [`LoadFunction`]
//!
//! # Sign Convention
//!
//! - Horizontal forces: positive to the right
//! - Vertical forces: positive upward
//! - Moments: positive counter-clockwise
//! - Distributed load intensity: positive downward
//!
//! # Example
//!
//! ```
//! use beam_core::loads::{DistributedLoad, LoadFunction, PointLoad, PointMoment};
//!
//! let down = PointLoad::vertical(5.0, -100.0);
//! let couple = PointMoment::new(2.0, 40.0);
//! let udl = DistributedLoad::new(0.0, 6.0, LoadFunction::constant(10.0));
//! assert!(down.is_vertical());
//! assert_eq!(couple.magnitude, 40.0);
//! assert_eq!(udl.span(), 6.0);
//! ```

pub mod distributed;
pub mod expression;
pub mod function;

pub use distributed::DistributedLoad;
pub use expression::Expression;
pub use function::{LoadFunction, NumericFn};

use serde::{Deserialize, Serialize};

use crate::errors::{BeamError, BeamResult};

/// Direction a point force acts along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Along the beam axis, positive to the right
    Horizontal,
    /// Transverse to the beam, positive upward
    Vertical,
}

impl Axis {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Axis::Horizontal => "Horizontal",
            Axis::Vertical => "Vertical",
        }
    }
}

/// A concentrated force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Distance from the left end of the beam
    pub location: f64,
    /// Signed magnitude (see module sign convention)
    pub magnitude: f64,
    /// Direction of action
    pub axis: Axis,
}

impl PointLoad {
    /// Create a horizontal force (positive to the right)
    pub fn horizontal(location: f64, magnitude: f64) -> Self {
        PointLoad {
            location,
            magnitude,
            axis: Axis::Horizontal,
        }
    }

    /// Create a vertical force (positive upward)
    pub fn vertical(location: f64, magnitude: f64) -> Self {
        PointLoad {
            location,
            magnitude,
            axis: Axis::Vertical,
        }
    }

    /// True for vertical forces
    pub fn is_vertical(&self) -> bool {
        self.axis == Axis::Vertical
    }

    /// Check location and magnitude against a beam of `length`.
    pub fn validate(&self, length: f64, field: &str) -> BeamResult<()> {
        validate_location(self.location, length, field)?;
        validate_finite(self.magnitude, &format!("{}.magnitude", field))
    }
}

/// A concentrated couple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMoment {
    /// Distance from the left end of the beam
    pub location: f64,
    /// Signed magnitude, positive counter-clockwise
    pub magnitude: f64,
}

impl PointMoment {
    /// Create a point moment
    pub fn new(location: f64, magnitude: f64) -> Self {
        PointMoment {
            location,
            magnitude,
        }
    }

    /// Check location and magnitude against a beam of `length`.
    pub fn validate(&self, length: f64, field: &str) -> BeamResult<()> {
        validate_location(self.location, length, field)?;
        validate_finite(self.magnitude, &format!("{}.magnitude", field))
    }
}

/// Reject positions outside `[0, length]`.
pub(crate) fn validate_location(location: f64, length: f64, field: &str) -> BeamResult<()> {
    if !location.is_finite() || location < 0.0 || location > length {
        return Err(BeamError::validation(
            format!("{}.location", field),
            location.to_string(),
            format!("Location must lie on the beam [0, {}]", length),
        ));
    }
    Ok(())
}

pub(crate) fn validate_finite(value: f64, field: &str) -> BeamResult<()> {
    if !value.is_finite() {
        return Err(BeamError::validation(field, value.to_string(), "Value must be finite"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_load_constructors() {
        let h = PointLoad::horizontal(2.0, 15.0);
        assert_eq!(h.axis, Axis::Horizontal);
        assert!(!h.is_vertical());

        let v = PointLoad::vertical(3.0, -20.0);
        assert!(v.is_vertical());
        assert_eq!(v.magnitude, -20.0);
    }

    #[test]
    fn test_location_validation() {
        assert!(PointLoad::vertical(0.0, 1.0).validate(10.0, "load").is_ok());
        assert!(PointLoad::vertical(10.0, 1.0).validate(10.0, "load").is_ok());

        let err = PointLoad::vertical(10.5, 1.0).validate(10.0, "loads[0]").unwrap_err();
        match err {
            BeamError::Validation { field, .. } => assert_eq!(field, "loads[0].location"),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(PointMoment::new(-0.1, 5.0).validate(10.0, "moment").is_err());
        assert!(PointMoment::new(1.0, f64::NAN).validate(10.0, "moment").is_err());
    }

    #[test]
    fn test_serialization() {
        let load = PointLoad::vertical(5.0, -100.0);
        let json = serde_json::to_string(&load).unwrap();
        assert!(json.contains("\"axis\":\"vertical\""));

        let roundtrip: PointLoad = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, load);
    }
}
