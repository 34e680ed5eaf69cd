//! # Unit Labels
//!
//! The engine is unit-agnostic: lengths, forces and moments are plain `f64`
//! values in whatever consistent system the caller chose. [`UnitSystem`] only
//! supplies the labels printed next to those numbers in reports.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::units::UnitSystem;
//!
//! let units = UnitSystem::Imperial;
//! assert_eq!(units.length_unit(), "ft");
//! assert_eq!(units.moment_unit(), "ft*lb");
//! ```

use serde::{Deserialize, Serialize};

/// Unit system used to label analysis output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Meters, newtons
    #[default]
    Metric,
    /// Feet, pounds
    Imperial,
}

impl UnitSystem {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric",
            UnitSystem::Imperial => "Imperial",
        }
    }

    /// Length label
    pub fn length_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }

    /// Force label
    pub fn force_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "N",
            UnitSystem::Imperial => "lb",
        }
    }

    /// Moment label
    pub fn moment_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "N*m",
            UnitSystem::Imperial => "ft*lb",
        }
    }

    /// Distributed load (force per length) label
    pub fn distributed_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "N/m",
            UnitSystem::Imperial => "lb/ft",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
