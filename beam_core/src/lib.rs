//! # beam_core - Statically Determinate Beam Analysis Engine
//!
//! `beam_core` solves support reactions for simply supported, overhanging and
//! cantilever beams and evaluates axial force, shear and bending moment along
//! the span. Reactions are solved in exact rational arithmetic; all inputs and
//! outputs are JSON-serializable.
//!
//! ## Sign Convention
//!
//! - Point forces: upward and rightward positive
//! - Point moments and the fixed-end reaction moment: counter-clockwise positive
//! - Distributed load intensity: downward positive
//! - Internal moment: sagging positive; axial force: tension positive
//!
//! ## Quick Start
//!
//! ```rust
//! use beam_core::analysis::analyze;
//! use beam_core::beam::{Beam, BeamProblem, FixedEnd};
//! use beam_core::loads::PointLoad;
//! use beam_core::settings::AnalysisSettings;
//!
//! let problem = BeamProblem::new("C-1", Beam::cantilever(4.0, FixedEnd::Left))
//!     .with_point_load(PointLoad::vertical(4.0, -50.0));
//!
//! let analysis = analyze(&problem, &AnalysisSettings::default()).unwrap();
//! assert!(analysis.is_balanced());
//! assert!((analysis.moment_at(2.0).unwrap() + 100.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`beam`] - Beam geometry, supports and the problem bundle
//! - [`loads`] - Point loads, point moments and distributed load functions
//! - [`analysis`] - Equilibrium, exact solve, internal forces, diagrams
//! - [`settings`] - Sampling and quadrature settings
//! - [`study`] - Multi-problem container persisted to disk
//! - [`file_io`] - Atomic saves and version-checked loads
//! - [`report`] - Plain-text summaries
//! - [`exact`] - Rational helpers
//! - [`units`] - Unit labels
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod beam;
pub mod errors;
pub mod exact;
pub mod file_io;
pub mod loads;
pub mod report;
pub mod settings;
pub mod study;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use analysis::{analyze, AnalysisSummary, BeamAnalysis, ReactionKind};
pub use beam::{Beam, BeamProblem, FixedEnd, SupportConfiguration};
pub use errors::{BeamError, BeamResult};
pub use file_io::{load_study, save_study};
pub use settings::AnalysisSettings;
pub use study::{Study, StudyMetadata, StudySettings};
pub use units::UnitSystem;
