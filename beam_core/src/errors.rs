//! # Error Types
//!
//! Structured error types for beam_core. Every failure of the analysis
//! pipeline is reported as a typed variant; nothing is silently defaulted
//! to zero, since a zero reaction that should not be zero still produces a
//! plausible-looking diagram.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::{BeamError, BeamResult};
//!
//! fn validate_length(length: f64) -> BeamResult<()> {
//!     if length <= 0.0 {
//!         return Err(BeamError::validation(
//!             "beam.length",
//!             length.to_string(),
//!             "Beam length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beam_core operations
pub type BeamResult<T> = Result<T, BeamError>;

/// Structured error type for analysis and persistence operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BeamError {
    /// Malformed or out-of-range load or support input
    #[error("Invalid input for '{field}': {value} - {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    /// Support placement cannot resist the applied loads (e.g. coincident supports)
    #[error("Indeterminate support configuration: {reason}")]
    IndeterminateConfiguration { reason: String },

    /// The equilibrium coefficient matrix is rank deficient
    #[error("Singular equilibrium system: coefficient rank {rank} < 3")]
    SingularSystem { rank: usize },

    /// A distributed load function could not be integrated or evaluated
    #[error("Integration failed{}: {reason}", load_suffix(.load_index))]
    Integration {
        load_index: Option<usize>,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

fn load_suffix(load_index: &Option<usize>) -> String {
    match load_index {
        Some(index) => format!(" for distributed load #{}", index),
        None => String::new(),
    }
}

impl BeamError {
    /// Create a Validation error
    pub fn validation(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BeamError::Validation {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an IndeterminateConfiguration error
    pub fn indeterminate(reason: impl Into<String>) -> Self {
        BeamError::IndeterminateConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an Integration error not yet attributed to a load
    pub fn integration(reason: impl Into<String>) -> Self {
        BeamError::Integration {
            load_index: None,
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        BeamError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attribute an integration failure to the distributed load at `index`.
    ///
    /// Other variants pass through untouched.
    pub fn for_load(self, index: usize) -> Self {
        match self {
            BeamError::Integration { reason, .. } => BeamError::Integration {
                load_index: Some(index),
                reason,
            },
            other => other,
        }
    }

    /// Whether the error aborts the whole analysis.
    ///
    /// Integration failures are scoped to one load's contribution; the caller
    /// may drop that load and rerun.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, BeamError::Integration { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BeamError::Validation { .. } => "VALIDATION",
            BeamError::IndeterminateConfiguration { .. } => "INDETERMINATE_CONFIGURATION",
            BeamError::SingularSystem { .. } => "SINGULAR_SYSTEM",
            BeamError::Integration { .. } => "INTEGRATION",
            BeamError::FileError { .. } => "FILE_ERROR",
            BeamError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BeamError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
