//! # Study Data Structures
//!
//! A [`Study`] is the root container persisted to disk: metadata, settings
//! and any number of beam problems keyed by UUID. Studies serialize to
//! human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Study
//! ├── meta: StudyMetadata (version, engineer, job id, timestamps)
//! ├── settings: StudySettings (unit system, analysis settings)
//! └── items: HashMap<Uuid, BeamProblem>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use beam_core::beam::{Beam, BeamProblem};
//! use beam_core::study::Study;
//!
//! let mut study = Study::new("Jane Engineer", "25-042");
//! let id = study.add_problem(BeamProblem::new("B-1", Beam::simply_supported(6.0)));
//!
//! let json = serde_json::to_string_pretty(&study).unwrap();
//! assert!(json.contains(&id.to_string()));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{analyze, BeamAnalysis};
use crate::beam::BeamProblem;
use crate::errors::{BeamError, BeamResult};
use crate::settings::AnalysisSettings;
use crate::units::UnitSystem;

/// Current schema version for study files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root study container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Study {
    pub meta: StudyMetadata,

    #[serde(default)]
    pub settings: StudySettings,

    /// Beam problems, keyed by UUID
    #[serde(default)]
    pub items: HashMap<Uuid, BeamProblem>,
}

impl Study {
    /// Create a new empty study.
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Study {
            meta: StudyMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                created: now,
                modified: now,
            },
            settings: StudySettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a problem, returning the UUID assigned to it.
    pub fn add_problem(&mut self, problem: BeamProblem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, problem);
        self.touch();
        id
    }

    /// Remove a problem by UUID.
    pub fn remove_problem(&mut self, id: &Uuid) -> Option<BeamProblem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_problem(&self, id: &Uuid) -> Option<&BeamProblem> {
        self.items.get(id)
    }

    /// Mutable access; marks the study as modified when the problem exists.
    pub fn get_problem_mut(&mut self, id: &Uuid) -> Option<&mut BeamProblem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn problem_count(&self) -> usize {
        self.items.len()
    }

    /// Problems ordered by label, then id, for stable output
    pub fn problems_sorted(&self) -> Vec<(&Uuid, &BeamProblem)> {
        let mut problems: Vec<_> = self.items.iter().collect();
        problems.sort_by(|a, b| a.1.label.cmp(&b.1.label).then(a.0.cmp(b.0)));
        problems
    }

    /// Analyze every problem with the study's settings.
    ///
    /// Each problem succeeds or fails on its own.
    pub fn analyze_all(&self) -> Vec<(Uuid, BeamResult<BeamAnalysis>)> {
        self.problems_sorted()
            .into_iter()
            .map(|(id, problem)| (*id, analyze(problem, &self.settings.analysis)))
            .collect()
    }

    /// Fail if any problem carries a load function that cannot be written to disk.
    pub fn ensure_serializable(&self) -> BeamResult<()> {
        for (id, problem) in self.problems_sorted() {
            for (i, load) in problem.distributed_loads.iter().enumerate() {
                if !load.function.is_serializable() {
                    return Err(BeamError::SerializationError {
                        reason: format!(
                            "'{}' ({}) distributed_loads[{}]: numeric function '{}' cannot be saved",
                            problem.label,
                            id,
                            i,
                            load.function.describe()
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for Study {
    fn default() -> Self {
        Study::new("", "")
    }
}

/// Study metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Study-wide settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StudySettings {
    /// Unit labels for reports
    #[serde(default)]
    pub units: UnitSystem,

    #[serde(default)]
    pub analysis: AnalysisSettings,
}
