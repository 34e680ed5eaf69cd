//! # File I/O Module
//!
//! Study file operations:
//! - **Atomic saves**: write to a `.tmp` sibling, sync, rename over the target
//! - **Version validation**: refuse files written by an incompatible schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::file_io::{load_study, save_study};
//! use beam_core::study::Study;
//! use std::path::Path;
//!
//! let study = Study::new("Engineer", "25-001");
//! save_study(&study, Path::new("study.json"))?;
//! let loaded = load_study(Path::new("study.json"))?;
//! # Ok::<(), beam_core::errors::BeamError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{BeamError, BeamResult};
use crate::study::{Study, SCHEMA_VERSION};

/// Save a study with atomic write semantics.
///
/// 1. Reject numeric load functions, which have no file representation
/// 2. Serialize to pretty JSON
/// 3. Write and fsync a temporary sibling file
/// 4. Rename it over `path`
pub fn save_study(study: &Study, path: &Path) -> BeamResult<()> {
    study.ensure_serializable()?;

    let json = serde_json::to_string_pretty(study).map_err(|e| BeamError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        BeamError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        BeamError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        BeamError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BeamError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("Saved {} problem(s) to {}", study.problem_count(), path.display());
    Ok(())
}

/// Load a study from a file.
///
/// # Errors
///
/// - `FileError` on I/O failure
/// - `SerializationError` for invalid JSON
/// - `VersionMismatch` when the schema version is incompatible
pub fn load_study(path: &Path) -> BeamResult<Study> {
    let mut file = File::open(path)
        .map_err(|e| BeamError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| BeamError::file_error("read", path.display().to_string(), e.to_string()))?;

    let study: Study = serde_json::from_str(&contents).map_err(|e| BeamError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&study.meta.version)?;

    debug!("Loaded {} problem(s) from {}", study.problem_count(), path.display());
    Ok(study)
}

/// `study.json` -> `study.json.tmp`
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> BeamResult<()> {
    let mismatch = || BeamError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version).ok_or_else(mismatch)?;
    let current_parts = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    // On 0.x a newer minor may carry breaking changes
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::{Beam, BeamProblem};
    use crate::loads::{DistributedLoad, LoadFunction, PointLoad};
    use std::env::temp_dir;

    fn temp_study_path(name: &str) -> PathBuf {
        temp_dir().join(format!("beam_core_test_{}.json", name))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_study_path("roundtrip");

        let mut study = Study::new("Test Engineer", "TEST-001");
        let id = study.add_problem(
            BeamProblem::new("B-1", Beam::simply_supported(10.0))
                .with_point_load(PointLoad::vertical(5.0, -100.0))
                .with_distributed_load(DistributedLoad::new(0.0, 10.0, LoadFunction::linear(1.0, 0.5))),
        );
        save_study(&study, &path).unwrap();

        let loaded = load_study(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        assert_eq!(loaded.get_problem(&id), study.get_problem(&id));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_expression_load_survives_save() {
        let path = temp_study_path("expression");

        let mut study = Study::new("Test Engineer", "TEST-002");
        let id = study.add_problem(BeamProblem::new("E-1", Beam::simply_supported(6.0)).with_distributed_load(
            DistributedLoad::new(0.0, 6.0, LoadFunction::expression("3 + 2*exp(-x)*x").unwrap()),
        ));
        save_study(&study, &path).unwrap();

        let loaded = load_study(&path).unwrap();
        let problem = loaded.get_problem(&id).unwrap();
        assert_eq!(Some(problem), study.get_problem(&id));
        assert_eq!(
            problem.distributed_loads[0].function.describe(),
            "w(x) = 3 + 2*exp(-x)*x"
        );

        let before = crate::analyze(study.get_problem(&id).unwrap(), &study.settings.analysis).unwrap();
        let after = crate::analyze(problem, &loaded.settings.analysis).unwrap();
        assert_eq!(before.solution(), after.solution());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_expression_in_file_is_rejected() {
        let path = temp_study_path("bad_expression");
        let mut study = Study::new("Test", "TEST");
        study.add_problem(
            BeamProblem::new("E-2", Beam::simply_supported(2.0))
                .with_distributed_load(DistributedLoad::new(0.0, 2.0, LoadFunction::expression("x").unwrap())),
        );
        save_study(&study, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replace("\"source\": \"x\"", "\"source\": \"x +\"")).unwrap();
        let err = load_study(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_study_path("atomic");
        let tmp_path = tmp_path_for(&path);

        save_study(&Study::new("Test", "TEST"), &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_numeric_function_rejected_before_writing() {
        let path = temp_study_path("numeric");
        let mut study = Study::new("Test", "TEST");
        study.add_problem(BeamProblem::new("N", Beam::simply_supported(2.0)).with_distributed_load(
            DistributedLoad::new(0.0, 2.0, LoadFunction::numeric("x^3", |x: f64| x * x * x)),
        ));

        let err = save_study(&study, &path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        assert!(!path.exists());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.0.5").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_study(&temp_study_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_study_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let err = load_study(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }
}
