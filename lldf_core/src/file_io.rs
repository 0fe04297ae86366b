//! # Model Files
//!
//! Bridge models are stored as pretty-printed JSON, conventionally with a
//! `.lldf.json` extension.
//!
//! - **Atomic saves**: write to `<name>.tmp`, sync, then rename over the target
//! - **Version validation**: files from a newer schema are rejected on load
//!
//! ## Example
//!
//! ```rust,no_run
//! use lldf_core::file_io::{load_model, save_model};
//! use lldf_core::model::BridgeModel;
//! use std::path::Path;
//!
//! let path = Path::new("bridge.lldf.json");
//! save_model(&BridgeModel::sample_i_girder(), path)?;
//! let bridge = load_model(path)?;
//! # Ok::<(), lldf_core::errors::LldfError>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{LldfError, LldfResult};
use crate::model::{BridgeModel, SCHEMA_VERSION};

/// Default file extension for bridge models
pub const MODEL_EXTENSION: &str = "lldf.json";

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save a bridge model with an atomic write.
pub fn save_model(model: &BridgeModel, path: &Path) -> LldfResult<()> {
    let json = serde_json::to_string_pretty(model).map_err(|e| LldfError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);
    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| LldfError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| LldfError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| LldfError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LldfError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!("Saved bridge model '{}' to {}", model.meta.bridge_id, path.display());
    Ok(())
}

/// Load a bridge model and check it before handing it out.
///
/// # Returns
///
/// * `Err(LldfError::VersionMismatch)` - File written by a newer schema
/// * `Err(LldfError::SerializationError)` - Invalid JSON
/// * `Err(LldfError::FileError)` - I/O error
/// * `Err(LldfError::InvalidInput)` - Inconsistent framing plan or criteria
pub fn load_model(path: &Path) -> LldfResult<BridgeModel> {
    let mut file =
        File::open(path).map_err(|e| LldfError::file_error("open", path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| LldfError::file_error("read", path.display().to_string(), e.to_string()))?;

    let model: BridgeModel = serde_json::from_str(&contents).map_err(|e| LldfError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&model.meta.version)?;
    model.validate()?;
    debug!(
        "Loaded bridge model '{}': {} spans, {:?}",
        model.meta.bridge_id,
        model.spans.len(),
        model.beam_family
    );
    Ok(model)
}

/// Major versions must match; while the major version is 0 a newer minor
/// version is rejected too.
fn validate_version(file_version: &str) -> LldfResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);
    let mismatch = || LldfError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.lldf.json");

        let model = BridgeModel::sample_u_beam();
        save_model(&model, &path).unwrap();

        let loaded = load_model(&path).unwrap();
        assert_eq!(loaded.meta.bridge_id, "U-BEAM");
        assert_eq!(loaded.spans, model.spans);
        assert_eq!(loaded.criteria, model.criteria);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("atomic.lldf.json");

        save_model(&BridgeModel::sample_i_girder(), &path).unwrap();
        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());
    }

    #[test]
    fn test_tmp_path_keeps_full_name() {
        let tmp = tmp_path_for(Path::new("/data/bridge.lldf.json"));
        assert_eq!(tmp, Path::new("/data/bridge.lldf.json.tmp"));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.3").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_newer_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.lldf.json");

        let mut model = BridgeModel::sample_i_girder();
        model.meta.version = "0.9.0".to_string();
        save_model(&model, &path).unwrap();

        let err = load_model(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.lldf.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_model(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.lldf.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
