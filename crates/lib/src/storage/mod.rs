//! Loading and saving documents.
//!
//! A document is one JSON file. Loading parses and validates once; every
//! later access works on typed records. Saving writes the whole document to
//! a sibling temp file and renames it into place, so a crash mid-save never
//! leaves a half-written document behind.

pub mod errors;

pub use errors::StorageError;

use std::fs;
use std::path::Path;

use crate::{Result, model::CityModel};

/// Load and validate a document.
pub fn load(path: &Path) -> Result<CityModel> {
    let text = fs::read_to_string(path)?;
    let model: CityModel =
        serde_json::from_str(&text).map_err(|e| StorageError::InvalidDocument {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    model.validate()?;

    tracing::debug!(
        path = %path.display(),
        objects = model.city_objects.len(),
        vertices = model.vertices.len(),
        versions = model.versioning.versions.len(),
        "Loaded document"
    );
    Ok(model)
}

/// Load a document that is expected to carry version history.
pub fn load_versioned(path: &Path) -> Result<CityModel> {
    let model = load(path)?;
    if model.versioning.versions.is_empty() {
        return Err(StorageError::NotVersioned {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(model)
}

/// Write the whole document atomically.
pub fn save(model: &CityModel, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(model)?;

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    fs::write(&tmp, text)?;
    fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), "Saved document");
    Ok(())
}
