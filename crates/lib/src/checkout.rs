//! Extract one version into a standalone document.

use crate::{Result, model::CityModel};

/// Materialize the version named by `reference` as a plain document.
///
/// The result is a fresh document (never a shared template) whose
/// `CityObjects` map holds the version's objects under their logical ids.
/// The full vertex list and the transform are copied unchanged so the
/// extracted geometry indices stay meaningful; objects the version
/// references but the document no longer holds are skipped with a warning.
pub fn checkout(model: &CityModel, reference: &str) -> Result<CityModel> {
    let (version_id, version) = model.versioning.get_version(reference)?;
    tracing::debug!(version = %version_id, "Extracting version");

    let mut result = CityModel::empty();
    result.kind = model.kind.clone();
    result.version = model.version.clone();
    result.extensions = model.extensions.clone();
    result.metadata = model.metadata.clone();
    result.appearance = model.appearance.clone();
    result.geometry_templates = model.geometry_templates.clone();
    result.vertices = model.vertices.clone();
    result.transform = model.transform.clone();

    for object in version.versioned_objects(model) {
        let logical_id = object.logical_id().to_string();
        result.city_objects.insert(logical_id, object.into_object());
    }

    Ok(result)
}
