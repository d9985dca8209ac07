//! The commit engine: append one new version to the history.
//!
//! A commit folds an incoming document's geometry into the shared vertex
//! pool, names every incoming object by its content hash, links the new
//! version to its parent, and advances the branch pointer. Committing a
//! document identical to the parent is detected and reported as a no-op
//! without touching the document.

use chrono::{DateTime, Utc};

use crate::{
    Result,
    constants::DEFAULT_PRECISION,
    diff::Diff,
    hash::ContentId,
    model::{CityModel, CityObject, ModelError},
    version::{Version, VersionedCityObject},
    vertices::IndexedVertices,
};

/// Terminal state of a commit call.
#[derive(Clone, Debug)]
pub enum CommitOutcome {
    /// The incoming document holds exactly the parent's content; nothing
    /// was persisted and the branch pointer is untouched.
    NoOp,
    /// A version was created and the branch advanced.
    Committed { version_id: ContentId },
}

/// Commit an incoming document on top of the version named by `reference`.
///
/// Timestamped with the current time; see [`commit_dated`].
pub fn commit(
    model: &mut CityModel,
    incoming: &CityModel,
    reference: &str,
    author: &str,
    message: &str,
) -> Result<CommitOutcome> {
    commit_dated(model, incoming, reference, author, message, Utc::now())
}

/// Commit with an explicit timestamp for the created version.
///
/// When no versions exist yet this is the root commit: it has no parent and
/// creates the branch named by `reference` (or the default branch for a bare
/// id ref). Otherwise `reference` must resolve, and a branch ref is advanced
/// to the new version.
pub fn commit_dated(
    model: &mut CityModel,
    incoming: &CityModel,
    reference: &str,
    author: &str,
    message: &str,
    date: DateTime<Utc>,
) -> Result<CommitOutcome> {
    let parent = if model.versioning.versions.is_empty() {
        None
    } else {
        Some(model.versioning.resolve_ref(reference)?)
    };

    // Fold the incoming vertices into the shared pool. Base slots come
    // first, so base objects keep their indices; incoming indices are
    // offset past the base list and then remapped onto dedup slots.
    let offset = model.vertices.len();
    let (mut table, mut remap) = IndexedVertices::build(model, DEFAULT_PRECISION);
    let incoming_transform = incoming.effective_transform();
    for vertex in &incoming.vertices {
        remap.push(table.index_of(incoming_transform.apply(vertex.0)));
    }

    let mut objects: Vec<(String, CityObject)> = Vec::with_capacity(incoming.city_objects.len());
    for (logical_id, object) in &incoming.city_objects {
        let mut object = object.clone();
        for geometry in &mut object.geometry {
            geometry.boundaries.offset_indices(offset);
            geometry.boundaries.remap_indices(&remap).map_err(|index| {
                ModelError::IndexOutOfRange {
                    object: logical_id.clone(),
                    index,
                    len: remap.len(),
                }
            })?;
        }
        objects.push((logical_id.clone(), object));
    }

    let mut versioned: Vec<VersionedCityObject> = Vec::with_capacity(objects.len());
    for (logical_id, object) in objects {
        versioned.push(VersionedCityObject::new(logical_id, object)?);
    }

    if let Some(parent_id) = &parent {
        let (_, parent_version) = model.versioning.get_version(parent_id.as_str())?;
        let diff = Diff::between_objects(parent_version.versioned_objects(model), versioned.clone());
        if diff.is_empty() {
            tracing::info!(parent = %parent_id, "Nothing to commit");
            return Ok(CommitOutcome::NoOp);
        }
    }

    table.update_vertex_list(model);

    let mut version = Version::new(author, message, date, parent.iter().cloned().collect());
    for object in &versioned {
        version.add_object(object);
        model
            .city_objects
            .entry(object.name().to_string())
            .or_insert_with(|| object.object().clone());
    }

    let version_id = version.content_id()?;
    model.versioning.add_version(version_id.clone(), version);

    if model.versioning.is_branch(reference) || parent.is_none() {
        // The root commit creates the branch it was asked to commit on.
        model.versioning.set_branch(reference, version_id.clone())?;
        tracing::info!(version = %version_id, branch = reference, "Created version");
    } else {
        // Committing on a bare version id or tag moves no branch pointer.
        tracing::info!(version = %version_id, reference, "Created detached version");
    }
    Ok(CommitOutcome::Committed { version_id })
}
