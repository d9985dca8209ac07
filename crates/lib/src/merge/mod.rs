//! Three-way merge of divergent branches.
//!
//! Merging `source` into `dest` is a one-shot sequential computation with
//! three terminal outcomes: nothing to merge, a list of conflicts (no
//! version created, nothing written), or a new two-parent merge version.
//! Failures are never retried; the operator re-invokes after fixing the
//! cause.
//!
//! Conflict detection is field-path grained: when both sides changed the
//! same object, each side's changes are measured against the common ancestor
//! as flat field-path deltas ([`delta`]). Disjoint deltas are applied on top
//! of the ancestor content automatically; overlapping deltas are a genuine
//! conflict. Arrays are atomic leaves, so concurrent geometry edits to the
//! same object always conflict.

pub mod delta;
pub mod errors;

pub use errors::MergeError;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::{
    Error, Result,
    hash::ContentId,
    history::History,
    model::CityModel,
    version::{Version, VersionedCityObject},
};

/// Why one logical id could not be merged automatically.
#[derive(Clone, Debug)]
pub enum ConflictReason {
    /// Both sides changed the object and their field changes overlap.
    FieldOverlap {
        /// Dotted path of the first overlapping field.
        path: String,
    },
    /// Both sides added the object with different content.
    BothAdded,
    /// One side removed the object while the other changed it.
    RemovedAndChanged {
        /// "source" or "dest": the side that removed the object.
        removed_in: &'static str,
    },
}

/// One object the merge could not resolve.
#[derive(Clone, Debug)]
pub struct Conflict {
    pub logical_id: String,
    pub reason: ConflictReason,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            ConflictReason::FieldOverlap { path } => {
                write!(f, "{}: both sides changed field '{}'", self.logical_id, path)
            }
            ConflictReason::BothAdded => {
                write!(f, "{}: added on both sides with different content", self.logical_id)
            }
            ConflictReason::RemovedAndChanged { removed_in } => {
                write!(
                    f,
                    "{}: removed in {} but changed on the other side",
                    self.logical_id, removed_in
                )
            }
        }
    }
}

/// Terminal state of a merge call.
#[derive(Clone, Debug)]
pub enum MergeOutcome {
    /// Source and destination are the same version; nothing to do.
    NoOp,
    /// The merge could not be resolved; no version was created.
    Conflicts(Vec<Conflict>),
    /// A merge version was created and, for a branch destination, the
    /// branch pointer advanced.
    Merged { version_id: ContentId },
}

/// Merge the version named by `source` into the one named by `dest`.
///
/// Timestamped with the current time; see [`merge_dated`] for the full
/// semantics.
pub fn merge(model: &mut CityModel, source: &str, dest: &str, author: &str) -> Result<MergeOutcome> {
    merge_dated(model, source, dest, author, Utc::now())
}

/// Merge with an explicit timestamp for the created version.
///
/// If `dest` names a branch, a successful merge advances that branch to the
/// new version. Merging backward (the destination already being an ancestor
/// of the source) is refused; fast-forward the branch instead.
pub fn merge_dated(
    model: &mut CityModel,
    source: &str,
    dest: &str,
    author: &str,
    date: DateTime<Utc>,
) -> Result<MergeOutcome> {
    let (source_id, _) = model.versioning.get_version(source)?;
    let (dest_id, _) = model.versioning.get_version(dest)?;

    if source_id == dest_id {
        tracing::debug!(version = %source_id, "Source and destination are identical");
        return Ok(MergeOutcome::NoOp);
    }

    let history = History::new(&model.versioning)?;
    if history.is_ancestor(&dest_id, &source_id)? {
        return Err(MergeError::FastForwardOnly {
            source_ref: source.to_string(),
            dest: dest.to_string(),
        }
        .into());
    }

    let ancestor_id = history.lowest_common_ancestor(&source_id, &dest_id)?;
    tracing::debug!(
        source = %source_id,
        dest = %dest_id,
        ancestor = %ancestor_id,
        "Merging"
    );

    let base_objects = objects_by_logical_id(model, &ancestor_id)?;
    let source_objects = objects_by_logical_id(model, &source_id)?;
    let dest_objects = objects_by_logical_id(model, &dest_id)?;

    let mut merged: Vec<VersionedCityObject> = Vec::new();
    let mut conflicts: Vec<Conflict> = Vec::new();

    let logical_ids: BTreeSet<&String> = base_objects
        .keys()
        .chain(source_objects.keys())
        .chain(dest_objects.keys())
        .collect();

    for logical_id in logical_ids {
        let base = base_objects.get(logical_id);
        let ours = source_objects.get(logical_id);
        let theirs = dest_objects.get(logical_id);

        match resolve_object(logical_id, base, ours, theirs)? {
            Resolution::Keep(object) => merged.push(object),
            Resolution::Drop => {}
            Resolution::Conflict(conflict) => conflicts.push(conflict),
        }
    }

    if !conflicts.is_empty() {
        tracing::warn!(count = conflicts.len(), "Merge produced conflicts");
        return Ok(MergeOutcome::Conflicts(conflicts));
    }

    let mut version = Version::new(
        author,
        format!("Merge {source} to {dest}"),
        date,
        vec![source_id, dest_id],
    );
    for object in &merged {
        version.add_object(object);
        model
            .city_objects
            .entry(object.name().to_string())
            .or_insert_with(|| object.object().clone());
    }

    let version_id = version.content_id()?;
    model.versioning.add_version(version_id.clone(), version);
    if model.versioning.is_branch(dest) {
        model.versioning.set_branch(dest, version_id.clone())?;
    }

    tracing::info!(version = %version_id, "Created merge version");
    Ok(MergeOutcome::Merged { version_id })
}

fn objects_by_logical_id(
    model: &CityModel,
    version_id: &ContentId,
) -> Result<BTreeMap<String, VersionedCityObject>> {
    let (_, version) = model.versioning.get_version(version_id.as_str())?;
    Ok(version
        .versioned_objects(model)
        .into_iter()
        .map(|object| (object.logical_id().to_string(), object))
        .collect())
}

enum Resolution {
    Keep(VersionedCityObject),
    Drop,
    Conflict(Conflict),
}

/// Three-way resolution of one logical id.
fn resolve_object(
    logical_id: &str,
    base: Option<&VersionedCityObject>,
    ours: Option<&VersionedCityObject>,
    theirs: Option<&VersionedCityObject>,
) -> Result<Resolution> {
    let conflict = |reason| {
        Ok(Resolution::Conflict(Conflict {
            logical_id: logical_id.to_string(),
            reason,
        }))
    };

    match (base, ours, theirs) {
        // Gone from both sides, or never present.
        (_, None, None) => Ok(Resolution::Drop),

        // Added on exactly one side.
        (None, Some(added), None) | (None, None, Some(added)) => {
            Ok(Resolution::Keep(added.clone()))
        }

        // Added on both sides: fine only when the content agrees.
        (None, Some(ours), Some(theirs)) => {
            if ours == theirs {
                Ok(Resolution::Keep(ours.clone()))
            } else {
                conflict(ConflictReason::BothAdded)
            }
        }

        // Removed in dest.
        (Some(base), Some(ours), None) => {
            if ours == base {
                Ok(Resolution::Drop)
            } else {
                conflict(ConflictReason::RemovedAndChanged { removed_in: "dest" })
            }
        }

        // Removed in source.
        (Some(base), None, Some(theirs)) => {
            if theirs == base {
                Ok(Resolution::Drop)
            } else {
                conflict(ConflictReason::RemovedAndChanged {
                    removed_in: "source",
                })
            }
        }

        // Present everywhere.
        (Some(base), Some(ours), Some(theirs)) => {
            match (ours == base, theirs == base) {
                (true, true) => Ok(Resolution::Keep(base.clone())),
                (false, true) => Ok(Resolution::Keep(ours.clone())),
                (true, false) => Ok(Resolution::Keep(theirs.clone())),
                (false, false) if ours == theirs => Ok(Resolution::Keep(ours.clone())),
                (false, false) => resolve_fields(logical_id, base, ours, theirs),
            }
        }
    }
}

/// Field-level resolution for an object changed differently on both sides.
fn resolve_fields(
    logical_id: &str,
    base: &VersionedCityObject,
    ours: &VersionedCityObject,
    theirs: &VersionedCityObject,
) -> Result<Resolution> {
    let base_value = serde_json::to_value(base.object()).map_err(Error::Serialize)?;
    let our_value = serde_json::to_value(ours.object()).map_err(Error::Serialize)?;
    let their_value = serde_json::to_value(theirs.object()).map_err(Error::Serialize)?;

    let our_delta = delta::delta(&base_value, &our_value);
    let their_delta = delta::delta(&base_value, &their_value);

    if let Some(path) = delta::first_overlap(&our_delta, &their_delta) {
        return Ok(Resolution::Conflict(Conflict {
            logical_id: logical_id.to_string(),
            reason: ConflictReason::FieldOverlap {
                path: delta::path_display(path),
            },
        }));
    }

    let mut merged_value = base_value;
    delta::apply(&mut merged_value, &our_delta);
    delta::apply(&mut merged_value, &their_delta);

    let object = serde_json::from_value(merged_value).map_err(Error::Serialize)?;
    tracing::debug!(logical_id, "Auto-resolved disjoint field changes");
    Ok(Resolution::Keep(VersionedCityObject::new(logical_id, object)?))
}

#[cfg(test)]
mod tests;
