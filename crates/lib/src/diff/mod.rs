//! Set-based comparison of two versions.
//!
//! Two versions are compared through their versioned object ids: identical
//! content hashes mean identical objects, so the bulk of the comparison is
//! set arithmetic over ids. Hash-level differences are then regrouped by
//! logical id to tell a changed object (same logical id on both sides,
//! different content) apart from a true add or removal.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    Result,
    hash::ContentId,
    model::CityModel,
    version::VersionedCityObject,
};

/// One object whose content changed between two versions.
#[derive(Clone, Debug)]
pub struct ChangedObject {
    /// The logical id shared by both sides.
    pub logical_id: String,
    /// The object as it was in the source version.
    pub source: VersionedCityObject,
    /// The object as it is in the destination version.
    pub dest: VersionedCityObject,
}

/// The difference from a source version to a destination version.
#[derive(Clone, Debug, Default)]
pub struct Diff {
    /// Objects present only in the destination.
    pub added: Vec<VersionedCityObject>,
    /// Objects present only in the source.
    pub removed: Vec<VersionedCityObject>,
    /// Objects whose logical id appears on both sides with different content.
    pub changed: Vec<ChangedObject>,
    /// Objects with identical content on both sides.
    pub unchanged: Vec<VersionedCityObject>,
}

impl Diff {
    /// Compare the versions named by two refs.
    ///
    /// `source` is the older side of the comparison and `dest` the newer;
    /// the diff reads as the changes needed to go from source to dest.
    pub fn between(model: &CityModel, source: &str, dest: &str) -> Result<Self> {
        let (source_id, source_version) = model.versioning.get_version(source)?;
        let (dest_id, dest_version) = model.versioning.get_version(dest)?;

        tracing::debug!(source = %source_id, dest = %dest_id, "Computing diff");

        Ok(Self::between_objects(
            source_version.versioned_objects(model),
            dest_version.versioned_objects(model),
        ))
    }

    /// Compare two already-materialized object collections.
    pub fn between_objects(
        source: Vec<VersionedCityObject>,
        dest: Vec<VersionedCityObject>,
    ) -> Self {
        let source_ids: BTreeSet<&ContentId> = source.iter().map(|o| o.name()).collect();
        let dest_ids: BTreeSet<&ContentId> = dest.iter().map(|o| o.name()).collect();

        let mut unchanged = Vec::new();
        let mut only_source: BTreeMap<&str, &VersionedCityObject> = BTreeMap::new();
        let mut only_dest: BTreeMap<&str, &VersionedCityObject> = BTreeMap::new();

        for object in &source {
            if !dest_ids.contains(object.name()) {
                only_source.insert(object.logical_id(), object);
            }
        }
        for object in &dest {
            if source_ids.contains(object.name()) {
                unchanged.push(object.clone());
            } else {
                only_dest.insert(object.logical_id(), object);
            }
        }

        // A logical id on both remaining sides is one object that changed
        // content; anything left over is a true add or removal.
        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut changed = Vec::new();

        for (logical_id, dest_object) in &only_dest {
            match only_source.remove(logical_id) {
                Some(source_object) => changed.push(ChangedObject {
                    logical_id: logical_id.to_string(),
                    source: source_object.clone(),
                    dest: (*dest_object).clone(),
                }),
                None => added.push((*dest_object).clone()),
            }
        }
        for source_object in only_source.into_values() {
            removed.push(source_object.clone());
        }

        Self {
            added,
            removed,
            changed,
            unchanged,
        }
    }

    /// True when both sides hold exactly the same content.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Counts as (added, removed, changed, unchanged).
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.added.len(),
            self.removed.len(),
            self.changed.len(),
            self.unchanged.len(),
        )
    }
}
