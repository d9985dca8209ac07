//! Versions, refs and the versioning maps of a city model.
//!
//! The `versioning` sub-structure of a document holds three maps: `versions`
//! (version id to [`Version`]), `branches` (name to version id, mutable) and
//! `tags` (name to version id, immutable). A version id is the content hash
//! of the version's serialized fields, so it is never stored inside the
//! version itself; it only exists as the map key.
//!
//! Versions reference their city objects through versioned object ids:
//! content hashes of the object payloads. A [`VersionedCityObject`] pairs
//! such a hash with the object's logical id and payload, and two of them
//! compare equal iff their hashes match. That pairing is the unit of diff
//! comparison.

pub mod errors;

pub use errors::VersionError;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    constants::DATE_FORMAT,
    hash::{self, ContentId},
    model::{CityModel, CityObject},
};

/// One immutable snapshot in the history.
///
/// Created by the commit and merge engines, inserted into the `versions`
/// map, and never mutated afterwards except by the whole-graph rehash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub author: String,
    /// Timestamp in the fixed `YYYY-MM-DDTHH:MM:SS.ffffffZ` format.
    pub date: String,
    pub message: String,
    /// Parent version ids: empty only for a root version, two for a merge.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<ContentId>,
    /// Versioned object id (content hash) to logical object id.
    #[serde(default)]
    pub objects: BTreeMap<ContentId, String>,
}

impl Version {
    /// Create a new version with no objects yet.
    pub fn new(
        author: impl Into<String>,
        message: impl Into<String>,
        date: DateTime<Utc>,
        parents: Vec<ContentId>,
    ) -> Self {
        Self {
            author: author.into(),
            date: date.format(DATE_FORMAT).to_string(),
            message: message.into(),
            parents,
            objects: BTreeMap::new(),
        }
    }

    /// The content hash naming this version.
    ///
    /// Computed over the serialized fields; the id itself is never part of
    /// the hashed payload.
    pub fn content_id(&self) -> Result<ContentId> {
        hash::hash_value(self)
    }

    /// Parse the stored timestamp.
    pub fn parsed_date(&self) -> Result<DateTime<Utc>> {
        let naive = NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| {
            VersionError::InvalidDate {
                date: self.date.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(naive.and_utc())
    }

    pub fn has_parents(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Record a versioned city object in this version.
    pub fn add_object(&mut self, object: &VersionedCityObject) {
        self.objects
            .insert(object.name().clone(), object.logical_id().to_string());
    }

    /// Materialize the versioned city objects of this version.
    ///
    /// Objects referenced by the version but absent from the document's
    /// object map are skipped with a warning; a version may reference
    /// content that was garbage-collected or never present.
    pub fn versioned_objects(&self, model: &CityModel) -> Vec<VersionedCityObject> {
        let mut result = Vec::with_capacity(self.objects.len());
        for (name, logical_id) in &self.objects {
            let Some(object) = model.city_objects.get(name.as_str()) else {
                tracing::warn!(
                    versioned_id = %name,
                    logical_id = %logical_id,
                    "Object not found in document, skipping"
                );
                continue;
            };
            result.push(VersionedCityObject::with_name(
                name.clone(),
                logical_id.clone(),
                object.clone(),
            ));
        }
        result
    }
}

/// A (content hash, logical id, payload) pairing: the unit of diff
/// comparison. Equality is content-hash equality.
#[derive(Clone, Debug)]
pub struct VersionedCityObject {
    name: ContentId,
    logical_id: String,
    object: CityObject,
}

impl VersionedCityObject {
    /// Wrap a city object, naming it by its content hash.
    pub fn new(logical_id: impl Into<String>, object: CityObject) -> Result<Self> {
        let name = object.content_id()?;
        Ok(Self {
            name,
            logical_id: logical_id.into(),
            object,
        })
    }

    /// Wrap a city object under an already-known content hash.
    pub fn with_name(name: ContentId, logical_id: impl Into<String>, object: CityObject) -> Self {
        Self {
            name,
            logical_id: logical_id.into(),
            object,
        }
    }

    /// The versioned object id: the content hash of the payload.
    pub fn name(&self) -> &ContentId {
        &self.name
    }

    /// The stable id of this object across versions.
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn object(&self) -> &CityObject {
        &self.object
    }

    pub fn into_object(self) -> CityObject {
        self.object
    }
}

impl PartialEq for VersionedCityObject {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for VersionedCityObject {}

impl std::hash::Hash for VersionedCityObject {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// The versioning maps of a document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Versioning {
    #[serde(default)]
    pub versions: BTreeMap<ContentId, Version>,
    #[serde(default)]
    pub branches: BTreeMap<String, ContentId>,
    #[serde(default)]
    pub tags: BTreeMap<String, ContentId>,
}

impl Versioning {
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty() && self.branches.is_empty() && self.tags.is_empty()
    }

    /// Check that every branch and tag points at an existing version.
    pub fn validate(&self) -> Result<()> {
        for (name, target) in &self.branches {
            if !self.versions.contains_key(target) {
                return Err(VersionError::DanglingRef {
                    kind: "branch",
                    name: name.clone(),
                    target: target.clone(),
                }
                .into());
            }
        }
        for (name, target) in &self.tags {
            if !self.versions.contains_key(target) {
                return Err(VersionError::DanglingRef {
                    kind: "tag",
                    name: name.clone(),
                    target: target.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Resolve a ref to a version id.
    ///
    /// A ref is tried as a version id prefix first, then as a branch name,
    /// then as a tag name. A prefix matching more than one version id is
    /// ambiguous.
    pub fn resolve_ref(&self, reference: &str) -> Result<ContentId> {
        let mut candidates = self
            .versions
            .keys()
            .filter(|id| id.matches_prefix(reference));
        if let Some(first) = candidates.next() {
            if candidates.next().is_some() {
                return Err(VersionError::AmbiguousRef {
                    reference: reference.to_string(),
                }
                .into());
            }
            return Ok(first.clone());
        }

        if let Some(id) = self.branches.get(reference) {
            return Ok(id.clone());
        }
        if let Some(id) = self.tags.get(reference) {
            return Ok(id.clone());
        }

        Err(VersionError::UnknownRef {
            reference: reference.to_string(),
        }
        .into())
    }

    /// Returns true if the ref names a branch.
    pub fn is_branch(&self, reference: &str) -> bool {
        self.branches.contains_key(reference)
    }

    /// Resolve a ref and return the version it points at.
    pub fn get_version(&self, reference: &str) -> Result<(ContentId, &Version)> {
        let id = self.resolve_ref(reference)?;
        let version = self
            .versions
            .get(&id)
            .ok_or_else(|| VersionError::UnknownVersion { id: id.clone() })?;
        Ok((id, version))
    }

    /// Insert a version under its content-hash id.
    pub fn add_version(&mut self, id: ContentId, version: Version) {
        self.versions.insert(id, version);
    }

    /// Point a branch at a version: a single atomic pointer rewrite.
    ///
    /// The target must already be present in `versions`.
    pub fn set_branch(&mut self, name: impl Into<String>, target: ContentId) -> Result<()> {
        let name = name.into();
        if !self.versions.contains_key(&target) {
            return Err(VersionError::DanglingRef {
                kind: "branch",
                name,
                target,
            }
            .into());
        }
        self.branches.insert(name, target);
        Ok(())
    }

    /// Create a new branch pointing at a version.
    ///
    /// Unlike [`set_branch`](Self::set_branch) this refuses to repoint an
    /// existing branch: that pointer may be the only named reference to its
    /// line of history.
    pub fn create_branch(&mut self, name: impl Into<String>, target: ContentId) -> Result<()> {
        let name = name.into();
        if self.is_branch(&name) {
            return Err(VersionError::BranchExists { name }.into());
        }
        self.set_branch(name, target)
    }

    /// Remove a branch pointer. History is untouched.
    pub fn delete_branch(&mut self, name: &str) -> bool {
        self.branches.remove(name).is_some()
    }

    /// Branch names pointing at the given version.
    pub fn branches_of(&self, id: &ContentId) -> Vec<&str> {
        self.branches
            .iter()
            .filter(|(_, target)| *target == id)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Tag names pointing at the given version.
    pub fn tags_of(&self, id: &ContentId) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|(_, target)| *target == id)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
