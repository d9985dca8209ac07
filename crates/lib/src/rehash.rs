//! Recompute every content-addressed id in a document.
//!
//! Ids are recomputed, never trusted from input: object keys first, then
//! version ids in topological order (a parent's fresh id must exist before
//! its children serialize it), then the branch and tag pointers. Running the
//! operation twice changes nothing the second time, since every id is
//! already the canonical hash of its current content.

use std::collections::BTreeMap;

use crate::{Result, hash::ContentId, history::History, model::CityModel};

/// How many ids the rehash actually rewrote.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RehashReport {
    pub objects_changed: usize,
    pub versions_changed: usize,
}

impl RehashReport {
    pub fn is_clean(&self) -> bool {
        self.objects_changed == 0 && self.versions_changed == 0
    }
}

/// Rewrite all object keys, version ids and ref pointers to the canonical
/// hashes of their current content.
pub fn rehash(model: &mut CityModel) -> Result<RehashReport> {
    let mut report = RehashReport::default();

    // Object keys first: version payloads embed them.
    let mut object_map: BTreeMap<String, ContentId> = BTreeMap::new();
    let mut fresh_objects = BTreeMap::new();
    for (old_key, object) in std::mem::take(&mut model.city_objects) {
        let new_key = object.content_id()?;
        if new_key != old_key.as_str() {
            report.objects_changed += 1;
        }
        object_map.insert(old_key, new_key.clone());
        fresh_objects.insert(new_key.to_string(), object);
    }
    model.city_objects = fresh_objects;

    // Versions parent-before-child, so rewritten parent ids are known when
    // the children that reference them are hashed.
    let history = History::new(&model.versioning)?;
    let mut version_map: BTreeMap<ContentId, ContentId> = BTreeMap::new();
    let mut old_versions = std::mem::take(&mut model.versioning.versions);

    for old_id in history.topological_order() {
        let Some(mut version) = old_versions.remove(&old_id) else {
            continue;
        };

        version.objects = version
            .objects
            .into_iter()
            .map(|(object_id, logical_id)| {
                let object_id = object_map
                    .get(object_id.as_str())
                    .cloned()
                    .unwrap_or(object_id);
                (object_id, logical_id)
            })
            .collect();
        version.parents = version
            .parents
            .into_iter()
            .map(|parent| version_map.get(&parent).cloned().unwrap_or(parent))
            .collect();

        let new_id = version.content_id()?;
        if new_id != old_id {
            report.versions_changed += 1;
        }
        version_map.insert(old_id, new_id.clone());
        model.versioning.versions.insert(new_id, version);
    }

    for target in model.versioning.branches.values_mut() {
        if let Some(new_id) = version_map.get(target) {
            *target = new_id.clone();
        }
    }
    for target in model.versioning.tags.values_mut() {
        if let Some(new_id) = version_map.get(target) {
            *target = new_id.clone();
        }
    }
    model.versioning.validate()?;

    tracing::info!(
        objects_changed = report.objects_changed,
        versions_changed = report.versions_changed,
        "Rehash complete"
    );
    Ok(report)
}
