//! Tests for the three-way merge engine and field deltas.

use chrono::{TimeZone, Utc};
use serde_json::json;

use super::delta::{self, FieldChange};
use super::*;
use crate::model::CityObject;

fn date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
}

fn object(value: serde_json::Value) -> CityObject {
    serde_json::from_value(value).unwrap()
}

/// Add a version holding the given (logical id, object) pairs and return its
/// id. Objects are inserted into the document keyed by content hash.
fn add_version(
    model: &mut CityModel,
    message: &str,
    parents: Vec<ContentId>,
    objects: &[(&str, serde_json::Value)],
) -> ContentId {
    let mut version = Version::new("alice", message, date(), parents);
    for (logical_id, value) in objects {
        let vobj = VersionedCityObject::new(*logical_id, object(value.clone())).unwrap();
        model
            .city_objects
            .entry(vobj.name().to_string())
            .or_insert_with(|| vobj.object().clone());
        version.add_object(&vobj);
    }
    let id = version.content_id().unwrap();
    model.versioning.add_version(id.clone(), version);
    id
}

/// Ancestor on main, one commit on main and one on dev diverging from it.
fn diverged(
    ancestor: &[(&str, serde_json::Value)],
    on_dev: &[(&str, serde_json::Value)],
    on_main: &[(&str, serde_json::Value)],
) -> CityModel {
    let mut model = CityModel::empty();
    let base = add_version(&mut model, "base", vec![], ancestor);
    let dev = add_version(&mut model, "dev work", vec![base.clone()], on_dev);
    let main = add_version(&mut model, "main work", vec![base], on_main);
    model.versioning.set_branch("dev", dev).unwrap();
    model.versioning.set_branch("main", main).unwrap();
    model
}

#[test]
fn test_delta_computes_set_and_remove() {
    let base = json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3});
    let side = json!({"a": 2, "b": {"x": 1}, "d": 4});

    let changes = delta::delta(&base, &side);

    assert_eq!(
        changes.get(&vec!["a".to_string()]),
        Some(&FieldChange::Set(json!(2)))
    );
    assert_eq!(
        changes.get(&vec!["b".to_string(), "y".to_string()]),
        Some(&FieldChange::Remove)
    );
    assert_eq!(changes.get(&vec!["c".to_string()]), Some(&FieldChange::Remove));
    assert_eq!(
        changes.get(&vec!["d".to_string()]),
        Some(&FieldChange::Set(json!(4)))
    );
    assert_eq!(changes.len(), 4);
}

#[test]
fn test_delta_treats_arrays_as_atomic() {
    let base = json!({"geometry": [1, 2, 3]});
    let side = json!({"geometry": [1, 2, 4]});

    let changes = delta::delta(&base, &side);

    assert_eq!(
        changes.get(&vec!["geometry".to_string()]),
        Some(&FieldChange::Set(json!([1, 2, 4])))
    );
}

#[test]
fn test_overlap_detects_prefix_paths() {
    let base = json!({"a": {"x": 1}});
    // One side replaces the whole subtree, the other edits inside it.
    let whole = delta::delta(&base, &json!({"a": 5}));
    let inner = delta::delta(&base, &json!({"a": {"x": 2}}));

    assert!(delta::first_overlap(&whole, &inner).is_some());
}

#[test]
fn test_identical_changes_do_not_overlap() {
    let base = json!({"a": 1, "b": 1});
    let ours = delta::delta(&base, &json!({"a": 2, "b": 1}));
    let theirs = delta::delta(&base, &json!({"a": 2, "b": 2}));

    assert!(delta::first_overlap(&ours, &theirs).is_none());
}

#[test]
fn test_apply_round_trips_delta() {
    let base = json!({"a": 1, "b": {"x": 1}});
    let side = json!({"a": 2, "b": {}, "c": [1, 2]});

    let changes = delta::delta(&base, &side);
    let mut rebuilt = base.clone();
    delta::apply(&mut rebuilt, &changes);

    assert_eq!(rebuilt, side);
}

#[test]
fn test_merge_same_version_is_noop() {
    let mut model = CityModel::empty();
    let v = add_version(&mut model, "base", vec![], &[("b1", json!({"a": 1}))]);
    model.versioning.set_branch("main", v).unwrap();

    let outcome = merge_dated(&mut model, "main", "main", "alice", date()).unwrap();
    assert!(matches!(outcome, MergeOutcome::NoOp));
}

#[test]
fn test_merge_backward_is_refused() {
    let mut model = CityModel::empty();
    let base = add_version(&mut model, "base", vec![], &[("b1", json!({"a": 1}))]);
    let tip = add_version(
        &mut model,
        "more",
        vec![base.clone()],
        &[("b1", json!({"a": 2}))],
    );
    model.versioning.set_branch("main", tip).unwrap();

    // Merging the tip into its own ancestor is a fast-forward situation.
    let err = merge_dated(&mut model, "main", base.as_str(), "alice", date()).unwrap_err();
    assert!(err.to_string().contains("fast-forward"));
}

#[test]
fn test_merge_auto_resolves_disjoint_field_edits() {
    let mut model = diverged(
        &[("b1", json!({"type": "Building", "a": 1, "b": 1}))],
        &[("b1", json!({"type": "Building", "a": 2, "b": 1}))],
        &[("b1", json!({"type": "Building", "a": 1, "b": 2}))],
    );

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date()).unwrap();
    let MergeOutcome::Merged { version_id } = outcome else {
        panic!("expected a merge version, got {outcome:?}");
    };

    // The branch advanced and the merged object carries both edits.
    assert_eq!(model.versioning.branches["main"], version_id);
    let version = &model.versioning.versions[&version_id];
    assert_eq!(version.parents.len(), 2);
    assert_eq!(version.message, "Merge dev to main");

    let objects = version.versioned_objects(&model);
    assert_eq!(objects.len(), 1);
    let merged = objects[0].object();
    assert_eq!(merged.attributes["a"], json!(2));
    assert_eq!(merged.attributes["b"], json!(2));
}

#[test]
fn test_merge_reports_overlapping_edit_as_conflict() {
    let mut model = diverged(
        &[("b1", json!({"a": 1}))],
        &[("b1", json!({"a": 2}))],
        &[("b1", json!({"a": 3}))],
    );
    let main_before = model.versioning.branches["main"].clone();
    let versions_before = model.versioning.versions.len();

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date()).unwrap();
    let MergeOutcome::Conflicts(conflicts) = outcome else {
        panic!("expected conflicts, got {outcome:?}");
    };

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].logical_id, "b1");
    assert!(conflicts[0].to_string().contains("field 'a'"));

    // Terminal state: nothing was created and the branch did not move.
    assert_eq!(model.versioning.versions.len(), versions_before);
    assert_eq!(model.versioning.branches["main"], main_before);
}

#[test]
fn test_merge_takes_single_side_changes_and_additions() {
    let mut model = diverged(
        &[("b1", json!({"a": 1}))],
        &[("b1", json!({"a": 9})), ("b2", json!({"new": true}))],
        &[("b1", json!({"a": 1})), ("b3", json!({"other": true}))],
    );

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date()).unwrap();
    let MergeOutcome::Merged { version_id } = outcome else {
        panic!("expected a merge version, got {outcome:?}");
    };

    let version = &model.versioning.versions[&version_id];
    let mut logical_ids: Vec<&str> = version.objects.values().map(String::as_str).collect();
    logical_ids.sort();
    assert_eq!(logical_ids, vec!["b1", "b2", "b3"]);

    let objects = version.versioned_objects(&model);
    let b1 = objects.iter().find(|o| o.logical_id() == "b1").unwrap();
    assert_eq!(b1.object().attributes["a"], json!(9));
}

#[test]
fn test_merge_removed_and_changed_conflicts() {
    // dev removes b1, main changes it.
    let mut model = diverged(
        &[("b1", json!({"a": 1})), ("b2", json!({"k": 1}))],
        &[("b2", json!({"k": 1}))],
        &[("b1", json!({"a": 2})), ("b2", json!({"k": 1}))],
    );

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date()).unwrap();
    let MergeOutcome::Conflicts(conflicts) = outcome else {
        panic!("expected conflicts, got {outcome:?}");
    };
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].to_string().contains("removed in source"));
}

#[test]
fn test_merge_removed_on_one_side_stays_removed() {
    // dev removes b1 without touching it otherwise; main is unchanged.
    let mut model = diverged(
        &[("b1", json!({"a": 1})), ("b2", json!({"k": 1}))],
        &[("b2", json!({"k": 1}))],
        &[("b1", json!({"a": 1})), ("b2", json!({"k": 1}))],
    );

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date()).unwrap();
    let MergeOutcome::Merged { version_id } = outcome else {
        panic!("expected a merge version, got {outcome:?}");
    };

    let version = &model.versioning.versions[&version_id];
    let logical_ids: Vec<&str> = version.objects.values().map(String::as_str).collect();
    assert_eq!(logical_ids, vec!["b2"]);
}

#[test]
fn test_merge_both_added_same_content_is_fine() {
    let mut model = diverged(
        &[("b1", json!({"a": 1}))],
        &[("b1", json!({"a": 1})), ("b2", json!({"k": 1}))],
        &[("b1", json!({"a": 1})), ("b2", json!({"k": 1}))],
    );

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date()).unwrap();
    assert!(matches!(outcome, MergeOutcome::Merged { .. }));
}
