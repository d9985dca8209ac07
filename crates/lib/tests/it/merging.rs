//! Three-way merges grown through the real commit engine.

use serde_json::json;

use cityvers::{
    CityModel,
    merge::{MergeOutcome, merge_dated},
};

use crate::helpers::{commit_on, date, document};

fn house(attributes: serde_json::Value) -> serde_json::Value {
    json!({
        "type": "Building",
        "attributes": attributes,
        "geometry": [{"type": "Solid", "lod": 2, "boundaries": [[[0, 1, 2, 3]]]}]
    })
}

/// Base commit on main, a dev branch, and one commit on each side.
fn diverged(dev_attrs: serde_json::Value, main_attrs: serde_json::Value) -> CityModel {
    let mut model = CityModel::empty();
    let base = commit_on(
        &mut model,
        &document(&[("b1", house(json!({"a": 1, "b": 1})))]),
        "main",
        "base",
        0,
    );
    model.versioning.set_branch("dev", base).unwrap();

    commit_on(
        &mut model,
        &document(&[("b1", house(dev_attrs))]),
        "dev",
        "dev edit",
        1,
    );
    commit_on(
        &mut model,
        &document(&[("b1", house(main_attrs))]),
        "main",
        "main edit",
        2,
    );
    model
}

#[test]
fn test_merge_auto_resolves_disjoint_attribute_edits() {
    let mut model = diverged(json!({"a": 2, "b": 1}), json!({"a": 1, "b": 2}));

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date(3)).unwrap();
    let MergeOutcome::Merged { version_id } = outcome else {
        panic!("expected a merge, got {outcome:?}");
    };

    assert_eq!(model.versioning.branches["main"], version_id);
    model.validate().unwrap();

    let version = &model.versioning.versions[&version_id];
    assert_eq!(version.parents.len(), 2);

    let objects = version.versioned_objects(&model);
    assert_eq!(objects.len(), 1);
    let attrs = &objects[0].object().attributes["attributes"];
    assert_eq!(attrs["a"], json!(2));
    assert_eq!(attrs["b"], json!(2));
}

#[test]
fn test_merge_conflict_leaves_history_untouched() {
    let mut model = diverged(json!({"a": 2, "b": 1}), json!({"a": 3, "b": 1}));
    let versions_before = model.versioning.versions.len();
    let main_before = model.versioning.branches["main"].clone();

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date(3)).unwrap();
    let MergeOutcome::Conflicts(conflicts) = outcome else {
        panic!("expected conflicts, got {outcome:?}");
    };

    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].logical_id, "b1");
    assert_eq!(model.versioning.versions.len(), versions_before);
    assert_eq!(model.versioning.branches["main"], main_before);
}

#[test]
fn test_merge_concurrent_geometry_edits_conflict() {
    // Arrays are atomic: touching the same boundary list on both sides is
    // never auto-resolved, even though the edits differ.
    let geometry = |indices: serde_json::Value| {
        json!({
            "type": "Building",
            "geometry": [{"type": "Solid", "lod": 2, "boundaries": [[indices]]}]
        })
    };

    let mut model = CityModel::empty();
    let base = commit_on(
        &mut model,
        &document(&[("b1", geometry(json!([0, 1, 2, 3])))]),
        "main",
        "base",
        0,
    );
    model.versioning.set_branch("dev", base).unwrap();
    commit_on(
        &mut model,
        &document(&[("b1", geometry(json!([0, 1, 2])))]),
        "dev",
        "dev geometry",
        1,
    );
    commit_on(
        &mut model,
        &document(&[("b1", geometry(json!([1, 2, 3])))]),
        "main",
        "main geometry",
        2,
    );

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date(3)).unwrap();
    assert!(matches!(outcome, MergeOutcome::Conflicts(_)));
}

#[test]
fn test_merge_one_sided_change_takes_that_side() {
    // dev edits b1; main leaves b1 alone and adds b2.
    let mut model = CityModel::empty();
    let base = commit_on(
        &mut model,
        &document(&[("b1", house(json!({"a": 1})))]),
        "main",
        "base",
        0,
    );
    model.versioning.set_branch("dev", base).unwrap();
    commit_on(
        &mut model,
        &document(&[("b1", house(json!({"a": 7})))]),
        "dev",
        "dev edit",
        1,
    );
    commit_on(
        &mut model,
        &document(&[
            ("b1", house(json!({"a": 1}))),
            ("b2", house(json!({"k": 1}))),
        ]),
        "main",
        "main adds b2",
        2,
    );

    let outcome = merge_dated(&mut model, "dev", "main", "alice", date(3)).unwrap();
    let MergeOutcome::Merged { version_id } = outcome else {
        panic!("expected a merge, got {outcome:?}");
    };

    let objects = model.versioning.versions[&version_id].versioned_objects(&model);
    assert_eq!(objects.len(), 2);
    let b1 = objects.iter().find(|o| o.logical_id() == "b1").unwrap();
    assert_eq!(b1.object().attributes["attributes"]["a"], json!(7));
}

#[test]
fn test_merge_backward_is_refused() {
    let mut model = CityModel::empty();
    let base = commit_on(
        &mut model,
        &document(&[("b1", house(json!({"a": 1})))]),
        "main",
        "base",
        0,
    );
    commit_on(
        &mut model,
        &document(&[("b1", house(json!({"a": 2})))]),
        "main",
        "more",
        1,
    );

    let err = merge_dated(&mut model, "main", base.as_str(), "alice", date(3)).unwrap_err();
    assert!(err.is_fast_forward_only());
}

#[test]
fn test_merge_same_ref_is_noop() {
    let mut model = CityModel::empty();
    commit_on(
        &mut model,
        &document(&[("b1", house(json!({"a": 1})))]),
        "main",
        "base",
        0,
    );

    let outcome = merge_dated(&mut model, "main", "main", "alice", date(1)).unwrap();
    assert!(matches!(outcome, MergeOutcome::NoOp));
}
