//! Committing, branching, logging and checking out versions.

use cityvers::{
    CityModel, Diff, checkout,
    commit::{CommitOutcome, commit_dated},
    history::log_entries,
};

use crate::helpers::{building, commit_on, date, document, linear_history};

#[test]
fn test_linear_commit_scenario() {
    let mut model = CityModel::empty();
    let doc = document(&[("building1", building(10.0, [0.0, 0.0, 0.0]))]);

    let version_id = commit_on(&mut model, &doc, "main", "first", 0);
    let version = &model.versioning.versions[&version_id];

    assert!(version.parents.is_empty());
    assert_eq!(version.objects.len(), 1);
    assert_eq!(version.content_id().unwrap(), version_id);
    assert_eq!(model.versioning.branches["main"], version_id);
    model.validate().unwrap();
}

#[test]
fn test_branch_and_diff_scenario() {
    let (model, v1, v2) = linear_history();

    let diff = Diff::between(&model, v1.as_str(), v2.as_str()).unwrap();
    let (added, removed, changed, unchanged) = diff.counts();

    assert_eq!((added, removed, changed, unchanged), (1, 0, 0, 1));
    assert_eq!(diff.added[0].logical_id(), "b2");
    assert_eq!(diff.unchanged[0].logical_id(), "b1");
}

#[test]
fn test_diff_symmetry() {
    let (model, v1, v2) = linear_history();

    let forward = Diff::between(&model, v1.as_str(), v2.as_str()).unwrap();
    let backward = Diff::between(&model, v2.as_str(), v1.as_str()).unwrap();

    assert_eq!(forward.added.len(), backward.removed.len());
    assert_eq!(forward.removed.len(), backward.added.len());
    assert_eq!(
        forward.added[0].logical_id(),
        backward.removed[0].logical_id()
    );

    let reflexive = Diff::between(&model, v2.as_str(), v2.as_str()).unwrap();
    assert!(reflexive.is_empty());
    assert_eq!(reflexive.unchanged.len(), 2);
}

#[test]
fn test_checkout_scenario() {
    let (model, v1, _) = linear_history();

    let old = checkout(&model, v1.as_str()).unwrap();
    assert_eq!(old.city_objects.len(), 1);
    assert!(old.city_objects.contains_key("b1"));
    assert_eq!(old.vertices, model.vertices);
    assert!(old.versioning.is_empty());
    old.validate().unwrap();

    let tip = checkout(&model, "main").unwrap();
    assert_eq!(tip.city_objects.len(), 2);
}

#[test]
fn test_checkout_resolves_id_prefix() {
    let (model, v1, _) = linear_history();

    let by_prefix = checkout(&model, &v1.as_str()[..10]).unwrap();
    assert_eq!(by_prefix.city_objects.len(), 1);
}

#[test]
fn test_log_renders_newest_first_with_decorations() {
    let (mut model, v1, v2) = linear_history();
    model
        .versioning
        .tags
        .insert("v1.0".to_string(), v1.clone());

    let entries = log_entries(&model, &["main".to_string()]).unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].id, v2);
    assert_eq!(entries[0].branches, vec!["main"]);
    assert_eq!(entries[0].parents, vec![v1.clone()]);
    let diff = entries[0].diff.as_ref().unwrap();
    assert_eq!(diff.added.len(), 1);

    // The root entry reports its whole object set as added.
    assert_eq!(entries[1].id, v1);
    assert_eq!(entries[1].tags, vec!["v1.0"]);
    let root_diff = entries[1].diff.as_ref().unwrap();
    assert_eq!(root_diff.added.len(), 1);
    assert!(root_diff.removed.is_empty());
}

#[test]
fn test_log_over_multiple_refs_unions_histories() {
    let (mut model, v1, _) = linear_history();
    model.versioning.set_branch("dev", v1.clone()).unwrap();
    let dev_tip = commit_on(
        &mut model,
        &document(&[
            ("b1", building(10.0, [0.0, 0.0, 0.0])),
            ("b9", building(9.0, [9.0, 9.0, 0.0])),
        ]),
        "dev",
        "dev work",
        2,
    );

    let main_only = log_entries(&model, &["main".to_string()]).unwrap();
    assert_eq!(main_only.len(), 2);

    let both = log_entries(&model, &["main".to_string(), "dev".to_string()]).unwrap();
    assert_eq!(both.len(), 3);
    assert!(both.iter().any(|e| e.id == dev_tip));
}

#[test]
fn test_commit_noop_on_unchanged_content() {
    let (mut model, _, _) = linear_history();
    let same = document(&[
        ("b1", building(10.0, [0.0, 0.0, 0.0])),
        ("b2", building(20.0, [5.0, 5.0, 0.0])),
    ]);

    let outcome = commit_dated(&mut model, &same, "main", "alice", "again", date(5)).unwrap();
    assert!(matches!(outcome, CommitOutcome::NoOp));
}

#[test]
fn test_branch_pointer_lifecycle() {
    let (mut model, v1, v2) = linear_history();

    model.versioning.set_branch("dev", v1.clone()).unwrap();
    assert_eq!(model.versioning.branches_of(&v1), vec!["dev"]);

    assert!(model.versioning.delete_branch("dev"));
    assert!(!model.versioning.delete_branch("dev"));

    // History is untouched by branch deletion.
    assert_eq!(model.versioning.versions.len(), 2);
    assert_eq!(model.versioning.branches["main"], v2);
}
