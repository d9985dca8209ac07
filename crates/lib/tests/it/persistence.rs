//! Whole-document save/load round trips.

use serde_json::json;
use tempfile::TempDir;

use cityvers::{Diff, checkout, storage};

use crate::helpers::linear_history;

#[test]
fn test_versioned_document_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("city.json");
    let (model, v1, v2) = linear_history();

    storage::save(&model, &path).unwrap();
    let loaded = storage::load_versioned(&path).unwrap();

    assert_eq!(loaded, model);

    // The reloaded history diffs exactly like the in-memory one.
    let diff = Diff::between(&loaded, v1.as_str(), v2.as_str()).unwrap();
    assert_eq!(diff.counts(), (1, 0, 0, 1));
}

#[test]
fn test_checkout_output_is_loadable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extracted.json");
    let (model, v1, _) = linear_history();

    let extracted = checkout(&model, v1.as_str()).unwrap();
    storage::save(&extracted, &path).unwrap();

    let loaded = storage::load(&path).unwrap();
    assert_eq!(loaded, extracted);
    assert!(storage::load_versioned(&path).is_err());
}

#[test]
fn test_save_overwrites_atomically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("city.json");
    let (model, _, _) = linear_history();

    storage::save(&model, &path).unwrap();
    storage::save(&model, &path).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["city.json"]);
}

#[test]
fn test_load_rejects_documents_with_dangling_refs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        json!({
            "type": "CityJSON",
            "version": "1.0",
            "CityObjects": {},
            "vertices": [],
            "versioning": {
                "versions": {},
                "branches": {"main": "deadbeef"},
                "tags": {}
            }
        })
        .to_string(),
    )
    .unwrap();

    let err = storage::load(&path).unwrap_err();
    assert!(err.to_string().contains("unknown version"));
}
