//! Shared builders for the integration tests.
//!
//! Every document built here is a plain (unversioned) CityJSON-style tree;
//! histories are grown by running the real commit engine over them, never by
//! poking the versioning maps directly.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use cityvers::{
    CityModel, ContentId,
    commit::{CommitOutcome, commit_dated},
    model::Vertex,
};

/// A fixed timestamp, offset by `minutes` so successive commits differ.
pub fn date(minutes: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, minutes, 0).unwrap()
}

/// A building footprint around the given origin.
pub fn building(height: f64, origin: [f64; 3]) -> serde_json::Value {
    let [x, y, z] = origin;
    json!({
        "type": "Building",
        "attributes": {"height": height},
        "geometry": [{
            "type": "Solid",
            "lod": 2,
            "boundaries": [[[0, 1, 2, 3]]]
        }],
        "origin": [x, y, z]
    })
}

/// A plain document with a unit-square vertex list and the given objects.
pub fn document(objects: &[(&str, serde_json::Value)]) -> CityModel {
    let mut model = CityModel::empty();
    model.vertices = vec![
        Vertex([0.0, 0.0, 0.0]),
        Vertex([1.0, 0.0, 0.0]),
        Vertex([1.0, 1.0, 0.0]),
        Vertex([0.0, 1.0, 0.0]),
    ];
    for (logical_id, value) in objects {
        model.city_objects.insert(
            logical_id.to_string(),
            serde_json::from_value(value.clone()).expect("object fixture must deserialize"),
        );
    }
    model
}

/// Commit a document and unwrap the created version id.
pub fn commit_on(
    model: &mut CityModel,
    doc: &CityModel,
    reference: &str,
    message: &str,
    minutes: u32,
) -> ContentId {
    match commit_dated(model, doc, reference, "alice", message, date(minutes))
        .expect("commit fixture must succeed")
    {
        CommitOutcome::Committed { version_id } => version_id,
        CommitOutcome::NoOp => panic!("commit fixture was a no-op"),
    }
}

/// A two-commit history on `main`: first {b1}, then {b1, b2}.
/// Returns (model, first version id, second version id).
pub fn linear_history() -> (CityModel, ContentId, ContentId) {
    let mut model = CityModel::empty();
    let v1 = commit_on(
        &mut model,
        &document(&[("b1", building(10.0, [0.0, 0.0, 0.0]))]),
        "main",
        "add b1",
        0,
    );
    let v2 = commit_on(
        &mut model,
        &document(&[
            ("b1", building(10.0, [0.0, 0.0, 0.0])),
            ("b2", building(20.0, [5.0, 5.0, 0.0])),
        ]),
        "main",
        "add b2",
        1,
    );
    (model, v1, v2)
}
