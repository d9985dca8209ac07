//! Flat field-path deltas between JSON trees.
//!
//! A delta maps a field path (the chain of object keys from the root) to the
//! change applied at that path. Only JSON objects are recursed into; arrays
//! and scalars are atomic leaves, so concurrent edits inside the same array
//! always overlap.

use std::collections::BTreeMap;

use serde_json::Value;

/// The chain of object keys from the root to one field.
pub type FieldPath = Vec<String>;

/// The change one side applied at a field path.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldChange {
    /// The field was added or its value replaced.
    Set(Value),
    /// The field was removed.
    Remove,
}

/// A set of field changes measured against a common base.
pub type Delta = BTreeMap<FieldPath, FieldChange>;

/// Compute the field changes that turn `base` into `side`.
pub fn delta(base: &Value, side: &Value) -> Delta {
    let mut changes = Delta::new();
    collect(&mut changes, &mut Vec::new(), base, side);
    changes
}

fn collect(changes: &mut Delta, path: &mut FieldPath, base: &Value, side: &Value) {
    match (base.as_object(), side.as_object()) {
        (Some(base_map), Some(side_map)) => {
            for (key, base_value) in base_map {
                path.push(key.clone());
                match side_map.get(key) {
                    Some(side_value) => collect(changes, path, base_value, side_value),
                    None => {
                        changes.insert(path.clone(), FieldChange::Remove);
                    }
                }
                path.pop();
            }
            for (key, side_value) in side_map {
                if !base_map.contains_key(key) {
                    path.push(key.clone());
                    changes.insert(path.clone(), FieldChange::Set(side_value.clone()));
                    path.pop();
                }
            }
        }
        _ => {
            if base != side {
                changes.insert(path.clone(), FieldChange::Set(side.clone()));
            }
        }
    }
}

/// The first pair of incompatible paths between two deltas, if any.
///
/// Two deltas are compatible when every path pair is either disjoint (no
/// prefix relation) or identical with the identical change. An identical
/// change on both sides applies once and is harmless; everything else is a
/// genuine overlap.
pub fn first_overlap<'a>(a: &'a Delta, b: &'a Delta) -> Option<&'a FieldPath> {
    for (path_a, change_a) in a {
        for (path_b, change_b) in b {
            if path_a == path_b {
                if change_a != change_b {
                    return Some(path_a);
                }
            } else if is_prefix(path_a, path_b) || is_prefix(path_b, path_a) {
                return Some(path_a);
            }
        }
    }
    None
}

fn is_prefix(shorter: &FieldPath, longer: &FieldPath) -> bool {
    shorter.len() < longer.len() && longer[..shorter.len()] == shorter[..]
}

/// Apply a delta to a JSON tree, creating intermediate objects as needed.
pub fn apply(target: &mut Value, changes: &Delta) {
    for (path, change) in changes {
        apply_one(target, path, change);
    }
}

fn apply_one(target: &mut Value, path: &FieldPath, change: &FieldChange) {
    let Some((leaf, ancestors)) = path.split_last() else {
        if let FieldChange::Set(value) = change {
            *target = value.clone();
        }
        return;
    };

    let mut current = target;
    for key in ancestors {
        if !current.is_object() {
            *current = Value::Object(serde_json::Map::new());
        }
        let Value::Object(map) = current else { return };
        current = map.entry(key.clone()).or_insert(Value::Null);
    }

    if !current.is_object() {
        *current = Value::Object(serde_json::Map::new());
    }
    let Value::Object(map) = current else { return };
    match change {
        FieldChange::Set(value) => {
            map.insert(leaf.clone(), value.clone());
        }
        FieldChange::Remove => {
            map.remove(leaf);
        }
    }
}

/// Render a field path as a dotted string for messages.
pub fn path_display(path: &FieldPath) -> String {
    path.join(".")
}
