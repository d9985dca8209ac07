//! Content addressing for versions and city objects.
//!
//! Everything that needs a name in the version history is named by the
//! SHA-256 digest of its canonical JSON serialization. Canonical here means
//! that object keys always serialize in sorted order: `serde_json`'s default
//! map representation is BTreeMap-backed, so any value routed through
//! [`serde_json::Value`] loses the insertion order of its source and two
//! semantically identical values hash identically.

mod id;

pub use id::ContentId;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::Result;

/// Compute the content id of any serializable value.
///
/// The value is converted to a [`serde_json::Value`] first, which sorts all
/// object keys, and the resulting JSON text is hashed with SHA-256.
pub fn hash_value<T: Serialize>(value: &T) -> Result<ContentId> {
    let canonical = serde_json::to_value(value).map_err(crate::Error::Serialize)?;
    let json = serde_json::to_string(&canonical).map_err(crate::Error::Serialize)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let digest = hasher.finalize();

    Ok(ContentId::new(format!("{digest:x}")))
}
