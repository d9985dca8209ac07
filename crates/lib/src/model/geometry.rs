//! Explicit tagged union for geometry boundary trees.
//!
//! CityJSON nests boundaries as plain arrays (solids contain shells, shells
//! contain surfaces, surfaces contain rings, rings contain vertices). Instead
//! of inspecting runtime shape at every step, the nesting is parsed once into
//! [`Boundary`] variants and all recursion dispatches on the variant tag.
//!
//! Leaves are either vertex indices into the document vertex list (storage
//! form, [`Boundary::Ring`]) or inline coordinate triples (working form,
//! [`Boundary::Positions`]). On disk a document is always in storage form;
//! working form only exists between a dereference and the matching
//! re-reference.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ModelError;

/// One level of a geometry boundary tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Boundary {
    /// A ring in storage form: a sequence of vertex indices.
    Ring(Vec<usize>),
    /// A ring in working form: a sequence of coordinate triples.
    Positions(Vec<[f64; 3]>),
    /// Any higher nesting level: surface, shell, solid or multi-solid.
    Nested(Vec<Boundary>),
}

impl Boundary {
    /// Parse a boundary tree out of a JSON value.
    ///
    /// An array of integers is a ring of indices; an array of 3-number
    /// arrays with fractional components is a ring of coordinates; anything
    /// else recurses. Rings with exactly one element are rejected.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let items = value.as_array().ok_or_else(|| ModelError::InvalidBoundary {
            reason: format!("expected an array, got {value}"),
        })?;

        if items.is_empty() {
            return Ok(Boundary::Nested(Vec::new()));
        }

        if items.iter().all(Value::is_number) {
            let mut indices = Vec::with_capacity(items.len());
            for item in items {
                let index = item.as_u64().ok_or_else(|| ModelError::InvalidBoundary {
                    reason: format!("vertex index must be a non-negative integer, got {item}"),
                })? as usize;
                indices.push(index);
            }
            if indices.len() == 1 {
                return Err(ModelError::DegenerateRing);
            }
            return Ok(Boundary::Ring(indices));
        }

        // All children are coordinate triples -> working-form ring.
        if let Some(coords) = items.iter().map(as_coordinate).collect::<Option<Vec<_>>>() {
            if coords.len() == 1 {
                return Err(ModelError::DegenerateRing);
            }
            return Ok(Boundary::Positions(coords));
        }

        let children = items
            .iter()
            .map(Boundary::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Boundary::Nested(children))
    }

    /// True if every leaf is a vertex index.
    pub fn is_indexed(&self) -> bool {
        match self {
            Boundary::Ring(_) => true,
            Boundary::Positions(_) => false,
            Boundary::Nested(children) => children.iter().all(Boundary::is_indexed),
        }
    }

    /// The largest vertex index referenced anywhere in this tree.
    pub fn max_index(&self) -> Option<usize> {
        match self {
            Boundary::Ring(indices) => indices.iter().copied().max(),
            Boundary::Positions(_) => None,
            Boundary::Nested(children) => children.iter().filter_map(Boundary::max_index).max(),
        }
    }

    /// Shift every vertex index by `offset`, recursively.
    pub fn offset_indices(&mut self, offset: usize) {
        match self {
            Boundary::Ring(indices) => {
                for index in indices {
                    *index += offset;
                }
            }
            Boundary::Positions(_) => {}
            Boundary::Nested(children) => {
                for child in children {
                    child.offset_indices(offset);
                }
            }
        }
    }

    /// Rewrite every vertex index through `map` (old slot -> new slot).
    ///
    /// Returns the first out-of-range index on failure.
    pub fn remap_indices(&mut self, map: &[usize]) -> Result<(), usize> {
        match self {
            Boundary::Ring(indices) => {
                for index in indices {
                    *index = *map.get(*index).ok_or(*index)?;
                }
                Ok(())
            }
            Boundary::Positions(_) => Ok(()),
            Boundary::Nested(children) => {
                for child in children {
                    child.remap_indices(map)?;
                }
                Ok(())
            }
        }
    }
}

/// Parse a working-form coordinate triple. At least one component must be
/// fractional, otherwise the triple is indistinguishable from three indices.
fn as_coordinate(value: &Value) -> Option<[f64; 3]> {
    let nums = value.as_array()?;
    if nums.len() != 3 || !nums.iter().any(|n| !n.is_u64() && !n.is_i64()) {
        return None;
    }
    Some([
        nums[0].as_f64()?,
        nums[1].as_f64()?,
        nums[2].as_f64()?,
    ])
}

impl Serialize for Boundary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        match self {
            Boundary::Ring(indices) => {
                let mut seq = serializer.serialize_seq(Some(indices.len()))?;
                for index in indices {
                    seq.serialize_element(index)?;
                }
                seq.end()
            }
            Boundary::Positions(coords) => {
                let mut seq = serializer.serialize_seq(Some(coords.len()))?;
                for coord in coords {
                    seq.serialize_element(coord)?;
                }
                seq.end()
            }
            Boundary::Nested(children) => {
                let mut seq = serializer.serialize_seq(Some(children.len()))?;
                for child in children {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Boundary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Boundary::from_value(&value).map_err(serde::de::Error::custom)
    }
}
