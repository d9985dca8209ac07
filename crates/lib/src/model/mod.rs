//! Typed records for a CityJSON-style city model document.
//!
//! The persisted form is a single JSON tree with the top-level keys `type`,
//! `version`, `extensions`, `metadata`, `CityObjects`, `vertices`,
//! `transform`, `versioning`, `appearance` and `geometry-templates`. This
//! module maps that tree onto explicit record types with named fields so the
//! document is validated once on load, not on every access.
//!
//! City objects are opaque attribute maps apart from their `geometry` field,
//! which carries the explicit [`Boundary`] union defined in
//! [`geometry`](self::geometry). Within one object the boundary leaves are
//! either vertex indices (storage form) or coordinate triples (working form),
//! never mixed.

pub mod errors;
pub mod geometry;

pub use errors::ModelError;
pub use geometry::Boundary;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    Result,
    constants::{CITYJSON_TYPE, CITYJSON_VERSION},
    hash::{self, ContentId},
    version::Versioning,
};

/// A 3D vertex coordinate.
///
/// Components with no fractional part serialize as JSON integers, matching
/// how transform-scaled documents store their quantized coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vertex(pub [f64; 3]);

impl Vertex {
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }
}

impl From<[f64; 3]> for Vertex {
    fn from(coords: [f64; 3]) -> Self {
        Self(coords)
    }
}

impl Serialize for Vertex {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(3))?;
        for component in self.0 {
            if component.fract() == 0.0 && component.abs() < 9_007_199_254_740_992.0 {
                seq.serialize_element(&(component as i64))?;
            } else {
                seq.serialize_element(&component)?;
            }
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Vertex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let coords = <[f64; 3]>::deserialize(deserializer)?;
        Ok(Vertex(coords))
    }
}

/// Coordinate transform of a city model: real-world coordinate =
/// stored coordinate * scale + translate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: [f64; 3],
    pub translate: [f64; 3],
}

impl Transform {
    /// The identity transform: scale 1, translate 0 on every axis.
    pub fn identity() -> Self {
        Self {
            scale: [1.0, 1.0, 1.0],
            translate: [0.0, 0.0, 0.0],
        }
    }

    pub fn is_identity(&self) -> bool {
        self.scale == [1.0, 1.0, 1.0] && self.translate == [0.0, 0.0, 0.0]
    }

    /// Map a stored coordinate to real-world coordinates.
    pub fn apply(&self, coords: [f64; 3]) -> [f64; 3] {
        [
            coords[0] * self.scale[0] + self.translate[0],
            coords[1] * self.scale[1] + self.translate[1],
            coords[2] * self.scale[2] + self.translate[2],
        ]
    }

    /// Map a real-world coordinate back to storage, truncating toward zero.
    pub fn invert(&self, coords: [f64; 3]) -> [f64; 3] {
        [
            ((coords[0] - self.translate[0]) / self.scale[0]).trunc(),
            ((coords[1] - self.translate[1]) / self.scale[1]).trunc(),
            ((coords[2] - self.translate[2]) / self.scale[2]).trunc(),
        ]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// One geometry of a city object: the boundary tree plus whatever other
/// properties the object carries (`type`, `lod`, `semantics`, ...), kept
/// opaque.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub boundaries: Boundary,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// A city object: an opaque attribute map plus its geometries.
///
/// The logical id of an object lives outside this record, as the key of the
/// map that owns it; the content hash is computed over the payload only, so
/// identical content under different logical ids hashes identically.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CityObject {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub geometry: Vec<Geometry>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl CityObject {
    /// Content hash of this object's payload.
    pub fn content_id(&self) -> Result<ContentId> {
        hash::hash_value(self)
    }

    /// The largest vertex index referenced by any boundary, if any boundary
    /// is in storage form.
    pub fn max_vertex_index(&self) -> Option<usize> {
        self.geometry
            .iter()
            .filter_map(|g| g.boundaries.max_index())
            .max()
    }
}

/// The root document container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityModel {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    /// City objects by id. In a versioned document the keys are versioned
    /// object ids (content hashes); in a plain document they are logical ids.
    #[serde(rename = "CityObjects", default)]
    pub city_objects: BTreeMap<String, CityObject>,
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(default, skip_serializing_if = "Versioning::is_empty")]
    pub versioning: Versioning,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub appearance: Map<String, Value>,
    #[serde(
        rename = "geometry-templates",
        default,
        skip_serializing_if = "Map::is_empty"
    )]
    pub geometry_templates: Map<String, Value>,
}

impl CityModel {
    /// A fresh empty city model. Constructed per call; never a shared
    /// mutable template.
    pub fn empty() -> Self {
        Self {
            kind: CITYJSON_TYPE.to_string(),
            version: CITYJSON_VERSION.to_string(),
            extensions: Map::new(),
            metadata: Map::new(),
            city_objects: BTreeMap::new(),
            vertices: Vec::new(),
            transform: None,
            versioning: Versioning::default(),
            appearance: Map::new(),
            geometry_templates: Map::new(),
        }
    }

    /// The transform to use for coordinate math; identity when absent.
    pub fn effective_transform(&self) -> Transform {
        self.transform.clone().unwrap_or_default()
    }

    /// Validate the document invariants once, after loading.
    ///
    /// Checks that every geometry boundary index is within the vertex list
    /// and that every branch and tag points at an existing version.
    pub fn validate(&self) -> Result<()> {
        for (id, object) in &self.city_objects {
            if let Some(max) = object.max_vertex_index()
                && max >= self.vertices.len()
            {
                return Err(ModelError::IndexOutOfRange {
                    object: id.clone(),
                    index: max,
                    len: self.vertices.len(),
                }
                .into());
            }
        }
        self.versioning.validate()?;
        Ok(())
    }
}
