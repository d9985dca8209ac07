//! Deduplicating vertex store with index-based geometry encoding.
//!
//! [`IndexedVertices`] maps quantized 3D coordinates to stable integer slots
//! and translates city object geometry between storage form (flat vertex
//! list plus integer indices in boundaries) and working form (coordinate
//! triples inline in boundaries).
//!
//! Coordinates are compared through fixed-precision string keys, not
//! floating-point equality: each axis is formatted to `precision` decimal
//! digits (default 3), so two coordinates closer than 10^-precision on every
//! axis share a slot. That formatting is the deduplication granularity
//! contract.

pub mod errors;

pub use errors::VertexError;

use std::collections::HashMap;

use crate::{
    Result,
    model::{Boundary, CityModel, CityObject, Transform, Vertex},
};

/// The shared vertex pool of a document, keyed by quantized coordinates.
///
/// Slot numbers are assigned in first-seen order: the slot of a key is the
/// count of distinct keys inserted before it. The document vertex list must
/// be rebuilt through [`IndexedVertices::update_vertex_list`] after any
/// batch of insertions so the two stay positionally in sync.
#[derive(Debug, Clone)]
pub struct IndexedVertices {
    precision: usize,
    transform: Transform,
    slots: HashMap<String, usize>,
    /// Real-world coordinates, rounded to `precision`, in slot order.
    coords: Vec<[f64; 3]>,
}

impl IndexedVertices {
    /// Scan a document's vertex list into a dedup table.
    ///
    /// The document transform is applied to obtain real-world coordinates
    /// before quantization. Returns the table together with the old-slot to
    /// new-slot remapping for the scanned list; duplicate quantized keys
    /// collapse onto the earlier slot.
    pub fn build(model: &CityModel, precision: usize) -> (Self, Vec<usize>) {
        let mut table = Self {
            precision,
            transform: model.effective_transform(),
            slots: HashMap::new(),
            coords: Vec::new(),
        };

        let mut remap = Vec::with_capacity(model.vertices.len());
        for vertex in &model.vertices {
            let real = table.transform.apply(vertex.0);
            remap.push(table.index_of(real));
        }

        tracing::debug!(
            scanned = model.vertices.len(),
            distinct = table.coords.len(),
            precision,
            "Built vertex dedup table"
        );

        (table, remap)
    }

    /// Number of distinct slots.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    fn quantize_key(&self, coords: [f64; 3]) -> String {
        format!(
            "{:.p$} {:.p$} {:.p$}",
            coords[0],
            coords[1],
            coords[2],
            p = self.precision
        )
    }

    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        (value * factor).round() / factor
    }

    /// Look up or create the slot of a real-world coordinate.
    ///
    /// Creating a new slot is an observable mutation of the shared table:
    /// later calls within the same batch see slots created by earlier ones.
    pub fn index_of(&mut self, coords: [f64; 3]) -> usize {
        let key = self.quantize_key(coords);
        if let Some(&slot) = self.slots.get(&key) {
            return slot;
        }
        let slot = self.slots.len();
        self.slots.insert(key, slot);
        self.coords.push([
            self.round(coords[0]),
            self.round(coords[1]),
            self.round(coords[2]),
        ]);
        slot
    }

    /// The real-world coordinate stored at a slot.
    pub fn coords_at(&self, index: usize) -> Result<[f64; 3]> {
        self.coords
            .get(index)
            .copied()
            .ok_or_else(|| {
                VertexError::OutOfRange {
                    index,
                    len: self.coords.len(),
                }
                .into()
            })
    }

    /// Rewrite an object's geometry from storage form to working form.
    ///
    /// Returns a deep copy whose boundary leaves are coordinate triples
    /// instead of vertex indices, preserving nesting depth exactly.
    pub fn dereference(&self, object: &CityObject) -> Result<CityObject> {
        let mut result = object.clone();
        for geometry in &mut result.geometry {
            geometry.boundaries = self.dereference_boundary(&geometry.boundaries)?;
        }
        Ok(result)
    }

    fn dereference_boundary(&self, boundary: &Boundary) -> Result<Boundary> {
        match boundary {
            Boundary::Ring(indices) => {
                let coords = indices
                    .iter()
                    .map(|&index| self.coords_at(index))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Boundary::Positions(coords))
            }
            Boundary::Positions(coords) => Ok(Boundary::Positions(coords.clone())),
            Boundary::Nested(children) => {
                let children = children
                    .iter()
                    .map(|child| self.dereference_boundary(child))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Boundary::Nested(children))
            }
        }
    }

    /// Rewrite an object's geometry from working form to storage form.
    ///
    /// The inverse of [`dereference`](Self::dereference): coordinate triples
    /// become slot indices, creating new slots for coordinates not yet in
    /// the table.
    pub fn reference(&mut self, object: &CityObject) -> CityObject {
        let mut result = object.clone();
        for geometry in &mut result.geometry {
            geometry.boundaries = self.reference_boundary(&geometry.boundaries);
        }
        result
    }

    fn reference_boundary(&mut self, boundary: &Boundary) -> Boundary {
        match boundary {
            Boundary::Positions(coords) => {
                let indices = coords.iter().map(|&c| self.index_of(c)).collect();
                Boundary::Ring(indices)
            }
            Boundary::Ring(indices) => Boundary::Ring(indices.clone()),
            Boundary::Nested(children) => Boundary::Nested(
                children
                    .iter()
                    .map(|child| self.reference_boundary(child))
                    .collect(),
            ),
        }
    }

    /// Rebuild the document's flat vertex list from the table.
    ///
    /// Emits one vertex per slot in insertion order, mapped back through the
    /// inverse transform (subtract translate, divide by scale, truncate
    /// toward zero) when the document carries one. Must be called after any
    /// batch of [`index_of`](Self::index_of) calls that should be reflected
    /// in storage, and after any transform change.
    pub fn update_vertex_list(&self, model: &mut CityModel) {
        let has_transform = model.transform.is_some();
        model.vertices = self
            .coords
            .iter()
            .map(|&real| {
                if has_transform {
                    Vertex(self.transform.invert(real))
                } else {
                    Vertex(real)
                }
            })
            .collect();
    }

    /// Replace the document transform and rewrite the stored vertex list so
    /// it stays consistent with the new transform.
    pub fn set_transform(&mut self, model: &mut CityModel, translate: [f64; 3], scale: [f64; 3]) {
        let transform = Transform { scale, translate };
        model.transform = Some(transform.clone());
        self.transform = transform;
        self.update_vertex_list(model);
    }
}
