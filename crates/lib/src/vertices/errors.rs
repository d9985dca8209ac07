//! Vertex table errors.

use thiserror::Error;

/// Errors from the vertex dedup table.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum VertexError {
    /// A boundary referenced a slot past the end of the table
    #[error("Vertex index {index} out of range for vertex list of length {len}")]
    OutOfRange {
        /// The offending index
        index: usize,
        /// Table length at the time of lookup
        len: usize,
    },
}

impl VertexError {
    /// Check if this error is an out-of-range vertex index.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, VertexError::OutOfRange { .. })
    }
}
