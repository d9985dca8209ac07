//! Model-specific error types for the cityvers library.
//!
//! Structured errors for document parsing and validation.

use thiserror::Error;

/// Errors that can occur while building or validating a city model.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ModelError {
    /// The input is not a well-formed city model document
    #[error("Not a valid CityJSON document: {reason}")]
    InvalidDocument {
        /// Why the document was rejected
        reason: String,
    },

    /// A geometry boundary tree has an unexpected shape
    #[error("Invalid geometry boundary: {reason}")]
    InvalidBoundary {
        /// Why the boundary was rejected
        reason: String,
    },

    /// A ring with exactly one vertex is meaningless
    #[error("A ring has to have more than one vertex")]
    DegenerateRing,

    /// A boundary references a vertex slot outside the vertex list
    #[error("Object '{object}' references vertex {index} but only {len} vertices exist")]
    IndexOutOfRange {
        /// Logical or versioned id of the offending object
        object: String,
        /// The out-of-range index
        index: usize,
        /// Current vertex list length
        len: usize,
    },
}

impl ModelError {
    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ModelError::InvalidDocument { .. }
                | ModelError::InvalidBoundary { .. }
                | ModelError::DegenerateRing
        )
    }

    /// Check if this error is an out-of-range geometry index.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, ModelError::IndexOutOfRange { .. })
    }
}
