//! Storage errors.

use thiserror::Error;

/// Errors from loading or saving documents.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file exists but does not parse as a city model document
    #[error("'{path}' is not a valid CityJSON document: {reason}")]
    InvalidDocument {
        /// Path of the offending file
        path: String,
        /// Parser message
        reason: String,
    },

    /// A versioned operation was pointed at a document with no history
    #[error("'{path}' has no version history")]
    NotVersioned {
        /// Path of the offending file
        path: String,
    },
}

impl StorageError {
    /// Check if this error is a malformed input document.
    pub fn is_invalid_document(&self) -> bool {
        matches!(self, StorageError::InvalidDocument { .. })
    }
}
