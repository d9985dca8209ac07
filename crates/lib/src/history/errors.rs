//! Version graph errors.

use thiserror::Error;

use crate::hash::ContentId;

/// Errors from building or traversing the version graph.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A version references a parent id absent from the versions map
    #[error("Version {version} references missing parent {parent}")]
    MissingParent {
        /// The version with the broken link
        version: ContentId,
        /// The id of the absent parent
        parent: ContentId,
    },

    /// The parent links loop back on themselves
    #[error("Version {version} is part of a parent cycle")]
    Cycle {
        /// One member of the cycle
        version: ContentId,
    },

    /// A traversal started from an id absent from the graph
    #[error("Version {id} is not in the history")]
    UnknownVersion {
        /// The absent version id
        id: ContentId,
    },

    /// Two versions share no ancestor, so they cannot be merged
    #[error("Versions {a} and {b} have no common ancestor")]
    NoCommonAncestor {
        /// First version
        a: ContentId,
        /// Second version
        b: ContentId,
    },
}

impl HistoryError {
    /// Check if this error indicates a malformed graph.
    pub fn is_missing_parent(&self) -> bool {
        matches!(self, HistoryError::MissingParent { .. })
    }

    /// Check if this error indicates disjoint histories.
    pub fn is_no_common_ancestor(&self) -> bool {
        matches!(self, HistoryError::NoCommonAncestor { .. })
    }
}
