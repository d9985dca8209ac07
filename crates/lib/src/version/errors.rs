//! Version and ref resolution errors.

use thiserror::Error;

use crate::hash::ContentId;

/// Errors that can occur while resolving refs or manipulating the
/// versioning maps.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum VersionError {
    /// No version id prefix, branch or tag matches the ref
    #[error("There is no '{reference}' in the file")]
    UnknownRef {
        /// The ref that failed to resolve
        reference: String,
    },

    /// More than one version id shares the given prefix
    #[error("'{reference}' is ambiguous, try with more characters")]
    AmbiguousRef {
        /// The ambiguous prefix
        reference: String,
    },

    /// A branch or tag points at a version id that does not exist
    #[error("{kind} '{name}' points at unknown version {target}")]
    DanglingRef {
        /// "branch" or "tag"
        kind: &'static str,
        /// Name of the ref
        name: String,
        /// The missing version id
        target: ContentId,
    },

    /// Creating a branch under a name that is already taken
    #[error("Branch '{name}' already exists")]
    BranchExists {
        /// The taken branch name
        name: String,
    },

    /// A version id resolved from a ref is missing from the versions map
    #[error("Version {id} not found")]
    UnknownVersion {
        /// The missing version id
        id: ContentId,
    },

    /// A stored version timestamp does not match the fixed format
    #[error("Invalid version date '{date}': {reason}")]
    InvalidDate {
        /// The offending timestamp text
        date: String,
        /// Parser message
        reason: String,
    },
}

impl VersionError {
    /// Check if this error indicates a ref that could not be resolved.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VersionError::UnknownRef { .. } | VersionError::UnknownVersion { .. }
        )
    }

    /// Check if this error is an ambiguous ref.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, VersionError::AmbiguousRef { .. })
    }

    /// Check if this error is a dangling branch or tag pointer.
    pub fn is_dangling_ref(&self) -> bool {
        matches!(self, VersionError::DanglingRef { .. })
    }
}
