//! Merge errors.

use thiserror::Error;

/// Errors from the merge engine.
///
/// Conflicts are not errors; they are a terminal
/// [`MergeOutcome`](super::MergeOutcome).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MergeError {
    /// The destination is an ancestor of the source, so there is nothing to
    /// three-way merge
    #[error("'{dest}' is an ancestor of '{source_ref}', fast-forward the branch instead of merging")]
    FastForwardOnly {
        /// The source ref as supplied
        source_ref: String,
        /// The destination ref as supplied
        dest: String,
    },
}

impl MergeError {
    /// Check if this error is a refused backward merge.
    pub fn is_fast_forward_only(&self) -> bool {
        matches!(self, MergeError::FastForwardOnly { .. })
    }
}
