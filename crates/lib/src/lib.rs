//!
//! Cityvers: version control for 3D city-model documents.
//! This library provides the core engines for tracking, comparing and
//! merging snapshots of a CityJSON-style document.
//!
//! ## Core Concepts
//!
//! * **Content ids (`hash::ContentId`)**: every object and version is named
//!   by the hex SHA-256 digest of its canonically serialized content.
//! * **City models (`model::CityModel`)**: the typed document tree, with
//!   geometry boundaries parsed once into an explicit
//!   [`Boundary`](model::Boundary) union.
//! * **Versions (`version::Version`)**: immutable snapshots forming a DAG
//!   through parent links, reached through branches, tags or id prefixes.
//! * **Vertex pool (`vertices::IndexedVertices`)**: coordinates deduplicated
//!   under fixed-precision quantization, shared across all versions.
//! * **Engines**: [`diff`] compares two versions' object sets,
//!   [`merge`] three-way merges divergent branches with field-level conflict
//!   resolution, [`commit`] appends a snapshot, [`checkout`] extracts one,
//!   and [`rehash`] recanonicalizes every id in the document.
//!
//! Everything is synchronous and in-memory; [`storage`] loads a document
//! once, the engines transform it, and storage writes it back atomically.

pub mod checkout;
pub mod commit;
pub mod constants;
pub mod diff;
pub mod hash;
pub mod history;
pub mod merge;
pub mod model;
pub mod rehash;
pub mod storage;
pub mod version;
pub mod vertices;

pub use checkout::checkout;
pub use commit::{CommitOutcome, commit};
pub use diff::Diff;
pub use hash::ContentId;
pub use merge::{MergeOutcome, merge};
pub use model::CityModel;
pub use rehash::rehash;

/// Result type used throughout the cityvers library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the cityvers library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured document errors from the model module
    #[error(transparent)]
    Model(#[from] model::ModelError),

    /// Structured ref and version errors from the version module
    #[error(transparent)]
    Version(#[from] version::VersionError),

    /// Structured vertex table errors from the vertices module
    #[error(transparent)]
    Vertex(#[from] vertices::VertexError),

    /// Structured graph errors from the history module
    #[error(transparent)]
    History(#[from] history::HistoryError),

    /// Structured merge errors from the merge module
    #[error(transparent)]
    Merge(#[from] merge::MergeError),

    /// Structured load/save errors from the storage module
    #[error(transparent)]
    Storage(#[from] storage::StorageError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Model(_) => "model",
            Error::Version(_) => "version",
            Error::Vertex(_) => "vertices",
            Error::History(_) => "history",
            Error::Merge(_) => "merge",
            Error::Storage(_) => "storage",
        }
    }

    /// Check if this error indicates a ref or version that was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Version(version_err) => version_err.is_not_found(),
            Error::History(history_err) => {
                matches!(history_err, history::HistoryError::UnknownVersion { .. })
            }
            _ => false,
        }
    }

    /// Check if this error is an ambiguous ref prefix.
    pub fn is_ambiguous(&self) -> bool {
        match self {
            Error::Version(version_err) => version_err.is_ambiguous(),
            _ => false,
        }
    }

    /// Check if this error is input validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Model(model_err) => model_err.is_validation_error(),
            Error::Storage(storage_err) => storage_err.is_invalid_document(),
            Error::Version(version_err) => version_err.is_dangling_ref(),
            _ => false,
        }
    }

    /// Check if this error is an out-of-range geometry index.
    pub fn is_out_of_range(&self) -> bool {
        match self {
            Error::Model(model_err) => model_err.is_out_of_range(),
            Error::Vertex(vertex_err) => vertex_err.is_out_of_range(),
            _ => false,
        }
    }

    /// Check if this error is a refused backward merge.
    pub fn is_fast_forward_only(&self) -> bool {
        match self {
            Error::Merge(merge_err) => merge_err.is_fast_forward_only(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
