//! Constants used throughout the cityvers library.
//!
//! This module provides central definitions for the document format strings,
//! the timestamp format and the versioning defaults.

/// Document type marker expected at the top level of every city model.
pub const CITYJSON_TYPE: &str = "CityJSON";

/// Document format version written into freshly created city models.
pub const CITYJSON_VERSION: &str = "1.0";

/// Branch that commits and merges target when no ref is given.
pub const DEFAULT_BRANCH: &str = "main";

/// Fixed textual format of version timestamps, e.g. `2026-08-24T12:30:00.000000Z`.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Number of decimal digits coordinates are quantized to before deduplication.
pub const DEFAULT_PRECISION: usize = 3;
