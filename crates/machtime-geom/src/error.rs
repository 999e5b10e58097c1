//! Error types for geometry records.

use thiserror::Error;

/// Errors raised while reading geometry records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeomError {
    /// A feature kind string did not name a known face role.
    #[error("unknown feature kind: {0}")]
    UnknownFeatureKind(String),

    /// A part type string was not `ROT` or `PRI`.
    #[error("unknown part type: {0} (expected ROT or PRI)")]
    UnknownPartType(String),

    /// Bounding box extents must be finite and positive.
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),
}
