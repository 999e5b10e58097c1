//! Error types for the tool catalog and accessibility analysis.

use machtime_geom::{FeatureKind, GeomError};
use thiserror::Error;

/// Errors from catalog construction or accessibility analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    /// Feature kind or other geometry record could not be read.
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// A face lacks a dimension its analysis needs.
    #[error("{kind} face has no {field}")]
    MissingDimension {
        /// Kind of the face.
        kind: FeatureKind,
        /// Name of the missing dimension.
        field: &'static str,
    },

    /// A face dimension is negative or not finite.
    #[error("{kind} face has invalid {field}: {value}")]
    InvalidDimension {
        /// Kind of the face.
        kind: FeatureKind,
        /// Name of the dimension.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Catalog entries are inconsistent.
    #[error("invalid tool catalog: {0}")]
    InvalidCatalog(String),

    /// Analysis limits are inconsistent.
    #[error("invalid accessibility limits: {0}")]
    InvalidLimits(String),
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
