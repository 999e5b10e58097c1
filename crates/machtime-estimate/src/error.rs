//! Error types for time estimation.

use machtime_geom::GeomError;
use thiserror::Error;

/// Errors that can occur during estimation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// Geometry record is unusable.
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// Part volume or dimensions are negative or not finite.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Calibration constants are inconsistent.
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),
}

/// Result type for estimation.
pub type Result<T> = std::result::Result<T, EstimateError>;
