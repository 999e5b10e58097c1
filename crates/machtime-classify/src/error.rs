//! Error types for part type classification.

use thiserror::Error;

/// Errors that can occur during classification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// OCCT rotational score outside [0, 1] or not finite.
    #[error("rotational score must be within [0, 1], got {0}")]
    ScoreOutOfRange(f64),

    /// Vision confidence outside [0, 1] or not finite.
    #[error("vision confidence must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    /// Vision hint string was not ROT, PRI or UNKNOWN.
    #[error("unknown vision hint: {0} (expected ROT, PRI or UNKNOWN)")]
    UnknownVisionHint(String),

    /// Threshold configuration is inconsistent.
    #[error("invalid thresholds: {0}")]
    InvalidThresholds(String),
}

/// Result type for classification.
pub type Result<T> = std::result::Result<T, ClassifyError>;
