//! Error types for the machtime engine.

use machtime_classify::ClassifyError;
use machtime_estimate::EstimateError;
use machtime_tools::ToolError;
use thiserror::Error;

/// Errors that can occur while configuring or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Classification input or thresholds were rejected.
    #[error("classification: {0}")]
    Classify(#[from] ClassifyError),

    /// Tool catalog, limits or feature group were rejected.
    #[error("tool accessibility: {0}")]
    Tools(#[from] ToolError),

    /// Estimate input or calibration was rejected.
    #[error("time estimate: {0}")]
    Estimate(#[from] EstimateError),

    /// Configuration text could not be parsed.
    #[error("configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Result could not be written as JSON.
    #[error("serialization: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
