//! Versioned engine configuration.

use machtime_classify::ClassifierThresholds;
use machtime_estimate::EstimationCalibration;
use machtime_tools::{AccessibilityLimits, ToolCatalog, ToolSpec};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Every tunable constant of the engine in one document.
///
/// Missing sections take their defaults, so an empty document is the
/// standard configuration.
///
/// ```
/// use machtime::EngineConfig;
///
/// let config = EngineConfig::from_toml_str(
///     r#"
///     version = "shop-7"
///
///     [classifier]
///     vision_min_confidence = 0.75
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.version, "shop-7");
/// assert!((config.classifier.rotational_above - 0.7).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Configuration version label.
    pub version: String,
    /// Part type classifier thresholds.
    pub classifier: ClassifierThresholds,
    /// Tool accessibility bounds.
    pub accessibility: AccessibilityLimits,
    /// Time estimate calibration.
    pub estimation: EstimationCalibration,
    /// Tool catalog; empty means the standard catalog.
    pub tools: Vec<ToolSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: "v1".into(),
            classifier: ClassifierThresholds::default(),
            accessibility: AccessibilityLimits::default(),
            estimation: EstimationCalibration::default(),
            tools: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// The catalog this configuration describes.
    pub fn catalog(&self) -> Result<ToolCatalog> {
        if self.tools.is_empty() {
            Ok(ToolCatalog::standard())
        } else {
            Ok(ToolCatalog::new(self.tools.clone())?)
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;
        self.accessibility.validate()?;
        self.estimation.validate()?;
        self.catalog()?;
        Ok(())
    }
}
