//! Whole-part pipeline: classify, estimate, check tool access.

use machtime_classify::{ClassificationInput, ClassificationResult, Classifier};
use machtime_estimate::{EstimateInput, Estimator, TimeEstimate};
use machtime_geom::{BoundingBox, FeatureGroup, FeatureKind, GeometryFeature, WaterlineSummary};
use machtime_tools::{
    AccessibilityAnalyzer, AccessibilityLimits, AccessibilityVerdict, PartAccessibility,
    ToolCatalog,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::Result;

/// One part as delivered by the feature source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartInput {
    /// Part identifier, used in logs and in the analysis.
    pub id: String,
    /// Finished part volume (mm³).
    pub part_volume_mm3: f64,
    /// Part bounding box.
    pub bbox: BoundingBox,
    /// Turned envelope, when the feature source computed one.
    #[serde(default)]
    pub waterline: Option<WaterlineSummary>,
    /// Geometry score and optional vision hint.
    pub classification: ClassificationInput,
    /// Every recognized face of the part.
    #[serde(default)]
    pub features: Vec<GeometryFeature>,
    /// Feature groups to check for tool access.
    #[serde(default)]
    pub groups: Vec<FeatureGroup>,
}

/// Everything the engine concluded about one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartAnalysis {
    /// Identifier from [`PartInput::id`].
    pub part_id: String,
    /// Part type and confidence.
    pub classification: ClassificationResult,
    /// Stock and machining time for the classified type.
    pub estimate: TimeEstimate,
    /// Tool access per feature group.
    pub accessibility: PartAccessibility,
    /// Version of the engine configuration used.
    pub config_version: String,
}

impl PartAnalysis {
    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Configured engine. Immutable and shareable across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    version: String,
    classifier: Classifier,
    catalog: ToolCatalog,
    limits: AccessibilityLimits,
    estimator: Estimator,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            version: EngineConfig::default().version,
            classifier: Classifier::default(),
            catalog: ToolCatalog::standard(),
            limits: AccessibilityLimits::default(),
            estimator: Estimator::default(),
        }
    }
}

impl Engine {
    /// Build an engine, validating every section of `config`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.accessibility.validate()?;
        Ok(Self {
            version: config.version.clone(),
            classifier: Classifier::new(config.classifier.clone())?,
            catalog: config.catalog()?,
            limits: config.accessibility.clone(),
            estimator: Estimator::new(config.estimation.clone())?,
        })
    }

    /// Build an engine from a TOML configuration document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Self::new(&EngineConfig::from_toml_str(s)?)
    }

    /// The tool catalog in use.
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Classify a part.
    pub fn classify(&self, input: &ClassificationInput) -> Result<ClassificationResult> {
        Ok(self.classifier.classify(input)?)
    }

    /// Estimate machining time for an already classified part.
    pub fn estimate(&self, input: &EstimateInput) -> Result<TimeEstimate> {
        Ok(self.estimator.estimate(input)?)
    }

    /// Check whether the catalog can produce one feature group.
    pub fn analyze_accessibility(
        &self,
        feature_kind: FeatureKind,
        features_of_interest: &[GeometryFeature],
        all_features: &[GeometryFeature],
    ) -> Result<AccessibilityVerdict> {
        Ok(self.analyzer().analyze(feature_kind, features_of_interest, all_features)?)
    }

    /// Classify, estimate and check access for one part.
    pub fn analyze_part(&self, part: &PartInput) -> Result<PartAnalysis> {
        let _span = tracing::debug_span!("analyze_part", part = %part.id).entered();

        let classification = self.classifier.classify(&part.classification)?;
        let estimate = self.estimator.estimate(&EstimateInput {
            part_type: classification.part_type,
            part_volume_mm3: part.part_volume_mm3,
            bbox: part.bbox,
            waterline: part.waterline,
        })?;
        let accessibility = self.analyzer().analyze_groups(&part.groups, &part.features)?;

        if !accessibility.all_accessible {
            tracing::debug!(
                blocking = accessibility.blocking().count(),
                "part has inaccessible feature groups"
            );
        }

        Ok(PartAnalysis {
            part_id: part.id.clone(),
            classification,
            estimate,
            accessibility,
            config_version: self.version.clone(),
        })
    }

    /// Analyze parts in parallel.
    ///
    /// Results are in input order; a failing part does not affect the
    /// others.
    pub fn analyze_batch(&self, parts: &[PartInput]) -> Vec<Result<PartAnalysis>> {
        parts.par_iter().map(|p| self.analyze_part(p)).collect()
    }

    fn analyzer(&self) -> AccessibilityAnalyzer<'_> {
        AccessibilityAnalyzer::new(&self.catalog, &self.limits)
    }
}
