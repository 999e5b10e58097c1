#![warn(missing_docs)]

//! Tool catalog and tool accessibility analysis for machtime.
//!
//! Answers one question per feature group: can any tool in the shop's
//! catalog physically cut it? Catalog exhaustion is a business outcome and
//! is reported through [`LimitingFactor`], never as an error.
//!
//! # Example
//!
//! ```
//! use machtime_geom::{FeatureKind, GeometryFeature};
//! use machtime_tools::{AccessibilityAnalyzer, AccessibilityLimits, LimitingFactor, ToolCatalog};
//!
//! let catalog = ToolCatalog::standard();
//! let limits = AccessibilityLimits::default();
//! let analyzer = AccessibilityAnalyzer::new(&catalog, &limits);
//!
//! let hole = vec![GeometryFeature::new(FeatureKind::Bore)
//!     .with_diameter(10.0)
//!     .with_z_range(-40.0, 0.0)];
//! let verdict = analyzer.analyze(FeatureKind::Bore, &hole, &hole).unwrap();
//! assert!(verdict.accessible);
//! assert_eq!(verdict.limiting_factor, LimitingFactor::None);
//! assert_eq!(verdict.recommended_tools, vec!["DRILL_10"]);
//! ```

mod analyzer;
mod error;
mod tool;
mod verdict;

pub use analyzer::AccessibilityAnalyzer;
pub use error::{Result, ToolError};
pub use tool::{Tool, ToolCatalog, ToolSpec};
pub use verdict::{
    AccessibilityVerdict, GroupVerdict, HoleOperation, LimitingFactor, PartAccessibility,
};

use serde::{Deserialize, Serialize};

/// Bounds and thresholds for accessibility analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityLimits {
    /// Smallest pocket cutter when no internal corner was found (mm).
    pub default_min_tool_diameter: f64,
    /// Largest pocket cutter when no internal corner was found (mm).
    pub default_max_tool_diameter: f64,
    /// Smallest pocket cutter when a corner caps the diameter (mm).
    pub constrained_min_tool_diameter: f64,
    /// Fraction of the corner diameter a cutter may use (0.9 = 10% margin).
    pub corner_clearance_factor: f64,
    /// Corners tighter than this are reported as too tight (mm).
    pub tight_corner_radius: f64,
    /// Pockets deeper than this are reported as too deep (mm).
    pub deep_pocket_depth: f64,
    /// Allowed drill/bore diameter mismatch (mm).
    pub drill_diameter_tolerance: f64,
    /// Bores wider than this need a pilot and a boring bar (mm).
    pub pilot_threshold_diameter: f64,
    /// Tools recommended for boring when no drill matches.
    pub boring_fallback_tools: Vec<String>,
}

impl Default for AccessibilityLimits {
    fn default() -> Self {
        Self {
            default_min_tool_diameter: 4.0,
            default_max_tool_diameter: 16.0,
            constrained_min_tool_diameter: 2.0,
            corner_clearance_factor: 0.9,
            tight_corner_radius: 2.0,
            deep_pocket_depth: 100.0,
            drill_diameter_tolerance: 0.5,
            pilot_threshold_diameter: 12.0,
            boring_fallback_tools: vec!["DRILL_12".into(), "BORING_BAR".into()],
        }
    }
}

impl AccessibilityLimits {
    /// Validate limits.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("default_min_tool_diameter", self.default_min_tool_diameter),
            ("default_max_tool_diameter", self.default_max_tool_diameter),
            ("constrained_min_tool_diameter", self.constrained_min_tool_diameter),
            ("tight_corner_radius", self.tight_corner_radius),
            ("deep_pocket_depth", self.deep_pocket_depth),
            ("drill_diameter_tolerance", self.drill_diameter_tolerance),
            ("pilot_threshold_diameter", self.pilot_threshold_diameter),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ToolError::InvalidLimits(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.default_min_tool_diameter > self.default_max_tool_diameter {
            return Err(ToolError::InvalidLimits(
                "default_min_tool_diameter exceeds default_max_tool_diameter".into(),
            ));
        }
        if !(self.corner_clearance_factor > 0.0 && self.corner_clearance_factor <= 1.0) {
            return Err(ToolError::InvalidLimits(
                "corner_clearance_factor must be within (0, 1]".into(),
            ));
        }
        Ok(())
    }
}
