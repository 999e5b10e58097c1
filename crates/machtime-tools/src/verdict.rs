//! Accessibility verdicts.

use std::fmt;

use machtime_geom::FeatureKind;
use serde::{Deserialize, Serialize};

/// What prevented a feature from being reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LimitingFactor {
    /// Nothing; at least one tool qualifies.
    None,
    /// Internal corner radius is smaller than any usable cutter.
    CornerTooTight,
    /// Feature is deeper than any usable cutter reaches.
    TooDeep,
    /// Candidate set is empty for another reason.
    NoSuitableTool,
    /// No drill matches the bore diameter and depth.
    NoMatchingDrill,
    /// No faces were supplied; upstream data is missing.
    NoFaces,
}

impl LimitingFactor {
    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitingFactor::None => "none",
            LimitingFactor::CornerTooTight => "corner-too-tight",
            LimitingFactor::TooDeep => "too-deep",
            LimitingFactor::NoSuitableTool => "no-suitable-tool",
            LimitingFactor::NoMatchingDrill => "no-matching-drill",
            LimitingFactor::NoFaces => "no-faces",
        }
    }
}

impl fmt::Display for LimitingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a hole gets made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoleOperation {
    /// Straight drilling to size.
    Drilling,
    /// Pilot drill followed by a boring bar.
    Boring,
}

/// Whether any cataloged tool can produce a feature group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityVerdict {
    /// Kind the analysis ran for.
    pub feature_kind: FeatureKind,
    /// At least one tool (or a boring path) can produce the feature.
    pub accessible: bool,
    /// Why it cannot, or `none`.
    pub limiting_factor: LimitingFactor,
    /// Qualifying tool ids, best first.
    pub recommended_tools: Vec<String>,
    /// Smallest admissible tool diameter (mm).
    pub min_tool_diameter: Option<f64>,
    /// Largest admissible tool diameter (mm).
    pub max_tool_diameter: Option<f64>,
    /// Depth the tool must reach (mm).
    pub max_depth: Option<f64>,
    /// Tightest internal corner radius found (mm).
    pub min_internal_radius: Option<f64>,
    /// Bore needs a pilot hole before boring.
    #[serde(default)]
    pub pilot_required: bool,
    /// Operation for bores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_operation: Option<HoleOperation>,
}

impl AccessibilityVerdict {
    /// Verdict for an empty face list.
    pub fn no_faces(feature_kind: FeatureKind) -> Self {
        Self {
            accessible: false,
            limiting_factor: LimitingFactor::NoFaces,
            ..Self::unconstrained(feature_kind)
        }
    }

    /// Verdict for kinds that carry no tool constraint.
    pub fn unconstrained(feature_kind: FeatureKind) -> Self {
        Self {
            feature_kind,
            accessible: true,
            limiting_factor: LimitingFactor::None,
            recommended_tools: Vec::new(),
            min_tool_diameter: None,
            max_tool_diameter: None,
            max_depth: None,
            min_internal_radius: None,
            pilot_required: false,
            recommended_operation: None,
        }
    }
}

/// Verdict for one feature group of a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupVerdict {
    /// Group identifier from the feature source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// The verdict.
    #[serde(flatten)]
    pub verdict: AccessibilityVerdict,
}

/// Accessibility of every analyzed group of a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartAccessibility {
    /// True when every group is accessible.
    pub all_accessible: bool,
    /// Per-group verdicts, in input order.
    pub groups: Vec<GroupVerdict>,
}

impl PartAccessibility {
    /// Collect group verdicts.
    pub fn from_groups(groups: Vec<GroupVerdict>) -> Self {
        let all_accessible = groups.iter().all(|g| g.verdict.accessible);
        Self {
            all_accessible,
            groups,
        }
    }

    /// Groups that block the part.
    pub fn blocking(&self) -> impl Iterator<Item = &GroupVerdict> {
        self.groups.iter().filter(|g| !g.verdict.accessible)
    }
}

impl Default for PartAccessibility {
    /// No groups to check, so nothing blocks the part.
    fn default() -> Self {
        Self::from_groups(Vec::new())
    }
}
