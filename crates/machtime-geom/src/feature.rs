//! Recognized faces and face groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GeomError;

/// Role of a recognized face.
///
/// Deserializes through [`FromStr`], so the wire form accepts the same
/// spellings as `parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum FeatureKind {
    /// Plain cylindrical face (outer turned diameter).
    Cylindrical,
    /// Hole or bore.
    Bore,
    /// Toroidal face, usually a fillet or pocket corner.
    Toroidal,
    /// Side wall of a pocket or cavity.
    PocketWall,
    /// Floor of a pocket or cavity.
    PocketBottom,
    /// Planar shoulder between two levels.
    StepFace,
    /// Planar end face of a turned part.
    EndFace,
    /// Conical face.
    Taper,
    /// Cylindrical segment of a shaft.
    ShaftSegment,
    /// Turned or milled groove.
    Groove,
}

impl FeatureKind {
    /// All kinds, in declaration order.
    pub const ALL: [FeatureKind; 10] = [
        FeatureKind::Cylindrical,
        FeatureKind::Bore,
        FeatureKind::Toroidal,
        FeatureKind::PocketWall,
        FeatureKind::PocketBottom,
        FeatureKind::StepFace,
        FeatureKind::EndFace,
        FeatureKind::Taper,
        FeatureKind::ShaftSegment,
        FeatureKind::Groove,
    ];

    /// Stable wire name, e.g. `"pocket-wall"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Cylindrical => "cylindrical",
            FeatureKind::Bore => "bore",
            FeatureKind::Toroidal => "toroidal",
            FeatureKind::PocketWall => "pocket-wall",
            FeatureKind::PocketBottom => "pocket-bottom",
            FeatureKind::StepFace => "step-face",
            FeatureKind::EndFace => "end-face",
            FeatureKind::Taper => "taper",
            FeatureKind::ShaftSegment => "shaft-segment",
            FeatureKind::Groove => "groove",
        }
    }

    /// Pocket walls and floors share the cavity analysis.
    pub fn is_pocket_family(&self) -> bool {
        matches!(self, FeatureKind::PocketWall | FeatureKind::PocketBottom)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = GeomError;

    /// Accepts the wire names case-insensitively, with `_` or `-` as the
    /// separator, plus the `hole` and `fillet` aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "hole" => return Ok(FeatureKind::Bore),
            "fillet" => return Ok(FeatureKind::Toroidal),
            _ => {}
        }
        FeatureKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| GeomError::UnknownFeatureKind(s.to_string()))
    }
}

impl TryFrom<String> for FeatureKind {
    type Error = GeomError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A single recognized face or region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryFeature {
    /// Face role.
    pub kind: FeatureKind,
    /// Diameter in mm (bores, cylinders, shaft segments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    /// Radius in mm (fillets, toroidal corners).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Lower end of the face extent along Z (mm).
    #[serde(default)]
    pub z_min: f64,
    /// Upper end of the face extent along Z (mm).
    #[serde(default)]
    pub z_max: f64,
    /// True for internal (concave) faces such as pocket corners.
    #[serde(default)]
    pub is_inner: bool,
    /// Axis direction for faces of revolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<[f64; 3]>,
}

impl GeometryFeature {
    /// Create a feature of the given kind with no dimensions.
    pub fn new(kind: FeatureKind) -> Self {
        Self {
            kind,
            diameter: None,
            radius: None,
            z_min: 0.0,
            z_max: 0.0,
            is_inner: false,
            axis: None,
        }
    }

    /// Set the diameter.
    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = Some(diameter);
        self
    }

    /// Set the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the Z extent.
    pub fn with_z_range(mut self, z_min: f64, z_max: f64) -> Self {
        self.z_min = z_min;
        self.z_max = z_max;
        self
    }

    /// Mark the face as internal.
    pub fn inner(mut self) -> Self {
        self.is_inner = true;
        self
    }

    /// Extent along Z, independent of orientation.
    pub fn depth(&self) -> f64 {
        (self.z_max - self.z_min).abs()
    }

    /// An inner toroidal face with a known radius.
    pub fn is_internal_corner(&self) -> bool {
        self.kind == FeatureKind::Toroidal && self.is_inner && self.radius.is_some()
    }
}

/// Faces the feature source grouped into one machinable feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureGroup {
    /// Identifier assigned by the feature source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Kind that selects the analysis for this group.
    pub kind: FeatureKind,
    /// Faces belonging to the group.
    #[serde(default)]
    pub faces: Vec<GeometryFeature>,
}

impl FeatureGroup {
    /// Create a group without an id.
    pub fn new(kind: FeatureKind, faces: Vec<GeometryFeature>) -> Self {
        Self {
            id: None,
            kind,
            faces,
        }
    }

    /// Attach an identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
