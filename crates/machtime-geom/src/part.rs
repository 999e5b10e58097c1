//! Whole-part records: part type, bounding box, waterline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GeomError;

/// Shape class of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PartType {
    /// Rotational (turned) part.
    #[serde(rename = "ROT")]
    Rot,
    /// Prismatic (milled) part.
    #[serde(rename = "PRI")]
    Pri,
}

impl PartType {
    /// Wire name, `"ROT"` or `"PRI"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartType::Rot => "ROT",
            PartType::Pri => "PRI",
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartType {
    type Err = GeomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROT" => Ok(PartType::Rot),
            "PRI" => Ok(PartType::Pri),
            _ => Err(GeomError::UnknownPartType(s.to_string())),
        }
    }
}

impl TryFrom<String> for PartType {
    type Error = GeomError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Axis-aligned extents of a part (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Extent along X.
    pub x: f64,
    /// Extent along Y.
    pub y: f64,
    /// Extent along Z.
    pub z: f64,
}

impl BoundingBox {
    /// Create a bounding box from its three extents.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Product of the three extents.
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// Check that every extent is finite and positive.
    pub fn validate(&self) -> Result<(), GeomError> {
        for (axis, value) in [("x", self.x), ("y", self.y), ("z", self.z)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeomError::InvalidBoundingBox(format!(
                    "{axis} extent must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl From<[f64; 3]> for BoundingBox {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Turned envelope of a rotational part, measured along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterlineSummary {
    /// Largest diameter along the axis (mm).
    #[serde(default)]
    pub max_diameter_mm: f64,
    /// Length along the axis (mm).
    #[serde(default)]
    pub total_length_mm: f64,
}

impl WaterlineSummary {
    /// Create a waterline summary.
    pub fn new(max_diameter_mm: f64, total_length_mm: f64) -> Self {
        Self {
            max_diameter_mm,
            total_length_mm,
        }
    }

    /// Both dimensions are present (strictly positive).
    pub fn is_complete(&self) -> bool {
        self.max_diameter_mm > 0.0 && self.total_length_mm > 0.0
    }
}
