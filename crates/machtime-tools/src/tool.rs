//! Cutting tool definitions and the tool catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

/// A cutting tool definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Tool {
    /// Twist drill for straight holes.
    Drill {
        /// Drill diameter in mm.
        diameter: f64,
        /// Deepest hole it can drill in mm.
        max_depth: f64,
    },
    /// End mill for pockets and profiles.
    EndMill {
        /// Cutter diameter in mm.
        diameter: f64,
        /// Usable reach below the holder in mm.
        reach: f64,
        /// Smallest internal corner radius it can produce in mm.
        min_corner_radius: f64,
    },
    /// Turning insert on a lathe tool holder.
    TurningInsert {
        /// Nose radius in mm.
        nose_radius: f64,
        /// Usable reach along the axis in mm.
        reach: f64,
    },
}

impl Tool {
    /// Cutting diameter. For turning inserts this is twice the nose radius.
    pub fn diameter(&self) -> f64 {
        match self {
            Tool::Drill { diameter, .. } => *diameter,
            Tool::EndMill { diameter, .. } => *diameter,
            Tool::TurningInsert { nose_radius, .. } => nose_radius * 2.0,
        }
    }

    /// Maximum reach depth.
    pub fn reach(&self) -> f64 {
        match self {
            Tool::Drill { max_depth, .. } => *max_depth,
            Tool::EndMill { reach, .. } => *reach,
            Tool::TurningInsert { reach, .. } => *reach,
        }
    }

    /// Smallest internal corner radius the tool can cut.
    pub fn min_corner_radius(&self) -> f64 {
        match self {
            Tool::Drill { diameter, .. } => diameter / 2.0,
            Tool::EndMill {
                min_corner_radius, ..
            } => *min_corner_radius,
            Tool::TurningInsert { nose_radius, .. } => *nose_radius,
        }
    }

    /// Milling tools are the candidates for pockets.
    pub fn is_milling(&self) -> bool {
        matches!(self, Tool::EndMill { .. })
    }

    /// Check if the tool is a drill.
    pub fn is_drill(&self) -> bool {
        matches!(self, Tool::Drill { .. })
    }

    /// Drill of `diameter` reaching ten diameters deep.
    pub fn drill(diameter: f64) -> Self {
        Tool::Drill {
            diameter,
            max_depth: diameter * 10.0,
        }
    }

    /// Long-series end mill of `diameter`: reach of four diameters, corner
    /// radius equal to the tool radius.
    pub fn end_mill(diameter: f64) -> Self {
        Tool::EndMill {
            diameter,
            reach: diameter * 4.0,
            min_corner_radius: diameter / 2.0,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(format!("{name} must be positive, got {v}"))
            }
        };
        positive("diameter", self.diameter())?;
        positive("reach", self.reach())?;
        let r = self.min_corner_radius();
        if !r.is_finite() || r < 0.0 {
            return Err(format!("min_corner_radius must not be negative, got {r}"));
        }
        Ok(())
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Identifier used in recommendations, e.g. `DRILL_10`.
    pub id: String,
    /// Human-readable description.
    #[serde(default)]
    pub name: String,
    /// The tool definition.
    pub tool: Tool,
}

impl ToolSpec {
    /// Create a catalog entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>, tool: Tool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tool,
        }
    }
}

/// Read-only set of tools available to the shop.
///
/// Built once and shared by reference; nothing mutates it after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCatalog {
    tools: Vec<ToolSpec>,
}

impl ToolCatalog {
    /// Build a catalog, rejecting duplicate ids and non-physical tools.
    pub fn new(tools: Vec<ToolSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &tools {
            if spec.id.trim().is_empty() {
                return Err(ToolError::InvalidCatalog("tool id must not be empty".into()));
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(ToolError::InvalidCatalog(format!(
                    "duplicate tool id {}",
                    spec.id
                )));
            }
            spec.tool
                .validate()
                .map_err(|e| ToolError::InvalidCatalog(format!("{}: {e}", spec.id)))?;
        }
        Ok(Self { tools })
    }

    /// The shop's standard tools.
    pub fn standard() -> Self {
        let mut tools = Vec::new();
        for d in [3.0, 5.0, 6.0, 8.0, 10.0, 12.0] {
            tools.push(ToolSpec::new(
                format!("DRILL_{d}"),
                format!("{d}mm Drill"),
                Tool::drill(d),
            ));
        }
        for d in [2.0, 3.0, 4.0, 6.0, 8.0, 10.0, 12.0, 16.0, 20.0] {
            tools.push(ToolSpec::new(
                format!("EM_{d}"),
                format!("{d}mm Flat Endmill"),
                Tool::end_mill(d),
            ));
        }
        tools.push(ToolSpec::new(
            "TURN_R04",
            "Turning insert R0.4",
            Tool::TurningInsert {
                nose_radius: 0.4,
                reach: 150.0,
            },
        ));
        tools.push(ToolSpec::new(
            "TURN_R08",
            "Turning insert R0.8",
            Tool::TurningInsert {
                nose_radius: 0.8,
                reach: 150.0,
            },
        ));
        Self { tools }
    }

    /// Look up a tool by id.
    pub fn get(&self, id: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.id == id)
    }

    /// All tools, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    /// Milling tools, in catalog order.
    pub fn milling_tools(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter().filter(|t| t.tool.is_milling())
    }

    /// Drills, in catalog order.
    pub fn drills(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter().filter(|t| t.tool.is_drill())
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the catalog has no tools.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for ToolCatalog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            tools: Vec<ToolSpec>,
        }
        let raw = Raw::deserialize(deserializer)?;
        ToolCatalog::new(raw.tools).map_err(serde::de::Error::custom)
    }
}
