//! Raw stock envelope for a part.

use std::f64::consts::PI;

use machtime_geom::{round_to, BoundingBox, PartType, WaterlineSummary};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::EstimationCalibration;

/// Shape and size of the raw blank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum StockModel {
    /// Round bar stock.
    Cylinder {
        /// Bar diameter (mm).
        diameter_mm: f64,
        /// Cut length (mm).
        length_mm: f64,
    },
    /// Rectangular block stock.
    Block {
        /// Extent along X (mm).
        x_mm: f64,
        /// Extent along Y (mm).
        y_mm: f64,
        /// Extent along Z (mm).
        z_mm: f64,
    },
}

impl StockModel {
    /// Stock volume (mm³).
    pub fn volume(&self) -> f64 {
        match self {
            StockModel::Cylinder {
                diameter_mm,
                length_mm,
            } => PI * (diameter_mm / 2.0).powi(2) * length_mm,
            StockModel::Block { x_mm, y_mm, z_mm } => x_mm * y_mm * z_mm,
        }
    }

    /// Copy with dimensions rounded to one decimal.
    pub fn rounded(&self) -> Self {
        match *self {
            StockModel::Cylinder {
                diameter_mm,
                length_mm,
            } => StockModel::Cylinder {
                diameter_mm: round_to(diameter_mm, 1),
                length_mm: round_to(length_mm, 1),
            },
            StockModel::Block { x_mm, y_mm, z_mm } => StockModel::Block {
                x_mm: round_to(x_mm, 1),
                y_mm: round_to(y_mm, 1),
                z_mm: round_to(z_mm, 1),
            },
        }
    }
}

/// Why a rotational part got block stock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StockFallback {
    /// The waterline was absent or had a zero dimension.
    MissingRotationalDimensions {
        /// Reported max diameter (mm), 0 when absent.
        max_diameter_mm: f64,
        /// Reported length (mm), 0 when absent.
        total_length_mm: f64,
    },
}

/// Choose the stock model for a part.
///
/// Rotational parts get round bar only when both waterline dimensions are
/// positive; otherwise they fall back to block stock and the fallback is
/// returned alongside.
pub fn select_stock(
    part_type: PartType,
    bbox: &BoundingBox,
    waterline: Option<&WaterlineSummary>,
    calibration: &EstimationCalibration,
) -> Result<(StockModel, Option<StockFallback>)> {
    let fallback = match (part_type, waterline) {
        (PartType::Rot, Some(w)) if w.is_complete() => {
            let stock = StockModel::Cylinder {
                diameter_mm: w.max_diameter_mm + calibration.rotational_diameter_allowance_mm,
                length_mm: w.total_length_mm + calibration.rotational_length_allowance_mm,
            };
            tracing::debug!(?stock, "round bar stock");
            return Ok((stock, None));
        }
        (PartType::Rot, w) => {
            let w = w.copied().unwrap_or_default();
            tracing::warn!(
                max_diameter_mm = w.max_diameter_mm,
                total_length_mm = w.total_length_mm,
                "rotational part without turned dimensions, using block stock"
            );
            Some(StockFallback::MissingRotationalDimensions {
                max_diameter_mm: w.max_diameter_mm,
                total_length_mm: w.total_length_mm,
            })
        }
        (PartType::Pri, _) => None,
    };

    bbox.validate()?;
    let pad = calibration.prismatic_padding_mm;
    let stock = StockModel::Block {
        x_mm: bbox.x + pad,
        y_mm: bbox.y + pad,
        z_mm: bbox.z + pad,
    };
    tracing::debug!(?stock, "block stock");
    Ok((stock, fallback))
}
