//! Three-stage machining time estimate.

use machtime_geom::{round_to, BoundingBox, PartType, WaterlineSummary};
use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, Result};
use crate::stock::{select_stock, StockFallback, StockModel};
use crate::{EstimationCalibration, MachiningStage};

/// Everything the estimate needs about one classified part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    /// Classified part type.
    pub part_type: PartType,
    /// Finished part volume (mm³).
    pub part_volume_mm3: f64,
    /// Part bounding box.
    pub bbox: BoundingBox,
    /// Turned envelope, for rotational parts.
    #[serde(default)]
    pub waterline: Option<WaterlineSummary>,
}

impl EstimateInput {
    /// Reject negative or non-finite volumes and dimensions.
    pub fn validate(&self) -> Result<()> {
        if !self.part_volume_mm3.is_finite() || self.part_volume_mm3 < 0.0 {
            return Err(EstimateError::InvalidInput(format!(
                "part volume must not be negative, got {}",
                self.part_volume_mm3
            )));
        }
        if let Some(w) = &self.waterline {
            for (name, value) in [
                ("max_diameter_mm", w.max_diameter_mm),
                ("total_length_mm", w.total_length_mm),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(EstimateError::InvalidInput(format!(
                        "{name} must not be negative, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Schedule and times for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageEstimate {
    /// Volume assigned to the stage (mm³).
    pub volume_mm3: f64,
    /// Material removal rate (mm³/min).
    pub mrr_mm3_per_min: f64,
    /// Time spent cutting (min).
    pub cutting_time_min: f64,
    /// Time spent on rapid positioning (min).
    pub rapid_time_min: f64,
    /// Cutting plus rapid time (min).
    pub total_time_min: f64,
}

/// Rough, semi-finish and finish stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachiningStrategy {
    /// Roughing.
    pub rough: StageEstimate,
    /// Semi-finishing.
    pub semi_finish: StageEstimate,
    /// Finishing.
    pub finish: StageEstimate,
}

impl MachiningStrategy {
    /// Stage estimate for `stage`.
    pub fn stage(&self, stage: MachiningStage) -> &StageEstimate {
        match stage {
            MachiningStage::Rough => &self.rough,
            MachiningStage::SemiFinish => &self.semi_finish,
            MachiningStage::Finish => &self.finish,
        }
    }

    /// Sum of the stage volumes (mm³).
    pub fn total_volume_mm3(&self) -> f64 {
        MachiningStage::ALL
            .iter()
            .map(|s| self.stage(*s).volume_mm3)
            .sum()
    }
}

/// Time totals, excluding setup, tool change and inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBreakdown {
    /// Cutting time over all stages (min).
    pub cutting_time_min: f64,
    /// Rapid time over all stages (min).
    pub rapid_time_min: f64,
    /// Spindle/coolant overhead over all stages (min).
    pub auxiliary_time_min: f64,
    /// Cutting + rapid + auxiliary (min).
    pub pure_machining_time_min: f64,
}

impl TimeBreakdown {
    /// Pure machining time plus externally supplied overhead (min).
    pub fn total_with_overhead(&self, overhead: &OverheadTimes) -> f64 {
        round_to(self.pure_machining_time_min + overhead.total_min(), 2)
    }
}

/// Times the estimate leaves out; supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverheadTimes {
    /// Machine setup (min).
    pub setup_min: f64,
    /// Tool changes (min).
    pub tool_change_min: f64,
    /// Inspection (min).
    pub inspection_min: f64,
}

impl OverheadTimes {
    /// Sum of all overhead terms (min).
    pub fn total_min(&self) -> f64 {
        self.setup_min + self.tool_change_min + self.inspection_min
    }
}

/// Machining time estimate for one part.
///
/// Volumes and percentages are rounded to one decimal, times to two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEstimate {
    /// Part type the stock model was chosen for.
    pub part_type: PartType,
    /// Raw blank.
    pub stock: StockModel,
    /// Set when a rotational part had to use block stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_fallback: Option<StockFallback>,
    /// Blank volume (mm³).
    pub stock_volume_mm3: f64,
    /// Finished part volume (mm³).
    pub part_volume_mm3: f64,
    /// Volume to remove (mm³), never negative.
    pub material_removal_volume_mm3: f64,
    /// Removal volume as a percentage of the blank.
    pub material_removal_percent: f64,
    /// Stage schedule.
    pub machining_strategy: MachiningStrategy,
    /// Time totals.
    pub time_breakdown: TimeBreakdown,
    /// Calibration version used.
    pub calibration_version: String,
}

/// Computes time estimates with a fixed calibration.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    calibration: EstimationCalibration,
}

impl Estimator {
    /// Create an estimator, validating the calibration.
    pub fn new(calibration: EstimationCalibration) -> Result<Self> {
        calibration.validate()?;
        Ok(Self { calibration })
    }

    /// Estimate pure machining time for a part.
    pub fn estimate(&self, input: &EstimateInput) -> Result<TimeEstimate> {
        input.validate()?;
        let cal = &self.calibration;

        let (stock, stock_fallback) =
            select_stock(input.part_type, &input.bbox, input.waterline.as_ref(), cal)?;
        let stock_volume = stock.volume();
        let removal = (stock_volume - input.part_volume_mm3).max(0.0);
        let removal_percent = if stock_volume > 0.0 {
            removal / stock_volume * 100.0
        } else {
            0.0
        };

        let mut cutting_total = 0.0;
        let mut rapid_total = 0.0;
        let mut stages = [StageEstimate {
            volume_mm3: 0.0,
            mrr_mm3_per_min: 0.0,
            cutting_time_min: 0.0,
            rapid_time_min: 0.0,
            total_time_min: 0.0,
        }; 3];
        let rounded_volumes = split_rounded(removal, cal);

        for (i, stage) in MachiningStage::ALL.into_iter().enumerate() {
            let c = cal.stage(stage);
            let volume = removal * c.share;
            let cutting = volume / c.mrr_mm3_per_min;
            let rapid = cutting * c.rapid_fraction;
            cutting_total += cutting;
            rapid_total += rapid;
            stages[i] = StageEstimate {
                volume_mm3: rounded_volumes[i],
                mrr_mm3_per_min: c.mrr_mm3_per_min,
                cutting_time_min: round_to(cutting, 2),
                rapid_time_min: round_to(rapid, 2),
                total_time_min: round_to(cutting + rapid, 2),
            };
        }
        let [rough, semi_finish, finish] = stages;

        let auxiliary = cal.auxiliary_min_per_stage * MachiningStage::ALL.len() as f64;
        let pure = cutting_total + rapid_total + auxiliary;

        tracing::debug!(
            part_type = %input.part_type,
            stock_volume,
            removal,
            pure_machining_time_min = pure,
            "machining time estimated"
        );

        Ok(TimeEstimate {
            part_type: input.part_type,
            stock: stock.rounded(),
            stock_fallback,
            stock_volume_mm3: round_to(stock_volume, 1),
            part_volume_mm3: round_to(input.part_volume_mm3, 1),
            material_removal_volume_mm3: round_to(removal, 1),
            material_removal_percent: round_to(removal_percent, 1),
            machining_strategy: MachiningStrategy {
                rough,
                semi_finish,
                finish,
            },
            time_breakdown: TimeBreakdown {
                cutting_time_min: round_to(cutting_total, 2),
                rapid_time_min: round_to(rapid_total, 2),
                auxiliary_time_min: round_to(auxiliary, 2),
                pure_machining_time_min: round_to(pure, 2),
            },
            calibration_version: cal.version.clone(),
        })
    }
}

/// Split `removal` by stage share and round to one decimal so the rounded
/// stages add up to the rounded total.
///
/// Rounds the running sum and takes differences, which keeps every stage
/// non-negative.
fn split_rounded(removal: f64, cal: &EstimationCalibration) -> [f64; 3] {
    let mut out = [0.0; 3];
    let mut cumulative = 0.0;
    let mut previous = 0.0;
    for (i, stage) in MachiningStage::ALL.into_iter().enumerate() {
        cumulative += cal.stage(stage).share;
        let rounded = if i == MachiningStage::ALL.len() - 1 {
            round_to(removal, 1)
        } else {
            round_to(removal * cumulative, 1)
        };
        out[i] = round_to(rounded - previous, 1);
        previous = rounded;
    }
    out
}

/// Estimate with the default calibration.
///
/// A zero `max_diameter` or `total_length` on a rotational part selects
/// block stock; see [`StockFallback`].
pub fn estimate(
    part_type: PartType,
    volume_mm3: f64,
    bbox: BoundingBox,
    max_diameter: f64,
    total_length: f64,
) -> Result<TimeEstimate> {
    Estimator::default().estimate(&EstimateInput {
        part_type,
        part_volume_mm3: volume_mm3,
        bbox,
        waterline: Some(WaterlineSummary::new(max_diameter, total_length)),
    })
}
