//! Calibration constants for the estimate.
//!
//! The material removal rates and overhead fractions are calibration
//! targets to be tuned against machine data. They are versioned so an
//! estimate can name the constants it was computed with.

use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, Result};

/// Machining stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachiningStage {
    /// Bulk removal.
    Rough,
    /// Intermediate pass.
    SemiFinish,
    /// Final pass.
    Finish,
}

impl MachiningStage {
    /// All stages, in machining order.
    pub const ALL: [MachiningStage; 3] = [
        MachiningStage::Rough,
        MachiningStage::SemiFinish,
        MachiningStage::Finish,
    ];
}

/// Constants for one machining stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageCalibration {
    /// Share of the removal volume assigned to this stage.
    pub share: f64,
    /// Material removal rate (mm³/min).
    pub mrr_mm3_per_min: f64,
    /// Rapid positioning time as a fraction of cutting time.
    pub rapid_fraction: f64,
}

/// Versioned calibration for the time estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationCalibration {
    /// Calibration version label.
    pub version: String,
    /// Roughing constants.
    pub rough: StageCalibration,
    /// Semi-finishing constants.
    pub semi_finish: StageCalibration,
    /// Finishing constants.
    pub finish: StageCalibration,
    /// Spindle and coolant overhead per stage (min).
    pub auxiliary_min_per_stage: f64,
    /// Added to the turned diameter for round stock (mm, total over both sides).
    pub rotational_diameter_allowance_mm: f64,
    /// Added to the turned length for round stock (mm).
    pub rotational_length_allowance_mm: f64,
    /// Added to every bounding box extent for block stock (mm).
    pub prismatic_padding_mm: f64,
}

impl Default for EstimationCalibration {
    fn default() -> Self {
        Self {
            version: "v1".into(),
            rough: StageCalibration {
                share: 0.80,
                mrr_mm3_per_min: 3000.0,
                rapid_fraction: 0.10,
            },
            semi_finish: StageCalibration {
                share: 0.15,
                mrr_mm3_per_min: 1000.0,
                rapid_fraction: 0.15,
            },
            finish: StageCalibration {
                share: 0.05,
                mrr_mm3_per_min: 200.0,
                rapid_fraction: 0.15,
            },
            auxiliary_min_per_stage: 0.1,
            rotational_diameter_allowance_mm: 2.0,
            rotational_length_allowance_mm: 5.0,
            prismatic_padding_mm: 10.0,
        }
    }
}

impl EstimationCalibration {
    /// Constants for `stage`.
    pub fn stage(&self, stage: MachiningStage) -> &StageCalibration {
        match stage {
            MachiningStage::Rough => &self.rough,
            MachiningStage::SemiFinish => &self.semi_finish,
            MachiningStage::Finish => &self.finish,
        }
    }

    /// Validate calibration.
    pub fn validate(&self) -> Result<()> {
        let mut share_sum = 0.0;
        for stage in MachiningStage::ALL {
            let c = self.stage(stage);
            if !c.share.is_finite() || c.share < 0.0 {
                return Err(EstimateError::InvalidCalibration(format!(
                    "{stage:?} share must not be negative, got {}",
                    c.share
                )));
            }
            if !c.mrr_mm3_per_min.is_finite() || c.mrr_mm3_per_min <= 0.0 {
                return Err(EstimateError::InvalidCalibration(format!(
                    "{stage:?} material removal rate must be positive, got {}",
                    c.mrr_mm3_per_min
                )));
            }
            if !c.rapid_fraction.is_finite() || c.rapid_fraction < 0.0 {
                return Err(EstimateError::InvalidCalibration(format!(
                    "{stage:?} rapid fraction must not be negative, got {}",
                    c.rapid_fraction
                )));
            }
            share_sum += c.share;
        }
        if (share_sum - 1.0).abs() > 1e-9 {
            return Err(EstimateError::InvalidCalibration(format!(
                "stage shares must sum to 1, got {share_sum}"
            )));
        }
        for (name, value) in [
            ("auxiliary_min_per_stage", self.auxiliary_min_per_stage),
            (
                "rotational_diameter_allowance_mm",
                self.rotational_diameter_allowance_mm,
            ),
            (
                "rotational_length_allowance_mm",
                self.rotational_length_allowance_mm,
            ),
            ("prismatic_padding_mm", self.prismatic_padding_mm),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EstimateError::InvalidCalibration(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = EstimationCalibration::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.version, "v1");
        assert!((c.stage(MachiningStage::Finish).mrr_mm3_per_min - 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_shares_must_sum_to_one() {
        let mut c = EstimationCalibration::default();
        c.finish.share = 0.10;
        assert!(matches!(
            c.validate(),
            Err(EstimateError::InvalidCalibration(_))
        ));
    }

    #[test]
    fn test_zero_mrr_rejected() {
        let mut c = EstimationCalibration::default();
        c.semi_finish.mrr_mm3_per_min = 0.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_negative_allowance_rejected() {
        let c = EstimationCalibration {
            prismatic_padding_mm: -1.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize() {
        let c: EstimationCalibration = serde_json::from_str(
            r#"{"version": "shop-2", "rough": {"share": 0.8, "mrr_mm3_per_min": 4500.0, "rapid_fraction": 0.1}}"#,
        )
        .unwrap();
        assert_eq!(c.version, "shop-2");
        assert!((c.rough.mrr_mm3_per_min - 4500.0).abs() < 1e-12);
        assert!((c.finish.mrr_mm3_per_min - 200.0).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }
}
