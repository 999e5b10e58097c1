#![warn(missing_docs)]

//! Stock model and pure machining time estimation for machtime.
//!
//! The estimate picks a raw blank (round bar for rotational parts, padded
//! block otherwise), splits the material to remove over rough, semi-finish
//! and finish stages, and converts each stage volume to time through a
//! calibrated material removal rate. Setup, tool change and inspection time
//! are not part of the estimate; see [`OverheadTimes`].
//!
//! # Example
//!
//! ```
//! use machtime_estimate::{estimate, StockModel};
//! use machtime_geom::{BoundingBox, PartType};
//!
//! let e = estimate(PartType::Pri, 30000.0, BoundingBox::new(50.0, 40.0, 30.0), 0.0, 0.0).unwrap();
//! assert!(matches!(e.stock, StockModel::Block { .. }));
//! assert!((e.material_removal_percent - 75.0).abs() < 1e-9);
//! assert!((e.time_breakdown.pure_machining_time_min - 68.1).abs() < 1e-9);
//! ```

mod calibration;
mod error;
mod estimate;
mod stock;

pub use calibration::{EstimationCalibration, MachiningStage, StageCalibration};
pub use error::{EstimateError, Result};
pub use estimate::{
    estimate, EstimateInput, Estimator, MachiningStrategy, OverheadTimes, StageEstimate,
    TimeBreakdown, TimeEstimate,
};
pub use stock::{select_stock, StockFallback, StockModel};
