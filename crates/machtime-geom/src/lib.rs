#![warn(missing_docs)]

//! Geometry records for the machtime estimation engine.
//!
//! Everything in this crate is produced by an external feature source (CAD
//! parsing and feature extraction live outside the engine) and is treated as
//! immutable input. Units are millimeters and cubic millimeters throughout.
//!
//! # Example
//!
//! ```
//! use machtime_geom::{FeatureKind, GeometryFeature};
//!
//! let fillet = GeometryFeature::new(FeatureKind::Toroidal)
//!     .with_radius(1.5)
//!     .inner();
//! assert!(fillet.is_internal_corner());
//!
//! let wall = GeometryFeature::new(FeatureKind::PocketWall).with_z_range(-20.0, 0.0);
//! assert!((wall.depth() - 20.0).abs() < 1e-9);
//! ```

mod error;
mod feature;
mod part;

pub use error::GeomError;
pub use feature::{FeatureGroup, FeatureKind, GeometryFeature};
pub use part::{BoundingBox, PartType, WaterlineSummary};

/// Round `value` to `decimals` decimal places.
///
/// Used only when building result records; internal computation keeps full
/// precision.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
