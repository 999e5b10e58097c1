#![warn(missing_docs)]

//! Machining time estimation engine.
//!
//! Given the recognized geometry of a part, the engine answers three
//! questions: is the part turned or milled, can the shop's tools reach every
//! feature, and how long will the cutting take. Each answer comes from its
//! own crate; this crate bundles their configuration and runs them as one
//! pipeline.
//!
//! - [`classify`]: part type from a geometry score and an optional vision
//!   hint ([`machtime_classify`])
//! - [`tools`]: tool catalog and accessibility verdicts ([`machtime_tools`])
//! - [`estimate`]: stock model and pure machining time ([`machtime_estimate`])
//!
//! # Example
//!
//! ```
//! use machtime::{Engine, PartInput};
//!
//! let part: PartInput = serde_json::from_str(
//!     r#"{
//!         "id": "bracket-7",
//!         "part_volume_mm3": 30000.0,
//!         "bbox": { "x": 50.0, "y": 40.0, "z": 30.0 },
//!         "classification": { "occt_rotational_score": 0.1 }
//!     }"#,
//! )
//! .unwrap();
//!
//! let analysis = Engine::default().analyze_part(&part).unwrap();
//! assert_eq!(analysis.classification.part_type, machtime::geom::PartType::Pri);
//! assert!((analysis.estimate.time_breakdown.pure_machining_time_min - 68.1).abs() < 1e-9);
//! ```

mod config;
mod engine;
mod error;

pub use config::EngineConfig;
pub use engine::{Engine, PartAnalysis, PartInput};
pub use error::{EngineError, Result};

pub use machtime_classify as classify;
pub use machtime_estimate as estimate;
pub use machtime_geom as geom;
pub use machtime_tools as tools;
