//! Classifier inputs: the OCCT score and the optional vision hint.

use std::fmt;
use std::str::FromStr;

use machtime_geom::PartType;
use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, Result};

/// Part type suggested by the vision model.
///
/// Parsing and deserializing are both case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum VisionHint {
    /// Looks rotational.
    #[serde(rename = "ROT")]
    Rot,
    /// Looks prismatic.
    #[serde(rename = "PRI")]
    Pri,
    /// The model could not tell.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl VisionHint {
    /// The part type this hint argues for, if any.
    pub fn as_part_type(&self) -> Option<PartType> {
        match self {
            VisionHint::Rot => Some(PartType::Rot),
            VisionHint::Pri => Some(PartType::Pri),
            VisionHint::Unknown => None,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            VisionHint::Rot => "ROT",
            VisionHint::Pri => "PRI",
            VisionHint::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for VisionHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisionHint {
    type Err = ClassifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROT" => Ok(VisionHint::Rot),
            "PRI" => Ok(VisionHint::Pri),
            "UNKNOWN" => Ok(VisionHint::Unknown),
            _ => Err(ClassifyError::UnknownVisionHint(s.to_string())),
        }
    }
}

impl TryFrom<String> for VisionHint {
    type Error = ClassifyError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Signals for one classification call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInput {
    /// Geometry-derived rotational score, 1.0 = fully rotational.
    pub occt_rotational_score: f64,
    /// Optional hint from the vision model.
    #[serde(default)]
    pub vision_hint: Option<VisionHint>,
    /// Confidence of the vision hint.
    #[serde(default)]
    pub vision_confidence: Option<f64>,
}

impl ClassificationInput {
    /// Input with only the OCCT score.
    pub fn new(occt_rotational_score: f64) -> Self {
        Self {
            occt_rotational_score,
            vision_hint: None,
            vision_confidence: None,
        }
    }

    /// Attach a vision hint and its confidence.
    pub fn with_vision(mut self, hint: VisionHint, confidence: f64) -> Self {
        self.vision_hint = Some(hint);
        self.vision_confidence = Some(confidence);
        self
    }

    /// Reject scores or confidences outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !in_unit_range(self.occt_rotational_score) {
            return Err(ClassifyError::ScoreOutOfRange(self.occt_rotational_score));
        }
        if let Some(c) = self.vision_confidence {
            if !in_unit_range(c) {
                return Err(ClassifyError::ConfidenceOutOfRange(c));
            }
        }
        Ok(())
    }
}

pub(crate) fn in_unit_range(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_hint_parse() {
        assert_eq!("rot".parse::<VisionHint>(), Ok(VisionHint::Rot));
        assert_eq!("PRI".parse::<VisionHint>(), Ok(VisionHint::Pri));
        assert_eq!("Unknown".parse::<VisionHint>(), Ok(VisionHint::Unknown));
        assert!(matches!(
            "MAYBE".parse::<VisionHint>(),
            Err(ClassifyError::UnknownVisionHint(_))
        ));
    }

    #[test]
    fn test_vision_hint_deserialize_any_case() {
        let input: ClassificationInput = serde_json::from_str(
            r#"{"occt_rotational_score": 0.5, "vision_hint": "rot", "vision_confidence": 0.9}"#,
        )
        .unwrap();
        assert_eq!(input.vision_hint, Some(VisionHint::Rot));
        assert_eq!(
            serde_json::from_str::<VisionHint>("\"Unknown\"").unwrap(),
            VisionHint::Unknown
        );
        assert_eq!(serde_json::to_string(&VisionHint::Pri).unwrap(), "\"PRI\"");
        assert!(serde_json::from_str::<VisionHint>("\"maybe\"").is_err());
    }

    #[test]
    fn test_vision_hint_part_type() {
        assert_eq!(VisionHint::Rot.as_part_type(), Some(PartType::Rot));
        assert_eq!(VisionHint::Pri.as_part_type(), Some(PartType::Pri));
        assert_eq!(VisionHint::Unknown.as_part_type(), None);
    }

    #[test]
    fn test_validate() {
        assert!(ClassificationInput::new(0.0).validate().is_ok());
        assert!(ClassificationInput::new(1.0).validate().is_ok());
        assert_eq!(
            ClassificationInput::new(1.2).validate(),
            Err(ClassifyError::ScoreOutOfRange(1.2))
        );
        assert!(ClassificationInput::new(f64::NAN).validate().is_err());
        assert_eq!(
            ClassificationInput::new(0.5)
                .with_vision(VisionHint::Rot, -0.1)
                .validate(),
            Err(ClassifyError::ConfidenceOutOfRange(-0.1))
        );
    }

    #[test]
    fn test_input_deserialize_without_vision() {
        let input: ClassificationInput =
            serde_json::from_str(r#"{"occt_rotational_score": 0.4}"#).unwrap();
        assert_eq!(input, ClassificationInput::new(0.4));
    }
}
