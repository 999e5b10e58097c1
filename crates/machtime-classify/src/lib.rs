#![warn(missing_docs)]

//! Part type classification for machtime.
//!
//! Two noisy signals describe whether a part is turned or milled: a
//! geometry score computed from the CAD model (the OCCT rotational score)
//! and an optional hint from a vision model. The classifier reconciles them
//! into exactly one [`PartType`] with a confidence.
//!
//! The geometry score is trusted outside the ambiguous band. Inside it a
//! confident vision hint wins, and when nothing is decisive the part is
//! classified prismatic at low confidence so it gets reviewed.
//!
//! # Example
//!
//! ```
//! use machtime_classify::{classify, VisionHint};
//! use machtime_geom::PartType;
//!
//! let result = classify(0.45, Some(VisionHint::Pri), Some(0.8)).unwrap();
//! assert_eq!(result.part_type, PartType::Pri);
//! assert!((result.confidence - 0.8).abs() < 1e-12);
//! ```

mod decision;
mod error;
mod input;

pub use decision::Decision;
pub use error::{ClassifyError, Result};
pub use input::{ClassificationInput, VisionHint};

use input::in_unit_range;
use machtime_geom::PartType;
use serde::{Deserialize, Serialize};

/// Decision thresholds for the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// OCCT scores strictly above this are rotational.
    pub rotational_above: f64,
    /// OCCT scores strictly below this are prismatic.
    pub prismatic_below: f64,
    /// A vision hint must be strictly more confident than this to override.
    pub vision_min_confidence: f64,
    /// Confidence reported for the fail-safe default.
    pub fail_safe_confidence: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            rotational_above: 0.7,
            prismatic_below: 0.3,
            vision_min_confidence: 0.6,
            fail_safe_confidence: 0.5,
        }
    }
}

impl ClassifierThresholds {
    /// Validate thresholds.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("rotational_above", self.rotational_above),
            ("prismatic_below", self.prismatic_below),
            ("vision_min_confidence", self.vision_min_confidence),
            ("fail_safe_confidence", self.fail_safe_confidence),
        ] {
            if !in_unit_range(value) {
                return Err(ClassifyError::InvalidThresholds(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.prismatic_below > self.rotational_above {
            return Err(ClassifyError::InvalidThresholds(
                "prismatic_below must not exceed rotational_above".into(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Chosen part type, never unknown.
    pub part_type: PartType,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Audit text naming the branch that fired.
    pub explanation: String,
    /// The branch and its inputs.
    pub decision: Decision,
}

impl ClassificationResult {
    /// The fail-safe default fired; a person should confirm the type.
    pub fn needs_review(&self) -> bool {
        self.decision.needs_review()
    }
}

/// Part type classifier with fixed thresholds.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: ClassifierThresholds,
}

impl Classifier {
    /// Create a classifier, validating the thresholds.
    pub fn new(thresholds: ClassifierThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Pick the branch for `input`.
    pub fn decide(&self, input: &ClassificationInput) -> Result<Decision> {
        input.validate()?;
        let t = &self.thresholds;
        let score = input.occt_rotational_score;

        let decision = if score > t.rotational_above {
            Decision::OcctRotational {
                score,
                ignored_hint: input.vision_hint,
            }
        } else if score < t.prismatic_below {
            Decision::OcctPrismatic {
                score,
                ignored_hint: input.vision_hint,
            }
        } else {
            let vision = input
                .vision_hint
                .and_then(|h| h.as_part_type())
                .zip(input.vision_confidence)
                .filter(|(_, c)| *c > t.vision_min_confidence);
            match vision {
                Some((part_type, vision_confidence)) => Decision::VisionOverride {
                    score,
                    part_type,
                    vision_confidence,
                },
                None => Decision::FailSafeDefault {
                    score,
                    vision_hint: input.vision_hint,
                    vision_confidence: input.vision_confidence,
                    confidence: t.fail_safe_confidence,
                },
            }
        };

        if decision.needs_review() {
            tracing::warn!(
                score,
                hint = ?input.vision_hint,
                vision_confidence = ?input.vision_confidence,
                "part type ambiguous, using fail-safe default"
            );
        } else {
            tracing::debug!(
                branch = decision.name(),
                part_type = %decision.part_type(),
                confidence = decision.confidence(),
                "part type classified"
            );
        }
        Ok(decision)
    }

    /// Classify a part.
    pub fn classify(&self, input: &ClassificationInput) -> Result<ClassificationResult> {
        let decision = self.decide(input)?;
        Ok(ClassificationResult {
            part_type: decision.part_type(),
            confidence: decision.confidence(),
            explanation: decision.narrate(&self.thresholds),
            decision,
        })
    }

    /// Describe which branch `classify` takes for `input`, without
    /// classifying.
    pub fn explain(&self, input: &ClassificationInput) -> Result<String> {
        Ok(self.decide(input)?.narrate(&self.thresholds))
    }
}

/// Classify with the default thresholds.
pub fn classify(
    occt_rotational_score: f64,
    vision_hint: Option<VisionHint>,
    vision_confidence: Option<f64>,
) -> Result<ClassificationResult> {
    Classifier::default().classify(&ClassificationInput {
        occt_rotational_score,
        vision_hint,
        vision_confidence,
    })
}

/// Explain with the default thresholds.
pub fn explain(
    occt_rotational_score: f64,
    vision_hint: Option<VisionHint>,
    vision_confidence: Option<f64>,
) -> Result<String> {
    Classifier::default().explain(&ClassificationInput {
        occt_rotational_score,
        vision_hint,
        vision_confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_confident_rotational() {
        let r = classify(0.85, None, None).unwrap();
        assert_eq!(r.part_type, PartType::Rot);
        assert_relative_eq!(r.confidence, 0.85);
        assert!(!r.needs_review());
    }

    #[test]
    fn test_rotational_ignores_vision() {
        for score in [0.71, 0.8, 0.95, 1.0] {
            for hint in [VisionHint::Rot, VisionHint::Pri, VisionHint::Unknown] {
                let r = classify(score, Some(hint), Some(0.99)).unwrap();
                assert_eq!(r.part_type, PartType::Rot);
                assert_relative_eq!(r.confidence, score);
            }
        }
    }

    #[test]
    fn test_prismatic_ignores_vision() {
        for score in [0.0, 0.1, 0.25, 0.29] {
            for hint in [VisionHint::Rot, VisionHint::Pri, VisionHint::Unknown] {
                let r = classify(score, Some(hint), Some(0.99)).unwrap();
                assert_eq!(r.part_type, PartType::Pri);
                assert_relative_eq!(r.confidence, 1.0 - score);
            }
        }
    }

    #[test]
    fn test_vision_override() {
        let r = classify(0.45, Some(VisionHint::Pri), Some(0.8)).unwrap();
        assert_eq!(r.part_type, PartType::Pri);
        assert_relative_eq!(r.confidence, 0.8);

        let r = classify(0.55, Some(VisionHint::Rot), Some(0.9)).unwrap();
        assert_eq!(r.part_type, PartType::Rot);
        assert_relative_eq!(r.confidence, 0.9);
        assert!(matches!(r.decision, Decision::VisionOverride { .. }));
    }

    #[test]
    fn test_unknown_hint_falls_back() {
        let r = classify(0.5, Some(VisionHint::Unknown), Some(0.3)).unwrap();
        assert_eq!(r.part_type, PartType::Pri);
        assert_relative_eq!(r.confidence, 0.5);
        assert!(r.needs_review());

        // Even a confident UNKNOWN hint cannot decide.
        let r = classify(0.5, Some(VisionHint::Unknown), Some(0.95)).unwrap();
        assert_eq!(r.part_type, PartType::Pri);
        assert_relative_eq!(r.confidence, 0.5);
    }

    #[test]
    fn test_band_edges_are_ambiguous() {
        for score in [0.3, 0.7] {
            let r = classify(score, None, None).unwrap();
            assert!(matches!(r.decision, Decision::FailSafeDefault { .. }));
            let r = classify(score, Some(VisionHint::Rot), Some(0.61)).unwrap();
            assert_eq!(r.part_type, PartType::Rot);
        }
    }

    #[test]
    fn test_vision_confidence_must_exceed_threshold() {
        let r = classify(0.5, Some(VisionHint::Rot), Some(0.6)).unwrap();
        assert_eq!(r.part_type, PartType::Pri);
        assert!(r.needs_review());

        let r = classify(0.5, Some(VisionHint::Rot), None).unwrap();
        assert_eq!(r.part_type, PartType::Pri);
    }

    #[test]
    fn test_idempotent() {
        let a = classify(0.52, Some(VisionHint::Rot), Some(0.7)).unwrap();
        let b = classify(0.52, Some(VisionHint::Rot), Some(0.7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_confidence_in_unit_range() {
        let hints = [None, Some(VisionHint::Rot), Some(VisionHint::Pri), Some(VisionHint::Unknown)];
        for i in 0..=20 {
            let score = i as f64 / 20.0;
            for hint in hints {
                for conf in [None, Some(0.0), Some(0.6), Some(0.61), Some(1.0)] {
                    let r = classify(score, hint, conf).unwrap();
                    assert!((0.0..=1.0).contains(&r.confidence));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            classify(1.5, None, None).unwrap_err(),
            ClassifyError::ScoreOutOfRange(1.5)
        );
        assert_eq!(
            classify(0.5, Some(VisionHint::Rot), Some(2.0)).unwrap_err(),
            ClassifyError::ConfidenceOutOfRange(2.0)
        );
    }

    #[test]
    fn test_explain_matches_classify() {
        let cases = [
            (0.85, None, None, "> 0.7:"),
            (0.2, Some(VisionHint::Rot), Some(0.9), "vision hint ROT ignored"),
            (0.45, Some(VisionHint::Pri), Some(0.8), "overrides"),
            (0.5, Some(VisionHint::Unknown), Some(0.3), "manual review"),
            (0.5, None, None, "no vision hint"),
        ];
        for (score, hint, conf, needle) in cases {
            let text = explain(score, hint, conf).unwrap();
            assert!(text.contains(needle), "{text:?} should contain {needle:?}");
            assert_eq!(text, classify(score, hint, conf).unwrap().explanation);
        }
    }

    #[test]
    fn test_explain_names_inputs() {
        let text = explain(0.45, Some(VisionHint::Pri), Some(0.8)).unwrap();
        assert!(text.contains("0.45"));
        assert!(text.contains("0.8"));
        assert!(text.contains("PRI"));
    }

    #[test]
    fn test_explain_near_thresholds_keeps_exact_inputs() {
        let over = explain(0.5, Some(VisionHint::Rot), Some(0.601)).unwrap();
        let at = explain(0.5, Some(VisionHint::Rot), Some(0.6)).unwrap();
        assert!(over.contains("confidence 0.601 > 0.6 overrides"), "{over}");
        assert!(at.contains("confidence 0.6 is not decisive"), "{at}");
        assert!(!at.contains("0.601"));

        let rot = explain(0.701, None, None).unwrap();
        assert!(rot.starts_with("OCCT rotational score 0.701 > 0.7:"), "{rot}");
        let pri = explain(0.299, None, None).unwrap();
        assert!(pri.starts_with("OCCT rotational score 0.299 < 0.3:"), "{pri}");
        assert!(pri.contains("confidence 0.701 (1 - score)"), "{pri}");
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = Classifier::new(ClassifierThresholds {
            rotational_above: 0.8,
            ..Default::default()
        })
        .unwrap();
        let r = classifier.classify(&ClassificationInput::new(0.75)).unwrap();
        assert_eq!(r.part_type, PartType::Pri);
        assert!(r.needs_review());
    }

    #[test]
    fn test_invalid_thresholds() {
        let bad = ClassifierThresholds {
            prismatic_below: 0.8,
            rotational_above: 0.2,
            ..Default::default()
        };
        assert!(Classifier::new(bad).is_err());
        let bad = ClassifierThresholds {
            vision_min_confidence: 1.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_result_serialization() {
        let r = classify(0.85, None, None).unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["part_type"], "ROT");
        assert_eq!(json["decision"]["branch"], "occt_rotational");
        let parsed: ClassificationResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, r);
    }
}
