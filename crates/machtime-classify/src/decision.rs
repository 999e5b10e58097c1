//! The four classification branches.

use machtime_geom::{round_to, PartType};
use serde::{Deserialize, Serialize};

use crate::{ClassifierThresholds, VisionHint};

/// Which branch decided the part type, with the values it saw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "branch", rename_all = "snake_case")]
pub enum Decision {
    /// OCCT score above the rotational threshold.
    OcctRotational {
        /// OCCT rotational score.
        score: f64,
        /// Vision hint that was present but not consulted.
        ignored_hint: Option<VisionHint>,
    },
    /// OCCT score below the prismatic threshold.
    OcctPrismatic {
        /// OCCT rotational score.
        score: f64,
        /// Vision hint that was present but not consulted.
        ignored_hint: Option<VisionHint>,
    },
    /// OCCT was ambiguous and the vision hint was confident enough.
    VisionOverride {
        /// OCCT rotational score.
        score: f64,
        /// Part type named by the vision hint.
        part_type: PartType,
        /// Vision confidence.
        vision_confidence: f64,
    },
    /// Neither signal was decisive.
    FailSafeDefault {
        /// OCCT rotational score.
        score: f64,
        /// Vision hint, if one was supplied.
        vision_hint: Option<VisionHint>,
        /// Vision confidence, if one was supplied.
        vision_confidence: Option<f64>,
        /// Confidence reported for the default.
        confidence: f64,
    },
}

impl Decision {
    /// Part type chosen by this branch.
    pub fn part_type(&self) -> PartType {
        match self {
            Decision::OcctRotational { .. } => PartType::Rot,
            Decision::OcctPrismatic { .. } => PartType::Pri,
            Decision::VisionOverride { part_type, .. } => *part_type,
            Decision::FailSafeDefault { .. } => PartType::Pri,
        }
    }

    /// Confidence reported with the part type.
    pub fn confidence(&self) -> f64 {
        match self {
            Decision::OcctRotational { score, .. } => *score,
            Decision::OcctPrismatic { score, .. } => 1.0 - score,
            Decision::VisionOverride {
                vision_confidence, ..
            } => *vision_confidence,
            Decision::FailSafeDefault { confidence, .. } => *confidence,
        }
    }

    /// Short branch name, as serialized.
    pub fn name(&self) -> &'static str {
        match self {
            Decision::OcctRotational { .. } => "occt_rotational",
            Decision::OcctPrismatic { .. } => "occt_prismatic",
            Decision::VisionOverride { .. } => "vision_override",
            Decision::FailSafeDefault { .. } => "fail_safe_default",
        }
    }

    /// The result should be checked by a person.
    pub fn needs_review(&self) -> bool {
        matches!(self, Decision::FailSafeDefault { .. })
    }

    /// Audit text naming the branch and the inputs it used.
    ///
    /// Inputs and thresholds are printed exactly, so the text never shows
    /// a value on the wrong side of the threshold it was compared with.
    pub fn narrate(&self, t: &ClassifierThresholds) -> String {
        let part_type = self.part_type();
        // Drops the float noise of `1 - score`.
        let confidence = round_to(self.confidence(), 12);
        match self {
            Decision::OcctRotational {
                score,
                ignored_hint,
            } => format!(
                "OCCT rotational score {score} > {}: {part_type} with confidence \
                 {confidence}{}",
                t.rotational_above,
                ignored_suffix(*ignored_hint)
            ),
            Decision::OcctPrismatic {
                score,
                ignored_hint,
            } => format!(
                "OCCT rotational score {score} < {}: {part_type} with confidence \
                 {confidence} (1 - score){}",
                t.prismatic_below,
                ignored_suffix(*ignored_hint)
            ),
            Decision::VisionOverride {
                score,
                vision_confidence,
                ..
            } => format!(
                "OCCT rotational score {score} is ambiguous ({}..={}); vision hint \
                 {part_type} with confidence {vision_confidence} > {} overrides: \
                 {part_type} with confidence {confidence}",
                t.prismatic_below, t.rotational_above, t.vision_min_confidence
            ),
            Decision::FailSafeDefault {
                score,
                vision_hint,
                vision_confidence,
                ..
            } => {
                let vision = match (vision_hint, vision_confidence) {
                    (None, _) => "no vision hint".to_string(),
                    (Some(h), Some(c)) => format!(
                        "vision hint {h} with confidence {c} is not decisive (needs a ROT/PRI \
                         hint above {})",
                        t.vision_min_confidence
                    ),
                    (Some(h), None) => {
                        format!("vision hint {h} has no confidence and is not decisive")
                    }
                };
                format!(
                    "OCCT rotational score {score} is ambiguous ({}..={}) and {vision}: \
                     fail-safe {part_type} with confidence {confidence}, manual review \
                     recommended",
                    t.prismatic_below, t.rotational_above
                )
            }
        }
    }
}

fn ignored_suffix(hint: Option<VisionHint>) -> String {
    match hint {
        Some(h) => format!(" (vision hint {h} ignored)"),
        None => String::new(),
    }
}
