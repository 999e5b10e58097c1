//! Tool accessibility analysis.
//!
//! Pockets are checked against end mills: the tightest internal corner caps
//! the cutter diameter and the deepest wall sets the reach. Bores are
//! checked against drills within a diameter tolerance; wide bores go to a
//! pilot drill and a boring bar.

use machtime_geom::{FeatureGroup, FeatureKind, GeometryFeature};

use crate::error::{Result, ToolError};
use crate::{
    AccessibilityLimits, AccessibilityVerdict, GroupVerdict, HoleOperation, LimitingFactor,
    PartAccessibility, ToolCatalog, ToolSpec,
};

/// Checks features against a tool catalog.
#[derive(Debug, Clone, Copy)]
pub struct AccessibilityAnalyzer<'a> {
    catalog: &'a ToolCatalog,
    limits: &'a AccessibilityLimits,
}

impl<'a> AccessibilityAnalyzer<'a> {
    /// Create an analyzer over `catalog`.
    pub fn new(catalog: &'a ToolCatalog, limits: &'a AccessibilityLimits) -> Self {
        Self { catalog, limits }
    }

    /// Decide whether any tool can produce `features_of_interest`.
    ///
    /// `all_features` is the part's full face list; it bounds the scope of
    /// the group but the verdict depends only on the group's own faces.
    pub fn analyze(
        &self,
        feature_kind: FeatureKind,
        features_of_interest: &[GeometryFeature],
        all_features: &[GeometryFeature],
    ) -> Result<AccessibilityVerdict> {
        let _span = tracing::debug_span!(
            "accessibility",
            kind = %feature_kind,
            faces = features_of_interest.len(),
            part_faces = all_features.len()
        )
        .entered();

        if features_of_interest.is_empty() {
            tracing::debug!("no faces supplied");
            return Ok(AccessibilityVerdict::no_faces(feature_kind));
        }

        if feature_kind.is_pocket_family() {
            self.analyze_pocket(feature_kind, features_of_interest)
        } else if feature_kind == FeatureKind::Bore {
            self.analyze_bore(&features_of_interest[0])
        } else {
            Ok(AccessibilityVerdict::unconstrained(feature_kind))
        }
    }

    /// Same as [`analyze`](Self::analyze) with the kind given by name.
    pub fn analyze_named(
        &self,
        feature_kind: &str,
        features_of_interest: &[GeometryFeature],
        all_features: &[GeometryFeature],
    ) -> Result<AccessibilityVerdict> {
        let kind = feature_kind.parse::<FeatureKind>()?;
        self.analyze(kind, features_of_interest, all_features)
    }

    /// Analyze every group of a part.
    pub fn analyze_groups(
        &self,
        groups: &[FeatureGroup],
        all_features: &[GeometryFeature],
    ) -> Result<PartAccessibility> {
        let verdicts = groups
            .iter()
            .map(|g| {
                Ok(GroupVerdict {
                    group_id: g.id.clone(),
                    verdict: self.analyze(g.kind, &g.faces, all_features)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PartAccessibility::from_groups(verdicts))
    }

    fn analyze_pocket(
        &self,
        kind: FeatureKind,
        faces: &[GeometryFeature],
    ) -> Result<AccessibilityVerdict> {
        let limits = self.limits;

        let mut min_internal_radius: Option<f64> = None;
        let mut max_depth = 0.0f64;
        for face in faces {
            check_extent(face)?;
            if face.is_internal_corner() {
                let r = face.radius.unwrap_or(0.0);
                if !r.is_finite() || r < 0.0 {
                    return Err(ToolError::InvalidDimension {
                        kind: face.kind,
                        field: "radius",
                        value: r,
                    });
                }
                min_internal_radius = Some(min_internal_radius.map_or(r, |m| m.min(r)));
            }
            max_depth = max_depth.max(face.depth());
        }

        let (min_d, max_d) = match min_internal_radius {
            Some(r) => (
                limits.constrained_min_tool_diameter,
                r * 2.0 * limits.corner_clearance_factor,
            ),
            None => (
                limits.default_min_tool_diameter,
                limits.default_max_tool_diameter,
            ),
        };
        let corner_limit = min_internal_radius.unwrap_or(f64::INFINITY);

        let mut candidates: Vec<&ToolSpec> = self
            .catalog
            .milling_tools()
            .filter(|t| {
                let d = t.tool.diameter();
                d >= min_d
                    && d <= max_d
                    && t.tool.reach() >= max_depth
                    && t.tool.min_corner_radius() <= corner_limit
            })
            .collect();
        // Largest first: the stiffest tool that fits.
        candidates.sort_by(|a, b| b.tool.diameter().total_cmp(&a.tool.diameter()));

        let limiting_factor = if !candidates.is_empty() {
            LimitingFactor::None
        } else if corner_limit < limits.tight_corner_radius {
            LimitingFactor::CornerTooTight
        } else if max_depth > limits.deep_pocket_depth {
            LimitingFactor::TooDeep
        } else {
            LimitingFactor::NoSuitableTool
        };

        tracing::debug!(
            min_internal_radius = ?min_internal_radius,
            max_depth,
            candidates = candidates.len(),
            limiting_factor = %limiting_factor,
            "pocket analyzed"
        );

        Ok(AccessibilityVerdict {
            feature_kind: kind,
            accessible: !candidates.is_empty(),
            limiting_factor,
            recommended_tools: candidates.iter().map(|t| t.id.clone()).collect(),
            min_tool_diameter: Some(min_d),
            max_tool_diameter: Some(max_d),
            max_depth: Some(max_depth),
            min_internal_radius,
            pilot_required: false,
            recommended_operation: None,
        })
    }

    fn analyze_bore(&self, face: &GeometryFeature) -> Result<AccessibilityVerdict> {
        let limits = self.limits;
        check_extent(face)?;

        let diameter = face
            .diameter
            .or(face.radius.map(|r| r * 2.0))
            .ok_or(ToolError::MissingDimension {
                kind: face.kind,
                field: "diameter",
            })?;
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(ToolError::InvalidDimension {
                kind: face.kind,
                field: "diameter",
                value: diameter,
            });
        }
        let depth = face.depth();

        let mut matches: Vec<&ToolSpec> = self
            .catalog
            .drills()
            .filter(|t| {
                (t.tool.diameter() - diameter).abs() <= limits.drill_diameter_tolerance
                    && t.tool.reach() >= depth
            })
            .collect();
        // Closest diameter first.
        matches.sort_by(|a, b| {
            let da = (a.tool.diameter() - diameter).abs();
            let db = (b.tool.diameter() - diameter).abs();
            da.total_cmp(&db)
        });

        let pilot_required = diameter > limits.pilot_threshold_diameter;
        let operation = if pilot_required {
            HoleOperation::Boring
        } else {
            HoleOperation::Drilling
        };
        let accessible = !matches.is_empty() || pilot_required;

        let recommended_tools: Vec<String> = if matches.is_empty() && pilot_required {
            limits.boring_fallback_tools.clone()
        } else {
            matches.iter().map(|t| t.id.clone()).collect()
        };

        let limiting_factor = if accessible {
            LimitingFactor::None
        } else {
            LimitingFactor::NoMatchingDrill
        };

        tracing::debug!(
            diameter,
            depth,
            matching_drills = matches.len(),
            pilot_required,
            limiting_factor = %limiting_factor,
            "bore analyzed"
        );

        Ok(AccessibilityVerdict {
            feature_kind: FeatureKind::Bore,
            accessible,
            limiting_factor,
            recommended_tools,
            min_tool_diameter: Some((diameter - limits.drill_diameter_tolerance).max(0.0)),
            max_tool_diameter: Some(diameter + limits.drill_diameter_tolerance),
            max_depth: Some(depth),
            min_internal_radius: None,
            pilot_required,
            recommended_operation: Some(operation),
        })
    }
}

fn check_extent(face: &GeometryFeature) -> Result<()> {
    for (field, value) in [("z_min", face.z_min), ("z_max", face.z_max)] {
        if !value.is_finite() {
            return Err(ToolError::InvalidDimension {
                kind: face.kind,
                field,
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pocket_faces(corner_radius: Option<f64>, depth: f64) -> Vec<GeometryFeature> {
        let mut faces = vec![
            GeometryFeature::new(FeatureKind::PocketWall).with_z_range(-depth, 0.0),
            GeometryFeature::new(FeatureKind::PocketBottom).with_z_range(-depth, -depth),
        ];
        if let Some(r) = corner_radius {
            faces.push(
                GeometryFeature::new(FeatureKind::Toroidal)
                    .with_radius(r)
                    .with_z_range(-depth, 0.0)
                    .inner(),
            );
        }
        faces
    }

    fn bore(diameter: f64, depth: f64) -> Vec<GeometryFeature> {
        vec![GeometryFeature::new(FeatureKind::Bore)
            .with_diameter(diameter)
            .with_z_range(-depth, 0.0)
            .inner()]
    }

    fn with_analyzer<T>(f: impl FnOnce(AccessibilityAnalyzer<'_>) -> T) -> T {
        let catalog = ToolCatalog::standard();
        let limits = AccessibilityLimits::default();
        f(AccessibilityAnalyzer::new(&catalog, &limits))
    }

    #[test]
    fn test_tight_corner() {
        let faces = pocket_faces(Some(1.0), 20.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::PocketWall, &faces, &faces)).unwrap();
        assert!(!v.accessible);
        assert_eq!(v.limiting_factor, LimitingFactor::CornerTooTight);
        assert!(v.recommended_tools.is_empty());
        assert_eq!(v.min_internal_radius, Some(1.0));
        assert_relative_eq!(v.max_tool_diameter.unwrap(), 1.8);
        assert_relative_eq!(v.min_tool_diameter.unwrap(), 2.0);
        assert_relative_eq!(v.max_depth.unwrap(), 20.0);
    }

    #[test]
    fn test_open_pocket_uses_default_bounds() {
        let faces = pocket_faces(None, 20.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::PocketBottom, &faces, &faces)).unwrap();
        assert!(v.accessible);
        assert_eq!(v.limiting_factor, LimitingFactor::None);
        assert_eq!(v.min_tool_diameter, Some(4.0));
        assert_eq!(v.max_tool_diameter, Some(16.0));
        assert!(v.min_internal_radius.is_none());
        // Reach >= 20mm and 4..=16mm diameter, largest first.
        assert_eq!(v.recommended_tools, vec!["EM_16", "EM_12", "EM_10", "EM_8", "EM_6"]);
    }

    #[test]
    fn test_corner_caps_tool_diameter() {
        // R5 corner: max diameter 9mm, min corner radius <= 5.
        let faces = pocket_faces(Some(5.0), 10.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::PocketWall, &faces, &faces)).unwrap();
        assert!(v.accessible);
        assert_relative_eq!(v.max_tool_diameter.unwrap(), 9.0);
        assert_eq!(v.recommended_tools, vec!["EM_8", "EM_6", "EM_4", "EM_3"]);
    }

    #[test]
    fn test_tightest_corner_wins() {
        let mut faces = pocket_faces(Some(5.0), 10.0);
        faces.push(
            GeometryFeature::new(FeatureKind::Toroidal)
                .with_radius(2.5)
                .inner(),
        );
        // Outer fillets do not constrain the cutter.
        faces.push(GeometryFeature::new(FeatureKind::Toroidal).with_radius(0.2));
        let v = with_analyzer(|a| a.analyze(FeatureKind::PocketWall, &faces, &faces)).unwrap();
        assert_eq!(v.min_internal_radius, Some(2.5));
        assert_relative_eq!(v.max_tool_diameter.unwrap(), 4.5);
        assert_eq!(v.recommended_tools, vec!["EM_4", "EM_3"]);
    }

    #[test]
    fn test_too_deep() {
        let faces = pocket_faces(None, 120.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::PocketWall, &faces, &faces)).unwrap();
        assert!(!v.accessible);
        assert_eq!(v.limiting_factor, LimitingFactor::TooDeep);
    }

    #[test]
    fn test_no_suitable_tool() {
        // Deeper than any 4..=16mm end mill reaches, but under the deep limit.
        let faces = pocket_faces(None, 80.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::PocketWall, &faces, &faces)).unwrap();
        assert!(!v.accessible);
        assert_eq!(v.limiting_factor, LimitingFactor::NoSuitableTool);
    }

    #[test]
    fn test_empty_pocket_is_no_faces() {
        for kind in [FeatureKind::PocketWall, FeatureKind::PocketBottom, FeatureKind::Bore] {
            let v = with_analyzer(|a| a.analyze(kind, &[], &[])).unwrap();
            assert!(!v.accessible);
            assert_eq!(v.limiting_factor, LimitingFactor::NoFaces);
        }
    }

    #[test]
    fn test_bore_matching_drill() {
        let faces = bore(10.0, 40.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        assert!(v.accessible);
        assert!(!v.pilot_required);
        assert_eq!(v.recommended_operation, Some(HoleOperation::Drilling));
        assert_eq!(v.recommended_tools, vec!["DRILL_10"]);
        assert_eq!(v.limiting_factor, LimitingFactor::None);
    }

    #[test]
    fn test_bore_tolerance_is_inclusive() {
        let faces = bore(10.5, 20.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        assert_eq!(v.recommended_tools, vec!["DRILL_10"]);

        let faces = bore(5.5, 20.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        assert_eq!(v.recommended_tools, vec!["DRILL_5", "DRILL_6"]);
    }

    #[test]
    fn test_wide_bore_needs_boring() {
        let faces = bore(20.0, 30.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        assert!(v.accessible);
        assert!(v.pilot_required);
        assert_eq!(v.recommended_operation, Some(HoleOperation::Boring));
        assert_eq!(v.recommended_tools, vec!["DRILL_12", "BORING_BAR"]);
    }

    #[test]
    fn test_bore_just_over_pilot_threshold_keeps_drill_match() {
        let faces = bore(12.4, 30.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        assert!(v.pilot_required);
        assert_eq!(v.recommended_operation, Some(HoleOperation::Boring));
        assert_eq!(v.recommended_tools, vec!["DRILL_12"]);
    }

    #[test]
    fn test_bore_without_drill() {
        // 7mm is 1mm from both DRILL_6 and DRILL_8.
        let faces = bore(7.0, 20.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        assert!(!v.accessible);
        assert_eq!(v.limiting_factor, LimitingFactor::NoMatchingDrill);

        // Right diameter, too deep for the drill.
        let faces = bore(3.0, 45.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        assert!(!v.accessible);
        assert_eq!(v.limiting_factor, LimitingFactor::NoMatchingDrill);
    }

    #[test]
    fn test_bore_uses_first_face() {
        let mut faces = bore(10.0, 40.0);
        faces.extend(bore(30.0, 10.0));
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        assert!(!v.pilot_required);
        assert_eq!(v.recommended_tools, vec!["DRILL_10"]);
    }

    #[test]
    fn test_bore_missing_diameter() {
        let faces = vec![GeometryFeature::new(FeatureKind::Bore).with_z_range(0.0, 10.0)];
        let err = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap_err();
        assert!(matches!(err, ToolError::MissingDimension { field: "diameter", .. }));
    }

    #[test]
    fn test_other_kinds_unconstrained() {
        let faces = vec![GeometryFeature::new(FeatureKind::Groove).with_diameter(30.0)];
        for kind in [FeatureKind::Groove, FeatureKind::Taper, FeatureKind::EndFace] {
            let v = with_analyzer(|a| a.analyze(kind, &faces, &faces)).unwrap();
            assert!(v.accessible);
            assert_eq!(v.limiting_factor, LimitingFactor::None);
            assert!(v.recommended_tools.is_empty());
        }
    }

    #[test]
    fn test_analyze_named() {
        let faces = bore(10.0, 40.0);
        let v = with_analyzer(|a| a.analyze_named("hole", &faces, &faces)).unwrap();
        assert!(v.accessible);
        let err = with_analyzer(|a| a.analyze_named("dovetail", &faces, &faces)).unwrap_err();
        assert!(matches!(err, ToolError::Geom(_)));
    }

    #[test]
    fn test_analyze_groups() {
        let pocket = pocket_faces(Some(1.0), 20.0);
        let hole = bore(10.0, 40.0);
        let all: Vec<GeometryFeature> = pocket.iter().chain(hole.iter()).cloned().collect();
        let groups = vec![
            FeatureGroup::new(FeatureKind::PocketWall, pocket).with_id("pocket-1"),
            FeatureGroup::new(FeatureKind::Bore, hole).with_id("hole-1"),
        ];
        let result = with_analyzer(|a| a.analyze_groups(&groups, &all)).unwrap();
        assert!(!result.all_accessible);
        let blocking: Vec<_> = result.blocking().collect();
        assert_eq!(blocking.len(), 1);
        assert_eq!(blocking[0].group_id.as_deref(), Some("pocket-1"));
    }

    #[test]
    fn test_custom_limits() {
        let catalog = ToolCatalog::standard();
        let limits = AccessibilityLimits {
            pilot_threshold_diameter: 8.0,
            ..Default::default()
        };
        let analyzer = AccessibilityAnalyzer::new(&catalog, &limits);
        let faces = bore(10.0, 40.0);
        let v = analyzer.analyze(FeatureKind::Bore, &faces, &faces).unwrap();
        assert!(v.pilot_required);
        assert_eq!(v.recommended_tools, vec!["DRILL_10"]);
    }

    #[test]
    fn test_verdict_serialization() {
        let faces = pocket_faces(Some(1.0), 20.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::PocketWall, &faces, &faces)).unwrap();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["limiting_factor"], "corner-too-tight");
        assert_eq!(json["feature_kind"], "pocket-wall");
        assert!(json.get("recommended_operation").is_none());

        let faces = bore(20.0, 30.0);
        let v = with_analyzer(|a| a.analyze(FeatureKind::Bore, &faces, &faces)).unwrap();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["recommended_operation"], "BORING");
        assert_eq!(json["pilot_required"], true);
    }
}
