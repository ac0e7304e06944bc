//! Hazard placement
//!
//! Beam traps are new entities and always placed. Swinging obstacles are
//! clones of a scene prototype and skipped when the scene has none.

use super::issue::{GenerationIssue, PrototypeKind, report};
use super::plan::{BeamCycle, HazardKind, HazardSpec};
use super::test_path::PathNode;
use super::walkway::WalkwayMeta;
use crate::scene::Prototypes;
use crate::{facing_or_forward, lateral_axis};

const BEAM_LABEL: &str = "BeamTrap_dynamic";

/// Beam placed relative to the walkway, running along it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkwayBeam {
    /// Forward distance from the walkway start
    pub distance: f32,
    /// Signed lateral offset
    pub side: f32,
    /// Height above the walkway start
    pub height: f32,
    pub length: f32,
    pub cycle: BeamCycle,
}

/// Beam crossing the track at a node, centered on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossBeam {
    pub length: f32,
    /// Height above the node
    pub height: f32,
    pub cycle: BeamCycle,
    /// Sweep from the node's right side instead of its left
    pub invert: bool,
}

/// Beam running along the track, starting behind a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlongBeam {
    pub length: f32,
    /// Distance behind the node where the beam starts
    pub back_offset: f32,
    pub height: f32,
    pub cycle: BeamCycle,
}

/// Swinging obstacle offset from a node, in units of walkway spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSwinger {
    pub forward_units: f32,
    pub lateral_units: f32,
    /// Height above the node
    pub height: f32,
}

pub fn beam_along_walkway(meta: &WalkwayMeta, beam: &WalkwayBeam) -> HazardSpec {
    let mut position = meta.point_at(beam.distance) + meta.lateral() * beam.side;
    position.y += beam.height;

    HazardSpec {
        kind: HazardKind::Beam {
            length: beam.length,
            cycle: beam.cycle,
        },
        position,
        forward: meta.direction,
        label: BEAM_LABEL.to_string(),
    }
}

pub fn cross_beam(node: &PathNode, beam: &CrossBeam) -> HazardSpec {
    let lateral = lateral_axis(node.forward);
    let axis = if beam.invert { -lateral } else { lateral };

    let mut origin = node.position - axis * (beam.length * 0.5);
    origin.y = node.position.y + beam.height;

    HazardSpec {
        kind: HazardKind::Beam {
            length: beam.length,
            cycle: beam.cycle,
        },
        position: origin,
        forward: axis,
        label: BEAM_LABEL.to_string(),
    }
}

pub fn along_beam(node: &PathNode, beam: &AlongBeam) -> HazardSpec {
    let axis = facing_or_forward(node.forward);

    let mut origin = node.position - axis * beam.back_offset;
    origin.y = node.position.y + beam.height;

    HazardSpec {
        kind: HazardKind::Beam {
            length: beam.length,
            cycle: beam.cycle,
        },
        position: origin,
        forward: axis,
        label: BEAM_LABEL.to_string(),
    }
}

/// Swinging obstacle on the walkway line, `height` above the prototype
pub fn swinging_on_walkway(
    meta: &WalkwayMeta,
    distance: f32,
    height: f32,
    prototypes: &Prototypes,
    issues: &mut Vec<GenerationIssue>,
) -> Option<HazardSpec> {
    let Some(prototype) = prototypes.swinging.as_ref() else {
        report(issues, GenerationIssue::MissingPrototype(PrototypeKind::SwingingObstacle));
        return None;
    };

    let mut position = meta.point_at(distance);
    position.y = prototype.position.y + height;

    Some(HazardSpec {
        kind: HazardKind::Swinging,
        position,
        forward: facing_or_forward(prototype.facing),
        label: format!("{}_dynamic", prototype.name),
    })
}

/// Swinging obstacle next to a test-track node
pub fn swinging_near(
    node: &PathNode,
    spacing: f32,
    swinger: &NodeSwinger,
    prototypes: &Prototypes,
    issues: &mut Vec<GenerationIssue>,
) -> Option<HazardSpec> {
    let Some(prototype) = prototypes.swinging.as_ref() else {
        report(issues, GenerationIssue::MissingPrototype(PrototypeKind::SwingingObstacle));
        return None;
    };

    let forward = facing_or_forward(node.forward);
    let lateral = lateral_axis(forward);

    let mut position = node.position
        + forward * (spacing * swinger.forward_units)
        + lateral * (spacing * swinger.lateral_units);
    position.y = node.position.y + swinger.height;

    Some(HazardSpec {
        kind: HazardKind::Swinging,
        position,
        forward: facing_or_forward(prototype.facing),
        label: format!("{}_test", prototype.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procgen::plan::TileTag;
    use crate::procgen::walkway::analyze_walkway;
    use crate::scene::SceneObject;
    use glam::Vec3;

    fn node_at(position: Vec3, forward: Vec3) -> PathNode {
        PathNode {
            position,
            forward,
            timing: None,
            tag: TileTag::Pink,
        }
    }

    fn with_swinger() -> Prototypes {
        Prototypes::default().with_swinging(Some(SceneObject::new(
            "Hammer",
            Vec3::new(0.0, 4.0, 0.0),
        )))
    }

    #[test]
    fn test_walkway_beam_transform() {
        let meta = analyze_walkway(&[Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 10.0)]).unwrap();
        let beam = WalkwayBeam {
            distance: 4.5,
            side: 1.7,
            height: 1.1,
            length: 4.2,
            cycle: BeamCycle::new(1.5, 1.2, 0.0),
        };
        let hazard = beam_along_walkway(&meta, &beam);

        assert!((hazard.position - Vec3::new(1.7, 2.1, 4.5)).length() < 1e-4);
        assert_eq!(hazard.forward, meta.direction);
        assert!(matches!(hazard.kind, HazardKind::Beam { length, .. } if length == 4.2));
    }

    #[test]
    fn test_cross_beam_centered_on_node() {
        let node = node_at(Vec3::new(0.0, 2.0, 5.0), Vec3::Z);
        let beam = CrossBeam {
            length: 4.0,
            height: 1.0,
            cycle: BeamCycle::new(1.4, 1.0, 0.25),
            invert: false,
        };
        let hazard = cross_beam(&node, &beam);
        assert!((hazard.position - Vec3::new(-2.0, 3.0, 5.0)).length() < 1e-4);
        assert!((hazard.forward - Vec3::X).length() < 1e-5);

        let inverted = cross_beam(&node, &CrossBeam { invert: true, ..beam });
        assert!((inverted.position - Vec3::new(2.0, 3.0, 5.0)).length() < 1e-4);
        assert!((inverted.forward + Vec3::X).length() < 1e-5);
        // Midpoint of the beam sits over the node in both cases
        let mid = inverted.position + inverted.forward * 2.0;
        assert!((mid - Vec3::new(0.0, 3.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn test_along_beam_starts_behind_node() {
        let node = node_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let beam = AlongBeam {
            length: 7.0,
            back_offset: 1.2,
            height: 1.45,
            cycle: BeamCycle::new(0.9, 1.2, 0.4),
        };
        let hazard = along_beam(&node, &beam);
        // Degenerate node facing falls back to +Z
        assert!((hazard.position - Vec3::new(0.0, 1.45, 3.8)).length() < 1e-4);
        assert_eq!(hazard.forward, Vec3::Z);
    }

    #[test]
    fn test_swinging_uses_prototype_height() {
        let meta = analyze_walkway(&[Vec3::ZERO, Vec3::new(0.0, 0.0, 6.0)]).unwrap();
        let mut issues = Vec::new();
        let hazard = swinging_on_walkway(&meta, 3.0, 0.9, &with_swinger(), &mut issues).unwrap();
        assert!((hazard.position - Vec3::new(0.0, 4.9, 3.0)).length() < 1e-4);
        assert_eq!(hazard.kind, HazardKind::Swinging);
        assert_eq!(hazard.label, "Hammer_dynamic");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_swinging_near_node() {
        let node = node_at(Vec3::new(0.0, 2.0, 5.0), Vec3::Z);
        let swinger = NodeSwinger {
            forward_units: 0.3,
            lateral_units: 0.9,
            height: 1.4,
        };
        let hazard = swinging_near(&node, 2.0, &swinger, &with_swinger(), &mut Vec::new()).unwrap();
        assert!((hazard.position - Vec3::new(1.8, 3.4, 5.6)).length() < 1e-4);
    }

    #[test]
    fn test_swinger_facing_is_normalized() {
        let mut hammer = SceneObject::new("Hammer", Vec3::new(0.0, 4.0, 0.0));
        hammer.facing = Vec3::new(-3.0, 0.0, 0.0);
        let prototypes = Prototypes::default().with_swinging(Some(hammer));
        let meta = analyze_walkway(&[Vec3::ZERO, Vec3::new(0.0, 0.0, 6.0)]).unwrap();

        let hazard = swinging_on_walkway(&meta, 3.0, 0.9, &prototypes, &mut Vec::new()).unwrap();
        assert!((hazard.forward - Vec3::NEG_X).length() < 1e-5);
        let swung = hazard.rotation() * Vec3::Z;
        assert!((swung - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_beam_rotation_points_along_beam() {
        let node = node_at(Vec3::new(0.0, 2.0, 5.0), Vec3::Z);
        let beam = CrossBeam {
            length: 4.0,
            height: 1.0,
            cycle: BeamCycle::default(),
            invert: false,
        };
        let hazard = cross_beam(&node, &beam);
        let end = hazard.position + hazard.rotation() * (Vec3::Z * 4.0);
        assert!((end - Vec3::new(2.0, 3.0, 5.0)).length() < 1e-4);
        match hazard.kind {
            HazardKind::Beam { cycle, .. } => {
                assert_eq!(cycle, BeamCycle::new(1.5, 1.0, 0.0));
            }
            HazardKind::Swinging => panic!("expected a beam"),
        }
    }

    #[test]
    fn test_missing_swinger_is_skipped() {
        let meta = analyze_walkway(&[Vec3::ZERO, Vec3::new(0.0, 0.0, 6.0)]).unwrap();
        let mut issues = Vec::new();
        let prototypes = Prototypes::default();
        assert!(swinging_on_walkway(&meta, 3.0, 0.9, &prototypes, &mut issues).is_none());
        assert_eq!(
            issues,
            vec![GenerationIssue::MissingPrototype(PrototypeKind::SwingingObstacle)]
        );
    }
}
