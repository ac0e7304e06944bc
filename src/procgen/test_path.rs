//! Hand-authored test track
//!
//! The densest level replaces the straight walkway with a weaving, undulating
//! path. Its shape is a fixed table of steps scaled by the walkway spacing and
//! rotated into the walkway's frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::plan::{TileTag, TimingDescriptor};
use crate::consts::DEGENERATE_FACING_SQ;
use TileTag::{Blue, Pink, Yellow};

/// One step of the track script
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStep {
    /// Advance along the walkway direction, in spacing units
    pub forward_units: f32,
    /// Drift along the lateral axis, in spacing units
    pub lateral_units: f32,
    /// Absolute height change
    pub height: f32,
    pub tag: TileTag,
    pub timing: Option<TimingDescriptor>,
}

const fn step(forward_units: f32, lateral_units: f32, height: f32, tag: TileTag) -> PathStep {
    PathStep {
        forward_units,
        lateral_units,
        height,
        tag,
        timing: None,
    }
}

const fn timed(
    forward_units: f32,
    lateral_units: f32,
    height: f32,
    tag: TileTag,
    visible: f32,
    hidden: f32,
) -> PathStep {
    PathStep {
        forward_units,
        lateral_units,
        height,
        tag,
        timing: Some(TimingDescriptor::new(visible, hidden)),
    }
}

/// Test track layout; the first entry is the origin tile
pub const TEST_PATH_SCRIPT: [PathStep; 24] = [
    step(0.0, 0.0, 0.0, Pink),
    // Warm-up straight
    step(1.0, 0.0, 0.0, Yellow),
    step(1.0, 0.0, 0.0, Blue),
    step(1.0, 0.0, 0.0, Pink),
    step(1.0, 0.0, 0.0, Yellow),
    // Climb to the right
    timed(0.8, 0.6, 0.35, Blue, 2.6, 1.2),
    step(0.7, 0.6, 0.25, Pink),
    timed(0.7, 0.6, 0.2, Yellow, 2.2, 1.0),
    // Swing back left
    step(0.9, 0.1, 0.2, Blue),
    step(0.8, -0.6, -0.05, Pink),
    step(0.8, -0.6, -0.05, Yellow),
    timed(0.8, -0.5, -0.05, Blue, 2.0, 0.9),
    // Zig-zag
    step(0.6, 0.9, 0.35, Pink),
    step(0.6, 0.8, 0.0, Yellow),
    timed(0.6, -1.4, -0.4, Blue, 1.8, 0.8),
    // Rise
    step(1.0, -0.2, 0.2, Pink),
    timed(1.0, 0.0, 0.45, Yellow, 2.3, 0.95),
    step(0.8, 0.4, 0.35, Blue),
    // Drop
    step(0.8, -0.6, -0.2, Pink),
    step(0.8, -0.5, -0.2, Yellow),
    // Final approach
    timed(1.2, 0.2, 0.6, Blue, 2.1, 0.9),
    step(0.9, 0.6, 0.1, Pink),
    step(0.9, 0.6, -0.15, Yellow),
    step(0.7, 0.0, 0.35, Blue),
];

/// A materialized track tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub position: Vec3,
    /// Unit direction toward the next node
    pub forward: Vec3,
    #[serde(default)]
    pub timing: Option<TimingDescriptor>,
    pub tag: TileTag,
}

/// Materialize [`TEST_PATH_SCRIPT`] from `start`
pub fn generate_test_path(start: Vec3, forward: Vec3, right: Vec3, spacing: f32) -> Vec<PathNode> {
    generate_path(&TEST_PATH_SCRIPT, start, forward, right, spacing)
}

/// Walk a step script, then orient every node toward its successor
pub fn generate_path(
    script: &[PathStep],
    start: Vec3,
    forward: Vec3,
    right: Vec3,
    spacing: f32,
) -> Vec<PathNode> {
    let mut current = start;
    let mut nodes: Vec<PathNode> = script
        .iter()
        .map(|s| {
            current += forward * (spacing * s.forward_units)
                + right * (spacing * s.lateral_units)
                + Vec3::Y * s.height;
            PathNode {
                position: current,
                forward,
                timing: s.timing,
                tag: s.tag,
            }
        })
        .collect();

    // Directions depend on neighbours, so this runs once all positions are final
    let count = nodes.len();
    for i in 0..count {
        let direction = if i + 1 < count {
            (nodes[i + 1].position - nodes[i].position).normalize_or_zero()
        } else if i > 0 {
            (nodes[i].position - nodes[i - 1].position).normalize_or_zero()
        } else {
            forward
        };
        nodes[i].forward = if direction.length_squared() < DEGENERATE_FACING_SQ {
            forward
        } else {
            direction
        };
    }

    nodes
}
