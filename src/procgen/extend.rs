//! Tile synthesis along the walkway
//!
//! New tiles continue the walkway past its last tile, run in strips beside it,
//! or decorate the sides of a test-track node. Elevation comes from the
//! prototype; callers add height bumps and timing afterwards.

use glam::Vec3;

use super::issue::{GenerationIssue, PrototypeKind, report};
use super::pattern::sequence;
use super::plan::{TilePlacement, TileTag, TimingDescriptor};
use super::test_path::PathNode;
use super::walkway::WalkwayMeta;
use crate::consts::MAX_EXTRA_TILES;
use crate::scene::Prototypes;
use crate::{facing_or_forward, lateral_axis};

/// A row of tiles running parallel to the walkway
#[derive(Debug, Clone, Copy)]
pub struct SideStrip<'a> {
    /// Forward distance of the first tile from the walkway start
    pub start_distance: f32,
    pub count: usize,
    /// Signed offset along the walkway's lateral axis
    pub lateral_offset: f32,
    /// Empty palette falls back to the canonical color order
    pub palette: &'a [TileTag],
    /// Label prefix
    pub prefix: &'a str,
}

/// A single tile beside a test-track node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorTile {
    /// Lateral offset in units of walkway spacing
    pub lateral_units: f32,
    pub height: f32,
    pub tag: TileTag,
    pub timing: Option<TimingDescriptor>,
}

impl DecorTile {
    pub const fn new(lateral_units: f32, height: f32, tag: TileTag) -> Self {
        Self {
            lateral_units,
            height,
            tag,
            timing: None,
        }
    }

    pub const fn timed(mut self, visible: f32, hidden: f32) -> Self {
        self.timing = Some(TimingDescriptor::new(visible, hidden));
        self
    }
}

/// Append `count` tiles past the walkway end, colored by cycling `pattern`
///
/// Tile `i` sits `spacing * (i + 1)` beyond the last authored tile. A tag
/// without a prototype leaves a gap at its index. At most
/// [`MAX_EXTRA_TILES`] tiles are appended.
pub fn extend_walkway(
    meta: &WalkwayMeta,
    pattern: &[TileTag],
    count: usize,
    prototypes: &Prototypes,
    issues: &mut Vec<GenerationIssue>,
) -> Vec<TilePlacement> {
    if pattern.is_empty() && count > 0 {
        log::warn!("[procgen] empty extension pattern, {count} tiles not placed");
        return Vec::new();
    }
    let count = count.min(MAX_EXTRA_TILES);

    let base = meta.point_at(meta.total_length);
    let mut created = Vec::with_capacity(count);

    for (i, tag) in sequence(pattern, count).into_iter().enumerate() {
        let Some(prototype) = prototypes.tile(tag) else {
            report(issues, GenerationIssue::MissingPrototype(PrototypeKind::Tile(tag)));
            continue;
        };

        let mut position = base + meta.direction * (meta.spacing * (i + 1) as f32);
        position.y = prototype.position.y;

        created.push(TilePlacement {
            position,
            forward: facing_or_forward(prototype.facing),
            tag,
            timing: None,
            label: format!("{}_dynamic_{}", prototype.name, i),
        });
    }

    created
}

/// Lay a strip of tiles beside the walkway
pub fn spawn_side_tiles(
    meta: &WalkwayMeta,
    strip: &SideStrip<'_>,
    prototypes: &Prototypes,
    issues: &mut Vec<GenerationIssue>,
) -> Vec<TilePlacement> {
    let palette = if strip.palette.is_empty() {
        &TileTag::ALL[..]
    } else {
        strip.palette
    };
    let lateral = meta.lateral();
    let mut created = Vec::with_capacity(strip.count);

    for (i, tag) in sequence(palette, strip.count).into_iter().enumerate() {
        let Some(prototype) = prototypes.tile(tag) else {
            report(issues, GenerationIssue::MissingPrototype(PrototypeKind::Tile(tag)));
            continue;
        };

        let distance = (strip.start_distance + meta.spacing * i as f32).max(0.0);
        let mut position = meta.point_at(distance) + lateral * strip.lateral_offset;
        position.y = prototype.position.y;

        created.push(TilePlacement {
            position,
            forward: facing_or_forward(prototype.facing),
            tag,
            timing: None,
            label: format!("{}_{}_{}", prototype.name, strip.prefix, i),
        });
    }

    created
}

/// Place a decorative tile to the side of (and above/below) a path node
pub fn decor_tile_near(
    node: &PathNode,
    spacing: f32,
    decor: &DecorTile,
    prototypes: &Prototypes,
    issues: &mut Vec<GenerationIssue>,
) -> Option<TilePlacement> {
    let Some(prototype) = prototypes.tile(decor.tag) else {
        report(
            issues,
            GenerationIssue::MissingPrototype(PrototypeKind::Tile(decor.tag)),
        );
        return None;
    };

    let forward = facing_or_forward(node.forward);
    let lateral = lateral_axis(forward);

    Some(TilePlacement {
        position: node.position
            + lateral * (spacing * decor.lateral_units)
            + Vec3::Y * decor.height,
        forward,
        tag: decor.tag,
        timing: decor.timing,
        label: format!("{}_testDecor", prototype.name),
    })
}
