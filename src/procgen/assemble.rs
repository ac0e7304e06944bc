//! Per-level assembly
//!
//! Each recognized level gets its own decoration, extension and hazard layout
//! on top of the authored walkway, then the goal marker moves to the new end.
//! Unrecognized levels are left exactly as authored.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::extend::{DecorTile, SideStrip, decor_tile_near, extend_walkway, spawn_side_tiles};
use super::hazard::{
    AlongBeam, CrossBeam, NodeSwinger, WalkwayBeam, along_beam, beam_along_walkway, cross_beam,
    swinging_near, swinging_on_walkway,
};
use super::issue::{GenerationIssue, GeometryContext, PrototypeKind, report};
use super::pattern::sequence;
use super::plan::{
    BaseTileAdjustment, BeamCycle, GoalRelocation, HazardSpec, LevelPlan, TilePlacement, TileTag,
    TimingDescriptor,
};
use super::test_path::generate_test_path;
use super::walkway::{WalkwayMeta, analyze_walkway};
use crate::scene::{HostScene, Prototypes, TaggedObject, ground_walkway};
use crate::settings::BuilderSettings;
use crate::{facing_or_forward, horizontal, lateral_axis};

use TileTag::{Blue, Pink, Yellow};

/// Level identifiers the assembler knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    /// Moderate extension
    Level3,
    /// Longer extension with rising, blinking tiles
    Level4,
    /// Dense hand-authored track replacing the walkway
    TestTrack,
    /// Left as authored
    Unrecognized,
}

impl LevelId {
    /// Map a host scene name (case-insensitive)
    pub fn from_scene_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "lvl3" => LevelId::Level3,
            "lvl4" => LevelId::Level4,
            "test" => LevelId::TestTrack,
            _ => LevelId::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelId::Level3 => "lvl3",
            LevelId::Level4 => "lvl4",
            LevelId::TestTrack => "test",
            LevelId::Unrecognized => "unrecognized",
        }
    }

    /// Authored ground tiles required before anything is generated
    pub fn min_base_tiles(&self) -> usize {
        match self {
            LevelId::Level3 | LevelId::Level4 => 2,
            LevelId::TestTrack => 1,
            LevelId::Unrecognized => 0,
        }
    }

    /// Height of the goal marker above the final tile
    pub fn goal_lift(&self) -> f32 {
        match self {
            LevelId::Level3 => 0.45,
            LevelId::Level4 => 0.6,
            LevelId::TestTrack => 0.75,
            LevelId::Unrecognized => 0.0,
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a [`LevelPlan`] per level from the host scene
#[derive(Debug, Clone, Default)]
pub struct LevelAssembler {
    settings: BuilderSettings,
}

impl LevelAssembler {
    pub fn new(settings: BuilderSettings) -> Self {
        Self {
            settings: settings.clamped(),
        }
    }

    pub fn settings(&self) -> &BuilderSettings {
        &self.settings
    }

    /// Build the plan for the scene's own name
    pub fn build_for_scene<S: HostScene + ?Sized>(&self, scene_name: &str, scene: &S) -> LevelPlan {
        self.build(LevelId::from_scene_name(scene_name), scene)
    }

    pub fn build<S: HostScene + ?Sized>(&self, level: LevelId, scene: &S) -> LevelPlan {
        let mut plan = LevelPlan::untouched(level);
        if level == LevelId::Unrecognized {
            log::info!("No generation for unrecognized level");
            return plan;
        }

        let prototypes = Prototypes::resolve(scene);
        let walkway = ground_walkway(scene);
        let positions: Vec<Vec3> = walkway.iter().map(|t| t.object.position).collect();

        let meta = match analyze_walkway(&positions) {
            Some(meta) if walkway.len() >= level.min_base_tiles() => meta,
            _ => {
                report(
                    &mut plan.issues,
                    GenerationIssue::InsufficientBaseTiles {
                        level,
                        required: level.min_base_tiles(),
                        found: walkway.len(),
                    },
                );
                return plan;
            }
        };
        if meta.direction_fallback {
            report(
                &mut plan.issues,
                GenerationIssue::DegenerateGeometry(GeometryContext::WalkwayDirection),
            );
        }

        log::info!(
            "Building {}: {} base tiles, spacing={:.2}, length={:.2}",
            level,
            walkway.len(),
            meta.spacing,
            meta.total_length
        );

        let mut build = Build {
            meta,
            walkway: &walkway,
            prototypes: &prototypes,
            plan,
        };
        match level {
            LevelId::Level3 => build.level3(self.settings.level3_extra_tiles),
            LevelId::Level4 => build.level4(self.settings.level4_extra_tiles),
            LevelId::TestTrack => build.test_track(),
            LevelId::Unrecognized => {}
        }

        let plan = build.plan;
        log::info!(
            "{}: {} tiles, {} hazards, {} base adjustments, {} issues",
            level,
            plan.tiles().count(),
            plan.hazards().count(),
            plan.adjustments().count(),
            plan.issues.len()
        );
        plan
    }
}

/// Working state while one level is generated
struct Build<'a> {
    meta: WalkwayMeta,
    walkway: &'a [TaggedObject],
    prototypes: &'a Prototypes,
    plan: LevelPlan,
}

impl Build<'_> {
    fn level3(&mut self, extra_tiles: usize) {
        let meta = self.meta;
        let total = meta.total_length;

        // Decorate the authored walkway
        if self.walkway.len() >= 2 {
            self.adjust_base(1, 0.45, None);
        }
        if self.walkway.len() >= 3 {
            let timed_index = (self.walkway.len() - 2).min(3);
            self.adjust_base(timed_index, 0.0, Some(TimingDescriptor::new(2.2, 1.1)));
        }
        self.walkway_beam(total * 0.45, 1.7, 1.1, 4.2, BeamCycle::new(1.5, 1.2, 0.0));
        self.side_strip(total * 0.15, 4, -2.0, &[Pink, Yellow, Blue, Yellow], "lvl3_side");
        self.walkway_swinger(total * 0.55, 0.9);

        // Extend, lifting the final two tiles
        let pattern = [Yellow, Pink, Blue, Pink, Yellow, Blue];
        let mut appended = extend_walkway(
            &meta,
            &pattern,
            extra_tiles,
            self.prototypes,
            &mut self.plan.issues,
        );
        let lifted_from = appended.len().saturating_sub(2);
        for tile in &mut appended[lifted_from..] {
            tile.position.y += 0.65;
        }
        let last = appended.last().map(|t| t.position);
        let count = appended.len();
        self.push_tiles(appended);

        if count > 0 {
            self.side_strip(
                total + meta.spacing * 0.5,
                count.min(4),
                2.1,
                &[Blue, Pink, Yellow],
                "lvl3_ext",
            );

            let extended = total + count as f32 * meta.spacing;
            self.walkway_swinger(extended - meta.spacing * 0.4, 1.25);
            self.walkway_beam(
                extended - meta.spacing * 0.15,
                -1.6,
                1.2,
                4.8,
                BeamCycle::new(1.4, 1.1, 0.4),
            );
        }

        let target = last.unwrap_or_else(|| self.last_base_position());
        self.relocate_goal(target, meta.direction, LevelId::Level3.goal_lift());
    }

    fn level4(&mut self, extra_tiles: usize) {
        let meta = self.meta;
        let total = meta.total_length;

        // Decorate the authored walkway
        if self.walkway.len() >= 3 {
            self.adjust_base(2, 0.65, None);
            self.adjust_base(1, 0.0, Some(TimingDescriptor::new(1.9, 0.9)));
        }
        if self.walkway.len() >= 5 {
            self.adjust_base(4, 0.0, Some(TimingDescriptor::new(2.5, 1.2)));
        }
        self.walkway_beam(total * 0.3, 1.9, 1.2, 4.5, BeamCycle::new(1.1, 0.9, 0.0));
        self.walkway_beam(total * 0.6, -1.8, 1.4, 4.8, BeamCycle::new(0.9, 1.6, 0.4));
        self.walkway_swinger(total * 0.45, 1.2);
        self.side_strip(total * 0.25, 5, 2.7, &[Blue, Pink, Yellow, Blue, Pink], "lvl4_side");

        // Extend with a staircase of tiles, every other one blinking
        let pattern = sequence(&TileTag::ALL, extra_tiles);
        let mut appended = extend_walkway(
            &meta,
            &pattern,
            extra_tiles,
            self.prototypes,
            &mut self.plan.issues,
        );
        for (i, tile) in appended.iter_mut().enumerate() {
            if i % 2 == 1 {
                tile.timing = Some(TimingDescriptor::new(2.5, 1.4));
            }
            tile.position.y += 0.4 * (i + 1) as f32;
        }
        let last = appended.last().map(|t| t.position);
        let count = appended.len();
        self.push_tiles(appended);

        if count > 0 {
            self.side_strip(
                total + meta.spacing * 0.4,
                (count + 1).min(5),
                -2.6,
                &[Yellow, Pink, Blue],
                "lvl4_ext",
            );

            let extended = total + count as f32 * meta.spacing;
            self.walkway_beam(
                extended - meta.spacing * 0.35,
                2.2,
                1.5,
                5.5,
                BeamCycle::new(1.0, 0.9, 0.5),
            );
            self.walkway_swinger(extended - meta.spacing * 0.75, 1.8);
            self.walkway_swinger(extended - meta.spacing * 0.1, 2.2);
        }

        let target = last.unwrap_or_else(|| self.last_base_position());
        self.relocate_goal(target, meta.direction, LevelId::Level4.goal_lift());
    }

    fn test_track(&mut self) {
        let meta = self.meta;
        let spacing = meta.spacing;
        let forward = meta.direction;
        let right = lateral_axis(forward);

        let nodes = generate_test_path(meta.start, forward, right, spacing);
        let Some(last) = nodes.last().copied() else {
            log::warn!("[procgen] test track produced no nodes");
            return;
        };

        self.plan.hides_base_walkway = true;

        let mut created = 0;
        for node in &nodes {
            let Some(prototype) = self.prototypes.tile(node.tag) else {
                report(
                    &mut self.plan.issues,
                    GenerationIssue::MissingPrototype(PrototypeKind::Tile(node.tag)),
                );
                continue;
            };
            let label = format!("{}_test_{}", prototype.name, created);
            self.plan.push_tile(TilePlacement {
                position: node.position,
                forward: node.forward,
                tag: node.tag,
                timing: node.timing,
                label,
            });
            created += 1;
        }

        // Beam gates
        if let Some(node) = nodes.get(6) {
            let beam = CrossBeam {
                length: spacing * 4.2,
                height: 1.3,
                cycle: BeamCycle::new(1.4, 1.0, 0.25),
                invert: false,
            };
            self.plan.push_hazard(cross_beam(node, &beam));
        }
        if let Some(node) = nodes.get(12) {
            let beam = CrossBeam {
                length: spacing * 4.6,
                height: 1.6,
                cycle: BeamCycle::new(1.2, 0.8, 0.85),
                invert: true,
            };
            self.plan.push_hazard(cross_beam(node, &beam));
        }
        if let Some(node) = nodes.get(18) {
            let beam = AlongBeam {
                length: spacing * 3.5,
                back_offset: spacing * 0.6,
                height: 1.45,
                cycle: BeamCycle::new(0.9, 1.2, 0.4),
            };
            self.plan.push_hazard(along_beam(node, &beam));
        }

        // Swinging obstacles
        let swingers = [
            (
                8,
                NodeSwinger {
                    forward_units: 0.3,
                    lateral_units: 0.9,
                    height: 1.4,
                },
            ),
            (
                20,
                NodeSwinger {
                    forward_units: 0.0,
                    lateral_units: -1.1,
                    height: 1.8,
                },
            ),
        ];
        for (index, swinger) in swingers {
            if let Some(node) = nodes.get(index) {
                let hazard =
                    swinging_near(node, spacing, &swinger, self.prototypes, &mut self.plan.issues);
                self.push_hazard(hazard);
            }
        }

        // Side decoration
        let decor = [
            (4, DecorTile::new(1.6, 0.0, Blue)),
            (4, DecorTile::new(-1.6, 0.0, Pink)),
            (10, DecorTile::new(1.2, -0.25, Yellow)),
            (10, DecorTile::new(-1.2, -0.25, Blue).timed(2.2, 1.0)),
            (16, DecorTile::new(1.8, 0.15, Pink).timed(1.9, 0.8)),
            (16, DecorTile::new(-1.8, 0.15, Yellow)),
            (22, DecorTile::new(0.0, 0.6, Blue)),
            (22, DecorTile::new(1.2, 0.35, Pink)),
            (22, DecorTile::new(-1.2, 0.35, Yellow)),
        ];
        for (index, tile) in &decor {
            let Some(node) = nodes.get(*index) else {
                continue;
            };
            if let Some(placement) =
                decor_tile_near(node, spacing, tile, self.prototypes, &mut self.plan.issues)
            {
                self.plan.push_tile(placement);
            }
        }

        self.relocate_goal(last.position, last.forward, LevelId::TestTrack.goal_lift());
    }

    fn adjust_base(&mut self, index: usize, elevation: f32, timing: Option<TimingDescriptor>) {
        let Some(tile) = self.walkway.get(index) else {
            return;
        };
        self.plan.push_adjustment(BaseTileAdjustment {
            index,
            original_position: tile.object.position,
            elevation,
            timing,
        });
    }

    /// Last authored tile, including any height bump applied to it
    fn last_base_position(&self) -> Vec3 {
        let index = self.walkway.len() - 1;
        let lift: f32 = self
            .plan
            .adjustments()
            .filter(|a| a.index == index)
            .map(|a| a.elevation)
            .sum();
        self.walkway[index].object.position + Vec3::Y * lift
    }

    fn push_tiles(&mut self, tiles: Vec<TilePlacement>) {
        for tile in tiles {
            self.plan.push_tile(tile);
        }
    }

    fn push_hazard(&mut self, hazard: Option<HazardSpec>) {
        if let Some(hazard) = hazard {
            self.plan.push_hazard(hazard);
        }
    }

    fn walkway_beam(
        &mut self,
        distance: f32,
        side: f32,
        height: f32,
        length: f32,
        cycle: BeamCycle,
    ) {
        let beam = WalkwayBeam {
            distance,
            side,
            height,
            length,
            cycle,
        };
        self.plan.push_hazard(beam_along_walkway(&self.meta, &beam));
    }

    fn walkway_swinger(&mut self, distance: f32, height: f32) {
        let hazard = swinging_on_walkway(
            &self.meta,
            distance,
            height,
            self.prototypes,
            &mut self.plan.issues,
        );
        self.push_hazard(hazard);
    }

    fn side_strip(
        &mut self,
        start_distance: f32,
        count: usize,
        lateral_offset: f32,
        palette: &[TileTag],
        prefix: &str,
    ) {
        let strip = SideStrip {
            start_distance,
            count,
            lateral_offset,
            palette,
            prefix,
        };
        let tiles = spawn_side_tiles(&self.meta, &strip, self.prototypes, &mut self.plan.issues);
        self.push_tiles(tiles);
    }

    fn relocate_goal(&mut self, target: Vec3, forward: Vec3, lift: f32) {
        if self.prototypes.goal.is_none() {
            report(
                &mut self.plan.issues,
                GenerationIssue::MissingPrototype(PrototypeKind::GoalMarker),
            );
            return;
        }
        self.plan.goal = Some(GoalRelocation {
            position: target + Vec3::Y * lift,
            forward: facing_or_forward(horizontal(forward)),
        });
    }
}
