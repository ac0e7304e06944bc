//! Procedural level generation
//!
//! Reads the authored walkway and prototypes, then produces a [`LevelPlan`]:
//! - Pure and deterministic: same scene and settings, same plan
//! - No live entities; the host applies the plan through [`PlanSink`]
//! - Soft failures are recorded as [`GenerationIssue`]s, never panics

pub mod assemble;
pub mod extend;
pub mod hazard;
pub mod issue;
pub mod pattern;
pub mod plan;
pub mod test_path;
pub mod walkway;

pub use assemble::{LevelAssembler, LevelId};
pub use extend::{DecorTile, SideStrip, decor_tile_near, extend_walkway, spawn_side_tiles};
pub use hazard::{
    AlongBeam, CrossBeam, NodeSwinger, WalkwayBeam, along_beam, beam_along_walkway, cross_beam,
    swinging_near, swinging_on_walkway,
};
pub use issue::{GenerationIssue, GeometryContext, PrototypeKind};
pub use pattern::sequence;
pub use plan::{
    BaseTileAdjustment, BeamCycle, GoalRelocation, HazardKind, HazardSpec, LevelPlan,
    PlacementCommand, PlanSink, TilePlacement, TileTag, TimingDescriptor,
};
pub use test_path::{PathNode, PathStep, TEST_PATH_SCRIPT, generate_path, generate_test_path};
pub use walkway::{WalkwayMeta, analyze_walkway, order_ground_tiles};
