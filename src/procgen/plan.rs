//! Placement plan records
//!
//! Everything the generator decides for a level lives here. The host applies a
//! plan once, in order, through a [`PlanSink`].

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::assemble::LevelId;
use super::issue::GenerationIssue;
use crate::look_rotation;

/// Platform color category
///
/// The player has to stand on tiles matching their current color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileTag {
    #[serde(rename = "PlatformPink")]
    Pink,
    #[serde(rename = "PlatformYellow")]
    Yellow,
    #[serde(rename = "PlatformBlue")]
    Blue,
}

impl TileTag {
    /// Canonical palette order
    pub const ALL: [TileTag; 3] = [TileTag::Pink, TileTag::Yellow, TileTag::Blue];

    /// Host scene tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TileTag::Pink => "PlatformPink",
            TileTag::Yellow => "PlatformYellow",
            TileTag::Blue => "PlatformBlue",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "PlatformPink" => Some(TileTag::Pink),
            "PlatformYellow" => Some(TileTag::Yellow),
            "PlatformBlue" => Some(TileTag::Blue),
            _ => None,
        }
    }

    /// Index into [`TileTag::ALL`]
    pub fn index(&self) -> usize {
        match self {
            TileTag::Pink => 0,
            TileTag::Yellow => 1,
            TileTag::Blue => 2,
        }
    }

    /// A player of `player_color` landing on this tile has to respawn
    pub fn rejects(&self, player_color: TileTag) -> bool {
        *self != player_color
    }
}

/// Visible/hidden durations of a duty-cycled platform (seconds, both > 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingDescriptor {
    pub visible: f32,
    pub hidden: f32,
}

impl TimingDescriptor {
    pub const fn new(visible: f32, hidden: f32) -> Self {
        Self { visible, hidden }
    }
}

/// A new tile for the host to clone from the prototype of `tag`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    pub position: Vec3,
    /// Unit facing direction
    pub forward: Vec3,
    pub tag: TileTag,
    /// Turns the tile into an appearing/disappearing platform
    #[serde(default)]
    pub timing: Option<TimingDescriptor>,
    /// Entity name hint
    pub label: String,
}

impl TilePlacement {
    pub fn rotation(&self) -> Quat {
        look_rotation(self.forward)
    }
}

/// On/off cycle of a beam trap (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamCycle {
    pub on_duration: f32,
    pub off_duration: f32,
    /// Delay before the first cycle starts
    pub start_delay: f32,
}

impl Default for BeamCycle {
    fn default() -> Self {
        Self {
            on_duration: 1.5,
            off_duration: 1.0,
            start_delay: 0.0,
        }
    }
}

impl BeamCycle {
    pub fn new(on_duration: f32, off_duration: f32, start_delay: f32) -> Self {
        Self {
            on_duration,
            off_duration,
            start_delay: start_delay.max(0.0),
        }
    }
}

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Linear trap running `length` units along the hazard's forward axis,
    /// respawning the player on contact while active
    Beam { length: f32, cycle: BeamCycle },
    /// Clone of the swinging obstacle prototype; its motion belongs to the host
    Swinging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardSpec {
    pub kind: HazardKind,
    pub position: Vec3,
    pub forward: Vec3,
    pub label: String,
}

impl HazardSpec {
    pub fn rotation(&self) -> Quat {
        look_rotation(self.forward)
    }
}

/// Change applied to an authored walkway tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseTileAdjustment {
    /// Index into the ordered ground walkway
    pub index: usize,
    /// Position before the adjustment, for the host to identify the tile
    pub original_position: Vec3,
    /// Static height bump
    pub elevation: f32,
    #[serde(default)]
    pub timing: Option<TimingDescriptor>,
}

impl BaseTileAdjustment {
    pub fn adjusted_position(&self) -> Vec3 {
        self.original_position + Vec3::Y * self.elevation
    }
}

/// Final transform of the level's goal marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRelocation {
    pub position: Vec3,
    /// Horizontal unit facing
    pub forward: Vec3,
}

impl GoalRelocation {
    pub fn rotation(&self) -> Quat {
        look_rotation(self.forward)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlacementCommand {
    Tile(TilePlacement),
    Hazard(HazardSpec),
    AdjustBaseTile(BaseTileAdjustment),
}

/// Host-side adapter that materializes a plan
pub trait PlanSink {
    fn spawn_tile(&mut self, tile: &TilePlacement);
    fn spawn_hazard(&mut self, hazard: &HazardSpec);
    fn adjust_base_tile(&mut self, adjustment: &BaseTileAdjustment);
    fn hide_base_walkway(&mut self);
    fn relocate_goal(&mut self, goal: &GoalRelocation);
}

/// Ordered generation output for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPlan {
    pub level: LevelId,
    pub commands: Vec<PlacementCommand>,
    /// The authored walkway is replaced by the generated one
    #[serde(default)]
    pub hides_base_walkway: bool,
    pub goal: Option<GoalRelocation>,
    /// Soft failures recovered during generation
    #[serde(default)]
    pub issues: Vec<GenerationIssue>,
}

impl LevelPlan {
    /// Plan that leaves the authored level as-is
    pub fn untouched(level: LevelId) -> Self {
        Self {
            level,
            commands: Vec::new(),
            hides_base_walkway: false,
            goal: None,
            issues: Vec::new(),
        }
    }

    /// True when applying the plan changes nothing
    pub fn is_identity(&self) -> bool {
        self.commands.is_empty() && !self.hides_base_walkway && self.goal.is_none()
    }

    pub fn push_tile(&mut self, tile: TilePlacement) {
        log::debug!("tile {} at {:?}", tile.label, tile.position);
        self.commands.push(PlacementCommand::Tile(tile));
    }

    pub fn push_hazard(&mut self, hazard: HazardSpec) {
        log::debug!("hazard {} at {:?}", hazard.label, hazard.position);
        self.commands.push(PlacementCommand::Hazard(hazard));
    }

    pub fn push_adjustment(&mut self, adjustment: BaseTileAdjustment) {
        self.commands.push(PlacementCommand::AdjustBaseTile(adjustment));
    }

    pub fn tiles(&self) -> impl Iterator<Item = &TilePlacement> {
        self.commands.iter().filter_map(|c| match c {
            PlacementCommand::Tile(t) => Some(t),
            _ => None,
        })
    }

    pub fn hazards(&self) -> impl Iterator<Item = &HazardSpec> {
        self.commands.iter().filter_map(|c| match c {
            PlacementCommand::Hazard(h) => Some(h),
            _ => None,
        })
    }

    pub fn adjustments(&self) -> impl Iterator<Item = &BaseTileAdjustment> {
        self.commands.iter().filter_map(|c| match c {
            PlacementCommand::AdjustBaseTile(a) => Some(a),
            _ => None,
        })
    }

    /// Replay the plan into the host, in generation order
    pub fn apply<S: PlanSink>(&self, sink: &mut S) {
        if self.hides_base_walkway {
            sink.hide_base_walkway();
        }
        for command in &self.commands {
            match command {
                PlacementCommand::Tile(tile) => sink.spawn_tile(tile),
                PlacementCommand::Hazard(hazard) => sink.spawn_hazard(hazard),
                PlacementCommand::AdjustBaseTile(adjustment) => sink.adjust_base_tile(adjustment),
            }
        }
        if let Some(goal) = &self.goal {
            sink.relocate_goal(goal);
        }
    }
}
