//! Host scene queries
//!
//! The generator never touches live entities. It reads tiles and prototypes
//! through [`HostScene`] and answers with a plan.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::procgen::TileTag;
use crate::procgen::walkway::order_ground_tiles;

fn default_facing() -> Vec3 {
    Vec3::Z
}

/// An object already present in the host scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub position: Vec3,
    /// Unit facing direction
    #[serde(default = "default_facing")]
    pub facing: Vec3,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            facing: Vec3::Z,
        }
    }
}

/// A colored tile in the host scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedObject {
    pub tag: TileTag,
    #[serde(flatten)]
    pub object: SceneObject,
}

/// Read access to the host scene
pub trait HostScene {
    /// All tiles carrying `tag`
    fn tiles(&self, tag: TileTag) -> Vec<SceneObject>;
    /// Swinging obstacles usable as prototypes
    fn swinging_obstacles(&self) -> Vec<SceneObject>;
    /// Goal marker candidates
    fn goal_markers(&self) -> Vec<SceneObject>;
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serializable scene description, used by the native adapter and tests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Scene name, doubles as the level identifier
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tiles: Vec<TaggedObject>,
    #[serde(default)]
    pub swinging_obstacles: Vec<SceneObject>,
    #[serde(default)]
    pub goal_markers: Vec<SceneObject>,
}

impl SceneSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&json)?;
        log::info!(
            "Loaded scene '{}' with {} tiles from {}",
            scene.name,
            scene.tiles.len(),
            path.display()
        );
        Ok(scene)
    }
}

impl HostScene for SceneSnapshot {
    fn tiles(&self, tag: TileTag) -> Vec<SceneObject> {
        self.tiles
            .iter()
            .filter(|t| t.tag == tag)
            .map(|t| t.object.clone())
            .collect()
    }

    fn swinging_obstacles(&self) -> Vec<SceneObject> {
        self.swinging_obstacles.clone()
    }

    fn goal_markers(&self) -> Vec<SceneObject> {
        self.goal_markers.clone()
    }
}

/// Prototypes the generator clones from
#[derive(Debug, Clone, Default)]
pub struct Prototypes {
    tiles: [Option<SceneObject>; 3],
    pub swinging: Option<SceneObject>,
    pub goal: Option<SceneObject>,
}

impl Prototypes {
    /// Pick the lowest tile of each color, the highest swinging obstacle and
    /// the first goal marker
    pub fn resolve<S: HostScene + ?Sized>(scene: &S) -> Self {
        let mut tiles: [Option<SceneObject>; 3] = Default::default();
        for tag in TileTag::ALL {
            tiles[tag.index()] = scene
                .tiles(tag)
                .into_iter()
                .reduce(|best, t| if t.position.y < best.position.y { t } else { best });
            if tiles[tag.index()].is_none() {
                log::debug!("no prototype for {}", tag.as_str());
            }
        }

        let swinging = scene
            .swinging_obstacles()
            .into_iter()
            .reduce(|best, t| if t.position.y > best.position.y { t } else { best });
        let goal = scene.goal_markers().into_iter().next();

        Self {
            tiles,
            swinging,
            goal,
        }
    }

    pub fn tile(&self, tag: TileTag) -> Option<&SceneObject> {
        self.tiles[tag.index()].as_ref()
    }

    pub fn with_tile(mut self, tag: TileTag, prototype: Option<SceneObject>) -> Self {
        self.tiles[tag.index()] = prototype;
        self
    }

    pub fn with_swinging(mut self, prototype: Option<SceneObject>) -> Self {
        self.swinging = prototype;
        self
    }
}

/// Ground tiles of every color, ordered along the walkway
pub fn ground_walkway<S: HostScene + ?Sized>(scene: &S) -> Vec<TaggedObject> {
    let tiles: Vec<TaggedObject> = TileTag::ALL
        .iter()
        .flat_map(|&tag| {
            scene
                .tiles(tag)
                .into_iter()
                .map(move |object| TaggedObject { tag, object })
        })
        .collect();
    order_ground_tiles(tiles, |t| t.object.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(tag: TileTag, x: f32, y: f32, z: f32) -> TaggedObject {
        TaggedObject {
            tag,
            object: SceneObject::new(tag.as_str(), Vec3::new(x, y, z)),
        }
    }

    #[test]
    fn test_resolve_picks_lowest_tile_and_highest_swinger() {
        let scene = SceneSnapshot {
            name: "lvl3".to_string(),
            tiles: vec![
                tile(TileTag::Pink, 0.0, 2.0, 0.0),
                tile(TileTag::Pink, 0.0, -1.0, 3.0),
                tile(TileTag::Blue, 0.0, 0.0, 6.0),
            ],
            swinging_obstacles: vec![
                SceneObject::new("Hammer_low", Vec3::new(0.0, 1.0, 0.0)),
                SceneObject::new("Hammer_high", Vec3::new(0.0, 5.0, 0.0)),
            ],
            goal_markers: vec![SceneObject::new("Win", Vec3::ZERO)],
        };
        let prototypes = Prototypes::resolve(&scene);

        assert_eq!(prototypes.tile(TileTag::Pink).unwrap().position.y, -1.0);
        assert!(prototypes.tile(TileTag::Yellow).is_none());
        assert_eq!(prototypes.swinging.as_ref().unwrap().name, "Hammer_high");
        assert_eq!(prototypes.goal.as_ref().unwrap().name, "Win");
    }

    #[test]
    fn test_ground_walkway_orders_across_colors() {
        let scene = SceneSnapshot {
            tiles: vec![
                tile(TileTag::Blue, 0.0, 0.0, 6.0),
                tile(TileTag::Pink, 0.0, 0.0, 0.0),
                tile(TileTag::Yellow, 0.0, 0.0, 3.0),
            ],
            ..Default::default()
        };
        let walkway = ground_walkway(&scene);
        let tags: Vec<TileTag> = walkway.iter().map(|t| t.tag).collect();
        assert_eq!(tags, vec![TileTag::Pink, TileTag::Yellow, TileTag::Blue]);
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "name": "lvl4",
            "tiles": [
                { "tag": "PlatformPink", "name": "p", "position": [0.0, 0.0, 0.0] },
                { "tag": "PlatformBlue", "name": "b", "position": [0.0, 0.0, 3.0], "facing": [1.0, 0.0, 0.0] }
            ],
            "goal_markers": [ { "name": "Win", "position": [0.0, 0.0, 9.0] } ]
        }"#;
        let scene = SceneSnapshot::from_json(json).unwrap();
        assert_eq!(scene.name, "lvl4");
        assert_eq!(scene.tiles.len(), 2);
        assert_eq!(scene.tiles[0].object.facing, Vec3::Z);
        assert_eq!(scene.tiles[1].object.facing, Vec3::X);
        assert!(scene.swinging_obstacles.is_empty());
    }

    #[test]
    fn test_snapshot_from_bad_json() {
        assert!(matches!(
            SceneSnapshot::from_json("{ not json"),
            Err(SceneError::Parse(_))
        ));
    }
}
