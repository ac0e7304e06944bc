//! Colorway - procedural level extension for a color-matching platformer
//!
//! Core modules:
//! - `procgen`: Walkway analysis, tile/hazard synthesis and per-level assembly
//! - `scene`: Host scene queries and prototype resolution
//! - `duty`: Host-side duty cycles for timed platforms and beam traps
//! - `settings`: Data-driven generation settings

pub mod duty;
pub mod procgen;
pub mod scene;
pub mod settings;

pub use procgen::{LevelAssembler, LevelId, LevelPlan};
pub use scene::{HostScene, SceneSnapshot};
pub use settings::BuilderSettings;

use glam::{Mat3, Quat, Vec3};

/// Generation constants
pub mod consts {
    /// Spacing used when no consecutive tiles advance along the walkway
    pub const FALLBACK_SPACING: f32 = 3.0;
    /// Forward projections at or below this are treated as duplicates/noise
    pub const MIN_SPACING_PROJECTION: f32 = 0.1;
    /// Walkway displacement (squared) below which the direction is canonical forward
    pub const DEGENERATE_WALKWAY_SQ: f32 = 0.01;
    /// Facing vectors (squared) below which the canonical forward is used
    pub const DEGENERATE_FACING_SQ: f32 = 0.001;
    /// Cross products (squared) below which the canonical lateral axis is used
    pub const DEGENERATE_LATERAL_SQ: f32 = 1e-10;

    /// Upper bound on tiles appended past the authored walkway
    pub const MAX_EXTRA_TILES: usize = 256;

    /// Tiles within this height of the lowest tile belong to the ground walkway
    pub const GROUND_BAND_TOLERANCE: f32 = 1.0;
    /// Tiles closer than this along depth are ordered by their lateral coordinate
    pub const DEPTH_BAND_TOLERANCE: f32 = 0.5;
}

/// Drop the vertical component of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Normalized facing, canonical forward (+Z) when degenerate
#[inline]
pub fn facing_or_forward(dir: Vec3) -> Vec3 {
    if dir.length_squared() < consts::DEGENERATE_FACING_SQ {
        Vec3::Z
    } else {
        dir.normalize()
    }
}

/// Horizontal axis perpendicular to `forward` (up × forward), +X when degenerate
#[inline]
pub fn lateral_axis(forward: Vec3) -> Vec3 {
    let lateral = Vec3::Y.cross(forward);
    if lateral.length_squared() < consts::DEGENERATE_LATERAL_SQ {
        Vec3::X
    } else {
        lateral.normalize()
    }
}

/// Rotation whose local +Z looks along `forward` with +Y kept as close to up as possible
pub fn look_rotation(forward: Vec3) -> Quat {
    let z = facing_or_forward(forward);
    let x = lateral_axis(z);
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lateral_axis_of_depth_forward() {
        let lateral = lateral_axis(Vec3::Z);
        assert!((lateral - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_lateral_axis_degenerate_falls_back() {
        assert_eq!(lateral_axis(Vec3::Y), Vec3::X);
        assert_eq!(lateral_axis(Vec3::ZERO), Vec3::X);
    }

    #[test]
    fn test_facing_or_forward() {
        assert_eq!(facing_or_forward(Vec3::ZERO), Vec3::Z);
        let f = facing_or_forward(Vec3::new(3.0, 0.0, 0.0));
        assert!((f - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_look_rotation_maps_z_to_forward() {
        let forward = Vec3::new(1.0, 0.0, 1.0).normalize();
        let rotated = look_rotation(forward) * Vec3::Z;
        assert!((rotated - forward).length() < 1e-4);

        let identity = look_rotation(Vec3::Z) * Vec3::Z;
        assert!((identity - Vec3::Z).length() < 1e-5);
    }
}
