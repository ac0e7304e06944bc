//! Walkway inference
//!
//! The authored level is a straight-ish line of ground tiles. Everything the
//! generator places is expressed relative to that line: its start, horizontal
//! direction, average tile spacing and length.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{horizontal, lateral_axis};

/// Geometry of the authored walkway
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkwayMeta {
    /// Position of the first ground tile
    pub start: Vec3,
    /// Horizontal unit direction from first to last tile
    pub direction: Vec3,
    /// Mean forward distance between consecutive tiles
    pub spacing: f32,
    /// Forward distance from first to last tile
    pub total_length: f32,
    /// Direction could not be measured and defaulted to +Z
    #[serde(default)]
    pub direction_fallback: bool,
}

impl WalkwayMeta {
    /// Point `distance` units along the walkway from its start
    #[inline]
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.start + self.direction * distance
    }

    /// Horizontal axis to the walkway's side
    #[inline]
    pub fn lateral(&self) -> Vec3 {
        lateral_axis(self.direction)
    }

    /// Forward-projected distance of a point from the walkway start
    #[inline]
    pub fn distance_of(&self, point: Vec3) -> f32 {
        horizontal(point - self.start).dot(self.direction)
    }
}

/// Infer walkway geometry from tile positions ordered along the walkway
///
/// Returns `None` for an empty walkway.
pub fn analyze_walkway(positions: &[Vec3]) -> Option<WalkwayMeta> {
    let start = *positions.first()?;
    let end = *positions.last()?;

    let displacement = horizontal(end - start);
    let direction_fallback = displacement.length_squared() < DEGENERATE_WALKWAY_SQ;
    let direction = if direction_fallback {
        Vec3::Z
    } else {
        displacement.normalize()
    };

    let (sum, count) = positions
        .windows(2)
        .map(|pair| horizontal(pair[1] - pair[0]).dot(direction))
        .filter(|&projected| projected > MIN_SPACING_PROJECTION)
        .fold((0.0, 0usize), |(sum, count), projected| (sum + projected, count + 1));

    let spacing = if count > 0 {
        sum / count as f32
    } else {
        FALLBACK_SPACING
    };
    let total_length = (end - start).dot(direction);

    Some(WalkwayMeta {
        start,
        direction,
        spacing,
        total_length,
        direction_fallback,
    })
}

/// Keep the lowest band of tiles and order them along the walkway
///
/// Tiles within [`GROUND_BAND_TOLERANCE`] of the lowest tile are ground tiles.
/// They are ordered by depth (z); runs of tiles whose consecutive depths differ
/// by at most [`DEPTH_BAND_TOLERANCE`] form one row, ordered by x.
pub fn order_ground_tiles<T, F>(tiles: Vec<T>, position: F) -> Vec<T>
where
    F: Fn(&T) -> Vec3,
{
    let Some(min_y) = tiles.iter().map(|t| position(t).y).min_by(f32::total_cmp) else {
        return Vec::new();
    };

    let mut ground: Vec<T> = tiles
        .into_iter()
        .filter(|t| (position(t).y - min_y).abs() < GROUND_BAND_TOLERANCE)
        .collect();
    ground.sort_by(|a, b| position(a).z.total_cmp(&position(b).z));

    let mut ordered = Vec::with_capacity(ground.len());
    let mut row: Vec<T> = Vec::new();
    let mut last_z: Option<f32> = None;

    for tile in ground {
        let z = position(&tile).z;
        if last_z.is_some_and(|prev| z - prev > DEPTH_BAND_TOLERANCE) {
            flush_row(&mut row, &mut ordered, &position);
        }
        last_z = Some(z);
        row.push(tile);
    }
    flush_row(&mut row, &mut ordered, &position);

    ordered
}

fn flush_row<T, F>(row: &mut Vec<T>, ordered: &mut Vec<T>, position: &F)
where
    F: Fn(&T) -> Vec3,
{
    row.sort_by(|a, b| position(a).x.total_cmp(&position(b).x));
    ordered.append(row);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_tiles_along_depth() {
        let meta = analyze_walkway(&[Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0)]).unwrap();
        assert!((meta.spacing - 4.0).abs() < 1e-5);
        assert!((meta.direction - Vec3::Z).length() < 1e-5);
        assert!((meta.total_length - 4.0).abs() < 1e-5);
        assert!(!meta.direction_fallback);
    }

    #[test]
    fn test_empty_walkway() {
        assert!(analyze_walkway(&[]).is_none());
    }

    #[test]
    fn test_single_tile_uses_fallbacks() {
        let meta = analyze_walkway(&[Vec3::new(2.0, 1.0, 5.0)]).unwrap();
        assert_eq!(meta.direction, Vec3::Z);
        assert_eq!(meta.spacing, FALLBACK_SPACING);
        assert_eq!(meta.total_length, 0.0);
        assert!(meta.direction_fallback);
    }

    #[test]
    fn test_spacing_ignores_duplicates_and_backsteps() {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 2.05), // duplicate-ish, ignored
            Vec3::new(0.0, 0.0, 1.0),  // backstep, ignored
            Vec3::new(0.0, 0.0, 5.0),
        ];
        let meta = analyze_walkway(&positions).unwrap();
        // Valid projections: 2.0 and 4.0
        assert!((meta.spacing - 3.0).abs() < 1e-5);
        assert!((meta.total_length - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_direction_ignores_height() {
        let meta = analyze_walkway(&[Vec3::ZERO, Vec3::new(3.0, 2.0, 0.0)]).unwrap();
        assert!((meta.direction - Vec3::X).length() < 1e-5);
        assert!((meta.distance_of(Vec3::new(6.0, 9.0, 0.0)) - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_order_ground_tiles_drops_raised_tiles() {
        let tiles = vec![
            Vec3::new(0.0, 0.0, 6.0),
            Vec3::new(0.0, 3.0, 3.0), // platform above the walkway
            Vec3::new(0.0, 0.2, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        ];
        let ordered = order_ground_tiles(tiles, |p| *p);
        let depths: Vec<f32> = ordered.iter().map(|p| p.z).collect();
        assert_eq!(depths, vec![0.0, 3.0, 6.0]);
    }

    #[test]
    fn test_order_ground_tiles_rows_by_lateral() {
        let tiles = vec![
            Vec3::new(2.0, 0.0, 0.2),
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.1),
            Vec3::new(0.0, 0.0, 3.0),
        ];
        let ordered = order_ground_tiles(tiles, |p| *p);
        let lateral: Vec<f32> = ordered.iter().map(|p| p.x).collect();
        assert_eq!(lateral, vec![-2.0, 0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_order_ground_tiles_empty() {
        let ordered = order_ground_tiles(Vec::<Vec3>::new(), |p| *p);
        assert!(ordered.is_empty());
    }

    proptest! {
        #[test]
        fn prop_spacing_is_mean_of_positive_projections(
            depths in prop::collection::vec(-50.0f32..50.0, 1..12),
            drift in -0.4f32..0.4,
        ) {
            let positions: Vec<Vec3> = depths
                .iter()
                .enumerate()
                .map(|(i, &z)| Vec3::new(drift * i as f32, 0.0, z))
                .collect();
            let meta = analyze_walkway(&positions).unwrap();

            let projections: Vec<f32> = positions
                .windows(2)
                .map(|w| horizontal(w[1] - w[0]).dot(meta.direction))
                .filter(|&p| p > MIN_SPACING_PROJECTION)
                .collect();
            let expected = if projections.is_empty() {
                FALLBACK_SPACING
            } else {
                projections.iter().sum::<f32>() / projections.len() as f32
            };
            prop_assert!((meta.spacing - expected).abs() <= 1e-3 * expected.max(1.0));
            prop_assert!(meta.spacing > 0.0);
            prop_assert!((meta.direction.length() - 1.0).abs() < 1e-4);
        }
    }
}
