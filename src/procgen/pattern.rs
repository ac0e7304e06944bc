//! Cyclic palette expansion

use super::plan::TileTag;

/// Expand `palette` cyclically into `count` tags
///
/// An empty palette yields an empty sequence.
pub fn sequence(palette: &[TileTag], count: usize) -> Vec<TileTag> {
    if palette.is_empty() {
        return Vec::new();
    }
    palette.iter().copied().cycle().take(count).collect()
}
