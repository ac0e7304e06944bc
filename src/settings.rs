//! Generation settings
//!
//! Loaded once at startup and handed to the assembler; nothing reads them
//! through globals.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_EXTRA_TILES;

/// Tunable amounts of generated content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderSettings {
    /// Extra ground tiles appended to lvl3
    pub level3_extra_tiles: usize,
    /// Extra ground tiles appended to lvl4
    pub level4_extra_tiles: usize,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            level3_extra_tiles: 6,
            level4_extra_tiles: 9,
        }
    }
}

impl BuilderSettings {
    /// Parse settings, clamping tile counts to [`MAX_EXTRA_TILES`]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::clamped)
    }

    /// Limit tile counts to [`MAX_EXTRA_TILES`]
    pub fn clamped(self) -> Self {
        Self {
            level3_extra_tiles: clamp_count("level3_extra_tiles", self.level3_extra_tiles),
            level4_extra_tiles: clamp_count("level4_extra_tiles", self.level4_extra_tiles),
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Unable to read settings {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }
}

fn clamp_count(field: &str, count: usize) -> usize {
    if count > MAX_EXTRA_TILES {
        log::warn!("{field}={count} exceeds {MAX_EXTRA_TILES}, clamping");
        MAX_EXTRA_TILES
    } else {
        count
    }
}
