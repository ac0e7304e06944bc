//! Soft failures recovered during generation
//!
//! Nothing here aborts the process. A missing prototype skips one placement,
//! too few base tiles leaves the level as authored, and degenerate geometry
//! falls back to a canonical axis.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::assemble::LevelId;
use super::plan::TileTag;

/// Prototype the host scene failed to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrototypeKind {
    Tile(TileTag),
    SwingingObstacle,
    GoalMarker,
}

impl fmt::Display for PrototypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrototypeKind::Tile(tag) => write!(f, "tile {}", tag.as_str()),
            PrototypeKind::SwingingObstacle => f.write_str("swinging obstacle"),
            PrototypeKind::GoalMarker => f.write_str("goal marker"),
        }
    }
}

/// Where a zero-length direction was replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryContext {
    WalkwayDirection,
}

impl fmt::Display for GeometryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryContext::WalkwayDirection => f.write_str("walkway direction"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum GenerationIssue {
    #[error("no prototype available for {0}")]
    MissingPrototype(PrototypeKind),
    #[error("{level} needs at least {required} base tiles, found {found}")]
    InsufficientBaseTiles {
        level: LevelId,
        required: usize,
        found: usize,
    },
    #[error("degenerate {0}, substituted canonical axis")]
    DegenerateGeometry(GeometryContext),
}

/// Log a recovered issue and keep it for the plan
pub fn report(issues: &mut Vec<GenerationIssue>, issue: GenerationIssue) {
    log::warn!("[procgen] {issue}");
    issues.push(issue);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_messages() {
        let missing = GenerationIssue::MissingPrototype(PrototypeKind::Tile(TileTag::Blue));
        assert_eq!(missing.to_string(), "no prototype available for tile PlatformBlue");

        let short = GenerationIssue::InsufficientBaseTiles {
            level: LevelId::Level3,
            required: 2,
            found: 1,
        };
        assert_eq!(short.to_string(), "lvl3 needs at least 2 base tiles, found 1");
    }

    #[test]
    fn test_report_collects() {
        let mut issues = Vec::new();
        report(
            &mut issues,
            GenerationIssue::DegenerateGeometry(GeometryContext::WalkwayDirection),
        );
        assert_eq!(issues.len(), 1);
    }
}
