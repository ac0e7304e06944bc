//! Host-side runtime rules for generated content
//!
//! Timed platforms and beam traps both alternate between two states on fixed
//! durations. The host advances one [`DutyCycle`] per entity each frame and
//! enables or disables the entity's visuals and collision from it.

use crate::procgen::{BeamCycle, TileTag, TimingDescriptor};

/// Two-state timer toggling after fixed durations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutyCycle {
    /// Seconds spent active before switching off
    pub active_duration: f32,
    /// Seconds spent inactive before switching on
    pub inactive_duration: f32,
    timer: f32,
    active: bool,
}

impl DutyCycle {
    /// Platform cycle: starts visible
    pub fn platform(timing: TimingDescriptor) -> Self {
        Self {
            active_duration: timing.visible,
            inactive_duration: timing.hidden,
            timer: 0.0,
            active: true,
        }
    }

    /// Beam cycle: starts off, first activation after the start delay plus the
    /// off duration
    pub fn beam(cycle: BeamCycle) -> Self {
        Self {
            active_duration: cycle.on_duration,
            inactive_duration: cycle.off_duration,
            timer: -cycle.start_delay.max(0.0),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance by `dt` seconds. Returns true when the state flipped.
    ///
    /// At most one toggle happens per call; the timer restarts from zero on a
    /// toggle rather than carrying the overshoot.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.timer += dt;
        let limit = if self.active {
            self.active_duration
        } else {
            self.inactive_duration
        };
        if self.timer >= limit {
            self.timer = 0.0;
            self.active = !self.active;
            true
        } else {
            false
        }
    }
}

/// Something the player touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// A colored tile; `solid` is false while a timed platform is hidden
    Tile { tag: TileTag, solid: bool },
    Beam { active: bool },
    /// Kill plane under the level
    RespawnPlane,
}

/// Whether touching `contact` sends a player of `player_color` back to spawn
pub fn respawns(player_color: TileTag, contact: Contact) -> bool {
    match contact {
        Contact::Tile { tag, solid } => solid && tag.rejects(player_color),
        Contact::Beam { active } => active,
        Contact::RespawnPlane => true,
    }
}
