//! Raid Sim - wave-survival combat simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, behavior, collisions, match state)
//! - `render`: Render adapter boundary (the host owns the actual renderer)
//! - `tuning`: Data-driven game balance
//!
//! The host drives the core through [`sim::RaidSim::advance`], feeding it an
//! input state and a frame delta in milliseconds, and draws whatever the
//! returned [`sim::FrameSnapshot`] describes. Nothing in this crate touches
//! the screen, the keyboard, or the clock directly.

pub mod render;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Engine constants that are part of the simulation contract (as opposed to
/// balance values, which live in [`tuning::Tuning`]).
pub mod consts {
    /// Arena bounds in world pixels.
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Largest delta a single simulation step will consume. Bounds tunneling
    /// in the circle-vs-circle collision checks.
    pub const MAX_STEP_MS: f32 = 50.0;

    /// Largest delta a single `advance` call will consume, split into
    /// `MAX_STEP_MS` sub-steps. Anything above this is a stalled tab or a
    /// suspended process, not a frame.
    pub const MAX_FRAME_MS: f32 = 1000.0;
}

/// Distance between two points
#[inline]
pub fn dist(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Unit vector from `from` toward `to` (zero if coincident)
#[inline]
pub fn dir_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Whether two circles overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    dist(a, b) <= ra + rb
}
