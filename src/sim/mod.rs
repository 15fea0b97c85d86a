//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Sub-stepped fixed-order updates only
//! - Seeded RNG only
//! - Stable iteration order (by spawn order / entity ID)
//! - No rendering or platform dependencies

pub mod animation;
pub mod combat;
pub mod enemy;
pub mod player;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use animation::{AnimClock, Clip};
pub use snapshot::{FrameSnapshot, RaidSim};
pub use state::{
    Archetype, Bladestorm, Enemy, EnemyState, MatchPhase, Outcome, Particle, Player, PlayerState,
    Projectile, RaidState, MAX_PARTICLES,
};
pub use tick::{TickInput, tick};
