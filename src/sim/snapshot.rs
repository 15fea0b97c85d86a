//! Host-facing facade
//!
//! The host owns rendering and input polling; it drives the core through
//! [`RaidSim::advance`] and draws from the returned [`FrameSnapshot`]. The
//! snapshot is a read-only borrow — no component outside the step ever holds
//! a mutable reference into the entity collections.

use crate::consts::{MAX_FRAME_MS, MAX_STEP_MS};
use crate::sim::state::{Enemy, Outcome, Particle, Player, Projectile, RaidState};
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Read-only view of one simulated frame
#[derive(Debug)]
pub struct FrameSnapshot<'a> {
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub particles: &'a [Particle],
    /// Match clock, counting down to victory
    pub remaining_secs: f32,
    /// Wall time the simulation has consumed; the host maps this plus the
    /// outcome to rewards
    pub elapsed_secs: f32,
    /// Ultimate charge as a fraction of full, for the HUD meter
    pub charge_fraction: f32,
    pub outcome: Outcome,
}

impl<'a> FrameSnapshot<'a> {
    pub fn capture(state: &'a RaidState) -> Self {
        Self {
            player: &state.player,
            enemies: &state.enemies,
            projectiles: &state.projectiles,
            particles: &state.particles,
            remaining_secs: state.remaining_secs,
            elapsed_secs: state.elapsed_ms / 1000.0,
            charge_fraction: (state.charge / state.tuning.charge_max).clamp(0.0, 1.0),
            outcome: state.outcome(),
        }
    }
}

/// The simulation core as the host sees it
#[derive(Debug, Clone)]
pub struct RaidSim {
    state: RaidState,
}

impl RaidSim {
    pub fn new(seed: u64) -> Self {
        Self { state: RaidState::new(seed) }
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self { state: RaidState::with_tuning(seed, tuning) }
    }

    /// Advance the match by `delta_ms` of wall time and return the frame to
    /// draw. Large deltas are consumed in `MAX_STEP_MS` sub-steps so a slow
    /// frame cannot tunnel entities through each other; command edges fire
    /// on the first sub-step only.
    pub fn advance(&mut self, input: &TickInput, delta_ms: f32) -> FrameSnapshot<'_> {
        let mut remaining = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };

        let mut step_input = input.clone();
        if remaining <= 0.0 {
            // Still deliver edges (pause works even on a zero-delta frame)
            tick(&mut self.state, &step_input, 0.0);
        }
        while remaining > 0.0 {
            let dt = remaining.min(MAX_STEP_MS);
            tick(&mut self.state, &step_input, dt);
            step_input = step_input.held_only();
            remaining -= dt;
        }
        FrameSnapshot::capture(&self.state)
    }

    /// Direct read access for hosts that want more than the snapshot
    pub fn state(&self) -> &RaidState {
        &self.state
    }
}
