//! Animation clocks and clip tables
//!
//! Every animated entity carries an [`AnimClock`]; which clip it plays is a
//! total function of (entity kind, state). The clock only counts frames —
//! what a completed clip *means* (return to idle, become removable) is the
//! caller's decision.

use serde::{Deserialize, Serialize};

use crate::sim::state::{Archetype, EnemyState, PlayerState};

/// A sprite clip: frame count, per-frame duration, loop flag, and an
/// optional trigger frame (damage window or projectile spawn).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub frames: u32,
    pub frame_ms: f32,
    pub looping: bool,
    /// Frame index at which the clip's effect fires, if it has one
    pub trigger: Option<u32>,
}

impl Clip {
    const fn looped(frames: u32, frame_ms: f32, trigger: Option<u32>) -> Self {
        Self { frames, frame_ms, looping: true, trigger }
    }

    const fn once(frames: u32, frame_ms: f32, trigger: Option<u32>) -> Self {
        Self { frames, frame_ms, looping: false, trigger }
    }

    /// Whether a clock playing this clip has reached the trigger frame.
    /// Threshold, not equality: a damage window that spans several sub-ticks
    /// still reads as open on each of them (idempotence comes from the
    /// per-cycle flags, not from here).
    pub fn trigger_reached(&self, clock: &AnimClock) -> bool {
        self.trigger.is_some_and(|t| clock.frame >= t)
    }
}

pub const PLAYER_IDLE: Clip = Clip::looped(6, 120.0, None);
pub const PLAYER_RUN: Clip = Clip::looped(8, 90.0, None);
pub const PLAYER_ATTACK: Clip = Clip::once(6, 70.0, Some(3));
pub const PLAYER_DEATH: Clip = Clip::once(6, 140.0, None);

pub const KNIGHT_RUN: Clip = Clip::looped(8, 100.0, None);
pub const KNIGHT_ATTACK: Clip = Clip::looped(6, 90.0, Some(3));
pub const KNIGHT_DEATH: Clip = Clip::once(4, 110.0, None);

pub const MAGE_RUN: Clip = Clip::looped(8, 100.0, None);
pub const MAGE_ATTACK: Clip = Clip::once(8, 90.0, Some(4));
pub const MAGE_DEATH: Clip = Clip::once(5, 100.0, None);

pub const SKELETON_RUN: Clip = Clip::looped(8, 100.0, None);
pub const SKELETON_ATTACK: Clip = Clip::once(7, 80.0, Some(4));
pub const SKELETON_DEATH: Clip = Clip::once(5, 100.0, None);

/// Single held frame for states with nothing left to show
const HOLD: Clip = Clip::once(1, 1000.0, None);

pub fn player_clip(state: PlayerState) -> &'static Clip {
    match state {
        PlayerState::Idle => &PLAYER_IDLE,
        PlayerState::Running => &PLAYER_RUN,
        PlayerState::Attacking => &PLAYER_ATTACK,
        PlayerState::Dead => &PLAYER_DEATH,
    }
}

pub fn enemy_clip(archetype: Archetype, state: EnemyState) -> &'static Clip {
    match (archetype, state) {
        (Archetype::Knight, EnemyState::Running) => &KNIGHT_RUN,
        (Archetype::Knight, EnemyState::Attacking) => &KNIGHT_ATTACK,
        // Knights have no Dying state; the death clip plays in Dead
        (Archetype::Knight, EnemyState::Dying | EnemyState::Dead) => &KNIGHT_DEATH,
        (Archetype::Mage, EnemyState::Running) => &MAGE_RUN,
        (Archetype::Mage, EnemyState::Attacking) => &MAGE_ATTACK,
        (Archetype::Mage, EnemyState::Dying) => &MAGE_DEATH,
        (Archetype::Skeleton, EnemyState::Running) => &SKELETON_RUN,
        (Archetype::Skeleton, EnemyState::Attacking) => &SKELETON_ATTACK,
        (Archetype::Skeleton, EnemyState::Dying) => &SKELETON_DEATH,
        (Archetype::Mage | Archetype::Skeleton, EnemyState::Dead) => &HOLD,
    }
}

/// What a single clock advance did
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimStep {
    /// A looping clip wrapped past its last frame (per-cycle flags re-arm)
    pub wrapped: bool,
    /// A non-looping clip reached its end on this advance (fires once)
    pub completed: bool,
}

/// Per-entity frame index + elapsed-time accumulator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimClock {
    pub frame: u32,
    pub acc_ms: f32,
    /// Latched once a non-looping clip finishes; the clock then holds the
    /// last frame
    pub done: bool,
}

impl AnimClock {
    /// Reset for a state switch
    pub fn reset(&mut self) {
        self.frame = 0;
        self.acc_ms = 0.0;
        self.done = false;
    }

    /// Advance by `dt_ms` against `clip`. Frame changes happen one at a
    /// time as the accumulator crosses the frame duration, so a trigger
    /// frame is never skipped no matter how the delta is partitioned.
    pub fn advance(&mut self, clip: &Clip, dt_ms: f32) -> AnimStep {
        let mut step = AnimStep::default();
        if self.done {
            // Non-looping clip holding its final frame
            return step;
        }
        self.acc_ms += dt_ms;
        while self.acc_ms >= clip.frame_ms {
            self.acc_ms -= clip.frame_ms;
            if self.frame + 1 >= clip.frames {
                if clip.looping {
                    self.frame = 0;
                    step.wrapped = true;
                } else {
                    self.done = true;
                    step.completed = true;
                    self.acc_ms = 0.0;
                    break;
                }
            } else {
                self.frame += 1;
            }
        }
        step
    }
}
