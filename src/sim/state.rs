//! Match state and core entity records
//!
//! Plain data only; behavior lives in `player`, `enemy`, `combat`, and
//! `tick`. Everything here is serializable so a host can checkpoint a match.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::animation::AnimClock;
use crate::tuning::Tuning;

/// Player state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Running,
    /// Locked until the swing clip completes
    Attacking,
    /// Terminal; only the death clip keeps advancing
    Dead,
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Clamped to [0, max_health]
    pub health: f32,
    pub state: PlayerState,
    pub anim: AnimClock,
    /// Horizontal sprite orientation, +1 right / -1 left
    pub facing: f32,
    pub melee_cooldown_ms: f32,
    /// Guards the swing so one attack lands at most once
    pub swing_hit: bool,
    pub shield_active: bool,
    pub shield_remaining_ms: f32,
    pub shield_cooldown_ms: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            health: tuning.player_max_health,
            state: PlayerState::Idle,
            anim: AnimClock::default(),
            facing: 1.0,
            melee_cooldown_ms: 0.0,
            swing_hit: false,
            shield_active: false,
            shield_remaining_ms: 0.0,
            shield_cooldown_ms: 0.0,
        }
    }

    pub fn alive(&self) -> bool {
        self.state != PlayerState::Dead
    }

    /// Switch state, resetting the animation clock on change. The swing
    /// guard is re-armed whenever a new attack starts.
    pub fn set_state(&mut self, state: PlayerState) {
        if self.state != state {
            self.state = state;
            self.anim.reset();
            if state == PlayerState::Attacking {
                self.swing_hit = false;
            }
        }
    }

    /// Apply unshielded damage; returns true if this killed the player.
    pub fn apply_damage(&mut self, amount: f32, max_health: f32) -> bool {
        debug_assert!(self.alive(), "dead player must not receive damage");
        self.health = (self.health - amount).clamp(0.0, max_health);
        if self.health <= 0.0 {
            self.set_state(PlayerState::Dead);
            self.vel = Vec2::ZERO;
            true
        } else {
            false
        }
    }
}

/// Enemy behavior profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// Contact melee, no cooldown, looping attack
    Knight,
    /// Free-roam kiter with a cooldown-gated ranged attack
    Mage,
    /// Range-gated melee with a cooldown
    Skeleton,
}

/// Enemy state machine states, shared by all archetypes.
///
/// `Dying` is not a valid Knight state: Knights go straight from `Attacking`
/// to `Dead` and play their death clip there, holding the last frame until
/// removal. Mage and Skeleton play theirs in `Dying` and flip to `Dead` when
/// it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Running,
    Attacking,
    Dying,
    Dead,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique, monotonically increasing
    pub id: u32,
    pub pos: Vec2,
    pub health: f32,
    pub archetype: Archetype,
    pub state: EnemyState,
    pub anim: AnimClock,
    pub facing: f32,
    /// One damage application per attack cycle
    pub damage_dealt: bool,
    /// Mage/Skeleton only; Knights are gated by proximity alone
    pub attack_cooldown_ms: f32,
    /// One projectile per Mage attack cycle
    pub projectile_spawned: bool,
}

impl Enemy {
    pub fn new(id: u32, archetype: Archetype, pos: Vec2, tuning: &Tuning) -> Self {
        let attack_cooldown_ms = match archetype {
            Archetype::Knight => 0.0,
            Archetype::Mage => tuning.mage_attack_cooldown_ms,
            Archetype::Skeleton => tuning.skeleton_attack_cooldown_ms,
        };
        Self {
            id,
            pos,
            health: tuning.enemy_max_health,
            archetype,
            state: EnemyState::Running,
            anim: AnimClock::default(),
            facing: 1.0,
            damage_dealt: false,
            attack_cooldown_ms,
            projectile_spawned: false,
        }
    }

    /// Still a combat participant (not on its death path)
    pub fn alive(&self) -> bool {
        matches!(self.state, EnemyState::Running | EnemyState::Attacking)
    }

    /// Switch state, resetting the animation clock on change and re-arming
    /// the per-cycle flags when a new cycle starts.
    pub fn set_state(&mut self, state: EnemyState) {
        if self.state != state {
            self.state = state;
            self.anim.reset();
            self.damage_dealt = false;
            self.projectile_spawned = false;
        }
    }

    /// Force this enemy onto its archetype's death path. Idempotent: an
    /// enemy already dying or dead is left untouched.
    pub fn enter_death(&mut self) {
        if !self.alive() {
            return;
        }
        self.health = self.health.min(0.0);
        match self.archetype {
            Archetype::Knight => self.set_state(EnemyState::Dead),
            Archetype::Mage | Archetype::Skeleton => self.set_state(EnemyState::Dying),
        }
    }
}

/// A Mage projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Resolved (hit or out of bounds); swept at the end of the step
    pub done: bool,
}

/// A cosmetic particle. Never authoritative to outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, dead at 0.0
    pub life: f32,
    pub size: f32,
    /// Palette index for the render adapter
    pub color: u32,
}

/// Maximum live particles; oldest are evicted first
pub const MAX_PARTICLES: usize = 256;

/// Pending deferred mass-kill from an ultimate activation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bladestorm {
    /// Time since activation; the fallback timer
    pub elapsed_ms: f32,
}

/// Match phase. `Paused` freezes the world; `Victory`/`Defeat` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Fighting,
    Paused,
    Victory,
    Defeat,
}

/// Terminal result exposed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    None,
    Victory,
    Defeat,
}

/// RNG seed wrapper; fresh streams are derived per spawn so replaying a seed
/// reproduces the wave exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Deterministic per-stream RNG
    pub fn stream_rng(&self, stream: u64) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
    }
}

/// Complete match state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaidState {
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    pub phase: MatchPhase,
    /// Countdown; reaching 0 with the player alive is victory
    pub remaining_secs: f32,
    /// Wall time consumed by the simulation so far
    pub elapsed_ms: f32,
    /// Step counter, also the seed for deterministic particle spreads
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Visual only
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Ultimate charge in [0, charge_max]
    pub charge: f32,
    pub bladestorm: Option<Bladestorm>,
    /// Time since the last spawner admission
    pub since_spawn_ms: f32,
    /// Spawn counter; doubles as the RNG stream id per spawn
    pub spawn_count: u64,
    next_id: u32,
}

impl RaidState {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning);
        Self {
            seed,
            rng_state: RngState::new(seed),
            remaining_secs: tuning.match_duration_secs,
            tuning,
            phase: MatchPhase::Fighting,
            elapsed_ms: 0.0,
            time_ticks: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            charge: 0.0,
            bladestorm: None,
            since_spawn_ms: 0.0,
            spawn_count: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fraction of the match consumed, 0.0 at start to 1.0 at the horn
    pub fn elapsed_fraction(&self) -> f32 {
        (1.0 - self.remaining_secs / self.tuning.match_duration_secs).clamp(0.0, 1.0)
    }

    /// Global enemy speed multiplier; rises linearly as the clock runs down
    pub fn enemy_speed_scale(&self) -> f32 {
        1.0 + self.tuning.enemy_speed_ramp * self.elapsed_fraction()
    }

    pub fn outcome(&self) -> Outcome {
        match self.phase {
            MatchPhase::Victory => Outcome::Victory,
            MatchPhase::Defeat => Outcome::Defeat,
            _ => Outcome::None,
        }
    }
}
