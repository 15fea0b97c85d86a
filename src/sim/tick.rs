//! Fixed-order simulation step
//!
//! One `tick` consumes at most `MAX_STEP_MS` and runs the phases in a fixed
//! order: match clock, player timers, bladestorm poll, player transitions +
//! movement, player animation + melee window, enemy behavior, enemy
//! animation + attack windows, dead-enemy sweep, projectiles, spawner,
//! particles. The host-facing sub-stepping wrapper lives in `snapshot`.

use glam::Vec2;
use log::info;

use crate::consts::MAX_STEP_MS;
use crate::sim::animation::{enemy_clip, player_clip};
use crate::sim::state::{
    Archetype, Bladestorm, EnemyState, MatchPhase, PlayerState, RaidState,
};
use crate::sim::{combat, enemy, player, spawner};

/// Input for a single tick: the held movement keys plus pressed-this-frame
/// command edges. `cinematic_done` is the host's single-shot signal that the
/// bladestorm cinematic finished playing.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub melee: bool,
    pub shield: bool,
    pub ultimate: bool,
    pub pause: bool,
    pub cinematic_done: bool,
}

impl TickInput {
    /// Normalized movement direction from the held keys (y grows downward)
    pub fn move_dir(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }

    /// Copy with the command edges stripped, for sub-steps after the first:
    /// held keys and the polled cinematic signal persist, presses do not.
    pub fn held_only(&self) -> Self {
        Self {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
            cinematic_done: self.cinematic_done,
            ..Self::default()
        }
    }
}

/// Advance the match by one step of at most `MAX_STEP_MS`.
pub fn tick(state: &mut RaidState, input: &TickInput, delta_ms: f32) {
    // Out-of-range deltas clamp, never propagate
    let dt = if delta_ms.is_finite() {
        delta_ms.clamp(0.0, MAX_STEP_MS)
    } else {
        0.0
    };

    if input.pause {
        state.phase = match state.phase {
            MatchPhase::Fighting => MatchPhase::Paused,
            MatchPhase::Paused => MatchPhase::Fighting,
            terminal => terminal,
        };
    }
    match state.phase {
        MatchPhase::Paused | MatchPhase::Victory | MatchPhase::Defeat => return,
        MatchPhase::Fighting => {}
    }
    if dt <= 0.0 {
        return;
    }

    state.time_ticks += 1;
    state.elapsed_ms += dt;
    let tick_seed = state.time_ticks as u32;

    // (1) Match clock. Only runs while the player is alive; hitting zero
    // alive is victory.
    if state.player.alive() {
        state.remaining_secs -= dt / 1000.0;
        if state.remaining_secs <= 0.0 {
            state.remaining_secs = 0.0;
            state.phase = MatchPhase::Victory;
            info!(
                "victory: survived with {:.0} health, {} enemies on field",
                state.player.health,
                state.enemies.len()
            );
            return;
        }
    }

    // (2) Player cooldown/shield timers
    player::tick_timers(&mut state.player, &state.tuning, dt);

    // Bladestorm poll: the cinematic boundary is an event we poll, never a
    // callback that mutates state from outside the step.
    let resolve = match state.bladestorm.as_mut() {
        Some(bs) => {
            bs.elapsed_ms += dt;
            input.cinematic_done || bs.elapsed_ms >= state.tuning.bladestorm_fallback_ms
        }
        None => false,
    };
    if resolve {
        state.bladestorm = None;
        combat::resolve_bladestorm(&mut state.enemies, &mut state.particles, tick_seed);
    }

    // (3) Player commands, state transition, movement
    if input.melee {
        player::try_melee(&mut state.player, &state.tuning);
    }
    if input.shield {
        player::try_shield(&mut state.player, &state.tuning);
    }
    if input.ultimate
        && state.player.alive()
        && state.bladestorm.is_none()
        && state.charge >= state.tuning.charge_max
    {
        state.charge = 0.0;
        state.bladestorm = Some(Bladestorm { elapsed_ms: 0.0 });
        info!("bladestorm activated");
    }
    player::update_movement(&mut state.player, input, &state.tuning, dt);

    // (4) Player animation + melee damage window
    let clip = player_clip(state.player.state);
    let player_step = state.player.anim.advance(clip, dt);
    combat::fire_player_window(
        &mut state.player,
        &mut state.enemies,
        &mut state.particles,
        &mut state.charge,
        &state.tuning,
        tick_seed,
    );
    if player_step.completed {
        match state.player.state {
            PlayerState::Attacking => state.player.set_state(PlayerState::Idle),
            PlayerState::Dead => {
                state.phase = MatchPhase::Defeat;
                info!("defeat after {:.1}s", state.elapsed_ms / 1000.0);
                return;
            }
            _ => {}
        }
    }

    // (5) Enemy behavior: transitions + movement, only while there is a
    // living player to fight
    if state.player.alive() {
        let player_pos = state.player.pos;
        let speed_scale = state.enemy_speed_scale();
        for e in state.enemies.iter_mut() {
            enemy::update(e, player_pos, &state.tuning, speed_scale, dt);
        }
    }

    // (6) Enemy animation clocks: damage windows, Mage projectile frames,
    // attack-cycle and death-clip completions
    for e in state.enemies.iter_mut() {
        let clip = enemy_clip(e.archetype, e.state);
        let step = e.anim.advance(clip, dt);
        if step.wrapped {
            // Looping attack (Knight): each cycle re-arms the damage flag
            e.damage_dealt = false;
        }
        combat::fire_enemy_window(
            e,
            &mut state.player,
            &mut state.projectiles,
            &mut state.particles,
            &state.tuning,
            tick_seed,
        );
        if step.completed {
            match e.state {
                EnemyState::Attacking => {
                    e.set_state(EnemyState::Running);
                    e.attack_cooldown_ms = match e.archetype {
                        Archetype::Mage => state.tuning.mage_attack_cooldown_ms,
                        Archetype::Skeleton => state.tuning.skeleton_attack_cooldown_ms,
                        Archetype::Knight => 0.0,
                    };
                }
                EnemyState::Dying => e.set_state(EnemyState::Dead),
                _ => {}
            }
        }
    }

    // (7) Sweep enemies whose death animation has finished. Knights hold
    // their last death frame until the clip completes; the others are Dead
    // the moment their Dying clip ends.
    state.enemies.retain(|e| match e.state {
        EnemyState::Dead => e.archetype == Archetype::Knight && !e.anim.done,
        _ => true,
    });

    // (8) Projectiles
    combat::step_projectiles(
        &mut state.projectiles,
        &mut state.player,
        &mut state.particles,
        &state.tuning,
        dt,
        tick_seed,
    );

    // (9) Spawner
    spawner::run(state, dt);

    // (10) Particles
    combat::age_particles(&mut state.particles, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::snapshot::RaidSim;
    use crate::sim::state::{Enemy, Outcome};
    use crate::tuning::Tuning;

    /// Balance with the spawner effectively disabled, for scenarios that
    /// control the enemy roster by hand.
    fn no_spawn_tuning() -> Tuning {
        Tuning {
            spawn_interval_start_ms: 1e12,
            spawn_interval_min_ms: 1e12,
            ..Tuning::default()
        }
    }

    fn run_ticks(state: &mut RaidState, input: &TickInput, ticks: u32) {
        for _ in 0..ticks {
            tick(state, input, 50.0);
        }
    }

    #[test]
    fn test_victory_scenario() {
        // 60s clock, nothing ever touches the player: victory at full health
        let mut sim = RaidSim::with_tuning(1, no_spawn_tuning());
        let input = TickInput::default();
        for _ in 0..60 {
            sim.advance(&input, 1000.0);
        }
        let frame = sim.advance(&input, 1000.0);
        assert_eq!(frame.outcome, Outcome::Victory);
        assert_eq!(frame.player.health, 100.0);
        assert_eq!(frame.remaining_secs, 0.0);
    }

    #[test]
    fn test_knight_kill_scenario() {
        let mut state = RaidState::with_tuning(2, no_spawn_tuning());
        let id = state.next_entity_id();
        let knight = Enemy::new(id, Archetype::Knight, state.player.pos, &state.tuning);
        state.enemies.push(knight);

        let melee = TickInput { melee: true, ..Default::default() };
        tick(&mut state, &melee, 50.0);
        assert_eq!(state.player.state, PlayerState::Attacking);
        assert_eq!(state.enemies[0].state, EnemyState::Attacking, "contact range");

        // Damage frame 3 opens 210ms into the swing
        run_ticks(&mut state, &TickInput::default(), 5);
        assert_eq!(state.enemies[0].state, EnemyState::Dead);
        assert!(state.enemies[0].health <= 0.0);
        assert_eq!(state.charge, state.tuning.charge_per_kill);
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_kill_charge_is_per_kill_and_swept() {
        let mut state = RaidState::with_tuning(3, no_spawn_tuning());
        for _ in 0..3 {
            let id = state.next_entity_id();
            state
                .enemies
                .push(Enemy::new(id, Archetype::Knight, state.player.pos, &state.tuning));
        }
        let melee = TickInput { melee: true, ..Default::default() };
        tick(&mut state, &melee, 50.0);
        run_ticks(&mut state, &TickInput::default(), 5);
        assert_eq!(state.charge, 3.0 * state.tuning.charge_per_kill);

        // Terminal cleanup: all three leave the roster once the death clip
        // (4 frames at 110ms) has played out
        run_ticks(&mut state, &TickInput::default(), 12);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_mage_projectile_scenario() {
        let mut state = RaidState::with_tuning(4, no_spawn_tuning());
        let id = state.next_entity_id();
        let mage = Enemy::new(
            id,
            Archetype::Mage,
            state.player.pos + Vec2::new(300.0, 0.0),
            &state.tuning,
        );
        state.enemies.push(mage);

        let idle = TickInput::default();
        let mut ticks = 0;
        while state.player.health >= state.tuning.player_max_health {
            tick(&mut state, &idle, 50.0);
            ticks += 1;
            assert!(ticks < 200, "projectile never landed");
        }
        let expected = state.tuning.player_max_health - state.tuning.mage_projectile_damage;
        assert_eq!(state.player.health, expected);
        assert!(state.projectiles.is_empty(), "hit projectile is swept");

        // The next cast is a full cooldown away; nothing lands twice
        run_ticks(&mut state, &idle, 10);
        assert_eq!(state.player.health, expected);
    }

    #[test]
    fn test_shield_invariance_under_contact() {
        let mut state = RaidState::with_tuning(5, no_spawn_tuning());
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Archetype::Knight, state.player.pos, &state.tuning));

        let shield = TickInput { shield: true, ..Default::default() };
        tick(&mut state, &shield, 50.0);
        assert!(state.player.shield_active);

        // Two full knight attack cycles of sustained contact
        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), 50.0);
            assert_eq!(state.player.health, state.tuning.player_max_health);
        }
    }

    #[test]
    fn test_absorbing_dead_and_defeat() {
        let mut state = RaidState::with_tuning(6, no_spawn_tuning());
        state.player.health = 1.0;
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Archetype::Knight, state.player.pos, &state.tuning));

        let idle = TickInput::default();
        let mut ticks = 0;
        while state.player.alive() {
            tick(&mut state, &idle, 50.0);
            ticks += 1;
            assert!(ticks < 100, "knight never landed the hit");
        }

        let frozen_pos = state.player.pos;
        let frozen_clock = state.remaining_secs;

        // Dead is absorbing: input changes nothing, the clock freezes
        let busy = TickInput { right: true, melee: true, shield: true, ..Default::default() };
        for _ in 0..10 {
            tick(&mut state, &busy, 50.0);
            assert_eq!(state.player.state, PlayerState::Dead);
            assert_eq!(state.player.pos, frozen_pos);
            assert_eq!(state.player.health, 0.0);
            assert_eq!(state.remaining_secs, frozen_clock);
        }

        // Defeat lands once the death clip (6 frames at 140ms) completes
        run_ticks(&mut state, &idle, 10);
        assert_eq!(state.phase, MatchPhase::Defeat);
        assert_eq!(state.outcome(), Outcome::Defeat);
    }

    #[test]
    fn test_bladestorm_fallback_scenario() {
        let mut tuning = no_spawn_tuning();
        tuning.enemy_base_speed = 0.0;
        let mut state = RaidState::with_tuning(7, tuning);
        for archetype in [Archetype::Knight, Archetype::Mage, Archetype::Skeleton] {
            let id = state.next_entity_id();
            state
                .enemies
                .push(Enemy::new(id, archetype, Vec2::new(1200.0, 680.0), &state.tuning));
        }
        state.charge = state.tuning.charge_max;

        // No cinematic attached: only the fallback timer can resolve it
        let ultimate = TickInput { ultimate: true, ..Default::default() };
        tick(&mut state, &ultimate, 50.0);
        assert!(state.bladestorm.is_some());
        assert_eq!(state.charge, 0.0);

        let idle = TickInput::default();
        let mut ticks = 0;
        while state.bladestorm.is_some() {
            tick(&mut state, &idle, 50.0);
            ticks += 1;
            assert!(ticks < 200, "fallback never fired");
        }
        assert!(ticks >= (state.tuning.bladestorm_fallback_ms / 50.0) as u32 - 2);
        assert!(state.enemies.iter().all(|e| !e.alive()));

        // Re-activation without charge is silently rejected
        tick(&mut state, &ultimate, 50.0);
        assert!(state.bladestorm.is_none());
    }

    #[test]
    fn test_bladestorm_cinematic_signal() {
        let mut tuning = no_spawn_tuning();
        tuning.enemy_base_speed = 0.0;
        let mut state = RaidState::with_tuning(8, tuning);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Archetype::Skeleton, Vec2::new(1200.0, 80.0), &state.tuning));
        state.charge = state.tuning.charge_max;

        tick(&mut state, &TickInput { ultimate: true, ..Default::default() }, 50.0);
        run_ticks(&mut state, &TickInput::default(), 3);
        assert!(state.bladestorm.is_some());
        assert!(state.enemies[0].alive());

        // Host signals the cinematic finished: resolution happens this tick,
        // long before the fallback delay
        tick(&mut state, &TickInput { cinematic_done: true, ..Default::default() }, 50.0);
        assert!(state.bladestorm.is_none());
        assert_eq!(state.enemies[0].state, EnemyState::Dying);
    }

    #[test]
    fn test_monotonic_clock_while_alive() {
        let mut state = RaidState::new(9);
        let idle = TickInput::default();
        let mut last = state.remaining_secs;
        for _ in 0..50 {
            tick(&mut state, &idle, 50.0);
            assert!(state.remaining_secs < last);
            last = state.remaining_secs;
        }
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut state = RaidState::new(10);
        let idle = TickInput::default();
        run_ticks(&mut state, &idle, 5);

        tick(&mut state, &TickInput { pause: true, ..Default::default() }, 50.0);
        assert_eq!(state.phase, MatchPhase::Paused);
        let remaining = state.remaining_secs;
        let ticks = state.time_ticks;
        run_ticks(&mut state, &idle, 10);
        assert_eq!(state.remaining_secs, remaining);
        assert_eq!(state.time_ticks, ticks);

        tick(&mut state, &TickInput { pause: true, ..Default::default() }, 50.0);
        assert_eq!(state.phase, MatchPhase::Fighting);
        assert!(state.remaining_secs < remaining);
    }

    #[test]
    fn test_invalid_deltas_are_inert() {
        let mut state = RaidState::new(11);
        let before = state.clone();
        tick(&mut state, &TickInput::default(), -250.0);
        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.time_ticks, before.time_ticks);
        assert_eq!(state.remaining_secs, before.remaining_secs);
        assert_eq!(state.player.pos, before.player.pos);
    }

    #[test]
    fn test_determinism() {
        let mut a = RaidState::new(424242);
        let mut b = RaidState::new(424242);
        for i in 0..600u32 {
            let input = TickInput {
                right: i % 3 != 0,
                down: i % 7 == 0,
                melee: i % 40 == 0,
                shield: i == 100,
                ..Default::default()
            };
            tick(&mut a, &input, 50.0);
            tick(&mut b, &input, 50.0);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.player.health, b.player.health);
        assert_eq!(a.charge, b.charge);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (x, y) in a.enemies.iter().zip(b.enemies.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.state, y.state);
        }
    }

    #[test]
    fn test_damage_window_once_across_subticks() {
        // Walk the swing through its damage frame in 1ms slivers: the window
        // spans many sub-ticks but the hit lands exactly once
        let mut state = RaidState::with_tuning(12, no_spawn_tuning());
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Archetype::Knight, state.player.pos, &state.tuning));
        // A knight one swing cannot quite kill
        state.enemies[0].health = state.tuning.melee_damage + 1.0;

        tick(&mut state, &TickInput { melee: true, ..Default::default() }, 1.0);
        for _ in 0..500 {
            tick(&mut state, &TickInput::default(), 1.0);
        }
        assert_eq!(state.enemies[0].health, 1.0);
    }
}
