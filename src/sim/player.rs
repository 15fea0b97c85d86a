//! Player controller
//!
//! Maps the held-key set and command edges onto the player state machine.
//! Dead is absorbing; Attacking locks state and movement until the swing
//! clip completes. Disallowed commands are rejected silently — no error, no
//! state mutation.

use glam::Vec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::state::{Player, PlayerState};
use crate::sim::tick::TickInput;
use crate::tuning::Tuning;

/// Velocity retained per tick once input is released
const DRIFT_DECAY: f32 = 0.75;

/// Step (2): cooldown and shield bookkeeping. All timers freeze once the
/// player is dead.
pub fn tick_timers(player: &mut Player, tuning: &Tuning, dt_ms: f32) {
    if !player.alive() {
        return;
    }
    player.melee_cooldown_ms = (player.melee_cooldown_ms - dt_ms).max(0.0);
    if player.shield_active {
        player.shield_remaining_ms -= dt_ms;
        if player.shield_remaining_ms <= 0.0 {
            player.shield_active = false;
            player.shield_remaining_ms = 0.0;
            player.shield_cooldown_ms = tuning.shield_cooldown_ms;
        }
    } else {
        player.shield_cooldown_ms = (player.shield_cooldown_ms - dt_ms).max(0.0);
    }
}

/// Melee command edge. Accepted only outside Attacking/Dead with the
/// cooldown elapsed; forces the swing immediately. Damage lands later, on
/// the swing clip's trigger frame.
pub fn try_melee(player: &mut Player, tuning: &Tuning) -> bool {
    if matches!(player.state, PlayerState::Attacking | PlayerState::Dead) {
        return false;
    }
    if player.melee_cooldown_ms > 0.0 {
        return false;
    }
    player.set_state(PlayerState::Attacking);
    player.melee_cooldown_ms = tuning.melee_cooldown_ms;
    true
}

/// Shield command edge. One activation at a time, gated by its own cooldown.
pub fn try_shield(player: &mut Player, tuning: &Tuning) -> bool {
    if !player.alive() || player.shield_active || player.shield_cooldown_ms > 0.0 {
        return false;
    }
    player.shield_active = true;
    player.shield_remaining_ms = tuning.shield_duration_ms;
    true
}

/// Step (3): resolve the movement state and integrate position.
pub fn update_movement(player: &mut Player, input: &TickInput, tuning: &Tuning, dt_ms: f32) {
    match player.state {
        PlayerState::Dead => return,
        // Locked: no state changes, no movement integration
        PlayerState::Attacking => return,
        _ => {}
    }

    let dir = input.move_dir();
    if dir != Vec2::ZERO {
        player.set_state(PlayerState::Running);
        player.vel = dir * tuning.player_speed;
        if dir.x != 0.0 {
            player.facing = dir.x.signum();
        }
    } else {
        player.set_state(PlayerState::Idle);
        player.vel *= DRIFT_DECAY;
    }

    player.pos += player.vel * (dt_ms / 1000.0);
    let r = tuning.player_radius;
    player.pos.x = player.pos.x.clamp(r, ARENA_WIDTH - r);
    player.pos.y = player.pos.y.clamp(r, ARENA_HEIGHT - r);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation;

    fn setup() -> (Player, Tuning) {
        let tuning = Tuning::default();
        (Player::new(&tuning), tuning)
    }

    #[test]
    fn test_running_and_drift_decay() {
        let (mut player, tuning) = setup();
        let held = TickInput { right: true, ..Default::default() };
        update_movement(&mut player, &held, &tuning, 50.0);
        assert_eq!(player.state, PlayerState::Running);
        assert_eq!(player.vel.x, tuning.player_speed);
        assert_eq!(player.facing, 1.0);

        let x_after_hold = player.pos.x;
        update_movement(&mut player, &TickInput::default(), &tuning, 50.0);
        assert_eq!(player.state, PlayerState::Idle);
        // Velocity decays geometrically rather than stopping dead
        assert_eq!(player.vel.x, tuning.player_speed * 0.75);
        assert!(player.pos.x > x_after_hold);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let (mut player, tuning) = setup();
        let held = TickInput { up: true, right: true, ..Default::default() };
        update_movement(&mut player, &held, &tuning, 50.0);
        assert!((player.vel.length() - tuning.player_speed).abs() < 1e-3);
    }

    #[test]
    fn test_position_clamped_to_arena() {
        let (mut player, tuning) = setup();
        player.pos = Vec2::new(tuning.player_radius + 1.0, 300.0);
        let held = TickInput { left: true, ..Default::default() };
        for _ in 0..100 {
            update_movement(&mut player, &held, &tuning, 50.0);
        }
        assert_eq!(player.pos.x, tuning.player_radius);
    }

    #[test]
    fn test_melee_gating() {
        let (mut player, tuning) = setup();
        assert!(try_melee(&mut player, &tuning));
        assert_eq!(player.state, PlayerState::Attacking);
        assert_eq!(player.melee_cooldown_ms, tuning.melee_cooldown_ms);

        // Rejected while the swing is in flight
        assert!(!try_melee(&mut player, &tuning));

        // Back to idle but still on cooldown: rejected without mutation
        player.set_state(PlayerState::Idle);
        assert!(!try_melee(&mut player, &tuning));
        assert_eq!(player.state, PlayerState::Idle);

        tick_timers(&mut player, &tuning, tuning.melee_cooldown_ms);
        assert!(try_melee(&mut player, &tuning));
    }

    #[test]
    fn test_attacking_locks_movement() {
        let (mut player, tuning) = setup();
        assert!(try_melee(&mut player, &tuning));
        let pos = player.pos;
        let held = TickInput { right: true, ..Default::default() };
        update_movement(&mut player, &held, &tuning, 50.0);
        assert_eq!(player.state, PlayerState::Attacking);
        assert_eq!(player.pos, pos);
    }

    #[test]
    fn test_shield_lifecycle() {
        let (mut player, tuning) = setup();
        assert!(try_shield(&mut player, &tuning));
        assert!(player.shield_active);
        // Re-activation while active is rejected
        assert!(!try_shield(&mut player, &tuning));

        // Expires, then its cooldown gates the next use
        tick_timers(&mut player, &tuning, tuning.shield_duration_ms);
        assert!(!player.shield_active);
        assert_eq!(player.shield_cooldown_ms, tuning.shield_cooldown_ms);
        assert!(!try_shield(&mut player, &tuning));
        tick_timers(&mut player, &tuning, tuning.shield_cooldown_ms);
        assert!(try_shield(&mut player, &tuning));
    }

    #[test]
    fn test_dead_rejects_everything() {
        let (mut player, tuning) = setup();
        player.apply_damage(1000.0, tuning.player_max_health);
        let pos = player.pos;
        assert!(!try_melee(&mut player, &tuning));
        assert!(!try_shield(&mut player, &tuning));
        let held = TickInput { down: true, ..Default::default() };
        update_movement(&mut player, &held, &tuning, 50.0);
        tick_timers(&mut player, &tuning, 50.0);
        assert_eq!(player.state, PlayerState::Dead);
        assert_eq!(player.pos, pos);
    }

    #[test]
    fn test_new_swing_rearms_damage_guard() {
        let (mut player, tuning) = setup();
        assert!(try_melee(&mut player, &tuning));
        player.swing_hit = true;
        // Finish the swing, wait out the cooldown, swing again
        player.set_state(PlayerState::Idle);
        tick_timers(&mut player, &tuning, tuning.melee_cooldown_ms);
        assert!(try_melee(&mut player, &tuning));
        assert!(!player.swing_hit);
        assert_eq!(player.anim, animation::AnimClock::default());
    }
}
