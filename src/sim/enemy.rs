//! Enemy behavior set
//!
//! Three archetypes share one state enumeration but transition on different
//! predicates:
//! - Knight: contact melee, gated by proximity alone, looping attack
//! - Mage: walks straight at the player and fires on a cooldown, at any range
//! - Skeleton: chases to melee range, swings on a cooldown, holds otherwise
//!
//! This runs transitions and movement only; damage windows and projectile
//! spawns fire from the animation clocks in `combat`.

use glam::Vec2;

use crate::dir_to;
use crate::sim::state::{Archetype, Enemy, EnemyState};
use crate::tuning::Tuning;

/// Step (5): per-enemy transition + movement. `speed_scale` is the global
/// time-scaled difficulty multiplier.
pub fn update(enemy: &mut Enemy, player_pos: Vec2, tuning: &Tuning, speed_scale: f32, dt_ms: f32) {
    // Entities on their death path take no further behavior updates
    if !enemy.alive() {
        return;
    }
    debug_assert!(enemy.health > 0.0, "live enemy with non-positive health");

    match enemy.archetype {
        Archetype::Knight => update_knight(enemy, player_pos, tuning, speed_scale, dt_ms),
        Archetype::Mage => update_mage(enemy, player_pos, tuning, speed_scale, dt_ms),
        Archetype::Skeleton => update_skeleton(enemy, player_pos, tuning, speed_scale, dt_ms),
    }
}

fn face(enemy: &mut Enemy, target: Vec2) {
    let dx = target.x - enemy.pos.x;
    if dx != 0.0 {
        enemy.facing = dx.signum();
    }
}

fn chase(enemy: &mut Enemy, player_pos: Vec2, tuning: &Tuning, speed_scale: f32, dt_ms: f32) {
    let dir = dir_to(enemy.pos, player_pos);
    enemy.pos += dir * tuning.enemy_base_speed * speed_scale * (dt_ms / 1000.0);
    face(enemy, player_pos);
}

/// Contact radius in, contact radius + hysteresis out. Leaving mid-swing
/// cancels any pending hit: the reset back to Running re-arms the damage
/// flag exactly like a loop wrap does.
fn update_knight(enemy: &mut Enemy, player_pos: Vec2, tuning: &Tuning, speed_scale: f32, dt_ms: f32) {
    let d = crate::dist(enemy.pos, player_pos);
    match enemy.state {
        EnemyState::Running => {
            if d <= tuning.knight_contact_range {
                enemy.set_state(EnemyState::Attacking);
                face(enemy, player_pos);
            } else {
                chase(enemy, player_pos, tuning, speed_scale, dt_ms);
            }
        }
        EnemyState::Attacking => {
            if d > tuning.knight_contact_range + tuning.knight_hysteresis {
                enemy.set_state(EnemyState::Running);
            } else {
                face(enemy, player_pos);
            }
        }
        _ => {}
    }
}

/// No standoff distance: a Mage keeps walking at the player until its
/// cooldown elapses, then casts from wherever it stands.
fn update_mage(enemy: &mut Enemy, player_pos: Vec2, tuning: &Tuning, speed_scale: f32, dt_ms: f32) {
    match enemy.state {
        EnemyState::Running => {
            enemy.attack_cooldown_ms = (enemy.attack_cooldown_ms - dt_ms).max(0.0);
            if enemy.attack_cooldown_ms <= 0.0 {
                enemy.set_state(EnemyState::Attacking);
                face(enemy, player_pos);
            } else {
                chase(enemy, player_pos, tuning, speed_scale, dt_ms);
            }
        }
        // Casting is stationary; the projectile frame fires in combat
        EnemyState::Attacking => face(enemy, player_pos),
        _ => {}
    }
}

/// Chase while out of range; in range, swing if the cooldown allows, else
/// stand fast until one condition clears.
fn update_skeleton(
    enemy: &mut Enemy,
    player_pos: Vec2,
    tuning: &Tuning,
    speed_scale: f32,
    dt_ms: f32,
) {
    match enemy.state {
        EnemyState::Running => {
            enemy.attack_cooldown_ms = (enemy.attack_cooldown_ms - dt_ms).max(0.0);
            let d = crate::dist(enemy.pos, player_pos);
            if d > tuning.skeleton_attack_range {
                chase(enemy, player_pos, tuning, speed_scale, dt_ms);
            } else if enemy.attack_cooldown_ms <= 0.0 {
                enemy.set_state(EnemyState::Attacking);
                face(enemy, player_pos);
            } else {
                // In range but on cooldown: hold position
                face(enemy, player_pos);
            }
        }
        EnemyState::Attacking => face(enemy, player_pos),
        _ => {}
    }
}
