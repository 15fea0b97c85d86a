//! Collision resolution and damage application
//!
//! All damage in the game flows through here: the player's swing window,
//! the Knight/Skeleton contact windows, projectile impacts, and the
//! bladestorm mass-kill. Damage windows are idempotent per cycle via the
//! per-entity flags; resetting those flags belongs to the state-transition
//! logic, never to this module.

use glam::Vec2;
use log::{debug, info};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::animation::{enemy_clip, player_clip};
use crate::sim::state::{
    Archetype, Enemy, EnemyState, MAX_PARTICLES, Particle, Player, PlayerState, Projectile,
};
use crate::tuning::Tuning;
use crate::{circles_overlap, dir_to, dist};

/// Particle palette indices understood by the render adapter
pub const COLOR_KILL: u32 = 0;
pub const COLOR_PLAYER_HIT: u32 = 1;
pub const COLOR_PROJECTILE: u32 = 2;

/// Deterministic particle burst. Spread comes from a Knuth-style hash of
/// the seed so the same tick always produces the same debris.
pub fn burst(particles: &mut Vec<Particle>, pos: Vec2, color: u32, count: u32, seed: u32) {
    for i in 0..count {
        if particles.len() >= MAX_PARTICLES {
            particles.remove(0);
        }
        let hash = seed.wrapping_mul(2654435761).wrapping_add(i.wrapping_mul(7919));
        let angle = (hash % 1000) as f32 / 1000.0 * std::f32::consts::TAU;
        let speed = 60.0 + ((hash >> 10) % 1000) as f32 / 1000.0 * 160.0;
        let size = 2.0 + ((hash >> 20) % 100) as f32 / 100.0 * 3.0;
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            size,
            color,
        });
    }
}

/// Step (10): integrate and prune particles.
pub fn age_particles(particles: &mut Vec<Particle>, dt_ms: f32) {
    let dt = dt_ms / 1000.0;
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel *= 0.94;
        particle.life -= dt * 1.8;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Player melee resolution, fired from step (4) once the swing clip reaches
/// its damage frame. One window can fell several enemies at once; each kill
/// feeds the ultimate charge.
pub fn fire_player_window(
    player: &mut Player,
    enemies: &mut [Enemy],
    particles: &mut Vec<Particle>,
    charge: &mut f32,
    tuning: &Tuning,
    tick_seed: u32,
) {
    if player.state != PlayerState::Attacking || player.swing_hit {
        return;
    }
    if !player_clip(PlayerState::Attacking).trigger_reached(&player.anim) {
        return;
    }
    player.swing_hit = true;

    for enemy in enemies.iter_mut() {
        if !enemy.alive() || dist(player.pos, enemy.pos) > tuning.melee_range {
            continue;
        }
        enemy.health -= tuning.melee_damage;
        if enemy.health <= 0.0 {
            enemy.enter_death();
            *charge = (*charge + tuning.charge_per_kill).min(tuning.charge_max);
            burst(particles, enemy.pos, COLOR_KILL, 18, tick_seed ^ enemy.id);
            debug!("enemy {} slain by melee, charge {:.0}", enemy.id, *charge);
        } else {
            burst(particles, enemy.pos, COLOR_KILL, 6, tick_seed ^ enemy.id);
        }
    }
}

/// Enemy attack windows, fired from step (6) after the enemy's clock has
/// advanced. Knights/Skeletons land contact damage; Mages loose exactly one
/// projectile per cast, aimed at where the player stands right now.
pub fn fire_enemy_window(
    enemy: &mut Enemy,
    player: &mut Player,
    projectiles: &mut Vec<Projectile>,
    particles: &mut Vec<Particle>,
    tuning: &Tuning,
    tick_seed: u32,
) {
    if enemy.state != EnemyState::Attacking {
        return;
    }
    let clip = enemy_clip(enemy.archetype, EnemyState::Attacking);
    if !clip.trigger_reached(&enemy.anim) {
        return;
    }

    match enemy.archetype {
        Archetype::Knight | Archetype::Skeleton => {
            if enemy.damage_dealt {
                return;
            }
            enemy.damage_dealt = true;
            let (range, damage) = match enemy.archetype {
                Archetype::Knight => (tuning.knight_strike_range(), tuning.knight_damage),
                _ => (tuning.skeleton_attack_range, tuning.skeleton_damage),
            };
            if !player.alive() || dist(enemy.pos, player.pos) > range {
                return;
            }
            burst(particles, player.pos, COLOR_PLAYER_HIT, 10, tick_seed ^ enemy.id);
            if !player.shield_active
                && player.apply_damage(damage, tuning.player_max_health)
            {
                info!("player slain by enemy {}", enemy.id);
            }
        }
        Archetype::Mage => {
            if enemy.projectile_spawned {
                return;
            }
            enemy.projectile_spawned = true;
            // Aimed at the player's position at spawn time; never homes
            let dir = dir_to(enemy.pos, player.pos);
            projectiles.push(Projectile {
                pos: enemy.pos,
                vel: dir * tuning.mage_projectile_speed,
                radius: tuning.mage_projectile_radius,
                done: false,
            });
            debug!("mage {} fired projectile", enemy.id);
        }
    }
}

/// Step (8): integrate projectiles, resolve player hits, prune resolved
/// ones. A projectile affects state at most once.
pub fn step_projectiles(
    projectiles: &mut Vec<Projectile>,
    player: &mut Player,
    particles: &mut Vec<Particle>,
    tuning: &Tuning,
    dt_ms: f32,
    tick_seed: u32,
) {
    let dt = dt_ms / 1000.0;
    let margin = tuning.projectile_bounds_margin;
    for (i, projectile) in projectiles.iter_mut().enumerate() {
        if projectile.done {
            continue;
        }
        projectile.pos += projectile.vel * dt;

        let p = projectile.pos;
        if p.x < -margin || p.x > ARENA_WIDTH + margin || p.y < -margin || p.y > ARENA_HEIGHT + margin
        {
            projectile.done = true;
            continue;
        }

        if player.alive()
            && circles_overlap(p, projectile.radius, player.pos, tuning.player_radius)
        {
            projectile.done = true;
            burst(
                particles,
                p,
                COLOR_PROJECTILE,
                8,
                tick_seed.wrapping_add(i as u32 * 31337),
            );
            if !player.shield_active
                && player.apply_damage(tuning.mage_projectile_damage, tuning.player_max_health)
            {
                info!("player slain by projectile");
            }
        }
    }
    projectiles.retain(|p| !p.done);
}

/// Deferred bladestorm resolution: force every enemy still alive onto its
/// death path. Enemies already dying keep their clip; this never re-kills.
pub fn resolve_bladestorm(enemies: &mut [Enemy], particles: &mut Vec<Particle>, tick_seed: u32) {
    let mut felled = 0u32;
    for enemy in enemies.iter_mut() {
        if enemy.alive() {
            enemy.health = 0.0;
            enemy.enter_death();
            burst(particles, enemy.pos, COLOR_KILL, 14, tick_seed ^ enemy.id);
            felled += 1;
        }
    }
    info!("bladestorm resolved, {felled} enemies felled");
}
