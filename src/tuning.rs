//! Data-driven game balance
//!
//! Every number a designer might want to move lives here. Defaults are the
//! shipped balance; the host can override any subset by handing
//! [`Tuning::from_json`] a partial JSON object.

use serde::{Deserialize, Serialize};

/// Gameplay tunables. All times are milliseconds, all distances are world
/// pixels, all speeds are pixels per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    // === Player ===
    pub player_speed: f32,
    pub player_radius: f32,
    pub player_max_health: f32,
    pub melee_range: f32,
    pub melee_damage: f32,
    pub melee_cooldown_ms: f32,
    pub shield_duration_ms: f32,
    pub shield_cooldown_ms: f32,

    // === Ultimate (bladestorm) ===
    pub charge_max: f32,
    pub charge_per_kill: f32,
    /// Mass-kill resolves after this long even if the host never signals
    /// cinematic completion.
    pub bladestorm_fallback_ms: f32,

    // === Enemies ===
    pub enemy_max_health: f32,
    pub enemy_base_speed: f32,
    /// Fraction added to enemy speed by the time the match clock reaches 0.
    pub enemy_speed_ramp: f32,
    pub knight_contact_range: f32,
    /// Extra distance a Knight tolerates before it breaks off an attack.
    pub knight_hysteresis: f32,
    pub knight_damage: f32,
    pub mage_attack_cooldown_ms: f32,
    pub mage_projectile_speed: f32,
    pub mage_projectile_radius: f32,
    pub mage_projectile_damage: f32,
    pub skeleton_attack_range: f32,
    pub skeleton_attack_cooldown_ms: f32,
    pub skeleton_damage: f32,

    // === Match & spawner ===
    pub match_duration_secs: f32,
    pub spawn_interval_start_ms: f32,
    pub spawn_interval_min_ms: f32,
    /// Inset from the arena edge so a fresh enemy is visible on appearance.
    pub spawn_edge_padding: f32,
    pub weight_skeleton: f32,
    pub weight_mage: f32,
    pub weight_knight: f32,
    /// Projectiles despawn this far outside the arena.
    pub projectile_bounds_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 260.0,
            player_radius: 26.0,
            player_max_health: 100.0,
            melee_range: 70.0,
            melee_damage: 40.0,
            melee_cooldown_ms: 600.0,
            shield_duration_ms: 3000.0,
            shield_cooldown_ms: 8000.0,

            charge_max: 100.0,
            charge_per_kill: 20.0,
            bladestorm_fallback_ms: 4000.0,

            enemy_max_health: 40.0,
            enemy_base_speed: 90.0,
            enemy_speed_ramp: 0.6,
            knight_contact_range: 60.0,
            knight_hysteresis: 12.0,
            knight_damage: 10.0,
            mage_attack_cooldown_ms: 2500.0,
            mage_projectile_speed: 320.0,
            mage_projectile_radius: 8.0,
            mage_projectile_damage: 8.0,
            skeleton_attack_range: 80.0,
            skeleton_attack_cooldown_ms: 1500.0,
            skeleton_damage: 12.0,

            match_duration_secs: 60.0,
            spawn_interval_start_ms: 2200.0,
            spawn_interval_min_ms: 700.0,
            spawn_edge_padding: 40.0,
            weight_skeleton: 0.3,
            weight_mage: 0.3,
            weight_knight: 0.4,
            projectile_bounds_margin: 60.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override. Unknown keys are rejected
    /// loudly rather than silently ignored.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Effective range inside which an attacking Knight still connects.
    pub fn knight_strike_range(&self) -> f32 {
        self.knight_contact_range + self.knight_hysteresis
    }
}
