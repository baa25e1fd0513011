//! The player ship
//!
//! Created once per game and reset in place on restart, so its visual
//! survives across runs.

use glam::Vec3;

use super::collision::{HitSphere, HitSphereProvider};
use super::state::DamageOutcome;
use super::tick::TickInput;
use crate::config::{FieldConfig, PlayerConfig};
use crate::consts::PLAY_DEPTH;
use crate::math::lerp;
use crate::visual::VisualSlot;

/// Bank angle per unit of vertical speed (cosmetic)
const ROLL_PER_SPEED: f32 = 0.04;

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Banking for the visual, follows vertical velocity
    pub roll: f32,
    pub hit_radius: f32,
    pub health: u32,
    pub max_health: u32,
    /// Seconds of invulnerability left
    pub invulnerable_timer: f32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
    pub is_destroyed: bool,
    pub visual: VisualSlot,
}

impl Player {
    pub fn new(config: &PlayerConfig, field: &FieldConfig) -> Self {
        let mut player = Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            roll: 0.0,
            hit_radius: config.hit_radius,
            health: config.max_health,
            max_health: config.max_health,
            invulnerable_timer: 0.0,
            fire_cooldown: 0.0,
            is_destroyed: false,
            visual: VisualSlot::Placeholder,
        };
        player.reset(config, field);
        player
    }

    /// Back to full health at the start position. Keeps the visual.
    pub fn reset(&mut self, config: &PlayerConfig, field: &FieldConfig) {
        self.position = Vec3::new(
            lerp(field.min_x, field.max_x, config.start_x_fraction),
            (field.min_y + field.max_y) / 2.0,
            PLAY_DEPTH,
        );
        self.velocity = Vec3::ZERO;
        self.roll = 0.0;
        self.hit_radius = config.hit_radius;
        self.health = config.max_health;
        self.max_health = config.max_health;
        self.invulnerable_timer = 0.0;
        self.fire_cooldown = 0.0;
        self.is_destroyed = false;
    }

    /// Thrust, drag, speed cap and field clamping, plus timer decay
    pub fn update(&mut self, dt: f32, input: &TickInput, config: &PlayerConfig, field: &FieldConfig) {
        if self.is_destroyed {
            return;
        }

        self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);

        let thrust = Vec3::new(input.move_x, input.move_y, 0.0).clamp_length_max(1.0);
        self.velocity += thrust * config.acceleration * dt;
        self.velocity *= (-config.drag * dt).exp();
        self.velocity = self.velocity.clamp_length_max(config.max_speed);

        self.position += self.velocity * dt;
        let r = self.hit_radius;
        let clamped_x = self.position.x.clamp(field.min_x + r, field.max_x - r);
        let clamped_y = self.position.y.clamp(field.min_y + r, field.max_y - r);
        // Kill velocity into the wall so the ship doesn't stick to it
        if clamped_x != self.position.x {
            self.velocity.x = 0.0;
        }
        if clamped_y != self.position.y {
            self.velocity.y = 0.0;
        }
        self.position = Vec3::new(clamped_x, clamped_y, PLAY_DEPTH);
        self.roll = -self.velocity.y * ROLL_PER_SPEED;
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    /// Start a fresh invulnerability window (replaces, never stacks)
    pub fn grant_invulnerability(&mut self, duration: f32) {
        self.invulnerable_timer = duration;
    }

    /// Apply damage unless destroyed or invulnerable. Health never goes below 0.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_destroyed || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.is_destroyed = true;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Damaged {
                remaining: self.health,
            }
        }
    }

    pub fn can_fire(&self) -> bool {
        !self.is_destroyed && self.fire_cooldown <= 0.0
    }

    pub fn consume_fire(&mut self, cooldown: f32) {
        self.fire_cooldown = cooldown;
    }

    /// Where bullets leave the ship
    pub fn muzzle(&self) -> Vec3 {
        self.position + Vec3::new(self.hit_radius, 0.0, 0.0)
    }

    /// Euler rotation for the visual
    pub fn rotation(&self) -> Vec3 {
        Vec3::new(self.roll, 0.0, 0.0)
    }
}

impl HitSphereProvider for Player {
    fn hit_sphere(&self) -> Option<HitSphere> {
        (!self.is_destroyed).then(|| HitSphere::new(self.position, self.hit_radius))
    }
}
