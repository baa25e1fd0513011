//! Asteroids and the pooled manager that spawns, moves and retires them
//!
//! The asteroid manager runs after the bullet manager each tick, so it owns
//! the bullet-vs-asteroid pass as well as player-vs-asteroid. Anything
//! flagged destroyed is skipped by every later pass in the same tick and
//! swept back into the pool at the end of the update.

use glam::Vec3;

use super::bullet::BulletManager;
use super::collision::{HitSphere, HitSphereProvider, overlaps};
use super::damage::{self, DamageRules};
use super::movement::{MovementPattern, PatternKind};
use super::player::Player;
use super::pool::{Handle, Pool};
use super::state::{DamageOutcome, GameEvent, TickContext};
use crate::config::{AsteroidConfig, FieldConfig, GameConfig};
use crate::consts::PLAY_DEPTH;
use crate::math::random_between;
use crate::visual::{VisualKind, VisualQueue, VisualSlot, VisualTarget};

/// Keeps spawns away from the top/bottom edge
const SPAWN_EDGE_MARGIN: f32 = 1.5;

#[derive(Debug, Clone, Default)]
pub struct Asteroid {
    pub id: u32,
    pub position: Vec3,
    /// Euler rotation (cosmetic)
    pub rotation: Vec3,
    /// Spin rate per axis (radians/s)
    pub spin: Vec3,
    pub size: f32,
    /// Leftward drift speed
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    pub hit_radius: f32,
    pub pattern: MovementPattern,
    /// Seconds since spawn, drives time-based patterns
    pub pattern_time: f32,
    pub is_destroyed: bool,
    pub visual: VisualSlot,
}

impl Asteroid {
    /// Advance movement and spin
    pub fn update(&mut self, dt: f32) {
        if self.is_destroyed {
            return;
        }
        self.pattern_time += dt;
        self.pattern
            .step(&mut self.position, self.speed, self.pattern_time, dt);
        self.rotation += self.spin * dt;
    }

    /// Apply damage. Reaching 0 destroys the asteroid exactly once.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if self.is_destroyed {
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

    /// Flag as destroyed. Returns true only on the first call.
    pub fn destroy(&mut self) -> bool {
        if self.is_destroyed {
            return false;
        }
        self.is_destroyed = true;
        true
    }

    /// Score awarded for shooting it down
    pub fn points(&self) -> u64 {
        self.size.floor().max(0.0) as u64
    }
}

impl HitSphereProvider for Asteroid {
    fn hit_sphere(&self) -> Option<HitSphere> {
        (!self.is_destroyed).then(|| HitSphere::new(self.position, self.hit_radius))
    }
}

/// Owns every live asteroid plus the score they are worth
#[derive(Debug)]
pub struct AsteroidManager {
    pool: Pool<Asteroid>,
    config: AsteroidConfig,
    field: FieldConfig,
    /// Seconds accumulated toward the next spawn
    spawn_timer: f32,
    next_id: u32,
    score: u64,
}

impl AsteroidManager {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pool: Pool::new(config.asteroids.capacity, config.asteroids.expandable),
            config: config.asteroids.clone(),
            field: config.field.clone(),
            spawn_timer: 0.0,
            next_id: 1,
            score: 0,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn pool(&self) -> &Pool<Asteroid> {
        &self.pool
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Asteroid)> {
        self.pool.iter()
    }

    pub fn get(&self, handle: Handle) -> Option<&Asteroid> {
        self.pool.get(handle)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Asteroid> {
        self.pool.get_mut(handle)
    }

    /// Visual slot of a live, non-destroyed asteroid
    pub fn visual_slot_mut(&mut self, handle: Handle) -> Option<&mut VisualSlot> {
        self.pool
            .get_mut(handle)
            .filter(|a| !a.is_destroyed)
            .map(|a| &mut a.visual)
    }

    /// One tick: spawn on cadence, move, collide, retire
    pub fn update(
        &mut self,
        dt: f32,
        player: &mut Player,
        bullets: &mut BulletManager,
        rules: &DamageRules,
        ctx: &mut TickContext,
    ) {
        // Accumulator-based so cadence is independent of frame rate
        self.spawn_timer += dt;
        let interval = 1.0 / self.config.spawns_per_second;
        while self.spawn_timer >= interval {
            self.spawn_timer -= interval;
            self.spawn(ctx);
        }

        for (_, asteroid) in self.pool.iter_mut() {
            asteroid.update(dt);
        }

        self.resolve_collisions(player, bullets, rules, ctx);

        let despawn_x = self.field.despawn_x();
        for (_, asteroid) in self.pool.iter_mut() {
            if !asteroid.is_destroyed && asteroid.position.x + asteroid.hit_radius < despawn_x {
                asteroid.destroy();
                ctx.events.push(GameEvent::AsteroidEscaped { id: asteroid.id });
            }
        }

        self.sweep(ctx.visuals);
        bullets.sweep(ctx.visuals);
    }

    fn resolve_collisions(
        &mut self,
        player: &mut Player,
        bullets: &mut BulletManager,
        rules: &DamageRules,
        ctx: &mut TickContext,
    ) {
        for (_, asteroid) in self.pool.iter_mut() {
            if asteroid.is_destroyed {
                continue;
            }

            if overlaps(&*player, &*asteroid) {
                if let Some(hit) = damage::player_asteroid(player, asteroid, rules, ctx) {
                    log::trace!("{hit:?}");
                }
                // Asteroid is gone either way
                continue;
            }

            for (_, bullet) in bullets.iter_mut() {
                if bullet.is_destroyed || !overlaps(&*bullet, &*asteroid) {
                    continue;
                }
                if let Some(hit) = damage::bullet_asteroid(bullet, asteroid, rules, &mut self.score, ctx) {
                    log::trace!("{hit:?}");
                }
                if asteroid.is_destroyed {
                    break;
                }
            }
        }
    }

    /// Spawn one asteroid just past the right edge with random size, speed,
    /// spin and movement pattern. Returns `None` when the pool is full.
    pub fn spawn(&mut self, ctx: &mut TickContext) -> Option<Handle> {
        let size = random_between(ctx.rng, self.config.size_min, self.config.size_max);
        let speed = random_between(ctx.rng, self.config.speed_min, self.config.speed_max);
        let max_spin = self.config.rotation_speed_max;
        let spin = Vec3::new(
            random_between(ctx.rng, -max_spin, max_spin),
            random_between(ctx.rng, -max_spin, max_spin),
            random_between(ctx.rng, -max_spin, max_spin),
        );
        let y = random_between(
            ctx.rng,
            self.field.min_y + SPAWN_EDGE_MARGIN,
            self.field.max_y - SPAWN_EDGE_MARGIN,
        );
        let position = Vec3::new(self.field.spawn_x(), y, PLAY_DEPTH);

        let pattern = match &self.config.forced_pattern {
            Some(name) => MovementPattern::from_name(name, ctx.rng, position, &self.field),
            None => {
                let kind = PatternKind::choose(ctx.rng, &self.config.pattern_weights);
                MovementPattern::new(kind, ctx.rng, position, &self.field)
            }
        };

        let handle = self.spawn_at(position, size, speed, pattern, ctx)?;
        if let Some(asteroid) = self.pool.get_mut(handle) {
            asteroid.spin = spin;
        }
        Some(handle)
    }

    /// Place an asteroid with explicit parameters
    pub fn spawn_at(
        &mut self,
        position: Vec3,
        size: f32,
        speed: f32,
        pattern: MovementPattern,
        ctx: &mut TickContext,
    ) -> Option<Handle> {
        let Some((handle, asteroid)) = self.pool.acquire() else {
            log::debug!(
                "asteroid pool full ({} active), skipping spawn",
                self.pool.active_count()
            );
            return None;
        };

        let id = self.next_id;
        self.next_id += 1;
        let kind = pattern.kind();
        // Recycled slots keep their visual so it can be shown again
        let visual = asteroid.visual;
        *asteroid = Asteroid {
            id,
            position,
            rotation: Vec3::ZERO,
            spin: Vec3::ZERO,
            size,
            speed,
            health: self.config.health,
            max_health: self.config.health,
            hit_radius: size * self.config.hit_radius_factor,
            pattern,
            pattern_time: 0.0,
            is_destroyed: false,
            visual,
        };
        ctx.visuals.attach(
            &mut asteroid.visual,
            VisualTarget::Asteroid(handle),
            VisualKind::Asteroid,
            size,
        );
        ctx.events.push(GameEvent::AsteroidSpawned { id, pattern: kind });
        Some(handle)
    }

    /// Return destroyed asteroids to the pool
    fn sweep(&mut self, visuals: &mut VisualQueue) {
        for handle in self.pool.handles_where(|a| a.is_destroyed) {
            if let Some(asteroid) = self.pool.get_mut(handle) {
                visuals.detach(&mut asteroid.visual, VisualKind::Asteroid);
            }
            self.pool.release(handle);
        }
    }

    /// Destroy and recycle everything; zero the score and spawn timer
    pub fn reset(&mut self, visuals: &mut VisualQueue) {
        for (_, asteroid) in self.pool.iter_mut() {
            asteroid.destroy();
        }
        self.sweep(visuals);
        self.spawn_timer = 0.0;
        self.score = 0;
    }
}
