//! Damage and destruction rules for each collision pair
//!
//! Bookkeeping (health, score, destroyed flags, events) always completes
//! before any effect is requested, so a renderer that cannot produce an
//! explosion never leaves the game state half-updated.

use glam::Vec3;

use super::asteroid::Asteroid;
use super::bullet::Bullet;
use super::collision::{HitSphereProvider, impact_point};
use super::effects::ExplosionKind;
use super::player::Player;
use super::state::{DamageOutcome, GameEvent, TickContext};
use crate::config::GameConfig;

/// Tunables for the damage protocol
#[derive(Debug, Clone)]
pub struct DamageRules {
    /// Damage the player takes from ramming an asteroid
    pub player_collision_damage: u32,
    /// Seconds of invulnerability after a hit
    pub invulnerability: f32,
    pub small_explosion_size: f32,
    pub explosion_size_factor: f32,
}

impl DamageRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            player_collision_damage: config.player.collision_damage,
            invulnerability: config.player.invulnerability,
            small_explosion_size: config.effects.small_explosion_size,
            explosion_size_factor: config.effects.explosion_size_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Player,
    Asteroid(u32),
    Bullet(u32),
}

/// Record of one resolved hit
#[derive(Debug, Clone, PartialEq)]
pub struct DamageEvent {
    pub attacker: EntityRef,
    pub victim: EntityRef,
    /// Damage actually applied (0 when blocked)
    pub amount: u32,
    pub impact_point: Vec3,
}

fn contact_point(a: &impl HitSphereProvider, b: &impl HitSphereProvider) -> Option<Vec3> {
    Some(impact_point(&a.hit_sphere()?, &b.hit_sphere()?))
}

fn explode(ctx: &mut TickContext, position: Vec3, size: f32, kind: ExplosionKind) {
    ctx.events.push(GameEvent::ExplosionSpawned { position, size, kind });
    ctx.effects.spawn(position, size, kind, ctx.visuals);
}

/// Player rams an asteroid.
///
/// The asteroid is destroyed on contact even while the player is
/// invulnerable; it never scores. The player only takes damage (and a fresh
/// invulnerability window) when not already invulnerable.
pub fn player_asteroid(
    player: &mut Player,
    asteroid: &mut Asteroid,
    rules: &DamageRules,
    ctx: &mut TickContext,
) -> Option<DamageEvent> {
    let point = contact_point(&*player, &*asteroid)?;

    let amount = match player.take_damage(rules.player_collision_damage) {
        DamageOutcome::Ignored => 0,
        DamageOutcome::Damaged { remaining } => {
            player.grant_invulnerability(rules.invulnerability);
            ctx.events.push(GameEvent::PlayerDamaged {
                amount: rules.player_collision_damage,
                health: remaining,
            });
            ctx.events.push(GameEvent::HealthChanged { health: remaining });
            rules.player_collision_damage
        }
        DamageOutcome::Destroyed => {
            ctx.events.push(GameEvent::PlayerDamaged {
                amount: rules.player_collision_damage,
                health: 0,
            });
            ctx.events.push(GameEvent::HealthChanged { health: 0 });
            ctx.events.push(GameEvent::PlayerDestroyed);
            rules.player_collision_damage
        }
    };

    if asteroid.destroy() {
        ctx.events.push(GameEvent::AsteroidDestroyed {
            id: asteroid.id,
            points: 0,
        });
        explode(ctx, point, asteroid.size * rules.explosion_size_factor, ExplosionKind::Full);
    }

    Some(DamageEvent {
        attacker: EntityRef::Asteroid(asteroid.id),
        victim: EntityRef::Player,
        amount,
        impact_point: point,
    })
}

/// Bullet strikes an asteroid. The bullet is always consumed.
pub fn bullet_asteroid(
    bullet: &mut Bullet,
    asteroid: &mut Asteroid,
    rules: &DamageRules,
    score: &mut u64,
    ctx: &mut TickContext,
) -> Option<DamageEvent> {
    let point = contact_point(&*bullet, &*asteroid)?;
    bullet.destroy();

    match asteroid.take_damage(bullet.damage) {
        DamageOutcome::Ignored => return None,
        DamageOutcome::Damaged { remaining } => {
            ctx.events.push(GameEvent::AsteroidHit {
                id: asteroid.id,
                remaining,
            });
            explode(ctx, point, rules.small_explosion_size, ExplosionKind::Small);
        }
        DamageOutcome::Destroyed => {
            let points = asteroid.points();
            *score += points;
            ctx.events.push(GameEvent::AsteroidDestroyed {
                id: asteroid.id,
                points,
            });
            ctx.events.push(GameEvent::ScoreChanged { score: *score });
            explode(ctx, point, asteroid.size * rules.explosion_size_factor, ExplosionKind::Full);
        }
    }

    Some(DamageEvent {
        attacker: EntityRef::Bullet(bullet.id),
        victim: EntityRef::Asteroid(asteroid.id),
        amount: bullet.damage,
        impact_point: point,
    })
}
