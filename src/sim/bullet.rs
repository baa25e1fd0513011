//! Player bullets
//!
//! Bullets fly in a straight line until they expire, leave the field or hit
//! an asteroid. Collision is resolved by the asteroid manager.

use glam::Vec3;

use super::collision::{HitSphere, HitSphereProvider};
use super::pool::{Handle, Pool};
use super::state::GameEvent;
use crate::config::{BulletConfig, FieldConfig, GameConfig};
use crate::on_play_plane;
use crate::visual::{VisualKind, VisualQueue, VisualSlot, VisualTarget};

#[derive(Debug, Clone, Default)]
pub struct Bullet {
    pub id: u32,
    pub position: Vec3,
    /// Unit travel direction
    pub direction: Vec3,
    pub speed: f32,
    pub damage: u32,
    /// Seconds left to live
    pub lifetime: f32,
    pub hit_radius: f32,
    pub is_destroyed: bool,
    pub visual: VisualSlot,
}

impl Bullet {
    /// Flag as destroyed. Returns true only on the first call.
    pub fn destroy(&mut self) -> bool {
        if self.is_destroyed {
            return false;
        }
        self.is_destroyed = true;
        true
    }
}

impl HitSphereProvider for Bullet {
    fn hit_sphere(&self) -> Option<HitSphere> {
        (!self.is_destroyed).then(|| HitSphere::new(self.position, self.hit_radius))
    }
}

#[derive(Debug)]
pub struct BulletManager {
    pool: Pool<Bullet>,
    config: BulletConfig,
    field: FieldConfig,
    next_id: u32,
}

impl BulletManager {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pool: Pool::new(config.bullets.capacity, config.bullets.expandable),
            config: config.bullets.clone(),
            field: config.field.clone(),
            next_id: 1,
        }
    }

    /// Launch a bullet. Returns `None` when the pool is exhausted.
    pub fn fire(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        visuals: &mut VisualQueue,
        events: &mut Vec<GameEvent>,
    ) -> Option<Handle> {
        let Some((handle, bullet)) = self.pool.acquire() else {
            log::debug!("bullet pool exhausted");
            return None;
        };

        let id = self.next_id;
        self.next_id += 1;
        let visual = bullet.visual;
        *bullet = Bullet {
            id,
            position: on_play_plane(origin),
            direction: direction.try_normalize().unwrap_or(Vec3::X),
            speed: self.config.speed,
            damage: self.config.damage,
            lifetime: self.config.lifetime,
            hit_radius: self.config.hit_radius,
            is_destroyed: false,
            visual,
        };
        visuals.attach(&mut bullet.visual, VisualTarget::Bullet(handle), VisualKind::Bullet, 1.0);
        events.push(GameEvent::BulletFired { id });
        Some(handle)
    }

    /// Move bullets and retire the expired or off-field ones
    pub fn update(&mut self, dt: f32, visuals: &mut VisualQueue) {
        let field = &self.field;
        let min_x = field.despawn_x();
        let max_x = field.spawn_x();
        for (_, bullet) in self.pool.iter_mut() {
            if bullet.is_destroyed {
                continue;
            }
            bullet.position += bullet.direction * bullet.speed * dt;
            bullet.lifetime -= dt;
            let p = bullet.position;
            let outside = p.x < min_x || p.x > max_x || p.y < field.min_y || p.y > field.max_y;
            if bullet.lifetime <= 0.0 || outside {
                bullet.destroy();
            }
        }
        self.sweep(visuals);
    }

    /// Return destroyed bullets to the pool
    pub fn sweep(&mut self, visuals: &mut VisualQueue) {
        for handle in self.pool.handles_where(|b| b.is_destroyed) {
            if let Some(bullet) = self.pool.get_mut(handle) {
                visuals.detach(&mut bullet.visual, VisualKind::Bullet);
            }
            self.pool.release(handle);
        }
    }

    pub fn reset(&mut self, visuals: &mut VisualQueue) {
        for (_, bullet) in self.pool.iter_mut() {
            bullet.destroy();
        }
        self.sweep(visuals);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Bullet)> {
        self.pool.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut Bullet)> {
        self.pool.iter_mut()
    }

    pub fn get(&self, handle: Handle) -> Option<&Bullet> {
        self.pool.get(handle)
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn visual_slot_mut(&mut self, handle: Handle) -> Option<&mut VisualSlot> {
        self.pool
            .get_mut(handle)
            .filter(|b| !b.is_destroyed)
            .map(|b| &mut b.visual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelPaths;
    use crate::visual::{VisualCommand, VisualId};

    fn manager(capacity: usize) -> (BulletManager, VisualQueue, Vec<GameEvent>) {
        let mut config = GameConfig::default();
        config.bullets.capacity = capacity;
        (
            BulletManager::new(&config),
            VisualQueue::new(ModelPaths::default()),
            Vec::new(),
        )
    }

    #[test]
    fn test_bullet_travels_along_direction() {
        let (mut bullets, mut visuals, mut events) = manager(4);
        let handle = bullets
            .fire(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), &mut visuals, &mut events)
            .expect("room");
        bullets.update(0.1, &mut visuals);
        let bullet = bullets.get(handle).expect("still alive");
        assert!((bullet.position.x - 3.0).abs() < 1e-5);
        assert_eq!(events, vec![GameEvent::BulletFired { id: 1 }]);
    }

    #[test]
    fn test_bullet_expires_after_lifetime() {
        let (mut bullets, mut visuals, mut events) = manager(4);
        bullets.config.speed = 1.0;
        bullets.fire(Vec3::ZERO, Vec3::X, &mut visuals, &mut events);
        bullets.update(1.0, &mut visuals);
        assert_eq!(bullets.active_count(), 1);
        bullets.update(1.0, &mut visuals);
        assert_eq!(bullets.active_count(), 0);
    }

    #[test]
    fn test_bullet_leaving_field_is_recycled() {
        let (mut bullets, mut visuals, mut events) = manager(4);
        bullets.fire(Vec3::new(0.0, 10.5, 0.0), Vec3::Y, &mut visuals, &mut events);
        bullets.update(0.1, &mut visuals);
        assert_eq!(bullets.active_count(), 0);
        assert_eq!(visuals.resources().ref_count(VisualKind::Bullet), 0);
    }

    #[test]
    fn test_exhausted_pool_refuses_to_fire() {
        let (mut bullets, mut visuals, mut events) = manager(2);
        assert!(bullets.fire(Vec3::ZERO, Vec3::X, &mut visuals, &mut events).is_some());
        assert!(bullets.fire(Vec3::ZERO, Vec3::X, &mut visuals, &mut events).is_some());
        assert!(bullets.fire(Vec3::ZERO, Vec3::X, &mut visuals, &mut events).is_none());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_recycled_bullet_reuses_loaded_visual() {
        let (mut bullets, mut visuals, mut events) = manager(1);
        let handle = bullets
            .fire(Vec3::ZERO, Vec3::X, &mut visuals, &mut events)
            .expect("room");
        if let Some(slot) = bullets.visual_slot_mut(handle) {
            *slot = VisualSlot::Loaded(VisualId(9));
        }
        bullets.reset(&mut visuals);
        visuals.drain();

        let handle = bullets
            .fire(Vec3::ZERO, Vec3::X, &mut visuals, &mut events)
            .expect("recycled slot");
        let bullet = bullets.get(handle).expect("alive");
        assert_eq!(bullet.visual, VisualSlot::Loaded(VisualId(9)));
        assert!(visuals.pending().contains(&VisualCommand::SetVisible(VisualId(9), true)));
    }
}
