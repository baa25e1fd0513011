//! Transient explosion effects
//!
//! Explosions are fire-and-forget: they live for a size-dependent lifetime
//! and never collide. The list is capped; when full the oldest is dropped.

use std::collections::VecDeque;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::EffectConfig;
use crate::visual::{VisualId, VisualQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplosionKind {
    /// Asteroid destroyed
    Full,
    /// Non-lethal bullet impact
    Small,
}

#[derive(Debug, Clone)]
pub struct Explosion {
    pub id: u32,
    pub position: Vec3,
    pub size: f32,
    pub kind: ExplosionKind,
    pub age: f32,
    pub lifetime: f32,
    /// Set once the renderer has produced the effect
    pub visual: Option<VisualId>,
}

impl Explosion {
    /// 0 at spawn, 1 when expired
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

#[derive(Debug)]
pub struct EffectList {
    live: VecDeque<Explosion>,
    config: EffectConfig,
    next_id: u32,
}

impl EffectList {
    pub fn new(config: &EffectConfig) -> Self {
        Self {
            live: VecDeque::with_capacity(config.max_explosions),
            config: config.clone(),
            next_id: 1,
        }
    }

    /// Start an explosion and request its visual. Returns the effect id.
    pub fn spawn(&mut self, position: Vec3, size: f32, kind: ExplosionKind, visuals: &mut VisualQueue) -> u32 {
        if self.live.len() >= self.config.max_explosions {
            if let Some(oldest) = self.live.pop_front() {
                log::debug!("explosion cap reached, dropping effect {}", oldest.id);
                if let Some(id) = oldest.visual {
                    visuals.dispose(id);
                }
            }
        }

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.live.push_back(Explosion {
            id,
            position,
            size,
            kind,
            age: 0.0,
            lifetime: self.config.base_lifetime + size * self.config.lifetime_per_size,
            visual: None,
        });
        visuals.spawn_explosion(id, position, size);
        id
    }

    /// Age effects and dispose the expired ones
    pub fn update(&mut self, dt: f32, visuals: &mut VisualQueue) {
        for explosion in self.live.iter_mut() {
            explosion.age += dt;
        }
        self.live.retain(|e| {
            let alive = e.age < e.lifetime;
            if !alive {
                if let Some(id) = e.visual {
                    visuals.dispose(id);
                }
            }
            alive
        });
    }

    /// Bind a renderer visual to an effect. False when the effect is gone.
    pub fn attach_visual(&mut self, effect_id: u32, visual: VisualId) -> bool {
        match self.live.iter_mut().find(|e| e.id == effect_id) {
            Some(explosion) => {
                explosion.visual = Some(visual);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, visuals: &mut VisualQueue) {
        for explosion in self.live.drain(..) {
            if let Some(id) = explosion.visual {
                visuals.dispose(id);
            }
        }
    }

    pub fn get(&self, effect_id: u32) -> Option<&Explosion> {
        self.live.iter().find(|e| e.id == effect_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Explosion> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelPaths;
    use crate::visual::VisualCommand;

    fn list(max: usize) -> (EffectList, VisualQueue) {
        let config = EffectConfig {
            max_explosions: max,
            ..Default::default()
        };
        (EffectList::new(&config), VisualQueue::new(ModelPaths::default()))
    }

    #[test]
    fn test_lifetime_scales_with_size() {
        let (mut effects, mut visuals) = list(8);
        let small = effects.spawn(Vec3::ZERO, 0.5, ExplosionKind::Small, &mut visuals);
        let big = effects.spawn(Vec3::ZERO, 6.0, ExplosionKind::Full, &mut visuals);
        let small = effects.get(small).expect("live").lifetime;
        let big = effects.get(big).expect("live").lifetime;
        assert!(big > small);
        assert!((small - (0.4 + 0.5 * 0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_expired_effect_disposes_visual() {
        let (mut effects, mut visuals) = list(8);
        let id = effects.spawn(Vec3::ONE, 1.0, ExplosionKind::Full, &mut visuals);
        assert!(effects.attach_visual(id, VisualId(42)));
        visuals.drain();

        effects.update(0.25, &mut visuals);
        assert_eq!(effects.len(), 1);
        assert!(effects.get(id).is_some_and(|e| e.progress() > 0.0 && e.progress() < 1.0));

        effects.update(1.0, &mut visuals);
        assert!(effects.is_empty());
        assert_eq!(visuals.drain(), vec![VisualCommand::Dispose(VisualId(42))]);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let (mut effects, mut visuals) = list(2);
        let first = effects.spawn(Vec3::ZERO, 1.0, ExplosionKind::Full, &mut visuals);
        let second = effects.spawn(Vec3::ZERO, 1.0, ExplosionKind::Full, &mut visuals);
        let third = effects.spawn(Vec3::ZERO, 1.0, ExplosionKind::Full, &mut visuals);
        assert_eq!(effects.len(), 2);
        assert!(effects.get(first).is_none());
        assert!(effects.get(second).is_some());
        assert!(effects.get(third).is_some());
        // Late visual for a dropped effect is refused
        assert!(!effects.attach_visual(first, VisualId(1)));
    }
}
