//! Scrolling starfield behind the play plane (cosmetic, never collides)

use glam::Vec3;
use rand_pcg::Pcg32;

use crate::config::{DecorConfig, FieldConfig};
use crate::math::random_between;

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    config: DecorConfig,
    field: FieldConfig,
}

impl Starfield {
    pub fn new(config: &DecorConfig, field: &FieldConfig, rng: &mut Pcg32) -> Self {
        let stars = (0..config.star_count)
            .map(|_| Star {
                position: Vec3::new(
                    random_between(rng, field.despawn_x(), field.spawn_x()),
                    random_between(rng, field.min_y, field.max_y),
                    config.star_depth,
                ),
                speed: random_between(rng, config.star_speed_min, config.star_speed_max),
            })
            .collect();
        Self {
            stars,
            config: config.clone(),
            field: field.clone(),
        }
    }

    /// Scroll left; stars leaving the left edge re-enter on the right
    pub fn update(&mut self, dt: f32, rng: &mut Pcg32) {
        let left = self.field.despawn_x();
        let right = self.field.spawn_x();
        for star in &mut self.stars {
            star.position.x -= star.speed * dt;
            if star.position.x < left {
                star.position.x = right;
                star.position.y = random_between(rng, self.field.min_y, self.field.max_y);
                star.speed = random_between(rng, self.config.star_speed_min, self.config.star_speed_max);
            }
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}
