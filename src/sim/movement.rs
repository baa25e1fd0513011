//! Procedural movement patterns for asteroids
//!
//! A pattern is picked once at spawn and never changes kind afterwards; only
//! its phase variables evolve. Every pattern drifts left at the asteroid's
//! speed except orbit, which drifts its center instead.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{FieldConfig, PatternWeights};
use crate::math::{ease_in_out_cubic, lerp, random_between, random_sign, weighted_index};

/// Keeps wave/bounce patterns away from the field edge
const VERTICAL_MARGIN: f32 = 1.0;

/// Pattern names, also used by `forced_pattern` in the config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Straight,
    SineWave,
    SmoothWave,
    Zigzag,
    Spiral,
    Bounce,
    Orbit,
}

impl PatternKind {
    pub const ALL: [PatternKind; 7] = [
        PatternKind::Straight,
        PatternKind::SineWave,
        PatternKind::SmoothWave,
        PatternKind::Zigzag,
        PatternKind::Spiral,
        PatternKind::Bounce,
        PatternKind::Orbit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Straight => "straight",
            PatternKind::SineWave => "sine_wave",
            PatternKind::SmoothWave => "smooth_wave",
            PatternKind::Zigzag => "zigzag",
            PatternKind::Spiral => "spiral",
            PatternKind::Bounce => "bounce",
            PatternKind::Orbit => "orbit",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "straight" => Some(PatternKind::Straight),
            "sine_wave" | "sine" => Some(PatternKind::SineWave),
            "smooth_wave" => Some(PatternKind::SmoothWave),
            "zigzag" => Some(PatternKind::Zigzag),
            "spiral" => Some(PatternKind::Spiral),
            "bounce" => Some(PatternKind::Bounce),
            "orbit" => Some(PatternKind::Orbit),
            _ => None,
        }
    }

    pub fn weight(&self, weights: &PatternWeights) -> u32 {
        match self {
            PatternKind::Straight => weights.straight,
            PatternKind::SineWave => weights.sine_wave,
            PatternKind::SmoothWave => weights.smooth_wave,
            PatternKind::Zigzag => weights.zigzag,
            PatternKind::Spiral => weights.spiral,
            PatternKind::Bounce => weights.bounce,
            PatternKind::Orbit => weights.orbit,
        }
    }

    /// Weighted random pick; all-zero weights fall back to straight
    pub fn choose<R: Rng + ?Sized>(rng: &mut R, weights: &PatternWeights) -> Self {
        let table: Vec<u32> = Self::ALL.iter().map(|k| k.weight(weights)).collect();
        weighted_index(rng, &table)
            .map(|i| Self::ALL[i])
            .unwrap_or(PatternKind::Straight)
    }
}

/// Per-asteroid pattern state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MovementPattern {
    #[default]
    Straight,
    SineWave {
        initial_y: f32,
        amplitude: f32,
        frequency: f32,
    },
    SmoothWave {
        initial_y: f32,
        amplitude: f32,
        period: f32,
    },
    Zigzag {
        center_y: f32,
        amplitude: f32,
        switch_interval: f32,
        /// Time spent easing toward a new target (<= switch_interval)
        ease_duration: f32,
        timer: f32,
        direction: f32,
        from_y: f32,
        to_y: f32,
    },
    Spiral {
        center_y: f32,
        center_z: f32,
        radius: f32,
        min_radius: f32,
        shrink_rate: f32,
        angle: f32,
        angular_speed: f32,
    },
    Bounce {
        velocity_y: f32,
        min_y: f32,
        max_y: f32,
        /// Fraction of vertical speed kept after each bounce
        restitution: f32,
    },
    Orbit {
        center: Vec3,
        radius: f32,
        angle: f32,
        angular_speed: f32,
    },
}

impl MovementPattern {
    pub fn kind(&self) -> PatternKind {
        match self {
            MovementPattern::Straight => PatternKind::Straight,
            MovementPattern::SineWave { .. } => PatternKind::SineWave,
            MovementPattern::SmoothWave { .. } => PatternKind::SmoothWave,
            MovementPattern::Zigzag { .. } => PatternKind::Zigzag,
            MovementPattern::Spiral { .. } => PatternKind::Spiral,
            MovementPattern::Bounce { .. } => PatternKind::Bounce,
            MovementPattern::Orbit { .. } => PatternKind::Orbit,
        }
    }

    /// Build a pattern of `kind` with randomized parameters, anchored so the
    /// first step continues smoothly from `position`.
    pub fn new<R: Rng + ?Sized>(kind: PatternKind, rng: &mut R, position: Vec3, field: &FieldConfig) -> Self {
        match kind {
            PatternKind::Straight => MovementPattern::Straight,
            PatternKind::SineWave => {
                let amplitude = random_between(rng, 1.0, 3.0);
                let frequency = random_between(rng, 0.3, 0.8);
                // Phase-align so the wave passes through the spawn point
                MovementPattern::SineWave {
                    initial_y: position.y - (position.x * frequency).sin() * amplitude,
                    amplitude,
                    frequency,
                }
            }
            PatternKind::SmoothWave => MovementPattern::SmoothWave {
                initial_y: position.y,
                amplitude: random_between(rng, 1.5, 4.0),
                period: random_between(rng, 3.0, 6.0),
            },
            PatternKind::Zigzag => {
                let switch_interval = random_between(rng, 1.0, 2.0);
                let amplitude = random_between(rng, 1.5, 3.5);
                let direction = random_sign(rng);
                MovementPattern::Zigzag {
                    center_y: position.y,
                    amplitude,
                    switch_interval,
                    ease_duration: switch_interval * 0.6,
                    timer: 0.0,
                    direction,
                    from_y: position.y,
                    to_y: position.y + direction * amplitude,
                }
            }
            PatternKind::Spiral => {
                let radius = random_between(rng, 1.5, 3.0);
                MovementPattern::Spiral {
                    center_y: position.y - radius,
                    center_z: position.z,
                    radius,
                    min_radius: 0.5,
                    shrink_rate: random_between(rng, 0.1, 0.3),
                    angle: 0.0,
                    angular_speed: random_between(rng, 1.5, 3.0) * random_sign(rng),
                }
            }
            PatternKind::Bounce => MovementPattern::Bounce {
                velocity_y: random_between(rng, 3.0, 6.0) * random_sign(rng),
                min_y: field.min_y + VERTICAL_MARGIN,
                max_y: field.max_y - VERTICAL_MARGIN,
                restitution: 0.85,
            },
            PatternKind::Orbit => {
                let radius = random_between(rng, 1.5, 3.5);
                MovementPattern::Orbit {
                    center: position - Vec3::new(radius, 0.0, 0.0),
                    radius,
                    angle: 0.0,
                    angular_speed: random_between(rng, 1.0, 2.5) * random_sign(rng),
                }
            }
        }
    }

    /// Build a pattern by name. Unknown names move in a straight line.
    pub fn from_name<R: Rng + ?Sized>(name: &str, rng: &mut R, position: Vec3, field: &FieldConfig) -> Self {
        match PatternKind::from_name(name) {
            Some(kind) => Self::new(kind, rng, position, field),
            None => {
                log::warn!("unknown movement pattern {name:?}, using straight");
                MovementPattern::Straight
            }
        }
    }

    /// Advance one step. `t` is the pattern-local time after this step.
    pub fn step(&mut self, position: &mut Vec3, speed: f32, t: f32, dt: f32) {
        match self {
            MovementPattern::Straight => {
                position.x -= speed * dt;
            }
            MovementPattern::SineWave {
                initial_y,
                amplitude,
                frequency,
            } => {
                position.x -= speed * dt;
                position.y = *initial_y + (position.x * *frequency).sin() * *amplitude;
            }
            MovementPattern::SmoothWave {
                initial_y,
                amplitude,
                period,
            } => {
                position.x -= speed * dt;
                position.y = *initial_y + (TAU * t / *period).sin() * *amplitude;
            }
            MovementPattern::Zigzag {
                center_y,
                amplitude,
                switch_interval,
                ease_duration,
                timer,
                direction,
                from_y,
                to_y,
            } => {
                position.x -= speed * dt;
                *timer += dt;
                if *timer >= *switch_interval {
                    *timer -= *switch_interval;
                    *direction = -*direction;
                    *from_y = position.y;
                    *to_y = *center_y + *direction * *amplitude;
                }
                let progress = ease_in_out_cubic(*timer / *ease_duration);
                position.y = lerp(*from_y, *to_y, progress);
            }
            MovementPattern::Spiral {
                center_y,
                center_z,
                radius,
                min_radius,
                shrink_rate,
                angle,
                angular_speed,
            } => {
                position.x -= speed * dt;
                *angle += *angular_speed * dt;
                *radius = (*radius - *shrink_rate * dt).max(*min_radius);
                position.y = *center_y + angle.cos() * *radius;
                position.z = *center_z + angle.sin() * *radius;
            }
            MovementPattern::Bounce {
                velocity_y,
                min_y,
                max_y,
                restitution,
            } => {
                position.x -= speed * dt;
                position.y += *velocity_y * dt;
                if position.y > *max_y {
                    position.y = *max_y;
                    *velocity_y = -velocity_y.abs() * *restitution;
                } else if position.y < *min_y {
                    position.y = *min_y;
                    *velocity_y = velocity_y.abs() * *restitution;
                }
            }
            MovementPattern::Orbit {
                center,
                radius,
                angle,
                angular_speed,
            } => {
                center.x -= speed * dt;
                *angle += *angular_speed * dt;
                *position = *center + Vec3::new(angle.cos() * *radius, angle.sin() * *radius, 0.0);
            }
        }
    }
}
