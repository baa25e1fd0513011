//! Game configuration
//!
//! Every tunable the simulation reads lives here. Sections default
//! individually so a partial JSON document only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse/serialize error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A model path required by a visual kind is empty
    #[error("missing model path: models.{0}")]
    MissingModelPath(&'static str),

    /// A value is out of its allowed range
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Play-field bounds (world units, XY plane)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// Distance past the right edge where asteroids appear
    pub spawn_margin: f32,
    /// Distance past the left edge where asteroids are recycled
    pub despawn_margin: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            min_x: -FIELD_HALF_WIDTH,
            max_x: FIELD_HALF_WIDTH,
            min_y: -FIELD_HALF_HEIGHT,
            max_y: FIELD_HALF_HEIGHT,
            spawn_margin: 4.0,
            despawn_margin: 4.0,
        }
    }
}

impl FieldConfig {
    /// X coordinate asteroids spawn at
    pub fn spawn_x(&self) -> f32 {
        self.max_x + self.spawn_margin
    }

    /// Asteroids left of this X are out of bounds
    pub fn despawn_x(&self) -> f32 {
        self.min_x - self.despawn_margin
    }
}

/// Clock settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fixed step (accumulator) when true, measured frame delta when false
    pub fixed_timestep: bool,
    pub step: f32,
    pub max_substeps: u32,
    pub max_frame_dt: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: true,
            step: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: u32,
    pub hit_radius: f32,
    /// Thrust (units/s²) at full input
    pub acceleration: f32,
    /// Exponential velocity decay per second
    pub drag: f32,
    pub max_speed: f32,
    /// Health lost on asteroid contact
    pub collision_damage: u32,
    /// Invulnerability window after a hit (seconds)
    pub invulnerability: f32,
    pub fire_cooldown: f32,
    /// Spawn X as a fraction of the field (0 = left edge, 1 = right edge)
    pub start_x_fraction: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            hit_radius: PLAYER_HIT_RADIUS,
            acceleration: 60.0,
            drag: 4.0,
            max_speed: 15.0,
            collision_damage: PLAYER_COLLISION_DAMAGE,
            invulnerability: PLAYER_INVULNERABILITY,
            fire_cooldown: PLAYER_FIRE_COOLDOWN,
            start_x_fraction: 0.2,
        }
    }
}

/// Relative weights for movement pattern selection (higher = more frequent)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternWeights {
    pub straight: u32,
    pub sine_wave: u32,
    pub smooth_wave: u32,
    pub zigzag: u32,
    pub spiral: u32,
    pub bounce: u32,
    pub orbit: u32,
}

impl Default for PatternWeights {
    fn default() -> Self {
        Self {
            straight: 1,
            sine_wave: 1,
            smooth_wave: 3,
            zigzag: 1,
            spiral: 2,
            bounce: 1,
            orbit: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidConfig {
    pub spawns_per_second: f32,
    /// Pool capacity (max simultaneously active asteroids)
    pub capacity: usize,
    /// Grow past capacity instead of refusing spawns
    pub expandable: bool,
    pub size_min: f32,
    pub size_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    /// Max spin per axis (radians/s)
    pub rotation_speed_max: f32,
    pub health: u32,
    /// Hit radius = size * factor
    pub hit_radius_factor: f32,
    pub pattern_weights: PatternWeights,
    /// Force every asteroid onto one pattern (by name); unknown names move straight
    pub forced_pattern: Option<String>,
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            spawns_per_second: 1.0,
            capacity: 32,
            expandable: false,
            size_min: 1.0,
            size_max: 4.0,
            speed_min: 3.0,
            speed_max: 6.0,
            rotation_speed_max: 1.5,
            health: ASTEROID_HEALTH,
            hit_radius_factor: ASTEROID_HIT_RADIUS_FACTOR,
            pattern_weights: PatternWeights::default(),
            forced_pattern: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub capacity: usize,
    pub expandable: bool,
    pub speed: f32,
    pub damage: u32,
    pub lifetime: f32,
    pub hit_radius: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            expandable: false,
            speed: BULLET_SPEED,
            damage: BULLET_DAMAGE,
            lifetime: BULLET_LIFETIME,
            hit_radius: BULLET_HIT_RADIUS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Oldest explosions are dropped past this count
    pub max_explosions: usize,
    /// Size of the secondary explosion on a non-lethal hit
    pub small_explosion_size: f32,
    /// Full explosion size = asteroid size * factor
    pub explosion_size_factor: f32,
    /// Explosion lifetime = base + size * per_size
    pub base_lifetime: f32,
    pub lifetime_per_size: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            max_explosions: 48,
            small_explosion_size: 0.5,
            explosion_size_factor: 1.5,
            base_lifetime: 0.4,
            lifetime_per_size: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    pub star_count: usize,
    pub star_speed_min: f32,
    pub star_speed_max: f32,
    /// Stars sit behind the play plane at this depth
    pub star_depth: f32,
}

impl Default for DecorConfig {
    fn default() -> Self {
        Self {
            star_count: 120,
            star_speed_min: 0.5,
            star_speed_max: 4.0,
            star_depth: -30.0,
        }
    }
}

/// Model asset per visual kind. All entries are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    pub player: String,
    pub asteroid: String,
    pub bullet: String,
    pub explosion: String,
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            player: "models/ship.glb".to_string(),
            asteroid: "models/asteroid.glb".to_string(),
            bullet: "models/bullet.glb".to_string(),
            explosion: "models/explosion.glb".to_string(),
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: FieldConfig,
    pub timing: TimingConfig,
    pub player: PlayerConfig,
    pub asteroids: AsteroidConfig,
    pub bullets: BulletConfig,
    pub effects: EffectConfig,
    pub decor: DecorConfig,
    pub models: ModelPaths,
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that indicate a setup bug
    pub fn validate(&self) -> Result<(), ConfigError> {
        let models = [
            ("player", &self.models.player),
            ("asteroid", &self.models.asteroid),
            ("bullet", &self.models.bullet),
            ("explosion", &self.models.explosion),
        ];
        for (key, path) in models {
            if path.trim().is_empty() {
                return Err(ConfigError::MissingModelPath(key));
            }
        }

        let f = &self.field;
        if f.min_x >= f.max_x || f.min_y >= f.max_y {
            return Err(invalid("field", "min bound must be below max bound"));
        }
        if self.timing.step <= 0.0 {
            return Err(invalid("timing.step", "must be positive"));
        }
        if self.timing.max_substeps == 0 {
            return Err(invalid("timing.max_substeps", "must be at least 1"));
        }
        if self.player.max_health == 0 {
            return Err(invalid("player.max_health", "must be at least 1"));
        }

        let a = &self.asteroids;
        if a.spawns_per_second <= 0.0 || !a.spawns_per_second.is_finite() {
            return Err(invalid("asteroids.spawns_per_second", "must be positive"));
        }
        if a.capacity == 0 {
            return Err(invalid("asteroids.capacity", "must be at least 1"));
        }
        if a.size_min <= 0.0 || a.size_min > a.size_max {
            return Err(invalid("asteroids.size_min", "must be positive and <= size_max"));
        }
        if a.speed_min > a.speed_max {
            return Err(invalid("asteroids.speed_min", "must be <= speed_max"));
        }
        if a.health == 0 {
            return Err(invalid("asteroids.health", "must be at least 1"));
        }

        let b = &self.bullets;
        if b.capacity == 0 {
            return Err(invalid("bullets.capacity", "must be at least 1"));
        }
        if b.lifetime <= 0.0 {
            return Err(invalid("bullets.lifetime", "must be positive"));
        }
        if self.decor.star_speed_min > self.decor.star_speed_max {
            return Err(invalid("decor.star_speed_min", "must be <= star_speed_max"));
        }

        Ok(())
    }
}

fn invalid(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        reason: reason.to_string(),
    }
}
