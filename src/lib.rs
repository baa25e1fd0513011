//! Rock Runner - simulation core for a side-scrolling asteroid shooter
//!
//! Core modules:
//! - `sim`: Entity lifecycle, collisions, damage rules and the tick loop
//! - `config`: Data-driven game balance and required asset paths
//! - `visual`: Narrow interface to the rendering collaborator
//! - `input`: Polled input interface plus pause/restart edge latch
//! - `hud`: Fire-and-forget UI interface fed by game events
//! - `math`: Interpolation, easing and randomization helpers

pub mod config;
pub mod hud;
pub mod input;
pub mod math;
pub mod sim;
pub mod visual;

pub use config::{ConfigError, GameConfig};
pub use sim::{GameEvent, GamePhase, GameState, TickInput, run_frame, tick};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Depth of the play-field plane; player and bullets live on it
    pub const PLAY_DEPTH: f32 = 0.0;

    /// Play-field half extents (world units)
    pub const FIELD_HALF_WIDTH: f32 = 20.0;
    pub const FIELD_HALF_HEIGHT: f32 = 11.0;

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    pub const PLAYER_HIT_RADIUS: f32 = 0.8;
    pub const PLAYER_COLLISION_DAMAGE: u32 = 20;
    pub const PLAYER_INVULNERABILITY: f32 = 1.5;
    pub const PLAYER_FIRE_COOLDOWN: f32 = 0.2;

    /// Asteroid defaults
    pub const ASTEROID_HEALTH: u32 = 100;
    pub const ASTEROID_HIT_RADIUS_FACTOR: f32 = 0.8;

    /// Bullet defaults
    pub const BULLET_DAMAGE: u32 = 50;
    pub const BULLET_SPEED: f32 = 30.0;
    pub const BULLET_LIFETIME: f32 = 2.0;
    pub const BULLET_HIT_RADIUS: f32 = 0.2;
}

/// Pin a position onto the play-field plane
#[inline]
pub fn on_play_plane(mut position: Vec3) -> Vec3 {
    position.z = consts::PLAY_DEPTH;
    position
}
