//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies; visual work is queued as commands

pub mod asteroid;
pub mod bullet;
pub mod clock;
pub mod collision;
pub mod damage;
pub mod decor;
pub mod effects;
pub mod movement;
pub mod player;
pub mod pool;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, AsteroidManager};
pub use bullet::{Bullet, BulletManager};
pub use clock::{Clock, StepPlan};
pub use collision::{CollisionResult, HitSphere, HitSphereProvider, intersects, sphere_collision};
pub use damage::{DamageEvent, DamageRules, EntityRef};
pub use effects::{EffectList, Explosion, ExplosionKind};
pub use movement::{MovementPattern, PatternKind};
pub use player::Player;
pub use pool::{Handle, Pool};
pub use state::{DamageOutcome, GameEvent, GamePhase, GameState, TickContext};
pub use tick::{TickInput, run_frame, tick};
