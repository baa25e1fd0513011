//! Game state and core simulation types
//!
//! `GameState` is the composition root: it owns the player, both entity
//! managers, the transient effect list, the clock, the RNG and the outbox of
//! renderer work. Nothing in the simulation reaches for global state.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::asteroid::AsteroidManager;
use super::bullet::BulletManager;
use super::clock::Clock;
use super::damage::DamageRules;
use super::decor::Starfield;
use super::effects::{EffectList, ExplosionKind};
use super::movement::PatternKind;
use super::player::Player;
use crate::config::{ConfigError, GameConfig};
use crate::visual::{AssetError, LoadTicket, Renderer, VisualCommand, VisualId, VisualKind, VisualQueue, VisualSlot, VisualTarget};

/// Current phase of the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Clock advancing, entities updating
    Running,
    /// Clock stopped until resumed
    Paused,
    /// Player destroyed; terminal until restart
    GameOver,
}

/// Result of applying damage to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing happened (already destroyed or invulnerable)
    Ignored,
    /// Took damage and survived
    Damaged { remaining: u32 },
    /// This hit destroyed it
    Destroyed,
}

/// Everything collaborators may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    HealthChanged { health: u32 },
    ScoreChanged { score: u64 },
    AsteroidSpawned { id: u32, pattern: PatternKind },
    AsteroidHit { id: u32, remaining: u32 },
    /// `points` is 0 when the asteroid was destroyed by ramming the player
    AsteroidDestroyed { id: u32, points: u64 },
    /// Scrolled off the left edge
    AsteroidEscaped { id: u32 },
    BulletFired { id: u32 },
    ExplosionSpawned { position: Vec3, size: f32, kind: ExplosionKind },
    PlayerDamaged { amount: u32, health: u32 },
    PlayerDestroyed,
    Paused,
    Resumed,
    GameOver { score: u64 },
    Restarted,
}

/// Mutable pieces the managers and the damage protocol share during a tick
pub struct TickContext<'a> {
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
    pub visuals: &'a mut VisualQueue,
    pub effects: &'a mut EffectList,
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub clock: Clock,
    pub player: Player,
    pub asteroids: AsteroidManager,
    pub bullets: BulletManager,
    pub effects: EffectList,
    pub decor: Starfield,
    pub rules: DamageRules,
    pub visuals: VisualQueue,
    pub(crate) events: Vec<GameEvent>,
    /// Simulation steps since the last (re)start
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game. Fails fast on an invalid configuration.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut visuals = VisualQueue::new(config.models.clone());
        let mut player = Player::new(&config.player, &config.field);
        visuals.attach(&mut player.visual, VisualTarget::Player, VisualKind::Player, 1.0);

        let mut clock = Clock::new(&config.timing);
        clock.start();

        let state = Self {
            seed,
            phase: GamePhase::Running,
            clock,
            player,
            asteroids: AsteroidManager::new(&config),
            bullets: BulletManager::new(&config),
            effects: EffectList::new(&config.effects),
            decor: Starfield::new(&config.decor, &config.field, &mut rng),
            rules: DamageRules::from_config(&config),
            visuals,
            events: vec![
                GameEvent::HealthChanged {
                    health: config.player.max_health,
                },
                GameEvent::ScoreChanged { score: 0 },
            ],
            time_ticks: 0,
            rng,
            config,
        };
        log::info!("game created (seed {})", state.seed);
        Ok(state)
    }

    pub fn score(&self) -> u64 {
        self.asteroids.score()
    }

    /// Events produced since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset the player and clear every manager; the game resumes running
    pub fn restart(&mut self) {
        self.player.reset(&self.config.player, &self.config.field);
        self.asteroids.reset(&mut self.visuals);
        self.bullets.reset(&mut self.visuals);
        self.effects.clear(&mut self.visuals);
        self.time_ticks = 0;
        self.phase = GamePhase::Running;
        self.clock.reset();
        self.clock.start();
        self.events.push(GameEvent::Restarted);
        self.events.push(GameEvent::HealthChanged {
            health: self.player.health,
        });
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        log::info!("game restarted");
    }

    /// Completion callback for a visual requested through the renderer.
    ///
    /// Only an entity that is still alive and still waiting on this exact
    /// ticket adopts the visual; anything else gets it disposed.
    pub fn visual_loaded(&mut self, ticket: LoadTicket, result: Result<VisualId, AssetError>) {
        let slot = match ticket.target {
            VisualTarget::Player => Some(&mut self.player.visual),
            VisualTarget::Asteroid(handle) => self.asteroids.visual_slot_mut(handle),
            VisualTarget::Bullet(handle) => self.bullets.visual_slot_mut(handle),
        };

        match (slot, result) {
            (Some(slot), Ok(id)) if *slot == VisualSlot::Pending(ticket) => {
                *slot = VisualSlot::Loaded(id);
            }
            (Some(slot), Err(err)) if *slot == VisualSlot::Pending(ticket) => {
                log::warn!("visual load failed, keeping placeholder: {err}");
                *slot = VisualSlot::Placeholder;
            }
            (_, Ok(id)) => {
                log::debug!("discarding visual {id:?} for stale load {}", ticket.serial);
                self.visuals.dispose(id);
            }
            (_, Err(err)) => {
                log::debug!("stale load {} failed: {err}", ticket.serial);
            }
        }
    }

    /// Hand queued visual work to the renderer and sync transforms.
    ///
    /// Renderer failures here only affect visuals; simulation state has
    /// already been settled by the tick.
    pub fn present(&mut self, renderer: &mut dyn Renderer) {
        for command in self.visuals.drain() {
            match command {
                VisualCommand::Create { ticket, kind, params } => {
                    renderer.create_visual(kind, &params, ticket);
                }
                VisualCommand::SetVisible(id, visible) => renderer.set_visible(id, visible),
                VisualCommand::Dispose(id) => renderer.dispose(id),
                VisualCommand::SpawnExplosion {
                    effect_id,
                    position,
                    size,
                } => match renderer.spawn_explosion(position, size) {
                    Ok(id) => {
                        if !self.effects.attach_visual(effect_id, id) {
                            renderer.dispose(id);
                        }
                    }
                    Err(err) => log::warn!("explosion visual unavailable: {err}"),
                },
                VisualCommand::LoadShared(kind) => renderer.load_shared(kind),
                VisualCommand::UnloadShared(kind) => renderer.unload_shared(kind),
            }
        }

        if let Some(id) = self.player.visual.loaded() {
            renderer.set_transform(id, self.player.position, self.player.rotation());
        }
        for (_, asteroid) in self.asteroids.iter() {
            if let Some(id) = asteroid.visual.loaded() {
                renderer.set_transform(id, asteroid.position, asteroid.rotation);
            }
        }
        for (_, bullet) in self.bullets.iter() {
            if let Some(id) = bullet.visual.loaded() {
                renderer.set_transform(id, bullet.position, Vec3::ZERO);
            }
        }
    }
}
