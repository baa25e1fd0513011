//! Interface to the rendering collaborator
//!
//! The simulation never talks to a renderer directly while ticking. Spawns
//! and despawns push [`VisualCommand`]s onto a [`VisualQueue`]; the front end
//! drains the queue into its [`Renderer`] once per frame. Model loads are
//! asynchronous: the renderer reports completion later through
//! `GameState::visual_loaded`, and an entity stays fully simulated on a
//! placeholder until then.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::ModelPaths;
use crate::sim::pool::Handle;

/// Asset failures reported by the renderer
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("failed to load {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

/// Renderer-side handle for a created visual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualId(pub u32);

/// What kind of thing a visual depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualKind {
    Player,
    Asteroid,
    Bullet,
    Explosion,
}

impl VisualKind {
    /// Model path for this kind
    pub fn model_path(self, models: &ModelPaths) -> &str {
        match self {
            VisualKind::Player => &models.player,
            VisualKind::Asteroid => &models.asteroid,
            VisualKind::Bullet => &models.bullet,
            VisualKind::Explosion => &models.explosion,
        }
    }
}

/// Parameters passed along with a create request
#[derive(Debug, Clone, PartialEq)]
pub struct VisualParams {
    pub model: String,
    pub scale: f32,
}

/// Entity a pending load belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualTarget {
    Player,
    Asteroid(Handle),
    Bullet(Handle),
}

/// Identifies one outstanding load. Completions are matched against it, so a
/// load that finishes after its entity was destroyed or recycled is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub serial: u64,
    pub target: VisualTarget,
}

/// Visual state carried by each entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualSlot {
    /// Drawn as a stand-in shape (never requested, or the load failed)
    #[default]
    Placeholder,
    /// Load in flight
    Pending(LoadTicket),
    /// Real visual attached
    Loaded(VisualId),
}

impl VisualSlot {
    pub fn loaded(&self) -> Option<VisualId> {
        match self {
            VisualSlot::Loaded(id) => Some(*id),
            _ => None,
        }
    }
}

/// Deferred renderer work produced during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum VisualCommand {
    Create {
        ticket: LoadTicket,
        kind: VisualKind,
        params: VisualParams,
    },
    SetVisible(VisualId, bool),
    Dispose(VisualId),
    SpawnExplosion {
        effect_id: u32,
        position: Vec3,
        size: f32,
    },
    LoadShared(VisualKind),
    UnloadShared(VisualKind),
}

/// Rendering collaborator
pub trait Renderer {
    /// Start loading a visual. Completion (success or failure) must be
    /// reported back through `GameState::visual_loaded` with the same ticket.
    fn create_visual(&mut self, kind: VisualKind, params: &VisualParams, ticket: LoadTicket);

    fn set_transform(&mut self, id: VisualId, position: Vec3, rotation: Vec3);

    fn set_visible(&mut self, id: VisualId, visible: bool);

    fn dispose(&mut self, id: VisualId);

    /// Play an explosion effect; finishes on its own after a size-dependent lifetime
    fn spawn_explosion(&mut self, position: Vec3, size: f32) -> Result<VisualId, AssetError>;

    /// Prepare geometry/materials shared by every visual of `kind`
    fn load_shared(&mut self, _kind: VisualKind) {}

    /// Release shared resources for `kind`
    fn unload_shared(&mut self, _kind: VisualKind) {}
}

/// Reference counts for shared per-kind visual resources
#[derive(Debug, Default)]
pub struct ResourceManager {
    counts: HashMap<VisualKind, u32>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a reference. Returns true when this is the first one.
    pub fn acquire(&mut self, kind: VisualKind) -> bool {
        let count = self.counts.entry(kind).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Drop a reference. Returns true when the last one went away.
    /// Releasing an unreferenced kind is a no-op.
    pub fn release(&mut self, kind: VisualKind) -> bool {
        match self.counts.get_mut(&kind) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                self.counts.remove(&kind);
                true
            }
            None => false,
        }
    }

    pub fn ref_count(&self, kind: VisualKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Outbox of renderer work plus the shared resource counts
#[derive(Debug)]
pub struct VisualQueue {
    commands: Vec<VisualCommand>,
    resources: ResourceManager,
    models: ModelPaths,
    next_serial: u64,
}

impl VisualQueue {
    pub fn new(models: ModelPaths) -> Self {
        Self {
            commands: Vec::new(),
            resources: ResourceManager::new(),
            models,
            next_serial: 1,
        }
    }

    /// Attach a visual to a freshly spawned (or recycled) entity.
    ///
    /// A recycled entity that still owns a loaded visual just shows it again;
    /// otherwise a create request goes out and the slot turns `Pending`.
    pub fn attach(&mut self, slot: &mut VisualSlot, target: VisualTarget, kind: VisualKind, scale: f32) {
        if self.resources.acquire(kind) {
            self.commands.push(VisualCommand::LoadShared(kind));
        }

        if let VisualSlot::Loaded(id) = *slot {
            self.commands.push(VisualCommand::SetVisible(id, true));
            return;
        }

        let ticket = LoadTicket {
            serial: self.next_serial,
            target,
        };
        self.next_serial += 1;
        self.commands.push(VisualCommand::Create {
            ticket,
            kind,
            params: VisualParams {
                model: kind.model_path(&self.models).to_string(),
                scale,
            },
        });
        *slot = VisualSlot::Pending(ticket);
    }

    /// Detach a visual from an entity going back to its pool.
    ///
    /// Loaded visuals are hidden and kept for reuse. A pending load is
    /// abandoned; its late completion is disposed on arrival.
    pub fn detach(&mut self, slot: &mut VisualSlot, kind: VisualKind) {
        match *slot {
            VisualSlot::Loaded(id) => self.commands.push(VisualCommand::SetVisible(id, false)),
            VisualSlot::Pending(_) => *slot = VisualSlot::Placeholder,
            VisualSlot::Placeholder => {}
        }
        if self.resources.release(kind) {
            self.commands.push(VisualCommand::UnloadShared(kind));
        }
    }

    pub fn dispose(&mut self, id: VisualId) {
        self.commands.push(VisualCommand::Dispose(id));
    }

    pub fn spawn_explosion(&mut self, effect_id: u32, position: Vec3, size: f32) {
        self.commands.push(VisualCommand::SpawnExplosion {
            effect_id,
            position,
            size,
        });
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// Take all queued commands in submission order
    pub fn drain(&mut self) -> Vec<VisualCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn pending(&self) -> &[VisualCommand] {
        &self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asteroid_target() -> VisualTarget {
        VisualTarget::Asteroid(Handle {
            index: 0,
            generation: 0,
        })
    }

    #[test]
    fn test_resource_manager_counts() {
        let mut res = ResourceManager::new();
        assert!(res.acquire(VisualKind::Bullet));
        assert!(!res.acquire(VisualKind::Bullet));
        assert_eq!(res.ref_count(VisualKind::Bullet), 2);
        assert!(!res.release(VisualKind::Bullet));
        assert!(res.release(VisualKind::Bullet));
        assert_eq!(res.ref_count(VisualKind::Bullet), 0);
        // Over-release is ignored
        assert!(!res.release(VisualKind::Bullet));
    }

    #[test]
    fn test_attach_requests_model_and_loads_shared_once() {
        let mut queue = VisualQueue::new(ModelPaths::default());
        let mut a = VisualSlot::Placeholder;
        let mut b = VisualSlot::Placeholder;
        queue.attach(&mut a, asteroid_target(), VisualKind::Asteroid, 2.0);
        queue.attach(&mut b, asteroid_target(), VisualKind::Asteroid, 1.0);

        let commands = queue.drain();
        let shared = commands
            .iter()
            .filter(|c| matches!(c, VisualCommand::LoadShared(VisualKind::Asteroid)))
            .count();
        assert_eq!(shared, 1);
        assert!(matches!(a, VisualSlot::Pending(_)));
        assert!(matches!(b, VisualSlot::Pending(_)));
        assert_ne!(a, b, "tickets must be distinct");

        let create = commands
            .iter()
            .find_map(|c| match c {
                VisualCommand::Create { params, .. } => Some(params.clone()),
                _ => None,
            })
            .expect("create command");
        assert_eq!(create.model, "models/asteroid.glb");
    }

    #[test]
    fn test_detach_hides_loaded_and_reattach_reuses() {
        let mut queue = VisualQueue::new(ModelPaths::default());
        let mut slot = VisualSlot::Loaded(VisualId(9));
        queue.attach(&mut slot, asteroid_target(), VisualKind::Asteroid, 1.0);
        queue.detach(&mut slot, VisualKind::Asteroid);
        assert_eq!(slot, VisualSlot::Loaded(VisualId(9)));

        let commands = queue.drain();
        assert!(commands.contains(&VisualCommand::SetVisible(VisualId(9), true)));
        assert!(commands.contains(&VisualCommand::SetVisible(VisualId(9), false)));
        assert!(commands.contains(&VisualCommand::UnloadShared(VisualKind::Asteroid)));
        assert!(!commands.iter().any(|c| matches!(c, VisualCommand::Create { .. })));
    }

    #[test]
    fn test_detach_abandons_pending_load() {
        let mut queue = VisualQueue::new(ModelPaths::default());
        let mut slot = VisualSlot::Placeholder;
        queue.attach(&mut slot, asteroid_target(), VisualKind::Asteroid, 1.0);
        queue.detach(&mut slot, VisualKind::Asteroid);
        assert_eq!(slot, VisualSlot::Placeholder);
        assert_eq!(queue.resources().ref_count(VisualKind::Asteroid), 0);
    }
}
