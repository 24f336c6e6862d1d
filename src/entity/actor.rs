//! Actor instances
//!
//! An actor is one living (or dead) creature on the grid. Everything it
//! knows about the world lives in its two memory stores; everything it can
//! do is decided by its class.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorClassId, ActorId, ResourceId, Tick, TilePos};
use crate::entity::memory::{Memory, MemoryStore};

/// Hunger at which starvation damage begins
pub const STARVATION_HUNGER: f32 = 100.0;

/// High-level behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorState {
    Wander,
    Forage,
    Flee,
}

/// What the actor is currently going after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Target {
    #[default]
    None,
    Resource(ResourceId),
    Hunt(ActorId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub class: ActorClassId,

    /// Spent by moving and eating; below zero the actor rests
    pub energy: f32,
    /// 0 = sated, 100+ = starving
    pub hunger: f32,
    pub hitpoints: f32,
    /// Food left on the body for scavengers and predators
    pub meat: f32,
    pub age: Tick,

    pub tile: TilePos,
    /// Remaining steps, excluding the current tile
    pub path: VecDeque<TilePos>,
    pub state: BehaviorState,
    pub target: Target,
    /// Tile the current target was last remembered at
    pub target_tile: Option<TilePos>,

    pub hunger_rate: f32,
    pub observation_difficulty: f32,
    pub memory_horizon: f32,

    pub actor_memory: MemoryStore<ActorId>,
    pub resource_memory: MemoryStore<ResourceId>,

    /// Tick at which the death was reported
    pub died_at: Option<Tick>,
}

impl Actor {
    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0.0
    }

    pub fn hitpoint_ratio(&self, max_hitpoints: f32) -> f32 {
        if max_hitpoints <= 0.0 {
            return 0.0;
        }
        self.hitpoints / max_hitpoints
    }

    /// Hunger as a fraction of the starvation threshold
    pub fn hunger_ratio(&self) -> f32 {
        self.hunger / STARVATION_HUNGER
    }

    /// Subtract damage, clamping hitpoints at zero
    ///
    /// Returns true if this call killed the actor.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        self.hitpoints = (self.hitpoints - amount.max(0.0)).max(0.0);
        was_alive && !self.is_alive()
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    pub fn clear_target(&mut self) {
        self.target = Target::None;
        self.target_tile = None;
    }

    pub fn memory_snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            actor: self.id,
            age: self.age,
            state: self.state,
            target: self.target,
            actors: self
                .actor_memory
                .iter()
                .map(|(subject, memory)| ActorRecollection {
                    subject,
                    fresh: memory.is_fresh(self.age, self.memory_horizon),
                    memory: *memory,
                })
                .collect(),
            resources: self
                .resource_memory
                .iter()
                .map(|(subject, memory)| ResourceRecollection {
                    subject,
                    fresh: memory.is_fresh(self.age, self.memory_horizon),
                    memory: *memory,
                })
                .collect(),
        }
    }
}

/// Serializable view of an actor's memories for inspection tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub actor: ActorId,
    pub age: Tick,
    pub state: BehaviorState,
    pub target: Target,
    pub actors: Vec<ActorRecollection>,
    pub resources: Vec<ResourceRecollection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRecollection {
    pub subject: ActorId,
    pub fresh: bool,
    pub memory: Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecollection {
    pub subject: ResourceId,
    pub fresh: bool,
    pub memory: Memory,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_actor() -> Actor {
        Actor {
            id: ActorId(0),
            name: "rabbit".into(),
            class: ActorClassId(0),
            energy: 0.0,
            hunger: 50.0,
            hitpoints: 10.0,
            meat: 5.0,
            age: 0,
            tile: TilePos::new(0, 0),
            path: VecDeque::new(),
            state: BehaviorState::Wander,
            target: Target::None,
            target_tile: None,
            hunger_rate: 1.0,
            observation_difficulty: 1.0,
            memory_horizon: 100.0,
            actor_memory: MemoryStore::new(),
            resource_memory: MemoryStore::new(),
            died_at: None,
        }
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut actor = test_actor();
        assert!(!actor.take_damage(4.0));
        assert_eq!(actor.hitpoints, 6.0);
        assert!(actor.take_damage(100.0));
        assert_eq!(actor.hitpoints, 0.0);
        assert!(!actor.is_alive());
        // Already dead: no second kill
        assert!(!actor.take_damage(1.0));
        assert_eq!(actor.hitpoints, 0.0);
    }

    #[test]
    fn test_ratios() {
        let actor = test_actor();
        assert_eq!(actor.hitpoint_ratio(20.0), 0.5);
        assert_eq!(actor.hitpoint_ratio(0.0), 0.0);
        assert_eq!(actor.hunger_ratio(), 0.5);
    }

    #[test]
    fn test_memory_snapshot_marks_freshness() {
        let mut actor = test_actor();
        actor.age = 150;
        actor
            .resource_memory
            .record(ResourceId(1), Memory::new(TilePos::new(1, 1), 3.0, 0.0, 100));
        actor
            .resource_memory
            .record(ResourceId(2), Memory::new(TilePos::new(2, 2), 3.0, 0.0, 10));
        actor
            .actor_memory
            .record(ActorId(5), Memory::new(TilePos::new(3, 3), 1.0, 2.0, 140));

        let snapshot = actor.memory_snapshot();
        assert_eq!(snapshot.resources.len(), 2);
        assert!(snapshot.resources[0].fresh);
        assert!(!snapshot.resources[1].fresh);
        assert_eq!(snapshot.actors[0].subject, ActorId(5));

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"fresh\":true"));
    }

    #[test]
    fn test_clear_target() {
        let mut actor = test_actor();
        actor.target = Target::Hunt(ActorId(3));
        actor.target_tile = Some(TilePos::new(4, 4));
        actor.clear_target();
        assert_eq!(actor.target, Target::None);
        assert!(actor.target_tile.is_none());
    }
}
