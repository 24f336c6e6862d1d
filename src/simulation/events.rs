//! Simulation events and the run log
//!
//! `tick` returns the events it produced; presentation layers and tests read
//! them instead of diffing world state.

use serde::{Deserialize, Serialize};

use crate::combat::resolution::AttackOutcome;
use crate::core::types::{ActorId, ResourceId, Tick, TilePos};
use crate::entity::actor::BehaviorState;

/// What an actor ate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodSource {
    Resource(ResourceId),
    Carcass(ActorId),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SimulationEvent {
    Moved {
        tick: Tick,
        actor: ActorId,
        from: TilePos,
        to: TilePos,
        cost: f32,
    },
    StateChanged {
        tick: Tick,
        actor: ActorId,
        from: BehaviorState,
        to: BehaviorState,
    },
    Attack {
        tick: Tick,
        /// `None` for terrain and food hazards
        attacker: Option<ActorId>,
        target: ActorId,
        outcome: AttackOutcome,
        hitpoints_after: f32,
        killed: bool,
    },
    Ate {
        tick: Tick,
        actor: ActorId,
        source: FoodSource,
        amount: f32,
        hunger_before: f32,
        hunger_after: f32,
        energy_cost: f32,
    },
    Starving {
        tick: Tick,
        actor: ActorId,
        damage: f32,
        hitpoints_after: f32,
    },
    Died {
        tick: Tick,
        actor: ActorId,
        age: Tick,
        tile: TilePos,
    },
}

impl SimulationEvent {
    pub fn tick(&self) -> Tick {
        match self {
            SimulationEvent::Moved { tick, .. }
            | SimulationEvent::StateChanged { tick, .. }
            | SimulationEvent::Attack { tick, .. }
            | SimulationEvent::Ate { tick, .. }
            | SimulationEvent::Starving { tick, .. }
            | SimulationEvent::Died { tick, .. } => *tick,
        }
    }

    /// Actor the event is about (the target, for attacks)
    pub fn subject(&self) -> ActorId {
        match self {
            SimulationEvent::Moved { actor, .. }
            | SimulationEvent::StateChanged { actor, .. }
            | SimulationEvent::Ate { actor, .. }
            | SimulationEvent::Starving { actor, .. }
            | SimulationEvent::Died { actor, .. } => *actor,
            SimulationEvent::Attack { target, .. } => *target,
        }
    }

    /// Short label used in summaries
    pub fn label(&self) -> &'static str {
        match self {
            SimulationEvent::Moved { .. } => "moved",
            SimulationEvent::StateChanged { .. } => "state_changed",
            SimulationEvent::Attack { .. } => "attack",
            SimulationEvent::Ate { .. } => "ate",
            SimulationEvent::Starving { .. } => "starving",
            SimulationEvent::Died { .. } => "died",
        }
    }
}

/// Accumulated events of a whole run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<SimulationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = SimulationEvent>) {
        self.events.extend(events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn for_actor(&self, actor: ActorId) -> impl Iterator<Item = &SimulationEvent> {
        self.events.iter().filter(move |e| e.subject() == actor)
    }

    pub fn count(&self, label: &str) -> usize {
        self.events.iter().filter(|e| e.label() == label).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}
