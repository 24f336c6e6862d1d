//! Perception - what an actor notices around it
//!
//! Observation floods outward from the actor's tile over passable terrain and
//! stops at `observation_range`, so walls block perception the same way they
//! block movement. Each occupied tile in range is sensed by sight, smell and
//! hearing, all with linear distance falloff. Detected subjects are then
//! written into memory by `simulation::recall`.

use std::collections::{HashSet, VecDeque};

use rand::Rng;

use crate::core::error::Result;
use crate::core::types::{lerp, ActorId, ResourceId, TilePos};
use crate::entity::actor_class::ActorClass;
use crate::simulation::recall;
use crate::world::grid::Tile;
use crate::world::state::World;

/// Elevation effect on sight and smell per unit of height difference
const ELEVATION_SENSE_RATE: f32 = 0.05;

/// Subjects detected in one observation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    pub actors: Vec<ActorId>,
    pub resources: Vec<ResourceId>,
}

/// Sense strengths from an observer towards one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Senses {
    pub vision: f32,
    pub smell: f32,
    pub hearing: f32,
}

/// Sense strengths of `class` standing on `from` towards `to`
///
/// Looking down from higher ground helps sight; smell drifts downhill.
pub fn senses_towards(class: &ActorClass, from: &Tile, to: &Tile) -> Senses {
    let range = class.observation_range;
    if range <= 0.0 {
        return Senses {
            vision: 0.0,
            smell: 0.0,
            hearing: 0.0,
        };
    }
    let falloff = (1.0 - from.pos.distance(&to.pos) / range).max(0.0);
    let height_difference = from.elevation - to.elevation;

    let vision = falloff * lerp(class.dark_vision, class.light_vision, to.light_level);
    let vision = (vision * (1.0 + height_difference * ELEVATION_SENSE_RATE)).clamp(0.0, 1.0);
    let smell = (falloff * class.smell * (1.0 - height_difference * ELEVATION_SENSE_RATE)).clamp(0.0, 1.0);
    let hearing = falloff * class.hearing;

    Senses { vision, smell, hearing }
}

/// Scan the surroundings and roll detection for every subject in range
///
/// Reads the world only; use `apply_observation` to remember the result.
pub fn observe<R: Rng + ?Sized>(world: &World, observer_id: ActorId, rng: &mut R) -> Result<Observation> {
    let observer = world.actor(observer_id)?;
    let class = world.class_of(observer);
    let origin = world.grid.get(observer.tile)?;
    let range = class.observation_range;

    let mut observation = Observation::default();
    let mut queued: HashSet<TilePos> = HashSet::new();
    let mut open: VecDeque<TilePos> = VecDeque::new();
    queued.insert(observer.tile);
    open.push_back(observer.tile);

    while let Some(pos) = open.pop_front() {
        let tile = world.grid.get(pos)?;
        if observer.tile.distance(&pos) >= range {
            continue;
        }

        if tile.is_occupied() {
            let senses = senses_towards(class, origin, tile);
            let terrain = world.terrain_of(tile);
            let occupants = tile.actors().len().max(1) as f32;

            for &subject_id in tile.actors() {
                if subject_id == observer_id {
                    continue;
                }
                let subject = world.actor(subject_id)?;
                if subject.class == observer.class {
                    continue;
                }
                let subject_class = world.class_of(subject);

                // Odor is shared between everything on the tile
                let mut chance = subject_class.visibility_on(terrain) * senses.vision
                    + subject_class.odor / occupants * senses.smell
                    + subject_class.noise_on(terrain) * senses.hearing;

                if let Some(memory) = observer.actor_memory.get(&subject_id) {
                    let freshness = 1.0 - memory.age_at(observer.age) / observer.memory_horizon;
                    chance *= 1.0 + (class.tracking * freshness).max(0.0);
                }

                let roll = if observer.observation_difficulty > 0.0 {
                    rng.gen_range(0.0..observer.observation_difficulty)
                } else {
                    0.0
                };
                if roll < chance {
                    observation.actors.push(subject_id);
                }
            }

            for &resource_id in tile.resources() {
                let resource = world.resource(resource_id)?;
                let visibility = world.resource_class(resource.class)?.visibility;
                if rng.gen::<f32>() < visibility * senses.vision {
                    observation.resources.push(resource_id);
                }
            }
        }

        for next in world.grid.neighbors(pos) {
            if queued.contains(&next) {
                continue;
            }
            if world.terrain_at(next).is_some_and(|t| t.passable) {
                queued.insert(next);
                open.push_back(next);
            }
        }
    }

    Ok(observation)
}

/// Write every detected subject into the observer's memory
pub fn apply_observation(world: &mut World, observer_id: ActorId, observation: &Observation) -> Result<()> {
    for &subject in &observation.actors {
        let memory = recall::recall_actor(world, observer_id, subject)?;
        world.actor_mut(observer_id)?.actor_memory.record(subject, memory);
    }
    for &resource in &observation.resources {
        let memory = recall::recall_resource(world, observer_id, resource)?;
        world.actor_mut(observer_id)?.resource_memory.record(resource, memory);
    }
    Ok(())
}

/// Observe and remember in one step
pub fn observe_and_remember<R: Rng + ?Sized>(world: &mut World, observer_id: ActorId, rng: &mut R) -> Result<Observation> {
    let observation = observe(world, observer_id, rng)?;
    apply_observation(world, observer_id, &observation)?;
    Ok(observation)
}
