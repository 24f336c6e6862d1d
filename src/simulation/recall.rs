//! Memory valuation rules
//!
//! Turns a sighting into a `Memory`: how much food the subject represents to
//! the observer and how dangerous it is to go after it. Valuation happens at
//! sighting time and is not revised until the next sighting.

use crate::combat::estimate::MAX_RISK;
use crate::core::error::Result;
use crate::core::types::{ActorId, ResourceId, TilePos};
use crate::entity::memory::Memory;
use crate::simulation::feeding::eating_energy_cost;
use crate::simulation::movement::movement_cost;
use crate::world::state::World;

/// Value and risk of another actor as seen by `observer_id` right now
pub fn recall_actor(world: &World, observer_id: ActorId, subject_id: ActorId) -> Result<Memory> {
    let observer = world.actor(observer_id)?;
    let subject = world.actor(subject_id)?;
    let my_class = world.class_of(observer);
    let their_class = world.class_of(subject);
    let stamp = observer.age;

    if subject.meat <= 0.0 {
        return Ok(Memory::new(subject.tile, 0.0, 0.0, stamp));
    }

    let mut value = my_class.consumption.min(subject.meat * my_class.meat_efficiency);

    // Prey that moves more cheaply on its own ground is harder to catch
    let my_cost = movement_cost(world, observer, subject.tile, subject.tile);
    let their_cost = movement_cost(world, subject, subject.tile, subject.tile);
    if my_cost > their_cost {
        value /= 1.0 + (my_cost - their_cost);
    }

    let mut risk = 0.0;
    if subject.is_alive() {
        let my_ratio = observer.hitpoint_ratio(my_class.max_hitpoints);
        let their_ratio = subject.hitpoint_ratio(their_class.max_hitpoints);
        risk = if my_ratio > 0.0 {
            my_class.class_risk(their_class) * their_ratio / my_ratio
        } else {
            MAX_RISK
        };
        // Two grazers have little reason to fight
        risk *= my_class.predatory_ratio().max(their_class.predatory_ratio());
    }

    Ok(Memory::new(subject.tile, value, risk, stamp))
}

/// Value and risk of a resource as seen by `observer_id` right now
pub fn recall_resource(world: &World, observer_id: ActorId, resource_id: ResourceId) -> Result<Memory> {
    let observer = world.actor(observer_id)?;
    let resource = world.resource(resource_id)?;
    let class = world.class_of(observer);
    let stamp = observer.age;

    if resource.is_depleted() {
        return Ok(Memory::new(resource.tile, 0.0, 0.0, stamp));
    }

    let food = class.consumption.min(resource.amount * class.plant_efficiency);
    let cost = eating_energy_cost(world, class, resource);
    let value = if !cost.is_finite() {
        0.0
    } else if cost > 0.0 {
        food / cost
    } else {
        food
    };

    let my_ratio = observer.hitpoint_ratio(class.max_hitpoints);
    let resource_class = world.resource_class(resource.class)?;
    let risk = if my_ratio > 0.0 {
        class.resource_risk(resource_class) / my_ratio
    } else {
        MAX_RISK
    };

    Ok(Memory::new(resource.tile, value, risk, stamp))
}

/// Invalidate memories placing an actor on `tile` when it isn't there
///
/// Called when the observer steps onto `tile` and can see for itself.
/// Returns how many memories were invalidated.
pub fn invalidate_phantoms(world: &mut World, observer_id: ActorId, tile: TilePos) -> Result<usize> {
    let observer = world.actor(observer_id)?;
    let phantoms: Vec<ActorId> = observer
        .actor_memory
        .iter()
        .filter(|(_, memory)| memory.tile == tile && !memory.invalidated)
        .filter(|(subject, _)| world.actor(*subject).map_or(true, |s| s.tile != tile))
        .map(|(subject, _)| subject)
        .collect();

    let store = &mut world.actor_mut(observer_id)?.actor_memory;
    for subject in &phantoms {
        store.invalidate(subject);
    }
    Ok(phantoms.len())
}

/// Zero the value of a resource memory the observer finds empty on arrival
pub fn forget_depleted_resource(world: &mut World, observer_id: ActorId, resource_id: ResourceId) -> Result<()> {
    if let Some(memory) = world.actor_mut(observer_id)?.resource_memory.get_mut(&resource_id) {
        memory.value = 0.0;
    }
    Ok(())
}
