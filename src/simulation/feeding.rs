//! Eating resources and carcasses
//!
//! An actor eats just enough to bring hunger to zero, limited by what is
//! there. Food efficiency converts eaten units into hunger relief: a class
//! with plant efficiency 0.5 needs twice the berries to fill up.

use rand::Rng;
use tracing::debug;

use crate::combat::resolution::perform_attack;
use crate::core::error::Result;
use crate::core::types::{ActorId, ResourceId};
use crate::entity::actor::STARVATION_HUNGER;
use crate::entity::actor_class::ActorClass;
use crate::simulation::events::{FoodSource, SimulationEvent};
use crate::world::resource::Resource;
use crate::world::state::World;

fn skill_surcharge(distance: f32, skill: f32) -> f32 {
    if skill > 0.0 {
        distance / skill
    } else {
        f32::INFINITY
    }
}

/// Energy spent per unit of `resource`, infinite if the class can't reach it
pub fn eating_energy_cost(world: &World, class: &ActorClass, resource: &Resource) -> f32 {
    if class.plant_efficiency <= 0.0 {
        return f32::INFINITY;
    }
    let Ok(resource_class) = world.resource_class(resource.class) else {
        return f32::INFINITY;
    };

    let mut cost = class.consumption_energy_cost * resource_class.gathering_difficulty / class.plant_efficiency;

    let depth = resource_class.depth;
    let underwater = world
        .terrain_at(resource.tile)
        .is_some_and(|t| t.water_depth > 0.0);

    if depth > 0.0 && underwater {
        cost += skill_surcharge(depth, class.dive_speed);
    } else if depth > 0.0 {
        cost += skill_surcharge(depth, class.dig_speed);
    } else if depth < -class.height {
        // Out of reach overhead
        cost += skill_surcharge(-depth - class.height, class.climb_speed);
    }
    cost
}

/// Energy spent per unit of meat
pub fn carcass_energy_cost(class: &ActorClass) -> f32 {
    if class.meat_efficiency <= 0.0 {
        return f32::INFINITY;
    }
    class.consumption_energy_cost / class.meat_efficiency
}

/// Units needed to bring hunger to zero at the given efficiency
fn required_amount(hunger: f32, consumption: f32, efficiency: f32) -> f32 {
    (hunger / STARVATION_HUNGER).max(0.0) * consumption / efficiency
}

fn hunger_relief(amount: f32, consumption: f32, efficiency: f32) -> f32 {
    amount * efficiency / consumption * STARVATION_HUNGER
}

/// Eat from a resource, then suffer its hazards
pub fn eat_resource<R: Rng + ?Sized>(
    world: &mut World,
    actor_id: ActorId,
    resource_id: ResourceId,
    rng: &mut R,
) -> Result<Vec<SimulationEvent>> {
    let mut events = Vec::new();

    let actor = world.actor(actor_id)?;
    let class = world.class_of(actor);
    let resource = world.resource(resource_id)?;
    if resource.is_depleted() || class.consumption <= 0.0 {
        return Ok(events);
    }

    let energy_cost = eating_energy_cost(world, class, resource);
    if !energy_cost.is_finite() {
        return Ok(events);
    }

    let efficiency = class.plant_efficiency;
    let consumption = class.consumption;
    let wanted = required_amount(actor.hunger, consumption, efficiency).min(resource.amount);
    if wanted <= 0.0 {
        return Ok(events);
    }
    let hazards = world.resource_class(resource.class)?.hazards.clone();

    let amount = world.resource_mut(resource_id)?.take(wanted);
    let tick = world.current_tick;
    let eater = world.actor_mut(actor_id)?;
    let hunger_before = eater.hunger;
    eater.energy -= energy_cost;
    eater.hunger = (eater.hunger - hunger_relief(amount, consumption, efficiency)).max(0.0);

    debug!(actor = ?actor_id, resource = ?resource_id, amount, hunger = eater.hunger, "ate resource");
    events.push(SimulationEvent::Ate {
        tick,
        actor: actor_id,
        source: FoodSource::Resource(resource_id),
        amount,
        hunger_before,
        hunger_after: eater.hunger,
        energy_cost,
    });

    for hazard in &hazards {
        events.push(perform_attack(world, None, actor_id, hazard, rng)?);
    }
    Ok(events)
}

/// Eat from a dead actor's remains
pub fn eat_carcass(world: &mut World, actor_id: ActorId, carcass_id: ActorId) -> Result<Option<SimulationEvent>> {
    let actor = world.actor(actor_id)?;
    let class = world.class_of(actor);
    let carcass = world.actor(carcass_id)?;
    if carcass.is_alive() || carcass.meat <= 0.0 || class.consumption <= 0.0 {
        return Ok(None);
    }

    let energy_cost = carcass_energy_cost(class);
    if !energy_cost.is_finite() {
        return Ok(None);
    }

    let efficiency = class.meat_efficiency;
    let consumption = class.consumption;
    let amount = required_amount(actor.hunger, consumption, efficiency).min(carcass.meat);
    if amount <= 0.0 {
        return Ok(None);
    }

    world.actor_mut(carcass_id)?.meat -= amount;
    let tick = world.current_tick;
    let eater = world.actor_mut(actor_id)?;
    let hunger_before = eater.hunger;
    eater.energy -= energy_cost;
    eater.hunger = (eater.hunger - hunger_relief(amount, consumption, efficiency)).max(0.0);

    debug!(actor = ?actor_id, carcass = ?carcass_id, amount, hunger = eater.hunger, "ate carcass");
    Ok(Some(SimulationEvent::Ate {
        tick,
        actor: actor_id,
        source: FoodSource::Carcass(carcass_id),
        amount,
        hunger_before,
        hunger_after: eater.hunger,
        energy_cost,
    }))
}
