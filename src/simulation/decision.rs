//! Behavior states and the per-tick decision for one actor
//!
//! Wander -> Forage when hunger rises past `forage_threshold`, back when it
//! drops below `sated_threshold`. Either can switch to Flee when remembered
//! predators make the current tile too dangerous; Flee returns to Wander once
//! the threat has subsided.

use rand::Rng;
use tracing::debug;

use crate::combat::resolution::exchange_blows;
use crate::core::error::Result;
use crate::core::types::{ActorId, TilePos};
use crate::entity::actor::{Actor, BehaviorState, Target};
use crate::simulation::events::SimulationEvent;
use crate::simulation::feeding::{eat_carcass, eat_resource};
use crate::simulation::movement::{find_path, movement_cost, movement_cost_with_risk, predator_risk};
use crate::simulation::recall::{forget_depleted_resource, invalidate_phantoms, recall_actor, recall_resource};
use crate::world::state::World;

/// Wander samples are accepted when their risk-aware cost is below this,
/// divided by the number of tries left
const WANDER_ACCEPT_COST: f32 = 10.0;

// Food ranking weights
const DISTANCE_WEIGHT: f32 = 0.05;
const RISK_WEIGHT: f32 = 5.0;
const STALENESS_WEIGHT: f32 = 2.0;

/// Change behavior state, emitting `StateChanged` if it actually changed
pub fn set_state(
    world: &mut World,
    actor_id: ActorId,
    state: BehaviorState,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    let tick = world.current_tick;
    let actor = world.actor_mut(actor_id)?;
    if actor.state == state {
        return Ok(());
    }
    let from = actor.state;
    actor.state = state;
    debug!(actor = ?actor_id, ?from, to = ?state, "state changed");
    events.push(SimulationEvent::StateChanged {
        tick,
        actor: actor_id,
        from,
        to: state,
    });
    Ok(())
}

/// Danger the actor believes it faces on `tile`
///
/// Built from remembered predator positions only.
pub fn perceived_threat(world: &World, actor: &Actor, tile: TilePos) -> f32 {
    predator_risk(world, actor, tile)
}

/// Run one decision for a live actor that has energy to act
pub fn act<R: Rng + ?Sized>(world: &mut World, actor_id: ActorId, rng: &mut R) -> Result<Vec<SimulationEvent>> {
    let mut events = Vec::new();
    check_threat(world, actor_id, &mut events)?;

    match world.actor(actor_id)?.state {
        BehaviorState::Wander => wander(world, actor_id, rng, &mut events)?,
        BehaviorState::Forage => forage(world, actor_id, rng, &mut events)?,
        BehaviorState::Flee => flee(world, actor_id, rng, &mut events)?,
    }
    Ok(events)
}

fn check_threat(world: &mut World, actor_id: ActorId, events: &mut Vec<SimulationEvent>) -> Result<()> {
    let actor = world.actor(actor_id)?;
    if actor.state == BehaviorState::Flee {
        return Ok(());
    }
    let threat = perceived_threat(world, actor, actor.tile);
    if threat > world.config.flee_threshold {
        let actor = world.actor_mut(actor_id)?;
        actor.clear_target();
        actor.clear_path();
        set_state(world, actor_id, BehaviorState::Flee, events)?;
    }
    Ok(())
}

/// Random tile in the square of half-width `wander_radius` around `center`
fn sample_nearby<R: Rng + ?Sized>(world: &World, center: TilePos, rng: &mut R) -> Option<TilePos> {
    let radius = world.config.wander_radius;
    let x_range = center.x.saturating_sub(radius).max(0)..center.x.saturating_add(radius).min(world.grid.width);
    let y_range = center.y.saturating_sub(radius).max(0)..center.y.saturating_add(radius).min(world.grid.height);
    if x_range.is_empty() || y_range.is_empty() {
        return None;
    }
    Some(TilePos::new(rng.gen_range(x_range), rng.gen_range(y_range)))
}

/// Sample a wander goal, preferring cheap and safe tiles
///
/// The acceptance bar tightens as tries run out; the last sample is kept if
/// none passes.
pub fn pick_wander_target<R: Rng + ?Sized>(world: &World, actor_id: ActorId, rng: &mut R) -> Result<Option<TilePos>> {
    let actor = world.actor(actor_id)?;
    let tries = world.config.wander_tries;
    let mut candidate = None;

    for attempt in 0..tries {
        let Some(pos) = sample_nearby(world, actor.tile, rng) else {
            break;
        };
        candidate = Some(pos);
        let remaining = (tries - attempt) as f32;
        if movement_cost_with_risk(world, actor, actor.tile, pos) < WANDER_ACCEPT_COST / remaining {
            break;
        }
    }
    Ok(candidate)
}

/// Keep walking the current path, planning a new random one when it runs out
fn roam<R: Rng + ?Sized>(
    world: &mut World,
    actor_id: ActorId,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    if world.actor(actor_id)?.path.is_empty() {
        if let Some(goal) = pick_wander_target(world, actor_id, rng)? {
            if let Some(path) = find_path(world, actor_id, goal)? {
                world.actor_mut(actor_id)?.path = path;
            }
        }
    }
    path_advance(world, actor_id, rng, events)
}

fn wander<R: Rng + ?Sized>(
    world: &mut World,
    actor_id: ActorId,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    world.actor_mut(actor_id)?.clear_target();
    roam(world, actor_id, rng, events)?;

    if world.actor(actor_id)?.hunger > world.config.forage_threshold {
        world.actor_mut(actor_id)?.clear_path();
        set_state(world, actor_id, BehaviorState::Forage, events)?;
    }
    Ok(())
}

fn forage<R: Rng + ?Sized>(
    world: &mut World,
    actor_id: ActorId,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    let actor = world.actor(actor_id)?;
    if actor.hunger < world.config.sated_threshold {
        let actor = world.actor_mut(actor_id)?;
        actor.clear_target();
        actor.clear_path();
        return set_state(world, actor_id, BehaviorState::Wander, events);
    }

    if actor.target != Target::None && !actor.path.is_empty() {
        // Prey may have walked onto us before we moved
        if target_is_here(world, actor_id)? && act_on_target(world, actor_id, rng, events)? {
            let actor = world.actor_mut(actor_id)?;
            actor.clear_path();
            actor.target_tile = Some(actor.tile);
            return Ok(());
        }
        let target = world.actor(actor_id)?.target;
        if let Target::Hunt(prey) = target {
            retarget_hunt(world, actor_id, prey, rng)?;
        }
        return advance_and_act(world, actor_id, rng, events);
    }

    let actor = world.actor(actor_id)?;
    if actor.target != Target::None && actor.target_tile == Some(actor.tile) {
        if act_on_target(world, actor_id, rng, events)? {
            return Ok(());
        }
        world.actor_mut(actor_id)?.clear_target();
    }

    let Some((target, goal)) = choose_food_target(world, actor_id)? else {
        world.actor_mut(actor_id)?.clear_target();
        return roam(world, actor_id, rng, events);
    };

    if goal == world.actor(actor_id)?.tile {
        let actor = world.actor_mut(actor_id)?;
        actor.target = target;
        actor.target_tile = Some(goal);
        actor.clear_path();
        if !act_on_target(world, actor_id, rng, events)? {
            world.actor_mut(actor_id)?.clear_target();
        }
        return Ok(());
    }

    match find_path(world, actor_id, goal)? {
        Some(path) => {
            debug!(actor = ?actor_id, ?target, ?goal, steps = path.len(), "foraging towards target");
            let actor = world.actor_mut(actor_id)?;
            actor.target = target;
            actor.target_tile = Some(goal);
            actor.path = path;
            advance_and_act(world, actor_id, rng, events)
        }
        None => {
            world.actor_mut(actor_id)?.clear_target();
            roam(world, actor_id, rng, events)
        }
    }
}

/// Whether the target food or prey actually stands on the actor's tile
fn target_is_here(world: &World, actor_id: ActorId) -> Result<bool> {
    let actor = world.actor(actor_id)?;
    Ok(match actor.target {
        Target::None => false,
        Target::Resource(resource_id) => world.resource(resource_id)?.tile == actor.tile,
        Target::Hunt(prey) => world.actor(prey)?.tile == actor.tile,
    })
}

/// Step along the path, then eat or attack if that step reached the target
///
/// A fight started by the step itself counts as acting on the target.
fn advance_and_act<R: Rng + ?Sized>(
    world: &mut World,
    actor_id: ActorId,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    let before = events.len();
    path_advance(world, actor_id, rng, events)?;
    let fought = events[before..]
        .iter()
        .any(|e| matches!(e, SimulationEvent::Attack { attacker: Some(a), .. } if *a == actor_id));
    if fought || !world.actor(actor_id)?.path.is_empty() || !target_is_here(world, actor_id)? {
        return Ok(());
    }
    let acted = act_on_target(world, actor_id, rng, events)?;
    let actor = world.actor_mut(actor_id)?;
    if acted {
        actor.target_tile = Some(actor.tile);
    } else {
        actor.clear_target();
    }
    Ok(())
}

/// Occasionally re-plan towards where the prey was last seen
///
/// The closer the prey, the more often the hunter re-plans.
fn retarget_hunt<R: Rng + ?Sized>(world: &mut World, actor_id: ActorId, prey: ActorId, rng: &mut R) -> Result<()> {
    let actor = world.actor(actor_id)?;
    let Some(memory) = actor.actor_memory.get(&prey) else {
        return Ok(());
    };
    let prey_tile = memory.tile;
    if actor.target_tile == Some(prey_tile) {
        return Ok(());
    }
    let distance = actor.tile.distance(&prey_tile).ceil() as u32;
    if rng.gen_range(0..distance + 2) != 0 {
        return Ok(());
    }
    if let Some(path) = find_path(world, actor_id, prey_tile)? {
        let actor = world.actor_mut(actor_id)?;
        actor.path = path;
        actor.target_tile = Some(prey_tile);
    }
    Ok(())
}

/// Best remembered food and the tile it was remembered at
///
/// Score is `value / (1 + 0.05·dist + 5·risk/hunger_ratio + 2·age/horizon)`.
/// Ties keep the first candidate in id order, resources before actors.
pub fn choose_food_target(world: &World, actor_id: ActorId) -> Result<Option<(Target, TilePos)>> {
    let actor = world.actor(actor_id)?;
    let hunger_ratio = actor.hunger_ratio().max(f32::EPSILON);
    let score = |tile: TilePos, value: f32, risk: f32, memory_age: f32| {
        value
            / (1.0
                + DISTANCE_WEIGHT * actor.tile.distance(&tile)
                + RISK_WEIGHT * risk / hunger_ratio
                + STALENESS_WEIGHT * memory_age / actor.memory_horizon)
    };

    let mut best: Option<(f32, Target, TilePos)> = None;
    let mut consider = |candidate: f32, target: Target, tile: TilePos| {
        if candidate > 0.0 && best.map_or(true, |(top, _, _)| candidate > top) {
            best = Some((candidate, target, tile));
        }
    };

    for (resource_id, memory) in actor.resource_memory.fresh(actor.age, actor.memory_horizon) {
        // Seen for ourselves to be empty
        if memory.tile == actor.tile && world.resource(resource_id)?.is_depleted() {
            continue;
        }
        let candidate = score(memory.tile, memory.value, memory.risk, memory.age_at(actor.age));
        consider(candidate, Target::Resource(resource_id), memory.tile);
    }

    for (subject_id, memory) in actor.actor_memory.fresh(actor.age, actor.memory_horizon) {
        let subject = world.actor(subject_id)?;
        if memory.tile == actor.tile && subject.tile != actor.tile {
            continue;
        }
        if subject.meat <= 0.0 {
            continue;
        }
        let candidate = score(memory.tile, memory.value, memory.risk, memory.age_at(actor.age));
        consider(candidate, Target::Hunt(subject_id), memory.tile);
    }

    Ok(best.map(|(_, target, tile)| (target, tile)))
}

/// Deal with the target on the actor's tile
///
/// Returns false when there was nothing to do: the food is gone or the prey
/// moved on.
fn act_on_target<R: Rng + ?Sized>(
    world: &mut World,
    actor_id: ActorId,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Result<bool> {
    let actor = world.actor(actor_id)?;
    let here = actor.tile;
    let target = actor.target;

    match target {
        Target::None => Ok(false),
        Target::Resource(resource_id) => {
            if world.resource(resource_id)?.is_depleted() {
                forget_depleted_resource(world, actor_id, resource_id)?;
                return Ok(false);
            }
            let eaten = eat_resource(world, actor_id, resource_id, rng)?;
            let ate = !eaten.is_empty();
            events.extend(eaten);
            let memory = recall_resource(world, actor_id, resource_id)?;
            world.actor_mut(actor_id)?.resource_memory.record(resource_id, memory);
            Ok(ate)
        }
        Target::Hunt(prey) => {
            let quarry = world.actor(prey)?;
            if quarry.tile != here {
                return Ok(false);
            }
            if quarry.is_alive() {
                events.extend(exchange_blows(world, actor_id, prey, rng)?);
                return Ok(true);
            }
            let meal = eat_carcass(world, actor_id, prey)?;
            let memory = recall_actor(world, actor_id, prey)?;
            world.actor_mut(actor_id)?.actor_memory.record(prey, memory);
            match meal {
                Some(event) => {
                    events.push(event);
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}

fn flee<R: Rng + ?Sized>(
    world: &mut World,
    actor_id: ActorId,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    let actor = world.actor(actor_id)?;
    let threat = perceived_threat(world, actor, actor.tile);
    if threat < world.config.flee_threshold * world.config.flee_recovery_ratio {
        world.actor_mut(actor_id)?.clear_path();
        return set_state(world, actor_id, BehaviorState::Wander, events);
    }

    if actor.path.is_empty() {
        if let Some(refuge) = pick_refuge(world, actor_id, rng)? {
            if let Some(path) = find_path(world, actor_id, refuge)? {
                debug!(actor = ?actor_id, threat, ?refuge, "fleeing");
                world.actor_mut(actor_id)?.path = path;
            }
        }
    }
    path_advance(world, actor_id, rng, events)
}

/// Sampled tile with the lowest perceived threat
pub fn pick_refuge<R: Rng + ?Sized>(world: &World, actor_id: ActorId, rng: &mut R) -> Result<Option<TilePos>> {
    let actor = world.actor(actor_id)?;
    let class = world.class_of(actor);
    let mut best: Option<(f32, TilePos)> = None;

    for _ in 0..world.config.wander_tries {
        let Some(pos) = sample_nearby(world, actor.tile, rng) else {
            break;
        };
        if !world.terrain_at(pos).is_some_and(|t| class.can_enter(t)) {
            continue;
        }
        let threat = perceived_threat(world, actor, pos);
        if best.map_or(true, |(lowest, _)| threat < lowest) {
            best = Some((threat, pos));
        }
    }
    Ok(best.map(|(_, pos)| pos))
}

/// Take one step along the current path
///
/// Entering a tile invalidates memories of actors supposedly standing on it,
/// and catching up with the hunted prey starts a fight.
pub fn path_advance<R: Rng + ?Sized>(
    world: &mut World,
    actor_id: ActorId,
    rng: &mut R,
    events: &mut Vec<SimulationEvent>,
) -> Result<()> {
    let actor = world.actor(actor_id)?;
    let Some(&next) = actor.path.front() else {
        return Ok(());
    };
    let from = actor.tile;
    let cost = movement_cost(world, actor, from, next);
    if !cost.is_finite() || from.manhattan(&next) != 1 {
        world.actor_mut(actor_id)?.clear_path();
        return Ok(());
    }

    world.grid.move_actor(actor_id, from, next)?;
    let tick = world.current_tick;
    let actor = world.actor_mut(actor_id)?;
    actor.path.pop_front();
    actor.tile = next;
    actor.energy -= cost;
    let target = actor.target;
    events.push(SimulationEvent::Moved {
        tick,
        actor: actor_id,
        from,
        to: next,
        cost,
    });

    invalidate_phantoms(world, actor_id, next)?;

    if let Target::Hunt(prey) = target {
        if world.actor(prey)?.tile == next {
            events.extend(exchange_blows(world, actor_id, prey, rng)?);
            let actor = world.actor_mut(actor_id)?;
            actor.clear_path();
            actor.target_tile = Some(next);
        }
    }
    Ok(())
}
