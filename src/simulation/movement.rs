//! Movement cost model and path requests
//!
//! Plain movement cost is what a step actually costs in energy. The
//! risk-aware variant inflates it by terrain hazards and remembered predators
//! and is what actors plan with, so they route around danger without paying
//! for it.

use std::collections::VecDeque;

use tracing::warn;

use crate::core::error::Result;
use crate::core::types::{ActorId, TilePos};
use crate::entity::actor::Actor;
use crate::entity::actor_class::{aptitude_factor, ActorClass};
use crate::pathfinding::astar::{AStar, SearchState};
use crate::world::state::World;

/// Penalty per degree outside the comfortable range
const TEMPERATURE_PENALTY_RATE: f32 = 0.1;

/// Degrees outside `[cold_limit, heat_limit]`
pub fn temperature_penalty(class: &ActorClass, temperature: f32) -> f32 {
    if temperature < class.cold_limit {
        class.cold_limit - temperature
    } else if temperature > class.heat_limit {
        temperature - class.heat_limit
    } else {
        0.0
    }
}

/// Energy cost of stepping from `from` onto `to`
///
/// Infinite when `to` is off the grid or can't be entered by the actor's class.
pub fn movement_cost(world: &World, actor: &Actor, from: TilePos, to: TilePos) -> f32 {
    let Some(target) = world.grid.tile(to) else {
        return f32::INFINITY;
    };
    let class = world.class_of(actor);
    let terrain = world.terrain_of(target);
    if !class.can_enter(terrain) {
        return f32::INFINITY;
    }

    let mut cost = class.terrain_cost(terrain, world.config.movement_cost_scale);

    // Uphill only
    let start_elevation = world.grid.tile(from).map_or(target.elevation, |t| t.elevation);
    cost *= aptitude_factor((target.elevation - start_elevation).max(0.0), class.steep_navigation);

    cost *= 1.0 + TEMPERATURE_PENALTY_RATE * temperature_penalty(class, target.temperature);
    cost
}

/// Movement cost inflated by hazard and predator risk at `to`
pub fn movement_cost_with_risk(world: &World, actor: &Actor, from: TilePos, to: TilePos) -> f32 {
    let cost = movement_cost(world, actor, from, to);
    if !cost.is_finite() {
        return cost;
    }
    let hazard = world
        .terrain_at(to)
        .map_or(0.0, |terrain| world.class_of(actor).hazard_risk(&terrain.hazards));
    cost * (1.0 + hazard + predator_risk(world, actor, to))
}

/// Risk from remembered predators whose last known tile is near `to`
///
/// Uses where the actor believes predators are, never where they actually are.
pub fn predator_risk(world: &World, actor: &Actor, to: TilePos) -> f32 {
    let radius = world.config.predator_risk_radius;
    let decay = world.config.predator_risk_decay;

    actor
        .actor_memory
        .fresh(actor.age, actor.memory_horizon)
        .filter(|(_, memory)| memory.risk > 0.0)
        .filter_map(|(subject, memory)| {
            let distance = memory.tile.distance(&to);
            if distance >= radius {
                return None;
            }
            let predator = world.actor(subject).ok()?;
            let predatory = world.class_of(predator).predatory_ratio();
            Some(memory.risk / (1.0 + distance * decay) * predatory)
        })
        .sum()
}

/// Admissible A* heuristic: Manhattan distance × cheapest possible step
pub fn estimate(class: &ActorClass, scale: f32, from: TilePos, to: TilePos) -> f32 {
    from.manhattan(&to) as f32 * class.min_step_cost(scale)
}

/// In-bounds 4-neighbors the class can stand on
pub fn passable_neighbors(world: &World, class: &ActorClass, tile: TilePos) -> Vec<TilePos> {
    world
        .grid
        .neighbors(tile)
        .filter(|pos| world.terrain_at(*pos).is_some_and(|t| class.can_enter(t)))
        .collect()
}

/// Plan a risk-aware path from the actor's tile to `goal`
///
/// The returned path excludes the starting tile; an empty path means the
/// actor already stands on the goal. `None` when the goal is unreachable or
/// the search ran over `max_search_steps`.
pub fn find_path(world: &World, actor_id: ActorId, goal: TilePos) -> Result<Option<VecDeque<TilePos>>> {
    let actor = world.actor(actor_id)?;
    if actor.tile == goal {
        return Ok(Some(VecDeque::new()));
    }

    let class = world.class_of(actor);
    match world.terrain_at(goal) {
        Some(terrain) if class.can_enter(terrain) => {}
        _ => return Ok(None),
    }

    let scale = world.config.movement_cost_scale;
    let max_steps = world.config.max_search_steps;
    let mut search = AStar::new(
        |tile: &TilePos| passable_neighbors(world, class, *tile),
        |from: &TilePos, to: &TilePos| movement_cost_with_risk(world, actor, *from, *to),
        |from: &TilePos, to: &TilePos| estimate(class, scale, *from, *to),
    );

    search.start(actor.tile, goal);
    match search.finish_within(max_steps)? {
        SearchState::PathFound => Ok(search
            .current_path()
            .map(|path| path.into_iter().skip(1).collect())),
        SearchState::NoPathExists => Ok(None),
        state => {
            warn!(
                actor = ?actor_id,
                ?goal,
                ?state,
                expanded = search.expanded(),
                "path search hit the step cap"
            );
            Ok(None)
        }
    }
}
