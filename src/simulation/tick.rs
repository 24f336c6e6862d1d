//! Tick system - orchestrates simulation updates
//!
//! Each tick visits every live actor in id order:
//! age -> hunger -> starvation -> energy -> decision -> observation
//!
//! Deaths are reported once at the end of the tick they happened in. Dead
//! actors stay on their tile as carcasses.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::core::error::Result;
use crate::core::types::{ActorId, Tick};
use crate::entity::actor::STARVATION_HUNGER;
use crate::simulation::decision;
use crate::simulation::events::{EventLog, SimulationEvent};
use crate::simulation::perception::observe_and_remember;
use crate::world::state::World;

/// A world plus the single RNG every random draw comes from
pub struct Simulation {
    world: World,
    rng: ChaCha8Rng,
    log: Option<EventLog>,
}

impl Simulation {
    /// Seed the RNG from `world.config.seed`
    pub fn new(world: World) -> Self {
        let seed = world.config.seed;
        Self {
            world,
            rng: ChaCha8Rng::seed_from_u64(seed),
            log: None,
        }
    }

    /// Keep every event produced from now on in an `EventLog`
    pub fn with_event_log(mut self) -> Self {
        self.log = Some(EventLog::new());
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn current_tick(&self) -> Tick {
        self.world.current_tick
    }

    pub fn event_log(&self) -> Option<&EventLog> {
        self.log.as_ref()
    }

    /// Advance the world one tick
    pub fn tick(&mut self) -> Result<Vec<SimulationEvent>> {
        self.world.current_tick += 1;
        let mut events = Vec::new();

        for actor_id in self.world.living_actor_ids() {
            events.extend(act_actor(&mut self.world, actor_id, &mut self.rng)?);
        }
        events.extend(report_deaths(&mut self.world));

        debug!(tick = self.world.current_tick, events = events.len(), "tick complete");
        if let Some(log) = self.log.as_mut() {
            log.extend(events.iter().cloned());
        }
        Ok(events)
    }

    /// Run up to `ticks` ticks, stopping early once every actor is dead
    ///
    /// Returns the number of ticks actually run.
    pub fn run(&mut self, ticks: Tick) -> Result<Tick> {
        for ran in 0..ticks {
            if self.world.living_actor_ids().is_empty() {
                info!(tick = self.world.current_tick, "no actors left alive");
                return Ok(ran);
            }
            self.tick()?;
        }
        Ok(ticks)
    }
}

/// One actor's turn
///
/// Actors killed earlier in the same tick are skipped.
pub fn act_actor<R: Rng + ?Sized>(world: &mut World, actor_id: ActorId, rng: &mut R) -> Result<Vec<SimulationEvent>> {
    let mut events = Vec::new();
    if !world.actor(actor_id)?.is_alive() {
        return Ok(events);
    }

    let max_hitpoints = world.class_of(world.actor(actor_id)?).max_hitpoints;
    let starvation_damage = world.config.starvation_damage_ratio * max_hitpoints;
    let energy_regen = world.config.energy_regen;
    let tick = world.current_tick;

    let actor = world.actor_mut(actor_id)?;
    actor.age += 1;
    actor.hunger += actor.hunger_rate;

    if actor.hunger > STARVATION_HUNGER {
        actor.take_damage(starvation_damage);
        events.push(SimulationEvent::Starving {
            tick,
            actor: actor_id,
            damage: starvation_damage,
            hitpoints_after: actor.hitpoints,
        });
        if !actor.is_alive() {
            return Ok(events);
        }
    }

    if actor.energy < 0.0 {
        actor.energy += energy_regen;
        return Ok(events);
    }

    events.extend(decision::act(world, actor_id, rng)?);

    if world.actor(actor_id)?.is_alive() {
        observe_and_remember(world, actor_id, rng)?;
    }
    Ok(events)
}

/// Stamp and report every actor that died since the last report
pub fn report_deaths(world: &mut World) -> Vec<SimulationEvent> {
    let tick = world.current_tick;
    let mut events = Vec::new();

    for actor in world.actors.iter_mut() {
        if actor.is_alive() || actor.died_at.is_some() {
            continue;
        }
        actor.died_at = Some(tick);
        actor.clear_path();
        actor.clear_target();
        info!(actor = ?actor.id, name = %actor.name, age = actor.age, tile = ?actor.tile, "actor died");
        events.push(SimulationEvent::Died {
            tick,
            actor: actor.id,
            age: actor.age,
            tile: actor.tile,
        });
    }
    events
}
