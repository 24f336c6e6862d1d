//! Species fitness for evolutionary tuning of class profiles
//!
//! Fitness is the total age reached by every member of a species, measured
//! when the species dies out or the tick cap is hit, whichever comes first.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::Result;
use crate::core::types::{ActorClassId, Tick};
use crate::simulation::tick::Simulation;
use crate::world::state::World;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub class: ActorClassId,
    /// Sum of ages of every actor of the class
    pub fitness: Tick,
    pub ticks_run: Tick,
    pub extinct: bool,
    pub survivors: usize,
}

/// Total age of every actor of `class`, living or dead
pub fn total_age(world: &World, class: ActorClassId) -> Tick {
    world
        .actors
        .iter()
        .filter(|actor| actor.class == class)
        .map(|actor| actor.age)
        .sum()
}

/// Run `simulation` until `class` is extinct or `max_ticks` have passed
pub fn evaluate_fitness(simulation: &mut Simulation, class: ActorClassId, max_ticks: Tick) -> Result<FitnessReport> {
    simulation.world().actor_class(class)?;

    let mut ticks_run = 0;
    while ticks_run < max_ticks && simulation.world().living_count(class) > 0 {
        simulation.tick()?;
        ticks_run += 1;
    }

    let world = simulation.world();
    let survivors = world.living_count(class);
    let report = FitnessReport {
        class,
        fitness: total_age(world, class),
        ticks_run,
        extinct: survivors == 0,
        survivors,
    };
    info!(
        class = ?class,
        fitness = report.fitness,
        ticks_run,
        survivors,
        "fitness evaluated"
    );
    Ok(report)
}
