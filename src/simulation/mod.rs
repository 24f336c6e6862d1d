//! Per-tick simulation systems
//!
//! perception -> recall -> decision -> movement / feeding / combat

pub mod decision;
pub mod events;
pub mod feeding;
pub mod fitness;
pub mod movement;
pub mod perception;
pub mod recall;
pub mod tick;

pub use decision::{choose_food_target, path_advance, perceived_threat, pick_wander_target};
pub use events::{EventLog, FoodSource, SimulationEvent};
pub use fitness::{evaluate_fitness, FitnessReport};
pub use movement::{find_path, movement_cost, movement_cost_with_risk};
pub use perception::{observe, observe_and_remember, Observation};
pub use tick::Simulation;
