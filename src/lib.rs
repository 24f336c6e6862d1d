//! Ecotile - tile-grid creature simulation
//!
//! Creatures with species profiles wander, forage, hunt and flee on a grid of
//! terrain tiles. They plan routes with A*, notice each other through sight,
//! smell and hearing, and act on what they remember rather than on the true
//! world state.

pub mod combat;
pub mod core;
pub mod entity;
pub mod pathfinding;
pub mod simulation;
pub mod world;
