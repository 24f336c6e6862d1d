//! The tile grid, terrain and food, and the arena that owns every entity

pub mod demo;
pub mod grid;
pub mod resource;
pub mod state;
pub mod terrain;

pub use grid::{Grid, Tile};
pub use resource::{Resource, ResourceClass};
pub use state::World;
pub use terrain::TerrainProfile;
