//! World state - the arena owning every tile, profile and entity
//!
//! Profiles and entities are stored in vectors and addressed by index ids.
//! Ids are only ever handed out by the `add_*` / `spawn_*` calls, so an id
//! obtained from this world always resolves.

use std::collections::VecDeque;

use crate::core::config::SimulationConfig;
use crate::core::error::{EcoError, Result};
use crate::core::types::{ActorClassId, ActorId, ResourceClassId, ResourceId, TerrainId, Tick, TilePos};
use crate::entity::actor::{Actor, BehaviorState, Target};
use crate::entity::actor_class::ActorClass;
use crate::entity::memory::MemoryStore;
use crate::world::grid::{Grid, Tile};
use crate::world::resource::{Resource, ResourceClass};
use crate::world::terrain::TerrainProfile;

#[derive(Debug, Clone)]
pub struct World {
    pub config: SimulationConfig,
    pub grid: Grid,
    pub current_tick: Tick,
    terrains: Vec<TerrainProfile>,
    actor_classes: Vec<ActorClass>,
    resource_classes: Vec<ResourceClass>,
    pub actors: Vec<Actor>,
    pub resources: Vec<Resource>,
}

impl World {
    /// Create a world whose every tile starts as `base_terrain`
    ///
    /// The base terrain is registered as `TerrainId(0)`.
    pub fn new(width: i32, height: i32, base_terrain: TerrainProfile, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut world = Self {
            config,
            grid: Grid::new(width, height, TerrainId(0)),
            current_tick: 0,
            terrains: Vec::new(),
            actor_classes: Vec::new(),
            resource_classes: Vec::new(),
            actors: Vec::new(),
            resources: Vec::new(),
        };
        world.add_terrain(base_terrain);
        Ok(world)
    }

    // === BOOTSTRAP ===

    pub fn add_terrain(&mut self, mut terrain: TerrainProfile) -> TerrainId {
        let id = TerrainId(self.terrains.len() as u32);
        terrain.id = id;
        self.terrains.push(terrain);
        id
    }

    /// Register a species profile
    ///
    /// Hitpoints must be positive and finite: risk estimates divide by them.
    pub fn add_actor_class(&mut self, mut class: ActorClass) -> Result<ActorClassId> {
        if !(class.max_hitpoints.is_finite() && class.max_hitpoints > 0.0) {
            return Err(EcoError::InvalidActorClass {
                name: class.name,
                reason: format!("max_hitpoints must be positive, got {}", class.max_hitpoints),
            });
        }
        let id = ActorClassId(self.actor_classes.len() as u32);
        class.id = id;
        self.actor_classes.push(class);
        Ok(id)
    }

    pub fn add_resource_class(&mut self, mut class: ResourceClass) -> ResourceClassId {
        let id = ResourceClassId(self.resource_classes.len() as u32);
        class.id = id;
        self.resource_classes.push(class);
        id
    }

    /// Set terrain and climate of one tile
    pub fn paint_tile(
        &mut self,
        pos: TilePos,
        terrain: TerrainId,
        elevation: f32,
        temperature: f32,
        light_level: f32,
    ) -> Result<()> {
        if terrain.index() >= self.terrains.len() {
            return Err(EcoError::UnknownTerrain(terrain));
        }
        let tile = self.grid.get_mut(pos)?;
        tile.terrain = terrain;
        tile.elevation = elevation;
        tile.temperature = temperature;
        tile.light_level = light_level.clamp(0.0, 1.0);
        Ok(())
    }

    /// Paint terrain only, keeping the tile's climate
    pub fn paint_terrain(&mut self, pos: TilePos, terrain: TerrainId) -> Result<()> {
        let (elevation, temperature, light) = {
            let tile = self.grid.get(pos)?;
            (tile.elevation, tile.temperature, tile.light_level)
        };
        self.paint_tile(pos, terrain, elevation, temperature, light)
    }

    /// Place a new actor of `class` on a tile it can stand on
    pub fn spawn_actor(&mut self, class: ActorClassId, pos: TilePos) -> Result<ActorId> {
        let profile = self.actor_class(class)?;
        let terrain = self.terrain_of(self.grid.get(pos)?);
        if !profile.can_enter(terrain) {
            return Err(EcoError::Impassable { class, pos });
        }
        let name = profile.name.clone();
        let hitpoints = profile.max_hitpoints;
        let meat = profile.meat_amount;

        let id = ActorId(self.actors.len() as u32);
        self.actors.push(Actor {
            id,
            name,
            class,
            energy: 0.0,
            hunger: 0.0,
            hitpoints,
            meat,
            age: 0,
            tile: pos,
            path: VecDeque::new(),
            state: BehaviorState::Wander,
            target: Target::None,
            target_tile: None,
            hunger_rate: self.config.hunger_rate,
            observation_difficulty: self.config.observation_difficulty,
            memory_horizon: self.config.memory_horizon,
            actor_memory: MemoryStore::new(),
            resource_memory: MemoryStore::new(),
            died_at: None,
        });
        self.grid.add_actor(id, pos)?;
        Ok(id)
    }

    /// Place a resource with `food_amount × resource_amount_multiplier` food
    pub fn spawn_resource(&mut self, class: ResourceClassId, pos: TilePos) -> Result<ResourceId> {
        let amount = self.resource_class(class)?.food_amount * self.config.resource_amount_multiplier;
        self.spawn_resource_with_amount(class, pos, amount)
    }

    pub fn spawn_resource_with_amount(&mut self, class: ResourceClassId, pos: TilePos, amount: f32) -> Result<ResourceId> {
        self.resource_class(class)?;
        if !self.grid.in_bounds(pos) {
            return Err(EcoError::OutOfBounds(pos));
        }
        let id = ResourceId(self.resources.len() as u32);
        self.resources.push(Resource {
            id,
            class,
            amount,
            tile: pos,
        });
        self.grid.add_resource(id, pos)?;
        Ok(id)
    }

    // === LOOKUPS ===

    pub fn terrain(&self, id: TerrainId) -> Result<&TerrainProfile> {
        self.terrains.get(id.index()).ok_or(EcoError::UnknownTerrain(id))
    }

    /// Terrain profile of a tile
    ///
    /// Tiles only ever hold registered terrain ids.
    pub fn terrain_of(&self, tile: &Tile) -> &TerrainProfile {
        &self.terrains[tile.terrain.index()]
    }

    /// Terrain at `pos`, or `None` off the grid
    pub fn terrain_at(&self, pos: TilePos) -> Option<&TerrainProfile> {
        self.grid.tile(pos).map(|tile| self.terrain_of(tile))
    }

    pub fn terrains(&self) -> &[TerrainProfile] {
        &self.terrains
    }

    pub fn actor_class(&self, id: ActorClassId) -> Result<&ActorClass> {
        self.actor_classes.get(id.index()).ok_or(EcoError::UnknownActorClass(id))
    }

    pub fn actor_classes(&self) -> &[ActorClass] {
        &self.actor_classes
    }

    pub fn resource_class(&self, id: ResourceClassId) -> Result<&ResourceClass> {
        self.resource_classes
            .get(id.index())
            .ok_or(EcoError::UnknownResourceClass(id))
    }

    pub fn actor(&self, id: ActorId) -> Result<&Actor> {
        self.actors.get(id.index()).ok_or(EcoError::UnknownActor(id))
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor> {
        self.actors.get_mut(id.index()).ok_or(EcoError::UnknownActor(id))
    }

    /// Class of a spawned actor
    pub fn class_of(&self, actor: &Actor) -> &ActorClass {
        &self.actor_classes[actor.class.index()]
    }

    pub fn resource(&self, id: ResourceId) -> Result<&Resource> {
        self.resources.get(id.index()).ok_or(EcoError::UnknownResource(id))
    }

    pub fn resource_mut(&mut self, id: ResourceId) -> Result<&mut Resource> {
        self.resources.get_mut(id.index()).ok_or(EcoError::UnknownResource(id))
    }

    pub fn living_actor_ids(&self) -> Vec<ActorId> {
        self.actors.iter().filter(|a| a.is_alive()).map(|a| a.id).collect()
    }

    pub fn living_count(&self, class: ActorClassId) -> usize {
        self.actors
            .iter()
            .filter(|a| a.class == class && a.is_alive())
            .count()
    }
}
