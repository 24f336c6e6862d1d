//! Tile grid and occupancy
//!
//! Tiles are created with the grid and never destroyed. Occupancy is the only
//! mutable part of a tile and changes only through the add/remove/move calls
//! here, so an actor is always registered on exactly one tile.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::error::{EcoError, Result};
use crate::core::types::{ActorId, ResourceId, TerrainId, TilePos};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub pos: TilePos,
    pub terrain: TerrainId,
    pub elevation: f32,
    pub temperature: f32,
    /// Ambient light in [0, 1]
    pub light_level: f32,
    actors: BTreeSet<ActorId>,
    resources: BTreeSet<ResourceId>,
}

impl Tile {
    fn new(pos: TilePos, terrain: TerrainId) -> Self {
        Self {
            pos,
            terrain,
            elevation: 0.0,
            temperature: 20.0,
            light_level: 1.0,
            actors: BTreeSet::new(),
            resources: BTreeSet::new(),
        }
    }

    pub fn actors(&self) -> &BTreeSet<ActorId> {
        &self.actors
    }

    pub fn resources(&self) -> &BTreeSet<ResourceId> {
        &self.resources
    }

    pub fn is_occupied(&self) -> bool {
        !self.actors.is_empty() || !self.resources.is_empty()
    }
}

/// Fixed-size row-major grid of tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Grid with every tile painted as `terrain`
    pub fn new(width: i32, height: i32, terrain: TerrainId) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(TilePos::new(x, y), terrain));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: TilePos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    #[inline]
    pub fn tile_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        self.index(pos).map(|i| &mut self.tiles[i])
    }

    /// Like `tile`, failing with `OutOfBounds`
    pub fn get(&self, pos: TilePos) -> Result<&Tile> {
        self.tile(pos).ok_or(EcoError::OutOfBounds(pos))
    }

    pub fn get_mut(&mut self, pos: TilePos) -> Result<&mut Tile> {
        self.tile_mut(pos).ok_or(EcoError::OutOfBounds(pos))
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// In-bounds 4-neighborhood (left, right, up, down)
    pub fn neighbors(&self, pos: TilePos) -> impl Iterator<Item = TilePos> + '_ {
        pos.neighbors4().into_iter().filter(move |p| self.in_bounds(*p))
    }

    pub fn add_actor(&mut self, actor: ActorId, pos: TilePos) -> Result<()> {
        self.get_mut(pos)?.actors.insert(actor);
        Ok(())
    }

    /// Move an actor between tiles in one call
    ///
    /// Both positions are checked before anything changes, so a failed move
    /// leaves occupancy untouched.
    pub fn move_actor(&mut self, actor: ActorId, from: TilePos, to: TilePos) -> Result<()> {
        let from_idx = self.index(from).ok_or(EcoError::OutOfBounds(from))?;
        let to_idx = self.index(to).ok_or(EcoError::OutOfBounds(to))?;
        self.tiles[from_idx].actors.remove(&actor);
        self.tiles[to_idx].actors.insert(actor);
        Ok(())
    }

    pub fn add_resource(&mut self, resource: ResourceId, pos: TilePos) -> Result<()> {
        self.get_mut(pos)?.resources.insert(resource);
        Ok(())
    }
}
