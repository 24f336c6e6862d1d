//! Terrain profiles
//!
//! A profile is shared by every tile painted with it. Movement, camouflage
//! and hazard exposure are all derived from these scalars.

use serde::{Deserialize, Serialize};

use crate::combat::attack::Attack;
use crate::core::types::{Color, TerrainId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainProfile {
    pub id: TerrainId,
    pub name: String,
    /// Walls and void are never entered or seen through
    pub passable: bool,
    /// Rocks, roots, broken ground
    pub ruggedness: f32,
    /// Sand, mud, snow
    pub softness: f32,
    /// Undergrowth and tight spaces
    pub density: f32,
    pub water_depth: f32,
    /// Concealment offered to occupants; divides visibility
    pub cover: f32,
    /// Multiplier on the noise occupants make
    pub noise: f32,
    pub ground_color: Color,
    pub secondary_color: Color,
    /// Passive hazards striking anything that stands here
    #[serde(default)]
    pub hazards: Vec<Attack>,
}

impl TerrainProfile {
    /// Open, flat, dry ground
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            id: TerrainId(0),
            name: name.into(),
            passable: true,
            ruggedness: 0.0,
            softness: 0.0,
            density: 0.0,
            water_depth: 0.0,
            cover: 0.0,
            noise: 1.0,
            ground_color: Color::rgb(0.4, 0.6, 0.3),
            secondary_color: Color::rgb(0.3, 0.5, 0.2),
            hazards: Vec::new(),
        }
    }

    /// Impassable solid wall
    pub fn wall(name: impl Into<String>) -> Self {
        Self {
            passable: false,
            noise: 0.0,
            ground_color: Color::rgb(0.0, 0.0, 0.0),
            secondary_color: Color::rgb(0.0, 0.0, 0.0),
            ..Self::open(name)
        }
    }

    /// Water too deep for anything shorter than `depth` to wade
    pub fn water(name: impl Into<String>, depth: f32) -> Self {
        Self {
            water_depth: depth,
            noise: 0.5,
            ground_color: Color::rgb(0.1, 0.3, 0.7),
            secondary_color: Color::rgb(0.2, 0.4, 0.8),
            ..Self::open(name)
        }
    }

    /// Whether a body of the given height has to swim here
    pub fn is_deep_for(&self, height: f32) -> bool {
        self.water_depth >= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_is_impassable() {
        let wall = TerrainProfile::wall("granite");
        assert!(!wall.passable);
        assert_eq!(wall.name, "granite");
    }

    #[test]
    fn test_deep_water_threshold() {
        let river = TerrainProfile::water("river", 1.5);
        assert!(river.is_deep_for(1.0));
        assert!(river.is_deep_for(1.5));
        assert!(!river.is_deep_for(2.0));
        assert!(!TerrainProfile::open("meadow").is_deep_for(0.1));
    }

    #[test]
    fn test_profile_deserializes_without_hazards() {
        let json = r#"{
            "id": 3, "name": "swamp", "passable": true,
            "ruggedness": 0.0, "softness": 2.0, "density": 0.5, "water_depth": 0.3,
            "cover": 0.5, "noise": 0.8,
            "ground_color": {"r": 0.2, "g": 0.3, "b": 0.1},
            "secondary_color": {"r": 0.1, "g": 0.2, "b": 0.1}
        }"#;
        let swamp: TerrainProfile = serde_json::from_str(json).unwrap();
        assert_eq!(swamp.id, TerrainId(3));
        assert!(swamp.hazards.is_empty());
    }
}
