//! Food resources: classes and placed instances

use serde::{Deserialize, Serialize};

use crate::combat::attack::Attack;
use crate::core::types::{ResourceClassId, ResourceId, TilePos};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceClass {
    pub id: ResourceClassId,
    pub name: String,
    /// Base amount of food an instance spawns with
    pub food_amount: f32,
    /// Scales the energy needed to gather one unit
    pub gathering_difficulty: f32,
    /// Positive = underwater or buried, negative = elevated
    pub depth: f32,
    /// Chance factor for being noticed, multiplied with the observer's vision
    pub visibility: f32,
    /// Attacks suffered by whoever eats this
    #[serde(default)]
    pub hazards: Vec<Attack>,
}

impl ResourceClass {
    pub fn new(name: impl Into<String>, food_amount: f32) -> Self {
        Self {
            id: ResourceClassId(0),
            name: name.into(),
            food_amount,
            gathering_difficulty: 1.0,
            depth: 0.0,
            visibility: 1.0,
            hazards: Vec::new(),
        }
    }
}

/// A placed food source; stays addressable after depletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub class: ResourceClassId,
    pub amount: f32,
    pub tile: TilePos,
}

impl Resource {
    pub fn is_depleted(&self) -> bool {
        self.amount <= 0.0
    }

    /// Remove up to `amount`, returning what was actually taken
    pub fn take(&mut self, amount: f32) -> f32 {
        let taken = amount.clamp(0.0, self.amount.max(0.0));
        self.amount -= taken;
        taken
    }
}
