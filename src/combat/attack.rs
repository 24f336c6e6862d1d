//! Attack definitions
//!
//! An attack is a to-hit bonus plus one or more damage terms, each a single
//! die with a flat bonus and a damage type the defender may resist. Attacks
//! are plain values: they are shared between actor classes, terrain hazards
//! and resource hazards, and key the expected-damage cache by value.

use serde::{Deserialize, Serialize};

/// Damage categories a class can resist
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Crushing,
    Piercing,
    Slashing,
    Fire,
    Cold,
    Poison,
}

impl DamageType {
    pub const ALL: [DamageType; 6] = [
        DamageType::Crushing,
        DamageType::Piercing,
        DamageType::Slashing,
        DamageType::Fire,
        DamageType::Cold,
        DamageType::Poison,
    ];
}

/// One damage term: roll `1..=dice`, add `bonus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Damage {
    pub damage_type: DamageType,
    /// Number of die sides
    pub dice: u32,
    pub bonus: i32,
}

impl Damage {
    pub fn new(damage_type: DamageType, dice: u32, bonus: i32) -> Self {
        Self {
            damage_type,
            dice,
            bonus,
        }
    }

    /// Mean of the roll plus bonus, before resistance
    pub fn average(&self) -> f32 {
        if self.dice == 0 {
            return self.bonus as f32;
        }
        (self.dice as f32 + 1.0) / 2.0 + self.bonus as f32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub attack_bonus: i32,
    pub damage: Vec<Damage>,
}

impl Attack {
    /// Single-term attack
    pub fn new(name: impl Into<String>, attack_bonus: i32, damage_type: DamageType, dice: u32, bonus: i32) -> Self {
        Self {
            name: name.into(),
            attack_bonus,
            damage: vec![Damage::new(damage_type, dice, bonus)],
        }
    }

    /// Add another damage term
    pub fn with_damage(mut self, damage_type: DamageType, dice: u32, bonus: i32) -> Self {
        self.damage.push(Damage::new(damage_type, dice, bonus));
        self
    }
}
