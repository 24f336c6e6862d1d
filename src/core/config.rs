//! Simulation configuration with documented constants
//!
//! All tunables are collected here with explanations of their purpose
//! and how they interact with each other. The formulas they feed are
//! game-balance numbers, not derived quantities.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EcoError, Result};

/// Configuration for the simulation systems
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the single simulation RNG
    pub seed: u64,

    // === SURVIVAL ===
    /// Hunger gained by every actor per tick
    ///
    /// Hunger above 100 starts draining hitpoints, so at 1.0 an actor that
    /// never eats starts starving after 100 ticks.
    pub hunger_rate: f32,

    /// Fraction of max hitpoints lost per tick while hunger exceeds 100
    pub starvation_damage_ratio: f32,

    /// Energy recovered per tick while an actor is in energy debt
    ///
    /// Moving and eating subtract energy; an actor below zero skips its
    /// action and recovers this much instead.
    pub energy_regen: f32,

    /// Multiplier applied to every spawned resource's base food amount
    pub resource_amount_multiplier: f32,

    // === PERCEPTION & MEMORY ===
    /// Upper bound of the uniform draw a detection chance is tested against
    ///
    /// Higher = actors notice each other less often.
    pub observation_difficulty: f32,

    /// Ticks after which a remembered sighting is considered stale
    pub memory_horizon: f32,

    // === MOVEMENT ===
    /// Normalization constant `k` in `k / speed`
    pub movement_cost_scale: f32,

    /// Tiles within which a remembered predator raises movement risk
    pub predator_risk_radius: f32,

    /// Distance decay of remembered predator risk
    pub predator_risk_decay: f32,

    /// Hard cap on A* expansions per path request
    ///
    /// The grid is finite so search always terminates, this only bounds
    /// the cost of unreachable goals on very large maps.
    pub max_search_steps: usize,

    // === DECISIONS ===
    /// Hunger above which a wandering actor starts foraging
    pub forage_threshold: f32,

    /// Hunger below which a foraging actor goes back to wandering
    ///
    /// Must be lower than `forage_threshold` or actors oscillate.
    pub sated_threshold: f32,

    /// Half-width of the square wander targets are sampled from
    pub wander_radius: i32,

    /// Number of wander candidates sampled before settling
    pub wander_tries: u32,

    /// Perceived threat above which an actor flees
    pub flee_threshold: f32,

    /// Fraction of `flee_threshold` the threat must drop below to stop fleeing
    pub flee_recovery_ratio: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,

            hunger_rate: 1.0,
            starvation_damage_ratio: 0.01,
            energy_regen: 1.0,
            resource_amount_multiplier: 1.0,

            observation_difficulty: 1.0,
            memory_horizon: 250.0,

            movement_cost_scale: 1.0,
            predator_risk_radius: 5.0,
            predator_risk_decay: 0.2,
            max_search_steps: 20_000,

            forage_threshold: 33.0,
            sated_threshold: 15.0,
            wander_radius: 10,
            wander_tries: 20,
            flee_threshold: 2.0,
            flee_recovery_ratio: 0.5,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("hunger_rate", self.hunger_rate),
            ("starvation_damage_ratio", self.starvation_damage_ratio),
            ("energy_regen", self.energy_regen),
            ("resource_amount_multiplier", self.resource_amount_multiplier),
            ("observation_difficulty", self.observation_difficulty),
            ("memory_horizon", self.memory_horizon),
            ("movement_cost_scale", self.movement_cost_scale),
            ("predator_risk_radius", self.predator_risk_radius),
            ("predator_risk_decay", self.predator_risk_decay),
            ("forage_threshold", self.forage_threshold),
            ("sated_threshold", self.sated_threshold),
            ("flee_threshold", self.flee_threshold),
            ("flee_recovery_ratio", self.flee_recovery_ratio),
        ];
        for (name, value) in floats {
            if !value.is_finite() {
                return Err(EcoError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }

        let non_negative = [
            ("hunger_rate", self.hunger_rate),
            ("starvation_damage_ratio", self.starvation_damage_ratio),
            ("resource_amount_multiplier", self.resource_amount_multiplier),
            ("predator_risk_radius", self.predator_risk_radius),
            ("predator_risk_decay", self.predator_risk_decay),
            ("flee_threshold", self.flee_threshold),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(EcoError::InvalidConfig(format!("{name} must not be negative, got {value}")));
            }
        }

        if self.sated_threshold >= self.forage_threshold {
            return Err(EcoError::InvalidConfig(format!(
                "sated_threshold ({}) should be < forage_threshold ({})",
                self.sated_threshold, self.forage_threshold
            )));
        }

        if self.memory_horizon <= 0.0 {
            return Err(EcoError::InvalidConfig("memory_horizon must be positive".into()));
        }

        if self.observation_difficulty <= 0.0 {
            return Err(EcoError::InvalidConfig(
                "observation_difficulty must be positive".into(),
            ));
        }

        if self.movement_cost_scale <= 0.0 || self.energy_regen <= 0.0 {
            return Err(EcoError::InvalidConfig(
                "movement_cost_scale and energy_regen must be positive".into(),
            ));
        }

        if self.wander_tries == 0 || self.wander_radius <= 0 {
            return Err(EcoError::InvalidConfig(
                "wander_tries and wander_radius must be positive".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.flee_recovery_ratio) {
            return Err(EcoError::InvalidConfig(format!(
                "flee_recovery_ratio ({}) must be within [0, 1]",
                self.flee_recovery_ratio
            )));
        }

        Ok(())
    }
}
