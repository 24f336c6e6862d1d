//! Species capability profiles
//!
//! An `ActorClass` is immutable once registered with the world and shared by
//! every actor of the species. Anything derived purely from two profiles
//! (terrain cost, visibility, noise, expected damage, risk) is computed on
//! first use and memoized on the class. The caches are never invalidated:
//! profiles don't change after registration.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::hash::Hash;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::attack::{Attack, DamageType};
use crate::core::types::{ActorClassId, Color, ResourceClassId, TerrainId};
use crate::world::terrain::TerrainProfile;

/// Lower bound for visibility and noise so nothing is perfectly undetectable
pub const MIN_DETECTABILITY: f32 = 0.05;

/// Lazily filled per-class lookup tables
#[derive(Debug, Clone, Default)]
pub(crate) struct ClassCaches {
    pub(crate) terrain_cost: RefCell<AHashMap<TerrainId, f32>>,
    pub(crate) visibility: RefCell<AHashMap<TerrainId, f32>>,
    pub(crate) noise: RefCell<AHashMap<TerrainId, f32>>,
    pub(crate) attack_damage: RefCell<AHashMap<Attack, f32>>,
    pub(crate) class_damage: RefCell<AHashMap<ActorClassId, f32>>,
    pub(crate) class_risk: RefCell<AHashMap<ActorClassId, f32>>,
    pub(crate) resource_risk: RefCell<AHashMap<ResourceClassId, f32>>,
}

/// Look up `key`, computing and storing it on a miss
///
/// The borrow is released before `compute` runs, so `compute` may consult
/// other caches of the same class.
pub(crate) fn memoized<K, F>(cache: &RefCell<AHashMap<K, f32>>, key: &K, compute: F) -> f32
where
    K: Eq + Hash + Clone,
    F: FnOnce() -> f32,
{
    let cached = cache.borrow().get(key).copied();
    if let Some(value) = cached {
        return value;
    }
    let value = compute();
    cache.borrow_mut().insert(key.clone(), value);
    value
}

/// Multiplicative penalty `1 + property / aptitude`
///
/// Zero aptitude makes any positive property impassable; a zero property
/// costs nothing regardless of aptitude.
pub fn aptitude_factor(property: f32, aptitude: f32) -> f32 {
    if property <= 0.0 {
        1.0
    } else if aptitude <= 0.0 {
        f32::INFINITY
    } else {
        1.0 + property / aptitude
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorClass {
    pub id: ActorClassId,
    pub name: String,
    pub base_color: Color,
    pub pattern_color: Color,

    // === BODY ===
    pub max_hitpoints: f32,
    /// Land speed
    pub speed: f32,
    /// Target number attackers must reach with d100 + bonus
    pub evasion: i32,
    pub size: f32,
    pub height: f32,
    pub resistances: BTreeMap<DamageType, f32>,
    pub attacks: Vec<Attack>,

    // === NAVIGATION ===
    pub rugged_navigation: f32,
    pub soft_navigation: f32,
    pub cramped_navigation: f32,
    pub steep_navigation: f32,
    pub swim_speed: f32,
    pub dig_speed: f32,
    pub climb_speed: f32,
    pub dive_speed: f32,
    pub cold_limit: f32,
    pub heat_limit: f32,

    // === DIET ===
    /// Food units that take hunger from 100 to 0
    pub consumption: f32,
    /// Energy spent per unit eaten
    pub consumption_energy_cost: f32,
    pub meat_efficiency: f32,
    pub plant_efficiency: f32,
    /// Food left behind as a carcass
    pub meat_amount: f32,

    // === SENSES ===
    pub observation_range: f32,
    pub light_vision: f32,
    pub dark_vision: f32,
    pub smell: f32,
    pub hearing: f32,
    /// Detection bonus towards recently seen subjects
    pub tracking: f32,

    // === SIGNATURE ===
    pub visibility: f32,
    pub noise: f32,
    pub odor: f32,

    #[serde(skip)]
    pub(crate) caches: ClassCaches,
}

impl Default for ActorClass {
    fn default() -> Self {
        Self {
            id: ActorClassId(0),
            name: String::new(),
            base_color: Color::rgb(0.5, 0.4, 0.3),
            pattern_color: Color::rgb(0.4, 0.3, 0.2),

            max_hitpoints: 10.0,
            speed: 1.0,
            evasion: 10,
            size: 1.0,
            height: 1.0,
            resistances: BTreeMap::new(),
            attacks: Vec::new(),

            rugged_navigation: 1.0,
            soft_navigation: 1.0,
            cramped_navigation: 1.0,
            steep_navigation: 1.0,
            swim_speed: 0.0,
            dig_speed: 0.0,
            climb_speed: 0.0,
            dive_speed: 0.0,
            cold_limit: -10.0,
            heat_limit: 40.0,

            consumption: 100.0,
            consumption_energy_cost: 1.0,
            meat_efficiency: 0.0,
            plant_efficiency: 1.0,
            meat_amount: 50.0,

            observation_range: 10.0,
            light_vision: 1.0,
            dark_vision: 0.2,
            smell: 0.3,
            hearing: 0.3,
            tracking: 0.5,

            visibility: 1.0,
            noise: 1.0,
            odor: 1.0,

            caches: ClassCaches::default(),
        }
    }
}

impl ActorClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Stored resistance clamped to [0, 1]
    pub fn resistance(&self, damage_type: DamageType) -> f32 {
        self.resistances
            .get(&damage_type)
            .copied()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }

    /// Preference for meat over plants in [0, 1]
    pub fn predatory_ratio(&self) -> f32 {
        if self.plant_efficiency <= 0.0 {
            if self.meat_efficiency > 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            (self.meat_efficiency / self.plant_efficiency).clamp(0.0, 1.0)
        }
    }

    /// Whether this class can stand on `terrain` at all
    pub fn can_enter(&self, terrain: &TerrainProfile) -> bool {
        terrain.passable && (!terrain.is_deep_for(self.height) || self.swim_speed > 0.0)
    }

    /// Cheapest possible cost of a single step
    ///
    /// Every penalty factor is at least 1, so Manhattan distance times this
    /// never overestimates.
    pub fn min_step_cost(&self, scale: f32) -> f32 {
        let fastest = self.speed.max(self.swim_speed);
        if fastest <= 0.0 {
            return 0.0;
        }
        scale / fastest
    }

    /// Cost of entering one tile of `terrain`, before elevation and climate
    pub fn terrain_cost(&self, terrain: &TerrainProfile, scale: f32) -> f32 {
        let unscaled = memoized(&self.caches.terrain_cost, &terrain.id, || self.compute_terrain_cost(terrain));
        unscaled * scale
    }

    fn compute_terrain_cost(&self, terrain: &TerrainProfile) -> f32 {
        if !terrain.passable {
            return f32::INFINITY;
        }

        let cramped = aptitude_factor(terrain.density, self.cramped_navigation);

        if !terrain.is_deep_for(self.height) {
            // Walking, possibly wading
            if self.speed <= 0.0 {
                return f32::INFINITY;
            }
            (1.0 / self.speed)
                * aptitude_factor(terrain.ruggedness, self.rugged_navigation)
                * aptitude_factor(terrain.softness, self.soft_navigation)
                * cramped
        } else {
            if self.swim_speed <= 0.0 {
                return f32::INFINITY;
            }
            (1.0 / self.swim_speed) * cramped
        }
    }

    /// How easy this class is to spot on `terrain`
    pub fn visibility_on(&self, terrain: &TerrainProfile) -> f32 {
        memoized(&self.caches.visibility, &terrain.id, || {
            let contrast = (self.base_color.distance_squared(&terrain.ground_color)
                + self.pattern_color.distance_squared(&terrain.secondary_color))
                / 6.0;
            let camouflage = 0.25 + 0.75 * contrast.clamp(0.0, 1.0);
            (self.visibility / (1.0 + terrain.cover.max(0.0)) * camouflage).max(MIN_DETECTABILITY)
        })
    }

    /// How much noise this class makes moving over `terrain`
    pub fn noise_on(&self, terrain: &TerrainProfile) -> f32 {
        memoized(&self.caches.noise, &terrain.id, || {
            (terrain.noise * self.noise).max(MIN_DETECTABILITY)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn meadow() -> TerrainProfile {
        TerrainProfile::open("meadow")
    }

    #[test]
    fn test_resistance_is_clamped() {
        let mut class = ActorClass::new("armadillo");
        class.resistances.insert(DamageType::Piercing, 1.7);
        class.resistances.insert(DamageType::Fire, -0.5);
        assert_eq!(class.resistance(DamageType::Piercing), 1.0);
        assert_eq!(class.resistance(DamageType::Fire), 0.0);
        assert_eq!(class.resistance(DamageType::Cold), 0.0);
    }

    #[test]
    fn test_predatory_ratio() {
        let mut wolf = ActorClass::new("wolf");
        wolf.meat_efficiency = 1.0;
        wolf.plant_efficiency = 0.0;
        assert_eq!(wolf.predatory_ratio(), 1.0);

        let mut bear = ActorClass::new("bear");
        bear.meat_efficiency = 0.5;
        bear.plant_efficiency = 1.0;
        assert_eq!(bear.predatory_ratio(), 0.5);

        let mut rock = ActorClass::new("rock");
        rock.meat_efficiency = 0.0;
        rock.plant_efficiency = 0.0;
        assert_eq!(rock.predatory_ratio(), 0.0);

        let deer = ActorClass::new("deer");
        assert_eq!(deer.predatory_ratio(), 0.0);
    }

    #[test]
    fn test_open_ground_cost_is_inverse_speed() {
        let mut hare = ActorClass::new("hare");
        hare.speed = 4.0;
        assert_eq!(hare.terrain_cost(&meadow(), 1.0), 0.25);
        assert_eq!(hare.terrain_cost(&meadow(), 10.0), 2.5);
    }

    #[test]
    fn test_zero_aptitude_with_zero_property_is_finite() {
        let mut clumsy = ActorClass::new("clumsy");
        clumsy.rugged_navigation = 0.0;
        clumsy.soft_navigation = 0.0;
        clumsy.cramped_navigation = 0.0;
        let cost = clumsy.terrain_cost(&meadow(), 1.0);
        assert!(cost.is_finite());
        assert!(!cost.is_nan());

        let mut rocks = TerrainProfile::open("scree");
        rocks.id = TerrainId(1);
        rocks.ruggedness = 1.0;
        assert!(clumsy.terrain_cost(&rocks, 1.0).is_infinite());
    }

    #[test]
    fn test_non_swimmer_cannot_cross_deep_water() {
        let mut river = TerrainProfile::water("river", 2.0);
        river.id = TerrainId(2);
        let mut cat = ActorClass::new("cat");
        cat.height = 0.5;
        cat.swim_speed = 0.0;
        assert!(cat.terrain_cost(&river, 1.0).is_infinite());
        assert!(!cat.can_enter(&river));

        let mut otter = ActorClass::new("otter");
        otter.height = 0.5;
        otter.swim_speed = 2.0;
        assert_eq!(otter.terrain_cost(&river, 1.0), 0.5);
        assert!(otter.can_enter(&river));
    }

    #[test]
    fn test_wall_cost_is_infinite() {
        let mut wall = TerrainProfile::wall("wall");
        wall.id = TerrainId(5);
        let class = ActorClass::new("mole");
        assert!(class.terrain_cost(&wall, 1.0).is_infinite());
        assert!(!class.can_enter(&wall));
    }

    #[test]
    fn test_min_step_cost_bounds_terrain_cost() {
        let mut duck = ActorClass::new("duck");
        duck.speed = 1.0;
        duck.swim_speed = 3.0;
        let mut pond = TerrainProfile::water("pond", 5.0);
        pond.id = TerrainId(1);
        let min = duck.min_step_cost(1.0);
        assert!(min <= duck.terrain_cost(&pond, 1.0));
        assert!(min <= duck.terrain_cost(&meadow(), 1.0));
    }

    #[test]
    fn test_visibility_camouflage() {
        let terrain = meadow();
        let mut matching = ActorClass::new("grasshopper");
        matching.base_color = terrain.ground_color;
        matching.pattern_color = terrain.secondary_color;

        let mut contrasting = ActorClass::new("flamingo");
        contrasting.base_color = Color::rgb(1.0, 0.4, 0.7);
        contrasting.pattern_color = Color::rgb(1.0, 1.0, 1.0);

        assert!((matching.visibility_on(&terrain) - 0.25).abs() < 1e-6);
        assert!(contrasting.visibility_on(&terrain) > matching.visibility_on(&terrain));
    }

    #[test]
    fn test_visibility_floor_and_cover() {
        let mut forest = TerrainProfile::open("forest");
        forest.id = TerrainId(3);
        forest.cover = 1000.0;
        let class = ActorClass::new("owl");
        assert_eq!(class.visibility_on(&forest), MIN_DETECTABILITY);
    }

    #[test]
    fn test_noise_floor() {
        let mut moss = TerrainProfile::open("moss");
        moss.id = TerrainId(4);
        moss.noise = 0.0;
        let class = ActorClass::new("mouse");
        assert_eq!(class.noise_on(&moss), MIN_DETECTABILITY);
        assert_eq!(class.noise_on(&meadow()), 1.0);
    }

    #[test]
    fn test_terrain_cost_is_memoized_per_terrain() {
        let class = ActorClass::new("goat");
        let first = class.terrain_cost(&meadow(), 1.0);
        assert_eq!(class.caches.terrain_cost.borrow().len(), 1);
        let second = class.terrain_cost(&meadow(), 1.0);
        assert_eq!(first, second);
        assert_eq!(class.caches.terrain_cost.borrow().len(), 1);
    }

    #[test]
    fn test_class_deserializes_with_defaults() {
        let class: ActorClass = serde_json::from_str(r#"{"name": "vole", "speed": 3.0}"#).unwrap();
        assert_eq!(class.name, "vole");
        assert_eq!(class.speed, 3.0);
        assert_eq!(class.max_hitpoints, 10.0);
    }

    proptest! {
        #[test]
        fn prop_ruggedness_never_lowers_cost(
            low in 0.0f32..10.0,
            extra in 0.0f32..10.0,
            aptitude in 0.1f32..5.0,
        ) {
            let mut class = ActorClass::new("walker");
            class.rugged_navigation = aptitude;

            let mut smooth = TerrainProfile::open("smooth");
            smooth.id = TerrainId(1);
            smooth.ruggedness = low;
            let mut rough = TerrainProfile::open("rough");
            rough.id = TerrainId(2);
            rough.ruggedness = low + extra;

            prop_assert!(class.terrain_cost(&rough, 1.0) >= class.terrain_cost(&smooth, 1.0));
        }

        #[test]
        fn prop_non_swimmer_deep_water_is_infinite(height in 0.1f32..5.0, extra_depth in 0.0f32..5.0) {
            let mut class = ActorClass::new("landlubber");
            class.height = height;
            class.swim_speed = 0.0;

            let mut water = TerrainProfile::water("lake", height + extra_depth);
            water.id = TerrainId(9);
            prop_assert!(class.terrain_cost(&water, 1.0).is_infinite());
        }
    }
}
