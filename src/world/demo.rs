//! Demo scenario: a meadow split by a river, with a forest on the eastern hills
//!
//! Used by the `ecotile` binary and the integration tests. Layout is fixed;
//! food and animals are scattered with an RNG seeded from the config seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::combat::attack::{Attack, DamageType};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{ActorClassId, Color, ResourceClassId, TerrainId, TilePos};
use crate::entity::actor_class::ActorClass;
use crate::world::resource::ResourceClass;
use crate::world::state::World;
use crate::world::terrain::TerrainProfile;

pub const DEMO_WIDTH: i32 = 48;
pub const DEMO_HEIGHT: i32 = 32;

const RIVER_X: std::ops::Range<i32> = 20..22;
const FORD_Y: std::ops::Range<i32> = 15..18;
const FOREST_X: std::ops::Range<i32> = 30..46;
const FOREST_Y: std::ops::Range<i32> = 2..16;

/// Attempts per placement before giving up on finding a fitting tile
const PLACEMENT_TRIES: u32 = 200;

/// Demo world plus the ids callers usually want
#[derive(Debug, Clone)]
pub struct DemoWorld {
    pub world: World,
    pub rabbit: ActorClassId,
    pub deer: ActorClassId,
    pub wolf: ActorClassId,
}

pub fn rabbit() -> ActorClass {
    let mut class = ActorClass::new("rabbit");
    class.base_color = Color::rgb(0.55, 0.45, 0.35);
    class.pattern_color = Color::rgb(0.8, 0.75, 0.7);
    class.max_hitpoints = 8.0;
    class.speed = 1.5;
    class.evasion = 35;
    class.size = 0.3;
    class.height = 0.3;
    class.cramped_navigation = 3.0;
    class.dig_speed = 1.0;
    class.consumption = 40.0;
    class.consumption_energy_cost = 0.2;
    class.meat_amount = 20.0;
    class.observation_range = 8.0;
    class.smell = 0.5;
    class.hearing = 0.9;
    class.visibility = 0.6;
    class.noise = 0.4;
    class.odor = 0.6;
    class.attacks.push(Attack::new("kick", 0, DamageType::Crushing, 2, 0));
    class
}

pub fn deer() -> ActorClass {
    let mut class = ActorClass::new("deer");
    class.base_color = Color::rgb(0.6, 0.4, 0.25);
    class.pattern_color = Color::rgb(0.85, 0.8, 0.7);
    class.max_hitpoints = 30.0;
    class.speed = 2.0;
    class.swim_speed = 0.5;
    class.evasion = 20;
    class.size = 1.5;
    class.height = 1.5;
    class.rugged_navigation = 1.5;
    class.steep_navigation = 2.0;
    class.consumption = 100.0;
    class.consumption_energy_cost = 0.3;
    class.meat_amount = 80.0;
    class.observation_range = 12.0;
    class.hearing = 0.7;
    class.attacks.push(Attack::new("hooves", 5, DamageType::Crushing, 6, 1));
    class.attacks.push(Attack::new("antlers", 0, DamageType::Piercing, 4, 2));
    class
}

pub fn wolf() -> ActorClass {
    let mut class = ActorClass::new("wolf");
    class.base_color = Color::rgb(0.45, 0.45, 0.45);
    class.pattern_color = Color::rgb(0.3, 0.3, 0.3);
    class.max_hitpoints = 40.0;
    class.speed = 1.8;
    class.swim_speed = 0.6;
    class.evasion = 25;
    class.size = 1.0;
    class.height = 0.8;
    class.resistances.insert(DamageType::Cold, 0.5);
    class.consumption = 80.0;
    class.consumption_energy_cost = 0.2;
    class.meat_efficiency = 1.0;
    class.plant_efficiency = 0.0;
    class.meat_amount = 40.0;
    class.observation_range = 14.0;
    class.dark_vision = 0.7;
    class.smell = 0.9;
    class.hearing = 0.8;
    class.tracking = 1.0;
    class.attacks.push(Attack::new("bite", 10, DamageType::Piercing, 8, 2));
    class
}

fn terrains() -> [TerrainProfile; 4] {
    let forest = TerrainProfile {
        ruggedness: 0.4,
        density: 0.6,
        cover: 1.0,
        noise: 1.3,
        ground_color: Color::rgb(0.2, 0.35, 0.15),
        secondary_color: Color::rgb(0.35, 0.25, 0.15),
        ..TerrainProfile::open("forest")
    };
    let river = TerrainProfile::water("river", 1.6);
    let ford = TerrainProfile {
        softness: 0.5,
        ..TerrainProfile::water("ford", 0.25)
    };
    let rock = TerrainProfile::wall("rock");
    [forest, river, ford, rock]
}

fn resource_classes() -> [ResourceClass; 5] {
    let grass = ResourceClass::new("grass", 30.0);
    let clover = ResourceClass {
        visibility: 0.8,
        ..ResourceClass::new("clover", 20.0)
    };
    let berries = ResourceClass {
        depth: -1.0,
        gathering_difficulty: 1.5,
        ..ResourceClass::new("berries", 40.0)
    };
    let truffle = ResourceClass {
        depth: 0.5,
        visibility: 0.3,
        ..ResourceClass::new("truffle", 60.0)
    };
    let mut nettles = ResourceClass::new("nettles", 25.0);
    nettles
        .hazards
        .push(Attack::new("sting", 20, DamageType::Poison, 2, 0));
    [grass, clover, berries, truffle, nettles]
}

fn in_forest(pos: TilePos) -> bool {
    FOREST_X.contains(&pos.x) && FOREST_Y.contains(&pos.y)
}

/// Build the demo scenario
pub fn demo_world(config: SimulationConfig) -> Result<DemoWorld> {
    let seed = config.seed;
    let mut world = World::new(DEMO_WIDTH, DEMO_HEIGHT, TerrainProfile::open("meadow"), config)?;
    let meadow = TerrainId(0);
    let [forest, river, ford, rock] = terrains().map(|terrain| world.add_terrain(terrain));

    for y in 0..DEMO_HEIGHT {
        for x in 0..DEMO_WIDTH {
            let pos = TilePos::new(x, y);
            // Hills rise towards the east edge
            let elevation = ((x - 28).max(0) as f32) * 0.25;
            let (terrain, temperature, light) = if RIVER_X.contains(&x) {
                (if FORD_Y.contains(&y) { ford } else { river }, 12.0, 1.0)
            } else if in_forest(pos) {
                (forest, 14.0, 0.5)
            } else {
                (meadow, 18.0, 1.0)
            };
            world.paint_tile(pos, terrain, elevation, temperature, light)?;
        }
    }
    for y in 22..25 {
        for x in 8..12 {
            world.paint_terrain(TilePos::new(x, y), rock)?;
        }
    }

    let [grass, clover, berries, truffle, nettles] = resource_classes().map(|class| world.add_resource_class(class));
    let rabbit = world.add_actor_class(rabbit())?;
    let deer = world.add_actor_class(deer())?;
    let wolf = world.add_actor_class(wolf())?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    scatter_resources(&mut world, &mut rng, grass, 45, |pos| !in_forest(pos))?;
    scatter_resources(&mut world, &mut rng, clover, 25, |pos| !in_forest(pos))?;
    scatter_resources(&mut world, &mut rng, nettles, 10, |_| true)?;
    scatter_resources(&mut world, &mut rng, berries, 25, in_forest)?;
    scatter_resources(&mut world, &mut rng, truffle, 8, in_forest)?;

    scatter_actors(&mut world, &mut rng, rabbit, 20)?;
    scatter_actors(&mut world, &mut rng, deer, 8)?;
    scatter_actors(&mut world, &mut rng, wolf, 3)?;

    Ok(DemoWorld {
        world,
        rabbit,
        deer,
        wolf,
    })
}

fn random_tile<R: Rng + ?Sized>(rng: &mut R) -> TilePos {
    TilePos::new(rng.gen_range(0..DEMO_WIDTH), rng.gen_range(0..DEMO_HEIGHT))
}

fn scatter_resources<R, F>(world: &mut World, rng: &mut R, class: ResourceClassId, count: usize, allowed: F) -> Result<()>
where
    R: Rng + ?Sized,
    F: Fn(TilePos) -> bool,
{
    for _ in 0..count {
        for _ in 0..PLACEMENT_TRIES {
            let pos = random_tile(rng);
            let dry = world
                .terrain_at(pos)
                .is_some_and(|t| t.passable && t.water_depth <= 0.0);
            if dry && allowed(pos) {
                world.spawn_resource(class, pos)?;
                break;
            }
        }
    }
    Ok(())
}

fn scatter_actors<R: Rng + ?Sized>(world: &mut World, rng: &mut R, class: ActorClassId, count: usize) -> Result<()> {
    for _ in 0..count {
        for _ in 0..PLACEMENT_TRIES {
            let pos = random_tile(rng);
            let profile = world.actor_class(class)?;
            if world.terrain_at(pos).is_some_and(|t| profile.can_enter(t)) {
                world.spawn_actor(class, pos)?;
                break;
            }
        }
    }
    Ok(())
}
