//! Foraging end-to-end: a lone herbivore finds, walks to and finishes a food source

use ecotile::core::config::SimulationConfig;
use ecotile::core::types::TilePos;
use ecotile::entity::actor::BehaviorState;
use ecotile::entity::actor_class::ActorClass;
use ecotile::simulation::events::{FoodSource, SimulationEvent};
use ecotile::simulation::tick::Simulation;
use ecotile::world::resource::ResourceClass;
use ecotile::world::state::World;
use ecotile::world::terrain::TerrainProfile;

fn herbivore() -> ActorClass {
    let mut class = ActorClass::new("herbivore");
    class.plant_efficiency = 1.0;
    class.meat_efficiency = 0.0;
    class.observation_range = 10.0;
    class
}

#[test]
fn test_herbivore_eats_resource_to_depletion() {
    let mut world = World::new(10, 10, TerrainProfile::open("meadow"), SimulationConfig::default()).unwrap();
    let class = world.add_actor_class(herbivore()).unwrap();
    let food = world.add_resource_class(ResourceClass::new("berries", 50.0));
    let actor = world.spawn_actor(class, TilePos::new(0, 0)).unwrap();
    let bush = world.spawn_resource(food, TilePos::new(5, 5)).unwrap();

    let mut sim = Simulation::new(world);
    let mut meals = 0;
    let mut saw_forage = false;

    for _ in 0..200 {
        for event in sim.tick().unwrap() {
            match event {
                SimulationEvent::Ate {
                    actor: eater,
                    source,
                    amount,
                    hunger_before,
                    hunger_after,
                    ..
                } => {
                    assert_eq!(eater, actor);
                    assert_eq!(source, FoodSource::Resource(bush));
                    assert!(amount > 0.0);
                    assert!(hunger_after < hunger_before);
                    assert!(hunger_after >= 0.0);
                    meals += 1;
                }
                SimulationEvent::StateChanged {
                    to: BehaviorState::Forage,
                    ..
                } => saw_forage = true,
                _ => {}
            }
        }
        if sim.world().resource(bush).unwrap().is_depleted() {
            break;
        }
    }

    assert!(saw_forage);
    assert!(meals >= 1);
    assert_eq!(sim.world().resource(bush).unwrap().amount, 0.0);
    assert!(sim.world().actor(actor).unwrap().is_alive());
}

#[test]
fn test_unseen_food_is_never_targeted() {
    // Walled off: the herbivore can neither see nor reach it
    let mut world = World::new(12, 12, TerrainProfile::open("meadow"), SimulationConfig::default()).unwrap();
    let wall = world.add_terrain(TerrainProfile::wall("wall"));
    for y in 0..12 {
        world.paint_terrain(TilePos::new(6, y), wall).unwrap();
    }
    let class = world.add_actor_class(herbivore()).unwrap();
    let food = world.add_resource_class(ResourceClass::new("berries", 50.0));
    let actor = world.spawn_actor(class, TilePos::new(1, 1)).unwrap();
    let bush = world.spawn_resource(food, TilePos::new(9, 9)).unwrap();

    let mut sim = Simulation::new(world);
    sim.run(120).unwrap();

    let herbivore = sim.world().actor(actor).unwrap();
    assert!(herbivore.resource_memory.get(&bush).is_none());
    assert!(herbivore.tile.x < 6);
    assert_eq!(sim.world().resource(bush).unwrap().amount, 50.0);
}
