//! Pathfinding integration tests
//!
//! Paths planned through the world must be walkable and as cheap as an
//! exhaustive Dijkstra over the same cost model.

use std::collections::{BTreeMap, BinaryHeap};

use ecotile::core::config::SimulationConfig;
use ecotile::core::types::{ActorId, TilePos};
use ecotile::entity::actor_class::ActorClass;
use ecotile::pathfinding::astar::{AStar, SearchState};
use ecotile::simulation::movement::{find_path, movement_cost_with_risk, passable_neighbors};
use ecotile::world::state::World;
use ecotile::world::terrain::TerrainProfile;
use ordered_float::OrderedFloat;

/// Meadow with a forest band, a river with one ford and a rock wall
fn landscape() -> (World, ActorId) {
    let mut world = World::new(16, 12, TerrainProfile::open("meadow"), SimulationConfig::default()).unwrap();
    let forest = world.add_terrain(TerrainProfile {
        density: 1.0,
        ruggedness: 0.5,
        ..TerrainProfile::open("forest")
    });
    let river = world.add_terrain(TerrainProfile::water("river", 2.0));
    let rock = world.add_terrain(TerrainProfile::wall("rock"));

    for y in 0..12 {
        if y != 9 {
            world.paint_terrain(TilePos::new(8, y), river).unwrap();
        }
        for x in 3..6 {
            world.paint_terrain(TilePos::new(x, y), forest).unwrap();
        }
    }
    for x in 10..15 {
        world.paint_terrain(TilePos::new(x, 5), rock).unwrap();
    }
    let meadow = ecotile::core::types::TerrainId(0);
    world.paint_tile(TilePos::new(12, 8), meadow, 3.0, 20.0, 1.0).unwrap();

    let class = world.add_actor_class(ActorClass::new("walker")).unwrap();
    let walker = world.spawn_actor(class, TilePos::new(0, 0)).unwrap();
    (world, walker)
}

/// Cheapest cost from the walker's tile to every reachable tile
fn dijkstra(world: &World, walker: ActorId) -> BTreeMap<TilePos, f32> {
    let actor = world.actor(walker).unwrap();
    let class = world.class_of(actor);
    let mut best: BTreeMap<TilePos, f32> = BTreeMap::new();
    let mut open = BinaryHeap::new();
    best.insert(actor.tile, 0.0);
    open.push((std::cmp::Reverse(OrderedFloat(0.0f32)), actor.tile));

    while let Some((std::cmp::Reverse(OrderedFloat(cost)), tile)) = open.pop() {
        if cost > best[&tile] {
            continue;
        }
        for next in passable_neighbors(world, class, tile) {
            let step = movement_cost_with_risk(world, actor, tile, next);
            if !step.is_finite() {
                continue;
            }
            let total = cost + step;
            if best.get(&next).map_or(true, |known| total < *known) {
                best.insert(next, total);
                open.push((std::cmp::Reverse(OrderedFloat(total)), next));
            }
        }
    }
    best
}

fn path_cost(world: &World, walker: ActorId, path: &[TilePos]) -> f32 {
    let actor = world.actor(walker).unwrap();
    let mut from = actor.tile;
    let mut total = 0.0;
    for &to in path {
        assert_eq!(from.manhattan(&to), 1, "path jumps from {from:?} to {to:?}");
        total += movement_cost_with_risk(world, actor, from, to);
        from = to;
    }
    total
}

#[test]
fn test_paths_are_optimal_across_the_landscape() {
    let (world, walker) = landscape();
    let reference = dijkstra(&world, walker);

    for goal in [
        TilePos::new(15, 0),
        TilePos::new(15, 11),
        TilePos::new(12, 8),
        TilePos::new(4, 6),
        TilePos::new(9, 9),
    ] {
        let path: Vec<TilePos> = find_path(&world, walker, goal).unwrap().unwrap().into_iter().collect();
        assert_eq!(path.last(), Some(&goal));
        let cost = path_cost(&world, walker, &path);
        assert!(
            (cost - reference[&goal]).abs() < 1e-3,
            "goal {goal:?}: A* {cost} vs Dijkstra {}",
            reference[&goal]
        );
    }
}

#[test]
fn test_non_swimmer_uses_the_ford() {
    let (world, walker) = landscape();
    let path = find_path(&world, walker, TilePos::new(15, 0)).unwrap().unwrap();
    assert!(path.contains(&TilePos::new(8, 9)));
}

#[test]
fn test_unreachable_goals() {
    let (world, walker) = landscape();
    // Rock, deep river, off the map
    for goal in [TilePos::new(12, 5), TilePos::new(8, 0), TilePos::new(20, 20)] {
        assert!(find_path(&world, walker, goal).unwrap().is_none());
        assert!(!dijkstra(&world, walker).contains_key(&goal));
    }
}

#[test]
fn test_astar_is_generic_over_node_types() {
    // Integer line graph, steps cost their destination value
    let mut search = AStar::new(
        |n: &u32| if *n < 10 { vec![n + 1, n + 2] } else { Vec::new() },
        |_: &u32, to: &u32| if to % 3 == 0 { 5.0 } else { 1.0 },
        |_: &u32, _: &u32| 0.0,
    );
    search.start(0, 10);
    assert_eq!(search.finish().unwrap(), SearchState::PathFound);
    let path = search.current_path().unwrap();
    assert_eq!(path.first(), Some(&0));
    assert_eq!(path.last(), Some(&10));
    assert!(path.iter().skip(1).all(|n| n % 3 != 0));
}
