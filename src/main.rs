//! Ecotile - Entry Point
//!
//! Builds the demo meadow/forest/river scenario, runs it headless and prints
//! a population summary. The full event log can be written out as JSON.

use std::path::PathBuf;

use clap::Parser;
use ecotile::core::config::SimulationConfig;
use ecotile::core::error::Result;
use ecotile::core::types::ActorClassId;
use ecotile::simulation::fitness::total_age;
use ecotile::simulation::tick::Simulation;
use ecotile::world::demo::demo_world;
use ecotile::world::state::World;

/// Headless ecotile runner
#[derive(Parser, Debug)]
#[command(name = "ecotile")]
#[command(about = "Run the demo creature simulation and report what happened")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Random seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file with simulation tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write every event as JSON to this file
    #[arg(long)]
    events_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ecotile=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    tracing::info!(seed = config.seed, ticks = args.ticks, "ecotile starting");

    let demo = demo_world(config)?;
    let species = [("rabbit", demo.rabbit), ("deer", demo.deer), ("wolf", demo.wolf)];

    let mut simulation = Simulation::new(demo.world);
    if args.events_out.is_some() {
        simulation = simulation.with_event_log();
    }

    let ran = simulation.run(args.ticks)?;

    println!("\n=== ECOTILE ===");
    println!("Ticks run: {}", ran);
    print_summary(simulation.world(), &species);

    if let Some(log) = simulation.event_log() {
        println!();
        for label in ["moved", "ate", "attack", "starving", "died", "state_changed"] {
            println!("  {:<14} {}", label, log.count(label));
        }
        if let Some(path) = &args.events_out {
            std::fs::write(path, log.to_json()?)?;
            println!("Events written to {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(world: &World, species: &[(&str, ActorClassId)]) {
    println!("{:<8} {:>6} {:>6} {:>10}", "species", "alive", "dead", "total age");
    for (name, class) in species {
        let alive = world.living_count(*class);
        let total = world.actors.iter().filter(|a| a.class == *class).count();
        println!(
            "{:<8} {:>6} {:>6} {:>10}",
            name,
            alive,
            total - alive,
            total_age(world, *class)
        );
    }

    let remaining: f32 = world.resources.iter().map(|r| r.amount.max(0.0)).sum();
    let depleted = world.resources.iter().filter(|r| r.is_depleted()).count();
    println!(
        "Food left: {:.0} across {} sources ({} depleted)",
        remaining,
        world.resources.len(),
        depleted
    );
}
