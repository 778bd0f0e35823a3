use clap::Parser;

use delivery_agent::agent::DeliveryAgent;
use delivery_agent::benchmark;
use delivery_agent::config::Config;
use delivery_agent::grid::{GridWorld, Position};
use delivery_agent::loader;
use std::thread;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();

    let world = loader::load(&config.map)?;
    println!("Loaded map: {} ({}x{})", config.map, world.width, world.height);
    println!("Start: ({}, {})", world.start.x, world.start.y);
    println!("Packages: {}", world.packages.len());

    if config.benchmark {
        run_benchmark(&world);
        return Ok(());
    }

    let mut agent = DeliveryAgent::new(world.start, config.fuel);
    if let Some(seed) = config.seed {
        agent.set_repair_seed(seed);
    }

    println!();
    println!(
        "Planning route with {} ({})...",
        config.algorithm, config.heuristic
    );
    let route = agent.plan_route(&world, &config.algorithm, &config.heuristic);
    if route.len() < 2 {
        println!("No reachable packages to deliver.");
        return Ok(());
    }
    let estimated: u32 = route[1..].iter().map(|&pos| world.terrain_cost(pos)).sum();
    println!("Planned route: {} cells", route.len());
    println!("Estimated cost: {estimated}");
    println!("Search nodes expanded: {}", agent.planning_nodes_expanded());

    println!();
    println!("Executing delivery...");
    let status = agent.execute_route(&world, &route, config.max_steps);

    println!();
    println!("=== DELIVERY RESULTS ===");
    println!("{status}");
    println!("Final state: {:?}", agent.state);
    println!("Fuel remaining: {}", agent.fuel);

    if config.visualize {
        replay(&world, &status.path, config.delay_ms);
    }
    Ok(())
}

fn run_benchmark(world: &GridWorld) {
    // Benchmark against the lowest-numbered package.
    let goal = world
        .packages
        .iter()
        .min_by_key(|(&id, _)| id)
        .map(|(_, &destination)| destination);
    match goal {
        Some(goal) => {
            println!();
            println!(
                "Benchmarking ({}, {}) -> ({}, {})",
                world.start.x, world.start.y, goal.x, goal.y
            );
            let reports = benchmark::run(world, world.start, goal);
            benchmark::print_comparison(&reports);
        }
        None => println!("No packages to benchmark against."),
    }
}

/// Step through the realized path, one frame per tick.
fn replay(world: &GridWorld, path: &[Position], delay_ms: u64) {
    for (time, &pos) in path.iter().enumerate() {
        print!("\x1B[2J\x1B[1;1H");
        println!("=== DELIVERY REPLAY ===");
        println!("{}", world.render(Some(pos), time as u32));
        thread::sleep(Duration::from_millis(delay_ms));
    }
}
