use crate::algorithms::common::Heuristic;
use crate::algorithms::strategy_for;
use crate::grid::{GridWorld, Position};
use std::time::{Duration, Instant};

/// One strategy's result on the benchmark start/goal pair.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub name: &'static str,
    pub found: bool,
    pub path_length: usize,
    pub total_cost: u32,
    pub nodes_expanded: usize,
    pub duration: Duration,
}

const STRATEGIES: [(&str, &str, Heuristic); 4] = [
    ("bfs", "bfs", Heuristic::Zero),
    ("ucs", "ucs", Heuristic::Zero),
    ("astar-manhattan", "astar", Heuristic::Manhattan),
    ("astar-euclidean", "astar", Heuristic::Euclidean),
];

/// Run every search strategy between `start` and `goal` on the same world.
pub fn run(world: &GridWorld, start: Position, goal: Position) -> Vec<SearchReport> {
    STRATEGIES
        .iter()
        .map(|&(name, algorithm, heuristic)| {
            let mut strategy = strategy_for(algorithm, heuristic);
            let begin = Instant::now();
            let path = strategy.search(world, start, goal);
            let duration = begin.elapsed();

            let (found, path_length, total_cost) = match &path {
                Some(path) => (
                    true,
                    path.len(),
                    path[1..].iter().map(|&pos| world.terrain_cost(pos)).sum(),
                ),
                None => (false, 0, 0),
            };
            SearchReport {
                name,
                found,
                path_length,
                total_cost,
                nodes_expanded: strategy.nodes_expanded(),
                duration,
            }
        })
        .collect()
}

/// Print benchmark results as a comparison table.
pub fn print_comparison(reports: &[SearchReport]) {
    println!(
        "{:<18} {:<8} {:<8} {:<8} {:<10} {:<12}",
        "Strategy", "Found", "Length", "Cost", "Expanded", "Time"
    );
    println!("{}", "-".repeat(66));
    for report in reports {
        println!(
            "{:<18} {:<8} {:<8} {:<8} {:<10} {:<12}",
            report.name,
            if report.found { "yes" } else { "no" },
            report.path_length,
            report.total_cost,
            report.nodes_expanded,
            format!("{:.2?}", report.duration)
        );
    }
}
