pub mod a_star;
pub mod bfs;
pub mod common;
pub mod hill_climbing;
pub mod simulated_annealing;
pub mod uniform_cost;

use crate::algorithms::a_star::AStar;
use crate::algorithms::bfs::BreadthFirst;
use crate::algorithms::common::{Heuristic, SearchStrategy};
use crate::algorithms::uniform_cost::UniformCost;

/// Build a search strategy from its CLI name: "bfs", "ucs", or "astar".
/// Unknown names fall back to A*.
pub fn strategy_for(name: &str, heuristic: Heuristic) -> Box<dyn SearchStrategy> {
    match name {
        "bfs" => Box::new(BreadthFirst::new()),
        "ucs" => Box::new(UniformCost::new()),
        _ => Box::new(AStar::new(heuristic)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridWorld, Position};

    #[test]
    fn strategies_agree_on_an_open_grid() {
        let world = GridWorld::new(5, 5);
        let start = Position::new(0, 0);
        let goal = Position::new(4, 4);
        for name in ["bfs", "ucs", "astar", "something-else"] {
            let mut strategy = strategy_for(name, Heuristic::Manhattan);
            let path = strategy.search(&world, start, goal).unwrap();
            assert_eq!(path.len(), 9, "{name} returned a non-optimal path");
            assert_eq!(path[0], start);
            assert_eq!(*path.last().unwrap(), goal);
            assert!(strategy.nodes_expanded() > 0);
        }
    }
}
