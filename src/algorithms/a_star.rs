use crate::algorithms::common::{Heuristic, NodeArena, SearchStrategy};
use crate::grid::{GridWorld, Position};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Frontier entry ordered by f = g + h.
/// Ord is reversed to make the BinaryHeap a min-heap.
#[derive(Clone, Copy, PartialEq)]
struct Entry {
    f: f64,
    index: usize,
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// A* search guided by a selectable distance heuristic. A position is
/// finalized only once popped; a queued position may be re-inserted whenever
/// a strictly better g is found for it.
pub struct AStar {
    heuristic: Heuristic,
    nodes_expanded: usize,
}

impl AStar {
    pub fn new(heuristic: Heuristic) -> Self {
        AStar {
            heuristic,
            nodes_expanded: 0,
        }
    }
}

impl SearchStrategy for AStar {
    fn search(
        &mut self,
        world: &GridWorld,
        start: Position,
        goal: Position,
    ) -> Option<Vec<Position>> {
        self.nodes_expanded = 0;
        let mut arena = NodeArena::new();
        let mut frontier = BinaryHeap::new();
        frontier.push(Entry {
            f: self.heuristic.estimate(start, goal),
            index: arena.root(start),
        });

        let mut g_costs: FxHashMap<Position, u32> = FxHashMap::default();
        g_costs.insert(start, 0);
        let mut closed = FxHashSet::default();

        while let Some(Entry { index, .. }) = frontier.pop() {
            let position = arena.get(index).position;
            if !closed.insert(position) {
                continue;
            }
            if position == goal {
                return Some(arena.path_to(index));
            }
            self.nodes_expanded += 1;
            for child in arena.expand(world, index) {
                let node = arena.get(child);
                let (child_pos, child_g) = (node.position, node.cost);
                if closed.contains(&child_pos) {
                    continue;
                }
                if child_g < g_costs.get(&child_pos).copied().unwrap_or(u32::MAX) {
                    g_costs.insert(child_pos, child_g);
                    frontier.push(Entry {
                        f: child_g as f64 + self.heuristic.estimate(child_pos, goal),
                        index: child,
                    });
                }
            }
        }
        None
    }

    fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::uniform_cost::UniformCost;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn path_cost(world: &GridWorld, path: &[Position]) -> u32 {
        path[1..].iter().map(|&pos| world.terrain_cost(pos)).sum()
    }

    fn weighted_world() -> GridWorld {
        let mut world = GridWorld::new(6, 6);
        world.set_terrain_cost(p(2, 1), 5);
        world.set_terrain_cost(p(2, 2), 5);
        world.set_terrain_cost(p(2, 3), 5);
        world.set_terrain_cost(p(3, 3), 2);
        world.add_static_obstacle(p(4, 1));
        world
    }

    #[test]
    fn all_heuristics_find_the_goal() {
        let world = GridWorld::new(5, 5);
        for heuristic in [
            Heuristic::Manhattan,
            Heuristic::Euclidean,
            Heuristic::Chebyshev,
        ] {
            let path = AStar::new(heuristic).search(&world, p(0, 0), p(4, 4)).unwrap();
            assert_eq!(path.len(), 9);
            assert_eq!(path[0], p(0, 0));
            assert_eq!(path[8], p(4, 4));
        }
    }

    #[test]
    fn never_worse_than_uniform_cost() {
        let world = weighted_world();
        let reference = UniformCost::new().search(&world, p(0, 0), p(5, 5)).unwrap();
        for heuristic in [
            Heuristic::Manhattan,
            Heuristic::Euclidean,
            Heuristic::Chebyshev,
        ] {
            let path = AStar::new(heuristic).search(&world, p(0, 0), p(5, 5)).unwrap();
            assert!(path_cost(&world, &path) <= path_cost(&world, &reference));
        }
    }

    #[test]
    fn zero_heuristic_degrades_to_uniform_cost() {
        let world = weighted_world();
        let reference = UniformCost::new().search(&world, p(0, 0), p(5, 5)).unwrap();
        let path = AStar::new(Heuristic::Zero).search(&world, p(0, 0), p(5, 5)).unwrap();
        assert_eq!(path_cost(&world, &path), path_cost(&world, &reference));
    }

    #[test]
    fn unreachable_goal_reports_no_path() {
        let mut world = GridWorld::new(5, 5);
        world.add_static_obstacle(p(3, 4));
        world.add_static_obstacle(p(4, 3));
        world.add_static_obstacle(p(3, 3));
        let mut astar = AStar::new(Heuristic::Manhattan);
        assert!(astar.search(&world, p(0, 0), p(4, 4)).is_none());
    }
}
