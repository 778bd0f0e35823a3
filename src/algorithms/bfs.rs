use crate::algorithms::common::{NodeArena, SearchStrategy};
use crate::grid::{GridWorld, Position};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Breadth-first search: fewest-moves path, ignoring terrain weights.
///
/// The visited set is keyed by position alone, not (position, time). A cell
/// enqueued once is never reconsidered even though a different arrival time
/// might see different obstacle occupancy; accepted approximation for static
/// or obstacle-light grids.
#[derive(Default)]
pub struct BreadthFirst {
    nodes_expanded: usize,
}

impl BreadthFirst {
    pub fn new() -> Self {
        BreadthFirst::default()
    }
}

impl SearchStrategy for BreadthFirst {
    fn search(
        &mut self,
        world: &GridWorld,
        start: Position,
        goal: Position,
    ) -> Option<Vec<Position>> {
        self.nodes_expanded = 0;
        let mut arena = NodeArena::new();
        let mut queue = VecDeque::new();
        queue.push_back(arena.root(start));

        let mut visited = FxHashSet::default();
        visited.insert(start);

        while let Some(index) = queue.pop_front() {
            if arena.get(index).position == goal {
                return Some(arena.path_to(index));
            }
            self.nodes_expanded += 1;
            for child in arena.expand(world, index) {
                if visited.insert(arena.get(child).position) {
                    queue.push_back(child);
                }
            }
        }
        None
    }

    fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }
}
