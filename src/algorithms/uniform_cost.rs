use crate::algorithms::common::{NodeArena, SearchStrategy};
use crate::grid::{GridWorld, Position};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Frontier entry ordered by accumulated cost.
/// Ord is reversed to make the BinaryHeap a min-heap.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Entry {
    cost: u32,
    index: usize,
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Uniform-cost search: expands nodes in non-decreasing accumulated-cost
/// order. Keeps a best-known-cost table keyed by position; stale heap entries
/// are dropped when popped rather than removed eagerly.
#[derive(Default)]
pub struct UniformCost {
    nodes_expanded: usize,
}

impl UniformCost {
    pub fn new() -> Self {
        UniformCost::default()
    }
}

impl SearchStrategy for UniformCost {
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
            cost: 0,
            index: arena.root(start),
        });

        let mut best_cost: FxHashMap<Position, u32> = FxHashMap::default();
        best_cost.insert(start, 0);

        while let Some(Entry { cost, index }) = frontier.pop() {
            let position = arena.get(index).position;
            if cost > best_cost.get(&position).copied().unwrap_or(u32::MAX) {
                continue; // lazily deleted
            }
            if position == goal {
                return Some(arena.path_to(index));
            }
            self.nodes_expanded += 1;
            for child in arena.expand(world, index) {
                let node = arena.get(child);
                let (child_pos, child_cost) = (node.position, node.cost);
                if child_cost < best_cost.get(&child_pos).copied().unwrap_or(u32::MAX) {
                    best_cost.insert(child_pos, child_cost);
                    frontier.push(Entry {
                        cost: child_cost,
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
