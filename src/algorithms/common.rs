use crate::grid::{GridWorld, Position};

/// Added to a candidate path's score for every step predicted blocked.
pub const OBSTRUCTION_PENALTY: u32 = 1000;

/// Contract shared by the exhaustive search strategies: produce a path from
/// `start` to `goal` (both included), or `None` when the goal is unreachable.
/// Unreachability is a normal outcome, not a fault.
pub trait SearchStrategy {
    fn search(&mut self, world: &GridWorld, start: Position, goal: Position)
        -> Option<Vec<Position>>;

    /// Nodes expanded by the most recent `search` call.
    fn nodes_expanded(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    Manhattan,
    Euclidean,
    Chebyshev,
    Zero,
}

impl Heuristic {
    /// Unrecognized names degrade to the zero heuristic, which makes A*
    /// behave like uniform-cost search.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "manhattan" => Heuristic::Manhattan,
            "euclidean" => Heuristic::Euclidean,
            "chebyshev" => Heuristic::Chebyshev,
            _ => Heuristic::Zero,
        }
    }

    pub fn estimate(self, from: Position, to: Position) -> f64 {
        let dx = (from.x - to.x).abs() as f64;
        let dy = (from.y - to.y).abs() as f64;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Chebyshev => dx.max(dy),
            Heuristic::Zero => 0.0,
        }
    }
}

/// One candidate path prefix during a search call: where it is, when it gets
/// there, what it spent, and which packages the prefix already reached.
pub(crate) struct SearchNode {
    pub position: Position,
    pub time: u32,
    pub cost: u32,
    pub parent: Option<usize>,
    pub delivered: Vec<u32>,
}

/// Owns every node of a single search call. Parent links are indices into
/// this vector, so no node outlives the call that created it and path
/// reconstruction never touches a dangling reference.
pub(crate) struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn root(&mut self, position: Position) -> usize {
        self.insert(SearchNode {
            position,
            time: 0,
            cost: 0,
            parent: None,
            delivered: Vec::new(),
        })
    }

    pub fn insert(&mut self, node: SearchNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, index: usize) -> &SearchNode {
        &self.nodes[index]
    }

    /// One child per valid move from the node's cell at the node's time, each
    /// arriving one tick later with the move's terrain cost added and the
    /// delivered set extended if the child lands on an uncollected package.
    pub fn expand(&mut self, world: &GridWorld, index: usize) -> Vec<usize> {
        let (position, time, cost) = {
            let node = &self.nodes[index];
            (node.position, node.time, node.cost)
        };
        let delivered = self.nodes[index].delivered.clone();

        let mut children = Vec::new();
        for (next, move_cost) in world.valid_moves(position, time) {
            let mut child_delivered = delivered.clone();
            for (&id, &destination) in &world.packages {
                if destination == next && !child_delivered.contains(&id) {
                    child_delivered.push(id);
                }
            }
            children.push(self.insert(SearchNode {
                position: next,
                time: time + 1,
                cost: cost + move_cost,
                parent: Some(index),
                delivered: child_delivered,
            }));
        }
        children
    }

    /// Walk parent links back to the root and reverse.
    pub fn path_to(&self, index: usize) -> Vec<Position> {
        let mut path = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            path.push(self.nodes[i].position);
            cursor = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}

/// Score for a candidate repair path: summed terrain cost of every step after
/// the first, plus `obstruction_penalty` for each step whose cell is blocked
/// at the step's index-derived time (the candidate's clock starts at zero, so
/// step k is checked at time k-1). A penalty of 0 disables the term. Both
/// repair strategies score through this one function.
pub fn route_score(world: &GridWorld, path: &[Position], obstruction_penalty: u32) -> u32 {
    if path.is_empty() {
        return u32::MAX;
    }
    let mut total: u32 = 0;
    for (step, &pos) in path.iter().enumerate().skip(1) {
        total = total.saturating_add(world.terrain_cost(pos));
        if obstruction_penalty > 0 && world.is_blocked(pos, (step - 1) as u32) {
            total = total.saturating_add(obstruction_penalty);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn heuristic_values() {
        assert_eq!(Heuristic::Manhattan.estimate(p(0, 0), p(4, 4)), 8.0);
        assert_eq!(Heuristic::Euclidean.estimate(p(0, 0), p(3, 4)), 5.0);
        assert_eq!(Heuristic::Chebyshev.estimate(p(0, 0), p(4, 2)), 4.0);
        assert_eq!(Heuristic::Zero.estimate(p(0, 0), p(4, 4)), 0.0);
    }

    #[test]
    fn unknown_heuristic_name_is_zero() {
        assert_eq!(Heuristic::from_name("nonsense"), Heuristic::Zero);
        assert_eq!(Heuristic::from_name("Manhattan"), Heuristic::Manhattan);
    }

    #[test]
    fn expansion_collects_packages() {
        let mut world = GridWorld::new(5, 5);
        world.add_package(7, p(1, 0));
        let mut arena = NodeArena::new();
        let root = arena.root(p(0, 0));
        let children = arena.expand(&world, root);
        let onto_package = children
            .iter()
            .find(|&&c| arena.get(c).position == p(1, 0))
            .copied()
            .unwrap();
        assert_eq!(arena.get(onto_package).delivered, vec![7]);
        assert_eq!(arena.get(onto_package).time, 1);
        assert_eq!(arena.get(onto_package).cost, 1);
    }

    #[test]
    fn path_reconstruction_walks_back_to_root() {
        let world = GridWorld::new(3, 1);
        let mut arena = NodeArena::new();
        let root = arena.root(p(0, 0));
        let first = arena.expand(&world, root)[0];
        let second = arena
            .expand(&world, first)
            .into_iter()
            .find(|&c| arena.get(c).position == p(2, 0))
            .unwrap();
        assert_eq!(arena.path_to(second), vec![p(0, 0), p(1, 0), p(2, 0)]);
    }

    #[test]
    fn score_sums_terrain_and_penalizes_blocked_steps() {
        let mut world = GridWorld::new(5, 5);
        world.set_terrain_cost(p(1, 0), 3);
        let path = [p(0, 0), p(1, 0), p(2, 0)];
        assert_eq!(route_score(&world, &path, OBSTRUCTION_PENALTY), 4);

        world.add_static_obstacle(p(2, 0));
        assert_eq!(route_score(&world, &path, OBSTRUCTION_PENALTY), 1004);
        assert_eq!(route_score(&world, &path, 0), 4);
    }

    #[test]
    fn empty_path_scores_worst() {
        let world = GridWorld::new(5, 5);
        assert_eq!(route_score(&world, &[], OBSTRUCTION_PENALTY), u32::MAX);
    }
}
