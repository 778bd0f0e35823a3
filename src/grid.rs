use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::Write as _;

/// Terrain cost returned for any cell outside the grid. Effectively impassable.
pub const IMPASSABLE: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

/// Movement directions offered during search expansion. `Stay` is deliberately
/// excluded: the agent never waits in place, only obstacle patterns may pause.
pub const CARDINALS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Stay => (0, 0),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "stay" => Some(Direction::Stay),
            _ => None,
        }
    }
}

/// A moving obstacle following a fixed cyclic pattern, advancing one pattern
/// step every `interval` ticks.
///
/// The obstacle carries no mutable state: its cell at any tick is replayed from
/// the origin, so predictions made by the planner for times it has not
/// simulated yet always agree with what execution later observes.
#[derive(Debug, Clone)]
pub struct DynamicObstacle {
    pub name: String,
    origin: Position,
    pattern: Vec<Direction>,
    interval: u32,
}

impl DynamicObstacle {
    /// `pattern` must be non-empty; `interval` is clamped to at least 1.
    pub fn new(name: &str, origin: Position, pattern: Vec<Direction>, interval: u32) -> Self {
        assert!(!pattern.is_empty(), "obstacle pattern must be non-empty");
        DynamicObstacle {
            name: name.to_string(),
            origin,
            pattern,
            interval: interval.max(1),
        }
    }

    /// Cell occupied at absolute time `time`, as a pure function of time.
    pub fn position_at(&self, time: u32) -> Position {
        let steps = time / self.interval;
        let mut pos = self.origin;
        for i in 0..=steps {
            pos = pos.offset(self.pattern[i as usize % self.pattern.len()].delta());
        }
        pos
    }
}

/// The grid world: per-cell terrain costs, permanently blocked cells, moving
/// obstacles, package destinations, and the agent's start cell.
///
/// Purely a query surface once configured; search calls may share it freely.
pub struct GridWorld {
    pub width: i32,
    pub height: i32,
    costs: Vec<Vec<u32>>,
    static_obstacles: FxHashSet<Position>,
    dynamic_obstacles: FxHashMap<String, DynamicObstacle>,
    pub packages: FxHashMap<u32, Position>,
    pub start: Position,
}

impl GridWorld {
    /// All-road (cost 1) world of the given dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        GridWorld {
            width,
            height,
            costs: vec![vec![1; width.max(0) as usize]; height.max(0) as usize],
            static_obstacles: FxHashSet::default(),
            dynamic_obstacles: FxHashMap::default(),
            packages: FxHashMap::default(),
            start: Position::new(0, 0),
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn terrain_cost(&self, pos: Position) -> u32 {
        if !self.in_bounds(pos) {
            return IMPASSABLE;
        }
        self.costs[pos.y as usize][pos.x as usize]
    }

    pub fn set_terrain_cost(&mut self, pos: Position, cost: u32) {
        if self.in_bounds(pos) {
            self.costs[pos.y as usize][pos.x as usize] = cost;
        }
    }

    pub fn add_static_obstacle(&mut self, pos: Position) {
        self.static_obstacles.insert(pos);
    }

    pub fn add_dynamic_obstacle(&mut self, obstacle: DynamicObstacle) {
        self.dynamic_obstacles.insert(obstacle.name.clone(), obstacle);
    }

    pub fn add_package(&mut self, id: u32, destination: Position) {
        self.packages.insert(id, destination);
    }

    /// True if `pos` is a wall or any moving obstacle's predicted cell at `time`.
    pub fn is_blocked(&self, pos: Position, time: u32) -> bool {
        if self.static_obstacles.contains(&pos) {
            return true;
        }
        self.dynamic_obstacles
            .values()
            .any(|obstacle| obstacle.position_at(time) == pos)
    }

    /// In-bounds, unblocked 4-neighbors of `pos` at `time`, with their costs.
    pub fn valid_moves(&self, pos: Position, time: u32) -> Vec<(Position, u32)> {
        let mut moves = Vec::with_capacity(4);
        for direction in CARDINALS {
            let next = pos.offset(direction.delta());
            if self.in_bounds(next) && !self.is_blocked(next, time) {
                moves.push((next, self.terrain_cost(next)));
            }
        }
        moves
    }

    /// Text rendering of the world at `time`, with the agent overlaid.
    pub fn render(&self, agent: Option<Position>, time: u32) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                let symbol = if agent == Some(pos) {
                    'A'
                } else if self.is_blocked(pos, time) {
                    'X'
                } else if self.packages.values().any(|&dest| dest == pos) {
                    'D'
                } else if pos == self.start {
                    'S'
                } else {
                    let cost = self.terrain_cost(pos);
                    if cost > 9 {
                        '#'
                    } else {
                        char::from_digit(cost, 10).unwrap_or('?')
                    }
                };
                out.push(symbol);
                out.push(' ');
            }
            out.pop();
            out.push('\n');
        }
        let _ = write!(out, "t={time}");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_terrain_is_road() {
        let world = GridWorld::new(10, 10);
        assert_eq!(world.terrain_cost(Position::new(0, 0)), 1);
        assert_eq!(world.terrain_cost(Position::new(9, 9)), 1);
    }

    #[test]
    fn out_of_bounds_is_impassable() {
        let world = GridWorld::new(10, 10);
        assert_eq!(world.terrain_cost(Position::new(10, 10)), IMPASSABLE);
        assert_eq!(world.terrain_cost(Position::new(-1, 0)), IMPASSABLE);
    }

    #[test]
    fn bounds_check() {
        let world = GridWorld::new(10, 10);
        assert!(world.in_bounds(Position::new(0, 0)));
        assert!(world.in_bounds(Position::new(9, 9)));
        assert!(!world.in_bounds(Position::new(10, 10)));
        assert!(!world.in_bounds(Position::new(-1, -1)));
    }

    #[test]
    fn static_obstacle_blocks_at_any_time() {
        let mut world = GridWorld::new(10, 10);
        world.add_static_obstacle(Position::new(5, 5));
        assert!(world.is_blocked(Position::new(5, 5), 0));
        assert!(world.is_blocked(Position::new(5, 5), 1234));
        assert!(!world.is_blocked(Position::new(0, 0), 0));
    }

    #[test]
    fn obstacle_prediction_is_deterministic() {
        let mut world = GridWorld::new(10, 10);
        world.add_dynamic_obstacle(DynamicObstacle::new(
            "patrol",
            Position::new(4, 4),
            vec![Direction::Right, Direction::Left],
            2,
        ));
        for time in 0..20 {
            let first = world.is_blocked(Position::new(5, 4), time);
            let second = world.is_blocked(Position::new(5, 4), time);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn obstacle_replay_cycles_through_pattern() {
        let obstacle = DynamicObstacle::new(
            "bounce",
            Position::new(2, 2),
            vec![Direction::Right, Direction::Left],
            1,
        );
        // One pattern step has already been applied at t=0.
        assert_eq!(obstacle.position_at(0), Position::new(3, 2));
        assert_eq!(obstacle.position_at(1), Position::new(2, 2));
        assert_eq!(obstacle.position_at(2), Position::new(3, 2));
    }

    #[test]
    fn interval_slows_the_replay() {
        let obstacle = DynamicObstacle::new("slow", Position::new(0, 0), vec![Direction::Down], 3);
        assert_eq!(obstacle.position_at(0), Position::new(0, 1));
        assert_eq!(obstacle.position_at(2), Position::new(0, 1));
        assert_eq!(obstacle.position_at(3), Position::new(0, 2));
    }

    #[test]
    fn stay_pauses_an_obstacle() {
        let obstacle = DynamicObstacle::new(
            "pauser",
            Position::new(1, 1),
            vec![Direction::Right, Direction::Stay],
            1,
        );
        assert_eq!(obstacle.position_at(0), Position::new(2, 1));
        assert_eq!(obstacle.position_at(1), Position::new(2, 1));
        assert_eq!(obstacle.position_at(2), Position::new(3, 1));
    }

    #[test]
    fn corner_has_two_moves() {
        let world = GridWorld::new(5, 5);
        let moves = world.valid_moves(Position::new(0, 0), 0);
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|&(_, cost)| cost == 1));
    }

    #[test]
    fn blocked_neighbor_is_not_offered() {
        let mut world = GridWorld::new(5, 5);
        world.add_static_obstacle(Position::new(1, 0));
        let moves = world.valid_moves(Position::new(0, 0), 0);
        assert_eq!(moves, vec![(Position::new(0, 1), 1)]);
    }
}
