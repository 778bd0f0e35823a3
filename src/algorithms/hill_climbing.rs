use crate::algorithms::a_star::AStar;
use crate::algorithms::common::{route_score, Heuristic, SearchStrategy, OBSTRUCTION_PENALTY};
use crate::grid::{GridWorld, Position, CARDINALS};
use log::debug;
use pathfinding::prelude::bfs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_ITERATIONS: usize = 100;
const IMPROVEMENT_CAP: usize = 10;
const NOISE_PROBABILITY: f64 = 0.1;

/// Hill climbing with random restarts, used to patch a committed route whose
/// next cell turned out blocked. Neighbors replace a short random interior
/// segment with a detour found by a constrained breadth-first search; worse
/// neighbors are occasionally accepted to escape plateaus.
pub struct HillClimbing {
    max_restarts: usize,
    rng: StdRng,
}

impl HillClimbing {
    pub fn new() -> Self {
        Self::seeded(None)
    }

    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        HillClimbing {
            max_restarts: 10,
            rng,
        }
    }

    /// Best replacement found for the stretch from `current` to `destination`,
    /// starting from `initial` when given (otherwise a fresh A* seed). Returns
    /// `None` when no candidate with the requested endpoints exists.
    pub fn repair(
        &mut self,
        world: &GridWorld,
        current: Position,
        destination: Position,
        initial: Option<&[Position]>,
    ) -> Option<Vec<Position>> {
        let mut best: Option<Vec<Position>> = initial
            .filter(|path| !path.is_empty())
            .map(|path| path.to_vec());
        let mut best_score = best
            .as_deref()
            .map_or(u32::MAX, |path| route_score(world, path, OBSTRUCTION_PENALTY));

        for restart in 0..self.max_restarts {
            let mut current_path = match &best {
                Some(path) => path.clone(),
                None => match AStar::new(Heuristic::Manhattan).search(world, current, destination)
                {
                    Some(path) => path,
                    None => continue,
                },
            };
            let mut current_score = route_score(world, &current_path, OBSTRUCTION_PENALTY);
            let mut improvements = 0;

            for _ in 0..MAX_ITERATIONS {
                let neighbor = self.perturb(world, &current_path);
                let neighbor_score = route_score(world, &neighbor, OBSTRUCTION_PENALTY);
                if neighbor_score < current_score {
                    current_path = neighbor;
                    current_score = neighbor_score;
                    improvements += 1;
                } else if self.rng.gen_bool(NOISE_PROBABILITY) {
                    // Occasionally walk downhill.
                    current_path = neighbor;
                    current_score = neighbor_score;
                }
                if improvements >= IMPROVEMENT_CAP {
                    break;
                }
            }

            if current_score < best_score {
                debug!(
                    "restart {restart}: improved score {best_score} -> {current_score}"
                );
                best = Some(current_path);
                best_score = current_score;
            }
        }

        best.filter(|path| path.first() == Some(&current) && path.last() == Some(&destination))
    }

    /// Replace a random interior segment (1-3 cells) with a detour that avoids
    /// the segment's own cells. Falls back to the unchanged path when no
    /// detour exists.
    fn perturb(&mut self, world: &GridWorld, path: &[Position]) -> Vec<Position> {
        if path.len() <= 2 {
            return path.to_vec();
        }
        let start_idx = self.rng.gen_range(1..path.len() - 1);
        let end_idx = (start_idx + self.rng.gen_range(1..=3)).min(path.len() - 1);
        let segment = &path[start_idx..end_idx];
        let from = path[start_idx - 1];
        let to = path[end_idx];

        if let Some(detour) = detour_around(world, from, to, segment) {
            let mut patched = path[..start_idx].to_vec();
            patched.extend_from_slice(&detour[1..]);
            patched.extend_from_slice(&path[end_idx + 1..]);
            return patched;
        }
        path.to_vec()
    }
}

impl Default for HillClimbing {
    fn default() -> Self {
        Self::new()
    }
}

/// Shortest alternative from `from` to `to` that keeps clear of `avoid` and of
/// anything blocked at time 0.
fn detour_around(
    world: &GridWorld,
    from: Position,
    to: Position,
    avoid: &[Position],
) -> Option<Vec<Position>> {
    bfs(
        &from,
        |&pos| {
            CARDINALS
                .iter()
                .map(move |direction| pos.offset(direction.delta()))
                .filter(|next| {
                    world.in_bounds(*next)
                        && !world.is_blocked(*next, 0)
                        && !avoid.contains(next)
                })
                .collect::<Vec<_>>()
        },
        |&pos| pos == to,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn repair_preserves_endpoints() {
        let world = GridWorld::new(5, 5);
        let initial = [
            p(0, 0),
            p(1, 0),
            p(2, 0),
            p(3, 0),
            p(4, 0),
            p(4, 1),
            p(4, 2),
            p(4, 3),
            p(4, 4),
        ];
        let mut climber = HillClimbing::seeded(Some(7));
        let repaired = climber.repair(&world, p(0, 0), p(4, 4), Some(&initial)).unwrap();
        assert_eq!(repaired.first(), Some(&p(0, 0)));
        assert_eq!(repaired.last(), Some(&p(4, 4)));
    }

    #[test]
    fn repair_routes_around_a_new_wall() {
        let mut world = GridWorld::new(5, 5);
        world.add_static_obstacle(p(2, 0));
        let initial = [p(0, 0), p(1, 0), p(2, 0), p(3, 0)];
        let mut climber = HillClimbing::seeded(Some(7));
        let repaired = climber.repair(&world, p(0, 0), p(3, 0), Some(&initial)).unwrap();
        assert_eq!(repaired.first(), Some(&p(0, 0)));
        assert_eq!(repaired.last(), Some(&p(3, 0)));
        assert!(!repaired.contains(&p(2, 0)));
    }

    #[test]
    fn seeds_from_search_when_no_initial_path_given() {
        let world = GridWorld::new(5, 5);
        let mut climber = HillClimbing::seeded(Some(7));
        let repaired = climber.repair(&world, p(0, 0), p(4, 4), None).unwrap();
        assert_eq!(repaired.first(), Some(&p(0, 0)));
        assert_eq!(repaired.last(), Some(&p(4, 4)));
    }

    #[test]
    fn unreachable_destination_fails_explicitly() {
        let mut world = GridWorld::new(5, 5);
        world.add_static_obstacle(p(3, 4));
        world.add_static_obstacle(p(4, 3));
        world.add_static_obstacle(p(3, 3));
        let mut climber = HillClimbing::seeded(Some(7));
        assert!(climber.repair(&world, p(0, 0), p(4, 4), None).is_none());
    }
}
