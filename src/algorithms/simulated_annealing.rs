use crate::algorithms::a_star::AStar;
use crate::algorithms::common::{route_score, Heuristic, SearchStrategy, OBSTRUCTION_PENALTY};
use crate::grid::{GridWorld, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const INITIAL_TEMPERATURE: f64 = 1000.0;
const COOLING_RATE: f64 = 0.95;

/// Simulated annealing fallback for route repair: classic Metropolis
/// acceptance over waypoint-swap neighbors, cooling multiplicatively until the
/// temperature drops below 1. The best path observed during the walk is
/// returned, not the path the walk ends on.
pub struct SimulatedAnnealing {
    initial_temperature: f64,
    cooling_rate: f64,
    rng: StdRng,
}

impl SimulatedAnnealing {
    pub fn new() -> Self {
        Self::seeded(None)
    }

    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SimulatedAnnealing {
            initial_temperature: INITIAL_TEMPERATURE,
            cooling_rate: COOLING_RATE,
            rng,
        }
    }

    pub fn repair(
        &mut self,
        world: &GridWorld,
        current: Position,
        destination: Position,
        initial: Option<&[Position]>,
    ) -> Option<Vec<Position>> {
        let mut current_path = match initial.filter(|path| !path.is_empty()) {
            Some(path) => path.to_vec(),
            None => AStar::new(Heuristic::Manhattan).search(world, current, destination)?,
        };
        let mut current_score = route_score(world, &current_path, OBSTRUCTION_PENALTY);
        let mut best_path = current_path.clone();
        let mut best_score = current_score;

        let mut temperature = self.initial_temperature;
        while temperature > 1.0 {
            let neighbor = self.swap_waypoints(&current_path);
            let neighbor_score = route_score(world, &neighbor, OBSTRUCTION_PENALTY);

            if neighbor_score < current_score {
                current_path = neighbor;
                current_score = neighbor_score;
                if current_score < best_score {
                    best_path = current_path.clone();
                    best_score = current_score;
                }
            } else {
                let delta = current_score as f64 - neighbor_score as f64;
                if self.rng.gen::<f64>() < (delta / temperature).exp() {
                    current_path = neighbor;
                    current_score = neighbor_score;
                }
            }

            temperature *= self.cooling_rate;
        }

        Some(best_path)
            .filter(|path| path.first() == Some(&current) && path.last() == Some(&destination))
    }

    /// Swap two random distinct interior waypoints. Paths too short to have
    /// two interior cells are returned unchanged.
    fn swap_waypoints(&mut self, path: &[Position]) -> Vec<Position> {
        if path.len() <= 3 {
            return path.to_vec();
        }
        let mut swapped = path.to_vec();
        let i = self.rng.gen_range(1..path.len() - 1);
        let mut j = self.rng.gen_range(1..path.len() - 1);
        while j == i {
            j = self.rng.gen_range(1..path.len() - 1);
        }
        swapped.swap(i, j);
        swapped
    }
}

impl Default for SimulatedAnnealing {
    fn default() -> Self {
        Self::new()
    }
}
