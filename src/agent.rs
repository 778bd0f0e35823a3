use crate::algorithms::common::Heuristic;
use crate::algorithms::hill_climbing::HillClimbing;
use crate::algorithms::simulated_annealing::SimulatedAnnealing;
use crate::algorithms::strategy_for;
use crate::grid::{GridWorld, Position};
use log::{info, warn};
use rustc_hash::FxHashSet;
use std::fmt;

/// Why a run stopped before finishing its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    FuelExhausted,
    Blocked,
}

/// Execution state machine. `Completed` and `Stopped` are terminal for a run;
/// `reset` returns the agent to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Idle,
    Planning,
    Executing,
    Replanning,
    Completed,
    Stopped(StopReason),
}

/// Outcome record of one route execution attempt.
#[derive(Debug, Clone)]
pub struct DeliveryStatus {
    pub delivered: Vec<u32>,
    pub total_cost: u32,
    pub total_time: u32,
    pub path: Vec<Position>,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Packages delivered: {:?}", self.delivered)?;
        writeln!(f, "Total cost: {}", self.total_cost)?;
        writeln!(f, "Total time: {}", self.total_time)?;
        write!(f, "Cells traversed: {}", self.path.len())
    }
}

/// The delivery agent: plans a multi-package route, executes it step by step,
/// and falls back to local-search repair when a planned cell is blocked at the
/// moment it would be entered.
pub struct DeliveryAgent {
    pub position: Position,
    pub fuel: u32,
    pub time: u32,
    pub state: AgentState,
    delivered: FxHashSet<u32>,
    history: Vec<Position>,
    start: Position,
    fuel_capacity: u32,
    nodes_expanded: usize,
    repair_seed: Option<u64>,
}

impl DeliveryAgent {
    pub fn new(start: Position, fuel_capacity: u32) -> Self {
        DeliveryAgent {
            position: start,
            fuel: fuel_capacity,
            time: 0,
            state: AgentState::Idle,
            delivered: FxHashSet::default(),
            history: vec![start],
            start,
            fuel_capacity,
            nodes_expanded: 0,
            repair_seed: None,
        }
    }

    /// Fix the RNG seed used by the repair strategies, for reproducible runs.
    pub fn set_repair_seed(&mut self, seed: u64) {
        self.repair_seed = Some(seed);
    }

    pub fn delivered(&self) -> &FxHashSet<u32> {
        &self.delivered
    }

    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Search nodes expanded by the most recent `plan_route` call, summed
    /// across all its per-package searches.
    pub fn planning_nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    /// Greedy nearest-package route: repeatedly search from the planning
    /// cursor to every undelivered package, commit to the shortest returned
    /// path, and advance the cursor to that package. Stops early, returning
    /// the route assembled so far, when no remaining package is reachable.
    ///
    /// This is an approximation, not an optimal multi-package tour.
    pub fn plan_route(&mut self, world: &GridWorld, algorithm: &str, heuristic: &str) -> Vec<Position> {
        self.state = AgentState::Planning;
        self.nodes_expanded = 0;
        let heuristic = Heuristic::from_name(heuristic);

        let mut route = vec![self.position];
        let mut cursor = self.position;
        let mut remaining: Vec<u32> = world
            .packages
            .keys()
            .copied()
            .filter(|id| !self.delivered.contains(id))
            .collect();
        remaining.sort_unstable();

        while !remaining.is_empty() {
            let mut nearest: Option<(u32, Vec<Position>)> = None;
            for &id in &remaining {
                let destination = world.packages[&id];
                let mut strategy = strategy_for(algorithm, heuristic);
                if let Some(path) = strategy.search(world, cursor, destination) {
                    let closer = nearest
                        .as_ref()
                        .map_or(true, |(_, best)| path.len() < best.len());
                    if closer {
                        nearest = Some((id, path));
                    }
                }
                self.nodes_expanded += strategy.nodes_expanded();
            }

            match nearest {
                Some((id, path)) => {
                    route.extend_from_slice(&path[1..]);
                    cursor = world.packages[&id];
                    remaining.retain(|&other| other != id);
                }
                // Whatever is left cannot be reached from here.
                None => break,
            }
        }

        self.state = AgentState::Idle;
        route
    }

    /// Walk the route cell by cell, up to `max_steps` moves. Each next cell is
    /// checked for obstruction at the current tick before entering; a blocked
    /// cell triggers a repair of the remaining suffix, and a failed repair
    /// ends the run. Each move debits fuel by the cell's terrain cost,
    /// advances the clock one tick, and delivers any package whose destination
    /// was just reached (at most once per package).
    pub fn execute_route(
        &mut self,
        world: &GridWorld,
        route: &[Position],
        max_steps: usize,
    ) -> DeliveryStatus {
        let mut route = route.to_vec();
        self.state = AgentState::Executing;
        let mut index = 1;
        let mut steps = 0;

        while index < route.len() && steps < max_steps {
            if world.is_blocked(route[index], self.time) {
                info!(
                    "obstruction at {:?} (t={}), repairing remaining route",
                    route[index], self.time
                );
                self.state = AgentState::Replanning;
                match self.repair_route(world, &route[index - 1..]) {
                    Some(patched) => {
                        route.truncate(index - 1);
                        route.extend(patched);
                        self.state = AgentState::Executing;
                        if index >= route.len() {
                            break;
                        }
                    }
                    None => {
                        warn!("route repair failed at {:?}, stopping", self.position);
                        self.state = AgentState::Stopped(StopReason::Blocked);
                        break;
                    }
                }
            }

            let next = route[index];
            let cost = world.terrain_cost(next);
            if self.fuel < cost {
                warn!(
                    "out of fuel at {:?} (need {}, have {})",
                    self.position, cost, self.fuel
                );
                self.state = AgentState::Stopped(StopReason::FuelExhausted);
                break;
            }

            self.position = next;
            self.fuel -= cost;
            self.time += 1;
            self.history.push(next);
            for (&id, &destination) in &world.packages {
                if destination == next && self.delivered.insert(id) {
                    info!("package {id} delivered at {next:?}");
                }
            }

            index += 1;
            steps += 1;
        }

        if self.state == AgentState::Executing {
            self.state = AgentState::Completed;
        }

        let mut delivered: Vec<u32> = self.delivered.iter().copied().collect();
        delivered.sort_unstable();
        DeliveryStatus {
            delivered,
            total_cost: self.history[1..]
                .iter()
                .map(|&pos| world.terrain_cost(pos))
                .sum(),
            total_time: self.time,
            path: self.history.clone(),
        }
    }

    /// Patch the remaining route suffix (first cell = last cell successfully
    /// occupied). Hill climbing first; simulated annealing only when that
    /// fails. `None` means the obstruction is unrepairable.
    fn repair_route(&mut self, world: &GridWorld, remaining: &[Position]) -> Option<Vec<Position>> {
        if remaining.len() < 2 {
            return None;
        }
        let current = remaining[0];
        let destination = remaining[remaining.len() - 1];

        let mut climber = HillClimbing::seeded(self.repair_seed);
        if let Some(path) = climber.repair(world, current, destination, Some(remaining)) {
            return Some(path);
        }
        let mut annealer = SimulatedAnnealing::seeded(self.repair_seed);
        annealer.repair(world, current, destination, Some(remaining))
    }

    /// Return all mutable state to its initial values.
    pub fn reset(&mut self) {
        self.position = self.start;
        self.fuel = self.fuel_capacity;
        self.time = 0;
        self.state = AgentState::Idle;
        self.delivered.clear();
        self.history.clear();
        self.history.push(self.start);
        self.nodes_expanded = 0;
    }
}
