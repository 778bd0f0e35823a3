use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Map file to load.
    #[arg(long, default_value = "maps/small.map")]
    pub map: String,

    /// Search strategy: bfs, ucs, or astar.
    #[arg(long, default_value = "astar")]
    pub algorithm: String,

    /// A* heuristic: manhattan, euclidean, or chebyshev.
    #[arg(long, default_value = "manhattan")]
    pub heuristic: String,

    #[arg(long, default_value_t = 1000)]
    pub fuel: u32,

    #[arg(long, default_value_t = 1000)]
    pub max_steps: usize,

    /// Compare all search strategies instead of running a delivery.
    #[arg(long, default_value_t = false)]
    pub benchmark: bool,

    /// Replay the realized path frame by frame after the run.
    #[arg(long, default_value_t = false)]
    pub visualize: bool,

    #[arg(long, default_value_t = 200)]
    pub delay_ms: u64,

    /// Seed for the randomized repair strategies.
    #[arg(long)]
    pub seed: Option<u64>,
}
