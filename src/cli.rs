use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use spin_lattice::config::InitialState;

#[derive(Parser)]
#[command(name = "spinlab")]
#[command(
    author,
    version,
    about = "Metropolis sampling and ground-state search on 2D Ising lattices"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sample an ensemble of square lattices with single-flip Metropolis
    Sample(SampleArgs),

    /// Enumerate low-energy configurations of the frustrated lattice
    Search(SearchArgs),

    /// Anneal frustrated lattices with magnetization-conserving spin exchanges
    Anneal(AnnealArgs),
}

fn parse_initial(s: &str) -> Result<InitialState, String> {
    InitialState::try_from(s)
}

#[derive(Args)]
pub struct SampleArgs {
    #[arg(long, default_value_t = 16)]
    pub rows: usize,

    #[arg(long, default_value_t = 16)]
    pub cols: usize,

    /// Inverse temperature
    #[arg(long, default_value_t = 0.44)]
    pub beta: f64,

    /// Number of independent lattices
    #[arg(long, default_value_t = 1)]
    pub lattices: usize,

    /// Total single-site proposals per lattice
    #[arg(long, default_value_t = 100_000)]
    pub steps: u64,

    /// Proposals discarded before sampling starts
    #[arg(long, default_value_t = 50_000)]
    pub warmup: u64,

    /// Proposals between samples
    #[arg(long, default_value_t = 100)]
    pub interval: u64,

    /// Stop recording after this many samples per lattice
    #[arg(long)]
    pub max_samples: Option<usize>,

    /// Initial state: up, down or random
    #[arg(long, default_value = "random", value_parser = parse_initial)]
    pub init: InitialState,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Run lattices one after another on the main thread
    #[arg(long)]
    pub sequential: bool,

    /// Write sample records here instead of stdout
    #[arg(long)]
    pub records: Option<PathBuf>,
}

#[derive(Args)]
pub struct FrustratedShape {
    /// Use an L x 2L lattice
    #[arg(
        long,
        conflicts_with_all = ["rows", "cols"],
        required_unless_present_all = ["rows", "cols"]
    )]
    pub size: Option<usize>,

    #[arg(long, requires = "cols")]
    pub rows: Option<usize>,

    #[arg(long, requires = "rows")]
    pub cols: Option<usize>,
}

impl FrustratedShape {
    /// `(rows, cols)`, or `None` when neither form is complete.
    pub fn resolve(&self) -> Option<(usize, usize)> {
        match (self.size, self.rows, self.cols) {
            (Some(l), _, _) => Some((l, 2 * l)),
            (None, Some(rows), Some(cols)) => Some((rows, cols)),
            _ => None,
        }
    }
}

#[derive(Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub shape: FrustratedShape,

    /// Initial energy threshold, defaults to -(rows * cols)
    #[arg(long, allow_hyphen_values = true)]
    pub bound: Option<i32>,

    /// Sites assigned before the tree is split across threads (0 = sequential)
    #[arg(long, default_value_t = 0)]
    pub split_depth: usize,

    /// Write recorded configurations here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Abort the search after this many seconds
    #[arg(long)]
    pub time_limit: Option<u64>,

    /// Print the A/B sublattice correlation averaged over the lowest-energy states
    #[arg(long)]
    pub correlation: bool,
}

#[derive(Args)]
pub struct AnnealArgs {
    #[command(flatten)]
    pub shape: FrustratedShape,

    /// Inverse temperature of the exchange moves
    #[arg(long, default_value_t = 3.0)]
    pub beta: f64,

    /// Number of independent lattices
    #[arg(long, default_value_t = 16)]
    pub lattices: usize,

    /// Exchange proposals per lattice
    #[arg(long, default_value_t = 100_000)]
    pub steps: u64,

    /// Unconditional exchanges applied to the stripe state first
    #[arg(long, default_value_t = 1_000)]
    pub noise: u64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Run lattices one after another on the main thread
    #[arg(long)]
    pub sequential: bool,

    /// Write final states at or below the stripe energy here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Abort the anneal after this many seconds
    #[arg(long)]
    pub time_limit: Option<u64>,

    /// Print the A/B sublattice correlation averaged over the written states
    #[arg(long)]
    pub correlation: bool,
}
