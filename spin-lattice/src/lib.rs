pub mod config;
pub mod dump;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod search;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use error::{Error, Result};
pub use geometry::{Lattice, Shape, Sublattice, Topology};
pub use search::{run_search, search_shape, GroundState, SearchOutcome};
pub use simulation::{run_anneal, run_ensemble, AnnealOutcome, Ensemble};
pub use spins::{Spin, SpinCounts};
pub use statistics::{EnsembleResult, SampleRecord, SampleSummary};
