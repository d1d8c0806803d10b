pub mod results;
mod stats;

pub use results::{EnsembleResult, SampleRecord, SampleSummary};
pub use stats::Statistics;
