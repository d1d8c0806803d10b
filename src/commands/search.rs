use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use spin_lattice::config::SearchConfig;
use spin_lattice::dump::write_ground_states;
use spin_lattice::{run_search, Lattice, Spin};

use super::{open_output, print_correlation, stop_flag};
use crate::cli::SearchArgs;

pub fn run(args: &SearchArgs) -> Result<()> {
    let (rows, cols) = args
        .shape
        .resolve()
        .context("pass --size or both --rows and --cols")?;
    let config = SearchConfig {
        energy_bound: args.bound,
        split_depth: args.split_depth,
    };
    let mut lattice = Lattice::frustrated(rows, cols, Spin::Unknown)?;
    let interrupted = stop_flag(args.time_limit.map(Duration::from_secs));

    let outcome = run_search(&mut lattice, &config, &interrupted)
        .with_context(|| format!("ground-state search on {rows}x{cols} failed"))?;

    let mut out = open_output(args.output.as_deref())?;
    write_ground_states(&mut out, &outcome.ground_states, outcome.shape)?;
    out.flush().context("failed to write search output")?;
    drop(out);

    if args.correlation {
        print_correlation(outcome.shape, outcome.minimal())?;
    }

    info!(
        count = outcome.count(),
        min_energy = ?outcome.min_energy(),
        "search output written"
    );
    Ok(())
}
