use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use spin_lattice::config::AnnealConfig;
use spin_lattice::dump::write_ground_states;
use spin_lattice::{run_anneal, Shape};

use super::{open_output, print_correlation, progress_bar, stop_flag};
use crate::cli::AnnealArgs;

impl From<&AnnealArgs> for AnnealConfig {
    fn from(args: &AnnealArgs) -> Self {
        Self {
            beta: args.beta,
            n_lattices: args.lattices,
            steps: args.steps,
            noise: args.noise,
            seed: args.seed,
            sequential: args.sequential,
        }
    }
}

pub fn run(args: &AnnealArgs) -> Result<()> {
    let (rows, cols) = args
        .shape
        .resolve()
        .context("pass --size or both --rows and --cols")?;
    let shape = Shape::new(rows, cols)?;
    let config = AnnealConfig::from(args);
    let interrupted = stop_flag(args.time_limit.map(Duration::from_secs));

    let pb = progress_bar(config.steps * config.n_lattices as u64, "steps")?;
    let outcome = run_anneal(shape, &config, &interrupted, &|n| pb.inc(n));
    pb.finish();
    let outcome = outcome.with_context(|| format!("anneal on {rows}x{cols} failed"))?;

    let mut out = open_output(args.output.as_deref())?;
    write_ground_states(&mut out, &outcome.ground_states, shape)?;
    out.flush().context("failed to write anneal output")?;
    drop(out);

    if args.correlation && outcome.count() > 0 {
        print_correlation(shape, outcome.ground_states.iter())?;
    }

    info!(
        kept = outcome.count(),
        lattices = config.n_lattices,
        reference_energy = outcome.reference_energy,
        min_energy = ?outcome.min_energy(),
        "anneal output written"
    );
    Ok(())
}
