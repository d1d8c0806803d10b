use std::io::Write;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use tracing::info;

use spin_lattice::config::SamplerConfig;
use spin_lattice::{run_ensemble, Ensemble, Shape};

use super::{open_output, progress_bar};
use crate::cli::SampleArgs;

impl From<&SampleArgs> for SamplerConfig {
    fn from(args: &SampleArgs) -> Self {
        Self {
            beta: args.beta,
            n_lattices: args.lattices,
            total_steps: args.steps,
            warmup_steps: args.warmup,
            sample_interval: args.interval,
            max_samples: args.max_samples,
            initial: args.init,
            seed: args.seed,
            sequential: args.sequential,
        }
    }
}

pub fn run(args: &SampleArgs) -> Result<()> {
    let config = SamplerConfig::from(args);
    let shape = Shape::new(args.rows, args.cols)?;
    let mut ensemble = Ensemble::new(shape, &config)?;

    let pb = progress_bar(config.total_steps * config.n_lattices as u64, "steps")?;
    let interrupted = AtomicBool::new(false);
    let result = run_ensemble(&mut ensemble, &config, &interrupted, &|n| pb.inc(n));
    pb.finish();
    let result = result?;

    let mut out = open_output(args.records.as_deref())?;
    for record in &result.records {
        record.write_to(&mut out)?;
    }
    out.flush().context("failed to write sample records")?;

    let s = &result.summary;
    info!(
        samples = s.n_samples,
        energy = s.energy_per_site(),
        abs_mag = s.abs_mag_per_site(),
        specific_heat = s.specific_heat_per_site(),
        susceptibility = s.susceptibility_per_site(),
        "per-site averages"
    );
    Ok(())
}
