pub mod anneal;
pub mod ensemble;

pub use anneal::{run_anneal, AnnealOutcome};
pub use ensemble::Ensemble;

use std::sync::atomic::AtomicBool;

use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;
use tracing::{debug, info};
use validator::Validate;

use crate::config::SamplerConfig;
use crate::error::{Error, Result};
use crate::geometry::{Lattice, Topology};
use crate::mcmc::Sampler;
use crate::statistics::{EnsembleResult, SampleRecord, SampleSummary, Statistics};

fn run_one(
    id: usize,
    lattice: &mut Lattice,
    rng: &mut Xoshiro256StarStar,
    config: &SamplerConfig,
    interrupted: &AtomicBool,
    on_progress: &(dyn Fn(u64) + Sync),
) -> Result<(Statistics, Vec<SampleRecord>)> {
    let mut sampler = Sampler::new(id, config)?;
    sampler.run(lattice, rng, interrupted, on_progress)?;
    debug!(
        lattice = id,
        samples = sampler.records().len(),
        "chain finished"
    );
    Ok(sampler.into_parts())
}

/// Run one Metropolis chain per ensemble lattice and pool the measurements.
///
/// Chains are independent, so they run in parallel over the rayon pool
/// unless `config.sequential` is set; either way the result is identical
/// for the same seed. Records come back ordered by lattice, then sample.
///
/// `on_progress(steps)` receives step increments from all workers.
pub fn run_ensemble(
    ensemble: &mut Ensemble,
    config: &SamplerConfig,
    interrupted: &AtomicBool,
    on_progress: &(dyn Fn(u64) + Sync),
) -> Result<EnsembleResult> {
    config.validate()?;
    let Some(first) = ensemble.lattices.first() else {
        return Err(Error::Config("ensemble has no lattices".to_string()));
    };
    if let Some(other) = ensemble
        .lattices
        .iter()
        .find(|l| l.topology() != Topology::Square)
    {
        return Err(Error::UnsupportedTopology {
            expected: Topology::Square,
            found: other.topology(),
        });
    }
    let shape = first.shape();
    let n_sites = first.n_sites();

    let work = |(id, (lattice, rng)): (usize, (&mut Lattice, &mut Xoshiro256StarStar))| {
        run_one(id, lattice, rng, config, interrupted, on_progress)
    };
    let results: Vec<Result<(Statistics, Vec<SampleRecord>)>> =
        if config.sequential || ensemble.lattices.len() == 1 {
            ensemble
                .lattices
                .iter_mut()
                .zip(ensemble.rngs.iter_mut())
                .enumerate()
                .map(work)
                .collect()
        } else {
            ensemble
                .lattices
                .par_iter_mut()
                .zip(ensemble.rngs.par_iter_mut())
                .enumerate()
                .map(work)
                .collect()
        };

    let mut stats = Statistics::new();
    let mut records = Vec::new();
    for r in results {
        let (s, recs) = r?;
        stats.merge(&s);
        records.extend(recs);
    }

    let summary = SampleSummary::from_statistics(&stats, config.beta, n_sites);
    info!(
        %shape,
        beta = config.beta,
        lattices = config.n_lattices,
        samples = summary.n_samples,
        energy = summary.energy,
        abs_mag = summary.abs_mag,
        "ensemble run complete"
    );
    Ok(EnsembleResult { summary, records })
}
