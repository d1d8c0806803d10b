use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::config::AnnealConfig;
use crate::error::{Error, Result};
use crate::geometry::{Lattice, Shape};
use crate::mcmc::{disturb, kawasaki_step, stripe_lattice, PROGRESS_CHUNK};
use crate::search::GroundState;
use crate::spins::energy::{global_energy, global_magnetization};

/// Final states of a spin-exchange anneal.
#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    pub shape: Shape,
    /// Energy of the stripe starting state, `-(rows * cols)`.
    pub reference_energy: i32,
    /// Final energy of every lattice, in lattice order.
    pub final_energies: Vec<i32>,
    /// Final states at or below `reference_energy`, in lattice order.
    pub ground_states: Vec<GroundState>,
}

impl AnnealOutcome {
    pub fn count(&self) -> usize {
        self.ground_states.len()
    }

    pub fn min_energy(&self) -> Option<i32> {
        self.final_energies.iter().copied().min()
    }
}

fn anneal_one(
    id: usize,
    shape: Shape,
    config: &AnnealConfig,
    interrupted: &AtomicBool,
    on_progress: &(dyn Fn(u64) + Sync),
) -> Result<Lattice> {
    let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed + id as u64);
    let mut lattice = stripe_lattice(shape)?;
    disturb(&mut lattice, config.noise, &mut rng)?;

    let mut reported = 0;
    for step in 0..config.steps {
        if step % PROGRESS_CHUNK == 0 {
            if interrupted.load(Ordering::Relaxed) {
                return Err(Error::Interrupted);
            }
            if step > reported {
                on_progress(step - reported);
                reported = step;
            }
        }
        kawasaki_step(&mut lattice, config.beta, &mut rng)?;
    }
    on_progress(config.steps - reported);

    debug_assert_eq!(global_magnetization(&lattice), 0);
    debug!(
        lattice = id,
        energy = global_energy(&lattice),
        "anneal finished"
    );
    Ok(lattice)
}

/// Anneal `config.n_lattices` frustrated lattices with spin-exchange moves
/// and keep the final states that reach the stripe energy.
///
/// Lattices run in parallel over the rayon pool unless `config.sequential`
/// is set; lattice `i` uses an RNG seeded `seed + i`, so the outcome does
/// not depend on scheduling. `on_progress(steps)` receives step increments
/// from all workers.
pub fn run_anneal(
    shape: Shape,
    config: &AnnealConfig,
    interrupted: &AtomicBool,
    on_progress: &(dyn Fn(u64) + Sync),
) -> Result<AnnealOutcome> {
    config.validate()?;
    let reference = stripe_lattice(shape)?;
    let reference_energy = global_energy(&reference);

    let work = |id| anneal_one(id, shape, config, interrupted, on_progress);
    let lattices: Vec<Result<Lattice>> = if config.sequential || config.n_lattices == 1 {
        (0..config.n_lattices).map(work).collect()
    } else {
        (0..config.n_lattices).into_par_iter().map(work).collect()
    };

    let mut final_energies = Vec::with_capacity(config.n_lattices);
    let mut ground_states = Vec::new();
    for (id, lattice) in lattices.into_iter().enumerate() {
        let lattice = lattice?;
        let energy = global_energy(&lattice);
        final_energies.push(energy);
        if energy < reference_energy {
            warn!(
                lattice = id,
                energy,
                reference_energy,
                "state below the stripe energy"
            );
        }
        if energy <= reference_energy {
            ground_states.push(GroundState {
                spins: lattice.spins().to_vec(),
                energy,
            });
        }
    }

    let outcome = AnnealOutcome {
        shape,
        reference_energy,
        final_energies,
        ground_states,
    };
    info!(
        %shape,
        beta = config.beta,
        lattices = config.n_lattices,
        kept = outcome.count(),
        min_energy = ?outcome.min_energy(),
        "anneal complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Topology;
    use std::sync::atomic::AtomicU64;

    fn config(sequential: bool) -> AnnealConfig {
        AnnealConfig {
            beta: 4.0,
            n_lattices: 4,
            steps: 20_000,
            noise: 100,
            seed: 9,
            sequential,
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let shape = Shape::new(4, 8).unwrap();
        let flag = AtomicBool::new(false);
        let a = run_anneal(shape, &config(true), &flag, &|_| {}).unwrap();
        let b = run_anneal(shape, &config(false), &flag, &|_| {}).unwrap();
        assert_eq!(a.final_energies, b.final_energies);
        assert_eq!(a.ground_states, b.ground_states);
    }

    #[test]
    fn test_kept_states_are_balanced_and_low() {
        let shape = Shape::new(4, 8).unwrap();
        let flag = AtomicBool::new(false);
        let out = run_anneal(shape, &config(false), &flag, &|_| {}).unwrap();
        assert_eq!(out.reference_energy, -32);
        assert_eq!(out.final_energies.len(), 4);
        let kept = out
            .final_energies
            .iter()
            .filter(|&&e| e <= out.reference_energy)
            .count();
        assert_eq!(out.count(), kept);
        for state in &out.ground_states {
            let spins = state.spins.clone();
            let lat = Lattice::from_spins(shape, Topology::Frustrated, spins).unwrap();
            assert_eq!(global_magnetization(&lat), 0);
            assert_eq!(global_energy(&lat), state.energy);
            assert!(state.energy <= out.reference_energy);
        }
    }

    #[test]
    fn test_quench_without_noise_keeps_stripes() {
        let cfg = AnnealConfig {
            beta: 1e6,
            noise: 0,
            ..config(true)
        };
        let shape = Shape::new(2, 4).unwrap();
        let flag = AtomicBool::new(false);
        let out = run_anneal(shape, &cfg, &flag, &|_| {}).unwrap();
        assert_eq!(out.count(), 4);
        assert!(out.final_energies.iter().all(|&e| e <= -8));
    }

    #[test]
    fn test_progress_and_interrupt() {
        let shape = Shape::new(2, 4).unwrap();
        let seen = AtomicU64::new(0);
        let report = |n| {
            seen.fetch_add(n, Ordering::Relaxed);
        };
        let flag = AtomicBool::new(false);
        run_anneal(shape, &config(false), &flag, &report).unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 4 * 20_000);

        let stop = AtomicBool::new(true);
        let res = run_anneal(shape, &config(false), &stop, &|_| {});
        assert!(matches!(res, Err(Error::Interrupted)));
    }

    #[test]
    fn test_rejects_odd_columns() {
        let shape = Shape::new(4, 5).unwrap();
        let flag = AtomicBool::new(false);
        let res = run_anneal(shape, &config(true), &flag, &|_| {});
        assert!(matches!(res, Err(Error::DegenerateShape { .. })));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let cfg = AnnealConfig {
            n_lattices: 0,
            ..config(true)
        };
        let shape = Shape::new(2, 4).unwrap();
        let res = run_anneal(shape, &cfg, &AtomicBool::new(false), &|_| {});
        assert!(matches!(res, Err(Error::Config(_))));
    }
}
