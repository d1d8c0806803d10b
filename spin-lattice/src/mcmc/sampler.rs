use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use validator::Validate;

use super::metropolis::metropolis_step;
use crate::config::SamplerConfig;
use crate::error::{Error, Result};
use crate::geometry::Lattice;
use crate::spins::energy::{global_energy, global_magnetization};
use crate::statistics::{SampleRecord, Statistics};

/// Steps between interrupt checks and progress callbacks.
pub const PROGRESS_CHUNK: u64 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WarmingUp,
    Sampling,
    Done,
}

/// Metropolis chain over one lattice with warm-up and periodic sampling.
///
/// The sampler only holds the schedule and the measurements; the lattice and
/// the RNG are borrowed per step so that one worker owns all three.
#[derive(Debug, Clone)]
pub struct Sampler {
    lattice_id: usize,
    beta: f64,
    total_steps: u64,
    warmup_steps: u64,
    sample_interval: u64,
    max_samples: Option<usize>,
    elapsed: u64,
    stats: Statistics,
    records: Vec<SampleRecord>,
}

impl Sampler {
    /// Fails with [`Error::Config`] when `config` does not validate.
    pub fn new(lattice_id: usize, config: &SamplerConfig) -> Result<Self> {
        config.validate()?;
        let expected =
            ((config.total_steps - config.warmup_steps) / config.sample_interval) as usize;
        let capacity = config.max_samples.map_or(expected, |m| m.min(expected));
        Ok(Self {
            lattice_id,
            beta: config.beta,
            total_steps: config.total_steps,
            warmup_steps: config.warmup_steps,
            sample_interval: config.sample_interval,
            max_samples: config.max_samples,
            elapsed: 0,
            stats: Statistics::new(),
            records: Vec::with_capacity(capacity),
        })
    }

    /// Number of proposal steps performed so far.
    pub fn steps(&self) -> u64 {
        self.elapsed
    }

    pub fn phase(&self) -> Phase {
        if self.elapsed >= self.total_steps {
            Phase::Done
        } else if self.elapsed <= self.warmup_steps {
            Phase::WarmingUp
        } else {
            Phase::Sampling
        }
    }

    fn wants_sample(&self) -> bool {
        self.elapsed > self.warmup_steps
            && self.elapsed % self.sample_interval == 0
            && self.max_samples.map_or(true, |m| self.records.len() < m)
    }

    /// Perform one proposal step and, if this step qualifies, record one
    /// sample. Returns whether the flip was accepted.
    pub fn step<R: Rng + ?Sized>(&mut self, lattice: &mut Lattice, rng: &mut R) -> Result<bool> {
        if self.phase() == Phase::Done {
            return Ok(false);
        }
        let accepted = metropolis_step(lattice, self.beta, rng)?;
        self.elapsed += 1;
        if self.wants_sample() {
            let energy = global_energy(lattice);
            let magnetization = global_magnetization(lattice);
            self.stats.update(energy, magnetization);
            self.records.push(SampleRecord {
                lattice: self.lattice_id,
                sample: self.records.len(),
                step: self.elapsed,
                energy,
                magnetization,
            });
        }
        Ok(accepted)
    }

    /// Drive the chain to [`Phase::Done`].
    ///
    /// `interrupted` is polled and `on_progress(steps)` is called every
    /// [`PROGRESS_CHUNK`] steps and once more at the end.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        lattice: &mut Lattice,
        rng: &mut R,
        interrupted: &AtomicBool,
        on_progress: &(dyn Fn(u64) + Sync),
    ) -> Result<()> {
        let mut reported = self.elapsed;
        while self.phase() != Phase::Done {
            if self.elapsed % PROGRESS_CHUNK == 0 {
                if interrupted.load(Ordering::Relaxed) {
                    return Err(Error::Interrupted);
                }
                if self.elapsed > reported {
                    on_progress(self.elapsed - reported);
                    reported = self.elapsed;
                }
            }
            self.step(lattice, rng)?;
        }
        on_progress(self.elapsed - reported);
        Ok(())
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn into_parts(self) -> (Statistics, Vec<SampleRecord>) {
        (self.stats, self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitialState;
    use crate::spins::Spin;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn config(total: u64, warmup: u64, interval: u64) -> SamplerConfig {
        SamplerConfig {
            beta: 0.3,
            n_lattices: 1,
            total_steps: total,
            warmup_steps: warmup,
            sample_interval: interval,
            max_samples: None,
            initial: InitialState::Up,
            seed: 1,
            sequential: true,
        }
    }

    #[test]
    fn test_phase_transitions() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        let mut lat = Lattice::square(4, 4, Spin::Up).unwrap();
        let mut s = Sampler::new(0, &config(10, 3, 2)).unwrap();
        assert_eq!(s.phase(), Phase::WarmingUp);
        for _ in 0..3 {
            s.step(&mut lat, &mut rng).unwrap();
        }
        assert_eq!(s.phase(), Phase::WarmingUp);
        s.step(&mut lat, &mut rng).unwrap();
        assert_eq!(s.phase(), Phase::Sampling);
        for _ in 4..10 {
            s.step(&mut lat, &mut rng).unwrap();
        }
        assert_eq!(s.phase(), Phase::Done);
        assert_eq!(s.steps(), 10);

        // further steps are no-ops
        assert_eq!(s.step(&mut lat, &mut rng), Ok(false));
        assert_eq!(s.steps(), 10);
    }

    #[test]
    fn test_samples_exactly_the_qualifying_steps() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let mut lat = Lattice::square(4, 4, Spin::Up).unwrap();
        let mut s = Sampler::new(0, &config(100, 25, 10)).unwrap();
        s.run(&mut lat, &mut rng, &AtomicBool::new(false), &|_| {})
            .unwrap();
        let steps: Vec<u64> = s.records().iter().map(|r| r.step).collect();
        assert_eq!(steps, vec![30, 40, 50, 60, 70, 80, 90, 100]);
        let samples: Vec<usize> = s.records().iter().map(|r| r.sample).collect();
        assert_eq!(samples, (0..8).collect::<Vec<_>>());
        assert_eq!(s.statistics().count, 8);
    }

    #[test]
    fn test_max_samples_cap() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let mut lat = Lattice::square(4, 4, Spin::Up).unwrap();
        let cfg = SamplerConfig {
            max_samples: Some(3),
            ..config(100, 0, 5)
        };
        let mut s = Sampler::new(2, &cfg).unwrap();
        s.run(&mut lat, &mut rng, &AtomicBool::new(false), &|_| {})
            .unwrap();
        assert_eq!(s.records().len(), 3);
        assert_eq!(s.records()[2].step, 15);
        assert!(s.records().iter().all(|r| r.lattice == 2));
        assert_eq!(s.steps(), 100);
    }

    #[test]
    fn test_records_match_lattice_observables() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(9);
        let mut lat = Lattice::square(6, 6, Spin::Up).unwrap();
        let mut s = Sampler::new(0, &config(50, 0, 50)).unwrap();
        s.run(&mut lat, &mut rng, &AtomicBool::new(false), &|_| {})
            .unwrap();
        let last = s.records().last().unwrap();
        assert_eq!(last.energy, global_energy(&lat));
        assert_eq!(last.magnetization, global_magnetization(&lat));
    }

    #[test]
    fn test_progress_sums_to_total() {
        use std::sync::atomic::AtomicU64;
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let mut lat = Lattice::square(4, 4, Spin::Up).unwrap();
        let total = 3 * PROGRESS_CHUNK + 17;
        let mut s = Sampler::new(0, &config(total, 0, 1000)).unwrap();
        let seen = AtomicU64::new(0);
        s.run(&mut lat, &mut rng, &AtomicBool::new(false), &|n| {
            seen.fetch_add(n, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), total);
    }

    #[test]
    fn test_interrupt() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        let mut lat = Lattice::square(4, 4, Spin::Up).unwrap();
        let mut s = Sampler::new(0, &config(1000, 0, 10)).unwrap();
        let stop = AtomicBool::new(true);
        assert_eq!(
            s.run(&mut lat, &mut rng, &stop, &|_| {}),
            Err(Error::Interrupted)
        );
    }

    #[test]
    fn test_rejects_invalid_schedule() {
        let zero_interval = SamplerConfig {
            sample_interval: 0,
            ..config(100, 10, 5)
        };
        assert!(matches!(Sampler::new(0, &zero_interval), Err(Error::Config(_))));
        let warmup_too_long = config(100, 100, 5);
        assert!(matches!(Sampler::new(0, &warmup_too_long), Err(Error::Config(_))));
    }

    #[test]
    fn test_cold_chain_stays_ordered() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(21);
        let mut lat = Lattice::square(8, 8, Spin::Up).unwrap();
        let cfg = SamplerConfig {
            beta: 1.0,
            ..config(200_000, 100_000, 1000)
        };
        let mut s = Sampler::new(0, &cfg).unwrap();
        s.run(&mut lat, &mut rng, &AtomicBool::new(false), &|_| {})
            .unwrap();
        let [energy, _, _, _, abs_mag] = s.statistics().average();
        assert!(abs_mag > 0.9 * 64.0, "|M| = {abs_mag}");
        assert!(energy < -0.9 * 128.0, "E = {energy}");
    }
}
