use validator::{Validate, ValidationError};

use crate::spins::Spin;

/// Upper limit on the partition depth of the parallel ground-state search
/// (at most `2^MAX_SPLIT_DEPTH` subtrees).
pub const MAX_SPLIT_DEPTH: usize = 16;

/// How each ensemble lattice is initialized before sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialState {
    Up,
    Down,
    Random,
}

impl TryFrom<&str> for InitialState {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "random" => Ok(Self::Random),
            _ => Err(format!(
                "unknown initial state '{s}', expected 'up', 'down' or 'random'"
            )),
        }
    }
}

impl InitialState {
    /// Uniform spin for the `Up`/`Down` variants.
    pub fn uniform(&self) -> Option<Spin> {
        match self {
            Self::Up => Some(Spin::Up),
            Self::Down => Some(Spin::Down),
            Self::Random => None,
        }
    }
}

fn validate_sampler_config(cfg: &SamplerConfig) -> Result<(), ValidationError> {
    if !cfg.beta.is_finite() || cfg.beta < 0.0 {
        return Err(ValidationError::new("beta must be finite and >= 0"));
    }
    if cfg.n_lattices < 1 {
        return Err(ValidationError::new("n_lattices must be >= 1"));
    }
    if cfg.total_steps < 1 {
        return Err(ValidationError::new("total_steps must be >= 1"));
    }
    if cfg.warmup_steps >= cfg.total_steps {
        return Err(ValidationError::new("warmup_steps must be < total_steps"));
    }
    if cfg.sample_interval < 1 {
        return Err(ValidationError::new("sample_interval must be >= 1"));
    }
    if cfg.max_samples == Some(0) {
        return Err(ValidationError::new("max_samples must be >= 1"));
    }
    Ok(())
}

/// Parameters of a Metropolis ensemble run.
///
/// Steps are single-site proposals, counted from 1. Samples are taken after
/// every step `t > warmup_steps` with `t % sample_interval == 0`, until
/// `max_samples` (if set) have been taken.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_sampler_config"))]
pub struct SamplerConfig {
    /// Inverse temperature.
    pub beta: f64,
    /// Number of independent lattices in the ensemble.
    pub n_lattices: usize,
    pub total_steps: u64,
    pub warmup_steps: u64,
    pub sample_interval: u64,
    pub max_samples: Option<usize>,
    pub initial: InitialState,
    /// Lattice `i` is driven by an RNG seeded with `seed + i`.
    pub seed: u64,
    /// Run lattices on the current thread instead of the rayon pool.
    pub sequential: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            beta: 0.44,
            n_lattices: 1,
            total_steps: 100_000,
            warmup_steps: 50_000,
            sample_interval: 100,
            max_samples: None,
            initial: InitialState::Random,
            seed: 42,
            sequential: false,
        }
    }
}

fn validate_search_config(cfg: &SearchConfig) -> Result<(), ValidationError> {
    if cfg.split_depth > MAX_SPLIT_DEPTH {
        return Err(ValidationError::new("split_depth must be <= 16"));
    }
    Ok(())
}

/// Parameters of the ground-state search.
#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_search_config"))]
pub struct SearchConfig {
    /// Initial recording threshold; `-(rows * cols)` when unset.
    pub energy_bound: Option<i32>,
    /// Sites assigned before the tree is handed out to rayon workers.
    /// `0` runs the plain sequential search.
    pub split_depth: usize,
}

fn validate_anneal_config(cfg: &AnnealConfig) -> Result<(), ValidationError> {
    if !cfg.beta.is_finite() || cfg.beta < 0.0 {
        return Err(ValidationError::new("beta must be finite and >= 0"));
    }
    if cfg.n_lattices < 1 {
        return Err(ValidationError::new("n_lattices must be >= 1"));
    }
    Ok(())
}

/// Parameters of a spin-exchange anneal on the frustrated lattice.
///
/// Every lattice starts from the column-stripe state, receives `noise`
/// unconditional exchanges and then `steps` Metropolis exchange proposals.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_anneal_config"))]
pub struct AnnealConfig {
    pub beta: f64,
    pub n_lattices: usize,
    pub steps: u64,
    pub noise: u64,
    /// Lattice `i` is driven by an RNG seeded with `seed + i`.
    pub seed: u64,
    pub sequential: bool,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            beta: 3.0,
            n_lattices: 16,
            steps: 100_000,
            noise: 1_000,
            seed: 42,
            sequential: false,
        }
    }
}
