use std::sync::atomic::AtomicBool;
use std::time::Instant;

use spin_lattice::config::*;
use spin_lattice::{run_anneal, run_ensemble, run_search, Ensemble, Lattice, Shape, Spin};

const L: usize = 64;
const N_LATTICES: usize = 16;
const N_STEPS: u64 = 2_000_000;
const SEARCH_ROWS: usize = 4;
const SEARCH_COLS: usize = 8;
const SPLIT_DEPTH: usize = 6;
const ANNEAL_L: usize = 16;
const ANNEAL_STEPS: u64 = 1_000_000;

fn main() {
    let interrupted = AtomicBool::new(false);

    let config = SamplerConfig {
        beta: 0.44,
        n_lattices: N_LATTICES,
        total_steps: N_STEPS,
        warmup_steps: N_STEPS / 2,
        sample_interval: (L * L) as u64,
        max_samples: None,
        initial: InitialState::Random,
        seed: 42,
        sequential: false,
    };
    let shape = Shape::new(L, L).unwrap();
    let mut ensemble = Ensemble::new(shape, &config).unwrap();

    println!(
        "Lattice: {}x{}  |  Lattices: {}  |  Steps: {}",
        L, L, N_LATTICES, N_STEPS
    );
    println!("{}", "-".repeat(70));

    let t0 = Instant::now();
    let result = run_ensemble(&mut ensemble, &config, &interrupted, &|_| {}).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();
    let total_steps = (N_STEPS * N_LATTICES as u64) as f64;
    println!(
        "Metropolis: {:.3} s  |  {:.1} ns/step  |  <|m|> = {:.4}",
        elapsed,
        elapsed / total_steps * 1e9,
        result.summary.abs_mag_per_site()
    );

    for split_depth in [0, SPLIT_DEPTH] {
        let mut lattice = Lattice::frustrated(SEARCH_ROWS, SEARCH_COLS, Spin::Unknown).unwrap();
        let search = SearchConfig {
            energy_bound: None,
            split_depth,
        };
        let t0 = Instant::now();
        let outcome = run_search(&mut lattice, &search, &interrupted).unwrap();
        let elapsed = t0.elapsed().as_secs_f64();
        println!(
            "Search {}x{} split {}: {:.3} s  |  {} states  |  {} nodes",
            SEARCH_ROWS,
            SEARCH_COLS,
            split_depth,
            elapsed,
            outcome.count(),
            outcome.visited
        );
    }

    let anneal = AnnealConfig {
        beta: 3.0,
        n_lattices: N_LATTICES,
        steps: ANNEAL_STEPS,
        noise: 1_000,
        seed: 42,
        sequential: false,
    };
    let shape = Shape::new(ANNEAL_L, 2 * ANNEAL_L).unwrap();
    let t0 = Instant::now();
    let outcome = run_anneal(shape, &anneal, &interrupted, &|_| {}).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();
    let total_steps = (ANNEAL_STEPS * N_LATTICES as u64) as f64;
    println!(
        "Anneal {}x{}: {:.3} s  |  {:.1} ns/step  |  {} kept",
        ANNEAL_L,
        2 * ANNEAL_L,
        elapsed,
        elapsed / total_steps * 1e9,
        outcome.count()
    );
}
