pub mod anneal;
pub mod sample;
pub mod search;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use spin_lattice::spins::correlation::{mean_correlation, sublattice_correlation};
use spin_lattice::{GroundState, Lattice, Shape, Topology};

/// Buffered writer to `path`, or to stdout when unset.
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let file =
                File::create(p).with_context(|| format!("failed to create {}", p.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

pub(crate) fn progress_bar(len: u64, message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )?
        .progress_chars("=> "),
    );
    pb.set_message(message);
    Ok(pb)
}

/// Stop flag that trips after `limit`, if one is given.
pub(crate) fn stop_flag(limit: Option<Duration>) -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    if let Some(limit) = limit {
        let flag = Arc::clone(&flag);
        thread::spawn(move || {
            thread::sleep(limit);
            flag.store(true, Ordering::Relaxed);
        });
    }
    flag
}

/// Print the A/B correlation matrix averaged over `states`, one row per line.
pub(crate) fn print_correlation<'a>(
    shape: Shape,
    states: impl Iterator<Item = &'a GroundState>,
) -> Result<()> {
    let matrices = states
        .map(|state| {
            let lattice = Lattice::from_spins(shape, Topology::Frustrated, state.spins.clone())?;
            sublattice_correlation(&lattice)
        })
        .collect::<spin_lattice::Result<Vec<_>>>()?;
    for row in mean_correlation(&matrices) {
        let line: Vec<String> = row.iter().map(|c| format!("{c:.6}")).collect();
        println!("{}", line.join(" "));
    }
    Ok(())
}
