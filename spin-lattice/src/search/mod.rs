//! Exhaustive ground-state enumeration on the frustrated lattice.
//!
//! Sites are assigned in ascending index order. At each site both `Up` and
//! `Down` are tried; a branch is followed only when the site would have at
//! most two same-sign neighbors among those assigned so far. Every complete
//! assignment whose energy is at or below the running threshold is
//! recorded, and the threshold only ever moves down.

pub mod guard;
pub mod partition;

pub use guard::ScopedSite;

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};
use validator::Validate;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::geometry::{Lattice, Shape, Topology};
use crate::spins::energy::{global_energy, neighbor_spin_histogram};
use crate::spins::{Spin, SpinCounts};

/// Most same-sign neighbors a site may have when it is assigned.
pub const MAX_SAME_NEIGHBORS: usize = 2;

/// Local feasibility of assigning `candidate` given its neighbor histogram.
#[inline]
pub fn judge(candidate: Spin, counts: SpinCounts) -> bool {
    match candidate {
        Spin::Up => counts.up <= MAX_SAME_NEIGHBORS,
        Spin::Down => counts.down <= MAX_SAME_NEIGHBORS,
        Spin::Unknown => false,
    }
}

/// A complete assignment recorded by the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundState {
    pub spins: Vec<Spin>,
    pub energy: i32,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub shape: Shape,
    /// Recorded configurations in traversal order.
    pub ground_states: Vec<GroundState>,
    /// Search-tree nodes entered, including complete leaves.
    pub visited: u64,
}

impl SearchOutcome {
    /// Number of recorded configurations.
    pub fn count(&self) -> usize {
        self.ground_states.len()
    }

    pub fn min_energy(&self) -> Option<i32> {
        self.ground_states.iter().map(|g| g.energy).min()
    }

    /// Recorded configurations at the lowest energy found.
    pub fn minimal(&self) -> impl Iterator<Item = &GroundState> {
        let min = self.min_energy();
        self.ground_states
            .iter()
            .filter(move |g| Some(g.energy) == min)
    }
}

/// Depth-first explorer state shared across one recursion.
pub(crate) struct Explorer<'a> {
    bound: i32,
    threshold: i32,
    found: Vec<GroundState>,
    visited: u64,
    interrupted: &'a AtomicBool,
}

impl<'a> Explorer<'a> {
    pub(crate) fn new(threshold: i32, interrupted: &'a AtomicBool) -> Self {
        Self {
            bound: threshold,
            threshold,
            found: Vec::new(),
            visited: 0,
            interrupted,
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<GroundState>, u64) {
        (self.found, self.visited)
    }

    fn complete(&mut self, lattice: &Lattice) {
        let energy = global_energy(lattice);
        if energy > self.threshold {
            return;
        }
        if energy < self.bound {
            warn!(
                energy,
                bound = self.bound,
                "configuration below the energy bound"
            );
        }
        if energy < self.threshold {
            debug!(energy, previous = self.threshold, "threshold lowered");
            self.threshold = energy;
        }
        self.found.push(GroundState {
            spins: lattice.spins().to_vec(),
            energy,
        });
    }

    /// Explore every feasible completion of `lattice` from site `depth` on.
    /// On return, sites `depth..` are `Unknown` again.
    pub(crate) fn explore(&mut self, lattice: &mut Lattice, depth: usize) -> Result<()> {
        if self.interrupted.load(Ordering::Relaxed) {
            return Err(Error::Interrupted);
        }
        self.visited += 1;
        if depth == lattice.n_sites() {
            self.complete(lattice);
            return Ok(());
        }
        let mut site = ScopedSite::new(lattice, depth)?;
        for candidate in [Spin::Up, Spin::Down] {
            site.assign(candidate)?;
            if judge(candidate, neighbor_spin_histogram(&site, depth)?) {
                self.explore(&mut site, depth + 1)?;
            }
        }
        Ok(())
    }
}

/// Default recording threshold: `-(rows * cols)`.
pub fn default_energy_bound(shape: Shape) -> i32 {
    -(shape.n_sites() as i32)
}

fn check_search_lattice(lattice: &Lattice) -> Result<()> {
    if lattice.topology() != Topology::Frustrated {
        return Err(Error::UnsupportedTopology {
            expected: Topology::Frustrated,
            found: lattice.topology(),
        });
    }
    if let Some(index) = lattice.spins().iter().position(|s| s.is_assigned()) {
        return Err(Error::Config(format!(
            "search lattice must start unassigned, site {index} holds {}",
            lattice.spins()[index]
        )));
    }
    Ok(())
}

/// Enumerate ground-state candidates of a fully unassigned frustrated
/// lattice.
///
/// With `config.split_depth > 0` the tree is cut after that many sites and
/// the subtrees are searched in parallel on cloned lattices; the outcome is
/// the same as the sequential search. The lattice is left fully `Unknown`.
pub fn run_search(
    lattice: &mut Lattice,
    config: &SearchConfig,
    interrupted: &AtomicBool,
) -> Result<SearchOutcome> {
    config.validate()?;
    check_search_lattice(lattice)?;
    let shape = lattice.shape();
    let bound = config
        .energy_bound
        .unwrap_or_else(|| default_energy_bound(shape));

    let (ground_states, visited) = if config.split_depth == 0 {
        let mut explorer = Explorer::new(bound, interrupted);
        explorer.explore(lattice, 0)?;
        explorer.into_parts()
    } else {
        partition::search_partitioned(lattice, config.split_depth, bound, interrupted)?
    };

    let outcome = SearchOutcome {
        shape,
        ground_states,
        visited,
    };
    info!(
        %shape,
        bound,
        count = outcome.count(),
        min_energy = ?outcome.min_energy(),
        visited,
        "ground-state search complete"
    );
    Ok(outcome)
}

/// Convenience wrapper: build an unassigned `rows × cols` frustrated lattice
/// and search it.
pub fn search_shape(
    rows: usize,
    cols: usize,
    config: &SearchConfig,
    interrupted: &AtomicBool,
) -> Result<SearchOutcome> {
    let mut lattice = Lattice::frustrated(rows, cols, Spin::Unknown)?;
    run_search(&mut lattice, config, interrupted)
}
