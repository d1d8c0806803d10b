use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::debug;

use super::{judge, Explorer, GroundState, ScopedSite};
use crate::error::{Error, Result};
use crate::geometry::Lattice;
use crate::spins::energy::neighbor_spin_histogram;
use crate::spins::Spin;

/// Collect every feasible assignment of sites `depth..split` as a cloned
/// lattice, in traversal order. Returns the number of nodes entered above
/// the split.
fn collect_prefixes(
    lattice: &mut Lattice,
    depth: usize,
    split: usize,
    out: &mut Vec<Lattice>,
    interrupted: &AtomicBool,
) -> Result<u64> {
    if interrupted.load(Ordering::Relaxed) {
        return Err(Error::Interrupted);
    }
    if depth == split {
        out.push(lattice.clone());
        return Ok(0);
    }
    let mut visited = 1;
    let mut site = ScopedSite::new(lattice, depth)?;
    for candidate in [Spin::Up, Spin::Down] {
        site.assign(candidate)?;
        if judge(candidate, neighbor_spin_histogram(&site, depth)?) {
            visited += collect_prefixes(&mut site, depth + 1, split, out, interrupted)?;
        }
    }
    Ok(visited)
}

/// Search the tree below each prefix in parallel, then merge.
///
/// Every subtree starts from the global bound, so it records a superset of
/// what the sequential search records there. Replaying the concatenated
/// records in traversal order against one running threshold drops exactly
/// the extra ones.
pub(crate) fn search_partitioned(
    lattice: &mut Lattice,
    split_depth: usize,
    bound: i32,
    interrupted: &AtomicBool,
) -> Result<(Vec<GroundState>, u64)> {
    let split = split_depth.min(lattice.n_sites());
    let mut prefixes = Vec::new();
    let mut visited = collect_prefixes(lattice, 0, split, &mut prefixes, interrupted)?;
    debug!(
        split,
        partitions = prefixes.len(),
        "search tree partitioned"
    );

    let parts: Vec<Result<(Vec<GroundState>, u64)>> = prefixes
        .into_par_iter()
        .map(|mut prefix| {
            let mut explorer = Explorer::new(bound, interrupted);
            explorer.explore(&mut prefix, split)?;
            Ok(explorer.into_parts())
        })
        .collect();

    let mut threshold = bound;
    let mut merged = Vec::new();
    for part in parts {
        let (found, n) = part?;
        visited += n;
        for state in found {
            if state.energy <= threshold {
                threshold = state.energy;
                merged.push(state);
            }
        }
    }
    Ok((merged, visited))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::search::{run_search, SearchOutcome};

    fn search(rows: usize, cols: usize, split_depth: usize, bound: Option<i32>) -> SearchOutcome {
        let mut lat = Lattice::frustrated(rows, cols, Spin::Unknown).unwrap();
        let cfg = SearchConfig {
            energy_bound: bound,
            split_depth,
        };
        let out = run_search(&mut lat, &cfg, &AtomicBool::new(false)).unwrap();
        assert!(lat.spins().iter().all(|&s| s == Spin::Unknown));
        out
    }

    #[test]
    fn test_prefixes_in_traversal_order() {
        let mut lat = Lattice::frustrated(2, 4, Spin::Unknown).unwrap();
        let mut out = Vec::new();
        let visited =
            collect_prefixes(&mut lat, 0, 2, &mut out, &AtomicBool::new(false)).unwrap();
        // two assigned sites cannot give three same-sign neighbors
        assert_eq!(out.len(), 4);
        assert_eq!(visited, 3);
        let heads: Vec<(Spin, Spin)> = out.iter().map(|l| (l.spins()[0], l.spins()[1])).collect();
        assert_eq!(
            heads,
            vec![
                (Spin::Up, Spin::Up),
                (Spin::Up, Spin::Down),
                (Spin::Down, Spin::Up),
                (Spin::Down, Spin::Down),
            ]
        );
        for lat in &out {
            assert!(lat.spins()[2..].iter().all(|&s| s == Spin::Unknown));
        }
    }

    #[test]
    fn test_partitioned_matches_sequential() {
        for (rows, cols) in [(2, 4), (2, 6), (4, 4)] {
            let seq = search(rows, cols, 0, None);
            for split in [1, 3, 5] {
                let par = search(rows, cols, split, None);
                assert_eq!(
                    par.ground_states, seq.ground_states,
                    "{rows}x{cols} split {split}"
                );
                assert_eq!(par.visited, seq.visited);
            }
        }
    }

    #[test]
    fn test_partitioned_matches_sequential_with_loose_bound() {
        let seq = search(2, 4, 0, Some(100));
        let par = search(2, 4, 4, Some(100));
        assert_eq!(par.ground_states, seq.ground_states);
    }

    #[test]
    fn test_split_beyond_lattice() {
        let seq = search(2, 4, 0, None);
        let par = search(2, 4, 16, None);
        assert_eq!(par.ground_states, seq.ground_states);
        assert_eq!(par.visited, seq.visited);
    }

    #[test]
    fn test_interrupted() {
        let mut lat = Lattice::frustrated(2, 4, Spin::Unknown).unwrap();
        let res = search_partitioned(&mut lat, 2, -8, &AtomicBool::new(true));
        assert!(matches!(res, Err(Error::Interrupted)));
        assert!(lat.spins().iter().all(|&s| s == Spin::Unknown));
    }
}
