use super::{Spin, SpinCounts};
use crate::error::{Error, Result};
use crate::geometry::{Lattice, Topology};

/// Sum of `s_i * s_n` over the neighbors `n` of `index`.
#[inline]
fn bond_sum(lattice: &Lattice, index: usize) -> i32 {
    let si = lattice.spin_unchecked(index).value() as i32;
    lattice
        .neighbors_unchecked(index)
        .iter()
        .map(|&j| si * lattice.spin_unchecked(j as usize).value() as i32)
        .sum()
}

/// Interaction energy of one site with its neighbors.
///
/// Square lattices use the ferromagnetic sign (`-Σ s_i s_n`, lowest when
/// aligned). Frustrated lattices use the antiferromagnetic sign (`+Σ s_i s_n`).
/// The two conventions are not interchangeable.
pub fn local_energy(lattice: &Lattice, index: usize) -> Result<i32> {
    if index >= lattice.n_sites() {
        return Err(Error::Range {
            index,
            len: lattice.n_sites(),
        });
    }
    Ok(local_energy_unchecked(lattice, index))
}

#[inline]
pub(crate) fn local_energy_unchecked(lattice: &Lattice, index: usize) -> i32 {
    match lattice.topology() {
        Topology::Square => -bond_sum(lattice, index),
        Topology::Frustrated => bond_sum(lattice, index),
    }
}

/// Total interaction energy. Every bond is seen from both endpoints, so the
/// double sum is halved.
pub fn global_energy(lattice: &Lattice) -> i32 {
    let double: i32 = (0..lattice.n_sites())
        .map(|i| local_energy_unchecked(lattice, i))
        .sum();
    debug_assert!(double % 2 == 0, "odd double-counted energy {double}");
    double / 2
}

/// Signed sum of spin values.
pub fn global_magnetization(lattice: &Lattice) -> i32 {
    lattice.spins().iter().map(|s| s.value() as i32).sum()
}

/// Count of Up / Down / Unknown among the neighbors of `index`.
pub fn neighbor_spin_histogram(lattice: &Lattice, index: usize) -> Result<SpinCounts> {
    let mut counts = SpinCounts::default();
    for &j in lattice.neighbor_indices(index)? {
        counts.add(lattice.spin_unchecked(j as usize));
    }
    Ok(counts)
}

/// Energy change from flipping `index` alone.
#[inline]
pub fn flip_delta(lattice: &Lattice, index: usize) -> Result<i32> {
    Ok(-2 * local_energy(lattice, index)?)
}

/// Number of sites holding `spin`.
pub fn count(lattice: &Lattice, spin: Spin) -> usize {
    lattice.spins().iter().filter(|&&s| s == spin).count()
}
