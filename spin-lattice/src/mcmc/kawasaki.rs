//! Spin-exchange (Kawasaki) moves on the frustrated lattice.
//!
//! A move swaps a site with one of its neighbors on the other sublattice, so
//! the number of Up and Down spins never changes.

use rand::Rng;

use super::metropolis::accept;
use crate::error::{Error, Result};
use crate::geometry::{Lattice, Shape, Topology};
use crate::spins::energy::local_energy_unchecked;
use crate::spins::Spin;

fn require_frustrated(lattice: &Lattice) -> Result<()> {
    if lattice.topology() != Topology::Frustrated {
        return Err(Error::UnsupportedTopology {
            expected: Topology::Frustrated,
            found: lattice.topology(),
        });
    }
    Ok(())
}

/// Zero-magnetization starting state: even columns Up, odd columns Down.
///
/// Every site has its four cross-sublattice bonds satisfied and its two
/// same-sublattice bonds frustrated, so the energy is `-(rows * cols)`.
pub fn stripe_lattice(shape: Shape) -> Result<Lattice> {
    let spins = (0..shape.n_sites())
        .map(|i| {
            if shape.coords(i).1 % 2 == 0 {
                Spin::Up
            } else {
                Spin::Down
            }
        })
        .collect();
    Lattice::from_spins(shape, Topology::Frustrated, spins)
}

/// Uniformly chosen neighbor of `index` on the other sublattice, counting
/// repeated table entries with their multiplicity.
fn random_partner<R: Rng + ?Sized>(lattice: &Lattice, index: usize, rng: &mut R) -> Option<usize> {
    let own = lattice.sublattice(index);
    let partners = || {
        lattice
            .neighbors_unchecked(index)
            .iter()
            .map(|&j| j as usize)
            .filter(move |&j| lattice.sublattice(j) != own)
    };
    let n = partners().count();
    if n == 0 {
        return None;
    }
    partners().nth(rng.gen_range(0..n))
}

#[inline]
fn pair_energy(lattice: &Lattice, a: usize, b: usize) -> i32 {
    local_energy_unchecked(lattice, a) + local_energy_unchecked(lattice, b)
}

/// Propose exchanging `index` with a random cross-sublattice neighbor.
///
/// `ΔE` is the change in the two sites' local energies; the bond between
/// them is unchanged by the swap, so this equals the change in
/// [`global_energy`](crate::spins::energy::global_energy). Returns `Some(ΔE)`
/// when the swap was kept and `None` when it was rejected. Swapping two
/// equal spins is a no-op accepted with `ΔE = 0`.
pub fn propose_swap<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    index: usize,
    beta: f64,
    rng: &mut R,
) -> Result<Option<i32>> {
    require_frustrated(lattice)?;
    lattice.get_spin(index)?;
    let Some(partner) = random_partner(lattice, index, rng) else {
        return Ok(None);
    };
    if lattice.spin_unchecked(index) == lattice.spin_unchecked(partner) {
        return Ok(Some(0));
    }
    let before = pair_energy(lattice, index, partner);
    lattice.swap(index, partner)?;
    let delta = pair_energy(lattice, index, partner) - before;
    if accept(delta, beta, rng) {
        return Ok(Some(delta));
    }
    lattice.swap(index, partner)?;
    Ok(None)
}

/// One exchange proposal at a uniformly chosen site.
#[cfg_attr(feature = "profile", inline(never))]
pub fn kawasaki_step<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    beta: f64,
    rng: &mut R,
) -> Result<Option<i32>> {
    let index = rng.gen_range(0..lattice.n_sites());
    propose_swap(lattice, index, beta, rng)
}

/// Apply `count` unconditional exchanges at random sites.
pub fn disturb<R: Rng + ?Sized>(lattice: &mut Lattice, count: u64, rng: &mut R) -> Result<()> {
    require_frustrated(lattice)?;
    for _ in 0..count {
        let index = rng.gen_range(0..lattice.n_sites());
        if let Some(partner) = random_partner(lattice, index, rng) {
            lattice.swap(index, partner)?;
        }
    }
    Ok(())
}
