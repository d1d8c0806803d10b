use std::sync::OnceLock;

use rand::Rng;

use super::topology::{Shape, Sublattice, Topology};
use crate::error::{Error, Result};
use crate::spins::Spin;

/// Periodic 2D lattice owning one flat array of spins.
///
/// Sites are indexed in row-major order. The neighbor table is a flat array
/// of length `n_sites * coordination`, built from the [`Topology`] on first
/// access and reused for the lifetime of the lattice.
#[derive(Debug, Clone)]
pub struct Lattice {
    shape: Shape,
    topology: Topology,
    spins: Vec<Spin>,
    neighbors: OnceLock<Vec<u32>>,
}

impl Lattice {
    /// Create a lattice with every site set to `initial`.
    pub fn new(shape: Shape, topology: Topology, initial: Spin) -> Result<Self> {
        topology.check_shape(shape)?;
        Ok(Self {
            shape,
            topology,
            spins: vec![initial; shape.n_sites()],
            neighbors: OnceLock::new(),
        })
    }

    /// Square lattice, the Metropolis sampler's geometry.
    pub fn square(rows: usize, cols: usize, initial: Spin) -> Result<Self> {
        Self::new(Shape::new(rows, cols)?, Topology::Square, initial)
    }

    /// Frustrated lattice, the ground-state search's geometry.
    pub fn frustrated(rows: usize, cols: usize, initial: Spin) -> Result<Self> {
        Self::new(Shape::new(rows, cols)?, Topology::Frustrated, initial)
    }

    /// Wrap an existing configuration, e.g. one read back from a dump.
    pub fn from_spins(shape: Shape, topology: Topology, spins: Vec<Spin>) -> Result<Self> {
        topology.check_shape(shape)?;
        if spins.len() != shape.n_sites() {
            return Err(Error::Range {
                index: spins.len(),
                len: shape.n_sites(),
            });
        }
        Ok(Self {
            shape,
            topology,
            spins,
            neighbors: OnceLock::new(),
        })
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn n_sites(&self) -> usize {
        self.spins.len()
    }

    #[inline]
    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index >= self.spins.len() {
            return Err(Error::Range {
                index,
                len: self.spins.len(),
            });
        }
        Ok(())
    }

    pub fn get_spin(&self, index: usize) -> Result<Spin> {
        self.check(index)?;
        Ok(self.spins[index])
    }

    /// Assign `Up` or `Down`. `Unknown` is rejected here; use
    /// [`Lattice::unassign`] to mark a site as unassigned.
    pub fn set_spin(&mut self, index: usize, spin: Spin) -> Result<()> {
        self.check(index)?;
        if !spin.is_assigned() {
            return Err(Error::InvalidValue {
                value: spin.value(),
            });
        }
        self.spins[index] = spin;
        Ok(())
    }

    /// Assign from a raw signed value (±1).
    pub fn set_raw(&mut self, index: usize, value: i8) -> Result<()> {
        let spin = Spin::try_from(value)?;
        self.set_spin(index, spin)
    }

    /// Reset a site to `Unknown`.
    pub fn unassign(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.spins[index] = Spin::Unknown;
        Ok(())
    }

    /// Flip a site in place.
    pub fn flip(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.spins[index] = self.spins[index].flipped();
        Ok(())
    }

    /// Exchange the spins of two sites.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check(a)?;
        self.check(b)?;
        self.spins.swap(a, b);
        Ok(())
    }

    /// Set every site to `spin`.
    pub fn fill(&mut self, spin: Spin) {
        self.spins.fill(spin);
    }

    /// Draw every site independently as Up or Down with probability ½.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for s in self.spins.iter_mut() {
            *s = Spin::random(rng);
        }
    }

    #[inline]
    pub fn sublattice(&self, index: usize) -> Sublattice {
        self.topology.sublattice(index, self.shape)
    }

    fn neighbor_table(&self) -> &[u32] {
        self.neighbors.get_or_init(|| {
            let n_sites = self.shape.n_sites();
            let mut table = Vec::with_capacity(n_sites * self.topology.coordination());
            for i in 0..n_sites {
                table.extend(
                    self.topology
                        .neighbors(i, self.shape)
                        .into_iter()
                        .map(|j| j as u32),
                );
            }
            table
        })
    }

    /// Ordered neighbor indices of `index`, served from the cached table.
    pub fn neighbor_indices(&self, index: usize) -> Result<&[u32]> {
        self.check(index)?;
        Ok(self.neighbors_unchecked(index))
    }

    #[inline]
    pub(crate) fn neighbors_unchecked(&self, index: usize) -> &[u32] {
        let z = self.topology.coordination();
        &self.neighbor_table()[index * z..(index + 1) * z]
    }

    #[inline]
    pub(crate) fn spin_unchecked(&self, index: usize) -> Spin {
        self.spins[index]
    }

    /// One row of the grid as a slice.
    pub fn row(&self, row: usize) -> Result<&[Spin]> {
        if row >= self.shape.rows {
            return Err(Error::Range {
                index: row,
                len: self.shape.rows,
            });
        }
        let cols = self.shape.cols;
        Ok(&self.spins[row * cols..(row + 1) * cols])
    }
}
