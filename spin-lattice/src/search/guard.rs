use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::geometry::Lattice;
use crate::spins::Spin;

/// Exclusive handle on a lattice while one site is being tried.
///
/// Dereferences to the lattice so the recursion can continue through it.
/// Dropping the guard puts the site back to `Unknown`, on every exit path.
pub struct ScopedSite<'a> {
    lattice: &'a mut Lattice,
    index: usize,
}

impl<'a> ScopedSite<'a> {
    pub fn new(lattice: &'a mut Lattice, index: usize) -> Result<Self> {
        lattice.get_spin(index)?;
        Ok(Self { lattice, index })
    }

    pub fn assign(&mut self, spin: Spin) -> Result<()> {
        self.lattice.set_spin(self.index, spin)
    }
}

impl Deref for ScopedSite<'_> {
    type Target = Lattice;
    fn deref(&self) -> &Lattice {
        self.lattice
    }
}

impl DerefMut for ScopedSite<'_> {
    fn deref_mut(&mut self) -> &mut Lattice {
        self.lattice
    }
}

impl Drop for ScopedSite<'_> {
    fn drop(&mut self) {
        // index was bounds-checked in `new`
        let _ = self.lattice.unassign(self.index);
    }
}
