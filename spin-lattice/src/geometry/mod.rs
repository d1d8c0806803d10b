pub mod lattice;
pub mod offsets;
pub mod topology;

pub use lattice::Lattice;
pub use topology::{Shape, Sublattice, Topology};
