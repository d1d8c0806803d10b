pub mod kawasaki;
pub mod metropolis;
pub mod sampler;

pub use kawasaki::{disturb, kawasaki_step, propose_swap, stripe_lattice};
pub use metropolis::{accept, metropolis_step, propose_flip};
pub use sampler::{Phase, Sampler, PROGRESS_CHUNK};
