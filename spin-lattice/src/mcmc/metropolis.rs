use rand::Rng;

use crate::error::Result;
use crate::geometry::Lattice;
use crate::spins::energy;

/// Metropolis acceptance for an energy change `delta_e` at inverse
/// temperature `beta`.
///
/// Downhill and neutral moves are accepted without drawing. Uphill moves
/// accept when `ln(u) < -beta * delta_e` for uniform `u` in `[0, 1)`.
#[inline]
pub fn accept<R: Rng + ?Sized>(delta_e: i32, beta: f64, rng: &mut R) -> bool {
    if delta_e <= 0 {
        return true;
    }
    rng.gen::<f64>().ln() < -beta * delta_e as f64
}

/// Propose flipping `index`; flip in place on acceptance.
pub fn propose_flip<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    index: usize,
    beta: f64,
    rng: &mut R,
) -> Result<bool> {
    let delta_e = energy::flip_delta(lattice, index)?;
    if accept(delta_e, beta, rng) {
        lattice.flip(index)?;
        return Ok(true);
    }
    Ok(false)
}

/// One single-spin-flip Metropolis step at a uniformly chosen site.
#[cfg_attr(feature = "profile", inline(never))]
pub fn metropolis_step<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    beta: f64,
    rng: &mut R,
) -> Result<bool> {
    let index = rng.gen_range(0..lattice.n_sites());
    propose_flip(lattice, index, beta, rng)
}
