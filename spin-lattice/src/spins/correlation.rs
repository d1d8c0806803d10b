use crate::error::{Error, Result};
use crate::geometry::{Lattice, Topology};

/// Cross-correlation between the A and B sublattices of a frustrated lattice.
///
/// With `A[r][k] = s(r, 2k)` and `B[r][k] = s(r, 2k + 1)`, entry `[i][j]` is
/// `⟨A(R) · B(R + (i, j))⟩` averaged over all cells `R` with periodic
/// wraparound. The result has shape `rows × cols/2`.
pub fn sublattice_correlation(lattice: &Lattice) -> Result<Vec<Vec<f64>>> {
    if lattice.topology() != Topology::Frustrated {
        return Err(Error::UnsupportedTopology {
            expected: Topology::Frustrated,
            found: lattice.topology(),
        });
    }
    let shape = lattice.shape();
    let rows = shape.rows;
    let half = shape.cols / 2;
    let mut a: Vec<Vec<f64>> = vec![Vec::with_capacity(half); rows];
    let mut b: Vec<Vec<f64>> = vec![Vec::with_capacity(half); rows];
    for (r, (a_row, b_row)) in a.iter_mut().zip(b.iter_mut()).enumerate() {
        for pair in lattice.row(r)?.chunks_exact(2) {
            a_row.push(pair[0].value() as f64);
            b_row.push(pair[1].value() as f64);
        }
    }
    let norm = (rows * half) as f64;

    let mut corr = vec![vec![0.0f64; half]; rows];
    for (i, corr_row) in corr.iter_mut().enumerate() {
        for (j, c) in corr_row.iter_mut().enumerate() {
            let mut total = 0.0;
            for r in 0..rows {
                for k in 0..half {
                    total += a[r][k] * b[(r + i) % rows][(k + j) % half];
                }
            }
            *c = total / norm;
        }
    }
    Ok(corr)
}

/// Element-wise mean of several correlation matrices of equal shape.
pub fn mean_correlation(matrices: &[Vec<Vec<f64>>]) -> Vec<Vec<f64>> {
    let Some(first) = matrices.first() else {
        return vec![];
    };
    let mut mean: Vec<Vec<f64>> = first.iter().map(|row| vec![0.0; row.len()]).collect();
    for m in matrices {
        for (acc_row, row) in mean.iter_mut().zip(m.iter()) {
            for (acc, &v) in acc_row.iter_mut().zip(row.iter()) {
                *acc += v;
            }
        }
    }
    let n = matrices.len() as f64;
    for v in mean.iter_mut().flatten() {
        *v /= n;
    }
    mean
}
