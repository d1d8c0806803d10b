use std::fmt;

use super::offsets;
use crate::error::{Error, Result};

/// Toroidal extent of a 2D lattice. Sites are indexed row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    /// Both extents must be positive.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::DegenerateShape {
                rows,
                cols,
                reason: "extents must be positive",
            });
        }
        Ok(Self { rows, cols })
    }

    #[inline]
    pub fn n_sites(&self) -> usize {
        self.rows * self.cols
    }

    /// `(row, col)` of a flat index.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Flat index of the site displaced from `(row, col)` by `(d_row, d_col)`,
    /// with periodic wraparound on both axes.
    #[inline]
    pub fn offset(&self, row: usize, col: usize, (d_row, d_col): (isize, isize)) -> usize {
        let r = (row as isize + d_row).rem_euclid(self.rows as isize) as usize;
        let c = (col as isize + d_col).rem_euclid(self.cols as isize) as usize;
        r * self.cols + c
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Sublattice membership on the frustrated lattice, by column parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sublattice {
    A,
    B,
}

/// The two supported neighbor geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// 4 neighbors, ferromagnetic convention. Used by the Metropolis sampler.
    Square,
    /// 6 neighbors with a sublattice-dependent pattern, antiferromagnetic
    /// convention. Used by the ground-state search.
    Frustrated,
}

impl TryFrom<&str> for Topology {
    type Error = String;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s {
            "square" => Ok(Self::Square),
            "frustrated" | "triangular" => Ok(Self::Frustrated),
            _ => Err(format!("unknown topology '{s}', expected 'square' or 'frustrated'")),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Square => f.write_str("square"),
            Self::Frustrated => f.write_str("frustrated"),
        }
    }
}

impl Topology {
    /// Number of neighbors per site.
    #[inline]
    pub fn coordination(&self) -> usize {
        match self {
            Self::Square => offsets::SQUARE.len(),
            Self::Frustrated => offsets::FRUSTRATED_A.len(),
        }
    }

    /// Reject shapes this geometry cannot tile.
    ///
    /// The frustrated pattern keys off column parity, which only survives
    /// the column wraparound when `cols` is even.
    pub fn check_shape(&self, shape: Shape) -> Result<()> {
        if shape.rows == 0 || shape.cols == 0 {
            return Err(Error::DegenerateShape {
                rows: shape.rows,
                cols: shape.cols,
                reason: "extents must be positive",
            });
        }
        if *self == Self::Frustrated && shape.cols % 2 != 0 {
            return Err(Error::DegenerateShape {
                rows: shape.rows,
                cols: shape.cols,
                reason: "frustrated lattice needs an even column count",
            });
        }
        Ok(())
    }

    /// Sublattice of `index`. Square lattices are reported as all-A.
    #[inline]
    pub fn sublattice(&self, index: usize, shape: Shape) -> Sublattice {
        match self {
            Self::Square => Sublattice::A,
            Self::Frustrated => {
                if shape.coords(index).1 % 2 == 0 {
                    Sublattice::A
                } else {
                    Sublattice::B
                }
            }
        }
    }

    fn offsets(&self, index: usize, shape: Shape) -> &'static [(isize, isize)] {
        match (self, self.sublattice(index, shape)) {
            (Self::Square, _) => &offsets::SQUARE,
            (Self::Frustrated, Sublattice::A) => &offsets::FRUSTRATED_A,
            (Self::Frustrated, Sublattice::B) => &offsets::FRUSTRATED_B,
        }
    }

    /// Ordered neighbor indices of `index`. Pure in `(index, shape)`.
    pub fn neighbors(&self, index: usize, shape: Shape) -> Vec<usize> {
        let (row, col) = shape.coords(index);
        self.offsets(index, shape)
            .iter()
            .map(|&off| shape.offset(row, col, off))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_shapes() {
        assert!(matches!(
            Shape::new(0, 4),
            Err(Error::DegenerateShape {
                rows: 0,
                cols: 4,
                ..
            })
        ));
        assert!(Shape::new(3, 0).is_err());

        let odd = Shape::new(2, 3).unwrap();
        assert!(Topology::Square.check_shape(odd).is_ok());
        assert!(Topology::Frustrated.check_shape(odd).is_err());
    }

    #[test]
    fn test_square_neighbors() {
        // 3x4 lattice, site 0 = (0,0): up wraps to (2,0)=8, left wraps to (0,3)=3
        let shape = Shape::new(3, 4).unwrap();
        assert_eq!(Topology::Square.neighbors(0, shape), vec![8, 4, 3, 1]);

        // Site 11 = (2,3): down wraps to (0,3)=3, right wraps to (2,0)=8
        assert_eq!(Topology::Square.neighbors(11, shape), vec![7, 3, 10, 8]);

        // Interior site 5 = (1,1)
        assert_eq!(Topology::Square.neighbors(5, shape), vec![1, 9, 4, 6]);
    }

    #[test]
    fn test_frustrated_sublattice_a() {
        let shape = Shape::new(3, 6).unwrap();
        // Site 8 = (1,2), even column
        assert_eq!(Topology::Frustrated.sublattice(8, shape), Sublattice::A);
        // right (1,3)=9, right-right (1,4)=10, left (1,1)=7, left-left (1,0)=6,
        // below-right (2,3)=15, below-left (2,1)=13
        assert_eq!(
            Topology::Frustrated.neighbors(8, shape),
            vec![9, 10, 7, 6, 15, 13]
        );

        // Site 0 = (0,0): left wraps to (0,5)=5, left-left to (0,4)=4
        assert_eq!(
            Topology::Frustrated.neighbors(0, shape),
            vec![1, 2, 5, 4, 7, 11]
        );
    }

    #[test]
    fn test_frustrated_sublattice_b() {
        let shape = Shape::new(3, 6).unwrap();
        // Site 9 = (1,3), odd column
        assert_eq!(Topology::Frustrated.sublattice(9, shape), Sublattice::B);
        // left (1,2)=8, right (1,4)=10, down (2,3)=15, up (0,3)=3,
        // up-left (0,2)=2, up-right (0,4)=4
        assert_eq!(
            Topology::Frustrated.neighbors(9, shape),
            vec![8, 10, 15, 3, 2, 4]
        );

        // Site 1 = (0,1): up wraps to row 2
        assert_eq!(
            Topology::Frustrated.neighbors(1, shape),
            vec![0, 2, 7, 13, 12, 14]
        );
    }

    #[test]
    fn test_neighbor_relation_is_symmetric() {
        for (topology, shape) in [
            (Topology::Square, Shape::new(4, 5).unwrap()),
            (Topology::Frustrated, Shape::new(3, 6).unwrap()),
            (Topology::Frustrated, Shape::new(2, 4).unwrap()),
        ] {
            for i in 0..shape.n_sites() {
                for j in topology.neighbors(i, shape) {
                    let of_i = topology.neighbors(i, shape);
                    let of_j = topology.neighbors(j, shape);
                    let forward = of_i.iter().filter(|&&n| n == j).count();
                    let backward = of_j.iter().filter(|&&n| n == i).count();
                    assert_eq!(forward, backward, "{topology} {shape}: bond {i}-{j}");
                }
            }
        }
    }

    #[test]
    fn test_neighbors_deterministic() {
        let shape = Shape::new(5, 8).unwrap();
        for topology in [Topology::Square, Topology::Frustrated] {
            assert_eq!(topology.coordination(), topology.neighbors(0, shape).len());
            for i in 0..shape.n_sites() {
                assert_eq!(topology.neighbors(i, shape), topology.neighbors(i, shape));
            }
        }
    }

    #[test]
    fn test_topology_from_str() {
        assert_eq!(Topology::try_from("square"), Ok(Topology::Square));
        assert_eq!(Topology::try_from("frustrated"), Ok(Topology::Frustrated));
        assert!(Topology::try_from("hexagonal").is_err());
    }
}
