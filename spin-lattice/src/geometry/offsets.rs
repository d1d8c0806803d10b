/// Square-lattice neighbor offsets `(d_row, d_col)`: up, down, left, right.
pub const SQUARE: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Frustrated-lattice offsets for sublattice A (even columns).
///
/// Two same-row steps in each direction, then the two diagonals into the
/// row below.
pub const FRUSTRATED_A: [(isize, isize); 6] = [(0, 1), (0, 2), (0, -1), (0, -2), (1, 1), (1, -1)];

/// Frustrated-lattice offsets for sublattice B (odd columns).
///
/// One same-row step in each direction, the two vertical neighbors, then
/// the two diagonals into the row above. The four B-to-A offsets negate the
/// A-to-B offsets and the two vertical ones are mutually inverse, so the
/// neighbor relation is symmetric whenever the column count is even.
pub const FRUSTRATED_B: [(isize, isize); 6] = [(0, -1), (0, 1), (1, 0), (-1, 0), (-1, -1), (-1, 1)];
