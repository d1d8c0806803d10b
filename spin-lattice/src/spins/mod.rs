pub mod correlation;
pub mod energy;

use std::fmt;

use rand::Rng;

use crate::error::Error;

/// Per-site spin. `Unknown` is the unassigned marker used by the
/// ground-state search and never a valid equilibrium state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum Spin {
    Up = 1,
    Down = -1,
    #[default]
    Unknown = 0,
}

impl Spin {
    /// Signed unit value (+1, −1, or 0 for `Unknown`).
    #[inline]
    pub fn value(self) -> i8 {
        self as i8
    }

    /// `Up` ↔ `Down`; `Unknown` stays `Unknown`.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Unknown => Self::Unknown,
        }
    }

    #[inline]
    pub fn is_assigned(self) -> bool {
        self != Self::Unknown
    }

    /// Uniform ±1.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<f32>() < 0.5 {
            Self::Down
        } else {
            Self::Up
        }
    }
}

impl TryFrom<i8> for Spin {
    type Error = Error;
    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            0 => Ok(Self::Unknown),
            _ => Err(Error::InvalidValue { value }),
        }
    }
}

impl fmt::Display for Spin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Counts of each spin value among a site's neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpinCounts {
    pub up: usize,
    pub down: usize,
    pub unknown: usize,
}

impl SpinCounts {
    #[inline]
    pub fn add(&mut self, spin: Spin) {
        match spin {
            Spin::Up => self.up += 1,
            Spin::Down => self.down += 1,
            Spin::Unknown => self.unknown += 1,
        }
    }

    /// Number of neighbors holding `spin`.
    #[inline]
    pub fn of(&self, spin: Spin) -> usize {
        match spin {
            Spin::Up => self.up,
            Spin::Down => self.down,
            Spin::Unknown => self.unknown,
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.up + self.down + self.unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_values() {
        assert_eq!(Spin::Up.value(), 1);
        assert_eq!(Spin::Down.value(), -1);
        assert_eq!(Spin::Unknown.value(), 0);
        assert_eq!(Spin::Up.flipped(), Spin::Down);
        assert_eq!(Spin::Unknown.flipped(), Spin::Unknown);
    }

    #[test]
    fn test_spin_try_from() {
        assert_eq!(Spin::try_from(-1), Ok(Spin::Down));
        assert_eq!(Spin::try_from(0), Ok(Spin::Unknown));
        assert_eq!(Spin::try_from(2), Err(Error::InvalidValue { value: 2 }));
    }

    #[test]
    fn test_counts() {
        let mut c = SpinCounts::default();
        for s in [Spin::Up, Spin::Up, Spin::Down, Spin::Unknown] {
            c.add(s);
        }
        assert_eq!(
            (c.of(Spin::Up), c.of(Spin::Down), c.of(Spin::Unknown)),
            (2, 1, 1)
        );
        assert_eq!(c.total(), 4);
    }
}
