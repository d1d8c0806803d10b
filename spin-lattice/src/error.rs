use thiserror::Error;

use crate::geometry::Topology;

/// Errors raised by lattice construction, spin access and the two algorithms.
///
/// None of these are retried: they signal a programming or configuration
/// mistake and abort the current run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("site index {index} out of range for lattice with {len} sites")]
    Range { index: usize, len: usize },

    #[error("invalid spin value {value}")]
    InvalidValue { value: i8 },

    #[error("degenerate lattice shape ({rows}, {cols}): {reason}")]
    DegenerateShape {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },

    #[error("expected a {expected} lattice, got {found}")]
    UnsupportedTopology {
        expected: Topology,
        found: Topology,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Error::Config(err.to_string())
    }
}
