//! Plain-text grid dumps of ground-state configurations.
//!
//! A dump is a sequence of blocks: `rows` lines of `cols` space-separated
//! spin values, one line holding the block's global energy, then a blank
//! line.

use std::io::{BufRead, Write};

use crate::error::{Error, Result};
use crate::geometry::{Lattice, Shape, Topology};
use crate::search::GroundState;
use crate::spins::energy::global_energy;
use crate::spins::Spin;

/// Write `spins` as a `shape.rows × shape.cols` grid.
pub fn write_grid<W: Write>(w: &mut W, spins: &[Spin], shape: Shape) -> std::io::Result<()> {
    for row in spins.chunks(shape.cols).take(shape.rows) {
        let mut first = true;
        for spin in row {
            if !first {
                w.write_all(b" ")?;
            }
            write!(w, "{spin}")?;
            first = false;
        }
        w.write_all(b"\n")?;
    }
    Ok(())
}

impl GroundState {
    pub fn write_to<W: Write>(&self, w: &mut W, shape: Shape) -> std::io::Result<()> {
        write_grid(w, &self.spins, shape)?;
        writeln!(w, "{}", self.energy)?;
        writeln!(w)
    }
}

/// Write every state in order.
pub fn write_ground_states<W: Write>(
    w: &mut W,
    states: &[GroundState],
    shape: Shape,
) -> std::io::Result<()> {
    for state in states {
        state.write_to(w, shape)?;
    }
    Ok(())
}

fn parse_err(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        line,
        message: message.into(),
    }
}

fn parse_row(text: &str, line: usize, cols: usize, out: &mut Vec<Spin>) -> Result<()> {
    let start = out.len();
    for token in text.split_whitespace() {
        let value: i8 = token
            .parse()
            .map_err(|_| parse_err(line, format!("invalid spin value '{token}'")))?;
        let spin = Spin::try_from(value).map_err(|e| parse_err(line, e.to_string()))?;
        if !spin.is_assigned() {
            return Err(parse_err(line, "unassigned site in recorded configuration"));
        }
        out.push(spin);
    }
    let found = out.len() - start;
    if found != cols {
        return Err(parse_err(line, format!("expected {cols} values, found {found}")));
    }
    Ok(())
}

/// Parse a dump written by [`write_ground_states`] for a frustrated lattice
/// of the given shape.
///
/// Each block's energy line must agree with the energy recomputed from its
/// grid. Line numbers in errors are 1-based.
pub fn read_ground_states<R: BufRead>(reader: R, shape: Shape) -> Result<Vec<GroundState>> {
    Topology::Frustrated.check_shape(shape)?;
    let mut states = Vec::new();
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| l.as_ref().map_or(true, |s| !s.trim().is_empty()));

    while let Some((first, text)) = lines.next() {
        let mut spins = Vec::with_capacity(shape.n_sites());
        parse_row(&text?, first, shape.cols, &mut spins)?;
        for _ in 1..shape.rows {
            let Some((line, text)) = lines.next() else {
                return Err(parse_err(first, "truncated grid"));
            };
            parse_row(&text?, line, shape.cols, &mut spins)?;
        }
        let Some((line, text)) = lines.next() else {
            return Err(parse_err(first, "missing energy line"));
        };
        let text = text?;
        let energy: i32 = text
            .trim()
            .parse()
            .map_err(|_| parse_err(line, format!("invalid energy '{}'", text.trim())))?;

        let lattice = Lattice::from_spins(shape, Topology::Frustrated, spins)?;
        let actual = global_energy(&lattice);
        if actual != energy {
            return Err(parse_err(
                line,
                format!("energy {energy} does not match grid energy {actual}"),
            ));
        }
        states.push(GroundState {
            spins: lattice.spins().to_vec(),
            energy,
        });
    }
    Ok(states)
}
