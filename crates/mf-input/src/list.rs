//! Cell-indexed record lists (`K I J value...` lines).
//!
//! Records are `3I10` cell indices followed by `F10.0` attributes, or the
//! same fields whitespace-separated.  Cell indices are 1-based in the file
//! and converted to 0-based [`CellIndex`] on decode.

use mf_core::{CellIndex, GridShape};

use crate::fields::Fields;
use crate::{InputError, InputResult, LineSource};

/// A record type decodable from one list line.
pub trait ListRecord: Sized {
    /// Names of the real-valued attributes following the cell, in file order.
    const FIELDS: &'static [&'static str];

    fn from_parts(cell: CellIndex, values: &[f64]) -> Self;
}

/// Read `count` records for a grid of `shape`.  `what` names the list in
/// errors (`"WEL stress period 3"`).
pub fn read_cell_records<R: ListRecord>(
    src: &mut LineSource,
    shape: GridShape,
    count: usize,
    what: &str,
) -> InputResult<Vec<R>> {
    let n_values = R::FIELDS.len();
    let widths = vec![10; 3 + n_values];

    let mut out = Vec::new();
    for record in 1..=count {
        let line = src.next_line(&format!("{what} record {record}"))?;
        let fields = Fields::split(&line, &widths, src.location());
        fields.require(3 + n_values, what, Some(record))?;

        let layer = fields.req_int(0, "layer", Some(record))?;
        let row = fields.req_int(1, "row", Some(record))?;
        let col = fields.req_int(2, "column", Some(record))?;
        let cell = CellIndex::from_one_based(layer, row, col)
            .filter(|c| shape.contains(*c))
            .ok_or_else(|| InputError::CellOutOfBounds {
                at: src.location(),
                record,
                layer,
                row,
                col,
                shape,
            })?;

        let values = R::FIELDS
            .iter()
            .enumerate()
            .map(|(i, name)| fields.req_real(3 + i, name, Some(record)))
            .collect::<InputResult<Vec<f64>>>()?;
        out.push(R::from_parts(cell, &values));
    }
    Ok(out)
}
