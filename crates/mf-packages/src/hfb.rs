//! Horizontal-flow-barrier package.
//!
//! Barriers are not stress-period data: they are declared once, grouped by
//! layer.
//!
//! ```text
//! NHFB                          total barrier count
//! per layer:
//!   NBRLAY                      barriers in this layer
//!   I1 J1 I2 J2 HYDCHR          NBRLAY records, 4I10 + F10.0
//! ```

use mf_core::{CellIndex, GridShape, PackageKind};
use mf_input::fields::column;
use mf_input::{Fields, InputError, InputResult, LineSource};

use crate::{DecodeContext, DecodeSite, PackageResult, WithSite};

/// A barrier between two cells of the same layer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Barrier {
    pub first:  CellIndex,
    pub second: CellIndex,
    /// Hydraulic characteristic (conductance per unit width).
    pub hydchr: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizontalFlowBarrier {
    /// `NHFB` as declared in the header.
    pub declared: usize,
    pub barriers: Vec<Barrier>,
}

impl HorizontalFlowBarrier {
    pub fn in_layer(&self, layer: usize) -> impl Iterator<Item = &Barrier> {
        self.barriers.iter().filter(move |b| b.first.layer == layer)
    }
}

pub fn decode(src: &mut LineSource, ctx: &mut DecodeContext<'_>) -> PackageResult<HorizontalFlowBarrier> {
    let site = || DecodeSite::new(PackageKind::HorizontalFlowBarrier);
    let shape = ctx.shape;

    let declared = read_count(src, "NHFB").at_site(site)?;
    let mut barriers = Vec::new();
    for k in 0..shape.nlay {
        let n = read_count(src, "NBRLAY").at_site(|| site().layer(k))?;
        for record in 1..=n {
            let barrier = read_barrier(src, shape, k, record).at_site(|| site().layer(k))?;
            if !barrier.first.is_lateral_neighbor(&barrier.second) {
                log::warn!(
                    "{}: HFB barrier between {} and {} does not separate adjacent cells",
                    src.location(),
                    barrier.first,
                    barrier.second
                );
            }
            barriers.push(barrier);
        }
    }

    if barriers.len() != declared {
        log::warn!(
            "{}: HFB declares NHFB = {declared} but the layers list {}",
            src.name(),
            barriers.len()
        );
    }
    log::debug!("{}: HFB {} barrier(s)", src.name(), barriers.len());
    Ok(HorizontalFlowBarrier { declared, barriers })
}

fn read_count(src: &mut LineSource, what: &str) -> InputResult<usize> {
    let line = src.next_line(what)?;
    let fields = Fields::split(column(&line, 0, 10), &[10], src.location());
    let n = fields.req_int(0, what, None)?;
    usize::try_from(n).map_err(|_| InputError::InvalidField {
        at:    src.location(),
        what:  what.to_owned(),
        token: n.to_string(),
    })
}

fn read_barrier(src: &mut LineSource, shape: GridShape, layer: usize, record: usize) -> InputResult<Barrier> {
    let line = src.next_line("HFB record")?;
    let fields = Fields::split(&line, &[10; 5], src.location());
    let rec = Some(record);
    fields.require(5, "HFB record", rec)?;

    let cell = |i: usize| -> InputResult<CellIndex> {
        let row = fields.req_int(i, "row", rec)?;
        let col = fields.req_int(i + 1, "column", rec)?;
        CellIndex::from_one_based(layer as i64 + 1, row, col)
            .filter(|c| shape.contains(*c))
            .ok_or_else(|| InputError::CellOutOfBounds {
                at: src.location(),
                record,
                layer: layer as i64 + 1,
                row,
                col,
                shape,
            })
    };
    let first = cell(0)?;
    let second = cell(2)?;
    let hydchr = fields.req_real(4, "HYDCHR", rec)?;
    Ok(Barrier { first, second, hydchr })
}
