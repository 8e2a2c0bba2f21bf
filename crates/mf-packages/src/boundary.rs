//! Stress-period boundary lists: Well, Drain, River, General-head boundary.
//!
//! All four share one layout:
//!
//! ```text
//! MXACT ICB                     header, 2I10
//! per stress period:
//!   ITMP                        I10: <0 reuse previous list, else record count
//!   K I J attr...               ITMP records, 3I10 + nF10.0
//! ```
//!
//! They differ only in the attribute columns, so one generic decoder reads
//! them all, parameterised by the record type.

use mf_core::{CellIndex, PackageKind};
use mf_input::fields::column;
use mf_input::{
    Fields, InputResult, LineSource, ListRecord, Location, SeriesBuilder, StressPeriodSeries,
    read_cell_records,
};

use crate::{DecodeContext, DecodeSite, PackageResult, WithSite};

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WellRecord {
    pub cell: CellIndex,
    /// Pumping (negative) or injection rate.
    pub flux: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrainRecord {
    pub cell:        CellIndex,
    pub elevation:   f64,
    pub conductance: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiverRecord {
    pub cell:        CellIndex,
    pub stage:       f64,
    pub conductance: f64,
    pub bottom:      f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GhbRecord {
    pub cell:        CellIndex,
    pub head:        f64,
    pub conductance: f64,
}

impl ListRecord for WellRecord {
    const FIELDS: &'static [&'static str] = &["Q"];

    fn from_parts(cell: CellIndex, v: &[f64]) -> Self {
        Self { cell, flux: v[0] }
    }
}

impl ListRecord for DrainRecord {
    const FIELDS: &'static [&'static str] = &["ELEVATION", "COND"];

    fn from_parts(cell: CellIndex, v: &[f64]) -> Self {
        Self { cell, elevation: v[0], conductance: v[1] }
    }
}

impl ListRecord for RiverRecord {
    const FIELDS: &'static [&'static str] = &["STAGE", "COND", "RBOT"];

    fn from_parts(cell: CellIndex, v: &[f64]) -> Self {
        Self { cell, stage: v[0], conductance: v[1], bottom: v[2] }
    }
}

impl ListRecord for GhbRecord {
    const FIELDS: &'static [&'static str] = &["BHEAD", "COND"];

    fn from_parts(cell: CellIndex, v: &[f64]) -> Self {
        Self { cell, head: v[0], conductance: v[1] }
    }
}

/// Records with a cell address (used by table exporters).
pub trait CellRecord {
    fn cell(&self) -> CellIndex;
    /// Attribute values in file order.
    fn values(&self) -> Vec<f64>;
}

impl CellRecord for WellRecord {
    fn cell(&self) -> CellIndex {
        self.cell
    }

    fn values(&self) -> Vec<f64> {
        vec![self.flux]
    }
}

impl CellRecord for DrainRecord {
    fn cell(&self) -> CellIndex {
        self.cell
    }

    fn values(&self) -> Vec<f64> {
        vec![self.elevation, self.conductance]
    }
}

impl CellRecord for RiverRecord {
    fn cell(&self) -> CellIndex {
        self.cell
    }

    fn values(&self) -> Vec<f64> {
        vec![self.stage, self.conductance, self.bottom]
    }
}

impl CellRecord for GhbRecord {
    fn cell(&self) -> CellIndex {
        self.cell
    }

    fn values(&self) -> Vec<f64> {
        vec![self.head, self.conductance]
    }
}

// ── BoundaryList ──────────────────────────────────────────────────────────────

/// A decoded list package: header values plus one record list per period.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryList<R> {
    /// `MXACT`: maximum records active in any period.
    pub max_active: usize,
    /// Cell-by-cell budget unit, 0 when not saved.
    pub cbc_unit:   i64,
    pub periods:    StressPeriodSeries<Vec<R>>,
}

pub type WellPackage = BoundaryList<WellRecord>;
pub type DrainPackage = BoundaryList<DrainRecord>;
pub type RiverPackage = BoundaryList<RiverRecord>;
pub type GhbPackage = BoundaryList<GhbRecord>;

impl<R> BoundaryList<R> {
    /// Records active in stress period `period` (0-based).
    pub fn records(&self, period: usize) -> &[R] {
        self.periods.get(period).map(Vec::as_slice).unwrap_or_default()
    }

    /// Largest per-period record count actually decoded.
    pub fn peak_records(&self) -> usize {
        self.periods.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Decode a list package of record type `R`.
pub fn decode<R: ListRecord>(
    src: &mut LineSource,
    ctx: &mut DecodeContext<'_>,
    kind: PackageKind,
) -> PackageResult<BoundaryList<R>> {
    let site = || DecodeSite::new(kind);

    let (max_active, cbc_unit) = read_header(src).at_site(site)?;
    let mut series = SeriesBuilder::new(format!("{kind} record list"));

    for p in 0..ctx.nper() {
        let (itmp, at) = read_itmp(src).at_site(|| site().period(p))?;
        series
            .step(itmp, &at, |n| {
                let what = format!("{kind} stress period {}", p + 1);
                read_cell_records::<R>(src, ctx.shape, n as usize, &what)
            })
            .at_site(|| site().period(p))?;
    }

    let list = BoundaryList { max_active, cbc_unit, periods: series.finish() };
    if list.peak_records() > max_active {
        log::warn!(
            "{}: {kind} declares MXACT = {max_active} but a period has {} records",
            src.name(),
            list.peak_records()
        );
    }
    log::debug!(
        "{}: {kind} {} period(s), {} distinct list(s)",
        src.name(),
        list.periods.len(),
        list.periods.distinct_count()
    );
    Ok(list)
}

fn read_header(src: &mut LineSource) -> InputResult<(usize, i64)> {
    let line = src.next_line("MXACT ICB")?;
    let fields = Fields::split(column(&line, 0, 20), &[10, 10], src.location());
    let mxact = fields.int(0, "MXACT")?.unwrap_or(0).max(0) as usize;
    Ok((mxact, fields.int(1, "ICB")?.unwrap_or(0)))
}

fn read_itmp(src: &mut LineSource) -> InputResult<(i64, Location)> {
    let line = src.next_line("ITMP")?;
    let at = src.location();
    let fields = Fields::split(column(&line, 0, 10), &[10], at.clone());
    fields.require(1, "ITMP", None)?;
    Ok((fields.req_int(0, "ITMP", None)?, at))
}
