//! Basic package: grid dimensions, activation vector, active-cell mask,
//! starting heads and stress-period timing.
//!
//! # Record order
//!
//! ```text
//! 1-2  HEADING                     two free text lines
//! 3    NLAY NROW NCOL NPER ITMUNI  5I10, cols 0..50
//! 4    IUNIT(1..24)                24I3, cols 0..72, ragged
//! 5    IAPART ISTRT                2I10
//! 6    IBOUND                      3-D integer array
//! 7    HNOFLO                      F10.0
//! 8    SHEAD                       3-D real array
//! 9    PERLEN NSTP TSMULT          F10.0, I10, F10.0, once per period
//! ```

use mf_core::{Array3, GridShape, MAX_SLOTS, PackageKind, StressPeriod, TimeDiscretization, TimeUnit};
use mf_input::fields::{column, parse_int};
use mf_input::{DataUnits, Fields, InputError, InputResult, LineSource, read_3d};

use crate::{DecodeSite, PackageResult, WithSite};

const ACTIVATION_FIELD: usize = 3;

/// The decoded Basic package.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicPackage {
    pub heading:    Vec<String>,
    pub shape:      GridShape,
    pub time_unit:  TimeUnit,
    /// `IUNIT` values, exactly as many as parsed (negatives stored as 0).
    pub activation: Vec<i64>,
    pub iapart:     i64,
    pub istrt:      i64,
    /// Active-cell mask: 0 inactive, >0 variable head, <0 constant head.
    pub ibound:     Array3<i32>,
    pub hnoflo:     f64,
    pub strt:       Array3<f64>,
    pub periods:    Vec<StressPeriod>,
}

impl BasicPackage {
    #[inline]
    pub fn nper(&self) -> usize {
        self.periods.len()
    }

    /// `(position, unit)` for every activation slot with a positive value.
    pub fn active_slots(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.activation.iter().copied().enumerate().filter(|&(_, v)| v > 0)
    }

    /// Time discretization with an optional externally supplied start.
    pub fn time_discretization(&self, start_datetime: Option<String>) -> TimeDiscretization {
        TimeDiscretization {
            periods: self.periods.clone(),
            time_unit: self.time_unit,
            start_datetime,
        }
    }

    /// Number of active (non-zero) cells.
    pub fn active_cells(&self) -> usize {
        self.ibound.iter().filter(|&&v| v != 0).count()
    }
}

/// Decode a Basic package file.  `units` resolves array indirection.
pub fn decode(src: &mut LineSource, units: &mut DataUnits<'_>) -> PackageResult<BasicPackage> {
    let site = || DecodeSite::new(PackageKind::Basic);

    let heading = vec![
        src.next_line("heading").at_site(site)?.trim_end().to_owned(),
        src.next_line("heading").at_site(site)?.trim_end().to_owned(),
    ];

    let (shape, nper, time_unit) = read_header(src).at_site(site)?;
    log::debug!("{}: BAS grid {shape}, {nper} stress period(s), time unit {time_unit}", src.name());

    let line = src.next_line("activation vector (IUNIT)").at_site(site)?;
    let activation = parse_activation(&line);
    log::trace!("{}: {} activation slot(s) parsed", src.location(), activation.len());

    let (iapart, istrt) = read_flag_pair(src).at_site(site)?;
    let ibound = read_3d::<i32>(src, units, shape, "IBOUND").at_site(site)?;
    let hnoflo = read_scalar(src, "HNOFLO").at_site(site)?;
    let strt = read_3d::<f64>(src, units, shape, "SHEAD").at_site(site)?;

    let mut periods = Vec::new();
    for p in 0..nper {
        periods.push(read_period(src, p).at_site(|| site().period(p))?);
    }

    Ok(BasicPackage {
        heading,
        shape,
        time_unit,
        activation,
        iapart,
        istrt,
        ibound,
        hnoflo,
        strt,
        periods,
    })
}

/// Split the `IUNIT` record into 3-column integer fields, stopping at the
/// first field that is not an integer (blank included).  The vector's length
/// is however many fields parsed.
pub fn parse_activation(line: &str) -> Vec<i64> {
    let region = column(line, 0, MAX_SLOTS * ACTIVATION_FIELD);
    (0..MAX_SLOTS)
        .map_while(|pos| {
            let start = pos * ACTIVATION_FIELD;
            parse_int(column(region, start, start + ACTIVATION_FIELD))
        })
        .map(|v| v.max(0))
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_header(src: &mut LineSource) -> InputResult<(GridShape, usize, TimeUnit)> {
    const WHAT: &str = "Basic header (NLAY NROW NCOL NPER ITMUNI)";
    let line = src.next_line(WHAT)?;
    let at = src.location();
    let fields = Fields::split(column(&line, 0, 50), &[10; 5], at.clone());
    let v = fields.header_ints(5, WHAT)?;

    let dim = |i: usize, name: &str| {
        usize::try_from(v[i]).ok().filter(|&n| n > 0).ok_or_else(|| InputError::HeaderParse {
            at:     at.clone(),
            what:   WHAT,
            reason: format!("{name} must be positive, got {}", v[i]),
        })
    };
    let shape = GridShape::new(dim(0, "NLAY")?, dim(1, "NROW")?, dim(2, "NCOL")?);
    if shape.checked_ncells().is_none() {
        return Err(InputError::HeaderParse {
            at:     at.clone(),
            what:   WHAT,
            reason: format!("grid {shape} has too many cells"),
        });
    }
    let nper = usize::try_from(v[3]).map_err(|_| InputError::HeaderParse {
        at:     at.clone(),
        what:   WHAT,
        reason: format!("NPER must not be negative, got {}", v[3]),
    })?;
    let time_unit = TimeUnit::try_from(v[4]).map_err(|e| InputError::HeaderParse {
        at: at.clone(),
        what: WHAT,
        reason: e.to_string(),
    })?;
    Ok((shape, nper, time_unit))
}

fn read_flag_pair(src: &mut LineSource) -> InputResult<(i64, i64)> {
    let line = src.next_line("IAPART ISTRT")?;
    let fields = Fields::split(column(&line, 0, 20), &[10, 10], src.location());
    Ok((fields.int(0, "IAPART")?.unwrap_or(0), fields.int(1, "ISTRT")?.unwrap_or(0)))
}

fn read_scalar(src: &mut LineSource, what: &str) -> InputResult<f64> {
    let line = src.next_line(what)?;
    let fields = Fields::split(column(&line, 0, 10), &[10], src.location());
    Ok(fields.real(0, what)?.unwrap_or(0.0))
}

fn read_period(src: &mut LineSource, p: usize) -> InputResult<StressPeriod> {
    const WHAT: &str = "PERLEN NSTP TSMULT";
    let line = src.next_line(WHAT)?;
    let fields = Fields::split(column(&line, 0, 30), &[10, 10, 10], src.location());
    let record = Some(p + 1);
    fields.require(3, WHAT, record)?;

    let length = fields.req_real(0, "PERLEN", record)?;
    let nstp = fields.req_int(1, "NSTP", record)?;
    let steps = u32::try_from(nstp).map_err(|_| InputError::InvalidField {
        at:    src.location(),
        what:  "NSTP".to_owned(),
        token: nstp.to_string(),
    })?;
    let multiplier = fields.req_real(2, "TSMULT", record)?;
    Ok(StressPeriod { length, steps, multiplier })
}
