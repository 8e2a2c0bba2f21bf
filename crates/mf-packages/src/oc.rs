//! Output control.
//!
//! ```text
//! IHEDFM IDDNFM IHEDUN IDDNUN       4I10
//! per time step, all periods:
//!   INCODE IHDDFL IBUDFL ICBCFL     4I10; ICBCFL may be omitted when INCODE < 0
//!   INCODE < 0:  nothing, previous step's codes apply
//!   INCODE = 0:  HDPR DDPR HDSV DDSV   one line for all layers
//!   INCODE > 0:  HDPR DDPR HDSV DDSV   one line per layer
//! ```

use mf_core::PackageKind;
use mf_input::fields::column;
use mf_input::{Fields, InputResult, LineSource, Location, SeriesBuilder, TransientSeries};

use crate::{DecodeContext, DecodeSite, PackageResult, WithSite};

/// Print/save switches for heads and drawdowns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrintSaveCodes {
    pub hdpr: i64,
    pub ddpr: i64,
    pub hdsv: i64,
    pub ddsv: i64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputCodes {
    /// One set shared by every layer (`INCODE = 0`).
    Uniform(PrintSaveCodes),
    /// One set per layer (`INCODE > 0`).
    PerLayer(Vec<PrintSaveCodes>),
}

impl OutputCodes {
    pub fn for_layer(&self, layer: usize) -> Option<PrintSaveCodes> {
        match self {
            Self::Uniform(c) => Some(*c),
            Self::PerLayer(v) => v.get(layer).copied(),
        }
    }
}

/// The flag record of one time step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepFlags {
    pub incode: i64,
    /// Non-zero: print or save heads and drawdowns this step.
    pub ihddfl: i64,
    /// Non-zero: print the volumetric budget.
    pub ibudfl: i64,
    /// Non-zero: save cell-by-cell flow terms.
    pub icbcfl: i64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputControl {
    pub ihedfm: i64,
    pub iddnfm: i64,
    pub ihedun: i64,
    pub iddnun: i64,
    /// One entry per time step, in simulation order.
    pub flags:  Vec<StepFlags>,
    /// Print/save codes per time step; `INCODE < 0` steps share the previous
    /// step's value.
    pub codes:  TransientSeries<OutputCodes>,
}

pub fn decode(src: &mut LineSource, ctx: &mut DecodeContext<'_>) -> PackageResult<OutputControl> {
    let site = || DecodeSite::new(PackageKind::OutputControl);
    let nlay = ctx.shape.nlay;

    let header = read_header(src).at_site(site)?;
    let mut flags = Vec::new();
    let mut codes = SeriesBuilder::new("output codes");

    for (per, stp) in ctx.time.steps() {
        let ssite = || site().step(per, stp);
        let (step, at) = read_step_flags(src).at_site(ssite)?;
        codes
            .step(step.incode, &at, |incode| {
                if incode == 0 {
                    read_codes(src, None).map(OutputCodes::Uniform)
                } else {
                    (0..nlay)
                        .map(|k| read_codes(src, Some(k + 1)))
                        .collect::<InputResult<Vec<_>>>()
                        .map(OutputCodes::PerLayer)
                }
            })
            .at_site(ssite)?;
        flags.push(step);
    }

    log::debug!("{}: OC {} time step(s)", src.name(), flags.len());
    let [ihedfm, iddnfm, ihedun, iddnun] = header;
    Ok(OutputControl { ihedfm, iddnfm, ihedun, iddnun, flags, codes: codes.finish() })
}

fn read_header(src: &mut LineSource) -> InputResult<[i64; 4]> {
    const WHAT: &str = "IHEDFM IDDNFM IHEDUN IDDNUN";
    let line = src.next_line(WHAT)?;
    let fields = Fields::split(column(&line, 0, 40), &[10; 4], src.location());
    fields.require(4, WHAT, None)?;
    Ok([
        fields.req_int(0, "IHEDFM", None)?,
        fields.req_int(1, "IDDNFM", None)?,
        fields.req_int(2, "IHEDUN", None)?,
        fields.req_int(3, "IDDNUN", None)?,
    ])
}

fn read_step_flags(src: &mut LineSource) -> InputResult<(StepFlags, Location)> {
    const WHAT: &str = "INCODE IHDDFL IBUDFL ICBCFL";
    let line = src.next_line(WHAT)?;
    let at = src.location();
    let fields = Fields::split(column(&line, 0, 40), &[10; 4], at.clone());
    fields.require(3, WHAT, None)?;
    let incode = fields.req_int(0, "INCODE", None)?;
    let icbcfl = if incode >= 0 {
        fields.req_int(3, "ICBCFL", None)?
    } else {
        fields.int(3, "ICBCFL")?.unwrap_or(0)
    };
    let step = StepFlags {
        incode,
        ihddfl: fields.req_int(1, "IHDDFL", None)?,
        ibudfl: fields.req_int(2, "IBUDFL", None)?,
        icbcfl,
    };
    Ok((step, at))
}

fn read_codes(src: &mut LineSource, record: Option<usize>) -> InputResult<PrintSaveCodes> {
    const WHAT: &str = "HDPR DDPR HDSV DDSV";
    let line = src.next_line(WHAT)?;
    let fields = Fields::split(column(&line, 0, 40), &[10; 4], src.location());
    fields.require(4, WHAT, record)?;
    Ok(PrintSaveCodes {
        hdpr: fields.req_int(0, "HDPR", record)?,
        ddpr: fields.req_int(1, "DDPR", record)?,
        hdsv: fields.req_int(2, "HDSV", record)?,
        ddsv: fields.req_int(3, "DDSV", record)?,
    })
}
