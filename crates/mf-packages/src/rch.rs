//! Recharge package.
//!
//! ```text
//! NRCHOP IRCHCB                 2I10
//! per stress period:
//!   INRECH INIRCH               2I10, <0 reuse previous
//!   RECH                        2-D real array, unless INRECH < 0
//!   IRCH                        2-D integer array, only when NRCHOP = 2
//!                               and INIRCH >= 0
//! ```

use mf_core::{Array2, PackageKind};
use mf_input::fields::column;
use mf_input::{Fields, InputResult, LineSource, SeriesBuilder, StressPeriodSeries, read_2d, read_flags};

use crate::{DecodeContext, DecodeSite, PackageResult, WithSite};

/// Option code selecting the layer indicator array.
pub const LAYER_ARRAY_OPTION: i64 = 2;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recharge {
    /// `NRCHOP`: 1 top layer, 2 layer from `IRCH`, 3 highest active cell.
    pub nrchop: i64,
    pub irchcb: i64,
    pub rech:   StressPeriodSeries<Array2<f64>>,
    /// Present only when `NRCHOP = 2`.
    pub irch:   Option<StressPeriodSeries<Array2<i32>>>,
}

pub fn decode(src: &mut LineSource, ctx: &mut DecodeContext<'_>) -> PackageResult<Recharge> {
    let site = || DecodeSite::new(PackageKind::Recharge);
    let (nrow, ncol, nper) = (ctx.shape.nrow, ctx.shape.ncol, ctx.nper());

    let (nrchop, irchcb) = read_option_header(src, "NRCHOP IRCHCB").at_site(site)?;
    let with_layers = nrchop == LAYER_ARRAY_OPTION;

    let mut rech = SeriesBuilder::new("recharge flux (RECH)");
    let mut irch = SeriesBuilder::new("recharge layer (IRCH)");

    for p in 0..nper {
        let psite = || site().period(p);
        let (flags, at) = read_flags(src, 1, 1, "INRECH INIRCH").at_site(psite)?;
        rech.step(flags[0], &at, |_| read_2d::<f64>(src, &mut ctx.units, nrow, ncol, "RECH"))
            .at_site(psite)?;
        if with_layers {
            irch.step(flags[1], &at, |_| read_2d::<i32>(src, &mut ctx.units, nrow, ncol, "IRCH"))
                .at_site(psite)?;
        }
    }

    log::debug!("{}: RCH option {nrchop}, {nper} period(s)", src.name());
    Ok(Recharge {
        nrchop,
        irchcb,
        rech: rech.finish(),
        irch: with_layers.then(|| irch.finish()),
    })
}

/// `XXXOP XXXCB` header shared by the areal packages.
pub(crate) fn read_option_header(src: &mut LineSource, what: &str) -> InputResult<(i64, i64)> {
    let line = src.next_line(what)?;
    let fields = Fields::split(column(&line, 0, 20), &[10, 10], src.location());
    fields.require(1, what, None)?;
    Ok((fields.req_int(0, what, None)?, fields.int(1, what)?.unwrap_or(0)))
}
