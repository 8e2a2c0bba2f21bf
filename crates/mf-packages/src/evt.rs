//! Evapotranspiration package.
//!
//! ```text
//! NEVTOP IEVTCB                 2I10
//! per stress period:
//!   INSURF INEVTR INEXDP [INIEVT]   <0 reuse previous; INIEVT only when NEVTOP = 2
//!   SURF                            unless INSURF < 0
//!   EVTR                            unless INEVTR < 0
//!   EXDP                            unless INEXDP < 0
//!   IEVT                            NEVTOP = 2 and INIEVT >= 0
//! ```

use mf_core::{Array2, PackageKind};
use mf_input::{LineSource, SeriesBuilder, StressPeriodSeries, read_2d, read_flags};

use crate::rch::{LAYER_ARRAY_OPTION, read_option_header};
use crate::{DecodeContext, DecodeSite, PackageResult, WithSite};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evapotranspiration {
    /// `NEVTOP`: 1 top layer, 2 layer from `IEVT`.
    pub nevtop: i64,
    pub ievtcb: i64,
    /// ET surface elevation.
    pub surf:   StressPeriodSeries<Array2<f64>>,
    /// Maximum ET rate.
    pub evtr:   StressPeriodSeries<Array2<f64>>,
    /// Extinction depth.
    pub exdp:   StressPeriodSeries<Array2<f64>>,
    /// Present only when `NEVTOP = 2`.
    pub ievt:   Option<StressPeriodSeries<Array2<i32>>>,
}

pub fn decode(src: &mut LineSource, ctx: &mut DecodeContext<'_>) -> PackageResult<Evapotranspiration> {
    let site = || DecodeSite::new(PackageKind::Evapotranspiration);
    let (nrow, ncol, nper) = (ctx.shape.nrow, ctx.shape.ncol, ctx.nper());

    let (nevtop, ievtcb) = read_option_header(src, "NEVTOP IEVTCB").at_site(site)?;
    let with_layers = nevtop == LAYER_ARRAY_OPTION;
    let required = if with_layers { 4 } else { 3 };

    let mut surf = SeriesBuilder::new("ET surface (SURF)");
    let mut evtr = SeriesBuilder::new("maximum ET rate (EVTR)");
    let mut exdp = SeriesBuilder::new("extinction depth (EXDP)");
    let mut ievt = SeriesBuilder::new("ET layer (IEVT)");

    for p in 0..nper {
        let psite = || site().period(p);
        let (flags, at) = read_flags(src, required, 0, "INSURF INEVTR INEXDP").at_site(psite)?;

        let quantities = [
            (&mut surf, flags[0], "SURF"),
            (&mut evtr, flags[1], "EVTR"),
            (&mut exdp, flags[2], "EXDP"),
        ];
        for (series, flag, name) in quantities {
            series
                .step(flag, &at, |_| read_2d::<f64>(src, &mut ctx.units, nrow, ncol, name))
                .at_site(psite)?;
        }
        if with_layers {
            ievt.step(flags[3], &at, |_| read_2d::<i32>(src, &mut ctx.units, nrow, ncol, "IEVT"))
                .at_site(psite)?;
        }
    }

    log::debug!("{}: EVT option {nevtop}, {nper} period(s)", src.name());
    Ok(Evapotranspiration {
        nevtop,
        ievtcb,
        surf: surf.finish(),
        evtr: evtr.finish(),
        exdp: exdp.finish(),
        ievt: with_layers.then(|| ievt.finish()),
    })
}
