//! Matrix solver controls: strongly implicit procedure and slice-successive
//! over-relaxation.

use mf_core::PackageKind;
use mf_input::{Fields, LineSource};

use crate::{DecodeSite, PackageResult, WithSite};

/// Seed used when `IPCALC != 0` and none is listed.
pub const DEFAULT_WSEED: f64 = 0.98;
/// Print interval used when `IPCALC != 0` and none is listed.
pub const DEFAULT_IPRSIP: i64 = 10;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sip {
    pub mxiter: i64,
    /// Number of iteration parameters.
    pub nparm:  i64,
    /// Acceleration factor.
    pub accl:   f64,
    /// Head-change closure criterion.
    pub hclose: f64,
    /// 0: seed is `wseed`; 1: seed computed from the problem.
    pub ipcalc: i64,
    pub wseed:  f64,
    pub iprsip: i64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sor {
    pub mxiter: i64,
    pub accl:   f64,
    pub hclose: f64,
    pub iprsor: i64,
}

/// ```text
/// MXITER NPARM                      2I10
/// ACCL HCLOSE IPCALC [WSEED IPRSIP] F10.0 F10.0 I10 F10.0 I10
/// ```
pub fn decode_sip(src: &mut LineSource) -> PackageResult<Sip> {
    let site = || DecodeSite::new(PackageKind::StronglyImplicitProcedure);

    let line = src.next_line("MXITER NPARM").at_site(site)?;
    let fields = Fields::split(&line, &[10, 10], src.location());
    fields.require(2, "MXITER NPARM", None).at_site(site)?;
    let mxiter = fields.req_int(0, "MXITER", None).at_site(site)?;
    let nparm = fields.req_int(1, "NPARM", None).at_site(site)?;

    let line = src.next_line("ACCL HCLOSE IPCALC WSEED IPRSIP").at_site(site)?;
    let fields = Fields::split(&line, &[10; 5], src.location());
    fields.require(3, "ACCL HCLOSE IPCALC", None).at_site(site)?;
    let accl = fields.req_real(0, "ACCL", None).at_site(site)?;
    let hclose = fields.req_real(1, "HCLOSE", None).at_site(site)?;
    let ipcalc = fields.req_int(2, "IPCALC", None).at_site(site)?;

    let (wseed, iprsip) = if ipcalc == 0 {
        fields.require(5, "ACCL HCLOSE IPCALC WSEED IPRSIP", None).at_site(site)?;
        (
            fields.req_real(3, "WSEED", None).at_site(site)?,
            fields.req_int(4, "IPRSIP", None).at_site(site)?,
        )
    } else {
        (
            fields.real(3, "WSEED").at_site(site)?.unwrap_or(DEFAULT_WSEED),
            fields.int(4, "IPRSIP").at_site(site)?.unwrap_or(DEFAULT_IPRSIP),
        )
    };

    log::debug!("{}: SIP mxiter {mxiter}, hclose {hclose}", src.name());
    Ok(Sip { mxiter, nparm, accl, hclose, ipcalc, wseed, iprsip })
}

/// ```text
/// MXITER                            I10
/// ACCL HCLOSE IPRSOR                F10.0 F10.0 I10
/// ```
pub fn decode_sor(src: &mut LineSource) -> PackageResult<Sor> {
    let site = || DecodeSite::new(PackageKind::SuccessiveOverRelaxation);

    let line = src.next_line("MXITER").at_site(site)?;
    let fields = Fields::split(&line, &[10], src.location());
    let mxiter = fields.req_int(0, "MXITER", None).at_site(site)?;

    let line = src.next_line("ACCL HCLOSE IPRSOR").at_site(site)?;
    let fields = Fields::split(&line, &[10; 3], src.location());
    fields.require(3, "ACCL HCLOSE IPRSOR", None).at_site(site)?;
    let accl = fields.req_real(0, "ACCL", None).at_site(site)?;
    let hclose = fields.req_real(1, "HCLOSE", None).at_site(site)?;
    let iprsor = fields.req_int(2, "IPRSOR", None).at_site(site)?;

    log::debug!("{}: SOR mxiter {mxiter}, hclose {hclose}", src.name());
    Ok(Sor { mxiter, accl, hclose, iprsor })
}
