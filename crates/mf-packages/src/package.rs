//! The closed set of optional packages and the kind → decoder mapping.

use mf_core::PackageKind;
use mf_input::LineSource;

use crate::bcf::{self, BlockCenteredFlow};
use crate::boundary::{self, DrainPackage, GhbPackage, RiverPackage, WellPackage};
use crate::evt::{self, Evapotranspiration};
use crate::hfb::{self, HorizontalFlowBarrier};
use crate::oc::{self, OutputControl};
use crate::rch::{self, Recharge};
use crate::solver::{self, Sip, Sor};
use crate::{DecodeContext, PackageResult};

/// A decoded optional package.  The Basic package is not a variant: every
/// model has exactly one and it is held separately.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Package {
    BlockCenteredFlow(BlockCenteredFlow),
    Well(WellPackage),
    Drain(DrainPackage),
    River(RiverPackage),
    Evapotranspiration(Evapotranspiration),
    HorizontalFlowBarrier(HorizontalFlowBarrier),
    GeneralHeadBoundary(GhbPackage),
    Recharge(Recharge),
    StronglyImplicitProcedure(Sip),
    SuccessiveOverRelaxation(Sor),
    OutputControl(OutputControl),
}

impl Package {
    pub fn kind(&self) -> PackageKind {
        match self {
            Self::BlockCenteredFlow(_)         => PackageKind::BlockCenteredFlow,
            Self::Well(_)                      => PackageKind::Well,
            Self::Drain(_)                     => PackageKind::Drain,
            Self::River(_)                     => PackageKind::River,
            Self::Evapotranspiration(_)        => PackageKind::Evapotranspiration,
            Self::HorizontalFlowBarrier(_)     => PackageKind::HorizontalFlowBarrier,
            Self::GeneralHeadBoundary(_)       => PackageKind::GeneralHeadBoundary,
            Self::Recharge(_)                  => PackageKind::Recharge,
            Self::StronglyImplicitProcedure(_) => PackageKind::StronglyImplicitProcedure,
            Self::SuccessiveOverRelaxation(_)  => PackageKind::SuccessiveOverRelaxation,
            Self::OutputControl(_)             => PackageKind::OutputControl,
        }
    }
}

/// Decode one package of `kind` from `src`.
///
/// Returns `None` for [`PackageKind::Basic`], which is decoded up front by
/// [`bas::decode`](crate::bas::decode) because every other decoder needs its
/// dimensions.
pub fn decode(kind: PackageKind, src: &mut LineSource, ctx: &mut DecodeContext<'_>) -> Option<PackageResult<Package>> {
    let decoded = match kind {
        PackageKind::Basic => return None,
        PackageKind::BlockCenteredFlow => bcf::decode(src, ctx).map(Package::BlockCenteredFlow),
        PackageKind::Well => boundary::decode(src, ctx, kind).map(Package::Well),
        PackageKind::Drain => boundary::decode(src, ctx, kind).map(Package::Drain),
        PackageKind::River => boundary::decode(src, ctx, kind).map(Package::River),
        PackageKind::GeneralHeadBoundary => boundary::decode(src, ctx, kind).map(Package::GeneralHeadBoundary),
        PackageKind::Evapotranspiration => evt::decode(src, ctx).map(Package::Evapotranspiration),
        PackageKind::HorizontalFlowBarrier => hfb::decode(src, ctx).map(Package::HorizontalFlowBarrier),
        PackageKind::Recharge => rch::decode(src, ctx).map(Package::Recharge),
        PackageKind::StronglyImplicitProcedure => solver::decode_sip(src).map(Package::StronglyImplicitProcedure),
        PackageKind::SuccessiveOverRelaxation => solver::decode_sor(src).map(Package::SuccessiveOverRelaxation),
        PackageKind::OutputControl => oc::decode(src, ctx).map(Package::OutputControl),
    };
    Some(decoded)
}
