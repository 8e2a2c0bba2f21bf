//! Strongly typed identifiers: external unit numbers and the package kinds
//! addressed by the Basic package's activation vector.
//!
//! The slot → kind mapping is a fixed table ([`SLOT_TABLE`]).  It is a
//! `const` so no model instance can alter it.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

// ── UnitNumber ────────────────────────────────────────────────────────────────

/// A legacy Fortran logical unit number (the handle the activation vector
/// and array control records use instead of filenames).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitNumber(pub u32);

impl UnitNumber {
    /// Convert a raw integer read from a file.  Only strictly positive
    /// values name a unit.
    #[inline]
    pub fn from_raw(raw: i64) -> Option<Self> {
        u32::try_from(raw).ok().filter(|&n| n > 0).map(UnitNumber)
    }
}

impl fmt::Display for UnitNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {}", self.0)
    }
}

// ── PackageKind ───────────────────────────────────────────────────────────────

/// Every package kind the decoder understands.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackageKind {
    Basic,
    BlockCenteredFlow,
    Well,
    Drain,
    River,
    Evapotranspiration,
    HorizontalFlowBarrier,
    GeneralHeadBoundary,
    Recharge,
    StronglyImplicitProcedure,
    SuccessiveOverRelaxation,
    OutputControl,
}

impl PackageKind {
    pub const ALL: [PackageKind; 12] = [
        PackageKind::Basic,
        PackageKind::BlockCenteredFlow,
        PackageKind::Well,
        PackageKind::Drain,
        PackageKind::River,
        PackageKind::Evapotranspiration,
        PackageKind::HorizontalFlowBarrier,
        PackageKind::GeneralHeadBoundary,
        PackageKind::Recharge,
        PackageKind::StronglyImplicitProcedure,
        PackageKind::SuccessiveOverRelaxation,
        PackageKind::OutputControl,
    ];

    /// The three-letter keyword used in script files and diagnostics.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Basic                     => "BAS",
            Self::BlockCenteredFlow         => "BCF",
            Self::Well                      => "WEL",
            Self::Drain                     => "DRN",
            Self::River                     => "RIV",
            Self::Evapotranspiration        => "EVT",
            Self::HorizontalFlowBarrier     => "HFB",
            Self::GeneralHeadBoundary       => "GHB",
            Self::Recharge                  => "RCH",
            Self::StronglyImplicitProcedure => "SIP",
            Self::SuccessiveOverRelaxation  => "SOR",
            Self::OutputControl             => "OC",
        }
    }

    /// True for the two mutually exclusive matrix solvers.
    #[inline]
    pub fn is_solver(self) -> bool {
        matches!(self, Self::StronglyImplicitProcedure | Self::SuccessiveOverRelaxation)
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for PackageKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        PackageKind::ALL
            .into_iter()
            .find(|k| k.keyword() == upper)
            .ok_or_else(|| CoreError::UnknownPackageKeyword(s.to_owned()))
    }
}

// ── Activation slots ──────────────────────────────────────────────────────────

/// What a position of the activation vector refers to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Slot {
    /// A package this decoder implements.
    Package(PackageKind),
    /// A position the legacy program reserves but no decoder exists for.
    Reserved,
}

/// Maximum number of activation slots (24 three-column fields in 72 columns).
pub const MAX_SLOTS: usize = 24;

/// Fixed position → package mapping of the MODFLOW-88 `IUNIT` vector
/// (0-based positions).
pub const SLOT_TABLE: [Slot; MAX_SLOTS] = [
    Slot::Package(PackageKind::BlockCenteredFlow),
    Slot::Package(PackageKind::Well),
    Slot::Package(PackageKind::Drain),
    Slot::Package(PackageKind::River),
    Slot::Package(PackageKind::Evapotranspiration),
    Slot::Package(PackageKind::HorizontalFlowBarrier),
    Slot::Package(PackageKind::GeneralHeadBoundary),
    Slot::Package(PackageKind::Recharge),
    Slot::Package(PackageKind::StronglyImplicitProcedure),
    Slot::Reserved,
    Slot::Package(PackageKind::SuccessiveOverRelaxation),
    Slot::Package(PackageKind::OutputControl),
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
    Slot::Reserved,
];

/// Look up the slot at a 0-based activation position.
///
/// Positions past the table (impossible for a parsed vector) are reported
/// as [`Slot::Reserved`].
#[inline]
pub fn slot_at(position: usize) -> Slot {
    SLOT_TABLE.get(position).copied().unwrap_or(Slot::Reserved)
}

/// The activation position a package kind occupies, if any (Basic has none).
pub fn position_of(kind: PackageKind) -> Option<usize> {
    SLOT_TABLE.iter().position(|s| *s == Slot::Package(kind))
}
