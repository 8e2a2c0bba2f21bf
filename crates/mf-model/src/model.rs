//! The `Model` aggregate and its read accessors.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use mf_core::{CoordinateInfo, GridShape, PackageKind, TimeDiscretization};
use mf_packages::{
    BasicPackage, BlockCenteredFlow, DrainPackage, Evapotranspiration, GhbPackage,
    HorizontalFlowBarrier, OutputControl, Package, Recharge, RiverPackage, Sip, Sor, WellPackage,
};

use crate::StructuredGrid;

// ── Diagnostic ────────────────────────────────────────────────────────────────

/// A problem the forgiving loader recorded instead of failing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// 1-based activation position, when the problem belongs to a slot.
    pub slot:    Option<usize>,
    pub kind:    Option<PackageKind>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.slot, self.kind) {
            (Some(slot), Some(kind)) => write!(f, "slot {slot} ({}): ", kind.keyword())?,
            (Some(slot), None) => write!(f, "slot {slot}: ")?,
            (None, Some(kind)) => write!(f, "{}: ", kind.keyword())?,
            (None, None) => {}
        }
        f.write_str(&self.message)
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// A decoded MODFLOW-88 model.
///
/// Holds the Basic package, the time discretization it declares, every
/// optional package that decoded, and the diagnostics recorded on the way.
/// The structured grid is derived on first access and cached until the
/// coordinate info changes.
///
/// Create via [`ModelLoader`][crate::ModelLoader].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    basic:       BasicPackage,
    time:        TimeDiscretization,
    packages:    BTreeMap<PackageKind, Package>,
    diagnostics: Vec<Diagnostic>,
    coord:       CoordinateInfo,
    #[cfg_attr(feature = "serde", serde(skip))]
    grid:        OnceLock<StructuredGrid>,
}

macro_rules! package_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(&self) -> Option<&$ty> {
            match self.packages.get(&PackageKind::$variant) {
                Some(Package::$variant(p)) => Some(p),
                _ => None,
            }
        }
    };
}

impl Model {
    pub(crate) fn new(
        basic:       BasicPackage,
        time:        TimeDiscretization,
        packages:    BTreeMap<PackageKind, Package>,
        diagnostics: Vec<Diagnostic>,
        coord:       CoordinateInfo,
    ) -> Self {
        Self { basic, time, packages, diagnostics, coord, grid: OnceLock::new() }
    }

    pub fn basic(&self) -> &BasicPackage {
        &self.basic
    }

    /// Stress periods, time unit and start date.
    pub fn time(&self) -> &TimeDiscretization {
        &self.time
    }

    /// Problems skipped by a forgiving load, in the order they occurred.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn shape(&self) -> GridShape {
        self.basic.shape
    }

    #[inline]
    pub fn nlay(&self) -> usize {
        self.basic.shape.nlay
    }

    #[inline]
    pub fn nrow(&self) -> usize {
        self.basic.shape.nrow
    }

    #[inline]
    pub fn ncol(&self) -> usize {
        self.basic.shape.ncol
    }

    /// Cells per layer.
    #[inline]
    pub fn ncpl(&self) -> usize {
        self.basic.shape.ncpl()
    }

    #[inline]
    pub fn nper(&self) -> usize {
        self.time.nper()
    }

    // ── Packages ──────────────────────────────────────────────────────────

    pub fn package(&self, kind: PackageKind) -> Option<&Package> {
        self.packages.get(&kind)
    }

    /// Basic counts as present: every model has one.
    pub fn has_package(&self, kind: PackageKind) -> bool {
        kind == PackageKind::Basic || self.packages.contains_key(&kind)
    }

    /// Number of attached optional packages.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Attached optional package kinds in activation order.
    pub fn package_kinds(&self) -> impl Iterator<Item = PackageKind> + '_ {
        self.packages.keys().copied()
    }

    package_accessor!(bcf, BlockCenteredFlow, BlockCenteredFlow);
    package_accessor!(wel, Well, WellPackage);
    package_accessor!(drn, Drain, DrainPackage);
    package_accessor!(riv, River, RiverPackage);
    package_accessor!(evt, Evapotranspiration, Evapotranspiration);
    package_accessor!(hfb, HorizontalFlowBarrier, HorizontalFlowBarrier);
    package_accessor!(ghb, GeneralHeadBoundary, GhbPackage);
    package_accessor!(rch, Recharge, Recharge);
    package_accessor!(sip, StronglyImplicitProcedure, Sip);
    package_accessor!(sor, SuccessiveOverRelaxation, Sor);
    package_accessor!(oc, OutputControl, OutputControl);

    /// Head-change closure of the active solver; SOR wins when both are present.
    pub fn solver_closure(&self) -> Option<f64> {
        self.sor().map(|s| s.hclose).or_else(|| self.sip().map(|s| s.hclose))
    }

    // ── Grid ──────────────────────────────────────────────────────────────

    pub fn coord_info(&self) -> &CoordinateInfo {
        &self.coord
    }

    /// Replace the georeference.  The cached grid is dropped and rebuilt on
    /// the next [`grid`](Self::grid) call.
    pub fn set_coord_info(&mut self, coord: CoordinateInfo) {
        self.coord = coord;
        if self.grid.take().is_some() {
            log::debug!("coordinate info changed; grid cache invalidated");
        }
    }

    /// The structured grid, assembled on first use.
    pub fn grid(&self) -> &StructuredGrid {
        self.grid.get_or_init(|| StructuredGrid::assemble(&self.basic, self.bcf(), &self.coord))
    }

    /// Whether [`grid`](Self::grid) has been assembled since the last
    /// coordinate change.
    pub fn grid_is_cached(&self) -> bool {
        self.grid.get().is_some()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MODFLOW-88 {} layer(s) {} row(s) {} column(s) {} stress period(s)",
            self.nlay(),
            self.nrow(),
            self.ncol(),
            self.nper()
        )
    }
}
