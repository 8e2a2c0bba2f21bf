//! State shared by every package decoder after the Basic package.

use mf_core::{GridShape, TimeDiscretization};
use mf_input::DataUnits;

/// What a decoder needs beyond its own file: the grid and time dimensions
/// declared by the Basic package, and unit resolution for array data.
///
/// Built by the loader once per package; `units` carries the package's own
/// unit so control records naming it read inline.
pub struct DecodeContext<'a> {
    /// `(nlay, nrow, ncol)` from the Basic header.
    pub shape: GridShape,

    /// Stress periods and their step counts.
    pub time: &'a TimeDiscretization,

    /// Unit indirection for array control records.
    pub units: DataUnits<'a>,
}

impl<'a> DecodeContext<'a> {
    #[inline]
    pub fn new(shape: GridShape, time: &'a TimeDiscretization, units: DataUnits<'a>) -> Self {
        Self { shape, time, units }
    }

    /// Number of stress periods.
    #[inline]
    pub fn nper(&self) -> usize {
        self.time.nper()
    }
}
