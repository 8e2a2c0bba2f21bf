//! Grid dimensions and 0-based cell addresses.

use std::fmt;

/// `(nlay, nrow, ncol)` as declared by the Basic package header.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridShape {
    pub nlay: usize,
    pub nrow: usize,
    pub ncol: usize,
}

impl GridShape {
    pub fn new(nlay: usize, nrow: usize, ncol: usize) -> Self {
        Self { nlay, nrow, ncol }
    }

    /// Cells per layer.
    #[inline]
    pub fn ncpl(&self) -> usize {
        self.nrow * self.ncol
    }

    #[inline]
    pub fn ncells(&self) -> usize {
        self.nlay * self.ncpl()
    }

    /// Total cell count, or `None` if it does not fit in `usize`.  The
    /// Basic header rejects such shapes, so every decoded shape has
    /// `ncells()` in range.
    pub fn checked_ncells(&self) -> Option<usize> {
        self.nlay.checked_mul(self.nrow)?.checked_mul(self.ncol)
    }

    #[inline]
    pub fn contains(&self, cell: CellIndex) -> bool {
        cell.layer < self.nlay && cell.row < self.nrow && cell.col < self.ncol
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.nlay, self.nrow, self.ncol)
    }
}

/// A 0-based `(layer, row, column)` cell address.
///
/// Source files are 1-based; decoders convert with [`CellIndex::from_one_based`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellIndex {
    pub layer: usize,
    pub row:   usize,
    pub col:   usize,
}

impl CellIndex {
    #[inline]
    pub fn new(layer: usize, row: usize, col: usize) -> Self {
        Self { layer, row, col }
    }

    /// Convert 1-based source indices.  Any index below 1 yields `None`.
    pub fn from_one_based(layer: i64, row: i64, col: i64) -> Option<Self> {
        let zb = |v: i64| usize::try_from(v).ok().and_then(|v| v.checked_sub(1));
        Some(Self { layer: zb(layer)?, row: zb(row)?, col: zb(col)? })
    }

    /// True when `other` shares a cell face with `self` in the same layer.
    pub fn is_lateral_neighbor(&self, other: &CellIndex) -> bool {
        self.layer == other.layer
            && self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(k={}, i={}, j={})", self.layer, self.row, self.col)
    }
}
