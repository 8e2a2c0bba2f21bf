//! Structured grid assembled from the Basic and block-centered-flow packages.
//!
//! # Origin resolution
//!
//! Each axis resolves on its own, in this order:
//!
//! ```text
//! xll given            → xll
//! else xul given       → xul + H·sin(θ)
//! else                 → 0
//!
//! yll given            → yll
//! else yul given       → yul − H·cos(θ)
//! else                 → 0
//! ```
//!
//! `H` is the total grid height (sum of `DELC`) and `θ` the counter-clockwise
//! rotation about the lower-left corner.

use mf_core::{Array2, Array3, CoordinateInfo, GridShape, LengthUnit};
use mf_packages::{BasicPackage, BlockCenteredFlow};

/// Row/column spacing, layer elevations, active-cell mask and georeference.
///
/// Row 0 is the northern (top) row; column 0 is the western column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructuredGrid {
    pub shape:       GridShape,
    /// Column widths, length `ncol`.
    pub delr:        Vec<f64>,
    /// Row heights, length `nrow`.
    pub delc:        Vec<f64>,
    /// Layer top elevations where the flow package supplies them.
    pub top:         Vec<Option<Array2<f64>>>,
    /// Layer bottom elevations where the flow package supplies them.
    pub botm:        Vec<Option<Array2<f64>>>,
    /// Active-cell mask from the Basic package.
    pub ibound:      Array3<i32>,
    /// Lower-left corner after origin resolution.
    pub xll:         f64,
    pub yll:         f64,
    /// Degrees, counter-clockwise.
    pub rotation:    f64,
    pub length_unit: LengthUnit,
    pub epsg:        Option<u32>,
    pub proj4:       Option<String>,
}

impl StructuredGrid {
    /// Build the grid.  Without a flow package every spacing is 1.
    pub fn assemble(
        basic: &BasicPackage,
        bcf:   Option<&BlockCenteredFlow>,
        coord: &CoordinateInfo,
    ) -> Self {
        let shape = basic.shape;
        let (delr, delc) = match bcf {
            Some(b) => (b.delr.clone(), b.delc.clone()),
            None => {
                log::warn!("no BCF package; grid spacing defaults to 1 {}", coord.length_unit);
                (vec![1.0; shape.ncol], vec![1.0; shape.nrow])
            }
        };
        let (top, botm) = match bcf {
            Some(b) => b.layers.iter().map(|l| (l.top.clone(), l.bot.clone())).unzip(),
            None => (vec![None; shape.nlay], vec![None; shape.nlay]),
        };

        let height: f64 = delc.iter().sum();
        let theta = coord.rotation.to_radians();
        let xll = coord.xll.or_else(|| coord.xul.map(|x| x + height * theta.sin())).unwrap_or(0.0);
        let yll = coord.yll.or_else(|| coord.yul.map(|y| y - height * theta.cos())).unwrap_or(0.0);
        log::debug!("grid {shape}: lower-left ({xll}, {yll}), rotation {}°", coord.rotation);

        Self {
            shape,
            delr,
            delc,
            top,
            botm,
            ibound: basic.ibound.clone(),
            xll,
            yll,
            rotation: coord.rotation,
            length_unit: coord.length_unit,
            epsg: coord.epsg,
            proj4: coord.proj4.clone(),
        }
    }

    /// Total extent along rows (sum of `DELR`).
    pub fn width(&self) -> f64 {
        self.delr.iter().sum()
    }

    /// Total extent along columns (sum of `DELC`).
    pub fn height(&self) -> f64 {
        self.delc.iter().sum()
    }

    #[inline]
    pub fn lower_left(&self) -> (f64, f64) {
        (self.xll, self.yll)
    }

    pub fn upper_left(&self) -> (f64, f64) {
        self.to_world(0.0, self.height())
    }

    /// Column centres in grid-local coordinates (distance from the west edge).
    pub fn xcenters(&self) -> Vec<f64> {
        centers(&self.delr)
    }

    /// Row centres in grid-local coordinates (distance from the south edge),
    /// row 0 first.
    pub fn ycenters(&self) -> Vec<f64> {
        let h = self.height();
        centers(&self.delc).into_iter().map(|c| h - c).collect()
    }

    /// World coordinates of a cell centre, `None` outside the grid.
    pub fn cell_center(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        let x = *self.xcenters().get(col)?;
        let y = *self.ycenters().get(row)?;
        Some(self.to_world(x, y))
    }

    /// `(xmin, xmax, ymin, ymax)` of the rotated grid outline.
    pub fn extents(&self) -> (f64, f64, f64, f64) {
        let (w, h) = (self.width(), self.height());
        let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)].map(|(x, y)| self.to_world(x, y));
        corners.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        )
    }

    /// Count of cells with a non-zero `IBOUND`.
    pub fn active_cells(&self) -> usize {
        self.ibound.iter().filter(|&&v| v != 0).count()
    }

    fn to_world(&self, x: f64, y: f64) -> (f64, f64) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        (self.xll + x * cos - y * sin, self.yll + x * sin + y * cos)
    }
}

fn centers(spacing: &[f64]) -> Vec<f64> {
    let mut edge = 0.0;
    spacing
        .iter()
        .map(|&d| {
            let c = edge + d / 2.0;
            edge += d;
            c
        })
        .collect()
}
