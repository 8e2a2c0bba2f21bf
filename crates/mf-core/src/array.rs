//! Dense grid arrays.
//!
//! Layer arrays are [`ndarray::Array2`] indexed `(row, col)`; full-grid
//! arrays are [`ndarray::Array3`] indexed `(layer, row, col)`.  Both are
//! standard (row-major) layout, the order the legacy files list values in.
//!
//! Exporters that want plain nested sequences walk `outer_iter()`.

use ndarray::{Axis, ShapeError};

use crate::{CoreError, CoreResult};

pub use ndarray::{Array2, Array3};

/// Wrap row-major `data` as an `nrow × ncol` array.
pub fn layer_from_vec<T>(nrow: usize, ncol: usize, data: Vec<T>) -> CoreResult<Array2<T>> {
    let got = data.len();
    Array2::from_shape_vec((nrow, ncol), data).map_err(|e| mismatch(e, vec![nrow, ncol], got))
}

/// Stack per-layer arrays along a new leading axis.  Every layer must be
/// `nrow × ncol`; an empty list gives a `0 × nrow × ncol` array.
pub fn stack_layers<T: Clone>(nrow: usize, ncol: usize, layers: &[Array2<T>]) -> CoreResult<Array3<T>> {
    if let Some(bad) = layers.iter().find(|l| l.dim() != (nrow, ncol)) {
        return Err(CoreError::ShapeMismatch {
            shape:    vec![nrow, ncol],
            expected: nrow.saturating_mul(ncol),
            got:      bad.len(),
        });
    }
    if layers.is_empty() {
        return Array3::from_shape_vec((0, nrow, ncol), Vec::new())
            .map_err(|e| mismatch(e, vec![0, nrow, ncol], 0));
    }
    let views: Vec<_> = layers.iter().map(|l| l.view()).collect();
    ndarray::stack(Axis(0), &views).map_err(|e| mismatch(e, vec![layers.len(), nrow, ncol], 0))
}

fn mismatch(_: ShapeError, shape: Vec<usize>, got: usize) -> CoreError {
    let expected = shape.iter().fold(1usize, |n, &d| n.saturating_mul(d));
    CoreError::ShapeMismatch { expected, shape, got }
}
