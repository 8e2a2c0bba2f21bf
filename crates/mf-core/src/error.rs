//! Error type for the value-level conversions in `mf-core`.
//!
//! The decoding crates define their own error enums; this one only covers
//! the legacy code tables (`ITMUNI`, `LENUNI`, package keywords) and array
//! construction.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown time unit code {0} (expected 0..=5)")]
    UnknownTimeUnit(i64),

    #[error("unknown length unit {0:?} (expected u/f/m/c or 0..=3)")]
    UnknownLengthUnit(String),

    #[error("unknown package keyword {0:?}")]
    UnknownPackageKeyword(String),

    #[error("array data length {got} does not match shape {shape:?} ({expected} cells)")]
    ShapeMismatch {
        shape:    Vec<usize>,
        expected: usize,
        got:      usize,
    },
}

/// Shorthand result type for `mf-core` conversions.
pub type CoreResult<T> = Result<T, CoreError>;
