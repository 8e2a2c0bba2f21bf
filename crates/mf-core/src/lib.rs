//! `mf-core` — foundational value types for the MODFLOW-88 input decoder.
//!
//! This crate is a dependency of every other `mf-*` crate.  It has no
//! `mf-*` dependencies and minimal external ones (`ndarray` for grid
//! storage, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                    |
//! |------------|-------------------------------------------------------------|
//! | [`ids`]    | `UnitNumber`, `PackageKind`, activation `SLOT_TABLE`        |
//! | [`cell`]   | `GridShape`, `CellIndex` (0-based)                          |
//! | [`array`]  | `ndarray` layer/grid arrays, `stack_layers`                 |
//! | [`time`]   | `TimeUnit`, `StressPeriod`, `TimeDiscretization`            |
//! | [`geo`]    | `LengthUnit`, `CoordinateInfo`                              |
//! | [`error`]  | `CoreError`, `CoreResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod array;
pub mod cell;
pub mod error;
pub mod geo;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use array::{Array2, Array3, layer_from_vec, stack_layers};
pub use cell::{CellIndex, GridShape};
pub use error::{CoreError, CoreResult};
pub use geo::{CoordinateInfo, LengthUnit};
pub use ids::{MAX_SLOTS, PackageKind, SLOT_TABLE, Slot, UnitNumber, position_of, slot_at};
pub use time::{StressPeriod, TimeDiscretization, TimeUnit};
