//! `mf-input` — text-level decoding primitives for MODFLOW-88 input files.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`source`]    | `LineSource` (sequential reader with line numbers)        |
//! | [`fields`]    | fixed-or-free record splitting, `Fields`                  |
//! | [`format`]    | `ValueFormat` (`FMTIN` edit descriptors)                  |
//! | [`script`]    | `ExternalUnitTable`, `parse_script_file`                  |
//! | [`units`]     | `DataUnits`, `OpenUnits` (array unit indirection)         |
//! | [`array`]     | `read_1d`, `read_2d`, `read_3d`, `ArrayValue`             |
//! | [`transient`] | `TransientSeries`, `SeriesBuilder`, `read_flags`          |
//! | [`list`]      | `ListRecord`, `read_cell_records`                         |
//! | [`error`]     | `InputError`, `InputResult<T>`, `Location`                |
//!
//! # Reading model (summary)
//!
//! ```text
//! script file ──► ExternalUnitTable ──► package file ──► LineSource
//!                        │                                  │
//!                        └── DATA units ◄── control record ─┘ (LOCAT ≠ own unit)
//! ```
//!
//! Every reader consumes lines strictly in order; nothing here seeks.

pub mod array;
pub mod error;
pub mod fields;
pub mod format;
pub mod list;
pub mod script;
pub mod source;
pub mod transient;
pub mod units;


pub use array::{ArrayValue, read_1d, read_2d, read_3d};
pub use error::{InputError, InputResult, Location};
pub use fields::Fields;
pub use format::ValueFormat;
pub use list::{ListRecord, read_cell_records};
pub use script::{ExternalUnitEntry, ExternalUnitTable, FileKind, parse_script_file, parse_script_reader};
pub use source::LineSource;
pub use transient::{SeriesBuilder, StressPeriodSeries, TransientSeries, read_flags};
pub use units::{DataUnits, OpenUnits, UnitTarget};
