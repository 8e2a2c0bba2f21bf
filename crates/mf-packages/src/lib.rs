//! `mf-packages` — one decoder per MODFLOW-88 package.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`bas`]      | `BasicPackage`, activation-vector parsing                       |
//! | [`bcf`]      | `BlockCenteredFlow`, `LayerArrays` decision table               |
//! | [`boundary`] | `BoundaryList<R>` for WEL, DRN, RIV, GHB                        |
//! | [`hfb`]      | `HorizontalFlowBarrier`                                         |
//! | [`rch`]      | `Recharge`                                                      |
//! | [`evt`]      | `Evapotranspiration`                                            |
//! | [`solver`]   | `Sip`, `Sor`                                                    |
//! | [`oc`]       | `OutputControl`                                                 |
//! | [`package`]  | `Package` variant, `decode(kind, ..)`                           |
//! | [`context`]  | `DecodeContext<'a>`: dimensions and unit resolution            |
//! | [`error`]    | `PackageError`, `DecodeSite`, `PackageResult<T>`                |
//!
//! # Design notes
//!
//! Decoders are plain functions over a [`LineSource`](mf_input::LineSource).
//! Each returns a fully built value or an error; nothing is attached to a
//! model until decoding succeeded, so a failed package leaves no trace.
//!
//! Every primitive-level [`InputError`](mf_input::InputError) leaving a
//! decoder is wrapped in a [`PackageError`] naming the package and, where
//! known, the stress period, time step and layer.

pub mod bas;
pub mod bcf;
pub mod boundary;
pub mod context;
pub mod error;
pub mod evt;
pub mod hfb;
pub mod oc;
pub mod package;
pub mod rch;
pub mod solver;

#[cfg(test)]
mod tests;

pub use bas::BasicPackage;
pub use bcf::{BcfLayer, BlockCenteredFlow, LayerArrays, LayerCode, LayerType};
pub use boundary::{
    BoundaryList, CellRecord, DrainPackage, DrainRecord, GhbPackage, GhbRecord, RiverPackage,
    RiverRecord, WellPackage, WellRecord,
};
pub use context::DecodeContext;
pub use error::{DecodeSite, PackageError, PackageResult, WithSite};
pub use evt::Evapotranspiration;
pub use hfb::{Barrier, HorizontalFlowBarrier};
pub use oc::{OutputCodes, OutputControl, PrintSaveCodes, StepFlags};
pub use package::Package;
pub use rch::Recharge;
pub use solver::{Sip, Sor};
