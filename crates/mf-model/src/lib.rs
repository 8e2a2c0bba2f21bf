//! `mf-model` — loads a MODFLOW-88 model from its script file.
//!
//! # Load sequence
//!
//! ```text
//! script file ─► ExternalUnitTable
//!   ① Init         : pop the BAS entry (MissingBasicEntry if absent)
//!   ② BasicLoaded  : decode BAS; any failure here is fatal
//!   ③ Slots        : for every activation value > 0, in slot order:
//!                      reserved slot        → UnsupportedPackageVariant
//!                      unit not in script   → UnknownUnitForSlot
//!                      otherwise            → decode, attach on success
//!   ④ Checks       : SIP and SOR together   → ConflictingSolvers
//!                    package entries unused → UnconsumedPackageEntries
//!   ⑤ Complete
//! ```
//!
//! In strict mode every error in ③ and ④ aborts the load.  In forgiving
//! mode (the default) each becomes a [`Diagnostic`] on the model and the
//! slot is skipped; packages that did decode are unaffected.
//!
//! # Cargo features
//!
//! | Feature | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on `Model` and the grid.         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mf_model::ModelLoader;
//!
//! let model = ModelLoader::new("tutorial/model.nam").load()?;
//! for d in model.diagnostics() {
//!     eprintln!("{d}");
//! }
//! let grid = model.grid();
//! println!("{model}: lower-left {:?}", grid.lower_left());
//! ```

pub mod builder;
pub mod error;
pub mod grid;
pub mod model;
pub mod observer;


pub use builder::ModelLoader;
pub use error::{ModelError, ModelResult};
pub use grid::StructuredGrid;
pub use model::{Diagnostic, Model};
pub use observer::{LoadObserver, NoopObserver};
