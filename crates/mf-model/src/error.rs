use mf_input::InputError;
use mf_packages::PackageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("script has no BAS entry")]
    MissingBasicEntry,

    #[error("activation slot {slot} names unit {unit}, which the script does not list")]
    UnknownUnitForSlot {
        /// 1-based activation position.
        slot: usize,
        unit: i64,
    },

    #[error("activation slot {slot} (unit {unit}) refers to a package variant this decoder does not implement")]
    UnsupportedPackageVariant {
        slot: usize,
        unit: i64,
    },

    #[error("both SIP and SOR solver packages are active")]
    ConflictingSolvers,

    #[error("package entries not claimed by the activation vector: {}", .0.join(", "))]
    UnconsumedPackageEntries(Vec<String>),
}

pub type ModelResult<T> = Result<T, ModelError>;
