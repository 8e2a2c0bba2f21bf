use std::fmt;

use mf_core::PackageKind;
use mf_input::InputError;
use thiserror::Error;

/// Where inside a package an error happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeSite {
    pub package: PackageKind,
    /// 0-based stress period.
    pub period:  Option<usize>,
    /// 0-based time step within `period` (output control only).
    pub step:    Option<usize>,
    /// 0-based layer.
    pub layer:   Option<usize>,
}

impl DecodeSite {
    pub fn new(package: PackageKind) -> Self {
        Self { package, period: None, step: None, layer: None }
    }

    pub fn period(mut self, period: usize) -> Self {
        self.period = Some(period);
        self
    }

    pub fn step(mut self, period: usize, step: usize) -> Self {
        self.period = Some(period);
        self.step = Some(step);
        self
    }

    pub fn layer(mut self, layer: usize) -> Self {
        self.layer = Some(layer);
        self
    }
}

/// Rendered 1-based, the way modellers count periods and layers.
impl fmt::Display for DecodeSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.package)?;
        if let Some(p) = self.period {
            write!(f, " stress period {}", p + 1)?;
        }
        if let Some(s) = self.step {
            write!(f, " time step {}", s + 1)?;
        }
        if let Some(k) = self.layer {
            write!(f, " layer {}", k + 1)?;
        }
        Ok(())
    }
}

/// A primitive-level error with the package context attached.
#[derive(Debug, Error)]
#[error("{site}: {source}")]
pub struct PackageError {
    pub site:   DecodeSite,
    #[source]
    pub source: InputError,
}

impl PackageError {
    pub fn kind(&self) -> PackageKind {
        self.site.package
    }
}

pub type PackageResult<T> = Result<T, PackageError>;

/// Attach a [`DecodeSite`] to an [`InputResult`](mf_input::InputResult).
pub trait WithSite<T> {
    fn at_site(self, site: impl FnOnce() -> DecodeSite) -> PackageResult<T>;
}

impl<T> WithSite<T> for Result<T, InputError> {
    fn at_site(self, site: impl FnOnce() -> DecodeSite) -> PackageResult<T> {
        self.map_err(|source| PackageError { site: site(), source })
    }
}
