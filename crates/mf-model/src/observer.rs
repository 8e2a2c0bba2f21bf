//! Load observer trait for progress reporting and diagnostics collection.

use mf_core::PackageKind;
use mf_packages::{BasicPackage, Package};

use crate::{Diagnostic, Model};

/// Callbacks invoked by [`ModelLoader::load_with`][crate::ModelLoader::load_with]
/// as the dispatcher moves through a model.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: package counter
///
/// ```rust,ignore
/// struct Counter { loaded: usize, skipped: usize }
///
/// impl LoadObserver for Counter {
///     fn on_package_loaded(&mut self, _kind: PackageKind, _package: &Package) {
///         self.loaded += 1;
///     }
///     fn on_package_skipped(&mut self, _diagnostic: &Diagnostic) {
///         self.skipped += 1;
///     }
/// }
/// ```
pub trait LoadObserver {
    /// Called once the Basic package has decoded, before any slot is visited.
    fn on_basic_loaded(&mut self, _basic: &BasicPackage) {}

    /// Called after a package decoded and was attached.
    fn on_package_loaded(&mut self, _kind: PackageKind, _package: &Package) {}

    /// Called for every diagnostic recorded in forgiving mode.
    fn on_package_skipped(&mut self, _diagnostic: &Diagnostic) {}

    /// Called once with the finished model.
    fn on_complete(&mut self, _model: &Model) {}
}

/// A [`LoadObserver`] that does nothing.
pub struct NoopObserver;

impl LoadObserver for NoopObserver {}
