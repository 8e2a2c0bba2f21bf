//! Fluent builder for loading a [`Model`], and the package dispatcher it drives.

use std::collections::BTreeMap;
use std::path::PathBuf;

use mf_core::{
    CoordinateInfo, LengthUnit, PackageKind, Slot, TimeDiscretization, UnitNumber, slot_at,
};
use mf_input::{
    DataUnits, ExternalUnitEntry, ExternalUnitTable, LineSource, OpenUnits, parse_script_file,
};
use mf_packages::{BasicPackage, DecodeContext, Package, bas, package};

use crate::{Diagnostic, LoadObserver, Model, ModelError, ModelResult, NoopObserver};

/// Fluent builder for [`Model`].
///
/// # Required inputs
///
/// - the script (name) file listing every package and data file by unit
///
/// # Optional inputs (have defaults)
///
/// | Method                            | Default                            |
/// |-----------------------------------|------------------------------------|
/// | `.workspace(dir)`                 | The script's directory             |
/// | `.forgiving(b)` / `.strict()`     | Forgiving                          |
/// | `.allow_conflicting_solvers(b)`   | `false`                            |
/// | `.coordinate_info(c)`             | Origin (0, 0), no rotation         |
/// | `.length_unit(u)`                 | `coordinate_info`'s unit           |
/// | `.start_datetime(s)`              | None                               |
///
/// # Example
///
/// ```rust,ignore
/// let model = ModelLoader::new("model/model.nam")
///     .strict()
///     .coordinate_info(CoordinateInfo::upper_left(619_653.0, 3_353_277.0))
///     .length_unit(LengthUnit::Feet)
///     .load()?;
/// println!("{model}");
/// ```
pub struct ModelLoader {
    script:                    PathBuf,
    workspace:                 Option<PathBuf>,
    forgiving:                 bool,
    allow_conflicting_solvers: bool,
    coord:                     CoordinateInfo,
    length_unit:               Option<LengthUnit>,
    start_datetime:            Option<String>,
}

impl ModelLoader {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script:                    script.into(),
            workspace:                 None,
            forgiving:                 true,
            allow_conflicting_solvers: false,
            coord:                     CoordinateInfo::default(),
            length_unit:               None,
            start_datetime:            None,
        }
    }

    /// Directory package filenames resolve against.
    pub fn workspace(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace = Some(dir.into());
        self
    }

    /// In forgiving mode a failing optional package is skipped and recorded
    /// as a [`Diagnostic`]; otherwise the first failure aborts the load.
    /// The Basic package is fatal either way.
    pub fn forgiving(mut self, forgiving: bool) -> Self {
        self.forgiving = forgiving;
        self
    }

    pub fn strict(self) -> Self {
        self.forgiving(false)
    }

    /// Accept models activating both SIP and SOR without complaint.
    pub fn allow_conflicting_solvers(mut self, allow: bool) -> Self {
        self.allow_conflicting_solvers = allow;
        self
    }

    pub fn coordinate_info(mut self, coord: CoordinateInfo) -> Self {
        self.coord = coord;
        self
    }

    /// Overrides the unit inside [`coordinate_info`](Self::coordinate_info)
    /// regardless of call order.
    pub fn length_unit(mut self, unit: LengthUnit) -> Self {
        self.length_unit = Some(unit);
        self
    }

    pub fn start_datetime(mut self, start: impl Into<String>) -> Self {
        self.start_datetime = Some(start.into());
        self
    }

    pub fn load(self) -> ModelResult<Model> {
        self.load_with(&mut NoopObserver)
    }

    /// Parse the script, decode the Basic package, then every package the
    /// activation vector names, in slot order.
    pub fn load_with<O: LoadObserver>(mut self, observer: &mut O) -> ModelResult<Model> {
        if let Some(unit) = self.length_unit {
            self.coord.length_unit = unit;
        }

        let mut table = parse_script_file(&self.script, self.workspace.as_deref())?;
        let mut dispatcher = Dispatcher::new(self.forgiving);

        let bas_entry = table.pop_basic().ok_or(ModelError::MissingBasicEntry)?;
        let mut open = OpenUnits::new();
        let basic = {
            let mut src = LineSource::open(&bas_entry.filename)?;
            let mut units = DataUnits::new(&table, &mut open, Some(bas_entry.unit));
            bas::decode(&mut src, &mut units)?
        };
        dispatcher.enter(LoadState::BasicLoaded);
        observer.on_basic_loaded(&basic);

        let time = basic.time_discretization(self.start_datetime.take());
        for (pos, value) in basic.active_slots() {
            let slot = pos + 1;
            let kind = match slot_at(pos) {
                Slot::Package(kind) => kind,
                Slot::Reserved => {
                    let err = ModelError::UnsupportedPackageVariant { slot, unit: value };
                    dispatcher.recover(err, Some(slot), None, observer)?;
                    continue;
                }
            };
            let Some(entry) = UnitNumber::from_raw(value).and_then(|u| table.pop(u)) else {
                let err = ModelError::UnknownUnitForSlot { slot, unit: value };
                dispatcher.recover(err, Some(slot), Some(kind), observer)?;
                continue;
            };
            if entry.kind.package() != Some(kind) {
                log::warn!(
                    "slot {slot} expects {} but {} is listed as {:?}; decoding as {}",
                    kind.keyword(),
                    entry.unit,
                    entry.kind,
                    kind.keyword()
                );
            }

            open.begin_package();
            match decode_slot(slot, kind, &entry, &basic, &time, &table, &mut open) {
                Ok(package) => {
                    log::debug!("slot {slot}: {} attached from {}", kind.keyword(), entry.filename.display());
                    observer.on_package_loaded(kind, &package);
                    dispatcher.packages.insert(kind, package);
                }
                Err(err) => {
                    // Shared data files go back to where this slot found them.
                    open.rewind_package();
                    dispatcher.recover(err, Some(slot), Some(kind), observer)?;
                }
            }
        }

        let has_both_solvers = dispatcher.packages.contains_key(&PackageKind::StronglyImplicitProcedure)
            && dispatcher.packages.contains_key(&PackageKind::SuccessiveOverRelaxation);
        if has_both_solvers && !self.allow_conflicting_solvers {
            dispatcher.recover(ModelError::ConflictingSolvers, None, None, observer)?;
        }

        let leftover = unclaimed_packages(&table);
        if !leftover.is_empty() {
            dispatcher.recover(ModelError::UnconsumedPackageEntries(leftover), None, None, observer)?;
        }

        dispatcher.enter(LoadState::Complete);
        let model = Model::new(basic, time, dispatcher.packages, dispatcher.diagnostics, self.coord);
        observer.on_complete(&model);
        Ok(model)
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LoadState {
    Init,
    BasicLoaded,
    Complete,
    /// A slot failed (strict) or the final checks rejected the model.
    Failed(Option<usize>),
}

/// Bookkeeping for one load: what is attached so far and what went wrong.
struct Dispatcher {
    forgiving:   bool,
    state:       LoadState,
    packages:    BTreeMap<PackageKind, Package>,
    diagnostics: Vec<Diagnostic>,
}

impl Dispatcher {
    fn new(forgiving: bool) -> Self {
        Self {
            forgiving,
            state:       LoadState::Init,
            packages:    BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    fn enter(&mut self, next: LoadState) {
        log::debug!("dispatcher: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Downgrade `err` to a diagnostic in forgiving mode, or fail the load.
    fn recover<O: LoadObserver>(
        &mut self,
        err:      ModelError,
        slot:     Option<usize>,
        kind:     Option<PackageKind>,
        observer: &mut O,
    ) -> ModelResult<()> {
        if !self.forgiving {
            self.enter(LoadState::Failed(slot));
            return Err(err);
        }
        let diagnostic = Diagnostic { slot, kind, message: err.to_string() };
        log::warn!("skipped: {diagnostic}");
        observer.on_package_skipped(&diagnostic);
        self.diagnostics.push(diagnostic);
        Ok(())
    }
}

fn decode_slot(
    slot:  usize,
    kind:  PackageKind,
    entry: &ExternalUnitEntry,
    basic: &BasicPackage,
    time:  &TimeDiscretization,
    table: &ExternalUnitTable,
    open:  &mut OpenUnits,
) -> ModelResult<Package> {
    let mut src = LineSource::open(&entry.filename)?;
    let mut ctx = DecodeContext::new(basic.shape, time, DataUnits::new(table, open, Some(entry.unit)));
    match package::decode(kind, &mut src, &mut ctx) {
        Some(decoded) => Ok(decoded?),
        None => Err(ModelError::UnsupportedPackageVariant { slot, unit: i64::from(entry.unit.0) }),
    }
}

/// Package entries still in the table, as `KIND unit N` strings.
fn unclaimed_packages(table: &ExternalUnitTable) -> Vec<String> {
    table
        .iter()
        .filter_map(|e| e.kind.package().map(|k| format!("{} {}", k.keyword(), e.unit)))
        .collect()
}
