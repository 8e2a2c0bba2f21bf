//! Unit-number indirection for array control records.
//!
//! A control record may say "the values are on unit N".  N resolves to:
//!
//! | N                                 | Source read                        |
//! |-----------------------------------|------------------------------------|
//! | absent, 0, or the file's own unit | the package file itself (inline)   |
//! | a unit in the unit table          | that entry's file, opened lazily   |
//! | anything else                     | `UnresolvedUnitReference`          |
//!
//! Opened data files stay open for the whole load so consecutive arrays on
//! the same unit continue where the previous one stopped.  A package that
//! fails partway through a data file must not leave the file advanced for
//! the next package, so [`OpenUnits::begin_package`] marks where every
//! reader stands and [`OpenUnits::rewind_package`] puts them back.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use mf_core::UnitNumber;

use crate::{ExternalUnitTable, InputError, InputResult, LineSource, Location};

/// Where an array's values are read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnitTarget {
    Inline,
    External(UnitNumber),
}

/// Readers for data units opened so far.
#[derive(Debug, Default)]
pub struct OpenUnits {
    readers: HashMap<UnitNumber, LineSource>,
    /// Line each reader stood at when the current package first touched it.
    marks:   HashMap<UnitNumber, usize>,
    /// Lines to skip when a rewound unit is next opened.
    resume:  HashMap<UnitNumber, usize>,
}

impl OpenUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of data files currently open.
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Start tracking reads for a new package.
    pub fn begin_package(&mut self) {
        self.marks.clear();
    }

    /// Undo the reads made since [`begin_package`](Self::begin_package).
    ///
    /// Touched readers are closed; the next array that names the unit
    /// reopens it at the line where the failed package found it.
    pub fn rewind_package(&mut self) {
        for (unit, line) in self.marks.drain() {
            self.readers.remove(&unit);
            if line > 0 {
                self.resume.insert(unit, line);
            } else {
                self.resume.remove(&unit);
            }
            log::debug!("rewound unit {unit} to line {line}");
        }
    }
}

/// Unit resolution context handed to array readers.
#[derive(Debug)]
pub struct DataUnits<'a> {
    table:    &'a ExternalUnitTable,
    open:     &'a mut OpenUnits,
    own_unit: Option<UnitNumber>,
}

impl<'a> DataUnits<'a> {
    /// `own_unit` is the unit of the package file being decoded, so a control
    /// record naming it reads inline.
    pub fn new(table: &'a ExternalUnitTable, open: &'a mut OpenUnits, own_unit: Option<UnitNumber>) -> Self {
        Self { table, open, own_unit }
    }

    pub fn own_unit(&self) -> Option<UnitNumber> {
        self.own_unit
    }

    /// Resolve a raw unit number from a control record.
    pub fn resolve(&self, raw: Option<i64>, name: &str, at: &Location) -> InputResult<UnitTarget> {
        let Some(raw) = raw.filter(|&n| n != 0) else {
            return Ok(UnitTarget::Inline);
        };
        let unresolved = || InputError::UnresolvedUnitReference {
            at:   at.clone(),
            name: name.to_owned(),
            unit: raw,
        };
        let unit = UnitNumber::from_raw(raw).ok_or_else(unresolved)?;
        if Some(unit) == self.own_unit {
            return Ok(UnitTarget::Inline);
        }
        if self.table.get(unit).is_some() {
            Ok(UnitTarget::External(unit))
        } else {
            Err(unresolved())
        }
    }

    /// Reader for a resolved external unit, opening its file on first use.
    pub fn reader(&mut self, unit: UnitNumber, name: &str, at: &Location) -> InputResult<&mut LineSource> {
        let open = &mut *self.open;
        match open.readers.entry(unit) {
            Entry::Occupied(e) => {
                let reader = e.into_mut();
                open.marks.entry(unit).or_insert(reader.line_number());
                Ok(reader)
            }
            Entry::Vacant(e) => {
                let entry = self.table.get(unit).ok_or_else(|| InputError::UnresolvedUnitReference {
                    at:   at.clone(),
                    name: name.to_owned(),
                    unit: i64::from(unit.0),
                })?;
                log::debug!("opening {} ({}) for array {name}", entry.filename.display(), unit);
                let mut reader = LineSource::open(&entry.filename)?;
                let skip = open.resume.remove(&unit).unwrap_or(0);
                while reader.line_number() < skip && reader.try_next_line()?.is_some() {}
                open.marks.entry(unit).or_insert(reader.line_number());
                Ok(e.insert(reader))
            }
        }
    }
}
