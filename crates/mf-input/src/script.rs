//! Script (name-table) reader.
//!
//! # Format
//!
//! One entry per informative line; `#` starts a comment.
//!
//! ```text
//! # kind  unit  file
//! BAS       1   model.bas
//! BCF      11   model.bcf
//! WEL      12   model.wel
//! DATA     40   heads.dat      # data-only file for array indirection
//! LIST      6   model.lst
//! ```
//!
//! The `BAS` entry is filed under the symbolic Basic key; all other entries
//! under their unit number.  Tokens after the filename are ignored.
//! Filenames are resolved against the workspace directory.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use mf_core::{PackageKind, UnitNumber};

use crate::fields::{free_tokens, parse_int};
use crate::{InputError, InputResult, Location};

// ── FileKind ──────────────────────────────────────────────────────────────────

/// What an entry's file holds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileKind {
    Package(PackageKind),
    /// Array data referenced by control records (`LOCAT` indirection).
    Data,
    /// Listing / head / drawdown / budget output files.
    Output(String),
    Other(String),
}

impl FileKind {
    pub fn from_keyword(word: &str) -> Self {
        let upper = word.to_ascii_uppercase();
        if let Ok(kind) = upper.parse::<PackageKind>() {
            return FileKind::Package(kind);
        }
        match upper.as_str() {
            "DATA" | "DATA(BINARY)" => FileKind::Data,
            "LIST" | "HEAD" | "HDS" | "DDN" | "DRAWDOWN" | "CBC" | "BUD" => FileKind::Output(upper),
            _ => FileKind::Other(upper),
        }
    }

    #[inline]
    pub fn is_package(&self) -> bool {
        matches!(self, FileKind::Package(_))
    }

    pub fn package(&self) -> Option<PackageKind> {
        match self {
            FileKind::Package(k) => Some(*k),
            _ => None,
        }
    }
}

// ── ExternalUnitEntry / ExternalUnitTable ────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalUnitEntry {
    pub unit:     UnitNumber,
    pub filename: PathBuf,
    pub kind:     FileKind,
}

/// Unit number → file mapping built from the script file.
///
/// Entries are *consumed*: the loader pops each package entry as it decodes
/// it, so an entry is used at most once.  Data and output entries stay.
#[derive(Clone, Debug, Default)]
pub struct ExternalUnitTable {
    basic: Option<ExternalUnitEntry>,
    units: BTreeMap<UnitNumber, ExternalUnitEntry>,
}

impl ExternalUnitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// File an entry under its key, returning any entry it replaced.
    pub fn insert(&mut self, entry: ExternalUnitEntry) -> Option<ExternalUnitEntry> {
        if entry.kind == FileKind::Package(PackageKind::Basic) {
            self.basic.replace(entry)
        } else {
            self.units.insert(entry.unit, entry)
        }
    }

    pub fn basic(&self) -> Option<&ExternalUnitEntry> {
        self.basic.as_ref()
    }

    /// Remove and return the Basic entry.
    pub fn pop_basic(&mut self) -> Option<ExternalUnitEntry> {
        self.basic.take()
    }

    pub fn get(&self, unit: UnitNumber) -> Option<&ExternalUnitEntry> {
        self.units.get(&unit)
    }

    /// Remove and return the entry for `unit`.
    pub fn pop(&mut self, unit: UnitNumber) -> Option<ExternalUnitEntry> {
        self.units.remove(&unit)
    }

    /// All numeric-keyed entries in unit order.
    pub fn iter(&self) -> impl Iterator<Item = &ExternalUnitEntry> {
        self.units.values()
    }

    /// Package entries still present (the Basic entry included).
    pub fn package_entries(&self) -> impl Iterator<Item = &ExternalUnitEntry> {
        self.basic.iter().chain(self.units.values().filter(|e| e.kind.is_package()))
    }

    pub fn len(&self) -> usize {
        self.units.len() + usize::from(self.basic.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse a script file.  Filenames resolve against `workspace`, or the
/// script's own directory when `workspace` is `None`.
pub fn parse_script_file(path: &Path, workspace: Option<&Path>) -> InputResult<ExternalUnitTable> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ws = match workspace {
        Some(ws) => ws.to_path_buf(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    parse_script_reader(BufReader::new(file), &path.display().to_string(), &ws)
}

/// Like [`parse_script_file`] but reads from any buffered source.
pub fn parse_script_reader<R: BufRead>(
    reader: R,
    name: &str,
    workspace: &Path,
) -> InputResult<ExternalUnitTable> {
    let mut table = ExternalUnitTable::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| InputError::Io { path: name.into(), source })?;
        let at = Location { file: name.to_owned(), line: idx + 1 };
        let Some(entry) = parse_entry(&line, &at, workspace)? else {
            continue;
        };
        if let Some(old) = table.insert(entry) {
            log::warn!(
                "{at}: {} entry for {} replaces {}",
                old.kind.package().map_or("file", PackageKind::keyword),
                old.unit,
                old.filename.display()
            );
        }
    }

    log::debug!("{name}: {} unit entries", table.len());
    Ok(table)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_entry(line: &str, at: &Location, workspace: &Path) -> InputResult<Option<ExternalUnitEntry>> {
    let content = line.split('#').next().unwrap_or_default();
    let tokens = free_tokens(content);
    let Some((&key, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let malformed = |reason| InputError::MalformedIndexEntry {
        at: at.clone(),
        text: line.trim().to_owned(),
        reason,
    };

    if rest.len() < 2 {
        return Err(malformed("expected a unit number and a filename after the file kind"));
    }
    let unit = parse_int(rest[0])
        .and_then(UnitNumber::from_raw)
        .ok_or_else(|| malformed("unit number must be a positive integer"))?;

    Ok(Some(ExternalUnitEntry {
        unit,
        filename: workspace.join(rest[1]),
        kind: FileKind::from_keyword(key),
    }))
}
