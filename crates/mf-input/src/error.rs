use std::fmt;
use std::path::PathBuf;

use mf_core::GridShape;
use thiserror::Error;

/// `file:line` of the record an error refers to (1-based line).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("{at}: unexpected end of file while reading {what}")]
    UnexpectedEof { at: Location, what: String },

    #[error("{at}: malformed index entry {text:?}: {reason}")]
    MalformedIndexEntry {
        at:     Location,
        text:   String,
        reason: &'static str,
    },

    #[error("{at}: cannot parse {what}: {reason}")]
    HeaderParse {
        at:     Location,
        what:   &'static str,
        reason: String,
    },

    #[error("{at}: invalid {what} field {token:?}")]
    InvalidField {
        at:    Location,
        what:  String,
        token: String,
    },

    #[error("{at}: array {name} needs {expected} values, found {found}")]
    ArrayShape {
        at:       Location,
        name:     String,
        expected: usize,
        found:    usize,
    },

    #[error("{at}: array {name} refers to unit {unit}, which is not in the unit table")]
    UnresolvedUnitReference {
        at:   Location,
        name: String,
        unit: i64,
    },

    #[error("{at}: array {name} uses unsupported storage (LOCAT = {locat})")]
    UnsupportedArrayFormat {
        at:    Location,
        name:  String,
        locat: i64,
    },

    #[error("{at}: {what}{} has {found} fields, {expected} required", record_suffix(.record))]
    RecordFieldCount {
        at:       Location,
        what:     String,
        record:   Option<usize>,
        expected: usize,
        found:    usize,
    },

    #[error("{at}: {what} asks to reuse the previous value at the first entry")]
    InvalidReuseAtFirstPeriod { at: Location, what: String },

    #[error("{at}: record {record} cell ({layer}, {row}, {col}) is outside grid {shape} (1-based)")]
    CellOutOfBounds {
        at:     Location,
        record: usize,
        layer:  i64,
        row:    i64,
        col:    i64,
        shape:  GridShape,
    },
}

fn record_suffix(record: &Option<usize>) -> String {
    record.map(|r| format!(" record {r}")).unwrap_or_default()
}

pub type InputResult<T> = Result<T, InputError>;
