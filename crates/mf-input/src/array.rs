//! Layered-array primitive (the legacy `U1DREL`/`U2DREL`/`U2DINT` readers).
//!
//! Each array starts with a control record:
//!
//! ```text
//! cols  0..10   LOCAT   0 = constant, >0 = unit holding the values, <0 = binary
//! cols 10..20   CNSTNT  the constant, or a multiplier when non-zero
//! cols 20..40   FMTIN   edit descriptor, e.g. (10F10.0); blank = free format
//! cols 40..50   IPRN    print code (kept, not interpreted)
//! ```
//!
//! Free keyword forms are accepted as well:
//!
//! ```text
//! CONSTANT  2.5
//! INTERNAL  1.0  (FREE)  -1
//! EXTERNAL  40   1.0  (10F10.0)  3
//! ```
//!
//! A 3-D array is a sequence of independent layer arrays, each with its own
//! control record.

use std::fmt::Debug;

use mf_core::{Array2, Array3, GridShape, layer_from_vec, stack_layers};

use crate::fields::{column, free_tokens, parse_int, parse_real};
use crate::format::ValueFormat;
use crate::units::{DataUnits, UnitTarget};
use crate::{InputError, InputResult, LineSource, Location};

// ── ArrayValue ────────────────────────────────────────────────────────────────

/// Numeric cell type an array can hold.
pub trait ArrayValue: Copy + Default + PartialEq + Debug {
    /// Human-readable kind for diagnostics.
    const KIND: &'static str;

    /// Parse one listed value.
    fn parse_value(tok: &str) -> Option<Self>;

    /// Multiply by a non-zero control-record constant.
    fn scale(self, factor: Self) -> Self;

    fn is_zero(self) -> bool {
        self == Self::default()
    }
}

impl ArrayValue for f64 {
    const KIND: &'static str = "real";

    fn parse_value(tok: &str) -> Option<Self> {
        parse_real(tok)
    }

    fn scale(self, factor: Self) -> Self {
        self * factor
    }
}

impl ArrayValue for i32 {
    const KIND: &'static str = "integer";

    /// Integers; a real with no fractional part (`1.`, `3.0E0`) is accepted
    /// too since hand-edited constants often carry a decimal point.
    fn parse_value(tok: &str) -> Option<Self> {
        if let Some(n) = parse_int(tok) {
            return i32::try_from(n).ok();
        }
        let x = parse_real(tok)?;
        (x.fract() == 0.0 && x.abs() <= f64::from(i32::MAX)).then_some(x as i32)
    }

    fn scale(self, factor: Self) -> Self {
        self.saturating_mul(factor)
    }
}

// ── Control record ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
enum Storage {
    Constant,
    /// Values follow; `unit` is the raw LOCAT (`None` for `INTERNAL`).
    Listed { unit: Option<i64> },
}

#[derive(Clone, Debug, PartialEq)]
struct ControlRecord<T> {
    storage: Storage,
    cnstnt:  T,
    format:  ValueFormat,
}

fn read_control<T: ArrayValue>(src: &mut LineSource, name: &str) -> InputResult<ControlRecord<T>> {
    let line = src.next_line(&format!("control record for array {name}"))?;
    let at = src.location();
    let record = parse_control(&line, name, &at)?;
    log::trace!("{at}: array {name} ({}): {:?}", T::KIND, record);
    Ok(record)
}

fn parse_control<T: ArrayValue>(line: &str, name: &str, at: &Location) -> InputResult<ControlRecord<T>> {
    let invalid = |what: &str, token: &str| InputError::InvalidField {
        at:    at.clone(),
        what:  format!("{what} of array {name}"),
        token: token.to_owned(),
    };
    let constant = |tok: Option<&str>| -> InputResult<T> {
        match tok.map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(T::default()),
            Some(t) => T::parse_value(t).ok_or_else(|| invalid("CNSTNT", t)),
        }
    };

    // Free keyword forms.
    let (head, fmt_text) = split_format(line);
    let tokens = free_tokens(head);
    if let Some(first) = tokens.first() {
        match first.to_ascii_uppercase().as_str() {
            "CONSTANT" => {
                let tok = tokens.get(1).copied().ok_or_else(|| InputError::RecordFieldCount {
                    at:       at.clone(),
                    what:     format!("CONSTANT record of array {name}"),
                    record:   None,
                    expected: 2,
                    found:    tokens.len(),
                })?;
                return Ok(ControlRecord {
                    storage: Storage::Constant,
                    cnstnt:  constant(Some(tok))?,
                    format:  ValueFormat::Free,
                });
            }
            "INTERNAL" => {
                return Ok(ControlRecord {
                    storage: Storage::Listed { unit: None },
                    cnstnt:  constant(tokens.get(1).copied())?,
                    format:  fmt_text.map(ValueFormat::parse).unwrap_or_default(),
                });
            }
            "EXTERNAL" => {
                let unit_tok = tokens.get(1).copied().unwrap_or_default();
                let unit = parse_int(unit_tok).ok_or_else(|| invalid("unit", unit_tok))?;
                return Ok(ControlRecord {
                    storage: Storage::Listed { unit: Some(unit) },
                    cnstnt:  constant(tokens.get(2).copied())?,
                    format:  fmt_text.map(ValueFormat::parse).unwrap_or_default(),
                });
            }
            _ => {}
        }
    }

    // LOCAT CNSTNT FMTIN IPRN: fixed columns when the first ten columns hold
    // an integer, whitespace-separated fields otherwise.
    let (locat_tok, cnstnt_tok, format) = match parse_int(column(line, 0, 10)) {
        Some(_) => (
            column(line, 0, 10),
            Some(column(line, 10, 20)),
            ValueFormat::parse(column(line, 20, 40)),
        ),
        None => (
            tokens.first().copied().unwrap_or_default(),
            tokens.get(1).copied(),
            fmt_text.map(ValueFormat::parse).unwrap_or_default(),
        ),
    };
    let locat = parse_int(locat_tok).ok_or_else(|| invalid("LOCAT", locat_tok))?;
    let cnstnt = constant(cnstnt_tok)?;

    let storage = match locat {
        0 => Storage::Constant,
        n if n > 0 => Storage::Listed { unit: Some(n) },
        n => {
            return Err(InputError::UnsupportedArrayFormat {
                at:    at.clone(),
                name:  name.to_owned(),
                locat: n,
            });
        }
    };
    Ok(ControlRecord { storage, cnstnt, format })
}

/// Split off a parenthesised format, if any: `("0 1.0 ", Some("(10F10.0)"))`.
fn split_format(line: &str) -> (&str, Option<&str>) {
    match (line.find('('), line.rfind(')')) {
        (Some(open), Some(close)) if close > open => (&line[..open], Some(&line[open..=close])),
        _ => (line, None),
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read a 1-D array of `n` values (`DELR`, `DELC`, `TRPY`).
pub fn read_1d<T: ArrayValue>(
    src: &mut LineSource,
    units: &mut DataUnits<'_>,
    n: usize,
    name: &str,
) -> InputResult<Vec<T>> {
    read_block(src, units, 1, n, name)
}

/// Read one `nrow × ncol` layer array.
pub fn read_2d<T: ArrayValue>(
    src: &mut LineSource,
    units: &mut DataUnits<'_>,
    nrow: usize,
    ncol: usize,
    name: &str,
) -> InputResult<Array2<T>> {
    let values = read_block(src, units, nrow, ncol, name)?;
    let found = values.len();
    layer_from_vec(nrow, ncol, values)
        .map_err(|_| shape_error(src, name, nrow.saturating_mul(ncol), found))
}

/// Read a full-grid array as `nlay` independent layer arrays.
pub fn read_3d<T: ArrayValue>(
    src: &mut LineSource,
    units: &mut DataUnits<'_>,
    shape: GridShape,
    name: &str,
) -> InputResult<Array3<T>> {
    let mut layers = Vec::new();
    for k in 0..shape.nlay {
        let layer_name = format!("{name} layer {}", k + 1);
        layers.push(read_2d(src, units, shape.nrow, shape.ncol, &layer_name)?);
    }
    stack_layers(shape.nrow, shape.ncol, &layers).map_err(|_| {
        let expected = shape.checked_ncells().unwrap_or(usize::MAX);
        shape_error(src, name, expected, layers.len() * shape.ncpl())
    })
}

// ── Readers ───────────────────────────────────────────────────────────────────

fn read_block<T: ArrayValue>(
    src: &mut LineSource,
    units: &mut DataUnits<'_>,
    nrow: usize,
    ncol: usize,
    name: &str,
) -> InputResult<Vec<T>> {
    let control = read_control::<T>(src, name)?;
    let n = nrow.checked_mul(ncol).ok_or_else(|| shape_error(src, name, usize::MAX, 0))?;

    let unit = match control.storage {
        Storage::Constant => return Ok(vec![control.cnstnt; n]),
        Storage::Listed { unit } => unit,
    };
    let target = units.resolve(unit, name, &src.location())?;

    let mut values: Vec<T> = match target {
        UnitTarget::Inline => read_values(src, control.format, nrow, ncol, name)?,
        UnitTarget::External(u) => {
            let at = src.location();
            let data = units.reader(u, name, &at)?;
            read_values(data, control.format, nrow, ncol, name)?
        }
    };
    if !control.cnstnt.is_zero() {
        for v in &mut values {
            *v = v.scale(control.cnstnt);
        }
    }
    Ok(values)
}

fn read_values<T: ArrayValue>(
    src: &mut LineSource,
    format: ValueFormat,
    nrow: usize,
    ncol: usize,
    name: &str,
) -> InputResult<Vec<T>> {
    match format {
        ValueFormat::Free => read_free(src, nrow * ncol, name),
        ValueFormat::Fixed { per_line, width } => {
            let mut out = Vec::new();
            for _ in 0..nrow {
                read_fixed_row(src, &mut out, ncol, per_line, width, name)?;
            }
            Ok(out)
        }
    }
}

/// Free format: `n` tokens across as many lines as needed; `r*v` repeats `v`
/// `r` times.  The final line must not carry more values than needed.
fn read_free<T: ArrayValue>(src: &mut LineSource, n: usize, name: &str) -> InputResult<Vec<T>> {
    let mut out = Vec::new();
    while out.len() < n {
        let Some(line) = src.try_next_line()? else {
            return Err(shape_error(src, name, n, out.len()));
        };
        let mut surplus: usize = 0;
        for tok in free_tokens(&line) {
            let (repeat, text) = split_repeat(tok);
            let value = T::parse_value(text).ok_or_else(|| InputError::InvalidField {
                at:    src.location(),
                what:  format!("{} value of array {name}", T::KIND),
                token: tok.to_owned(),
            })?;
            let room = n - out.len();
            let take = repeat.min(room);
            out.extend(std::iter::repeat_n(value, take));
            surplus = surplus.saturating_add(repeat - take);
        }
        if surplus > 0 {
            return Err(shape_error(src, name, n, n.saturating_add(surplus)));
        }
    }
    Ok(out)
}

/// Fixed format: one row of `ncol` values starting on a new line, at most
/// `per_line` fields of `width` columns per line.  A line that ends early
/// ends that line's contribution; blank fields inside the line read as 0.
fn read_fixed_row<T: ArrayValue>(
    src: &mut LineSource,
    out: &mut Vec<T>,
    ncol: usize,
    per_line: usize,
    width: usize,
    name: &str,
) -> InputResult<()> {
    let target = out.len() + ncol;
    while out.len() < target {
        let Some(line) = src.try_next_line()? else {
            return Err(shape_error(src, name, target, out.len()));
        };
        let wanted = per_line.min(target - out.len());
        let mut used = 0;
        for f in 0..wanted {
            let start = f * width;
            if start >= line.len() {
                break;
            }
            let text = column(&line, start, start + width).trim();
            let value = if text.is_empty() {
                T::default()
            } else {
                T::parse_value(text).ok_or_else(|| InputError::InvalidField {
                    at:    src.location(),
                    what:  format!("{} value of array {name}", T::KIND),
                    token: text.to_owned(),
                })?
            };
            out.push(value);
            used = start + width;
        }
        let rest = free_tokens(column(&line, used.max(wanted * width), line.len()));
        if !rest.is_empty() {
            return Err(shape_error(src, name, target, target + rest.len()));
        }
    }
    Ok(())
}

/// `3*1.5` → `(3, "1.5")`; anything else → `(1, tok)`.
fn split_repeat(tok: &str) -> (usize, &str) {
    if let Some((count, value)) = tok.split_once('*') {
        if let Some(r) = parse_int(count).and_then(|r| usize::try_from(r).ok()) {
            return (r, value);
        }
    }
    (1, tok)
}

fn shape_error(src: &LineSource, name: &str, expected: usize, found: usize) -> InputError {
    InputError::ArrayShape {
        at: src.location(),
        name: name.to_owned(),
        expected,
        found,
    }
}
