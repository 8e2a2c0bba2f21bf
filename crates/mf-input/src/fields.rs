//! Field extraction from fixed-column and free-format records.
//!
//! # Fixed or free
//!
//! The legacy program reads most control records with edit descriptors such
//! as `(5I10)` or `(F10.0, I10, F10.0)`, but files touched by later tools
//! are frequently whitespace-separated with the columns no longer aligned.
//! [`Fields::split`] accepts both:
//!
//! ```text
//! free tokens in the record's column span >= fields wanted  → use the tokens
//! otherwise                                                 → slice fixed columns
//! a sliced field has inner blanks                           → tokens of the whole line
//! ```
//!
//! In fixed mode a blank field reads as absent; callers that follow the
//! Fortran "blank is zero" rule apply `unwrap_or(0)` themselves.

use crate::{InputError, InputResult, Location};

/// Slice columns `[start, end)` of `line`, clamped to the line length.
///
/// Lines are expected to be ASCII; a slice that would split a multi-byte
/// character falls back to character positions.
pub fn column(line: &str, start: usize, end: usize) -> &str {
    let len = line.len();
    let (s, e) = (start.min(len), end.min(len));
    if let Some(slice) = line.get(s..e) {
        return slice;
    }
    let mut indices = line.char_indices().map(|(i, _)| i).chain(std::iter::once(len));
    let s = indices.clone().nth(start).unwrap_or(len);
    let e = indices.nth(end).unwrap_or(len).max(s);
    &line[s..e]
}

/// Split on whitespace and commas, dropping empty pieces.
pub fn free_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse an integer field.  A leading `+` is accepted.
pub fn parse_int(tok: &str) -> Option<i64> {
    let t = tok.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<i64>().ok()
}

/// Parse a real field, accepting Fortran `D` exponents (`1.5D-3`).
pub fn parse_real(tok: &str) -> Option<f64> {
    let t = tok.trim();
    if t.is_empty() {
        return None;
    }
    if t.contains(['d', 'D']) {
        t.replace(['d', 'D'], "E").parse::<f64>().ok()
    } else {
        t.parse::<f64>().ok()
    }
}

// ── Fields ────────────────────────────────────────────────────────────────────

/// The fields of one record, with the location used for error reporting.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    tokens: Vec<&'a str>,
    at:     Location,
}

impl<'a> Fields<'a> {
    /// Fixed-or-free split over the column span covered by `widths`.
    pub fn split(line: &'a str, widths: &[usize], at: Location) -> Self {
        let span: usize = widths.iter().sum();
        let region = column(line, 0, span);
        let free = free_tokens(region);
        if free.len() >= widths.len() {
            return Self { tokens: free, at };
        }
        let mut tokens = Vec::with_capacity(widths.len());
        let mut start = 0;
        for &w in widths {
            if start >= line.len() {
                break;
            }
            tokens.push(column(line, start, start + w).trim());
            start += w;
        }
        while tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }
        // A field with inner blanks means the line was never column-aligned.
        if tokens.iter().any(|t| t.contains(char::is_whitespace)) {
            return Self { tokens: free_tokens(line), at };
        }
        Self { tokens, at }
    }

    /// Whitespace/comma split of the whole line.
    pub fn free(line: &'a str, at: Location) -> Self {
        Self { tokens: free_tokens(line), at }
    }

    /// Number of fields present (trailing blanks excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn location(&self) -> &Location {
        &self.at
    }

    /// Raw text of field `i`, if present.
    pub fn text(&self, i: usize) -> Option<&'a str> {
        self.tokens.get(i).copied().filter(|t| !t.is_empty())
    }

    /// Integer field `i`: `Ok(None)` if absent or blank, error if malformed.
    pub fn int(&self, i: usize, what: &str) -> InputResult<Option<i64>> {
        match self.text(i) {
            None => Ok(None),
            Some(t) => parse_int(t).map(Some).ok_or_else(|| self.invalid(what, t)),
        }
    }

    /// Real field `i`: `Ok(None)` if absent or blank, error if malformed.
    pub fn real(&self, i: usize, what: &str) -> InputResult<Option<f64>> {
        match self.text(i) {
            None => Ok(None),
            Some(t) => parse_real(t).map(Some).ok_or_else(|| self.invalid(what, t)),
        }
    }

    /// Fail with [`InputError::RecordFieldCount`] unless `n` fields are present.
    pub fn require(&self, n: usize, what: &str, record: Option<usize>) -> InputResult<()> {
        let found = self.tokens.iter().take(n).filter(|t| !t.is_empty()).count();
        if found < n {
            return Err(self.short(n, what, record));
        }
        Ok(())
    }

    /// Required integer field `i`.
    pub fn req_int(&self, i: usize, what: &str, record: Option<usize>) -> InputResult<i64> {
        self.int(i, what)?.ok_or_else(|| self.short(i + 1, what, record))
    }

    /// Required real field `i`.
    pub fn req_real(&self, i: usize, what: &str, record: Option<usize>) -> InputResult<f64> {
        self.real(i, what)?.ok_or_else(|| self.short(i + 1, what, record))
    }

    /// Parse the first `n` fields as integers for a header record.  Any
    /// missing or malformed field is a [`InputError::HeaderParse`].
    pub fn header_ints(&self, n: usize, what: &'static str) -> InputResult<Vec<i64>> {
        (0..n)
            .map(|i| {
                let t = self.text(i).ok_or_else(|| InputError::HeaderParse {
                    at:     self.at.clone(),
                    what,
                    reason: format!("expected {n} integers, found {i}"),
                })?;
                parse_int(t).ok_or_else(|| InputError::HeaderParse {
                    at:     self.at.clone(),
                    what,
                    reason: format!("field {} ({t:?}) is not an integer", i + 1),
                })
            })
            .collect()
    }

    fn short(&self, expected: usize, what: &str, record: Option<usize>) -> InputError {
        InputError::RecordFieldCount {
            at: self.at.clone(),
            what: what.to_owned(),
            record,
            expected,
            found: self.tokens.iter().filter(|t| !t.is_empty()).count(),
        }
    }

    fn invalid(&self, what: &str, token: &str) -> InputError {
        InputError::InvalidField {
            at:    self.at.clone(),
            what:  what.to_owned(),
            token: token.to_owned(),
        }
    }
}
