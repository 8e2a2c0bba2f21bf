//! Stress-period primitive.
//!
//! Transient quantities are decoded period by period.  Each period's control
//! record carries one flag per quantity; a negative flag means "same as the
//! previous period".  Reused periods share the previous period's value
//! through an [`Arc`], so reuse is observable with [`TransientSeries::is_reused`]
//! and costs no copy.

use std::sync::Arc;

use crate::fields::Fields;
use crate::{InputError, InputResult, LineSource, Location};

// ── TransientSeries ───────────────────────────────────────────────────────────

/// One value per entry (stress period or time step), 0-based and contiguous.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransientSeries<T> {
    entries: Vec<Arc<T>>,
}

/// A series indexed by stress period.
pub type StressPeriodSeries<T> = TransientSeries<T>;

impl<T> TransientSeries<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|e| e.as_ref())
    }

    /// The shared handle, for callers that want to keep a value alive.
    pub fn get_shared(&self, index: usize) -> Option<&Arc<T>> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| e.as_ref())
    }

    /// `true` when entry `index` is the same value as entry `index − 1`.
    pub fn is_reused(&self, index: usize) -> bool {
        match (index.checked_sub(1).and_then(|p| self.entries.get(p)), self.entries.get(index)) {
            (Some(prev), Some(cur)) => Arc::ptr_eq(prev, cur),
            _ => false,
        }
    }

    /// Number of distinct decoded values.
    pub fn distinct_count(&self) -> usize {
        (0..self.entries.len()).filter(|&i| !self.is_reused(i)).count()
    }
}

impl<T> Default for TransientSeries<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

// ── SeriesBuilder ─────────────────────────────────────────────────────────────

/// Accumulates a [`TransientSeries`] one entry at a time.
#[derive(Debug)]
pub struct SeriesBuilder<T> {
    what:    String,
    entries: Vec<Arc<T>>,
}

impl<T> SeriesBuilder<T> {
    /// `what` names the quantity in errors (`"recharge flux"`).
    pub fn new(what: impl Into<String>) -> Self {
        Self { what: what.into(), entries: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a freshly decoded value.
    pub fn push(&mut self, value: T) {
        self.entries.push(Arc::new(value));
    }

    /// Append a reference to the previous entry.
    pub fn reuse_previous(&mut self, at: &Location) -> InputResult<()> {
        let prev = self.entries.last().cloned().ok_or_else(|| InputError::InvalidReuseAtFirstPeriod {
            at:   at.clone(),
            what: self.what.clone(),
        })?;
        self.entries.push(prev);
        Ok(())
    }

    /// Apply one control flag: negative reuses, anything else calls `read`
    /// with the flag and appends its result.
    pub fn step<F>(&mut self, flag: i64, at: &Location, read: F) -> InputResult<()>
    where
        F: FnOnce(i64) -> InputResult<T>,
    {
        if flag < 0 {
            self.reuse_previous(at)
        } else {
            let value = read(flag)?;
            self.push(value);
            Ok(())
        }
    }

    pub fn finish(self) -> TransientSeries<T> {
        TransientSeries { entries: self.entries }
    }
}

// ── Control flags ─────────────────────────────────────────────────────────────

/// Read one per-period flag record of `required` integer fields (`I10` each)
/// followed by up to `optional` more.  Absent optional flags read as 0.
pub fn read_flags(
    src: &mut LineSource,
    required: usize,
    optional: usize,
    what: &str,
) -> InputResult<(Vec<i64>, Location)> {
    let line = src.next_line(what)?;
    let at = src.location();
    let widths = vec![10; required + optional];
    let fields = Fields::split(&line, &widths, at.clone());
    fields.require(required, what, None)?;
    let flags = (0..required + optional)
        .map(|i| fields.int(i, what).map(|v| v.unwrap_or(0)))
        .collect::<InputResult<Vec<_>>>()?;
    Ok((flags, at))
}
