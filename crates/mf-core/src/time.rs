//! Time discretization.
//!
//! # Design
//!
//! The Basic package declares one `(PERLEN, NSTP, TSMULT)` triple per stress
//! period.  Step lengths within a period grow geometrically:
//!
//!   dt_1 = PERLEN · (TSMULT − 1) / (TSMULT^NSTP − 1)     (TSMULT ≠ 1)
//!   dt_1 = PERLEN / NSTP                                 (TSMULT = 1)
//!   dt_n = dt_(n−1) · TSMULT
//!
//! These are plain parallel records; the "reuse previous period" shorthand
//! does not apply to them.

use std::fmt;

use crate::CoreError;

// ── TimeUnit ──────────────────────────────────────────────────────────────────

/// The `ITMUNI` code of the Basic package header.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeUnit {
    #[default]
    Undefined,
    Seconds,
    Minutes,
    Hours,
    Days,
    Years,
}

impl TimeUnit {
    pub fn code(self) -> i64 {
        match self {
            Self::Undefined => 0,
            Self::Seconds   => 1,
            Self::Minutes   => 2,
            Self::Hours     => 3,
            Self::Days      => 4,
            Self::Years     => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Undefined => "unknown",
            Self::Seconds   => "seconds",
            Self::Minutes   => "minutes",
            Self::Hours     => "hours",
            Self::Days      => "days",
            Self::Years     => "years",
        }
    }
}

impl TryFrom<i64> for TimeUnit {
    type Error = CoreError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Undefined),
            1 => Ok(Self::Seconds),
            2 => Ok(Self::Minutes),
            3 => Ok(Self::Hours),
            4 => Ok(Self::Days),
            5 => Ok(Self::Years),
            other => Err(CoreError::UnknownTimeUnit(other)),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── StressPeriod ──────────────────────────────────────────────────────────────

/// One stress period's timing triple.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StressPeriod {
    /// `PERLEN`: period length in model time units.
    pub length:     f64,
    /// `NSTP`: number of time steps.
    pub steps:      u32,
    /// `TSMULT`: step-length multiplier.
    pub multiplier: f64,
}

impl StressPeriod {
    /// Lengths of each time step in this period.  Empty when `steps == 0`.
    pub fn step_lengths(&self) -> Vec<f64> {
        if self.steps == 0 {
            return Vec::new();
        }
        let n = self.steps as i32;
        let first = if (self.multiplier - 1.0).abs() < f64::EPSILON {
            self.length / f64::from(self.steps)
        } else {
            self.length * (self.multiplier - 1.0) / (self.multiplier.powi(n) - 1.0)
        };
        std::iter::successors(Some(first), |dt| Some(dt * self.multiplier))
            .take(self.steps as usize)
            .collect()
    }
}

// ── TimeDiscretization ────────────────────────────────────────────────────────

/// The model's time discretization record.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeDiscretization {
    pub periods:        Vec<StressPeriod>,
    pub time_unit:      TimeUnit,
    /// Simulation start, as supplied by the reference-metadata collaborator
    /// (free-form, e.g. `"1-1-1970"`).  The legacy files carry no date.
    pub start_datetime: Option<String>,
}

impl TimeDiscretization {
    #[inline]
    pub fn nper(&self) -> usize {
        self.periods.len()
    }

    /// Total number of time steps across all periods.
    pub fn total_steps(&self) -> usize {
        self.periods.iter().map(|p| p.steps as usize).sum()
    }

    /// Total simulated time.
    pub fn total_time(&self) -> f64 {
        self.periods.iter().map(|p| p.length).sum()
    }

    /// `(period, step)` pairs in simulation order, 0-based.
    pub fn steps(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.periods
            .iter()
            .enumerate()
            .flat_map(|(per, p)| (0..p.steps as usize).map(move |stp| (per, stp)))
    }
}
