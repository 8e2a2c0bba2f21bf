//! Length units and the coordinate metadata injected from outside the
//! legacy files (origin, rotation, projection).
//!
//! MODFLOW-88 files carry no georeference at all; the values here come from
//! the loader's caller (typically a model-reference metadata parser).

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

// ── LengthUnit ────────────────────────────────────────────────────────────────

/// `LENUNI`-style length unit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthUnit {
    #[default]
    Undefined,
    Feet,
    Meters,
    Centimeters,
}

impl LengthUnit {
    pub fn code(self) -> i64 {
        match self {
            Self::Undefined   => 0,
            Self::Feet        => 1,
            Self::Meters      => 2,
            Self::Centimeters => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Undefined   => "undefined",
            Self::Feet        => "feet",
            Self::Meters      => "meters",
            Self::Centimeters => "centimeters",
        }
    }
}

impl TryFrom<i64> for LengthUnit {
    type Error = CoreError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Undefined),
            1 => Ok(Self::Feet),
            2 => Ok(Self::Meters),
            3 => Ok(Self::Centimeters),
            other => Err(CoreError::UnknownLengthUnit(other.to_string())),
        }
    }
}

/// Accepts either a numeric code or a name; names are matched on their
/// first letter only (`"m"`, `"meters"`, `"Metres"` are all metres).
impl FromStr for LengthUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Ok(code) = t.parse::<i64>() {
            return LengthUnit::try_from(code);
        }
        match t.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('u') => Ok(Self::Undefined),
            Some('f') => Ok(Self::Feet),
            Some('m') => Ok(Self::Meters),
            Some('c') => Ok(Self::Centimeters),
            _ => Err(CoreError::UnknownLengthUnit(s.to_owned())),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── CoordinateInfo ────────────────────────────────────────────────────────────

/// Georeference for the grid.
///
/// Either corner may be supplied per axis.  The lower-left value wins when
/// both are present; see the grid assembler for the resolution rule.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordinateInfo {
    pub xll:         Option<f64>,
    pub yll:         Option<f64>,
    pub xul:         Option<f64>,
    pub yul:         Option<f64>,
    /// Counter-clockwise rotation about the lower-left corner, degrees.
    pub rotation:    f64,
    pub epsg:        Option<u32>,
    pub proj4:       Option<String>,
    pub length_unit: LengthUnit,
}

impl CoordinateInfo {
    /// Coordinate info anchored at a lower-left corner.
    pub fn lower_left(x: f64, y: f64) -> Self {
        Self { xll: Some(x), yll: Some(y), ..Self::default() }
    }

    /// Coordinate info anchored at an upper-left corner.
    pub fn upper_left(x: f64, y: f64) -> Self {
        Self { xul: Some(x), yul: Some(y), ..Self::default() }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }
}
