//! Block-centered-flow package: layer types, spacing and per-layer flow
//! properties.
//!
//! # Per-layer decision table
//!
//! Which arrays follow for layer `k` depends on its layer type (the units
//! digit of its code) and on whether the model is transient (`ISS = 0`):
//!
//! | array   | present when                      |
//! |---------|-----------------------------------|
//! | `SF1`   | transient                         |
//! | `TRAN`  | type 0 or 2                       |
//! | `HY`    | type 1 or 3                       |
//! | `BOT`   | type 1 or 3                       |
//! | `VCONT` | `k` is not the bottom layer       |
//! | `SF2`   | transient and type 2 or 3         |
//! | `TOP`   | type 2 or 3                       |
//!
//! [`LayerArrays::for_layer`] is that table; the decoder reads exactly the
//! arrays it names, in the row order above.

use mf_core::{Array2, PackageKind};
use mf_input::fields::{column, parse_int};
use mf_input::{Fields, InputError, InputResult, LineSource, read_1d, read_2d};

use crate::{DecodeContext, DecodeSite, PackageResult, WithSite};

/// Layer codes per line of the `LAYCON` record (`40I2`).
const CODES_PER_LINE: usize = 40;
const CODE_WIDTH: usize = 2;

// ── Layer codes ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerType {
    /// 0: transmissivity constant.
    Confined,
    /// 1: transmissivity varies with head.
    Unconfined,
    /// 2: storage converts, transmissivity constant.
    LimitedConvertible,
    /// 3: storage and transmissivity both convert.
    FullyConvertible,
}

impl LayerType {
    pub fn code(self) -> u8 {
        match self {
            Self::Confined           => 0,
            Self::Unconfined         => 1,
            Self::LimitedConvertible => 2,
            Self::FullyConvertible   => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Confined),
            1 => Some(Self::Unconfined),
            2 => Some(Self::LimitedConvertible),
            3 => Some(Self::FullyConvertible),
            _ => None,
        }
    }

    #[inline]
    pub fn uses_transmissivity(self) -> bool {
        matches!(self, Self::Confined | Self::LimitedConvertible)
    }

    #[inline]
    pub fn converts(self) -> bool {
        matches!(self, Self::LimitedConvertible | Self::FullyConvertible)
    }
}

/// A two-digit `LAYCON` code: tens digit = interblock averaging method,
/// units digit = [`LayerType`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerCode {
    pub averaging:  u8,
    pub layer_type: LayerType,
}

impl LayerCode {
    pub fn from_raw(raw: i64) -> Option<Self> {
        let raw = u8::try_from(raw).ok().filter(|&r| r < 100)?;
        Some(Self { averaging: raw / 10, layer_type: LayerType::from_code(raw % 10)? })
    }

    pub fn raw(self) -> u8 {
        self.averaging * 10 + self.layer_type.code()
    }
}

// ── Decision table ────────────────────────────────────────────────────────────

/// The arrays a layer carries in the file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LayerArrays {
    pub sf1:   bool,
    pub tran:  bool,
    pub hy:    bool,
    pub bot:   bool,
    pub vcont: bool,
    pub sf2:   bool,
    pub top:   bool,
}

impl LayerArrays {
    pub fn for_layer(layer_type: LayerType, transient: bool, bottom_layer: bool) -> Self {
        let tran = layer_type.uses_transmissivity();
        Self {
            sf1:   transient,
            tran,
            hy:    !tran,
            bot:   !tran,
            vcont: !bottom_layer,
            sf2:   transient && layer_type.converts(),
            top:   layer_type.converts(),
        }
    }
}

// ── Package ───────────────────────────────────────────────────────────────────

/// Flow properties of one layer.  Arrays the layer type does not carry are
/// `None`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BcfLayer {
    pub code:  LayerCode,
    /// Primary storage coefficient.
    pub sf1:   Option<Array2<f64>>,
    /// Transmissivity along rows.
    pub tran:  Option<Array2<f64>>,
    /// Hydraulic conductivity along rows.
    pub hy:    Option<Array2<f64>>,
    /// Layer bottom elevation.
    pub bot:   Option<Array2<f64>>,
    /// Vertical conductance to the layer below.
    pub vcont: Option<Array2<f64>>,
    /// Secondary (specific yield) storage coefficient.
    pub sf2:   Option<Array2<f64>>,
    /// Layer top elevation.
    pub top:   Option<Array2<f64>>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockCenteredFlow {
    /// `ISS`: 0 transient, non-zero steady state.
    pub iss:    i64,
    /// Cell-by-cell budget unit (`IBCFCB`), 0 when not saved.
    pub ibcfcb: i64,
    /// Anisotropy factor per layer.
    pub trpy:   Vec<f64>,
    /// Column widths (length `ncol`).
    pub delr:   Vec<f64>,
    /// Row heights (length `nrow`).
    pub delc:   Vec<f64>,
    pub layers: Vec<BcfLayer>,
}

impl BlockCenteredFlow {
    #[inline]
    pub fn is_transient(&self) -> bool {
        self.iss == 0
    }

    pub fn layer_codes(&self) -> impl Iterator<Item = LayerCode> + '_ {
        self.layers.iter().map(|l| l.code)
    }
}

pub fn decode(src: &mut LineSource, ctx: &mut DecodeContext<'_>) -> PackageResult<BlockCenteredFlow> {
    let site = || DecodeSite::new(PackageKind::BlockCenteredFlow);
    let shape = ctx.shape;

    let (iss, ibcfcb) = read_header(src).at_site(site)?;
    let transient = iss == 0;
    let codes = read_layer_codes(src, shape.nlay).at_site(site)?;
    log::debug!(
        "{}: BCF {} with layer codes {:?}",
        src.name(),
        if transient { "transient" } else { "steady state" },
        codes.iter().map(|c| c.raw()).collect::<Vec<_>>()
    );

    let trpy = read_1d::<f64>(src, &mut ctx.units, shape.nlay, "TRPY").at_site(site)?;
    let delr = read_1d::<f64>(src, &mut ctx.units, shape.ncol, "DELR").at_site(site)?;
    let delc = read_1d::<f64>(src, &mut ctx.units, shape.nrow, "DELC").at_site(site)?;

    let mut layers = Vec::new();
    for (k, code) in codes.into_iter().enumerate() {
        let want = LayerArrays::for_layer(code.layer_type, transient, k + 1 == shape.nlay);
        let mut read = |on: bool, name: &str| -> PackageResult<Option<Array2<f64>>> {
            if !on {
                return Ok(None);
            }
            read_2d(src, &mut ctx.units, shape.nrow, shape.ncol, name)
                .map(Some)
                .at_site(|| site().layer(k))
        };
        layers.push(BcfLayer {
            code,
            sf1:   read(want.sf1, "SF1")?,
            tran:  read(want.tran, "TRAN")?,
            hy:    read(want.hy, "HY")?,
            bot:   read(want.bot, "BOT")?,
            vcont: read(want.vcont, "VCONT")?,
            sf2:   read(want.sf2, "SF2")?,
            top:   read(want.top, "TOP")?,
        });
    }

    Ok(BlockCenteredFlow { iss, ibcfcb, trpy, delr, delc, layers })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn read_header(src: &mut LineSource) -> InputResult<(i64, i64)> {
    let line = src.next_line("ISS IBCFCB")?;
    let fields = Fields::split(column(&line, 0, 20), &[10, 10], src.location());
    Ok((fields.int(0, "ISS")?.unwrap_or(0), fields.int(1, "IBCFCB")?.unwrap_or(0)))
}

/// `LAYCON`: two columns per layer, blanks read as `0`, 40 per line.
fn read_layer_codes(src: &mut LineSource, nlay: usize) -> InputResult<Vec<LayerCode>> {
    let mut codes = Vec::new();
    let mut line = String::new();
    for k in 0..nlay {
        let slot = k % CODES_PER_LINE;
        if slot == 0 {
            line = src.next_line("layer codes (LAYCON)")?;
        }
        let start = slot * CODE_WIDTH;
        let raw = column(&line, start, start + CODE_WIDTH).replace(' ', "0");
        let value = if raw.is_empty() { Some(0) } else { parse_int(&raw) };
        let code = value.and_then(LayerCode::from_raw).ok_or_else(|| InputError::InvalidField {
            at:    src.location(),
            what:  format!("layer code for layer {}", k + 1),
            token: raw.clone(),
        })?;
        codes.push(code);
    }
    Ok(codes)
}
