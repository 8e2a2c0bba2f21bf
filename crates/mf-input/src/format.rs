//! `FMTIN` edit descriptors of array control records.
//!
//! Only the repeat-count form the legacy arrays use is recognised:
//!
//! ```text
//! (10F10.0)  (8E10.3)  (1P5G14.6)  (20I4)  (F10.0)
//! ```
//!
//! Anything else (blank, `(FREE)`, list-directed `*`, multi-group formats)
//! falls back to free-format reading.

/// How explicit array values are laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ValueFormat {
    /// Whitespace/comma separated, `n*value` repeats allowed, rows may span
    /// lines freely.
    #[default]
    Free,
    /// `per_line` fields of `width` columns; each row starts a new line.
    Fixed { per_line: usize, width: usize },
}

impl ValueFormat {
    /// Parse a `FMTIN` string.
    pub fn parse(fmtin: &str) -> Self {
        let t = fmtin.trim();
        let inner = t
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(t)
            .trim()
            .to_ascii_uppercase();
        match parse_descriptor(&inner) {
            Some(fmt) => fmt,
            None => {
                if !inner.is_empty() && inner != "FREE" && inner != "*" {
                    log::trace!("format {fmtin:?} not recognised; reading free-format");
                }
                ValueFormat::Free
            }
        }
    }
}

fn parse_descriptor(s: &str) -> Option<ValueFormat> {
    let s = strip_scale_factor(s);
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let per_line = if digits_end == 0 { 1 } else { s[..digits_end].parse().ok()? };
    let rest = &s[digits_end..];

    let mut chars = rest.chars();
    let letter = chars.next()?;
    if !matches!(letter, 'F' | 'E' | 'G' | 'D' | 'I') {
        return None;
    }
    let spec = chars.as_str();
    let width_str = spec.split('.').next()?;
    let width: usize = width_str.parse().ok()?;
    if let Some(decimals) = spec.split('.').nth(1) {
        decimals.parse::<usize>().ok()?;
    }
    if per_line == 0 || width == 0 {
        return None;
    }
    Some(ValueFormat::Fixed { per_line, width })
}

/// Drop a leading `kP` scale factor (`1P10E12.4` → `10E12.4`).
fn strip_scale_factor(s: &str) -> &str {
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    match s[digits_end..].strip_prefix('P') {
        Some(rest) if digits_end > 0 => rest.trim_start_matches(',').trim_start(),
        _ => s,
    }
}
