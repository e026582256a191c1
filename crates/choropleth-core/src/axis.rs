// File: crates/choropleth-core/src/axis.rs
// Summary: Colour-bar axis model with 1-2-5 log ticks and pound-formatted labels.

use crate::scale::{ColorRange, LogNorm};

/// Multipliers tried within every power-of-ten decade.
const NICE_BASES: [f64; 3] = [1.0, 2.0, 5.0];

/// "Nice" ticks for a log10 axis: every `b * 10^e` with `b` in {1, 2, 5}
/// that falls inside `[vmin, vmax]`, ascending and without duplicates.
///
/// Non-positive (or non-finite) bounds have no log scale; the result is then
/// empty and callers fall back to default axis ticks.
pub fn log_ticks(vmin: f64, vmax: f64) -> Vec<f64> {
    if !(vmin.is_finite() && vmax.is_finite()) || vmin <= 0.0 || vmax <= 0.0 {
        return Vec::new();
    }
    let lo = vmin.log10().floor() as i32;
    let hi = vmax.log10().ceil() as i32;

    let mut ticks = Vec::new();
    for e in lo..=hi {
        for b in NICE_BASES {
            let candidate = scale_by_decade(b, e);
            if vmin <= candidate && candidate <= vmax {
                ticks.push(candidate);
            }
        }
    }
    ticks.sort_by(f64::total_cmp);
    ticks.dedup();
    ticks
}

// Negative exponents divide so that e.g. 2e-1 is the correctly rounded 0.2.
#[inline]
fn scale_by_decade(base: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        base * 10f64.powi(exponent)
    } else {
        base / 10f64.powi(-exponent)
    }
}

/// Format a price as whole pounds with thousands separators, e.g. `£250,000`.
pub fn format_pounds(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-£{grouped}")
    } else {
        format!("£{grouped}")
    }
}

/// One labelled colour-bar tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
    /// log10 of `value`, for colour bars laid out in log space.
    pub log_position: f64,
    /// Position along the bar in `[0, 1]`.
    pub fraction: f64,
}

/// Colour legend for a log-scaled choropleth.
#[derive(Clone, Debug)]
pub struct ColorAxis {
    pub label: String,
    pub range: ColorRange,
    pub ticks: Vec<Tick>,
}

impl ColorAxis {
    pub fn new(label: impl Into<String>, range: ColorRange) -> Self {
        let norm = LogNorm::new(range);
        let ticks = log_ticks(range.vmin, range.vmax)
            .into_iter()
            .map(|value| Tick {
                value,
                label: format_pounds(value),
                log_position: value.log10(),
                fraction: norm.normalize(value).unwrap_or(0.0),
            })
            .collect();
        Self { label: label.into(), range, ticks }
    }

    pub fn norm(&self) -> LogNorm {
        LogNorm::new(self.range)
    }

    /// True when no nice tick fits and the sink should use its own ticks.
    pub fn uses_default_ticks(&self) -> bool {
        self.ticks.is_empty()
    }
}
