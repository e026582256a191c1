// File: crates/choropleth-core/src/scale.rs
// Summary: Global colour range and log10 value normalisation for choropleth fills.

use crate::error::{PipelineError, Result};

/// Value range shared by every frame so colours are comparable across periods.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorRange {
    pub vmin: f64,
    pub vmax: f64,
}

impl ColorRange {
    /// `vmin` is the smallest positive value, `vmax` the largest value overall.
    /// Nulls and non-finite values are ignored.
    pub fn from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut vmin = f64::INFINITY;
        let mut vmax = f64::NEG_INFINITY;
        for v in values.into_iter().flatten().filter(|v| v.is_finite()) {
            if v > 0.0 {
                vmin = vmin.min(v);
            }
            vmax = vmax.max(v);
        }
        if !vmin.is_finite() || !vmax.is_finite() || vmax <= 0.0 {
            return Err(PipelineError::NoPositiveValues);
        }
        Ok(Self { vmin, vmax })
    }
}

/// Maps values to `[0, 1]` in log10 space.
#[derive(Clone, Copy, Debug)]
pub struct LogNorm {
    pub range: ColorRange,
    // cached log endpoints
    log_min: f64,
    log_max: f64,
}

impl LogNorm {
    pub fn new(range: ColorRange) -> Self {
        let log_min = range.vmin.max(1e-12).log10();
        let log_max = range.vmax.max(range.vmin).max(1e-12).log10();
        Self { range, log_min, log_max }
    }

    /// `None` for values a log scale cannot place (zero, negative, NaN).
    /// Values outside the range are clamped.
    #[inline]
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if !value.is_finite() || value <= 0.0 {
            return None;
        }
        let span = self.log_max - self.log_min;
        if span < 1e-12 {
            return Some(0.5);
        }
        Some(((value.log10() - self.log_min) / span).clamp(0.0, 1.0))
    }
}
