// File: crates/choropleth-core/src/period.rs
// Summary: "Year ending Dec YYYY" period column detection, ordering and cell coercion.

use std::sync::OnceLock;

use log::warn;
use regex::Regex;

use crate::error::{PipelineError, Result};

fn december_column() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Year ending\s+Dec\s+(\d{4})$").expect("static regex"))
}

/// One December snapshot column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Period {
    pub column: String,
    pub year: u16,
}

impl Period {
    /// `Some` when `column` names a year-ending-December period.
    pub fn parse(column: &str) -> Option<Self> {
        let caps = december_column().captures(column.trim())?;
        let year = caps.get(1)?.as_str().parse().ok()?;
        Some(Self { column: column.to_string(), year })
    }

    /// Frame file stem, e.g. `Year_ending_Dec_2015`.
    pub fn file_stem(&self) -> String {
        self.column.trim().replace(' ', "_")
    }
}

/// Period columns ordered ascending by year.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodSet {
    periods: Vec<Period>,
}

impl PeriodSet {
    /// Scan headers for period columns; fails when none match.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut periods: Vec<Period> = headers.iter().filter_map(|h| Period::parse(h.as_ref())).collect();
        if periods.is_empty() {
            return Err(PipelineError::NoPeriodColumns);
        }
        // stable: columns sharing a year keep their header order
        periods.sort_by_key(|p| p.year);
        for pair in periods.windows(2).filter(|w| w[0].year == w[1].year) {
            warn!("period columns '{}' and '{}' share year {}", pair[0].column, pair[1].column, pair[1].year);
        }
        Ok(Self { periods })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Period> {
        self.periods.iter()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn years(&self) -> Vec<u16> {
        self.periods.iter().map(|p| p.year).collect()
    }

    pub fn get(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    /// Short label for the period at `index`: its year, or the full column
    /// name when another column has the same year.
    pub fn label(&self, index: usize) -> Option<String> {
        let period = self.periods.get(index)?;
        let shared = self.periods.iter().filter(|p| p.year == period.year).count() > 1;
        Some(if shared { period.column.clone() } else { period.year.to_string() })
    }
}

impl<'a> IntoIterator for &'a PeriodSet {
    type Item = &'a Period;
    type IntoIter = std::slice::Iter<'a, Period>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

/// Numeric coercion of one cell: blanks, text and non-finite numbers become null.
pub fn coerce_price(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
