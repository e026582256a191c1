// File: crates/choropleth-core/src/table.rs
// Summary: Delimited price table (header + string cells) and typed per-region price records.

use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::error::{PipelineError, Result};
use crate::normalize::{CODE_COLUMN, NAME_COLUMN};
use crate::period::{coerce_price, PeriodSet};

/// Raw price table as read from CSV. Cells stay as text until period
/// columns are known, so one bad cell never fails the whole load.
#[derive(Clone, Debug, Default)]
pub struct PriceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PriceTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| PipelineError::io(path, e))?;
        let table = Self::from_reader(file)?;
        info!(
            "loaded price table {} ({} rows, {} columns)",
            path.display(),
            table.rows.len(),
            table.headers.len()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(str::to_string).collect::<Vec<_>>();
        debug!("price table headers: {:?}", headers);

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            rows.push(rec.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text, or `None` for short (ragged) rows.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    /// Typed records for every row; prices are aligned with `periods`.
    /// Expects the join key to be normalized already.
    pub fn records(&self, periods: &PeriodSet) -> Result<Vec<PriceRecord>> {
        let code_ix = self
            .column_index(CODE_COLUMN)
            .ok_or_else(|| PipelineError::MissingJoinKey {
                dataset: "price table",
                expected: vec![CODE_COLUMN.to_string()],
            })?;
        let name_ix = self.column_index(NAME_COLUMN);
        let period_ix = periods
            .iter()
            .map(|p| self.column_index(&p.column))
            .collect::<Vec<_>>();

        let mut out = Vec::with_capacity(self.rows.len());
        let mut dirty_cells = 0usize;
        for row in 0..self.rows.len() {
            let code = self.cell(row, code_ix).unwrap_or_default().trim().to_string();
            let name = name_ix
                .and_then(|ix| self.cell(row, ix))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let prices = period_ix
                .iter()
                .map(|ix| {
                    let raw = ix.and_then(|ix| self.cell(row, ix)).unwrap_or_default();
                    let value = coerce_price(raw);
                    if value.is_none() && !raw.trim().is_empty() {
                        dirty_cells += 1;
                    }
                    value
                })
                .collect();
            out.push(PriceRecord { code, name, prices });
        }
        if dirty_cells > 0 {
            info!("{dirty_cells} non-numeric price cells coerced to null");
        }
        Ok(out)
    }
}

/// One region's prices, aligned with the pipeline's ordered periods.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceRecord {
    pub code: String,
    pub name: Option<String>,
    pub prices: Vec<Option<f64>>,
}
