// File: crates/choropleth-core/src/normalize.rs
// Summary: Reconciles join-key and label column names across the price table and boundary set.

use log::{debug, warn};

use crate::boundary::BoundarySet;
use crate::error::{PipelineError, Result};
use crate::table::PriceTable;

/// Canonical region-code column used as the join key.
pub const CODE_COLUMN: &str = "LAD22CD";
/// Canonical region-name column.
pub const NAME_COLUMN: &str = "LAD22NM";

/// Price-table headers that mean "region code" (whitespace variants included).
pub const CODE_ALIASES: [&str; 2] = ["Local authority code", "Local authority code "];
/// Price-table headers that mean "region name".
pub const NAME_ALIASES: [&str; 1] = ["Local authority name"];

/// Boundary column used when the canonical code column is absent.
pub const FALLBACK_CODE_COLUMN: &str = "LAD24CD";
/// Boundary name columns, in preference order.
const BOUNDARY_NAME_COLUMNS: [&str; 2] = [NAME_COLUMN, "LAD24NM"];

/// Where the canonical join key came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySource {
    /// The dataset already used the canonical name.
    Canonical,
    /// A known alias was renamed to the canonical name.
    Alias(String),
    /// Values were copied from an alternate column.
    Fallback(String),
}

/// Trim headers, rename code/name aliases and trim the join-key cells.
pub fn normalize_price_table(table: &mut PriceTable) -> Result<KeySource> {
    let mut source = None;
    for header in table.headers.iter_mut() {
        let raw = header.clone();
        let trimmed = raw.trim();
        if trimmed == CODE_COLUMN {
            *header = CODE_COLUMN.to_string();
            source.get_or_insert(KeySource::Canonical);
        } else if CODE_ALIASES.iter().any(|a| *a == raw || *a == trimmed) {
            *header = CODE_COLUMN.to_string();
            source.get_or_insert(KeySource::Alias(raw));
        } else if NAME_ALIASES.iter().any(|a| *a == raw || *a == trimmed) {
            *header = NAME_COLUMN.to_string();
        } else if trimmed.len() != raw.len() {
            *header = trimmed.to_string();
        }
    }

    let Some(source) = source else {
        return Err(PipelineError::MissingJoinKey {
            dataset: "price table",
            expected: std::iter::once(CODE_COLUMN)
                .chain(CODE_ALIASES)
                .map(|s| format!("'{s}'"))
                .collect(),
        });
    };

    if table.headers.iter().filter(|h| *h == CODE_COLUMN).count() > 1 {
        warn!("price table has several region-code columns; using the first");
    }

    if let Some(ix) = table.column_index(CODE_COLUMN) {
        for row in table.rows.iter_mut() {
            if let Some(cell) = row.get_mut(ix) {
                let trimmed = cell.trim();
                if trimmed.len() != cell.len() {
                    *cell = trimmed.to_string();
                }
            }
        }
    }
    debug!("price table join key from {:?}", source);
    Ok(source)
}

/// Resolve the boundary join key (with the `LAD24CD` fallback) and fill in
/// each region's trimmed code and optional name.
pub fn normalize_boundaries(set: &mut BoundarySet) -> Result<KeySource> {
    let source = if set.has_column(CODE_COLUMN) {
        KeySource::Canonical
    } else if set.has_column(FALLBACK_CODE_COLUMN) {
        warn!(
            "boundary dataset has no '{CODE_COLUMN}' column; copying values from '{FALLBACK_CODE_COLUMN}'"
        );
        KeySource::Fallback(FALLBACK_CODE_COLUMN.to_string())
    } else {
        return Err(PipelineError::MissingJoinKey {
            dataset: "boundary dataset",
            expected: vec![format!("'{CODE_COLUMN}'"), format!("'{FALLBACK_CODE_COLUMN}'")],
        });
    };
    let key_column = match &source {
        KeySource::Fallback(col) => col.clone(),
        _ => CODE_COLUMN.to_string(),
    };

    for region in set.regions.iter_mut() {
        let code = region
            .properties
            .get(&key_column)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        region.properties.insert(CODE_COLUMN.to_string(), code.clone());
        region.code = code;
        region.name = BOUNDARY_NAME_COLUMNS
            .iter()
            .filter_map(|c| region.properties.get(*c))
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string);
    }
    if !set.columns.iter().any(|c| c == CODE_COLUMN) {
        set.columns.push(CODE_COLUMN.to_string());
    }
    Ok(source)
}
