// File: crates/choropleth-core/src/merge.rs
// Summary: Left join of boundary polygons to price records on the canonical region code.

use std::collections::HashMap;

use geo::MultiPolygon;
use log::{info, warn};

use crate::boundary::RegionGeometry;
use crate::table::PriceRecord;

/// One boundary with its price series. `prices` is aligned with the
/// pipeline's periods; unmatched regions hold `None` everywhere.
#[derive(Clone, Debug)]
pub struct MergedRegion {
    pub code: String,
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
    pub prices: Vec<Option<f64>>,
    pub matched: bool,
}

impl MergedRegion {
    pub fn price(&self, period_index: usize) -> Option<f64> {
        self.prices.get(period_index).copied().flatten()
    }
}

/// Every boundary appears exactly once, in input order. A code repeated in
/// the price table keeps its first record.
pub fn left_join(
    regions: Vec<RegionGeometry>,
    records: Vec<PriceRecord>,
    period_count: usize,
) -> Vec<MergedRegion> {
    let mut by_code: HashMap<String, PriceRecord> = HashMap::with_capacity(records.len());
    let mut duplicates = 0usize;
    for record in records {
        if by_code.contains_key(&record.code) {
            duplicates += 1;
            continue;
        }
        by_code.insert(record.code.clone(), record);
    }
    if duplicates > 0 {
        warn!("{duplicates} price rows repeat an earlier region code; first rows kept");
    }

    let mut unmatched = Vec::new();
    let merged = regions
        .into_iter()
        .map(|region| match by_code.get(&region.code) {
            Some(record) => MergedRegion {
                name: record.name.clone().or(region.name),
                code: region.code,
                geometry: region.geometry,
                prices: record.prices.clone(),
                matched: true,
            },
            None => {
                unmatched.push(region.code.clone());
                MergedRegion {
                    code: region.code,
                    name: region.name,
                    geometry: region.geometry,
                    prices: vec![None; period_count],
                    matched: false,
                }
            }
        })
        .collect::<Vec<_>>();

    if !unmatched.is_empty() {
        warn!(
            "{} regions have no price data: {}",
            unmatched.len(),
            unmatched.iter().take(10).cloned().collect::<Vec<_>>().join(", ")
        );
    }
    info!("merged {} regions ({} with prices)", merged.len(), merged.len() - unmatched.len());
    merged
}
