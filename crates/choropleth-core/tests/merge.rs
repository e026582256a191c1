// File: crates/choropleth-core/tests/merge.rs
// Purpose: Left join cardinality, ordering and handling of unmatched or repeated codes.

use std::collections::BTreeMap;

use choropleth_core::{left_join, PriceRecord, RegionGeometry};
use geo::{polygon, MultiPolygon};

fn region(code: &str, x: f64) -> RegionGeometry {
    RegionGeometry {
        code: code.to_string(),
        name: Some(format!("Boundary {code}")),
        properties: BTreeMap::new(),
        geometry: MultiPolygon::new(vec![polygon![
            (x: x, y: 0.0),
            (x: x + 1.0, y: 0.0),
            (x: x + 1.0, y: 1.0),
            (x: x, y: 1.0),
        ]]),
    }
}

fn record(code: &str, prices: &[Option<f64>]) -> PriceRecord {
    PriceRecord { code: code.to_string(), name: Some(format!("Table {code}")), prices: prices.to_vec() }
}

#[test]
fn every_boundary_kept_once_in_input_order() {
    let regions = vec![region("C", 0.0), region("A", 1.0), region("B", 2.0)];
    let records = vec![
        record("A", &[Some(1.0), Some(2.0)]),
        record("Z", &[Some(9.0), Some(9.0)]),
        record("C", &[None, Some(3.0)]),
    ];
    let merged = left_join(regions, records, 2);

    let codes = merged.iter().map(|r| r.code.as_str()).collect::<Vec<_>>();
    assert_eq!(codes, ["C", "A", "B"]);
    assert_eq!(merged[0].prices, vec![None, Some(3.0)]);
    assert_eq!(merged[1].price(1), Some(2.0));
    // price table name wins over the boundary's
    assert_eq!(merged[1].name.as_deref(), Some("Table A"));
}

#[test]
fn unmatched_boundary_is_all_missing() {
    let merged = left_join(vec![region("B", 0.0)], vec![record("A", &[Some(1.0)])], 3);
    assert_eq!(merged.len(), 1);
    assert!(!merged[0].matched);
    assert_eq!(merged[0].prices, vec![None, None, None]);
    assert_eq!(merged[0].name.as_deref(), Some("Boundary B"));
    assert_eq!(merged[0].price(7), None);
}

#[test]
fn repeated_code_keeps_first_record() {
    let merged = left_join(
        vec![region("A", 0.0)],
        vec![record("A", &[Some(1.0)]), record("A", &[Some(2.0)])],
        1,
    );
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].price(0), Some(1.0));
}

#[test]
fn no_boundaries_means_no_rows() {
    let merged = left_join(Vec::new(), vec![record("A", &[Some(1.0)])], 1);
    assert!(merged.is_empty());
}
