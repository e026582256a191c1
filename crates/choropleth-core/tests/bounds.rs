// File: crates/choropleth-core/tests/bounds.rs
// Purpose: Global colour range over all periods and log normalisation behaviour.

use choropleth_core::{ColorRange, LogNorm, PipelineError};

#[test]
fn range_uses_smallest_positive_and_largest_value() {
    let range = ColorRange::from_values([Some(-5.0), Some(0.0), None, Some(100.0), Some(100_000.0)]).unwrap();
    assert_eq!(range, ColorRange { vmin: 100.0, vmax: 100_000.0 });
}

#[test]
fn range_ignores_non_finite() {
    let range = ColorRange::from_values([Some(f64::NAN), Some(250.0), Some(f64::INFINITY), Some(300.0)]).unwrap();
    assert_eq!(range, ColorRange { vmin: 250.0, vmax: 300.0 });
}

#[test]
fn all_missing_or_non_positive_fails() {
    for values in [vec![], vec![None, None], vec![Some(0.0), Some(-1.0), None]] {
        let err = ColorRange::from_values(values).unwrap_err();
        assert!(matches!(err, PipelineError::NoPositiveValues));
    }
}

#[test]
fn single_value_range_maps_to_middle() {
    let range = ColorRange::from_values([Some(42.0)]).unwrap();
    let norm = LogNorm::new(range);
    assert_eq!(norm.normalize(42.0), Some(0.5));
}

#[test]
fn log_norm_places_decades_evenly_and_clamps() {
    let norm = LogNorm::new(ColorRange { vmin: 100.0, vmax: 100_000.0 });
    let at = |v: f64| norm.normalize(v).unwrap();
    assert!(at(100.0).abs() < 1e-12);
    assert!((at(1_000.0) - 1.0 / 3.0).abs() < 1e-12);
    assert!((at(100_000.0) - 1.0).abs() < 1e-12);
    assert_eq!(at(1.0), 0.0);
    assert_eq!(at(1e9), 1.0);
    assert_eq!(norm.normalize(0.0), None);
    assert_eq!(norm.normalize(-10.0), None);
    assert_eq!(norm.normalize(f64::NAN), None);
}
