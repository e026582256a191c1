// File: crates/choropleth-core/tests/common/mod.rs
// Purpose: Shared fixtures: a three-region price table and adjacent square boundaries.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub const PRICES_CSV: &str = "\
Local authority code ,Local authority name,Year ending Dec 2015,Year ending Dec 2011,Year ending Mar 2012,Notes
E06000001,Hartlepool,120000,100000,99000,a
 E06000002 ,Middlesbrough,not available,130000,1,b
";

/// `n` unit squares of `size` side laid out left to right from `origin`.
pub fn square_ring(origin: (f64, f64), size: f64, i: usize) -> Vec<[f64; 2]> {
    let x0 = origin.0 + size * i as f64;
    let (y0, x1, y1) = (origin.1, x0 + size, origin.1 + size);
    vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]
}

/// FeatureCollection of three adjacent squares keyed E06000001..3.
/// `crs` of `None` omits the member; `Some(Value::Null)` writes `"crs": null`.
pub fn squares_geojson(code_field: &str, origin: (f64, f64), size: f64, crs: Option<Value>) -> String {
    let features = (0..3)
        .map(|i| {
            json!({
                "type": "Feature",
                "properties": { code_field: format!("E0600000{}", i + 1), "OBJECTID": i + 1 },
                "geometry": { "type": "Polygon", "coordinates": [square_ring(origin, size, i)] }
            })
        })
        .collect::<Vec<_>>();
    let mut fc = json!({ "type": "FeatureCollection", "features": features });
    if let Some(crs) = crs {
        fc["crs"] = crs;
    }
    fc.to_string()
}

pub fn named_crs(name: &str) -> Value {
    json!({ "type": "name", "properties": { "name": name } })
}

/// Squares on the British National Grid (metres).
pub fn bng_squares() -> String {
    squares_geojson("LAD22CD", (400_000.0, 300_000.0), 1_000.0, Some(named_crs("urn:ogc:def:crs:EPSG::27700")))
}

/// Squares in WGS84 degrees without a `crs` member (RFC 7946 style).
pub fn wgs84_squares() -> String {
    squares_geojson("LAD22CD", (-1.5, 53.0), 0.02, None)
}

pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
