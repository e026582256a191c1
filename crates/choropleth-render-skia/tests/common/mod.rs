// File: crates/choropleth-render-skia/tests/common/mod.rs
// Purpose: Small prepared dataset (three grid squares, one without prices) and compact frame options.

#![allow(dead_code)]

use choropleth_core::{BoundarySet, PipelineConfig, PreparedDataset, PriceTable};
use choropleth_render_skia::FrameOptions;

pub const PRICES_CSV: &str = "\
LAD22CD,LAD22NM,Year ending Dec 2011,Year ending Dec 2015
E06000001,Hartlepool,100000,120000
E06000002,Middlesbrough,130000,
";

fn square(i: usize) -> String {
    let x0 = 400_000 + 1_000 * i;
    let x1 = x0 + 1_000;
    format!(
        r#"{{"type":"Feature","properties":{{"LAD22CD":"E0600000{}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x0},300000],[{x1},300000],[{x1},301000],[{x0},301000],[{x0},300000]]]}}}}"#,
        i + 1
    )
}

pub fn boundaries_geojson() -> String {
    let features = (0..3).map(square).collect::<Vec<_>>().join(",");
    format!(
        r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::27700"}}}},"features":[{features}]}}"#
    )
}

pub fn dataset() -> PreparedDataset {
    let table = PriceTable::from_reader(PRICES_CSV.as_bytes()).expect("prices");
    let set = BoundarySet::from_geojson_str(&boundaries_geojson()).expect("boundaries");
    PreparedDataset::prepare(table, set, &PipelineConfig::default()).expect("prepare")
}

/// 300 x 240 frame without text, so pixels do not depend on installed fonts.
pub fn small_opts() -> FrameOptions {
    FrameOptions { width: 300, height: 240, draw_labels: false, ..FrameOptions::default() }
}

/// Pixel centres of the three squares in `small_opts` frames.
pub const SQUARE_CENTRES: [(u32, u32); 3] = [(57, 120), (135, 120), (213, 120)];
