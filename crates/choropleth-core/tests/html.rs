// File: crates/choropleth-core/tests/html.rs
// Purpose: Interactive page contents: embedded boundaries, one animation frame per period and the £ log colour bar.

mod common;

use choropleth_core::html::{HtmlMapSink, PLOTLY_CDN};
use choropleth_core::{BoundarySet, PipelineConfig, PreparedDataset, PriceTable, RenderSink};
use serde_json::Value;

fn dataset(prices: &str) -> PreparedDataset {
    let table = PriceTable::from_reader(prices.as_bytes()).unwrap();
    let set = BoundarySet::from_geojson_str(&common::bng_squares()).unwrap();
    PreparedDataset::prepare(table, set, &PipelineConfig::default()).unwrap()
}

/// The figure object embedded in the page's script.
fn figure(page: &str) -> Value {
    let start = page.find("const figure = ").unwrap() + "const figure = ".len();
    let end = start + page[start..].find(";\nPlotly.newPlot").unwrap();
    serde_json::from_str(&page[start..end].replace("<\\/", "</")).unwrap()
}

fn render(ds: &PreparedDataset, name: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    let mut sink = HtmlMapSink::new(&path, ds).unwrap();
    assert_eq!(sink.id(), "plotly-html");
    ds.render(&mut [&mut sink]).unwrap();
    let page = std::fs::read_to_string(&path).unwrap();
    (dir, page)
}

#[test]
fn page_loads_plotly_and_embeds_frames_per_year() {
    let ds = dataset(common::PRICES_CSV);
    let (_dir, page) = render(&ds, "map/prices.html");
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains(&format!(r#"<script src="{PLOTLY_CDN}""#)));

    let fig = figure(&page);
    let frames = fig["frames"].as_array().unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0]["name"], "Year ending Dec 2011");

    let first = &frames[0]["data"][0];
    assert_eq!(first["locations"], serde_json::json!(["E06000001", "E06000002", "E06000003"]));
    assert!((first["z"][0].as_f64().unwrap() - 5.0).abs() < 1e-12);
    assert_eq!(first["customdata"][1], 130_000.0);
    assert!(first["z"][2].is_null());
    assert_eq!(first["text"][0], "Hartlepool");
    // unmatched region falls back to its code for hover
    assert_eq!(first["text"][2], "E06000003");

    // 2015: Middlesbrough's cell was text, so it is missing
    assert!(frames[1]["data"][0]["z"][1].is_null());

    let steps = fig["layout"]["sliders"][0]["steps"].as_array().unwrap();
    let labels = steps.iter().map(|s| s["label"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(labels, ["2011", "2015"]);
    assert_eq!(steps[1]["args"][0][0], "Year ending Dec 2015");
}

#[test]
fn initial_trace_carries_wgs84_boundaries() {
    let ds = dataset(common::PRICES_CSV);
    let (_dir, page) = render(&ds, "prices.html");
    let fig = figure(&page);
    let trace = &fig["data"][0];
    assert_eq!(trace["featureidkey"], "properties.LAD22CD");
    assert_eq!(trace["geojson"]["crs"]["properties"]["name"], "urn:ogc:def:crs:OGC:1.3:CRS84");
    let features = trace["geojson"]["features"].as_array().unwrap();
    assert_eq!(features.len(), 3);
    let lon = features[0]["geometry"]["coordinates"][0][0][0][0].as_f64().unwrap();
    assert!((-3.0..0.0).contains(&lon), "{lon}");
}

#[test]
fn colour_bar_uses_log_positions_and_pound_labels() {
    let ds = dataset(common::PRICES_CSV);
    let (_dir, page) = render(&ds, "prices.html");
    let coloraxis = &figure(&page)["layout"]["coloraxis"];
    assert_eq!(coloraxis["colorscale"], "Inferno");
    assert!((coloraxis["cmin"].as_f64().unwrap() - 5.0).abs() < 1e-12);
    assert!((coloraxis["cmax"].as_f64().unwrap() - 130_000f64.log10()).abs() < 1e-12);

    let bar = &coloraxis["colorbar"];
    assert_eq!(bar["title"]["text"], "Average house price (log colour scale)");
    assert_eq!(bar["ticktext"], serde_json::json!(["£100,000"]));
    assert!((bar["tickvals"][0].as_f64().unwrap() - 5.0).abs() < 1e-12);
}

#[test]
fn range_without_nice_ticks_leaves_plotly_defaults() {
    let ds = dataset("LAD22CD,Year ending Dec 2012\nE06000001,300000\nE06000002,400000\n");
    let (_dir, page) = render(&ds, "prices.html");
    let bar = &figure(&page)["layout"]["coloraxis"]["colorbar"];
    assert!(bar.get("tickvals").is_none());
    assert!(bar.get("ticktext").is_none());
}

#[test]
fn title_is_escaped_in_head() {
    let ds = dataset(common::PRICES_CSV);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.html");
    let mut sink = HtmlMapSink::new(&path, &ds).unwrap().with_title("Prices </script> & more");
    ds.render(&mut [&mut sink]).unwrap();
    let page = std::fs::read_to_string(&path).unwrap();
    assert!(page.contains("<title>Prices &lt;/script&gt; &amp; more</title>"));
    assert_eq!(page.matches("</script>").count(), 2);
    assert_eq!(figure(&page)["layout"]["title"]["text"], "Prices </script> & more");
}

#[test]
fn page_without_frames_is_an_error() {
    let ds = dataset(common::PRICES_CSV);
    let sink = HtmlMapSink::new("unused.html", &ds).unwrap();
    assert!(sink.page().is_err());
}
