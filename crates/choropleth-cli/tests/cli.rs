// File: crates/choropleth-cli/tests/cli.rs
// Purpose: End-to-end runs of the `choropleth` binary on a three-region fixture.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const PRICES: &str = "\
Local authority code ,Local authority name,Year ending Dec 2015,Year ending Dec 2011,Year ending Mar 2012
E06000001,Hartlepool,120000,100000,99000
E06000002,Middlesbrough,:,130000,1
";

fn boundaries(code_field: &str) -> String {
    let features = (0..3)
        .map(|i| {
            let x0 = 400_000 + 1_000 * i;
            let x1 = x0 + 1_000;
            format!(
                r#"{{"type":"Feature","properties":{{"{code_field}":"E0600000{}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x0},300000],[{x1},300000],[{x1},301000],[{x0},301000],[{x0},300000]]]}}}}"#,
                i + 1
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"EPSG:27700"}}}},"features":[{features}]}}"#
    )
}

struct Fixture {
    tmp: TempDir,
    prices: PathBuf,
    boundaries: PathBuf,
}

impl Fixture {
    fn new(code_field: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let prices = tmp.path().join("prices.csv");
        let bounds = tmp.path().join("lad.geojson");
        fs::write(&prices, PRICES).unwrap();
        fs::write(&bounds, boundaries(code_field)).unwrap();
        Self { tmp, prices, boundaries: bounds }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }

    fn cmd(&self, sub: &str) -> Command {
        let mut cmd = cargo_bin_cmd!("choropleth");
        cmd.current_dir(self.tmp.path())
            .env("RUST_LOG", "warn")
            .arg(sub)
            .arg("--prices")
            .arg(&self.prices)
            .arg("--boundaries")
            .arg(&self.boundaries);
        cmd
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn ticks_prints_pound_labels() {
    cargo_bin_cmd!("choropleth")
        .args(["ticks", "120", "750"])
        .assert()
        .success()
        .stdout(contains("£200").and(contains("£500")).and(contains("£100").not()));
}

#[test]
fn ticks_with_non_positive_bound_prints_none() {
    cargo_bin_cmd!("choropleth")
        .args(["ticks", "-5", "100"])
        .assert()
        .success()
        .stdout(contains("no 1-2-5 ticks"));
}

#[test]
fn export_writes_geojson_and_long_table() {
    let fx = Fixture::new("LAD22CD");
    fx.cmd("export")
        .arg("--geojson")
        .arg(fx.path("out/lad.geojson"))
        .arg("--long-csv")
        .arg(fx.path("out/long.csv"))
        .assert()
        .success()
        .stdout(contains("Saved 3 features"));

    let geojson = fs::read_to_string(fx.path("out/lad.geojson")).unwrap();
    assert!(geojson.contains("\"FeatureCollection\""));
    assert!(geojson.contains("E06000003"));

    let lines = read_lines(&fx.path("out/long.csv"));
    assert_eq!(lines.len(), 1 + 3 * 2);
    assert!(lines.iter().any(|l| l.starts_with("E06000002,Middlesbrough,Year ending Dec 2015,2015,,")));
}

#[test]
fn export_accepts_lad24cd_boundaries() {
    let fx = Fixture::new("LAD24CD");
    fx.cmd("export").assert().success();
    assert!(fx.path("uk_lad_prices.geojson").exists());
    assert!(fx.path("uk_lad_prices_long.csv").exists());
}

#[test]
fn gif_writes_frames_and_animation() {
    let fx = Fixture::new("LAD22CD");
    fx.cmd("gif")
        .arg("--frames-dir")
        .arg(fx.path("frames"))
        .arg("--output")
        .arg(fx.path("prices.gif"))
        .assert()
        .success()
        .stdout(contains("Saved 2 frames"));

    assert!(fx.path("frames/Year_ending_Dec_2011.png").exists());
    assert!(fx.path("frames/Year_ending_Dec_2015.png").exists());
    assert!(!fx.path("frames/Year_ending_Mar_2012.png").exists());
    let gif = fs::read(fx.path("prices.gif")).unwrap();
    assert!(gif.starts_with(b"GIF89a"));
}

#[test]
fn html_writes_interactive_page() {
    let fx = Fixture::new("LAD22CD");
    fx.cmd("html")
        .assert()
        .success()
        .stdout(contains("uk_lad_prices_interactive.html"));

    let page = fs::read_to_string(fx.path("uk_lad_prices_interactive.html")).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("https://cdn.plot.ly/"));
    assert!(page.contains(r#""featureidkey":"properties.LAD22CD""#));
    assert!(page.contains(r#""label":"2011""#) && page.contains(r#""label":"2015""#));
    assert!(!page.contains("Year ending Mar 2012"));
}

#[test]
fn missing_join_key_fails_with_message() {
    let fx = Fixture::new("CTYUA23CD");
    fx.cmd("export")
        .assert()
        .failure()
        .stderr(contains("missing join key").and(contains("LAD24CD")));
}

#[test]
fn missing_input_file_fails() {
    let fx = Fixture::new("LAD22CD");
    cargo_bin_cmd!("choropleth")
        .current_dir(fx.tmp.path())
        .args(["export", "--prices", "nope.csv", "--boundaries"])
        .arg(&fx.boundaries)
        .assert()
        .failure()
        .stderr(contains("nope.csv"));
}
