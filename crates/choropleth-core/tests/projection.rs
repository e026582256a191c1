// File: crates/choropleth-core/tests/projection.rs
// Purpose: British National Grid projection against the Ordnance Survey worked example, plus CRS parsing.

use choropleth_core::projection::{
    bng_to_wgs84, grid_to_osgb36, osgb36_to_grid, reproject, transform_coord, wgs84_to_bng,
};
use choropleth_core::{Crs, PipelineError};
use geo::{coord, polygon, BoundingRect, MultiPolygon};

fn dms(deg: f64, min: f64, sec: f64) -> f64 {
    (deg + min / 60.0 + sec / 3600.0).to_radians()
}

#[test]
fn os_worked_example_forward() {
    let (e, n) = osgb36_to_grid(dms(52.0, 39.0, 27.2531), dms(1.0, 43.0, 4.5177));
    assert!((e - 651_409.903).abs() < 0.01, "easting {e}");
    assert!((n - 313_177.270).abs() < 0.01, "northing {n}");
}

#[test]
fn os_worked_example_inverse() {
    let (lat, lon) = grid_to_osgb36(651_409.903, 313_177.270);
    let arcsec = (1.0f64 / 3600.0).to_radians();
    assert!((lat - dms(52.0, 39.0, 27.2531)).abs() < 1e-3 * arcsec);
    assert!((lon - dms(1.0, 43.0, 4.5177)).abs() < 1e-3 * arcsec);
}

#[test]
fn wgs84_round_trip_through_grid() {
    for (lon, lat) in [(-0.1281, 51.5080), (-3.1883, 55.9533), (-5.7, 50.07), (1.75, 52.48), (-2.0, 49.9)] {
        let (e, n) = wgs84_to_bng(lon, lat);
        let (lon2, lat2) = bng_to_wgs84(e, n);
        assert!((lon - lon2).abs() < 1e-6, "{lon} -> {lon2}");
        assert!((lat - lat2).abs() < 1e-6, "{lat} -> {lat2}");
    }
}

#[test]
fn trafalgar_square_lands_in_central_london() {
    let (e, n) = wgs84_to_bng(-0.1281, 51.5080);
    assert!((e - 529_960.0).abs() < 1_000.0, "easting {e}");
    assert!((n - 180_480.0).abs() < 1_000.0, "northing {n}");
}

#[test]
fn web_mercator_round_trip() {
    let c = coord! { x: -1.5, y: 53.0 };
    let merc = transform_coord(c, Crs::Wgs84, Crs::WebMercator);
    assert!((merc.x - -166_979.24).abs() < 0.1, "x {}", merc.x);
    let back = transform_coord(merc, Crs::WebMercator, Crs::Wgs84);
    assert!((back.x - c.x).abs() < 1e-9 && (back.y - c.y).abs() < 1e-9);

    let bng = transform_coord(merc, Crs::WebMercator, Crs::BritishNationalGrid);
    let direct = transform_coord(c, Crs::Wgs84, Crs::BritishNationalGrid);
    assert!((bng.x - direct.x).abs() < 1e-3 && (bng.y - direct.y).abs() < 1e-3);
}

#[test]
fn same_or_geographic_crs_is_identity() {
    let c = coord! { x: 400_000.0, y: 300_000.0 };
    assert_eq!(transform_coord(c, Crs::BritishNationalGrid, Crs::BritishNationalGrid), c);
    let g = coord! { x: -1.0, y: 52.0 };
    assert_eq!(transform_coord(g, Crs::Etrs89, Crs::Wgs84), g);
}

#[test]
fn reproject_moves_every_vertex() {
    let mp = MultiPolygon::new(vec![polygon![
        (x: -1.5, y: 53.0),
        (x: -1.48, y: 53.0),
        (x: -1.48, y: 53.02),
        (x: -1.5, y: 53.02),
    ]]);
    let out = reproject(&mp, Crs::Wgs84, Crs::BritishNationalGrid);
    let rect = out.bounding_rect().unwrap();
    // roughly 1.3 km wide and 2.2 km tall near Sheffield
    assert!(rect.min().x > 400_000.0 && rect.max().x < 450_000.0);
    assert!(rect.min().y > 380_000.0 && rect.max().y < 420_000.0);
    assert!((rect.width() - 1_340.0).abs() < 100.0, "width {}", rect.width());
    assert!((rect.height() - 2_225.0).abs() < 100.0, "height {}", rect.height());
}

#[test]
fn crs_names_from_geojson_members() {
    assert_eq!(Crs::from_name("EPSG:27700").unwrap(), Crs::BritishNationalGrid);
    assert_eq!(Crs::from_name("urn:ogc:def:crs:EPSG::27700").unwrap(), Crs::BritishNationalGrid);
    assert_eq!(Crs::from_name("urn:ogc:def:crs:OGC:1.3:CRS84").unwrap(), Crs::Wgs84);
    assert_eq!(Crs::from_name("http://www.opengis.net/def/crs/EPSG/0/4258").unwrap(), Crs::Etrs89);
    assert_eq!(Crs::from_name("EPSG:900913").unwrap(), Crs::WebMercator);
    assert_eq!(Crs::BritishNationalGrid.urn(), "urn:ogc:def:crs:EPSG::27700");
    for crs in [Crs::Wgs84, Crs::Etrs89, Crs::WebMercator, Crs::BritishNationalGrid] {
        assert_eq!(Crs::from_name(&crs.urn()).unwrap(), crs);
    }

    assert!(matches!(Crs::from_name("EPSG:2154"), Err(PipelineError::UnsupportedCrs(s)) if s == "EPSG:2154"));
    assert!(matches!(Crs::from_name("Lambert-93"), Err(PipelineError::UnsupportedCrs(_))));
}
