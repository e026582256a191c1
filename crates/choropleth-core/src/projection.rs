// File: crates/choropleth-core/src/projection.rs
// Summary: CRS identification and transforms between WGS84, Web Mercator and the British National Grid.
// Notes:
// - WGS84 <-> OSGB36 uses the Ordnance Survey 7-parameter Helmert transform
//   (metre-level accuracy, ample for 50 m simplification).
// - OSGB36 <-> grid uses the OS Transverse Mercator series.

use geo::{Coord, MapCoords, MultiPolygon};

use crate::error::{PipelineError, Result};

/// Coordinate reference systems the pipeline can read or produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crs {
    /// EPSG:4326, degrees (x = longitude, y = latitude).
    Wgs84,
    /// EPSG:4258, treated as WGS84 at this accuracy.
    Etrs89,
    /// EPSG:3857, metres.
    WebMercator,
    /// EPSG:27700, metres.
    BritishNationalGrid,
}

impl Crs {
    pub fn epsg(self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Etrs89 => 4258,
            Crs::WebMercator => 3857,
            Crs::BritishNationalGrid => 27700,
        }
    }

    pub fn from_epsg(code: u32) -> Result<Self> {
        match code {
            4326 => Ok(Crs::Wgs84),
            4258 => Ok(Crs::Etrs89),
            3857 | 900913 => Ok(Crs::WebMercator),
            27700 => Ok(Crs::BritishNationalGrid),
            other => Err(PipelineError::UnsupportedCrs(format!("EPSG:{other}"))),
        }
    }

    /// Parse CRS names as found in GeoJSON `crs` members:
    /// `EPSG:27700`, `urn:ogc:def:crs:EPSG::27700`, `OGC:CRS84`, ...
    pub fn from_name(name: &str) -> Result<Self> {
        let n = name.trim();
        let upper = n.to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Ok(Crs::Wgs84);
        }
        let code = upper
            .rsplit(|c| c == ':' || c == '/')
            .find(|part| !part.is_empty())
            .and_then(|part| part.parse::<u32>().ok());
        match code {
            Some(code) if upper.contains("EPSG") => Self::from_epsg(code),
            _ => Err(PipelineError::UnsupportedCrs(n.to_string())),
        }
    }

    /// Name for a GeoJSON `crs` member; geographic WGS84 is lon/lat CRS84.
    pub fn urn(self) -> String {
        match self {
            Crs::Wgs84 => "urn:ogc:def:crs:OGC:1.3:CRS84".to_string(),
            other => format!("urn:ogc:def:crs:EPSG::{}", other.epsg()),
        }
    }

    fn is_geographic(self) -> bool {
        matches!(self, Crs::Wgs84 | Crs::Etrs89)
    }
}

// ---- ellipsoids & datum shift ------------------------------------------------

#[derive(Clone, Copy)]
struct Ellipsoid {
    a: f64,
    b: f64,
}

impl Ellipsoid {
    const fn e2(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.a * self.a)
    }
}

const WGS84: Ellipsoid = Ellipsoid { a: 6_378_137.0, b: 6_356_752.314_245 };
const AIRY_1830: Ellipsoid = Ellipsoid { a: 6_377_563.396, b: 6_356_256.909 };

/// WGS84 -> OSGB36 Helmert parameters: translations (m), scale (ppm), rotations (arcsec).
struct Helmert {
    tx: f64,
    ty: f64,
    tz: f64,
    s_ppm: f64,
    rx_sec: f64,
    ry_sec: f64,
    rz_sec: f64,
}

const WGS84_TO_OSGB36: Helmert = Helmert {
    tx: -446.448,
    ty: 125.157,
    tz: -542.060,
    s_ppm: 20.4894,
    rx_sec: -0.1502,
    ry_sec: -0.2470,
    rz_sec: -0.8421,
};

impl Helmert {
    fn apply(&self, (x, y, z): (f64, f64, f64), sign: f64) -> (f64, f64, f64) {
        let sec = (1.0_f64 / 3600.0).to_radians();
        let (tx, ty, tz) = (sign * self.tx, sign * self.ty, sign * self.tz);
        let s1 = 1.0 + sign * self.s_ppm * 1e-6;
        let (rx, ry, rz) = (sign * self.rx_sec * sec, sign * self.ry_sec * sec, sign * self.rz_sec * sec);
        (
            tx + s1 * x - rz * y + ry * z,
            ty + rz * x + s1 * y - rx * z,
            tz - ry * x + rx * y + s1 * z,
        )
    }
}

fn geodetic_to_cartesian(lat: f64, lon: f64, el: Ellipsoid) -> (f64, f64, f64) {
    let e2 = el.e2();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let nu = el.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    (nu * cos_lat * lon.cos(), nu * cos_lat * lon.sin(), (1.0 - e2) * nu * sin_lat)
}

fn cartesian_to_geodetic((x, y, z): (f64, f64, f64), el: Ellipsoid) -> (f64, f64) {
    let e2 = el.e2();
    let p = (x * x + y * y).sqrt();
    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..16 {
        let sin_lat = lat.sin();
        let nu = el.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + e2 * nu * sin_lat).atan2(p);
        let done = (next - lat).abs() < 1e-13;
        lat = next;
        if done {
            break;
        }
    }
    (lat, y.atan2(x))
}

// ---- OS National Grid transverse mercator -----------------------------------

const F0: f64 = 0.999_601_271_7;
const LAT0_DEG: f64 = 49.0;
const LON0_DEG: f64 = -2.0;
const E0: f64 = 400_000.0;
const N0: f64 = -100_000.0;

fn meridional_arc(lat: f64) -> f64 {
    let el = AIRY_1830;
    let n = (el.a - el.b) / (el.a + el.b);
    let (n2, n3) = (n * n, n * n * n);
    let lat0 = LAT0_DEG.to_radians();
    let (d, s) = (lat - lat0, lat + lat0);
    el.b * F0
        * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * d
            - (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * d.sin() * s.cos()
            + (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * d).sin() * (2.0 * s).cos()
            - 35.0 / 24.0 * n3 * (3.0 * d).sin() * (3.0 * s).cos())
}

fn radii(lat: f64) -> (f64, f64, f64) {
    let el = AIRY_1830;
    let e2 = el.e2();
    let w = 1.0 - e2 * lat.sin().powi(2);
    let nu = el.a * F0 / w.sqrt();
    let rho = el.a * F0 * (1.0 - e2) / w.powf(1.5);
    (nu, rho, nu / rho - 1.0)
}

/// OSGB36 latitude/longitude (radians) to grid easting/northing (metres).
pub fn osgb36_to_grid(lat: f64, lon: f64) -> (f64, f64) {
    let (nu, rho, eta2) = radii(lat);
    let m = meridional_arc(lat);
    let (sin_lat, cos_lat) = lat.sin_cos();
    let tan2 = lat.tan().powi(2);
    let tan4 = tan2 * tan2;
    let cos3 = cos_lat.powi(3);
    let cos5 = cos_lat.powi(5);

    let i = m + N0;
    let ii = nu / 2.0 * sin_lat * cos_lat;
    let iii = nu / 24.0 * sin_lat * cos3 * (5.0 - tan2 + 9.0 * eta2);
    let iiia = nu / 720.0 * sin_lat * cos5 * (61.0 - 58.0 * tan2 + tan4);
    let iv = nu * cos_lat;
    let v = nu / 6.0 * cos3 * (nu / rho - tan2);
    let vi = nu / 120.0 * cos5 * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

    let dl = lon - LON0_DEG.to_radians();
    let northing = i + ii * dl.powi(2) + iii * dl.powi(4) + iiia * dl.powi(6);
    let easting = E0 + iv * dl + v * dl.powi(3) + vi * dl.powi(5);
    (easting, northing)
}

/// Grid easting/northing (metres) to OSGB36 latitude/longitude (radians).
pub fn grid_to_osgb36(easting: f64, northing: f64) -> (f64, f64) {
    let a_f0 = AIRY_1830.a * F0;
    let mut lat = LAT0_DEG.to_radians() + (northing - N0) / a_f0;
    let mut m = meridional_arc(lat);
    for _ in 0..32 {
        let residual = northing - N0 - m;
        if residual.abs() < 1e-5 {
            break;
        }
        lat += residual / a_f0;
        m = meridional_arc(lat);
    }

    let (nu, rho, eta2) = radii(lat);
    let tan = lat.tan();
    let (tan2, tan4, tan6) = (tan * tan, tan.powi(4), tan.powi(6));
    let sec = 1.0 / lat.cos();

    let vii = tan / (2.0 * rho * nu);
    let viii = tan / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
    let ix = tan / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
    let x = sec / nu;
    let xi = sec / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
    let xii = sec / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
    let xiia = sec / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

    let de = easting - E0;
    let lat_out = lat - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
    let lon_out = LON0_DEG.to_radians() + x * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);
    (lat_out, lon_out)
}

// ---- public point transforms -------------------------------------------------

const WEB_MERCATOR_R: f64 = 6_378_137.0;

/// WGS84 lon/lat (degrees) to British National Grid (metres).
pub fn wgs84_to_bng(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let xyz = geodetic_to_cartesian(lat_deg.to_radians(), lon_deg.to_radians(), WGS84);
    let shifted = WGS84_TO_OSGB36.apply(xyz, 1.0);
    let (lat, lon) = cartesian_to_geodetic(shifted, AIRY_1830);
    osgb36_to_grid(lat, lon)
}

/// British National Grid (metres) to WGS84 lon/lat (degrees).
pub fn bng_to_wgs84(easting: f64, northing: f64) -> (f64, f64) {
    let (lat, lon) = grid_to_osgb36(easting, northing);
    let xyz = geodetic_to_cartesian(lat, lon, AIRY_1830);
    let shifted = WGS84_TO_OSGB36.apply(xyz, -1.0);
    let (lat, lon) = cartesian_to_geodetic(shifted, WGS84);
    (lon.to_degrees(), lat.to_degrees())
}

fn web_mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WEB_MERCATOR_R).to_degrees();
    let lat = (y / WEB_MERCATOR_R).sinh().atan().to_degrees();
    (lon, lat)
}

fn wgs84_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon.to_radians() * WEB_MERCATOR_R;
    let y = (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln() * WEB_MERCATOR_R;
    (x, y)
}

/// Transform one coordinate between supported systems.
pub fn transform_coord(c: Coord<f64>, from: Crs, to: Crs) -> Coord<f64> {
    if from == to || (from.is_geographic() && to.is_geographic()) {
        return c;
    }
    // route everything through WGS84 degrees
    let (lon, lat) = match from {
        Crs::Wgs84 | Crs::Etrs89 => (c.x, c.y),
        Crs::WebMercator => web_mercator_to_wgs84(c.x, c.y),
        Crs::BritishNationalGrid => bng_to_wgs84(c.x, c.y),
    };
    let (x, y) = match to {
        Crs::Wgs84 | Crs::Etrs89 => (lon, lat),
        Crs::WebMercator => wgs84_to_web_mercator(lon, lat),
        Crs::BritishNationalGrid => wgs84_to_bng(lon, lat),
    };
    Coord { x, y }
}

/// Reproject a boundary.
pub fn reproject(geometry: &MultiPolygon<f64>, from: Crs, to: Crs) -> MultiPolygon<f64> {
    if from == to {
        return geometry.clone();
    }
    geometry.map_coords(|c| transform_coord(c, from, to))
}
