// File: crates/choropleth-core/src/boundary.rs
// Summary: Boundary polygons loaded from a GeoJSON FeatureCollection, with declared CRS.

use std::collections::BTreeMap;
use std::path::Path;

use geo::{Geometry, MultiPolygon};
use geojson::{FeatureCollection, JsonObject, JsonValue};
use log::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::normalize::{CODE_COLUMN, FALLBACK_CODE_COLUMN};
use crate::projection::Crs;

/// CRS declaration found in the source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrsDeclaration {
    /// No `crs` member at all.
    Absent,
    /// `"crs": null`.
    Null,
    Named(Crs),
}

/// One boundary row. `code` is empty until the join key is normalized.
#[derive(Clone, Debug)]
pub struct RegionGeometry {
    pub code: String,
    pub name: Option<String>,
    /// Feature properties coerced to text.
    pub properties: BTreeMap<String, String>,
    pub geometry: MultiPolygon<f64>,
}

/// All boundaries of one file plus the CRS they are expressed in.
#[derive(Clone, Debug)]
pub struct BoundarySet {
    pub declared_crs: CrsDeclaration,
    /// Property names in first-seen order.
    pub columns: Vec<String>,
    pub regions: Vec<RegionGeometry>,
}

impl BoundarySet {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let set = Self::from_geojson_str(&text)?;
        info!(
            "loaded {} boundaries from {} (crs: {:?})",
            set.regions.len(),
            path.display(),
            set.declared_crs
        );
        Ok(set)
    }

    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let fc: FeatureCollection = text.parse()?;
        Self::from_feature_collection(fc)
    }

    pub fn from_feature_collection(fc: FeatureCollection) -> Result<Self> {
        let declared_crs = match fc.foreign_members.as_ref().and_then(|m| m.get("crs")) {
            None => CrsDeclaration::Absent,
            Some(JsonValue::Null) => CrsDeclaration::Null,
            Some(value) => CrsDeclaration::Named(parse_crs_member(value)?),
        };

        let mut columns: Vec<String> = Vec::new();
        let mut regions = Vec::with_capacity(fc.features.len());
        for (i, feature) in fc.features.into_iter().enumerate() {
            let properties = feature
                .properties
                .as_ref()
                .map(properties_as_text)
                .unwrap_or_default();
            for key in properties.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
            let label = [CODE_COLUMN, FALLBACK_CODE_COLUMN]
                .iter()
                .find_map(|c| properties.get(*c).cloned())
                .unwrap_or_else(|| format!("#{i}"));
            let geometry = match feature.geometry {
                Some(g) => to_multipolygon(Geometry::<f64>::try_from(g.value)?, &label)?,
                None => {
                    warn!("feature {label} has no geometry; kept as empty");
                    MultiPolygon::new(Vec::new())
                }
            };
            regions.push(RegionGeometry { code: String::new(), name: None, properties, geometry });
        }
        debug!("boundary columns: {:?}", columns);
        Ok(Self { declared_crs, columns, regions })
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// CRS the coordinates are in; `default_crs` stands in for an absent
    /// declaration (RFC 7946 files carry none).
    pub fn resolve_crs(&self, default_crs: Option<Crs>) -> Result<Crs> {
        match self.declared_crs {
            CrsDeclaration::Named(crs) => Ok(crs),
            CrsDeclaration::Absent => default_crs.ok_or(PipelineError::MissingCrs),
            CrsDeclaration::Null => Err(PipelineError::MissingCrs),
        }
    }
}

fn parse_crs_member(value: &JsonValue) -> Result<Crs> {
    // {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::27700"}}
    let name = value
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(JsonValue::as_str)
        .or_else(|| value.as_str());
    match name {
        Some(name) => Crs::from_name(name),
        None => Err(PipelineError::UnsupportedCrs(value.to_string())),
    }
}

/// Text rendering of property values, matching how codes read in a table.
fn properties_as_text(props: &JsonObject) -> BTreeMap<String, String> {
    props
        .iter()
        .map(|(k, v)| {
            let text = match v {
                JsonValue::Null => String::new(),
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), text)
        })
        .collect()
}

fn to_multipolygon(geometry: Geometry<f64>, label: &str) -> Result<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(p) => Ok(MultiPolygon::new(vec![p])),
        Geometry::MultiPolygon(mp) => Ok(mp),
        Geometry::GeometryCollection(gc) => {
            let mut polys = Vec::new();
            for g in gc {
                polys.extend(to_multipolygon(g, label)?.0);
            }
            Ok(MultiPolygon::new(polys))
        }
        other => Err(PipelineError::UnsupportedGeometry {
            code: label.to_string(),
            kind: geometry_kind(&other).to_string(),
        }),
    }
}

fn geometry_kind(g: &Geometry<f64>) -> &'static str {
    match g {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
