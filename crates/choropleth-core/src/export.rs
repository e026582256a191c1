// File: crates/choropleth-core/src/export.rs
// Summary: Web-map data outputs: long (region x period) CSV sink and WGS84 GeoJSON export.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use log::info;
use serde_json::json;

use crate::axis::ColorAxis;
use crate::normalize::{CODE_COLUMN, NAME_COLUMN};
use crate::pipeline::{Frame, PreparedDataset};
use crate::projection::{self, Crs};
use crate::sink::RenderSink;

/// Writes one row per region and period: code, name, period, year, price, log_price.
pub struct LongTableSink {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl LongTableSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        writer.write_record([CODE_COLUMN, NAME_COLUMN, "period", "year", "price", "log_price"])?;
        Ok(Self { path, writer, rows: 0 })
    }
}

impl RenderSink for LongTableSink {
    fn id(&self) -> &'static str {
        "long-table"
    }

    fn render_frame(&mut self, frame: &Frame<'_>, _axis: &ColorAxis) -> Result<()> {
        let year = frame.year().to_string();
        for region in frame.regions {
            let price = region.price(frame.index);
            let log_price = price.filter(|v| *v > 0.0).map(f64::log10);
            let price = price.map(|v| v.to_string()).unwrap_or_default();
            let log_price = log_price.map(|v| v.to_string()).unwrap_or_default();
            self.writer.write_record([
                region.code.as_str(),
                region.name.as_deref().unwrap_or_default(),
                frame.period.column.as_str(),
                year.as_str(),
                price.as_str(),
                log_price.as_str(),
            ])?;
            self.rows += 1;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        info!("wrote {} rows to {}", self.rows, self.path.display());
        Ok(())
    }
}

/// The simplified regions as a WGS84 FeatureCollection with one price
/// property per period, keyed by [`PeriodSet::label`].
///
/// [`PeriodSet::label`]: crate::period::PeriodSet::label
pub fn wgs84_collection(dataset: &PreparedDataset) -> FeatureCollection {
    let labels = (0..dataset.periods.len())
        .filter_map(|ix| dataset.periods.label(ix))
        .collect::<Vec<_>>();
    let features = dataset
        .regions
        .iter()
        .map(|region| {
            let geometry = projection::reproject(&region.geometry, dataset.crs, Crs::Wgs84);
            let mut feature = Feature {
                bbox: None,
                geometry: (!geometry.0.is_empty())
                    .then(|| geojson::Geometry::new(geojson::Value::from(&geometry))),
                id: None,
                properties: None,
                foreign_members: None,
            };
            feature.set_property(CODE_COLUMN, region.code.clone());
            feature.set_property(NAME_COLUMN, region.name.clone());
            for (ix, label) in labels.iter().enumerate() {
                feature.set_property(label.clone(), region.price(ix));
            }
            feature
        })
        .collect();

    let mut crs = JsonObject::new();
    crs.insert("type".to_string(), JsonValue::from("name"));
    crs.insert("properties".to_string(), json!({ "name": Crs::Wgs84.urn() }));
    let mut foreign = JsonObject::new();
    foreign.insert("crs".to_string(), JsonValue::Object(crs));
    FeatureCollection { bbox: None, features, foreign_members: Some(foreign) }
}

/// Write [`wgs84_collection`] to `path`. Returns the number of features written.
pub fn write_geojson(dataset: &PreparedDataset, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let collection = wgs84_collection(dataset);
    let count = collection.features.len();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, GeoJson::from(collection).to_string())
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {count} features to {}", path.display());
    Ok(count)
}
