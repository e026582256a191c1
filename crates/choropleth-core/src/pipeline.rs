// File: crates/choropleth-core/src/pipeline.rs
// Summary: End-to-end preparation: normalize keys, join, reproject, simplify, range and ticks; frame iteration.

use std::path::PathBuf;

use anyhow::Context;
use log::info;

use crate::axis::ColorAxis;
use crate::boundary::BoundarySet;
use crate::error::Result;
use crate::merge::{left_join, MergedRegion};
use crate::normalize::{normalize_boundaries, normalize_price_table, KeySource};
use crate::period::{Period, PeriodSet};
use crate::projection::{self, Crs};
use crate::scale::{ColorRange, LogNorm};
use crate::simplify::simplify_coverage;
use crate::sink::RenderSink;
use crate::table::PriceTable;

/// Linear simplification tolerance, metres in the British National Grid.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 50.0;
pub const DEFAULT_LEGEND_LABEL: &str = "Average house price (log colour scale)";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub prices_path: PathBuf,
    pub boundaries_path: PathBuf,
    /// Planar CRS used for simplification and rendering.
    pub target_crs: Crs,
    /// CRS assumed when the boundary file declares none; `None` makes that an error.
    pub default_crs: Option<Crs>,
    pub simplify_tolerance: f64,
    pub legend_label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prices_path: PathBuf::new(),
            boundaries_path: PathBuf::new(),
            target_crs: Crs::BritishNationalGrid,
            default_crs: Some(Crs::Wgs84),
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            legend_label: DEFAULT_LEGEND_LABEL.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new(prices_path: impl Into<PathBuf>, boundaries_path: impl Into<PathBuf>) -> Self {
        Self {
            prices_path: prices_path.into(),
            boundaries_path: boundaries_path.into(),
            ..Self::default()
        }
    }
}

/// Merged, reprojected and simplified regions plus the shared colour scale.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub regions: Vec<MergedRegion>,
    pub periods: PeriodSet,
    pub crs: Crs,
    pub axis: ColorAxis,
    pub price_key: KeySource,
    pub boundary_key: KeySource,
}

impl PreparedDataset {
    /// Load both inputs from `config` paths and prepare them.
    pub fn load(config: &PipelineConfig) -> Result<Self> {
        let table = PriceTable::from_path(&config.prices_path)?;
        let boundaries = BoundarySet::from_path(&config.boundaries_path)?;
        Self::prepare(table, boundaries, config)
    }

    pub fn prepare(mut table: PriceTable, mut boundaries: BoundarySet, config: &PipelineConfig) -> Result<Self> {
        let price_key = normalize_price_table(&mut table)?;
        let boundary_key = normalize_boundaries(&mut boundaries)?;
        let source_crs = boundaries.resolve_crs(config.default_crs)?;

        let periods = PeriodSet::from_headers(&table.headers)?;
        info!(
            "{} period columns: {}",
            periods.len(),
            periods.years().iter().map(u16::to_string).collect::<Vec<_>>().join(", ")
        );

        let records = table.records(&periods)?;
        let mut regions = left_join(boundaries.regions, records, periods.len());

        if source_crs != config.target_crs {
            info!("reprojecting EPSG:{} -> EPSG:{}", source_crs.epsg(), config.target_crs.epsg());
            for region in regions.iter_mut() {
                region.geometry = projection::reproject(&region.geometry, source_crs, config.target_crs);
            }
        }

        let geometries = regions.iter().map(|r| r.geometry.clone()).collect::<Vec<_>>();
        for (region, simplified) in regions.iter_mut().zip(simplify_coverage(&geometries, config.simplify_tolerance)) {
            region.geometry = simplified;
        }

        let range = ColorRange::from_values(regions.iter().flat_map(|r| r.prices.iter().copied()))?;
        let axis = ColorAxis::new(config.legend_label.clone(), range);
        info!(
            "colour range [{}, {}] with {} ticks",
            range.vmin,
            range.vmax,
            axis.ticks.len()
        );

        Ok(Self {
            regions,
            periods,
            crs: config.target_crs,
            axis,
            price_key,
            boundary_key,
        })
    }

    pub fn range(&self) -> ColorRange {
        self.axis.range
    }

    /// Frames in ascending year order.
    pub fn frames(&self) -> impl Iterator<Item = Frame<'_>> + '_ {
        let norm = self.axis.norm();
        self.periods.iter().enumerate().map(move |(index, period)| Frame {
            index,
            period,
            regions: &self.regions,
            crs: self.crs,
            norm,
        })
    }

    /// Feed every frame to every sink, then finish them.
    pub fn render(&self, sinks: &mut [&mut dyn RenderSink]) -> anyhow::Result<()> {
        for frame in self.frames() {
            for sink in sinks.iter_mut() {
                sink.render_frame(&frame, &self.axis)
                    .with_context(|| format!("{} failed on '{}'", sink.id(), frame.period.column))?;
            }
        }
        for sink in sinks.iter_mut() {
            sink.finish().with_context(|| format!("{} failed to finish", sink.id()))?;
        }
        info!("rendered {} frames to {} sinks", self.periods.len(), sinks.len());
        Ok(())
    }
}

/// One period's view of the dataset, handed to rendering sinks.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub index: usize,
    pub period: &'a Period,
    pub regions: &'a [MergedRegion],
    pub crs: Crs,
    pub norm: LogNorm,
}

impl<'a> Frame<'a> {
    /// Price shown for `region`; non-positive values count as missing.
    pub fn value(&self, region: &MergedRegion) -> Option<f64> {
        region.price(self.index).filter(|v| *v > 0.0)
    }

    /// Position on the colour scale, `None` for missing data.
    pub fn fraction(&self, region: &MergedRegion) -> Option<f64> {
        self.value(region).and_then(|v| self.norm.normalize(v))
    }

    pub fn values(&self) -> impl Iterator<Item = (&'a MergedRegion, Option<f64>)> + '_ {
        self.regions.iter().map(move |r| (r, self.value(r)))
    }

    pub fn year(&self) -> u16 {
        self.period.year
    }
}
