// File: crates/choropleth-core/src/error.rs
// Summary: Error taxonomy for the data-preparation pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Structural problems that make a run unusable. Every variant aborts the
/// pipeline; dirty individual cells are coerced to null instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing join key in {dataset}: expected one of {}", expected.join(", "))]
    MissingJoinKey {
        dataset: &'static str,
        expected: Vec<String>,
    },

    #[error("no columns match 'Year ending Dec YYYY'; check the price table headers")]
    NoPeriodColumns,

    #[error("log colour scale needs positive values; found no positive prices")]
    NoPositiveValues,

    #[error("boundary dataset has no coordinate reference system")]
    MissingCrs,

    #[error("unsupported coordinate reference system '{0}'")]
    UnsupportedCrs(String),

    #[error("region '{code}' has unsupported geometry type {kind}")]
    UnsupportedGeometry { code: String, kind: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
