// File: crates/choropleth-core/src/lib.rs
// Summary: Core library entry point; exports the data-preparation pipeline, log tick helpers and web outputs.

pub mod axis;
pub mod boundary;
pub mod error;
pub mod export;
pub mod html;
pub mod merge;
pub mod normalize;
pub mod period;
pub mod pipeline;
pub mod projection;
pub mod scale;
pub mod simplify;
pub mod sink;
pub mod table;

pub use axis::{format_pounds, log_ticks, ColorAxis, Tick};
pub use boundary::{BoundarySet, RegionGeometry};
pub use error::{PipelineError, Result};
pub use merge::{left_join, MergedRegion};
pub use normalize::{KeySource, CODE_COLUMN, NAME_COLUMN};
pub use period::{Period, PeriodSet};
pub use pipeline::{Frame, PipelineConfig, PreparedDataset};
pub use projection::Crs;
pub use scale::{ColorRange, LogNorm};
pub use sink::RenderSink;
pub use table::{PriceRecord, PriceTable};
