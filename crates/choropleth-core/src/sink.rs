// File: crates/choropleth-core/src/sink.rs
// Summary: Rendering-sink trait; consumers of prepared frames (raster, tables, ...) implement it.

use crate::axis::ColorAxis;
use crate::pipeline::Frame;

/// Receives one frame per period, in ascending year order, then `finish`.
pub trait RenderSink {
    fn id(&self) -> &'static str;
    fn render_frame(&mut self, frame: &Frame<'_>, axis: &ColorAxis) -> anyhow::Result<()>;
    /// Flush whatever spans frames (an animation, a table file).
    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}
