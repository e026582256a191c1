// File: crates/choropleth-render-skia/src/lib.rs
// Summary: Skia renderer crate: choropleth frames on CPU raster surfaces, inferno colours and GIF assembly.

pub mod colormap;
pub mod frame;
pub mod gif;
pub mod map;
pub mod text;
pub mod theme;
pub mod types;

pub use frame::{FrameRenderer, SkiaFrameSink};
pub use gif::{encode_gif, write_gif};
pub use theme::Theme;
pub use types::{FigRect, FrameOptions, Layout, FPS, HEIGHT, WIDTH};
