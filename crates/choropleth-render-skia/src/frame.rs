// File: crates/choropleth-render-skia/src/frame.rs
// Summary: Raster rendering of one period's choropleth frame (map, colour bar, title block) to PNG.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use choropleth_core::{format_pounds, ColorAxis, Frame, RenderSink};
use log::{debug, info};
use skia_safe as skia;

use crate::colormap::inferno;
use crate::gif::write_gif;
use crate::map::{coverage_bounds, outline_path, region_path, MapTransform};
use crate::text::{TextRole, Typesetter};
use crate::types::{FrameOptions, FPS};

/// Paths for one region set; rebuilt when the frame's regions change.
struct MapCache {
    key: (usize, usize),
    regions: Vec<skia::Path>,
    outline: skia::Path,
}

pub struct FrameRenderer {
    pub opts: FrameOptions,
    text: Option<Typesetter>,
    cache: Option<MapCache>,
}

impl FrameRenderer {
    pub fn new(opts: FrameOptions) -> Self {
        let text = opts.draw_labels.then(Typesetter::new);
        Self { opts, text, cache: None }
    }

    fn refresh_map_cache(&mut self, frame: &Frame<'_>) {
        let key = (frame.regions.as_ptr() as usize, frame.regions.len());
        if self.cache.as_ref().map(|c| c.key) != Some(key) {
            let target = self.opts.layout.map.to_pixels(self.opts.width, self.opts.height);
            let geometries = frame.regions.iter().map(|r| &r.geometry);
            let bounds = coverage_bounds(geometries.clone())
                .unwrap_or_else(|| geo::Rect::new(geo::Coord { x: 0.0, y: 0.0 }, geo::Coord { x: 1.0, y: 1.0 }));
            let tf = MapTransform::fit(bounds, target);
            debug!("map fit: {:.4} px per unit over {:?}", tf.scale(), bounds);
            self.cache = Some(MapCache {
                key,
                regions: frame.regions.iter().map(|r| region_path(&r.geometry, &tf)).collect(),
                outline: outline_path(geometries, &tf),
            });
        }
    }

    /// Render `frame` and return encoded PNG bytes.
    pub fn render_png_bytes(&mut self, frame: &Frame<'_>, axis: &ColorAxis) -> Result<Vec<u8>> {
        let (width, height) = (self.opts.width, self.opts.height);
        let mut surface = skia::surfaces::raster_n32_premul((width, height))
            .ok_or_else(|| anyhow!("failed to create {width}x{height} raster surface"))?;
        let canvas = surface.canvas();
        canvas.clear(self.opts.theme.background);

        self.refresh_map_cache(frame);
        let opts = &self.opts;
        if let Some(cache) = self.cache.as_ref() {
            draw_regions(canvas, opts, frame, cache);
        }
        draw_color_bar(canvas, opts, self.text.as_ref(), axis);
        if let Some(text) = self.text.as_ref() {
            draw_titles(canvas, opts, text, frame.year());
        }

        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    /// Render `frame` to `path`, creating parent directories.
    pub fn render_to_png(&mut self, frame: &Frame<'_>, axis: &ColorAxis, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render_png_bytes(frame, axis)?;
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

// ---- drawing ------------------------------------------------------------------

fn draw_regions(canvas: &skia::Canvas, opts: &FrameOptions, frame: &Frame<'_>, cache: &MapCache) {
    let theme = &opts.theme;
    let mut fill = skia::Paint::default();
    fill.set_anti_alias(true);
    fill.set_style(skia::paint::Style::Fill);

    let mut hatch = skia::Paint::default();
    hatch.set_anti_alias(true);
    hatch.set_style(skia::paint::Style::Stroke);
    hatch.set_stroke_width(opts.px(0.5).max(1.0));
    hatch.set_color(theme.missing_hatch);
    let spacing = opts.px(4.0).max(4.0);

    let mut edge = skia::Paint::default();
    edge.set_anti_alias(true);
    edge.set_style(skia::paint::Style::Stroke);
    edge.set_stroke_width(opts.px(0.2));
    edge.set_color(theme.region_edge);

    for (region, path) in frame.regions.iter().zip(&cache.regions) {
        match frame.fraction(region) {
            Some(t) => {
                fill.set_color(inferno(t, theme.fill_alpha));
                canvas.draw_path(path, &fill);
            }
            None => {
                fill.set_color(theme.missing_fill);
                canvas.draw_path(path, &fill);
                let b = *path.bounds();
                canvas.save();
                canvas.clip_path(path, skia::ClipOp::Intersect, true);
                // "///" hatch
                let mut x = b.left - b.height();
                while x < b.right {
                    canvas.draw_line((x, b.bottom), (x + b.height(), b.top), &hatch);
                    x += spacing;
                }
                canvas.restore();
            }
        }
        canvas.draw_path(path, &edge);
    }

    let mut outline = skia::Paint::default();
    outline.set_anti_alias(true);
    outline.set_style(skia::paint::Style::Stroke);
    outline.set_stroke_width(opts.px(2.2));
    outline.set_color(theme.outline_shadow);
    canvas.draw_path(&cache.outline, &outline);
    outline.set_stroke_width(opts.px(0.6));
    outline.set_color(theme.outline);
    canvas.draw_path(&cache.outline, &outline);
}

/// Ticks to show on the bar: the 1-2-5 set, or the range ends when none fit.
fn bar_ticks(axis: &ColorAxis) -> Vec<(f64, String)> {
    if axis.uses_default_ticks() {
        let norm = axis.norm();
        return [axis.range.vmin, axis.range.vmax]
            .into_iter()
            .filter_map(|v| norm.normalize(v).map(|f| (f, format_pounds(v))))
            .collect();
    }
    axis.ticks.iter().map(|t| (t.fraction, t.label.clone())).collect()
}

fn draw_color_bar(canvas: &skia::Canvas, opts: &FrameOptions, text: Option<&Typesetter>, axis: &ColorAxis) {
    let theme = &opts.theme;
    let bar = opts.layout.color_bar.to_pixels(opts.width, opts.height);
    let steps = bar.height().ceil().max(1.0) as usize;

    let mut slice = skia::Paint::default();
    slice.set_style(skia::paint::Style::Fill);
    for i in 0..steps {
        let t0 = i as f32 / steps as f32;
        let t1 = (i + 1) as f32 / steps as f32;
        slice.set_color(inferno(((t0 + t1) / 2.0) as f64, 255));
        canvas.draw_rect(
            skia::Rect::from_ltrb(bar.left, bar.bottom - t1 * bar.height(), bar.right, bar.bottom - t0 * bar.height()),
            &slice,
        );
    }

    let mut line = skia::Paint::default();
    line.set_anti_alias(true);
    line.set_style(skia::paint::Style::Stroke);
    line.set_stroke_width(opts.px(0.4).max(1.0));
    line.set_color(theme.bar_tick);
    canvas.draw_rect(bar, &line);

    let tick_len = opts.px(3.5);
    let mut widest = 0.0f32;
    for (fraction, label) in bar_ticks(axis) {
        let y = bar.bottom - fraction as f32 * bar.height();
        canvas.draw_line((bar.right, y), (bar.right + tick_len, y), &line);
        if let Some(text) = text {
            let mut set = text.set(&label, TextRole::TickLabel, opts, theme.bar_text);
            set.paint_middle(canvas, bar.right + tick_len * 2.0, y);
            widest = widest.max(set.width());
        }
    }

    if let Some(text) = text {
        let mut set = text.set(&axis.label, TextRole::AxisLabel, opts, theme.bar_text);
        let x = bar.right + tick_len * 3.0 + widest + set.height();
        set.paint_upright(canvas, x, bar.center_y());
    }
}

fn draw_titles(canvas: &skia::Canvas, opts: &FrameOptions, text: &Typesetter, year: u16) {
    let theme = &opts.theme;
    let (w, h) = (opts.width as f32, opts.height as f32);
    let layout = &opts.layout;
    let x = layout.text_left * w;

    // the title hangs from its top edge; the other lines sit on baselines
    text.set(&opts.title, TextRole::Title, opts, theme.title)
        .paint_top(canvas, x, (1.0 - layout.title_y) * h);
    let subtitle = format!("Year ending December {year}");
    text.set(&subtitle, TextRole::Subtitle, opts, theme.subtitle)
        .paint_baseline(canvas, x, (1.0 - layout.subtitle_y) * h);
    text.set(&opts.credits, TextRole::Credits, opts, theme.credits)
        .paint_baseline(canvas, x, (1.0 - layout.credits_y) * h);
}

// ---- sink ---------------------------------------------------------------------

/// Writes one PNG per period into `frames_dir` and, on finish, the GIF.
pub struct SkiaFrameSink {
    renderer: FrameRenderer,
    frames_dir: PathBuf,
    gif_path: Option<PathBuf>,
    written: Vec<PathBuf>,
}

impl SkiaFrameSink {
    pub fn new(frames_dir: impl Into<PathBuf>, opts: FrameOptions) -> Self {
        Self {
            renderer: FrameRenderer::new(opts),
            frames_dir: frames_dir.into(),
            gif_path: None,
            written: Vec::new(),
        }
    }

    /// Also assemble the frames into an animated GIF at `path`.
    pub fn with_gif(mut self, path: impl Into<PathBuf>) -> Self {
        self.gif_path = Some(path.into());
        self
    }

    /// PNG frames written so far, in period order.
    pub fn frames(&self) -> &[PathBuf] {
        &self.written
    }
}

impl RenderSink for SkiaFrameSink {
    fn id(&self) -> &'static str {
        "skia-frames"
    }

    fn render_frame(&mut self, frame: &Frame<'_>, axis: &ColorAxis) -> Result<()> {
        let path = self.frames_dir.join(format!("{}.png", frame.period.file_stem()));
        self.renderer.render_to_png(frame, axis, &path)?;
        info!("saved frame {}", path.display());
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(gif) = &self.gif_path {
            write_gif(&self.written, gif, FPS)?;
        }
        Ok(())
    }
}
