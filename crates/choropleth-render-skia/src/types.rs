// File: crates/choropleth-render-skia/src/types.rs
// Summary: Frame size, layout fractions and render options shared by the frame renderer.

use skia_safe as skia;

use crate::theme::Theme;

/// Default frame width in pixels (10 in at 150 dpi).
pub const WIDTH: i32 = 1500;
/// Default frame height in pixels (8 in at 150 dpi).
pub const HEIGHT: i32 = 1200;
/// Animation rate.
pub const FPS: u32 = 2;

/// Rectangle in figure fractions, origin bottom-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigRect {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl FigRect {
    pub const fn new(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self { left, bottom, width, height }
    }

    /// Pixel rect on a `w` x `h` surface (origin top-left).
    pub fn to_pixels(self, w: i32, h: i32) -> skia::Rect {
        let (w, h) = (w as f32, h as f32);
        skia::Rect::from_ltrb(
            self.left * w,
            (1.0 - self.bottom - self.height) * h,
            (self.left + self.width) * w,
            (1.0 - self.bottom) * h,
        )
    }
}

/// Where the map, colour bar and text blocks go.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub map: FigRect,
    pub color_bar: FigRect,
    /// Left edge of the title block and credits.
    pub text_left: f32,
    /// Baselines, as fractions from the bottom.
    pub title_y: f32,
    pub subtitle_y: f32,
    pub credits_y: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            map: FigRect::new(0.06, 0.10, 0.78, 0.80),
            color_bar: FigRect::new(0.86, 0.18, 0.03, 0.62),
            text_left: 0.06,
            title_y: 0.93,
            subtitle_y: 0.885,
            credits_y: 0.04,
        }
    }
}

pub struct FrameOptions {
    pub width: i32,
    pub height: i32,
    pub layout: Layout,
    pub theme: Theme,
    pub title: String,
    pub credits: String,
    /// Text depends on system fonts; tests switch it off for stable pixels.
    pub draw_labels: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            layout: Layout::default(),
            theme: Theme::light(),
            title: "UK Local Authority House Prices".to_string(),
            credits: "Data: ONS \u{2022} Viz: Will".to_string(),
            draw_labels: true,
        }
    }
}

impl FrameOptions {
    /// Font sizes scale with the frame height (defaults match 150 dpi).
    pub fn px(&self, points: f32) -> f32 {
        points * 150.0 / 72.0 * self.height as f32 / HEIGHT as f32
    }
}
