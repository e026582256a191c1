// File: crates/choropleth-render-skia/src/text.rs
// Summary: Frame typography: one style per text role (title, subtitle, credits, bar labels), set with Skia textlayout.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

use crate::types::FrameOptions;

const FAMILIES: [&str; 5] = ["DejaVu Sans", "Liberation Sans", "Arial", "Helvetica", "sans-serif"];

/// What a piece of text is for; fixes its size (in points) and weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Subtitle,
    Credits,
    TickLabel,
    AxisLabel,
}

impl TextRole {
    pub fn points(self) -> f32 {
        match self {
            TextRole::Title => 18.0,
            TextRole::Subtitle => 12.0,
            TextRole::AxisLabel => 10.0,
            TextRole::Credits | TextRole::TickLabel => 9.0,
        }
    }

    fn bold(self) -> bool {
        self == TextRole::Title
    }
}

/// Lays out single-line labels against the system font manager.
pub struct Typesetter {
    fonts: FontCollection,
}

impl Default for Typesetter {
    fn default() -> Self {
        Self::new()
    }
}

impl Typesetter {
    pub fn new() -> Self {
        let mut fonts = FontCollection::new();
        fonts.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts }
    }

    /// Shape `text` for `role` at the frame's pixel scale.
    pub fn set(&self, text: &str, role: TextRole, opts: &FrameOptions, color: skia::Color) -> SetText {
        let mut style = TextStyle::new();
        style.set_font_size(opts.px(role.points()).max(1.0));
        style.set_color(color);
        style.set_font_families(&FAMILIES);
        if role.bold() {
            style.set_font_style(skia::FontStyle::bold());
        }

        let mut para = ParagraphStyle::new();
        para.set_text_align(TextAlign::Left);
        para.set_max_lines(1);
        let mut builder = ParagraphBuilder::new(&para, &self.fonts);
        builder.push_style(&style);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(opts.width as f32 * 2.0);
        SetText { paragraph }
    }
}

/// A shaped line ready to paint at different anchors.
pub struct SetText {
    paragraph: Paragraph,
}

impl SetText {
    pub fn width(&self) -> f32 {
        self.paragraph.longest_line()
    }

    pub fn height(&self) -> f32 {
        self.paragraph.height()
    }

    /// Top-left corner at `(x, y)`.
    pub fn paint_top(&mut self, canvas: &skia::Canvas, x: f32, y: f32) {
        self.paragraph.paint(canvas, (x, y));
    }

    /// Left end of the baseline at `(x, y)`.
    pub fn paint_baseline(&mut self, canvas: &skia::Canvas, x: f32, y: f32) {
        let ascent = self.paragraph.alphabetic_baseline();
        self.paint_top(canvas, x, y - ascent);
    }

    /// Left edge at `x`, vertically centred on `y`.
    pub fn paint_middle(&mut self, canvas: &skia::Canvas, x: f32, y: f32) {
        let half = self.height() / 2.0;
        self.paint_top(canvas, x, y - half);
    }

    /// Reads bottom to top with the baseline on `x`, centred on `cy`.
    pub fn paint_upright(&mut self, canvas: &skia::Canvas, x: f32, cy: f32) {
        let w = self.width();
        canvas.save();
        canvas.translate((x, cy + w / 2.0));
        canvas.rotate(-90.0, None);
        self.paint_baseline(canvas, 0.0, 0.0);
        canvas.restore();
    }
}
