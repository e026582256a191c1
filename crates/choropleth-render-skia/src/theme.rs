// File: crates/choropleth-render-skia/src/theme.rs
// Summary: Colours for the map frame: background, edges, no-data fill and text.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub region_edge: skia::Color,
    pub missing_fill: skia::Color,
    pub missing_hatch: skia::Color,
    pub outline: skia::Color,
    pub outline_shadow: skia::Color,
    pub title: skia::Color,
    pub subtitle: skia::Color,
    pub bar_text: skia::Color,
    pub bar_tick: skia::Color,
    pub credits: skia::Color,
    /// Region fill opacity.
    pub fill_alpha: u8,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 0xf8, 0xf8, 0xf8),
            region_edge: skia::Color::from_argb(255, 255, 255, 255),
            missing_fill: skia::Color::from_argb(255, 0xd9, 0xd9, 0xd9),
            missing_hatch: skia::Color::from_argb(255, 0x8c, 0x8c, 0x8c),
            outline: skia::Color::from_argb(153, 0, 0, 0),
            outline_shadow: skia::Color::from_argb(64, 0x33, 0x33, 0x33),
            title: skia::Color::from_argb(255, 0x22, 0x22, 0x22),
            subtitle: skia::Color::from_argb(255, 0x4a, 0x4a, 0x4a),
            bar_text: skia::Color::from_argb(255, 0x22, 0x22, 0x22),
            bar_tick: skia::Color::from_argb(255, 0x22, 0x22, 0x22),
            credits: skia::Color::from_argb(255, 0x6e, 0x6e, 0x6e),
            fill_alpha: 242,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}
