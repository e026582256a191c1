// File: crates/choropleth-render-skia/src/colormap.rs
// Summary: Inferno colour map sampled by linear interpolation between anchor colours.

use skia_safe as skia;

/// Inferno at nine evenly spaced positions (0, 1/8, ..., 1).
const INFERNO: [[u8; 3]; 9] = [
    [0x00, 0x00, 0x04],
    [0x1f, 0x0c, 0x48],
    [0x55, 0x0f, 0x6d],
    [0x88, 0x22, 0x6a],
    [0xba, 0x36, 0x55],
    [0xe3, 0x59, 0x33],
    [0xf9, 0x8e, 0x09],
    [0xf8, 0xc9, 0x32],
    [0xfc, 0xff, 0xa4],
];

#[inline]
fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round().clamp(0.0, 255.0) as u8
}

/// Colour at `t` in `[0, 1]` (clamped; NaN maps to the low end).
pub fn inferno(t: f64, alpha: u8) -> skia::Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) } as f32;
    let scaled = t * (INFERNO.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(INFERNO.len() - 2);
    let f = scaled - i as f32;
    let (a, b) = (INFERNO[i], INFERNO[i + 1]);
    skia::Color::from_argb(alpha, lerp(a[0], b[0], f), lerp(a[1], b[1], f), lerp(a[2], b[2], f))
}
