// File: crates/choropleth-render-skia/src/map.rs
// Summary: Fit projected region geometry into the map rectangle and build Skia paths.

use std::collections::HashMap;

use geo::{BoundingRect, Coord, LineString, MultiPolygon, Rect};
use skia_safe as skia;

/// Equal-aspect mapping from planar CRS units to pixels (y flipped).
#[derive(Clone, Copy, Debug)]
pub struct MapTransform {
    scale: f64,
    min_x: f64,
    max_y: f64,
    left: f64,
    top: f64,
}

impl MapTransform {
    /// Centre `bounds` inside `target`, as large as fits.
    pub fn fit(bounds: Rect<f64>, target: skia::Rect) -> Self {
        let (w, h) = (target.width() as f64, target.height() as f64);
        let (bw, bh) = (bounds.width().max(1e-9), bounds.height().max(1e-9));
        let scale = (w / bw).min(h / bh);
        Self {
            scale,
            min_x: bounds.min().x,
            max_y: bounds.max().y,
            left: target.left as f64 + (w - bw * scale) / 2.0,
            top: target.top as f64 + (h - bh * scale) / 2.0,
        }
    }

    #[inline]
    pub fn to_px(&self, c: Coord<f64>) -> (f32, f32) {
        (
            (self.left + (c.x - self.min_x) * self.scale) as f32,
            (self.top + (self.max_y - c.y) * self.scale) as f32,
        )
    }

    /// Pixels per CRS unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Bounds of every region together, `None` when all geometry is empty.
pub fn coverage_bounds<'a>(geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<Rect<f64>> {
    geometries
        .into_iter()
        .filter_map(|g| g.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            )
        })
}

fn push_ring(path: &mut skia::Path, ring: &LineString<f64>, tf: &MapTransform) {
    let mut coords = ring.coords();
    let Some(first) = coords.next() else { return };
    path.move_to(tf.to_px(*first));
    for c in coords {
        path.line_to(tf.to_px(*c));
    }
    path.close();
}

/// One filled path per region; holes cut out by the even-odd rule.
pub fn region_path(geometry: &MultiPolygon<f64>, tf: &MapTransform) -> skia::Path {
    let mut path = skia::Path::new();
    path.set_fill_type(skia::PathFillType::EvenOdd);
    for poly in &geometry.0 {
        push_ring(&mut path, poly.exterior(), tf);
        for hole in poly.interiors() {
            push_ring(&mut path, hole, tf);
        }
    }
    path
}

type EdgeKey = ((u64, u64), (u64, u64));

fn edge_key(a: Coord<f64>, b: Coord<f64>) -> EdgeKey {
    let (ka, kb) = ((a.x.to_bits(), a.y.to_bits()), (b.x.to_bits(), b.y.to_bits()));
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

/// Segments used by exactly one ring: the outer edge of the whole coverage.
pub fn outline_path<'a>(geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>, tf: &MapTransform) -> skia::Path {
    let mut counts: HashMap<EdgeKey, (usize, Coord<f64>, Coord<f64>)> = HashMap::new();
    let mut order = Vec::new();
    for mp in geometries {
        for poly in &mp.0 {
            for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
                for line in ring.lines() {
                    if line.start == line.end {
                        continue;
                    }
                    let key = edge_key(line.start, line.end);
                    let entry = counts.entry(key).or_insert_with(|| {
                        order.push(key);
                        (0, line.start, line.end)
                    });
                    entry.0 += 1;
                }
            }
        }
    }

    let mut path = skia::Path::new();
    for key in order {
        if let Some(&(1, a, b)) = counts.get(&key) {
            path.move_to(tf.to_px(a));
            path.line_to(tf.to_px(b));
        }
    }
    path
}
