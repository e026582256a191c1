use anyhow::Result;
use choropleth_core::{BoundarySet, PipelineConfig, PreparedDataset, PriceTable};
use choropleth_render_skia::{FrameOptions, FrameRenderer};
use criterion::{criterion_group, criterion_main, Criterion, black_box};

/// `n` x `n` grid of 2 km cells with prices on a gradient; every seventh cell has none.
fn build_dataset(n: usize) -> PreparedDataset {
    let mut features = Vec::with_capacity(n * n);
    let mut csv = String::from("LAD22CD,Year ending Dec 2020\n");
    for j in 0..n {
        for i in 0..n {
            let (x0, y0) = (300_000 + 2_000 * i, 200_000 + 2_000 * j);
            let (x1, y1) = (x0 + 2_000, y0 + 2_000);
            let code = format!("E{:08}", j * n + i);
            features.push(format!(
                r#"{{"type":"Feature","properties":{{"LAD22CD":"{code}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x0},{y0}],[{x1},{y0}],[{x1},{y1}],[{x0},{y1}],[{x0},{y0}]]]}}}}"#
            ));
            if (j * n + i) % 7 != 0 {
                csv.push_str(&format!("{code},{}\n", 80_000 + 1_500 * (i + j)));
            }
        }
    }
    let gj = format!(
        r#"{{"type":"FeatureCollection","crs":{{"type":"name","properties":{{"name":"EPSG:27700"}}}},"features":[{}]}}"#,
        features.join(",")
    );
    let table = PriceTable::from_reader(csv.as_bytes()).expect("prices");
    let set = BoundarySet::from_geojson_str(&gj).expect("boundaries");
    PreparedDataset::prepare(table, set, &PipelineConfig::default()).expect("prepare")
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_frame_png");
    for &n in &[10usize, 40usize] {
        group.bench_function(format!("grid_{n}x{n}"), |b| {
            let ds = build_dataset(n);
            let mut renderer = FrameRenderer::new(FrameOptions { draw_labels: false, ..FrameOptions::default() });
            b.iter(|| -> Result<()> {
                let frame = ds.frames().next().expect("one frame");
                let bytes = renderer.render_png_bytes(&frame, &ds.axis)?;
                black_box(bytes);
                Ok(())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
