// File: crates/choropleth-core/src/html.rs
// Summary: Standalone interactive choropleth page (Plotly from CDN) with a year slider and £ log colour bar.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;
use serde_json::{json, Value};

use crate::axis::ColorAxis;
use crate::export::wgs84_collection;
use crate::normalize::CODE_COLUMN;
use crate::pipeline::{Frame, PreparedDataset};
use crate::sink::RenderSink;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const DEFAULT_HTML_TITLE: &str = "UK Local Authority House Prices: Year ending December";
const COLORSCALE: &str = "Inferno";
const PLOT_ID: &str = "choropleth";

/// Collects every frame as a Plotly animation frame and writes one HTML page
/// on `finish`. Colours are log10 prices; hover shows the price in pounds.
pub struct HtmlMapSink {
    path: PathBuf,
    title: String,
    geojson: Value,
    axis: Option<ColorAxis>,
    frames: Vec<Value>,
    steps: Vec<Value>,
}

impl HtmlMapSink {
    /// Embeds the dataset's regions as WGS84 GeoJSON; frames arrive through
    /// [`RenderSink::render_frame`].
    pub fn new(path: impl AsRef<Path>, dataset: &PreparedDataset) -> Result<Self> {
        let geojson = serde_json::to_value(wgs84_collection(dataset)).context("serialising boundaries")?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            title: DEFAULT_HTML_TITLE.to_string(),
            geojson,
            axis: None,
            frames: Vec::with_capacity(dataset.periods.len()),
            steps: Vec::with_capacity(dataset.periods.len()),
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn trace(frame: &Frame<'_>) -> Value {
        let mut locations = Vec::with_capacity(frame.regions.len());
        let mut z = Vec::with_capacity(frame.regions.len());
        let mut prices = Vec::with_capacity(frame.regions.len());
        let mut names = Vec::with_capacity(frame.regions.len());
        for (region, value) in frame.values() {
            locations.push(region.code.as_str());
            z.push(value.map(f64::log10));
            prices.push(value);
            names.push(region.name.as_deref().unwrap_or(region.code.as_str()));
        }
        json!({
            "type": "choropleth",
            "locations": locations,
            "z": z,
            "customdata": prices,
            "text": names,
            "coloraxis": "coloraxis",
            "featureidkey": format!("properties.{CODE_COLUMN}"),
            "hovertemplate": "<b>%{text}</b><br>price=£%{customdata:,.0f}<extra></extra>",
        })
    }

    fn layout(&self, axis: &ColorAxis) -> Value {
        let mut colorbar = json!({ "title": { "text": axis.label }, "len": 0.75 });
        if !axis.uses_default_ticks() {
            colorbar["tickvals"] = json!(axis.ticks.iter().map(|t| t.log_position).collect::<Vec<_>>());
            colorbar["ticktext"] = json!(axis.ticks.iter().map(|t| t.label.as_str()).collect::<Vec<_>>());
        }
        let play = json!({ "frame": { "duration": 500, "redraw": true }, "fromcurrent": true, "transition": { "duration": 0 } });
        let pause = json!({ "frame": { "duration": 0, "redraw": false }, "mode": "immediate", "transition": { "duration": 0 } });
        json!({
            "title": { "text": self.title, "x": 0.01, "xanchor": "left", "y": 0.98, "font": { "size": 20 } },
            "margin": { "l": 10, "r": 10, "t": 50, "b": 10 },
            "geo": { "fitbounds": "locations", "visible": false },
            "coloraxis": {
                "colorscale": COLORSCALE,
                "cmin": axis.range.vmin.log10(),
                "cmax": axis.range.vmax.max(axis.range.vmin).log10(),
                "colorbar": colorbar,
            },
            "sliders": [{
                "active": 0,
                "currentvalue": { "prefix": "year=" },
                "pad": { "t": 30 },
                "steps": self.steps,
            }],
            "updatemenus": [{
                "type": "buttons",
                "direction": "left",
                "showactive": false,
                "x": 0.1,
                "y": 0,
                "xanchor": "right",
                "yanchor": "top",
                "pad": { "r": 10, "t": 40 },
                "buttons": [
                    { "label": "&#9654;", "method": "animate", "args": [null, play] },
                    { "label": "&#9724;", "method": "animate", "args": [[null], pause] },
                ],
            }],
        })
    }

    /// The full page for the frames seen so far.
    pub fn page(&self) -> Result<String> {
        let (Some(first), Some(axis)) = (self.frames.first(), self.axis.as_ref()) else {
            bail!("no frames to write");
        };
        let mut initial = first["data"][0].clone();
        initial["geojson"] = self.geojson.clone();
        let figure = json!({
            "data": [initial],
            "layout": self.layout(axis),
            "frames": self.frames,
        });
        let figure = script_safe(&serde_json::to_string(&figure)?);
        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{PLOTLY_CDN}" charset="utf-8"></script>
</head>
<body>
<div id="{PLOT_ID}" style="height:100vh;width:100%;"></div>
<script type="text/javascript">
const figure = {figure};
Plotly.newPlot("{PLOT_ID}", figure.data, figure.layout, {{ responsive: true }}).then(function () {{
  Plotly.addFrames("{PLOT_ID}", figure.frames);
}});
</script>
</body>
</html>
"#,
            title = escape_text(&self.title),
        ))
    }
}

impl RenderSink for HtmlMapSink {
    fn id(&self) -> &'static str {
        "plotly-html"
    }

    fn render_frame(&mut self, frame: &Frame<'_>, axis: &ColorAxis) -> Result<()> {
        if self.axis.is_none() {
            self.axis = Some(axis.clone());
        }
        // frame names must be unique; slider labels show the year
        let name = frame.period.column.clone();
        self.steps.push(json!({
            "label": frame.year().to_string(),
            "method": "animate",
            "args": [[name], { "mode": "immediate", "frame": { "duration": 0, "redraw": true }, "transition": { "duration": 0 } }],
        }));
        self.frames.push(json!({ "name": name, "data": [Self::trace(frame)] }));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let page = self.page()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, page).with_context(|| format!("writing {}", self.path.display()))?;
        info!("wrote {} frames to {}", self.frames.len(), self.path.display());
        Ok(())
    }
}

/// Keep embedded JSON from closing the surrounding script element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
