// File: crates/choropleth-cli/src/cli.rs
// Summary: Command-line arguments for the `choropleth` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "choropleth", version, about = "UK local authority house-price choropleth")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one PNG per December period and assemble an animated GIF.
    Gif {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, default_value = "frames_fancy", help = "Directory for per-period PNG frames")]
        frames_dir: PathBuf,
        #[arg(long, short, default_value = "house_price_choropleth_fancy.gif")]
        output: PathBuf,
    },
    /// Write WGS84 GeoJSON and a long (region x period) CSV for interactive maps.
    Export {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, default_value = "uk_lad_prices.geojson")]
        geojson: PathBuf,
        #[arg(long, default_value = "uk_lad_prices_long.csv")]
        long_csv: PathBuf,
    },
    /// Write a standalone interactive map (Plotly) with a year slider.
    Html {
        #[command(flatten)]
        inputs: Inputs,
        #[arg(long, short, default_value = "uk_lad_prices_interactive.html")]
        output: PathBuf,
    },
    /// Print 1-2-5 log ticks between two positive bounds.
    Ticks {
        #[arg(allow_negative_numbers = true)]
        min: f64,
        #[arg(allow_negative_numbers = true)]
        max: f64,
    },
}

#[derive(Args, Debug)]
pub struct Inputs {
    #[arg(long, help = "Price table CSV with 'Year ending Dec YYYY' columns")]
    pub prices: PathBuf,
    #[arg(long, help = "LAD boundary GeoJSON (LAD22CD or LAD24CD property)")]
    pub boundaries: PathBuf,
}
