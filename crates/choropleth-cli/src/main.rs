// File: crates/choropleth-cli/src/main.rs
// Summary: Entry point: prepares the dataset once, then drives the requested sinks.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use choropleth_core::export::{write_geojson, LongTableSink};
use choropleth_core::html::HtmlMapSink;
use choropleth_core::{format_pounds, log_ticks, PipelineConfig, PreparedDataset};
use choropleth_render_skia::{FrameOptions, SkiaFrameSink};

mod cli;

use cli::{Cli, Commands, Inputs};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Gif { inputs, frames_dir, output } => {
            let dataset = prepare(&inputs)?;
            let mut frames = SkiaFrameSink::new(&frames_dir, FrameOptions::default()).with_gif(&output);
            dataset.render(&mut [&mut frames])?;
            println!(
                "Saved {} frames to {} and GIF to {}",
                frames.frames().len(),
                frames_dir.display(),
                output.display()
            );
        }
        Commands::Export { inputs, geojson, long_csv } => {
            let dataset = prepare(&inputs)?;
            let mut table = LongTableSink::create(&long_csv)?;
            dataset.render(&mut [&mut table])?;
            let features = write_geojson(&dataset, &geojson)?;
            println!("Saved {features} features to {}", geojson.display());
            println!("Saved long table to {}", long_csv.display());
        }
        Commands::Html { inputs, output } => {
            let dataset = prepare(&inputs)?;
            let mut page = HtmlMapSink::new(&output, &dataset)?;
            dataset.render(&mut [&mut page])?;
            println!("Saved interactive map to {}", output.display());
        }
        Commands::Ticks { min, max } => {
            let ticks = log_ticks(min, max);
            if ticks.is_empty() {
                println!("no 1-2-5 ticks in [{min}, {max}]");
            }
            for t in ticks {
                println!("{t}\t{}", format_pounds(t));
            }
        }
    }
    Ok(())
}

fn prepare(inputs: &Inputs) -> Result<PreparedDataset> {
    let config = PipelineConfig::new(&inputs.prices, &inputs.boundaries);
    let dataset = PreparedDataset::load(&config).with_context(|| {
        format!(
            "failed to prepare '{}' with '{}'",
            inputs.prices.display(),
            inputs.boundaries.display()
        )
    })?;
    let range = dataset.range();
    info!(
        "{} regions, {} periods, colour range {} .. {}",
        dataset.regions.len(),
        dataset.periods.len(),
        format_pounds(range.vmin),
        format_pounds(range.vmax)
    );
    Ok(dataset)
}
