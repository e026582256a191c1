// File: crates/choropleth-render-skia/src/gif.rs
// Summary: Assemble PNG frames into a looping animated GIF.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use log::info;

/// Encode PNG images as GIF frames at `fps`, looping forever.
pub fn encode_gif<W, I>(writer: W, pngs: I, fps: u32) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Result<Vec<u8>>>,
{
    let mut encoder = GifEncoder::new_with_speed(writer, 10);
    encoder.set_repeat(Repeat::Infinite)?;
    let delay = Delay::from_numer_denom_ms(1000, fps.max(1));
    let mut count = 0usize;
    for png in pngs {
        let rgba = image::load_from_memory(&png?)
            .context("decoding frame")?
            .to_rgba8();
        encoder.encode_frame(Frame::from_parts(rgba, 0, 0, delay))?;
        count += 1;
    }
    Ok(count)
}

/// Read `frames` in order and write the animation to `output`.
pub fn write_gif(frames: &[PathBuf], output: impl AsRef<Path>, fps: u32) -> Result<()> {
    let output = output.as_ref();
    if frames.is_empty() {
        bail!("no frames to assemble into {}", output.display());
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    let pngs = frames
        .iter()
        .map(|p| std::fs::read(p).with_context(|| format!("reading frame {}", p.display())));
    let count = encode_gif(BufWriter::new(file), pngs, fps)?;
    info!("saved GIF {} ({count} frames at {fps} fps)", output.display());
    Ok(())
}
