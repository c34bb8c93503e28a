//! Encoders for a finished frame buffer.

use crate::color::write_color;
use crate::render::{CHANNELS, FrameBuffer};
use crate::rtweekend::RenderError;
use image::RgbImage;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `image` to `path`, choosing PNG or PPM from the extension.
pub fn save_image(path: &Path, image: &FrameBuffer) -> Result<(), RenderError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => save_png(path, image)?,
        "ppm" => {
            let mut out = BufWriter::new(File::create(path)?);
            write_ppm(&mut out, image)?;
            out.flush()?;
        }
        _ => return Err(RenderError::UnsupportedFormat(extension)),
    }
    info!("Saved {}", path.display());
    Ok(())
}

pub fn to_rgb_image(image: &FrameBuffer) -> RgbImage {
    let bytes = image.to_rgb8();
    debug_assert_eq!(bytes.len(), image.width() as usize * image.height() as usize * CHANNELS);
    RgbImage::from_raw(image.width(), image.height(), bytes)
        .unwrap_or_else(|| RgbImage::new(image.width(), image.height()))
}

pub fn save_png(path: &Path, image: &FrameBuffer) -> Result<(), RenderError> {
    to_rgb_image(image).save(path)?;
    Ok(())
}

/// Plain-text PPM (P3), top row first.
pub fn write_ppm<W: Write>(out: &mut W, image: &FrameBuffer) -> io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width(), image.height())?;
    writeln!(out, "255")?;
    for rgb in image.to_rgb8().chunks_exact(CHANNELS) {
        write_color(out, [rgb[0], rgb[1], rgb[2]])?;
    }
    Ok(())
}
