//! Image encoding: rendered page → opaque RGB → PNG on disk.
//!
//! PDFium renders into an RGBA bitmap. Pages with transparent regions would
//! produce PNGs that look black or checkered in some viewers, so alpha is
//! composited onto white before encoding and the PNG carries no alpha
//! channel.
//!
//! Each file is written to `<name>.tmp` and renamed into place, so a crash
//! mid-write never leaves a truncated PNG under the final name.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failure while encoding or writing a page.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Composite `img` onto a white background and drop the alpha channel.
pub fn flatten(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let [r, g, b, a] = src.0;
        *dst = Rgb([over_white(r, a), over_white(g, a), over_white(b, a)]);
    }
    out
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u16;
    let a = alpha as u16;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Write `img` as a PNG at `path`, replacing any existing file.
pub fn write_png(img: &RgbImage, path: &Path) -> Result<(), EncodeError> {
    let tmp = temp_path(path);
    let result = write_then_rename(img, &tmp, path);
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename(img: &RgbImage, tmp: &Path, path: &Path) -> Result<(), EncodeError> {
    let mut writer = BufWriter::new(File::create(tmp)?);
    img.write_to(&mut writer, ImageFormat::Png)?;
    writer.flush()?;
    drop(writer);

    std::fs::rename(tmp, path)?;
    debug!(
        "Wrote {} ({}x{} px)",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
