use std::io::Cursor;
use std::path::Path;

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder as _};

use crate::foundation::error::{MemeError, MemeResult};
use crate::raster::buffer::PixelBuffer;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Export settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOpts {
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Output container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless, best compression, alpha kept.
    Png,
    /// Lossy; alpha is flattened onto white.
    Jpeg {
        /// 1-100.
        quality: u8,
    },
}

impl ExportFormat {
    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Format implied by `path`'s extension: `.png`, `.jpg` or `.jpeg` (any case).
pub fn format_for_path(path: &Path, opts: &ExportOpts) -> MemeResult<ExportFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok(ExportFormat::Png),
        "jpg" | "jpeg" => Ok(ExportFormat::Jpeg {
            quality: opts.jpeg_quality.clamp(1, 100),
        }),
        _ => Err(MemeError::invalid_input(format!(
            "unsupported export extension for '{}' (expected .png, .jpg or .jpeg)",
            path.display()
        ))),
    }
}

/// Encode `image` in memory.
pub fn encode_image(image: &PixelBuffer, format: ExportFormat) -> MemeResult<Vec<u8>> {
    if image.is_empty() {
        return Err(MemeError::invalid_input("cannot encode an empty image"));
    }
    let mut out = Vec::new();
    match format {
        ExportFormat::Png => {
            PngEncoder::new_with_quality(
                Cursor::new(&mut out),
                CompressionType::Best,
                FilterType::Adaptive,
            )
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgba8,
            )
            .context("encode png")?;
        }
        ExportFormat::Jpeg { quality } => {
            let rgb = flatten_on_white(image);
            JpegEncoder::new_with_quality(Cursor::new(&mut out), quality.clamp(1, 100))
                .write_image(&rgb, image.width(), image.height(), ExtendedColorType::Rgb8)
                .context("encode jpeg")?;
        }
    }
    Ok(out)
}

/// Encode `image` for `path` and write it, creating missing parent directories.
pub fn save_image(image: &PixelBuffer, path: impl AsRef<Path>, opts: &ExportOpts) -> MemeResult<()> {
    let path = path.as_ref();
    let format = format_for_path(path, opts)?;
    let bytes = encode_image(image, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory '{}'", parent.display()))?;
    }
    std::fs::write(path, &bytes).with_context(|| format!("write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), ?format, "image saved");
    Ok(())
}

/// `meme_YYYYMMDD_HHMMSS.<ext>` for an export made at `at`.
pub fn default_file_name<Tz>(at: &chrono::DateTime<Tz>, format: ExportFormat) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("meme_{}.{}", at.format("%Y%m%d_%H%M%S"), format.extension())
}

/// RGB bytes of `image` composited over opaque white.
pub fn flatten_on_white(image: &PixelBuffer) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for px in image.as_raw().chunks_exact(4) {
        let a = u32::from(px[3]);
        for &c in &px[..3] {
            let v = (u32::from(c) * a + 255 * (255 - a) + 127) / 255;
            rgb.push(v as u8);
        }
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
