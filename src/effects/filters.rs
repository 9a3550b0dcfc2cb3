use rand::Rng;
use rayon::prelude::*;

use crate::effects::blur::box_blur;
use crate::foundation::error::{MemeError, MemeResult};
use crate::foundation::math::clamp_u8;
use crate::raster::buffer::PixelBuffer;

/// Share of pixels touched by the vintage grain pass.
pub const VINTAGE_NOISE_PROBABILITY: f64 = 0.02;

/// A whole-image filter and its parameters.
///
/// Every intensity is expected in `[0, 1]`; values outside are clamped when the filter is
/// applied, never rejected. JSON input goes through [`FilterKind::from_name`], so unknown
/// kinds are [`MemeError::InvalidInput`] and a missing intensity means `1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", try_from = "FilterSpec")]
pub enum FilterKind {
    /// Identity.
    #[default]
    None,
    /// ITU-R BT.601 luma.
    Grayscale,
    /// Additive warm tint.
    Sepia {
        /// Tint strength.
        intensity: f32,
    },
    /// Box blur with `radius = round(3 * intensity)`.
    Blur {
        /// Blur strength.
        intensity: f32,
    },
    /// Color negative.
    Invert,
    /// Sepia plus sparse random grain.
    Vintage {
        /// Tint and grain strength.
        intensity: f32,
    },
    /// Channel gain `1 + 0.5 * intensity`.
    Brightness {
        /// Gain strength.
        intensity: f32,
    },
    /// Contrast stretch around mid-gray by `1 + 0.5 * intensity`.
    Contrast {
        /// Stretch strength.
        intensity: f32,
    },
}

/// Wire form of a filter before the name is checked.
#[derive(serde::Deserialize)]
struct FilterSpec {
    kind: String,
    #[serde(default = "full_intensity")]
    intensity: f32,
}

fn full_intensity() -> f32 {
    1.0
}

impl TryFrom<FilterSpec> for FilterKind {
    type Error = MemeError;

    fn try_from(raw: FilterSpec) -> Result<Self, Self::Error> {
        Self::from_name(&raw.kind, raw.intensity)
    }
}

impl FilterKind {
    /// Every filter name accepted by [`FilterKind::from_name`].
    pub const NAMES: [&'static str; 8] = [
        "none",
        "grayscale",
        "sepia",
        "blur",
        "invert",
        "vintage",
        "brightness",
        "contrast",
    ];

    /// Parse a filter name (case-insensitive, `-`/`_` agnostic) with an intensity.
    pub fn from_name(name: &str, intensity: f32) -> MemeResult<Self> {
        let key = name.trim().to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "none" | "" => Ok(Self::None),
            "grayscale" | "greyscale" | "black_and_white" => Ok(Self::Grayscale),
            "sepia" => Ok(Self::Sepia { intensity }),
            "blur" => Ok(Self::Blur { intensity }),
            "invert" => Ok(Self::Invert),
            "vintage" => Ok(Self::Vintage { intensity }),
            "brightness" => Ok(Self::Brightness { intensity }),
            "contrast" => Ok(Self::Contrast { intensity }),
            _ => Err(MemeError::invalid_input(format!(
                "unknown filter '{name}' (expected one of {})",
                Self::NAMES.join(", ")
            ))),
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Grayscale => "grayscale",
            Self::Sepia { .. } => "sepia",
            Self::Blur { .. } => "blur",
            Self::Invert => "invert",
            Self::Vintage { .. } => "vintage",
            Self::Brightness { .. } => "brightness",
            Self::Contrast { .. } => "contrast",
        }
    }

    /// Box blur radius in pixels, `0` for every non-blur filter.
    pub fn blur_radius(self) -> u32 {
        match self {
            Self::Blur { intensity } => blur_radius(clamp_intensity("blur", intensity)),
            _ => 0,
        }
    }
}

/// Apply `filter` to a copy of `src`.
///
/// `rng` is only consumed by [`FilterKind::Vintage`]; pass a seeded generator for
/// reproducible output.
#[tracing::instrument(skip(src, rng), fields(width = src.width(), height = src.height()))]
pub fn apply_filter<R: Rng + ?Sized>(
    src: &PixelBuffer,
    filter: FilterKind,
    rng: &mut R,
) -> PixelBuffer {
    if src.is_empty() {
        return src.clone();
    }
    match filter {
        FilterKind::None => src.clone(),
        FilterKind::Grayscale => map_pixels(src, grayscale_px),
        FilterKind::Sepia { intensity } => {
            let depth = sepia_depth(clamp_intensity("sepia", intensity));
            map_pixels(src, |px| sepia_px(px, depth))
        }
        FilterKind::Blur { intensity } => {
            box_blur(src, blur_radius(clamp_intensity("blur", intensity)))
        }
        FilterKind::Invert => map_pixels(src, invert_px),
        FilterKind::Vintage { intensity } => {
            let intensity = clamp_intensity("vintage", intensity);
            let depth = sepia_depth(intensity);
            let mut out = map_pixels(src, |px| sepia_px(px, depth));
            add_grain(&mut out, (10.0 * intensity) as i32, rng);
            out
        }
        FilterKind::Brightness { intensity } => {
            let factor = gain_factor(clamp_intensity("brightness", intensity));
            map_pixels(src, |px| brightness_px(px, factor))
        }
        FilterKind::Contrast { intensity } => {
            let factor = gain_factor(clamp_intensity("contrast", intensity));
            map_pixels(src, |px| contrast_px(px, factor))
        }
    }
}

/// Gray value `round(0.299 R + 0.587 G + 0.114 B)`, replicated to R, G, B.
pub fn grayscale_px(px: [u8; 4]) -> [u8; 4] {
    let luma = 299 * u32::from(px[0]) + 587 * u32::from(px[1]) + 114 * u32::from(px[2]);
    let g = ((luma + 500) / 1000) as u8;
    [g, g, g, px[3]]
}

/// Additive sepia: `R + 2d`, `G + d`, `B - d`, saturating.
pub fn sepia_px(px: [u8; 4], depth: i32) -> [u8; 4] {
    [
        clamp_u8(i32::from(px[0]) + 2 * depth),
        clamp_u8(i32::from(px[1]) + depth),
        clamp_u8(i32::from(px[2]) - depth),
        px[3],
    ]
}

/// `255 - C` on the color channels.
pub fn invert_px(px: [u8; 4]) -> [u8; 4] {
    [255 - px[0], 255 - px[1], 255 - px[2], px[3]]
}

/// `min(255, trunc(C * factor))`.
pub fn brightness_px(px: [u8; 4], factor: f32) -> [u8; 4] {
    let f = |c: u8| clamp_u8((f32::from(c) * factor) as i32);
    [f(px[0]), f(px[1]), f(px[2]), px[3]]
}

/// `clamp(trunc((C - 127) * factor + 127))`.
pub fn contrast_px(px: [u8; 4], factor: f32) -> [u8; 4] {
    let f = |c: u8| clamp_u8(((f32::from(c) - 127.0) * factor + 127.0) as i32);
    [f(px[0]), f(px[1]), f(px[2]), px[3]]
}

fn map_pixels(src: &PixelBuffer, f: impl Fn([u8; 4]) -> [u8; 4] + Sync) -> PixelBuffer {
    let mut out = src.clone();
    out.par_rows_mut().for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let v = f([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&v);
        }
    });
    out
}

fn add_grain<R: Rng + ?Sized>(buf: &mut PixelBuffer, amplitude: i32, rng: &mut R) {
    let amplitude = amplitude.max(0);
    for px in buf.as_raw_mut().chunks_exact_mut(4) {
        if !rng.gen_bool(VINTAGE_NOISE_PROBABILITY) {
            continue;
        }
        let n = rng.gen_range(-amplitude..=amplitude);
        for c in &mut px[..3] {
            *c = clamp_u8(i32::from(*c) + n);
        }
    }
}

fn sepia_depth(intensity: f32) -> i32 {
    (30.0 * intensity) as i32
}

fn blur_radius(intensity: f32) -> u32 {
    (3.0 * intensity).round() as u32
}

fn gain_factor(intensity: f32) -> f32 {
    1.0 + 0.5 * intensity
}

fn clamp_intensity(filter: &str, intensity: f32) -> f32 {
    let clamped = if intensity.is_finite() {
        intensity.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if clamped != intensity {
        tracing::debug!(filter, intensity, clamped, "filter intensity clamped");
    }
    clamped
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filters.rs"]
mod tests;
