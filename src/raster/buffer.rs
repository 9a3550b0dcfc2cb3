use rayon::prelude::*;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{MemeError, MemeResult};

/// Owned 2D grid of straight-alpha RGBA8 samples, row-major, 4 bytes per pixel.
///
/// A buffer is either empty (`0x0`, no samples) or has both dimensions > 0 and exactly
/// `width * height * 4` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl PixelBuffer {
    /// A buffer with no pixels.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Fully transparent buffer. A zero dimension yields [`PixelBuffer::empty`].
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba8::TRANSPARENT)
    }

    /// Buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        if width == 0 || height == 0 {
            return Self::empty();
        }
        let px = color.to_array();
        Self {
            width,
            height,
            data: px.repeat(width as usize * height as usize),
        }
    }

    /// Wrap raw row-major RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> MemeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| MemeError::invalid_input("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(MemeError::invalid_input(format!(
                "pixel buffer expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        if expected == 0 {
            return Ok(Self::empty());
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` when the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Raw RGBA8 bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes.
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer, returning its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba8> {
        let i = self.index_of(x, y)?;
        Some(Rgba8::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Overwrite the pixel at `(x, y)`. Returns `false` outside the buffer.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba8) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.data[i..i + 4].copy_from_slice(&color.to_array());
                true
            }
            None => false,
        }
    }

    /// Source-over blend of `color` scaled by `coverage` (0..=1) onto `(x, y)`.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba8, coverage: f32) {
        let Some(i) = self.index_of(x, y) else {
            return;
        };
        let dst = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        let out = blend_over(dst, color.to_array(), coverage);
        self.data[i..i + 4].copy_from_slice(&out);
    }

    /// Iterate rows as `width * 4` byte slices.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.stride().max(1))
    }

    /// Iterate rows mutably.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let stride = self.stride().max(1);
        self.data.chunks_exact_mut(stride)
    }

    /// Parallel mutable row iterator.
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, u8> {
        let stride = self.stride().max(1);
        self.data.par_chunks_exact_mut(stride)
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| Rgba8::new(px[0], px[1], px[2], px[3]))
    }

    /// Copy into an [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbaImage::new(0, 0))
    }

    /// Take ownership of an [`image::RgbaImage`].
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Self::empty();
        }
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

/// Straight-alpha source-over of `src` (with extra `coverage`) onto `dst`.
pub fn blend_over(dst: [u8; 4], src: [u8; 4], coverage: f32) -> [u8; 4] {
    let sa = (f32::from(src[3]) / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = f32::from(dst[3]) / 255.0;
    let keep = da * (1.0 - sa);
    let oa = sa + keep;
    if oa <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (f32::from(src[c]) * sa + f32::from(dst[c]) * keep) / oa;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (oa * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
