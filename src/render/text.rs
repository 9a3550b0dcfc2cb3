use ab_glyph::{Font as _, FontArc, OutlinedGlyph, PxScale, ScaleFont as _, point};

use crate::foundation::core::{PixelBounds, Point, Rgba8};
use crate::layout::lines::{TextLayout, layout_lines, place_block};
use crate::layout::solver::TextFrame;
use crate::raster::buffer::PixelBuffer;
use crate::render::gradient::Gradient;
use crate::text::style::{Fill, SHADOW_COLOR, SHADOW_OFFSET, TextStyle};

/// Source color of one compositing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// Uniform color.
    Solid(Rgba8),
    /// Color sampled per destination pixel center.
    Gradient(Gradient),
}

impl Paint {
    /// Color for the destination pixel `(x, y)`.
    pub fn color_at(&self, x: i64, y: i64) -> Rgba8 {
        match self {
            Self::Solid(c) => *c,
            Self::Gradient(g) => g.color_at(Point::new(x as f64 + 0.5, y as f64 + 0.5)),
        }
    }
}

/// Glyph coverage of a whole caption, rasterized once and reused by every pass.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverageMask {
    /// Canvas x of the mask's first column.
    pub x0: i64,
    /// Canvas y of the mask's first row.
    pub y0: i64,
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Row-major coverage in `[0, 1]`.
    pub data: Vec<f32>,
}

impl CoverageMask {
    /// Rasterize the laid-out lines at the given origins (left edge, baseline).
    pub fn rasterize(font: &FontArc, size: f32, layout: &TextLayout, origins: &[Point]) -> Self {
        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);

        let mut outlined: Vec<OutlinedGlyph> = Vec::new();
        for (line, origin) in layout.lines.iter().zip(origins) {
            let mut caret = origin.x as f32;
            let baseline = origin.y as f32;
            let mut prev = None;
            for ch in line.text.chars() {
                let id = scaled.glyph_id(ch);
                if let Some(p) = prev {
                    caret += scaled.kern(p, id);
                }
                let glyph = id.with_scale_and_position(scale, point(caret, baseline));
                caret += scaled.h_advance(id);
                prev = Some(id);
                if let Some(g) = font.outline_glyph(glyph) {
                    outlined.push(g);
                }
            }
        }

        let Some(bounds) = outlined
            .iter()
            .map(|g| {
                let b = g.px_bounds();
                PixelBounds {
                    x0: b.min.x.floor() as i64,
                    y0: b.min.y.floor() as i64,
                    x1: b.max.x.ceil() as i64,
                    y1: b.max.y.ceil() as i64,
                }
            })
            .reduce(|a, b| PixelBounds {
                x0: a.x0.min(b.x0),
                y0: a.y0.min(b.y0),
                x1: a.x1.max(b.x1),
                y1: a.y1.max(b.y1),
            })
        else {
            return Self::empty();
        };

        let width = (bounds.x1 - bounds.x0).max(0) as usize;
        let height = (bounds.y1 - bounds.y0).max(0) as usize;
        let mut data = vec![0.0f32; width * height];
        for g in &outlined {
            let b = g.px_bounds();
            let gx = b.min.x.floor() as i64 - bounds.x0;
            let gy = b.min.y.floor() as i64 - bounds.y0;
            g.draw(|x, y, c| {
                let mx = gx + i64::from(x);
                let my = gy + i64::from(y);
                if mx < 0 || my < 0 || mx as usize >= width || my as usize >= height {
                    return;
                }
                let cell = &mut data[my as usize * width + mx as usize];
                *cell = (*cell + c).min(1.0);
            });
        }

        Self {
            x0: bounds.x0,
            y0: bounds.y0,
            width,
            height,
            data,
        }
    }

    /// Mask covering nothing.
    pub fn empty() -> Self {
        Self {
            x0: 0,
            y0: 0,
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// `true` when no pixel has coverage.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&c| c <= 0.0)
    }

    /// Blend `paint` through the mask shifted by `(dx, dy)`; pixels outside `clip` are left alone.
    pub fn composite(
        &self,
        canvas: &mut PixelBuffer,
        offset: (i64, i64),
        clip: PixelBounds,
        paint: &Paint,
    ) {
        if clip.is_empty() {
            return;
        }
        let (dx, dy) = offset;
        for (my, row) in self.data.chunks_exact(self.width.max(1)).enumerate() {
            let y = self.y0 + my as i64 + dy;
            if y < clip.y0 || y >= clip.y1 {
                continue;
            }
            for (mx, &coverage) in row.iter().enumerate() {
                if coverage <= 0.0 {
                    continue;
                }
                let x = self.x0 + mx as i64 + dx;
                if x < clip.x0 || x >= clip.x1 {
                    continue;
                }
                canvas.blend_pixel(x, y, paint.color_at(x, y), coverage);
            }
        }
    }
}

/// Offsets of the outline pass: diagonals, then horizontals, then verticals, growing
/// outward one pixel ring at a time.
pub fn outline_offsets(width: u32) -> Vec<(i64, i64)> {
    let mut out = Vec::with_capacity(width as usize * 8);
    for k in 1..=i64::from(width) {
        out.extend_from_slice(&[
            (k, k),
            (k, -k),
            (-k, k),
            (-k, -k),
            (k, 0),
            (-k, 0),
            (0, k),
            (0, -k),
        ]);
    }
    out
}

/// Draw `text` inside `frame` on `canvas` with `style`, at `size` pixels.
///
/// Passes run shadow, outline, fill. Every pass is clipped to the frame's pixel bounds.
/// Blank text leaves the canvas untouched.
pub fn draw_text(
    canvas: &mut PixelBuffer,
    frame: &TextFrame,
    text: &str,
    style: &TextStyle,
    font: &FontArc,
    size: f32,
) {
    if text.trim().is_empty() || canvas.is_empty() || !(size.is_finite() && size > 0.0) {
        return;
    }
    let clip = frame.pixel_bounds().clamp_to(canvas.width(), canvas.height());
    if clip.is_empty() {
        return;
    }

    let layout = layout_lines(font, size, text, frame.rect.width() as f32);
    let placed = place_block(frame, &layout);
    let mask = CoverageMask::rasterize(font, size, &layout, &placed.origins);
    if mask.is_blank() {
        return;
    }

    if style.shadow.enabled {
        mask.composite(canvas, SHADOW_OFFSET, clip, &Paint::Solid(SHADOW_COLOR));
    }

    let outline = Paint::Solid(style.outline.color);
    for offset in outline_offsets(style.outline.effective_width()) {
        mask.composite(canvas, offset, clip, &outline);
    }

    let fill = match style.fill {
        Fill::Solid { color } => Paint::Solid(color),
        Fill::Gradient { kind } => Paint::Gradient(Gradient::new(kind, placed.bounds)),
    };
    mask.composite(canvas, (0, 0), clip, &fill);
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
