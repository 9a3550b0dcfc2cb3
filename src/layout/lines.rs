use ab_glyph::{Font as _, FontArc, PxScale, ScaleFont as _};

use crate::foundation::core::{Point, Rect};
use crate::layout::solver::{TextFrame, VerticalAlign};

/// One visual line after explicit breaks and wrapping.
#[derive(Clone, Debug, PartialEq)]
pub struct LaidLine {
    /// Line text without surrounding whitespace.
    pub text: String,
    /// Advance width in pixels.
    pub width: f32,
}

/// Lines of a caption with the vertical metrics of the font at the layout size.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    /// Lines in reading order.
    pub lines: Vec<LaidLine>,
    /// Baseline distance from the line top.
    pub ascent: f32,
    /// Ascent minus descent.
    pub line_height: f32,
    /// Extra space between consecutive lines.
    pub line_gap: f32,
}

impl TextLayout {
    /// Height from the first line top to the last line bottom.
    pub fn block_height(&self) -> f32 {
        let n = self.lines.len() as f32;
        if n == 0.0 {
            return 0.0;
        }
        n * self.line_height + (n - 1.0) * self.line_gap
    }

    /// Widest line.
    pub fn block_width(&self) -> f32 {
        self.lines.iter().map(|l| l.width).fold(0.0, f32::max)
    }
}

/// Line origins (left edge, baseline) in canvas pixels plus the block's bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBlock {
    /// One origin per [`TextLayout::lines`] entry.
    pub origins: Vec<Point>,
    /// Box around every line's advance area.
    pub bounds: Rect,
}

/// Advance width of a single line, kerning included.
pub fn measure_line(font: &FontArc, size: f32, line: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0f32;
    let mut prev = None;
    for ch in line.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

/// Split `text` on `\n`, then greedily wrap words so each line fits `max_width` where
/// possible. A single word wider than `max_width` keeps a line of its own.
pub fn layout_lines(font: &FontArc, size: f32, text: &str, max_width: f32) -> TextLayout {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if max_width > 0.0 && measure_line(font, size, &candidate) > max_width {
                let width = measure_line(font, size, &current);
                lines.push(LaidLine {
                    text: std::mem::replace(&mut current, word.to_string()),
                    width,
                });
            } else {
                current = candidate;
            }
        }
        let width = measure_line(font, size, &current);
        lines.push(LaidLine {
            text: current,
            width,
        });
    }

    TextLayout {
        lines,
        ascent: scaled.ascent(),
        line_height: scaled.height(),
        line_gap: scaled.line_gap().max(0.0),
    }
}

/// Position `layout` inside `frame`: every line centered horizontally, the block hung
/// from the top or stood on the bottom according to [`TextFrame::valign`].
pub fn place_block(frame: &TextFrame, layout: &TextLayout) -> PlacedBlock {
    let block_h = f64::from(layout.block_height());
    let top = match frame.valign {
        VerticalAlign::Top => frame.rect.y0,
        VerticalAlign::Bottom => frame.rect.y1 - block_h,
    };
    let center_x = frame.rect.center().x;
    let advance = f64::from(layout.line_height + layout.line_gap);

    let mut origins = Vec::with_capacity(layout.lines.len());
    let mut x0 = f64::INFINITY;
    let mut x1 = f64::NEG_INFINITY;
    for (i, line) in layout.lines.iter().enumerate() {
        let left = center_x - f64::from(line.width) / 2.0;
        let baseline = top + advance * i as f64 + f64::from(layout.ascent);
        origins.push(Point::new(left, baseline));
        x0 = x0.min(left);
        x1 = x1.max(left + f64::from(line.width));
    }
    let bounds = if origins.is_empty() {
        Rect::new(center_x, top, center_x, top)
    } else {
        Rect::new(x0, top, x1, top + block_h)
    };
    PlacedBlock { origins, bounds }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/lines.rs"]
mod tests;
