use crate::foundation::core::{PixelBounds, Rect};

/// Distance kept between captions and the canvas edges.
pub const DEFAULT_MARGIN_PX: f64 = 20.0;
/// Canvas size (shorter side) at which preview text is drawn at its configured size.
pub const PREVIEW_REFERENCE_PX: f64 = 800.0;
/// Smallest preview caption size.
pub const PREVIEW_MIN_FONT_SIZE: f32 = 20.0;
/// Largest preview caption size.
pub const PREVIEW_MAX_FONT_SIZE: f32 = 100.0;

/// Canvas band a caption is anchored to.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Upper half, text hangs from the top margin.
    #[default]
    Top,
    /// Lower half, text sits on the bottom margin.
    Bottom,
}

/// Vertical anchoring of a text block inside its frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalAlign {
    /// First line starts at the frame top.
    Top,
    /// Last line ends at the frame bottom.
    Bottom,
}

/// Layout tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutOpts {
    /// Edge margin in pixels; shrunk on small canvases.
    pub margin_px: f64,
    /// See [`PREVIEW_REFERENCE_PX`].
    pub preview_reference_px: f64,
}

impl Default for LayoutOpts {
    fn default() -> Self {
        Self {
            margin_px: DEFAULT_MARGIN_PX,
            preview_reference_px: PREVIEW_REFERENCE_PX,
        }
    }
}

/// Where a caption may draw and how it is anchored.
///
/// Lines are always centered horizontally inside `rect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFrame {
    /// Drawable region in canvas pixels. Nothing is drawn outside it.
    pub rect: Rect,
    /// Vertical anchoring.
    pub valign: VerticalAlign,
}

impl TextFrame {
    /// Pixels covered by the frame.
    pub fn pixel_bounds(&self) -> PixelBounds {
        PixelBounds::covering(self.rect)
    }
}

/// Frame for a caption at `placement` on a `canvas_w x canvas_h` canvas.
///
/// Each band spans the canvas width minus the margins and half of its height: the top
/// band runs from the top margin to the middle, the bottom band from the middle to the
/// bottom margin.
pub fn layout_frame(
    canvas_w: u32,
    canvas_h: u32,
    placement: Placement,
    opts: &LayoutOpts,
) -> TextFrame {
    let valign = match placement {
        Placement::Top => VerticalAlign::Top,
        Placement::Bottom => VerticalAlign::Bottom,
    };
    if canvas_w == 0 || canvas_h == 0 {
        return TextFrame {
            rect: Rect::ZERO,
            valign,
        };
    }

    let (w, h) = (f64::from(canvas_w), f64::from(canvas_h));
    let m = margin_for(w, h, opts.margin_px);
    let mid = h / 2.0;
    let rect = match placement {
        Placement::Top => Rect::new(m, m, w - m, mid),
        Placement::Bottom => Rect::new(m, mid, w - m, h - m),
    };
    TextFrame { rect, valign }
}

/// Caption size for on-screen previews: `size * min(w, h) / reference`, clamped to
/// `[PREVIEW_MIN_FONT_SIZE, PREVIEW_MAX_FONT_SIZE]`.
pub fn preview_font_size(size: f32, canvas_w: u32, canvas_h: u32, opts: &LayoutOpts) -> f32 {
    let reference = if opts.preview_reference_px.is_finite() && opts.preview_reference_px > 0.0 {
        opts.preview_reference_px
    } else {
        PREVIEW_REFERENCE_PX
    };
    let ratio = f64::from(canvas_w.min(canvas_h)) / reference;
    let scaled = (f64::from(size) * ratio) as f32;
    scaled.clamp(PREVIEW_MIN_FONT_SIZE, PREVIEW_MAX_FONT_SIZE)
}

fn margin_for(w: f64, h: f64, requested: f64) -> f64 {
    let requested = if requested.is_finite() {
        requested.max(0.0)
    } else {
        DEFAULT_MARGIN_PX
    };
    requested.min(w.min(h) / 8.0)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/solver.rs"]
mod tests;
