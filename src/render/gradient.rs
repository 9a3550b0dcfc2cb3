use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::math::lerp_u8;
use crate::text::style::GradientKind;

/// Fixed color ramp shared by every gradient fill.
pub const GRADIENT_STOPS: [(f64, Rgba8); 3] =
    [(0.0, Rgba8::RED), (0.5, Rgba8::GREEN), (1.0, Rgba8::BLUE)];

/// Start angle of conical gradients, degrees counter-clockwise from the +x axis.
pub const CONICAL_START_DEG: f64 = 45.0;

/// A gradient laid over a rectangle in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
    /// Geometry.
    pub kind: GradientKind,
    /// Box the geometry is derived from.
    pub rect: Rect,
}

impl Gradient {
    /// Gradient of `kind` spanning `rect`.
    pub fn new(kind: GradientKind, rect: Rect) -> Self {
        Self { kind, rect }
    }

    /// Ramp position in `[0, 1]` at `p`. Points beyond the ends pad with the end stops.
    pub fn position_at(&self, p: Point) -> f64 {
        let t = match self.kind {
            GradientKind::Linear => {
                let start = Point::new(self.rect.x0, self.rect.y0);
                let axis = Point::new(self.rect.x1, self.rect.y1) - start;
                let len2 = axis.hypot2();
                if len2 <= f64::EPSILON {
                    0.0
                } else {
                    (p - start).dot(axis) / len2
                }
            }
            GradientKind::Radial => {
                let radius = self.rect.width().min(self.rect.height()) / 2.0;
                if radius <= f64::EPSILON {
                    0.0
                } else {
                    (p - self.rect.center()).hypot() / radius
                }
            }
            GradientKind::Conical => {
                let d = p - self.rect.center();
                // Screen y grows downward; flip it so angles run counter-clockwise.
                let angle = (-d.y).atan2(d.x).to_degrees();
                (angle - CONICAL_START_DEG).rem_euclid(360.0) / 360.0
            }
        };
        t.clamp(0.0, 1.0)
    }

    /// Ramp color at `p`.
    pub fn color_at(&self, p: Point) -> Rgba8 {
        sample_stops(self.position_at(p))
    }
}

/// Color of the fixed ramp at `t`.
pub fn sample_stops(t: f64) -> Rgba8 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    for pair in GRADIENT_STOPS.windows(2) {
        let ((t0, c0), (t1, c1)) = (pair[0], pair[1]);
        if t <= t1 {
            let local = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            return Rgba8::new(
                lerp_u8(c0.r, c1.r, local),
                lerp_u8(c0.g, c1.g, local),
                lerp_u8(c0.b, c1.b, local),
                lerp_u8(c0.a, c1.a, local),
            );
        }
    }
    GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;
