use crate::foundation::core::Rgba8;
use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::solver::Placement;

/// Family requested when a style does not name one.
pub const DEFAULT_FONT_FAMILY: &str = "Impact";
/// Caption size used when a style does not specify one.
pub const DEFAULT_FONT_SIZE: f32 = 36.0;
/// Smallest caption size in pixels.
pub const MIN_FONT_SIZE: f32 = 10.0;
/// Largest caption size in pixels.
pub const MAX_FONT_SIZE: f32 = 150.0;
/// Thickest outline in pixels.
pub const MAX_OUTLINE_WIDTH: u32 = 10;
/// Shadow displacement, right and down.
pub const SHADOW_OFFSET: (i64, i64) = (2, 2);
/// Shadow color: translucent black.
pub const SHADOW_COLOR: Rgba8 = Rgba8::new(0, 0, 0, 128);

/// Families offered by caption editors and by the random meme generator.
pub const AVAILABLE_FONTS: [&str; 8] = [
    "Arial",
    "Times New Roman",
    "Impact",
    "Comic Sans MS",
    "Verdana",
    "Courier New",
    "Georgia",
    "Trebuchet MS",
];

/// Geometry of a gradient fill. The color ramp is fixed: red, green, blue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum GradientKind {
    /// Top-left to bottom-right corner of the text box.
    Linear,
    /// Centered circle, radius half the smaller box dimension.
    Radial,
    /// Angular sweep around the center starting at 45 degrees.
    Conical,
}

impl GradientKind {
    /// Parse `linear`, `radial` or `conical` (case-insensitive).
    pub fn from_name(name: &str) -> MemeResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "radial" => Ok(Self::Radial),
            "conical" | "conic" => Ok(Self::Conical),
            _ => Err(MemeError::invalid_input(format!(
                "unknown gradient '{name}' (expected linear, radial or conical)"
            ))),
        }
    }
}

impl TryFrom<String> for GradientKind {
    type Error = MemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

/// How caption glyphs are painted in the final pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fill {
    /// One color.
    Solid {
        /// Fill color.
        color: Rgba8,
    },
    /// Fixed three-stop ramp over the text's bounding box.
    Gradient {
        /// Ramp geometry.
        kind: GradientKind,
    },
}

impl Default for Fill {
    fn default() -> Self {
        Self::Solid {
            color: Rgba8::WHITE,
        }
    }
}

/// Stroke approximation drawn under the fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Outline {
    /// Draw the outline pass.
    pub enabled: bool,
    /// Outline color.
    pub color: Rgba8,
    /// Stroke reach in pixels; `0` disables the pass.
    pub width: u32,
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgba8::BLACK,
            width: 2,
        }
    }
}

impl Outline {
    /// Width actually drawn: `0` when disabled, otherwise at most [`MAX_OUTLINE_WIDTH`].
    pub fn effective_width(&self) -> u32 {
        if self.enabled {
            self.width.min(MAX_OUTLINE_WIDTH)
        } else {
            0
        }
    }
}

/// Drop shadow; offset and color are fixed ([`SHADOW_OFFSET`], [`SHADOW_COLOR`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Shadow {
    /// Draw the shadow pass.
    pub enabled: bool,
}

/// Immutable description of how a caption looks.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Requested font family; unresolvable families fall back to the bundled face.
    pub font_family: String,
    /// Requested size in pixels, clamped to `[MIN_FONT_SIZE, MAX_FONT_SIZE]` at render time.
    pub font_size: f32,
    /// Final pass paint.
    pub fill: Fill,
    /// Outline pass.
    pub outline: Outline,
    /// Shadow pass.
    pub shadow: Shadow,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            fill: Fill::default(),
            outline: Outline::default(),
            shadow: Shadow::default(),
        }
    }
}

impl TextStyle {
    /// Plain solid-color text: no outline, no shadow.
    pub fn plain(color: Rgba8) -> Self {
        Self {
            fill: Fill::Solid { color },
            outline: Outline {
                enabled: false,
                ..Outline::default()
            },
            ..Self::default()
        }
    }

    /// Replace the fill.
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    /// Replace the outline.
    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = outline;
        self
    }

    /// Toggle the shadow pass.
    pub fn with_shadow(mut self, enabled: bool) -> Self {
        self.shadow = Shadow { enabled };
        self
    }

    /// Replace the family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Replace the requested size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Requested size clamped to the supported range. Non-finite sizes use the default.
    pub fn clamped_size(&self) -> f32 {
        let size = if self.font_size.is_finite() {
            self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
        } else {
            DEFAULT_FONT_SIZE
        };
        if size != self.font_size {
            tracing::debug!(requested = self.font_size, size, "font size clamped");
        }
        size
    }
}

/// One caption: content, band and look.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextBlock {
    /// Caption text; `\n` starts a new line.
    pub content: String,
    /// Band of the canvas the caption is anchored to.
    pub placement: Placement,
    /// Caption style.
    #[serde(default)]
    pub style: TextStyle,
}

impl TextBlock {
    /// Caption anchored to the top band.
    pub fn top(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            placement: Placement::Top,
            style,
        }
    }

    /// Caption anchored to the bottom band.
    pub fn bottom(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            placement: Placement::Bottom,
            style,
        }
    }

    /// `true` when nothing visible would be drawn.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/style.rs"]
mod tests;
