use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::effects::filters::{FilterKind, apply_filter};
use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::solver::{LayoutOpts, layout_frame, preview_font_size};
use crate::raster::buffer::PixelBuffer;
use crate::render::fingerprint::MemeId;
use crate::render::text::draw_text;
use crate::text::font::FontBook;
use crate::text::style::TextBlock;

/// Which size rule applies to captions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Configured font sizes, clamped to the supported range.
    #[default]
    Export,
    /// Font sizes scaled to the canvas, see [`preview_font_size`].
    Preview,
}

/// Everything one render needs.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    /// Decoded source image. Never modified.
    pub base: PixelBuffer,
    /// Whole-image filter applied before any caption.
    pub filter: FilterKind,
    /// Captions, drawn in order.
    pub blocks: Vec<TextBlock>,
    /// Seed of the random source consumed by noisy filters.
    pub seed: u64,
    /// Size rule.
    pub mode: RenderMode,
    /// Frame geometry.
    pub layout: LayoutOpts,
}

impl RenderRequest {
    /// Request with no filter and no captions.
    pub fn new(base: PixelBuffer) -> Self {
        Self {
            base,
            filter: FilterKind::None,
            blocks: Vec::new(),
            seed: 0,
            mode: RenderMode::Export,
            layout: LayoutOpts::default(),
        }
    }

    /// Replace the filter.
    pub fn with_filter(mut self, filter: FilterKind) -> Self {
        self.filter = filter;
        self
    }

    /// Append a caption.
    pub fn with_block(mut self, block: TextBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Replace the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the size rule.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the frame geometry.
    pub fn with_layout(mut self, layout: LayoutOpts) -> Self {
        self.layout = layout;
        self
    }

    /// Reject requests that cannot produce an image.
    pub fn validate(&self) -> MemeResult<()> {
        if self.base.is_empty() {
            return Err(MemeError::invalid_input(format!(
                "base image must be non-empty, got {}x{}",
                self.base.width(),
                self.base.height()
            )));
        }
        Ok(())
    }
}

/// Output of [`render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Composited image, same size as the base.
    pub image: PixelBuffer,
    /// Fingerprint of `image`.
    pub meme_id: MemeId,
}

/// Filter a copy of the base image, then draw every caption in order.
///
/// Fails with `InvalidInput` before doing any work when the base image is empty. The same
/// request and font book always produce the same pixels.
#[tracing::instrument(
    skip(request, fonts),
    fields(
        width = request.base.width(),
        height = request.base.height(),
        filter = request.filter.name(),
        blocks = request.blocks.len(),
        mode = ?request.mode,
    )
)]
pub fn render(request: &RenderRequest, fonts: &FontBook) -> MemeResult<RenderResult> {
    request.validate()?;

    let mut rng = StdRng::seed_from_u64(request.seed);
    let mut canvas = apply_filter(&request.base, request.filter, &mut rng);
    let (w, h) = (canvas.width(), canvas.height());

    for block in &request.blocks {
        if block.is_blank() {
            continue;
        }
        let frame = layout_frame(w, h, block.placement, &request.layout);
        let resolved = fonts.resolve(&block.style.font_family);
        let size = match request.mode {
            RenderMode::Export => block.style.clamped_size(),
            RenderMode::Preview => {
                preview_font_size(block.style.clamped_size(), w, h, &request.layout)
            }
        };
        tracing::debug!(
            placement = ?block.placement,
            family = %resolved.family,
            size,
            "drawing caption"
        );
        draw_text(
            &mut canvas,
            &frame,
            &block.content,
            &block.style,
            &resolved.font,
            size,
        );
    }

    let meme_id = MemeId::from_image(&canvas);
    Ok(RenderResult {
        image: canvas,
        meme_id,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
