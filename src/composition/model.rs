use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde_json::error::Category;

use crate::assets::decode::load_image;
use crate::effects::filters::FilterKind;
use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::solver::LayoutOpts;
use crate::raster::buffer::PixelBuffer;
use crate::render::compositor::{RenderMode, RenderRequest};
use crate::text::style::TextBlock;

/// JSON description of one meme: source picture, filter and captions.
///
/// ```json
/// {
///   "image": "cat.png",
///   "filter": { "kind": "sepia", "intensity": 0.8 },
///   "blocks": [
///     { "content": "TOP TEXT", "placement": "top" },
///     { "content": "BOTTOM TEXT", "placement": "bottom",
///       "style": { "fill": { "type": "gradient", "kind": "radial" } } }
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MemeDoc {
    /// Source image; relative paths are resolved against the document's directory.
    pub image: PathBuf,
    /// Whole-image filter.
    #[serde(default)]
    pub filter: FilterKind,
    /// Seed for noisy filters.
    #[serde(default)]
    pub seed: u64,
    /// Size rule.
    #[serde(default)]
    pub mode: RenderMode,
    /// Frame geometry.
    #[serde(default)]
    pub layout: LayoutOpts,
    /// Captions in drawing order.
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

impl MemeDoc {
    /// Parse a document file. Relative image paths become relative to the file's directory.
    ///
    /// Malformed JSON is [`MemeError::Serde`]; well-formed JSON naming an unknown filter or
    /// gradient, or holding a wrongly typed field, is [`MemeError::InvalidInput`].
    pub fn from_path(path: impl AsRef<Path>) -> MemeResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read meme document '{}'", path.display()))?;
        let mut doc: Self = serde_json::from_str(&s).map_err(|err| {
            let msg = format!("parse meme document '{}': {err}", path.display());
            match err.classify() {
                Category::Data => MemeError::invalid_input(msg),
                _ => MemeError::serde(msg),
            }
        })?;
        if doc.image.is_relative() {
            if let Some(dir) = path.parent() {
                doc.image = dir.join(&doc.image);
            }
        }
        Ok(doc)
    }

    /// Reject documents that cannot describe a render. Font families are not checked here;
    /// unknown or empty ones fall back to the bundled face when the font is resolved.
    pub fn validate(&self) -> MemeResult<()> {
        if self.image.as_os_str().is_empty() {
            return Err(MemeError::invalid_input("image path must be non-empty"));
        }
        Ok(())
    }

    /// Request rendering `base` the way this document describes.
    pub fn into_request(self, base: PixelBuffer) -> RenderRequest {
        RenderRequest {
            base,
            filter: self.filter,
            blocks: self.blocks,
            seed: self.seed,
            mode: self.mode,
            layout: self.layout,
        }
    }

    /// Validate, load the source image and build the request.
    pub fn load_request(self) -> MemeResult<RenderRequest> {
        self.validate()?;
        let base = load_image(&self.image)?;
        Ok(self.into_request(base))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
