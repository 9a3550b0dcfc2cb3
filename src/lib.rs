//! memegen is a meme compositing engine.
//!
//! A render takes a decoded base image, one whole-image filter and any number of styled
//! captions, and deterministically produces the final raster:
//!
//! - Describe the meme as a [`RenderRequest`] (or load a [`MemeDoc`])
//! - Resolve fonts through a shared [`FontBook`]
//! - Call [`render`] and export the [`RenderResult`] with [`save_image`]
//!
//! The [`MemeLibrary`] keeps recent images, exports and usage counters between runs.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image decoding and export.
pub mod assets;
/// JSON meme documents and random memes.
pub mod composition;
/// Whole-image filters.
pub mod effects;
/// Caption frames and line layout.
pub mod layout;
/// Persistent meme library.
pub mod library;
/// Owned RGBA8 pixel buffers.
pub mod raster;
/// Caption drawing and the compositor.
pub mod render;
/// Caption styles and fonts.
pub mod text;

pub use crate::foundation::core::{PixelBounds, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{MemeError, MemeResult};

pub use crate::assets::decode::{decode_image, load_image};
pub use crate::assets::encode::{
    ExportFormat, ExportOpts, default_file_name, encode_image, format_for_path, save_image,
};
pub use crate::composition::model::MemeDoc;
pub use crate::composition::random::{MEME_PHRASES, QUICK_TEMPLATES, RandomMeme, random_meme};
pub use crate::effects::filters::{FilterKind, apply_filter};
pub use crate::layout::solver::{LayoutOpts, Placement, TextFrame, layout_frame};
pub use crate::library::store::{
    EditAction, LibraryOpts, LibraryStats, MemeLibrary, MemeVersion, UsageEvent, VersionContent,
};
pub use crate::raster::buffer::PixelBuffer;
pub use crate::render::compositor::{RenderMode, RenderRequest, RenderResult, render};
pub use crate::render::fingerprint::MemeId;
pub use crate::render::text::draw_text;
pub use crate::text::font::{FontBook, ResolvedFont};
pub use crate::text::style::{
    AVAILABLE_FONTS, Fill, GradientKind, Outline, Shadow, TextBlock, TextStyle,
};
