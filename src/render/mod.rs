//! Caption drawing and the compositor that drives a whole render.

/// Filter, lay out and draw a meme.
pub mod compositor;
/// Content ids of rendered memes.
pub mod fingerprint;
/// Fixed-ramp gradient fills.
pub mod gradient;
/// Glyph rasterization and the shadow, outline and fill passes.
pub mod text;
