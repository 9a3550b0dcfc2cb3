//! Owned RGBA8 pixel storage shared by the filter and text stages.

/// Pixel buffer type and blending helpers.
pub mod buffer;
