//! Caption styling and font resolution.

/// Family lookup with a bundled fallback face.
pub mod font;
/// Caption style and text block values.
pub mod style;
