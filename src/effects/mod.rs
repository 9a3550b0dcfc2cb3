//! Whole-image filters applied to the base picture before captions are drawn.

/// Box blur kernel.
pub mod blur;
/// Filter enumeration and per-pixel operators.
pub mod filters;
