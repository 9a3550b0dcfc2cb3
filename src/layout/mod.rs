//! Caption placement: band frames, line breaking and alignment.

/// Line measurement, wrapping and placement inside a frame.
pub mod lines;
/// Band frames and preview sizing.
pub mod solver;
