//! Reading source pictures and writing finished memes.

/// Image decoding.
pub mod decode;
/// PNG and JPEG export.
pub mod encode;
