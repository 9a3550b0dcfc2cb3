//! Meme descriptions: JSON documents and the random meme generator.

/// JSON meme documents.
pub mod model;
/// Random meme assembly.
pub mod random;
