//! Persistent meme library: recent images, exports, versions, edit log, style memory and
//! usage counters.

/// JSON-backed library file.
pub mod store;
