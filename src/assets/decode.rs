use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{MemeError, MemeResult};
use crate::raster::buffer::PixelBuffer;

/// Decode PNG, JPEG, BMP, GIF or WebP bytes into straight-alpha RGBA8.
///
/// Undecodable or zero-sized images are `InvalidInput`.
pub fn decode_image(bytes: &[u8]) -> MemeResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|err| MemeError::invalid_input(format!("decode image: {err}")))?;
    let buffer = PixelBuffer::from_rgba_image(dyn_img.to_rgba8());
    if buffer.is_empty() {
        return Err(MemeError::invalid_input("decoded image has no pixels"));
    }
    Ok(buffer)
}

/// Read and decode the image at `path`.
pub fn load_image(path: impl AsRef<Path>) -> MemeResult<PixelBuffer> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|err| match err {
        MemeError::InvalidInput(msg) => {
            MemeError::invalid_input(format!("'{}': {msg}", path.display()))
        }
        other => other,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
