use crate::foundation::math::Fnv1a64;
use crate::raster::buffer::PixelBuffer;

/// Content identifier of a rendered meme: FNV-1a 64 over dimensions and pixels.
///
/// Serialized as its 16-digit hex form.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct MemeId(pub u64);

impl MemeId {
    /// Hash `image`'s width, height and raw samples.
    pub fn from_image(image: &PixelBuffer) -> Self {
        let mut h = Fnv1a64::new_default();
        h.write_u32(image.width());
        h.write_u32(image.height());
        h.write_bytes(image.as_raw());
        Self(h.finish())
    }

    /// Parse the 16-digit hex form produced by `Display`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() != 16 {
            return None;
        }
        u64::from_str_radix(s, 16).ok().map(Self)
    }
}

impl TryFrom<String> for MemeId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s).ok_or_else(|| format!("invalid meme id '{s}'"))
    }
}

impl From<MemeId> for String {
    fn from(id: MemeId) -> Self {
        id.to_string()
    }
}

impl std::fmt::Display for MemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fingerprint.rs"]
mod tests;
