use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use ab_glyph::{FontArc, FontVec};
use anyhow::Context as _;
use usvg::fontdb;

use crate::foundation::error::MemeResult;

/// Family name reported for the bundled face.
pub const FALLBACK_FONT_FAMILY: &str = "DejaVu Sans Bold";

static FALLBACK_FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// A font chosen for a requested family.
#[derive(Clone)]
pub struct ResolvedFont {
    /// Glyph source.
    pub font: FontArc,
    /// Family that was actually matched.
    pub family: String,
    /// `true` when the request could not be satisfied and the bundled face is used.
    pub is_fallback: bool,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("family", &self.family)
            .field("is_fallback", &self.is_fallback)
            .finish()
    }
}

/// Font lookup by family name with a bundled fallback face.
///
/// Resolved faces are cached by lowercase family name; the book is `Send + Sync` and can be
/// shared by concurrent renders.
pub struct FontBook {
    db: fontdb::Database,
    fallback: FontArc,
    cache: Mutex<HashMap<String, ResolvedFont>>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl FontBook {
    /// Only the bundled face. Output does not depend on the host's installed fonts.
    pub fn builtin() -> MemeResult<Self> {
        let fallback =
            FontArc::try_from_slice(FALLBACK_FONT_BYTES).context("parse bundled fallback font")?;
        Ok(Self {
            db: fontdb::Database::new(),
            fallback,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Bundled face plus every font installed on the host.
    pub fn with_system_fonts() -> MemeResult<Self> {
        let mut book = Self::builtin()?;
        book.db.load_system_fonts();
        tracing::debug!(faces = book.db.len(), "loaded system fonts");
        Ok(book)
    }

    /// Register every font file found under `dir`.
    pub fn load_fonts_dir(&mut self, dir: impl AsRef<Path>) {
        self.db.load_fonts_dir(dir);
        self.clear_cache();
    }

    /// Register a font from raw TTF/OTF bytes.
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.clear_cache();
    }

    /// Number of registered faces, excluding the bundled one.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// The bundled face.
    pub fn fallback(&self) -> ResolvedFont {
        ResolvedFont {
            font: self.fallback.clone(),
            family: FALLBACK_FONT_FAMILY.to_string(),
            is_fallback: true,
        }
    }

    /// Best face for `family`, preferring bold weights. Never fails: unknown families
    /// resolve to [`FontBook::fallback`].
    pub fn resolve(&self, family: &str) -> ResolvedFont {
        let key = family.trim().to_ascii_lowercase();
        if key.is_empty() {
            return self.fallback();
        }
        if let Some(hit) = self.lock_cache().get(&key) {
            return hit.clone();
        }

        let resolved = match self.query(family.trim()) {
            Some(found) => found,
            None => {
                tracing::warn!(
                    family,
                    fallback = FALLBACK_FONT_FAMILY,
                    "font family unavailable, using fallback"
                );
                self.fallback()
            }
        };
        self.lock_cache().insert(key, resolved.clone());
        resolved
    }

    fn query(&self, family: &str) -> Option<ResolvedFont> {
        let families = [generic_or_named(family)];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight::BOLD,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self.db.query(&query)?;
        let matched = self
            .db
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| family.to_string());

        let font = self
            .db
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index)
            })?;
        match font {
            Ok(font) => Some(ResolvedFont {
                font: FontArc::new(font),
                family: matched,
                is_fallback: false,
            }),
            Err(err) => {
                tracing::warn!(family, %err, "font face could not be parsed");
                None
            }
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, ResolvedFont>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clear_cache(&mut self) {
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

fn generic_or_named(family: &str) -> fontdb::Family<'_> {
    match family.to_ascii_lowercase().as_str() {
        "sans-serif" | "sans serif" | "sans" => fontdb::Family::SansSerif,
        "serif" => fontdb::Family::Serif,
        "monospace" | "mono" => fontdb::Family::Monospace,
        "cursive" => fontdb::Family::Cursive,
        "fantasy" => fontdb::Family::Fantasy,
        _ => fontdb::Family::Name(family),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
