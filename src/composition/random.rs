use std::path::PathBuf;

use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::effects::filters::FilterKind;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::solver::Placement;
use crate::text::style::{AVAILABLE_FONTS, Fill, Outline, Shadow, TextBlock, TextStyle};

/// Two-part phrases used by the random meme generator; `\n` separates top from bottom.
pub const MEME_PHRASES: [&str; 7] = [
    "WHEN THE DEADLINE\nIS IN 5 MINUTES",
    "EXPECTATION\nREALITY",
    "MY CODE\nPASSED THE TESTS",
    "PROF: NO HOMEWORK\nME: GREAT",
    "SLEEP\nWAKING UP",
    "PLAN FOR THE DAY\nREALITY",
    "WHEN YOU SEE\nYOUR BUG\nIN PRODUCTION",
];

/// One-line captions offered as quick templates.
pub const QUICK_TEMPLATES: [&str; 5] = [
    "EXPECTATION vs REALITY",
    "WHEN YOU REALIZE...",
    "MY CODE WORKS!",
    "HERE WE GO...",
    "I CAN DO THIS",
];

/// Smallest random caption size.
pub const RANDOM_MIN_FONT_SIZE: u32 = 30;
/// Largest random caption size.
pub const RANDOM_MAX_FONT_SIZE: u32 = 70;

const RANDOM_FILTERS: [FilterKind; 4] = [
    FilterKind::None,
    FilterKind::Grayscale,
    FilterKind::Sepia { intensity: 1.0 },
    FilterKind::Blur { intensity: 1.0 },
];

/// A randomly assembled meme, ready to be loaded and rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMeme {
    /// Source image picked from the history.
    pub image: PathBuf,
    /// Phrase the captions were cut from.
    pub phrase: String,
    /// Whole-image filter.
    pub filter: FilterKind,
    /// Top and/or bottom caption sharing one style.
    pub blocks: Vec<TextBlock>,
}

impl RandomMeme {
    /// Text of the caption at the top, empty when there is none.
    pub fn top_text(&self) -> &str {
        self.caption(Placement::Top)
    }

    /// Text of the caption at the bottom, empty when there is none.
    pub fn bottom_text(&self) -> &str {
        self.caption(Placement::Bottom)
    }

    fn caption(&self, placement: Placement) -> &str {
        self.blocks
            .iter()
            .find(|b| b.placement == placement)
            .map_or("", |b| b.content.as_str())
    }
}

/// Pick an image from `history`, a phrase, a style and a filter.
///
/// Every choice is drawn from `rng`. An empty history is `InvalidInput`.
pub fn random_meme<R: Rng + ?Sized>(history: &[PathBuf], rng: &mut R) -> MemeResult<RandomMeme> {
    let image = history
        .choose(rng)
        .cloned()
        .ok_or_else(|| MemeError::invalid_input("image history is empty; open some images first"))?;
    let phrase = MEME_PHRASES.choose(rng).copied().unwrap_or(MEME_PHRASES[0]);
    let style = random_style(rng);
    let filter = RANDOM_FILTERS.choose(rng).copied().unwrap_or_default();

    let (top, bottom) = split_phrase(phrase, rng);
    let mut blocks = Vec::with_capacity(2);
    if !top.is_empty() {
        blocks.push(TextBlock::top(top, style.clone()));
    }
    if !bottom.is_empty() {
        blocks.push(TextBlock::bottom(bottom, style));
    }

    tracing::debug!(image = %image.display(), filter = filter.name(), "random meme assembled");
    Ok(RandomMeme {
        image,
        phrase: phrase.to_string(),
        filter,
        blocks,
    })
}

/// Random family, size, opaque color, outline and shadow flags.
pub fn random_style<R: Rng + ?Sized>(rng: &mut R) -> TextStyle {
    let family = AVAILABLE_FONTS
        .choose(rng)
        .copied()
        .unwrap_or(AVAILABLE_FONTS[0]);
    let size = rng.gen_range(RANDOM_MIN_FONT_SIZE..=RANDOM_MAX_FONT_SIZE);
    let color = Rgba8::rgb(rng.r#gen(), rng.r#gen(), rng.r#gen());
    TextStyle {
        font_family: family.to_string(),
        font_size: size as f32,
        fill: Fill::Solid { color },
        outline: Outline {
            enabled: rng.gen_bool(0.5),
            ..Outline::default()
        },
        shadow: Shadow {
            enabled: rng.gen_bool(0.5),
        },
    }
}

/// First line goes to the top, the remaining lines to the bottom. A single-line phrase
/// goes to one side chosen by `rng`.
pub fn split_phrase<R: Rng + ?Sized>(phrase: &str, rng: &mut R) -> (String, String) {
    match phrase.split_once('\n') {
        Some((top, rest)) => (top.to_string(), rest.to_string()),
        None if rng.gen_bool(0.5) => (phrase.to_string(), String::new()),
        None => (String::new(), phrase.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/random.rs"]
mod tests;
