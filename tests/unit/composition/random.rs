use rand::SeedableRng as _;
use rand::rngs::StdRng;

use super::*;

fn history() -> Vec<PathBuf> {
    vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
}

#[test]
fn empty_history_is_invalid_input() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(random_meme(&[], &mut rng).unwrap_err().is_invalid_input());
}

#[test]
fn same_seed_same_meme() {
    let a = random_meme(&history(), &mut StdRng::seed_from_u64(42)).unwrap();
    let b = random_meme(&history(), &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn choices_stay_within_the_built_in_lists() {
    for seed in 0..50 {
        let meme = random_meme(&history(), &mut StdRng::seed_from_u64(seed)).unwrap();
        assert!(history().contains(&meme.image));
        assert!(MEME_PHRASES.contains(&meme.phrase.as_str()));
        assert!(RANDOM_FILTERS.contains(&meme.filter));
        assert_eq!(meme.blocks.len(), 2);
        for block in &meme.blocks {
            let style = &block.style;
            assert!(AVAILABLE_FONTS.contains(&style.font_family.as_str()));
            assert!((30.0..=70.0).contains(&style.font_size));
            let Fill::Solid { color } = style.fill else {
                panic!("random styles are solid");
            };
            assert_eq!(color.a, 255);
        }
        assert_eq!(meme.blocks[0].style, meme.blocks[1].style);
    }
}

#[test]
fn multi_line_phrases_split_first_line_and_rest() {
    let mut rng = StdRng::seed_from_u64(0);
    let (top, bottom) = split_phrase("WHEN YOU SEE\nYOUR BUG\nIN PRODUCTION", &mut rng);
    assert_eq!(top, "WHEN YOU SEE");
    assert_eq!(bottom, "YOUR BUG\nIN PRODUCTION");
}

#[test]
fn single_line_phrases_land_on_one_side() {
    let mut seen_top = false;
    let mut seen_bottom = false;
    for seed in 0..64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (top, bottom) = split_phrase("HERE WE GO...", &mut rng);
        assert!(top.is_empty() != bottom.is_empty());
        seen_top |= !top.is_empty();
        seen_bottom |= !bottom.is_empty();
    }
    assert!(seen_top && seen_bottom);
}

#[test]
fn captions_are_reachable_by_band() {
    let meme = random_meme(&history(), &mut StdRng::seed_from_u64(9)).unwrap();
    let (top, bottom) = meme.phrase.split_once('\n').unwrap();
    assert_eq!(meme.top_text(), top);
    assert_eq!(meme.bottom_text(), bottom);
}

#[test]
fn templates_are_single_lines() {
    assert!(QUICK_TEMPLATES.iter().all(|t| !t.contains('\n')));
}
