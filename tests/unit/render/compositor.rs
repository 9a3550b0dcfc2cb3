use super::*;
use crate::foundation::core::Rgba8;
use crate::text::style::TextStyle;

fn book() -> FontBook {
    FontBook::builtin().unwrap()
}

fn gray(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::filled(w, h, Rgba8::rgb(120, 140, 160))
}

#[test]
fn empty_base_is_invalid_input() {
    let err = render(&RenderRequest::new(PixelBuffer::empty()), &book()).unwrap_err();
    assert!(err.is_invalid_input());
    assert!(err.to_string().contains("0x0"));
}

#[test]
fn no_blocks_is_just_the_filter() {
    let base = gray(16, 12);
    let request = RenderRequest::new(base.clone()).with_filter(FilterKind::Invert);
    let out = render(&request, &book()).unwrap();
    assert_eq!(out.image.pixel(3, 3), Some(Rgba8::rgb(135, 115, 95)));
    assert_eq!(out.meme_id, MemeId::from_image(&out.image));
    assert_eq!(request.base, base);
}

#[test]
fn same_seed_same_pixels() {
    let request = RenderRequest::new(gray(64, 64))
        .with_filter(FilterKind::Vintage { intensity: 1.0 })
        .with_seed(7)
        .with_block(TextBlock::top("SEED", TextStyle::default()));
    let a = render(&request, &book()).unwrap();
    let b = render(&request, &book()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn blank_blocks_are_skipped() {
    let request = RenderRequest::new(gray(40, 40))
        .with_block(TextBlock::top("  ", TextStyle::default()))
        .with_block(TextBlock::bottom("", TextStyle::default()));
    let out = render(&request, &book()).unwrap();
    assert_eq!(out.image, gray(40, 40));
}

#[test]
fn preview_mode_scales_small_canvases_down() {
    let base = PixelBuffer::filled(400, 400, Rgba8::WHITE);
    let style = TextStyle::plain(Rgba8::BLACK).with_size(150.0);
    let block = TextBlock::bottom("W", style);

    let export = render(
        &RenderRequest::new(base.clone()).with_block(block.clone()),
        &book(),
    )
    .unwrap();
    let preview = render(
        &RenderRequest::new(base)
            .with_block(block)
            .with_mode(RenderMode::Preview),
        &book(),
    )
    .unwrap();

    let inked = |img: &PixelBuffer| img.pixels().filter(|p| *p != Rgba8::WHITE).count();
    // 150 * 400 / 800 = 75 px in preview.
    assert!(inked(&preview.image) < inked(&export.image));
    assert!(inked(&preview.image) > 0);
}

#[test]
fn unknown_family_still_draws_with_the_fallback() {
    let style = TextStyle::plain(Rgba8::BLACK).with_family("No Such Family 123");
    let request = RenderRequest::new(PixelBuffer::filled(120, 120, Rgba8::WHITE))
        .with_block(TextBlock::top("OK", style));
    let out = render(&request, &book()).unwrap();
    assert!(out.image.pixels().any(|p| p != Rgba8::WHITE));
}
