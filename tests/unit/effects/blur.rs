use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn blur_radius_0_is_identity() {
    let src = PixelBuffer::from_rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(box_blur(&src, 0), src);
}

#[test]
fn blur_constant_image_is_identity() {
    let src = PixelBuffer::filled(9, 7, Rgba8::new(10, 20, 30, 40));
    assert_eq!(box_blur(&src, 2), src);
}

#[test]
fn image_smaller_than_kernel_is_untouched() {
    let mut src = PixelBuffer::filled(4, 4, Rgba8::BLACK);
    src.set_pixel(2, 2, Rgba8::WHITE);
    assert_eq!(box_blur(&src, 2), src);
}

#[test]
fn blur_spreads_single_pixel_and_keeps_border() {
    let mut src = PixelBuffer::filled(7, 7, Rgba8::BLACK);
    src.set_pixel(3, 3, Rgba8::new(90, 180, 9, 255));
    let out = box_blur(&src, 1);

    // 3x3 average, truncated.
    for (x, y) in [(2, 2), (3, 3), (4, 4), (2, 4)] {
        assert_eq!(out.pixel(x, y), Some(Rgba8::new(10, 20, 1, 255)));
    }
    assert_eq!(out.pixel(1, 1), Some(Rgba8::BLACK));
    for i in 0..7 {
        assert_eq!(out.pixel(i, 0), src.pixel(i, 0));
        assert_eq!(out.pixel(0, i), src.pixel(0, i));
    }
}

#[test]
fn blur_keeps_alpha() {
    let mut src = PixelBuffer::filled(5, 5, Rgba8::new(0, 0, 0, 77));
    src.set_pixel(2, 2, Rgba8::new(255, 255, 255, 200));
    let out = box_blur(&src, 1);
    assert_eq!(out.pixel(2, 2).map(|p| p.a), Some(200));
    assert_eq!(out.pixel(1, 2).map(|p| p.a), Some(77));
    assert_eq!(out.pixel(2, 2).map(|p| p.r), Some(28));
}
