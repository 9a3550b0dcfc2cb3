use super::*;

#[test]
fn zero_dimension_yields_empty_buffer() {
    assert!(PixelBuffer::new(0, 10).is_empty());
    assert!(PixelBuffer::filled(10, 0, Rgba8::WHITE).is_empty());
    let b = PixelBuffer::from_rgba8(0, 0, Vec::new()).unwrap();
    assert!(b.is_empty());
    assert_eq!((b.width(), b.height()), (0, 0));
}

#[test]
fn from_rgba8_checks_length() {
    assert!(PixelBuffer::from_rgba8(2, 2, vec![0; 15]).is_err());
    let b = PixelBuffer::from_rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(b.pixel(1, 0), Some(Rgba8::new(5, 6, 7, 8)));
    assert_eq!(b.pixel(2, 0), None);
    assert_eq!(b.pixel(-1, 0), None);
}

#[test]
fn set_pixel_ignores_out_of_bounds() {
    let mut b = PixelBuffer::filled(3, 3, Rgba8::BLACK);
    assert!(b.set_pixel(2, 2, Rgba8::RED));
    assert!(!b.set_pixel(3, 0, Rgba8::RED));
    assert_eq!(b.pixel(2, 2), Some(Rgba8::RED));
    assert_eq!(b.pixels().filter(|&p| p == Rgba8::RED).count(), 1);
}

#[test]
fn rows_have_stride_width() {
    let b = PixelBuffer::filled(5, 3, Rgba8::WHITE);
    assert_eq!(b.rows().count(), 3);
    assert!(b.rows().all(|r| r.len() == 20));
    assert_eq!(PixelBuffer::empty().rows().count(), 0);
}

#[test]
fn opaque_full_coverage_replaces_destination() {
    assert_eq!(
        blend_over([10, 20, 30, 255], [200, 100, 0, 255], 1.0),
        [200, 100, 0, 255]
    );
}

#[test]
fn zero_coverage_is_noop() {
    let dst = [1, 2, 3, 4];
    assert_eq!(blend_over(dst, [255, 255, 255, 255], 0.0), dst);
    assert_eq!(blend_over(dst, [255, 255, 255, 0], 1.0), dst);
}

#[test]
fn half_alpha_over_opaque_mixes_and_stays_opaque() {
    let out = blend_over([255, 255, 255, 255], [0, 0, 0, 128], 1.0);
    assert_eq!(out[3], 255);
    assert!(out[0] > 120 && out[0] < 135);
}

#[test]
fn blend_over_transparent_keeps_source_color() {
    let out = blend_over([0, 0, 0, 0], [90, 80, 70, 200], 1.0);
    assert_eq!(out, [90, 80, 70, 200]);
}

#[test]
fn image_round_trip_preserves_samples() {
    let mut b = PixelBuffer::filled(4, 2, Rgba8::BLUE);
    b.set_pixel(0, 1, Rgba8::new(1, 2, 3, 4));
    let back = PixelBuffer::from_rgba_image(b.to_rgba_image());
    assert_eq!(back, b);
}
