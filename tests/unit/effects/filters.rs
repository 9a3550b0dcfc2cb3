use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::foundation::core::Rgba8;

fn gradient_image() -> PixelBuffer {
    let (w, h) = (13u32, 9u32);
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[
                (x * 19) as u8,
                (y * 27) as u8,
                ((x + y) * 11) as u8,
                (50 + x * 10) as u8,
            ]);
        }
    }
    PixelBuffer::from_rgba8(w, h, data).unwrap()
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn none_is_identity() {
    let src = gradient_image();
    assert_eq!(apply_filter(&src, FilterKind::None, &mut rng()), src);
}

#[test]
fn invert_is_an_involution() {
    let src = gradient_image();
    let once = apply_filter(&src, FilterKind::Invert, &mut rng());
    assert_ne!(once, src);
    let twice = apply_filter(&once, FilterKind::Invert, &mut rng());
    assert_eq!(twice, src);
}

#[test]
fn grayscale_equalizes_channels_and_keeps_alpha() {
    let src = gradient_image();
    let out = apply_filter(&src, FilterKind::Grayscale, &mut rng());
    for (o, s) in out.pixels().zip(src.pixels()) {
        assert_eq!(o.r, o.g);
        assert_eq!(o.g, o.b);
        assert_eq!(o.a, s.a);
    }
}

#[test]
fn grayscale_is_idempotent_and_keeps_white() {
    let src = gradient_image();
    let once = apply_filter(&src, FilterKind::Grayscale, &mut rng());
    let twice = apply_filter(&once, FilterKind::Grayscale, &mut rng());
    assert_eq!(once, twice);
    assert_eq!(grayscale_px([255, 255, 255, 255]), [255, 255, 255, 255]);
    assert_eq!(grayscale_px([255, 0, 0, 9]), [76, 76, 76, 9]);
}

#[test]
fn sepia_on_black_matches_additive_formula() {
    let src = PixelBuffer::filled(1, 1, Rgba8::BLACK);
    let out = apply_filter(&src, FilterKind::Sepia { intensity: 1.0 }, &mut rng());
    assert_eq!(out.pixel(0, 0), Some(Rgba8::new(60, 30, 0, 255)));
}

#[test]
fn sepia_saturates_at_channel_limits() {
    assert_eq!(sepia_px([250, 240, 10, 128], 30), [255, 255, 0, 128]);
}

#[test]
fn brightness_and_contrast_at_zero_are_identity() {
    let src = gradient_image();
    for f in [
        FilterKind::Brightness { intensity: 0.0 },
        FilterKind::Contrast { intensity: 0.0 },
    ] {
        assert_eq!(apply_filter(&src, f, &mut rng()), src, "{f:?}");
    }
}

#[test]
fn brightness_twice_differs_from_once() {
    let src = PixelBuffer::filled(3, 3, Rgba8::new(40, 80, 120, 255));
    let f = FilterKind::Brightness { intensity: 1.0 };
    let once = apply_filter(&src, f, &mut rng());
    let twice = apply_filter(&once, f, &mut rng());
    assert_eq!(once.pixel(0, 0), Some(Rgba8::new(60, 120, 180, 255)));
    assert_ne!(once, twice);
    assert_eq!(twice.pixel(0, 0), Some(Rgba8::new(90, 180, 255, 255)));
}

#[test]
fn contrast_stretches_around_mid_gray() {
    assert_eq!(contrast_px([127, 0, 255, 1], 1.5), [127, 0, 255, 1]);
    assert_eq!(contrast_px([107, 147, 200, 1], 1.5), [97, 157, 236, 1]);
}

#[test]
fn out_of_range_intensity_is_clamped() {
    let src = gradient_image();
    let over = apply_filter(&src, FilterKind::Brightness { intensity: 7.0 }, &mut rng());
    let max = apply_filter(&src, FilterKind::Brightness { intensity: 1.0 }, &mut rng());
    assert_eq!(over, max);

    let under = apply_filter(&src, FilterKind::Sepia { intensity: -3.0 }, &mut rng());
    assert_eq!(under, src);

    let nan = apply_filter(&src, FilterKind::Contrast { intensity: f32::NAN }, &mut rng());
    assert_eq!(nan, src);
}

#[test]
fn blur_with_zero_intensity_is_noop() {
    let src = gradient_image();
    let f = FilterKind::Blur { intensity: 0.0 };
    assert_eq!(f.blur_radius(), 0);
    assert_eq!(apply_filter(&src, f, &mut rng()), src);
    assert_eq!(FilterKind::Blur { intensity: 0.5 }.blur_radius(), 2);
    assert_eq!(FilterKind::Blur { intensity: 1.0 }.blur_radius(), 3);
}

#[test]
fn vintage_is_deterministic_for_a_seed() {
    let src = PixelBuffer::filled(64, 64, Rgba8::rgb(100, 100, 100));
    let f = FilterKind::Vintage { intensity: 1.0 };
    let a = apply_filter(&src, f, &mut StdRng::seed_from_u64(42));
    let b = apply_filter(&src, f, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);

    let sepia = apply_filter(&src, FilterKind::Sepia { intensity: 1.0 }, &mut rng());
    let noisy = a
        .pixels()
        .zip(sepia.pixels())
        .filter(|(v, s)| v != s)
        .count();
    // 2% of 4096 pixels, minus the ones that drew a zero offset.
    assert!(noisy > 20 && noisy < 200, "noisy={noisy}");
    for (v, s) in a.pixels().zip(sepia.pixels()) {
        assert!((i32::from(v.r) - i32::from(s.r)).abs() <= 10);
        assert_eq!(v.a, s.a);
    }
}

#[test]
fn vintage_at_zero_intensity_matches_source() {
    let src = gradient_image();
    let out = apply_filter(&src, FilterKind::Vintage { intensity: 0.0 }, &mut rng());
    assert_eq!(out, src);
}

#[test]
fn filters_never_touch_the_source() {
    let src = gradient_image();
    let snapshot = src.clone();
    for name in FilterKind::NAMES {
        let f = FilterKind::from_name(name, 1.0).unwrap();
        let _ = apply_filter(&src, f, &mut rng());
    }
    assert_eq!(src, snapshot);
}

#[test]
fn from_name_round_trips_and_rejects_unknown() {
    for name in FilterKind::NAMES {
        assert_eq!(FilterKind::from_name(name, 0.3).unwrap().name(), name);
    }
    assert_eq!(
        FilterKind::from_name("Black-And-White", 1.0).unwrap(),
        FilterKind::Grayscale
    );
    let err = FilterKind::from_name("posterize", 1.0).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn filter_kind_json_is_tagged() {
    let f: FilterKind = serde_json::from_str(r#"{"kind":"sepia","intensity":0.5}"#).unwrap();
    assert_eq!(f, FilterKind::Sepia { intensity: 0.5 });
    let g: FilterKind = serde_json::from_str(r#"{"kind":"grayscale"}"#).unwrap();
    assert_eq!(g, FilterKind::Grayscale);
    assert!(serde_json::from_str::<FilterKind>(r#"{"kind":"posterize"}"#).is_err());

    let v = FilterKind::Vintage { intensity: 0.25 };
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, r#"{"kind":"vintage","intensity":0.25}"#);
    assert_eq!(serde_json::from_str::<FilterKind>(&json).unwrap(), v);
}

#[test]
fn empty_buffer_passes_through() {
    let out = apply_filter(&PixelBuffer::empty(), FilterKind::Invert, &mut rng());
    assert!(out.is_empty());
}
