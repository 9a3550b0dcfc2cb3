use std::path::PathBuf;

use super::*;
use crate::assets::decode::decode_image;
use crate::foundation::core::Rgba8;

fn sample() -> PixelBuffer {
    let mut img = PixelBuffer::filled(4, 3, Rgba8::rgb(10, 200, 30));
    img.set_pixel(1, 1, Rgba8::new(0, 0, 0, 0));
    img
}

#[test]
fn format_follows_extension() {
    let opts = ExportOpts::default();
    assert_eq!(
        format_for_path(&PathBuf::from("a/b.PNG"), &opts).unwrap(),
        ExportFormat::Png
    );
    assert_eq!(
        format_for_path(&PathBuf::from("x.jpeg"), &opts).unwrap(),
        ExportFormat::Jpeg { quality: 90 }
    );
    let err = format_for_path(&PathBuf::from("x.tiff"), &opts).unwrap_err();
    assert!(err.is_invalid_input());
    assert!(format_for_path(&PathBuf::from("noext"), &opts).is_err());
}

#[test]
fn jpeg_quality_is_clamped() {
    let opts = ExportOpts { jpeg_quality: 0 };
    assert_eq!(
        format_for_path(&PathBuf::from("x.jpg"), &opts).unwrap(),
        ExportFormat::Jpeg { quality: 1 }
    );
}

#[test]
fn png_is_lossless_including_alpha() {
    let img = sample();
    let bytes = encode_image(&img, ExportFormat::Png).unwrap();
    assert_eq!(decode_image(&bytes).unwrap(), img);
}

#[test]
fn jpeg_is_opaque_and_close() {
    let img = PixelBuffer::filled(16, 16, Rgba8::rgb(200, 100, 50));
    let bytes = encode_image(&img, ExportFormat::Jpeg { quality: 95 }).unwrap();
    let back = decode_image(&bytes).unwrap();
    assert_eq!((back.width(), back.height()), (16, 16));
    let p = back.pixel(8, 8).unwrap();
    assert_eq!(p.a, 255);
    assert!((i32::from(p.r) - 200).abs() <= 6);
    assert!((i32::from(p.g) - 100).abs() <= 6);
    assert!((i32::from(p.b) - 50).abs() <= 6);
}

#[test]
fn flatten_puts_transparency_on_white() {
    let rgb = flatten_on_white(&sample());
    assert_eq!(rgb.len(), 4 * 3 * 3);
    let i = (4 + 1) * 3;
    assert_eq!(&rgb[i..i + 3], &[255, 255, 255]);
    assert_eq!(&rgb[..3], &[10, 200, 30]);
}

#[test]
fn empty_image_cannot_be_encoded() {
    assert!(encode_image(&PixelBuffer::empty(), ExportFormat::Png)
        .unwrap_err()
        .is_invalid_input());
}

#[test]
fn save_creates_parent_directories() {
    let dir = std::env::temp_dir().join(format!("memegen-save-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("out.png");
    save_image(&sample(), &path, &ExportOpts::default()).unwrap();
    let back = crate::assets::decode::load_image(&path).unwrap();
    let _ = std::fs::remove_dir_all(&dir);
    assert_eq!(back, sample());
}

#[test]
fn default_names_carry_the_timestamp() {
    use chrono::TimeZone as _;
    let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
    assert_eq!(
        default_file_name(&at, ExportFormat::Png),
        "meme_20240309_070501.png"
    );
    assert_eq!(
        default_file_name(&at, ExportFormat::Jpeg { quality: 90 }),
        "meme_20240309_070501.jpg"
    );
}
