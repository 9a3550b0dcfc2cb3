use super::*;

#[test]
fn top_and_bottom_bands_split_the_canvas() {
    let opts = LayoutOpts::default();
    let top = layout_frame(800, 600, Placement::Top, &opts);
    let bottom = layout_frame(800, 600, Placement::Bottom, &opts);

    assert_eq!(top.rect, Rect::new(20.0, 20.0, 780.0, 300.0));
    assert_eq!(top.valign, VerticalAlign::Top);
    assert_eq!(bottom.rect, Rect::new(20.0, 300.0, 780.0, 580.0));
    assert_eq!(bottom.valign, VerticalAlign::Bottom);
}

#[test]
fn bands_hold_between_a_third_and_a_half_of_the_height() {
    let opts = LayoutOpts::default();
    for (w, h) in [(100, 100), (640, 480), (300, 1200), (1920, 1080)] {
        for placement in [Placement::Top, Placement::Bottom] {
            let r = layout_frame(w, h, placement, &opts).rect;
            let share = r.height() / f64::from(h);
            assert!(share >= 1.0 / 3.0 && share <= 0.5, "{w}x{h} {placement:?}");
        }
    }
}

#[test]
fn margin_shrinks_on_small_canvases() {
    let r = layout_frame(40, 40, Placement::Top, &LayoutOpts::default()).rect;
    assert_eq!(r, Rect::new(5.0, 5.0, 35.0, 20.0));
}

#[test]
fn zero_canvas_yields_empty_frame() {
    let f = layout_frame(0, 10, Placement::Bottom, &LayoutOpts::default());
    assert_eq!(f.rect, Rect::ZERO);
    assert!(f.pixel_bounds().is_empty());
}

#[test]
fn preview_size_scales_with_canvas_and_clamps() {
    let opts = LayoutOpts::default();
    assert_eq!(preview_font_size(40.0, 1600, 1600, &opts), 80.0);
    assert_eq!(preview_font_size(40.0, 1600, 400, &opts), 20.0);
    assert_eq!(preview_font_size(150.0, 4000, 4000, &opts), 100.0);
    assert_eq!(preview_font_size(10.0, 100, 100, &opts), 20.0);
}

#[test]
fn placement_json_is_snake_case() {
    assert_eq!(serde_json::to_string(&Placement::Bottom).unwrap(), "\"bottom\"");
    let p: Placement = serde_json::from_str("\"top\"").unwrap();
    assert_eq!(p, Placement::Top);
}
