use super::*;

#[test]
fn fnv1a_matches_reference_vector() {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(b"a");
    assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn fnv1a_is_order_sensitive() {
    let mut a = Fnv1a64::new_default();
    a.write_u32(1);
    a.write_u32(2);
    let mut b = Fnv1a64::new_default();
    b.write_u32(2);
    b.write_u32(1);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn clamp_and_lerp_stay_in_channel_range() {
    assert_eq!(clamp_u8(-4), 0);
    assert_eq!(clamp_u8(300), 255);
    assert_eq!(lerp_u8(0, 255, 0.5), 128);
    assert_eq!(lerp_u8(10, 20, 0.0), 10);
    assert_eq!(lerp_u8(10, 20, 1.0), 20);
}
