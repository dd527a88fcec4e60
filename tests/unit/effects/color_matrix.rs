use super::*;

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter()
        .zip(b.iter())
        .all(|(x, y)| (i16::from(*x) - i16::from(*y)).abs() <= 1)
}

#[test]
fn default_matrix_is_identity() {
    let px = [12, 200, 99, 180];
    assert_eq!(ColorMatrix::default().apply_straight(px), px);
}

#[test]
fn invert_full_flips_channels() {
    assert_eq!(
        ColorMatrix::invert(1.0).apply_straight([0, 100, 255, 255]),
        [255, 155, 0, 255]
    );
}

#[test]
fn grayscale_full_equalizes_channels() {
    let out = ColorMatrix::grayscale(1.0).apply_straight([255, 0, 0, 255]);
    assert_eq!(out[0], out[1]);
    assert_eq!(out[1], out[2]);
    assert!(close(out, [54, 54, 54, 255]));
}

#[test]
fn zero_amounts_are_identity() {
    let px = [40, 80, 160, 255];
    for m in [
        ColorMatrix::grayscale(0.0),
        ColorMatrix::sepia(0.0),
        ColorMatrix::saturate(1.0),
        ColorMatrix::brightness(1.0),
        ColorMatrix::contrast(1.0),
        ColorMatrix::invert(0.0),
        ColorMatrix::opacity(1.0),
        ColorMatrix::hue_rotate(0.0),
    ] {
        assert!(close(m.apply_straight(px), px), "{m:?}");
    }
}

#[test]
fn opacity_scales_alpha_only() {
    assert_eq!(
        ColorMatrix::opacity(0.5).apply_straight([10, 20, 30, 200]),
        [10, 20, 30, 100]
    );
}

#[test]
fn contrast_zero_is_mid_gray() {
    assert!(close(
        ColorMatrix::contrast(0.0).apply_straight([0, 255, 30, 255]),
        [128, 128, 128, 255]
    ));
}

#[test]
fn apply_round_trips_premultiplied_frames() {
    let frame = FrameRGBA::from_premul(1, 1, vec![50, 50, 50, 100]).unwrap();
    let out = ColorMatrix::brightness(1.0).apply(&frame);
    assert!(out.premultiplied);
    assert!(close(
        [out.data[0], out.data[1], out.data[2], out.data[3]],
        [50, 50, 50, 100]
    ));
}
