use super::*;

#[test]
fn from_premul_checks_length() {
    assert!(FrameRGBA::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(FrameRGBA::from_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn straight_conversion_unpremultiplies() {
    let frame = FrameRGBA::from_premul(1, 1, vec![64, 0, 0, 128]).unwrap();
    assert_eq!(frame.to_straight_rgba8(), vec![128, 0, 0, 128]);
    let back = FrameRGBA::from_straight_rgba8(1, 1, vec![128, 0, 0, 128]).unwrap();
    assert_eq!(back.data, vec![64, 0, 0, 128]);
}

#[test]
fn downscale_keeps_at_least_one_pixel() {
    let frame = FrameRGBA::transparent(10, 4);
    let small = frame.downscale(0.2).unwrap();
    assert_eq!((small.width, small.height), (2, 1));
    assert_eq!(small.data.len(), 2 * 4);
    assert!(frame.downscale(0.0).is_err());
}

#[test]
fn downscale_preserves_flat_color() {
    let data = [10u8, 20, 30, 255].repeat(20 * 20);
    let frame = FrameRGBA::from_premul(20, 20, data).unwrap();
    let small = frame.downscale(0.25).unwrap();
    assert_eq!(small.pixel(2, 2), Some([10, 20, 30, 255]));
}

#[test]
fn pixel_out_of_bounds_is_none() {
    let frame = FrameRGBA::transparent(3, 3);
    assert_eq!(frame.pixel(3, 0), None);
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 0]));
}
