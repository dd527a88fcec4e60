use super::*;

#[test]
fn canvas_rejects_zero_and_oversized_edges() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(Canvas::MAX_EDGE + 1, 10).is_err());
    assert!(Canvas::new(640, 480).is_ok());
}

#[test]
fn canvas_min_dimension_and_scaling() {
    let c = Canvas::new(800, 600).unwrap();
    assert_eq!(c.min_dimension(), 600.0);
    assert_eq!(c.scaled(0.25), Canvas { width: 200, height: 150 });
    assert_eq!(c.scaled(0.0), Canvas { width: 1, height: 1 });
}

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30000, 1001).unwrap();
    assert!((fps.as_f64() - 29.97).abs() < 0.01);
}

#[test]
fn premul_roundtrip_is_close_for_opaque_and_half_alpha() {
    assert_eq!(premul_rgba8([200, 100, 50, 255]), [200, 100, 50, 255]);
    let p = premul_rgba8([200, 100, 50, 128]);
    let back = unpremul_rgba8(p);
    for i in 0..3 {
        assert!((i32::from(back[i]) - i32::from([200, 100, 50][i])).abs() <= 2);
    }
    assert_eq!(unpremul_rgba8([10, 10, 10, 0]), [0, 0, 0, 0]);
}
