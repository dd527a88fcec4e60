use super::*;
use kurbo::Shape;

fn points(path: &BezPath) -> Vec<Point> {
    path.elements()
        .iter()
        .filter_map(|el| el.end_point())
        .collect()
}

#[test]
fn sine_stays_within_one_size_of_the_row() {
    let path = wave_path(Waveform::Sine, 30.0, 100.0, 20.0, 300.0, 0.0);
    let bbox = path.bounding_box();
    assert!(bbox.y0 >= 80.0 - 1e-6 && bbox.y1 <= 120.0 + 1e-6, "{bbox:?}");
    assert!(bbox.x0 <= -70.0 + 1e-6);
    assert!(bbox.x1 >= 300.0);
}

#[test]
fn triangle_zig_zags_between_row_and_row_plus_size() {
    let path = wave_path(Waveform::Triangle, 0.0, 50.0, 10.0, 100.0, 0.0);
    let pts = points(&path);
    assert!(pts.iter().all(|p| p.y == 50.0 || p.y == 60.0));
    assert_eq!(pts[0], Point::new(-20.0, 50.0));
    assert_eq!(pts[1], Point::new(-10.0, 60.0));
    assert_eq!(pts[2], Point::new(0.0, 50.0));
}

#[test]
fn square_uses_orthogonal_steps() {
    let path = wave_path(Waveform::Square, 0.0, 0.0, 5.0, 20.0, 0.0);
    let pts = points(&path);
    for pair in pts.chunks_exact(2) {
        let (a, b) = (pair[0], pair[1]);
        assert!(a.x == b.x || a.y == b.y);
        assert!((0.0..=5.0).contains(&a.y) && (0.0..=5.0).contains(&b.y));
    }
    assert!(pts.last().unwrap().x >= 20.0);
}

#[test]
fn offset_shifts_the_start_by_two_sizes_per_unit() {
    let a = points(&wave_path(Waveform::Triangle, 0.0, 0.0, 10.0, 50.0, 0.0));
    let b = points(&wave_path(Waveform::Triangle, 0.0, 0.0, 10.0, 50.0, 0.5));
    assert_eq!(b[0].x - a[0].x, 10.0);
}

#[test]
fn non_positive_size_is_empty() {
    assert!(wave_path(Waveform::Sine, 0.0, 0.0, 0.0, 100.0, 0.0).elements().is_empty());
    assert!(wave_path(Waveform::Square, 0.0, 0.0, -3.0, 100.0, 0.0).elements().is_empty());
}

#[test]
fn sub_pixel_sizes_are_not_tiled() {
    for size in [1e-9, 1e-6, 0.49] {
        assert!(wave_path(Waveform::Triangle, 10.0, 5.0, size, 16.0, 0.0)
            .elements()
            .is_empty());
    }
    let smallest = wave_path(Waveform::Triangle, 10.0, 5.0, MIN_WAVE_SIZE, 16.0, 0.0);
    assert!(!smallest.elements().is_empty());
    assert!(smallest.elements().len() < 200);
}

#[test]
fn far_left_origin_skips_hidden_periods() {
    let near = wave_path(Waveform::Square, 0.0, 0.0, 5.0, 40.0, 0.0);
    let far = wave_path(Waveform::Square, 1.0e12, 0.0, 5.0, 40.0, 0.0);
    assert!(far.elements().len() <= near.elements().len() + 16);
    let bbox = far.bounding_box();
    assert!(bbox.x0 <= 0.0 && bbox.x1 >= 40.0, "{bbox:?}");
}

#[test]
fn non_finite_inputs_are_empty() {
    assert!(wave_path(Waveform::Sine, 0.0, 0.0, 4.0, f64::INFINITY, 0.0)
        .elements()
        .is_empty());
    assert!(wave_path(Waveform::Sine, f64::NAN, 0.0, 4.0, 100.0, 0.0)
        .elements()
        .is_empty());
}

#[test]
fn offset_advances_and_wraps() {
    let mut offset = 0.0;
    for _ in 0..3 {
        offset = advance_offset(offset, 4.0);
    }
    assert_eq!(offset, 0.75);
    assert_eq!(advance_offset(offset, 4.0), 0.0);
    assert_eq!(advance_offset(0.3, 0.0), 0.3);
}
