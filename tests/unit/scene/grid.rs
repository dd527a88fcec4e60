use super::*;
use crate::color::hsl::{ColorSample, Hsl};
use crate::random::sampling::seeded_rng;
use crate::scene::model::RenderKind;

fn rect(x: f64, y: f64, w: f64, h: f64) -> ShapeDescriptor {
    ShapeDescriptor::Rectangle {
        render_kind: RenderKind::Fill,
        colors: vec![ColorSample::opaque(Hsl::new(0, 0, 0))],
        x,
        y,
        width: w,
        height: h,
        weight: None,
    }
}

fn circle(r: f64) -> ShapeDescriptor {
    ShapeDescriptor::Circle {
        render_kind: RenderKind::Fill,
        colors: vec![ColorSample::opaque(Hsl::new(0, 0, 0))],
        x: 500.0,
        y: 500.0,
        radius: r,
        weight: None,
    }
}

#[test]
fn first_item_anchors_at_grid_origin() {
    let mut grids = vec![GridCell::new(10.0, 20.0, 2, 2)];
    let mut item = rect(300.0, 300.0, 30.0, 40.0);
    assert!(place_on_grid(&mut grids, &mut item));
    assert_eq!(item, rect(10.0, 20.0, 30.0, 40.0));
    assert_eq!(grids[0].items, vec![item]);
}

#[test]
fn later_items_follow_row_major_cells_of_the_anchor() {
    let mut grids = vec![GridCell::new(0.0, 0.0, 2, 2)];
    let mut anchor = rect(1.0, 1.0, 30.0, 40.0);
    place_on_grid(&mut grids, &mut anchor);

    let mut second = rect(99.0, 99.0, 5.0, 5.0);
    place_on_grid(&mut grids, &mut second);
    assert_eq!(second, rect(30.0, 0.0, 30.0, 40.0));

    let mut third = circle(3.0);
    place_on_grid(&mut grids, &mut third);
    match third {
        ShapeDescriptor::Circle { x, y, radius, .. } => {
            assert_eq!((x, y), (0.0, 40.0));
            assert_eq!(radius, 15.0);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn full_grids_are_skipped_then_placement_fails() {
    let mut grids = vec![GridCell::new(0.0, 0.0, 1, 1), GridCell::new(50.0, 50.0, 1, 1)];
    let mut a = rect(1.0, 1.0, 2.0, 2.0);
    let mut b = rect(1.0, 1.0, 2.0, 2.0);
    let mut c = rect(7.0, 7.0, 2.0, 2.0);
    assert!(place_on_grid(&mut grids, &mut a));
    assert!(place_on_grid(&mut grids, &mut b));
    assert_eq!(b, rect(50.0, 50.0, 2.0, 2.0));
    assert!(!place_on_grid(&mut grids, &mut c));
    assert_eq!(c, rect(7.0, 7.0, 2.0, 2.0));
    assert!(!place_on_grid(&mut [], &mut c));
}

#[test]
fn sampled_grids_respect_canvas_and_size_range() {
    let mut rng = seeded_rng(4);
    let canvas = Canvas::new(200, 100).unwrap();
    let grids = sample_grids(&mut rng, canvas, 50, IntRange { min: 2, max: 4 });
    assert_eq!(grids.len(), 50);
    for g in grids {
        assert!((0.0..=200.0).contains(&g.x));
        assert!((0.0..=100.0).contains(&g.y));
        assert!((2..=4).contains(&g.columns));
        assert!((2..=4).contains(&g.rows));
        assert!(g.items.is_empty());
    }
}
